pub mod filter;
pub mod notes;
pub mod position;
pub mod routes;
pub mod scene;
