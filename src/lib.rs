pub mod api;
pub mod app;
pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod geo;
pub mod location;
pub mod map;
pub mod server;
pub mod store;
