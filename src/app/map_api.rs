use async_trait::async_trait;

use super::App;
use crate::api::MapAPI;
use crate::error::Error;
use crate::map::Scene;

#[async_trait]
impl MapAPI for App<Scene> {
    async fn scene(&self) -> Result<Scene, Error> {
        Ok(self.with_map(|scene| scene.clone()).await)
    }
}
