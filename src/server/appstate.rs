use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use crate::light::IrLight;
use crate::transport::Transport;

pub type SharedLight = Arc<Mutex<IrLight>>;

/// Everything the HTTP layer needs. Each light sits behind its own lock, so
/// one light handles a single action at a time while others run freely.
#[derive(Clone)]
pub struct AppState {
    lights: Arc<Vec<(String, SharedLight)>>,
}

impl AppState {
    #[must_use]
    pub fn new(config: &AppConfig, transport: &Arc<dyn Transport>) -> Self {
        let lights = config
            .lights
            .iter()
            .map(|profile| {
                let light = IrLight::new(profile.clone(), transport.clone());
                log::info!(
                    "Loaded light {:?} [{}] via {}",
                    light.name(),
                    light.id(),
                    profile.broadlink_remote
                );
                (light.id().to_string(), Arc::new(Mutex::new(light)))
            })
            .collect();

        Self {
            lights: Arc::new(lights),
        }
    }

    pub fn lights(&self) -> impl Iterator<Item = &SharedLight> {
        self.lights.iter().map(|(_, light)| light)
    }

    pub fn light(&self, id: &str) -> ApiResult<SharedLight> {
        self.lights
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, light)| light.clone())
            .ok_or_else(|| ApiError::LightNotFound(id.to_string()))
    }
}
