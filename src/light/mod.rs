mod color;
mod translator;

use std::sync::Arc;

use irmapper_api::config::DeviceProfile;
use irmapper_api::light::{AssumedState, LightView, SupportedFeatures};

use crate::transport::Transport;

pub use self::color::nearest_color;
pub use self::translator::{BRIGHTNESS_STEP, MAX_BRIGHTNESS_STEPS};

/// One IR-controlled light.
///
/// The device cannot report anything back, so the only state held here is the
/// [`AssumedState`] that follows from the commands we have sent.
pub struct IrLight {
    id: String,
    profile: DeviceProfile,
    features: SupportedFeatures,
    state: AssumedState,
    transport: Arc<dyn Transport>,
}

impl IrLight {
    #[must_use]
    pub fn new(profile: DeviceProfile, transport: Arc<dyn Transport>) -> Self {
        let features = SupportedFeatures {
            brightness: profile.supports_brightness(),
            color: !profile.colors.is_empty(),
            effect: !profile.effects.is_empty(),
        };

        Self {
            id: profile.entity_id(),
            profile,
            features,
            state: AssumedState::default(),
            transport,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.profile.name
    }

    #[must_use]
    pub const fn state(&self) -> &AssumedState {
        &self.state
    }

    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.state.is_on
    }

    #[must_use]
    pub const fn brightness(&self) -> u8 {
        self.state.brightness
    }

    #[must_use]
    pub const fn supported_features(&self) -> SupportedFeatures {
        self.features
    }

    #[must_use]
    pub fn effect_list(&self) -> Vec<String> {
        self.profile.effect_list()
    }

    #[must_use]
    pub fn view(&self) -> LightView {
        LightView {
            id: self.id.clone(),
            name: self.profile.name.clone(),
            remote: self.profile.broadlink_remote.clone(),
            state: self.state.clone(),
            supported_features: self.features,
            effect_list: self.effect_list(),
        }
    }
}
