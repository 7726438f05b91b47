use std::collections::BTreeSet;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::error::{ConfigValidationError, ValidationResult};
use crate::light::Rgb;

/// Namespace for light ids derived from device names.
const LIGHT_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6c3d_5f0e_9a1b_4e2c_8d47_b0a5_e1f3_2c98);

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct ServerConfig {
    pub listen: SocketAddr,
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct HassServer {
    pub url: Url,
    pub token_env: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct IrCodes {
    pub power_on: String,
    pub power_off: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness_up: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness_down: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct ColorEntry {
    pub name: String,
    pub rgb: Rgb,
    pub ir_code: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct EffectEntry {
    pub name: String,
    pub ir_code: String,
}

/// Static description of one IR-controlled light. Immutable after load.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct DeviceProfile {
    pub name: String,
    pub broadlink_remote: String,
    pub ir_codes: IrCodes,
    #[serde(default)]
    pub colors: Vec<ColorEntry>,
    #[serde(default)]
    pub effects: Vec<EffectEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub hass: HassServer,
    #[serde(default)]
    pub lights: Vec<DeviceProfile>,
}

impl DeviceProfile {
    /// Stable identifier for this light: the configured `unique_id`, or a
    /// name-based UUIDv5 when none is set.
    #[must_use]
    pub fn entity_id(&self) -> String {
        self.unique_id.clone().unwrap_or_else(|| {
            Uuid::new_v5(&LIGHT_ID_NAMESPACE, self.name.as_bytes()).to_string()
        })
    }

    #[must_use]
    pub const fn supports_brightness(&self) -> bool {
        self.ir_codes.brightness_up.is_some() || self.ir_codes.brightness_down.is_some()
    }

    #[must_use]
    pub fn effect_list(&self) -> Vec<String> {
        self.effects.iter().map(|e| e.name.clone()).collect()
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigValidationError::EmptyName);
        }

        if self.unique_id.as_ref().is_some_and(|id| id.trim().is_empty()) {
            return Err(ConfigValidationError::EmptyUniqueId(self.name.clone()));
        }

        if !is_entity_id(&self.broadlink_remote) {
            return Err(ConfigValidationError::InvalidEntityId {
                light: self.name.clone(),
                entity_id: self.broadlink_remote.clone(),
            });
        }

        let codes = [
            ("power_on", Some(&self.ir_codes.power_on)),
            ("power_off", Some(&self.ir_codes.power_off)),
            ("brightness_up", self.ir_codes.brightness_up.as_ref()),
            ("brightness_down", self.ir_codes.brightness_down.as_ref()),
        ];
        for (key, code) in codes {
            if code.is_some_and(|c| c.trim().is_empty()) {
                return Err(ConfigValidationError::EmptyCode {
                    light: self.name.clone(),
                    key: key.to_string(),
                });
            }
        }

        for color in &self.colors {
            if color.name.trim().is_empty() || color.ir_code.trim().is_empty() {
                return Err(ConfigValidationError::EmptyCode {
                    light: self.name.clone(),
                    key: format!("colors[{}]", color.name),
                });
            }
        }

        for effect in &self.effects {
            if effect.name.trim().is_empty() || effect.ir_code.trim().is_empty() {
                return Err(ConfigValidationError::EmptyCode {
                    light: self.name.clone(),
                    key: format!("effects[{}]", effect.name),
                });
            }
        }

        Ok(())
    }
}

impl AppConfig {
    #[must_use]
    pub const fn has_lights(&self) -> bool {
        !self.lights.is_empty()
    }

    pub fn validate(&self) -> ValidationResult<()> {
        let mut seen = BTreeSet::new();
        for light in &self.lights {
            light.validate()?;
            let id = light.entity_id();
            if !seen.insert(id.clone()) {
                return Err(ConfigValidationError::DuplicateId(id));
            }
        }
        Ok(())
    }
}

/// Checks the `domain.object_id` shape Home Assistant uses for entity ids.
fn is_entity_id(value: &str) -> bool {
    let Some((domain, object_id)) = value.split_once('.') else {
        return false;
    };

    let valid = |part: &str| {
        !part.is_empty()
            && !part.starts_with('_')
            && !part.ends_with('_')
            && part
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    };

    valid(domain) && valid(object_id)
}
