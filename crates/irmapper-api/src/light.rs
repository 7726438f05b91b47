use std::fmt::{self, Display};

use serde::de::Error;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Eq, PartialEq, Hash)]
#[serde(transparent)]
pub struct Rgb(pub [u8; 3]);

/// Accepts exactly three components. Some deserializers (the `config` crate
/// among them) stop reading a fixed-size array early instead of rejecting
/// trailing elements, so the length is checked here.
impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<u8>::deserialize(deserializer)?;
        let rgb: [u8; 3] = values
            .as_slice()
            .try_into()
            .map_err(|_| D::Error::invalid_length(values.len(), &"an [r, g, b] triple"))?;
        Ok(Self(rgb))
    }
}

impl Rgb {
    pub const WHITE: Self = Self([255, 255, 255]);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Squared euclidean distance in RGB space.
    #[must_use]
    pub fn distance_sq(self, other: Self) -> u32 {
        self.0
            .iter()
            .zip(other.0)
            .map(|(&a, b)| u32::from(a.abs_diff(b)).pow(2))
            .sum()
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "({r}, {g}, {b})")
    }
}

/// What we believe the physical light is doing. Never confirmed by the device.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct AssumedState {
    pub is_on: bool,
    pub brightness: u8,
    pub rgb_color: Rgb,
    pub effect: Option<String>,
}

impl Default for AssumedState {
    fn default() -> Self {
        Self {
            is_on: false,
            brightness: u8::MAX,
            rgb_color: Rgb::WHITE,
            effect: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct SupportedFeatures {
    pub brightness: bool,
    pub color: bool,
    pub effect: bool,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Brightness,
    Color,
}

impl Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Brightness => "brightness",
            Self::Color => "color",
        })
    }
}

/// Attributes that may accompany a turn-on request.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct TurnOn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rgb_color: Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LightAction {
    TurnOn(TurnOn),
    TurnOff,
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    Sent { code: String },
    TransportFailed { code: String, reason: String },
    Unsupported { feature: Feature },
    UnknownEffect { name: String },
}

/// Ordered record of everything one `apply` attempted.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct ApplyReport {
    pub steps: Vec<StepOutcome>,
}

impl ApplyReport {
    pub fn push(&mut self, step: StepOutcome) {
        self.steps.push(step);
    }

    /// Number of codes the transport accepted.
    #[must_use]
    pub fn sent(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, StepOutcome::Sent { .. }))
            .count()
    }

    /// Codes handed to the transport, in order, whether or not it succeeded.
    #[must_use]
    pub fn codes(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|s| match s {
                StepOutcome::Sent { code } | StepOutcome::TransportFailed { code, .. } => {
                    Some(code.as_str())
                }
                _ => None,
            })
            .collect()
    }

    /// True when nothing was skipped and every send succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.steps
            .iter()
            .all(|s| matches!(s, StepOutcome::Sent { .. }))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct LightView {
    pub id: String,
    pub name: String,
    pub remote: String,
    pub state: AssumedState,
    pub supported_features: SupportedFeatures,
    pub effect_list: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct ApplyResponse {
    pub state: AssumedState,
    pub report: ApplyReport,
}

#[cfg(test)]
mod tests {
    use crate::light::{ApplyReport, AssumedState, Feature, LightAction, Rgb, StepOutcome, TurnOn};

    #[test]
    fn initial_state() {
        let state = AssumedState::default();
        assert!(!state.is_on);
        assert_eq!(state.brightness, 255);
        assert_eq!(state.rgb_color, Rgb::WHITE);
        assert_eq!(state.effect, None);
    }

    #[test]
    fn distance_is_squared_euclidean() {
        let a = Rgb::new(200, 10, 10);
        assert_eq!(a.distance_sq(Rgb::new(255, 0, 0)), 55 * 55 + 10 * 10 + 10 * 10);
        assert_eq!(a.distance_sq(a), 0);
        assert_eq!(
            Rgb::new(0, 0, 0).distance_sq(Rgb::WHITE),
            3 * 255 * 255
        );
    }

    #[test]
    fn report_counts() {
        let mut report = ApplyReport::default();
        assert!(report.is_clean());

        report.push(StepOutcome::Sent { code: "A".into() });
        report.push(StepOutcome::TransportFailed {
            code: "B".into(),
            reason: "down".into(),
        });
        report.push(StepOutcome::Unsupported {
            feature: Feature::Color,
        });

        assert_eq!(report.sent(), 1);
        assert_eq!(report.codes(), ["A", "B"]);
        assert!(!report.is_clean());
    }

    #[test]
    fn action_wire_format() {
        let action: LightAction =
            serde_json::from_str(r#"{"action": "turn_on", "rgb_color": [1, 2, 3]}"#).unwrap();
        assert_eq!(
            action,
            LightAction::TurnOn(TurnOn {
                rgb_color: Some(Rgb::new(1, 2, 3)),
                ..TurnOn::default()
            })
        );

        let action: LightAction = serde_json::from_str(r#"{"action": "turn_off"}"#).unwrap();
        assert_eq!(action, LightAction::TurnOff);
    }

    #[test]
    fn rgb_needs_exactly_three_components() {
        assert_eq!(serde_json::from_str::<Rgb>("[1, 2, 3]").unwrap(), Rgb::new(1, 2, 3));
        assert!(serde_json::from_str::<Rgb>("[1, 2, 3, 4]").is_err());
        assert!(serde_json::from_str::<Rgb>("[1, 2]").is_err());
        assert!(serde_json::from_str::<Rgb>("[]").is_err());
        assert!(serde_json::from_str::<Rgb>("[1, 2, 256]").is_err());
    }
}
