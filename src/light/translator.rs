use irmapper_api::light::{ApplyReport, Feature, LightAction, Rgb, StepOutcome, TurnOn};

use crate::light::{IrLight, nearest_color};

/// Brightness covered by one up/down pulse.
pub const BRIGHTNESS_STEP: u8 = 25;

/// Upper bound on pulses sent for a single brightness change.
pub const MAX_BRIGHTNESS_STEPS: u8 = 10;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Direction {
    Up,
    Down,
}

/// Pulses needed to move from `current` to `target`.
///
/// An unchanged target still counts as `Down` (with zero steps).
fn brightness_plan(current: u8, target: u8) -> (Direction, u8) {
    let steps = (current.abs_diff(target) / BRIGHTNESS_STEP).min(MAX_BRIGHTNESS_STEPS);
    let direction = if target > current {
        Direction::Up
    } else {
        Direction::Down
    };
    (direction, steps)
}

impl IrLight {
    /// Run one host action to completion.
    ///
    /// Never fails: transport errors and unsupported requests are logged and
    /// recorded in the returned report, and the assumed state is updated as if
    /// every send had worked.
    pub async fn apply(&mut self, action: &LightAction) -> ApplyReport {
        let mut report = ApplyReport::default();
        match action {
            LightAction::TurnOn(req) => self.turn_on(req, &mut report).await,
            LightAction::TurnOff => self.turn_off(&mut report).await,
        }
        report
    }

    async fn turn_on(&mut self, req: &TurnOn, report: &mut ApplyReport) {
        if !self.state.is_on {
            let code = self.profile.ir_codes.power_on.clone();
            self.send(&code, report).await;
            self.state.is_on = true;
        }

        if let Some(brightness) = req.brightness {
            self.set_brightness(brightness, report).await;
        }

        if let Some(rgb) = req.rgb_color {
            self.set_rgb_color(rgb, report).await;
        }

        if let Some(effect) = &req.effect {
            self.set_effect(effect, report).await;
        }
    }

    async fn turn_off(&mut self, report: &mut ApplyReport) {
        let code = self.profile.ir_codes.power_off.clone();
        self.send(&code, report).await;
        self.state.is_on = false;
        self.state.effect = None;
    }

    async fn set_brightness(&mut self, target: u8, report: &mut ApplyReport) {
        if !self.features.brightness {
            log::warn!("[{}] Brightness control not configured", self.name());
            report.push(StepOutcome::Unsupported {
                feature: Feature::Brightness,
            });
            return;
        }

        let (direction, steps) = brightness_plan(self.state.brightness, target);
        let codes = &self.profile.ir_codes;
        let code = match direction {
            Direction::Up => codes.brightness_up.clone(),
            Direction::Down => codes.brightness_down.clone(),
        };

        match code {
            Some(code) => {
                for _ in 0..steps {
                    self.send(&code, report).await;
                }
            }
            None if steps > 0 => {
                log::debug!(
                    "[{}] No {direction:?} brightness code, tracking {target} without sending",
                    self.name()
                );
            }
            None => {}
        }

        self.state.brightness = target;
    }

    async fn set_rgb_color(&mut self, rgb: Rgb, report: &mut ApplyReport) {
        let Some(color) = nearest_color(&self.profile.colors, rgb) else {
            log::warn!("[{}] No colors configured", self.name());
            report.push(StepOutcome::Unsupported {
                feature: Feature::Color,
            });
            return;
        };

        log::debug!(
            "[{}] Requested {rgb} matched preset {:?} {}",
            self.name(),
            color.name,
            color.rgb
        );

        let (code, matched) = (color.ir_code.clone(), color.rgb);
        self.send(&code, report).await;
        self.state.rgb_color = matched;
        self.state.effect = None;
    }

    async fn set_effect(&mut self, name: &str, report: &mut ApplyReport) {
        let Some(effect) = self.profile.effects.iter().find(|e| e.name == name) else {
            log::warn!("[{}] Effect {name:?} not found", self.name());
            report.push(StepOutcome::UnknownEffect {
                name: name.to_string(),
            });
            return;
        };

        let code = effect.ir_code.clone();
        self.send(&code, report).await;
        self.state.effect = Some(name.to_string());
    }

    async fn send(&self, code: &str, report: &mut ApplyReport) {
        let remote = &self.profile.broadlink_remote;
        match self.transport.send_command(remote, code).await {
            Ok(()) => {
                log::debug!("[{}] Sent IR command {code:?} via {remote}", self.name());
                report.push(StepOutcome::Sent {
                    code: code.to_string(),
                });
            }
            Err(err) => {
                log::error!("[{}] Failed to send IR command: {err}", self.name());
                report.push(StepOutcome::TransportFailed {
                    code: code.to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }
}
