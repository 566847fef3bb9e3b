use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    pub initial_yaw_deg: f64,
    pub initial_pitch_deg: f64,
    /// Radians per millisecond.
    pub auto_rotate_velocity: f64,
    /// Fixed axial tilt blended into the view pitch.
    pub tilt_deg: f64,
    /// Share of the user pitch in the view pitch; the rest is tilt.
    pub pitch_weight: f64,
    /// Pitch is kept within `±(π/2 - pitch_margin)`.
    pub pitch_margin: f64,
    /// Radians per pixel of horizontal drag.
    pub yaw_sensitivity: f64,
    /// Radians per pixel of vertical drag.
    pub pitch_sensitivity: f64,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            initial_yaw_deg: -40.0,
            initial_pitch_deg: 10.0,
            auto_rotate_velocity: 0.00005,
            tilt_deg: 18.0,
            pitch_weight: 0.6,
            pitch_margin: 0.1,
            yaw_sensitivity: 0.005,
            pitch_sensitivity: 0.003,
        }
    }
}

/// Rotation captured at pointer-down; drags are applied relative to it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DragOrigin {
    pub yaw: f64,
    pub pitch: f64,
}

/// Globe orientation, owned by the animation loop.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RotationState {
    pub yaw: f64,
    pitch: f64,
    pub auto_rotate_velocity: f64,
    tilt: f64,
    pitch_weight: f64,
    pitch_limit: f64,
    yaw_sensitivity: f64,
    pitch_sensitivity: f64,
}

impl RotationState {
    pub fn new(config: &RotationConfig) -> Self {
        let margin = if config.pitch_margin.is_finite() {
            config.pitch_margin.clamp(1e-6, FRAC_PI_2)
        } else {
            RotationConfig::default().pitch_margin
        };
        let mut state = Self {
            yaw: config.initial_yaw_deg.to_radians(),
            pitch: 0.0,
            auto_rotate_velocity: config.auto_rotate_velocity,
            tilt: config.tilt_deg.to_radians(),
            pitch_weight: config.pitch_weight,
            pitch_limit: FRAC_PI_2 - margin,
            yaw_sensitivity: config.yaw_sensitivity,
            pitch_sensitivity: config.pitch_sensitivity,
        };
        state.set_pitch(config.initial_pitch_deg.to_radians());
        state
    }

    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn pitch_limit(&self) -> f64 {
        self.pitch_limit
    }

    /// Stores `pitch` clamped into the open interval `(-π/2, π/2)`.
    /// NaN collapses to the lower limit.
    pub fn set_pitch(&mut self, pitch: f64) {
        self.pitch = pitch.max(-self.pitch_limit).min(self.pitch_limit);
    }

    /// Auto-rotation step.
    pub fn advance(&mut self, dt_ms: f64) {
        let step = self.auto_rotate_velocity * dt_ms;
        if step.is_finite() {
            self.yaw += step;
        }
    }

    pub fn drag_origin(&self) -> DragOrigin {
        DragOrigin {
            yaw: self.yaw,
            pitch: self.pitch,
        }
    }

    /// Applies a drag of `(dx, dy)` pixels measured from the gesture start.
    pub fn drag_from(&mut self, origin: DragOrigin, dx: f64, dy: f64) {
        let yaw = origin.yaw - dx * self.yaw_sensitivity;
        if yaw.is_finite() {
            self.yaw = yaw;
        }
        self.set_pitch(origin.pitch - dy * self.pitch_sensitivity);
    }

    /// Pitch used for projection: user pitch blended with the fixed tilt.
    pub fn view_pitch(&self) -> f64 {
        self.pitch * self.pitch_weight + self.tilt * (1.0 - self.pitch_weight)
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::new(&RotationConfig::default())
    }
}
