use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Timing for a single animation tick.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based tick counter since the clock was created.
    pub index: u64,
    /// Clamped (and optionally smoothed) delta since the previous tick, in ms.
    pub dt_ms: f64,
    /// Host timestamp of this tick, in ms.
    pub now_ms: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameClockConfig {
    pub min_dt_ms: f64,
    pub max_dt_ms: f64,
    /// Number of raw deltas averaged together. `1` disables smoothing.
    pub smoothing_window: usize,
    /// Smoothing only kicks in once more than this many samples are buffered.
    pub smoothing_min_samples: usize,
}

impl Default for FrameClockConfig {
    fn default() -> Self {
        Self {
            min_dt_ms: 1.0,
            max_dt_ms: 64.0,
            smoothing_window: 1,
            smoothing_min_samples: 3,
        }
    }
}

/// Converts host timestamps into safe per-tick deltas.
///
/// A long gap (tab in the background, debugger pause) never becomes a long
/// delta: raw deltas are clamped into `[min_dt_ms, max_dt_ms]`, and `reset`
/// forgets the previous timestamp so the first tick after a resume starts
/// fresh instead of catching up.
#[derive(Debug, Clone)]
pub struct FrameClock {
    config: FrameClockConfig,
    last_ms: Option<f64>,
    history: VecDeque<f64>,
    next_index: u64,
}

impl FrameClock {
    pub fn new(config: FrameClockConfig) -> Self {
        Self {
            config,
            last_ms: None,
            history: VecDeque::with_capacity(config.smoothing_window.max(1)),
            next_index: 0,
        }
    }

    pub fn config(&self) -> FrameClockConfig {
        self.config
    }

    pub fn advance(&mut self, now_ms: f64) -> Frame {
        let raw = match self.last_ms {
            Some(prev) => now_ms - prev,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);

        let smoothed = self.smooth(raw);
        let dt_ms = self.clamp(smoothed);
        let frame = Frame {
            index: self.next_index,
            dt_ms,
            now_ms,
        };
        self.next_index += 1;
        frame
    }

    /// Forget the previous timestamp; the next `advance` yields `min_dt_ms`.
    pub fn reset(&mut self) {
        self.last_ms = None;
        self.history.clear();
    }

    fn smooth(&mut self, raw: f64) -> f64 {
        let window = self.config.smoothing_window;
        if window <= 1 || !raw.is_finite() {
            return raw;
        }
        self.history.push_back(raw);
        while self.history.len() > window {
            self.history.pop_front();
        }
        if self.history.len() > self.config.smoothing_min_samples {
            self.history.iter().sum::<f64>() / self.history.len() as f64
        } else {
            raw
        }
    }

    fn clamp(&self, dt: f64) -> f64 {
        if !dt.is_finite() {
            return self.config.min_dt_ms.min(self.config.max_dt_ms);
        }
        // max/min rather than f64::clamp: a misconfigured min > max must not panic.
        dt.max(self.config.min_dt_ms).min(self.config.max_dt_ms)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(FrameClockConfig::default())
    }
}
