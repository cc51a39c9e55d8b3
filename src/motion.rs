//! Gravity estimation and posture stability gating
//!
//! This module handles the "posture" half of the shared accelerometer:
//! 1. EMA low-pass filter on raw samples → stable gravity estimate
//! 2. Roll/pitch (and a yaw proxy) derived from the gravity direction
//! 3. Stability gate: posture is only trusted after the signal has been
//!    quiet for a minimum dwell time AND no shake lockout is active
//!
//! The shake channel (see [`crate::shake`]) shares the same raw sensor but
//! needs a fast-reacting high-pass residual, so the two filters are kept
//! fully independent.
//!
//! Yaw note: a 3-axis accelerometer cannot observe true yaw (no
//! magnetometer or gyro is fused). The yaw proxy is a heuristic for the
//! renderer, never an input to classification.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single raw accelerometer sample in gravity units (g)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AccelSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AccelSample {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean magnitude of the sample (≈1.0 g at rest)
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    fn distance(&self, other: &AccelSample) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Orientation derived from the filtered gravity vector
///
/// Recomputed every tick. `posture_reliable == false` means the caller must
/// not make any tilt-based decision this tick (see [`crate::mode`]).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrientationEstimate {
    /// Roll angle in degrees: atan2(gy, gz)
    pub roll_deg: f32,
    /// Pitch angle in degrees: atan2(-gx, ‖(gy, gz)‖)
    pub pitch_deg: f32,
    /// Yaw proxy in degrees: atan2(gy, gx). Heuristic only.
    pub yaw_proxy_deg: f32,
    /// Gravity unit vector [x, y, z]
    pub gravity: [f32; 3],
    /// True when roll/pitch may be trusted for mode classification
    pub posture_reliable: bool,
}

/// Configurable thresholds for the gravity filter and stability gate
#[derive(Debug, Clone, Copy)]
pub struct MotionConfig {
    /// EMA smoothing factor for the gravity low-pass (lower = smoother)
    pub lp_alpha: f32,
    /// Lower bound on low-pass magnitude for stability (g)
    pub stable_mag_min: f32,
    /// Upper bound on low-pass magnitude for stability (g)
    pub stable_mag_max: f32,
    /// Maximum sample-to-sample jerk for stability (g)
    pub stable_jerk_max: f32,
    /// Minimum quiet dwell before posture is trusted (ms)
    pub stable_min_ms: u32,
    /// Posture frozen for this long after a shake (ms)
    pub shake_lockout_ms: u32,
    /// Below this magnitude, normalization is skipped and the previous
    /// gravity direction is held (guards division by near-zero)
    pub min_magnitude: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            lp_alpha: 0.10,       // ~22 samples to 90%
            stable_mag_min: 0.80, // resting magnitude is ~1.0 g
            stable_mag_max: 1.20,
            stable_jerk_max: 0.12,
            stable_min_ms: 250,
            shake_lockout_ms: 900,
            min_magnitude: 1e-3,
        }
    }
}

/// Gravity low-pass filter with jerk tracking and a stability gate
pub struct MotionFilter {
    config: MotionConfig,

    /// Previous raw sample, for jerk computation
    raw_prev: Option<AccelSample>,
    /// Low-pass (gravity) estimate; seeded from the first sample
    low_pass: Option<AccelSample>,
    /// Last normalized gravity direction (held through degenerate samples)
    gravity: [f32; 3],

    /// Start of the current quiet dwell, None while unstable
    stable_since: Option<u32>,
    /// Posture is unreliable until this timestamp (ms)
    shake_lockout_until: u32,

    roll_deg: f32,
    pitch_deg: f32,
    yaw_proxy_deg: f32,
}

impl MotionFilter {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            raw_prev: None,
            low_pass: None,
            gravity: [0.0, 0.0, 1.0],
            stable_since: None,
            shake_lockout_until: 0,
            roll_deg: 0.0,
            pitch_deg: 0.0,
            yaw_proxy_deg: 0.0,
        }
    }

    /// Ingest one raw sample and return the updated orientation estimate
    ///
    /// # Arguments
    /// * `sample` - Raw 3-axis acceleration in g
    /// * `now_ms` - Monotonic timestamp in milliseconds
    pub fn update(&mut self, sample: AccelSample, now_ms: u32) -> OrientationEstimate {
        let jerk = match self.raw_prev {
            Some(prev) => sample.distance(&prev),
            None => 0.0,
        };
        self.raw_prev = Some(sample);

        // EMA low-pass; first sample seeds the state directly to avoid a
        // startup transient from an arbitrary initial value
        let lp = match &mut self.low_pass {
            Some(lp) => {
                let a = self.config.lp_alpha;
                lp.x += a * (sample.x - lp.x);
                lp.y += a * (sample.y - lp.y);
                lp.z += a * (sample.z - lp.z);
                *lp
            }
            None => {
                self.low_pass = Some(sample);
                sample
            }
        };

        // Normalize to a gravity direction; hold the previous direction on
        // degenerate (near-zero) magnitude rather than dividing
        let lp_mag = lp.magnitude();
        if lp_mag > self.config.min_magnitude {
            self.gravity = [lp.x / lp_mag, lp.y / lp_mag, lp.z / lp_mag];
        }

        let [gx, gy, gz] = self.gravity;
        self.roll_deg = gy.atan2(gz).to_degrees();
        self.pitch_deg = (-gx).atan2((gy * gy + gz * gz).sqrt()).to_degrees();
        self.yaw_proxy_deg = gy.atan2(gx).to_degrees();

        // Stability gate: dwell timestamp set on the rising edge of
        // instantaneous stability, cleared whenever stability is lost
        let instant_stable = lp_mag >= self.config.stable_mag_min
            && lp_mag <= self.config.stable_mag_max
            && jerk <= self.config.stable_jerk_max;
        if instant_stable {
            if self.stable_since.is_none() {
                self.stable_since = Some(now_ms);
            }
        } else {
            self.stable_since = None;
        }

        self.estimate(now_ms)
    }

    /// Re-read the current estimate without ingesting a sample
    ///
    /// Reliability is evaluated at call time, so a shake lockout armed after
    /// `update` is reflected immediately (no stale-reliability window).
    pub fn estimate(&self, now_ms: u32) -> OrientationEstimate {
        let dwell_ok = self
            .stable_since
            .is_some_and(|since| now_ms.saturating_sub(since) >= self.config.stable_min_ms);
        let posture_reliable = dwell_ok && now_ms >= self.shake_lockout_until;

        OrientationEstimate {
            roll_deg: self.roll_deg,
            pitch_deg: self.pitch_deg,
            yaw_proxy_deg: self.yaw_proxy_deg,
            gravity: self.gravity,
            posture_reliable,
        }
    }

    /// Freeze posture for the configured lockout window
    ///
    /// A shake always invalidates any in-progress stability dwell: the gate
    /// must re-earn its dwell from scratch once the lockout expires.
    pub fn apply_shake_lockout(&mut self, now_ms: u32) {
        self.shake_lockout_until = now_ms.saturating_add(self.config.shake_lockout_ms);
        self.stable_since = None;
    }

    /// Timestamp until which posture is frozen (for diagnostics)
    pub fn lockout_until(&self) -> u32 {
        self.shake_lockout_until
    }
}

impl Default for MotionFilter {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}
