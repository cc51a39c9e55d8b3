//! Shake gesture detection
//!
//! Shake and posture share one physical sensor but need contradictory
//! filtering: posture wants a smooth gravity estimate, shake wants the fast
//! residual the smoothing throws away. This detector keeps its own EMA of
//! the raw magnitude and fires on a high-pass spike above it, with a
//! cooldown so one physical shake cannot register twice.
//!
//! Arming the posture lockout on a fire is the caller's job (see
//! [`crate::engine`]): the detector itself only decides "was that a shake".

use log::debug;

/// Configurable thresholds for shake detection
#[derive(Debug, Clone, Copy)]
pub struct ShakeConfig {
    /// EMA smoothing factor for the magnitude baseline
    pub ema_alpha: f32,
    /// High-pass residual above which a shake fires (g)
    pub hp_threshold: f32,
    /// Minimum gap between shake fires (ms)
    pub cooldown_ms: u32,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            ema_alpha: 0.10,
            hp_threshold: 0.60, // resting residual is well under 0.1 g
            cooldown_ms: 300,
        }
    }
}

/// Spike detector over the high-pass residual of raw magnitude
pub struct ShakeDetector {
    config: ShakeConfig,
    /// Slow magnitude baseline; seeded from the first sample
    magnitude_ema: Option<f32>,
    /// Timestamp of the last fire (ms)
    last_shake_ms: u32,
}

impl ShakeDetector {
    pub fn new(config: ShakeConfig) -> Self {
        Self {
            config,
            magnitude_ema: None,
            last_shake_ms: 0,
        }
    }

    /// Feed one raw magnitude sample; returns true iff a shake fired
    ///
    /// The residual is measured against the baseline from *before* this
    /// sample, so a spike is compared to quiet history rather than to
    /// itself. The baseline is updated every call, fire or not.
    pub fn detect(&mut self, raw_magnitude: f32, now_ms: u32) -> bool {
        let baseline = match self.magnitude_ema {
            Some(ema) => ema,
            None => {
                self.magnitude_ema = Some(raw_magnitude);
                raw_magnitude
            }
        };

        let residual = (raw_magnitude - baseline).abs();
        let fired = residual > self.config.hp_threshold
            && now_ms.saturating_sub(self.last_shake_ms) > self.config.cooldown_ms;

        self.magnitude_ema =
            Some(baseline + self.config.ema_alpha * (raw_magnitude - baseline));

        if fired {
            self.last_shake_ms = now_ms;
            debug!("shake: residual {:.2} g at {} ms", residual, now_ms);
        }
        fired
    }

    /// Timestamp of the last fire (for diagnostics)
    pub fn last_shake_ms(&self) -> u32 {
        self.last_shake_ms
    }
}

impl Default for ShakeDetector {
    fn default() -> Self {
        Self::new(ShakeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed n quiet 1.0 g samples starting at start_ms, 20 ms apart
    fn feed_quiet(det: &mut ShakeDetector, start_ms: u32, n: u32) {
        for i in 0..n {
            assert!(!det.detect(1.0, start_ms + i * 20), "quiet sample fired");
        }
    }

    #[test]
    fn test_no_fire_at_rest() {
        let mut det = ShakeDetector::default();
        feed_quiet(&mut det, 0, 100);
    }

    #[test]
    fn test_spike_fires() {
        let mut det = ShakeDetector::default();
        feed_quiet(&mut det, 0, 20);

        assert!(det.detect(2.4, 400), "1.4 g residual must fire");
        assert_eq!(det.last_shake_ms(), 400);
    }

    #[test]
    fn test_cooldown_suppresses_second_fire() {
        let mut det = ShakeDetector::default();
        feed_quiet(&mut det, 0, 20);

        assert!(det.detect(2.4, 400));
        // Second spike inside the 300ms cooldown: suppressed
        assert!(!det.detect(2.4, 500));
        // Past the cooldown: fires again (baseline has only crept up a
        // little at alpha 0.10)
        assert!(det.detect(2.4, 800));
    }

    #[test]
    fn test_sub_threshold_residual_ignored() {
        let mut det = ShakeDetector::default();
        feed_quiet(&mut det, 0, 20);

        // 0.5 g residual is below the 0.6 g threshold
        assert!(!det.detect(1.5, 400));
    }

    #[test]
    fn test_first_sample_never_fires() {
        let mut det = ShakeDetector::default();
        // Baseline is seeded from the very first sample, so even a large
        // first magnitude produces zero residual
        assert!(!det.detect(3.0, 0));
    }

    #[test]
    fn test_baseline_tracks_sustained_level() {
        let mut det = ShakeDetector::default();
        feed_quiet(&mut det, 0, 20);

        // A sustained elevated magnitude fires once, then the baseline
        // converges and the residual drops below threshold
        assert!(det.detect(2.0, 400));
        let mut later_fires = 0;
        for i in 1..60 {
            if det.detect(2.0, 400 + i * 20) {
                later_fires += 1;
            }
        }
        assert_eq!(later_fires, 0, "baseline must absorb a sustained level");
    }
}
