//! App mode classification with multi-zone hysteresis
//!
//! Maps a filtered orientation estimate plus the current mode onto the next
//! mode. The classifier is a pure function: all state lives in the caller.
//!
//! Zone rules, evaluated in this fixed order:
//! 1. Unreliable posture → current mode, unconditionally
//! 2. Face-down (gravity z below threshold) pre-empts every zone
//! 3. Calendar zones on pitch (device resting on its left/right side)
//! 4. Roll zones: Pet, Pomodoro/Break, Sleep
//! 5. Sticky fallback: nothing matched → current mode
//!
//! Every zone uses asymmetric hysteresis: the band to ENTER a zone is
//! strictly inside the band to LEAVE it, so a single noisy sample can never
//! cause an enter-then-leave flicker. Calendar checks run strictly before
//! roll checks; at extreme combined tilt a sample satisfying both always
//! resolves to the calendar zone.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::motion::OrientationEstimate;

/// Top-level UI mode selected by device orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AppMode {
    /// Idle pet face (default at boot)
    Pet,
    /// Screen-dimmed sleep
    Sleep,
    /// Calendar/weather, device on its left side
    TempTimeLeft,
    /// Calendar/weather, device on its right side
    TempTimeRight,
    /// Focus countdown
    Pomodoro,
    /// Break countdown
    Break,
    /// Display off, device face-down on the desk
    FaceDown,
}

impl AppMode {
    /// Display name for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            AppMode::Pet => "PET",
            AppMode::Sleep => "SLEEP",
            AppMode::TempTimeLeft => "TEMPTIME_L",
            AppMode::TempTimeRight => "TEMPTIME_R",
            AppMode::Pomodoro => "POMODORO",
            AppMode::Break => "BREAK",
            AppMode::FaceDown => "FACEDOWN",
        }
    }
}

impl Default for AppMode {
    fn default() -> Self {
        AppMode::Pet
    }
}

/// Display rotation selected per mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rotation {
    R0,
    R90,
    R180,
    R270,
}

/// Zone thresholds and hysteresis margins, all in degrees except the
/// face-down bound (gravity z component)
#[derive(Debug, Clone, Copy)]
pub struct TiltZones {
    /// Enter Pet below this roll
    pub roll_pet: f32,
    /// Enter Pomodoro above this roll (Break shares the zone)
    pub roll_pomo: f32,
    /// Sleep band lower roll bound
    pub roll_sleep_lo: f32,
    /// Sleep band upper roll bound
    pub roll_sleep_hi: f32,
    /// Extra margin required to LEAVE the current roll zone
    pub hysteresis: f32,
    /// Calendar zone pitch center (device on its side ≈ ±90°)
    pub cal_pitch_center: f32,
    /// Calendar zone half-width around the center
    pub cal_pitch_window: f32,
    /// Extra margin on the calendar leave band
    pub cal_hysteresis: f32,
    /// Face-down when gravity z falls below this
    pub facedown_z: f32,
}

impl Default for TiltZones {
    fn default() -> Self {
        Self {
            roll_pet: -70.0,
            roll_pomo: 70.0,
            roll_sleep_lo: -35.0,
            roll_sleep_hi: 35.0,
            hysteresis: 10.0,
            cal_pitch_center: 90.0,
            cal_pitch_window: 15.0,
            cal_hysteresis: 8.0,
            facedown_z: -0.85,
        }
    }
}

/// Pure orientation → mode classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeClassifier {
    pub zones: TiltZones,
}

impl ModeClassifier {
    pub fn new(zones: TiltZones) -> Self {
        Self { zones }
    }

    /// Map the current estimate and mode onto the next mode
    ///
    /// Deterministic and side-effect free. Never switches modes on
    /// unreliable posture data.
    pub fn classify(&self, estimate: &OrientationEstimate, current: AppMode) -> AppMode {
        if !estimate.posture_reliable {
            return current;
        }

        let z = &self.zones;
        let r = estimate.roll_deg;
        let p = estimate.pitch_deg;
        let h = z.hysteresis;

        // Face-down always takes priority
        if estimate.gravity[2] < z.facedown_z {
            return AppMode::FaceDown;
        }

        // Calendar zones: pitch near ±90° (device on its side). The enter
        // band sits strictly inside the leave band.
        let cal_enter_lo = z.cal_pitch_center - z.cal_pitch_window;
        let cal_enter_hi = z.cal_pitch_center + z.cal_pitch_window;
        let cal_leave_lo = cal_enter_lo - z.cal_hysteresis;
        let cal_leave_hi = cal_enter_hi + z.cal_hysteresis;

        let in_pos_enter = p >= cal_enter_lo && p <= cal_enter_hi;
        let in_neg_enter = p <= -cal_enter_lo && p >= -cal_enter_hi;
        let in_pos_leave = p >= cal_leave_lo && p <= cal_leave_hi;
        let in_neg_leave = p <= -cal_leave_lo && p >= -cal_leave_hi;

        if current == AppMode::TempTimeLeft && in_neg_leave {
            return AppMode::TempTimeLeft;
        }
        if current == AppMode::TempTimeRight && in_pos_leave {
            return AppMode::TempTimeRight;
        }
        if in_neg_enter {
            return AppMode::TempTimeLeft;
        }
        if in_pos_enter {
            return AppMode::TempTimeRight;
        }

        // Pet: roll below roll_pet, leave bound relaxed inward by h
        if current == AppMode::Pet {
            if r < z.roll_pet + h {
                return AppMode::Pet;
            }
        } else if r < z.roll_pet {
            return AppMode::Pet;
        }

        // Pomodoro/Break share a zone; staying preserves whichever of the
        // pair is current
        if current == AppMode::Pomodoro || current == AppMode::Break {
            if r > z.roll_pomo - h {
                return current;
            }
        } else if r > z.roll_pomo {
            return AppMode::Pomodoro;
        }

        // Sleep: symmetric band around zero, widened by h on both sides
        // while current
        if current == AppMode::Sleep {
            if r > z.roll_sleep_lo - h && r < z.roll_sleep_hi + h {
                return AppMode::Sleep;
            }
        } else if r > z.roll_sleep_lo && r < z.roll_sleep_hi {
            return AppMode::Sleep;
        }

        // Sticky fallback: last known good mode
        current
    }
}

/// Display rotation for a mode
///
/// Sleep inherits the rotation of the mode it was entered from so the
/// screen does not flip while dimming.
pub fn rotation_for(mode: AppMode, prev: AppMode) -> Rotation {
    match mode {
        AppMode::Pet | AppMode::FaceDown => Rotation::R270,
        AppMode::Pomodoro | AppMode::Break => Rotation::R90,
        AppMode::TempTimeLeft => Rotation::R0,
        AppMode::TempTimeRight => Rotation::R180,
        AppMode::Sleep => match prev {
            AppMode::Pomodoro | AppMode::Break | AppMode::TempTimeRight => Rotation::R90,
            _ => Rotation::R270,
        },
    }
}
