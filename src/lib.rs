//! Desk Pet Mode Engine
//!
//! Core logic for an accelerometer-driven "virtual pet" productivity
//! gadget: device orientation selects a UI mode (pet face, sleep,
//! calendar, focus timer, break), rendered externally on a small e-paper
//! display.
//!
//! ## Features
//!
//! - **Dual-pipeline filtering**: one raw sensor, two views (a smoothed
//!   gravity estimate for posture, a fast high-pass residual for shake)
//! - **Stability gating**: posture is only trusted after a quiet dwell,
//!   never during a shake lockout
//! - **Asymmetric hysteresis**: every mode zone's enter band sits strictly
//!   inside its leave band, so noise can never flicker the display
//! - **Pomodoro timing**: focus/break countdowns with pause/resume and
//!   long-break cycling, coupled to mode transitions
//! - **No hardware dependencies**: samples in, mode + countdown out; the
//!   display, sensors and persistence are external collaborators
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  Engine (per-tick orchestration)         │
//! ├──────────────────────────────────────────┤
//! │  MotionFilter │ ShakeDetector │ Timer    │
//! ├──────────────────────────────────────────┤
//! │  ModeClassifier (hysteresis zones)       │
//! └──────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use deskpet::{AccelSample, Engine, EngineConfig};
//!
//! let mut engine = Engine::new(EngineConfig::default());
//!
//! // Main loop: poll the accelerometer, advance one tick, hand the
//! // report to the renderer
//! let report = engine.tick(AccelSample::new(0.0, 0.0, 1.0), 20);
//! println!("{}: {}s left", report.mode.as_str(), report.seconds_left);
//! ```
//!
//! ## Modules
//!
//! - [`motion`] - Gravity low-pass, roll/pitch, stability gate
//! - [`shake`] - High-pass spike detection with cooldown
//! - [`mode`] - App modes, zone classifier, display rotation
//! - [`timer`] - Focus/break countdowns with pause/resume
//! - [`events`] - Fixed-capacity input event queue
//! - [`engine`] - Single-owner core context and tick function

pub mod engine;
pub mod events;
pub mod mode;
pub mod motion;
pub mod shake;
pub mod timer;

// Re-export commonly used types
pub use engine::{Engine, EngineConfig, TickReport};
pub use events::InputEvent;
pub use mode::{rotation_for, AppMode, ModeClassifier, Rotation, TiltZones};
pub use motion::{AccelSample, MotionConfig, MotionFilter, OrientationEstimate};
pub use shake::{ShakeConfig, ShakeDetector};
pub use timer::{PomodoroTimer, TimerConfig, TimerPhase};
