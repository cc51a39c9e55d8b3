//! Per-tick orchestration of filter, shake, classifier and timer
//!
//! All core state is single-owner and mutated only here, once per polling
//! loop iteration. Within one tick the order is fixed:
//!
//! ```text
//! sample → filter update → shake detect (arms lockout) → event drain
//!        → mode classify → mode/timer coupling → timer poll
//! ```
//!
//! so a shake detected in this tick immediately invalidates the posture
//! reliability the classifier sees in the same tick.
//!
//! Mode/timer coupling:
//! - entering Pomodoro resumes a paused focus session, or starts a fresh one
//! - leaving Pomodoro (except into Break) pauses the focus session
//! - focus completion forces Pomodoro → Break and starts the break
//! - break completion forces Break → Pomodoro and starts a fresh focus
//!
//! There is no tilt-driven entry into Break: the classifier only returns
//! Break when it is already current (the Pomodoro/Break pair share one roll
//! zone, and tilt resolves the zone to Pomodoro). The forced
//! focus-completion edge above is therefore the sole Break entry, and it is
//! the one place `start_break` runs.

use log::info;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::events::{EventQueue, InputEvent};
use crate::mode::{rotation_for, AppMode, ModeClassifier, Rotation, TiltZones};
use crate::motion::{AccelSample, MotionConfig, MotionFilter, OrientationEstimate};
use crate::shake::{ShakeConfig, ShakeDetector};
use crate::timer::{PomodoroTimer, TimerConfig, TimerPhase};

/// Capacity of the input event queue; drained every tick, so this only
/// needs to cover one tick's worth of debounced edges
const EVENT_QUEUE_LEN: usize = 8;

/// Bundled configuration for every core component
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    pub motion: MotionConfig,
    pub shake: ShakeConfig,
    pub zones: TiltZones,
    pub timer: TimerConfig,
}

/// Everything the renderer consumes after one tick
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TickReport {
    pub mode: AppMode,
    pub previous_mode: AppMode,
    pub rotation: Rotation,
    pub estimate: OrientationEstimate,
    /// A shake fired this tick
    pub shake: bool,
    /// Remaining seconds of the active timer phase
    pub seconds_left: u32,
    pub completed_cycles: u32,
}

/// Single-owner core context, constructed once at startup and advanced by
/// [`Engine::tick`] from the main polling loop
pub struct Engine {
    filter: MotionFilter,
    shake: ShakeDetector,
    classifier: ModeClassifier,
    timer: PomodoroTimer,
    events: EventQueue<EVENT_QUEUE_LEN>,
    mode: AppMode,
    previous_mode: AppMode,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            filter: MotionFilter::new(config.motion),
            shake: ShakeDetector::new(config.shake),
            classifier: ModeClassifier::new(config.zones),
            timer: PomodoroTimer::new(config.timer),
            events: EventQueue::new(),
            mode: AppMode::default(),
            previous_mode: AppMode::default(),
        }
    }

    /// Queue a debounced input event for the next tick
    ///
    /// Returns false when the queue is full and the event was dropped.
    pub fn push_event(&mut self, event: InputEvent) -> bool {
        self.events.push(event)
    }

    /// Advance every core component by one tick
    pub fn tick(&mut self, sample: AccelSample, now_ms: u32) -> TickReport {
        // 1. Posture filter
        self.filter.update(sample, now_ms);

        // 2. Shake channel; a fire freezes posture before classification
        let shake = self.shake.detect(sample.magnitude(), now_ms);
        if shake {
            self.filter.apply_shake_lockout(now_ms);
        }
        let estimate = self.filter.estimate(now_ms);

        // 3. Input events
        while let Some(event) = self.events.pop() {
            self.handle_event(event, now_ms);
        }

        // 4. Tilt-driven mode transition
        let next = self.classifier.classify(&estimate, self.mode);
        if next != self.mode {
            self.enter_mode(next, now_ms);
        }

        // 5. Timer poll and forced phase edges
        self.timer.update(now_ms);
        if self.timer.take_finished() {
            self.on_timer_finished(now_ms);
        }

        TickReport {
            mode: self.mode,
            previous_mode: self.previous_mode,
            rotation: rotation_for(self.mode, self.previous_mode),
            estimate,
            shake,
            seconds_left: self.timer.seconds_left(now_ms),
            completed_cycles: self.timer.completed_cycles(),
        }
    }

    /// Tilt-driven transition plus the timer side effects it implies
    fn enter_mode(&mut self, next: AppMode, now_ms: u32) {
        let prev = self.mode;

        // Leaving the focus screen (except into Break, which the timer
        // drives itself) suspends the countdown
        if prev == AppMode::Pomodoro && next != AppMode::Break {
            self.timer.pause(now_ms);
        }

        // Arriving on the focus screen continues where the user left off,
        // or begins fresh
        if next == AppMode::Pomodoro {
            if self.timer.has_paused_focus() {
                self.timer.resume(now_ms);
            } else {
                self.timer.start_focus(now_ms);
            }
        }

        info!("mode {} -> {}", prev.as_str(), next.as_str());
        self.previous_mode = prev;
        self.mode = next;
    }

    /// Forced Pomodoro ⇄ Break edges on countdown completion
    fn on_timer_finished(&mut self, now_ms: u32) {
        match self.timer.phase() {
            TimerPhase::Focus => {
                // Only force the Break screen while the user is actually on
                // the focus screen; a session that ran out while tilted away
                // waits for the user to come back
                if self.mode == AppMode::Pomodoro {
                    info!("mode {} -> {} (focus complete)", self.mode.as_str(), "BREAK");
                    self.previous_mode = self.mode;
                    self.mode = AppMode::Break;
                    self.timer.start_break(now_ms);
                }
            }
            TimerPhase::Break => {
                if self.mode == AppMode::Break {
                    info!("mode {} -> {} (break complete)", self.mode.as_str(), "POMODORO");
                    self.previous_mode = self.mode;
                    self.mode = AppMode::Pomodoro;
                    self.timer.start_focus(now_ms);
                }
            }
        }
    }

    fn handle_event(&mut self, event: InputEvent, now_ms: u32) {
        match event {
            // Short press toggles the focus countdown while on that screen
            InputEvent::ButtonShort => {
                if self.mode == AppMode::Pomodoro {
                    if self.timer.is_running() {
                        self.timer.pause(now_ms);
                    } else {
                        self.timer.resume(now_ms);
                    }
                }
            }
            // Double tap (re)starts a focus session on the focus screen
            InputEvent::DoubleTap => {
                if self.mode == AppMode::Pomodoro && !self.timer.is_running() {
                    self.timer.start_focus(now_ms);
                }
            }
            // Single taps and long presses feed the pet/mood layer, which
            // is outside this core
            InputEvent::Tap | InputEvent::ButtonLong => {}
        }
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn timer(&self) -> &PomodoroTimer {
        &self.timer
    }

    /// Renderer-facing state without advancing anything
    pub fn snapshot(&self, now_ms: u32) -> TickReport {
        TickReport {
            mode: self.mode,
            previous_mode: self.previous_mode,
            rotation: rotation_for(self.mode, self.previous_mode),
            estimate: self.filter.estimate(now_ms),
            shake: false,
            seconds_left: self.timer.seconds_left(now_ms),
            completed_cycles: self.timer.completed_cycles(),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
