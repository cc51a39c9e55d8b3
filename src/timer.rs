//! Focus/break countdown timers with pause/resume
//!
//! Advanced by wall-clock polling from the main tick, never by callbacks.
//! Pause/resume folds elapsed running time into an accumulator so no time
//! is ever lost across pause cycles; "timeout" is just the countdown
//! reaching zero, detected on the next `update` poll.
//!
//! None of these operations can fail. The driving input layer cannot
//! guarantee call ordering, so invalid sequences (double pause, resume
//! without a prior pause) are silently absorbed as no-ops.

use log::debug;

/// Which countdown the timer is currently serving
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    Focus,
    Break,
}

/// Session durations (all ms)
#[derive(Debug, Clone, Copy)]
pub struct TimerConfig {
    pub focus_ms: u32,
    pub short_break_ms: u32,
    pub long_break_ms: u32,
    /// Every Nth completed focus cycle earns the long break
    pub cycles_per_long_break: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_ms: 25 * 60 * 1000,
            short_break_ms: 5 * 60 * 1000,
            long_break_ms: 15 * 60 * 1000,
            cycles_per_long_break: 4,
        }
    }
}

/// Countdown state machine for focus and break phases
pub struct PomodoroTimer {
    config: TimerConfig,
    phase: TimerPhase,
    duration_ms: u32,
    start_ms: u32,
    /// Elapsed time folded in across pause cycles (ms)
    accumulated_ms: u32,
    running: bool,
    /// Sticky: blocks resume until the next start
    finished: bool,
    /// Clear-on-read completion edge for the engine
    finished_flag: bool,
    completed_cycles: u32,
}

impl PomodoroTimer {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            phase: TimerPhase::Focus,
            duration_ms: config.focus_ms,
            start_ms: 0,
            accumulated_ms: 0,
            running: false,
            finished: false,
            finished_flag: false,
            completed_cycles: 0,
        }
    }

    /// Begin a fresh focus countdown
    pub fn start_focus(&mut self, now_ms: u32) {
        self.phase = TimerPhase::Focus;
        self.duration_ms = self.config.focus_ms;
        self.start_ms = now_ms;
        self.accumulated_ms = 0;
        self.running = true;
        self.finished = false;
        debug!("timer: focus started ({} s)", self.duration_ms / 1000);
    }

    /// Begin a break countdown; long every Nth completed focus cycle
    ///
    /// Breaks always start running; there is no pause support for them.
    pub fn start_break(&mut self, now_ms: u32) {
        let long = self.completed_cycles % self.config.cycles_per_long_break == 0;
        self.phase = TimerPhase::Break;
        self.duration_ms = if long {
            self.config.long_break_ms
        } else {
            self.config.short_break_ms
        };
        self.start_ms = now_ms;
        self.accumulated_ms = 0;
        self.running = true;
        self.finished = false;
        debug!(
            "timer: {} break started ({} s)",
            if long { "long" } else { "short" },
            self.duration_ms / 1000
        );
    }

    /// Fold elapsed time into the accumulator and stop. No-op unless running.
    pub fn pause(&mut self, now_ms: u32) {
        if self.running {
            self.accumulated_ms += now_ms.saturating_sub(self.start_ms);
            self.running = false;
            debug!("timer: paused at {} ms accumulated", self.accumulated_ms);
        }
    }

    /// Continue a paused countdown. No-op unless paused with accumulated
    /// time and not yet finished.
    pub fn resume(&mut self, now_ms: u32) {
        if !self.running && !self.finished && self.accumulated_ms > 0 {
            self.start_ms = now_ms;
            self.running = true;
            debug!("timer: resumed");
        }
    }

    /// Poll the countdown; marks finished when the duration is spent
    ///
    /// Completing a Focus phase increments the cycle count. Break
    /// completions never do.
    pub fn update(&mut self, now_ms: u32) {
        if !self.running {
            return;
        }
        let total = self.accumulated_ms + now_ms.saturating_sub(self.start_ms);
        if total >= self.duration_ms {
            self.accumulated_ms = self.duration_ms;
            self.running = false;
            self.finished = true;
            self.finished_flag = true;
            if self.phase == TimerPhase::Focus {
                self.completed_cycles += 1;
                debug!("timer: focus complete, {} cycles", self.completed_cycles);
            } else {
                debug!("timer: break complete");
            }
        }
    }

    /// Whole seconds remaining, truncated; 0 once the duration is spent
    pub fn seconds_left(&self, now_ms: u32) -> u32 {
        let mut total = self.accumulated_ms;
        if self.running {
            total += now_ms.saturating_sub(self.start_ms);
        }
        if total >= self.duration_ms {
            0
        } else {
            (self.duration_ms - total) / 1000
        }
    }

    /// Completion edge, cleared on read
    pub fn take_finished(&mut self) -> bool {
        let finished = self.finished_flag;
        self.finished_flag = false;
        finished
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    /// Completed focus cycles this session (not persisted across reboot)
    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    /// True when a focus session is paused midway and can be resumed
    pub fn has_paused_focus(&self) -> bool {
        self.phase == TimerPhase::Focus
            && !self.running
            && !self.finished
            && self.accumulated_ms > 0
    }
}

impl Default for PomodoroTimer {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Short durations so tests stay readable
    fn test_config() -> TimerConfig {
        TimerConfig {
            focus_ms: 10_000,
            short_break_ms: 3_000,
            long_break_ms: 5_000,
            cycles_per_long_break: 4,
        }
    }

    /// Run one full focus cycle to completion
    fn complete_focus(timer: &mut PomodoroTimer, start_ms: u32) -> u32 {
        timer.start_focus(start_ms);
        let end = start_ms + timer.config.focus_ms;
        timer.update(end);
        assert!(timer.take_finished());
        end
    }

    #[test]
    fn test_initial_state() {
        let timer = PomodoroTimer::new(test_config());
        assert!(!timer.is_running());
        assert!(!timer.is_finished());
        assert_eq!(timer.completed_cycles(), 0);
        assert_eq!(timer.phase(), TimerPhase::Focus);
    }

    #[test]
    fn test_countdown_and_truncation() {
        let mut timer = PomodoroTimer::new(test_config());
        timer.start_focus(0);

        assert_eq!(timer.seconds_left(0), 10);
        // Truncated to whole seconds
        assert_eq!(timer.seconds_left(1_500), 8);
        assert_eq!(timer.seconds_left(9_999), 0);
    }

    #[test]
    fn test_pause_resume_preserves_elapsed() {
        // 10s duration, pause after 3s, resume, run 4s more: 3s must
        // remain and the countdown must not finish early
        let mut timer = PomodoroTimer::new(test_config());
        timer.start_focus(0);
        timer.pause(3_000);

        // Paused time does not count, however long
        assert_eq!(timer.seconds_left(60_000), 7);

        timer.resume(5_000);
        timer.update(9_000); // e2 = 4s
        assert!(!timer.is_finished(), "must not finish early");
        assert_eq!(timer.seconds_left(9_000), 3);

        // Finishes exactly when accumulated + running elapsed hits D
        timer.update(12_000);
        assert!(timer.is_finished());
        assert_eq!(timer.completed_cycles(), 1);
    }

    #[test]
    fn test_double_pause_is_noop() {
        let mut timer = PomodoroTimer::new(test_config());
        timer.start_focus(0);
        timer.pause(3_000);
        timer.pause(8_000); // absorbed
        assert_eq!(timer.seconds_left(8_000), 7);
    }

    #[test]
    fn test_resume_without_pause_is_noop() {
        let mut timer = PomodoroTimer::new(test_config());
        // Never started: nothing accumulated, resume must not run
        timer.resume(1_000);
        assert!(!timer.is_running());

        // Finished: resume must not restart
        timer.start_focus(0);
        timer.update(10_000);
        assert!(timer.is_finished());
        timer.pause(10_500);
        timer.resume(11_000);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_focus_completion_increments_cycles_once() {
        let mut timer = PomodoroTimer::new(test_config());
        timer.start_focus(0);
        timer.update(10_000);
        timer.update(11_000);
        timer.update(12_000);
        assert_eq!(timer.completed_cycles(), 1, "repolling must not recount");
    }

    #[test]
    fn test_break_completion_does_not_count_cycles() {
        let mut timer = PomodoroTimer::new(test_config());
        complete_focus(&mut timer, 0);
        timer.start_break(20_000);
        timer.update(40_000);
        assert!(timer.take_finished());
        assert_eq!(timer.completed_cycles(), 1);
    }

    #[test]
    fn test_long_break_every_fourth_cycle() {
        // Cycles 1-3 short, 4 long, 5-7 short, 8 long again
        let mut timer = PomodoroTimer::new(test_config());
        let mut now = 0;
        for cycle in 1..=8u32 {
            now = complete_focus(&mut timer, now) + 1_000;
            timer.start_break(now);
            let expect_long = cycle % 4 == 0;
            let expected = if expect_long { 5 } else { 3 };
            assert_eq!(
                timer.seconds_left(now),
                expected,
                "cycle {} break length",
                cycle
            );
            now += timer.config.long_break_ms + 1_000;
            timer.update(now);
            timer.take_finished();
        }
    }

    #[test]
    fn test_start_break_at_four_cycles_is_long() {
        let mut timer = PomodoroTimer::new(test_config());
        let mut now = 0;
        for _ in 0..4 {
            now = complete_focus(&mut timer, now) + 1_000;
        }
        assert_eq!(timer.completed_cycles(), 4);
        timer.start_break(now);
        assert_eq!(timer.seconds_left(now), 5, "long break expected");
    }

    #[test]
    fn test_take_finished_clears() {
        let mut timer = PomodoroTimer::new(test_config());
        timer.start_focus(0);
        timer.update(10_000);
        assert!(timer.take_finished());
        assert!(!timer.take_finished(), "edge must clear on read");
        // The sticky flag stays up for resume-blocking
        assert!(timer.is_finished());
    }

    #[test]
    fn test_start_focus_resets_finished() {
        let mut timer = PomodoroTimer::new(test_config());
        timer.start_focus(0);
        timer.update(10_000);
        timer.take_finished();

        timer.start_focus(20_000);
        assert!(timer.is_running());
        assert!(!timer.is_finished());
        assert_eq!(timer.seconds_left(20_000), 10);
    }

    #[test]
    fn test_has_paused_focus() {
        let mut timer = PomodoroTimer::new(test_config());
        assert!(!timer.has_paused_focus());
        timer.start_focus(0);
        assert!(!timer.has_paused_focus());
        timer.pause(3_000);
        assert!(timer.has_paused_focus());
        timer.resume(4_000);
        assert!(!timer.has_paused_focus());
    }
}
