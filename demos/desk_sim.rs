//! Simulates a desk session to verify the tilt → mode → timer pipeline
//!
//! Drives the engine through a realistic day-at-the-desk sequence with
//! sensor noise: idle pet, a shake, tilting into the focus zone, a full
//! focus session rolling into its break, and finally face-down.
//!
//! Run with: cargo run --example desk_sim

use deskpet::{AccelSample, AppMode, Engine, EngineConfig, TimerConfig};

const TICK_MS: u32 = 20;

/// Deterministic jitter source so every run prints the same transcript
struct NoiseGen {
    state: u32,
}

impl NoiseGen {
    fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Uniform value in [-amplitude, +amplitude]
    fn next(&mut self, amplitude: f32) -> f32 {
        // Numerical Recipes LCG constants; top 24 bits have the best quality
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        let unit = (self.state >> 8) as f32 / (1u32 << 24) as f32;
        (unit * 2.0 - 1.0) * amplitude
    }
}

/// Hold one noisy orientation for a number of ticks, narrating changes
fn run_phase(
    label: &str,
    engine: &mut Engine,
    now: &mut u32,
    last_mode: &mut AppMode,
    base: (f32, f32, f32),
    ticks: u32,
    noise: &mut NoiseGen,
) {
    println!("Phase: {label}");
    for _ in 0..ticks {
        let sample = AccelSample::new(
            base.0 + noise.next(0.03),
            base.1 + noise.next(0.03),
            base.2 + noise.next(0.03),
        );
        let report = engine.tick(sample, *now);
        if report.shake {
            println!("  [{:>6} ms] shake detected, posture frozen", *now);
        }
        if report.mode != *last_mode {
            println!(
                "  [{:>6} ms] mode {} -> {} ({}s left, {} cycles)",
                *now,
                last_mode.as_str(),
                report.mode.as_str(),
                report.seconds_left,
                report.completed_cycles
            );
            *last_mode = report.mode;
        }
        *now += TICK_MS;
    }
}

fn main() {
    // Short durations so a full focus/break cycle fits the simulation
    let mut engine = Engine::new(EngineConfig {
        timer: TimerConfig {
            focus_ms: 8_000,
            short_break_ms: 3_000,
            long_break_ms: 6_000,
            cycles_per_long_break: 4,
        },
        ..EngineConfig::default()
    });
    let mut noise = NoiseGen::new(0x5EED);
    let mut now: u32 = 0;
    let mut last_mode = AppMode::Pet;

    println!("=== Desk Pet Mode Engine Simulation ===\n");
    println!("Sequence: IDLE → SHAKE → FOCUS TILT → (focus ends) → BREAK → FACE-DOWN\n");

    // Flat on the desk: sleep zone after the stability dwell
    run_phase(
        "flat on desk (2s)",
        &mut engine,
        &mut now,
        &mut last_mode,
        (0.0, 0.0, 1.0),
        100,
        &mut noise,
    );

    // One sharp shake: the mode must hold through the lockout
    println!("Phase: shake impulse");
    let report = engine.tick(AccelSample::new(0.3, -0.4, 2.6), now);
    now += TICK_MS;
    assert!(report.shake, "impulse should register as a shake");
    run_phase(
        "settling after shake (1.5s)",
        &mut engine,
        &mut now,
        &mut last_mode,
        (0.0, 0.0, 1.0),
        75,
        &mut noise,
    );

    // Tilt into the focus zone and sit through focus + break
    run_phase(
        "tilted to focus zone (14s)",
        &mut engine,
        &mut now,
        &mut last_mode,
        (0.0, 0.98, 0.2),
        700,
        &mut noise,
    );

    // Done for the day
    run_phase(
        "face-down (2s)",
        &mut engine,
        &mut now,
        &mut last_mode,
        (0.0, 0.0, -1.0),
        100,
        &mut noise,
    );

    let report = engine.snapshot(now);
    println!("\nFinal mode: {}", report.mode.as_str());
    println!("Completed focus cycles: {}", report.completed_cycles);
}
