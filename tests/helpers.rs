//! Shared test helpers to reduce duplication across integration tests.

#![allow(dead_code)]

#[allow(clippy::duplicate_mod)]
#[path = "fixtures/mod.rs"]
pub mod fixtures;

use fixtures::{MockAdc, MockBus, MockDelay, MockDisplay, MockSerial};

use algae_monitor::config::DefaultConfig;
use algae_monitor::{Monitor, Sampler};
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Monitor wired to mocks throughout.
pub type TestMonitor =
    Monitor<MockSerial, MockAdc, MockDelay, SmallRng, MockDisplay, MockBus, DefaultConfig>;

/// Raw counts yielding ~24.9 degC through the default config.
pub const ROOM_COUNTS: u16 = 51;

/// Raw counts yielding ~21.9 degC through the default config.
pub const ALGAE_COUNTS: u16 = 45;

// ============================================================================
// Monitor Creation Helpers
// ============================================================================

/// Monitor with plausible readings on both channels and the LCD on the bus.
pub fn create_monitor() -> TestMonitor {
    create_monitor_with_adc(MockAdc::new(ROOM_COUNTS, ALGAE_COUNTS))
}

/// Monitor with specific raw counts (e.g. implausible readings).
pub fn create_monitor_with_adc(adc: MockAdc) -> TestMonitor {
    let sampler = Sampler::new(adc, MockDelay::default(), SmallRng::seed_from_u64(42));
    Monitor::new(
        MockSerial::new(),
        sampler,
        MockDisplay::new(),
        MockBus::new(&[0x27]),
    )
}

// ============================================================================
// Command Execution Helpers
// ============================================================================

/// Feed one command line and run a loop pass at a timestamp where neither
/// periodic activity fires. Returns the console output it produced.
pub fn execute_command(monitor: &mut TestMonitor, cmd: &str) -> String {
    monitor.io_mut().clear_output();

    monitor.io_mut().push_input(cmd);
    if !cmd.ends_with('\n') {
        monitor.io_mut().push_input("\n");
    }

    monitor.tick(0).unwrap();
    monitor.io_mut().output()
}

/// Run one loop pass at `now_ms` and return the console output it produced.
pub fn tick_at(monitor: &mut TestMonitor, now_ms: u64) -> String {
    monitor.io_mut().clear_output();
    monitor.tick(now_ms).unwrap();
    monitor.io_mut().output()
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert that output contains all expected strings.
pub fn assert_contains_all(output: &str, expected: &[&str]) {
    for exp in expected {
        assert!(
            output.contains(exp),
            "Expected '{}' in output, got: {}",
            exp,
            output
        );
    }
}

/// Assert that output does NOT contain any of the strings.
pub fn assert_contains_none(output: &str, forbidden: &[&str]) {
    for forbid in forbidden {
        assert!(
            !output.contains(forbid),
            "Did not expect '{}' in output, got: {}",
            forbid,
            output
        );
    }
}
