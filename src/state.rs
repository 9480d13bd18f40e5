//! Shared system state.
//!
//! One mutable record owned by the main loop and handed by reference to each
//! collaborator. The loop is single-threaded and non-preemptive, so plain
//! fields are enough - no locking, no interior mutability.

/// Runtime state of the monitor.
///
/// Resets to compiled defaults on power-up; nothing is persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemState {
    /// Synthetic readings instead of hardware sampling
    pub simulate: bool,

    /// Print intermediate measurement values (raw counts, voltages)
    pub verbose: bool,

    /// Most recent room temperature, degrees C
    pub room_temp: f32,

    /// Most recent algae tank temperature, degrees C
    pub algae_temp: f32,
}

impl SystemState {
    /// Power-up defaults: real sensors, quiet console.
    pub const fn new() -> Self {
        Self {
            simulate: false,
            verbose: false,
            room_temp: 0.0,
            algae_temp: 22.0,
        }
    }
}

impl Default for SystemState {
    fn default() -> Self {
        Self::new()
    }
}
