//! # algae-monitor
//!
//! Core of a dual temperature monitor for an algae cooling rig: two LM35
//! analog sensors, a 16x2 character LCD on an I2C backpack, and a
//! line-oriented serial console, all driven by a single cooperative loop.
//!
//! **Key features:**
//! - **Static allocation** - heapless buffers, zero heap usage
//! - **Platform-agnostic** - hardware enters through small traits
//!   ([`SerialIo`], [`AdcRead`], [`TextDisplay`]) and `embedded-hal`
//! - **Simulation mode** - synthetic readings with a bounded random walk,
//!   driven by any [`rand_core::RngCore`]
//! - **Host-testable** - the whole loop runs against mock peripherals
//!
//! The crate owns no clock and spawns nothing: the platform calls
//! [`Monitor::tick`] with monotonic milliseconds and the monitor interleaves
//! command intake, sampling and rendering from there.
//!
//! ## Optional Features
//!
//! - `defmt` - derive `defmt::Format` on public data types
//!
//! This library is `no_std` compatible.

#![no_std]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

extern crate heapless;

// ============================================================================
// Module Declarations
// ============================================================================

pub mod adc;
pub mod config;
pub mod error;
pub mod io;
pub mod lcd;
pub mod monitor;
pub mod render;
pub mod scan;
pub mod sensor;
pub mod state;

// ============================================================================
// Re-exports - Public API
// ============================================================================

// Hardware seams
pub use adc::{AdcRead, Channel};
pub use io::SerialIo;
pub use lcd::{Pcf8574Lcd, TextDisplay};
pub use scan::BusProbe;

// Configuration
pub use config::{DefaultConfig, MonitorConfig};

// Error types
pub use error::CommandError;

// Collaborators
pub use sensor::Sampler;
pub use state::SystemState;

// Orchestration
pub use monitor::Monitor;

// ============================================================================
// Library Metadata
// ============================================================================

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
