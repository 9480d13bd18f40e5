//! Monitor orchestration: the cooperative main loop and the command console.
//!
//! `Monitor` brings the collaborators together - serial console, sampler,
//! display, bus - around one shared [`SystemState`]. The platform owns the
//! loop and the clock; each pass it calls [`Monitor::tick`] with monotonic
//! milliseconds and the monitor interleaves three periodic activities:
//! command intake, sample-and-render, and (in simulation mode) synthetic
//! perturbation.

use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use rand_core::RngCore;

use crate::adc::{AdcRead, Channel};
use crate::config::MonitorConfig;
use crate::error::CommandError;
use crate::io::SerialIo;
use crate::lcd::TextDisplay;
use crate::render;
use crate::scan::{self, BusProbe};
use crate::sensor::Sampler;
use crate::state::SystemState;

// ============================================================================
// Command table
// ============================================================================

/// Console command metadata (const-initializable, no execution logic).
#[derive(Debug, Clone, Copy)]
pub struct CommandMeta {
    /// Dispatch name (exact match, or prefix for commands taking a value)
    pub name: &'static str,

    /// Example invocation shown by `help`
    pub usage: &'static str,

    /// One-line description shown by `help`
    pub description: &'static str,
}

/// The console command table, in `help` order.
pub const COMMANDS: &[CommandMeta] = &[
    CommandMeta {
        name: "scan",
        usage: "scan",
        description: "Scan I2C and test LM35 sensors",
    },
    CommandMeta {
        name: "fake on",
        usage: "fake on",
        description: "Enable mock/fake readings",
    },
    CommandMeta {
        name: "fake off",
        usage: "fake off",
        description: "Use real sensor readings",
    },
    CommandMeta {
        name: "set room",
        usage: "set room 25.5",
        description: "Set fake room temp to 25.5\u{b0}C",
    },
    CommandMeta {
        name: "set algae",
        usage: "set algae 22.0",
        description: "Set fake algae temp to 22.0\u{b0}C",
    },
    CommandMeta {
        name: "status",
        usage: "status",
        description: "Show current temperatures",
    },
    CommandMeta {
        name: "debug on",
        usage: "debug on",
        description: "Show ADC values and voltages",
    },
    CommandMeta {
        name: "debug off",
        usage: "debug off",
        description: "Disable debug output",
    },
    CommandMeta {
        name: "calibrate",
        usage: "calibrate",
        description: "Show detailed sensor readings",
    },
    CommandMeta {
        name: "help",
        usage: "help",
        description: "Show this help menu",
    },
];

/// Parse and range-check a `set` command argument.
///
/// Unparseable input is rejected the same way as an out-of-range value; the
/// accepted range is open on both ends.
pub fn parse_set_temperature<C: MonitorConfig>(arg: &str) -> Result<f32, CommandError> {
    let degrees: f32 = arg
        .trim()
        .parse()
        .map_err(|_| CommandError::InvalidTemperature)?;

    if degrees > C::SET_TEMP_MIN && degrees < C::SET_TEMP_MAX {
        Ok(degrees)
    } else {
        Err(CommandError::InvalidTemperature)
    }
}

// ============================================================================
// Monitor
// ============================================================================

/// Monitor orchestration struct.
///
/// Owns every collaborator and the shared state; nothing else runs
/// concurrently, so plain `&mut` threading is the whole concurrency story.
///
/// Generic over:
/// - `IO`: SerialIo implementation (console)
/// - `A`: AdcRead implementation (sensor channels)
/// - `D`: DelayNs implementation (inter-sample spacing)
/// - `R`: RngCore implementation (simulation walk)
/// - `DISP`: TextDisplay implementation (character LCD)
/// - `BUS`: BusProbe implementation (scanner)
/// - `C`: MonitorConfig implementation
pub struct Monitor<IO, A, D, R, DISP, BUS, C>
where
    IO: SerialIo,
    A: AdcRead,
    D: DelayNs,
    R: RngCore,
    DISP: TextDisplay,
    BUS: BusProbe,
    C: MonitorConfig,
{
    io: IO,
    sampler: Sampler<A, D, R, C>,
    display: DISP,
    bus: BUS,
    state: SystemState,

    /// Pending command line (characters up to the next newline)
    input: heapless::String<128>,

    /// Timestamps of the last fired periodic activities, advanced only when
    /// the interval has elapsed (non-drifting periodic check)
    last_update: u64,
    last_fluctuation: u64,
}

impl<IO, A, D, R, DISP, BUS, C> core::fmt::Debug for Monitor<IO, A, D, R, DISP, BUS, C>
where
    IO: SerialIo,
    A: AdcRead,
    D: DelayNs,
    R: RngCore,
    DISP: TextDisplay,
    BUS: BusProbe,
    C: MonitorConfig,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Monitor")
            .field("state", &self.state)
            .field("input", &self.input.as_str())
            .field("last_update", &self.last_update)
            .field("last_fluctuation", &self.last_fluctuation)
            .finish_non_exhaustive()
    }
}

impl<IO, A, D, R, DISP, BUS, C> Monitor<IO, A, D, R, DISP, BUS, C>
where
    IO: SerialIo,
    A: AdcRead,
    D: DelayNs,
    R: RngCore,
    DISP: TextDisplay,
    BUS: BusProbe,
    C: MonitorConfig,
{
    /// Create a monitor with power-up state.
    pub fn new(io: IO, sampler: Sampler<A, D, R, C>, display: DISP, bus: BUS) -> Self {
        Self {
            io,
            sampler,
            display,
            bus,
            state: SystemState::new(),
            input: heapless::String::new(),
            last_update: 0,
            last_fluctuation: 0,
        }
    }

    /// Startup sequence: banner, splash, bus scan, sensor self-test, help.
    ///
    /// The splash stays on the display until the first render cycle replaces
    /// it; `init()` itself never sleeps.
    pub fn init(&mut self) -> Result<(), IO::Error> {
        self.io.write_line("")?;
        self.io.write_line("=== Room/Algae Temperature Monitor ===")?;
        self.io.write_line("Initializing...")?;

        render::show_welcome(&mut self.display);

        scan::scan_bus(&mut self.bus, &mut self.io, C::LCD_ADDR)?;
        self.sampler.diagnostic(&mut self.io)?;

        self.io.write_line("System Ready!")?;
        self.io.write_line("Type 'help' for commands")?;
        self.print_help()
    }

    /// One pass of the cooperative loop.
    ///
    /// `now_ms` is the platform's monotonic millisecond counter. Each pass:
    /// drain at most one pending command line, re-sample and re-render when
    /// the update interval has elapsed, and perturb the synthetic readings
    /// when simulating and the fluctuation interval has elapsed.
    pub fn tick(&mut self, now_ms: u64) -> Result<(), IO::Error> {
        self.poll_command()?;

        if now_ms.saturating_sub(self.last_update) >= C::UPDATE_INTERVAL_MS {
            self.last_update = now_ms;
            self.sampler.update(&mut self.state, &mut self.io)?;
            render::render::<DISP, C>(&mut self.display, &self.state);
        }

        if self.state.simulate
            && now_ms.saturating_sub(self.last_fluctuation) >= C::FLUCTUATION_INTERVAL_MS
        {
            self.last_fluctuation = now_ms;
            self.sampler.fluctuate();
        }

        Ok(())
    }

    /// Accumulate pending characters; dispatch on a complete line.
    ///
    /// At most one line is dispatched per call. A partial line stays in the
    /// buffer until its newline arrives; carriage returns are ignored and
    /// overlong input drops the excess characters.
    fn poll_command(&mut self) -> Result<(), IO::Error> {
        while let Some(c) = self.io.read_char()? {
            match c {
                '\n' => {
                    let line = self.input.clone();
                    self.input.clear();
                    self.dispatch(line.as_str())?;
                    break;
                }
                '\r' => {}
                c => {
                    let _ = self.input.push(c);
                }
            }
        }
        Ok(())
    }

    /// Trim, case-fold and dispatch one command line.
    fn dispatch(&mut self, raw: &str) -> Result<(), IO::Error> {
        let mut folded: heapless::String<128> = heapless::String::new();
        let _ = folded.push_str(raw.trim());
        folded.as_mut_str().make_ascii_lowercase();

        match folded.as_str() {
            "" => Ok(()),
            "scan" => {
                scan::scan_bus(&mut self.bus, &mut self.io, C::LCD_ADDR)?;
                self.sampler.diagnostic(&mut self.io)
            }
            "fake on" => {
                self.state.simulate = true;
                self.io.write_line("\u{2713} Fake mode ENABLED")
            }
            "fake off" => {
                self.state.simulate = false;
                self.io
                    .write_line("\u{2713} Fake mode DISABLED - Using real sensors")
            }
            "status" => self.print_status(),
            "debug on" => {
                self.state.verbose = true;
                self.io
                    .write_line("\u{2713} Debug mode ENABLED - Showing ADC values")
            }
            "debug off" => {
                self.state.verbose = false;
                self.io.write_line("\u{2713} Debug mode DISABLED")
            }
            "calibrate" => self.sampler.calibrate(&mut self.io),
            "help" => self.print_help(),
            other => {
                if let Some(arg) = other.strip_prefix("set room ") {
                    self.set_command(Channel::Room, arg)
                } else if let Some(arg) = other.strip_prefix("set algae ") {
                    self.set_command(Channel::Algae, arg)
                } else {
                    self.write_error(CommandError::UnknownCommand)
                }
            }
        }
    }

    /// Apply a `set room`/`set algae` command.
    fn set_command(&mut self, channel: Channel, arg: &str) -> Result<(), IO::Error> {
        match parse_set_temperature::<C>(arg) {
            Ok(degrees) => {
                self.sampler.set_synthetic(channel, degrees);

                let mut line: heapless::String<64> = heapless::String::new();
                let _ = write!(
                    line,
                    "\u{2713} {} temp set to: {:.1}\u{b0}C",
                    channel.label(),
                    degrees
                );
                self.io.write_line(&line)
            }
            Err(e) => self.write_error(e),
        }
    }

    fn write_error(&mut self, e: CommandError) -> Result<(), IO::Error> {
        let mut line: heapless::String<64> = heapless::String::new();
        let _ = write!(line, "{e}");
        self.io.write_line(&line)
    }

    fn print_status(&mut self) -> Result<(), IO::Error> {
        self.io.write_line("")?;
        self.io.write_line("=== SYSTEM STATUS ===")?;

        let mut line: heapless::String<64> = heapless::String::new();
        let _ = write!(
            line,
            "Mode: {}",
            if self.state.simulate {
                "FAKE/MOCK"
            } else {
                "REAL SENSORS"
            }
        );
        self.io.write_line(&line)?;

        line.clear();
        let _ = write!(
            line,
            "Debug: {}",
            if self.state.verbose { "ON" } else { "OFF" }
        );
        self.io.write_line(&line)?;

        line.clear();
        let _ = write!(line, "Room Temp: {:.1}\u{b0}C", self.state.room_temp);
        self.io.write_line(&line)?;

        line.clear();
        let _ = write!(line, "Algae Temp: {:.1}\u{b0}C", self.state.algae_temp);
        self.io.write_line(&line)?;

        if self.state.simulate {
            line.clear();
            let _ = write!(
                line,
                "Fake Base Room: {:.1}\u{b0}C",
                self.sampler.synthetic(Channel::Room)
            );
            self.io.write_line(&line)?;

            line.clear();
            let _ = write!(
                line,
                "Fake Base Algae: {:.1}\u{b0}C",
                self.sampler.synthetic(Channel::Algae)
            );
            self.io.write_line(&line)?;
        }

        self.io.write_line("====================")?;
        self.io.write_line("")
    }

    fn print_help(&mut self) -> Result<(), IO::Error> {
        self.io.write_line("")?;
        self.io.write_line("=== AVAILABLE COMMANDS ===")?;

        for cmd in COMMANDS {
            let mut line: heapless::String<64> = heapless::String::new();
            let _ = write!(line, "{:<18}- {}", cmd.usage, cmd.description);
            self.io.write_line(&line)?;
        }

        self.io.write_line("=========================")?;
        self.io.write_line("")
    }

    // ========================================
    // Accessors
    // ========================================

    /// Shared state (read-only view).
    pub fn state(&self) -> &SystemState {
        &self.state
    }

    /// The sampler, e.g. for inspecting synthetic values.
    pub fn sampler(&self) -> &Sampler<A, D, R, C> {
        &self.sampler
    }

    /// Console I/O.
    pub fn io(&self) -> &IO {
        &self.io
    }

    /// Console I/O, mutable (feeding input, draining captured output).
    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    /// The display.
    pub fn display(&self) -> &DISP {
        &self.display
    }
}
