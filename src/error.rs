//! Error types for console command processing.
//!
//! Command failures are advisory: the interpreter prints the message and the
//! loop carries on with prior state intact.

use core::fmt;

/// Console command error.
///
/// Covers the two rejection paths of the command surface. Both render as the
/// exact line the console prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// `set` argument missing, unparseable, or outside the accepted range
    InvalidTemperature,

    /// Input matched no entry of the command table
    UnknownCommand,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::InvalidTemperature => {
                write!(f, "\u{2717} Invalid temperature (-50 to 100\u{b0}C)")
            }
            CommandError::UnknownCommand => {
                write!(f, "\u{2717} Unknown command. Type 'help' for commands.")
            }
        }
    }
}
