//! I2C bus scanner.
//!
//! Probes every addressable slot and reports which respond, flagging the
//! configured display address. Used by the `scan` console command and once
//! at startup.

use core::fmt::Write;

use embedded_hal::i2c::I2c;

use crate::io::SerialIo;

/// Address-presence probe.
///
/// Implemented for every `embedded-hal` I2C bus via a zero-length write: an
/// acknowledged address is a present device. Single attempt, no retry; the
/// transaction timeout is whatever the bus implementation defaults to.
pub trait BusProbe {
    /// True when a device acknowledges `addr`.
    fn probe(&mut self, addr: u8) -> bool;
}

impl<T> BusProbe for T
where
    T: I2c,
{
    fn probe(&mut self, addr: u8) -> bool {
        self.write(addr, &[]).is_ok()
    }
}

/// Probe addresses 1..=126 and print every responder.
///
/// The configured display address gets an extra identification line. Returns
/// the number of devices found.
pub fn scan_bus<B, IO>(bus: &mut B, io: &mut IO, display_addr: u8) -> Result<u8, IO::Error>
where
    B: BusProbe,
    IO: SerialIo,
{
    io.write_line("")?;
    io.write_line("--- I2C Device Scanner ---")?;

    let mut devices: u8 = 0;
    for addr in 1..127u8 {
        if bus.probe(addr) {
            let mut line: heapless::String<48> = heapless::String::new();
            let _ = write!(line, "I2C device found at 0x{addr:02X} ({addr})");
            io.write_line(&line)?;
            devices += 1;

            if addr == display_addr {
                io.write_line("  \u{2192} LCD Display")?;
            }
        }
    }

    if devices == 0 {
        io.write_line("No I2C devices found!")?;
        io.write_line("Check wiring: SDA/SCL lines and pull-ups")?;
    }

    io.write_line("--- Scan Complete ---")?;
    io.write_line("")?;

    Ok(devices)
}
