//! Character display seam and HD44780-over-I2C driver.
//!
//! The renderer only needs three primitives: clear, cursor positioning and
//! raw character writes. `TextDisplay` captures exactly those; `Pcf8574Lcd`
//! implements them for the ubiquitous 16x2 module behind a PCF8574 I2C
//! backpack, driving the controller in 4-bit mode.
//!
//! Display writes are fire-and-forget: a failed bus transaction is not
//! detected or reported, the next full render repaints everything anyway.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

/// Minimal character display interface.
pub trait TextDisplay {
    /// Clear the display and home the cursor.
    fn clear(&mut self);

    /// Move the cursor to `col` on `row` (both 0-based).
    fn set_cursor(&mut self, col: u8, row: u8);

    /// Write one raw character cell (controller character set, not UTF-8).
    fn write_byte(&mut self, b: u8);

    /// Write a string of ASCII text at the cursor.
    ///
    /// Default implementation writes byte by byte.
    fn print(&mut self, s: &str) {
        for b in s.bytes() {
            self.write_byte(b);
        }
    }
}

// PCF8574 bit assignment: P7..P4 data nibble, P3 backlight, P2 enable,
// P1 read/write, P0 register select.
const BACKLIGHT: u8 = 0b0000_1000;
const ENABLE: u8 = 0b0000_0100;
const REG_DATA: u8 = 0b0000_0001;

// HD44780 instructions used by this driver.
const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE_INC: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

/// DDRAM address for a cursor position: the second row starts at 0x40.
pub(crate) const fn ddram_addr(col: u8, row: u8) -> u8 {
    if row == 0 { col } else { 0x40 + col }
}

/// HD44780 16x2 driver behind a PCF8574 I2C backpack, 4-bit mode.
///
/// Backlight is kept on. Bus errors are discarded.
pub struct Pcf8574Lcd<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    i2c: I2C,
    delay: D,
    addr: u8,
}

impl<I2C, D> core::fmt::Debug for Pcf8574Lcd<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pcf8574Lcd")
            .field("addr", &self.addr)
            .finish_non_exhaustive()
    }
}

impl<I2C, D> Pcf8574Lcd<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Create the driver and run the controller's 4-bit init sequence.
    pub fn new(i2c: I2C, delay: D, addr: u8) -> Self {
        let mut lcd = Self { i2c, delay, addr };
        lcd.init();
        lcd
    }

    fn init(&mut self) {
        // Power-up settle, then the three-times-0x3 dance that forces the
        // controller into a known state regardless of its current width,
        // followed by the switch to 4-bit mode.
        self.delay.delay_ms(50);
        self.write_nibble(0x03, false);
        self.delay.delay_us(4500);
        self.write_nibble(0x03, false);
        self.delay.delay_us(4500);
        self.write_nibble(0x03, false);
        self.delay.delay_us(150);
        self.write_nibble(0x02, false);

        self.command(CMD_FUNCTION_4BIT_2LINE);
        self.command(CMD_DISPLAY_ON);
        self.command(CMD_ENTRY_MODE_INC);
        self.clear();
    }

    /// Clock one nibble out through the expander.
    ///
    /// The controller latches on the falling edge of ENABLE, so every nibble
    /// goes out as a low/high/low triple.
    fn write_nibble(&mut self, nibble: u8, data: bool) {
        let mut byte = (nibble << 4) | BACKLIGHT;
        if data {
            byte |= REG_DATA;
        }
        let seq = [byte, byte | ENABLE, byte];
        let _ = self.i2c.write(self.addr, &seq);
    }

    fn command(&mut self, cmd: u8) {
        self.write_nibble(cmd >> 4, false);
        self.write_nibble(cmd & 0x0F, false);
        self.delay.delay_us(50);
    }

    fn data(&mut self, b: u8) {
        self.write_nibble(b >> 4, true);
        self.write_nibble(b & 0x0F, true);
        self.delay.delay_us(50);
    }
}

impl<I2C, D> TextDisplay for Pcf8574Lcd<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    fn clear(&mut self) {
        self.command(CMD_CLEAR);
        // Clear is the one slow instruction (>1.5 ms busy).
        self.delay.delay_ms(2);
    }

    fn set_cursor(&mut self, col: u8, row: u8) {
        self.command(CMD_SET_DDRAM | ddram_addr(col, row));
    }

    fn write_byte(&mut self, b: u8) {
        self.data(b);
    }
}
