//! Test fixtures for algae-monitor integration tests.
//!
//! Provides:
//! - `MockSerial`: in-memory SerialIo with input queue and output capture
//! - `MockAdc`: fixed raw counts per channel
//! - `MockDelay`: DelayNs that only counts elapsed time
//! - `MockDisplay`: 16x2 cell grid capturing what would be drawn
//! - `MockBus`: BusProbe acknowledging a fixed address list

#![allow(dead_code)]

use std::collections::VecDeque;

use algae_monitor::{AdcRead, BusProbe, Channel, SerialIo, TextDisplay};
use embedded_hal::delay::DelayNs;

// ============================================================================
// MockSerial - console I/O
// ============================================================================

/// Mock serial console with input queue and output capture.
#[derive(Debug, Default)]
pub struct MockSerial {
    input: VecDeque<char>,
    output: Vec<char>,
}

impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue input (simulates characters arriving on the line).
    pub fn push_input(&mut self, s: &str) {
        self.input.extend(s.chars());
    }

    /// Captured output as a string.
    pub fn output(&self) -> String {
        self.output.iter().collect()
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    pub fn input_empty(&self) -> bool {
        self.input.is_empty()
    }
}

impl SerialIo for MockSerial {
    type Error = ();

    fn read_char(&mut self) -> Result<Option<char>, ()> {
        Ok(self.input.pop_front())
    }

    fn write_char(&mut self, c: char) -> Result<(), ()> {
        self.output.push(c);
        Ok(())
    }
}

// ============================================================================
// MockAdc - raw analog counts
// ============================================================================

/// ADC returning fixed counts per channel.
///
/// 51 counts through the default config is ~24.9 degC - a plausible room.
#[derive(Debug)]
pub struct MockAdc {
    pub room: u16,
    pub algae: u16,
}

impl MockAdc {
    pub fn new(room: u16, algae: u16) -> Self {
        Self { room, algae }
    }
}

impl AdcRead for MockAdc {
    fn read(&mut self, channel: Channel) -> u16 {
        match channel {
            Channel::Room => self.room,
            Channel::Algae => self.algae,
        }
    }
}

// ============================================================================
// MockDelay - time sink
// ============================================================================

/// Delay source that records requested time instead of sleeping.
#[derive(Debug, Default)]
pub struct MockDelay {
    pub total_ns: u64,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

// ============================================================================
// MockDisplay - 16x2 cell grid
// ============================================================================

/// Degree glyph in the HD44780 character ROM.
pub const DEGREE_GLYPH: u8 = 0xDF;

/// Display capturing cells exactly as a 16x2 module would show them.
#[derive(Debug)]
pub struct MockDisplay {
    pub cells: [[u8; 16]; 2],
    pub clears: usize,
    col: u8,
    row: u8,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self {
            cells: [[b' '; 16]; 2],
            clears: 0,
            col: 0,
            row: 0,
        }
    }

    /// Row content with the degree glyph mapped back to a readable char,
    /// trailing blanks trimmed.
    pub fn row_text(&self, row: usize) -> String {
        self.cells[row]
            .iter()
            .map(|&b| if b == DEGREE_GLYPH { '°' } else { b as char })
            .collect::<String>()
            .trim_end()
            .into()
    }
}

impl Default for MockDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TextDisplay for MockDisplay {
    fn clear(&mut self) {
        self.cells = [[b' '; 16]; 2];
        self.col = 0;
        self.row = 0;
        self.clears += 1;
    }

    fn set_cursor(&mut self, col: u8, row: u8) {
        self.col = col;
        self.row = row;
    }

    fn write_byte(&mut self, b: u8) {
        if self.col < 16 && self.row < 2 {
            self.cells[self.row as usize][self.col as usize] = b;
            self.col += 1;
        }
    }
}

// ============================================================================
// MockBus - presence probe
// ============================================================================

/// Bus where only the listed addresses acknowledge.
#[derive(Debug)]
pub struct MockBus {
    present: Vec<u8>,
}

impl MockBus {
    pub fn new(present: &[u8]) -> Self {
        Self {
            present: present.to_vec(),
        }
    }
}

impl BusProbe for MockBus {
    fn probe(&mut self, addr: u8) -> bool {
        self.present.contains(&addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_serial_roundtrip() {
        let mut io = MockSerial::new();
        io.push_input("hi");
        assert_eq!(io.read_char().unwrap(), Some('h'));
        assert_eq!(io.read_char().unwrap(), Some('i'));
        assert_eq!(io.read_char().unwrap(), None);

        io.write_str("ok").unwrap();
        assert_eq!(io.output(), "ok");
    }

    #[test]
    fn test_mock_display_grid() {
        let mut display = MockDisplay::new();
        display.set_cursor(0, 1);
        display.print("Algae:");
        display.write_byte(DEGREE_GLYPH);
        assert_eq!(display.row_text(1), "Algae:°");

        display.clear();
        assert_eq!(display.row_text(1), "");
        assert_eq!(display.clears, 1);
    }
}
