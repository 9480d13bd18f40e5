//! Display rendering.
//!
//! Pure formatting onto a [`TextDisplay`]: two labeled rows, one per
//! channel, with a one-decimal value and degree glyph, or an `ERROR` marker
//! when the value lies outside the plausible range. No return value, no
//! failure path.

use core::fmt::Write;

use crate::config::MonitorConfig;
use crate::lcd::TextDisplay;
use crate::sensor::in_valid_range;
use crate::state::SystemState;

/// Degree glyph in the HD44780 character ROM.
const DEGREE_GLYPH: u8 = 0xDF;

/// Column where both temperature values start.
const VALUE_COL: u8 = 6;

/// Startup splash, shown until the first render cycle replaces it.
pub fn show_welcome<D: TextDisplay>(display: &mut D) {
    display.clear();
    display.set_cursor(0, 0);
    display.print("Algae Cooling");
    display.set_cursor(0, 1);
    display.print("Starting...");
}

/// Repaint both rows from the current state.
///
/// Simulation mode is flagged with an `F` in the top-right corner.
pub fn render<D: TextDisplay, C: MonitorConfig>(display: &mut D, state: &SystemState) {
    display.clear();

    display.set_cursor(0, 0);
    display.print("Room:");
    display.set_cursor(VALUE_COL, 0);
    print_value::<D, C>(display, state.room_temp);

    display.set_cursor(0, 1);
    display.print("Algae:");
    display.set_cursor(VALUE_COL, 1);
    print_value::<D, C>(display, state.algae_temp);

    if state.simulate {
        display.set_cursor(C::LCD_COLS - 1, 0);
        display.write_byte(b'F');
    }
}

fn print_value<D: TextDisplay, C: MonitorConfig>(display: &mut D, t: f32) {
    if in_valid_range::<C>(t) {
        let mut text: heapless::String<8> = heapless::String::new();
        let _ = write!(text, "{:.1}", t);
        display.print(&text);
        display.write_byte(DEGREE_GLYPH);
        display.write_byte(b'C');
    } else {
        display.print("ERROR");
    }
}
