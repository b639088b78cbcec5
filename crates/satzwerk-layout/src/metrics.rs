// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Standard AFM advance widths for Helvetica and Helvetica-Bold, the two
// faces the template filler renders with. Widths are in 1/1000 of the font
// size, indexed by ASCII code point 32..=126; anything outside that range
// uses the face's default width. This keeps measurement deterministic across
// platforms without loading any font files.

/// Default advance (1/1000 em) for characters outside the table, Helvetica.
const HELVETICA_DEFAULT: u16 = 556;
/// Default advance for Helvetica-Bold.
const HELVETICA_BOLD_DEFAULT: u16 = 611;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333,
    584, 584, 584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278,
    556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Advance width (1/1000 em) of one character.
pub fn char_width(ch: char, bold: bool) -> u16 {
    let (table, default) = if bold {
        (&HELVETICA_BOLD_WIDTHS, HELVETICA_BOLD_DEFAULT)
    } else {
        (&HELVETICA_WIDTHS, HELVETICA_DEFAULT)
    };
    match u32::from(ch) {
        code @ 32..=126 => table[(code - 32) as usize],
        _ => default,
    }
}

/// Measure the rendered width of `text` at `font_size` points.
pub fn measure_text(text: &str, bold: bool, font_size: f64) -> f64 {
    let units: u32 = text.chars().map(|ch| u32::from(char_width(ch, bold))).sum();
    (units as f64 / 1000.0) * font_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_is_narrow_in_both_faces() {
        assert_eq!(char_width(' ', false), 278);
        assert_eq!(char_width(' ', true), 278);
    }

    #[test]
    fn bold_runs_wider_than_regular() {
        let regular = measure_text("Problem statement", false, 12.0);
        let bold = measure_text("Problem statement", true, 12.0);
        assert!(bold > regular);
    }

    #[test]
    fn width_scales_linearly_with_font_size() {
        let at_ten = measure_text("abc", false, 10.0);
        let at_twenty = measure_text("abc", false, 20.0);
        assert!((at_twenty - 2.0 * at_ten).abs() < 1e-9);
    }

    #[test]
    fn non_ascii_falls_back_to_default_width() {
        assert_eq!(char_width('é', false), 556);
        assert_eq!(char_width('é', true), 611);
    }

    #[test]
    fn empty_string_measures_zero() {
        assert_eq!(measure_text("", false, 12.0), 0.0);
    }
}
