//! Helvetica text measurement and word wrap.
//!
//! Widths are the Adobe AFM advance widths for the base-14 Helvetica fonts,
//! in 1/1000 em units. Page measurements elsewhere are millimetres, so the
//! measured point width is converted before returning.

const PT_TO_MM: f64 = 25.4 / 72.0;

/// Advance width used for characters outside the ASCII table.
const DEFAULT_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

fn char_width_units(ch: char, bold: bool) -> u16 {
    let code = ch as u32;
    if (32..=126).contains(&code) {
        let index = (code - 32) as usize;
        if bold {
            HELVETICA_BOLD_WIDTHS[index]
        } else {
            HELVETICA_WIDTHS[index]
        }
    } else {
        DEFAULT_WIDTH
    }
}

/// Measured width of `text` in millimetres at the given point size.
pub fn text_width(text: &str, size: f64, bold: bool) -> f64 {
    let units: u64 = text
        .chars()
        .map(|ch| char_width_units(ch, bold) as u64)
        .sum();
    units as f64 / 1000.0 * size * PT_TO_MM
}

/// Greedy word wrap against a width in millimetres.
///
/// Whitespace is normalized: runs of whitespace (including newlines) count as
/// single separators. A word wider than `max_width` on its own is split at
/// character granularity so the width bound holds for every returned line.
/// Text without any word yields a single empty line, which callers treat as
/// one line of vertical advance.
pub fn wrap_text(text: &str, max_width: f64, size: f64, bold: bool) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut any_word = false;

    for word in text.split_whitespace() {
        any_word = true;
        for piece in break_word(word, max_width, size, bold) {
            if current.is_empty() {
                current = piece;
                continue;
            }
            let candidate = format!("{} {}", current, piece);
            if text_width(&candidate, size, bold) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                current = piece;
            }
        }
    }

    if !any_word {
        return vec![String::new()];
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split a single word into pieces no wider than `max_width`. Each piece
/// keeps at least one character, so pathologically narrow widths still
/// terminate.
fn break_word(word: &str, max_width: f64, size: f64, bold: bool) -> Vec<String> {
    if text_width(word, size, bold) <= max_width {
        return vec![word.to_string()];
    }
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for ch in word.chars() {
        let mut candidate = piece.clone();
        candidate.push(ch);
        if !piece.is_empty() && text_width(&candidate, size, bold) > max_width {
            pieces.push(piece);
            piece = ch.to_string();
        } else {
            piece = candidate;
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
