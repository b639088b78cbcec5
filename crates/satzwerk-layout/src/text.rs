// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text layout — single-line fields with ellipsis truncation, and multi-line
// text areas with adaptive font-size fitting. All coordinates are page-local
// with a top-left origin; `FittedLine::y` is the text baseline.

use satzwerk_catalog::mapping::{FieldMapping, FieldStyle, TextAreaStyle, TextStyle};
use satzwerk_core::error::{Result, SatzwerkError};
use satzwerk_core::types::{Alignment, Rgb};
use tracing::debug;

use crate::metrics::measure_text;

/// Horizontal padding applied on each side of a rendered line.
const LINE_PADDING: f64 = 4.0;
/// Single-line text at or above this size renders bold in the title color.
const TITLE_THRESHOLD: f64 = 12.0;
/// Floor for the effective wrapping width of a text area.
const MIN_EFFECTIVE_WIDTH: f64 = 20.0;
/// Floor for the per-line character budget of a text area.
const MIN_CHARS_PER_LINE: usize = 10;
/// Average glyph width as a fraction of the font size, used for the
/// character-budget estimate during wrapping.
const AVG_CHAR_FRACTION: f64 = 0.5;

/// One positioned line of text, ready to be committed to a page.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedLine {
    pub text: String,
    /// Left edge of the text run.
    pub x: f64,
    /// Baseline, measured from the top of the page.
    pub y: f64,
    pub font_size: f64,
    pub bold: bool,
    pub color: Rgb,
}

/// Lay out a text value into its field box.
///
/// Returns one line for `text` fields and up to the fitted line count for
/// `textarea` fields. Empty or whitespace-only input is an `EmptyValue`
/// error; callers decide whether that means "skip" or "fail".
pub fn layout_text(value: &str, mapping: &FieldMapping) -> Result<Vec<FittedLine>> {
    match &mapping.style {
        FieldStyle::Text(style) => layout_single_line(value, mapping, style),
        FieldStyle::TextArea(style) => layout_text_area(value, mapping, style),
        _ => Err(SatzwerkError::ValueMismatch(format!(
            "field '{}' is {}, not a text field",
            mapping.name,
            mapping.kind()
        ))),
    }
}

// -- Single-line text ---------------------------------------------------------

fn layout_single_line(
    value: &str,
    mapping: &FieldMapping,
    style: &TextStyle,
) -> Result<Vec<FittedLine>> {
    // A single-line field flattens all whitespace, newlines included.
    let text = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return Err(SatzwerkError::EmptyValue(mapping.name.clone()));
    }

    let available = mapping.width - 2.0 * LINE_PADDING;
    if available <= 0.0 {
        return Err(SatzwerkError::InvalidGeometry(format!(
            "field '{}': width {} leaves no room for text",
            mapping.name, mapping.width
        )));
    }

    let bold = style.bold || style.font_size >= TITLE_THRESHOLD;
    let font_size = style.font_size.max(8.0);
    let fitted = truncate_to_width(&text, bold, font_size, available);
    let x = aligned_x(mapping.x, mapping.width, &fitted, bold, font_size, style.alignment);
    let color = if bold { Rgb::TITLE } else { Rgb::BODY };

    Ok(vec![FittedLine {
        text: fitted,
        x,
        y: mapping.y + font_size,
        font_size,
        bold,
        color,
    }])
}

/// Drop characters from the end until the text fits `available` points,
/// marking the cut with an ellipsis. Each pass removes four characters and
/// appends three, so the loop always terminates.
pub fn truncate_to_width(text: &str, bold: bool, font_size: f64, available: f64) -> String {
    let mut text = text.to_string();
    while measure_text(&text, bold, font_size) > available && text.chars().count() > 3 {
        for _ in 0..4 {
            text.pop();
        }
        text.push_str("...");
    }
    text
}

/// Left edge of a text run aligned within its field box.
pub(crate) fn aligned_x(
    box_x: f64,
    box_width: f64,
    text: &str,
    bold: bool,
    font_size: f64,
    alignment: Alignment,
) -> f64 {
    let text_width = measure_text(text, bold, font_size);
    match alignment {
        Alignment::Left => box_x + LINE_PADDING,
        Alignment::Center => {
            let inner = box_width - 2.0 * LINE_PADDING;
            box_x + LINE_PADDING + ((inner - text_width) / 2.0).max(0.0)
        }
        Alignment::Right => box_x + box_width - LINE_PADDING - text_width,
    }
}

// -- Multi-line text areas ----------------------------------------------------

fn layout_text_area(
    value: &str,
    mapping: &FieldMapping,
    style: &TextAreaStyle,
) -> Result<Vec<FittedLine>> {
    let text = normalize_text(value);
    if text.is_empty() {
        return Err(SatzwerkError::EmptyValue(mapping.name.clone()));
    }
    if mapping.width - style.padding_lr <= 0.0 {
        return Err(SatzwerkError::InvalidGeometry(format!(
            "field '{}': width {} minus padding {} leaves no room for text",
            mapping.name, mapping.width, style.padding_lr
        )));
    }

    let fit = fit_text_area(&text, mapping, style);
    if fit.truncated {
        debug!(
            field = %mapping.name,
            font_size = fit.font_size,
            "text area content truncated at minimum font size"
        );
    }

    let mut out = Vec::with_capacity(fit.lines.len());
    let mut cursor_y = mapping.y + style.padding_top;
    let bottom = mapping.y + mapping.height;
    for line in fit.lines {
        // Never let a baseline spill below the field box.
        if cursor_y + fit.font_size > bottom {
            break;
        }
        if !line.is_empty() {
            // Character budgets are an estimate; re-measure each line and
            // truncate any outlier so no line overruns the box width.
            let available = mapping.width - 2.0 * LINE_PADDING;
            let fitted = truncate_to_width(&line, false, fit.font_size, available);
            let x = aligned_x(
                mapping.x,
                mapping.width,
                &fitted,
                false,
                fit.font_size,
                style.alignment,
            );
            out.push(FittedLine {
                text: fitted,
                x,
                y: cursor_y + fit.font_size,
                font_size: fit.font_size,
                bold: false,
                color: Rgb::BODY,
            });
        }
        cursor_y += fit.line_height;
    }
    Ok(out)
}

struct AreaFit {
    lines: Vec<String>,
    font_size: f64,
    line_height: f64,
    truncated: bool,
}

/// Search downward from the configured font size for the largest size whose
/// wrapped output fits the line cap. At the minimum size the text is
/// truncated to the cap instead.
fn fit_text_area(text: &str, mapping: &FieldMapping, style: &TextAreaStyle) -> AreaFit {
    let base_size = style.font_size;
    let base_line_height = style.base_line_height();

    let mut font_size = base_size;
    while font_size >= style.min_font_size {
        let line_height = scaled_line_height(base_line_height, base_size, font_size);
        let budget = chars_per_line(mapping.width, style.padding_lr, font_size);
        let lines = wrap_text(text, budget);
        let cap = line_cap(mapping.height, style.padding_top, line_height, style.max_lines);
        if lines.len() <= cap {
            return AreaFit {
                lines,
                font_size,
                line_height,
                truncated: false,
            };
        }
        font_size -= 1.0;
    }

    let font_size = style.min_font_size;
    let line_height = scaled_line_height(base_line_height, base_size, font_size);
    let budget = chars_per_line(mapping.width, style.padding_lr, font_size);
    let mut lines = wrap_text(text, budget);
    let cap = line_cap(mapping.height, style.padding_top, line_height, style.max_lines);
    let truncated = lines.len() > cap;
    lines.truncate(cap);
    if truncated {
        if let Some(last) = lines.last_mut() {
            if last.chars().count() > 3 {
                for _ in 0..3 {
                    last.pop();
                }
                last.push_str("...");
            }
        }
    }
    AreaFit {
        lines,
        font_size,
        line_height,
        truncated,
    }
}

/// Line height scaled with the font size, never tighter than the glyphs.
fn scaled_line_height(base_line_height: f64, base_size: f64, font_size: f64) -> f64 {
    (base_line_height * font_size / base_size).round().max(font_size + 2.0)
}

/// Estimated characters per wrapped line at `font_size`.
pub(crate) fn chars_per_line(box_width: f64, padding_lr: f64, font_size: f64) -> usize {
    let effective_width = (box_width - padding_lr).max(MIN_EFFECTIVE_WIDTH);
    let budget = (effective_width / (font_size * AVG_CHAR_FRACTION)).floor() as usize;
    budget.max(MIN_CHARS_PER_LINE)
}

/// How many lines fit vertically, bounded by the configured maximum.
pub(crate) fn line_cap(
    box_height: f64,
    padding_top: f64,
    line_height: f64,
    max_lines: u32,
) -> usize {
    let by_height = ((box_height - padding_top) / line_height).floor().max(1.0) as usize;
    by_height.min(max_lines as usize)
}

/// Collapse runs of whitespace within each paragraph while preserving the
/// paragraph breaks themselves, then trim leading and trailing blank lines.
pub(crate) fn normalize_text(text: &str) -> String {
    let cleaned: Vec<String> = text
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect();
    cleaned.join("\n").trim().to_string()
}

/// Greedy word wrap to a per-line character budget. Blank lines are kept as
/// paragraph separators. Words longer than the budget are split, preferring
/// existing hyphens as break points.
pub(crate) fn wrap_text(text: &str, budget: usize) -> Vec<String> {
    let mut out = Vec::new();
    for paragraph in text.split('\n') {
        if paragraph.is_empty() {
            out.push(String::new());
            continue;
        }
        wrap_paragraph(paragraph, budget, &mut out);
    }
    out
}

fn wrap_paragraph(paragraph: &str, budget: usize, out: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_len = 0usize;

    let flush = |current: &mut String, current_len: &mut usize, out: &mut Vec<String>| {
        if !current.is_empty() {
            out.push(std::mem::take(current));
            *current_len = 0;
        }
    };

    for word in paragraph.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > budget {
            flush(&mut current, &mut current_len, out);
            let (tail, tail_len) = break_long_word(word, budget, out);
            current = tail;
            current_len = tail_len;
            continue;
        }
        let needed = if current.is_empty() { word_len } else { word_len + 1 };
        if current_len + needed > budget {
            flush(&mut current, &mut current_len, out);
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }
    flush(&mut current, &mut current_len, out);
}

/// Split an over-budget word into budget-sized pieces, breaking after
/// hyphens where possible. Complete lines are pushed to `out`; the last
/// partial piece is returned to seed the next line.
fn break_long_word(word: &str, budget: usize, out: &mut Vec<String>) -> (String, usize) {
    let mut current = String::new();
    let mut current_len = 0usize;

    for segment in word.split_inclusive('-') {
        let mut segment_len = segment.chars().count();
        let mut segment = segment;
        // A segment with no usable hyphen break still has to be cut.
        while segment_len > budget {
            if current_len > 0 {
                out.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let cut = segment
                .char_indices()
                .nth(budget)
                .map_or(segment.len(), |(i, _)| i);
            out.push(segment[..cut].to_string());
            segment = &segment[cut..];
            segment_len = segment.chars().count();
        }
        if current_len + segment_len > budget {
            out.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push_str(segment);
        current_len += segment_len;
    }
    (current, current_len)
}
