//! Text Measurement - Display-width-aware height estimation.
//!
//! Used to estimate how tall a card must grow to show its full summary
//! when the user expands it. Widths are measured in display columns via
//! unicode-width (CJK and emoji count double), then converted to pixels
//! with the card typography constants.

use unicode_width::UnicodeWidthChar;

use crate::engine::entity::{CardDisplay, TITLE_BAR_H};

/// Summary body font size in pixels.
const SUMMARY_FONT_SIZE: f64 = 14.0;
/// Line height multiplier for the summary body.
const SUMMARY_LINE_HEIGHT: f64 = 1.5;
/// Average glyph advance as a fraction of the font size.
const CHAR_WIDTH_RATIO: f64 = 0.55;
/// Horizontal padding inside the summary block.
const SUMMARY_PADDING: f64 = 24.0;
/// Tag row height when details are shown.
const TAGS_ROW_H: f64 = 40.0;
/// Date row height when details are shown.
const DATE_ROW_H: f64 = 20.0;

/// Display width of a string in columns.
pub fn string_width(s: &str) -> usize {
    s.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Number of lines `text` occupies when wrapped to `available_width`
/// columns. Explicit newlines always break; zero for empty text.
pub fn measure_text_height(text: &str, available_width: usize) -> usize {
    if text.is_empty() {
        return 0;
    }
    if available_width == 0 {
        return 1;
    }

    let mut lines = 0usize;
    let mut current = 0usize;
    for c in text.chars() {
        if c == '\n' {
            lines += 1;
            current = 0;
            continue;
        }
        let w = c.width().unwrap_or(0);
        if current + w > available_width && current > 0 {
            lines += 1;
            current = w;
        } else {
            current += w;
        }
    }
    if current > 0 {
        lines += 1;
    }
    lines
}

/// Estimate the height a card needs to show its full details at width `w`.
///
/// Title bar + image band + date row + tags row + wrapped summary. The
/// image band is capped at the card width so portrait images cannot blow
/// the card up arbitrarily.
pub fn estimate_expanded_height(display: &CardDisplay, w: f64) -> f64 {
    let image_h = if display.image.is_empty() { 140.0 } else { w.min(200.0f64.max(w * 0.5)) };
    let date_h = if display.date.is_empty() { 0.0 } else { DATE_ROW_H };

    let char_w = SUMMARY_FONT_SIZE * CHAR_WIDTH_RATIO;
    let available_cols = (((w - SUMMARY_PADDING) / char_w).floor() as usize).max(1);
    let summary_lines = measure_text_height(&display.summary, available_cols).max(1);
    let summary_h = summary_lines as f64 * SUMMARY_FONT_SIZE * SUMMARY_LINE_HEIGHT + SUMMARY_PADDING;

    TITLE_BAR_H + image_h + date_h + TAGS_ROW_H + summary_h + 20.0
}

// =============================================================================
// Tests
// =============================================================================
