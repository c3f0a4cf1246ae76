//! Visual reordering of mixed-direction text (UAX #9) on top of `unicode-bidi`.
//!
//! Embedding levels are resolved per paragraph; runs are then emitted in
//! visual order with RTL runs reversed and their paired punctuation mirrored,
//! so digits and Latin words inside an Arabic string keep their own order.

use unicode_bidi::{BidiInfo, Level};

use super::Direction;

/// A maximal slice of text with one resolved direction, already in drawing order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BidiRun {
    pub text: String,
    pub direction: Direction,
}

fn mirror(c: char) -> char {
    match c {
        '(' => ')',
        ')' => '(',
        '[' => ']',
        ']' => '[',
        '{' => '}',
        '}' => '{',
        '<' => '>',
        '>' => '<',
        '«' => '»',
        '»' => '«',
        _ => c,
    }
}

/// Runs of `text` in visual (left-to-right drawing) order.
pub fn visual_runs(text: &str, base: Direction) -> Vec<BidiRun> {
    if text.is_empty() {
        return Vec::new();
    }
    let base_level = match base {
        Direction::Ltr => Level::ltr(),
        Direction::Rtl => Level::rtl(),
    };
    let info = BidiInfo::new(text, Some(base_level));

    let mut out = Vec::new();
    for para in &info.paragraphs {
        let (levels, runs) = info.visual_runs(para, para.range.clone());
        for run in runs {
            let slice = &text[run.clone()];
            if levels[run.start].is_rtl() {
                out.push(BidiRun {
                    text: slice.chars().rev().map(mirror).collect(),
                    direction: Direction::Rtl,
                });
            } else {
                out.push(BidiRun {
                    text: slice.to_string(),
                    direction: Direction::Ltr,
                });
            }
        }
    }
    out
}

/// Concatenated visual runs: the string to draw left to right.
pub fn reorder(text: &str, base: Direction) -> String {
    visual_runs(text, base)
        .into_iter()
        .map(|r| r.text)
        .collect()
}
