use crate::i18n::Labels;
use crate::layout::{Color, LayoutContext, TextStyle};
use crate::model::Answer;
use crate::sanitize::CleanRecord;

use super::{SECTION_GAP, heading};

const LABEL_HEIGHT: f32 = 16.0;
const BAR_HEIGHT: f32 = 12.0;
const ENTRY_HEIGHT: f32 = 34.0;

const YES_COLOR: Color = Color([76, 175, 80]);
const NO_COLOR: Color = Color([244, 67, 54]);
const PALETTE: [Color; 4] = [
    Color([33, 150, 243]),
    Color([255, 152, 0]),
    Color([156, 39, 176]),
    Color([96, 125, 139]),
];

#[derive(Clone, Debug, PartialEq)]
pub struct BreakdownEntry {
    pub answer: Answer,
    pub count: usize,
    /// Share of all records, rounded to one decimal.
    pub percentage: f64,
}

fn rank(answer: &Answer) -> u8 {
    match answer {
        Answer::Yes => 0,
        Answer::No => 1,
        Answer::Other(_) => 2,
    }
}

/// Count per distinct answer: Yes, then No, then other values in the order
/// they first appear.
pub fn breakdown(records: &[CleanRecord]) -> Vec<BreakdownEntry> {
    let total = records.len();
    if total == 0 {
        return Vec::new();
    }
    let mut counts: Vec<(Answer, usize)> = Vec::new();
    for record in records {
        match counts.iter_mut().find(|(a, _)| *a == record.answer) {
            Some((_, n)) => *n += 1,
            None => counts.push((record.answer.clone(), 1)),
        }
    }
    counts.sort_by_key(|(a, _)| rank(a));
    counts
        .into_iter()
        .map(|(answer, count)| BreakdownEntry {
            answer,
            count,
            percentage: (count as f64 / total as f64 * 1000.0).round() / 10.0,
        })
        .collect()
}

pub fn render(ctx: &mut LayoutContext, labels: &Labels, records: &[CleanRecord]) -> f32 {
    let entries = breakdown(records);
    heading(ctx, labels.breakdown_heading);

    let style = TextStyle::new(ctx.config().body_font_size + 1.0);
    let bar_max = ctx.config().bar_max_width.min(ctx.content_width());
    let mut others = 0usize;
    for entry in &entries {
        ctx.ensure_room(ENTRY_HEIGHT);
        let line =
            labels.breakdown_line(labels.answer(&entry.answer), entry.count, entry.percentage);
        let width = ctx.content_width();
        let x = ctx.box_x(0.0, width);
        let align = ctx.writing().align();
        ctx.text(&line, style, x, width, align, 0.0, LABEL_HEIGHT);

        let color = match entry.answer {
            Answer::Yes => YES_COLOR,
            Answer::No => NO_COLOR,
            Answer::Other(_) => {
                others += 1;
                PALETTE[(others - 1) % PALETTE.len()]
            }
        };
        // track and fill both grow from the start edge
        let track_x = ctx.box_x(0.0, bar_max);
        ctx.fill_rect(track_x, LABEL_HEIGHT, bar_max, BAR_HEIGHT, Color::TRACK);
        let fill = (entry.percentage / 100.0) as f32 * bar_max;
        if fill > 0.0 {
            let fill_x = ctx.box_x(0.0, fill);
            ctx.fill_rect(fill_x, LABEL_HEIGHT, fill, BAR_HEIGHT, color);
        }
        ctx.advance(ENTRY_HEIGHT);
    }
    ctx.advance(SECTION_GAP)
}
