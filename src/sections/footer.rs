use chrono::{DateTime, Utc};

use crate::i18n::Labels;
use crate::layout::{Color, DrawInstruction, LayoutContext, TextStyle};

/// Footer for page `page` of `total`: a rule, the generation time on the
/// start edge and the page counter on the other.
pub fn render(
    ctx: &LayoutContext,
    labels: &Labels,
    generated_at: DateTime<Utc>,
    page: usize,
    total: usize,
) -> Vec<DrawInstruction> {
    let style = TextStyle::new(ctx.config().footer_font_size).color(Color::TEXT_MUTED);
    let baseline = ctx.footer_baseline(style);
    let width = ctx.content_width();
    let x = ctx.box_x(0.0, width);
    let start = ctx.writing().align();

    let generated = format!(
        "{} {}",
        labels.generated_on,
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let counter = labels.page_of(page, total);
    vec![
        ctx.footer_rule(Color::RULE),
        ctx.text_instruction(&generated, style, x, width, start, baseline),
        ctx.text_instruction(&counter, style, x, width, start.opposite(), baseline),
    ]
}
