use crate::i18n::Labels;
use crate::layout::{Align, Color, LayoutContext, TextStyle};
use crate::model::ReportRequest;

use super::SECTION_GAP;

const BANNER_HEIGHT: f32 = 60.0;

/// Title banner. Centered in both directions.
pub fn render(ctx: &mut LayoutContext, labels: &Labels, request: &ReportRequest) -> f32 {
    ctx.ensure_room(BANNER_HEIGHT);
    let width = ctx.content_width();
    let x = ctx.centered_x(width);
    ctx.fill_rect(x, 0.0, width, BANNER_HEIGHT, Color::BANNER);

    let title = TextStyle::new(ctx.config().title_font_size)
        .bold()
        .color(Color::WHITE);
    ctx.text(labels.title, title, x, width, Align::Center, 6.0, 30.0);

    let subtitle = TextStyle::new(ctx.config().body_font_size + 2.0).color(Color::WHITE);
    let line = labels.subtitle(request.total_count, request.filtered_count);
    ctx.text(&line, subtitle, x, width, Align::Center, 36.0, 18.0);

    ctx.advance(BANNER_HEIGHT + SECTION_GAP)
}
