use std::collections::BTreeMap;

use pdf_writer::{Content, Name, Str};

use crate::fonts::{FontEntry, FontRole};
use crate::layout::{DrawInstruction, Page};

/// Content stream for one page. Layout coordinates are top-down; PDF user
/// space is bottom-up, so every y is flipped against `page_height`.
pub(super) fn page_content(
    page: &Page,
    fonts: &BTreeMap<FontRole, FontEntry>,
    page_height: f32,
) -> Vec<u8> {
    let mut content = Content::new();
    for instruction in &page.instructions {
        match instruction {
            DrawInstruction::Rect {
                x,
                y,
                width,
                height,
                fill,
            } => {
                let (r, g, b) = fill.rgb_f32();
                content.save_state();
                content.set_fill_rgb(r, g, b);
                content.rect(*x, page_height - y - height, *width, *height);
                content.fill_nonzero();
                content.restore_state();
            }
            DrawInstruction::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => {
                let (r, g, b) = color.rgb_f32();
                content.save_state();
                content.set_line_width(*width);
                content.set_stroke_rgb(r, g, b);
                content.move_to(*x1, page_height - y1);
                content.line_to(*x2, page_height - y2);
                content.stroke();
                content.restore_state();
            }
            DrawInstruction::Text(item) => {
                let Some(entry) = fonts.get(&item.font) else {
                    log::warn!("No font registered for {:?}; text dropped", item.font);
                    continue;
                };
                let (r, g, b) = item.color.rgb_f32();
                content.begin_text();
                content.set_fill_rgb(r, g, b);
                content.set_font(Name(entry.pdf_name.as_bytes()), item.size);
                content.next_line(item.x, page_height - item.baseline);
                content.show(Str(&entry.encode(&item.text)));
                content.end_text();
            }
        }
    }
    content.finish().as_slice().to_vec()
}
