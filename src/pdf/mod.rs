mod content;

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Datelike, Timelike, Utc};
use pdf_writer::{Date, Filter, Name, Pdf, Rect, Ref, TextStr};

use crate::config::PageGeometry;
use crate::error::Error;
use crate::fonts::{FontEntry, FontRole, FontSet, register_font};
use crate::layout::Page;

/// Document-level metadata written to the info dictionary.
pub struct DocumentMeta<'a> {
    pub title: &'a str,
    pub created: DateTime<Utc>,
}

const PRODUCER: &str = concat!("tally-pdf ", env!("CARGO_PKG_VERSION"));

fn pdf_date(dt: DateTime<Utc>) -> Date {
    Date::new(dt.year().clamp(0, 9999) as u16)
        .month(dt.month() as u8)
        .day(dt.day() as u8)
        .hour(dt.hour() as u8)
        .minute(dt.minute() as u8)
        .second(dt.second() as u8)
        .utc_offset_hour(0)
}

/// Serialize laid-out pages. Every face that draws at least one string is
/// embedded, subset to the characters it draws.
pub fn write_pdf(
    pages: &[Page],
    fonts: &FontSet,
    geometry: &PageGeometry,
    meta: &DocumentMeta,
) -> Result<Vec<u8>, Error> {
    if pages.is_empty() {
        return Err(Error::Pdf("no pages to write".into()));
    }
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    // Phase 1: characters drawn per face, then embed each face once
    let mut used: BTreeMap<FontRole, HashSet<char>> = BTreeMap::new();
    for text in pages.iter().flat_map(|p| p.texts()) {
        used.entry(text.font).or_default().extend(text.text.chars());
    }
    let mut entries: BTreeMap<FontRole, FontEntry> = BTreeMap::new();
    for (i, (role, chars)) in used.iter().enumerate() {
        let entry = register_font(
            &mut pdf,
            fonts.face(*role),
            format!("F{}", i + 1),
            &mut alloc,
            chars,
        );
        entries.insert(*role, entry);
    }
    let t_fonts = t0.elapsed();

    // Phase 2: content streams
    let streams: Vec<Vec<u8>> = pages
        .iter()
        .map(|page| {
            let raw = content::page_content(page, &entries, geometry.height);
            miniz_oxide::deflate::compress_to_vec_zlib(&raw, 6)
        })
        .collect();
    let t_content = t0.elapsed();

    // Phase 3: page tree
    let n = pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (id, data) in content_ids.iter().zip(&streams) {
        pdf.stream(*id, data).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    let count = i32::try_from(n).map_err(|_| Error::Pdf(format!("{n} pages")))?;
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(count);

    let font_pairs: Vec<(&str, Ref)> = entries
        .values()
        .map(|e| (e.pdf_name.as_str(), e.font_ref))
        .collect();
    for (page_id, content_id) in page_ids.iter().zip(&content_ids) {
        let mut page = pdf.page(*page_id);
        page.media_box(Rect::new(0.0, 0.0, geometry.width, geometry.height))
            .parent(pages_id)
            .contents(*content_id);
        let mut resources = page.resources();
        let mut font_dict = resources.fonts();
        for (name, font_ref) in &font_pairs {
            font_dict.pair(Name(name.as_bytes()), *font_ref);
        }
    }

    pdf.document_info(info_id)
        .title(TextStr(meta.title))
        .producer(TextStr(PRODUCER))
        .creation_date(pdf_date(meta.created));

    let bytes = pdf.finish();
    log::info!(
        "PDF phases: font_embed={:.1}ms, content={:.1}ms, assembly={:.1}ms ({} pages, {} bytes)",
        t_fonts.as_secs_f64() * 1000.0,
        (t_content - t_fonts).as_secs_f64() * 1000.0,
        (t0.elapsed() - t_content).as_secs_f64() * 1000.0,
        n,
        bytes.len(),
    );
    Ok(bytes)
}
