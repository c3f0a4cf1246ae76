//! Bilingual (English / Arabic) poll-results reports rendered to PDF.
//!
//! Arabic reports mirror the whole page: table columns run right to left,
//! bars grow from the right edge and paragraph text is right-aligned. Arabic
//! strings are reshaped into joined letterforms and reordered for display.

pub mod compose;
pub mod config;
mod error;
pub mod fonts;
pub mod i18n;
pub mod layout;
pub mod model;
mod pdf;
pub mod sanitize;
pub mod sections;
pub mod text;

pub use compose::{RenderedReport, ReportComposer};
pub use config::{FontConfig, PageGeometry, ReportConfig};
pub use error::Error;
pub use fonts::FontSet;
pub use model::{Answer, Language, ReportFilters, ReportRequest, VoteRecord};

use std::path::Path;
use std::time::Instant;

/// Render `request` with a composer built over `fonts` and `config`.
pub fn render_report(
    request: &ReportRequest,
    fonts: &FontSet,
    config: &ReportConfig,
) -> Result<RenderedReport, Error> {
    ReportComposer::new(fonts, config).compose(request)
}

/// Read a JSON request from `input` and write the PDF to `output`.
pub fn render_report_to_file(
    input: &Path,
    output: &Path,
    fonts: &FontSet,
    config: &ReportConfig,
) -> Result<RenderedReport, Error> {
    let t0 = Instant::now();

    let text = std::fs::read_to_string(input)?;
    let t_read = t0.elapsed();

    let report = ReportComposer::new(fonts, config).compose_json(&text)?;
    let t_render = t0.elapsed();

    std::fs::write(output, &report.bytes)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: read={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms ({} pages, {} bytes)",
        t_read.as_secs_f64() * 1000.0,
        (t_render - t_read).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        report.page_count,
        report.byte_size,
    );

    Ok(report)
}
