use chrono::{DateTime, Utc};

use crate::config::ReportConfig;
use crate::error::Error;
use crate::fonts::FontSet;
use crate::i18n::{self, Labels};
use crate::layout::{LayoutContext, Page};
use crate::model::{Language, ReportRequest, WireRequest};
use crate::pdf::{DocumentMeta, write_pdf};
use crate::sanitize::{CleanRecord, sanitize_record};
use crate::sections::{breakdown, filters, footer, header, table};

/// A finished document plus what the caller needs for response headers.
#[derive(Clone, Debug)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub byte_size: usize,
    pub language: Language,
    pub filtered: bool,
    pub generated_at: DateTime<Utc>,
}

impl RenderedReport {
    pub fn suggested_filename(&self) -> String {
        i18n::suggested_filename(self.language, self.filtered, self.generated_at.date_naive())
    }
}

/// Runs the section renderers in order over one request. Holds only shared
/// read-only state, so one composer can serve concurrent renders.
pub struct ReportComposer<'a> {
    fonts: &'a FontSet,
    config: &'a ReportConfig,
}

impl<'a> ReportComposer<'a> {
    pub fn new(fonts: &'a FontSet, config: &'a ReportConfig) -> Self {
        Self { fonts, config }
    }

    /// Reject a request of `count` records before any work is done on it.
    pub fn validate(&self, count: usize) -> Result<(), Error> {
        if count > self.config.record_cap {
            log::warn!(
                "Rejecting report: {count} records exceeds cap {}",
                self.config.record_cap
            );
            return Err(Error::TooManyRecords {
                count,
                cap: self.config.record_cap,
            });
        }
        Ok(())
    }

    /// Lay out every page, footers included, without serializing.
    pub fn layout(&self, request: &ReportRequest, now: DateTime<Utc>) -> Result<Vec<Page>, Error> {
        self.validate(request.records.len())?;
        let t0 = std::time::Instant::now();

        let records: Vec<CleanRecord> = request
            .records
            .iter()
            .map(|r| sanitize_record(r, now))
            .collect();
        let t_sanitize = t0.elapsed();

        let labels = Labels::for_language(request.language);
        let mut ctx = LayoutContext::new(self.config, self.fonts, request.language);
        header::render(&mut ctx, labels, request);
        breakdown::render(&mut ctx, labels, &records);
        filters::render(&mut ctx, labels, &request.filters);
        table::render(&mut ctx, labels, &records);
        let pages = ctx.finish(|ctx, page, total| footer::render(ctx, labels, now, page, total));

        log::info!(
            "Layout phases: sanitize={:.1}ms, sections={:.1}ms ({} records, {} pages, lang={})",
            t_sanitize.as_secs_f64() * 1000.0,
            (t0.elapsed() - t_sanitize).as_secs_f64() * 1000.0,
            records.len(),
            pages.len(),
            request.language.code(),
        );
        Ok(pages)
    }

    pub fn compose(&self, request: &ReportRequest) -> Result<RenderedReport, Error> {
        self.compose_at(request, Utc::now())
    }

    /// Render with a fixed clock. Two calls with the same request and `now`
    /// produce the same bytes.
    pub fn compose_at(
        &self,
        request: &ReportRequest,
        now: DateTime<Utc>,
    ) -> Result<RenderedReport, Error> {
        let t0 = std::time::Instant::now();
        let pages = self.layout(request, now)?;
        let t_layout = t0.elapsed();

        let labels = Labels::for_language(request.language);
        let meta = DocumentMeta {
            title: labels.title,
            created: now,
        };
        let bytes = write_pdf(&pages, self.fonts, &self.config.page, &meta)?;
        let t_total = t0.elapsed();

        log::info!(
            "Timing: layout={:.1}ms, serialize={:.1}ms, total={:.1}ms (output {} bytes)",
            t_layout.as_secs_f64() * 1000.0,
            (t_total - t_layout).as_secs_f64() * 1000.0,
            t_total.as_secs_f64() * 1000.0,
            bytes.len(),
        );

        Ok(RenderedReport {
            byte_size: bytes.len(),
            page_count: pages.len(),
            bytes,
            language: request.language,
            filtered: request.filters.is_active(),
            generated_at: now,
        })
    }

    /// Parse a JSON request and render it. The record count is checked
    /// against the cap before any record is converted.
    pub fn compose_json(&self, text: &str) -> Result<RenderedReport, Error> {
        let wire = WireRequest::parse(text)?;
        self.validate(wire.record_count()?)?;
        let request = wire.into_request()?;
        self.compose(&request)
    }
}
