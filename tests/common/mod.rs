#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use tally_pdf::layout::{Page, TextItem};
use tally_pdf::{Answer, FontSet, Language, ReportComposer, ReportConfig, ReportRequest, VoteRecord};

pub fn init_logging() {
    let _ = env_logger::try_init();
}

/// Fixed generation time so renders are reproducible.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap()
}

pub fn vote(name: &str, answer: Answer) -> VoteRecord {
    VoteRecord::new(name, "+1 (555) 010-2030", answer, "2024-03-08T10:15:00Z")
}

/// `yes` Yes votes followed by `no` No votes, named "Voter 000", "Voter 001", ...
pub fn votes(yes: usize, no: usize) -> Vec<VoteRecord> {
    (0..yes + no)
        .map(|i| {
            let answer = if i < yes { Answer::Yes } else { Answer::No };
            vote(&format!("Voter {i:03}"), answer)
        })
        .collect()
}

pub fn request(language: Language, records: Vec<VoteRecord>) -> ReportRequest {
    ReportRequest::new(language, records)
}

pub fn layout_with(config: &ReportConfig, request: &ReportRequest) -> Vec<Page> {
    let fonts = FontSet::standard();
    ReportComposer::new(&fonts, config)
        .layout(request, fixed_now())
        .expect("layout")
}

pub fn layout(request: &ReportRequest) -> Vec<Page> {
    layout_with(&ReportConfig::default(), request)
}

/// Texts on `page` whose visual text starts with `prefix`, top to bottom.
pub fn texts_starting<'p>(page: &'p Page, prefix: &str) -> Vec<&'p TextItem> {
    let mut found: Vec<&TextItem> = page.texts().filter(|t| t.text.starts_with(prefix)).collect();
    found.sort_by(|a, b| a.baseline.total_cmp(&b.baseline));
    found
}

/// Names of the table rows on each page, in drawing order. Only "Voter NNN"
/// cells count, so headings that start with "Voter" are skipped.
pub fn row_names(pages: &[Page]) -> Vec<Vec<String>> {
    pages
        .iter()
        .map(|p| {
            texts_starting(p, "Voter ")
                .into_iter()
                .filter(|t| t.text["Voter ".len()..].bytes().all(|b| b.is_ascii_digit()))
                .map(|t| t.text.clone())
                .collect()
        })
        .collect()
}

/// The text item drawn on the same row as `anchor` (same baseline) that equals `text`.
pub fn same_row<'p>(page: &'p Page, anchor: &TextItem, text: &str) -> Option<&'p TextItem> {
    page.texts()
        .find(|t| t.text == text && (t.baseline - anchor.baseline).abs() < 0.01)
}
