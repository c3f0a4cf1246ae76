//! Cleaning and bounding of per-record text before it reaches layout.
//!
//! Nothing here fails: every input produces a best-effort value, and the
//! anomalies worth knowing about are logged.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::model::{Answer, VoteRecord};

/// Appended to any value cut short by its length limit.
pub const ELLIPSIS: &str = "...";

/// Placeholder for an absent or unusable phone number.
pub const PHONE_PLACEHOLDER: &str = "N/A";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Name,
    Phone,
    /// Search term as carried in the request.
    SearchTerm,
    /// Search term as echoed in the filter summary line.
    SearchLabel,
    FreeText,
}

impl FieldKind {
    /// Maximum length in characters, not counting the ellipsis.
    pub const fn max_chars(self) -> usize {
        match self {
            FieldKind::Name => 100,
            FieldKind::Phone => 20,
            FieldKind::SearchTerm => 100,
            FieldKind::SearchLabel => 50,
            FieldKind::FreeText => 200,
        }
    }
}

fn is_stripped_control(c: char) -> bool {
    let cp = c as u32;
    (cp < 0x20 && !matches!(c, '\t' | '\n' | '\r')) || cp == 0x7F
}

/// Strip control characters, collapse whitespace runs to one space, trim,
/// then truncate to the kind's limit.
pub fn sanitize(field: &str, kind: FieldKind) -> String {
    let mut out = String::with_capacity(field.len());
    let mut pending_space = false;
    for c in field.chars().filter(|&c| !is_stripped_control(c)) {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }
    truncate_chars(out, kind.max_chars())
}

fn truncate_chars(s: String, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s,
        Some((cut, _)) => {
            let mut t = s[..cut].to_string();
            t.push_str(ELLIPSIS);
            t
        }
    }
}

/// Keep digits, `+`, `-`, parentheses and spaces; `"N/A"` when nothing usable remains.
pub fn sanitize_phone(phone: Option<&str>) -> String {
    let Some(raw) = phone else {
        return PHONE_PLACEHOLDER.to_string();
    };
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' '))
        .collect();
    let cleaned = sanitize(&kept, FieldKind::Phone);
    if cleaned.is_empty() {
        PHONE_PLACEHOLDER.to_string()
    } else {
        cleaned
    }
}

/// Parse a record timestamp. Unparseable input is replaced with `now` and logged.
pub fn sanitize_date(raw: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let text = raw.trim();
    if let Some(dt) = parse_timestamp(text) {
        return dt;
    }
    log::warn!("Unparseable timestamp {text:?}, substituting generation time");
    now
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }
    if let Ok(ms) = text.parse::<i64>() {
        return DateTime::from_timestamp_millis(ms);
    }
    None
}

/// A record after sanitizing, ready for layout.
#[derive(Clone, Debug, PartialEq)]
pub struct CleanRecord {
    pub name: String,
    pub phone: String,
    pub answer: Answer,
    pub created_at: DateTime<Utc>,
}

pub fn sanitize_record(record: &VoteRecord, now: DateTime<Utc>) -> CleanRecord {
    let answer = match &record.answer {
        Answer::Other(s) => Answer::Other(sanitize(s, FieldKind::FreeText)),
        a => a.clone(),
    };
    CleanRecord {
        name: sanitize(&record.name, FieldKind::Name),
        phone: sanitize_phone(record.phone.as_deref()),
        answer,
        created_at: sanitize_date(&record.created_at, now),
    }
}
