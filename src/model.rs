use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;
use crate::sanitize::{FieldKind, sanitize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Language::En),
            "ar" => Some(Language::Ar),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Answer {
    Yes,
    No,
    /// Any other value found in the data. Rendered as-is with a neutral color.
    Other(String),
}

impl Answer {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Yes" | "yes" | "YES" | "نعم" => Answer::Yes,
            "No" | "no" | "NO" | "لا" => Answer::No,
            other => Answer::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Answer::Yes => "Yes",
            Answer::No => "No",
            Answer::Other(s) => s,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One vote as supplied by the caller. Fields are raw; the sanitizer cleans
/// them before anything is laid out.
#[derive(Clone, Debug, PartialEq)]
pub struct VoteRecord {
    pub name: String,
    /// `None` when the caller had no phone or sent a non-string value.
    pub phone: Option<String>,
    pub answer: Answer,
    /// Timestamp text as received (RFC 3339 preferred).
    pub created_at: String,
}

impl VoteRecord {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        answer: Answer,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: Some(phone.into()),
            answer,
            created_at: created_at.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportFilters {
    pub answer: Option<Answer>,
    pub search: Option<String>,
}

impl ReportFilters {
    /// True when a non-default filter is in effect.
    pub fn is_active(&self) -> bool {
        self.answer.is_some() || self.search.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReportRequest {
    pub language: Language,
    pub filters: ReportFilters,
    /// Already filtered and ordered by the caller (newest first, typically).
    pub records: Vec<VoteRecord>,
    pub total_count: u64,
    pub filtered_count: u64,
}

impl ReportRequest {
    /// Unfiltered request whose counts are taken from `records`.
    pub fn new(language: Language, records: Vec<VoteRecord>) -> Self {
        let n = records.len() as u64;
        Self {
            language,
            filters: ReportFilters::default(),
            records,
            total_count: n,
            filtered_count: n,
        }
    }

    pub fn with_filters(mut self, filters: ReportFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn from_json(text: &str) -> Result<Self, Error> {
        WireRequest::parse(text)?.into_request()
    }
}

/// The request as it arrives over the wire, before records are converted.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireRequest {
    #[serde(default)]
    language: Option<String>,
    #[serde(default, alias = "answer")]
    answer_filter: Option<String>,
    #[serde(default, alias = "search")]
    search_term: Option<String>,
    #[serde(default)]
    records: Value,
    #[serde(default)]
    total_count: Option<u64>,
    #[serde(default)]
    filtered_count: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireRecord {
    #[serde(default)]
    name: Value,
    #[serde(default)]
    phone: Value,
    #[serde(default)]
    answer: Value,
    #[serde(default, alias = "created_at", alias = "timestamp")]
    created_at: Value,
}

fn is_all_filter(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v.eq_ignore_ascii_case("all") || v == "الكل"
}

fn timestamp_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n
            .as_i64()
            .and_then(chrono::DateTime::from_timestamp_millis)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

impl WireRequest {
    pub(crate) fn parse(text: &str) -> Result<Self, Error> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(Error::InvalidInput("request must be a JSON object".into()));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Number of records, or `InvalidInput` when `records` is not a list.
    pub(crate) fn record_count(&self) -> Result<usize, Error> {
        match &self.records {
            Value::Array(items) => Ok(items.len()),
            Value::Null => Err(Error::InvalidInput("missing `records`".into())),
            other => Err(Error::InvalidInput(format!(
                "`records` must be a list, got {}",
                json_kind(other)
            ))),
        }
    }

    pub(crate) fn into_request(self) -> Result<ReportRequest, Error> {
        self.record_count()?;
        let language = match self.language.as_deref() {
            None => Language::En,
            Some(code) => Language::parse(code).ok_or_else(|| {
                Error::InvalidInput(format!("unsupported language {code:?}"))
            })?,
        };

        let items = match self.records {
            Value::Array(items) => items,
            _ => Vec::new(),
        };
        let count = items.len();
        let mut records = Vec::with_capacity(count);
        for (i, item) in items.into_iter().enumerate() {
            if !item.is_object() {
                return Err(Error::InvalidInput(format!(
                    "record {i} must be an object, got {}",
                    json_kind(&item)
                )));
            }
            let wire: WireRecord = serde_json::from_value(item)?;
            records.push(VoteRecord {
                name: match wire.name {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    _ => String::new(),
                },
                phone: match wire.phone {
                    Value::String(s) => Some(s),
                    _ => None,
                },
                answer: match &wire.answer {
                    Value::String(s) => Answer::from_label(s),
                    _ => Answer::Other(String::new()),
                },
                created_at: timestamp_text(&wire.created_at),
            });
        }

        let filters = ReportFilters {
            answer: self
                .answer_filter
                .filter(|a| !is_all_filter(a))
                .map(|a| Answer::from_label(&a)),
            search: self
                .search_term
                .map(|s| sanitize(&s, FieldKind::SearchTerm))
                .filter(|s| !s.is_empty()),
        };

        Ok(ReportRequest {
            language,
            filters,
            total_count: self.total_count.unwrap_or(count as u64),
            filtered_count: self.filtered_count.unwrap_or(count as u64),
            records,
        })
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
