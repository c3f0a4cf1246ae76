//! Fixed report strings per language.

use chrono::NaiveDate;

use crate::model::{Answer, Language};

/// Every fixed string the report draws, in one language.
#[derive(Debug)]
pub struct Labels {
    pub title: &'static str,
    pub total_votes: &'static str,
    pub breakdown_heading: &'static str,
    pub filters_heading: &'static str,
    pub filter_answer: &'static str,
    pub filter_search: &'static str,
    pub table_heading: &'static str,
    pub col_name: &'static str,
    pub col_phone: &'static str,
    pub col_answer: &'static str,
    pub col_date: &'static str,
    pub no_votes: &'static str,
    pub generated_on: &'static str,
    pub yes: &'static str,
    pub no: &'static str,
    votes_word: &'static str,
    showing: fn(u64, u64) -> String,
    page_of: fn(usize, usize) -> String,
}

fn en_showing(shown: u64, total: u64) -> String {
    format!("Showing {shown} of {total} votes")
}

fn en_page_of(page: usize, total: usize) -> String {
    format!("Page {page} of {total}")
}

fn ar_showing(shown: u64, total: u64) -> String {
    format!("عرض {shown} من {total} صوت")
}

fn ar_page_of(page: usize, total: usize) -> String {
    format!("صفحة {page} من {total}")
}

static EN: Labels = Labels {
    title: "Poll Results",
    total_votes: "Total Votes",
    breakdown_heading: "Vote Breakdown",
    filters_heading: "Filters",
    filter_answer: "Answer",
    filter_search: "Search",
    table_heading: "Voter Details",
    col_name: "Name",
    col_phone: "Phone",
    col_answer: "Answer",
    col_date: "Date",
    no_votes: "No votes found",
    generated_on: "Generated on",
    yes: "Yes",
    no: "No",
    votes_word: "votes",
    showing: en_showing,
    page_of: en_page_of,
};

static AR: Labels = Labels {
    title: "نتائج التصويت",
    total_votes: "إجمالي الأصوات",
    breakdown_heading: "الأصوات حسب الخيار",
    filters_heading: "عوامل التصفية",
    filter_answer: "الإجابة",
    filter_search: "البحث",
    table_heading: "تفاصيل المصوتين",
    col_name: "الاسم",
    col_phone: "رقم الهاتف",
    col_answer: "الإجابة",
    col_date: "وقت التصويت",
    no_votes: "لم يتم العثور على أصوات",
    generated_on: "تم الإنشاء في",
    yes: "نعم",
    no: "لا",
    votes_word: "صوت",
    showing: ar_showing,
    page_of: ar_page_of,
};

impl Labels {
    pub fn for_language(language: Language) -> &'static Labels {
        match language {
            Language::En => &EN,
            Language::Ar => &AR,
        }
    }

    /// Localized display name of an answer. Free-form answers show as given.
    pub fn answer<'a>(&self, answer: &'a Answer) -> &'a str {
        match answer {
            Answer::Yes => self.yes,
            Answer::No => self.no,
            Answer::Other(s) => s.as_str(),
        }
    }

    /// Subtitle line: the total, plus the filtered count when it differs.
    pub fn subtitle(&self, total: u64, filtered: u64) -> String {
        if filtered != total {
            (self.showing)(filtered, total)
        } else {
            format!("{}: {total}", self.total_votes)
        }
    }

    /// "Yes: 3 votes (60.0%)"
    pub fn breakdown_line(&self, label: &str, count: usize, percentage: f64) -> String {
        format!("{label}: {count} {} ({percentage:.1}%)", self.votes_word)
    }

    pub fn page_of(&self, page: usize, total: usize) -> String {
        (self.page_of)(page, total)
    }
}

/// Attachment filename for a report generated on `date`.
pub fn suggested_filename(language: Language, filtered: bool, date: NaiveDate) -> String {
    let stem = match language {
        Language::En => "poll-results",
        Language::Ar => "نتائج-التصويت",
    };
    let suffix = if filtered { "-filtered" } else { "" };
    format!("{stem}-{}{suffix}.pdf", date.format("%Y-%m-%d"))
}

