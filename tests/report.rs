mod common;

use rayon::prelude::*;
use serde_json::json;
use tally_pdf::i18n::{Labels, suggested_filename};
use tally_pdf::sections::breakdown;
use tally_pdf::sanitize::sanitize_record;
use tally_pdf::text::prepare;
use tally_pdf::{
    Answer, Error, FontConfig, FontSet, Language, ReportComposer, ReportConfig, ReportFilters,
    ReportRequest,
};

#[test]
fn three_yes_two_no_english() {
    common::init_logging();
    let request = common::request(Language::En, common::votes(3, 2));
    let pages = common::layout(&request);

    assert_eq!(pages.len(), 1);
    assert!(pages[0].contains_text("Yes: 3 votes (60.0%)"));
    assert!(pages[0].contains_text("No: 2 votes (40.0%)"));
    assert!(pages[0].contains_text("Total Votes: 5"));

    let rows = common::row_names(&pages);
    assert_eq!(rows[0].len(), 5);

    let fonts = FontSet::standard();
    let config = ReportConfig::default();
    let report = ReportComposer::new(&fonts, &config)
        .compose_at(&request, common::fixed_now())
        .unwrap();
    assert_eq!(report.page_count, 1);
    assert_eq!(report.byte_size, report.bytes.len());
    assert!(report.bytes.starts_with(b"%PDF-"));
    assert_eq!(report.suggested_filename(), "poll-results-2024-03-09.pdf");
}

#[test]
fn three_yes_two_no_arabic() {
    common::init_logging();
    let request = common::request(Language::Ar, common::votes(3, 2));
    let pages = common::layout(&request);
    let labels = Labels::for_language(Language::Ar);

    assert_eq!(pages.len(), 1);
    let yes_line = labels.breakdown_line(labels.yes, 3, 60.0);
    assert!(pages[0].contains_text(&prepare(&yes_line).visual));
    assert!(pages[0].contains_text(&prepare(labels.title).visual));
    assert!(pages[0].contains_text(&prepare(&labels.page_of(1, 1)).visual));
}

#[test]
fn breakdown_percentages_sum_to_100() {
    let now = common::fixed_now();
    for (y, n) in [(1, 2), (3, 4), (1, 6), (2, 1), (5, 0), (333, 667), (1, 1)] {
        let records: Vec<_> = common::votes(y, n)
            .iter()
            .map(|r| sanitize_record(r, now))
            .collect();
        let entries = breakdown(&records);
        let sum: f64 = entries.iter().map(|e| e.percentage).sum();
        assert!((sum - 100.0).abs() <= 0.1 + 1e-9, "{y}/{n} sums to {sum}");
        assert_eq!(entries[0].answer, if y > 0 { Answer::Yes } else { Answer::No });
    }
}

#[test]
fn breakdown_orders_yes_no_then_others() {
    let now = common::fixed_now();
    let mut raw = common::votes(1, 1);
    raw.insert(0, common::vote("Zed", Answer::Other("Maybe".into())));
    let records: Vec<_> = raw.iter().map(|r| sanitize_record(r, now)).collect();
    let order: Vec<Answer> = breakdown(&records).into_iter().map(|e| e.answer).collect();
    assert_eq!(order, vec![Answer::Yes, Answer::No, Answer::Other("Maybe".into())]);
}

#[test]
fn one_over_the_cap_is_rejected_without_output() {
    common::init_logging();
    let fonts = FontSet::standard();
    let config = ReportConfig::default();
    let composer = ReportComposer::new(&fonts, &config);

    let records = vec![common::vote("x", Answer::Yes); config.record_cap + 1];
    let request = common::request(Language::En, records);
    match composer.compose(&request) {
        Err(Error::TooManyRecords { count, cap }) => {
            assert_eq!(count, config.record_cap + 1);
            assert_eq!(cap, config.record_cap);
        }
        other => panic!("expected TooManyRecords, got {other:?}"),
    }
    assert!(matches!(
        composer.layout(&request, common::fixed_now()),
        Err(Error::TooManyRecords { .. })
    ));
}

#[test]
fn cap_is_checked_on_json_before_records_are_read() {
    let fonts = FontSet::standard();
    let config = ReportConfig {
        record_cap: 3,
        ..ReportConfig::default()
    };
    // the records are not even objects; the count alone rejects the request
    let body = json!({ "language": "en", "records": [1, 2, 3, 4] }).to_string();
    let result = ReportComposer::new(&fonts, &config).compose_json(&body);
    assert!(matches!(result, Err(Error::TooManyRecords { count: 4, cap: 3 })));
}

#[test]
fn records_must_be_a_list() {
    let fonts = FontSet::standard();
    let config = ReportConfig::default();
    let composer = ReportComposer::new(&fonts, &config);

    for body in [
        json!({ "language": "en", "records": "all of them" }),
        json!({ "language": "en", "records": { "name": "x" } }),
        json!({ "language": "en" }),
        json!({ "language": "en", "records": [ "not a record" ] }),
        json!({ "language": "fr", "records": [] }),
        json!([1, 2, 3]),
    ] {
        let result = composer.compose_json(&body.to_string());
        assert!(matches!(result, Err(Error::InvalidInput(_))), "{body} gave {result:?}");
    }
    assert!(matches!(composer.compose_json("{not json"), Err(Error::Json(_))));
}

#[test]
fn json_request_fields_and_aliases() {
    let body = json!({
        "language": "ar",
        "answer": "نعم",
        "search": "  ali  ",
        "totalCount": 12,
        "filteredCount": 2,
        "records": [
            { "name": "Ali", "phone": 12345, "answer": "Yes", "createdAt": 1704164645000i64 },
            { "name": "علي", "phone": "+20 100 000", "answer": "نعم", "createdAt": "2024-01-02T03:04:05Z" }
        ]
    });
    let request = ReportRequest::from_json(&body.to_string()).unwrap();
    assert_eq!(request.language, Language::Ar);
    assert_eq!(request.total_count, 12);
    assert_eq!(request.filtered_count, 2);
    assert_eq!(request.filters.answer, Some(Answer::Yes));
    assert_eq!(request.filters.search.as_deref(), Some("ali"));
    assert_eq!(request.records[0].phone, None);
    assert_eq!(request.records[1].answer, Answer::Yes);

    let now = common::fixed_now();
    let first = sanitize_record(&request.records[0], now);
    let second = sanitize_record(&request.records[1], now);
    assert_eq!(first.phone, "N/A");
    assert_eq!(first.created_at, second.created_at);
}

#[test]
fn search_term_is_bounded_at_intake() {
    let body = json!({ "searchTerm": format!("  {}\u{0007}", "q".repeat(150)), "records": [] });
    let request = ReportRequest::from_json(&body.to_string()).unwrap();
    let search = request.filters.search.unwrap();
    assert_eq!(search, format!("{}...", "q".repeat(100)));

    let blank = json!({ "search": " \u{0000} ", "records": [] });
    let request = ReportRequest::from_json(&blank.to_string()).unwrap();
    assert_eq!(request.filters.search, None);
}

#[test]
fn all_answer_filter_means_unfiltered() {
    for filter in ["all", "All", "الكل", ""] {
        let body = json!({ "answerFilter": filter, "records": [] });
        let request = ReportRequest::from_json(&body.to_string()).unwrap();
        assert_eq!(request.language, Language::En);
        assert_eq!(request.filters, ReportFilters::default());
    }
}

#[test]
fn filtered_report_gets_filtered_filename() {
    let fonts = FontSet::standard();
    let config = ReportConfig::default();
    let request = common::request(Language::En, common::votes(1, 0)).with_filters(ReportFilters {
        answer: Some(Answer::Yes),
        search: None,
    });
    let report = ReportComposer::new(&fonts, &config)
        .compose_at(&request, common::fixed_now())
        .unwrap();
    assert_eq!(report.suggested_filename(), "poll-results-2024-03-09-filtered.pdf");

    let date = common::fixed_now().date_naive();
    assert_eq!(
        suggested_filename(Language::Ar, false, date),
        "نتائج-التصويت-2024-03-09.pdf"
    );
}

#[test]
fn labels_follow_language() {
    let en = Labels::for_language(Language::En);
    assert_eq!(en.subtitle(5, 5), "Total Votes: 5");
    assert_eq!(en.subtitle(10, 4), "Showing 4 of 10 votes");
    assert_eq!(en.page_of(2, 7), "Page 2 of 7");

    let ar = Labels::for_language(Language::Ar);
    assert_eq!(ar.col_name, "الاسم");
    assert_eq!(ar.answer(&Answer::No), "لا");
    assert_eq!(ar.answer(&Answer::Other("x".into())), "x");
}

#[test]
fn same_request_renders_identical_bytes() {
    let fonts = FontSet::standard();
    let config = ReportConfig::default();
    let composer = ReportComposer::new(&fonts, &config);
    let request = common::request(Language::Ar, common::votes(50, 30));
    let a = composer.compose_at(&request, common::fixed_now()).unwrap();
    let b = composer.compose_at(&request, common::fixed_now()).unwrap();
    assert_eq!(a.page_count, b.page_count);
    assert_eq!(a.bytes, b.bytes);
}

#[test]
fn concurrent_renders_share_one_font_set() {
    common::init_logging();
    let fonts = FontSet::standard();
    let config = ReportConfig::default();
    let composer = ReportComposer::new(&fonts, &config);

    let requests: Vec<ReportRequest> = (0..16)
        .map(|i| {
            let language = if i % 2 == 0 { Language::En } else { Language::Ar };
            common::request(language, common::votes(10 + i * 7, 5 + i * 3))
        })
        .collect();

    let sequential: Vec<usize> = requests
        .iter()
        .map(|r| composer.compose_at(r, common::fixed_now()).unwrap().page_count)
        .collect();
    let parallel: Vec<usize> = requests
        .par_iter()
        .map(|r| composer.compose_at(r, common::fixed_now()).unwrap().page_count)
        .collect();
    assert_eq!(sequential, parallel);
}

#[test]
fn missing_arabic_font_is_fatal() {
    common::init_logging();
    let config = FontConfig {
        arabic_path: Some("/nonexistent/arabic-font.ttf".into()),
        ..FontConfig::default()
    };
    assert!(matches!(FontSet::load(&config), Err(Error::ResourceUnavailable(_))));
}

#[test]
fn report_writes_to_file() {
    let dir = std::env::temp_dir().join(format!("tally-pdf-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let input = dir.join("request.json");
    let output = dir.join("report.pdf");
    let body = json!({
        "language": "en",
        "records": [ { "name": "Ann", "phone": "555", "answer": "No", "createdAt": "2024-02-01T08:00:00Z" } ]
    });
    std::fs::write(&input, body.to_string()).unwrap();

    let fonts = FontSet::standard();
    let report =
        tally_pdf::render_report_to_file(&input, &output, &fonts, &ReportConfig::default()).unwrap();
    let written = std::fs::read(&output).unwrap();
    assert_eq!(written.len(), report.byte_size);
    assert_eq!(report.page_count, 1);
    std::fs::remove_dir_all(&dir).ok();
}
