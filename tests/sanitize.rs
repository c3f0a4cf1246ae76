mod common;

use chrono::{TimeZone, Utc};
use tally_pdf::sanitize::{
    ELLIPSIS, FieldKind, PHONE_PLACEHOLDER, sanitize, sanitize_date, sanitize_phone, sanitize_record,
};
use tally_pdf::{Answer, VoteRecord};

#[test]
fn long_name_is_cut_to_limit_plus_ellipsis() {
    common::init_logging();
    let name = "a".repeat(150);
    let clean = sanitize(&name, FieldKind::Name);
    assert_eq!(clean.chars().count(), 100 + ELLIPSIS.chars().count());
    assert!(clean.ends_with(ELLIPSIS));
    assert_eq!(&clean[..100], &name[..100]);
}

#[test]
fn truncation_keeps_a_space_at_the_limit() {
    let name = format!("{} {}", "a".repeat(99), "b".repeat(50));
    let clean = sanitize(&name, FieldKind::Name);
    assert_eq!(clean, format!("{} {ELLIPSIS}", "a".repeat(99)));
    assert_eq!(clean.chars().count(), 100 + ELLIPSIS.chars().count());
}

#[test]
fn truncation_counts_characters_not_bytes() {
    let name = "م".repeat(120);
    let clean = sanitize(&name, FieldKind::Name);
    assert_eq!(clean.chars().count(), 103);
}

#[test]
fn name_at_limit_is_untouched() {
    let name = "b".repeat(100);
    assert_eq!(sanitize(&name, FieldKind::Name), name);
}

#[test]
fn control_characters_are_stripped_and_whitespace_collapsed() {
    assert_eq!(
        sanitize("  Ali\u{0000}ce \t\n  Smith\u{007F} ", FieldKind::Name),
        "Alice Smith"
    );
    assert_eq!(sanitize("\u{0007}\u{001B}", FieldKind::FreeText), "");
}

#[test]
fn search_label_limit_is_shorter_than_search_term() {
    let term = "x".repeat(80);
    assert_eq!(sanitize(&term, FieldKind::SearchTerm), term);
    assert_eq!(sanitize(&term, FieldKind::SearchLabel).chars().count(), 53);
}

#[test]
fn phone_keeps_only_dialing_characters() {
    assert_eq!(sanitize_phone(Some("+1 (555) 010-2030 ext.")), "+1 (555) 010-2030");
    assert_eq!(sanitize_phone(Some("tel:0123456789")), "0123456789");
}

#[test]
fn phone_placeholder_for_absent_or_empty() {
    assert_eq!(sanitize_phone(None), PHONE_PLACEHOLDER);
    assert_eq!(sanitize_phone(Some("")), PHONE_PLACEHOLDER);
    assert_eq!(sanitize_phone(Some("unknown")), PHONE_PLACEHOLDER);
}

#[test]
fn phone_is_bounded() {
    let phone = "1".repeat(30);
    assert_eq!(sanitize_phone(Some(&phone)), format!("{}{ELLIPSIS}", "1".repeat(20)));
}

#[test]
fn dates_parse_in_common_shapes() {
    let now = common::fixed_now();
    let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    assert_eq!(sanitize_date("2024-01-02T03:04:05Z", now), expected);
    assert_eq!(sanitize_date("2024-01-02T05:04:05+02:00", now), expected);
    assert_eq!(sanitize_date("2024-01-02 03:04:05", now), expected);
    assert_eq!(sanitize_date("1704164645000", now), expected);
    assert_eq!(
        sanitize_date("2024-01-02", now),
        Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
    );
}

#[test]
fn bad_date_falls_back_to_now() {
    common::init_logging();
    let now = common::fixed_now();
    assert_eq!(sanitize_date("yesterday-ish", now), now);
    assert_eq!(sanitize_date("", now), now);
}

#[test]
fn record_is_cleaned_field_by_field() {
    let now = common::fixed_now();
    let raw = VoteRecord {
        name: "  Omar\u{0000}  ".into(),
        phone: None,
        answer: Answer::Other(format!("maybe{}", "!".repeat(300))),
        created_at: "not a date".into(),
    };
    let clean = sanitize_record(&raw, now);
    assert_eq!(clean.name, "Omar");
    assert_eq!(clean.phone, PHONE_PLACEHOLDER);
    assert_eq!(clean.created_at, now);
    match clean.answer {
        Answer::Other(s) => assert_eq!(s.chars().count(), 203),
        other => panic!("unexpected answer {other:?}"),
    }
}
