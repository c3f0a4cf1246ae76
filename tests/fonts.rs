mod common;

use tally_pdf::fonts::FontRole;
use tally_pdf::{Error, FontConfig, FontSet, Language, ReportComposer, ReportConfig};

#[test]
fn installed_arabic_font_is_found_and_embedded() {
    common::init_logging();
    let fonts = match FontSet::load(&FontConfig::default()) {
        Ok(fonts) => fonts,
        Err(Error::ResourceUnavailable(msg)) => {
            println!("No Arabic-capable font installed ({msg}), skipping.");
            return;
        }
        Err(e) => panic!("unexpected error: {e}"),
    };

    assert_eq!(fonts.select("نعم", true), FontRole::Arabic);
    assert!(fonts.text_width(FontRole::Arabic, "نعم", 12.0) > 0.0);

    let config = ReportConfig::default();
    let request = common::request(Language::Ar, common::votes(3, 2));
    let report = ReportComposer::new(&fonts, &config)
        .compose_at(&request, common::fixed_now())
        .unwrap();
    assert_eq!(report.page_count, 1);
    let has = |needle: &[u8]| report.bytes.windows(needle.len()).any(|w| w == needle);
    assert!(has(b"/FontFile2"));
    assert!(has(b"/ToUnicode"));
}
