use super::*;
use crate::search::SearchMode;

#[test]
fn test_empty_input_means_all_courts() {
    for text in ["", "   ", " , "] {
        let filter = DirectCourtCodes.resolve(text);
        assert!(filter.valid);
        assert_eq!(filter.court_codes, "");
        assert!(filter.description.contains("All courts"));
    }
}

#[test]
fn test_codes_pass_through() {
    let filter = DirectCourtCodes.resolve("ca9 cal");
    assert!(filter.valid);
    assert_eq!(filter.court_codes, "ca9 cal");
    assert_eq!(filter.codes().collect::<Vec<_>>(), vec!["ca9", "cal"]);
}

#[test]
fn test_codes_are_normalized() {
    let filter = DirectCourtCodes.resolve("SCOTUS,  Ca2");
    assert!(filter.valid);
    assert_eq!(filter.court_codes, "scotus ca2");
}

#[test]
fn test_free_text_is_rejected() {
    let filter = DirectCourtCodes.resolve("9th Circuit's appeals");
    assert!(!filter.valid);
    assert_eq!(filter.court_codes, "");
    assert!(filter.description.contains("Circuit's"));
}

#[test]
fn test_apply_sets_court_only_when_valid() {
    let request = SearchRequest::new("q", SearchMode::Keyword);

    let applied = DirectCourtCodes.resolve("ca9").apply(request.clone());
    assert_eq!(applied.court, "ca9");

    let untouched = DirectCourtCodes.resolve("not-a-code").apply(request.court("cal"));
    assert_eq!(untouched.court, "cal");
}
