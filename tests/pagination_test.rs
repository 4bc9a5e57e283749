//! Pagination coercion of untrusted query input.

use videotube::response::{PageQuery, Pagination};

fn coerced(page: Option<&str>, limit: Option<&str>) -> Pagination {
    Pagination::from_query(&PageQuery {
        page: page.map(str::to_string),
        limit: limit.map(str::to_string),
    })
}

#[test]
fn garbage_input_never_fails() {
    for junk in ["", "  ", "abc", "1.5", "1e3", "-1", "0", "9999999999999999999999"] {
        let pg = coerced(Some(junk), Some(junk));
        assert_eq!(pg, Pagination::default(), "input {junk:?} should coerce to defaults");
    }
}

#[test]
fn whitespace_padded_numbers_are_accepted() {
    let pg = coerced(Some(" 2 "), Some(" 30 "));
    assert_eq!(pg.page, 2);
    assert_eq!(pg.limit, 30);
}

#[test]
fn offset_is_window_start() {
    assert_eq!(coerced(Some("1"), Some("10")).offset(), 0);
    assert_eq!(coerced(Some("2"), Some("10")).offset(), 10);
    assert_eq!(coerced(Some("5"), Some("7")).offset(), 28);
}

#[test]
fn mixed_valid_and_invalid_fields_coerce_independently() {
    let pg = coerced(Some("4"), Some("nope"));
    assert_eq!(pg.page, 4);
    assert_eq!(pg.limit, Pagination::DEFAULT_LIMIT);
}
