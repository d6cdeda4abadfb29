use query_pilot::paging::PageState;
use rstest::rstest;

#[rstest]
#[case(0, 50, 120, true)] // full first page of three
#[case(50, 50, 120, true)] // full middle page
#[case(100, 20, 120, false)] // short final page closes the range
#[case(0, 50, 50, false)] // single full page
#[case(0, 0, 0, false)] // empty table
fn next_is_gated_by_shown_rows_against_the_total(
    #[case] offset: u64,
    #[case] page_len: usize,
    #[case] total: u64,
    #[case] can_advance: bool,
) {
    let page = PageState::reset(50).apply_page(page_len, total, 50, offset);
    assert_eq!(page.can_advance(), can_advance);
    assert_eq!(page.advance().is_some(), can_advance);
}

#[rstest]
#[case(0, false)]
#[case(50, true)]
#[case(100, true)]
fn previous_is_gated_by_offset_only(#[case] offset: u64, #[case] can_retreat: bool) {
    let page = PageState::reset(50).apply_page(50, 200, 50, offset);
    assert_eq!(page.can_retreat(), can_retreat);
}

#[rstest]
#[case(25)]
#[case(50)]
#[case(100)]
fn advance_then_retreat_round_trips(#[case] limit: u64) {
    let page = PageState::reset(limit).apply_page(limit as usize, 1000, limit, 0);
    let forward = page.advance().expect("room to advance");
    let back = forward.retreat().expect("room to retreat");
    assert_eq!(back.offset, page.offset);
}

#[rstest]
#[case(0, 50, 120, "Showing 1 to 50 of 120 rows")]
#[case(100, 20, 120, "Showing 101 to 120 of 120 rows")]
#[case(75, 25, 80, "Showing 76 to 80 of 80 rows")]
fn displayed_range_is_one_based_and_clamped(
    #[case] offset: u64,
    #[case] page_len: usize,
    #[case] total: u64,
    #[case] expected: &str,
) {
    let page = PageState::reset(50).apply_page(page_len, total, 50, offset);
    assert_eq!(page.summary(), expected);
}

#[test]
fn server_echo_overrides_the_requested_values() {
    // Request asked for limit 50 at offset 60; the server clamped both.
    let page = PageState::reset(50).apply_page(40, 100, 40, 40);
    assert_eq!(page.limit, 40);
    assert_eq!(page.offset, 40);
    assert!(page.can_advance());
}
