use chrono::{DateTime, TimeDelta, Utc};
use rs_sheetpeek::{ContentCategory, ElementId, InteractionGate, Options, Page, Verdict};

fn at(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(1_700_000_000_000 + ms).unwrap_or_default()
}

fn cells() -> (Option<ElementId>, Option<ElementId>) {
    let page = Page::from_html(
        r#"<table><tr><td class="sheet-cell" id="a">A</td><td class="sheet-cell" id="b">B</td></tr></table>"#,
    );
    let id = |sel: &str| page.find(sel).ok().flatten().and_then(|s| ElementId::of(&s));
    (id("#a"), id("#b"))
}

#[test]
fn same_element_is_debounced_for_the_element_window() {
    let (a, _) = cells();
    let mut gate = InteractionGate::default();

    assert!(gate.admit("first", ContentCategory::Text, a.as_ref(), at(0)).is_accept());
    assert_eq!(
        gate.admit("second", ContentCategory::Text, a.as_ref(), at(100)),
        Verdict::SameElementRepeat
    );
    assert!(gate.admit("second", ContentCategory::Text, a.as_ref(), at(600)).is_accept());
    assert_eq!(gate.state().last_content, "second");
}

#[test]
fn identical_text_on_another_element_is_accepted() {
    let (a, b) = cells();
    let mut gate = InteractionGate::default();
    let text = "hello world this is a test";

    assert!(gate.admit(text, ContentCategory::Text, a.as_ref(), at(0)).is_accept());
    assert!(gate.admit(text, ContentCategory::Text, b.as_ref(), at(10)).is_accept());
    assert_eq!(gate.state().last_element, b);
}

#[test]
fn should_process_matches_admit_without_recording() {
    let (a, _) = cells();
    let mut gate = InteractionGate::default();

    assert!(gate.should_process("# Title", a.as_ref(), at(0)));
    assert_eq!(gate.state().last_content, "");

    gate.record("# Title", a.as_ref(), at(0));
    assert!(!gate.should_process("# Title", a.as_ref(), at(300)));
    assert!(!gate.should_process("# Title", a.as_ref(), at(1500)));
    assert!(gate.should_process("# Title", a.as_ref(), at(2500)));
}

#[test]
fn rejected_candidates_leave_the_record_alone() {
    let (a, _) = cells();
    let mut gate = InteractionGate::default();
    assert!(gate.admit("kept", ContentCategory::Text, a.as_ref(), at(0)).is_accept());
    let before = gate.state().clone();

    let _ = gate.admit("dropped", ContentCategory::Text, a.as_ref(), at(50));
    let _ = gate.admit("", ContentCategory::Empty, None, at(5000));
    assert_eq!(gate.state(), &before);
}

#[test]
fn structured_or_long_content_is_significant() {
    let gate = InteractionGate::default();
    assert!(gate.evaluate("x", ContentCategory::Code, None, at(0)).is_accept());
    assert!(gate.evaluate("a\tb", ContentCategory::Table, None, at(0)).is_accept());
    assert!(gate.evaluate("x", ContentCategory::Text, None, at(0)).is_accept());
    assert_eq!(
        gate.evaluate("", ContentCategory::Empty, None, at(0)),
        Verdict::Insignificant
    );
}

#[test]
fn windows_follow_options() {
    let (a, _) = cells();
    let options = Options {
        same_element_window_ms: 50,
        same_content_window_ms: 100,
        ..Options::default()
    };
    let mut gate = InteractionGate::new(&options);

    assert!(gate.admit("same", ContentCategory::Text, a.as_ref(), at(0)).is_accept());
    assert_eq!(
        gate.admit("same", ContentCategory::Text, a.as_ref(), at(70)),
        Verdict::SameContentRepeat
    );
    assert!(gate.admit("same", ContentCategory::Text, a.as_ref(), at(150)).is_accept());
}

#[test]
fn clock_going_backwards_counts_as_no_time_elapsed() {
    let (a, _) = cells();
    let mut gate = InteractionGate::default();
    assert!(gate.admit("later", ContentCategory::Text, a.as_ref(), at(1000)).is_accept());

    let earlier = at(1000) - TimeDelta::milliseconds(900);
    assert_eq!(
        gate.admit("other", ContentCategory::Text, a.as_ref(), earlier),
        Verdict::SameElementRepeat
    );
    assert_eq!(gate.state().last_timestamp, at(1000));
}
