use chrono::Utc;

use gm_terminal::elapsed::{
    elapsed_display, format_join_date, humanize_last_online, LastSeenClock,
};

#[test]
fn formats_zero_padded_fields() {
    // 1h 2m 3s after the reference.
    let reference = 1_000;
    let now_ms = reference * 1000 + 3_723_000;
    assert_eq!(elapsed_display(now_ms, reference), "01:02:03");
}

#[test]
fn hours_grow_past_twenty_four() {
    let reference = 0;
    assert_eq!(elapsed_display(30 * 3_600_000, reference), "30:00:00");
    assert_eq!(elapsed_display(125 * 3_600_000, reference), "125:00:00");
}

#[test]
fn one_second_increments_with_carry() {
    let reference = 0;
    let now_ms = 3_599_000;
    assert_eq!(elapsed_display(now_ms, reference), "00:59:59");
    assert_eq!(elapsed_display(now_ms + 1_000, reference), "01:00:00");
}

#[test]
fn future_reference_clamps_to_zero() {
    assert_eq!(elapsed_display(0, 60), "00:00:00");
}

#[test]
fn clock_without_reference_is_empty_and_idle() {
    let mut clock = LastSeenClock::default();
    clock.set_reference(None);

    assert_eq!(clock.display(), "");
    assert!(!clock.is_ticking());

    // Ticking an idle clock stays a no-op.
    clock.tick();
    assert_eq!(clock.display(), "");
    assert!(!clock.is_ticking());
}

#[test]
fn clock_with_reference_displays_immediately() {
    let mut clock = LastSeenClock::default();
    let reference = Utc::now().timestamp() - 3_660;
    clock.set_reference(Some(reference));

    // 1h 1m ago, give or take the test's own runtime.
    assert!(clock.display().starts_with("01:01:0"), "{}", clock.display());
    assert!(clock.is_ticking());
}

#[test]
fn clearing_reference_releases_cadence() {
    let mut clock = LastSeenClock::default();
    clock.set_reference(Some(Utc::now().timestamp()));
    assert!(clock.is_ticking());

    clock.clear();

    assert_eq!(clock.display(), "");
    assert!(!clock.is_ticking());
}

#[test]
fn humanizes_last_online_buckets() {
    let now_ms = 1_700_000_000_000;
    let now_secs = now_ms / 1000;

    assert_eq!(humanize_last_online(now_ms, now_secs - 1_800), "Online recently");
    assert_eq!(humanize_last_online(now_ms, now_secs - 5 * 3_600), "5 hours ago");
    assert_eq!(humanize_last_online(now_ms, now_secs - 3 * 86_400), "3 days ago");
    assert_eq!(humanize_last_online(now_ms, now_secs - 65 * 86_400), "2 months ago");
}

#[test]
fn formats_join_date() {
    // 2014-06-05T00:00:00Z
    assert_eq!(format_join_date(1_401_926_400), "June 5, 2014");
}
