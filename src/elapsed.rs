use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Formats the time elapsed since `last_online_secs` (epoch seconds) as
/// zero-padded `HH:MM:SS`. Hours grow past 24 instead of wrapping; a
/// reference in the future clamps to `00:00:00`.
pub fn elapsed_display(now_ms: i64, last_online_secs: i64) -> String {
    let diff_ms = (now_ms - last_online_secs * 1000).max(0);
    let hours = diff_ms / 3_600_000;
    let minutes = (diff_ms % 3_600_000) / 60_000;
    let seconds = (diff_ms % 60_000) / 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Live "time since last seen" readout for the profile screen.
///
/// The 1-second cadence exists only while a reference timestamp is set;
/// clearing the reference (leaving the screen) releases it. Derived from
/// the wall clock, so the display may jump when the system clock changes.
#[derive(Debug, Clone, Default)]
pub struct LastSeenClock {
    reference: Option<i64>,
    display: String,
    next_tick: Option<Instant>,
}

impl LastSeenClock {
    /// Sets (or replaces) the reference timestamp. With `Some`, recomputes
    /// the display immediately and arms the cadence; with `None`, empties
    /// the display and cancels it.
    pub fn set_reference(&mut self, last_online_secs: Option<i64>) {
        self.reference = last_online_secs;
        match last_online_secs {
            Some(ts) => {
                self.display = elapsed_display(Utc::now().timestamp_millis(), ts);
                self.next_tick = Some(Instant::now() + TICK_INTERVAL);
            }
            None => {
                self.display.clear();
                self.next_tick = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.set_reference(None);
    }

    /// Recomputes the display when the cadence is due. No-op without a
    /// reference, so an idle clock does no recurring work.
    pub fn tick(&mut self) {
        let (Some(ts), Some(due)) = (self.reference, self.next_tick) else {
            return;
        };
        let now = Instant::now();
        if now < due {
            return;
        }
        self.display = elapsed_display(Utc::now().timestamp_millis(), ts);
        self.next_tick = Some(now + TICK_INTERVAL);
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn is_ticking(&self) -> bool {
        self.next_tick.is_some()
    }
}

/// Coarse "Last Online" wording shown on the profile card alongside the
/// precise live readout.
pub fn humanize_last_online(now_ms: i64, last_online_secs: i64) -> String {
    let hours = (now_ms - last_online_secs * 1000).max(0) / 3_600_000;
    if hours < 1 {
        return "Online recently".to_string();
    }
    if hours < 24 {
        return format!("{hours} hours ago");
    }
    let days = hours / 24;
    if days < 30 {
        return format!("{days} days ago");
    }
    format!("{} months ago", days / 30)
}

/// Formats an epoch-seconds timestamp as e.g. "June 5, 2014" (UTC).
pub fn format_join_date(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|dt| dt.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}
