//! Time windows for statistics queries

use chrono::{DateTime, Duration, FixedOffset, Local};

use crate::types::Event;

/// Which events a statistics query covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    /// Events no older than one hour
    LastHour,
    /// Events no older than 24 hours
    LastDay,
    /// Events on the current calendar day in the server's local zone
    Today,
    /// Every event in the live view
    #[default]
    All,
}

impl TimeWindow {
    /// Parse the `duration` selector (`1h`, `24h`, `today`, `all`)
    ///
    /// Anything else, including an empty selector, means [`TimeWindow::All`].
    pub fn from_selector(selector: Option<&str>) -> Self {
        match selector.map(str::trim) {
            Some("1h") => TimeWindow::LastHour,
            Some("24h") => TimeWindow::LastDay,
            Some("today") => TimeWindow::Today,
            _ => TimeWindow::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::LastHour => "1h",
            TimeWindow::LastDay => "24h",
            TimeWindow::Today => "today",
            TimeWindow::All => "all",
        }
    }

    /// Whether `event` falls in this window as seen at `now`
    ///
    /// Future-dated events count as inside the rolling windows.
    pub fn contains(&self, event: &Event, now: &DateTime<FixedOffset>) -> bool {
        match self {
            TimeWindow::LastHour => *now - event.timestamp <= Duration::hours(1),
            TimeWindow::LastDay => *now - event.timestamp <= Duration::hours(24),
            TimeWindow::Today => {
                event.timestamp.with_timezone(&Local).date_naive()
                    == now.with_timezone(&Local).date_naive()
            }
            TimeWindow::All => true,
        }
    }

    /// Events in this window, keeping their stored order
    pub fn filter(&self, events: Vec<Event>, now: &DateTime<FixedOffset>) -> Vec<Event> {
        if *self == TimeWindow::All {
            return events;
        }
        events.into_iter().filter(|e| self.contains(e, now)).collect()
    }
}
