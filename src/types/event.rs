//! Activity events
//!
//! An [`Event`] is one recorded activity (a feed, a diaper change, a pumping
//! session). Events are stored one per line in the JSONL log and are
//! addressed externally by their timestamp.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Kind of activity recorded by an event
///
/// The set is closed for the kinds the server aggregates, but any other tag is
/// preserved as [`EventKind::Other`] so older or newer clients can still
/// round-trip their data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    /// Bottle feed, `amount` in ounces
    Milk,
    /// Pumping session, `amount` in ounces
    Pump,
    /// Breast feed, with `side` and `duration`
    Breast,
    /// Wet diaper
    Wet,
    /// Dirty diaper
    Bm,
    /// Wet and dirty diaper
    WetBm,
    /// Any tag the server does not aggregate
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Milk => "milk",
            EventKind::Pump => "pump",
            EventKind::Breast => "breast",
            EventKind::Wet => "wet",
            EventKind::Bm => "bm",
            EventKind::WetBm => "wet+bm",
            EventKind::Other(tag) => tag,
        }
    }
}

impl From<String> for EventKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "milk" => EventKind::Milk,
            "pump" => EventKind::Pump,
            "breast" => EventKind::Breast,
            "wet" => EventKind::Wet,
            "bm" => EventKind::Bm,
            "wet+bm" => EventKind::WetBm,
            _ => EventKind::Other(tag),
        }
    }
}

impl From<&str> for EventKind {
    fn from(tag: &str) -> Self {
        EventKind::from(tag.to_string())
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Breast used for a breast feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// A single recorded activity
///
/// `timestamp` keeps the offset it was recorded with; equality and key
/// matching compare the absolute instant, so `14:30+07:00` and `07:30Z`
/// identify the same event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// When the activity happened; the key for update and delete
    pub timestamp: DateTime<FixedOffset>,

    /// Activity tag
    #[serde(rename = "type", alias = "kind")]
    pub kind: EventKind,

    /// Quantity for milk and pump events
    #[serde(default, skip_serializing_if = "is_zero_amount")]
    pub amount: f64,

    /// Side for breast feeds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,

    /// Minutes for breast feeds
    #[serde(default, skip_serializing_if = "is_zero_duration")]
    pub duration: u32,
}

fn is_zero_amount(amount: &f64) -> bool {
    *amount == 0.0
}

fn is_zero_duration(duration: &u32) -> bool {
    *duration == 0
}

impl Event {
    /// Create an event with no quantity attached
    pub fn new(timestamp: DateTime<FixedOffset>, kind: impl Into<EventKind>) -> Self {
        Self {
            timestamp,
            kind: kind.into(),
            amount: 0.0,
            side: None,
            duration: 0,
        }
    }

    /// Set the amount (milk, pump)
    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }

    /// Set the side (breast)
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    /// Set the duration in minutes (breast)
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = minutes;
        self
    }

    /// The timestamp as an absolute instant
    pub fn instant(&self) -> DateTime<Utc> {
        self.timestamp.with_timezone(&Utc)
    }

    /// Whether this event is keyed by the same instant as `key`,
    /// regardless of the offset either side was written with
    pub fn is_keyed_by(&self, key: &DateTime<FixedOffset>) -> bool {
        self.instant() == key.with_timezone(&Utc)
    }

    /// Serialize event to JSON string (for JSONL)
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize event from JSON string
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Event body as sent by clients
///
/// Identical to [`Event`] except that the timestamp may be omitted; the
/// server then fills it in.
#[derive(Debug, Clone, Deserialize)]
pub struct EventInput {
    #[serde(default)]
    pub timestamp: Option<DateTime<FixedOffset>>,
    #[serde(rename = "type", alias = "kind")]
    pub kind: EventKind,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub side: Option<Side>,
    #[serde(default)]
    pub duration: u32,
}

impl EventInput {
    /// Build the stored event, using `fallback` when no timestamp was sent
    pub fn into_event(self, fallback: DateTime<FixedOffset>) -> Event {
        Event {
            timestamp: self.timestamp.unwrap_or(fallback),
            kind: self.kind,
            amount: self.amount,
            side: self.side,
            duration: self.duration,
        }
    }
}
