//! Statistics over a set of events
//!
//! The statistics endpoint picks a [`TimeWindow`], filters the live events,
//! and sums them into [`Totals`].

mod window;

pub use window::TimeWindow;

use serde::Serialize;

use crate::types::{Event, EventKind};

/// Summed totals by activity kind
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    /// Ounces of milk fed
    pub total_milk: f64,
    /// Ounces pumped
    pub total_pumped: f64,
    /// Minutes of breast feeding
    pub total_breast_time: u64,
    /// Wet diapers, including wet+bm
    pub diaper_wet: usize,
    /// Dirty diapers, including wet+bm
    pub diaper_bm: usize,
}

impl Totals {
    /// Sum the given events; kinds without a total are ignored
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut totals = Totals::default();
        for event in events {
            totals.add(event);
        }
        totals
    }

    fn add(&mut self, event: &Event) {
        match event.kind {
            EventKind::Milk => self.total_milk += event.amount,
            EventKind::Pump => self.total_pumped += event.amount,
            EventKind::Breast => self.total_breast_time += u64::from(event.duration),
            EventKind::Wet => self.diaper_wet += 1,
            EventKind::Bm => self.diaper_bm += 1,
            EventKind::WetBm => {
                self.diaper_wet += 1;
                self.diaper_bm += 1;
            }
            EventKind::Other(_) => {}
        }
    }
}
