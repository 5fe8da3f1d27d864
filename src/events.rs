//! Known business events and their multiplicative effect on a forecast.

use crate::core::Forecast;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Magnitude and direction of a business event's effect on cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventImpact {
    HighIncrease,
    MediumIncrease,
    LowIncrease,
    HighDecrease,
    MediumDecrease,
    LowDecrease,
}

impl EventImpact {
    /// Multiplier applied to every forecasted cost the event covers.
    pub fn factor(self) -> f64 {
        match self {
            EventImpact::HighIncrease => 1.5,
            EventImpact::MediumIncrease => 1.25,
            EventImpact::LowIncrease => 1.1,
            EventImpact::HighDecrease => 0.5,
            EventImpact::MediumDecrease => 0.75,
            EventImpact::LowDecrease => 0.9,
        }
    }
}

/// A dated event (launch, migration, sale) expected to move costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessEvent {
    pub name: String,
    pub date: DateTime<Utc>,
    pub impact: EventImpact,
    /// Additional days covered after `date`; zero covers `date` only.
    #[serde(default)]
    pub duration_days: u32,
}

impl BusinessEvent {
    pub fn new(
        name: impl Into<String>,
        date: DateTime<Utc>,
        impact: EventImpact,
        duration_days: u32,
    ) -> Self {
        Self {
            name: name.into(),
            date,
            impact,
            duration_days,
        }
    }

    /// First calendar day covered.
    pub fn start_day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    /// Last calendar day covered (inclusive).
    pub fn end_day(&self) -> NaiveDate {
        self.start_day() + Duration::days(i64::from(self.duration_days))
    }

    /// Whether `date` falls on a calendar day within `[date, date + duration]`.
    pub fn covers(&self, date: DateTime<Utc>) -> bool {
        let day = date.date_naive();
        self.start_day() <= day && day <= self.end_day()
    }
}

/// Events ordered by start date; events starting together keep their
/// registration order.
pub fn ordered_events(events: &[BusinessEvent]) -> Vec<&BusinessEvent> {
    let mut ordered: Vec<&BusinessEvent> = events.iter().collect();
    ordered.sort_by_key(|e| e.date);
    ordered
}

/// Product of the impact factors of every event covering `date`.
pub fn adjustment_factor(events: &[&BusinessEvent], date: DateTime<Utc>) -> f64 {
    events
        .iter()
        .filter(|e| e.covers(date))
        .fold(1.0, |factor, e| factor * e.impact.factor())
}

/// Scale each forecast step covered by at least one event.
///
/// `dates[h]` is the date of step `h`. Overlapping events compound in start
/// date order. Returns the number of adjusted steps.
pub fn apply_business_events(
    forecast: &mut Forecast,
    dates: &[DateTime<Utc>],
    events: &[BusinessEvent],
) -> usize {
    if events.is_empty() {
        return 0;
    }

    let ordered = ordered_events(events);
    let mut adjusted = 0;
    for (step, &date) in dates.iter().enumerate().take(forecast.horizon()) {
        let factor = adjustment_factor(&ordered, date);
        if factor != 1.0 {
            forecast.scale_step(step, factor);
            adjusted += 1;
        }
    }

    debug!(events = events.len(), adjusted_days = adjusted, "applied business events");
    adjusted
}
