//! Date-range and weekday filtering of record sets.

use std::collections::HashSet;

use chrono::{NaiveDate, Weekday};

use crate::error::{AnalyticsError, Result};

use super::types::{RecordSet, TradeDay};

/// Label meaning "no weekday restriction".
pub const ALL_WEEKDAYS_LABEL: &str = "All";

/// Reusable filter criteria: inclusive date bounds and an optional weekday set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    weekdays: Option<HashSet<Weekday>>,
}

impl FilterCriteria {
    /// Criteria that keep every day.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inclusive lower bound.
    #[must_use]
    pub const fn from(mut self, date: NaiveDate) -> Self {
        self.from = Some(date);
        self
    }

    /// Inclusive upper bound.
    #[must_use]
    pub const fn to(mut self, date: NaiveDate) -> Self {
        self.to = Some(date);
        self
    }

    /// Optional bounds in one call.
    #[must_use]
    pub const fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Restrict to the given weekdays.
    #[must_use]
    pub fn weekdays(mut self, weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        self.weekdays = Some(weekdays.into_iter().collect());
        self
    }

    /// Restrict to weekdays given as labels ("Monday", "mon", ...).
    ///
    /// A label of "All" clears the weekday restriction.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidWeekday`] for an unknown label.
    pub fn weekday_labels<S: AsRef<str>>(self, labels: &[S]) -> Result<Self> {
        match parse_weekday_labels(labels)? {
            Some(days) => Ok(self.weekdays(days)),
            None => Ok(Self {
                weekdays: None,
                ..self
            }),
        }
    }

    /// Lower bound, if any.
    #[must_use]
    pub const fn date_from(&self) -> Option<NaiveDate> {
        self.from
    }

    /// Upper bound, if any.
    #[must_use]
    pub const fn date_to(&self) -> Option<NaiveDate> {
        self.to
    }

    /// Weekday restriction, if any.
    #[must_use]
    pub const fn weekday_set(&self) -> Option<&HashSet<Weekday>> {
        self.weekdays.as_ref()
    }

    /// Check the bounds are ordered.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidRange`] if `from` is strictly after `to`.
    pub fn validate(&self) -> Result<()> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err(AnalyticsError::InvalidRange { from, to }),
            _ => Ok(()),
        }
    }

    /// Whether a day satisfies both the date-range and weekday predicates.
    #[must_use]
    pub fn matches(&self, day: &TradeDay) -> bool {
        let after_start = self.from.is_none_or(|from| day.date >= from);
        let before_end = self.to.is_none_or(|to| day.date <= to);
        let on_weekday = self
            .weekdays
            .as_ref()
            .is_none_or(|set| set.contains(&day.weekday()));

        after_start && before_end && on_weekday
    }

    /// Whether these criteria keep every day.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none() && self.weekdays.is_none()
    }
}

/// Parse one weekday label, case-insensitive, full or three-letter name.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidWeekday`] for an unknown label.
pub fn parse_weekday(label: &str) -> Result<Weekday> {
    label
        .trim()
        .parse::<Weekday>()
        .map_err(|_| AnalyticsError::InvalidWeekday(label.to_string()))
}

/// Parse a list of weekday labels. `None` means no restriction ("All").
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidWeekday`] for an unknown label.
pub fn parse_weekday_labels<S: AsRef<str>>(labels: &[S]) -> Result<Option<Vec<Weekday>>> {
    if labels
        .iter()
        .any(|l| l.as_ref().trim().eq_ignore_ascii_case(ALL_WEEKDAYS_LABEL))
    {
        return Ok(None);
    }
    labels
        .iter()
        .map(|l| parse_weekday(l.as_ref()))
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

/// Apply criteria to a record set, producing a new record set.
///
/// An empty result is not an error.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidRange`] if the bounds are inverted.
pub fn filter(record_set: &RecordSet, criteria: &FilterCriteria) -> Result<RecordSet> {
    criteria.validate()?;

    if criteria.is_unbounded() {
        return Ok(record_set.clone());
    }

    let days: Vec<TradeDay> = record_set
        .days()
        .iter()
        .filter(|day| criteria.matches(day))
        .cloned()
        .collect();

    Ok(record_set.derive(days))
}

/// Convenience form taking the bounds and weekdays directly.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidRange`] if `from` is after `to`.
pub fn filter_range(
    record_set: &RecordSet,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    weekdays: Option<&[Weekday]>,
) -> Result<RecordSet> {
    let mut criteria = FilterCriteria::new().between(from, to);
    if let Some(days) = weekdays {
        criteria = criteria.weekdays(days.iter().copied());
    }
    filter(record_set, &criteria)
}
