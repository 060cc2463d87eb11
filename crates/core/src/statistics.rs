//! Aggregations behind the dashboard cards.
//!
//! Every function takes the appointments already fetched for a range and only
//! counts those whose start falls inside it, so callers may pass a superset.
//! Days are keyed by the appointment's start date; an appointment crossing
//! midnight is attributed to the day it starts on.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::business_hours::BusinessHours;
use crate::datetime::format_date;
use crate::date_range::ResolvedRange;
use crate::models::appointment::Appointment;
use crate::models::dashboard::{DailyOccupancy, DashboardStatistics, DayEventInfo, DayHoursInfo};

/// All four statistics for one range, before the peak day is derived.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeStatistics {
    pub total_events: i64,
    pub day_with_most_events: DayEventInfo,
    pub day_with_most_hours: DayHoursInfo,
    pub daily_occupancy: Vec<DailyOccupancy>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn in_range<'a>(
    appointments: &'a [Appointment],
    range: &'a ResolvedRange,
) -> impl Iterator<Item = &'a Appointment> {
    appointments
        .iter()
        .filter(move |a| range.contains(&a.start_time))
}

pub fn total_events(appointments: &[Appointment], range: &ResolvedRange) -> i64 {
    in_range(appointments, range).count() as i64
}

pub fn events_per_day(appointments: &[Appointment], range: &ResolvedRange) -> BTreeMap<NaiveDate, i64> {
    let mut counts = BTreeMap::new();
    for appointment in in_range(appointments, range) {
        *counts.entry(appointment.start_time.date()).or_insert(0) += 1;
    }
    counts
}

pub fn hours_per_day(appointments: &[Appointment], range: &ResolvedRange) -> BTreeMap<NaiveDate, f64> {
    let mut hours = BTreeMap::new();
    for appointment in in_range(appointments, range) {
        *hours.entry(appointment.start_time.date()).or_insert(0.0) += appointment.duration_hours();
    }
    hours
}

/// Busiest day by appointment count. Ties go to the earliest date.
pub fn day_with_most_events(appointments: &[Appointment], range: &ResolvedRange) -> DayEventInfo {
    let mut best: Option<(NaiveDate, i64)> = None;

    // BTreeMap iterates in date order, so only a strictly larger count wins.
    for (date, count) in events_per_day(appointments, range) {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((date, count));
        }
    }

    match best {
        Some((date, count)) if count > 0 => DayEventInfo {
            date: format_date(&date),
            event_count: count,
        },
        _ => DayEventInfo::unknown(),
    }
}

/// Longest day by summed appointment duration. Ties go to the earliest date.
pub fn day_with_most_hours(appointments: &[Appointment], range: &ResolvedRange) -> DayHoursInfo {
    let mut best: Option<(NaiveDate, f64)> = None;

    for (date, hours) in hours_per_day(appointments, range) {
        if best.map_or(true, |(_, top)| hours > top) {
            best = Some((date, hours));
        }
    }

    match best {
        Some((date, hours)) if hours > 0.0 => DayHoursInfo {
            date: format_date(&date),
            total_hours: round2(hours),
        },
        _ => DayHoursInfo::unknown(),
    }
}

/// Occupancy for every day of the range, in date order.
///
/// Booked hours are divided by the business hours of that day and clamped to
/// `[0, 100]`. Days without business hours report zero.
pub fn daily_occupancy(
    appointments: &[Appointment],
    range: &ResolvedRange,
    business_hours: &BusinessHours,
) -> Vec<DailyOccupancy> {
    let booked = hours_per_day(appointments, range);

    range
        .days()
        .map(|date| {
            let available = business_hours.hours_on(date);
            let percentage = if available > 0.0 {
                let hours = booked.get(&date).copied().unwrap_or(0.0);
                round2((hours / available * 100.0).clamp(0.0, 100.0))
            } else {
                0.0
            };

            DailyOccupancy {
                date: format_date(&date),
                occupancy_percentage: percentage,
            }
        })
        .collect()
}

/// Highest occupancy day. The first entry wins ties; empty input yields `None`.
pub fn peak_occupancy(daily: &[DailyOccupancy]) -> Option<DailyOccupancy> {
    let mut peak: Option<&DailyOccupancy> = None;
    for day in daily {
        if peak.map_or(true, |p| day.occupancy_percentage > p.occupancy_percentage) {
            peak = Some(day);
        }
    }
    peak.cloned()
}

pub fn summarize(
    appointments: &[Appointment],
    range: &ResolvedRange,
    business_hours: &BusinessHours,
) -> RangeStatistics {
    RangeStatistics {
        total_events: total_events(appointments, range),
        day_with_most_events: day_with_most_events(appointments, range),
        day_with_most_hours: day_with_most_hours(appointments, range),
        daily_occupancy: daily_occupancy(appointments, range, business_hours),
    }
}

impl From<RangeStatistics> for DashboardStatistics {
    fn from(stats: RangeStatistics) -> Self {
        DashboardStatistics {
            total_events: stats.total_events,
            day_with_most_events: stats.day_with_most_events,
            day_with_most_hours: stats.day_with_most_hours,
            peak_occupancy: peak_occupancy(&stats.daily_occupancy),
            daily_occupancy: stats.daily_occupancy,
        }
    }
}
