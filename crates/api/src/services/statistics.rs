use std::sync::Arc;

use agenda_core::business_hours::BusinessHours;
use agenda_core::date_range::{DateRange, ResolvedRange};
use agenda_core::errors::AgendaResult;
use agenda_core::models::appointment::{Appointment, AppointmentQuery};
use agenda_core::models::dashboard::{DailyOccupancy, DayEventInfo, DayHoursInfo};
use agenda_core::statistics::{self, RangeStatistics};
use agenda_db::AppointmentStore;
use chrono::{Local, NaiveDate};

/// Computes dashboard statistics for a date range straight from the store.
///
/// Every method propagates store and validation errors; the best-effort
/// variants live in [`crate::services::dashboard::DashboardService`].
#[derive(Clone)]
pub struct StatisticsAggregator {
    store: Arc<dyn AppointmentStore>,
    business_hours: BusinessHours,
    max_range_days: i64,
}

impl StatisticsAggregator {
    pub fn new(store: Arc<dyn AppointmentStore>, business_hours: BusinessHours, max_range_days: i64) -> Self {
        Self {
            store,
            business_hours,
            max_range_days,
        }
    }

    /// Today in the server's local time zone; the default week is anchored here.
    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn resolve(&self, range: &DateRange) -> AgendaResult<ResolvedRange> {
        range.resolve(Self::today(), self.max_range_days)
    }

    async fn fetch(&self, range: &ResolvedRange) -> AgendaResult<Vec<Appointment>> {
        let appointments = self.store.list(&AppointmentQuery::in_range(range)).await?;
        tracing::debug!(
            start = %range.start,
            end = %range.end,
            count = appointments.len(),
            "Fetched appointments for statistics"
        );
        Ok(appointments)
    }

    pub async fn total_events(&self, range: &DateRange) -> AgendaResult<i64> {
        let resolved = self.resolve(range)?;
        Ok(self.store.count(&AppointmentQuery::in_range(&resolved)).await?)
    }

    pub async fn day_with_most_events(&self, range: &DateRange) -> AgendaResult<DayEventInfo> {
        let resolved = self.resolve(range)?;
        let appointments = self.fetch(&resolved).await?;
        Ok(statistics::day_with_most_events(&appointments, &resolved))
    }

    pub async fn day_with_most_hours(&self, range: &DateRange) -> AgendaResult<DayHoursInfo> {
        let resolved = self.resolve(range)?;
        let appointments = self.fetch(&resolved).await?;
        Ok(statistics::day_with_most_hours(&appointments, &resolved))
    }

    pub async fn daily_occupancy(&self, range: &DateRange) -> AgendaResult<Vec<DailyOccupancy>> {
        let resolved = self.resolve(range)?;
        let appointments = self.fetch(&resolved).await?;
        Ok(statistics::daily_occupancy(&appointments, &resolved, &self.business_hours))
    }

    /// All four statistics from a single fetch of the range.
    pub async fn compute(&self, range: &DateRange) -> AgendaResult<RangeStatistics> {
        let resolved = self.resolve(range)?;
        let appointments = self.fetch(&resolved).await?;
        Ok(statistics::summarize(&appointments, &resolved, &self.business_hours))
    }
}
