use agenda_core::date_range::DateRange;
use agenda_core::models::dashboard::{DailyOccupancy, DashboardStatistics, DayEventInfo, DayHoursInfo};
use agenda_core::statistics::peak_occupancy;
use tracing::{error, info};

use crate::services::statistics::StatisticsAggregator;

/// Dashboard view over the aggregator. Nothing here fails: errors are logged
/// and replaced with zero, "Unknown", or empty values.
#[derive(Clone)]
pub struct DashboardService {
    aggregator: StatisticsAggregator,
}

impl DashboardService {
    pub fn new(aggregator: StatisticsAggregator) -> Self {
        Self { aggregator }
    }

    /// Full statistics from one fetch; any failure yields the all-zero payload.
    pub async fn get_statistics(&self, range: &DateRange) -> DashboardStatistics {
        match self.aggregator.compute(range).await {
            Ok(stats) => {
                info!(total_events = stats.total_events, "Dashboard statistics computed");
                stats.into()
            }
            Err(e) => {
                error!("Error fetching dashboard statistics: {:?}", e);
                DashboardStatistics::default()
            }
        }
    }

    pub async fn weekly_events_total(&self, range: &DateRange) -> i64 {
        self.aggregator.total_events(range).await.unwrap_or_else(|e| {
            error!("Error fetching weekly events total: {:?}", e);
            0
        })
    }

    pub async fn day_with_most_events(&self, range: &DateRange) -> DayEventInfo {
        self.aggregator.day_with_most_events(range).await.unwrap_or_else(|e| {
            error!("Error fetching day with most events: {:?}", e);
            DayEventInfo::unknown()
        })
    }

    pub async fn day_with_most_hours(&self, range: &DateRange) -> DayHoursInfo {
        self.aggregator.day_with_most_hours(range).await.unwrap_or_else(|e| {
            error!("Error fetching day with most hours: {:?}", e);
            DayHoursInfo::unknown()
        })
    }

    pub async fn daily_occupancy(&self, range: &DateRange) -> Vec<DailyOccupancy> {
        self.aggregator.daily_occupancy(range).await.unwrap_or_else(|e| {
            error!("Error fetching daily occupancy: {:?}", e);
            Vec::new()
        })
    }

    /// Builds the payload from the four best-effort statistics, so one failing
    /// card does not blank the others.
    pub async fn assemble(&self, range: &DateRange) -> DashboardStatistics {
        let (total_events, day_with_most_events, day_with_most_hours, daily_occupancy) = tokio::join!(
            self.weekly_events_total(range),
            self.day_with_most_events(range),
            self.day_with_most_hours(range),
            self.daily_occupancy(range),
        );

        DashboardStatistics {
            total_events,
            day_with_most_events,
            day_with_most_hours,
            peak_occupancy: peak_occupancy(&daily_occupancy),
            daily_occupancy,
        }
    }
}
