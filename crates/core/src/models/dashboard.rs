use serde::{Deserialize, Serialize};

/// Date reported when a range holds no appointments.
pub const UNKNOWN_DATE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayEventInfo {
    pub date: String,
    pub event_count: i64,
}

impl DayEventInfo {
    pub fn unknown() -> Self {
        Self {
            date: UNKNOWN_DATE.to_string(),
            event_count: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHoursInfo {
    pub date: String,
    pub total_hours: f64,
}

impl DayHoursInfo {
    pub fn unknown() -> Self {
        Self {
            date: UNKNOWN_DATE.to_string(),
            total_hours: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyOccupancy {
    pub date: String,
    pub occupancy_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatistics {
    pub total_events: i64,
    pub day_with_most_events: DayEventInfo,
    pub day_with_most_hours: DayHoursInfo,
    pub peak_occupancy: Option<DailyOccupancy>,
    pub daily_occupancy: Vec<DailyOccupancy>,
}

impl Default for DashboardStatistics {
    fn default() -> Self {
        Self {
            total_events: 0,
            day_with_most_events: DayEventInfo::unknown(),
            day_with_most_hours: DayHoursInfo::unknown(),
            peak_occupancy: None,
            daily_occupancy: Vec::new(),
        }
    }
}

/// Raw query parameters of the statistics endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub week_start: Option<String>,
}
