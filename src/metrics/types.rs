use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureBreakdown {
    pub hot: u64,
    pub warm: u64,
    pub cold: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailCounts {
    pub total: u64,
    pub drafts: u64,
    pub approved: u64,
    pub sending: u64,
    pub sent: u64,
    pub failed: u64,
}

/// Per-(report, visitor) engagement reduced to dashboard-level numbers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementSummary {
    pub unique_viewers: u64,
    pub average_best_scroll_depth: f64,
    pub average_best_duration_seconds: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardKpis {
    pub total_leads: u64,
    pub temperature: TemperatureBreakdown,
    pub emails: EmailCounts,
    pub reports_generated: u64,
    pub engagement: EngagementSummary,
}
