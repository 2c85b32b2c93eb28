//! Read-only dashboard and analytics widgets.
//!
//! Every widget fetches its own endpoint and projects the response into a
//! display row. They share nothing, so two widgets that read overlapping
//! data both hit the API.

use tracing::{debug, instrument};

use crate::api::CivicApi;
use crate::loader::log_load_failure;
use crate::model::{Analytics, ChartData, DepartmentEfficiency, Issue, IssueStats};

pub const RECENT_ISSUE_LIMIT: usize = 5;
pub const TREND_SERIES_NAME: &str = "Issues Created";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryColor {
    Blue,
    Yellow,
    Orange,
    Green,
    Gray,
}

impl CategoryColor {
    pub fn for_category(category: &str) -> Self {
        match category.to_lowercase().as_str() {
            "water" => CategoryColor::Blue,
            "electricity" => CategoryColor::Yellow,
            "roads" => CategoryColor::Orange,
            "sanitation" => CategoryColor::Green,
            _ => CategoryColor::Gray,
        }
    }

    pub fn ansi_code(self) -> &'static str {
        match self {
            CategoryColor::Blue => "34",
            CategoryColor::Yellow => "33",
            CategoryColor::Orange => "38;5;208",
            CategoryColor::Green => "32",
            CategoryColor::Gray => "90",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentIssueRow {
    pub id: String,
    pub title: String,
    pub category: String,
    pub location: String,
    pub status: String,
    pub color: CategoryColor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentRow {
    pub name: String,
    pub pending: u64,
    pub resolved: u64,
    pub resolved_pct: u8,
}

/// Share of `part` in `part + rest`, rounded, 0 when both are zero.
pub fn percentage(part: u64, rest: u64) -> u8 {
    let total = part + rest;
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u8
}

pub fn recent_issue_rows(issues: &[Issue]) -> Vec<RecentIssueRow> {
    issues
        .iter()
        .take(RECENT_ISSUE_LIMIT)
        .map(|issue| RecentIssueRow {
            id: format!("ISS-{}", issue.id),
            title: issue.title.clone(),
            category: issue.category.clone(),
            location: issue.location().to_string(),
            status: issue.status.display_label().to_string(),
            color: CategoryColor::for_category(&issue.category),
        })
        .collect()
}

pub fn department_rows(efficiency: &[DepartmentEfficiency]) -> Vec<DepartmentRow> {
    efficiency
        .iter()
        .map(|d| DepartmentRow {
            name: d.name.clone(),
            pending: d.pending,
            resolved: d.resolved,
            resolved_pct: percentage(d.resolved, d.pending),
        })
        .collect()
}

#[instrument(skip(api))]
pub async fn load_stats(api: &dyn CivicApi) -> IssueStats {
    api.issue_stats().await.unwrap_or_else(|err| {
        log_load_failure("issue stats", &err);
        IssueStats::default()
    })
}

#[instrument(skip(api))]
pub async fn load_trend(api: &dyn CivicApi) -> ChartData {
    api.issue_chart_data().await.unwrap_or_else(|err| {
        log_load_failure("chart data", &err);
        ChartData::default()
    })
}

#[instrument(skip(api))]
pub async fn load_analytics(api: &dyn CivicApi) -> Analytics {
    api.issue_analytics().await.unwrap_or_else(|err| {
        log_load_failure("analytics", &err);
        Analytics::default()
    })
}

#[instrument(skip(api))]
pub async fn load_department_performance(api: &dyn CivicApi) -> Vec<DepartmentRow> {
    let analytics = load_analytics(api).await;
    department_rows(&analytics.department_efficiency)
}

#[instrument(skip(api))]
pub async fn load_recent_issues(api: &dyn CivicApi) -> Vec<RecentIssueRow> {
    match api.list_issues().await {
        Ok(issues) => recent_issue_rows(&issues),
        Err(err) => {
            log_load_failure("recent issues", &err);
            Vec::new()
        }
    }
}

/// The landing page: four widgets, fetched independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dashboard {
    pub stats: IssueStats,
    pub trend: ChartData,
    pub departments: Vec<DepartmentRow>,
    pub recent: Vec<RecentIssueRow>,
}

impl Dashboard {
    #[instrument(skip(api))]
    pub async fn load(api: &dyn CivicApi) -> Self {
        let (stats, trend, departments, recent) = tokio::join!(
            load_stats(api),
            load_trend(api),
            load_department_performance(api),
            load_recent_issues(api)
        );
        debug!(
            departments = departments.len(),
            recent = recent.len(),
            "dashboard loaded"
        );
        Self {
            stats,
            trend,
            departments,
            recent,
        }
    }
}
