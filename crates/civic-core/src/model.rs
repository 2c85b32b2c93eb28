use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl IssueStatus {
    pub const ALL: [IssueStatus; 4] = [
        IssueStatus::Open,
        IssueStatus::InProgress,
        IssueStatus::Resolved,
        IssueStatus::Closed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IssueStatus::Open => "OPEN",
            IssueStatus::InProgress => "IN_PROGRESS",
            IssueStatus::Resolved => "RESOLVED",
            IssueStatus::Closed => "CLOSED",
        }
    }

    /// Position along OPEN -> IN_PROGRESS -> RESOLVED -> CLOSED.
    pub fn rank(self) -> u8 {
        match self {
            IssueStatus::Open => 0,
            IssueStatus::InProgress => 1,
            IssueStatus::Resolved => 2,
            IssueStatus::Closed => 3,
        }
    }

    /// Label used by the recent-issues widget.
    pub fn display_label(self) -> &'static str {
        match self {
            IssueStatus::Open => "Pending",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::Resolved => "Resolved",
            IssueStatus::Closed => "CLOSED",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            IssueStatus::Resolved => Tone::Success,
            IssueStatus::Open => Tone::Error,
            _ => Tone::Warning,
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        IssueStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| anyhow!("unknown issue status: {s}"))
    }
}

/// Badge colour class shared by statuses, categories and officer flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
    Warning,
    Info,
    Light,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Citizen {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub email: String,
}

impl Citizen {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepartmentRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OfficerRef {
    pub user_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub landmark: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub area: Option<String>,
    pub status: IssueStatus,
    pub citizen: Citizen,
    #[serde(default)]
    pub department: Option<DepartmentRef>,
    #[serde(default)]
    pub officer: Option<OfficerRef>,
    pub created_at: DateTime<Utc>,
}

impl Issue {
    /// Area label when the reporter gave one, otherwise the street address.
    pub fn location(&self) -> &str {
        match self.area.as_deref() {
            Some(area) if !area.is_empty() => area,
            _ => self.address.as_str(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Officer {
    pub id: u64,
    pub user_id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub active_issues: u64,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Department {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Officer,
    Other(String),
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ADMIN" => Role::Admin,
            "OFFICER" => Role::Officer,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        match value {
            Role::Admin => "ADMIN".to_string(),
            Role::Officer => "OFFICER".to_string(),
            Role::Other(raw) => raw,
        }
    }
}

impl Role {
    pub fn tone(&self) -> Tone {
        match self {
            Role::Admin => Tone::Error,
            Role::Officer => Tone::Info,
            Role::Other(_) => Tone::Light,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: u64,
    pub email: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    pub role: Role,
    #[serde(default, rename = "CreatedAt", alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IssueStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub open: u64,
    #[serde(default)]
    pub resolved: u64,
    #[serde(default)]
    pub in_progress: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartData {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub data: Vec<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyTrend {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub reported: Vec<u64>,
    #[serde(default)]
    pub resolved: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AreaCount {
    pub area: String,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub resolved: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepartmentEfficiency {
    pub name: String,
    #[serde(default)]
    pub resolved: u64,
    #[serde(default)]
    pub pending: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    #[serde(default)]
    pub monthly_trend: Option<MonthlyTrend>,
    #[serde(default)]
    pub issues_by_area: Vec<AreaCount>,
    #[serde(default)]
    pub department_efficiency: Vec<DepartmentEfficiency>,
}

/// Body of `PATCH /issues/{id}/status`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatusPatch {
    pub status: IssueStatus,
}

/// Body of `POST /users/officer`; also the modal's draft record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OfficerDraft {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
    pub department_id: String,
    pub area: String,
}

impl OfficerDraft {
    pub fn is_empty(&self) -> bool {
        *self == OfficerDraft::default()
    }
}
