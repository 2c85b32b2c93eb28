#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use civic_core::api::CivicApi;
use civic_core::error::{ApiError, ApiResult};
use civic_core::model::{
    Analytics, ChartData, Citizen, Department, DepartmentEfficiency, Issue, IssueStats,
    IssueStatus, Officer, OfficerDraft, Role, User,
};
use parking_lot::Mutex;

/// Scripted failure: HTTP status plus raw body.
#[derive(Debug, Clone)]
pub struct Failure {
    pub status: u16,
    pub body: String,
}

impl Failure {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    fn to_error(&self) -> ApiError {
        ApiError::server(self.status, &self.body)
    }
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub issues: Vec<Issue>,
    pub officers: Vec<Officer>,
    pub departments: Vec<Department>,
    pub users: Vec<User>,
    pub stats: IssueStats,
    pub chart: ChartData,
    pub analytics: Analytics,
    pub calls: Vec<String>,
    pub issues_not_a_list: bool,
    pub fail_departments: Option<Failure>,
    pub fail_update: Option<Failure>,
    pub fail_get_issue: Option<Failure>,
    pub fail_create: Option<Failure>,
    pub fail_analytics: Option<Failure>,
    /// Status the server actually stores, whatever was requested.
    pub stored_status_override: Option<IssueStatus>,
    pub created: Vec<OfficerDraft>,
}

#[derive(Debug, Default)]
pub struct FakeApi {
    pub state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn with(state: FakeState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.as_str() == call)
            .count()
    }

    fn record(&self, call: String) {
        self.state.lock().calls.push(call);
    }
}

#[async_trait]
impl CivicApi for FakeApi {
    async fn list_issues(&self) -> ApiResult<Vec<Issue>> {
        self.record("GET /issues".to_string());
        let state = self.state.lock();
        if state.issues_not_a_list {
            return Err(ApiError::UnexpectedShape {
                endpoint: "/issues".to_string(),
                expected: "array",
                found: "object",
            });
        }
        Ok(state.issues.clone())
    }

    async fn get_issue(&self, id: u64) -> ApiResult<Issue> {
        self.record(format!("GET /issues/{id}"));
        let state = self.state.lock();
        if let Some(failure) = &state.fail_get_issue {
            return Err(failure.to_error());
        }
        state
            .issues
            .iter()
            .find(|issue| issue.id == id)
            .cloned()
            .ok_or_else(|| ApiError::server(404, r#"{"message":"Issue not found"}"#))
    }

    async fn update_issue_status(&self, id: u64, status: IssueStatus) -> ApiResult<()> {
        self.record(format!("PATCH /issues/{id}/status {status}"));
        let mut state = self.state.lock();
        if let Some(failure) = &state.fail_update {
            return Err(failure.to_error());
        }
        let stored = state.stored_status_override.unwrap_or(status);
        let issue = state
            .issues
            .iter_mut()
            .find(|issue| issue.id == id)
            .ok_or_else(|| ApiError::server(404, r#"{"message":"Issue not found"}"#))?;
        issue.status = stored;
        Ok(())
    }

    async fn issue_stats(&self) -> ApiResult<IssueStats> {
        self.record("GET /issues/stats".to_string());
        Ok(self.state.lock().stats.clone())
    }

    async fn issue_analytics(&self) -> ApiResult<Analytics> {
        self.record("GET /issues/analytics".to_string());
        let state = self.state.lock();
        if let Some(failure) = &state.fail_analytics {
            return Err(failure.to_error());
        }
        Ok(state.analytics.clone())
    }

    async fn issue_chart_data(&self) -> ApiResult<ChartData> {
        self.record("GET /issues/chart-data".to_string());
        Ok(self.state.lock().chart.clone())
    }

    async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.record("GET /users".to_string());
        Ok(self.state.lock().users.clone())
    }

    async fn list_officers(&self) -> ApiResult<Vec<Officer>> {
        self.record("GET /users/officers".to_string());
        Ok(self.state.lock().officers.clone())
    }

    async fn list_departments(&self) -> ApiResult<Vec<Department>> {
        self.record("GET /users/departments".to_string());
        let state = self.state.lock();
        if let Some(failure) = &state.fail_departments {
            return Err(failure.to_error());
        }
        Ok(state.departments.clone())
    }

    async fn create_officer(&self, draft: &OfficerDraft) -> ApiResult<()> {
        self.record("POST /users/officer".to_string());
        let mut state = self.state.lock();
        if let Some(failure) = &state.fail_create {
            return Err(failure.to_error());
        }

        let department = draft
            .department_id
            .parse::<u64>()
            .ok()
            .and_then(|id| state.departments.iter().find(|d| d.id == id))
            .map(|d| d.name.clone())
            .unwrap_or_default();
        let next_id = state.officers.iter().map(|o| o.id).max().unwrap_or(0) + 1;
        let next_user = state.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;

        state.officers.push(Officer {
            id: next_id,
            user_id: next_user,
            name: format!("{} {}", draft.firstname, draft.lastname),
            email: draft.email.clone(),
            mobile: None,
            department,
            area: draft.area.clone(),
            active_issues: 0,
            is_active: true,
        });
        state.users.push(User {
            id: next_user,
            email: draft.email.clone(),
            firstname: draft.firstname.clone(),
            lastname: draft.lastname.clone(),
            role: Role::Officer,
            created_at: None,
        });
        state.created.push(draft.clone());
        Ok(())
    }
}

pub fn issue(id: u64, title: &str, category: &str, status: IssueStatus) -> Issue {
    Issue {
        id,
        title: title.to_string(),
        description: format!("{title} reported by resident"),
        image_url: None,
        address: format!("{id} Main Street"),
        landmark: None,
        category: category.to_string(),
        area: None,
        status,
        citizen: Citizen {
            firstname: "Ravi".to_string(),
            lastname: "Shah".to_string(),
            mobile: Some("9000000000".to_string()),
            email: "ravi@example.com".to_string(),
        },
        department: None,
        officer: None,
        created_at: Utc
            .with_ymd_and_hms(2026, 1, 1, 9, 0, 0)
            .unwrap(),
    }
}

pub fn officer(id: u64, name: &str, email: &str, department: &str, is_active: bool) -> Officer {
    Officer {
        id,
        user_id: id + 100,
        name: name.to_string(),
        email: email.to_string(),
        mobile: None,
        department: department.to_string(),
        area: "Ward 3".to_string(),
        active_issues: id,
        is_active,
    }
}

pub fn department(id: u64, name: &str) -> Department {
    Department {
        id,
        name: name.to_string(),
    }
}

pub fn efficiency(name: &str, resolved: u64, pending: u64) -> DepartmentEfficiency {
    DepartmentEfficiency {
        name: name.to_string(),
        resolved,
        pending,
    }
}

pub fn filled_draft() -> OfficerDraft {
    OfficerDraft {
        firstname: "Cara".to_string(),
        lastname: "Diaz".to_string(),
        email: "cara@x.com".to_string(),
        password: "s3cret!".to_string(),
        department_id: "1".to_string(),
        area: "Ward 7".to_string(),
    }
}
