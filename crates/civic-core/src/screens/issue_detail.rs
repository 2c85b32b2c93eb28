use tracing::{debug, error, info, instrument, warn};

use crate::api::CivicApi;
use crate::error::ApiResult;
use crate::loader::{LoadOutcome, RequestGate, Ticket, log_load_failure};
use crate::model::{Issue, IssueStatus};
use crate::screens::Notice;
use crate::transition::TransitionPolicy;

pub const UPDATE_SUCCESS: &str = "Status updated successfully";
pub const UPDATE_FAILURE: &str = "Failed to update status";
pub const STILL_LOADING: &str = "Issue is still loading";

/// One issue plus the status the operator has picked but not yet saved.
///
/// The draft is never written into `issue`; after a successful update the
/// issue is re-read from the API and that copy replaces everything.
#[derive(Debug, Default)]
pub struct IssueDetailScreen {
    id: Option<u64>,
    issue: Option<Issue>,
    draft_status: Option<IssueStatus>,
    loading: bool,
    updating: bool,
    gate: RequestGate,
    policy: TransitionPolicy,
}

impl IssueDetailScreen {
    pub fn new(policy: TransitionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn issue(&self) -> Option<&Issue> {
        self.issue.as_ref()
    }

    pub fn draft_status(&self) -> Option<IssueStatus> {
        self.draft_status
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_updating(&self) -> bool {
        self.updating
    }

    pub fn begin_load(&mut self, id: u64) -> Ticket {
        if self.id != Some(id) {
            debug!(previous = ?self.id, id, "issue identifier changed");
        }
        self.id = Some(id);
        self.loading = true;
        self.gate.issue()
    }

    pub fn apply_load(&mut self, ticket: Ticket, result: ApiResult<Issue>) -> LoadOutcome {
        if !self.gate.is_current(ticket) {
            debug!(?ticket, "discarding superseded issue response");
            return LoadOutcome::Discarded;
        }

        self.loading = false;
        match result {
            Ok(issue) => {
                self.draft_status = Some(issue.status);
                self.issue = Some(issue);
                LoadOutcome::Applied(1)
            }
            Err(err) => {
                log_load_failure("issue", &err);
                self.issue = None;
                self.draft_status = None;
                LoadOutcome::Failed
            }
        }
    }

    /// Loads (or reloads, when the identifier changes) the issue.
    #[instrument(skip(self, api))]
    pub async fn activate(&mut self, api: &dyn CivicApi, id: u64) -> LoadOutcome {
        let ticket = self.begin_load(id);
        let result = api.get_issue(id).await;
        self.apply_load(ticket, result)
    }

    pub fn select_status(&mut self, status: IssueStatus) {
        debug!(%status, "status drafted");
        self.draft_status = Some(status);
    }

    /// Sends only the drafted status, then re-reads the issue.
    ///
    /// On failure the draft stays as the operator left it.
    #[instrument(skip(self, api))]
    pub async fn submit_status(&mut self, api: &dyn CivicApi) -> Notice {
        if self.loading {
            warn!(id = ?self.id, "status submitted while the issue is still loading");
            return Notice::Failure(STILL_LOADING.to_string());
        }
        let Some(current) = self.issue.as_ref() else {
            return Notice::Failure("Issue not found".to_string());
        };
        let Some(target) = self.draft_status else {
            return Notice::Failure("No status selected".to_string());
        };

        if let Err(rejected) = self.policy.check(current.status, target) {
            warn!(error = %rejected, "status change refused by transition policy");
            return Notice::Failure(rejected.to_string());
        }

        let issue_id = current.id;
        self.updating = true;
        let result = api.update_issue_status(issue_id, target).await;
        let notice = match result {
            Ok(()) => {
                info!(issue_id, %target, "status updated");
                let ticket = self.gate.issue();
                let refreshed = api.get_issue(issue_id).await;
                self.apply_refresh(ticket, refreshed);
                Notice::Success(UPDATE_SUCCESS.to_string())
            }
            Err(err) => {
                error!(issue_id, error = %err, "failed to update status");
                Notice::Failure(err.user_message(UPDATE_FAILURE))
            }
        };
        self.updating = false;
        notice
    }

    fn apply_refresh(&mut self, ticket: Ticket, result: ApiResult<Issue>) {
        if !self.gate.is_current(ticket) {
            debug!(?ticket, "discarding superseded refresh");
            return;
        }
        match result {
            Ok(issue) => {
                self.draft_status = Some(issue.status);
                self.issue = Some(issue);
            }
            // The mutation went through; keep the last good copy on screen.
            Err(err) => log_load_failure("issue", &err),
        }
    }
}
