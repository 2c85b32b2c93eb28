use tracing::instrument;

use crate::api::CivicApi;
use crate::filter::IssueFilter;
use crate::loader::{Collection, LoadOutcome};
use crate::model::Issue;

#[derive(Debug)]
pub struct IssueListScreen {
    issues: Collection<Issue>,
    pub filter: IssueFilter,
}

impl Default for IssueListScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl IssueListScreen {
    pub fn new() -> Self {
        Self {
            issues: Collection::new("issues"),
            filter: IssueFilter::default(),
        }
    }

    #[instrument(skip(self, api))]
    pub async fn activate(&mut self, api: &dyn CivicApi) -> LoadOutcome {
        let ticket = self.issues.begin();
        let result = api.list_issues().await;
        self.issues.apply(ticket, result)
    }

    pub fn is_loading(&self) -> bool {
        self.issues.is_loading()
    }

    pub fn issues(&self) -> &[Issue] {
        self.issues.items()
    }

    /// Re-derived on every call from the current list and filter.
    pub fn visible(&self) -> Vec<&Issue> {
        self.filter.apply(self.issues.items())
    }

    /// Distinct categories in first-seen order, for the category dropdown.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for issue in self.issues.items() {
            if !seen.contains(&issue.category.as_str()) {
                seen.push(issue.category.as_str());
            }
        }
        seen
    }
}
