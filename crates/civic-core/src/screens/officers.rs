use tracing::instrument;

use crate::api::CivicApi;
use crate::filter::{ALL_DEPARTMENTS, OfficerFilter, RosterStats};
use crate::loader::{Collection, LoadOutcome};
use crate::model::{Department, Officer};
use crate::screens::Notice;
use crate::screens::officer_modal::OfficerModal;

#[derive(Debug)]
pub struct OfficerRosterScreen {
    officers: Collection<Officer>,
    departments: Collection<Department>,
    pub filter: OfficerFilter,
    pub modal: OfficerModal,
}

impl Default for OfficerRosterScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl OfficerRosterScreen {
    pub fn new() -> Self {
        Self {
            officers: Collection::new("officers"),
            departments: Collection::new("departments"),
            filter: OfficerFilter::default(),
            modal: OfficerModal::default(),
        }
    }

    /// Fetches the roster and the department options side by side.
    #[instrument(skip(self, api))]
    pub async fn activate(&mut self, api: &dyn CivicApi) -> (LoadOutcome, LoadOutcome) {
        let officers_ticket = self.officers.begin();
        let departments_ticket = self.departments.begin();
        let (officers, departments) = tokio::join!(api.list_officers(), api.list_departments());
        (
            self.officers.apply(officers_ticket, officers),
            self.departments.apply(departments_ticket, departments),
        )
    }

    #[instrument(skip(self, api))]
    pub async fn reload_officers(&mut self, api: &dyn CivicApi) -> LoadOutcome {
        let ticket = self.officers.begin();
        let result = api.list_officers().await;
        self.officers.apply(ticket, result)
    }

    pub fn is_loading(&self) -> bool {
        self.officers.is_loading() || self.departments.is_loading()
    }

    pub fn officers(&self) -> &[Officer] {
        self.officers.items()
    }

    pub fn departments(&self) -> &[Department] {
        self.departments.items()
    }

    pub fn visible(&self) -> Vec<&Officer> {
        self.filter.apply(self.officers.items())
    }

    pub fn stats(&self) -> RosterStats {
        RosterStats::from_officers(self.officers.items())
    }

    /// Dropdown entries: the "all" sentinel followed by every department.
    pub fn department_options(&self) -> Vec<&str> {
        std::iter::once(ALL_DEPARTMENTS)
            .chain(self.departments.items().iter().map(|d| d.name.as_str()))
            .collect()
    }

    /// Creates an officer from the modal draft and, on success, re-reads
    /// the roster so the server-assigned fields show up.
    #[instrument(skip(self, api))]
    pub async fn submit_create(&mut self, api: &dyn CivicApi) -> Notice {
        let notice = self.modal.submit(api).await;
        if notice.is_success() {
            self.reload_officers(api).await;
        }
        notice
    }
}
