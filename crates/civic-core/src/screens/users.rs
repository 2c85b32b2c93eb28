use tracing::instrument;

use crate::api::CivicApi;
use crate::loader::{Collection, LoadOutcome};
use crate::model::{Department, User};
use crate::screens::Notice;
use crate::screens::officer_modal::OfficerModal;

#[derive(Debug)]
pub struct UserListScreen {
    users: Collection<User>,
    departments: Collection<Department>,
    pub modal: OfficerModal,
}

impl Default for UserListScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl UserListScreen {
    pub fn new() -> Self {
        Self {
            users: Collection::new("users"),
            departments: Collection::new("departments"),
            modal: OfficerModal::default(),
        }
    }

    /// Users and departments load independently; one failing does not
    /// empty the other.
    #[instrument(skip(self, api))]
    pub async fn activate(&mut self, api: &dyn CivicApi) -> (LoadOutcome, LoadOutcome) {
        let users = self.reload_users(api).await;
        let ticket = self.departments.begin();
        let result = api.list_departments().await;
        (users, self.departments.apply(ticket, result))
    }

    #[instrument(skip(self, api))]
    pub async fn reload_users(&mut self, api: &dyn CivicApi) -> LoadOutcome {
        let ticket = self.users.begin();
        let result = api.list_users().await;
        self.users.apply(ticket, result)
    }

    pub fn is_loading(&self) -> bool {
        self.users.is_loading()
    }

    pub fn users(&self) -> &[User] {
        self.users.items()
    }

    pub fn departments(&self) -> &[Department] {
        self.departments.items()
    }

    #[instrument(skip(self, api))]
    pub async fn submit_create(&mut self, api: &dyn CivicApi) -> Notice {
        let notice = self.modal.submit(api).await;
        if notice.is_success() {
            self.reload_users(api).await;
        }
        notice
    }
}
