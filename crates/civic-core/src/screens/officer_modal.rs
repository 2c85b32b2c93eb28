use tracing::{error, info, instrument};

use crate::api::CivicApi;
use crate::model::OfficerDraft;
use crate::screens::Notice;

pub const CREATE_SUCCESS: &str = "Officer created successfully!";
pub const CREATE_FAILURE: &str = "Failed to create officer";

/// The "Add Officer" dialog shared by the roster and user screens.
#[derive(Debug, Default)]
pub struct OfficerModal {
    open: bool,
    draft: OfficerDraft,
}

impl OfficerModal {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Dismisses the dialog and throws the draft away.
    pub fn cancel(&mut self) {
        self.open = false;
        self.draft = OfficerDraft::default();
    }

    pub fn draft(&self) -> &OfficerDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut OfficerDraft {
        &mut self.draft
    }

    /// Posts the whole draft. Success closes and clears; failure leaves
    /// the dialog open with the draft untouched.
    #[instrument(skip(self, api), fields(email = %self.draft.email))]
    pub async fn submit(&mut self, api: &dyn CivicApi) -> Notice {
        match api.create_officer(&self.draft).await {
            Ok(()) => {
                info!("officer created");
                self.open = false;
                self.draft = OfficerDraft::default();
                Notice::Success(CREATE_SUCCESS.to_string())
            }
            Err(err) => {
                error!(error = %err, "failed to create officer");
                Notice::Failure(err.user_message(CREATE_FAILURE))
            }
        }
    }
}
