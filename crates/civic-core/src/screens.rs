//! Per-screen controllers. Each one owns its fetched state exclusively;
//! nothing is shared between screens.

pub mod issue_detail;
pub mod issues;
pub mod officer_modal;
pub mod officers;
pub mod users;

/// Outcome of a user-initiated mutation, shown to the operator as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Failure(String),
}

impl Notice {
    pub fn is_success(&self) -> bool {
        matches!(self, Notice::Success(_))
    }

    pub fn text(&self) -> &str {
        match self {
            Notice::Success(text) | Notice::Failure(text) => text,
        }
    }
}
