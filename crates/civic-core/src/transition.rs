use std::str::FromStr;

use anyhow::anyhow;
use thiserror::Error;

use crate::config::Config;
use crate::model::IssueStatus;

/// Which status changes the console will submit.
///
/// `Any` lets staff correct a status in either direction and is what the
/// API itself accepts. `ForwardOnly` refuses to move an issue back along
/// OPEN -> IN_PROGRESS -> RESOLVED -> CLOSED.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    #[default]
    Any,
    ForwardOnly,
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("cannot move issue from {from} back to {to}")]
pub struct TransitionRejected {
    pub from: IssueStatus,
    pub to: IssueStatus,
}

impl TransitionPolicy {
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        cfg.get("issues.transitions")
            .map(|raw| raw.parse())
            .unwrap_or(Ok(TransitionPolicy::Any))
    }

    pub fn check(self, from: IssueStatus, to: IssueStatus) -> Result<(), TransitionRejected> {
        match self {
            TransitionPolicy::Any => Ok(()),
            TransitionPolicy::ForwardOnly if to.rank() >= from.rank() => Ok(()),
            TransitionPolicy::ForwardOnly => Err(TransitionRejected { from, to }),
        }
    }
}

impl FromStr for TransitionPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(TransitionPolicy::Any),
            "forward" | "forward-only" => Ok(TransitionPolicy::ForwardOnly),
            other => Err(anyhow!("invalid issues.transitions setting: {other}")),
        }
    }
}
