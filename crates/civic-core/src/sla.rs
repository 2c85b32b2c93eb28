//! Read-only SLA rule table. Nothing here enforces a deadline; the API
//! owns escalation.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{Config, expand_tilde};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlaRule {
    pub category: String,
    pub priority: Priority,
    pub sla_hours: u32,
    #[serde(default)]
    pub escalation: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SlaFile {
    #[serde(default)]
    rule: Vec<SlaRule>,
}

fn rule(category: &str, priority: Priority, sla_hours: u32, escalation: &[&str]) -> SlaRule {
    SlaRule {
        category: category.to_string(),
        priority,
        sla_hours,
        escalation: escalation.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn default_rules() -> Vec<SlaRule> {
    vec![
        rule(
            "Water Supply",
            Priority::High,
            12,
            &["50%: Notify Supervisor", "25%: Notify Admin"],
        ),
        rule(
            "Water Supply",
            Priority::Medium,
            24,
            &["25%: Notify Supervisor"],
        ),
        rule(
            "Electricity",
            Priority::High,
            6,
            &["50%: Notify Supervisor", "25%: Auto Reassign"],
        ),
        rule("Roads", Priority::High, 24, &["25%: Notify Admin"]),
        rule("Sanitation", Priority::Medium, 12, &[]),
    ]
}

pub fn parse_rules(text: &str) -> anyhow::Result<Vec<SlaRule>> {
    let parsed: SlaFile = toml::from_str(text).context("invalid SLA rules file")?;
    Ok(parsed.rule)
}

/// Rules from `sla.rules` when configured, otherwise the built-in table.
#[tracing::instrument(skip(cfg))]
pub fn load_rules(cfg: &Config) -> anyhow::Result<Vec<SlaRule>> {
    let Some(raw) = cfg.get("sla.rules") else {
        debug!("no sla.rules configured; using built-in table");
        return Ok(default_rules());
    };

    let path = expand_tilde(Path::new(&raw));
    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let rules = parse_rules(&text)?;
    info!(file = %path.display(), count = rules.len(), "loaded SLA rules");
    Ok(rules)
}
