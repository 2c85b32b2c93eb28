use std::collections::BTreeSet;
use std::str::FromStr;

use anyhow::anyhow;

use crate::model::{
  Issue,
  IssueStatus,
  Officer
};

pub const ALL_DEPARTMENTS: &str =
  "All Departments";
pub const ALL_STATUS: &str = "All Status";
pub const ALL_CATEGORIES: &str =
  "All Categories";

fn contains_folded(
  haystack: &str,
  needle: &str
) -> bool {
  haystack
    .to_lowercase()
    .contains(needle)
}

fn is_all_sentinel(
  raw: &str,
  sentinel: &str
) -> bool {
  let trimmed = raw.trim();
  trimmed.is_empty()
    || trimmed
      .eq_ignore_ascii_case(sentinel)
    || trimmed
      .eq_ignore_ascii_case("all")
}

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub enum DepartmentFilter {
  #[default]
  All,
  Named(String)
}

impl DepartmentFilter {
  pub fn label(&self) -> &str {
    match self {
      | DepartmentFilter::All => {
        ALL_DEPARTMENTS
      }
      | DepartmentFilter::Named(name) => {
        name
      }
    }
  }
}

impl FromStr for DepartmentFilter {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    if is_all_sentinel(s, ALL_DEPARTMENTS)
    {
      Ok(DepartmentFilter::All)
    } else {
      Ok(DepartmentFilter::Named(
        s.trim().to_string()
      ))
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum ActivityFilter {
  #[default]
  All,
  Active,
  Inactive
}

impl ActivityFilter {
  pub fn label(&self) -> &'static str {
    match self {
      | ActivityFilter::All => ALL_STATUS,
      | ActivityFilter::Active => "Active",
      | ActivityFilter::Inactive => {
        "Inactive"
      }
    }
  }

  fn admits(
    self,
    is_active: bool
  ) -> bool {
    match self {
      | ActivityFilter::All => true,
      | ActivityFilter::Active => {
        is_active
      }
      | ActivityFilter::Inactive => {
        !is_active
      }
    }
  }
}

impl FromStr for ActivityFilter {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    if is_all_sentinel(s, ALL_STATUS) {
      return Ok(ActivityFilter::All);
    }
    match s
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "active" => {
        Ok(ActivityFilter::Active)
      }
      | "inactive" => {
        Ok(ActivityFilter::Inactive)
      }
      | _ => Err(anyhow!(
        "unknown officer status \
         filter: {s}"
      ))
    }
  }
}

/// Search bar plus the two dropdowns of the officer roster.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct OfficerFilter {
  pub query:      String,
  pub department: DepartmentFilter,
  pub status:     ActivityFilter
}

impl OfficerFilter {
  pub fn matches(
    &self,
    officer: &Officer
  ) -> bool {
    let needle =
      self.query.to_lowercase();
    let matches_search = contains_folded(
      &officer.name,
      &needle
    ) || contains_folded(
      &officer.email,
      &needle
    );

    let matches_department =
      match &self.department {
        | DepartmentFilter::All => true,
        | DepartmentFilter::Named(
          name
        ) => officer.department == *name
      };

    matches_search
      && matches_department
      && self
        .status
        .admits(officer.is_active)
  }

  /// Keeps source order; never re-sorts.
  pub fn apply<'a>(
    &self,
    officers: &'a [Officer]
  ) -> Vec<&'a Officer> {
    officers
      .iter()
      .filter(|officer| {
        self.matches(officer)
      })
      .collect()
  }
}

/// Summary cards; always computed over the unfiltered roster.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub struct RosterStats {
  pub total:       usize,
  pub active:      usize,
  pub inactive:    usize,
  pub departments: usize
}

impl RosterStats {
  pub fn from_officers(
    officers: &[Officer]
  ) -> Self {
    let active = officers
      .iter()
      .filter(|o| o.is_active)
      .count();
    let departments = officers
      .iter()
      .map(|o| o.department.as_str())
      .collect::<BTreeSet<_>>()
      .len();

    Self {
      total: officers.len(),
      active,
      inactive: officers.len() - active,
      departments
    }
  }
}

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct IssueFilter {
  pub query:    String,
  pub category: Option<String>,
  pub status:   Option<IssueStatus>
}

impl IssueFilter {
  pub fn parse_category(
    raw: &str
  ) -> Option<String> {
    if is_all_sentinel(raw, ALL_CATEGORIES)
    {
      None
    } else {
      Some(raw.trim().to_string())
    }
  }

  pub fn parse_status(
    raw: &str
  ) -> anyhow::Result<Option<IssueStatus>>
  {
    if is_all_sentinel(raw, ALL_STATUS) {
      Ok(None)
    } else {
      raw.parse().map(Some)
    }
  }

  pub fn matches(
    &self,
    issue: &Issue
  ) -> bool {
    if !self.query.is_empty() {
      let needle =
        self.query.to_lowercase();
      let hit = contains_folded(
        &issue.title,
        &needle
      ) || contains_folded(
        &issue.description,
        &needle
      ) || contains_folded(
        &issue.citizen.full_name(),
        &needle
      );
      if !hit {
        return false;
      }
    }

    if let Some(category) = &self.category
      && !issue
        .category
        .eq_ignore_ascii_case(category)
    {
      return false;
    }

    if let Some(status) = self.status
      && issue.status != status
    {
      return false;
    }

    true
  }

  pub fn apply<'a>(
    &self,
    issues: &'a [Issue]
  ) -> Vec<&'a Issue> {
    issues
      .iter()
      .filter(|issue| self.matches(issue))
      .collect()
  }
}
