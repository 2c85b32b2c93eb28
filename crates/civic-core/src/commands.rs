use anyhow::anyhow;
use tracing::{
  debug,
  info,
  instrument,
  warn
};

use crate::api::CivicApi;
use crate::cli::Command;
use crate::config::Config;
use crate::filter::{
  IssueFilter,
  OfficerFilter
};
use crate::loader::{
  Collection,
  LoadOutcome
};
use crate::model::{
  IssueStatus,
  OfficerDraft
};
use crate::render::Renderer;
use crate::screens::Notice;
use crate::screens::issue_detail::IssueDetailScreen;
use crate::screens::issues::IssueListScreen;
use crate::screens::officers::OfficerRosterScreen;
use crate::screens::users::UserListScreen;
use crate::transition::TransitionPolicy;
use crate::widgets::{
  self,
  Dashboard
};

#[instrument(skip(
  api, cfg, renderer, command
))]
pub async fn dispatch(
  api: &dyn CivicApi,
  cfg: &Config,
  renderer: &mut Renderer,
  command: Command
) -> anyhow::Result<()> {
  match command {
    | Command::Issues {
      query,
      category,
      status
    } => {
      let filter = IssueFilter {
        query,
        category:
          IssueFilter::parse_category(
            &category
          ),
        status: IssueFilter::parse_status(
          &status
        )?
      };
      cmd_issues(api, renderer, filter)
        .await
    }
    | Command::Issue {
      id
    } => {
      cmd_issue(api, cfg, renderer, id)
        .await
    }
    | Command::SetStatus {
      id,
      status
    } => {
      let status = status
        .parse::<IssueStatus>()?;
      cmd_set_status(
        api, cfg, renderer, id, status
      )
      .await
    }
    | Command::Officers {
      query,
      department,
      status
    } => {
      let filter = OfficerFilter {
        query,
        department: department.parse()?,
        status: status.parse()?
      };
      cmd_officers(api, renderer, filter)
        .await
    }
    | Command::AddOfficer {
      firstname,
      lastname,
      email,
      password,
      department_id,
      area
    } => {
      let draft = OfficerDraft {
        firstname,
        lastname,
        email,
        password,
        department_id,
        area
      };
      cmd_add_officer(
        api, renderer, draft
      )
      .await
    }
    | Command::Users => {
      cmd_users(api, renderer).await
    }
    | Command::Departments => {
      cmd_departments(api, renderer)
        .await
    }
    | Command::Dashboard => {
      let dashboard =
        Dashboard::load(api).await;
      renderer.print_dashboard(&dashboard)
    }
    | Command::Analytics => {
      let analytics =
        widgets::load_analytics(api)
          .await;
      renderer.print_analytics(&analytics)
    }
    | Command::Sla => {
      let rules =
        crate::sla::load_rules(cfg)?;
      renderer.print_sla(&rules)
    }
  }
}

fn notice_result(
  renderer: &mut Renderer,
  notice: Notice
) -> anyhow::Result<()> {
  match notice {
    | Notice::Success(_) => {
      renderer.print_notice(&notice)
    }
    | Notice::Failure(text) => {
      Err(anyhow!(text))
    }
  }
}

#[instrument(skip(
  api, renderer, filter
))]
async fn cmd_issues(
  api: &dyn CivicApi,
  renderer: &mut Renderer,
  filter: IssueFilter
) -> anyhow::Result<()> {
  info!("command issues");

  let mut screen =
    IssueListScreen::new();
  screen.filter = filter;
  screen.activate(api).await;

  let visible = screen.visible();
  debug!(
    total = screen.issues().len(),
    visible = visible.len(),
    "issues filtered"
  );
  renderer.print_issue_table(&visible)
}

#[instrument(skip(api, cfg, renderer))]
async fn cmd_issue(
  api: &dyn CivicApi,
  cfg: &Config,
  renderer: &mut Renderer,
  id: u64
) -> anyhow::Result<()> {
  info!("command issue");

  let mut screen = IssueDetailScreen::new(
    TransitionPolicy::from_config(cfg)?
  );
  screen.activate(api, id).await;

  let issue = screen
    .issue()
    .ok_or_else(|| {
      anyhow!("Issue not found")
    })?;
  renderer.print_issue_detail(
    issue,
    screen.draft_status()
  )
}

#[instrument(skip(api, cfg, renderer))]
async fn cmd_set_status(
  api: &dyn CivicApi,
  cfg: &Config,
  renderer: &mut Renderer,
  id: u64,
  status: IssueStatus
) -> anyhow::Result<()> {
  info!("command set-status");

  let mut screen = IssueDetailScreen::new(
    TransitionPolicy::from_config(cfg)?
  );
  if screen.activate(api, id).await
    != LoadOutcome::Applied(1)
  {
    return Err(anyhow!(
      "Issue not found"
    ));
  }

  screen.select_status(status);
  let notice =
    screen.submit_status(api).await;
  notice_result(renderer, notice)?;

  if let Some(issue) = screen.issue() {
    if issue.status != status {
      warn!(
        requested = %status,
        stored = %issue.status,
        "server stored a different status than requested"
      );
    }
    renderer.print_issue_detail(
      issue,
      screen.draft_status()
    )?;
  }
  Ok(())
}

#[instrument(skip(
  api, renderer, filter
))]
async fn cmd_officers(
  api: &dyn CivicApi,
  renderer: &mut Renderer,
  filter: OfficerFilter
) -> anyhow::Result<()> {
  info!("command officers");

  let mut screen =
    OfficerRosterScreen::new();
  screen.filter = filter;
  screen.activate(api).await;

  if let crate::filter::DepartmentFilter::Named(name) =
    &screen.filter.department
    && !screen.departments().is_empty()
    && !screen
      .departments()
      .iter()
      .any(|d| d.name == *name)
  {
    warn!(department = %name, "department filter matches no known department");
  }

  let visible = screen.visible();
  renderer.print_officers(
    &visible,
    screen.stats(),
    &screen.filter
  )
}

#[instrument(skip(
  api, renderer, draft
))]
async fn cmd_add_officer(
  api: &dyn CivicApi,
  renderer: &mut Renderer,
  draft: OfficerDraft
) -> anyhow::Result<()> {
  info!("command add-officer");

  let mut screen =
    OfficerRosterScreen::new();
  screen.activate(api).await;
  screen.modal.open();
  *screen.modal.draft_mut() = draft;

  let notice =
    screen.submit_create(api).await;
  notice_result(renderer, notice)?;

  let visible = screen.visible();
  renderer.print_officers(
    &visible,
    screen.stats(),
    &screen.filter
  )
}

#[instrument(skip(api, renderer))]
async fn cmd_users(
  api: &dyn CivicApi,
  renderer: &mut Renderer
) -> anyhow::Result<()> {
  info!("command users");

  let mut screen = UserListScreen::new();
  screen.activate(api).await;
  renderer.print_users(screen.users())
}

#[instrument(skip(api, renderer))]
async fn cmd_departments(
  api: &dyn CivicApi,
  renderer: &mut Renderer
) -> anyhow::Result<()> {
  info!("command departments");

  let mut departments =
    Collection::new("departments");
  let ticket = departments.begin();
  let result =
    api.list_departments().await;
  departments.apply(ticket, result);
  renderer
    .print_departments(departments.items())
}
