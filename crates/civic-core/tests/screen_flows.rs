mod common;

use civic_core::filter::{ActivityFilter, DepartmentFilter, OfficerFilter, RosterStats};
use civic_core::loader::LoadOutcome;
use civic_core::model::{Analytics, IssueStatus, OfficerDraft};
use civic_core::screens::Notice;
use civic_core::screens::issue_detail::{
    IssueDetailScreen, STILL_LOADING, UPDATE_FAILURE, UPDATE_SUCCESS,
};
use civic_core::screens::issues::IssueListScreen;
use civic_core::screens::officer_modal::{CREATE_FAILURE, CREATE_SUCCESS};
use civic_core::screens::officers::OfficerRosterScreen;
use civic_core::screens::users::UserListScreen;
use civic_core::transition::TransitionPolicy;
use civic_core::widgets::Dashboard;
use common::{
    FakeApi, FakeState, Failure, department, efficiency, filled_draft, issue, officer,
};

fn roster_api() -> FakeApi {
    FakeApi::with(FakeState {
        officers: vec![
            officer(1, "Ann Lee", "ann@x.com", "Water", true),
            officer(2, "Bo Kim", "bo@x.com", "Roads", false),
        ],
        departments: vec![department(1, "Water"), department(2, "Roads")],
        ..FakeState::default()
    })
}

fn detail_api(status: IssueStatus) -> FakeApi {
    FakeApi::with(FakeState {
        issues: vec![issue(7, "Burst pipe", "Water", status)],
        ..FakeState::default()
    })
}

#[tokio::test]
async fn detail_draft_starts_at_the_loaded_status() {
    let api = detail_api(IssueStatus::Resolved);
    let mut screen = IssueDetailScreen::new(TransitionPolicy::Any);

    assert_eq!(screen.activate(&api, 7).await, LoadOutcome::Applied(1));
    assert_eq!(screen.draft_status(), Some(IssueStatus::Resolved));
    assert!(!screen.is_loading());
}

#[tokio::test]
async fn displayed_status_comes_from_the_refetch() {
    let api = detail_api(IssueStatus::Open);
    api.state.lock().stored_status_override = Some(IssueStatus::InProgress);
    let mut screen = IssueDetailScreen::new(TransitionPolicy::Any);
    screen.activate(&api, 7).await;

    screen.select_status(IssueStatus::Resolved);
    let notice = screen.submit_status(&api).await;

    assert_eq!(notice, Notice::Success(UPDATE_SUCCESS.to_string()));
    let shown = screen.issue().map(|i| i.status);
    assert_eq!(shown, Some(IssueStatus::InProgress));
    assert_eq!(screen.draft_status(), Some(IssueStatus::InProgress));
    assert_eq!(
        api.calls(),
        vec![
            "GET /issues/7",
            "PATCH /issues/7/status RESOLVED",
            "GET /issues/7"
        ]
    );
    assert!(!screen.is_updating());
}

#[tokio::test]
async fn failed_update_keeps_the_draft_and_shows_the_server_message() {
    let api = detail_api(IssueStatus::Open);
    api.state.lock().fail_update = Some(Failure::new(
        400,
        r#"{"message":"Officer must be assigned first"}"#,
    ));
    let mut screen = IssueDetailScreen::new(TransitionPolicy::Any);
    screen.activate(&api, 7).await;
    screen.select_status(IssueStatus::Closed);

    let notice = screen.submit_status(&api).await;

    assert_eq!(
        notice,
        Notice::Failure("Officer must be assigned first".to_string())
    );
    assert_eq!(screen.draft_status(), Some(IssueStatus::Closed));
    assert_eq!(screen.issue().map(|i| i.status), Some(IssueStatus::Open));
    assert_eq!(api.count("GET /issues/7"), 1);
}

#[tokio::test]
async fn failed_update_without_message_uses_the_generic_text() {
    let api = detail_api(IssueStatus::Open);
    api.state.lock().fail_update = Some(Failure::new(500, "<html>oops</html>"));
    let mut screen = IssueDetailScreen::new(TransitionPolicy::Any);
    screen.activate(&api, 7).await;
    screen.select_status(IssueStatus::InProgress);

    let notice = screen.submit_status(&api).await;
    assert_eq!(notice, Notice::Failure(UPDATE_FAILURE.to_string()));
}

#[tokio::test]
async fn submit_is_refused_while_another_issue_is_loading() {
    let api = FakeApi::with(FakeState {
        issues: vec![
            issue(1, "Pothole", "Roads", IssueStatus::Open),
            issue(2, "Streetlight out", "Electricity", IssueStatus::Open),
        ],
        ..FakeState::default()
    });
    let mut screen = IssueDetailScreen::new(TransitionPolicy::Any);
    screen.activate(&api, 1).await;

    let pending = screen.begin_load(2);
    screen.select_status(IssueStatus::Closed);
    let notice = screen.submit_status(&api).await;

    assert_eq!(notice, Notice::Failure(STILL_LOADING.to_string()));
    assert_eq!(api.calls(), vec!["GET /issues/1"]);
    assert!(
        api.state
            .lock()
            .issues
            .iter()
            .all(|i| i.status == IssueStatus::Open)
    );

    let fetched = civic_core::api::CivicApi::get_issue(&api, 2).await;
    assert_eq!(screen.apply_load(pending, fetched), LoadOutcome::Applied(1));
    screen.select_status(IssueStatus::Closed);
    assert!(screen.submit_status(&api).await.is_success());

    let shown = screen.issue().map(|i| (i.id, i.status));
    assert_eq!(shown, Some((2, IssueStatus::Closed)));
    assert_eq!(
        api.calls()[2..],
        ["PATCH /issues/2/status CLOSED", "GET /issues/2"]
    );
}

#[tokio::test]
async fn failed_refresh_keeps_the_last_copy_and_reports_success() {
    let api = detail_api(IssueStatus::Open);
    let mut screen = IssueDetailScreen::new(TransitionPolicy::Any);
    screen.activate(&api, 7).await;
    api.state.lock().fail_get_issue = Some(Failure::new(503, "{}"));
    screen.select_status(IssueStatus::InProgress);

    let notice = screen.submit_status(&api).await;

    assert_eq!(notice, Notice::Success(UPDATE_SUCCESS.to_string()));
    let shown = screen.issue().map(|i| (i.id, i.status));
    assert_eq!(shown, Some((7, IssueStatus::Open)));
    assert_eq!(screen.draft_status(), Some(IssueStatus::InProgress));
    assert_eq!(api.count("GET /issues/7"), 2);
    assert!(!screen.is_updating());
}

#[tokio::test]
async fn any_policy_allows_moving_backwards() {
    let api = detail_api(IssueStatus::Closed);
    let mut screen = IssueDetailScreen::new(TransitionPolicy::Any);
    screen.activate(&api, 7).await;
    screen.select_status(IssueStatus::Open);

    assert!(screen.submit_status(&api).await.is_success());
    assert_eq!(screen.issue().map(|i| i.status), Some(IssueStatus::Open));
}

#[tokio::test]
async fn forward_only_policy_refuses_without_calling_the_api() {
    let api = detail_api(IssueStatus::Resolved);
    let mut screen = IssueDetailScreen::new(TransitionPolicy::ForwardOnly);
    screen.activate(&api, 7).await;
    screen.select_status(IssueStatus::Open);

    let notice = screen.submit_status(&api).await;

    assert!(!notice.is_success());
    assert_eq!(api.calls(), vec!["GET /issues/7"]);
    assert_eq!(screen.draft_status(), Some(IssueStatus::Open));
}

#[tokio::test]
async fn missing_issue_leaves_nothing_on_screen() {
    let api = detail_api(IssueStatus::Open);
    let mut screen = IssueDetailScreen::new(TransitionPolicy::Any);

    assert_eq!(screen.activate(&api, 99).await, LoadOutcome::Failed);
    assert!(screen.issue().is_none());
    assert!(!screen.submit_status(&api).await.is_success());
}

#[tokio::test]
async fn superseded_detail_response_is_discarded() {
    let api = FakeApi::with(FakeState {
        issues: vec![
            issue(1, "Pothole", "Roads", IssueStatus::Open),
            issue(2, "Streetlight out", "Electricity", IssueStatus::InProgress),
        ],
        ..FakeState::default()
    });
    let mut screen = IssueDetailScreen::new(TransitionPolicy::Any);

    let first = screen.begin_load(1);
    let second = screen.begin_load(2);
    let slow = civic_core::api::CivicApi::get_issue(&api, 1).await;
    let fast = civic_core::api::CivicApi::get_issue(&api, 2).await;

    assert_eq!(screen.apply_load(second, fast), LoadOutcome::Applied(1));
    assert_eq!(screen.apply_load(first, slow), LoadOutcome::Discarded);
    assert_eq!(screen.issue().map(|i| i.id), Some(2));
}

#[tokio::test]
async fn roster_filters_preserve_order_and_stats_ignore_them() {
    let api = roster_api();
    let mut screen = OfficerRosterScreen::new();
    screen.activate(&api).await;

    let before = screen.stats();
    assert_eq!(
        before,
        RosterStats {
            total: 2,
            active: 1,
            inactive: 1,
            departments: 2
        }
    );

    screen.filter = OfficerFilter {
        query: "an".to_string(),
        ..OfficerFilter::default()
    };
    let names: Vec<&str> = screen.visible().iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["Ann Lee"]);

    screen.filter = OfficerFilter {
        status: ActivityFilter::Inactive,
        ..OfficerFilter::default()
    };
    let names: Vec<&str> = screen.visible().iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["Bo Kim"]);

    screen.filter = OfficerFilter {
        department: DepartmentFilter::Named("Parks".to_string()),
        ..OfficerFilter::default()
    };
    assert!(screen.visible().is_empty());
    assert_eq!(screen.stats(), before);
    assert_eq!(
        screen.department_options(),
        vec!["All Departments", "Water", "Roads"]
    );
}

#[tokio::test]
async fn successful_create_closes_clears_and_refetches_the_roster() {
    let api = roster_api();
    let mut screen = OfficerRosterScreen::new();
    screen.activate(&api).await;
    screen.modal.open();
    *screen.modal.draft_mut() = filled_draft();

    let notice = screen.submit_create(&api).await;

    assert_eq!(notice, Notice::Success(CREATE_SUCCESS.to_string()));
    assert!(!screen.modal.is_open());
    assert!(screen.modal.draft().is_empty());
    assert_eq!(api.count("GET /users/officers"), 2);
    assert_eq!(screen.officers().len(), 3);
    assert_eq!(
        screen.officers().last().map(|o| o.department.as_str()),
        Some("Water")
    );
    assert_eq!(api.state.lock().created, vec![filled_draft()]);
}

#[tokio::test]
async fn failed_create_keeps_the_modal_open_with_the_draft() {
    let api = roster_api();
    api.state.lock().fail_create = Some(Failure::new(
        409,
        r#"{"message":"Email already in use"}"#,
    ));
    let mut screen = OfficerRosterScreen::new();
    screen.activate(&api).await;
    screen.modal.open();
    *screen.modal.draft_mut() = filled_draft();

    let notice = screen.submit_create(&api).await;

    assert_eq!(notice, Notice::Failure("Email already in use".to_string()));
    assert!(screen.modal.is_open());
    assert_eq!(screen.modal.draft(), &filled_draft());
    assert_eq!(api.count("GET /users/officers"), 1);
}

#[tokio::test]
async fn validation_messages_are_joined() {
    let api = roster_api();
    api.state.lock().fail_create = Some(Failure::new(
        400,
        r#"{"message":["email must be an email","password is too short"]}"#,
    ));
    let mut screen = OfficerRosterScreen::new();
    screen.modal.open();

    let notice = screen.submit_create(&api).await;
    assert_eq!(
        notice.text(),
        "email must be an email, password is too short"
    );

    api.state.lock().fail_create = Some(Failure::new(502, ""));
    let notice = screen.submit_create(&api).await;
    assert_eq!(notice.text(), CREATE_FAILURE);
}

#[tokio::test]
async fn cancel_discards_the_draft() {
    let api = roster_api();
    let mut screen = OfficerRosterScreen::new();
    screen.modal.open();
    screen.modal.draft_mut().firstname = "Half typed".to_string();

    screen.modal.cancel();

    assert!(!screen.modal.is_open());
    assert_eq!(screen.modal.draft(), &OfficerDraft::default());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn user_screen_refetches_users_after_create() {
    let api = roster_api();
    let mut screen = UserListScreen::new();
    screen.activate(&api).await;
    assert!(screen.users().is_empty());

    screen.modal.open();
    *screen.modal.draft_mut() = filled_draft();
    assert!(screen.submit_create(&api).await.is_success());

    assert_eq!(api.count("GET /users"), 2);
    assert_eq!(screen.users().len(), 1);
    assert_eq!(screen.users()[0].email, "cara@x.com");
}

#[tokio::test]
async fn department_failure_does_not_empty_the_user_list() {
    let api = roster_api();
    {
        let mut state = api.state.lock();
        state.users.push(civic_core::model::User {
            id: 1,
            email: "admin@x.com".to_string(),
            firstname: "Ada".to_string(),
            lastname: "Min".to_string(),
            role: civic_core::model::Role::Admin,
            created_at: None,
        });
        state.fail_departments = Some(Failure::new(500, "{}"));
    }
    let mut screen = UserListScreen::new();

    let (users, departments) = screen.activate(&api).await;

    assert_eq!(users, LoadOutcome::Applied(1));
    assert_eq!(departments, LoadOutcome::Failed);
    assert_eq!(screen.users().len(), 1);
    assert!(screen.departments().is_empty());
}

#[tokio::test]
async fn non_list_issue_response_yields_an_empty_list() {
    let api = FakeApi::with(FakeState {
        issues_not_a_list: true,
        ..FakeState::default()
    });
    let mut screen = IssueListScreen::new();

    assert_eq!(screen.activate(&api).await, LoadOutcome::Failed);
    assert!(screen.issues().is_empty());
    assert!(screen.visible().is_empty());
    assert!(!screen.is_loading());
}

#[tokio::test]
async fn issue_list_filters_and_lists_categories() {
    let api = FakeApi::with(FakeState {
        issues: vec![
            issue(1, "Pothole on 5th", "Roads", IssueStatus::Open),
            issue(2, "Burst pipe", "Water", IssueStatus::Resolved),
            issue(3, "Pothole near school", "Roads", IssueStatus::Resolved),
        ],
        ..FakeState::default()
    });
    let mut screen = IssueListScreen::new();
    screen.activate(&api).await;

    assert_eq!(screen.categories(), vec!["Roads", "Water"]);

    screen.filter.query = "POTHOLE".to_string();
    screen.filter.status = Some(IssueStatus::Resolved);
    let ids: Vec<u64> = screen.visible().iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![3]);
    assert_eq!(screen.issues().len(), 3);
}

#[tokio::test]
async fn dashboard_shows_five_recent_issues_and_survives_a_failed_widget() {
    let issues = (1..=8)
        .map(|id| issue(id, &format!("Issue {id}"), "Garbage", IssueStatus::Open))
        .collect();
    let api = FakeApi::with(FakeState {
        issues,
        analytics: Analytics {
            department_efficiency: vec![efficiency("Sanitation", 3, 1)],
            ..Analytics::default()
        },
        ..FakeState::default()
    });

    let dashboard = Dashboard::load(&api).await;
    let ids: Vec<&str> = dashboard.recent.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["ISS-1", "ISS-2", "ISS-3", "ISS-4", "ISS-5"]);
    assert_eq!(dashboard.recent[0].status, "Pending");
    assert_eq!(dashboard.departments[0].resolved_pct, 75);

    api.state.lock().fail_analytics = Some(Failure::new(500, "{}"));
    let dashboard = Dashboard::load(&api).await;
    assert!(dashboard.departments.is_empty());
    assert_eq!(dashboard.recent.len(), 5);
    assert_eq!(api.count("GET /issues/stats"), 2);
    assert_eq!(api.count("GET /issues/chart-data"), 2);
}
