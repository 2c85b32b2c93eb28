use std::io::{self, IsTerminal, Write};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::filter::{OfficerFilter, RosterStats};
use crate::model::{Analytics, Department, Issue, IssueStatus, Officer, Tone, User};
use crate::screens::Notice;
use crate::sla::SlaRule;
use crate::widgets::{Dashboard, DepartmentRow, TREND_SERIES_NAME};

const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
    tz: Tz,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            color: cfg.get_bool("color").unwrap_or(true),
            tz: cfg.timezone()?,
        })
    }

    pub fn plain(tz: Tz) -> Self {
        Self { color: false, tz }
    }

    #[tracing::instrument(skip(self, issues))]
    pub fn print_issue_table(&mut self, issues: &[&Issue]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_issue_table(&mut out, issues)
    }

    pub fn write_issue_table<W: Write>(&self, out: W, issues: &[&Issue]) -> anyhow::Result<()> {
        let headers = vec![
            "ID".to_string(),
            "Title".to_string(),
            "Category".to_string(),
            "Reporter".to_string(),
            "Status".to_string(),
            "Created".to_string(),
        ];

        let rows = issues
            .iter()
            .map(|issue| {
                vec![
                    self.paint(&issue.id.to_string(), "33"),
                    issue.title.clone(),
                    issue.category.clone(),
                    issue.citizen.full_name(),
                    self.status_badge(issue.status),
                    self.format_date(issue.created_at),
                ]
            })
            .collect();

        write_table(out, headers, rows)
    }

    #[tracing::instrument(skip(self, issue))]
    pub fn print_issue_detail(
        &mut self,
        issue: &Issue,
        draft: Option<IssueStatus>,
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_issue_detail(&mut out, issue, draft)
    }

    pub fn write_issue_detail<W: Write>(
        &self,
        mut out: W,
        issue: &Issue,
        draft: Option<IssueStatus>,
    ) -> anyhow::Result<()> {
        writeln!(out, "Issue #{}: {}", issue.id, issue.title)?;
        writeln!(out, "status      {}", self.status_badge(issue.status))?;
        if let Some(draft) = draft
            && draft != issue.status
        {
            writeln!(out, "draft       {draft} (unsaved)")?;
        }
        writeln!(out, "description {}", issue.description)?;
        writeln!(out, "category    {}", issue.category)?;
        writeln!(out, "area        {}", or_na(issue.area.as_deref()))?;
        writeln!(out, "address     {}", issue.address)?;
        writeln!(out, "landmark    {}", or_na(issue.landmark.as_deref()))?;
        writeln!(out, "created     {}", self.format_datetime(issue.created_at))?;
        if let Some(url) = &issue.image_url {
            writeln!(out, "image       {url}")?;
        }

        writeln!(out)?;
        writeln!(out, "Reporter")?;
        writeln!(out, "  name      {}", issue.citizen.full_name())?;
        writeln!(out, "  email     {}", issue.citizen.email)?;
        writeln!(out, "  mobile    {}", or_na(issue.citizen.mobile.as_deref()))?;

        writeln!(out)?;
        writeln!(out, "Assignment")?;
        writeln!(
            out,
            "  department {}",
            issue
                .department
                .as_ref()
                .map(|d| d.name.as_str())
                .unwrap_or("Unassigned")
        )?;
        writeln!(
            out,
            "  officer    {}",
            issue
                .officer
                .as_ref()
                .map(|o| o.user_id.to_string())
                .unwrap_or_else(|| "Unassigned".to_string())
        )?;
        Ok(())
    }

    #[tracing::instrument(skip(self, visible, stats, filter))]
    pub fn print_officers(
        &mut self,
        visible: &[&Officer],
        stats: RosterStats,
        filter: &OfficerFilter,
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_officers(&mut out, visible, stats, filter)
    }

    pub fn write_officers<W: Write>(
        &self,
        mut out: W,
        visible: &[&Officer],
        stats: RosterStats,
        filter: &OfficerFilter,
    ) -> anyhow::Result<()> {
        writeln!(
            out,
            "Total Officers {}   Active {}   Inactive {}   Departments {}",
            stats.total, stats.active, stats.inactive, stats.departments
        )?;
        writeln!(
            out,
            "filter: query={:?} department={} status={}",
            filter.query,
            filter.department.label(),
            filter.status.label()
        )?;
        writeln!(out)?;

        let headers = vec![
            "ID".to_string(),
            "Name".to_string(),
            "Department".to_string(),
            "Email".to_string(),
            "Mobile".to_string(),
            "Area".to_string(),
            "Active Issues".to_string(),
            "Status".to_string(),
        ];
        let rows = visible
            .iter()
            .map(|officer| {
                let (label, tone) = if officer.is_active {
                    ("Active", Tone::Success)
                } else {
                    ("Inactive", Tone::Light)
                };
                vec![
                    self.paint(&officer.id.to_string(), "33"),
                    officer.name.clone(),
                    officer.department.clone(),
                    officer.email.clone(),
                    or_na(officer.mobile.as_deref()).to_string(),
                    officer.area.clone(),
                    officer.active_issues.to_string(),
                    self.badge(label, tone),
                ]
            })
            .collect();
        write_table(out, headers, rows)
    }

    #[tracing::instrument(skip(self, users))]
    pub fn print_users(&mut self, users: &[User]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        let headers = vec![
            "ID".to_string(),
            "Name".to_string(),
            "Email".to_string(),
            "Role".to_string(),
            "Joined".to_string(),
        ];
        let rows = users
            .iter()
            .map(|user| {
                let role: String = user.role.clone().into();
                vec![
                    self.paint(&user.id.to_string(), "33"),
                    format!("{} {}", user.firstname, user.lastname)
                        .trim()
                        .to_string(),
                    user.email.clone(),
                    self.badge(&role, user.role.tone()),
                    user.created_at
                        .map(|at| self.format_date(at))
                        .unwrap_or_default(),
                ]
            })
            .collect();
        write_table(&mut out, headers, rows)
    }

    pub fn print_departments(&mut self, departments: &[Department]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        let rows = departments
            .iter()
            .map(|d| vec![d.id.to_string(), d.name.clone()])
            .collect();
        write_table(&mut out, vec!["ID".to_string(), "Name".to_string()], rows)
    }

    #[tracing::instrument(skip(self, dashboard))]
    pub fn print_dashboard(&mut self, dashboard: &Dashboard) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        self.write_dashboard(&mut out, dashboard)
    }

    pub fn write_dashboard<W: Write>(&self, mut out: W, dashboard: &Dashboard) -> anyhow::Result<()> {
        let stats = &dashboard.stats;
        writeln!(
            out,
            "Total Issues {}   Open / Pending {}   In Progress {}   Resolved {}",
            stats.total, stats.open, stats.in_progress, stats.resolved
        )?;

        writeln!(out)?;
        writeln!(out, "{TREND_SERIES_NAME}")?;
        let peak = dashboard.trend.data.iter().copied().max().unwrap_or(0);
        for (label, value) in dashboard
            .trend
            .categories
            .iter()
            .zip(dashboard.trend.data.iter().copied())
        {
            let pct = crate::widgets::percentage(value, peak.saturating_sub(value));
            writeln!(out, "  {label:<10} {} {value}", bar(pct))?;
        }

        writeln!(out)?;
        writeln!(out, "Department Performance")?;
        self.write_department_rows(&mut out, &dashboard.departments)?;

        writeln!(out)?;
        writeln!(out, "Recent Issues")?;
        let headers = vec![
            "ID".to_string(),
            "Title".to_string(),
            "Category".to_string(),
            "Location".to_string(),
            "Status".to_string(),
        ];
        let rows = dashboard
            .recent
            .iter()
            .map(|row| {
                vec![
                    row.id.clone(),
                    row.title.clone(),
                    self.paint(&row.category, row.color.ansi_code()),
                    row.location.clone(),
                    row.status.clone(),
                ]
            })
            .collect();
        write_table(out, headers, rows)
    }

    fn write_department_rows<W: Write>(
        &self,
        mut out: W,
        rows: &[DepartmentRow],
    ) -> anyhow::Result<()> {
        for row in rows {
            writeln!(
                out,
                "  {:<14} {} {:>3}%  resolved {} / pending {}",
                row.name,
                bar(row.resolved_pct),
                row.resolved_pct,
                row.resolved,
                row.pending
            )?;
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, analytics))]
    pub fn print_analytics(&mut self, analytics: &Analytics) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        writeln!(out, "Monthly Trend")?;
        if let Some(trend) = &analytics.monthly_trend {
            let rows = trend
                .categories
                .iter()
                .enumerate()
                .map(|(idx, month)| {
                    vec![
                        month.clone(),
                        trend.reported.get(idx).copied().unwrap_or(0).to_string(),
                        trend.resolved.get(idx).copied().unwrap_or(0).to_string(),
                    ]
                })
                .collect();
            write_table(
                &mut out,
                vec![
                    "Month".to_string(),
                    "Reported".to_string(),
                    "Resolved".to_string(),
                ],
                rows,
            )?;
        }

        writeln!(out)?;
        writeln!(out, "Issues by Area")?;
        let rows = analytics
            .issues_by_area
            .iter()
            .map(|a| vec![a.area.clone(), a.total.to_string(), a.resolved.to_string()])
            .collect();
        write_table(
            &mut out,
            vec![
                "Area".to_string(),
                "Total Issues".to_string(),
                "Resolved".to_string(),
            ],
            rows,
        )?;

        writeln!(out)?;
        writeln!(out, "Department Efficiency")?;
        let rows = crate::widgets::department_rows(&analytics.department_efficiency);
        self.write_department_rows(&mut out, &rows)
    }

    pub fn print_sla(&mut self, rules: &[SlaRule]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        let rows = rules
            .iter()
            .map(|rule| {
                let tone = match rule.priority {
                    crate::sla::Priority::High => Tone::Error,
                    crate::sla::Priority::Medium => Tone::Warning,
                    crate::sla::Priority::Low => Tone::Info,
                };
                vec![
                    rule.category.clone(),
                    self.badge(&format!("{:?}", rule.priority), tone),
                    format!("{}h", rule.sla_hours),
                    if rule.escalation.is_empty() {
                        "-".to_string()
                    } else {
                        rule.escalation.join("; ")
                    },
                ]
            })
            .collect();
        write_table(
            &mut out,
            vec![
                "Category".to_string(),
                "Priority".to_string(),
                "SLA".to_string(),
                "Escalation".to_string(),
            ],
            rows,
        )
    }

    pub fn print_notice(&mut self, notice: &Notice) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        let line = match notice {
            Notice::Success(text) => self.paint(text, "32"),
            Notice::Failure(text) => self.paint(text, "31"),
        };
        writeln!(out, "{line}")?;
        Ok(())
    }

    fn status_badge(&self, status: IssueStatus) -> String {
        self.badge(status.as_str(), status.tone())
    }

    fn badge(&self, text: &str, tone: Tone) -> String {
        let code = match tone {
            Tone::Success => "32",
            Tone::Error => "31",
            Tone::Warning => "33",
            Tone::Info => "36",
            Tone::Light => "90",
        };
        self.paint(text, code)
    }

    fn format_date(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.tz).format("%Y-%m-%d").to_string()
    }

    fn format_datetime(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.tz)
            .format("%Y-%m-%d %H:%M %Z")
            .to_string()
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn or_na(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => "N/A",
    }
}

fn bar(pct: u8) -> String {
    let filled = (usize::from(pct.min(100)) * BAR_WIDTH + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
