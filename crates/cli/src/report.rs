//! Rendering check outcomes for humans (colored line, table) and machines (JSON)

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};

use svccheck_core::{CheckMethod, CheckOutcome, CheckRequest, CheckStatus};

/// One finished check, as printed
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub service: String,
    pub method: CheckMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub status: CheckStatus,
    pub message: String,
    pub checked_at: DateTime<Utc>,
}

impl CheckReport {
    pub fn new(request: &CheckRequest, outcome: CheckOutcome) -> Self {
        Self {
            service: request.service_name.clone(),
            method: request.method,
            target: request.remote_target.clone(),
            status: outcome.status,
            message: outcome.message,
            checked_at: Utc::now(),
        }
    }
}

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "SERVICE")]
    service: String,
    #[tabled(rename = "WHERE")]
    location: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "MESSAGE")]
    message: String,
}

impl From<&CheckReport> for ReportRow {
    fn from(report: &CheckReport) -> Self {
        Self {
            service: report.service.clone(),
            location: location(report),
            status: report.status.to_string(),
            message: report.message.clone(),
        }
    }
}

fn location(report: &CheckReport) -> String {
    match (&report.method, &report.target) {
        (CheckMethod::Remote, Some(target)) => target.clone(),
        _ => "local".to_string(),
    }
}

fn colored_status(status: CheckStatus) -> String {
    match status {
        CheckStatus::Up => "UP".green().bold().to_string(),
        CheckStatus::Down => "DOWN".red().bold().to_string(),
    }
}

pub fn print_line(report: &CheckReport) {
    println!(
        "{} {} ({}) {}",
        colored_status(report.status),
        report.service.bold(),
        location(report),
        report.message
    );
}

pub fn print_table(reports: &[CheckReport]) {
    if reports.is_empty() {
        println!("{}", "No checks to run".yellow());
        return;
    }

    let rows: Vec<ReportRow> = reports.iter().map(ReportRow::from).collect();
    println!("{}", Table::new(rows));

    let up = reports.iter().filter(|r| r.status == CheckStatus::Up).count();
    let summary = format!("{} up, {} down", up, reports.len() - up);
    if up == reports.len() {
        println!("{}", summary.green().bold());
    } else {
        println!("{}", summary.red().bold());
    }
}

fn all_up(reports: &[CheckReport]) -> bool {
    reports.iter().all(|r| r.status == CheckStatus::Up)
}

/// Success only when every check is up
pub fn exit_code(reports: &[CheckReport]) -> ExitCode {
    if all_up(reports) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
