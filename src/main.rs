mod calendar;
mod config;
mod forms;
mod models;
mod seed;
mod store;
mod tui;
mod views;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use config::Config;
use models::{ApplicationStatus, InterviewStatus, JobCategory};
use std::path::PathBuf;
use store::Store;
use tracing::debug;
use views::{truncate, ApplicationFilter};

#[derive(Parser)]
#[command(name = "pipeline")]
#[command(about = "Job application tracker - pipeline board, interviews, reminders and analytics")]
struct Cli {
    /// Snapshot JSON to start from (defaults to the built-in sample data)
    #[arg(long, global = true, env = "PIPELINE_DATA")]
    data: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive board (default)
    Board,

    /// List applications
    List {
        /// Filter by status (saved, applied, interview, offer, rejected)
        #[arg(short, long)]
        status: Option<ApplicationStatus>,

        /// Filter by job category
        #[arg(short, long)]
        category: Option<JobCategory>,

        /// Filter by exact location
        #[arg(short, long)]
        location: Option<String>,

        /// Search company and role
        #[arg(short = 'q', long)]
        search: Option<String>,
    },

    /// Show application details
    Show {
        /// Application ID
        id: String,
    },

    /// Summary counts for the pipeline
    Stats,

    /// List scheduled interviews
    Interviews {
        /// Filter by interview status (upcoming, completed, cancelled)
        #[arg(short, long)]
        status: Option<InterviewStatus>,
    },

    /// List reminders
    Reminders {
        /// Include completed reminders
        #[arg(short, long)]
        all: bool,
    },

    /// Show a month of interviews, reminders and deadlines
    Calendar {
        /// Month to show as YYYY-MM (defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Conversion rates and breakdowns
    Analytics,

    /// Print the current data as a snapshot JSON document
    Export,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Board);
    let config = Config::resolve(cli.data, cli.log_file);
    config.init_logging(matches!(command, Commands::Board))?;
    debug!(?config, "resolved configuration");

    let store = seed::initial_store(config.data.as_deref())?;
    let today = Local::now().date_naive();

    match command {
        Commands::Board => tui::run(store, today)?,

        Commands::List {
            status,
            category,
            location,
            search,
        } => {
            let filter = ApplicationFilter {
                search: search.unwrap_or_default(),
                category,
                location,
            };
            let apps: Vec<_> = views::filter_applications(store.applications(), &filter)
                .into_iter()
                .filter(|a| status.is_none_or(|s| a.status == s))
                .collect();

            if apps.is_empty() {
                println!("No applications found.");
            } else {
                println!(
                    "{:<16} {:<10} {:<18} {:<28} {:<20} {:>16}",
                    "ID", "STATUS", "COMPANY", "ROLE", "LOCATION", "SALARY"
                );
                println!("{}", "-".repeat(113));
                for app in apps {
                    println!(
                        "{:<16} {:<10} {:<18} {:<28} {:<20} {:>16}",
                        truncate(&app.id, 16),
                        app.status.label(),
                        truncate(&app.company, 16),
                        truncate(&app.role, 26),
                        truncate(&app.location, 18),
                        views::format_salary(app.salary)
                    );
                }
            }
        }

        Commands::Show { id } => match store.application(&id) {
            Some(app) => {
                println!("Application #{}", app.id);
                println!("Company: {}", app.company);
                println!("Role: {}", app.role);
                println!("Status: {}", app.status.label());
                println!("Location: {} ({})", app.location, app.job_mode.label());
                println!("Category: {}", app.category.label());
                println!("Salary: {}", views::format_salary(app.salary));
                println!("Resume: {}", app.resume_version);
                if let Some(name) = &app.recruiter_name {
                    println!("Recruiter: {}", name);
                }
                if let Some(email) = &app.recruiter_email {
                    println!("Recruiter email: {}", email);
                }
                if let Some(link) = &app.job_description_link {
                    println!("Job description: {}", link);
                }
                if let Some(applied) = app.date_applied {
                    println!("Applied: {}", applied.format("%Y-%m-%d"));
                }
                if let Some(when) = app.interview_date {
                    let kind = app.interview_type.map(|t| t.label()).unwrap_or("-");
                    let status = app.interview_status.map(|s| s.label()).unwrap_or("-");
                    println!("Interview: {} ({}, {})", when.format("%Y-%m-%d %H:%M"), kind, status);
                }
                println!("Created: {}", app.created_at.format("%Y-%m-%d %H:%M"));

                let linked: Vec<_> = store
                    .reminders()
                    .iter()
                    .filter(|r| r.application_id.as_deref() == Some(app.id.as_str()))
                    .collect();
                if !linked.is_empty() {
                    println!("\nReminders ({}):", linked.len());
                    for rem in linked {
                        let done = if rem.completed { "x" } else { " " };
                        println!("  [{}] {} - {}", done, rem.title, rem.date.format("%Y-%m-%d"));
                    }
                }
                if let Some(notes) = &app.notes {
                    println!("\n--- Notes ---\n{}", textwrap::fill(notes, 80));
                }
            }
            None => {
                println!("Application #{} not found.", id);
            }
        },

        Commands::Stats => print_stats(&store, today),

        Commands::Interviews { status } => {
            let interviews = views::interviews(store.applications(), status);
            if interviews.is_empty() {
                println!("No interviews found.");
            } else {
                println!(
                    "{:<16} {:<18} {:<28} {:<18} {:<8} {:<10}",
                    "ID", "COMPANY", "ROLE", "WHEN", "TYPE", "STATUS"
                );
                println!("{}", "-".repeat(103));
                for app in interviews {
                    let when = app
                        .interview_date
                        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_default();
                    println!(
                        "{:<16} {:<18} {:<28} {:<18} {:<8} {:<10}",
                        truncate(&app.id, 16),
                        truncate(&app.company, 16),
                        truncate(&app.role, 26),
                        when,
                        app.interview_type.map(|t| t.label()).unwrap_or("-"),
                        app.interview_status.map(|s| s.label()).unwrap_or("-")
                    );
                }
            }
        }

        Commands::Reminders { all } => {
            let reminders = views::reminders_view(store.reminders(), all);
            if reminders.is_empty() {
                println!("No reminders found.");
            } else {
                println!(
                    "{:<4} {:<16} {:<36} {:<10} {:<15} {:<16}",
                    "DONE", "ID", "TITLE", "DUE", "CATEGORY", "APPLICATION"
                );
                println!("{}", "-".repeat(102));
                for rem in reminders {
                    let linked = views::linked_application(store.applications(), rem)
                        .map(|a| a.company.clone())
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:<4} {:<16} {:<36} {:<10} {:<15} {:<16}",
                        if rem.completed { "[x]" } else { "[ ]" },
                        truncate(&rem.id, 16),
                        truncate(&rem.title, 34),
                        views::date_label(rem.date, today),
                        rem.category.label(),
                        truncate(&linked, 16)
                    );
                }
            }
        }

        Commands::Calendar { month } => {
            let month = match month {
                Some(m) => parse_month(&m)?,
                None => calendar::first_of_month(today),
            };
            print_calendar(&store, month);
        }

        Commands::Analytics => print_analytics(&store, today),

        Commands::Export => {
            let json = serde_json::to_string_pretty(&store.to_snapshot()).context("Failed to serialize snapshot")?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn print_stats(store: &Store, today: NaiveDate) {
    let apps = store.applications();
    let counts = views::status_counts(apps);

    println!("Total applications:   {}", counts.total());
    println!("Interviews scheduled: {}", counts.interview);
    println!("Offers received:      {}", counts.offer);
    println!("Pending follow-ups:   {}", views::pending_reminders(store.reminders(), None).len());

    println!("\nPipeline:");
    for (status, n) in counts.by_status() {
        println!("  {:<10} {}", status.label(), n);
    }

    let upcoming = views::upcoming_interviews(apps, Some(5));
    if !upcoming.is_empty() {
        println!("\nUpcoming interviews:");
        for app in upcoming {
            if let Some(when) = app.interview_date {
                println!("  {} - {} - {}", when.format("%b %-d %-I:%M %p"), app.company, app.role);
            }
        }
    }

    let pending = views::pending_reminders(store.reminders(), Some(5));
    if !pending.is_empty() {
        println!("\nPending reminders:");
        for rem in pending {
            println!("  {:<9} {}", views::date_label(rem.date, today), rem.title);
        }
    }

    println!("\nRecent activity:");
    for app in views::recent_activity(apps, Some(5)) {
        println!(
            "  {} - {} ({}, {})",
            app.company,
            app.role,
            app.status.label(),
            app.created_at.format("%b %-d")
        );
    }
}

fn print_calendar(store: &Store, month: NaiveDate) {
    let events = calendar::calendar_events(store.applications(), store.reminders());

    println!("{}", month.format("%B %Y"));
    println!(" Sun  Mon  Tue  Wed  Thu  Fri  Sat");
    for week in calendar::month_grid(month) {
        let line: String = week
            .iter()
            .map(|day| match day {
                Some(d) => {
                    let marker = if calendar::events_on(&events, *d).is_empty() { ' ' } else { '*' };
                    format!(" {:>3}{}", d.format("%-d").to_string(), marker)
                }
                None => "     ".to_string(),
            })
            .collect();
        println!("{}", line);
    }

    let next = calendar::next_month(month);
    let mut in_month: Vec<_> = events
        .iter()
        .filter(|e| e.date.date() >= month && e.date.date() < next)
        .collect();
    in_month.sort_by_key(|e| e.date);

    if in_month.is_empty() {
        println!("\nNo events this month.");
    } else {
        println!();
        for event in in_month {
            println!(
                "{:<18} {:<10} {}",
                event.date.format("%a %b %-d %H:%M"),
                event.kind.as_str(),
                event.title
            );
        }
    }
}

fn print_analytics(store: &Store, today: NaiveDate) {
    let apps = store.applications();
    let counts = views::status_counts(apps);
    let funnel = views::funnel(&counts);

    println!("Total applications: {}", counts.total());
    println!("Interview rate:     {}%", views::interview_rate(&counts));
    println!("Offer rate:         {}%", views::offer_rate(&counts));
    println!("Resume versions:    {}", store.resume_versions().len());

    println!("\nBy status:");
    for (status, n) in counts.by_status() {
        println!("  {:<10} {:>3} {}", status.label(), n, "#".repeat(n));
    }

    println!("\nBy category:");
    for (category, n) in views::category_counts(apps) {
        println!("  {:<20} {:>3} {}", category.label(), n, "#".repeat(n));
    }

    println!("\nApplications per month:");
    for (month, n) in views::applications_per_month(apps, 6, today) {
        println!("  {:<4} {:>3} {}", month, n, "#".repeat(n));
    }

    println!("\nFunnel:");
    println!("  Applications sent  {}", funnel.submitted);
    println!("  Reached interview  {}", funnel.interviewed);
    println!("  Offers             {} ({}% of interviews)", funnel.offers, funnel.offer_rate);
}

fn parse_month(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_board() {
        let cli = Cli::try_parse_from(["pipeline"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_list_parses_typed_filters() {
        let cli = Cli::try_parse_from(["pipeline", "list", "--status", "interview", "--category", "design"]).unwrap();
        match cli.command {
            Some(Commands::List { status, category, .. }) => {
                assert_eq!(status, Some(ApplicationStatus::Interview));
                assert_eq!(category, Some(JobCategory::Design));
            }
            _ => panic!("expected list command"),
        }
        assert!(Cli::try_parse_from(["pipeline", "list", "--status", "ghosted"]).is_err());
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-02").unwrap(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("February").is_err());
    }
}
