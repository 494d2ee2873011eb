use std::fmt;

use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use quiz_core::calendar;
use quiz_core::model::{Attempts, CheckSubmission, GradeResult, format_elapsed};
use quiz_core::stats::BucketKey;
use services::{AppServices, Clock};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod report;

#[derive(Debug)]
enum ArgsError {
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Parser)]
#[command(name = "quiz", about = "Track quiz answers and grading statistics")]
struct Cli {
    /// SQLite database URL or path.
    #[arg(long = "db", env = "QUIZ_DB_URL", default_value = "sqlite://quiz.sqlite3")]
    db_url: String,

    /// Log filter, e.g. `info` or `services=debug`.
    #[arg(long, env = "QUIZ_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start a chapter quiz or resume the saved one.
    Start {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        chapter: String,
        #[arg(long)]
        count: usize,
    },
    /// Save the answer to one question.
    Answer {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        chapter: String,
        /// Question number, starting at 1.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        question: u32,
        #[arg(long)]
        answer: String,
        /// Seconds spent on the question.
        #[arg(long, default_value_t = 0)]
        time: u64,
    },
    /// Grade an answered question.
    Check {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        chapter: String,
        /// Question number, starting at 1.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        question: u32,
        /// correct, incorrect or discuss.
        #[arg(long)]
        result: GradeResult,
        /// 1, 2 or 3+.
        #[arg(long, default_value = "1")]
        attempts: Attempts,
        #[arg(long)]
        marked: bool,
    },
    /// Show statistics.
    Stats {
        #[command(subcommand)]
        view: StatsView,
    },
}

#[derive(Subcommand)]
enum StatsView {
    /// One day, today by default.
    Daily {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// One ISO week, the current one by default.
    Weekly {
        #[arg(long)]
        week: Option<u32>,
    },
    /// Chapter totals and per-chapter details.
    Chapters {
        #[arg(long)]
        subject: Option<String>,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_owned();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn run_command(
    app: &AppServices,
    clock: Clock,
    command: Command,
) -> Result<String, Box<dyn std::error::Error>> {
    match command {
        Command::Start {
            subject,
            chapter,
            count,
        } => {
            let started = app.quizzes().start_quiz(&subject, &chapter, count).await?;
            let progress = started.state.progress();
            let verb = if started.resumed { "resumed" } else { "started" };
            Ok(format!(
                "{verb} {} / {}: {} of {} answered, continue at question {}\n",
                started.state.subject(),
                started.state.chapter(),
                progress.answered,
                progress.total,
                started.resume_index + 1,
            ))
        }
        Command::Answer {
            subject,
            chapter,
            question,
            answer,
            time,
        } => {
            let index = question as usize - 1;
            let outcome = app
                .quizzes()
                .submit_answer(&subject, &chapter, index, &answer, time)
                .await?;
            let next = match (outcome.is_complete, outcome.next_index) {
                (true, _) => "quiz complete".to_owned(),
                (false, Some(next)) => format!("next question {}", next + 1),
                (false, None) => "earlier questions remain".to_owned(),
            };
            Ok(format!(
                "saved answer to question {question} ({}), {next}\n",
                format_elapsed(time)
            ))
        }
        Command::Check {
            subject,
            chapter,
            question,
            result,
            attempts,
            marked,
        } => {
            let submission = CheckSubmission::new(question - 1, result, attempts).marked(marked);
            let outcome = app
                .checks()
                .check_question(&subject, &chapter, submission)
                .await?;
            Ok(format!(
                "question {question} marked {result}; {} statistics update(s)\n",
                outcome.events.len()
            ))
        }
        Command::Stats { view } => render_stats(app, clock, view).await,
    }
}

async fn render_stats(
    app: &AppServices,
    clock: Clock,
    view: StatsView,
) -> Result<String, Box<dyn std::error::Error>> {
    let stats = app.stats();
    match view {
        StatsView::Daily { date } => {
            let date = date.unwrap_or_else(|| clock.today());
            let bucket = stats.get(&BucketKey::Day(date)).await?;
            Ok(report::bucket(&calendar::format_day(date), &bucket))
        }
        StatsView::Weekly { week } => {
            let today = clock.today();
            let week = week.unwrap_or_else(|| calendar::iso_week(today));
            let bucket = stats.get(&BucketKey::Week(week)).await?;
            let title = match calendar::week_bounds(today.iso_week().year(), week) {
                Some((monday, sunday)) => format!(
                    "week {week} ({} to {})",
                    calendar::format_day(monday),
                    calendar::format_day(sunday)
                ),
                None => format!("week {week}"),
            };
            Ok(report::bucket(&title, &bucket))
        }
        StatsView::Chapters { subject } => {
            let repo = stats.load().await?;
            let mut out = report::overview(
                subject.as_deref(),
                &repo.chapter_overview(subject.as_deref()),
            );
            for (key, bucket) in repo.chapters_for(subject.as_deref()) {
                out.push_str(&report::bucket(&format!("  {key}"), bucket));
                let details = app
                    .checks()
                    .chapter_details(key.subject(), key.chapter())
                    .await?;
                out.push_str(&report::details(&details));
            }
            Ok(out)
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let db_url = normalize_sqlite_url(&cli.db_url);
    prepare_sqlite_file(&db_url)?;
    let clock = Clock::default_clock();
    let app = AppServices::new_sqlite(&db_url, clock).await?;
    tracing::debug!(db_url = %db_url, "storage ready");

    let output = run_command(&app, clock, cli.command).await?;
    print!("{output}");
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
