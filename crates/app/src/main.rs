use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

use quiz_core::Clock;
use quiz_core::model::{OptionKey, Report, UserEmail, UserProfile};
use services::channel::SessionChannel;
use services::embed::{EmbedLinkService, LookupGeneration};
use services::upload::{UploadFile, UploadService};
use services::workflow::{QuizSession, QuizWorkflow, SessionEvent};
use services::QuizConfig;
use storage::repository::Storage;
use ui::{map_card_back, map_card_front, map_challenging_questions, map_results, map_wrong_answers};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingUser,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingUser => {
                write!(f, "no user: pass --user or set QUIZ_USER_EMAIL")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- quiz   [--ws-url <url>] [--api-url <url>] [--store-url <url>] [--user <email>]");
    eprintln!("  cargo run -p app -- upload [--api-url <url>] [--file <path>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --ws-url  ws://localhost:8765");
    eprintln!("  --api-url http://localhost:5000");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_WS_URL, QUIZ_API_BASE_URL, QUIZ_STORE_BASE_URL, QUIZ_USER_EMAIL");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quiz,
    Upload,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "quiz" => Some(Self::Quiz),
            "upload" => Some(Self::Upload),
            _ => None,
        }
    }
}

struct Args {
    ws_url: String,
    api_url: String,
    store_url: Option<String>,
    user: Option<UserEmail>,
    file: Option<PathBuf>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let config = QuizConfig::from_env();
        let mut parsed = Self {
            ws_url: config.ws_url,
            api_url: config.api_base_url,
            store_url: config.store_base_url,
            user: config.user_email,
            file: None,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--ws-url" => parsed.ws_url = require_value(args, "--ws-url")?,
                "--api-url" => parsed.api_url = require_value(args, "--api-url")?,
                "--store-url" => parsed.store_url = Some(require_value(args, "--store-url")?),
                "--user" => parsed.user = Some(UserEmail::new(require_value(args, "--user")?)),
                "--file" => parsed.file = Some(PathBuf::from(require_value(args, "--file")?)),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: run a quiz session when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Quiz,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Quiz,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let args = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    match cmd {
        Command::Quiz => run_quiz(args).await,
        Command::Upload => run_upload(args).await,
    }
}

async fn run_quiz(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let user = args.user.clone().ok_or(ArgsError::MissingUser)?;
    let clock = Clock::default_clock();

    let storage = match &args.store_url {
        Some(url) => Storage::document_store(url)?,
        None => {
            tracing::warn!("no document store configured; reports stay in memory");
            Storage::in_memory()
        }
    };

    // The profile document should exist before any report lands under it.
    let profile = UserProfile::from_email(user.clone(), clock.now());
    if let Err(err) = storage.users.ensure_user(&profile).await {
        tracing::warn!(error = %err, "could not ensure user profile");
    }

    let workflow = QuizWorkflow::new(clock, Arc::clone(&storage.reports));
    let embed = EmbedLinkService::new(args.api_url.clone());
    let mut lookups = LookupGeneration::new();

    tracing::info!(url = %args.ws_url, "connecting to question server");
    let mut channel = SessionChannel::connect(&args.ws_url).await?;
    let mut session = workflow.start_session();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(message) = channel.next_message().await {
        match workflow.handle_message(&mut session, &user, message).await {
            SessionEvent::QuestionReady => {
                run_card(
                    &workflow,
                    &mut session,
                    &mut channel,
                    &embed,
                    &mut lookups,
                    &mut lines,
                )
                .await?;
            }
            SessionEvent::AnswerAcknowledged | SessionEvent::Ignored => {}
            SessionEvent::Completed => break,
        }
    }

    lookups.invalidate();
    channel.close().await;

    match session.report() {
        Some(report) => print_report(report),
        None => println!("Session ended without a report."),
    }
    Ok(())
}

/// Drive one card through select → confirm → reveal → advance.
async fn run_card(
    workflow: &QuizWorkflow,
    session: &mut QuizSession,
    channel: &mut SessionChannel,
    embed: &EmbedLinkService,
    lookups: &mut LookupGeneration,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(front) = session.active_card().map(map_card_front) else {
        return Ok(());
    };

    println!();
    println!("{}", front.prompt);
    for row in &front.options {
        println!("  {}", row.label);
    }
    let keys: Vec<&str> = front.options.iter().map(|row| row.key.as_str()).collect();

    loop {
        println!("Your answer ({}):", keys.join("/"));
        let Some(line) = lines.next_line().await? else {
            // stdin closed; leave the card unanswered
            return Ok(());
        };
        let Some(card) = session.active_card_mut() else {
            return Ok(());
        };
        if let Err(err) = card.select(OptionKey::new(line)) {
            println!("{err}");
            continue;
        }
        match card.confirm() {
            Ok(_) => break,
            Err(err) => {
                println!("{err}");
            }
        }
    }

    // The flip itself never waits on the network.
    if let Some(card) = session.active_card_mut() {
        card.reveal()?;
    }

    // The lookup for this card invalidates any still-in-flight one.
    let token = lookups.begin();
    let topics = session
        .active_card()
        .map(|card| card.question().related_topics.clone())
        .unwrap_or_default();
    let embed_link = match embed.lookup(&topics).await {
        Ok(link) if lookups.is_current(token) => Some(link),
        Ok(_) => None,
        Err(err) => {
            tracing::warn!(error = %err, "embed lookup failed");
            None
        }
    };
    if let Some(back) = session
        .active_card()
        .and_then(|card| map_card_back(card, embed_link.as_ref()))
    {
        println!("{} [{}]", back.verdict, back.difficulty_label);
        println!("Explanation: {}", back.explanation);
        if let Some(link) = &back.embed_link {
            println!("Watch: {link}");
        }
        if !back.topics.is_empty() {
            println!("Topics: {}", back.topics.join(", "));
        }
    }

    println!("Press Enter for the next question...");
    let _ = lines.next_line().await?;
    workflow.advance_current(session, channel).await?;
    Ok(())
}

fn print_report(report: &Report) {
    let results = map_results(report);

    println!();
    println!("Session report");
    println!(
        "  Questions: {} | Correct: {} | Wrong: {}",
        results.total_questions, results.total_correct, results.total_wrong
    );
    println!(
        "  Accuracy: {:.1}% | Average time: {}",
        results.accuracy_percent, results.average_time
    );

    let wrong = map_wrong_answers(report);
    if !wrong.is_empty() {
        println!("  Wrong answers:");
        for row in wrong {
            println!(
                "    {} (you: {}, correct: {}, {})",
                row.question, row.user_answer, row.correct_answer, row.time_taken
            );
        }
    }

    let challenging = map_challenging_questions(report);
    if !challenging.is_empty() {
        println!("  Challenging questions:");
        for row in challenging {
            println!(
                "    {} ({} attempts, {:.0}% accuracy, avg {})",
                row.question, row.attempts, row.accuracy_percent, row.average_time
            );
        }
    }
}

async fn run_upload(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let service = UploadService::new(args.api_url);

    let file = match &args.file {
        Some(path) => {
            let bytes = std::fs::read(path)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_owned());
            Some(UploadFile { name, bytes })
        }
        None => None,
    };

    let message = service.upload(file).await?;
    println!("{message}");
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
