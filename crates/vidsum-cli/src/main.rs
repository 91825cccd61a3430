//! Video Summarizer CLI - summarize a video, then translate, chat or quiz on it.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use vidsum_core::{
    AppConfig, Lang, NoticeKind, NoticeQueue, Orchestrator, SessionSnapshot, Submission,
    SubmitOutcome, TranslateOutcome, create_api, target_languages,
};

#[derive(Parser, Debug)]
#[command(name = "vidsum")]
#[command(author, version, about = "Summarize YouTube videos", long_about = None)]
struct Args {
    /// YouTube video URL
    #[arg(required = true)]
    url: String,

    /// Spoken language of the video (en, te, hi); defaults to the configured language
    #[arg(short = 'l', long)]
    language: Option<String>,

    /// Translate the summary into this language
    #[arg(short = 't', long)]
    translate: Option<String>,

    /// Ask a question about the summary (repeatable)
    #[arg(short = 'a', long = "ask")]
    questions: Vec<String>,

    /// Print the generated quiz
    #[arg(long)]
    quiz: bool,

    /// Reveal quiz answers
    #[arg(long, requires = "quiz")]
    answers: bool,

    /// Print the transcript the summary was built from
    #[arg(long)]
    transcript: bool,

    /// Summarization API base URL
    #[arg(long, env = "VIDSUM_API_URL")]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable the translation memo
    #[arg(long)]
    no_cache: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Print and clear queued notices.
#[allow(clippy::print_stderr)]
fn flush_notices(notices: &NoticeQueue, pb: Option<&ProgressBar>) {
    for notice in notices.drain() {
        let line = match notice.kind {
            NoticeKind::Error => format!("error: {}", notice.message),
            NoticeKind::Info => notice.message,
        };
        match pb {
            Some(pb) => pb.println(line),
            None => eprintln!("{line}"),
        }
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    // Template is hardcoded and valid, unwrap is safe
    #[allow(clippy::unwrap_used)]
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

// CLI output is intentional
#[allow(clippy::print_stdout)]
fn print_results(snapshot: &SessionSnapshot, show_quiz: bool, show_answers: bool, show_transcript: bool) {
    println!("\nSummary\n-------\n{}", snapshot.summary_text());

    if show_transcript && let Some(ref transcript) = snapshot.transcription {
        println!("\nTranscript\n----------\n{transcript}");
    }

    if show_quiz {
        println!("\nQuiz\n----");
        if snapshot.questions.is_empty() {
            println!("(no quiz questions available)");
        }
        for (i, q) in snapshot.questions.iter().enumerate() {
            println!("{}. {}", i + 1, q.question);
            for (j, option) in q.options.iter().enumerate() {
                let marker = if show_answers && q.is_correct(j) { "*" } else { " " };
                println!("  {marker} {}) {option}", char::from(b'a' + u8::try_from(j % 26).unwrap_or(0)));
            }
        }
    }
}

/// Send each question to the chat endpoint, printing answers or failures inline.
#[allow(clippy::print_stdout)]
async fn ask_questions(orchestrator: &Orchestrator, notices: &NoticeQueue, questions: &[String]) {
    if questions.is_empty() {
        return;
    }

    println!("\nChat\n----");
    for question in questions {
        println!("> {question}");
        match orchestrator.send_chat_message(question).await {
            Ok(answer) => println!("{answer}"),
            Err(e) => println!("(failed: {})", e.user_message()),
        }
        // Already shown inline
        notices.drain();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path).context("Failed to load config file")?
    } else {
        AppConfig::load()
    };

    // Override config with CLI arguments (clap already folded in VIDSUM_API_URL)
    if let Some(api_url) = args.api_url {
        config.api.api_base = api_url;
    }
    if args.timeout.is_some() {
        config.api.timeout_secs = args.timeout;
    }
    if args.no_cache {
        config.translate_cache.enabled = false;
    }
    config.validate().context("Invalid configuration")?;

    let language = args
        .language
        .unwrap_or_else(|| config.default_source_lang.to_string());
    let submission = Submission::parse(&args.url, Some(&language))?;

    if let Some(ref target) = args.translate
        && !vidsum_core::config::is_target_language(target)
    {
        let known: Vec<_> = target_languages().iter().map(|l| l.code).collect();
        anyhow::bail!(
            "Unsupported target language '{}' (expected one of: {})",
            target,
            known.join(", ")
        );
    }

    let api = create_api(&config).context("Failed to initialize API client")?;
    info!("Using {} API at {}", api.name(), config.api.api_base);

    let notices = Arc::new(NoticeQueue::new());
    let orchestrator = Orchestrator::new(api, notices.clone());

    // Summarize + quiz
    let pb = spinner("Summarizing");
    let outcome = orchestrator.submit(&submission).await;
    flush_notices(&notices, Some(&pb));
    pb.finish_and_clear();

    match outcome {
        Ok(SubmitOutcome::Ready { quiz_loaded }) => {
            if args.quiz && !quiz_loaded {
                info!("Quiz could not be generated");
            }
        }
        Ok(SubmitOutcome::Superseded) => anyhow::bail!("Submission was superseded"),
        Err(e) => anyhow::bail!("Summarization failed: {}", e.user_message()),
    }

    // Translate
    if let Some(target) = args.translate {
        let pb = spinner(&format!("Translating to {}", Lang::new(&target).display_name()));
        let result = orchestrator.change_language(&Lang::new(target)).await;
        flush_notices(&notices, Some(&pb));
        pb.finish_and_clear();

        match result {
            Ok(TranslateOutcome::Translated) => {}
            Ok(other) => info!("Translation skipped: {:?}", other),
            Err(e) => info!("Keeping original summary: {}", e),
        }
    }

    let snapshot = orchestrator.snapshot().await;
    print_results(&snapshot, args.quiz, args.answers, args.transcript);

    ask_questions(&orchestrator, &notices, &args.questions).await;

    Ok(())
}
