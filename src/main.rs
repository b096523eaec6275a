use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;

use phonetic_feedback::feedback::{
    EvaluationPolicy, FeedbackRequest, FeedbackResponse, FeedbackService,
};
use phonetic_feedback::logging::init_subscriber;
use phonetic_feedback::reference::{DirectoryReferences, HttpReferences, ReferenceSource};
use phonetic_feedback::settings::{load_settings, Settings};
use phonetic_feedback::tokenizer::tokenize;
use phonetic_feedback::types::{Mistake, MistakeKind, PositionedToken};
use phonetic_feedback::ScoringFormula;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print the raw alignment operations.
    #[arg(short, long)]
    debug: bool,
    /// Settings file (JSON). Defaults to `$FEEDBACK_CONFIG` when set.
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    scoring: Option<ScoringFormula>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare two transcriptions given on the command line.
    Compare {
        reference: String,
        actual: String,
        #[arg(long)]
        json: bool,
    },
    /// Compare two transcriptions read from files.
    Files {
        reference: PathBuf,
        actual: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Read a feedback request (JSON) from stdin and write the response to stdout.
    Feedback {
        /// Base URL of the text service; texts are fetched from `<url>/<text_id>`.
        #[arg(long, conflicts_with = "references")]
        texts_url: Option<String>,
        /// Directory of `<text_id>.json` reference records.
        #[arg(long)]
        references: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(scoring) = cli.scoring {
        settings.scoring = scoring;
    }
    init_subscriber(if cli.debug { "debug" } else { &settings.log_level });
    let policy = EvaluationPolicy::from(&settings);

    match cli.command {
        Command::Compare {
            reference,
            actual,
            json,
        } => compare(&policy, &reference, &actual, json, cli.debug),
        Command::Files {
            reference,
            actual,
            json,
        } => {
            let reference_text = std::fs::read_to_string(&reference)
                .with_context(|| format!("failed to read {}", reference.display()))?;
            let actual_text = std::fs::read_to_string(&actual)
                .with_context(|| format!("failed to read {}", actual.display()))?;
            compare(&policy, &reference_text, &actual_text, json, cli.debug)
        }
        Command::Feedback {
            texts_url,
            references,
        } => feedback(&settings, policy, texts_url, references).await,
    }
}

/// Picks the reference source: an explicit flag wins, then the text service
/// URL from settings, then the settings directory.
async fn feedback(
    settings: &Settings,
    policy: EvaluationPolicy,
    texts_url: Option<String>,
    references: Option<PathBuf>,
) -> anyhow::Result<()> {
    if let Some(root) = references {
        return respond(DirectoryReferences::new(root), policy).await;
    }
    let texts = &settings.services.texts;
    if let Some(url) = texts_url.or_else(|| texts.url.clone()) {
        let source = HttpReferences::new(url, texts.timeout())
            .context("failed to build text service client")?;
        return respond(source, policy).await;
    }
    let root = settings.references_dir.clone().context(
        "no reference source: pass --texts-url or --references, \
         or set FEEDBACK_TEXTS_URL or FEEDBACK_REFERENCES_DIR",
    )?;
    respond(DirectoryReferences::new(root), policy).await
}

async fn respond<S: ReferenceSource>(
    references: S,
    policy: EvaluationPolicy,
) -> anyhow::Result<()> {
    let mut body = String::new();
    std::io::stdin()
        .read_to_string(&mut body)
        .context("failed to read request from stdin")?;
    let request: FeedbackRequest =
        serde_json::from_str(&body).context("malformed feedback request")?;
    let service = FeedbackService::new(references, policy);
    let response = service.handle(&request).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn compare(
    policy: &EvaluationPolicy,
    reference: &str,
    actual: &str,
    json: bool,
    debug: bool,
) -> anyhow::Result<()> {
    let evaluation = policy.evaluate(reference, actual)?;
    if debug {
        for op in evaluation.alignment.operations.iter() {
            println!("{:?}", op);
        }
    }
    if json {
        let response = FeedbackResponse::from(evaluation.report);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }
    evaluation
        .alignment
        .pretty(&tokenize(reference), &tokenize(actual));
    println!();
    println!("accuracy: {:.2}%", evaluation.report.accuracy);
    for mistake in evaluation.report.mistakes.iter() {
        println!("  {}", describe(mistake));
    }
    Ok(())
}

fn describe(mistake: &Mistake) -> String {
    let token = |t: &Option<PositionedToken>| match t {
        Some(t) => format!("{}@{}", t.value, t.position),
        None => "-".to_owned(),
    };
    let kind = match mistake.kind {
        MistakeKind::Replacement => "replacement".yellow(),
        MistakeKind::Insertion => "insertion".green(),
        MistakeKind::Deletion => "deletion".red(),
    };
    format!(
        "{:<11} {} -> {}",
        kind,
        token(&mistake.reference),
        token(&mistake.actual)
    )
}
