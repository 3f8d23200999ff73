//! Command-line front end: create, edit and browse mock interviews.

use anyhow::{Context, bail};
use autoagents_llm::LLMProvider;
use autoagents_llm::backends::openai::OpenAI;
use autoagents_llm::builder::LLMBuilder;
use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use mockview::core::{
    InterviewForm, InterviewListing, QuestionGenerator, SubmitError, SubmitOutcome, load_for_edit,
};
use mockview::protocol::{DraftField, InterviewRecord, RecordId, UserId};
use mockview::store::InterviewStore;
use mockview::{config::MockviewConfig, init_logging, open_store};
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_MODEL: &str = "gpt-4.1";
const OPENAI_PROVIDER: &str = "openai";

/// Command-line options.
#[derive(Parser)]
#[command(name = "mockview", version)]
struct Cli {
    /// Optional path to a mockview.json5 config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Identity of the current user (falls back to MOCKVIEW_USER)
    #[arg(long)]
    user: Option<String>,
    /// OpenAI model name used for question generation
    #[arg(long)]
    model: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate questions for a new mock interview
    Create(DraftArgs),
    /// Change an interview and regenerate its questions
    Edit {
        id: String,
        #[command(flatten)]
        draft: DraftArgs,
    },
    /// List the current user's interviews, newest first
    List,
    /// Print one interview as JSON
    Show { id: String },
}

/// Draft fields; on `edit`, omitted fields keep their stored value.
#[derive(Args)]
struct DraftArgs {
    #[arg(long)]
    position: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    experience: Option<String>,
    #[arg(long)]
    tech_stack: Option<String>,
}

impl DraftArgs {
    fn fields(&self) -> [(DraftField, Option<&String>); 4] {
        [
            (DraftField::Position, self.position.as_ref()),
            (DraftField::Description, self.description.as_ref()),
            (DraftField::Experience, self.experience.as_ref()),
            (DraftField::TechStack, self.tech_stack.as_ref()),
        ]
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("cwd")?;
    let config = if let Some(path) = cli.config.as_ref() {
        info!("loading config from path: {}", path.display());
        MockviewConfig::load_from_path(path).context("failed to load config")?
    } else {
        info!("loading layered config from cwd: {}", cwd.display());
        let layered =
            MockviewConfig::load_layered(&cwd).context("failed to load layered config")?;
        debug!("layered config loaded (layers={})", layered.layers.len());
        layered.config
    };
    let store = open_store(&config, &cwd).context("failed to open interview store")?;
    let user = cli
        .user
        .clone()
        .or_else(|| std::env::var("MOCKVIEW_USER").ok())
        .map(UserId::new);

    match &cli.command {
        Command::Create(draft) => {
            let form = build_form(&cli, &config, store, None)?;
            apply_draft_args(&form, draft);
            report(form.submit(user.as_ref()).await)
        }
        Command::Edit { id, draft } => {
            let key = RecordId::from(id.as_str());
            let Some(existing) = load_for_edit(store.as_ref(), &key)
                .await
                .context("failed to read interview")?
            else {
                bail!("no interview with id {key}");
            };
            let form = build_form(&cli, &config, store, Some(existing))?;
            apply_draft_args(&form, draft);
            report(form.submit(user.as_ref()).await)
        }
        Command::List => {
            let Some(user) = user else {
                bail!("--user or MOCKVIEW_USER is required to list interviews");
            };
            list(store.as_ref(), &user).await
        }
        Command::Show { id } => {
            let key = RecordId::from(id.as_str());
            let Some(record) = load_for_edit(store.as_ref(), &key)
                .await
                .context("failed to read interview")?
            else {
                bail!("no interview with id {key}");
            };
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
    }
}

fn build_llm(cli: &Cli, config: &MockviewConfig) -> anyhow::Result<Arc<dyn LLMProvider>> {
    let configured = config.generation.model.as_ref();
    if let Some(model) = configured
        && model.provider != OPENAI_PROVIDER
    {
        bail!("unsupported model provider: {}", model.provider);
    }
    let model_name = cli
        .model
        .clone()
        .or_else(|| configured.map(|model| model.name.clone()))
        .or_else(|| std::env::var("OPENAI_MODEL").ok())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let api_key = std::env::var("OPENAI_API_KEY")
        .context("OPENAI_API_KEY is required to generate interview questions")?;
    info!("building OpenAI provider (model={})", model_name);
    let llm: Arc<dyn LLMProvider> = LLMBuilder::<OpenAI>::new()
        .api_key(api_key)
        .model(model_name)
        .build()
        .context("failed to build OpenAI LLM provider")?;
    Ok(llm)
}

fn build_form(
    cli: &Cli,
    config: &MockviewConfig,
    store: Arc<dyn InterviewStore>,
    initial: Option<InterviewRecord>,
) -> anyhow::Result<InterviewForm> {
    let llm = build_llm(cli, config)?;
    let generator = QuestionGenerator::from_config(llm, &config.generation)
        .context("failed to build question generator")?;
    Ok(InterviewForm::new(store, Arc::new(generator), initial)
        .with_listing_route(config.listing_route.clone()))
}

fn apply_draft_args(form: &InterviewForm, args: &DraftArgs) {
    for (field, value) in args.fields() {
        if let Some(value) = value {
            form.set_field(field, value.as_str());
        }
    }
}

fn report(result: Result<SubmitOutcome, SubmitError>) -> anyhow::Result<()> {
    match result {
        Ok(outcome) => {
            println!(
                "{} {}",
                outcome.notification.title, outcome.notification.description
            );
            println!("id: {}", outcome.record_id);
            println!("next: {}", outcome.redirect);
            Ok(())
        }
        Err(SubmitError::Validation(errors)) => {
            for violation in &errors.violations {
                eprintln!("{}: {}", violation.field, violation.message);
            }
            bail!("interview draft is invalid")
        }
        Err(err) => {
            if let Some(notification) = err.notification() {
                eprintln!("{} {}", notification.title, notification.description);
            }
            Err(err).context("submission failed")
        }
    }
}

async fn list(store: &dyn InterviewStore, user: &UserId) -> anyhow::Result<()> {
    let mut listing =
        InterviewListing::subscribe(store, user).context("failed to watch interviews")?;
    let records = listing.next().await.context("failed to list interviews")?;
    if records.is_empty() {
        println!("no interviews");
    }
    for entry in records {
        println!(
            "{}  {}  {} yrs  {}  ({} questions, created {})",
            entry.key,
            entry.record.position,
            entry.record.experience,
            entry.record.tech_stack,
            entry.record.questions.len(),
            entry.record.created_at.format("%Y-%m-%d %H:%M"),
        );
    }
    Ok(())
}
