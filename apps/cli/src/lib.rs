pub mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wordmemo_core::QuizMode;
use wordmemo_storage::{load_context, StorageConfig, StorageFacade};

#[derive(Parser)]
#[command(name = "wordmemo", version, about = "Vocabulary drills in the terminal")]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List word bank tags
    Tags,

    /// Print the words stored under a tag
    Show { tag: String },

    /// Import a word bank file
    Import {
        file: PathBuf,

        /// Store as a new tag instead of replacing the current word bank
        #[arg(long)]
        tag: Option<String>,
    },

    /// Delete a tag
    RemoveTag { tag: String },

    /// Run an exam
    Drill {
        /// Tag to drill (defaults to the current one)
        #[arg(long, conflicts_with = "mistakes")]
        tag: Option<String>,

        /// Drill the words you got wrong
        #[arg(long)]
        mistakes: bool,

        #[arg(long, value_enum, default_value_t = Mode::Term)]
        mode: Mode,
    },

    /// Show missed words
    Mistakes {
        /// Forget every recorded miss
        #[arg(long)]
        clear: bool,
    },

    /// Show finished exams, newest first
    History,

    /// Show which storage backend is in use
    Backend,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// See the definition, type the word
    Term,
    /// See the word, type the definition
    Definition,
}

impl From<Mode> for QuizMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Term => QuizMode::TermRecall,
            Mode::Definition => QuizMode::DefinitionRecall,
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = StorageConfig::load_from(cli.config.as_deref())
        .context("failed to load storage configuration")?;
    tracing::debug!(backend = %config.backend_type, data_dir = %config.data_dir.display(), "configuration loaded");

    let facade = StorageFacade::from_config(&config);
    let mut context = load_context(&facade).await;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Tags => commands::tags::list(&context, &mut out),
        Commands::Show { tag } => commands::tags::show(&context, &tag, &mut out),
        Commands::Import { file, tag } => {
            commands::tags::import(&facade, &mut context, &file, tag.as_deref(), &mut out).await
        }
        Commands::RemoveTag { tag } => {
            commands::tags::remove(&facade, &mut context, &tag, &mut out).await
        }
        Commands::Drill {
            tag,
            mistakes,
            mode,
        } => {
            let tag = if mistakes {
                Some(wordmemo_core::MISTAKES_TAG.to_string())
            } else {
                tag
            };
            let mut input = std::io::stdin().lock();
            commands::drill::execute(
                &facade,
                &mut context,
                tag.as_deref(),
                mode.into(),
                &mut input,
                &mut out,
            )
            .await
        }
        Commands::Mistakes { clear } => {
            commands::mistakes::execute(&facade, &mut context, clear, &mut out).await
        }
        Commands::History => commands::history::execute(&context, &mut out),
        Commands::Backend => commands::backend::execute(&facade, &config, &mut out).await,
    }
}
