//! Fusion CLI - terminal shell and headless AI operations

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use colored::Colorize;

use fusion::operations::quarterly_dataset;
use fusion::provider::{create_provider, Provider};
use fusion::{
    BlogPostWriter, DataInsights, FixSuggestion, FusionConfig, FusionError, Operation,
    ProductConfig, ProductCopywriter, TaskRunner, NAV_ITEMS,
};

#[derive(Parser)]
#[command(name = "fusion")]
#[command(about = "Fusion - terminal application shell over async AI operations")]
#[command(version)]
struct Cli {
    /// Override the provider (gemini, mock)
    #[arg(short, long, global = true)]
    provider: Option<String>,

    /// Override the model
    #[arg(short, long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive shell (default)
    Tui {
        /// Initial view path, e.g. /analytics
        #[arg(long)]
        view: Option<String>,

        /// Log file (defaults to fusion.log in the temp dir)
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// List the navigable views
    Views,

    /// Analyze the built-in quarterly dataset
    Insights,

    /// Generate a short blog post
    Blog {
        /// Topic of the post
        #[arg(value_parser = non_blank)]
        topic: String,
    },

    /// Generate marketing copy for a product configuration
    Describe {
        /// Color name or #RRGGBB
        #[arg(long, default_value = "#00BFFF")]
        color: String,

        #[arg(long, default_value = "Icosahedron")]
        shape: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui {
        view: None,
        log_file: None,
    });

    let logging = match &command {
        Commands::Tui { log_file, .. } => {
            let path = log_file
                .clone()
                .unwrap_or_else(|| std::env::temp_dir().join("fusion.log"));
            init_file_tracing(&path)
        }
        _ => {
            init_stderr_tracing();
            Ok(())
        }
    };
    if let Err(e) = logging {
        report(&e);
        std::process::exit(1);
    }

    let config = FusionConfig::from_env()
        .with_provider(cli.provider)
        .with_model(cli.model);

    let result = match command {
        Commands::Tui { view, .. } => {
            if let Err(e) = fusion::tui::run(&config, view.as_deref()).await {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Views => {
            list_views();
            Ok(())
        }
        Commands::Insights => run_insights(&config).await,
        Commands::Blog { topic } => run_blog(&config, topic).await,
        Commands::Describe { color, shape } => run_describe(&config, color, shape).await,
    };

    if let Err(e) = result {
        report(&e);
        std::process::exit(1);
    }
}

fn non_blank(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err("must not be blank".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

fn init_stderr_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter())
        .init();
}

/// The shell owns the screen, so its logs go to a file
fn init_file_tracing(path: &Path) -> Result<(), FusionError> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(env_filter())
        .init();
    Ok(())
}

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

fn report(e: &FusionError) {
    eprintln!("{} {}", "Error:".red().bold(), e);
    if let Some(suggestion) = e.fix_suggestion() {
        eprintln!("  {} {}", "Fix:".yellow(), suggestion);
    }
}

fn list_views() {
    for item in NAV_ITEMS.iter() {
        println!(
            "{} {:<14} {:<15} {}",
            item.icon,
            item.label.bold(),
            item.path.cyan(),
            item.description.dimmed()
        );
    }
}

/// Run `operation` once through a [`TaskRunner`] and print the outcome
async fn run_once<P, T, O>(
    config: &FusionConfig,
    provider: &dyn Provider,
    operation: O,
    params: P,
) -> Result<T, FusionError>
where
    P: Send + 'static,
    T: Clone + Send + Sync + 'static,
    O: Operation<P, T> + 'static,
{
    println!(
        "{} Using provider: {} | model: {}",
        "→".cyan(),
        provider.name().cyan().bold(),
        config.model.cyan()
    );

    let runner = TaskRunner::new(operation);
    runner.execute(params).await;
    let state = runner.state();

    match (state.result(), state.failure()) {
        (Some(value), _) => Ok(value.clone()),
        (None, Some(message)) => Err(failure_error(config, message)),
        (None, None) => Err(FusionError::Provider(fusion::runner::GENERIC_FAILURE.to_string())),
    }
}

/// Rebuild a typed error from the runner's failure text for the fix hint
fn failure_error(config: &FusionConfig, message: impl Display) -> FusionError {
    if config.provider == fusion::config::DEFAULT_PROVIDER && !config.has_credentials() {
        FusionError::Config(message.to_string())
    } else {
        FusionError::Provider(message.to_string())
    }
}

async fn run_insights(config: &FusionConfig) -> Result<(), FusionError> {
    let provider = create_provider(&config.provider, config)?;
    let text = run_once(
        config,
        provider.as_ref(),
        DataInsights::new(provider.clone()),
        quarterly_dataset(),
    )
    .await?;

    println!("{}", "Insights:".cyan().bold());
    println!("{}", text);
    Ok(())
}

async fn run_blog(config: &FusionConfig, topic: String) -> Result<(), FusionError> {
    let provider = create_provider(&config.provider, config)?;
    let post = run_once(
        config,
        provider.as_ref(),
        BlogPostWriter::new(provider.clone()),
        topic,
    )
    .await?;

    let title = if post.is_fallback {
        post.title.red().bold()
    } else {
        post.title.green().bold()
    };
    println!("{}", title);
    println!();
    println!("{}", post.content);
    Ok(())
}

async fn run_describe(config: &FusionConfig, color: String, shape: String) -> Result<(), FusionError> {
    let provider = create_provider(&config.provider, config)?;
    let text = run_once(
        config,
        provider.as_ref(),
        ProductCopywriter::new(provider.clone()),
        ProductConfig::new(color, shape),
    )
    .await?;

    println!("{}", text);
    Ok(())
}
