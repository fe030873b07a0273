//! quotegate binary: HTTP server and one-shot CLI for the answering pipeline.
//!
//! All wiring happens here, once, at process start: load configuration,
//! construct the oracle provider and topic registry, assemble the pipeline,
//! then either serve it over HTTP or run a single question through it.

mod routes;
mod server;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quotegate_runtime::{AnswerPipeline, AnswerRequest, AppConfig, OracleRegistry, TopicRegistry};

#[derive(Parser)]
#[command(name = "quotegate", version, about = "Evidence-gated protocol answering service")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, global = true, default_value = "quotegate.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve {
        /// Address to bind.
        #[arg(short, long, default_value = "127.0.0.1:7979")]
        bind: SocketAddr,
    },

    /// Answer one question from the terminal and print the reply.
    Ask {
        /// Topic key, e.g. "azithromycin".
        topic: String,

        /// The question to answer.
        question: String,

        /// Explicit language tag (en, he, ru); detected from the question
        /// when omitted.
        #[arg(short, long)]
        language: Option<String>,

        /// Answer style: recommended, detailed, or bullet.
        #[arg(short, long)]
        style: Option<String>,

        /// Output mode: hybrid, verbatim, short, or link.
        #[arg(short, long)]
        mode: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = AppConfig::from_yaml_file(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    let oracle = OracleRegistry::with_defaults()
        .create(&config.oracle)
        .context("constructing oracle provider")?;
    let topics = TopicRegistry::from_map(config.topics.clone());
    let pipeline = AnswerPipeline::new(oracle, topics, &config)?;

    match cli.command {
        Command::Serve { bind } => server::run(server::AppState::new(pipeline), bind).await,
        Command::Ask {
            topic,
            question,
            language,
            style,
            mode,
        } => {
            let outcome = pipeline
                .answer(AnswerRequest {
                    topic_key: topic,
                    question,
                    language,
                    answer_style: style,
                    output_mode: mode,
                })
                .await?;
            println!("{}", outcome.reply);
            Ok(())
        }
    }
}
