use clap::Parser;

mod command;
mod config;
mod dispatcher;
mod extractor;
mod logger;
mod pipeline;
mod prompt;
mod providers;

use config::Config;
use dispatcher::{DispatchResult, Dispatcher, HttpBackend};
use pipeline::Pipeline;
use providers::OpenAIProvider;

const DEFAULT_INSTRUCTION: &str = "Plant tomatoes in row 1 cell 2";

#[derive(Parser)]
#[command(name = "bed_commander", about = "Turns free-text gardening instructions into garden-bed commands")]
struct Args {
    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Path to a config file
    #[arg(short, long)]
    config: Option<String>,
    /// Free-text gardening instruction
    instruction: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    logger::init(args.verbose);

    let config = Config::load(&args.config)?;
    let (model, temperature) = match &config.ai_providers.openai {
        Some(openai) => (Some(openai.model.clone()), openai.temperature),
        None => (None, None),
    };
    let provider = OpenAIProvider::new(model, temperature)?;

    let backend = HttpBackend::new(config.backend.base_url.clone(), config.backend.bed_id.clone());
    let dispatcher = Dispatcher::new(Box::new(backend));
    let pipeline = Pipeline::new(&provider, &dispatcher);

    let instruction = if args.instruction.is_empty() {
        DEFAULT_INSTRUCTION.to_string()
    } else {
        args.instruction.join(" ")
    };

    let results = pipeline.run(&instruction).await?;
    for result in &results {
        match result {
            DispatchResult::Sent { action, response } => {
                println!("Response for {}: {}", action, response);
            }
            DispatchResult::ValidationFailed { action, error } => {
                println!("Rejected {}: {}", action, error);
            }
            DispatchResult::TransportFailed { action, reason } => {
                println!("Failed to send {}: {}", action, reason);
            }
        }
    }

    // Per-command failures are reported above; only a failed model call
    // makes the run itself fail.
    Ok(())
}
