use anyhow::Result;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

use cascade::{CampaignOrchestrator, PropagationEngine, ResultWriter, SimConfig};
use oracle::LlmOracle;
use population::{RelationSampler, UserDirectory, load_news};

#[derive(Parser)]
#[command(about = "Simulate health-news cascades over a synthetic patient network")]
struct Args {
    /// Run configuration (oracle endpoint, prompts, caps)
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// User directory JSON file
    #[arg(long)]
    users: PathBuf,

    /// News list JSON file
    #[arg(long)]
    news: PathBuf,

    /// Output artifact (JSON array, one object per news item)
    #[arg(long, default_value = "results/propagation.json")]
    output: PathBuf,

    /// Only process the first N news items
    #[arg(long)]
    limit: Option<usize>,

    /// Seed for the neighbor-sampling RNG (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = SimConfig::from_file(&args.config).await?;
    let directory = UserDirectory::from_file(&args.users).await?;
    let mut news_list = load_news(&args.news).await?;
    if let Some(limit) = args.limit {
        news_list.truncate(limit);
    }

    println!(
        "Loaded {} users, {} news items",
        directory.len(),
        news_list.len()
    );

    let oracle = LlmOracle::new(config.oracle.clone(), config.retry)?;
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let engine = PropagationEngine::new(
        &directory,
        &oracle,
        &config.prompts,
        RelationSampler::new(config.sampling),
        config.max_depth,
        rng,
    );
    let mut orchestrator = CampaignOrchestrator::new(&directory, engine);

    let mut writer = ResultWriter::create(&args.output)?;
    orchestrator.run(&news_list, &mut writer).await?;
    let entries = writer.entries();
    writer.finish()?;

    println!(
        "Simulation complete: {} news items written to {:?}",
        entries, args.output
    );

    Ok(())
}
