use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use roster::{Gender, default_roster, load_roster};
use server::database::{PeopleStore, open_store};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, env = "STORE_URL", default_value = "redis://127.0.0.1:6379")]
    store_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a roster into the store
    Seed {
        /// JSON roster, defaults to the bundled list
        #[arg(long)]
        file: Option<PathBuf>,

        /// Clear the store first, resetting every rating
        #[arg(long)]
        reset: bool,
    },

    /// Print people by rating
    Ranking {
        #[arg(long)]
        gender: Option<Gender>,

        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let store = open_store(&args.store_url)
        .await
        .context("Failed to open store")?;

    match args.command {
        Command::Seed { file, reset } => seed(store.as_ref(), file, reset).await,
        Command::Ranking { gender, limit } => ranking(store.as_ref(), gender, limit).await,
    }
}

async fn seed(store: &dyn PeopleStore, file: Option<PathBuf>, reset: bool) -> Result<()> {
    let people = match file {
        Some(path) => load_roster(&path)
            .with_context(|| format!("Failed to load roster {}", path.display()))?,
        None => default_roster(),
    };

    println!("Loaded People: {}", people.len());

    if reset {
        store.clear().await?;
        println!("Store cleared");
    }

    let existing = store.count().await?;
    if existing > 0 {
        println!("Store already holds {existing} people. Use --reset to replace them. Exiting.");
        return Ok(());
    }

    let pb = ProgressBar::new(people.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    for person in &people {
        pb.set_message(person.name.clone());
        store.insert(person).await?;
        pb.inc(1);
    }

    pb.finish_with_message("Done");
    println!("Seeded People: {}", store.count().await?);

    Ok(())
}

async fn ranking(store: &dyn PeopleStore, gender: Option<Gender>, limit: Option<usize>) -> Result<()> {
    let people = store.ranking(gender).await?;
    let limit = limit.unwrap_or(people.len());

    for (position, person) in people.iter().take(limit).enumerate() {
        println!("{:>3}. {:<28} {}", position + 1, person.name, person.rating);
    }

    Ok(())
}
