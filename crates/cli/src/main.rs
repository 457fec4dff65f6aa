//! Cookbook command line.
//!
//! Searches and browses the public recipe source, and imports search hits
//! into an in-process synchronized cookbook.

mod import;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cookbook_config::Config;
use cookbook_mealdb::{MealDbClient, SearchSession};
use cookbook_model::RecipeDraft;
use tracing::{debug, info};

/// Cookbook command line arguments.
#[derive(Parser, Debug)]
#[command(name = "cookbook")]
#[command(about = "Search the public recipe source and sync a personal cookbook")]
struct Args {
	/// Configuration file (defaults to the user config directory)
	#[arg(short, long, value_name = "PATH", global = true)]
	config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Print recipes matching a name or first letter
	Search {
		/// Recipe name, or a single letter
		query: String,
	},
	/// Walk the alphabet and print every recipe found
	Browse {
		/// Letter batches to load
		#[arg(short, long, default_value_t = 1)]
		batches: usize,
	},
	/// Add every search hit to a fresh cookbook and print the synced list
	Import {
		/// Recipe name, or a single letter
		query: String,
	},
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	setup_tracing(args.verbose);

	let config = load_config(args.config.as_ref())?;
	debug!(?config, "configuration loaded");
	let client = MealDbClient::new(&config.source)?;
	let mut session = SearchSession::new(client, config.source.letter_batch_size);

	match args.command {
		Command::Search { query } => {
			session.search(&query).await?;
			print_drafts(session.results());
		}
		Command::Browse { batches } => {
			session.search("").await?;
			for _ in 1..batches {
				if session.is_exhausted() {
					break;
				}
				session.load_next_batch().await;
			}
			info!(count = session.results().len(), "browse finished");
			print_drafts(session.results());
		}
		Command::Import { query } => {
			session.search(&query).await?;
			import::run(&config, session.into_results()).await?;
		}
	}

	Ok(())
}

fn load_config(explicit: Option<&PathBuf>) -> Result<Config, cookbook_config::ConfigError> {
	match explicit {
		Some(path) => Config::load(path),
		None => match Config::default_path() {
			Some(path) => Config::load_or_default(path),
			None => Ok(Config::default()),
		},
	}
}

fn print_drafts(drafts: &[RecipeDraft]) {
	if drafts.is_empty() {
		println!("no recipes found");
		return;
	}
	for draft in drafts {
		let origin = [draft.category.as_deref(), draft.country.as_deref()]
			.into_iter()
			.flatten()
			.collect::<Vec<_>>()
			.join(" / ");
		println!("{:>8}  {}  ({origin}, {} ingredients)", draft.external_id, draft.name, draft.ingredients.len());
	}
}

fn setup_tracing(verbose: bool) {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let filter = || {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| {
			if verbose {
				EnvFilter::new("cookbook=debug,cookbook_sync=debug,cookbook_mealdb=debug,info")
			} else {
				EnvFilter::new("warn")
			}
		})
	};

	// COOKBOOK_LOG_DIR redirects logs to a per-process file
	if let Some(log_dir) = std::env::var("COOKBOOK_LOG_DIR").ok().map(PathBuf::from)
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("cookbook.{}.log", std::process::id()));

		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_target(true);

			tracing_subscriber::registry().with(filter()).with(file_layer).init();

			tracing::info!(path = ?log_path, "cookbook tracing initialized");
			return;
		}
	}

	tracing_subscriber::fmt()
		.with_env_filter(filter())
		.with_writer(std::io::stderr)
		.init();
}
