//! `busload-sim` — posts a synthetic occupancy walk to a busload server.
//!
//! # Usage
//!
//! ```sh
//! busload-sim --server http://localhost:5000 --capacity 40 --steps 60
//! ```

mod client;
mod walk;

use std::time::Duration;

use anyhow::Result;
use busload_core::NewReading;
use clap::Parser;
use client::IngestClient;
use rand::{SeedableRng, rngs::StdRng};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use walk::RandomWalk;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "busload-sim", about = "Simulated occupancy reporter for busload")]
struct Args {
  /// Base URL of the busload server.
  #[arg(long, env = "BUSLOAD_SERVER", default_value = "http://127.0.0.1:5000")]
  server: String,

  /// Seats on the simulated bus.
  #[arg(long, default_value_t = 40)]
  capacity: u32,

  /// Number of readings to post.
  #[arg(long, default_value_t = 60)]
  steps: u32,

  /// Delay between readings, in milliseconds.
  #[arg(long, default_value_t = 1000)]
  interval_ms: u64,

  /// Seed for a reproducible walk.
  #[arg(long)]
  seed: Option<u64>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let rng = match args.seed {
    Some(seed) => StdRng::seed_from_u64(seed),
    None => StdRng::from_entropy(),
  };
  let mut walk = RandomWalk::new(args.capacity, rng);
  let client = IngestClient::new(&args.server)?;

  tracing::info!(endpoint = client.endpoint(), steps = args.steps, "starting simulation");

  let mut ticker = tokio::time::interval(Duration::from_millis(args.interval_ms.max(1)));
  for _ in 0..args.steps {
    ticker.tick().await;

    let reading = NewReading::new(walk.step(), walk.capacity());
    match client.post(reading).await {
      Ok(status) => tracing::info!(
        count = reading.count,
        capacity = reading.capacity,
        %status,
        "posted"
      ),
      Err(e) => tracing::warn!(error = ?e, "post failed"),
    }
  }

  Ok(())
}
