//! Basic example draining a queue of scores at a fixed rate.
//!
//! Ten items are saved at three items per half second, with at most two
//! items per save request. A simulated backend takes 200ms per request.
//! Run with `cargo run --example basic` to watch the ticks in the log.

use save_throttle::{BackendError, FnBackend, Item, RateLimiter};
use std::time::{Duration, Instant};
use tracing::Level;

#[derive(Debug)]
struct Score {
    player: String,
    points: u32,
}

impl Item for Score {
    fn kind(&self) -> &str {
        "Score"
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .init();

    let started = Instant::now();
    let backend = FnBackend::new(move |batch: Vec<Score>| async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        let players: Vec<String> = batch
            .iter()
            .map(|s| format!("{}={}", s.player, s.points))
            .collect();
        println!(
            "[{:>5}ms] saved {}",
            started.elapsed().as_millis(),
            players.join(", ")
        );
        Ok::<_, BackendError>(())
    });

    let limiter = RateLimiter::builder()
        .with_max_rate(3)
        .with_interval(Duration::from_millis(500))
        .with_max_batch_size(2)
        .build(backend)?;

    println!("=== Basic Save Throttling Example ===\n");
    println!("Rate: 3 items per 500ms, 2 items per request\n");

    for (i, player) in ["ana", "bo", "cy", "di", "ed", "fu", "gi", "hu", "io", "jo"]
        .iter()
        .enumerate()
    {
        limiter.enqueue(Score {
            player: player.to_string(),
            points: (i as u32 + 1) * 10,
        })?;
    }

    println!("Queued {} scores, finalizing\n", limiter.queue_len());
    limiter.finalize().await?;

    let snapshot = limiter.metrics().snapshot();
    println!(
        "\nDone in {}ms: {} items in {} ticks and {} requests",
        started.elapsed().as_millis(),
        snapshot.items_saved,
        snapshot.ticks,
        snapshot.batches_saved
    );

    Ok(())
}
