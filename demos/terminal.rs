//! # Demo: terminal
//!
//! Runs one algorithm over a random array, pausing once half-way, and draws
//! the final bars from a [`ViewMirror`].
//!
//! ## Flow
//! ```text
//! Visualizer::builder(cfg).with_subscribers([LogWriter, ViewMirror]).build()
//!     ├─► request_generate(size)           → [array] ...
//!     ├─► request_start(alg, step)         → [state] running
//!     ├─► request_pause_toggle() ×2        → [state] paused / running
//!     ├─► controller().wait()              → [state] completed
//!     └─► shutdown()                       → mirror holds the final view
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example terminal --features logging -- quick 24
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sortvisor::{Algorithm, Config, LogWriter, Subscribe, ViewMirror, Visualizer};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let algorithm: Algorithm = args.next().as_deref().unwrap_or("bubble").parse()?;
    let size: usize = args
        .next()
        .map(|s| s.parse())
        .transpose()
        .context("size must be a number")?
        .unwrap_or(20);

    for a in Algorithm::ALL {
        let info = a.info();
        println!("{:<10} {:<16} {:<12} {}", a.id(), info.name, info.complexity, info.description);
    }
    println!();

    let cfg = Config {
        step: Duration::from_millis(5),
        ..Config::default()
    };
    let mirror = Arc::new(ViewMirror::new());
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new()), mirror.clone()];
    let vis = Visualizer::builder(cfg).with_subscribers(subs).build()?;

    vis.request_generate(size).await?;
    vis.request_start(algorithm, Duration::from_millis(5)).await?;

    tokio::time::sleep(Duration::from_millis(200)).await;
    if vis.request_pause_toggle().await.is_ok() {
        tokio::time::sleep(Duration::from_millis(500)).await;
        vis.request_pause_toggle().await?;
    }
    vis.controller().wait().await?;

    let stats = vis.controller().stats().await;
    vis.shutdown().await?;

    let view = mirror.snapshot().await;
    let max = view.values.iter().copied().max().unwrap_or(1).max(1);
    for v in &view.values {
        let width = (*v as usize * 60) / max as usize;
        println!("{v:>4} {}", "█".repeat(width.max(1)));
    }
    println!(
        "\n{}: {} comparisons, {} swaps, {:?}",
        algorithm.info().name,
        stats.comparisons(),
        stats.swaps(),
        stats.elapsed()
    );
    Ok(())
}
