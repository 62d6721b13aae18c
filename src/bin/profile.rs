use std::{sync::Arc, time::Instant};

use terramaze::{config, engine::Engine, progress::LogSink};
use tracing_subscriber::EnvFilter;

/// Headless run: builds a weighted terrain maze and runs every solver on it without
/// pacing delays. Accepts the same flags as the interactive binary.
fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match config::parse_args(std::env::args().skip(1)) {
        Ok(config) => config.without_delays(),
        Err(msg) => {
            eprintln!("{}", msg);
            std::process::exit(2);
        }
    };

    let engine = Engine::new(config, Arc::new(LogSink));
    let started = Instant::now();
    engine.generate_weighted_terrain();
    engine.join();
    tracing::info!("Generation took {:?}", started.elapsed());

    let runs: [(&str, fn(&Engine) -> bool); 4] = [
        ("BFS", |e| e.solve_unweighted(true)),
        ("DFS", |e| e.solve_unweighted(false)),
        ("Dijkstra", |e| e.solve_weighted(false)),
        ("A*", |e| e.solve_weighted(true)),
    ];
    for (name, run) in runs {
        let started = Instant::now();
        run(&engine);
        engine.join();
        tracing::info!("{} took {:?}", name, started.elapsed());
        if let Some(stats) = engine.last_stats() {
            println!("{}\n", stats);
        }
    }
    Ok(())
}
