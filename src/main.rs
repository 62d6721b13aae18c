use terramaze::{app::App, config};
use tracing_subscriber::EnvFilter;

fn main() -> std::io::Result<()> {
    let config = match config::parse_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("{}", msg);
            std::process::exit(2);
        }
    };

    // The terminal belongs to the UI, so logs go to a file
    let file_appender = tracing_appender::rolling::never(".", "terramaze.log");
    let (writer, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    tracing::info!(
        "Starting {}x{} maze, seed {:?}",
        config.rows,
        config.cols,
        config.seed
    );

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = App::new(config).run();
    App::restore_terminal(&mut stdout)?;
    if let Err(e) = &result {
        tracing::error!("App exited with error: {}", e);
    }
    result
}
