use codec_lister::Config;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    // Keep stdout for the report; logs go to stderr and stay quiet unless RUST_LOG says otherwise.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Load configuration from CLI and/or config file
    let config = Config::load()?;
    codec_lister::run(config, &mut std::io::stdout().lock())?;
    Ok(())
}
