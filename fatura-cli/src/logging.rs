use tracing_subscriber::EnvFilter;

const CRATES: [&str; 4] = ["fatura_core", "fatura_ingest", "fatura_finance", "fatura_cli"];

/// Log to stderr. `RUST_LOG` wins; otherwise info (debug with `verbose`)
/// for our crates and warn for everything else.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut directives = String::from("warn");
        for krate in CRATES {
            directives.push_str(&format!(",{krate}={level}"));
        }
        EnvFilter::new(directives)
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
