use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber shared by every binary.
///
/// `verbose` forces debug output for this crate; otherwise `RUST_LOG` wins,
/// falling back to warnings only.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("box_sync=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("box_sync=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
