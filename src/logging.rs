use tracing_subscriber::EnvFilter;

/// Sets up the tracing subscriber for the session. Verbosity comes from the
/// settings file, not the environment: only with debug logging enabled does
/// `RUST_LOG` get a say, so a stray variable never floods the terminal of a
/// user who asked for quiet.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    // Init can run twice in tests; a second registration is not an error
    // worth surfacing.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
