//! Tracing setup for the `clinic` binary.
//!
//! The subscriber starts before configuration is read, so its filter sits
//! behind a reload handle and is swapped once `logging.level` is known.
use std::sync::OnceLock;
use tracing_subscriber::{EnvFilter, filter::Directive, fmt, prelude::*, reload};

/// Level used when neither `RUST_LOG` nor the configured level parses.
const FALLBACK_LEVEL: &str = "warn";

/// sqlx reports every statement at `info`; keep it out of command output.
const DEPENDENCY_DIRECTIVES: &[&str] = &["sqlx=warn"];

static LOG_RELOAD_HANDLE: OnceLock<reload::Handle<EnvFilter, tracing_subscriber::Registry>> =
    OnceLock::new();

/// Picks the active filter. A `RUST_LOG` that parses wins outright;
/// otherwise the configured level applies with dependency noise capped.
pub(crate) fn resolve_filter(rust_log: Option<&str>, configured: &str) -> EnvFilter {
    if let Some(filter) = rust_log.and_then(|spec| EnvFilter::try_new(spec).ok()) {
        return filter;
    }

    let mut filter =
        EnvFilter::try_new(configured).unwrap_or_else(|_| EnvFilter::new(FALLBACK_LEVEL));
    for directive in DEPENDENCY_DIRECTIVES {
        if let Ok(directive) = directive.parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

fn rust_log() -> Option<String> {
    std::env::var("RUST_LOG").ok()
}

/// Installs the global subscriber with `level` as the starting filter.
/// Log lines go to stderr so command output on stdout stays parseable.
pub fn init_tracing_with_level(level: &str) {
    let (reload_layer, handle) = reload::Layer::new(resolve_filter(rust_log().as_deref(), level));
    let _ = LOG_RELOAD_HANDLE.set(handle);

    let _ = tracing_subscriber::registry()
        .with(reload_layer)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Swaps in the configured level once configuration is loaded.
pub fn apply_logging_level(level: &str) {
    let Some(handle) = LOG_RELOAD_HANDLE.get() else {
        return;
    };
    let filter = resolve_filter(rust_log().as_deref(), level);
    if let Err(e) = handle.reload(filter) {
        eprintln!("Failed to apply logging level {level}: {e}");
    }
}
