use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber. Log lines go to stderr so the
/// result block on stdout stays clean; `RUST_LOG` overrides the level.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi_enabled(&std::io::stderr()))
        .with_target(false)
        .try_init();
}

/// Colour codes only when the stream is a terminal and `NO_COLOR` is unset.
fn ansi_enabled(stream: &impl IsTerminal) -> bool {
    stream.is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

#[cfg(test)]
#[path = "../tests/src_inline/logging.rs"]
mod tests;
