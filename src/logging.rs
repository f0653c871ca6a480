//! Log output for the daemon.
//!
//! Call sites use the `log` macros.  [`init`] installs a
//! `tracing-subscriber` formatter that also picks up `log` records,
//! writing to stderr so stdout carries only status lines.
//! Verbosity follows `RUST_LOG` (default `info`), e.g.
//! `RUST_LOG=ec_fand=trace` to see every EC transaction.

use tracing_subscriber::filter::{EnvFilter, LevelFilter};

pub fn init() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("RUST_LOG")
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
