//! Logging setup for programs embedding Hexforge.
//!
//! The library crates only emit `tracing` events. Binaries and tests call
//! [`init`] once to print them.

use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::HexforgeError;

/// Installs a console subscriber writing to stderr.
///
/// Stdout is left to the program: the line lobby uses it for replies.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` is used, for
/// example `"info"` or `"hexforge=debug"`.
///
/// # Errors
/// [`HexforgeError::Logging`] if a global subscriber is already set.
pub fn init(default_filter: &str) -> Result<(), HexforgeError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    subscriber(env_filter, std::io::stderr).try_init()?;
    Ok(())
}

fn subscriber<W>(filter: EnvFilter, writer: W) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_level(true),
    )
}
