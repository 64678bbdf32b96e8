//! Console logging for the `chatid` binary.
//!
//! Events are written to stderr so stdout stays reserved for identifiers
//! and can be piped. The filter is taken from `RUST_LOG` and falls back to
//! `warn`; `RUST_LOG=chatid=trace` also shows the library's spans around
//! every minted id.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_line_number(true)
                .with_target(false)
                .with_file(true),
        )
        .try_init()?;
    Ok(())
}
