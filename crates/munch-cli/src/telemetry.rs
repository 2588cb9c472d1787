use crate::session;
use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "MUNCH_LOG";

/// Install the stderr subscriber.
///
/// `MUNCH_LOG` wins; otherwise the level comes from the repository config,
/// or `warn` outside a repository.
pub fn init() -> Result<()> {
    let env_filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => {
            let level = session::configured_log_level();
            EnvFilter::try_new(&level)
                .with_context(|| format!("invalid log level/filter '{}'", level))?
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}
