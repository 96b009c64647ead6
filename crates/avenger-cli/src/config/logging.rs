//! Tracing subscriber setup.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Log output format.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Installs the global subscriber.
    ///
    /// Filtering follows `RUST_LOG` and defaults to `info`.
    pub fn init_tracing(self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(filter);

        match self {
            Self::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
            Self::Json => registry
                .with(tracing_subscriber::fmt::layer().json())
                .init(),
        }
    }
}
