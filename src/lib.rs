pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;

#[cfg(test)]
pub(crate) mod tests_support;

pub use shared::config::AppConfig;
pub use shared::error::{AppError, Result};
pub use state::AppState;

/// Install the tracing subscriber; call once at process start.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "threadswap=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
