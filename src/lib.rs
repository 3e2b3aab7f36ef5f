//! MediBot session core.
//!
//! Client-side state orchestration for the prescription-analysis
//! assistant: one shared active context, the upload pipeline, the
//! session-lifetime history cache, the profile editor and the top-level
//! view controller. The analysis backend, history/profile storage and
//! authentication are external collaborators behind the `services`
//! traits.

pub mod config;
pub mod context;
pub mod controller;
pub mod history;
pub mod models;
pub mod profile;
pub mod services;
pub mod session;
pub mod settings;
pub mod upload;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for a shell embedding the core.
///
/// Honors `RUST_LOG`, falling back to the crate-level default filter.
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_tracing_is_idempotent() {
        super::init_tracing();
        super::init_tracing();
    }
}
