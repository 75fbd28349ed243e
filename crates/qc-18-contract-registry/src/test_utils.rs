//! Shared test helpers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::{fmt, EnvFilter};

/// Install a test subscriber once. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("qc_18_contract_registry=debug"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Counts `WARN` and `ERROR` events seen by the subscriber it is layered on.
#[derive(Clone, Default)]
pub struct FailureEvents(Arc<AtomicUsize>);

impl FailureEvents {
    #[must_use]
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for FailureEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = *event.metadata().level();
        if level == Level::WARN || level == Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}
