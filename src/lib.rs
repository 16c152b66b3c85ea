//! ShareFlow trace capture
//!
//! Observes user interactions on a page, classifies each by event family and
//! target shape, and forwards normalized trace records to a collector.
//! The host supplies the page model, the event stream and the transport.

pub mod adapters;
pub mod capture;
pub mod config;
pub mod dom;
pub mod scenario;
pub mod trace;

pub use adapters::{
    AnnotationSource, AttributeAnnotations, KnowledgeTag, Locator, NoAnnotations, XPathLocator,
};
pub use capture::{CaptureFlag, EventHub, EventKind, RawEvent, TraceContext, Tracer};
pub use config::TraceConfig;
pub use trace::{TraceError, TraceRecord, TraceResult, Transport};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for hosts that have no subscriber of their own.
///
/// Honors `RUST_LOG`; defaults to debug output for this crate. Logs go to
/// stderr so stdout stays free for records. Calling it twice is harmless.
pub fn init_tracing() {
    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shareflow_trace=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    if result.is_ok() {
        tracing::info!("Starting ShareFlow trace v{}", env!("CARGO_PKG_VERSION"));
    }
}
