//! Trace records, retained state and delivery

pub mod emitter;
pub mod error;
pub mod record;
pub mod state;

pub use emitter::{ChannelTransport, Emitter, JsonLinesTransport, MemoryTransport, Transport};
pub use error::{TraceError, TraceResult};
pub use record::{
    EventFamily, EventSource, InteractionContext, RecordBuilder, RecordStamp, TextValue,
    TraceRecord,
};
pub use state::{
    LastEvent, PointerSample, ScrollDelta, ScrollSample, ScrollSampler, SelectionDedup,
    TraceState,
};
