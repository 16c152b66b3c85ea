//! Record delivery
//!
//! The emitter is a fire-and-forget pass-through: a failing transport is
//! logged and the record is dropped, so capture never disturbs the
//! interaction it observes.

use crate::trace::error::{TraceError, TraceResult};
use crate::trace::record::TraceRecord;
use parking_lot::Mutex as ParkingMutex;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Delivers one record to a collector
pub trait Transport: Send + Sync {
    fn send(&self, record: &TraceRecord) -> TraceResult<()>;
}

#[derive(Clone)]
pub struct Emitter {
    transport: Arc<dyn Transport>,
}

impl Emitter {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn emit(&self, record: TraceRecord) {
        tracing::debug!(
            "Emitting {} record (tag={}, xpath={})",
            record.event_type,
            record.tag_name,
            record.xpath
        );
        if let Err(e) = self.transport.send(&record) {
            tracing::warn!("Dropped {} record: {}", record.event_type, e);
        }
    }
}

/// Forwards records over an unbounded tokio channel; sending never blocks
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<TraceRecord>,
}

impl ChannelTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TraceRecord>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Transport for ChannelTransport {
    fn send(&self, record: &TraceRecord) -> TraceResult<()> {
        self.tx
            .send(record.clone())
            .map_err(|_| TraceError::TransportClosed("receiver dropped".to_string()))
    }
}

/// Writes one JSON record per line
pub struct JsonLinesTransport<W: Write + Send> {
    writer: ParkingMutex<W>,
}

impl<W: Write + Send> JsonLinesTransport<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: ParkingMutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> Transport for JsonLinesTransport<W> {
    fn send(&self, record: &TraceRecord) -> TraceResult<()> {
        let line = serde_json::to_string(record)?;
        let mut writer = self.writer.lock();
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

/// Keeps every record in memory, in emission order
#[derive(Clone, Default)]
pub struct MemoryTransport {
    records: Arc<ParkingMutex<Vec<TraceRecord>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<TraceRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Remove and return everything collected so far
    pub fn take(&self) -> Vec<TraceRecord> {
        std::mem::take(&mut *self.records.lock())
    }
}

impl Transport for MemoryTransport {
    fn send(&self, record: &TraceRecord) -> TraceResult<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Viewport;
    use crate::trace::record::{EventFamily, RecordStamp};

    fn record(family: EventFamily) -> TraceRecord {
        RecordStamp::new("TraceData", &Viewport::default(), false)
            .record(family, "CLOSE")
            .build()
    }

    #[test]
    fn test_memory_transport_keeps_order() {
        let memory = MemoryTransport::new();
        let emitter = Emitter::new(Arc::new(memory.clone()));
        emitter.emit(record(EventFamily::Navigate));
        emitter.emit(record(EventFamily::Beforeunload));

        let families: Vec<EventFamily> = memory.take().iter().map(|r| r.event_type).collect();
        assert_eq!(families, vec![EventFamily::Navigate, EventFamily::Beforeunload]);
        assert!(memory.is_empty());
    }

    #[test]
    fn test_json_lines_transport_writes_one_line_per_record() {
        let transport = JsonLinesTransport::new(Vec::new());
        transport.send(&record(EventFamily::Navigate)).unwrap();
        transport.send(&record(EventFamily::Scroll)).unwrap();

        let output = String::from_utf8(transport.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: TraceRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.event_type, EventFamily::Navigate);
    }

    #[tokio::test]
    async fn test_channel_transport_delivers() {
        let (transport, mut rx) = ChannelTransport::new();
        let emitter = Emitter::new(Arc::new(transport));
        emitter.emit(record(EventFamily::Navigate));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event_type, EventFamily::Navigate);
    }

    #[test]
    fn test_closed_channel_is_swallowed_by_emitter() {
        let (transport, rx) = ChannelTransport::new();
        drop(rx);
        assert!(matches!(
            transport.send(&record(EventFamily::Navigate)),
            Err(TraceError::TransportClosed(_))
        ));

        // Emitting through a dead transport must not panic
        Emitter::new(Arc::new(transport)).emit(record(EventFamily::Navigate));
    }
}
