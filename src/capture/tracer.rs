//! Capture pipeline wiring
//!
//! `TraceContext` owns everything a handler needs: configuration, the shared
//! capture flag, the locator and annotation adapters, the emitter and the
//! retained state. `Tracer` installs one handler per event family on an
//! `EventHub` and keeps the subscriptions so they can be torn down together.

use crate::adapters::{AnnotationSource, AttributeAnnotations, Locator, XPathLocator};
use crate::capture::classify::{self, Scope};
use crate::capture::event::{EventKind, RawEvent};
use crate::capture::flag::CaptureFlag;
use crate::capture::listener::{EventHub, Handler, ListenerTarget, SubscriptionSet};
use crate::config::TraceConfig;
use crate::dom::Page;
use crate::trace::emitter::{Emitter, Transport};
use crate::trace::record::{RecordStamp, TraceRecord};
use crate::trace::state::{LastEvent, PointerSample, TraceState};
use parking_lot::Mutex as ParkingMutex;
use std::sync::Arc;

/// Where each family's handler is installed
const LISTENERS: [(ListenerTarget, EventKind); 10] = [
    (ListenerTarget::Body, EventKind::PointerDown),
    (ListenerTarget::Body, EventKind::Submit),
    (ListenerTarget::Body, EventKind::MouseOver),
    (ListenerTarget::Body, EventKind::MouseUp),
    (ListenerTarget::Body, EventKind::Drop),
    (ListenerTarget::Window, EventKind::Scroll),
    (ListenerTarget::Window, EventKind::Paste),
    (ListenerTarget::Window, EventKind::Change),
    (ListenerTarget::Body, EventKind::KeyUp),
    (ListenerTarget::Window, EventKind::BeforeUnload),
];

pub struct TraceContext {
    config: TraceConfig,
    flag: CaptureFlag,
    locator: Box<dyn Locator>,
    annotations: Box<dyn AnnotationSource>,
    emitter: Emitter,
    state: ParkingMutex<TraceState>,
}

impl TraceContext {
    /// Context with the default XPath locator and attribute-based annotations
    pub fn new(config: TraceConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            flag: CaptureFlag::new(config.enable_capture),
            state: ParkingMutex::new(TraceState::new(&config)),
            locator: Box::new(XPathLocator),
            annotations: Box::new(AttributeAnnotations),
            emitter: Emitter::new(transport),
            config,
        }
    }

    pub fn with_locator(mut self, locator: impl Locator + 'static) -> Self {
        self.locator = Box::new(locator);
        self
    }

    pub fn with_annotations(mut self, annotations: impl AnnotationSource + 'static) -> Self {
        self.annotations = Box::new(annotations);
        self
    }

    /// Share a capture flag owned by the host
    pub fn with_capture_flag(mut self, flag: CaptureFlag) -> Self {
        self.flag = flag;
        self
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    pub fn capture_flag(&self) -> &CaptureFlag {
        &self.flag
    }

    /// Snapshot of the retained state
    pub fn state(&self) -> TraceState {
        self.state.lock().clone()
    }

    fn scope<'a>(&'a self, page: &'a Page) -> Scope<'a> {
        Scope {
            page,
            config: &self.config,
            locator: self.locator.as_ref(),
            annotations: self.annotations.as_ref(),
            stamp: RecordStamp::new(&self.config.message_type, &page.viewport, self.flag.get()),
        }
    }

    /// Run the classifier for `event` and emit what it produces.
    ///
    /// State is updated under the lock; records are emitted after it is
    /// released.
    pub fn handle(&self, page: &Page, event: &RawEvent) {
        let scope = self.scope(page);
        let records: Vec<TraceRecord> = {
            let mut state = self.state.lock();
            match event.kind {
                EventKind::PointerDown => {
                    let records = classify::classify_click(&scope, event);
                    state.last_pointerdown = Some(PointerSample {
                        event_type: event.kind.to_string(),
                        time_stamp: event.time_stamp,
                        client_x: event.pointer.map(|(x, _)| x),
                        client_y: event.pointer.map(|(_, y)| y),
                    });
                    records
                }
                EventKind::Submit => classify::classify_submit(&scope, event).into_iter().collect(),
                EventKind::MouseOver => {
                    let records = classify::classify_mouseover(&scope, event);
                    state.last_event = LastEvent::basic("mouseover", event.time_stamp);
                    records
                }
                EventKind::MouseUp => {
                    let record = classify::classify_selection(&scope, &mut state.selection, event);
                    state.last_event = LastEvent::basic("mouseup", event.time_stamp);
                    record.into_iter().collect()
                }
                EventKind::Drop => {
                    let record = classify::classify_drop(&scope, event);
                    state.last_event = LastEvent::basic("drop", event.time_stamp);
                    record.into_iter().collect()
                }
                EventKind::Scroll => {
                    let record = classify::classify_scroll(&scope, &mut state.scroll, event);
                    state.last_event = LastEvent::scrolled(
                        event.time_stamp,
                        page.viewport.scroll_x,
                        page.viewport.scroll_y,
                    );
                    record.into_iter().collect()
                }
                EventKind::Paste => classify::classify_paste(&scope, event).into_iter().collect(),
                EventKind::Change => classify::classify_change(&scope, event).into_iter().collect(),
                EventKind::KeyUp => classify::classify_keyup(&scope, &mut state.last_event, event)
                    .into_iter()
                    .collect(),
                EventKind::BeforeUnload => {
                    let record = classify::classify_beforeunload(&scope, event);
                    state.last_event = LastEvent::basic("beforeunload", event.time_stamp);
                    vec![record]
                }
            }
        };

        if records.is_empty() {
            tracing::debug!("No record for {} event", event.kind);
        }
        for record in records {
            self.emitter.emit(record);
        }
    }

    /// Emit the synthetic navigation record
    pub fn navigate(&self, page: &Page) {
        self.emitter.emit(classify::navigate_record(&self.scope(page)));
    }
}

/// Installs the capture handlers and owns their subscriptions
pub struct Tracer {
    context: Arc<TraceContext>,
    subscriptions: SubscriptionSet,
}

impl Tracer {
    pub fn new(context: TraceContext) -> Self {
        Self {
            context: Arc::new(context),
            subscriptions: SubscriptionSet::new(),
        }
    }

    pub fn context(&self) -> &Arc<TraceContext> {
        &self.context
    }

    pub fn is_registered(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Attach every handler to `hub`. A tracer that is already registered
    /// leaves its listeners as they are.
    pub fn register_listeners(&mut self, hub: &EventHub) {
        if self.is_registered() {
            tracing::warn!("Listeners already registered, ignoring");
            return;
        }
        for (target, kind) in LISTENERS {
            let context = self.context.clone();
            let handler: Handler = Arc::new(move |page: &Page, event: &RawEvent| {
                if event.kind == kind {
                    context.handle(page, event);
                }
            });
            self.subscriptions.push(hub.attach(target, kind.dom_name(), handler));
        }
        tracing::info!("Registered {} trace listeners", self.subscriptions.len());
    }

    /// Detach every handler; safe to call repeatedly
    pub fn release_all(&mut self) {
        if self.subscriptions.is_empty() {
            return;
        }
        let count = self.subscriptions.len();
        self.subscriptions.release_all();
        tracing::info!("Released {} trace listeners", count);
    }

    pub fn navigate(&self, page: &Page) {
        self.context.navigate(page);
    }
}
