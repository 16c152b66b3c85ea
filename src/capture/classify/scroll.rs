//! Window scroll sampling

use super::Scope;
use crate::capture::event::RawEvent;
use crate::trace::record::{EventFamily, InteractionContext, TraceRecord};
use crate::trace::state::{ScrollSample, ScrollSampler};

/// Feed the current viewport position to `sampler`; a record comes out only
/// when the sampler yields a delta
pub fn classify_scroll(
    scope: &Scope<'_>,
    sampler: &mut ScrollSampler,
    event: &RawEvent,
) -> Option<TraceRecord> {
    let viewport = &scope.page.viewport;
    let delta = sampler.observe(ScrollSample {
        time_stamp: event.time_stamp,
        scroll_x: viewport.scroll_x,
        scroll_y: viewport.scroll_y,
    });
    let Some(delta) = delta else {
        tracing::debug!("Scroll at {} absorbed by sampler", event.time_stamp);
        return None;
    };

    let context = InteractionContext {
        diff_x: Some(delta.diff_x),
        diff_y: Some(delta.diff_y),
        diff_time_stamp: Some(delta.diff_time_stamp),
        ..Default::default()
    };
    Some(
        scope
            .record(EventFamily::Scroll, "Window")
            .scroll(&delta)
            .text(delta.direction())
            .context(&context)
            .build(),
    )
}
