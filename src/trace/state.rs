//! Retained dedup/throttle state
//!
//! Each value is written by exactly one handler family and read only by
//! later invocations of that same family.

use crate::config::TraceConfig;

/// Minimal descriptor of the most recently handled event
#[derive(Debug, Clone, PartialEq)]
pub struct LastEvent {
    pub event_type: String,
    pub time_stamp: f64,
    pub scroll_x: Option<f64>,
    pub scroll_y: Option<f64>,
    pub tag_name: Option<String>,
    pub xpath: Option<String>,
    pub name: Option<String>,
    pub value: Option<String>,
    pub code: Option<String>,
    pub key: Option<String>,
}

impl Default for LastEvent {
    fn default() -> Self {
        Self::basic("initial", 0.0)
    }
}

impl LastEvent {
    pub fn basic(event_type: &str, time_stamp: f64) -> Self {
        Self {
            event_type: event_type.to_string(),
            time_stamp,
            scroll_x: None,
            scroll_y: None,
            tag_name: None,
            xpath: None,
            name: None,
            value: None,
            code: None,
            key: None,
        }
    }

    pub fn scrolled(time_stamp: f64, scroll_x: f64, scroll_y: f64) -> Self {
        Self {
            scroll_x: Some(scroll_x),
            scroll_y: Some(scroll_y),
            ..Self::basic("scroll", time_stamp)
        }
    }
}

/// Last pointer-down position and time
#[derive(Debug, Clone, PartialEq)]
pub struct PointerSample {
    pub event_type: String,
    pub time_stamp: f64,
    pub client_x: Option<f64>,
    pub client_y: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSample {
    pub time_stamp: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

/// Movement between two scroll samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollDelta {
    pub diff_x: f64,
    pub diff_y: f64,
    pub diff_time_stamp: f64,
    /// Position of the newer sample
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl ScrollDelta {
    /// `SCROLL UP`/`SCROLL DOWN` followed by `SCROLL LEFT`/`:SCROLL RIGHT`
    pub fn direction(&self) -> String {
        let vertical = if self.diff_y < 0.0 {
            "SCROLL UP"
        } else if self.diff_y > 0.0 {
            "SCROLL DOWN"
        } else {
            ""
        };
        let horizontal = if self.diff_x < 0.0 {
            "SCROLL LEFT"
        } else if self.diff_x > 0.0 {
            ":SCROLL RIGHT"
        } else {
            ""
        };
        format!("{}{}", vertical, horizontal)
    }
}

/// Trailing-edge scroll throttle.
///
/// The first sample only becomes the baseline. Every later sample replaces
/// the baseline, and yields a delta when more than `threshold_ms` passed
/// since the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollSampler {
    threshold_ms: f64,
    baseline: Option<ScrollSample>,
}

impl ScrollSampler {
    pub fn new(threshold_ms: f64) -> Self {
        Self {
            threshold_ms,
            baseline: None,
        }
    }

    pub fn observe(&mut self, sample: ScrollSample) -> Option<ScrollDelta> {
        let previous = self.baseline.replace(sample)?;
        let elapsed = sample.time_stamp - previous.time_stamp;
        if elapsed > self.threshold_ms {
            Some(ScrollDelta {
                diff_x: sample.scroll_x - previous.scroll_x,
                diff_y: sample.scroll_y - previous.scroll_y,
                diff_time_stamp: elapsed,
                scroll_x: sample.scroll_x,
                scroll_y: sample.scroll_y,
            })
        } else {
            None
        }
    }

    pub fn baseline(&self) -> Option<ScrollSample> {
        self.baseline
    }
}

/// Content-based selection dedup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionDedup {
    last: String,
}

impl SelectionDedup {
    /// Returns the trimmed selection when it is non-empty and differs from
    /// the last accepted one, remembering it
    pub fn accept(&mut self, selection: Option<&str>) -> Option<String> {
        let current = selection.map(str::trim).filter(|s| !s.is_empty())?;
        if current == self.last {
            return None;
        }
        self.last = current.to_string();
        Some(self.last.clone())
    }

    pub fn last(&self) -> &str {
        &self.last
    }
}

/// All retained state of one capture pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct TraceState {
    pub last_event: LastEvent,
    pub last_pointerdown: Option<PointerSample>,
    pub selection: SelectionDedup,
    pub scroll: ScrollSampler,
}

impl TraceState {
    pub fn new(config: &TraceConfig) -> Self {
        Self {
            last_event: LastEvent::default(),
            last_pointerdown: None,
            selection: SelectionDedup::default(),
            scroll: ScrollSampler::new(config.scroll_threshold_ms),
        }
    }
}
