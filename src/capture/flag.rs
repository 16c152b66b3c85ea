use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared capture-enabled toggle.
///
/// The host flips it; the pipeline only reads it and copies the current
/// value into every record so the collector can filter.
#[derive(Debug, Clone, Default)]
pub struct CaptureFlag(Arc<AtomicBool>);

impl CaptureFlag {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let flag = CaptureFlag::new(false);
        let host = flag.clone();
        host.set(true);
        assert!(flag.get());
        assert!(!CaptureFlag::default().get());
    }
}
