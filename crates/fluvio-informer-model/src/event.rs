use std::sync::Arc;

use fluvio_types::event::StickyEvent;

/// Cancellation shared by every running pipeline.
/// Clones observe the same signal; once stopped it stays stopped.
#[derive(Debug, Clone)]
pub struct StopSignal(Arc<StickyEvent>);

impl Default for StopSignal {
    fn default() -> Self {
        Self(StickyEvent::shared())
    }
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// request every holder to stop
    pub fn stop(&self) {
        self.0.notify();
    }

    pub fn is_stopped(&self) -> bool {
        self.0.is_set()
    }

    /// resolves once stop has been requested
    pub async fn stopped(&self) {
        self.0.listen().await
    }
}

#[cfg(test)]
mod test {

    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use fluvio_future::task::spawn;
    use fluvio_future::timer::sleep;

    use super::StopSignal;

    #[fluvio_future::test]
    async fn test_stop_wakes_all_clones() {
        let signal = StopSignal::new();
        let finished = Arc::new(AtomicU32::new(0));

        for _ in 0..3 {
            let signal = signal.clone();
            let finished = finished.clone();
            spawn(async move {
                signal.stopped().await;
                finished.fetch_add(1, Ordering::SeqCst);
            });
        }

        sleep(Duration::from_millis(10)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 0);
        assert!(!signal.is_stopped());

        signal.stop();
        sleep(Duration::from_millis(10)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 3);
    }

    #[fluvio_future::test]
    async fn test_stop_is_sticky() {
        let signal = StopSignal::new();
        signal.stop();
        // late listener must not block
        signal.clone().stopped().await;
        assert!(signal.is_stopped());
    }

    #[test]
    fn test_independent_signals() {
        let first = StopSignal::new();
        let second = StopSignal::default();
        first.stop();
        assert!(first.is_stopped());
        assert!(!second.is_stopped());
    }
}
