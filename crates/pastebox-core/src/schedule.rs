use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

/// Decides when the next poll cycle runs.
pub trait Schedule {
    /// Block until the next cycle is due. Returns `false` once the schedule
    /// has stopped and no further cycles should run.
    fn wait(&mut self) -> bool;
}

/// Fixed-interval schedule that can be stopped from another thread.
///
/// The ticker stops when [`TickerHandle::stop`] is called or when every
/// handle has been dropped. A pending wait returns immediately in both cases.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    stop_rx: Receiver<()>,
}

/// Stops the [`Ticker`] it was created with.
#[derive(Debug, Clone)]
pub struct TickerHandle {
    stop_tx: Sender<()>,
}

impl Ticker {
    pub fn new(interval: Duration) -> (Self, TickerHandle) {
        let (stop_tx, stop_rx) = mpsc::channel();
        (Self { interval, stop_rx }, TickerHandle { stop_tx })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Schedule for Ticker {
    fn wait(&mut self) -> bool {
        match self.stop_rx.recv_timeout(self.interval) {
            Err(RecvTimeoutError::Timeout) => true,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }
}

impl TickerHandle {
    pub fn stop(&self) {
        // The ticker may already be gone; nothing left to stop then.
        let _ = self.stop_tx.send(());
    }
}

/// Runs a fixed number of cycles without sleeping. Used by `--once` and tests.
#[derive(Debug, Clone)]
pub struct Cycles {
    remaining: usize,
}

impl Cycles {
    /// A schedule allowing `total` cycles in all, including the first one,
    /// which always runs before the schedule is consulted.
    pub fn new(total: usize) -> Self {
        Self {
            remaining: total.saturating_sub(1),
        }
    }

    pub fn once() -> Self {
        Self::new(1)
    }
}

impl Schedule for Cycles {
    fn wait(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn cycles_allows_exact_count() {
        let mut s = Cycles::new(3);
        assert!(s.wait());
        assert!(s.wait());
        assert!(!s.wait());
        assert!(!s.wait());
    }

    #[test]
    fn once_never_waits() {
        assert!(!Cycles::once().wait());
        assert!(!Cycles::new(0).wait());
    }

    #[test]
    fn ticker_ticks_after_interval() {
        let (mut ticker, _handle) = Ticker::new(Duration::from_millis(10));
        let start = Instant::now();
        assert!(ticker.wait());
        assert!(start.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn ticker_stops_early_on_stop() {
        let (mut ticker, handle) = Ticker::new(Duration::from_secs(60));
        handle.stop();
        let start = Instant::now();
        assert!(!ticker.wait());
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn ticker_stops_when_handle_dropped() {
        let (mut ticker, handle) = Ticker::new(Duration::from_secs(60));
        drop(handle);
        assert!(!ticker.wait());
    }

    #[test]
    fn ticker_can_be_stopped_from_another_thread() {
        let (mut ticker, handle) = Ticker::new(Duration::from_secs(60));
        let stopper = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            handle.stop();
        });
        assert!(!ticker.wait());
        stopper.join().unwrap();
    }
}
