use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Shared count of open connections. Acquiring hands out a lease that
/// decrements the count when dropped, so a panicking worker still
/// releases its slot.
#[derive(Clone, Debug, Default)]
pub struct ConnectionCounter {
    open: Arc<AtomicUsize>,
}

impl ConnectionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    /// Atomically claims a slot, or returns None once `limit` is reached.
    pub fn try_acquire(&self, limit: usize) -> Option<ConnectionLease> {
        self.open
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |open| {
                if open < limit { Some(open + 1) } else { None }
            })
            .ok()
            .map(|_| ConnectionLease {
                counter: Arc::clone(&self.open),
            })
    }
}

#[derive(Debug)]
pub struct ConnectionLease {
    counter: Arc<AtomicUsize>,
}

impl Drop for ConnectionLease {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn acquiring_increments_and_dropping_releases() {
        let counter = ConnectionCounter::new();
        assert_eq!(counter.open_connections(), 0);

        let lease = counter.try_acquire(10).expect("slot available");
        assert_eq!(counter.open_connections(), 1);

        drop(lease);
        assert_eq!(counter.open_connections(), 0);
    }

    #[test]
    fn acquire_fails_at_the_limit() {
        let counter = ConnectionCounter::new();
        let _first = counter.try_acquire(2).expect("slot available");
        let _second = counter.try_acquire(2).expect("slot available");

        assert!(counter.try_acquire(2).is_none());
        assert_eq!(counter.open_connections(), 2);
    }

    #[test]
    fn zero_limit_admits_nothing() {
        let counter = ConnectionCounter::new();
        assert!(counter.try_acquire(0).is_none());
    }

    #[test]
    fn count_balances_out_under_contention() {
        let counter = ConnectionCounter::new();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = counter.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        let lease = counter.try_acquire(usize::MAX).expect("no limit");
                        drop(lease);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("worker finished");
        }

        assert_eq!(counter.open_connections(), 0);
    }
}
