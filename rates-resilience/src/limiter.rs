//! Fixed-window rate limiter with a bounded FIFO queue.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::PipelineError;

/// Fixed-window limiter settings.
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Length of one permit window.
    pub window: Duration,
    /// Permits granted per window.
    pub permit_limit: usize,
    /// Callers allowed to wait for the next window, oldest-first.
    pub queue_limit: usize,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(30),
            permit_limit: 1000,
            queue_limit: 1000,
        }
    }
}

struct Waiter {
    id: u64,
    grant: oneshot::Sender<()>,
}

struct WindowState {
    window_start: Instant,
    permits_used: usize,
    queue: VecDeque<Waiter>,
    next_id: u64,
}

/// Fixed-window rate limiter.
///
/// A call arriving with a free permit proceeds immediately. When the window
/// is exhausted the call joins a bounded FIFO queue and suspends; queued
/// calls are granted permits strictly in arrival order as windows rotate.
/// A call arriving when both permits and queue are exhausted fails with
/// [`PipelineError::Throttled`] without waiting.
///
/// Rotation is performed by whichever waiter wakes first at the window
/// boundary, so the limiter needs no background task.
pub struct FixedWindowLimiter {
    config: RateLimiterConfig,
    state: Mutex<WindowState>,
}

impl FixedWindowLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        let state = WindowState {
            window_start: Instant::now(),
            permits_used: 0,
            queue: VecDeque::new(),
            next_id: 0,
        };
        Self {
            config,
            state: Mutex::new(state),
        }
    }

    /// Claims one permit, suspending in the queue if the window is exhausted.
    ///
    /// Cancellation while queued releases the claimed queue slot and returns
    /// [`PipelineError::Cancelled`].
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<(), PipelineError> {
        let (mut grant, id, mut window_end) = {
            let mut state = self.state.lock().expect("limiter state poisoned");
            self.rotate(&mut state, Instant::now());

            // Permits go to queued callers first; a fresh arrival may only
            // take one directly when nobody is waiting.
            if state.queue.is_empty() && state.permits_used < self.config.permit_limit {
                state.permits_used += 1;
                return Ok(());
            }
            if state.queue.len() >= self.config.queue_limit {
                warn!("rate limiter saturated; rejecting call");
                return Err(PipelineError::Throttled);
            }

            let (tx, rx) = oneshot::channel();
            let id = state.next_id;
            state.next_id += 1;
            state.queue.push_back(Waiter { id, grant: tx });
            debug!(queued = state.queue.len(), "window exhausted; call queued");
            (rx, id, state.window_start + self.config.window)
        };

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    self.remove_waiter(id);
                    return Err(PipelineError::Cancelled);
                }
                res = &mut grant => {
                    // The sender is only dropped if the waiter was evicted,
                    // which happens solely through cancellation above.
                    return match res {
                        Ok(()) => Ok(()),
                        Err(_) => Err(PipelineError::Cancelled),
                    };
                }
                _ = tokio::time::sleep_until(window_end) => {
                    let mut state = self.state.lock().expect("limiter state poisoned");
                    self.rotate(&mut state, Instant::now());
                    window_end = state.window_start + self.config.window;
                }
            }
        }
    }

    /// Advances the window if its boundary passed and drains queued waiters
    /// into the fresh permit budget, oldest first.
    fn rotate(&self, state: &mut WindowState, now: Instant) {
        let window = self.config.window;
        if now.duration_since(state.window_start) < window {
            return;
        }
        while now.duration_since(state.window_start) >= window {
            state.window_start += window;
        }
        state.permits_used = 0;
        while state.permits_used < self.config.permit_limit {
            match state.queue.pop_front() {
                // A closed receiver means the waiter was dropped mid-cancel;
                // its permit stays available.
                Some(waiter) => {
                    if waiter.grant.send(()).is_ok() {
                        state.permits_used += 1;
                    }
                }
                None => break,
            }
        }
    }

    fn remove_waiter(&self, id: u64) {
        let mut state = self.state.lock().expect("limiter state poisoned");
        state.queue.retain(|waiter| waiter.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn small_limiter(permits: usize, queue: usize) -> FixedWindowLimiter {
        FixedWindowLimiter::new(RateLimiterConfig {
            window: Duration::from_secs(1),
            permit_limit: permits,
            queue_limit: queue,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn grants_permits_within_the_window() {
        let limiter = small_limiter(3, 3);
        let cancel = CancellationToken::new();
        for _ in 0..3 {
            limiter.acquire(&cancel).await.unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn rejects_when_permits_and_queue_are_exhausted() {
        let limiter = Arc::new(small_limiter(2, 2));
        let cancel = CancellationToken::new();

        limiter.acquire(&cancel).await.unwrap();
        limiter.acquire(&cancel).await.unwrap();

        // Fill the queue with two suspended callers.
        for _ in 0..2 {
            let limiter = Arc::clone(&limiter);
            let cancel = cancel.clone();
            tokio::spawn(async move { limiter.acquire(&cancel).await });
            tokio::task::yield_now().await;
        }

        let result = limiter.acquire(&cancel).await;
        assert_eq!(result, Err(PipelineError::Throttled));
    }

    #[tokio::test(start_paused = true)]
    async fn saturating_the_default_config_throttles() {
        let limiter = Arc::new(FixedWindowLimiter::new(RateLimiterConfig::default()));
        let cancel = CancellationToken::new();

        for _ in 0..1000 {
            limiter.acquire(&cancel).await.unwrap();
        }
        for _ in 0..1000 {
            let limiter = Arc::clone(&limiter);
            let cancel = cancel.clone();
            tokio::spawn(async move { limiter.acquire(&cancel).await });
        }
        // Each yield lets the scheduler poll only one event-interval batch
        // of spawned tasks, so yield repeatedly until all waiters queue up.
        for _ in 0..1000 {
            tokio::task::yield_now().await;
        }

        let result = limiter.acquire(&cancel).await;
        assert_eq!(result, Err(PipelineError::Throttled));
    }

    #[tokio::test(start_paused = true)]
    async fn queued_callers_are_granted_in_fifo_order() {
        let limiter = Arc::new(small_limiter(1, 3));
        let cancel = CancellationToken::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        limiter.acquire(&cancel).await.unwrap();

        let mut handles = Vec::new();
        for caller in 0..3 {
            let limiter = Arc::clone(&limiter);
            let cancel = cancel.clone();
            let order = Arc::clone(&order);
            handles.push(tokio::spawn(async move {
                limiter.acquire(&cancel).await.unwrap();
                order.lock().unwrap().push(caller);
            }));
            tokio::task::yield_now().await;
        }

        // Three one-permit windows must elapse before all are granted.
        tokio::time::sleep(Duration::from_secs(4)).await;
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn queued_caller_resumes_at_window_rotation() {
        let limiter = Arc::new(small_limiter(1, 1));
        let cancel = CancellationToken::new();
        limiter.acquire(&cancel).await.unwrap();

        let granted = Arc::new(AtomicUsize::new(0));
        let handle = {
            let limiter = Arc::clone(&limiter);
            let cancel = cancel.clone();
            let granted = Arc::clone(&granted);
            tokio::spawn(async move {
                limiter.acquire(&cancel).await.unwrap();
                granted.store(1, Ordering::SeqCst);
            })
        };
        tokio::task::yield_now().await;
        assert_eq!(granted.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        handle.await.unwrap();
        assert_eq!(granted.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_releases_the_queue_slot() {
        let limiter = Arc::new(small_limiter(1, 1));
        let cancel = CancellationToken::new();
        limiter.acquire(&cancel).await.unwrap();

        let waiter_cancel = CancellationToken::new();
        let handle = {
            let limiter = Arc::clone(&limiter);
            let waiter_cancel = waiter_cancel.clone();
            tokio::spawn(async move { limiter.acquire(&waiter_cancel).await })
        };
        tokio::task::yield_now().await;

        waiter_cancel.cancel();
        assert_eq!(handle.await.unwrap(), Err(PipelineError::Cancelled));

        // The slot freed by cancellation is available to a new caller.
        let handle = {
            let limiter = Arc::clone(&limiter);
            let cancel = cancel.clone();
            tokio::spawn(async move { limiter.acquire(&cancel).await })
        };
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(handle.await.unwrap(), Ok(()));
    }
}
