//! Process-wide sweep scheduling.
//!
//! One [`SweepScheduler`] per process owns the store and a single worker
//! thread. The worker ticks on a condvar timeout, so [`SweepScheduler::stop`]
//! interrupts a pending wait immediately instead of sleeping out the
//! cadence; an in-flight sweep sees the cancel flag between items. The
//! store mutex keeps at most one sweep in flight: timer ticks that find it
//! held skip their turn, on-demand triggers wait for it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError, TryLockError};
use std::thread;
use std::time::{Duration, Instant};

use larder_core::clock::Clock;
use larder_core::store::{AlertStore, InventoryStore, StoreError};

use crate::sweep::{self, SweepReport};

struct Inner<S> {
    store: Mutex<S>,
    clock: Arc<dyn Clock>,
    expiring_window_days: u32,
    stopping: Mutex<bool>,
    tick: Condvar,
    cancel: AtomicBool,
    sweeping: AtomicBool,
}

impl<S> Inner<S>
where
    S: InventoryStore + AlertStore,
{
    fn run_worker(&self, cadence: Duration) {
        let mut stopping = self
            .stopping
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        loop {
            let deadline = Instant::now() + cadence;
            // Sleep out the cadence; stop() wakes us through the condvar.
            while !*stopping {
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                let (guard, _timed_out) = self
                    .tick
                    .wait_timeout(stopping, deadline - now)
                    .unwrap_or_else(PoisonError::into_inner);
                stopping = guard;
            }
            if *stopping {
                return;
            }
            drop(stopping);
            self.timer_tick();
            stopping = self
                .stopping
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn timer_tick(&self) {
        let store = match self.store.try_lock() {
            Ok(store) => store,
            Err(TryLockError::WouldBlock) => {
                tracing::debug!("sweep already in flight; skipping this tick");
                return;
            }
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };
        if let Err(error) = self.run_locked(&store) {
            tracing::error!(error = %error, "scheduled sweep failed; next tick retries");
        }
    }

    fn run_locked(&self, store: &S) -> Result<SweepReport, StoreError> {
        let _flag = RunningFlag::raise(&self.sweeping);
        sweep::run_sweep(
            store,
            self.clock.as_ref(),
            self.expiring_window_days,
            &self.cancel,
        )
    }
}

/// Clears the in-flight marker even if the sweep unwinds.
struct RunningFlag<'a>(&'a AtomicBool);

impl<'a> RunningFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for RunningFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Owns the store and runs sweeps on a fixed cadence.
///
/// Construct one per process, [`start`](Self::start) it with the configured
/// cadence, and [`stop`](Self::stop) it (or drop it) on shutdown.
/// [`trigger_now`](Self::trigger_now) runs a sweep on the caller's thread
/// without involving the timer at all.
pub struct SweepScheduler<S> {
    inner: Arc<Inner<S>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl<S> SweepScheduler<S>
where
    S: InventoryStore + AlertStore + Send + 'static,
{
    #[must_use]
    pub fn new(store: S, clock: Arc<dyn Clock>, expiring_window_days: u32) -> Self {
        Self {
            inner: Arc::new(Inner {
                store: Mutex::new(store),
                clock,
                expiring_window_days,
                stopping: Mutex::new(false),
                tick: Condvar::new(),
                cancel: AtomicBool::new(false),
                sweeping: AtomicBool::new(false),
            }),
            worker: None,
        }
    }

    /// Spawn the worker thread. The first sweep fires one full cadence
    /// after this call. A second `start` on a live worker is ignored.
    pub fn start(&mut self, cadence: Duration) {
        if self.worker.is_some() {
            tracing::warn!("sweep worker already started; ignoring");
            return;
        }
        *self
            .inner
            .stopping
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = false;
        self.inner.cancel.store(false, Ordering::SeqCst);

        let inner = Arc::clone(&self.inner);
        self.worker = Some(thread::spawn(move || inner.run_worker(cadence)));
        tracing::info!(cadence_secs = cadence.as_secs(), "sweep worker started");
    }

    /// Run a sweep on the calling thread, waiting for any in-flight sweep
    /// to finish first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the household list cannot be loaded.
    pub fn trigger_now(&self) -> Result<SweepReport, StoreError> {
        let store = self
            .inner
            .store
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.inner.run_locked(&store)
    }
}

impl<S> SweepScheduler<S> {
    /// Whether a sweep is executing right now.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.sweeping.load(Ordering::SeqCst)
    }

    /// Whether the worker thread is alive.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.worker.is_some()
    }

    /// Stop the worker: interrupt its wait, cancel any in-flight sweep
    /// between items, and join. Idempotent.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        *self
            .inner
            .stopping
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = true;
        self.inner.cancel.store(true, Ordering::SeqCst);
        self.inner.tick.notify_all();
        if worker.join().is_err() {
            tracing::error!("sweep worker panicked");
        }
        // The joined worker can no longer observe the flag; clear it so
        // later on-demand sweeps run unimpeded.
        self.inner.cancel.store(false, Ordering::SeqCst);
        tracing::info!("sweep worker stopped");
    }
}

impl<S> std::fmt::Debug for SweepScheduler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepScheduler")
            .field("started", &self.is_started())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl<S> Drop for SweepScheduler<S> {
    fn drop(&mut self) {
        self.stop();
    }
}
