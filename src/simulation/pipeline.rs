//! One-step-ahead stepping pipeline
//!
//! Each tick waits for the step launched on the previous tick, publishes its
//! buffer, then immediately launches the following step on the worker pool
//! and returns. Computation of step k+1 therefore overlaps whatever the
//! caller does with step k's snapshot (render, idle time until the next tick).
//!
//! ```text
//!  tick k:   wait(k) ─ swap ─ launch(k+1) ─┐ return
//!                                          │  workers compute k+1
//!  tick k+1: wait(k+1) ─ swap ─ launch(k+2)┘
//! ```
//!
//! A step job partitions `[0, N)` across the pool, reads the shared current
//! snapshot and writes disjoint slices of its own target buffer. The only
//! coordination is the completion channel the tick blocks on.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError};

use super::error::StepError;
use super::params::Parameters;
use super::partition::partition;
use super::rules::{RuleKind, UpdateRule};
use super::scenario::Scenario;
use super::states::Entity;
use super::store::EntityStore;

type StepOutcome = Result<Vec<Entity>, StepError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,     // nothing in flight
    Stepping, // a step job has been launched and not yet collected
}

/// What a successful tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub step: u64,         // swaps completed since (re)initialisation
    pub waited: Duration,  // time blocked on workers
    pub primed: bool,      // the tick had to launch its own step first
}

/// Handle to a launched step
struct InFlight {
    receiver: Receiver<StepOutcome>,
    cancel: Arc<AtomicBool>,
}

impl InFlight {
    fn cancel(self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

pub struct Pipeline {
    store: EntityStore,
    rule: Arc<dyn UpdateRule>,
    params: Parameters,
    pool: Arc<ThreadPool>,
    in_flight: Option<InFlight>,
    steps: u64,
    worker_timeout: Option<Duration>,
}

impl Pipeline {
    pub fn new(entities: Vec<Entity>, rule: Arc<dyn UpdateRule>, params: Parameters, pool: Arc<ThreadPool>) -> Self {
        Self {
            store: EntityStore::new(entities),
            rule,
            params,
            pool,
            in_flight: None,
            steps: 0,
            worker_timeout: None,
        }
    }

    pub fn from_scenario(scenario: Scenario, pool: Arc<ThreadPool>) -> Self {
        let timeout = scenario.engine.worker_timeout;
        Self::new(scenario.entities, scenario.rule, scenario.parameters, pool).with_worker_timeout(timeout)
    }

    /// Bound how long a tick may block on workers
    pub fn with_worker_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.worker_timeout = timeout;
        self
    }

    /// Advance by one step and publish it.
    ///
    /// On error the swap is skipped and the last good snapshot stays live.
    /// A timed-out step stays in flight and is waited on again next tick;
    /// any other failure drops it and the next tick relaunches from `current`.
    pub fn tick(&mut self) -> Result<TickReport, StepError> {
        let primed = self.in_flight.is_none();
        if primed {
            self.launch();
        }

        let started = Instant::now();
        let next = self.wait()?;
        let waited = started.elapsed();

        self.store.swap(next)?;
        self.steps += 1;
        self.launch();

        let interval = Duration::from_millis(u64::from(self.params.tick_interval_ms));
        if !primed && waited > interval {
            log::warn!("step {} overran the tick interval: waited {:?} (interval {:?})", self.steps, waited, interval);
        } else {
            log::debug!("step {} published after waiting {:?}", self.steps, waited);
        }

        Ok(TickReport {
            step: self.steps,
            waited,
            primed,
        })
    }

    /// Replace every entity, the rule and the parameters; restart from `Idle`
    pub fn reinitialize(&mut self, entities: Vec<Entity>, rule: Arc<dyn UpdateRule>, params: Parameters) {
        self.cancel_in_flight();
        self.store = EntityStore::new(entities);
        self.rule = rule;
        self.params = params;
        self.steps = 0;
        log::info!("pipeline reinitialised with {} entities ({:?})", self.store.len(), self.rule.kind());
    }

    /// Restart from a freshly built scenario, resizing the pool if its thread count changed
    pub fn reinitialize_from(&mut self, scenario: Scenario) -> Result<(), ThreadPoolBuildError> {
        self.cancel_in_flight();
        if scenario.engine.threads.max(1) != self.pool.current_num_threads() {
            self.pool = scenario.engine.build_pool()?;
            log::info!("worker pool resized to {} threads", self.pool.current_num_threads());
        }
        self.worker_timeout = scenario.engine.worker_timeout;
        self.reinitialize(scenario.entities, scenario.rule, scenario.parameters);
        Ok(())
    }

    /// Live snapshot, valid until the next tick
    pub fn current(&self) -> &[Entity] {
        self.store.current()
    }

    /// Shared handle to the live snapshot
    pub fn snapshot(&self) -> Arc<Vec<Entity>> {
        self.store.snapshot()
    }

    pub fn state(&self) -> PipelineState {
        if self.in_flight.is_some() {
            PipelineState::Stepping
        } else {
            PipelineState::Idle
        }
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn rule_kind(&self) -> RuleKind {
        self.rule.kind()
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Spawn the next step onto the pool without waiting for it
    fn launch(&mut self) {
        let snapshot = self.store.snapshot();
        let target = self.store.take_target();
        let ranges = partition(snapshot.len(), self.pool.current_num_threads());
        let rule = Arc::clone(&self.rule);
        let params = self.params;

        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let (sender, receiver) = mpsc::sync_channel(1);

        self.pool.spawn(move || {
            let outcome = compute_step(rule.as_ref(), &snapshot, target, &ranges, &params, &flag);
            // Release the snapshot before reporting so the store can recycle it
            drop(snapshot);
            // Receiver is gone after a reinitialisation; nothing to report to
            let _ = sender.send(outcome);
        });

        self.in_flight = Some(InFlight { receiver, cancel });
    }

    /// Block until the in-flight step reports back
    fn wait(&mut self) -> StepOutcome {
        let Some(in_flight) = self.in_flight.take() else {
            return Err(StepError::WorkerLost);
        };

        match self.worker_timeout {
            Some(limit) => match in_flight.receiver.recv_timeout(limit) {
                Ok(outcome) => outcome,
                Err(RecvTimeoutError::Timeout) => {
                    self.in_flight = Some(in_flight);
                    Err(StepError::Timeout(limit))
                }
                Err(RecvTimeoutError::Disconnected) => Err(StepError::WorkerLost),
            },
            None => in_flight.receiver.recv().unwrap_or(Err(StepError::WorkerLost)),
        }
    }

    fn cancel_in_flight(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.cancel();
        }
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}

/// Compute one full step into `next`.
///
/// Each range gets its own disjoint slice of `next`; all reads go to `current`.
/// A failing or panicking range fails the whole step, and the partially
/// written buffer is never returned.
pub fn compute_step(
    rule: &dyn UpdateRule,
    current: &[Entity],
    mut next: Vec<Entity>,
    ranges: &[std::ops::Range<usize>],
    params: &Parameters,
    cancel: &AtomicBool,
) -> StepOutcome {
    if next.len() != current.len() {
        return Err(StepError::BufferLength {
            expected: current.len(),
            actual: next.len(),
        });
    }

    let mut slices = Vec::with_capacity(ranges.len());
    let mut rest: &mut [Entity] = &mut next;
    for range in ranges {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
        slices.push((range.clone(), head));
        rest = tail;
    }

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        slices.into_par_iter().try_for_each(|(range, slice)| {
            for (i, slot) in range.zip(slice.iter_mut()) {
                if cancel.load(Ordering::Relaxed) {
                    return Err(StepError::Cancelled);
                }
                *slot = rule.next_state(i, current, params)?;
            }
            Ok(())
        })
    }));

    match result {
        Ok(Ok(())) => Ok(next),
        Ok(Err(err)) => Err(err),
        Err(payload) => Err(StepError::WorkerPanicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
