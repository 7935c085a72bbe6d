//! Cancellable, timer-driven step sequencer.
//!
//! Each run owns a single tokio task that sleeps until every step's
//! cumulative deadline and then advances `current_index`. Runs are fenced by
//! a run id: the latest snapshot carries the id of the only run allowed to
//! mutate it, so a loop from a replaced run can never publish progress even
//! if its abort has not been observed yet.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use super::{journey_steps, parse_amount, planned_duration, Currency, ExchangeRates, Step, StepStatus, Summary};

/// Input of one simulation run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    /// USD amount, already coerced to a non-negative number
    pub amount: f64,
    pub currency: Currency,
}

impl SimulationParams {
    pub fn new(amount: f64, currency: Currency) -> Self {
        let amount = if amount.is_finite() && amount > 0.0 {
            amount
        } else {
            0.0
        };
        Self { amount, currency }
    }

    /// Build params from raw user input, see [`parse_amount`]
    pub fn from_input(amount: &str, currency: Currency) -> Self {
        Self::new(parse_amount(amount), currency)
    }
}

/// Lifecycle phase of the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Completed,
}

/// Observable state of the current (or last) run
#[derive(Debug, Clone)]
pub struct RunSnapshot {
    pub run_id: u64,
    pub phase: Phase,
    pub steps: Vec<Step>,
    /// Number of completed steps, in `[0, steps.len()]`
    pub current_index: usize,
    pub started_at: Option<Instant>,
    pub params: Option<SimulationParams>,
    pub summary: Option<Summary>,
}

impl RunSnapshot {
    fn idle(run_id: u64) -> Self {
        Self {
            run_id,
            phase: Phase::Idle,
            steps: Vec::new(),
            current_index: 0,
            started_at: None,
            params: None,
            summary: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    /// Fraction of steps completed, 0.0 to 1.0
    pub fn progress_ratio(&self) -> f64 {
        if self.steps.is_empty() {
            return if self.is_completed() { 1.0 } else { 0.0 };
        }
        self.current_index as f64 / self.steps.len() as f64
    }

    pub fn percent(&self) -> u16 {
        (self.progress_ratio() * 100.0).round() as u16
    }

    pub fn step_status(&self, index: usize) -> StepStatus {
        StepStatus::for_index(index, self.current_index)
    }

    pub fn planned_total(&self) -> Duration {
        planned_duration(&self.steps)
    }
}

/// Event emitted to the handle of the run that produced it
#[derive(Debug, Clone, PartialEq)]
pub enum SequencerEvent {
    StepCompleted {
        run_id: u64,
        index: usize,
        current_index: usize,
        /// Time since `run()` when the step fired
        elapsed: Duration,
    },
    Completed(Summary),
}

/// Returned by [`StepSequencer::run`]
#[derive(Debug)]
pub struct RunHandle {
    pub run_id: u64,
    /// Closed once the run finishes or is cancelled
    pub events: mpsc::UnboundedReceiver<SequencerEvent>,
}

impl RunHandle {
    /// Drain events until the run completes.
    ///
    /// Returns `None` if the run was cancelled first.
    pub async fn wait(mut self) -> Option<Summary> {
        while let Some(event) = self.events.recv().await {
            if let SequencerEvent::Completed(summary) = event {
                return Some(summary);
            }
        }
        None
    }
}

/// Runs the simulated journey one step at a time.
///
/// Must be used from within a tokio runtime.
pub struct StepSequencer {
    rates: ExchangeRates,
    state: Arc<watch::Sender<RunSnapshot>>,
    last_run_id: u64,
    task: Option<JoinHandle<()>>,
}

impl StepSequencer {
    pub fn new(rates: ExchangeRates) -> Self {
        let (state, _rx) = watch::channel(RunSnapshot::idle(0));
        Self {
            rates,
            state: Arc::new(state),
            last_run_id: 0,
            task: None,
        }
    }

    pub fn rates(&self) -> &ExchangeRates {
        &self.rates
    }

    /// Latest snapshot, for polling renderers
    pub fn snapshot(&self) -> RunSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<RunSnapshot> {
        self.state.subscribe()
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    pub fn is_running(&self) -> bool {
        self.phase() == Phase::Running
    }

    /// Start the journey for `params`, replacing any run in flight.
    pub fn run(&mut self, params: SimulationParams) -> RunHandle {
        self.run_steps(params, journey_steps(params.currency))
    }

    /// Start a run over an explicit step table, replacing any run in flight.
    pub fn run_steps(&mut self, params: SimulationParams, steps: Vec<Step>) -> RunHandle {
        let restarted = self.abort_task();
        let run_id = self.next_run_id();
        let started_at = Instant::now();

        self.state.send_replace(RunSnapshot {
            run_id,
            phase: Phase::Running,
            steps: steps.clone(),
            current_index: 0,
            started_at: Some(started_at),
            params: Some(params),
            summary: None,
        });

        tracing::info!(
            run_id,
            amount = params.amount,
            currency = %params.currency,
            steps = steps.len(),
            restarted,
            "Simulation started"
        );

        let (tx, rx) = mpsc::unbounded_channel();
        let driver = RunDriver {
            run_id,
            steps,
            params,
            rates: self.rates,
            started_at,
            state: Arc::clone(&self.state),
            events: tx,
        };
        self.task = Some(tokio::spawn(driver.drive()));

        RunHandle { run_id, events: rx }
    }

    /// Cancel the run in flight (if any) and return to `Idle`.
    pub fn cancel(&mut self) {
        let aborted = self.abort_task();
        let run_id = self.next_run_id();
        self.state.send_replace(RunSnapshot::idle(run_id));
        if aborted {
            tracing::info!(run_id, "Simulation cancelled");
        }
    }

    /// Abort the current driver task; true if one was still running
    fn abort_task(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                let was_running = !task.is_finished();
                task.abort();
                was_running
            }
            None => false,
        }
    }

    fn next_run_id(&mut self) -> u64 {
        self.last_run_id += 1;
        self.last_run_id
    }
}

impl Drop for StepSequencer {
    fn drop(&mut self) {
        self.abort_task();
    }
}

/// State moved into the spawned task for one run
struct RunDriver {
    run_id: u64,
    steps: Vec<Step>,
    params: SimulationParams,
    rates: ExchangeRates,
    started_at: Instant,
    state: Arc<watch::Sender<RunSnapshot>>,
    events: mpsc::UnboundedSender<SequencerEvent>,
}

impl RunDriver {
    async fn drive(self) {
        let total = self.steps.len();
        let planned = planned_duration(&self.steps);

        if total == 0 {
            let summary = self.summary(planned);
            if self.publish(0, Some(summary.clone())) {
                let _ = self.events.send(SequencerEvent::Completed(summary));
            }
            return;
        }

        let mut deadline = self.started_at;
        for (index, step) in self.steps.iter().enumerate() {
            deadline += step.duration;
            time::sleep_until(deadline).await;

            let elapsed = self.started_at.elapsed();
            let current_index = index + 1;
            let summary = (current_index == total).then(|| self.summary(planned));

            if !self.publish(current_index, summary.clone()) {
                tracing::debug!(run_id = self.run_id, index, "Stale simulation run stopped");
                return;
            }

            tracing::debug!(
                run_id = self.run_id,
                step = %step.label,
                current_index,
                elapsed_ms = elapsed.as_millis() as u64,
                "Simulation step completed"
            );

            let _ = self.events.send(SequencerEvent::StepCompleted {
                run_id: self.run_id,
                index,
                current_index,
                elapsed,
            });

            if let Some(summary) = summary {
                tracing::info!(
                    run_id = self.run_id,
                    converted = summary.converted_amount,
                    currency = %summary.currency,
                    elapsed_ms = summary.actual_elapsed.as_millis() as u64,
                    "Simulation complete"
                );
                let _ = self.events.send(SequencerEvent::Completed(summary));
            }
        }
    }

    fn summary(&self, planned: Duration) -> Summary {
        Summary::new(
            self.params.amount,
            self.params.currency,
            &self.rates,
            planned,
            self.started_at.elapsed(),
        )
    }

    /// Apply progress if this run still owns the snapshot.
    ///
    /// A summary marks the run completed in the same update as its last step.
    fn publish(&self, current_index: usize, summary: Option<Summary>) -> bool {
        let mut applied = false;
        self.state.send_if_modified(|snapshot| {
            if snapshot.run_id != self.run_id || snapshot.phase != Phase::Running {
                return false;
            }
            snapshot.current_index = current_index;
            if summary.is_some() {
                snapshot.phase = Phase::Completed;
                snapshot.summary = summary;
            }
            applied = true;
            true
        });
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequencer() -> StepSequencer {
        StepSequencer::new(ExchangeRates::default())
    }

    #[test]
    fn test_params_coerce_invalid_amounts() {
        assert_eq!(SimulationParams::new(-3.0, Currency::Ngn).amount, 0.0);
        assert_eq!(SimulationParams::new(f64::NAN, Currency::Ngn).amount, 0.0);
        assert_eq!(SimulationParams::new(f64::INFINITY, Currency::Ngn).amount, 0.0);
        assert_eq!(SimulationParams::from_input("abc", Currency::Kes).amount, 0.0);
        assert_eq!(SimulationParams::from_input("250", Currency::Kes).amount, 250.0);
    }

    #[test]
    fn test_idle_snapshot() {
        let snapshot = RunSnapshot::idle(0);
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.percent(), 0);
        assert_eq!(snapshot.step_status(0), StepStatus::Pending);
    }

    #[test]
    fn test_snapshot_progress() {
        let mut snapshot = RunSnapshot::idle(1);
        snapshot.steps = journey_steps(Currency::Ngn);
        snapshot.phase = Phase::Running;
        snapshot.current_index = 3;
        assert_eq!(snapshot.percent(), 43);
        assert_eq!(snapshot.step_status(2), StepStatus::Completed);
        assert_eq!(snapshot.step_status(3), StepStatus::Pending);
        assert_eq!(snapshot.step_status(4), StepStatus::Waiting);
        assert_eq!(snapshot.planned_total(), Duration::from_millis(8300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_starts_at_zero() {
        let mut seq = sequencer();
        assert_eq!(seq.phase(), Phase::Idle);

        let handle = seq.run(SimulationParams::new(10.0, Currency::Brl));
        let snapshot = seq.snapshot();
        assert_eq!(snapshot.run_id, handle.run_id);
        assert_eq!(snapshot.phase, Phase::Running);
        assert_eq!(snapshot.current_index, 0);
        assert_eq!(snapshot.steps.len(), 7);
        assert!(seq.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_completes_with_summary() {
        let mut seq = sequencer();
        let summary = seq
            .run(SimulationParams::new(100.0, Currency::Ngn))
            .wait()
            .await
            .expect("run should complete");

        assert_eq!(summary.converted_amount, 165_000.0);
        assert_eq!(summary.fee_usd, 0.50);
        assert_eq!(summary.planned_elapsed, Duration::from_millis(8300));

        let snapshot = seq.snapshot();
        assert_eq!(snapshot.phase, Phase::Completed);
        assert_eq!(snapshot.current_index, 7);
        assert_eq!(snapshot.summary, Some(summary));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_step_table_completes_immediately() {
        let mut seq = sequencer();
        let summary = seq
            .run_steps(SimulationParams::new(5.0, Currency::Ghs), Vec::new())
            .wait()
            .await
            .expect("empty run should complete");

        assert_eq!(summary.planned_elapsed, Duration::ZERO);
        assert_eq!(summary.converted_amount, 77.5);
        assert_eq!(seq.snapshot().percent(), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_returns_to_idle() {
        let mut seq = sequencer();
        let handle = seq.run(SimulationParams::new(1.0, Currency::Ngn));

        time::sleep(Duration::from_millis(350)).await;
        assert_eq!(seq.snapshot().current_index, 2);

        seq.cancel();
        assert_eq!(seq.phase(), Phase::Idle);
        assert!(handle.wait().await.is_none());

        time::sleep(Duration::from_secs(10)).await;
        let snapshot = seq.snapshot();
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.current_index, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_driver() {
        let mut seq = sequencer();
        let handle = seq.run(SimulationParams::new(1.0, Currency::Ngn));
        drop(seq);
        assert!(handle.wait().await.is_none());
    }
}
