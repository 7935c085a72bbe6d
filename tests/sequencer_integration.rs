//! Integration tests for the simulated remittance flow.
//!
//! All tests run on tokio's paused clock, so step timings are exact and the
//! full 8.3s journey completes instantly.
//!
//! ```bash
//! cargo test --test sequencer_integration
//! ```

use std::time::Duration;

use jx402::flow::{
    journey_steps, planned_duration, Currency, ExchangeRates, Phase, SequencerEvent,
    SimulationParams, Step, StepSequencer, StepStatus,
};

fn sequencer() -> StepSequencer {
    StepSequencer::new(ExchangeRates::default())
}

/// Collect (index, elapsed_ms) for every step until the run completes
async fn collect_steps(
    handle: &mut jx402::flow::RunHandle,
) -> (Vec<(usize, u128)>, Option<jx402::flow::Summary>) {
    let mut steps = Vec::new();
    while let Some(event) = handle.events.recv().await {
        match event {
            SequencerEvent::StepCompleted { index, elapsed, .. } => {
                steps.push((index, elapsed.as_millis()));
            }
            SequencerEvent::Completed(summary) => return (steps, Some(summary)),
        }
    }
    (steps, None)
}

// ─── Timing ──────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_ngn_journey_fires_at_cumulative_offsets() {
    let mut seq = sequencer();
    let mut handle = seq.run(SimulationParams::new(100.0, Currency::Ngn));

    let (steps, summary) = collect_steps(&mut handle).await;

    assert_eq!(
        steps,
        vec![
            (0, 100),
            (1, 300),
            (2, 2600),
            (3, 2900),
            (4, 4700),
            (5, 8200),
            (6, 8300),
        ]
    );

    let summary = summary.expect("run should complete");
    assert_eq!(summary.converted_amount, 165_000.0);
    assert_eq!(summary.fee_usd, 0.50);
    assert_eq!(summary.actual_elapsed, Duration::from_millis(8300));
    assert_eq!(summary.planned_elapsed, Duration::from_millis(8300));

    let snapshot = seq.snapshot();
    assert_eq!(snapshot.phase, Phase::Completed);
    assert_eq!(snapshot.current_index, 7);
    assert_eq!(snapshot.percent(), 100);
}

#[tokio::test(start_paused = true)]
async fn test_total_time_matches_declared_durations() {
    let steps = vec![
        Step::new("Quote", 40),
        Step::new("Lock", 0),
        Step::new("Send", 260),
    ];
    let mut seq = sequencer();
    let handle = seq.run_steps(SimulationParams::new(10.0, Currency::Brl), steps.clone());

    let summary = handle.wait().await.expect("run should complete");
    assert_eq!(summary.actual_elapsed, planned_duration(&steps));
    assert_eq!(summary.actual_elapsed, Duration::from_millis(300));
    assert_eq!(summary.converted_amount, 52.0);
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_kes_zero_amount_still_completes() {
    let mut seq = sequencer();
    let handle = seq.run(SimulationParams::new(0.0, Currency::Kes));

    let snapshot = seq.snapshot();
    assert_eq!(snapshot.steps[4].label, "KES Off-ramp");

    let summary = handle.wait().await.expect("run should complete");
    assert_eq!(summary.amount_usd, 0.0);
    assert_eq!(summary.converted_amount, 0.0);
    assert_eq!(summary.rate, 158.0);
    assert_eq!(summary.fee_usd, 0.50);
}

#[tokio::test(start_paused = true)]
async fn test_non_numeric_amount_treated_as_zero() {
    let mut seq = sequencer();
    let params = SimulationParams::from_input("abc", Currency::Ghs);
    assert_eq!(params.amount, 0.0);

    let summary = seq.run(params).wait().await.expect("run should complete");
    assert_eq!(summary.converted_amount, 0.0);
    assert_eq!(summary.currency, Currency::Ghs);
}

// ─── Restart and cancel ──────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_rerun_mid_flight_resets_progress() {
    let mut seq = sequencer();
    let first = seq.run(SimulationParams::new(100.0, Currency::Ngn));
    let mut rx = seq.subscribe();

    // Restart on the exact instant the first run's step 0 is due
    tokio::time::sleep(Duration::from_millis(100)).await;
    let mut second = seq.run(SimulationParams::new(50.0, Currency::Brl));
    assert_ne!(first.run_id, second.run_id);

    let snapshot = rx.borrow_and_update().clone();
    assert_eq!(snapshot.run_id, second.run_id);
    assert_eq!(snapshot.current_index, 0);
    assert_eq!(snapshot.phase, Phase::Running);

    // Every later publication belongs to the second run
    let mut updates = 0;
    loop {
        rx.changed().await.expect("sequencer dropped");
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(
            snapshot.run_id, second.run_id,
            "stale snapshot from the replaced run: {:?}",
            snapshot
        );
        updates += 1;
        if snapshot.is_completed() {
            break;
        }
    }
    assert!(updates >= 1);

    // The replaced run never completes
    assert!(first.wait().await.is_none());

    let (steps, summary) = collect_steps(&mut second).await;
    assert_eq!(steps.len(), 7);
    // Offsets are relative to the second run's own start
    assert_eq!(steps[0].1, 100);
    assert_eq!(steps[6].1, 8300);

    let summary = summary.expect("second run should complete");
    assert_eq!(summary.currency, Currency::Brl);
    assert_eq!(summary.converted_amount, 260.0);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_progress() {
    let mut seq = sequencer();
    let handle = seq.run(SimulationParams::new(100.0, Currency::Ngn));

    tokio::time::sleep(Duration::from_millis(500)).await;
    seq.cancel();
    assert_eq!(seq.phase(), Phase::Idle);

    tokio::time::sleep(Duration::from_secs(10)).await;
    let snapshot = seq.snapshot();
    assert_eq!(snapshot.phase, Phase::Idle);
    assert_eq!(snapshot.current_index, 0);
    assert!(handle.wait().await.is_none());
}

// ─── Observers ───────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_watch_progress_is_monotonic() {
    let mut seq = sequencer();
    let mut rx = seq.subscribe();
    let handle = seq.run(SimulationParams::new(20.0, Currency::Ngn));
    let run_id = handle.run_id;

    let mut seen = Vec::new();
    loop {
        if rx.changed().await.is_err() {
            break;
        }
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.run_id, run_id);
        assert!(snapshot.current_index <= snapshot.steps.len());
        seen.push(snapshot.current_index);
        if snapshot.is_completed() {
            break;
        }
    }

    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(seen.last(), Some(&7));
}

#[tokio::test(start_paused = true)]
async fn test_step_statuses_follow_progress() {
    let mut seq = sequencer();
    let _handle = seq.run(SimulationParams::new(100.0, Currency::Ngn));

    tokio::time::sleep(Duration::from_millis(2700)).await;
    let snapshot = seq.snapshot();
    assert_eq!(snapshot.current_index, 3);

    let statuses: Vec<StepStatus> = (0..snapshot.steps.len())
        .map(|i| snapshot.step_status(i))
        .collect();
    assert_eq!(
        statuses,
        vec![
            StepStatus::Completed,
            StepStatus::Completed,
            StepStatus::Completed,
            StepStatus::Pending,
            StepStatus::Waiting,
            StepStatus::Waiting,
            StepStatus::Waiting,
        ]
    );
    assert_eq!(snapshot.planned_total(), planned_duration(&journey_steps(Currency::Ngn)));
}
