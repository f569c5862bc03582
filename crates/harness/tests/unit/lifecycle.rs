//! # Lifecycle Tests
//!
//! Reset sequencing, the clock loop's termination rules, and exactly-once
//! finalization, using the recording stub and the `mockall` model.

use crate::common::harness::reset_harness;
use crate::common::mocks::model::{
    Event, MockModel, StubModel, eval_clocks, eval_count, finalize_count,
};
use mockall::Sequence;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use vtb_core::common::{CompletionState, HarnessError, InputLine};
use vtb_core::sim::harness::{Harness, Phase};
use vtb_core::stats::StopReason;

#[test]
fn test_construction_drives_clock_low() {
    let harness = Harness::new(StubModel::new());
    assert_eq!(harness.phase(), Phase::Constructed);
    assert!(!harness.clock());
    assert_eq!(
        harness.model().events(),
        vec![Event::Set(InputLine::Clock, false)]
    );
}

#[test]
fn test_reset_sequence_order() {
    let harness = reset_harness(StubModel::new());
    assert_eq!(harness.phase(), Phase::Reset);
    assert!(!harness.reset_line());
    assert_eq!(
        harness.model().events(),
        vec![
            Event::Set(InputLine::Clock, false),
            Event::Set(InputLine::Reset, true),
            Event::Eval {
                clk: false,
                rst: true,
                env: None
            },
            Event::Set(InputLine::Reset, false),
            Event::Eval {
                clk: false,
                rst: false,
                env: None
            },
        ]
    );
}

#[test]
fn test_reset_sequence_with_mock() {
    let mut model = MockModel::new();
    let mut seq = Sequence::new();
    model
        .expect_set_input()
        .with(eq(InputLine::Clock), eq(false))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    model
        .expect_set_input()
        .with(eq(InputLine::Reset), eq(true))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    model
        .expect_evaluate()
        .times(1)
        .in_sequence(&mut seq)
        .return_const(CompletionState::Running);
    model
        .expect_set_input()
        .with(eq(InputLine::Reset), eq(false))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());
    model
        .expect_evaluate()
        .times(1)
        .in_sequence(&mut seq)
        .return_const(CompletionState::Running);
    model.expect_finalize().times(1).return_const(());

    let mut harness = Harness::new(model);
    harness.reset().unwrap();
    harness.finalize().unwrap();
}

#[test]
fn test_reset_is_reasserted_before_the_loop() {
    let mut harness = reset_harness(StubModel::new());
    let _ = harness.run(1).unwrap();
    let events = harness.model().events();
    // Event 5 is the first loop event: reset goes high again without an evaluation.
    assert_eq!(events[5], Event::Set(InputLine::Reset, true));
    assert_eq!(events[6], Event::Set(InputLine::Clock, true));
    assert!(harness.reset_line());
    for event in &events[7..] {
        if let Event::Eval { rst, .. } = event {
            assert!(*rst, "reset released during the clock loop");
        }
    }
}

#[test]
fn test_budget_five_runs_ten_half_cycles() {
    let mut harness = reset_harness(StubModel::new());
    let summary = harness.run(5).unwrap();

    assert_eq!(summary.half_cycles, 10);
    assert_eq!(summary.cycles(), 5);
    assert_eq!(summary.stop_reason, StopReason::BudgetExhausted);

    let events = harness.model().events();
    let loop_clocks = &eval_clocks(&events)[2..];
    assert_eq!(
        loop_clocks,
        &[true, false, true, false, true, false, true, false, true, false]
    );
    assert_eq!(finalize_count(&events), 1);
    assert_eq!(events.last(), Some(&Event::Finalize));
}

#[test]
fn test_unbounded_runs_until_model_finishes() {
    // Two reset evaluations, then the 7th loop evaluation reports completion.
    let mut harness = reset_harness(StubModel::new().finishing_after(9));
    let summary = harness.run(0).unwrap();

    assert_eq!(summary.half_cycles, 7);
    assert_eq!(summary.stop_reason, StopReason::ModelFinished);
    assert_eq!(harness.evaluations(), 9);
    assert_eq!(eval_count(&harness.model().events()), 9);
    assert_eq!(harness.phase(), Phase::Finished);
}

#[test]
fn test_completion_before_budget_stops_early() {
    let mut harness = reset_harness(StubModel::new().finishing_after(5));
    let summary = harness.run(1_000).unwrap();
    assert_eq!(summary.half_cycles, 3);
    assert_eq!(summary.cycles(), 1);
    assert_eq!(summary.stop_reason, StopReason::ModelFinished);
}

#[test]
fn test_completion_during_reset_skips_evaluations() {
    let mut harness = reset_harness(StubModel::new().finishing_after(1));
    assert!(harness.completion().is_finished());
    assert_eq!(harness.evaluations(), 1);

    let summary = harness.run(10).unwrap();
    assert_eq!(summary.half_cycles, 0);
    assert_eq!(summary.stop_reason, StopReason::ModelFinished);

    let events = harness.model().events();
    assert_eq!(eval_count(&events), 1);
    assert_eq!(finalize_count(&events), 1);
}

#[test]
fn test_no_evaluate_after_completion_with_mock() {
    let mut model = MockModel::new();
    model.expect_set_input().return_const(());
    let mut calls = 0;
    model.expect_evaluate().times(4).returning(move || {
        calls += 1;
        CompletionState::from_flag(calls >= 4)
    });
    model.expect_finalize().times(1).return_const(());

    let mut harness = Harness::new(model);
    harness.reset().unwrap();
    let summary = harness.run(0).unwrap();
    assert_eq!(summary.half_cycles, 2);
}

#[test]
fn test_run_before_reset_is_rejected() {
    let mut harness = Harness::new(StubModel::new());
    let err = harness.run(1).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::InvalidTransition {
            from: Phase::Constructed,
            to: Phase::Running
        }
    ));
    assert_eq!(eval_count(&harness.model().events()), 0);
}

#[test]
fn test_double_reset_is_rejected() {
    let mut harness = reset_harness(StubModel::new());
    assert!(harness.reset().is_err());
    assert_eq!(eval_count(&harness.model().events()), 2);
}

#[test]
fn test_finalize_twice_is_rejected() {
    let mut harness = reset_harness(StubModel::new());
    let _ = harness.run(1).unwrap();
    assert!(harness.finalize().is_err());
    assert_eq!(finalize_count(&harness.model().events()), 1);
}

#[test]
fn test_drop_finalizes_unfinished_harness() {
    let model = StubModel::new();
    let log = model.log_handle();
    {
        let _harness = reset_harness(model);
    }
    assert_eq!(finalize_count(&log.borrow()), 1);
}

#[test]
fn test_drop_after_run_does_not_finalize_again() {
    let model = StubModel::new();
    let log = model.log_handle();
    {
        let mut harness = reset_harness(model);
        let _ = harness.run(3).unwrap();
    }
    assert_eq!(finalize_count(&log.borrow()), 1);
}

#[test]
fn test_progress_logging_does_not_change_the_run() {
    let mut harness = reset_harness(StubModel::new()).with_progress_interval(2);
    let summary = harness.run(9).unwrap();
    assert_eq!(summary.half_cycles, 18);
}

proptest! {
    #[test]
    fn prop_loop_respects_budget_and_completion(
        budget in 0u64..64,
        finish in proptest::option::of(1u64..160),
    ) {
        // An unbounded run needs a finishing model to terminate.
        let finish = if budget == 0 { Some(finish.unwrap_or(40)) } else { finish };
        let mut model = StubModel::new();
        if let Some(n) = finish {
            model = model.finishing_after(n);
        }
        let mut harness = reset_harness(model);
        let summary = harness.run(budget).unwrap();

        let reset_evals = finish.map_or(2, |n| n.min(2));
        let limit = if budget == 0 { u64::MAX } else { 2 * budget };
        let expected = finish.map_or(limit, |n| n.saturating_sub(2).min(limit));
        prop_assert_eq!(summary.half_cycles, expected);

        let events = harness.model().events();
        let clocks = eval_clocks(&events);
        let reset_evals = usize::try_from(reset_evals).unwrap();
        for (i, clk) in clocks[reset_evals..].iter().enumerate() {
            prop_assert_eq!(*clk, i % 2 == 0);
        }
        prop_assert_eq!(finalize_count(&events), 1);
    }
}
