//! End-to-end rotation scenarios.
//!
//! Drives the controller through multi-cycle sequences with scripted
//! probes and a recording reallocator, checking the hysteresis
//! behavior, state monotonicity, and submission-failure handling.

use alloy::primitives::Address;
use std::sync::Arc;
use std::time::Duration;

use rotor::config::PoolConfig;
use rotor::engine::{Controller, ControllerSettings};
use rotor::registry::PoolRegistry;
use rotor::types::Decision;

use crate::mock::{RecordingReallocator, ScriptedProbe};

fn pool_a() -> Address {
    Address::repeat_byte(0x0a)
}

fn pool_b() -> Address {
    Address::repeat_byte(0x0b)
}

fn registry() -> Arc<PoolRegistry> {
    Arc::new(
        PoolRegistry::from_config(&[
            PoolConfig {
                address: pool_a(),
                reward_asset: Address::repeat_byte(0x1a),
                symbol: "CAKE".into(),
            },
            PoolConfig {
                address: pool_b(),
                reward_asset: Address::repeat_byte(0x1b),
                symbol: "TWT".into(),
            },
        ])
        .unwrap(),
    )
}

fn settings() -> ControllerSettings {
    ControllerSettings {
        stagger: Duration::from_secs(1),
        probe_timeout: Duration::from_secs(30),
        hysteresis_margin: 0.05,
        initial_apy: 0.0,
        min_observations: 1,
    }
}

#[tokio::test(start_paused = true)]
async fn three_cycle_rotation_scenario() {
    // Cycle 1: fresh state, APYs 3.2 / 5.0 -> reallocate to TWT at 5.0.
    // Cycle 2: 3.0 / 5.04, delta 0.04 < margin -> hold.
    // Cycle 3: 2.0 / 5.06, delta 0.06 >= margin -> reallocate again,
    //          even though the winner is the pool already held.
    let probe = Arc::new(ScriptedProbe::new([
        (pool_a(), vec![3.2, 3.0, 2.0]),
        (pool_b(), vec![5.0, 5.04, 5.06]),
    ]));
    let reallocator = Arc::new(RecordingReallocator::new());
    let mut controller = Controller::new(
        registry(),
        probe,
        Arc::clone(&reallocator) as Arc<dyn rotor::engine::executor::Reallocator>,
        settings(),
    );

    let report = controller.run_cycle().await.unwrap();
    assert_eq!(report.observed, 2);
    assert!(matches!(
        report.decision,
        Some(Decision::Reallocate { apy, .. }) if apy == 5.0
    ));
    assert_eq!(controller.state().current_pool, Some(pool_b()));
    assert_eq!(controller.state().current_apy, 5.0);

    let report = controller.run_cycle().await.unwrap();
    assert!(matches!(report.decision, Some(Decision::Hold { .. })));
    assert!(report.tx_hash.is_none());
    assert_eq!(controller.state().current_apy, 5.0);

    let report = controller.run_cycle().await.unwrap();
    assert!(matches!(
        report.decision,
        Some(Decision::Reallocate { apy, .. }) if apy == 5.06
    ));
    assert_eq!(controller.state().current_pool, Some(pool_b()));
    assert_eq!(controller.state().current_apy, 5.06);

    // Two submissions total, both for the TWT pool.
    assert_eq!(
        reallocator.submitted(),
        vec!["TWT".to_string(), "TWT".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn current_apy_never_decreases() {
    let probe = Arc::new(ScriptedProbe::new([
        (pool_a(), vec![4.0, 1.0, 6.0, 2.0]),
        (pool_b(), vec![2.0, 3.5, 1.5, 5.9]),
    ]));
    let reallocator = Arc::new(RecordingReallocator::new());
    let mut controller = Controller::new(
        registry(),
        probe,
        reallocator,
        settings(),
    );

    let mut last = controller.state().current_apy;
    for _ in 0..4 {
        controller.run_cycle().await.unwrap();
        let apy = controller.state().current_apy;
        assert!(apy >= last, "current_apy regressed: {apy} < {last}");
        last = apy;
    }
    // Winners were 4.0, 3.5, 6.0, 5.9: only 4.0 and 6.0 clear the margin.
    assert_eq!(controller.state().current_apy, 6.0);
    assert_eq!(controller.state().current_pool, Some(pool_a()));
}

#[tokio::test(start_paused = true)]
async fn failed_submission_retries_next_cycle() {
    let probe = Arc::new(ScriptedProbe::new([
        (pool_a(), vec![3.2, 3.2]),
        (pool_b(), vec![5.0, 5.0]),
    ]));
    let reallocator = Arc::new(RecordingReallocator::new());
    let mut controller = Controller::new(
        registry(),
        probe,
        Arc::clone(&reallocator) as Arc<dyn rotor::engine::executor::Reallocator>,
        settings(),
    );

    // Submission fails: the cycle errors and state stays untouched, so
    // the next cycle's identical winner still clears the gate.
    reallocator.set_error("insufficient gas");
    assert!(controller.run_cycle().await.is_err());
    assert!(controller.state().current_pool.is_none());
    assert_eq!(controller.state().current_apy, 0.0);

    reallocator.clear_error();
    let report = controller.run_cycle().await.unwrap();
    assert!(report.tx_hash.is_some());
    assert_eq!(controller.state().current_pool, Some(pool_b()));
    assert_eq!(reallocator.submitted(), vec!["TWT".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn exhausted_script_counts_as_probe_failure() {
    // Pool B has readings for one cycle only; the second cycle decides
    // on pool A alone.
    let probe = Arc::new(ScriptedProbe::new([
        (pool_a(), vec![3.0, 10.0]),
        (pool_b(), vec![5.0]),
    ]));
    let reallocator = Arc::new(RecordingReallocator::new());
    let mut controller = Controller::new(
        registry(),
        probe,
        reallocator,
        settings(),
    );

    controller.run_cycle().await.unwrap();
    assert_eq!(controller.state().current_pool, Some(pool_b()));

    let report = controller.run_cycle().await.unwrap();
    assert_eq!(report.observed, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(controller.state().current_pool, Some(pool_a()));
    assert_eq!(controller.state().current_apy, 10.0);
}
