//! Registration and result ordering tests.

use petit_pool::testing::{multiply, sleepy, sum};
use petit_pool::{JobResult, Scheduler};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::common::init_tracing;

#[tokio::test]
async fn add_does_not_execute_work() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut scheduler: Scheduler = Scheduler::new(0, Duration::from_millis(1000));

    let counter = Arc::clone(&calls);
    scheduler.add(
        move |_: &[i64]| {
            counter.fetch_add(1, Ordering::SeqCst);
            0
        },
        [1, 2],
    );

    assert_eq!(calls.load(Ordering::SeqCst), 0, "scheduler is not lazy");
    assert_eq!(scheduler.pending(), 1);

    scheduler.run().await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn results_come_back_in_scheduled_order() {
    init_tracing();
    let mut scheduler = Scheduler::new(0, Duration::from_millis(1000));

    scheduler.add(sum, [1, 2, 3]);
    scheduler.add(multiply, [3, 4, 5]);

    let actual = scheduler.run().await;
    let expected = vec![JobResult::ok(6), JobResult::ok(60)];

    assert_eq!(actual, expected);
}

#[tokio::test]
async fn order_is_independent_of_worker_count() {
    for workers in [1, 2, 3, 16] {
        let mut scheduler = Scheduler::new(workers, Duration::from_secs(2));
        for i in 0..12i64 {
            // Later jobs finish first.
            let delay = Duration::from_millis(((12 - i) * 3) as u64);
            scheduler.add_thunk(sleepy(delay, i * i));
        }

        let values: Vec<i64> = scheduler.run().await.into_iter().map(|r| r.value).collect();

        assert_eq!(
            values,
            (0..12).map(|i| i * i).collect::<Vec<_>>(),
            "wrong order with {} workers",
            workers
        );
    }
}

#[tokio::test]
async fn thunks_can_return_any_value_type() {
    let mut scheduler: Scheduler<String> = Scheduler::new(0, Duration::from_secs(1));
    scheduler.add_thunk(|| format!("{}", sum(&[1, 2, 3])));
    scheduler.add(|args: &[i64]| multiply(args).to_string(), [3, 4, 5]);

    assert_eq!(
        scheduler.run().await,
        vec![JobResult::ok("6".to_string()), JobResult::ok("60".to_string())]
    );

    let mut scheduler: Scheduler<Vec<i64>> = Scheduler::new(2, Duration::from_secs(1));
    scheduler.add(|args: &[i64]| args.iter().rev().copied().collect(), vec![1, 2, 3]);
    scheduler.add_thunk(Vec::new);

    assert_eq!(
        scheduler.run().await,
        vec![JobResult::ok(vec![3, 2, 1]), JobResult::ok(vec![])]
    );
}

#[tokio::test]
async fn every_job_runs_exactly_once() {
    let runs = Arc::new(AtomicUsize::new(0));
    let mut scheduler = Scheduler::new(4, Duration::from_secs(1));

    for i in 0..100i64 {
        let runs = Arc::clone(&runs);
        scheduler.add(
            move |args: &[i64]| {
                runs.fetch_add(1, Ordering::SeqCst);
                args[0]
            },
            [i],
        );
    }

    let results = scheduler.run().await;

    assert_eq!(results.len(), 100);
    assert_eq!(runs.load(Ordering::SeqCst), 100);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.value, i as i64);
        assert!(result.is_ok());
    }
}
