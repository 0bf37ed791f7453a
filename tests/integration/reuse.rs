//! Multi-run reuse tests.

use petit_pool::testing::{multiply, sum};
use petit_pool::{JobResult, Scheduler};
use std::time::Duration;

#[tokio::test]
async fn manages_multiple_runs() {
    let mut scheduler = Scheduler::new(2, Duration::from_millis(1000));

    scheduler.add(sum, [1, 2, 3]);
    scheduler.add(multiply, [3, 4, 5]);
    scheduler.add(sum, [2, 3, 4]);

    let actual1 = scheduler.run().await;
    let expected1 = vec![JobResult::ok(6), JobResult::ok(60), JobResult::ok(9)];
    assert_eq!(actual1, expected1, "first run");

    scheduler.add(multiply, [3, 4, 5, 6]);
    scheduler.add(sum, [1, 2, 5]);
    scheduler.add(multiply, [3, 4, 6]);

    let actual2 = scheduler.run().await;
    let expected2 = vec![JobResult::ok(360), JobResult::ok(8), JobResult::ok(72)];
    assert_eq!(actual2, expected2, "second run");
}

#[tokio::test]
async fn batches_of_different_sizes_stay_independent() {
    let mut scheduler = Scheduler::new(3, Duration::from_secs(1));

    for size in [5usize, 0, 1, 7] {
        for i in 0..size as i64 {
            scheduler.add(sum, [i, 100]);
        }
        assert_eq!(scheduler.pending(), size);

        let results = scheduler.run().await;

        assert_eq!(results.len(), size);
        assert_eq!(scheduler.pending(), 0);
        for (i, result) in results.into_iter().enumerate() {
            assert_eq!(result, JobResult::ok(i as i64 + 100));
        }
    }
}
