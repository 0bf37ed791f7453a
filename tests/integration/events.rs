//! Lifecycle event integration tests.

use petit_pool::testing::{RecordingHandler, panicker, sleepy, sum};
use petit_pool::{Event, EventBus, JobError, Scheduler};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn run_emits_lifecycle_events_in_order() {
    let recorder = RecordingHandler::new();
    let bus = Arc::new(EventBus::new());
    bus.register(recorder.clone()).await;

    let timeout = Duration::from_millis(100);
    let mut scheduler = Scheduler::new(2, timeout).with_event_bus(Arc::clone(&bus));
    scheduler.add(sum, [1, 2, 3]);
    scheduler.add_thunk(panicker("Something bad happened"));
    scheduler.add_thunk(sleepy(Duration::from_millis(500), 1i64));

    scheduler.run().await;

    let events = recorder.events().await;
    let run_id = events[0].run_id();
    assert!(events.iter().all(|e| e.run_id() == run_id));

    match events.first() {
        Some(Event::RunStarted {
            job_count, workers, ..
        }) => {
            assert_eq!(*job_count, 3);
            assert_eq!(*workers, 2);
        }
        other => panic!("Expected RunStarted first, got {:?}", other),
    }
    match events.last() {
        Some(Event::RunCompleted {
            job_count, failed, ..
        }) => {
            assert_eq!(*job_count, 3);
            assert_eq!(*failed, 2);
        }
        other => panic!("Expected RunCompleted last, got {:?}", other),
    }

    assert_eq!(recorder.jobs_started().await, 3);
    assert_eq!(
        recorder.failures().await,
        vec![
            (1, JobError::Panicked("Something bad happened".to_string())),
            (2, JobError::Timeout(timeout)),
        ]
    );
    assert!(recorder.workers_used().await.iter().all(|w| *w < 2));
}

#[tokio::test]
async fn each_run_gets_its_own_run_id() {
    let recorder = RecordingHandler::new();
    let bus = Arc::new(EventBus::new());
    bus.register(recorder.clone()).await;

    let mut scheduler = Scheduler::new(1, Duration::from_secs(1)).with_event_bus(bus);
    scheduler.add(sum, [1]);
    scheduler.run().await;
    scheduler.add(sum, [2]);
    scheduler.run().await;

    let mut run_ids: Vec<_> = recorder
        .events()
        .await
        .iter()
        .filter_map(|e| match e {
            Event::RunStarted { run_id, .. } => Some(*run_id),
            _ => None,
        })
        .collect();
    assert_eq!(run_ids.len(), 2);
    run_ids.dedup();
    assert_eq!(run_ids.len(), 2);
}
