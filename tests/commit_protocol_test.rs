//! Integration tests for the finish protocol against the mock store

mod common;

use common::mock_manager;
use ironlog::session::{ExerciseCommitStatus, SetPatch};
use ironlog::storage::WorkoutStorage;
use ironlog::testing::fixtures::{catalog, template, template_exercise};
use ironlog::testing::StorageCall;
use ironlog::types::UserId;
use ironlog::WorkoutError;

#[tokio::test]
async fn test_partial_failure_keeps_the_workout() {
    let (storage, manager) = mock_manager();
    let user = UserId::new();
    let plan = template(
        "Upper",
        user.clone(),
        vec![
            template_exercise(catalog("Bench Press"), &[(80.0, 8), (80.0, 8)]),
            template_exercise(catalog("Pull Up"), &[(0.0, 10)]),
            template_exercise(catalog("Lateral Raise"), &[(10.0, 15)]),
        ],
    );

    manager.start_from_template(&plan, user.clone()).await.unwrap();
    let session = manager.session().unwrap();
    for exercise in &session.exercises {
        for set in &exercise.sets {
            manager.complete_set(&exercise.id, &set.id);
        }
    }
    storage.fail_exercise(&session.exercises[1].id);

    let report = manager.finish().await.unwrap();

    assert_eq!(report.persisted_count(), 2);
    assert_eq!(report.failed_count(), 1);
    assert!(matches!(
        report.exercises[1].status,
        ExerciseCommitStatus::HeaderFailed { .. }
    ));
    // Bodyweight pull-ups add nothing to volume
    assert_eq!(report.total_volume, 80.0 * 8.0 * 2.0 + 10.0 * 15.0);

    let rows = storage
        .load_workout_exercises(&report.workout_id)
        .await
        .unwrap();
    let names: Vec<&str> = rows.iter().map(|(e, _)| e.exercise_name.as_str()).collect();
    assert_eq!(names, vec!["Bench Press", "Lateral Raise"]);
}

#[tokio::test]
async fn test_failed_header_then_retry_writes_once() {
    let (storage, manager) = mock_manager();
    manager.start_empty("Retry me", UserId::new()).unwrap();
    let exercise_id = manager.add_exercise(catalog("Deadlift"), None).unwrap();
    let set_id = manager.session().unwrap().exercises[0].sets[0].id.clone();
    manager.update_set(&exercise_id, &set_id, SetPatch::default().weight(180.0).reps(3));
    manager.complete_set(&exercise_id, &set_id);

    storage.fail_header(true);
    for _ in 0..3 {
        let err = manager.finish().await.unwrap_err();
        assert!(matches!(err, WorkoutError::HeaderWrite(_)));
        assert!(manager.is_live());
    }

    storage.fail_header(false);
    manager.finish().await.unwrap();

    let writes = storage
        .calls()
        .into_iter()
        .filter(|c| matches!(c, StorageCall::InsertExercise(_)))
        .count();
    assert_eq!(storage.header_attempts(), 4);
    assert_eq!(writes, 1);
    assert_eq!(storage.backend().workout_count().await, 1);
}

#[tokio::test]
async fn test_discarded_session_writes_nothing() {
    let (storage, manager) = mock_manager();
    manager.start_empty("Abandoned", UserId::new()).unwrap();
    let exercise_id = manager.add_exercise(catalog("Squat"), None).unwrap();
    let set_id = manager.session().unwrap().exercises[0].sets[0].id.clone();
    manager.complete_set(&exercise_id, &set_id);

    manager.discard().unwrap();

    assert!(storage.calls().is_empty());
    assert!(matches!(
        manager.finish().await,
        Err(WorkoutError::NoActiveSession)
    ));
}
