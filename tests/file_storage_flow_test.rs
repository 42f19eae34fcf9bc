//! End-to-end sessions against the JSON file backend

mod common;

use common::{file_manager, LEG_DAY};
use ironlog::cli::{run_replay, ReplayScript};
use ironlog::nutrition::{MacroTotals, MealEntry, MealLog};
use ironlog::storage::{StorageConfig, StorageFactory};
use ironlog::types::{CatalogExerciseId, UserId};
use tempfile::TempDir;

#[tokio::test]
async fn test_history_survives_reopening_the_store() {
    let temp = TempDir::new().unwrap();
    let script = ReplayScript::from_yaml(LEG_DAY).unwrap();

    {
        let (_storage, manager) = file_manager(&temp).await;
        let outcome = run_replay(&manager, &script).await.unwrap();
        assert_eq!(outcome.report.total_volume, 1000.0);
        // Lunges were skipped, so only the squat is persisted
        assert_eq!(outcome.report.exercises.len(), 1);
    }

    let (storage, manager) = file_manager(&temp).await;
    let alice = UserId::from_string("alice");
    let history = storage.workouts().list_workouts(&alice).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].record.duration_seconds, 3000);
    assert_eq!(history[0].set_count, 2);

    let previous = storage
        .workouts()
        .previous_performance(&CatalogExerciseId::from_string("back-squat"), &alice)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(previous.sets.len(), 2);
    assert_eq!(previous.sets[0].weight, Some(100.0));

    // A heavier second session beats the stored history
    let heavier = LEG_DAY.replace("weight: 100", "weight: 105");
    let outcome = run_replay(&manager, &ReplayScript::from_yaml(&heavier).unwrap())
        .await
        .unwrap();
    assert_eq!(outcome.personal_records.len(), 2);
    assert!(outcome
        .personal_records
        .iter()
        .all(|(name, pr)| name == "Back Squat" && pr.previous_estimate > 0.0));
}

#[tokio::test]
async fn test_meal_log_round_trip_through_files() {
    let temp = TempDir::new().unwrap();
    let config = StorageConfig::file(temp.path());
    let user = UserId::new();

    {
        let storage = StorageFactory::from_config(&config).await.unwrap();
        let log = MealLog::load(user.clone(), storage.meals()).await.unwrap();
        log.add_meal(MealEntry::new(user.clone(), "Oats").with_macros(350.0, 12.0, 60.0, 6.0))
            .await
            .unwrap();
        log.add_meal(MealEntry::new(user.clone(), "Chicken").with_macros(300.0, 55.0, 0.0, 7.0))
            .await
            .unwrap();
    }

    let storage = StorageFactory::from_config(&config).await.unwrap();
    let log = MealLog::load(user, storage.meals()).await.unwrap();
    let totals = log.totals();
    assert_eq!(
        totals,
        MacroTotals {
            calories: 650.0,
            protein_g: 67.0,
            carbs_g: 60.0,
            fat_g: 13.0,
        }
    );
}
