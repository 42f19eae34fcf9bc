//! Optimistic meal list for one user

use std::sync::{Arc, Mutex};
use tracing::info;

use super::{MacroTotals, MealEntry};
use crate::optimistic::{apply_optimistic, OptimisticUpdate};
use crate::storage::{MealStorage, StorageResult};
use crate::sync::lock;
use crate::types::{MealId, UserId};

/// A user's meals, kept in memory and mirrored to storage
pub struct MealLog {
    user_id: UserId,
    meals: Mutex<Vec<MealEntry>>,
    storage: Arc<dyn MealStorage>,
}

impl MealLog {
    /// Load the user's meals from storage
    pub async fn load(user_id: UserId, storage: Arc<dyn MealStorage>) -> StorageResult<Self> {
        let meals = storage.list_meals(&user_id).await?;
        Ok(Self {
            user_id,
            meals: Mutex::new(meals),
            storage,
        })
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Current meals, oldest first
    pub fn meals(&self) -> Vec<MealEntry> {
        lock(&self.meals).clone()
    }

    /// Totals across every loaded meal
    pub fn totals(&self) -> MacroTotals {
        MacroTotals::from_meals(lock(&self.meals).iter())
    }

    /// Show the meal immediately, then persist it; removed again if the
    /// write fails.
    pub async fn add_meal(&self, meal: MealEntry) -> StorageResult<()> {
        let id = meal.id.clone();
        let inserted = meal.clone();
        let update = OptimisticUpdate::new(
            "add_meal",
            move |meals: &mut Vec<MealEntry>| meals.push(inserted),
            move |meals: &mut Vec<MealEntry>| meals.retain(|m| m.id != id),
        );

        apply_optimistic(&self.meals, update, self.storage.insert_meal(&meal)).await?;
        info!("Logged meal {} ({} kcal)", meal.name, meal.calories);
        Ok(())
    }

    /// Hide the meal immediately, then delete it; restored at its original
    /// position if the delete fails. Unknown ids are a no-op.
    pub async fn remove_meal(&self, id: &MealId) -> StorageResult<()> {
        let Some((index, removed)) = lock(&self.meals)
            .iter()
            .enumerate()
            .find(|(_, m)| &m.id == id)
            .map(|(i, m)| (i, m.clone()))
        else {
            return Ok(());
        };

        let target = id.clone();
        let update = OptimisticUpdate::new(
            "remove_meal",
            move |meals: &mut Vec<MealEntry>| meals.retain(|m| m.id != target),
            move |meals: &mut Vec<MealEntry>| {
                let at = index.min(meals.len());
                meals.insert(at, removed);
            },
        );

        apply_optimistic(&self.meals, update, self.storage.delete_meal(id)).await
    }
}
