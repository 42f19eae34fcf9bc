//! Meal logging and macro totals

mod meal_log;

pub use meal_log::MealLog;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{MealId, UserId};

/// One logged meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealEntry {
    pub id: MealId,
    pub user_id: UserId,
    pub name: String,
    pub logged_at: DateTime<Utc>,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl MealEntry {
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            id: MealId::new(),
            user_id,
            name: name.into(),
            logged_at: Utc::now(),
            calories: 0.0,
            protein_g: 0.0,
            carbs_g: 0.0,
            fat_g: 0.0,
        }
    }

    pub fn with_macros(mut self, calories: f64, protein_g: f64, carbs_g: f64, fat_g: f64) -> Self {
        self.calories = calories;
        self.protein_g = protein_g;
        self.carbs_g = carbs_g;
        self.fat_g = fat_g;
        self
    }

    pub fn logged_at(mut self, at: DateTime<Utc>) -> Self {
        self.logged_at = at;
        self
    }
}

/// Summed calories and macronutrients
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl MacroTotals {
    /// Sum over all meals
    pub fn from_meals<'a>(meals: impl IntoIterator<Item = &'a MealEntry>) -> Self {
        meals.into_iter().fold(Self::default(), |acc, m| Self {
            calories: acc.calories + m.calories,
            protein_g: acc.protein_g + m.protein_g,
            carbs_g: acc.carbs_g + m.carbs_g,
            fat_g: acc.fat_g + m.fat_g,
        })
    }

    /// Sum over the meals logged on one UTC calendar day
    pub fn for_day<'a>(meals: impl IntoIterator<Item = &'a MealEntry>, day: NaiveDate) -> Self {
        Self::from_meals(
            meals
                .into_iter()
                .filter(|m| m.logged_at.date_naive() == day),
        )
    }
}
