//! In-memory habit collection plus chart view state.
//!
//! All mutation methods are synchronous and total: referencing a habit that
//! no longer exists is a no-op (`None`), never a panic or corrupted state.
//! Chart outputs are rederived from current state on every call.

use std::collections::HashSet;

use chrono::{NaiveDate, Weekday};
use uuid::Uuid;

use crate::calendar::{shift_reference, TimePeriod};
use crate::models::habit::Habit;
use crate::models::selection::HabitSelection;
use crate::stats::{build_chart_data, build_pie_data, HabitChartData, PieChartData};

/// Reference-date navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigateDirection {
    Next,
    Prev,
    Reset,
}

pub struct HabitStore {
    habits: Vec<Habit>,
    selection: HabitSelection,
    period: TimePeriod,
    reference: NaiveDate,
}

impl HabitStore {
    pub fn new(today: NaiveDate) -> Self {
        Self::from_habits(Vec::new(), today)
    }

    /// Builds a store from loaded habits, restoring oldest-first order.
    pub fn from_habits(mut habits: Vec<Habit>, today: NaiveDate) -> Self {
        habits.sort_by_key(|h| h.created_at);
        Self {
            habits,
            selection: HabitSelection::All,
            period: TimePeriod::Week,
            reference: today,
        }
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn habit(&self, id: Uuid) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    pub fn selection(&self) -> &HabitSelection {
        &self.selection
    }

    pub fn period(&self) -> TimePeriod {
        self.period
    }

    pub fn reference(&self) -> NaiveDate {
        self.reference
    }

    fn all_ids(&self) -> HashSet<Uuid> {
        self.habits.iter().map(|h| h.id).collect()
    }

    // ── Habit mutations ──────────────────────────────────────────────────

    /// Adds a habit with a trimmed name. Returns `None` for a blank name;
    /// the store never holds an empty one.
    pub fn add_habit(&mut self, name: &str, color: Option<String>) -> Option<Habit> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let habit = Habit::new(name.to_string(), color);
        self.habits.push(habit.clone());
        Some(habit)
    }

    /// Removes a habit and prunes it from any `Specific` selection.
    pub fn remove_habit(&mut self, id: Uuid) -> Option<Habit> {
        let index = self.habits.iter().position(|h| h.id == id)?;
        let removed = self.habits.remove(index);
        self.selection = self.selection.without(id, &self.all_ids());
        Some(removed)
    }

    /// Flips one completion day. Returns the habit's prior value so the
    /// caller can revert if the persistence write fails.
    pub fn toggle_completion(&mut self, id: Uuid, day: NaiveDate) -> Option<Habit> {
        let habit = self.habits.iter_mut().find(|h| h.id == id)?;
        let prior = habit.clone();
        *habit = prior.toggled(day);
        Some(prior)
    }

    /// Puts a retained prior value back, keyed by id. Rollback companion to
    /// the mutation methods above.
    pub fn restore_habit(&mut self, prior: Habit) {
        if let Some(habit) = self.habits.iter_mut().find(|h| h.id == prior.id) {
            *habit = prior;
        }
    }

    /// Re-inserts a removed habit at its display position.
    pub fn reinsert_habit(&mut self, habit: Habit) {
        self.habits.push(habit);
        self.habits.sort_by_key(|h| h.created_at);
    }

    /// Restores a previously observed selection value after a failed
    /// delete. Callers only pass values taken from this store.
    pub fn restore_selection(&mut self, selection: HabitSelection) {
        self.selection = selection;
    }

    // ── Selection & view mutations ───────────────────────────────────────

    /// Flips one habit's selection membership. Returns `false` for an
    /// unknown id, leaving the selection untouched.
    pub fn toggle_selection(&mut self, id: Uuid) -> bool {
        if self.habit(id).is_none() {
            return false;
        }
        self.selection = self.selection.toggled(id, &self.all_ids());
        true
    }

    pub fn select_all(&mut self) {
        self.selection = HabitSelection::All;
    }

    /// Narrows the selection to one habit. Returns `false` for an unknown
    /// id, leaving the selection untouched.
    pub fn select_only(&mut self, id: Uuid) -> bool {
        if self.habit(id).is_none() {
            return false;
        }
        self.selection = HabitSelection::specific(HashSet::from([id]), &self.all_ids());
        true
    }

    pub fn set_period(&mut self, period: TimePeriod) {
        self.period = period;
    }

    pub fn navigate(&mut self, direction: NavigateDirection, today: NaiveDate) {
        self.reference = match direction {
            NavigateDirection::Next => shift_reference(self.reference, self.period, 1),
            NavigateDirection::Prev => shift_reference(self.reference, self.period, -1),
            NavigateDirection::Reset => today,
        };
    }

    // ── Derived queries ──────────────────────────────────────────────────

    pub fn pie_data(&self, week_start: Weekday) -> PieChartData {
        build_pie_data(
            &self.habits,
            &self.selection,
            self.period,
            self.reference,
            week_start,
        )
    }

    pub fn chart_data(&self, week_start: Weekday) -> Vec<HabitChartData> {
        self.habits
            .iter()
            .map(|h| build_chart_data(h, self.period, self.reference, week_start))
            .collect()
    }

    /// Fraction of habits completed on `today`; 0 with no habits.
    pub fn today_completion_rate(&self, today: NaiveDate) -> f64 {
        if self.habits.is_empty() {
            return 0.0;
        }
        let completed = self
            .habits
            .iter()
            .filter(|h| h.is_completed_on(today))
            .count();
        completed as f64 / self.habits.len() as f64
    }
}
