use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which habits contribute to the aggregate pie view.
///
/// `All` is re-evaluated dynamically: adding or removing habits changes
/// what it covers without touching stored state. `Specific` is kept
/// normalized by the mutation helpers below — it is never empty, and never
/// silently equivalent to `All`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HabitSelection {
    All,
    Specific { ids: HashSet<Uuid> },
}

impl HabitSelection {
    pub fn is_selected(&self, habit_id: Uuid) -> bool {
        match self {
            HabitSelection::All => true,
            HabitSelection::Specific { ids } => ids.contains(&habit_id),
        }
    }

    /// Flips one habit's membership, given the full current id set.
    ///
    /// Starting from `All`, toggling a habit off means "everything except
    /// that one". A `Specific` set that empties reverts to `All`, and one
    /// that grows to cover every habit collapses to `All` — toggling each
    /// habit on individually converges, it never leaves an equivalent
    /// explicit set behind.
    #[must_use]
    pub fn toggled(&self, habit_id: Uuid, all_ids: &HashSet<Uuid>) -> Self {
        match self {
            HabitSelection::All => {
                let mut ids = all_ids.clone();
                ids.remove(&habit_id);
                Self::normalized(ids, all_ids)
            }
            HabitSelection::Specific { ids } => {
                let mut ids = ids.clone();
                if !ids.remove(&habit_id) {
                    ids.insert(habit_id);
                }
                Self::normalized(ids, all_ids)
            }
        }
    }

    /// Narrows the selection to a single habit.
    #[must_use]
    pub fn only(habit_id: Uuid) -> Self {
        HabitSelection::Specific {
            ids: HashSet::from([habit_id]),
        }
    }

    /// Builds a normalized selection from an explicit id set: empty or
    /// full-coverage sets become `All`.
    #[must_use]
    pub fn specific(ids: HashSet<Uuid>, all_ids: &HashSet<Uuid>) -> Self {
        Self::normalized(ids, all_ids)
    }

    /// Drops a deleted habit's id and re-normalizes.
    #[must_use]
    pub fn without(&self, habit_id: Uuid, remaining_ids: &HashSet<Uuid>) -> Self {
        match self {
            HabitSelection::All => HabitSelection::All,
            HabitSelection::Specific { ids } => {
                let mut ids = ids.clone();
                ids.remove(&habit_id);
                Self::normalized(ids, remaining_ids)
            }
        }
    }

    fn normalized(ids: HashSet<Uuid>, all_ids: &HashSet<Uuid>) -> Self {
        if ids.is_empty() || ids == *all_ids {
            HabitSelection::All
        } else {
            HabitSelection::Specific { ids }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_all_selects_everything() {
        assert!(HabitSelection::All.is_selected(Uuid::new_v4()));
    }

    #[test]
    fn test_toggle_off_from_all_excludes_one() {
        let habit_ids = ids(3);
        let all: HashSet<Uuid> = habit_ids.iter().copied().collect();

        let sel = HabitSelection::All.toggled(habit_ids[0], &all);
        assert!(!sel.is_selected(habit_ids[0]));
        assert!(sel.is_selected(habit_ids[1]));
        assert!(sel.is_selected(habit_ids[2]));
    }

    #[test]
    fn test_removing_last_id_reverts_to_all() {
        let habit_ids = ids(2);
        let all: HashSet<Uuid> = habit_ids.iter().copied().collect();

        let sel = HabitSelection::only(habit_ids[0]).toggled(habit_ids[0], &all);
        assert_eq!(sel, HabitSelection::All);
    }

    #[test]
    fn test_full_coverage_collapses_to_all() {
        let habit_ids = ids(3);
        let all: HashSet<Uuid> = habit_ids.iter().copied().collect();

        let mut sel = HabitSelection::only(habit_ids[0]);
        sel = sel.toggled(habit_ids[1], &all);
        sel = sel.toggled(habit_ids[2], &all);
        assert_eq!(sel, HabitSelection::All);
    }

    #[test]
    fn test_toggle_from_all_with_single_habit_round_trips() {
        let habit_ids = ids(1);
        let all: HashSet<Uuid> = habit_ids.iter().copied().collect();

        // Excluding the only habit leaves an empty set, which is All again
        let sel = HabitSelection::All.toggled(habit_ids[0], &all);
        assert_eq!(sel, HabitSelection::All);
    }

    #[test]
    fn test_without_prunes_deleted_habit() {
        let habit_ids = ids(3);
        let remaining: HashSet<Uuid> = habit_ids[1..].iter().copied().collect();

        let sel = HabitSelection::Specific {
            ids: HashSet::from([habit_ids[0], habit_ids[1]]),
        };
        let pruned = sel.without(habit_ids[0], &remaining);
        assert_eq!(pruned, HabitSelection::only(habit_ids[1]));
    }

    #[test]
    fn test_without_last_member_reverts_to_all() {
        let habit_ids = ids(2);
        let remaining: HashSet<Uuid> = [habit_ids[1]].into_iter().collect();

        let sel = HabitSelection::only(habit_ids[0]);
        assert_eq!(sel.without(habit_ids[0], &remaining), HabitSelection::All);
    }

    #[test]
    fn test_specific_covering_every_id_is_all() {
        let habit_ids = ids(2);
        let all: HashSet<Uuid> = habit_ids.iter().copied().collect();
        assert_eq!(
            HabitSelection::specific(all.clone(), &all),
            HabitSelection::All
        );
    }

    #[test]
    fn test_serde_tagged_shape() {
        let json = serde_json::to_value(HabitSelection::All).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "all" }));
    }
}
