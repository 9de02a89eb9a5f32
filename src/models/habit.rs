use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::calendar::DateRange;

/// Accent color applied when a habit is created without one.
pub const DEFAULT_COLOR: &str = "#007AFF";

/// A binary daily-completable activity.
///
/// `completions` holds canonical day keys; `NaiveDate` serializes as
/// `yyyy-MM-dd`, so the snapshot and API shapes carry plain date strings.
/// Set semantics guarantee no two keys for the same calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub completions: BTreeSet<NaiveDate>,
    /// Fixed at creation; used only for stable oldest-first display order.
    pub created_at: DateTime<Utc>,
}

impl Habit {
    pub fn new(name: String, color: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            color: color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            completions: BTreeSet::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_completed_on(&self, day: NaiveDate) -> bool {
        self.completions.contains(&day)
    }

    /// Flips membership of `day` and returns the updated habit.
    ///
    /// Pure: the receiver is untouched, so callers that apply the result
    /// optimistically can revert by swapping the prior value back in.
    #[must_use]
    pub fn toggled(&self, day: NaiveDate) -> Self {
        let mut next = self.clone();
        if !next.completions.remove(&day) {
            next.completions.insert(day);
        }
        next
    }

    /// Counts completed days in `[range.start, range.end)`.
    ///
    /// Walks the range day by day rather than the completion set, so sparse
    /// sets and zero-overlap ranges resolve the same way.
    pub fn count_in_range(&self, range: DateRange) -> usize {
        range.days().filter(|d| self.is_completed_on(*d)).count()
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateHabitRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    /// Hex color code (e.g., "#34C759"). Default: "#007AFF"
    pub color: Option<String>,
}

/// Habit plus its completion status for the current day, for list views.
#[derive(Debug, Serialize)]
pub struct HabitWithToday {
    #[serde(flatten)]
    pub habit: Habit,
    pub completed_today: bool,
}
