//! Aggregation engine.
//!
//! Pure derivations over the habit collection: identical inputs always
//! yield identical outputs, so the handlers recompute these on every query
//! instead of caching chart state anywhere.

use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use uuid::Uuid;

use crate::calendar::{resolve_range, TimePeriod};
use crate::models::habit::Habit;
use crate::models::selection::HabitSelection;

/// Per-habit bar/ring record for the given window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitChartData {
    pub habit_id: Uuid,
    pub name: String,
    pub color: String,
    pub completed_days: usize,
    pub total_days: usize,
    pub completion_rate: f64,
}

/// Cross-habit pie summary for the selected subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChartData {
    pub completed_percentage: f64,
    pub not_completed_percentage: f64,
    pub completed_days: usize,
    /// Theoretical maximum: days in window × selected habit count.
    pub total_days: usize,
    /// Contributing habit names, in collection order.
    pub selected_habits: Vec<String>,
}

impl PieChartData {
    fn empty() -> Self {
        Self {
            completed_percentage: 0.0,
            not_completed_percentage: 0.0,
            completed_days: 0,
            total_days: 0,
            selected_habits: Vec::new(),
        }
    }
}

pub fn build_chart_data(
    habit: &Habit,
    period: TimePeriod,
    reference: NaiveDate,
    week_start: Weekday,
) -> HabitChartData {
    let range = resolve_range(period, reference, week_start);
    let total_days = range.day_count().max(0) as usize;
    let completed_days = habit.count_in_range(range);
    let completion_rate = if total_days > 0 {
        completed_days as f64 / total_days as f64
    } else {
        0.0
    };

    HabitChartData {
        habit_id: habit.id,
        name: habit.name.clone(),
        color: habit.color.clone(),
        completed_days,
        total_days,
        completion_rate,
    }
}

pub fn build_pie_data(
    habits: &[Habit],
    selection: &HabitSelection,
    period: TimePeriod,
    reference: NaiveDate,
    week_start: Weekday,
) -> PieChartData {
    let selected: Vec<&Habit> = habits.iter().filter(|h| selection.is_selected(h.id)).collect();

    // Only short-circuit: no subset, no range computation at all.
    if selected.is_empty() {
        return PieChartData::empty();
    }

    let (day_count, completed) = if period == TimePeriod::Day {
        // A single day is one membership test per habit, not a range scan.
        // Equivalent to the 1-day half-open range; tested to agree.
        let completed = selected
            .iter()
            .filter(|h| h.is_completed_on(reference))
            .count();
        (1, completed)
    } else {
        let range = resolve_range(period, reference, week_start);
        let completed = selected
            .iter()
            .map(|h| h.count_in_range(range))
            .sum::<usize>();
        (range.day_count().max(0) as usize, completed)
    };

    let total_possible = day_count * selected.len();
    let rate = if total_possible > 0 {
        completed as f64 / total_possible as f64
    } else {
        0.0
    };

    PieChartData {
        completed_percentage: rate * 100.0,
        not_completed_percentage: (1.0 - rate) * 100.0,
        completed_days: completed,
        total_days: total_possible,
        selected_habits: selected.iter().map(|h| h.name.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn habit(name: &str, days: &[NaiveDate]) -> Habit {
        let mut habit = Habit::new(name.into(), None);
        habit.completions = days.iter().copied().collect();
        habit
    }

    const PERIODS: [TimePeriod; 4] = [
        TimePeriod::Day,
        TimePeriod::Week,
        TimePeriod::Month,
        TimePeriod::Year,
    ];

    // ── build_chart_data ─────────────────────────────────────────────────

    #[test]
    fn test_chart_week_scenario() {
        // Scenario: completions Mon + Wed, week of Mon 2024-01-01
        let habit = habit("Read", &[d(2024, 1, 1), d(2024, 1, 3)]);
        let chart = build_chart_data(&habit, TimePeriod::Week, d(2024, 1, 3), Weekday::Mon);

        assert_eq!(chart.completed_days, 2);
        assert_eq!(chart.total_days, 7);
        assert!((chart.completion_rate - 2.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_chart_day_completed_ignores_other_completions() {
        let habit = habit(
            "Read",
            &[d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 3), d(2024, 1, 20)],
        );
        let chart = build_chart_data(&habit, TimePeriod::Day, d(2024, 1, 2), Weekday::Mon);

        assert_eq!(chart.completed_days, 1);
        assert_eq!(chart.total_days, 1);
        assert_eq!(chart.completion_rate, 1.0);
    }

    #[test]
    fn test_chart_day_not_completed() {
        let habit = habit("Read", &[d(2024, 1, 1)]);
        let chart = build_chart_data(&habit, TimePeriod::Day, d(2024, 1, 2), Weekday::Mon);

        assert_eq!(chart.completed_days, 0);
        assert_eq!(chart.completion_rate, 0.0);
    }

    #[test]
    fn test_chart_leap_month_total() {
        let habit = habit("Read", &[d(2024, 2, 29)]);
        let chart = build_chart_data(&habit, TimePeriod::Month, d(2024, 2, 15), Weekday::Mon);

        assert_eq!(chart.total_days, 29);
        assert_eq!(chart.completed_days, 1);
    }

    // ── build_pie_data ───────────────────────────────────────────────────

    #[test]
    fn test_pie_empty_collection_all_zero_for_every_period() {
        for period in PERIODS {
            let pie = build_pie_data(&[], &HabitSelection::All, period, d(2024, 1, 3), Weekday::Mon);
            assert_eq!(pie.completed_days, 0);
            assert_eq!(pie.total_days, 0);
            assert_eq!(pie.completed_percentage, 0.0);
            assert_eq!(pie.not_completed_percentage, 0.0);
            assert!(pie.selected_habits.is_empty());
        }
    }

    #[test]
    fn test_pie_unknown_specific_ids_degrade_to_empty() {
        let habits = vec![habit("Read", &[d(2024, 1, 1)])];
        let selection = HabitSelection::Specific {
            ids: HashSet::from([Uuid::new_v4()]),
        };
        let pie = build_pie_data(&habits, &selection, TimePeriod::Week, d(2024, 1, 3), Weekday::Mon);
        assert_eq!(pie.total_days, 0);
        assert!(pie.selected_habits.is_empty());
    }

    #[test]
    fn test_pie_week_single_habit() {
        // Scenario A from the product brief
        let habits = vec![habit("Read", &[d(2024, 1, 1), d(2024, 1, 3)])];
        let pie = build_pie_data(&habits, &HabitSelection::All, TimePeriod::Week, d(2024, 1, 3), Weekday::Mon);

        assert_eq!(pie.completed_days, 2);
        assert_eq!(pie.total_days, 7);
        assert!((pie.completed_percentage - 100.0 * 2.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_pie_leap_month_two_habits() {
        // Both habits completed only on leap day
        let habits = vec![
            habit("Read", &[d(2024, 2, 29)]),
            habit("Run", &[d(2024, 2, 29)]),
        ];
        let pie = build_pie_data(&habits, &HabitSelection::All, TimePeriod::Month, d(2024, 2, 15), Weekday::Mon);

        assert_eq!(pie.total_days, 58);
        assert_eq!(pie.completed_days, 2);
        assert!((pie.completed_percentage - 100.0 * 2.0 / 58.0).abs() < 1e-9);
    }

    #[test]
    fn test_pie_percentages_sum_to_hundred() {
        let habits = vec![
            habit("Read", &[d(2024, 1, 1), d(2024, 1, 5)]),
            habit("Run", &[]),
        ];
        for period in PERIODS {
            let pie = build_pie_data(&habits, &HabitSelection::All, period, d(2024, 1, 3), Weekday::Mon);
            let sum = pie.completed_percentage + pie.not_completed_percentage;
            assert!((sum - 100.0).abs() < 1e-9, "period {period:?}: {sum}");
        }
    }

    #[test]
    fn test_pie_specific_selection_filters_and_keeps_order() {
        let read = habit("Read", &[d(2024, 1, 1)]);
        let run = habit("Run", &[d(2024, 1, 1), d(2024, 1, 2)]);
        let stretch = habit("Stretch", &[]);
        let selection = HabitSelection::Specific {
            ids: HashSet::from([stretch.id, read.id]),
        };
        let habits = vec![read, run, stretch];

        let pie = build_pie_data(&habits, &selection, TimePeriod::Week, d(2024, 1, 3), Weekday::Mon);
        assert_eq!(pie.selected_habits, vec!["Read", "Stretch"]);
        assert_eq!(pie.completed_days, 1);
        assert_eq!(pie.total_days, 14);
    }

    #[test]
    fn test_pie_day_matches_one_day_range_scan() {
        // The Day fast path must agree with the generic half-open formulation
        let habits = vec![
            habit("Read", &[d(2024, 1, 2), d(2024, 1, 9)]),
            habit("Run", &[d(2024, 1, 3)]),
        ];
        for reference in [d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 3)] {
            let pie = build_pie_data(&habits, &HabitSelection::All, TimePeriod::Day, reference, Weekday::Mon);
            let range = resolve_range(TimePeriod::Day, reference, Weekday::Mon);
            let scanned: usize = habits.iter().map(|h| h.count_in_range(range)).sum();

            assert_eq!(pie.completed_days, scanned, "reference {reference}");
            assert_eq!(pie.total_days, habits.len());
        }
    }

    #[test]
    fn test_pie_respects_week_start_convention() {
        // Completion on Sunday 2024-01-07; reference the following Wednesday.
        // Monday weeks exclude it, Sunday weeks include it.
        let habits = vec![habit("Read", &[d(2024, 1, 7)])];
        let reference = d(2024, 1, 10);

        let mon = build_pie_data(&habits, &HabitSelection::All, TimePeriod::Week, reference, Weekday::Mon);
        let sun = build_pie_data(&habits, &HabitSelection::All, TimePeriod::Week, reference, Weekday::Sun);

        assert_eq!(mon.completed_days, 0);
        assert_eq!(sun.completed_days, 1);
    }
}
