//! Pie chart segments derived from category totals. Drawing is left to the presenter.

use serde::Serialize;

use crate::core::query::CategoryTotals;
use crate::ledger::Category;

pub const PALETTE: [&str; 10] = [
    "#48bb78", "#e53e3e", "#2b6cb0", "#f6e05e", "#9f7aea", "#ed8936", "#4fd1c5", "#ed64a6",
    "#a0aec0", "#68d391",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSegment {
    pub category: Category,
    pub label: String,
    pub amount: f64,
    pub color: &'static str,
    /// Fraction of the chart total, in `0.0..=1.0`.
    pub share: f64,
}

/// One segment per category in first-seen order. Empty totals mean "no data".
pub fn segments(totals: &CategoryTotals) -> Vec<ChartSegment> {
    let sum = totals.sum();
    totals
        .iter()
        .enumerate()
        .map(|(index, (category, amount))| ChartSegment {
            category,
            label: category.display_label(),
            amount,
            color: PALETTE[index % PALETTE.len()],
            share: if sum > 0.0 { amount / sum } else { 0.0 },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Expense;
    use chrono::{NaiveDate, Utc};

    fn expense(amount: f64, category: Category) -> Expense {
        Expense {
            id: 1,
            amount,
            description: "x".into(),
            category,
            date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn segments_follow_totals_order_and_palette() {
        let expenses = vec![
            expense(30.0, Category::Transport),
            expense(10.0, Category::Food),
        ];
        let totals = CategoryTotals::from_expenses(&expenses);
        let chart = segments(&totals);

        assert_eq!(chart.len(), 2);
        assert_eq!(chart[0].category, Category::Transport);
        assert_eq!(chart[0].color, "#48bb78");
        assert_eq!(chart[1].color, "#e53e3e");
        assert_eq!(chart[0].share, 0.75);
    }

    #[test]
    fn no_totals_means_no_segments() {
        assert!(segments(&CategoryTotals::default()).is_empty());
    }
}
