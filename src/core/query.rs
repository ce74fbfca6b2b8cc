//! Read-only derivations over the ledger: filtering, period slicing and analytics.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use crate::ledger::{AnalyticsPeriod, Category, Expense};

const NEAR_LIMIT_RATIO: f64 = 0.1;

/// Transient list filter; neither field is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub category: Option<Category>,
    pub search: String,
}

/// Totals for the currently visible list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub total: f64,
    pub count: usize,
}

/// Per-category sums in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryTotals {
    entries: Vec<(Category, f64)>,
}

impl CategoryTotals {
    pub fn from_expenses<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Self {
        let mut totals = Self::default();
        for expense in expenses {
            totals.add(expense.category, expense.amount);
        }
        totals
    }

    fn add(&mut self, category: Category, amount: f64) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == category) {
            Some((_, total)) => *total += amount,
            None => self.entries.push((category, amount)),
        }
    }

    pub fn get(&self, category: Category) -> Option<f64> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == category)
            .map(|(_, total)| *total)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|(_, total)| total).sum()
    }

    /// Largest total. Categories are compared in first-seen order and an
    /// equal total replaces the leader, so a tie goes to the later category.
    pub fn top(&self) -> Option<(Category, f64)> {
        let mut best: Option<(Category, f64)> = None;
        for (category, total) in self.iter() {
            match best {
                Some((_, current)) if total < current => {}
                _ => best = Some((category, total)),
            }
        }
        best
    }
}

/// Everything the analytics view shows for one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub period: AnalyticsPeriod,
    pub top_category: Option<(Category, f64)>,
    pub daily_average: f64,
    pub period_total: f64,
    pub category_totals: CategoryTotals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetLevel {
    Unset,
    Healthy,
    NearLimit,
    OverBudget,
}

/// Thirty-day spend compared against the user's limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum BudgetStatus {
    Unset {
        spent: f64,
    },
    Tracked {
        limit: f64,
        spent: f64,
        remaining: f64,
        over_budget: bool,
        near_limit: bool,
    },
}

impl BudgetStatus {
    pub fn level(&self) -> BudgetLevel {
        match *self {
            BudgetStatus::Unset { .. } => BudgetLevel::Unset,
            BudgetStatus::Tracked {
                over_budget: true, ..
            } => BudgetLevel::OverBudget,
            BudgetStatus::Tracked {
                near_limit: true, ..
            } => BudgetLevel::NearLimit,
            BudgetStatus::Tracked { .. } => BudgetLevel::Healthy,
        }
    }

    pub fn spent(&self) -> f64 {
        match *self {
            BudgetStatus::Unset { spent } | BudgetStatus::Tracked { spent, .. } => spent,
        }
    }
}

/// Stateless query functions; none of them mutate their input.
pub struct QueryEngine;

impl QueryEngine {
    /// Category equality AND case-insensitive search over description,
    /// category label and raw date. An empty filter keeps everything.
    pub fn filtered<'a>(
        expenses: &'a [Expense],
        category: Option<Category>,
        search: &str,
    ) -> Vec<&'a Expense> {
        let needle = search.trim().to_lowercase();
        expenses
            .iter()
            .filter(|expense| category.map_or(true, |wanted| expense.category == wanted))
            .filter(|expense| needle.is_empty() || Self::matches_search(expense, &needle))
            .collect()
    }

    pub fn filtered_by<'a>(expenses: &'a [Expense], filter: &FilterState) -> Vec<&'a Expense> {
        Self::filtered(expenses, filter.category, &filter.search)
    }

    fn matches_search(expense: &Expense, needle: &str) -> bool {
        expense.description.to_lowercase().contains(needle)
            || expense
                .category
                .display_label()
                .to_lowercase()
                .contains(needle)
            || expense.date_string().contains(needle)
    }

    /// Expenses whose calendar date falls inside the period's inclusive window.
    pub fn for_period(
        expenses: &[Expense],
        period: AnalyticsPeriod,
        now: NaiveDateTime,
    ) -> Vec<&Expense> {
        let window = period.window(now);
        let selected: Vec<&Expense> = expenses
            .iter()
            .filter(|expense| window.contains(expense.date))
            .collect();
        debug!(
            period = %period,
            start = %window.start,
            end = %window.end,
            matched = selected.len(),
            "period query"
        );
        selected
    }

    pub fn category_totals<'a>(
        expenses: impl IntoIterator<Item = &'a Expense>,
    ) -> CategoryTotals {
        CategoryTotals::from_expenses(expenses)
    }

    pub fn top_category<'a>(
        expenses: impl IntoIterator<Item = &'a Expense>,
    ) -> Option<Category> {
        Self::category_totals(expenses)
            .top()
            .map(|(category, _)| category)
    }

    pub fn total<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> f64 {
        expenses.into_iter().map(|expense| expense.amount).sum()
    }

    pub fn summary(expenses: &[&Expense]) -> Summary {
        Summary {
            total: Self::total(expenses.iter().copied()),
            count: expenses.len(),
        }
    }

    /// Period total divided by the number of days the period spans.
    ///
    /// For all time the span runs from the earliest date in `all_expenses`
    /// (the whole ledger, not just `expenses`) through `now`.
    pub fn daily_average(
        expenses: &[&Expense],
        period: AnalyticsPeriod,
        all_expenses: &[Expense],
        now: NaiveDateTime,
    ) -> f64 {
        if expenses.is_empty() {
            return 0.0;
        }
        let days = match period.days() {
            Some(days) => days as f64,
            None => match Self::all_time_days(all_expenses, now) {
                Some(days) => days,
                None => return 0.0,
            },
        };
        Self::total(expenses.iter().copied()) / days
    }

    fn all_time_days(all_expenses: &[Expense], now: NaiveDateTime) -> Option<f64> {
        let earliest = all_expenses.iter().map(|expense| expense.date).min()?;
        let elapsed = now - earliest.and_hms_opt(0, 0, 0)?;
        let millis_per_day = Duration::days(1).num_milliseconds() as f64;
        let days = (elapsed.num_milliseconds() as f64 / millis_per_day).ceil() + 1.0;
        Some(days.max(1.0))
    }

    pub fn analytics(
        all_expenses: &[Expense],
        period: AnalyticsPeriod,
        now: NaiveDateTime,
    ) -> AnalyticsReport {
        let in_period = Self::for_period(all_expenses, period, now);
        let category_totals = Self::category_totals(in_period.iter().copied());
        AnalyticsReport {
            period,
            top_category: category_totals.top(),
            daily_average: Self::daily_average(&in_period, period, all_expenses, now),
            period_total: Self::total(in_period.iter().copied()),
            category_totals,
        }
    }

    /// Compares the last thirty days of spend against `budget_limit`.
    pub fn budget_status(
        all_expenses: &[Expense],
        budget_limit: f64,
        now: NaiveDateTime,
    ) -> BudgetStatus {
        let spent = Self::total(Self::for_period(
            all_expenses,
            AnalyticsPeriod::Last30Days,
            now,
        ));
        if budget_limit == 0.0 {
            return BudgetStatus::Unset { spent };
        }
        let remaining = budget_limit - spent;
        BudgetStatus::Tracked {
            limit: budget_limit,
            spent,
            remaining,
            over_budget: remaining < 0.0,
            near_limit: remaining >= 0.0 && remaining < budget_limit * NEAR_LIMIT_RATIO,
        }
    }
}
