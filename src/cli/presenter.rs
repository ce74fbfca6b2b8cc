use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::config::Settings;
use crate::core::chart;
use crate::core::format::{budget_line, escape_control, format_amount, format_date};
use crate::core::presenter::{ConfirmationRequest, Confirmer, Presenter, Severity};
use crate::core::query::{AnalyticsReport, BudgetLevel, BudgetStatus, Summary};
use crate::ledger::Expense;

use super::output::{self, MessageKind, OutputPreferences};

const CHART_WIDTH: usize = 30;

/// Keeps the latest rendered views so commands can print them on demand.
/// Notifications are printed immediately.
#[derive(Debug, Default)]
pub struct TerminalPresenter {
    settings: Settings,
    expenses: Vec<Expense>,
    summary: Option<Summary>,
    report: Option<AnalyticsReport>,
    budget: Option<BudgetStatus>,
    searching: bool,
    plain: bool,
}

impl TerminalPresenter {
    pub fn new(plain: bool) -> Self {
        Self {
            plain,
            ..Self::default()
        }
    }

    pub fn set_searching(&mut self, searching: bool) {
        self.searching = searching;
    }

    pub fn print_list(&self) {
        output::section("Expenses");
        if self.expenses.is_empty() {
            if self.searching {
                output::info("No expenses found matching your search.");
            } else {
                output::info("No expenses recorded yet.");
            }
        }
        for expense in &self.expenses {
            output::line(self.expense_row(expense));
        }
        if let Some(summary) = self.summary {
            output::line(format!(
                "Total: {} across {} expense(s)",
                self.amount(summary.total),
                summary.count
            ));
        }
    }

    pub fn expense_row(&self, expense: &Expense) -> String {
        format!(
            "{:>14}  {:<12} {:<22} {:<28} {:>12}",
            expense.id,
            format_date(expense.date),
            expense.category.display_label(),
            truncate(&escape_control(&expense.description), 28),
            self.amount(expense.amount)
        )
    }

    pub fn print_analytics(&self) {
        let Some(report) = self.report.as_ref() else {
            return;
        };
        output::section(format!("Analytics: {}", report.period.label()));
        match report.top_category {
            Some((category, amount)) => output::line(format!(
                "Top category:  {} ({})",
                category.display_label(),
                self.amount(amount)
            )),
            None => output::line(format!("Top category:  No data ({})", self.amount(0.0))),
        }
        output::line(format!("Daily average: {}", self.amount(report.daily_average)));
        output::line(format!("Period total:  {}", self.amount(report.period_total)));

        let segments = chart::segments(&report.category_totals);
        if segments.is_empty() {
            output::info("No data to chart for this period.");
            return;
        }
        for segment in segments {
            let width = (segment.share * CHART_WIDTH as f64).round() as usize;
            output::line(format!(
                "{:<22} {:<width$} {} ({:.0}%)",
                segment.label,
                "#".repeat(width.max(1)),
                self.amount(segment.amount),
                segment.share * 100.0,
                width = CHART_WIDTH
            ));
        }
    }

    pub fn print_budget(&self) {
        let Some(status) = self.budget.as_ref() else {
            return;
        };
        let line = budget_line(status, &self.settings.currency);
        let kind = match status.level() {
            BudgetLevel::Unset => MessageKind::Info,
            BudgetLevel::Healthy => MessageKind::Success,
            BudgetLevel::NearLimit => MessageKind::Warning,
            BudgetLevel::OverBudget => MessageKind::Error,
        };
        output::print(kind, line);
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    fn amount(&self, value: f64) -> String {
        format_amount(&escape_control(&self.settings.currency), value)
    }
}

impl Presenter for TerminalPresenter {
    fn render(&mut self, expenses: &[&Expense]) {
        self.expenses = expenses.iter().map(|expense| (*expense).clone()).collect();
    }

    fn render_summary(&mut self, summary: Summary) {
        self.summary = Some(summary);
    }

    fn render_analytics(&mut self, report: &AnalyticsReport) {
        self.report = Some(report.clone());
    }

    fn render_budget_status(&mut self, status: &BudgetStatus) {
        self.budget = Some(*status);
    }

    fn render_settings(&mut self, settings: &Settings) {
        self.settings = settings.clone();
        output::set_preferences(OutputPreferences {
            plain: self.plain,
            theme: settings.theme,
        });
    }

    fn notify(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => output::info(message),
            Severity::Success => output::success(message),
            Severity::Error => output::error(message),
        }
    }
}

/// Asks on the terminal; in script mode every request is accepted.
pub struct TerminalConfirmer {
    theme: ColorfulTheme,
    assume_yes: bool,
}

impl TerminalConfirmer {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            theme: ColorfulTheme::default(),
            assume_yes,
        }
    }
}

impl Confirmer for TerminalConfirmer {
    fn confirm(&mut self, request: &ConfirmationRequest) -> bool {
        if self.assume_yes {
            return true;
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(request.message.as_str())
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(max.saturating_sub(3)).collect();
    shortened.push_str("...");
    shortened
}
