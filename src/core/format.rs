//! Display helpers shared by presenters.

use chrono::NaiveDate;

use crate::core::query::BudgetStatus;

/// Makes user text inert on a terminal: control characters (escape
/// sequences, carriage returns, newlines) are shown as backslash escapes.
pub fn escape_control(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_control() {
            escaped.extend(ch.escape_default());
        } else {
            escaped.push(ch);
        }
    }
    escaped
}

pub fn format_amount(currency: &str, amount: f64) -> String {
    if amount < 0.0 {
        format!("-{}{:.2}", currency, amount.abs())
    } else {
        format!("{}{:.2}", currency, amount)
    }
}

/// Day, short month and year, e.g. `5 Oct 2026`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

pub fn budget_line(status: &BudgetStatus, currency: &str) -> String {
    match *status {
        BudgetStatus::Unset { .. } => "No budget set".to_string(),
        BudgetStatus::Tracked {
            limit,
            spent,
            remaining,
            ..
        } => format!(
            "Budget: {} | Spent: {} | Remaining: {}",
            format_amount(currency, limit),
            format_amount(currency, spent),
            format_amount(currency, remaining)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_characters_are_made_visible() {
        assert_eq!(escape_control("\x1b[2JPWN"), "\\u{1b}[2JPWN");
        assert_eq!(escape_control("Tea\r\nCake"), "Tea\\r\\nCake");
        assert_eq!(escape_control("Café & <b>"), "Café & <b>");
    }

    #[test]
    fn amounts_use_two_decimals() {
        assert_eq!(format_amount("₹", 12.5), "₹12.50");
        assert_eq!(format_amount("$", -3.0), "-$3.00");
    }

    #[test]
    fn dates_render_day_month_year() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 5).unwrap();
        assert_eq!(format_date(date), "5 Oct 2026");
    }

    #[test]
    fn budget_line_reports_unset_state() {
        let line = budget_line(&BudgetStatus::Unset { spent: 4.0 }, "$");
        assert_eq!(line, "No budget set");
    }
}
