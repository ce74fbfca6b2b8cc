use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Field, ValidationError};

use super::category::Category;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single recorded expense. Field names match the persisted JSON layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    /// Creation time in epoch milliseconds; unique within a ledger.
    pub id: i64,
    pub amount: f64,
    pub description: String,
    pub category: Category,
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
}

impl Expense {
    /// Calendar date in the stored `YYYY-MM-DD` form.
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// Typed input for [`crate::ledger::Ledger::add`]; validated before any mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub amount: f64,
    pub description: String,
    pub category: Option<Category>,
    pub date: Option<NaiveDate>,
}

impl ExpenseDraft {
    pub fn new(
        amount: f64,
        description: impl Into<String>,
        category: Category,
        date: NaiveDate,
    ) -> Self {
        Self {
            amount,
            description: description.into(),
            category: Some(category),
            date: Some(date),
        }
    }

    /// Checks the draft against `today` and returns the normalized fields.
    pub fn validate(
        &self,
        today: NaiveDate,
    ) -> Result<(f64, String, Category, NaiveDate), ValidationError> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ValidationError::new(
                Field::Amount,
                "Please enter a valid amount greater than 0",
            ));
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::new(
                Field::Description,
                "Please enter a description",
            ));
        }
        let category = self
            .category
            .ok_or_else(|| ValidationError::new(Field::Category, "Please select a category"))?;
        let date = self
            .date
            .ok_or_else(|| ValidationError::new(Field::Date, "Please select a date"))?;
        if date > today {
            return Err(ValidationError::new(
                Field::Date,
                "Future dates are not allowed",
            ));
        }
        Ok((self.amount, description.to_string(), category, date))
    }
}

/// Raw text fields as submitted by an input form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseForm {
    pub amount: String,
    pub description: String,
    pub category: String,
    pub date: String,
}

impl ExpenseForm {
    pub fn parse(&self) -> Result<ExpenseDraft, ValidationError> {
        let amount = self.amount.trim().parse::<f64>().map_err(|_| {
            ValidationError::new(Field::Amount, "Please enter a valid amount greater than 0")
        })?;
        let category = Category::parse_optional(&self.category)?;
        let raw_date = self.date.trim();
        let date = if raw_date.is_empty() {
            None
        } else {
            Some(
                NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|_| {
                    ValidationError::new(Field::Date, "Please select a valid date (YYYY-MM-DD)")
                })?,
            )
        };
        Ok(ExpenseDraft {
            amount,
            description: self.description.clone(),
            category,
            date,
        })
    }
}

impl From<&Expense> for ExpenseForm {
    fn from(expense: &Expense) -> Self {
        Self {
            amount: expense.amount.to_string(),
            description: expense.description.clone(),
            category: expense.category.key().to_string(),
            date: expense.date_string(),
        }
    }
}
