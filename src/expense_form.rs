//! Expense Form Client
//!
//! Client-side checks for the add/edit expense form. Nothing here talks to
//! the network: a valid form submits natively, an invalid one is blocked with
//! an inline error under each failing field.

use std::fmt;
use std::rc::Rc;

use regex::Regex;

use crate::ports::{Browser, Clock, Event, EventHub, EventKind, Page, Target};

pub const EXPENSE_FORM: &str = "form";
pub const AMOUNT_FIELD: &str = "amount";
pub const CATEGORY_FIELD: &str = "category";
pub const DATE_FIELD: &str = "date";

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Amount,
    Category,
    Date,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Amount, Field::Category, Field::Date];

    pub fn element_id(self) -> &'static str {
        match self {
            Field::Amount => AMOUNT_FIELD,
            Field::Category => CATEGORY_FIELD,
            Field::Date => DATE_FIELD,
        }
    }

    fn message(self) -> &'static str {
        match self {
            Field::Amount => "Please enter a valid amount greater than 0.",
            Field::Category => "Please select a category.",
            Field::Date => "Please select a date.",
        }
    }
}

/// Raw form values; `None` means the page has no such field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFields {
    pub amount: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
}

impl ExpenseFields {
    pub fn read<P: Page + ?Sized>(page: &P) -> Self {
        Self {
            amount: page.value(AMOUNT_FIELD),
            category: page.value(CATEGORY_FIELD),
            date: page.value(DATE_FIELD),
        }
    }

    fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Amount => self.amount.as_deref(),
            Field::Category => self.category.as_deref(),
            Field::Date => self.date.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.element_id(), self.message)
    }
}

/// Every failed check of one submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn error_for(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }
}

/// Run all three checks independently and collect the failures.
///
/// Fields the page does not have are not checked.
pub fn validate(fields: &ExpenseFields) -> ValidationReport {
    let errors = Field::ALL
        .into_iter()
        .filter(|field| match fields.get(*field) {
            None => false,
            Some(value) => !field_is_valid(*field, value),
        })
        .map(|field| FieldError {
            field,
            message: field.message(),
        })
        .collect();

    ValidationReport { errors }
}

fn field_is_valid(field: Field, value: &str) -> bool {
    match field {
        Field::Amount => parse_amount(value).is_some_and(|amount| amount > 0.0),
        Field::Category | Field::Date => !value.is_empty(),
    }
}

/// Read a number the way a browser's `parseFloat` does: leading whitespace
/// is skipped and the longest numeric prefix is used, so `"12abc"` is 12 and
/// `"abc"` is `None`.
pub fn parse_amount(input: &str) -> Option<f64> {
    let re = Regex::new(r"^[+-]?(?:Infinity|(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").ok()?;
    let prefix = re.find(input.trim_start())?.as_str();

    match prefix.trim_start_matches(['+', '-']) {
        "Infinity" if prefix.starts_with('-') => Some(f64::NEG_INFINITY),
        "Infinity" => Some(f64::INFINITY),
        _ => prefix.parse().ok(),
    }
}

/// Format as US dollars, e.g. `$1,234.50` or `-$5.00`
pub fn format_currency(amount: f64) -> String {
    if amount.is_nan() {
        return "$NaN".to_string();
    }

    let sign = if amount.is_sign_negative() { "-" } else { "" };
    if amount.is_infinite() {
        return format!("{}$∞", sign);
    }

    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}${}.{}", sign, grouped, cents)
}

/// Expense form controller
pub struct ExpenseFormClient<B, C> {
    browser: B,
    clock: C,
}

impl<B: Browser, C: Clock> ExpenseFormClient<B, C> {
    pub fn new(browser: B, clock: C) -> Self {
        Self { browser, clock }
    }

    /// Put today's date into an empty date field. Returns the value written.
    pub fn fill_default_date(&self) -> Option<String> {
        match self.browser.value(DATE_FIELD) {
            Some(current) if current.is_empty() => {
                let today = self.clock.today().format(DATE_FORMAT).to_string();
                self.browser.set_value(DATE_FIELD, &today);
                Some(today)
            }
            _ => None,
        }
    }

    /// Validate the current values and update the inline errors
    pub fn on_submit(&self) -> ValidationReport {
        let report = validate(&ExpenseFields::read(&self.browser));

        for field in Field::ALL {
            match report.error_for(field) {
                Some(error) => self.browser.show_field_error(field.element_id(), error.message),
                None => self.browser.clear_field_error(field.element_id()),
            }
        }

        if !report.is_valid() {
            tracing::debug!(errors = report.errors().len(), "Expense form blocked");
        }
        report
    }
}

impl<B, C> ExpenseFormClient<B, C>
where
    B: Browser + 'static,
    C: Clock + 'static,
{
    /// Fill the default date and intercept submission of the page's form
    pub fn bind<H: EventHub + 'static>(self: &Rc<Self>, hub: &Rc<H>) {
        self.fill_default_date();

        if self.browser.count(EXPENSE_FORM) == 0 {
            return;
        }
        let this = Rc::clone(self);
        hub.on(
            Target::First(EXPENSE_FORM),
            EventKind::Submit,
            Rc::new(move |event: &Event| {
                if !this.on_submit().is_valid() {
                    event.prevent_default();
                }
            }),
        );
    }
}
