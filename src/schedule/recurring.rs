use crate::core::user::UserId;
use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How often a recurring rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Advance a date by one cadence interval.
///
/// Month and year steps clamp the day-of-month to the target month's
/// length: Jan 31 + monthly = Feb 28 (29 in leap years), Feb 29 + yearly =
/// Feb 28 on non-leap years.
pub fn advance(date: NaiveDate, cadence: Cadence) -> NaiveDate {
    match cadence {
        Cadence::Daily => date + Days::new(1),
        Cadence::Weekly => date + Days::new(7),
        Cadence::Monthly => add_months(date, 1),
        Cadence::Yearly => add_months(date, 12),
    }
}

fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    let zero_based = date.month0() + months;
    let year = date.year() + (zero_based / 12) as i32;
    let month = zero_based % 12 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| panic!("invalid rolled date {}-{}-{}", year, month, day))
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.unwrap()
        .pred_opt()
        .unwrap()
        .day()
}

/// A template that periodically materializes into a concrete expense.
///
/// The rule tracks when it next fires (`next_due`); the scheduler compares
/// that against "today", emits an expense split evenly among the
/// participants, and rolls `next_due` forward by the cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringRule {
    id: Uuid,
    payer: UserId,
    amount: Decimal,
    category: String,
    description: Option<String>,
    participants: Vec<UserId>,
    cadence: Cadence,
    next_due: NaiveDate,
    active: bool,
}

impl RecurringRule {
    /// Create a new active rule.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive or `participants` is empty.
    pub fn new(
        payer: UserId,
        amount: Decimal,
        category: impl Into<String>,
        participants: Vec<UserId>,
        cadence: Cadence,
        first_due: NaiveDate,
    ) -> Self {
        assert!(
            amount > Decimal::ZERO,
            "Recurring amount must be positive, got {}",
            amount
        );
        assert!(!participants.is_empty(), "Recurring rule needs participants");
        Self {
            id: Uuid::new_v4(),
            payer,
            amount,
            category: category.into(),
            description: None,
            participants,
            cadence,
            next_due: first_due,
            active: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn payer(&self) -> &UserId {
        &self.payer
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn participants(&self) -> &[UserId] {
        &self.participants
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn next_due(&self) -> NaiveDate {
        self.next_due
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Pause the rule; the scheduler skips inactive rules untouched.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    /// True when the rule should fire on or before `today`.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.active && self.next_due <= today
    }

    /// Roll `next_due` forward one cadence interval.
    pub fn roll_forward(&mut self) {
        self.next_due = advance(self.next_due, self.cadence);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_daily_weekly_advance() {
        assert_eq!(advance(d(2024, 3, 31), Cadence::Daily), d(2024, 4, 1));
        assert_eq!(advance(d(2024, 12, 30), Cadence::Weekly), d(2025, 1, 6));
    }

    #[test]
    fn test_monthly_clamps_day() {
        assert_eq!(advance(d(2024, 1, 31), Cadence::Monthly), d(2024, 2, 29));
        assert_eq!(advance(d(2023, 1, 31), Cadence::Monthly), d(2023, 2, 28));
        assert_eq!(advance(d(2024, 12, 15), Cadence::Monthly), d(2025, 1, 15));
    }

    #[test]
    fn test_yearly_clamps_leap_day() {
        assert_eq!(advance(d(2024, 2, 29), Cadence::Yearly), d(2025, 2, 28));
        assert_eq!(advance(d(2024, 7, 4), Cadence::Yearly), d(2025, 7, 4));
    }

    #[test]
    fn test_due_and_roll() {
        let mut rule = RecurringRule::new(
            UserId::new("alice"),
            dec!(1200),
            "rent",
            vec![UserId::new("alice"), UserId::new("bob")],
            Cadence::Monthly,
            d(2024, 3, 1),
        );
        assert!(rule.is_due(d(2024, 3, 1)));
        assert!(rule.is_due(d(2024, 3, 10)));
        assert!(!rule.is_due(d(2024, 2, 28)));

        rule.roll_forward();
        assert_eq!(rule.next_due(), d(2024, 4, 1));

        rule.deactivate();
        assert!(!rule.is_due(d(2024, 6, 1)));
    }
}
