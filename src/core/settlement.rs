use crate::core::user::UserId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded direct payment between two members.
///
/// Represents the fact that `from` handed `amount` to `to` outside of any
/// shared expense — typically to pay down a debt the balance engine
/// reported. Settlements offset computed balances: the payer's position
/// rises, the receiver's falls.
///
/// # Examples
///
/// ```
/// use splitledger::core::settlement::Settlement;
/// use splitledger::core::user::UserId;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let payment = Settlement::new(
///     UserId::new("bob"),
///     UserId::new("alice"),
///     dec!(25.50),
///     NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
/// );
/// assert_eq!(payment.amount(), dec!(25.50));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    /// Unique identifier for this settlement.
    id: Uuid,
    /// The member who paid.
    from: UserId,
    /// The member who received the payment.
    to: UserId,
    /// The amount paid. Must be positive.
    amount: Decimal,
    /// The date of the payment.
    date: NaiveDate,
    /// Optional note ("venmo", "cash at dinner", ...).
    note: Option<String>,
}

impl Settlement {
    /// Create a new settlement.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive or `from == to`.
    pub fn new(from: UserId, to: UserId, amount: Decimal, date: NaiveDate) -> Self {
        assert!(
            amount > Decimal::ZERO,
            "Settlement amount must be positive, got {}",
            amount
        );
        assert!(from != to, "Settlement requires two distinct members");
        Self {
            id: Uuid::new_v4(),
            from,
            to,
            amount,
            date,
            note: None,
        }
    }

    /// Create a settlement with a specific ID (useful for testing).
    pub fn with_id(id: Uuid, from: UserId, to: UserId, amount: Decimal, date: NaiveDate) -> Self {
        let mut settlement = Self::new(from, to, amount, date);
        settlement.id = id;
        settlement
    }

    /// Attach a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn from(&self) -> &UserId {
        &self.from
    }

    pub fn to(&self) -> &UserId {
        &self.to
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
    }

    #[test]
    fn test_settlement_creation() {
        let s = Settlement::new(UserId::new("bob"), UserId::new("alice"), dec!(20), date());
        assert_eq!(s.from().as_str(), "bob");
        assert_eq!(s.to().as_str(), "alice");
        assert_eq!(s.amount(), dec!(20));
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn test_zero_amount_rejected() {
        Settlement::new(UserId::new("bob"), UserId::new("alice"), Decimal::ZERO, date());
    }

    #[test]
    #[should_panic(expected = "distinct members")]
    fn test_self_settlement_rejected() {
        Settlement::new(UserId::new("bob"), UserId::new("bob"), dec!(5), date());
    }
}
