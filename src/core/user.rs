use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a member of a group.
///
/// A user can represent a real account or a lightweight placeholder
/// (a roommate added by name only). Identity is the string itself.
///
/// # Examples
///
/// ```
/// use splitledger::core::user::UserId;
///
/// let alice = UserId::new("alice");
/// let bob = UserId::new("bob");
/// assert_ne!(alice, bob);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a new user identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this user ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_equality() {
        let a = UserId::new("alice");
        let b = UserId::new("alice");
        let c = UserId::new("bob");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_user_display() {
        let u = UserId::new("carol");
        assert_eq!(format!("{}", u), "carol");
    }

    #[test]
    fn test_user_ordering() {
        let a = UserId::new("alice");
        let b = UserId::new("bob");
        assert!(a < b);
    }
}
