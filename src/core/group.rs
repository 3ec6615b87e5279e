use crate::core::user::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A shared context scoping expenses, settlements, and balances.
///
/// A group can be a household, a trip, or a single person's private ledger.
/// Membership determines who may appear as payer, participant, or settlement
/// counterparty.
///
/// # Examples
///
/// ```
/// use splitledger::core::group::Group;
/// use splitledger::core::user::UserId;
///
/// let mut group = Group::new("ski-trip");
/// group.add_member(UserId::new("alice"));
/// group.add_member(UserId::new("bob"));
/// assert!(group.is_member(&UserId::new("alice")));
/// assert_eq!(group.member_count(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    name: String,
    members: Vec<UserId>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Create a group with an initial member list. Duplicates are dropped.
    pub fn with_members(name: impl Into<String>, members: impl IntoIterator<Item = UserId>) -> Self {
        let mut group = Self::new(name);
        for member in members {
            group.add_member(member);
        }
        group
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a member. Adding an existing member is a no-op.
    pub fn add_member(&mut self, user: UserId) {
        if !self.members.contains(&user) {
            self.members.push(user);
        }
    }

    pub fn is_member(&self, user: &UserId) -> bool {
        self.members.contains(user)
    }

    pub fn members(&self) -> &[UserId] {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} members)", self.name, self.members.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_membership() {
        let group = Group::with_members("flat", [UserId::new("alice"), UserId::new("bob")]);
        assert!(group.is_member(&UserId::new("alice")));
        assert!(!group.is_member(&UserId::new("mallory")));
    }

    #[test]
    fn test_duplicate_members_dropped() {
        let group = Group::with_members(
            "flat",
            [UserId::new("alice"), UserId::new("alice"), UserId::new("bob")],
        );
        assert_eq!(group.member_count(), 2);
    }
}
