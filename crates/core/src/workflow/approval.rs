//! Approval authority.
//!
//! An [`Approver`] is a capability distinct from the creator role: it can
//! only be built for users whose role ranks at least [`UserRole::Approver`].

use std::fmt;

use journal_shared::types::{Money, UserId};
use serde::{Deserialize, Serialize};

use super::error::WorkflowError;

/// User role in the organization hierarchy.
///
/// Roles are ordered from lowest to highest privilege.
/// Higher roles can perform all actions of lower roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Can only read the ledger.
    Viewer = 0,
    /// Can create and submit entries.
    Submitter = 1,
    /// Can approve entries within their limit.
    Approver = 2,
    /// Can approve without limit.
    Accountant = 3,
    /// Full access.
    Admin = 4,
    /// Full access including ownership transfer.
    Owner = 5,
}

impl UserRole {
    /// Parse a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "viewer" => Some(Self::Viewer),
            "submitter" => Some(Self::Submitter),
            "approver" => Some(Self::Approver),
            "accountant" => Some(Self::Accountant),
            "admin" => Some(Self::Admin),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Submitter => "submitter",
            Self::Approver => "approver",
            Self::Accountant => "accountant",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }

    /// Returns true if the role may approve entries at all.
    #[must_use]
    pub fn can_approve(self) -> bool {
        self >= Self::Approver
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The capability to approve or reject pending entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Approver {
    user_id: UserId,
    role: UserRole,
    approval_limit: Option<Money>,
}

impl Approver {
    /// Grants approval capability to a user.
    ///
    /// `approval_limit` only binds users whose role is exactly
    /// [`UserRole::Approver`]; higher roles are unlimited.
    pub fn new(
        user_id: UserId,
        role: UserRole,
        approval_limit: Option<Money>,
    ) -> Result<Self, WorkflowError> {
        if !role.can_approve() {
            return Err(WorkflowError::NotAuthorizedToApprove { user_id, role });
        }
        Ok(Self {
            user_id,
            role,
            approval_limit,
        })
    }

    /// The approving user.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// The approving user's role.
    #[must_use]
    pub fn role(&self) -> UserRole {
        self.role
    }

    /// Checks the entry amount against the approver's limit.
    pub fn check_limit(&self, amount: Money) -> Result<(), WorkflowError> {
        if self.role == UserRole::Approver
            && let Some(limit) = self.approval_limit
            && amount > limit
        {
            return Err(WorkflowError::ExceedsApprovalLimit { amount, limit });
        }
        Ok(())
    }
}
