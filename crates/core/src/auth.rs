use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ids::{OrgUnitId, UserId};

/// Resolved identity of the user a request is executing as, including the
/// organisation-unit scopes the access checks are evaluated against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_id: UserId,
    username: String,
    capture_scope: BTreeSet<OrgUnitId>,
    search_scope: BTreeSet<OrgUnitId>,
}

impl UserIdentity {
    /// Creates a user identity from session and scope data.
    #[must_use]
    pub fn new(
        user_id: UserId,
        username: impl Into<String>,
        capture_scope: BTreeSet<OrgUnitId>,
        search_scope: BTreeSet<OrgUnitId>,
    ) -> Self {
        Self {
            user_id,
            username: username.into(),
            capture_scope,
            search_scope,
        }
    }

    /// Returns the stable user identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the login name for the current user.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the organisation units the user may capture data for.
    #[must_use]
    pub fn capture_scope(&self) -> &BTreeSet<OrgUnitId> {
        &self.capture_scope
    }

    /// Returns the organisation units the user may search within. Falls back
    /// to the capture scope when no dedicated search scope is configured.
    #[must_use]
    pub fn search_scope(&self) -> &BTreeSet<OrgUnitId> {
        if self.search_scope.is_empty() {
            &self.capture_scope
        } else {
            &self.search_scope
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::ids::{OrgUnitId, UserId};

    use super::UserIdentity;

    #[test]
    fn empty_search_scope_falls_back_to_capture_scope() {
        let capture_unit = OrgUnitId::new();
        let identity = UserIdentity::new(
            UserId::new(),
            "tracker.clerk",
            BTreeSet::from([capture_unit]),
            BTreeSet::new(),
        );

        assert!(identity.search_scope().contains(&capture_unit));
    }

    #[test]
    fn dedicated_search_scope_is_kept_separate() {
        let capture_unit = OrgUnitId::new();
        let search_unit = OrgUnitId::new();
        let identity = UserIdentity::new(
            UserId::new(),
            "tracker.clerk",
            BTreeSet::from([capture_unit]),
            BTreeSet::from([search_unit]),
        );

        assert!(!identity.search_scope().contains(&capture_unit));
        assert!(identity.search_scope().contains(&search_unit));
    }
}
