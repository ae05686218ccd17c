//! Ownership checks for author-or-read-only resources.

use crate::Claims;
use storefront_core::{StorefrontError, StorefrontResult, UserId};

/// Extension trait for Claims to check resource ownership.
pub trait ClaimsExt {
    /// Checks if the user is the owner of a resource.
    fn is_owner(&self, resource_owner_id: UserId) -> bool;

    /// Requires the user to own the resource.
    fn require_owner(&self, resource_owner_id: UserId) -> StorefrontResult<()>;
}

impl ClaimsExt for Claims {
    fn is_owner(&self, resource_owner_id: UserId) -> bool {
        self.user_id() == resource_owner_id
    }

    fn require_owner(&self, resource_owner_id: UserId) -> StorefrontResult<()> {
        if self.is_owner(resource_owner_id) {
            Ok(())
        } else {
            Err(StorefrontError::forbidden(
                "You do not have permission to perform this action.",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TokenSubject, TokenType};
    use chrono::{Duration, Utc};

    fn claims_for(user_id: UserId) -> Claims {
        Claims::new(
            TokenSubject {
                user_id,
                username: "owner",
                email: "owner@example.com",
                is_staff: false,
            },
            TokenType::Access,
            "iss".to_string(),
            "aud".to_string(),
            Utc::now() + Duration::hours(1),
        )
    }

    #[test]
    fn test_owner_allowed() {
        let owner = UserId::new();
        let claims = claims_for(owner);
        assert!(claims.is_owner(owner));
        assert!(claims.require_owner(owner).is_ok());
    }

    #[test]
    fn test_non_owner_forbidden() {
        let claims = claims_for(UserId::new());
        let err = claims.require_owner(UserId::new()).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }
}
