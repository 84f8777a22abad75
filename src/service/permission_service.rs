use std::sync::Arc;
use uuid::Uuid;

use crate::{
    auth::Principal,
    domain::{ClubPermissions, User},
    error::Result,
    repository::MembershipRepository,
};

/// Builds a [`Principal`] from the store on every call. Membership state
/// can change between requests, so nothing is kept.
pub struct PermissionService {
    membership_repo: Arc<dyn MembershipRepository>,
}

impl PermissionService {
    pub fn new(membership_repo: Arc<dyn MembershipRepository>) -> Self {
        Self { membership_repo }
    }

    pub async fn principal(&self, user: &User) -> Result<Principal> {
        let memberships = self.membership_repo.list_approved_for_user(user.id).await?;
        Ok(Principal::new(user.clone(), memberships))
    }

    pub async fn club_permissions(&self, user: &User, club_id: Uuid) -> Result<ClubPermissions> {
        let principal = self.principal(user).await?;

        Ok(ClubPermissions {
            club_id,
            can_manage_club: principal.can_manage_club(club_id).is_allowed(),
            can_approve_members: principal.can_approve_members(club_id).is_allowed(),
            can_manage_events: principal.can_manage_events(club_id).is_allowed(),
            can_delete_club: principal.can_delete_club(club_id).is_allowed(),
            is_leader: principal.is_leader(club_id),
            is_faculty_advisor: principal.is_faculty_advisor(club_id),
        })
    }
}
