use std::sync::Arc;
use uuid::Uuid;

use crate::{
    auth::Denial,
    clock::Clock,
    domain::*,
    error::{AppError, Result},
    repository::{ClubRepository, MembershipRepository},
    service::permission_service::PermissionService,
};

/// Join requests, approvals and removals for the (user, club) lifecycle:
/// absent -> pending -> approved | rejected, rejected -> pending, any -> absent.
pub struct MembershipService {
    repo: Arc<dyn MembershipRepository>,
    club_repo: Arc<dyn ClubRepository>,
    permissions: Arc<PermissionService>,
    clock: Arc<dyn Clock>,
}

impl MembershipService {
    pub fn new(
        repo: Arc<dyn MembershipRepository>,
        club_repo: Arc<dyn ClubRepository>,
        permissions: Arc<PermissionService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { repo, club_repo, permissions, clock }
    }

    async fn require_club(&self, club_id: Uuid) -> Result<Club> {
        self.club_repo
            .find_by_id(club_id)
            .await?
            .ok_or_else(|| AppError::not_found("Club"))
    }

    /// Memberships are addressed through their club; an id from another
    /// club is treated as missing.
    async fn require_membership(&self, club_id: Uuid, membership_id: Uuid) -> Result<Membership> {
        self.require_club(club_id).await?;
        self.repo
            .find_by_id(membership_id)
            .await?
            .filter(|m| m.club_id == club_id)
            .ok_or_else(|| AppError::not_found("Membership"))
    }

    fn classify(existing: Membership) -> JoinOutcome {
        match existing.status {
            ApprovalStatus::Approved => JoinOutcome::AlreadyMember(existing),
            _ => JoinOutcome::AlreadyPending(existing),
        }
    }

    pub async fn request_join(&self, user: &User, club_id: Uuid) -> Result<JoinOutcome> {
        self.require_club(club_id).await?;

        let outcome = match self.repo.find_for(user.id, club_id).await? {
            None => match self.repo.create_pending(user.id, club_id, self.clock.now()).await {
                Ok(membership) => JoinOutcome::Requested(membership),
                // Lost an insert race; the row the winner wrote decides.
                Err(AppError::Conflict(_)) => {
                    let existing = self.repo
                        .find_for(user.id, club_id)
                        .await?
                        .ok_or_else(|| AppError::Internal("Membership vanished after conflict".to_string()))?;
                    Self::classify(existing)
                }
                Err(e) => return Err(e),
            },
            Some(existing) if existing.status == ApprovalStatus::Rejected => {
                let resubmitted = self.repo.resubmit(existing.id).await?;
                let membership = self.repo
                    .find_by_id(existing.id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Membership"))?;
                if resubmitted {
                    JoinOutcome::Resubmitted(membership)
                } else {
                    Self::classify(membership)
                }
            }
            Some(existing) => Self::classify(existing),
        };

        if let JoinOutcome::Requested(m) | JoinOutcome::Resubmitted(m) = &outcome {
            tracing::info!(membership_id = %m.id, user_id = %user.id, club_id = %club_id, "membership requested");
        }
        Ok(outcome)
    }

    /// The user's own row is deleted unconditionally.
    pub async fn leave(&self, user: &User, club_id: Uuid) -> Result<LeaveOutcome> {
        self.require_club(club_id).await?;

        if self.repo.delete_for(user.id, club_id).await? {
            tracing::info!(user_id = %user.id, club_id = %club_id, "member left club");
            Ok(LeaveOutcome::Left)
        } else {
            Ok(LeaveOutcome::NotAMember)
        }
    }

    pub async fn approve(&self, approver: &User, club_id: Uuid, membership_id: Uuid) -> Result<Membership> {
        let membership = self.require_membership(club_id, membership_id).await?;
        self.permissions.principal(approver).await?.can_approve_members(club_id).require()?;

        let updated = self.repo.approve(membership.id, approver.id, self.clock.now()).await?;
        tracing::info!(membership_id = %updated.id, approved_by = %approver.id, "membership approved");
        Ok(updated)
    }

    pub async fn reject(&self, approver: &User, club_id: Uuid, membership_id: Uuid) -> Result<Membership> {
        let membership = self.require_membership(club_id, membership_id).await?;
        self.permissions.principal(approver).await?.can_approve_members(club_id).require()?;

        let updated = self.repo.reject(membership.id).await?;
        tracing::info!(membership_id = %updated.id, rejected_by = %approver.id, "membership rejected");
        Ok(updated)
    }

    /// Only an approved faculty advisor of the club may promote a member.
    pub async fn assign_leader(&self, actor: &User, club_id: Uuid, membership_id: Uuid) -> Result<Membership> {
        let membership = self.require_membership(club_id, membership_id).await?;
        self.permissions.principal(actor).await?.can_advise(club_id).require()?;

        match (membership.status, membership.role) {
            (ApprovalStatus::Approved, MembershipRole::Leader) => return Ok(membership),
            (_, MembershipRole::FacultyAdvisor) => {
                return Err(AppError::Validation(
                    "Faculty advisors cannot be made club leaders.".to_string(),
                ))
            }
            (ApprovalStatus::Approved, MembershipRole::Member) => {}
            _ => {
                return Err(AppError::Validation(
                    "Only approved members can be made club leaders.".to_string(),
                ))
            }
        }

        if !self.repo.promote_to_leader(membership.id).await? {
            return Err(AppError::Validation(
                "Membership changed before it could be promoted.".to_string(),
            ));
        }

        let updated = self.repo
            .find_by_id(membership.id)
            .await?
            .ok_or_else(|| AppError::not_found("Membership"))?;
        tracing::info!(membership_id = %updated.id, assigned_by = %actor.id, "club leader assigned");
        Ok(updated)
    }

    /// Faculty-advisor memberships are never removable, whoever asks.
    pub async fn remove(&self, actor: &User, club_id: Uuid, membership_id: Uuid) -> Result<()> {
        let membership = self.require_membership(club_id, membership_id).await?;
        self.permissions.principal(actor).await?.can_manage_club(club_id).require()?;

        if membership.role == MembershipRole::FacultyAdvisor {
            return Err(AppError::Permission(Denial::ProtectedAdvisor));
        }

        if !self.repo.delete_removable(membership.id).await? {
            // Deleted concurrently, or promoted to advisor in between.
            return match self.repo.find_by_id(membership.id).await? {
                Some(_) => Err(AppError::Permission(Denial::ProtectedAdvisor)),
                None => Err(AppError::not_found("Membership")),
            };
        }

        tracing::info!(membership_id = %membership.id, removed_by = %actor.id, "member removed");
        Ok(())
    }
}
