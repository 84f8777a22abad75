use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    clock::Clock,
    domain::*,
    error::{AppError, Result},
    repository::{ClubRepository, MembershipRepository, UserRepository},
    service::permission_service::PermissionService,
};

/// Typed confirmation required before a club is deleted.
pub const DELETE_CONFIRMATION: &str = "DELETE";

pub struct ClubService {
    repo: Arc<dyn ClubRepository>,
    membership_repo: Arc<dyn MembershipRepository>,
    user_repo: Arc<dyn UserRepository>,
    permissions: Arc<PermissionService>,
    clock: Arc<dyn Clock>,
}

impl ClubService {
    pub fn new(
        repo: Arc<dyn ClubRepository>,
        membership_repo: Arc<dyn MembershipRepository>,
        user_repo: Arc<dyn UserRepository>,
        permissions: Arc<PermissionService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { repo, membership_repo, user_repo, permissions, clock }
    }

    /// Fetch a club or fail with NotFound.
    pub async fn get(&self, id: Uuid) -> Result<Club> {
        self.repo.find_by_id(id).await?.ok_or_else(|| AppError::not_found("Club"))
    }

    pub async fn list(&self, query: Option<&str>) -> Result<Vec<Club>> {
        self.repo.list(query).await
    }

    pub async fn popular(&self, limit: i64) -> Result<Vec<ClubWithStats>> {
        self.repo.list_popular(limit).await
    }

    pub async fn member_count(&self, id: Uuid) -> Result<i64> {
        self.repo.member_count(id).await
    }

    pub async fn my_clubs(&self, user: &User) -> Result<Vec<Club>> {
        self.repo.list_for_member(user.id).await
    }

    /// Faculty creators become the club's approved advisor in the same
    /// transaction that creates the club.
    pub async fn create(&self, actor: &User, request: CreateClubRequest) -> Result<Club> {
        self.permissions.principal(actor).await?.can_create_club().require()?;
        request.validate()?;

        let advisor = actor.is_faculty().then_some(actor.id);
        let club = self.repo.create(request, advisor, self.clock.now()).await?;

        tracing::info!(club_id = %club.id, created_by = %actor.id, "club created");
        Ok(club)
    }

    pub async fn update(&self, actor: &User, club_id: Uuid, update: UpdateClubRequest) -> Result<Club> {
        self.get(club_id).await?;
        self.permissions.principal(actor).await?.can_manage_club(club_id).require()?;
        update.validate()?;

        let club = self.repo.update(club_id, update, self.clock.now()).await?;
        tracing::info!(club_id = %club.id, updated_by = %actor.id, "club updated");
        Ok(club)
    }

    pub async fn delete(&self, actor: &User, club_id: Uuid, confirm: &str) -> Result<()> {
        let club = self.get(club_id).await?;
        self.permissions.principal(actor).await?.can_delete_club(club_id).require()?;

        if confirm != DELETE_CONFIRMATION {
            return Err(AppError::Validation(format!(
                "Please type \"{}\" to confirm club deletion.",
                DELETE_CONFIRMATION
            )));
        }

        self.repo.delete(club_id).await?;
        tracing::info!(club_id = %club_id, name = %club.name, deleted_by = %actor.id, "club deleted");
        Ok(())
    }

    /// Admin appoints a faculty member as advisor of a club.
    pub async fn appoint_advisor(&self, actor: &User, club_id: Uuid, user_id: Uuid) -> Result<Membership> {
        self.get(club_id).await?;
        self.permissions.principal(actor).await?.require_admin()?;

        let advisor = self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;
        if !advisor.is_faculty() {
            return Err(AppError::Validation(
                "Only faculty members can be club advisors.".to_string(),
            ));
        }

        let membership = self.membership_repo
            .upsert_advisor(advisor.id, club_id, actor.id, self.clock.now())
            .await?;
        tracing::info!(club_id = %club_id, advisor_id = %advisor.id, "faculty advisor appointed");
        Ok(membership)
    }

    /// Approved members of a club.
    pub async fn members(&self, club_id: Uuid) -> Result<Vec<MembershipWithUser>> {
        self.get(club_id).await?;
        self.membership_repo.list_for_club(club_id, ApprovalStatus::Approved).await
    }

    /// Outstanding join requests; visible to club managers only.
    pub async fn pending(&self, actor: &User, club_id: Uuid) -> Result<Vec<MembershipWithUser>> {
        self.get(club_id).await?;
        self.permissions.principal(actor).await?.can_manage_club(club_id).require()?;
        self.membership_repo.list_for_club(club_id, ApprovalStatus::Pending).await
    }

    pub async fn permissions(&self, user: &User, club_id: Uuid) -> Result<ClubPermissions> {
        self.get(club_id).await?;
        self.permissions.club_permissions(user, club_id).await
    }
}
