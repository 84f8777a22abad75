use std::sync::Arc;
use serde::Serialize;
use validator::Validate;

use crate::{
    clock::Clock,
    domain::*,
    error::{AppError, Result},
    repository::{EventRepository, MembershipRepository, UserRepository},
    service::permission_service::PermissionService,
};

/// What other users can see about someone.
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfile {
    pub user: User,
    pub memberships: Vec<MembershipWithClub>,
    pub registrations: Vec<RegistrationWithEvent>,
}

pub struct UserService {
    repo: Arc<dyn UserRepository>,
    membership_repo: Arc<dyn MembershipRepository>,
    event_repo: Arc<dyn EventRepository>,
    permissions: Arc<PermissionService>,
    clock: Arc<dyn Clock>,
}

impl UserService {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        membership_repo: Arc<dyn MembershipRepository>,
        event_repo: Arc<dyn EventRepository>,
        permissions: Arc<PermissionService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { repo, membership_repo, event_repo, permissions, clock }
    }

    /// Public self-registration. Only student accounts can be created here.
    pub async fn signup(&self, request: SignupRequest) -> Result<User> {
        request.validate()?;

        let new_user = NewUser {
            username: request.username,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            role: Role::Student,
            department: request.department,
            bio: request.bio,
            faculty_id: None,
        };

        let user = self.insert(new_user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "student account created");
        Ok(user)
    }

    /// Admin-only account creation for any role.
    pub async fn create_user(&self, actor: &User, request: CreateUserRequest) -> Result<User> {
        self.permissions.principal(actor).await?.require_admin()?;
        request.validate()?;

        let new_user = NewUser {
            username: request.username,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            role: request.role,
            department: request.department,
            bio: String::new(),
            faculty_id: request.faculty_id,
        };

        let user = self.insert(new_user).await?;
        tracing::info!(
            user_id = %user.id,
            role = %user.role,
            created_by = %actor.id,
            "account created by administrator"
        );
        Ok(user)
    }

    async fn insert(&self, new_user: NewUser) -> Result<User> {
        self.repo
            .create(new_user, self.clock.now())
            .await
            .map_err(|e| match e {
                AppError::Conflict(msg) if msg.contains("email") => {
                    AppError::Conflict("Email already registered".to_string())
                }
                AppError::Conflict(msg) if msg.contains("username") => {
                    AppError::Conflict("Username already taken".to_string())
                }
                other => other,
            })
    }

    pub async fn update_profile(&self, user: &User, update: UpdateProfileRequest) -> Result<User> {
        update.validate()?;
        self.repo.update_profile(user.id, update, self.clock.now()).await
    }

    pub async fn public_profile(&self, username: &str) -> Result<PublicProfile> {
        let user = self.repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let (memberships, registrations) = tokio::join!(
            self.membership_repo.list_for_user_with_clubs(user.id),
            self.event_repo.list_registrations_for_user(user.id),
        );

        Ok(PublicProfile {
            user,
            memberships: memberships?,
            registrations: registrations?,
        })
    }
}
