pub mod permission_service;
pub mod user_service;
pub mod club_service;
pub mod membership_service;
pub mod event_service;
pub mod recommendation_service;
pub mod dashboard_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::clock::Clock;
use crate::config::Settings;
use crate::repository::*;
use permission_service::PermissionService;
use user_service::UserService;
use club_service::ClubService;
use membership_service::MembershipService;
use event_service::EventService;
use recommendation_service::RecommendationService;
use dashboard_service::DashboardService;

pub use user_service::PublicProfile;
pub use club_service::DELETE_CONFIRMATION;
pub use dashboard_service::Dashboard;

pub struct ServiceContext {
    pub user_repo: Arc<dyn UserRepository>,
    pub club_repo: Arc<dyn ClubRepository>,
    pub membership_repo: Arc<dyn MembershipRepository>,
    pub event_repo: Arc<dyn EventRepository>,
    pub permission_service: Arc<PermissionService>,
    pub user_service: Arc<UserService>,
    pub club_service: Arc<ClubService>,
    pub membership_service: Arc<MembershipService>,
    pub event_service: Arc<EventService>,
    pub recommendation_service: Arc<RecommendationService>,
    pub dashboard_service: Arc<DashboardService>,
    pub clock: Arc<dyn Clock>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(db_pool: SqlitePool, clock: Arc<dyn Clock>, settings: &Settings) -> Self {
        // Repositories
        let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(db_pool.clone()));
        let club_repo: Arc<dyn ClubRepository> = Arc::new(SqliteClubRepository::new(db_pool.clone()));
        let membership_repo: Arc<dyn MembershipRepository> =
            Arc::new(SqliteMembershipRepository::new(db_pool.clone()));
        let event_repo: Arc<dyn EventRepository> = Arc::new(SqliteEventRepository::new(db_pool.clone()));

        // Services
        let permission_service = Arc::new(PermissionService::new(membership_repo.clone()));
        let user_service = Arc::new(UserService::new(
            user_repo.clone(),
            membership_repo.clone(),
            event_repo.clone(),
            permission_service.clone(),
            clock.clone(),
        ));
        let club_service = Arc::new(ClubService::new(
            club_repo.clone(),
            membership_repo.clone(),
            user_repo.clone(),
            permission_service.clone(),
            clock.clone(),
        ));
        let membership_service = Arc::new(MembershipService::new(
            membership_repo.clone(),
            club_repo.clone(),
            permission_service.clone(),
            clock.clone(),
        ));
        let event_service = Arc::new(EventService::new(
            event_repo.clone(),
            club_repo.clone(),
            permission_service.clone(),
            clock.clone(),
        ));
        let recommendation_service = Arc::new(RecommendationService::new(
            club_repo.clone(),
            event_repo.clone(),
            clock.clone(),
            settings.recommendations.limit,
        ));
        let dashboard_service = Arc::new(DashboardService::new(
            club_service.clone(),
            event_service.clone(),
            recommendation_service.clone(),
        ));

        Self {
            user_repo,
            club_repo,
            membership_repo,
            event_repo,
            permission_service,
            user_service,
            club_service,
            membership_service,
            event_service,
            recommendation_service,
            dashboard_service,
            clock,
            db_pool,
        }
    }
}
