use std::sync::Arc;

use crate::{
    clock::Clock,
    domain::{ClubWithStats, Event, User},
    error::Result,
    repository::{ClubRepository, EventRepository},
};

/// Read-only suggestions, recomputed on every call.
pub struct RecommendationService {
    club_repo: Arc<dyn ClubRepository>,
    event_repo: Arc<dyn EventRepository>,
    clock: Arc<dyn Clock>,
    limit: i64,
}

impl RecommendationService {
    pub fn new(
        club_repo: Arc<dyn ClubRepository>,
        event_repo: Arc<dyn EventRepository>,
        clock: Arc<dyn Clock>,
        limit: i64,
    ) -> Self {
        Self { club_repo, event_repo, clock, limit }
    }

    /// Clubs sharing a category with the user's clubs, most members first;
    /// falls back to the most-joined clubs overall.
    pub async fn recommended_clubs(&self, user: &User) -> Result<Vec<ClubWithStats>> {
        let by_interest = self.club_repo.recommend_by_category(user.id, self.limit).await?;
        if !by_interest.is_empty() {
            return Ok(by_interest);
        }
        self.club_repo.recommend_popular(user.id, self.limit).await
    }

    /// Upcoming events of the user's clubs, soonest first; falls back to
    /// the most-registered upcoming events anywhere.
    pub async fn recommended_events(&self, user: &User) -> Result<Vec<Event>> {
        let now = self.clock.now();
        let from_clubs = self.event_repo
            .recommend_from_member_clubs(user.id, now, self.limit)
            .await?;
        if !from_clubs.is_empty() {
            return Ok(from_clubs);
        }
        self.event_repo.recommend_popular(user.id, now, self.limit).await
    }
}
