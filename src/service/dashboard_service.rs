use std::sync::Arc;
use serde::Serialize;

use crate::{
    domain::{Club, ClubWithStats, Event, User},
    error::Result,
    service::{club_service::ClubService, event_service::EventService, recommendation_service::RecommendationService},
};

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub clubs: Vec<Club>,
    pub upcoming_events: Vec<Event>,
    pub recommended_clubs: Vec<ClubWithStats>,
    pub recommended_events: Vec<Event>,
}

pub struct DashboardService {
    clubs: Arc<ClubService>,
    events: Arc<EventService>,
    recommendations: Arc<RecommendationService>,
}

impl DashboardService {
    pub fn new(
        clubs: Arc<ClubService>,
        events: Arc<EventService>,
        recommendations: Arc<RecommendationService>,
    ) -> Self {
        Self { clubs, events, recommendations }
    }

    pub async fn dashboard(&self, user: &User) -> Result<Dashboard> {
        let (clubs, upcoming_events, recommended_clubs, recommended_events) = tokio::join!(
            self.clubs.my_clubs(user),
            self.events.registered_upcoming(user),
            self.recommendations.recommended_clubs(user),
            self.recommendations.recommended_events(user),
        );

        Ok(Dashboard {
            clubs: clubs?,
            upcoming_events: upcoming_events?,
            recommended_clubs: recommended_clubs?,
            recommended_events: recommended_events?,
        })
    }
}
