use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Club {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A club together with its approved member count, as used by listings
/// and recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubWithStats {
    #[serde(flatten)]
    pub club: Club,
    pub member_count: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Technical,
    Cultural,
    Sports,
    Academic,
    #[default]
    Social,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technical => "technical",
            Category::Cultural => "cultural",
            Category::Sports => "sports",
            Category::Academic => "academic",
            Category::Social => "social",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "technical" => Ok(Category::Technical),
            "cultural" => Ok(Category::Cultural),
            "sports" => Ok(Category::Sports),
            "academic" => Ok(Category::Academic),
            "social" => Ok(Category::Social),
            _ => Err(format!("Invalid club category: {}", s)),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateClubRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub category: Category,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
pub struct UpdateClubRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub category: Option<Category>,
}

/// The permission flags a user holds on one club, for presentation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClubPermissions {
    pub club_id: Uuid,
    pub can_manage_club: bool,
    pub can_approve_members: bool,
    pub can_manage_events: bool,
    pub can_delete_club: bool,
    pub is_leader: bool,
    pub is_faculty_advisor: bool,
}
