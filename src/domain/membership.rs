use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Club;

/// The relationship between one user and one club. At most one exists per
/// (user, club) pair; the store enforces that with a unique constraint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Membership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub club_id: Uuid,
    pub role: MembershipRole,
    pub status: ApprovalStatus,
    pub joined_at: DateTime<Utc>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl Membership {
    pub fn is_active(&self) -> bool {
        self.status == ApprovalStatus::Approved
    }

    pub fn is_leader(&self) -> bool {
        self.role == MembershipRole::Leader && self.is_active()
    }

    pub fn is_faculty_advisor(&self) -> bool {
        self.role == MembershipRole::FacultyAdvisor && self.is_active()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MembershipRole {
    Member,
    Leader,
    FacultyAdvisor,
}

impl MembershipRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipRole::Member => "member",
            MembershipRole::Leader => "leader",
            MembershipRole::FacultyAdvisor => "faculty_advisor",
        }
    }
}

impl FromStr for MembershipRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(MembershipRole::Member),
            "leader" => Ok(MembershipRole::Leader),
            "faculty_advisor" => Ok(MembershipRole::FacultyAdvisor),
            _ => Err(format!("Invalid membership role: {}", s)),
        }
    }
}

impl fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approval lifecycle shared by memberships and events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            _ => Err(format!("Invalid approval status: {}", s)),
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A membership joined with the member's display fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipWithUser {
    #[serde(flatten)]
    pub membership: Membership,
    pub username: String,
    pub full_name: String,
}

/// A membership joined with its club, for profile pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipWithClub {
    #[serde(flatten)]
    pub membership: Membership,
    pub club: Club,
}

/// Result of `request_join`. Only `Requested` and `Resubmitted` change state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome", content = "membership")]
pub enum JoinOutcome {
    Requested(Membership),
    Resubmitted(Membership),
    AlreadyPending(Membership),
    AlreadyMember(Membership),
}

impl JoinOutcome {
    pub fn membership(&self) -> &Membership {
        match self {
            JoinOutcome::Requested(m)
            | JoinOutcome::Resubmitted(m)
            | JoinOutcome::AlreadyPending(m)
            | JoinOutcome::AlreadyMember(m) => m,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            JoinOutcome::Requested(_) | JoinOutcome::Resubmitted(_) => {
                "Your membership request has been submitted."
            }
            JoinOutcome::AlreadyPending(_) => "Your membership request is still pending.",
            JoinOutcome::AlreadyMember(_) => "You are already a member of this club.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveOutcome {
    Left,
    NotAMember,
}

impl LeaveOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            LeaveOutcome::Left => "You have left the club.",
            LeaveOutcome::NotAMember => "You are not a member of this club.",
        }
    }
}
