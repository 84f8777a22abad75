//! Authorization decisions for club and event actions.
//!
//! Every decision is a pure function of the acting user's campus role and
//! the set of memberships they hold that are currently approved. Callers
//! build a fresh [`Principal`] per request; nothing here is cached.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    domain::{Membership, User},
    error::{AppError, Result},
};

/// Why an action was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Denial {
    NotClubManager,
    NotFacultyAdvisor,
    CannotCreateClub,
    CannotDeleteClub,
    ProtectedAdvisor,
    AdminOnly,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Denial::NotClubManager => "You don't have permission to manage this club.",
            Denial::NotFacultyAdvisor => "Only faculty advisors of this club can do that.",
            Denial::CannotCreateClub => "Only faculty and administrators can create clubs.",
            Denial::CannotDeleteClub => "You don't have permission to delete this club.",
            Denial::ProtectedAdvisor => "Faculty advisors cannot be removed from the club.",
            Denial::AdminOnly => "Only administrators can do that.",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied(Denial),
}

impl Access {
    fn check(allowed: bool, denial: Denial) -> Self {
        if allowed {
            Access::Allowed
        } else {
            Access::Denied(denial)
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allowed)
    }

    /// Turns a denial into `AppError::Permission`.
    pub fn require(self) -> Result<()> {
        match self {
            Access::Allowed => Ok(()),
            Access::Denied(denial) => {
                tracing::debug!(?denial, "permission denied");
                Err(AppError::Permission(denial))
            }
        }
    }
}

/// A user plus the memberships that currently grant them anything.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user: User,
    approved: Vec<Membership>,
}

impl Principal {
    /// Non-approved memberships are dropped; they carry no authority.
    pub fn new(user: User, memberships: Vec<Membership>) -> Self {
        let approved = memberships
            .into_iter()
            .filter(|m| m.user_id == user.id && m.is_active())
            .collect();
        Self { user, approved }
    }

    fn in_club(&self, club_id: Uuid) -> impl Iterator<Item = &Membership> + '_ {
        self.approved.iter().filter(move |m| m.club_id == club_id)
    }

    pub fn is_leader(&self, club_id: Uuid) -> bool {
        self.in_club(club_id).any(Membership::is_leader)
    }

    pub fn is_faculty_advisor(&self, club_id: Uuid) -> bool {
        self.in_club(club_id).any(Membership::is_faculty_advisor)
    }

    pub fn can_manage_club(&self, club_id: Uuid) -> Access {
        let allowed = self.user.is_admin()
            || (self.user.is_faculty() && self.is_faculty_advisor(club_id))
            || self.is_leader(club_id);
        Access::check(allowed, Denial::NotClubManager)
    }

    pub fn can_approve_members(&self, club_id: Uuid) -> Access {
        self.can_manage_club(club_id)
    }

    pub fn can_manage_events(&self, club_id: Uuid) -> Access {
        self.can_manage_club(club_id)
    }

    pub fn can_create_club(&self) -> Access {
        Access::check(
            self.user.is_admin() || self.user.is_faculty(),
            Denial::CannotCreateClub,
        )
    }

    pub fn can_delete_club(&self, club_id: Uuid) -> Access {
        let allowed = self.user.is_admin()
            || (self.user.is_faculty() && self.is_faculty_advisor(club_id));
        Access::check(allowed, Denial::CannotDeleteClub)
    }

    /// Event approval and leader assignment. Campus admins are not included
    /// unless they also advise the club.
    pub fn can_advise(&self, club_id: Uuid) -> Access {
        Access::check(self.is_faculty_advisor(club_id), Denial::NotFacultyAdvisor)
    }

    pub fn require_admin(&self) -> Result<()> {
        Access::check(self.user.is_admin(), Denial::AdminOnly).require()
    }
}
