use serde::{Deserialize, Serialize};

use crate::domain::types::{Age, MemberId, TeamId, TeamName, Username};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Member {
    pub id: MemberId,
    /// Members may be stored without a user name.
    pub username: Option<Username>,
    pub age: Age,
    pub team_id: Option<TeamId>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewMember {
    pub username: Option<Username>,
    pub age: Age,
    pub team_id: Option<TeamId>,
}

impl NewMember {
    #[must_use]
    pub fn new(username: Option<Username>, age: Age, team_id: Option<TeamId>) -> Self {
        Self {
            username,
            age,
            team_id,
        }
    }
}

/// Read-only projection of a member joined with its team.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberTeam {
    pub member_id: MemberId,
    pub username: Option<Username>,
    pub age: Age,
    pub team_id: Option<TeamId>,
    pub team_name: Option<TeamName>,
}

/// User name and age of a member without its identity.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MemberSummary {
    pub username: Option<Username>,
    pub age: Age,
}

/// Aggregates computed over the ages of all members.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AgeStats {
    pub count: usize,
    pub sum: i64,
    /// `None` when there are no members.
    pub average: Option<f64>,
    pub max: Option<Age>,
    pub min: Option<Age>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TeamAgeAverage {
    pub team_name: TeamName,
    pub average_age: f64,
}
