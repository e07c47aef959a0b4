//! Diesel models representing members and their joined projections.

use diesel::prelude::*;

use crate::domain::member::{
    Member as DomainMember, MemberSummary as DomainMemberSummary,
    MemberTeam as DomainMemberTeam, NewMember as DomainNewMember,
};
use crate::domain::types::{Age, MemberId, TeamId, TeamName, TypeConstraintError, Username};
use crate::models::team::Team;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::members)]
#[diesel(belongs_to(Team, foreign_key = team_id))]
/// Diesel model for [`crate::domain::member::Member`].
pub struct Member {
    pub id: i32,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<i32>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::members)]
/// Insertable form of [`Member`].
pub struct NewMember<'a> {
    pub username: Option<&'a str>,
    pub age: i32,
    pub team_id: Option<i32>,
}

/// Row selected by the member search: member columns followed by the
/// nullable columns of the left-joined team.
#[derive(Debug, Clone, Queryable)]
pub struct MemberTeamRow {
    pub member_id: i32,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<i32>,
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, Queryable)]
pub struct MemberSummaryRow {
    pub username: Option<String>,
    pub age: i32,
}

fn username_from_db(username: Option<String>) -> Result<Option<Username>, TypeConstraintError> {
    username.map(Username::new).transpose()
}

impl TryFrom<Member> for DomainMember {
    type Error = TypeConstraintError;

    fn try_from(member: Member) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MemberId::try_from(member.id)?,
            username: username_from_db(member.username)?,
            age: Age::try_from(member.age)?,
            team_id: member.team_id.map(TeamId::try_from).transpose()?,
        })
    }
}

impl TryFrom<MemberTeamRow> for DomainMemberTeam {
    type Error = TypeConstraintError;

    fn try_from(row: MemberTeamRow) -> Result<Self, Self::Error> {
        Ok(Self {
            member_id: MemberId::try_from(row.member_id)?,
            username: username_from_db(row.username)?,
            age: Age::try_from(row.age)?,
            team_id: row.team_id.map(TeamId::try_from).transpose()?,
            team_name: row.team_name.map(TeamName::new).transpose()?,
        })
    }
}

impl TryFrom<MemberSummaryRow> for DomainMemberSummary {
    type Error = TypeConstraintError;

    fn try_from(row: MemberSummaryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            username: username_from_db(row.username)?,
            age: Age::try_from(row.age)?,
        })
    }
}

impl<'a> From<&'a DomainNewMember> for NewMember<'a> {
    fn from(member: &'a DomainNewMember) -> Self {
        Self {
            username: member.username.as_deref(),
            age: member.age.get(),
            team_id: member.team_id.map(TeamId::get),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_domain_newmember() {
        let domain = DomainNewMember::new(
            Some(Username::new("member1").expect("valid username")),
            Age::new(10).expect("valid age"),
            Some(TeamId::new(3).expect("valid team id")),
        );
        let new: NewMember = (&domain).into();
        assert_eq!(new.username, Some("member1"));
        assert_eq!(new.age, 10);
        assert_eq!(new.team_id, Some(3));
    }

    #[test]
    fn member_team_row_without_team_maps_to_none() {
        let row = MemberTeamRow {
            member_id: 5,
            username: None,
            age: 100,
            team_id: None,
            team_name: None,
        };
        let domain = DomainMemberTeam::try_from(row).expect("valid row");
        assert_eq!(domain.member_id.get(), 5);
        assert!(domain.username.is_none());
        assert_eq!(domain.age.get(), 100);
        assert!(domain.team_id.is_none());
        assert!(domain.team_name.is_none());
    }

    #[test]
    fn member_into_domain_rejects_negative_age() {
        let db = Member {
            id: 1,
            username: Some("member1".into()),
            age: -1,
            team_id: None,
        };
        assert_eq!(
            DomainMember::try_from(db),
            Err(TypeConstraintError::NegativeAge)
        );
    }
}
