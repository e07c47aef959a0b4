use crate::{
    db::{DbConnection, DbPool, get_connection},
    domain::{
        member::{AgeStats, Member, MemberSummary, MemberTeam, NewMember, TeamAgeAverage},
        team::{NewTeam, Team},
        types::{Age, MemberId, TeamId, TeamName, Username},
    },
    pagination::{Page, PageRequest},
    repository::errors::RepositoryResult,
};

pub mod condition;
pub mod errors;
pub mod member;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod team;

/// Diesel-backed repository shared by all request handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Checks a connection out of the pool; it returns to the pool on drop.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

/// Optional filters applied by the member search.
///
/// Every field left as `None` is skipped entirely; a condition with no fields
/// set matches every member.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberSearchCondition {
    pub username: Option<Username>,
    pub team_name: Option<TeamName>,
    /// Inclusive lower bound on age.
    pub age_goe: Option<i32>,
    /// Inclusive upper bound on age.
    pub age_loe: Option<i32>,
}

impl MemberSearchCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, username: Username) -> Self {
        self.username = Some(username);
        self
    }

    pub fn team_name(mut self, team_name: TeamName) -> Self {
        self.team_name = Some(team_name);
        self
    }

    pub fn age_goe(mut self, age: i32) -> Self {
        self.age_goe = Some(age);
        self
    }

    pub fn age_loe(mut self, age: i32) -> Self {
        self.age_loe = Some(age);
        self
    }
}

pub trait TeamReader {
    fn get_team_by_id(&self, id: TeamId) -> RepositoryResult<Option<Team>>;
    fn list_teams(&self) -> RepositoryResult<Vec<Team>>;
}

pub trait TeamWriter {
    fn create_team(&self, new_team: &NewTeam) -> RepositoryResult<Team>;
    /// Removes the team; its members stay and lose their team reference.
    fn delete_team(&self, id: TeamId) -> RepositoryResult<()>;
}

pub trait MemberReader {
    fn get_member_by_id(&self, id: MemberId) -> RepositoryResult<Option<Member>>;
    fn find_members_by_username(&self, username: &Username) -> RepositoryResult<Vec<Member>>;
    /// Loads the member and its team with a single joined query.
    fn get_member_with_team(&self, id: MemberId)
    -> RepositoryResult<Option<(Member, Option<Team>)>>;
    fn list_members_of_team(&self, team_name: &TeamName) -> RepositoryResult<Vec<Member>>;
    /// All members by age descending, then user name ascending with missing
    /// names last.
    fn list_members_ordered(&self) -> RepositoryResult<Vec<Member>>;
    fn list_member_summaries(&self) -> RepositoryResult<Vec<MemberSummary>>;
    fn member_age_stats(&self) -> RepositoryResult<AgeStats>;
    fn team_age_averages(&self) -> RepositoryResult<Vec<TeamAgeAverage>>;
    fn list_oldest_members(&self) -> RepositoryResult<Vec<Member>>;
    fn list_members_at_least_average_age(&self) -> RepositoryResult<Vec<Member>>;
    fn list_members_older_than(&self, age: Age) -> RepositoryResult<Vec<Member>>;

    /// `CASE age WHEN 10 .. WHEN 20 .. ELSE ..` label per member, by id.
    fn list_age_labels(&self) -> RepositoryResult<Vec<String>>;
    /// `CASE WHEN age BETWEEN ..` band per member, by id.
    fn list_age_bands(&self) -> RepositoryResult<Vec<String>>;
    fn list_usernames_with_constant(
        &self,
        constant: &str,
    ) -> RepositoryResult<Vec<(Option<Username>, String)>>;
    /// `username || '_' || age` for members with the given name.
    fn list_username_age_labels(&self, username: &Username) -> RepositoryResult<Vec<String>>;
    /// SQL `replace(username, from, to)` per member, by id.
    fn list_usernames_replaced(&self, from: &str, to: &str)
    -> RepositoryResult<Vec<Option<String>>>;

    fn search_members(
        &self,
        condition: &MemberSearchCondition,
    ) -> RepositoryResult<Vec<MemberTeam>>;
    /// Pages through the search results, always issuing a count query.
    fn search_members_page_simple(
        &self,
        condition: &MemberSearchCondition,
        request: PageRequest,
    ) -> RepositoryResult<Page<MemberTeam>>;
    /// Pages through the search results, skipping the count query when the
    /// first page already holds every match.
    fn search_members_page_complex(
        &self,
        condition: &MemberSearchCondition,
        request: PageRequest,
    ) -> RepositoryResult<Page<MemberTeam>>;
}

pub trait MemberWriter {
    fn create_member(&self, new_member: &NewMember) -> RepositoryResult<Member>;
    fn rename_members_younger_than(&self, age: Age, username: &Username)
    -> RepositoryResult<usize>;
    fn add_to_all_ages(&self, delta: i32) -> RepositoryResult<usize>;
    fn multiply_all_ages(&self, factor: i32) -> RepositoryResult<usize>;
    fn delete_members_older_than(&self, age: Age) -> RepositoryResult<usize>;
}
