//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::member::{
    AgeStats, Member, MemberSummary, MemberTeam, NewMember, TeamAgeAverage,
};
use crate::domain::team::{NewTeam, Team};
use crate::domain::types::{Age, MemberId, TeamId, TeamName, Username};
use crate::pagination::{Page, PageRequest};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    MemberReader, MemberSearchCondition, MemberWriter, TeamReader, TeamWriter,
};

mock! {
    pub Repository {}

    impl TeamReader for Repository {
        fn get_team_by_id(&self, id: TeamId) -> RepositoryResult<Option<Team>>;
        fn list_teams(&self) -> RepositoryResult<Vec<Team>>;
    }

    impl TeamWriter for Repository {
        fn create_team(&self, new_team: &NewTeam) -> RepositoryResult<Team>;
        fn delete_team(&self, id: TeamId) -> RepositoryResult<()>;
    }

    impl MemberReader for Repository {
        fn get_member_by_id(&self, id: MemberId) -> RepositoryResult<Option<Member>>;
        fn find_members_by_username(&self, username: &Username) -> RepositoryResult<Vec<Member>>;
        fn get_member_with_team(
            &self,
            id: MemberId,
        ) -> RepositoryResult<Option<(Member, Option<Team>)>>;
        fn list_members_of_team(&self, team_name: &TeamName) -> RepositoryResult<Vec<Member>>;
        fn list_members_ordered(&self) -> RepositoryResult<Vec<Member>>;
        fn list_member_summaries(&self) -> RepositoryResult<Vec<MemberSummary>>;
        fn member_age_stats(&self) -> RepositoryResult<AgeStats>;
        fn team_age_averages(&self) -> RepositoryResult<Vec<TeamAgeAverage>>;
        fn list_oldest_members(&self) -> RepositoryResult<Vec<Member>>;
        fn list_members_at_least_average_age(&self) -> RepositoryResult<Vec<Member>>;
        fn list_members_older_than(&self, age: Age) -> RepositoryResult<Vec<Member>>;
        fn list_age_labels(&self) -> RepositoryResult<Vec<String>>;
        fn list_age_bands(&self) -> RepositoryResult<Vec<String>>;
        fn list_usernames_with_constant(
            &self,
            constant: &str,
        ) -> RepositoryResult<Vec<(Option<Username>, String)>>;
        fn list_username_age_labels(&self, username: &Username) -> RepositoryResult<Vec<String>>;
        fn list_usernames_replaced(
            &self,
            from: &str,
            to: &str,
        ) -> RepositoryResult<Vec<Option<String>>>;
        fn search_members(
            &self,
            condition: &MemberSearchCondition,
        ) -> RepositoryResult<Vec<MemberTeam>>;
        fn search_members_page_simple(
            &self,
            condition: &MemberSearchCondition,
            request: PageRequest,
        ) -> RepositoryResult<Page<MemberTeam>>;
        fn search_members_page_complex(
            &self,
            condition: &MemberSearchCondition,
            request: PageRequest,
        ) -> RepositoryResult<Page<MemberTeam>>;
    }

    impl MemberWriter for Repository {
        fn create_member(&self, new_member: &NewMember) -> RepositoryResult<Member>;
        fn rename_members_younger_than(
            &self,
            age: Age,
            username: &Username,
        ) -> RepositoryResult<usize>;
        fn add_to_all_ages(&self, delta: i32) -> RepositoryResult<usize>;
        fn multiply_all_ages(&self, factor: i32) -> RepositoryResult<usize>;
        fn delete_members_older_than(&self, age: Age) -> RepositoryResult<usize>;
    }
}
