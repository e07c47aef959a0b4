//! Member search services backing the `/v1`, `/v2` and `/v3` endpoints.

use crate::domain::member::MemberTeam;
use crate::domain::types::MemberId;
use crate::dto::members::MemberSearchParams;
use crate::pagination::Page;
use crate::repository::MemberReader;
use crate::services::{ServiceError, ServiceResult};

/// How the total number of matches is obtained for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStrategy {
    /// Always run a separate count query.
    Simple,
    /// Skip the count query when the first page is already short.
    Optimized,
}

/// Returns every member matching the populated filters.
pub fn search_members<R>(repo: &R, params: &MemberSearchParams) -> ServiceResult<Vec<MemberTeam>>
where
    R: MemberReader + ?Sized,
{
    let condition = params.to_condition();
    let rows = repo.search_members(&condition)?;
    Ok(rows)
}

/// Looks up a single member together with its team.
///
/// A non-positive id is a [`ServiceError::TypeConstraint`]; an unknown one
/// is [`ServiceError::NotFound`].
pub fn get_member<R>(repo: &R, member_id: i32) -> ServiceResult<MemberTeam>
where
    R: MemberReader + ?Sized,
{
    let member_id = MemberId::new(member_id)?;
    let (member, team) = repo
        .get_member_with_team(member_id)?
        .ok_or(ServiceError::NotFound)?;

    Ok(MemberTeam {
        member_id: member.id,
        username: member.username,
        age: member.age,
        team_id: member.team_id,
        team_name: team.map(|team| team.name),
    })
}

/// Returns one page of members matching the populated filters.
pub fn search_members_page<R>(
    repo: &R,
    params: &MemberSearchParams,
    strategy: PageStrategy,
) -> ServiceResult<Page<MemberTeam>>
where
    R: MemberReader + ?Sized,
{
    let condition = params.to_condition();
    let request = params.page_request();

    let page = match strategy {
        PageStrategy::Simple => repo.search_members_page_simple(&condition, request)?,
        PageStrategy::Optimized => repo.search_members_page_complex(&condition, request)?,
    };

    log::debug!(
        "Member search page {} returned {} of {} rows",
        page.number,
        page.number_of_elements,
        page.total_elements
    );

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::member::Member;
    use crate::domain::team::Team;
    use crate::domain::types::{Age, TeamId, TeamName, Username};
    use crate::pagination::PageRequest;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    fn row(id: i32, username: &str, age: i32, team: &str) -> MemberTeam {
        MemberTeam {
            member_id: MemberId::new(id).expect("valid id"),
            username: Some(Username::new(username).expect("valid username")),
            age: Age::new(age).expect("valid age"),
            team_id: Some(TeamId::new(1).expect("valid team id")),
            team_name: Some(TeamName::new(team).expect("valid team name")),
        }
    }

    #[test]
    fn unpaged_search_drops_blank_filters() {
        let mut repo = MockRepository::new();
        repo.expect_search_members()
            .withf(|condition| {
                condition.username.is_none()
                    && condition.team_name.as_deref() == Some("teamB")
                    && condition.age_goe == Some(35)
                    && condition.age_loe.is_none()
            })
            .times(1)
            .returning(|_| Ok(vec![row(4, "member4", 40, "teamB")]));

        let params = MemberSearchParams {
            user_name: Some(" ".into()),
            team_name: Some("teamB".into()),
            age_goe: Some(35),
            ..Default::default()
        };

        let rows = search_members(&repo, &params).expect("should search");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].member_id.get(), 4);
    }

    #[test]
    fn simple_strategy_uses_count_query_path() {
        let mut repo = MockRepository::new();
        repo.expect_search_members_page_complex().times(0);
        repo.expect_search_members_page_simple()
            .withf(|_, request| request.page() == 1 && request.size() == 2)
            .times(1)
            .returning(|_, request| {
                Ok(Page::new(
                    vec![row(3, "member3", 30, "teamB"), row(4, "member4", 40, "teamB")],
                    request,
                    4,
                ))
            });

        let params = MemberSearchParams {
            page: Some(1),
            size: Some(2),
            ..Default::default()
        };

        let page =
            search_members_page(&repo, &params, PageStrategy::Simple).expect("should page");
        assert_eq!(page.total_elements, 4);
        assert!(page.last);
    }

    #[test]
    fn optimized_strategy_uses_complex_path() {
        let mut repo = MockRepository::new();
        repo.expect_search_members_page_simple().times(0);
        repo.expect_search_members_page_complex()
            .withf(|_, request| *request == PageRequest::new(0, 20))
            .times(1)
            .returning(|_, request| Ok(Page::new(vec![], request, 0)));

        let page = search_members_page(&repo, &MemberSearchParams::default(), PageStrategy::Optimized)
            .expect("should page");
        assert!(page.empty);
    }

    #[test]
    fn repository_failures_propagate() {
        let mut repo = MockRepository::new();
        repo.expect_search_members()
            .returning(|_| Err(RepositoryError::ConnectionError("pool exhausted".into())));

        let result = search_members(&repo, &MemberSearchParams::default());
        assert!(matches!(result, Err(ServiceError::Repository(_))));
    }

    #[test]
    fn get_member_joins_team_name() {
        let mut repo = MockRepository::new();
        repo.expect_get_member_with_team()
            .withf(|id| id.get() == 3)
            .times(1)
            .returning(|id| {
                let team_id = TeamId::new(2).unwrap();
                Ok(Some((
                    Member {
                        id,
                        username: Some(Username::new("member3").unwrap()),
                        age: Age::new(30).unwrap(),
                        team_id: Some(team_id),
                    },
                    Some(Team {
                        id: team_id,
                        name: TeamName::new("teamB").unwrap(),
                    }),
                )))
            });

        let member = get_member(&repo, 3).expect("member exists");
        assert_eq!(member.member_id.get(), 3);
        assert_eq!(member.team_name.as_deref(), Some("teamB"));
    }

    #[test]
    fn get_member_rejects_non_positive_id() {
        let mut repo = MockRepository::new();
        repo.expect_get_member_with_team().times(0);

        let result = get_member(&repo, 0);
        assert!(matches!(result, Err(ServiceError::TypeConstraint(_))));
    }

    #[test]
    fn get_member_unknown_id_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_member_with_team()
            .times(1)
            .returning(|_| Ok(None));

        let result = get_member(&repo, 42);
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
