//! Repository implementation for members and the member search.

use diesel::dsl::{case_when, count_star, max, min, sum};
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use diesel::sqlite::{Sqlite, SqliteConnection};

use crate::{
    domain::{
        member::{AgeStats, Member, MemberSummary, MemberTeam, NewMember, TeamAgeAverage},
        team::Team,
        types::{Age, MemberId, TeamName, Username},
    },
    models::{
        member::{Member as DbMember, MemberSummaryRow, MemberTeamRow, NewMember as DbNewMember},
        team::Team as DbTeam,
    },
    pagination::{Page, PageRequest, total_from_content},
    repository::{
        DieselRepository, MemberReader, MemberSearchCondition, MemberWriter,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::{members, teams},
};

define_sql_function! {
    /// SQLite `replace(text, from, to)`.
    fn replace(text: Nullable<Text>, from: Text, to: Text) -> Nullable<Text>;
}

pub const AGE_LABEL_TEN: &str = "ten";
pub const AGE_LABEL_TWENTY: &str = "twenty";
pub const AGE_BAND_UP_TO_20: &str = "0-20";
pub const AGE_BAND_21_TO_30: &str = "21-30";
pub const AGE_OTHER: &str = "other";

fn into_domain_members(rows: Vec<DbMember>) -> RepositoryResult<Vec<Member>> {
    rows.into_iter()
        .map(|row| Member::try_from(row).map_err(RepositoryError::from))
        .collect()
}

/// Loads the search rows ordered by member id, optionally limited to a page.
fn load_member_teams(
    conn: &mut SqliteConnection,
    condition: &MemberSearchCondition,
    page: Option<&PageRequest>,
) -> RepositoryResult<Vec<MemberTeam>> {
    let mut query = members::table
        .left_join(teams::table)
        .filter(condition.to_predicate())
        .select((
            members::id,
            members::username,
            members::age,
            members::team_id,
            teams::name.nullable(),
        ))
        .order(members::id.asc())
        .into_boxed::<Sqlite>();

    if let Some(page) = page {
        let Some(offset) = page.sql_offset() else {
            return Ok(Vec::new());
        };
        query = query.offset(offset).limit(page.size() as i64);
    }

    query
        .load::<MemberTeamRow>(conn)?
        .into_iter()
        .map(|row| MemberTeam::try_from(row).map_err(RepositoryError::from))
        .collect()
}

fn count_member_teams(
    conn: &mut SqliteConnection,
    condition: &MemberSearchCondition,
) -> RepositoryResult<usize> {
    let total = members::table
        .left_join(teams::table)
        .filter(condition.to_predicate())
        .count()
        .get_result::<i64>(conn)?;
    Ok(total as usize)
}

impl MemberReader for DieselRepository {
    fn get_member_by_id(&self, id: MemberId) -> RepositoryResult<Option<Member>> {
        let mut conn = self.conn()?;
        let db_member = members::table
            .find(id.get())
            .first::<DbMember>(&mut conn)
            .optional()?;

        match db_member {
            Some(db_member) => Ok(Some(
                Member::try_from(db_member).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn find_members_by_username(&self, username: &Username) -> RepositoryResult<Vec<Member>> {
        let mut conn = self.conn()?;
        let rows = members::table
            .filter(members::username.eq(username.as_str()))
            .order(members::id.asc())
            .load::<DbMember>(&mut conn)?;

        into_domain_members(rows)
    }

    fn get_member_with_team(
        &self,
        id: MemberId,
    ) -> RepositoryResult<Option<(Member, Option<Team>)>> {
        let mut conn = self.conn()?;
        let row = members::table
            .left_join(teams::table)
            .filter(members::id.eq(id.get()))
            .select((members::all_columns, teams::all_columns.nullable()))
            .first::<(DbMember, Option<DbTeam>)>(&mut conn)
            .optional()?;

        let Some((db_member, db_team)) = row else {
            return Ok(None);
        };

        let member = Member::try_from(db_member)?;
        let team = db_team.map(Team::try_from).transpose()?;
        Ok(Some((member, team)))
    }

    fn list_members_of_team(&self, team_name: &TeamName) -> RepositoryResult<Vec<Member>> {
        let mut conn = self.conn()?;
        let rows = members::table
            .inner_join(teams::table)
            .filter(teams::name.eq(team_name.as_str()))
            .select(members::all_columns)
            .order(members::id.asc())
            .load::<DbMember>(&mut conn)?;

        into_domain_members(rows)
    }

    fn list_members_ordered(&self) -> RepositoryResult<Vec<Member>> {
        let mut conn = self.conn()?;
        // SQLite sorts `false` before `true`, which puts missing names last.
        let rows = members::table
            .order((
                members::age.desc(),
                members::username.is_null().asc(),
                members::username.asc(),
            ))
            .load::<DbMember>(&mut conn)?;

        into_domain_members(rows)
    }

    fn list_member_summaries(&self) -> RepositoryResult<Vec<MemberSummary>> {
        let mut conn = self.conn()?;
        members::table
            .select((members::username, members::age))
            .order(members::id.asc())
            .load::<MemberSummaryRow>(&mut conn)?
            .into_iter()
            .map(|row| MemberSummary::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    fn member_age_stats(&self) -> RepositoryResult<AgeStats> {
        let mut conn = self.conn()?;
        let (count, total, oldest, youngest) = members::table
            .select((
                count_star(),
                sum(members::age),
                max(members::age),
                min(members::age),
            ))
            .first::<(i64, Option<i64>, Option<i32>, Option<i32>)>(&mut conn)?;

        let sum = total.unwrap_or(0);
        Ok(AgeStats {
            count: count as usize,
            sum,
            average: (count > 0).then(|| sum as f64 / count as f64),
            max: oldest.map(Age::try_from).transpose()?,
            min: youngest.map(Age::try_from).transpose()?,
        })
    }

    fn team_age_averages(&self) -> RepositoryResult<Vec<TeamAgeAverage>> {
        let mut conn = self.conn()?;
        let rows = members::table
            .inner_join(teams::table)
            .group_by(teams::name)
            .select((teams::name, sum(members::age), count_star()))
            .order(teams::name.asc())
            .load::<(String, Option<i64>, i64)>(&mut conn)?;

        rows.into_iter()
            .map(|(name, total, count)| -> RepositoryResult<TeamAgeAverage> {
                Ok(TeamAgeAverage {
                    team_name: TeamName::new(name)?,
                    average_age: total.unwrap_or(0) as f64 / count.max(1) as f64,
                })
            })
            .collect()
    }

    fn list_oldest_members(&self) -> RepositoryResult<Vec<Member>> {
        let members_sub = diesel::alias!(members as members_sub);

        let mut conn = self.conn()?;
        let rows = members::table
            .filter(
                members::age.nullable().eq(members_sub
                    .select(max(members_sub.field(members::age)))
                    .single_value()),
            )
            .order(members::id.asc())
            .load::<DbMember>(&mut conn)?;

        into_domain_members(rows)
    }

    fn list_members_at_least_average_age(&self) -> RepositoryResult<Vec<Member>> {
        let mut conn = self.conn()?;
        conn.transaction::<_, RepositoryError, _>(|conn| {
            let (count, total) = members::table
                .select((count_star(), sum(members::age)))
                .first::<(i64, Option<i64>)>(conn)?;
            if count == 0 {
                return Ok(Vec::new());
            }

            // Ages are integers, so `age >= avg` is `age >= ceil(avg)`.
            let total = total.unwrap_or(0);
            let threshold = (total + count - 1).div_euclid(count);
            let rows = members::table
                .filter(members::age.ge(threshold as i32))
                .order(members::id.asc())
                .load::<DbMember>(conn)?;

            into_domain_members(rows)
        })
    }

    fn list_members_older_than(&self, age: Age) -> RepositoryResult<Vec<Member>> {
        let members_sub = diesel::alias!(members as members_sub);

        let mut conn = self.conn()?;
        let rows = members::table
            .filter(
                members::age.eq_any(
                    members_sub
                        .filter(members_sub.field(members::age).gt(age.get()))
                        .select(members_sub.field(members::age)),
                ),
            )
            .order(members::id.asc())
            .load::<DbMember>(&mut conn)?;

        into_domain_members(rows)
    }

    fn list_age_labels(&self) -> RepositoryResult<Vec<String>> {
        let mut conn = self.conn()?;
        let labels = members::table
            .select(
                case_when::<_, _, Text>(members::age.eq(10), AGE_LABEL_TEN)
                    .when(members::age.eq(20), AGE_LABEL_TWENTY)
                    .otherwise(AGE_OTHER),
            )
            .order(members::id.asc())
            .load::<String>(&mut conn)?;
        Ok(labels)
    }

    fn list_age_bands(&self) -> RepositoryResult<Vec<String>> {
        let mut conn = self.conn()?;
        let bands = members::table
            .select(
                case_when::<_, _, Text>(members::age.between(0, 20), AGE_BAND_UP_TO_20)
                    .when(members::age.between(21, 30), AGE_BAND_21_TO_30)
                    .otherwise(AGE_OTHER),
            )
            .order(members::id.asc())
            .load::<String>(&mut conn)?;
        Ok(bands)
    }

    fn list_usernames_with_constant(
        &self,
        constant: &str,
    ) -> RepositoryResult<Vec<(Option<Username>, String)>> {
        let mut conn = self.conn()?;
        let rows = members::table
            .select((members::username, constant.into_sql::<Text>()))
            .order(members::id.asc())
            .load::<(Option<String>, String)>(&mut conn)?;

        rows.into_iter()
            .map(|(username, value)| -> RepositoryResult<(Option<Username>, String)> {
                Ok((username.map(Username::new).transpose()?, value))
            })
            .collect()
    }

    fn list_username_age_labels(&self, username: &Username) -> RepositoryResult<Vec<String>> {
        let mut conn = self.conn()?;
        let labels = members::table
            .filter(members::username.eq(username.as_str()))
            .select(
                members::username
                    .concat("_")
                    .concat(members::age.cast::<Text>().nullable()),
            )
            .order(members::id.asc())
            .load::<Option<String>>(&mut conn)?;
        Ok(labels.into_iter().flatten().collect())
    }

    fn list_usernames_replaced(
        &self,
        from: &str,
        to: &str,
    ) -> RepositoryResult<Vec<Option<String>>> {
        let mut conn = self.conn()?;
        let names = members::table
            .select(replace(members::username, from, to))
            .order(members::id.asc())
            .load::<Option<String>>(&mut conn)?;
        Ok(names)
    }

    fn search_members(
        &self,
        condition: &MemberSearchCondition,
    ) -> RepositoryResult<Vec<MemberTeam>> {
        let mut conn = self.conn()?;
        load_member_teams(&mut conn, condition, None)
    }

    fn search_members_page_simple(
        &self,
        condition: &MemberSearchCondition,
        request: PageRequest,
    ) -> RepositoryResult<Page<MemberTeam>> {
        let mut conn = self.conn()?;
        conn.transaction::<_, RepositoryError, _>(|conn| {
            let content = load_member_teams(conn, condition, Some(&request))?;
            let total = count_member_teams(conn, condition)?;
            Ok(Page::new(content, request, total))
        })
    }

    fn search_members_page_complex(
        &self,
        condition: &MemberSearchCondition,
        request: PageRequest,
    ) -> RepositoryResult<Page<MemberTeam>> {
        let mut conn = self.conn()?;
        conn.transaction::<_, RepositoryError, _>(|conn| {
            let content = load_member_teams(conn, condition, Some(&request))?;
            let total = total_from_content(&request, content.len(), || {
                log::debug!("Page {} is not provably complete, counting", request.page());
                count_member_teams(conn, condition)
            })?;
            Ok(Page::new(content, request, total))
        })
    }
}

impl MemberWriter for DieselRepository {
    fn create_member(&self, new_member: &NewMember) -> RepositoryResult<Member> {
        let mut conn = self.conn()?;

        let db_new_member: DbNewMember = new_member.into();

        let db_member = diesel::insert_into(members::table)
            .values(&db_new_member)
            .get_result::<DbMember>(&mut conn)?;

        let member = Member::try_from(db_member).map_err(RepositoryError::from)?;
        Ok(member)
    }

    fn rename_members_younger_than(
        &self,
        age: Age,
        username: &Username,
    ) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let affected = diesel::update(members::table.filter(members::age.lt(age.get())))
            .set(members::username.eq(username.as_str()))
            .execute(&mut conn)?;
        Ok(affected)
    }

    fn add_to_all_ages(&self, delta: i32) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let affected = diesel::update(members::table)
            .set(members::age.eq(members::age + delta))
            .execute(&mut conn)?;
        Ok(affected)
    }

    fn multiply_all_ages(&self, factor: i32) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let affected = diesel::update(members::table)
            .set(members::age.eq(members::age * factor))
            .execute(&mut conn)?;
        Ok(affected)
    }

    fn delete_members_older_than(&self, age: Age) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let affected = diesel::delete(members::table.filter(members::age.gt(age.get())))
            .execute(&mut conn)?;
        Ok(affected)
    }
}
