//! Translation of a [`MemberSearchCondition`] into a Diesel filter.

use diesel::helper_types::LeftJoinQuerySource;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Nullable};
use diesel::sqlite::Sqlite;

use crate::repository::MemberSearchCondition;
use crate::schema::{members, teams};

/// Query source of the member search: members left-joined to their team.
pub type MemberTeamSource = LeftJoinQuerySource<members::table, teams::table>;

/// A single boxed filter over [`MemberTeamSource`]. Team columns are nullable
/// on the joined side, so every predicate is typed as `Nullable<Bool>`.
pub type MemberPredicate =
    Box<dyn BoxableExpression<MemberTeamSource, Sqlite, SqlType = Nullable<Bool>>>;

fn always_true() -> MemberPredicate {
    Box::new(true.into_sql::<Bool>().nullable())
}

impl MemberSearchCondition {
    /// Predicates for the populated fields only, in field order.
    pub fn predicates(&self) -> Vec<MemberPredicate> {
        let username: Option<MemberPredicate> = self
            .username
            .as_ref()
            .map(|username| Box::new(members::username.eq(username.to_string())) as _);
        let team_name: Option<MemberPredicate> = self
            .team_name
            .as_ref()
            .map(|name| Box::new(teams::name.nullable().eq(name.to_string())) as _);
        let age_goe: Option<MemberPredicate> = self
            .age_goe
            .map(|age| Box::new(members::age.ge(age).nullable()) as _);
        let age_loe: Option<MemberPredicate> = self
            .age_loe
            .map(|age| Box::new(members::age.le(age).nullable()) as _);

        [username, team_name, age_goe, age_loe]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Conjunction of [`Self::predicates`].
    ///
    /// The fold starts from `TRUE`, so an empty condition matches every row
    /// and a single populated field never needs a left-hand operand.
    pub fn to_predicate(&self) -> MemberPredicate {
        self.predicates()
            .into_iter()
            .fold(always_true(), |acc, predicate| Box::new(acc.and(predicate)))
    }
}
