//! Query parameters accepted by the member search endpoints.

use serde::Deserialize;

use crate::domain::types::{TeamName, Username};
use crate::pagination::PageRequest;
use crate::repository::MemberSearchCondition;

/// Raw query string of `/v1/members`, `/v2/members` and `/v3/members`.
///
/// Every field is optional; `page` and `size` are ignored by the unpaged
/// endpoint.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSearchParams {
    pub user_name: Option<String>,
    pub team_name: Option<String>,
    pub age_goe: Option<i32>,
    pub age_loe: Option<i32>,
    /// Zero-based page index.
    pub page: Option<usize>,
    pub size: Option<usize>,
}

impl MemberSearchParams {
    /// Builds the search condition, treating blank strings as absent filters.
    pub fn to_condition(&self) -> MemberSearchCondition {
        MemberSearchCondition {
            username: self.user_name.as_deref().and_then(|s| Username::new(s).ok()),
            team_name: self.team_name.as_deref().and_then(|s| TeamName::new(s).ok()),
            age_goe: self.age_goe,
            age_loe: self.age_loe,
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::of(self.page, self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::DEFAULT_PAGE_SIZE;

    #[test]
    fn blank_strings_are_absent() {
        let params = MemberSearchParams {
            user_name: Some("  ".into()),
            team_name: Some(String::new()),
            age_goe: Some(20),
            ..Default::default()
        };
        let condition = params.to_condition();
        assert!(condition.username.is_none());
        assert!(condition.team_name.is_none());
        assert_eq!(condition.age_goe, Some(20));
        assert!(condition.age_loe.is_none());
    }

    #[test]
    fn deserializes_camel_case_query() {
        let params: MemberSearchParams =
            serde_json::from_str(r#"{"userName":"member1","teamName":"teamA","ageLoe":30,"page":2}"#)
                .expect("valid params");
        let condition = params.to_condition();
        assert_eq!(condition.username.as_deref(), Some("member1"));
        assert_eq!(condition.team_name.as_deref(), Some("teamA"));
        assert_eq!(condition.age_loe, Some(30));
        let request = params.page_request();
        assert_eq!(request.page(), 2);
        assert_eq!(request.size(), DEFAULT_PAGE_SIZE);
    }
}
