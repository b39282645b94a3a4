use serde::Serialize;

use crate::filter::FilterSpec;
use crate::order::OrderSpec;

/// Variables of the `ListArticles` queries.
///
/// `filter` and `after` are left out of the JSON when absent; the server
/// treats a missing filter differently from an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQueryVars {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterSpec>,
    pub order_by: OrderSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

impl ListQueryVars {
    #[must_use]
    pub const fn new(filter: Option<FilterSpec>, order_by: OrderSpec) -> Self {
        Self {
            filter,
            order_by,
            after: None,
        }
    }

    /// Same filter and order, continuing after `cursor`.
    #[must_use]
    pub fn continue_after(&self, cursor: impl Into<String>) -> Self {
        Self {
            after: Some(cursor.into()),
            ..self.clone()
        }
    }

    /// Same filter and order, starting from the first page.
    #[must_use]
    pub fn first_page(&self) -> Self {
        Self {
            after: None,
            ..self.clone()
        }
    }

    /// Whether both describe the same list (filter and order), ignoring the cursor.
    #[must_use]
    pub fn same_list(&self, other: &Self) -> bool {
        self.filter == other.filter && self.order_by == other.order_by
    }

    /// Stable key of the list these variables select, ignoring the cursor.
    #[must_use]
    pub fn list_key(&self) -> String {
        serde_json::to_string(&self.first_page()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::TimeRangeKey;
    use crate::filter::build_filter;
    use crate::order::{OrderField, OrderSpec};
    use crate::params::QueryParams;
    use serde_json::json;

    #[test]
    fn absent_filter_and_cursor_are_omitted() {
        let vars = ListQueryVars::new(None, OrderSpec::desc(OrderField::LastRequestedAt));
        assert_eq!(
            serde_json::to_value(&vars).expect("serialize"),
            json!({ "orderBy": [{ "lastRequestedAt": "DESC" }] })
        );
    }

    #[test]
    fn after_keeps_list_identity() {
        let filter = build_filter(
            &QueryParams::parse("filters=ASKED_MANY_TIMES"),
            None,
            TimeRangeKey::CreatedAt,
        );
        let vars = ListQueryVars::new(filter, OrderSpec::desc(OrderField::ReplyRequestCount));
        let next = vars.continue_after("cursor-25");

        assert_eq!(next.after.as_deref(), Some("cursor-25"));
        assert!(vars.same_list(&next));
        assert_eq!(vars.list_key(), next.list_key());
        assert_eq!(
            serde_json::to_value(&next).expect("serialize")["after"],
            json!("cursor-25")
        );
    }

    #[test]
    fn different_order_is_a_different_list() {
        let a = ListQueryVars::new(None, OrderSpec::desc(OrderField::LastRequestedAt));
        let b = ListQueryVars::new(None, OrderSpec::desc(OrderField::LastRepliedAt));
        assert!(!a.same_list(&b));
        assert_ne!(a.list_key(), b.list_key());
    }
}
