//! Page-level translation behavior: defaults, ordering, and totality over
//! arbitrary query strings.

use proptest::prelude::*;
use rumors_core::filter::{Condition, MAX_KEYWORD_LENGTH};
use rumors_core::order::OrderField;
use rumors_core::page::PageKind;
use rumors_core::{QueryParams, translate};
use serde_json::json;

#[test]
fn empty_params_give_no_filter_and_default_order() {
    let vars = translate(&QueryParams::new(), None, &PageKind::Articles.config());
    assert!(vars.filter.is_none());
    assert_eq!(
        serde_json::to_value(&vars).expect("serialize"),
        json!({ "orderBy": [{ "lastRequestedAt": "DESC" }] })
    );
}

#[test]
fn documented_example_translates_exactly() {
    let params: QueryParams = [
        ("filters", "askedManyTimes,repliedByMe"),
        ("categoryIds", "1,2"),
    ]
    .into_iter()
    .collect();
    let vars = translate(&params, Some("u1"), &PageKind::Articles.config());
    assert_eq!(
        serde_json::to_value(vars.filter).expect("serialize"),
        json!({
            "replyRequestCount": { "GTE": 2 },
            "articleRepliesFrom": { "userId": "u1", "exists": true },
            "categoryIds": ["1", "2"],
        })
    );
}

#[test]
fn order_outside_allow_list_falls_back_to_default() {
    let params = QueryParams::parse("orderBy=createdAt");
    let articles = translate(&params, None, &PageKind::Articles.config());
    assert_eq!(articles.order_by.field(), OrderField::LastRequestedAt);

    let search = translate(&params, None, &PageKind::Search.config());
    assert_eq!(search.order_by.field(), OrderField::CreatedAt);

    let unknown = translate(&QueryParams::parse("orderBy=DROP"), None, &PageKind::Replies.config());
    assert_eq!(unknown.order_by.field(), OrderField::LastRepliedAt);
}

#[test]
fn page_default_filters_apply_until_url_overrides() {
    let page = PageKind::HoaxForYou.config();
    let defaulted = translate(&QueryParams::new(), None, &page);
    assert_eq!(
        serde_json::to_value(defaulted.filter).expect("serialize"),
        json!({ "hasArticleReplyWithMorePositiveFeedback": false })
    );

    let cleared = translate(&QueryParams::parse("filters="), None, &page);
    assert!(cleared.filter.is_none());
}

#[test]
fn replies_page_time_range_uses_reply_time() {
    let vars = translate(
        &QueryParams::parse("start=2021-01-01&end=2021-02-01"),
        None,
        &PageKind::Replies.config(),
    );
    let filter = vars.filter.expect("filter");
    assert_eq!(filter.len(), 1);
    assert!(filter.get("repliedAt").is_some());
    assert!(filter.get("createdAt").is_none());
}

proptest! {
    #[test]
    fn translate_is_total(query in ".{0,300}", user in proptest::option::of("[a-z0-9]{0,8}")) {
        for kind in PageKind::ALL {
            let vars = translate(&QueryParams::parse(&query), user.as_deref(), &kind.config());
            if let Some(filter) = &vars.filter {
                prop_assert!(!filter.is_empty());
            }
            prop_assert!(kind.config().allows_order(vars.order_by.field()));
        }
    }

    #[test]
    fn keyword_is_prefix_of_at_most_limit(q in "\\PC{1,250}") {
        let mut params = QueryParams::new();
        params.set("q", q.clone());
        let vars = translate(&params, None, &PageKind::Search.config());
        let filter = vars.filter.expect("non-empty q sets a condition");
        let Some(Condition::MoreLikeThis { like, minimum_should_match }) = filter.get("moreLikeThis") else {
            panic!("moreLikeThis missing");
        };
        let expected: String = q.chars().take(MAX_KEYWORD_LENGTH).collect();
        prop_assert_eq!(like, &expected);
        prop_assert_eq!(minimum_should_match.as_str(), "0");
    }

    #[test]
    fn replied_by_me_without_user_adds_nothing(extra in proptest::collection::vec("[A-Za-z_]{1,20}", 0..4)) {
        let mut tags = extra.clone();
        tags.push("REPLIED_BY_ME".to_string());
        let mut params = QueryParams::new();
        params.set("filters", tags.join(","));

        let without = translate(&params, None, &PageKind::Articles.config());
        prop_assert!(without
            .filter
            .as_ref()
            .is_none_or(|f| f.get("articleRepliesFrom").is_none()));

        let with = translate(&params, Some("u7"), &PageKind::Articles.config());
        let filter = with.filter.expect("user enables the condition");
        prop_assert_eq!(
            filter.get("articleRepliesFrom"),
            Some(&Condition::RepliesFrom { user_id: "u7".into(), exists: true })
        );
    }
}
