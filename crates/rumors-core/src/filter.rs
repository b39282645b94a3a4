//! Query-param → `ListArticleFilter` translation.
//!
//! [`translate`] is total over arbitrary input: unknown tags, empty values
//! and repeated keys are dropped, never reported. Page URLs are hand-edited
//! and shared, and a bad one must still render a list.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::order::{OrderField, OrderSpec};
use crate::page::PageConfig;
use crate::params::QueryParams;
use crate::vars::ListQueryVars;

/// Longest free-text query sent as a `moreLikeThis` condition, in characters.
pub const MAX_KEYWORD_LENGTH: usize = 100;

/// URL parameter names read by the translator.
pub mod keys {
    pub const FILTERS: &str = "filters";
    pub const Q: &str = "q";
    pub const CATEGORY_IDS: &str = "categoryIds";
    pub const START: &str = "start";
    pub const END: &str = "end";
    pub const TYPES: &str = "types";
    pub const ARTICLE_TYPES: &str = "articleTypes";
    pub const ORDER_BY: &str = "orderBy";
}

// ---------------------------------------------------------------------------
// Status filters
// ---------------------------------------------------------------------------

/// Tags accepted in the `filters` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    RepliedByMe,
    NoUsefulReplyYet,
    AskedManyTimes,
    RepliedManyTimes,
}

impl StatusFilter {
    pub const ALL: [Self; 4] = [
        Self::RepliedByMe,
        Self::NoUsefulReplyYet,
        Self::AskedManyTimes,
        Self::RepliedManyTimes,
    ];

    /// Canonical tag as written into URLs.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::RepliedByMe => "REPLIED_BY_ME",
            Self::NoUsefulReplyYet => "NO_USEFUL_REPLY_YET",
            Self::AskedManyTimes => "ASKED_MANY_TIMES",
            Self::RepliedManyTimes => "REPLIED_MANY_TIMES",
        }
    }

    /// Parse a tag, accepting `ASKED_MANY_TIMES` and `askedManyTimes` spellings.
    #[must_use]
    pub fn from_tag(raw: &str) -> Option<Self> {
        let folded: String = raw
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL.into_iter().find(|filter| {
            filter
                .tag()
                .chars()
                .filter(|c| *c != '_')
                .map(|c| c.to_ascii_lowercase())
                .eq(folded.chars())
        })
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ---------------------------------------------------------------------------
// Time range key
// ---------------------------------------------------------------------------

/// Field that `start` / `end` bound, chosen per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeRangeKey {
    #[default]
    CreatedAt,
    RepliedAt,
}

impl TimeRangeKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::RepliedAt => "repliedAt",
        }
    }
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

/// One end of a range condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Bound {
    Count(u64),
    /// Passed through verbatim; the server interprets it.
    Time(String),
}

/// `{GTE?, LTE?}` range input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    #[serde(rename = "GTE", skip_serializing_if = "Option::is_none")]
    pub gte: Option<Bound>,
    #[serde(rename = "LTE", skip_serializing_if = "Option::is_none")]
    pub lte: Option<Bound>,
}

impl Range {
    #[must_use]
    pub const fn at_least(count: u64) -> Self {
        Self {
            gte: Some(Bound::Count(count)),
            lte: None,
        }
    }
}

/// A single filter predicate, serialized in the schema's input shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Condition {
    Flag(bool),
    List(Vec<String>),
    Range(Range),
    #[serde(rename_all = "camelCase")]
    RepliesFrom {
        user_id: String,
        exists: bool,
    },
    #[serde(rename_all = "camelCase")]
    MoreLikeThis {
        like: String,
        minimum_should_match: String,
    },
}

// ---------------------------------------------------------------------------
// FilterSpec
// ---------------------------------------------------------------------------

/// Field name → condition, as sent in the `filter` argument.
///
/// Never empty when handed out by [`translate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FilterSpec(BTreeMap<&'static str, Condition>);

impl FilterSpec {
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Condition> {
        self.0.get(field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    fn set(&mut self, field: &'static str, condition: Condition) {
        self.0.insert(field, condition);
    }

    /// Merge bounds into the range on `field`, creating it if needed.
    fn merge_range(&mut self, field: &'static str, gte: Option<Bound>, lte: Option<Bound>) {
        let entry = self
            .0
            .entry(field)
            .or_insert_with(|| Condition::Range(Range::default()));
        if !matches!(entry, Condition::Range(_)) {
            *entry = Condition::Range(Range::default());
        }
        if let Condition::Range(range) = entry {
            if gte.is_some() {
                range.gte = gte;
            }
            if lte.is_some() {
                range.lte = lte;
            }
        }
    }

    /// `None` for an empty spec: the query layer only accepts "no filter".
    fn into_option(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }
}

// ---------------------------------------------------------------------------
// Translation
// ---------------------------------------------------------------------------

/// Build the filter from URL params alone (no page defaults applied).
///
/// `user_id` enables [`StatusFilter::RepliedByMe`]; without it the tag is
/// skipped.
#[must_use]
pub fn build_filter(
    params: &QueryParams,
    user_id: Option<&str>,
    time_range_key: TimeRangeKey,
) -> Option<FilterSpec> {
    let mut spec = FilterSpec::default();

    if let Some(q) = params.get_non_empty(keys::Q) {
        spec.set(
            "moreLikeThis",
            Condition::MoreLikeThis {
                like: q.chars().take(MAX_KEYWORD_LENGTH).collect(),
                minimum_should_match: "0".to_string(),
            },
        );
    }

    let category_ids = params.list(keys::CATEGORY_IDS);
    if !category_ids.is_empty() {
        spec.set("categoryIds", owned_list(&category_ids));
    }

    for raw in params.list(keys::FILTERS) {
        let Some(filter) = StatusFilter::from_tag(raw) else {
            trace!(tag = raw, "ignoring unknown status filter");
            continue;
        };
        match filter {
            StatusFilter::RepliedByMe => {
                let Some(user_id) = user_id.filter(|id| !id.is_empty()) else {
                    continue;
                };
                spec.set(
                    "articleRepliesFrom",
                    Condition::RepliesFrom {
                        user_id: user_id.to_string(),
                        exists: true,
                    },
                );
            }
            StatusFilter::NoUsefulReplyYet => {
                spec.set("hasArticleReplyWithMorePositiveFeedback", Condition::Flag(false));
            }
            StatusFilter::AskedManyTimes => {
                spec.set("replyRequestCount", Condition::Range(Range::at_least(2)));
            }
            StatusFilter::RepliedManyTimes => {
                spec.set("replyCount", Condition::Range(Range::at_least(3)));
            }
        }
    }

    let start = params.get_non_empty(keys::START);
    let end = params.get_non_empty(keys::END);
    if start.is_some() || end.is_some() {
        spec.merge_range(
            time_range_key.as_str(),
            start.map(|s| Bound::Time(s.to_string())),
            end.map(|e| Bound::Time(e.to_string())),
        );
    }

    let reply_types = params.list(keys::TYPES);
    if !reply_types.is_empty() {
        spec.set("replyTypes", owned_list(&reply_types));
    }

    let article_types = params.list(keys::ARTICLE_TYPES);
    if !article_types.is_empty() {
        spec.set("articleTypes", owned_list(&article_types));
    }

    spec.into_option()
}

/// Resolve `orderBy` against the page's allow-list, falling back to its default.
#[must_use]
pub fn build_order(params: &QueryParams, page: &PageConfig) -> OrderSpec {
    let field = params
        .get(keys::ORDER_BY)
        .and_then(|raw| raw.parse::<OrderField>().ok())
        .filter(|field| page.allows_order(*field))
        .unwrap_or(page.default_order);
    OrderSpec::desc(field)
}

/// Translate a page's URL params into `ListArticles` variables.
///
/// Page defaults fill in `filters` and `orderBy` when the URL leaves them
/// out. The result never carries a cursor.
#[must_use]
pub fn translate(params: &QueryParams, user_id: Option<&str>, page: &PageConfig) -> ListQueryVars {
    let params = page.apply_defaults(params);
    ListQueryVars::new(
        build_filter(&params, user_id, page.time_range_key),
        build_order(&params, page),
    )
}

fn owned_list(values: &[&str]) -> Condition {
    Condition::List(values.iter().map(ToString::to_string).collect())
}
