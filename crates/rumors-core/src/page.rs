//! Per-page listing presets.
//!
//! Each list page picks its own default sort, sort allow-list, default status
//! filters, and the field that the time range applies to.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};

use crate::filter::{StatusFilter, TimeRangeKey, keys};
use crate::order::OrderField;
use crate::params::QueryParams;

/// Settings of one article list page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageConfig {
    pub kind: PageKind,
    pub default_order: OrderField,
    pub order_options: Vec<OrderField>,
    pub default_filters: Vec<StatusFilter>,
    pub time_range_key: TimeRangeKey,
}

impl PageConfig {
    /// Whether `field` is offered as a sort option on this page.
    #[must_use]
    pub fn allows_order(&self, field: OrderField) -> bool {
        self.order_options.contains(&field)
    }

    /// URL params with this page's defaults filled in underneath.
    ///
    /// A key present in the URL wins, even when its value is empty.
    #[must_use]
    pub fn apply_defaults(&self, params: &QueryParams) -> QueryParams {
        let mut merged = params.clone();
        if !self.default_filters.is_empty() {
            let tags: Vec<&str> = self.default_filters.iter().map(|f| f.tag()).collect();
            merged.set_default(keys::FILTERS, tags.join(","));
        }
        merged.set_default(keys::ORDER_BY, self.default_order.as_str());
        merged
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        PageKind::Articles.config()
    }
}

/// The list pages that share the article listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageKind {
    #[default]
    Articles,
    Replies,
    HoaxForYou,
    Search,
}

impl PageKind {
    pub const ALL: [Self; 4] = [Self::Articles, Self::Replies, Self::HoaxForYou, Self::Search];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Articles => "articles",
            Self::Replies => "replies",
            Self::HoaxForYou => "hoax-for-you",
            Self::Search => "search",
        }
    }

    /// Built-in preset for this page.
    #[must_use]
    pub fn config(self) -> PageConfig {
        match self {
            Self::Articles => PageConfig {
                kind: self,
                default_order: OrderField::LastRequestedAt,
                order_options: vec![
                    OrderField::LastRequestedAt,
                    OrderField::LastRepliedAt,
                    OrderField::ReplyRequestCount,
                ],
                default_filters: Vec::new(),
                time_range_key: TimeRangeKey::CreatedAt,
            },
            Self::Replies => PageConfig {
                kind: self,
                default_order: OrderField::LastRepliedAt,
                order_options: vec![
                    OrderField::LastRepliedAt,
                    OrderField::LastRequestedAt,
                    OrderField::ReplyRequestCount,
                ],
                default_filters: Vec::new(),
                time_range_key: TimeRangeKey::RepliedAt,
            },
            Self::HoaxForYou => PageConfig {
                kind: self,
                default_order: OrderField::LastRequestedAt,
                order_options: vec![OrderField::LastRequestedAt, OrderField::ReplyRequestCount],
                default_filters: vec![StatusFilter::NoUsefulReplyYet],
                time_range_key: TimeRangeKey::CreatedAt,
            },
            Self::Search => PageConfig {
                kind: self,
                default_order: OrderField::LastRequestedAt,
                order_options: OrderField::ALL.to_vec(),
                default_filters: Vec::new(),
                time_range_key: TimeRangeKey::CreatedAt,
            },
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "articles" | "article" => Ok(Self::Articles),
            "replies" | "reply" => Ok(Self::Replies),
            "hoax-for-you" | "hoax_for_you" | "for-you" => Ok(Self::HoaxForYou),
            "search" => Ok(Self::Search),
            other => bail!(
                "unknown page '{other}': expected one of articles, replies, hoax-for-you, search"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_default_order_is_allowed() {
        for kind in PageKind::ALL {
            let config = kind.config();
            assert_eq!(config.kind, kind);
            assert!(
                config.allows_order(config.default_order),
                "{kind} must allow its own default order"
            );
        }
    }

    #[test]
    fn defaults_fill_missing_keys_only() {
        let config = PageKind::HoaxForYou.config();
        let merged = config.apply_defaults(&QueryParams::new());
        assert_eq!(merged.get("filters"), Some("NO_USEFUL_REPLY_YET"));
        assert_eq!(merged.get("orderBy"), Some("lastRequestedAt"));

        let explicit = QueryParams::parse("filters=&orderBy=replyRequestCount");
        let merged = config.apply_defaults(&explicit);
        assert_eq!(merged.get("filters"), Some(""));
        assert_eq!(merged.get("orderBy"), Some("replyRequestCount"));
    }

    #[test]
    fn page_names_parse_with_aliases() {
        assert_eq!("replies".parse::<PageKind>().ok(), Some(PageKind::Replies));
        assert_eq!("For-You".parse::<PageKind>().ok(), Some(PageKind::HoaxForYou));
        assert!("feed".parse::<PageKind>().is_err());
    }

    #[test]
    fn replies_page_ranges_on_reply_time() {
        assert_eq!(PageKind::Replies.config().time_range_key, TimeRangeKey::RepliedAt);
    }
}
