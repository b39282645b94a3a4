//! Arguments shared by `rumors vars` and `rumors list`.
//!
//! A listing is selected by URL query parameters, the same way the site's
//! list pages are. They can come from a full page URL (`--url`), a raw query
//! string (`--query`), or individual flags. Flags win over values taken from
//! the URL or query string.

use anyhow::{Context, Result, bail};
use clap::Args;
use rumors_core::QueryParams;
use rumors_core::filter::keys;
use rumors_core::page::{PageConfig, PageKind};

#[derive(Args, Debug, Default)]
pub struct ListingArgs {
    /// List page whose presets apply: articles, replies, hoax-for-you, search.
    #[arg(long, short = 'p', default_value = "articles")]
    pub page: String,

    /// Full page URL to read query parameters from.
    #[arg(long, conflicts_with = "query")]
    pub url: Option<String>,

    /// Raw query string, e.g. `filters=askedManyTimes&orderBy=replyRequestCount`.
    #[arg(long)]
    pub query: Option<String>,

    /// Comma-separated status filters (e.g. `NO_USEFUL_REPLY_YET,askedManyTimes`).
    #[arg(long)]
    pub filters: Option<String>,

    /// Search keyword (truncated to 100 characters).
    #[arg(long)]
    pub q: Option<String>,

    /// Comma-separated category ids.
    #[arg(long = "category-ids")]
    pub category_ids: Option<String>,

    /// Lower bound of the time range.
    #[arg(long)]
    pub start: Option<String>,

    /// Upper bound of the time range.
    #[arg(long)]
    pub end: Option<String>,

    /// Comma-separated reply types.
    #[arg(long)]
    pub types: Option<String>,

    /// Comma-separated article types.
    #[arg(long = "article-types")]
    pub article_types: Option<String>,

    /// Sort field; unknown or disallowed values use the page default.
    #[arg(long = "order-by")]
    pub order_by: Option<String>,

    /// Id of the current user (enables the REPLIED_BY_ME filter).
    #[arg(long)]
    pub user: Option<String>,
}

impl ListingArgs {
    /// Resolve `--page` to its preset.
    pub fn page_config(&self) -> Result<PageConfig> {
        let kind: PageKind = self
            .page
            .parse()
            .with_context(|| format!("invalid --page '{}'", self.page))?;
        Ok(kind.config())
    }

    /// Assemble the query parameters this invocation describes.
    pub fn query_params(&self) -> Result<QueryParams> {
        let mut params = match (&self.url, &self.query) {
            (Some(url), None) => QueryParams::from_url(url),
            (None, Some(query)) => QueryParams::parse(query),
            (None, None) => QueryParams::new(),
            (Some(_), Some(_)) => bail!("--url and --query cannot be combined"),
        };

        let overrides = [
            (keys::FILTERS, &self.filters),
            (keys::Q, &self.q),
            (keys::CATEGORY_IDS, &self.category_ids),
            (keys::START, &self.start),
            (keys::END, &self.end),
            (keys::TYPES, &self.types),
            (keys::ARTICLE_TYPES, &self.article_types),
            (keys::ORDER_BY, &self.order_by),
        ];
        for (key, value) in overrides {
            if let Some(value) = value {
                params.set(key, value.as_str());
            }
        }
        Ok(params)
    }
}
