//! GraphQL documents and request/response envelopes for `ListArticles`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::model::{Article, Connection, ListStats};
use crate::vars::ListQueryVars;

/// Page size requested by the list query.
pub const PAGE_SIZE: u32 = 25;

pub const LIST_ARTICLES: &str = r"query ListArticles(
  $filter: ListArticleFilter
  $orderBy: [ListArticleOrderBy]
  $after: String
) {
  ListArticles(filter: $filter, orderBy: $orderBy, after: $after, first: 25) {
    edges {
      node {
        id
        text
        replyRequestCount
        replyCount
        createdAt
        lastRequestedAt
        articleReplies(status: NORMAL) {
          reply {
            id
            type
            text
          }
          createdAt
        }
      }
      cursor
    }
  }
}";

pub const LIST_ARTICLES_STAT: &str = r"query ListArticlesStat(
  $filter: ListArticleFilter
  $orderBy: [ListArticleOrderBy]
) {
  ListArticles(filter: $filter, orderBy: $orderBy) {
    pageInfo {
      firstCursor
      lastCursor
    }
    totalCount
  }
}";

/// Body POSTed to the GraphQL endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    pub query: &'static str,
    pub operation_name: &'static str,
    pub variables: ListQueryVars,
}

impl GraphqlRequest {
    /// Paginated list request; `vars.after` selects the page.
    #[must_use]
    pub const fn list(vars: ListQueryVars) -> Self {
        Self {
            query: LIST_ARTICLES,
            operation_name: "ListArticles",
            variables: vars,
        }
    }

    /// Stats request; any cursor in `vars` is dropped.
    #[must_use]
    pub fn stats(vars: &ListQueryVars) -> Self {
        Self {
            query: LIST_ARTICLES_STAT,
            operation_name: "ListArticlesStat",
            variables: vars.first_page(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct GraphqlErrorItem {
    message: String,
}

/// `{data, errors}` response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlResponse<T> {
    #[serde(default = "Option::default")]
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlErrorItem>,
}

impl<T> GraphqlResponse<T> {
    /// Data when the response carries no errors.
    ///
    /// # Errors
    ///
    /// [`FetchError::Graphql`] when `errors` is non-empty, [`FetchError::Decode`]
    /// when `data` is missing.
    pub fn into_result(self) -> Result<T, FetchError> {
        if !self.errors.is_empty() {
            return Err(FetchError::Graphql(
                self.errors.into_iter().map(|e| e.message).collect(),
            ));
        }
        self.data
            .ok_or_else(|| FetchError::Decode("response has neither data nor errors".into()))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ListArticlesData<C> {
    #[serde(rename = "ListArticles")]
    list_articles: Option<C>,
}

fn decode_list_articles<C: DeserializeOwned>(raw: serde_json::Value) -> Result<C, FetchError> {
    let response: GraphqlResponse<ListArticlesData<C>> = serde_json::from_value(raw)?;
    response
        .into_result()?
        .list_articles
        .ok_or_else(|| FetchError::Decode("ListArticles is null".into()))
}

/// Decode a raw list-query response.
///
/// # Errors
///
/// See [`GraphqlResponse::into_result`]; also fails on a shape mismatch.
pub fn decode_list(raw: serde_json::Value) -> Result<Connection<Article>, FetchError> {
    decode_list_articles(raw)
}

/// Decode a raw stats-query response.
///
/// # Errors
///
/// See [`GraphqlResponse::into_result`]; also fails on a shape mismatch.
pub fn decode_stats(raw: serde_json::Value) -> Result<ListStats, FetchError> {
    decode_list_articles(raw)
}
