//! Response types of the `ListArticles` queries.
//!
//! Field names follow the GraphQL schema. Everything beyond `id` and
//! `cursor` is optional so that narrower selections still decode.

use serde::{Deserialize, Serialize};

/// A reported message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub reply_request_count: Option<u64>,
    #[serde(default)]
    pub reply_count: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_requested_at: Option<String>,
    #[serde(default)]
    pub article_replies: Vec<ArticleReply>,
}

/// Link between an article and one reply to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleReply {
    #[serde(default)]
    pub reply: Option<Reply>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub id: String,
    #[serde(default, rename = "type")]
    pub reply_type: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// A node paired with its pagination cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge<T> {
    pub node: T,
    pub cursor: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub first_cursor: Option<String>,
    #[serde(default)]
    pub last_cursor: Option<String>,
}

/// One page of edges plus page metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
    #[serde(default)]
    pub page_info: Option<PageInfo>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// Payload of the stats-only query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStats {
    #[serde(default)]
    pub page_info: PageInfo,
    #[serde(default)]
    pub total_count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_list_page() {
        let raw = json!({
            "edges": [{
                "node": {
                    "id": "a1",
                    "text": "Drinking hot water cures everything",
                    "replyRequestCount": 4,
                    "createdAt": "2020-01-01T00:00:00Z",
                    "articleReplies": [{
                        "reply": { "id": "r1", "type": "RUMOR", "text": "No." },
                        "createdAt": "2020-01-02T00:00:00Z"
                    }],
                    "unknownField": true
                },
                "cursor": "c1"
            }]
        });
        let page: Connection<Article> = serde_json::from_value(raw).expect("decode");
        assert_eq!(page.edges.len(), 1);
        let article = &page.edges[0].node;
        assert_eq!(article.reply_request_count, Some(4));
        assert_eq!(
            article.article_replies[0]
                .reply
                .as_ref()
                .and_then(|r| r.reply_type.as_deref()),
            Some("RUMOR")
        );
        assert!(page.page_info.is_none());
    }

    #[test]
    fn decodes_stats_with_missing_cursors() {
        let stats: ListStats = serde_json::from_value(json!({
            "pageInfo": { "firstCursor": "c1", "lastCursor": null },
            "totalCount": 51
        }))
        .expect("decode");
        assert_eq!(stats.page_info.first_cursor.as_deref(), Some("c1"));
        assert_eq!(stats.page_info.last_cursor, None);
        assert_eq!(stats.total_count, Some(51));
    }
}
