//! Sort order for article listings.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;
use std::str::FromStr;

/// Sortable `ListArticles` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderField {
    /// Most recently asked first.
    LastRequestedAt,
    /// Most recently replied first.
    LastRepliedAt,
    /// Most asked first.
    ReplyRequestCount,
    /// Newest first.
    CreatedAt,
}

impl OrderField {
    pub const ALL: [Self; 4] = [
        Self::LastRequestedAt,
        Self::LastRepliedAt,
        Self::ReplyRequestCount,
        Self::CreatedAt,
    ];

    /// Field name as the GraphQL schema spells it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LastRequestedAt => "lastRequestedAt",
            Self::LastRepliedAt => "lastRepliedAt",
            Self::ReplyRequestCount => "replyRequestCount",
            Self::CreatedAt => "createdAt",
        }
    }

    /// Short label shown next to sort options.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LastRequestedAt => "Most recently asked",
            Self::LastRepliedAt => "Most recently replied",
            Self::ReplyRequestCount => "Most asked",
            Self::CreatedAt => "Newest",
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an `orderBy` value outside [`OrderField::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order field '{0}'")]
pub struct UnknownOrderField(pub String);

impl FromStr for OrderField {
    type Err = UnknownOrderField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownOrderField(s.to_string()))
    }
}

/// Sort direction. Only descending is exposed to pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Desc,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Desc => "DESC",
        }
    }
}

/// The `orderBy` argument: always exactly one `{field: direction}` entry.
///
/// Serializes as `[{"<field>": "DESC"}]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderSpec {
    field: OrderField,
    direction: Direction,
}

impl OrderSpec {
    #[must_use]
    pub const fn desc(field: OrderField) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }

    #[must_use]
    pub const fn field(self) -> OrderField {
        self.field
    }

    #[must_use]
    pub const fn direction(self) -> Direction {
        self.direction
    }
}

impl Serialize for OrderSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Entry(OrderSpec);

        impl Serialize for Entry {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(self.0.field.as_str(), self.0.direction.as_str())?;
                map.end()
            }
        }

        let mut seq = serializer.serialize_seq(Some(1))?;
        seq.serialize_element(&Entry(*self))?;
        seq.end()
    }
}
