use serde::{Deserialize, Serialize};

/// Tag kind of a raw outlink row. The raw stream mixes anchor links with
/// canonicals and redirects, which is why the anchor filter exists upstream
/// of any aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkType {
    Anchor,
    Canonical,
    Redirect,
    Other,
}

impl LinkType {
    /// Parse the on-disk token ("a", "canonical", "r301", ...).
    pub fn parse(token: &str) -> Self {
        match token {
            "a" => LinkType::Anchor,
            "canonical" => LinkType::Canonical,
            "r301" | "r302" | "r307" => LinkType::Redirect,
            _ => LinkType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Anchor => "a",
            LinkType::Canonical => "canonical",
            LinkType::Redirect => "r301",
            LinkType::Other => "other",
        }
    }
}

/// One row of the raw outlinks stream.
///
/// Column order on disk: `id \t link_type \t bitmask \t dst_url_id \t external_url`.
/// `dst_url_id` is only meaningful for internal links (`-1` on disk maps to
/// `None`); `external_url` is only populated for external destinations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Source page identifier.
    pub id: u64,
    pub link_type: LinkType,
    /// Nofollow signal combination, see [`crate::predicates`].
    pub bitmask: u32,
    pub dst_url_id: Option<u64>,
    pub external_url: Option<String>,
}

impl LinkRecord {
    /// An anchor link pointing outside the crawled site.
    pub fn external(id: u64, bitmask: u32, external_url: impl Into<String>) -> Self {
        Self {
            id,
            link_type: LinkType::Anchor,
            bitmask,
            dst_url_id: None,
            external_url: Some(external_url.into()),
        }
    }

    /// An anchor link that resolved to a crawled url id.
    pub fn internal(id: u64, bitmask: u32, dst_url_id: u64) -> Self {
        Self {
            id,
            link_type: LinkType::Anchor,
            bitmask,
            dst_url_id: Some(dst_url_id),
            external_url: None,
        }
    }
}
