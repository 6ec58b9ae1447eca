//! Follow/nofollow and link-kind predicates over raw link rows.
//!
//! The crawler encodes why a link does not pass ranking signal as a bitmask
//! so downstream reporting can distinguish the combination of signals.

use crate::record::{LinkRecord, LinkType};

/// rel="nofollow" on the anchor itself.
pub const NOFOLLOW_LINK: u32 = 1;
/// Page-level meta robots nofollow.
pub const NOFOLLOW_META: u32 = 1 << 1;
/// Disallowed by robots directives.
pub const NOFOLLOW_ROBOTS: u32 = 1 << 2;

const NOFOLLOW_MASK: u32 = NOFOLLOW_LINK | NOFOLLOW_META | NOFOLLOW_ROBOTS;

/// True for plain `<a>` links, as opposed to canonicals and redirects.
pub fn is_link(link_type: LinkType) -> bool {
    link_type == LinkType::Anchor
}

/// A link is internal when its destination resolved to a crawled url id.
pub fn is_link_internal(record: &LinkRecord) -> bool {
    record.dst_url_id.is_some()
}

/// A link passes ranking signal iff no nofollow bit is set.
pub fn is_follow_link(bitmask: u32) -> bool {
    bitmask & NOFOLLOW_MASK == 0
}

/// Decode the combination of signals that made a link nofollow.
/// Empty for follow links.
pub fn nofollow_combination(bitmask: u32) -> Vec<&'static str> {
    let mut combination = Vec::new();
    if bitmask & NOFOLLOW_LINK != 0 {
        combination.push("link");
    }
    if bitmask & NOFOLLOW_META != 0 {
        combination.push("meta");
    }
    if bitmask & NOFOLLOW_ROBOTS != 0 {
        combination.push("robots");
    }
    combination
}
