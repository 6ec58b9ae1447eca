//! Distinct-link counting.
//!
//! A "distinct link" is a unique `(source page, destination url)` pair:
//! a link to B occurring twice on page A counts once. These counters are only
//! ever invoked on one materialized domain group, so the pair set is bounded
//! by the group size.

use std::collections::HashSet;

use outrank_stream::LinkRecord;
use outrank_stream::predicates::is_follow_link;

/// Number of distinct `(source page, destination url)` pairs in `links`.
pub fn count_unique_links<'a>(links: impl IntoIterator<Item = &'a LinkRecord>) -> u64 {
    let pairs: HashSet<(u64, &str)> = links
        .into_iter()
        .map(|link| (link.id, link.external_url.as_deref().unwrap_or("")))
        .collect();
    pairs.len() as u64
}

/// Same as [`count_unique_links`], restricted to follow links.
pub fn count_unique_follow_links<'a>(links: impl IntoIterator<Item = &'a LinkRecord>) -> u64 {
    count_unique_links(
        links
            .into_iter()
            .filter(|link| is_follow_link(link.bitmask)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_pairs_collapse() {
        let links = vec![
            LinkRecord::external(1, 0, "https://t.example/a"),
            LinkRecord::external(1, 0, "https://t.example/a"),
            LinkRecord::external(2, 0, "https://t.example/a"),
        ];
        assert_eq!(count_unique_links(&links), 2);
    }

    #[test]
    fn test_follow_variant_ignores_nofollow() {
        let links = vec![
            LinkRecord::external(1, 0, "https://t.example/a"),
            LinkRecord::external(2, 1, "https://t.example/a"),
            LinkRecord::external(3, 2, "https://t.example/a"),
        ];
        assert_eq!(count_unique_links(&links), 3);
        assert_eq!(count_unique_follow_links(&links), 1);
    }

    #[test]
    fn test_empty_group() {
        let links: Vec<LinkRecord> = Vec::new();
        assert_eq!(count_unique_links(&links), 0);
        assert_eq!(count_unique_follow_links(&links), 0);
    }
}
