//! Per-domain link statistics.

use std::collections::HashSet;

use serde_json::json;

use outrank_stream::LinkRecord;
use outrank_stream::predicates::is_follow_link;

/// Aggregated outgoing-link counts towards one external domain.
///
/// Built by [`compute_domain_stats`]; the top-K selector attaches
/// `sample_links` afterwards, once it knows the domain is retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainLinkStats {
    /// The domain or second-level domain key.
    pub name: String,
    /// Follow links, counted per occurrence.
    pub follow: u64,
    /// Nofollow links, counted per occurrence.
    pub nofollow: u64,
    /// Distinct `(source page, destination url)` follow pairs.
    pub follow_unique: u64,
    pub sample_links: Vec<LinkDestination>,
}

impl DomainLinkStats {
    pub fn new(name: impl Into<String>, follow: u64, nofollow: u64, follow_unique: u64) -> Self {
        Self {
            name: name.into(),
            follow,
            nofollow,
            follow_unique,
            sample_links: Vec::new(),
        }
    }

    /// JSON shape consumed by downstream reporting. Samples are sorted
    /// ascending by `(unique_links, url)` at serialization time.
    pub fn to_json(&self) -> serde_json::Value {
        let mut samples: Vec<&LinkDestination> = self.sample_links.iter().collect();
        samples.sort_by(|a, b| (a.unique_links, &a.url).cmp(&(b.unique_links, &b.url)));
        json!({
            "domain": self.name,
            "unique_follow_links": self.follow_unique,
            "follow_links": self.follow,
            "no_follow_links": self.nofollow,
            "samples": samples.iter().map(|sample| sample.to_json()).collect::<Vec<_>>(),
        })
    }
}

/// One distinct destination url inside a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDestination {
    pub url: String,
    /// Distinct source pages linking to this url.
    pub unique_links: u64,
    /// The numerically smallest distinct source page ids, ascending.
    pub sample_sources: Vec<u64>,
}

impl LinkDestination {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "url": self.url,
            "unique_links": self.unique_links,
            "sources": self.sample_sources,
        })
    }
}

/// Compute the follow/nofollow counters for one domain's links in a single
/// linear pass. The seen-set is local to the call and bounded by the group
/// size, never by the stream size.
pub fn compute_domain_stats(domain: &str, links: &[LinkRecord]) -> DomainLinkStats {
    let mut follow = 0;
    let mut nofollow = 0;
    let mut follow_unique = 0;
    let mut seen: HashSet<(u64, &str)> = HashSet::new();

    for link in links {
        if is_follow_link(link.bitmask) {
            follow += 1;
            if seen.insert((link.id, link.external_url.as_deref().unwrap_or(""))) {
                follow_unique += 1;
            }
        } else {
            nofollow += 1;
        }
    }

    DomainLinkStats::new(domain, follow, nofollow, follow_unique)
}
