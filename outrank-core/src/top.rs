//! Top-N external domain selection over a filtered outlink stream.
//!
//! This is a single streaming pass: groups arrive one at a time from the
//! external grouper and only a bounded min-heap of the `n` best domains is
//! retained. Domains that cannot make the cut are skipped before their full
//! stats are ever computed.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use tracing::debug;

use outrank_stream::predicates::{is_link, is_link_internal};
use outrank_stream::{LinkRecord, Result, Sorter, StreamError, urls};

use crate::count::count_unique_follow_links;
use crate::group::group_links;
use crate::sample::compute_sample_links;
use crate::stats::{DomainLinkStats, compute_domain_stats};

/// How many destination urls to sample per retained domain.
pub const SAMPLE_LINKS: usize = 100;

/// Keep only anchor links pointing outside the crawled site. Upstream read
/// errors pass through so the consumer aborts on them.
pub fn filter_external_outlinks(
    outlinks: impl Iterator<Item = Result<LinkRecord>>,
) -> impl Iterator<Item = Result<LinkRecord>> {
    outlinks.filter(|record| match record {
        Ok(link) => is_link(link.link_type) && !is_link_internal(link),
        Err(_) => true,
    })
}

/// Top `n` destination domains of an external-outlink stream, ranked by the
/// number of distinct follow links pointing to them, descending.
/// "forum.example.com" and "example.com" count as different domains here.
pub fn compute_top_domains<S: Sorter>(
    external_outlinks: impl IntoIterator<Item = Result<LinkRecord>>,
    n: usize,
    sorter: &S,
) -> Result<Vec<(u64, DomainLinkStats)>> {
    compute_top(external_outlinks, n, sorter, |link| {
        urls::domain(external_url(link)?)
    })
}

/// Same ranking with destinations collapsed to their second-level domain,
/// so "forum.example.com" and "example.com" share one entry.
pub fn compute_top_second_level_domains<S: Sorter>(
    external_outlinks: impl IntoIterator<Item = Result<LinkRecord>>,
    n: usize,
    sorter: &S,
) -> Result<Vec<(u64, DomainLinkStats)>> {
    compute_top(external_outlinks, n, sorter, |link| {
        urls::second_level_domain(external_url(link)?)
    })
}

fn external_url(link: &LinkRecord) -> Result<&str> {
    link.external_url
        .as_deref()
        .ok_or(StreamError::MissingExternalUrl(link.id))
}

fn compute_top<S, F>(
    external_outlinks: impl IntoIterator<Item = Result<LinkRecord>>,
    n: usize,
    sorter: &S,
    key: F,
) -> Result<Vec<(u64, DomainLinkStats)>>
where
    S: Sorter,
    F: Fn(&LinkRecord) -> Result<String>,
{
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut heap: BinaryHeap<Reverse<RankedDomain>> = BinaryHeap::with_capacity(n + 1);
    for group in group_links(external_outlinks, sorter, key)? {
        let (domain, links) = group?;

        let unique_follow = count_unique_follow_links(&links);
        if unique_follow == 0 {
            // only nofollow traffic, never retained
            continue;
        }

        if heap.len() == n {
            let floor = heap
                .peek()
                .map(|entry| entry.0.unique_follow)
                .unwrap_or_default();
            if unique_follow < floor {
                // cheaper than building stats we would throw away
                continue;
            }
        }

        let mut stats = compute_domain_stats(&domain, &links);
        stats.sample_links = compute_sample_links(&links, SAMPLE_LINKS);
        heap.push(Reverse(RankedDomain {
            unique_follow,
            stats,
        }));
        if heap.len() > n {
            heap.pop();
        }
    }

    let mut result: Vec<(u64, DomainLinkStats)> = Vec::with_capacity(heap.len());
    while let Some(Reverse(entry)) = heap.pop() {
        result.push((entry.unique_follow, entry.stats));
    }
    result.reverse();
    debug!("retained {} of at most {} domains", result.len(), n);
    Ok(result)
}

struct RankedDomain {
    unique_follow: u64,
    stats: DomainLinkStats,
}

impl PartialEq for RankedDomain {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankedDomain {}

impl PartialOrd for RankedDomain {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankedDomain {
    // counts tie-break on the domain name: the lexicographically larger name
    // is evicted first, so final ties come out ascending by name
    fn cmp(&self, other: &Self) -> Ordering {
        self.unique_follow
            .cmp(&other.unique_follow)
            .then_with(|| other.stats.name.cmp(&self.stats.name))
    }
}
