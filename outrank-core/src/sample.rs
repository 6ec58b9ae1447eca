//! Sample destination selection inside one domain group.
//!
//! For the most-linked destination urls of a domain we report the url, its
//! distinct-link count and a few source page ids, so a human can see where
//! the traffic actually comes from.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeSet, BinaryHeap};

use outrank_stream::LinkRecord;

use crate::count::count_unique_links;
use crate::stats::LinkDestination;

/// How many source page ids to keep per destination url.
pub const SOURCE_SAMPLES: usize = 3;

/// The `n` numerically smallest distinct source page ids among `links`.
/// Deterministic by construction: not a random or most-recent sample.
pub fn source_sample(links: &[&LinkRecord], n: usize) -> Vec<u64> {
    let ids: BTreeSet<u64> = links.iter().map(|link| link.id).collect();
    ids.into_iter().take(n).collect()
}

/// Select the top `n` destination urls of one domain by distinct-link count.
///
/// Links are regrouped by exact destination url (in memory; the group is
/// already bounded to one domain's traffic). The bounded min-heap replaces
/// its minimum only on a strictly greater count: on ties the incumbent,
/// first-seen entry wins. The result is descending by `unique_links`, ties
/// in first-seen (url-ascending) order.
pub fn compute_sample_links(links: &[LinkRecord], n: usize) -> Vec<LinkDestination> {
    if n == 0 {
        return Vec::new();
    }

    let mut by_url: Vec<&LinkRecord> = links.iter().collect();
    by_url.sort_by(|a, b| a.external_url.cmp(&b.external_url));

    let mut heap: BinaryHeap<Reverse<SampleEntry>> = BinaryHeap::with_capacity(n + 1);
    let mut seq = 0u64;
    for group in by_url.chunk_by(|a, b| a.external_url == b.external_url) {
        let unique_links = count_unique_links(group.iter().copied());
        let destination = LinkDestination {
            url: group[0].external_url.as_deref().unwrap_or("").to_string(),
            unique_links,
            sample_sources: source_sample(group, SOURCE_SAMPLES),
        };

        if heap.len() < n {
            heap.push(Reverse(SampleEntry {
                unique_links,
                seq,
                destination,
            }));
        } else if heap
            .peek()
            .is_some_and(|entry| unique_links > entry.0.unique_links)
        {
            heap.push(Reverse(SampleEntry {
                unique_links,
                seq,
                destination,
            }));
            heap.pop();
        }
        seq += 1;
    }

    let mut result: Vec<LinkDestination> = Vec::with_capacity(heap.len());
    while let Some(Reverse(entry)) = heap.pop() {
        result.push(entry.destination);
    }
    result.reverse();
    result
}

struct SampleEntry {
    unique_links: u64,
    seq: u64,
    destination: LinkDestination,
}

impl PartialEq for SampleEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SampleEntry {}

impl PartialOrd for SampleEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SampleEntry {
    // among equal counts the most recently inserted entry is the minimum,
    // so earlier entries survive eviction and ties drain first-seen first
    fn cmp(&self, other: &Self) -> Ordering {
        self.unique_links
            .cmp(&other.unique_links)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}
