//! External grouping of a link stream by a key function.
//!
//! The stream is handed to a [`Sorter`] so records come back in ascending
//! key order; consecutive runs of equal keys are then materialized one group
//! at a time. Only one group lives in memory at once, which is the
//! memory-boundedness guarantee the whole pipeline rests on.

use serde::{Deserialize, Serialize};

use outrank_stream::{LinkRecord, Result, Sorter};

/// Record decorated with its grouping key, so the key survives sorter
/// spills and is never recomputed from the url.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct KeyedLink {
    key: String,
    link: LinkRecord,
}

/// Group `links` by `key`, yielding `(key, members)` in ascending key order
/// with every group non-empty.
///
/// `key` must succeed for every record presented; the first failure aborts
/// the grouping rather than silently dropping the record, since a dropped
/// record would bias every count downstream.
pub fn group_links<S, F>(
    links: impl IntoIterator<Item = Result<LinkRecord>>,
    sorter: &S,
    key: F,
) -> Result<impl Iterator<Item = Result<(String, Vec<LinkRecord>)>>>
where
    S: Sorter,
    F: Fn(&LinkRecord) -> Result<String>,
{
    let keyed = links.into_iter().map(move |record| {
        let link = record?;
        let key = key(&link)?;
        Ok(KeyedLink { key, link })
    });
    let sorted = sorter.sort_by_key(keyed, |entry: &KeyedLink| entry.key.clone())?;
    Ok(GroupedLinks {
        sorted,
        pending: None,
    })
}

struct GroupedLinks<I> {
    sorted: I,
    pending: Option<KeyedLink>,
}

impl<I> Iterator for GroupedLinks<I>
where
    I: Iterator<Item = Result<KeyedLink>>,
{
    type Item = Result<(String, Vec<LinkRecord>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = match self.pending.take() {
            Some(keyed) => keyed,
            None => match self.sorted.next()? {
                Ok(keyed) => keyed,
                Err(e) => return Some(Err(e)),
            },
        };

        let key = first.key;
        let mut members = vec![first.link];
        loop {
            match self.sorted.next() {
                None => break,
                Some(Err(e)) => return Some(Err(e)),
                Some(Ok(next)) => {
                    if next.key == key {
                        members.push(next.link);
                    } else {
                        self.pending = Some(next);
                        break;
                    }
                }
            }
        }
        Some(Ok((key, members)))
    }
}
