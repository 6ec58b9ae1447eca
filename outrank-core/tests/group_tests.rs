// Tests for external grouping

use outrank_core::group::group_links;
use outrank_stream::{ExternalSorter, LinkRecord, MemorySorter, StreamError, urls};

fn ok_stream(records: Vec<LinkRecord>) -> Vec<outrank_stream::Result<LinkRecord>> {
    records.into_iter().map(Ok).collect()
}

fn by_domain(link: &LinkRecord) -> outrank_stream::Result<String> {
    urls::domain(link.external_url.as_deref().unwrap_or(""))
}

#[test]
fn test_groups_come_out_in_ascending_key_order() {
    let records = vec![
        LinkRecord::external(1, 0, "https://b.example/1"),
        LinkRecord::external(2, 0, "https://a.example/1"),
        LinkRecord::external(3, 0, "https://b.example/2"),
        LinkRecord::external(4, 0, "https://c.example/1"),
    ];

    let groups: Vec<(String, Vec<LinkRecord>)> =
        group_links(ok_stream(records), &MemorySorter, by_domain)
            .unwrap()
            .collect::<outrank_stream::Result<Vec<_>>>()
            .unwrap();

    let keys: Vec<&str> = groups.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(keys, vec!["a.example", "b.example", "c.example"]);
    assert!(groups.iter().all(|(_, members)| !members.is_empty()));
    assert_eq!(groups[1].1.len(), 2);
    // every member belongs to its group
    for (key, members) in &groups {
        for member in members {
            assert_eq!(&by_domain(member).unwrap(), key);
        }
    }
}

#[test]
fn test_spilling_sorter_produces_identical_groups() {
    let records = vec![
        LinkRecord::external(1, 0, "https://b.example/1"),
        LinkRecord::external(2, 0, "https://a.example/1"),
        LinkRecord::external(3, 0, "https://b.example/2"),
        LinkRecord::external(4, 0, "https://a.example/2"),
        LinkRecord::external(5, 0, "https://c.example/1"),
    ];

    let spilling = ExternalSorter::new(1);
    let with_spills: Vec<(String, Vec<LinkRecord>)> =
        group_links(ok_stream(records.clone()), &spilling, by_domain)
            .unwrap()
            .collect::<outrank_stream::Result<Vec<_>>>()
            .unwrap();
    let in_memory: Vec<(String, Vec<LinkRecord>)> =
        group_links(ok_stream(records), &MemorySorter, by_domain)
            .unwrap()
            .collect::<outrank_stream::Result<Vec<_>>>()
            .unwrap();

    let spilled_keys: Vec<&String> = with_spills.iter().map(|(key, _)| key).collect();
    let memory_keys: Vec<&String> = in_memory.iter().map(|(key, _)| key).collect();
    assert_eq!(spilled_keys, memory_keys);
    for ((_, a), (_, b)) in with_spills.iter().zip(in_memory.iter()) {
        assert_eq!(a.len(), b.len());
    }
}

#[test]
fn test_non_total_key_function_aborts() {
    let records = vec![
        LinkRecord::external(1, 0, "https://fine.example/"),
        LinkRecord::external(2, 0, "not a url at all"),
    ];

    let result = group_links(ok_stream(records), &MemorySorter, by_domain);
    assert!(matches!(result, Err(StreamError::InvalidUrl(_))));
}

#[test]
fn test_empty_stream_yields_no_groups() {
    let groups: Vec<_> = group_links(ok_stream(Vec::new()), &MemorySorter, by_domain)
        .unwrap()
        .collect();
    assert!(groups.is_empty());
}
