// Tests for top-domain selection over link streams

use outrank_core::{
    compute_top_domains, compute_top_second_level_domains, filter_external_outlinks,
};
use outrank_stream::{ExternalSorter, LinkRecord, LinkType, MemorySorter, StreamError};

fn ok_stream(records: Vec<LinkRecord>) -> Vec<outrank_stream::Result<LinkRecord>> {
    records.into_iter().map(Ok).collect()
}

fn follow(id: u64, url: &str) -> LinkRecord {
    LinkRecord::external(id, 0, url)
}

fn nofollow(id: u64, url: &str) -> LinkRecord {
    LinkRecord::external(id, 1, url)
}

#[test]
fn test_follow_nofollow_mix() {
    // three occurrences of page 1 -> /a, one of page 2 -> /a, one nofollow
    // page 1 -> /b
    let records = vec![
        follow(1, "https://example.com/a"),
        follow(1, "https://example.com/a"),
        follow(1, "https://example.com/a"),
        follow(2, "https://example.com/a"),
        nofollow(1, "https://example.com/b"),
    ];

    let top = compute_top_domains(ok_stream(records), 10, &MemorySorter).unwrap();
    assert_eq!(top.len(), 1);

    let (unique_follow, stats) = &top[0];
    assert_eq!(*unique_follow, 2);
    assert_eq!(stats.name, "example.com");
    assert_eq!(stats.follow, 4);
    assert_eq!(stats.nofollow, 1);
    assert_eq!(stats.follow_unique, 2);

    // sample links cover all destination urls of the domain, nofollow
    // destinations included, descending by distinct-link count
    assert_eq!(stats.sample_links.len(), 2);
    assert_eq!(stats.sample_links[0].url, "https://example.com/a");
    assert_eq!(stats.sample_links[0].unique_links, 2);
    assert_eq!(stats.sample_links[0].sample_sources, vec![1, 2]);
    assert_eq!(stats.sample_links[1].url, "https://example.com/b");
    assert_eq!(stats.sample_links[1].unique_links, 1);
}

#[test]
fn test_nofollow_only_domain_is_excluded() {
    let records = vec![
        nofollow(1, "https://quiet.example/x"),
        nofollow(2, "https://quiet.example/x"),
        follow(1, "https://loud.example/y"),
    ];

    let top = compute_top_domains(ok_stream(records), 10, &MemorySorter).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].1.name, "loud.example");
}

#[test]
fn test_fewer_domains_than_requested() {
    let records = vec![follow(1, "https://only.example/")];
    let top = compute_top_domains(ok_stream(records), 2, &MemorySorter).unwrap();
    assert_eq!(top.len(), 1);
}

#[test]
fn test_result_is_bounded_and_sorted() {
    let mut records = Vec::new();
    // five domains with 1..=5 distinct follow links each
    for (d, domain) in ["a", "b", "c", "d", "e"].iter().enumerate() {
        for page in 0..=d as u64 {
            records.push(follow(page + 1, &format!("https://{}.example/p", domain)));
        }
    }

    let top = compute_top_domains(ok_stream(records), 3, &MemorySorter).unwrap();
    assert_eq!(top.len(), 3);
    let counts: Vec<u64> = top.iter().map(|(count, _)| *count).collect();
    assert_eq!(counts, vec![5, 4, 3]);
    assert!(top.iter().all(|(count, _)| *count > 0));
    assert!(
        top.iter()
            .all(|(count, stats)| stats.follow_unique <= stats.follow && *count > 0)
    );
}

#[test]
fn test_tie_break_is_deterministic_by_name() {
    // both domains tie at one distinct follow link while the heap holds one
    let records = vec![
        follow(1, "https://alpha.example/x"),
        follow(1, "https://beta.example/x"),
    ];

    let top = compute_top_domains(ok_stream(records.clone()), 1, &MemorySorter).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].1.name, "alpha.example");

    // and a full tie at higher capacity comes out ascending by name
    let top = compute_top_domains(ok_stream(records), 2, &MemorySorter).unwrap();
    let names: Vec<&str> = top.iter().map(|(_, stats)| stats.name.as_str()).collect();
    assert_eq!(names, vec!["alpha.example", "beta.example"]);
}

#[test]
fn test_idempotent_on_reiterable_input() {
    let records = vec![
        follow(1, "https://a.example/1"),
        follow(2, "https://a.example/2"),
        follow(3, "https://b.example/1"),
        nofollow(4, "https://b.example/2"),
    ];

    let first = compute_top_domains(ok_stream(records.clone()), 5, &MemorySorter).unwrap();
    let second = compute_top_domains(ok_stream(records), 5, &MemorySorter).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_duplicate_links_collapse() {
    let records = vec![
        follow(1, "https://a.example/1"),
        follow(1, "https://a.example/1"),
    ];
    let top = compute_top_domains(ok_stream(records), 5, &MemorySorter).unwrap();
    assert_eq!(top[0].0, 1);
    assert_eq!(top[0].1.follow, 2);
}

#[test]
fn test_second_level_domains_collapse_subdomains() {
    let records = vec![
        follow(1, "https://forum.example.com/t/1"),
        follow(2, "https://example.com/"),
    ];

    let exact = compute_top_domains(ok_stream(records.clone()), 10, &MemorySorter).unwrap();
    assert_eq!(exact.len(), 2);

    let collapsed =
        compute_top_second_level_domains(ok_stream(records), 10, &MemorySorter).unwrap();
    assert_eq!(collapsed.len(), 1);
    assert_eq!(collapsed[0].0, 2);
    assert_eq!(collapsed[0].1.name, "example.com");
}

#[test]
fn test_filter_keeps_external_anchors_only() {
    let mut canonical = LinkRecord::external(1, 0, "https://c.example/");
    canonical.link_type = LinkType::Canonical;
    let records = vec![
        LinkRecord::internal(1, 0, 99),
        canonical,
        follow(1, "https://kept.example/"),
    ];

    let filtered: Vec<LinkRecord> = filter_external_outlinks(ok_stream(records).into_iter())
        .collect::<outrank_stream::Result<Vec<_>>>()
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(
        filtered[0].external_url.as_deref(),
        Some("https://kept.example/")
    );
}

#[test]
fn test_external_sorter_gives_same_ranking() {
    let records = vec![
        follow(1, "https://b.example/1"),
        follow(2, "https://a.example/1"),
        follow(3, "https://a.example/2"),
        follow(4, "https://c.example/1"),
        nofollow(5, "https://c.example/2"),
    ];

    let spilling = ExternalSorter::new(2);
    let with_spills = compute_top_domains(ok_stream(records.clone()), 2, &spilling).unwrap();
    let in_memory = compute_top_domains(ok_stream(records), 2, &MemorySorter).unwrap();
    assert_eq!(with_spills, in_memory);
}

#[test]
fn test_unparsable_url_aborts_the_batch() {
    let records = vec![follow(1, "https://ok.example/"), follow(2, "not a url")];
    let result = compute_top_domains(ok_stream(records), 5, &MemorySorter);
    assert!(matches!(result, Err(StreamError::InvalidUrl(_))));
}

#[test]
fn test_upstream_error_aborts_the_batch() {
    let stream: Vec<outrank_stream::Result<LinkRecord>> = vec![
        Ok(follow(1, "https://ok.example/")),
        Err(StreamError::MalformedRecord {
            line: 2,
            reason: "truncated".to_string(),
        }),
    ];
    let result = compute_top_domains(stream, 5, &MemorySorter);
    assert!(matches!(result, Err(StreamError::MalformedRecord { .. })));
}

#[test]
fn test_zero_requested_domains() {
    let records = vec![follow(1, "https://a.example/")];
    let top = compute_top_domains(ok_stream(records), 0, &MemorySorter).unwrap();
    assert!(top.is_empty());
}

#[test]
fn test_empty_input_is_not_an_error() {
    let top = compute_top_domains(ok_stream(Vec::new()), 5, &MemorySorter).unwrap();
    assert!(top.is_empty());
}
