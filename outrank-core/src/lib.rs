pub mod count;
pub mod group;
pub mod report;
pub mod sample;
pub mod stats;
pub mod top;

pub use count::{count_unique_follow_links, count_unique_links};
pub use report::TopDomainsReport;
pub use sample::compute_sample_links;
pub use stats::{DomainLinkStats, LinkDestination, compute_domain_stats};
pub use top::{
    compute_top_domains, compute_top_second_level_domains, filter_external_outlinks,
};
