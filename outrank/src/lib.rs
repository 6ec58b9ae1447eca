// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    TopDomainsOptions, expand_path, handle_top_domains, print_banner, run_top_domains,
};

// Re-export the aggregation entry points from outrank-core
pub use outrank_core::{
    TopDomainsReport, compute_top_domains, compute_top_second_level_domains,
    filter_external_outlinks,
};
