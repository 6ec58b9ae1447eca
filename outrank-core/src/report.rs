//! Assembles the final JSON document out of the computed leaderboards.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde_json::json;

use crate::stats::DomainLinkStats;

/// Both leaderboards of one batch run, ready for serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopDomainsReport {
    pub top_domains: Vec<(u64, DomainLinkStats)>,
    pub top_second_level_domains: Vec<(u64, DomainLinkStats)>,
}

impl TopDomainsReport {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "report": {
                "metadata": {
                    "generator": "outrank",
                    "version": env!("CARGO_PKG_VERSION"),
                    "generated_at": chrono::Utc::now().to_rfc3339(),
                },
                "top_domains": entries(&self.top_domains),
                "top_second_level_domains": entries(&self.top_second_level_domains),
            }
        })
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_json())
    }
}

fn entries(ranked: &[(u64, DomainLinkStats)]) -> Vec<serde_json::Value> {
    // the ranking count is already inside each entry as unique_follow_links
    ranked.iter().map(|(_, stats)| stats.to_json()).collect()
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
