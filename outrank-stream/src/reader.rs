//! Reader for the raw outlinks stream.
//!
//! The on-disk format is tab separated, one link per row:
//!
//! ```text
//! id \t link_type \t bitmask \t dst_url_id \t external_url
//! ```
//!
//! `dst_url_id` is `-1` and `external_url` non-empty when the destination is
//! external. A row with the wrong arity or an untypeable field aborts the
//! batch: silently skipping records would bias every count computed
//! downstream.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Read};
use std::path::Path;

use crate::error::{Result, StreamError};
use crate::record::{LinkRecord, LinkType};

const FIELD_COUNT: usize = 5;

pub struct TsvLinkReader<R> {
    lines: Lines<BufReader<R>>,
    line: u64,
}

impl TsvLinkReader<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<R: Read> TsvLinkReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            lines: BufReader::new(inner).lines(),
            line: 0,
        }
    }

    fn malformed(&self, reason: impl Into<String>) -> StreamError {
        StreamError::MalformedRecord {
            line: self.line,
            reason: reason.into(),
        }
    }

    fn parse_row(&self, raw: &str) -> Result<LinkRecord> {
        let fields: Vec<&str> = raw.split('\t').collect();
        if fields.len() != FIELD_COUNT {
            return Err(self.malformed(format!(
                "expected {} fields, got {}",
                FIELD_COUNT,
                fields.len()
            )));
        }

        let id: u64 = fields[0]
            .parse()
            .map_err(|_| self.malformed(format!("invalid source page id '{}'", fields[0])))?;
        let link_type = LinkType::parse(fields[1]);
        let bitmask: u32 = fields[2]
            .parse()
            .map_err(|_| self.malformed(format!("invalid bitmask '{}'", fields[2])))?;
        let dst_url_id = match fields[3] {
            "-1" => None,
            other => Some(
                other
                    .parse::<u64>()
                    .map_err(|_| self.malformed(format!("invalid dst_url_id '{}'", other)))?,
            ),
        };
        let external_url = if fields[4].is_empty() {
            None
        } else {
            Some(fields[4].to_string())
        };

        Ok(LinkRecord {
            id,
            link_type,
            bitmask,
            dst_url_id,
            external_url,
        })
    }
}

impl<R: Read> Iterator for TsvLinkReader<R> {
    type Item = Result<LinkRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw = match self.lines.next()? {
                Ok(raw) => raw,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;
            if raw.is_empty() {
                continue;
            }
            return Some(self.parse_row(&raw));
        }
    }
}
