pub mod error;
pub mod predicates;
pub mod reader;
pub mod record;
pub mod sort;
pub mod urls;

pub use error::{Result, StreamError};
pub use reader::TsvLinkReader;
pub use record::{LinkRecord, LinkType};
pub use sort::{ExternalSorter, MemorySorter, Sorter};
