//! Loading case-count tables and district boundaries.

mod parser;
mod regions;
mod source;

pub use parser::{load_table, Parser, ParserConfig};
pub use regions::{load_regions, Region, RegionCollection, DEFAULT_REGION_KEY};
pub use source::{Dataset, Record, SourceMetadata, Value};
