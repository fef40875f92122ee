mod access;
mod exports;
mod imports;
mod parser;

pub use access::scan_member_accesses;
pub use exports::parse_export;
pub use imports::parse_import;
pub use parser::{ExtractWarning, Extraction, Extractor};
