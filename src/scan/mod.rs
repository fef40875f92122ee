mod walker;

pub use walker::discover_sources;
