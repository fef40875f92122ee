mod dts;
mod manifest;
mod structure;

pub use dts::render_declarations;
pub use manifest::{patch_manifest, PatchOutcome};
pub use structure::{dependency_dir, local_reference, write_structure, DECLARATION_FILE};
