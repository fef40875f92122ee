mod json;

pub use json::{DependencyOutput, JsonReport, MethodOutput};
