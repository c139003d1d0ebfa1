pub mod exclusions;

pub use exclusions::{EditError, ExclusionList};
