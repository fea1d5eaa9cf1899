pub mod core;
pub mod export;
pub mod parser;
pub mod pipeline;

pub use crate::core::model::{LetterSection, Reconstruction, ReferenceEntry};
pub use crate::core::tracker::LetterTracker;
