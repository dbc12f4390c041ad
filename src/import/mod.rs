pub mod dataset;

// Re-export commonly used items
pub use dataset::{parse_dataset, parse_decimal};
