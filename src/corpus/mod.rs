pub mod binner;
pub mod cleaner;
pub mod export;
pub mod flatten;
pub mod grouping;

pub use binner::{BinConfig, BinStats, Binner, Mode};
pub use cleaner::{load_stopwords, CleanerConfig};
pub use export::TxtExporter;
pub use grouping::{group_paths, DateGroup, Resolution};
