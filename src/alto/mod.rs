pub mod extract;
pub mod tree;

pub use extract::extract_file;
