pub mod common;
pub mod diversity;
pub mod graph;
pub mod regionalize;
