pub mod context;
pub mod fixtures;
