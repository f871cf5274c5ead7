/// Configuration management
pub mod options;
pub mod recipe;

pub use options::*;
pub use recipe::*;
