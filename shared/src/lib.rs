pub mod catalog;
pub mod command;
pub mod species;

pub use catalog::*;
pub use command::*;
pub use species::*;

/// The species catalog format version - catalog files must match this exactly
pub const CATALOG_VERSION: u32 = 1;
