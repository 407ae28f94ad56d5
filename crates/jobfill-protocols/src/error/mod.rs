//! Error types for the jobfill protocol layer.

mod field;
mod page;
mod provider;
mod run;
mod store;

pub use field::*;
pub use page::*;
pub use provider::*;
pub use run::*;
pub use store::*;
