//! Loading and validation for match rules and team rosters.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
