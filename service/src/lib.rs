mod mutation;
mod query;
pub mod views;

pub use mutation::*;
pub use query::*;

pub use sea_orm;
