//! SeaORM entities for the clinic records: owners, veterinarians, pets and prescriptions.

pub mod prelude;

pub mod pet;
pub mod prescription;
pub mod user;
pub mod veterinarian;
