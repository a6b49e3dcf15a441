pub use super::pet::Entity as Pet;
pub use super::prescription::Entity as Prescription;
pub use super::user::Entity as User;
pub use super::veterinarian::Entity as Veterinarian;
