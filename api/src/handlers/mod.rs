pub mod pets;
pub mod prescriptions;
pub mod users;
pub mod veterinarians;
