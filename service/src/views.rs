//! Serialized shapes of the clinic records.
//!
//! Every view is built from a model plus one level of related records. Keys follow the
//! wire contract of the clinic front end (`nombre`, `propietario`, `recetas`, ...).
//! A `UserView` has no password field, so no stored password can ever be serialized.

use entity::{pet, prescription, user, veterinarian};
use serde::Serialize;

/// Format of every serialized timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "mascota")]
    pub pets: Vec<PetView>,
    #[serde(rename = "recetas")]
    pub prescriptions: Vec<PrescriptionView>,
}

impl UserView {
    pub fn new(user: user::Model, pets: Vec<PetView>, prescriptions: Vec<PrescriptionView>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            pets,
            prescriptions,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VeterinarianView {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "recetas")]
    pub prescriptions: Vec<PrescriptionView>,
}

impl VeterinarianView {
    pub fn new(veterinarian: veterinarian::Model, prescriptions: Vec<PrescriptionView>) -> Self {
        Self {
            id: veterinarian.id,
            name: veterinarian.name,
            email: veterinarian.email,
            phone: veterinarian.phone,
            prescriptions,
        }
    }
}

/// Owner as nested under a pet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OwnerSummary {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
}

impl From<&user::Model> for OwnerSummary {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PetView {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "especie")]
    pub species: String,
    #[serde(rename = "raza")]
    pub breed: Option<String>,
    #[serde(rename = "edad")]
    pub age: Option<i32>,
    #[serde(rename = "peso")]
    pub weight: Option<i32>,
    #[serde(rename = "sexo")]
    pub sex: Option<String>,
    #[serde(rename = "propietario")]
    pub owner: Option<OwnerSummary>,
}

impl PetView {
    pub fn new(pet: pet::Model, owner: Option<OwnerSummary>) -> Self {
        Self {
            id: pet.id,
            name: pet.name,
            species: pet.species,
            breed: pet.breed,
            age: pet.age,
            weight: pet.weight,
            sex: pet.sex,
            owner,
        }
    }
}

/// Id and name of a record referenced by a prescription.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub id: i32,
    #[serde(rename = "nombre")]
    pub name: String,
}

impl From<&user::Model> for Summary {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

impl From<&veterinarian::Model> for Summary {
    fn from(veterinarian: &veterinarian::Model) -> Self {
        Self {
            id: veterinarian.id,
            name: veterinarian.name.clone(),
        }
    }
}

impl From<&pet::Model> for Summary {
    fn from(pet: &pet::Model) -> Self {
        Self {
            id: pet.id,
            name: pet.name.clone(),
        }
    }
}

/// A prescription with its three references resolved.
///
/// A reference that could not be resolved serializes as `null`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PrescriptionView {
    pub id: i32,
    #[serde(rename = "fecha")]
    pub issued_at: String,
    #[serde(rename = "diagnostico")]
    pub diagnosis: String,
    #[serde(rename = "tratamiento")]
    pub treatment: String,
    #[serde(rename = "usuario")]
    pub user: Option<Summary>,
    #[serde(rename = "veterinario")]
    pub veterinarian: Option<Summary>,
    #[serde(rename = "mascota")]
    pub pet: Option<Summary>,
}

impl PrescriptionView {
    pub fn new(
        prescription: prescription::Model,
        user: Option<&user::Model>,
        veterinarian: Option<&veterinarian::Model>,
        pet: Option<&pet::Model>,
    ) -> Self {
        Self {
            id: prescription.id,
            issued_at: prescription.issued_at.format(TIMESTAMP_FORMAT).to_string(),
            diagnosis: prescription.diagnosis,
            treatment: prescription.treatment,
            user: user.map(Summary::from),
            veterinarian: veterinarian.map(Summary::from),
            pet: pet.map(Summary::from),
        }
    }
}
