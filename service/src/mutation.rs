use ::entity::{pet, prelude::*, prescription, user, veterinarian};
use chrono::NaiveDateTime;
use sea_orm::*;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub is_active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewVeterinarian {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub age: Option<i32>,
    pub weight: Option<i32>,
    pub sex: Option<String>,
    pub owner_id: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPrescription {
    pub issued_at: NaiveDateTime,
    pub diagnosis: String,
    pub treatment: String,
    pub user_id: i32,
    pub veterinarian_id: i32,
    pub pet_id: i32,
}

pub struct Mutation;

impl Mutation {
    pub async fn create_user(db: &DbConn, form_data: NewUser) -> Result<user::Model, DbErr> {
        let user = user::ActiveModel {
            name: Set(form_data.name),
            email: Set(form_data.email),
            password: Set(form_data.password),
            is_active: Set(form_data.is_active),
            ..Default::default()
        }
        .insert(db)
        .await?;
        info!(user_id = user.id, "created user");

        Ok(user)
    }

    pub async fn create_veterinarian(
        db: &DbConn,
        form_data: NewVeterinarian,
    ) -> Result<veterinarian::Model, DbErr> {
        let veterinarian = veterinarian::ActiveModel {
            name: Set(form_data.name),
            email: Set(form_data.email),
            phone: Set(form_data.phone),
            ..Default::default()
        }
        .insert(db)
        .await?;
        info!(veterinarian_id = veterinarian.id, "created veterinarian");

        Ok(veterinarian)
    }

    pub async fn create_pet(db: &DbConn, form_data: NewPet) -> Result<pet::Model, DbErr> {
        let pet = pet::ActiveModel {
            name: Set(form_data.name),
            species: Set(form_data.species),
            breed: Set(form_data.breed),
            age: Set(form_data.age),
            weight: Set(form_data.weight),
            sex: Set(form_data.sex),
            owner_id: Set(form_data.owner_id),
            ..Default::default()
        }
        .insert(db)
        .await?;
        info!(pet_id = pet.id, owner_id = pet.owner_id, "created pet");

        Ok(pet)
    }

    pub async fn create_prescription(
        db: &DbConn,
        form_data: NewPrescription,
    ) -> Result<prescription::Model, DbErr> {
        let prescription = prescription::ActiveModel {
            issued_at: Set(form_data.issued_at),
            diagnosis: Set(form_data.diagnosis),
            treatment: Set(form_data.treatment),
            user_id: Set(form_data.user_id),
            veterinarian_id: Set(form_data.veterinarian_id),
            pet_id: Set(form_data.pet_id),
            ..Default::default()
        }
        .insert(db)
        .await?;
        info!(
            prescription_id = prescription.id,
            user_id = prescription.user_id,
            veterinarian_id = prescription.veterinarian_id,
            pet_id = prescription.pet_id,
            "created prescription"
        );

        Ok(prescription)
    }

    /// Deletes an owner together with their pets and every prescription issued to
    /// them or to one of their pets.
    pub async fn delete_user(db: &DbConn, id: i32) -> Result<DeleteResult, DbErr> {
        let txn = db.begin().await?;

        let user = User::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Cannot find user {id}.")))?;
        let pet_ids: Vec<i32> = user
            .find_related(Pet)
            .all(&txn)
            .await?
            .into_iter()
            .map(|pet| pet.id)
            .collect();

        let prescriptions = Prescription::delete_many()
            .filter(
                Condition::any()
                    .add(prescription::Column::UserId.eq(id))
                    .add(prescription::Column::PetId.is_in(pet_ids)),
            )
            .exec(&txn)
            .await?;
        let pets = Pet::delete_many()
            .filter(pet::Column::OwnerId.eq(id))
            .exec(&txn)
            .await?;
        let res = user.delete(&txn).await?;

        txn.commit().await?;
        info!(
            user_id = id,
            pets = pets.rows_affected,
            prescriptions = prescriptions.rows_affected,
            "deleted user"
        );

        Ok(res)
    }

    /// Deletes a veterinarian and the prescriptions they issued.
    pub async fn delete_veterinarian(db: &DbConn, id: i32) -> Result<DeleteResult, DbErr> {
        let txn = db.begin().await?;

        let veterinarian = Veterinarian::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Cannot find veterinarian {id}.")))?;

        let prescriptions = Prescription::delete_many()
            .filter(prescription::Column::VeterinarianId.eq(id))
            .exec(&txn)
            .await?;
        let res = veterinarian.delete(&txn).await?;

        txn.commit().await?;
        info!(
            veterinarian_id = id,
            prescriptions = prescriptions.rows_affected,
            "deleted veterinarian"
        );

        Ok(res)
    }

    /// Deletes a pet and its prescriptions. The owner is left untouched.
    pub async fn delete_pet(db: &DbConn, id: i32) -> Result<DeleteResult, DbErr> {
        let txn = db.begin().await?;

        let pet = Pet::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Cannot find pet {id}.")))?;

        let prescriptions = Prescription::delete_many()
            .filter(prescription::Column::PetId.eq(id))
            .exec(&txn)
            .await?;
        let res = pet.delete(&txn).await?;

        txn.commit().await?;
        info!(
            pet_id = id,
            prescriptions = prescriptions.rows_affected,
            "deleted pet"
        );

        Ok(res)
    }

    /// Deletes only the prescription; its owner, veterinarian and pet stay.
    pub async fn delete_prescription(db: &DbConn, id: i32) -> Result<DeleteResult, DbErr> {
        let prescription = Prescription::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Cannot find prescription {id}.")))?;

        let res = prescription.delete(db).await?;
        info!(prescription_id = id, "deleted prescription");

        Ok(res)
    }
}
