use ::entity::{pet, prelude::*, prescription, user, veterinarian};
use chrono::NaiveDateTime;
use sea_orm::*;
use tracing::debug;

use crate::views::{OwnerSummary, PetView, PrescriptionView, UserView, VeterinarianView};

/// Inclusive bounds on a prescription's timestamp. A missing bound is open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrescriptionRange {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

pub struct Query;

impl Query {
    pub async fn find_user_by_id(db: &DbConn, id: i32) -> Result<Option<user::Model>, DbErr> {
        User::find_by_id(id).one(db).await
    }

    pub async fn find_user_by_email(
        db: &DbConn,
        email: &str,
    ) -> Result<Option<user::Model>, DbErr> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(db)
            .await
    }

    pub async fn find_veterinarian_by_id(
        db: &DbConn,
        id: i32,
    ) -> Result<Option<veterinarian::Model>, DbErr> {
        Veterinarian::find_by_id(id).one(db).await
    }

    pub async fn find_veterinarian_by_email(
        db: &DbConn,
        email: &str,
    ) -> Result<Option<veterinarian::Model>, DbErr> {
        Veterinarian::find()
            .filter(veterinarian::Column::Email.eq(email))
            .one(db)
            .await
    }

    pub async fn find_pet_by_id(db: &DbConn, id: i32) -> Result<Option<pet::Model>, DbErr> {
        Pet::find_by_id(id).one(db).await
    }

    pub async fn find_prescription_by_id(
        db: &DbConn,
        id: i32,
    ) -> Result<Option<prescription::Model>, DbErr> {
        Prescription::find_by_id(id).one(db).await
    }

    /// Every owner with their pets and prescriptions.
    pub async fn list_users(db: &DbConn) -> Result<Vec<UserView>, DbErr> {
        let users = User::find().order_by_asc(user::Column::Id).all(db).await?;
        debug!(count = users.len(), "listing users");

        Self::user_views(db, users).await
    }

    /// Every veterinarian with the prescriptions they issued.
    pub async fn list_veterinarians(db: &DbConn) -> Result<Vec<VeterinarianView>, DbErr> {
        let veterinarians = Veterinarian::find()
            .order_by_asc(veterinarian::Column::Id)
            .all(db)
            .await?;
        debug!(count = veterinarians.len(), "listing veterinarians");

        Self::veterinarian_views(db, veterinarians).await
    }

    pub async fn list_pets(db: &DbConn) -> Result<Vec<PetView>, DbErr> {
        let pets = Pet::find().order_by_asc(pet::Column::Id).all(db).await?;
        debug!(count = pets.len(), "listing pets");

        Self::pet_views(db, pets).await
    }

    pub async fn list_prescriptions(
        db: &DbConn,
        range: PrescriptionRange,
    ) -> Result<Vec<PrescriptionView>, DbErr> {
        let mut select = Prescription::find();
        if let Some(from) = range.from {
            select = select.filter(prescription::Column::IssuedAt.gte(from));
        }
        if let Some(to) = range.to {
            select = select.filter(prescription::Column::IssuedAt.lte(to));
        }

        let prescriptions = select
            .order_by_asc(prescription::Column::Id)
            .all(db)
            .await?;
        debug!(count = prescriptions.len(), ?range, "listing prescriptions");

        Self::prescription_views(db, prescriptions).await
    }

    pub async fn user_view(db: &DbConn, user: user::Model) -> Result<UserView, DbErr> {
        let pets = user
            .find_related(Pet)
            .order_by_asc(pet::Column::Id)
            .all(db)
            .await?;
        let prescriptions = user
            .find_related(Prescription)
            .order_by_asc(prescription::Column::Id)
            .all(db)
            .await?;

        let owner = OwnerSummary::from(&user);
        let pets = pets
            .into_iter()
            .map(|pet| PetView::new(pet, Some(owner.clone())))
            .collect();
        let prescriptions = Self::prescription_views(db, prescriptions).await?;

        Ok(UserView::new(user, pets, prescriptions))
    }

    pub async fn veterinarian_view(
        db: &DbConn,
        veterinarian: veterinarian::Model,
    ) -> Result<VeterinarianView, DbErr> {
        let prescriptions = veterinarian
            .find_related(Prescription)
            .order_by_asc(prescription::Column::Id)
            .all(db)
            .await?;
        let prescriptions = Self::prescription_views(db, prescriptions).await?;

        Ok(VeterinarianView::new(veterinarian, prescriptions))
    }

    pub async fn pet_view(db: &DbConn, pet: pet::Model) -> Result<PetView, DbErr> {
        let owner = pet.find_related(User).one(db).await?;

        Ok(PetView::new(pet, owner.as_ref().map(OwnerSummary::from)))
    }

    pub async fn prescription_view(
        db: &DbConn,
        prescription: prescription::Model,
    ) -> Result<PrescriptionView, DbErr> {
        let user = prescription.find_related(User).one(db).await?;
        let veterinarian = prescription.find_related(Veterinarian).one(db).await?;
        let pet = prescription.find_related(Pet).one(db).await?;

        Ok(PrescriptionView::new(
            prescription,
            user.as_ref(),
            veterinarian.as_ref(),
            pet.as_ref(),
        ))
    }

    async fn user_views(db: &DbConn, users: Vec<user::Model>) -> Result<Vec<UserView>, DbErr> {
        if users.is_empty() {
            return Ok(Vec::new());
        }

        let pets = users
            .load_many(Pet::find().order_by_asc(pet::Column::Id), db)
            .await?;
        let prescriptions = users
            .load_many(
                Prescription::find().order_by_asc(prescription::Column::Id),
                db,
            )
            .await?;

        // Resolve all prescriptions in one pass, then hand them back per owner.
        let counts: Vec<usize> = prescriptions.iter().map(Vec::len).collect();
        let mut prescription_views =
            Self::prescription_views(db, prescriptions.into_iter().flatten().collect())
                .await?
                .into_iter();

        let mut views = Vec::with_capacity(users.len());
        for ((user, pets), count) in users.into_iter().zip(pets).zip(counts) {
            let owner = OwnerSummary::from(&user);
            let pets = pets
                .into_iter()
                .map(|pet| PetView::new(pet, Some(owner.clone())))
                .collect();
            let prescriptions = prescription_views.by_ref().take(count).collect();
            views.push(UserView::new(user, pets, prescriptions));
        }

        Ok(views)
    }

    async fn veterinarian_views(
        db: &DbConn,
        veterinarians: Vec<veterinarian::Model>,
    ) -> Result<Vec<VeterinarianView>, DbErr> {
        if veterinarians.is_empty() {
            return Ok(Vec::new());
        }

        let prescriptions = veterinarians
            .load_many(
                Prescription::find().order_by_asc(prescription::Column::Id),
                db,
            )
            .await?;

        let counts: Vec<usize> = prescriptions.iter().map(Vec::len).collect();
        let mut prescription_views =
            Self::prescription_views(db, prescriptions.into_iter().flatten().collect())
                .await?
                .into_iter();

        Ok(veterinarians
            .into_iter()
            .zip(counts)
            .map(|(veterinarian, count)| {
                VeterinarianView::new(
                    veterinarian,
                    prescription_views.by_ref().take(count).collect(),
                )
            })
            .collect())
    }

    async fn pet_views(db: &DbConn, pets: Vec<pet::Model>) -> Result<Vec<PetView>, DbErr> {
        if pets.is_empty() {
            return Ok(Vec::new());
        }

        let owners = pets.load_one(User, db).await?;

        Ok(pets
            .into_iter()
            .zip(owners)
            .map(|(pet, owner)| PetView::new(pet, owner.as_ref().map(OwnerSummary::from)))
            .collect())
    }

    async fn prescription_views(
        db: &DbConn,
        prescriptions: Vec<prescription::Model>,
    ) -> Result<Vec<PrescriptionView>, DbErr> {
        if prescriptions.is_empty() {
            return Ok(Vec::new());
        }

        let users = prescriptions.load_one(User, db).await?;
        let veterinarians = prescriptions.load_one(Veterinarian, db).await?;
        let pets = prescriptions.load_one(Pet, db).await?;

        Ok(prescriptions
            .into_iter()
            .zip(users)
            .zip(veterinarians)
            .zip(pets)
            .map(|(((prescription, user), veterinarian), pet)| {
                PrescriptionView::new(
                    prescription,
                    user.as_ref(),
                    veterinarian.as_ref(),
                    pet.as_ref(),
                )
            })
            .collect())
    }
}
