use chrono::{NaiveDate, NaiveDateTime};
use entity::{pet, prescription, user, veterinarian};
use pretty_assertions::assert_eq;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Schema,
};
use vet_clinic_service::{
    Mutation, NewPet, NewPrescription, NewUser, NewVeterinarian, PrescriptionRange, Query,
};

async fn setup() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    db.execute(backend.build(&schema.create_table_from_entity(user::Entity)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(veterinarian::Entity)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(pet::Entity)))
        .await
        .unwrap();
    db.execute(backend.build(&schema.create_table_from_entity(prescription::Entity)))
        .await
        .unwrap();

    db
}

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

async fn owner(db: &DatabaseConnection, name: &str, email: &str) -> user::Model {
    Mutation::create_user(
        db,
        NewUser {
            name: name.to_owned(),
            email: email.to_owned(),
            password: "s3cret".to_owned(),
            is_active: true,
        },
    )
    .await
    .unwrap()
}

async fn vet(db: &DatabaseConnection, email: &str) -> veterinarian::Model {
    Mutation::create_veterinarian(
        db,
        NewVeterinarian {
            name: "Dra. Ruiz".to_owned(),
            email: email.to_owned(),
            phone: Some("555-0101".to_owned()),
        },
    )
    .await
    .unwrap()
}

async fn pet_of(db: &DatabaseConnection, owner_id: i32, name: &str) -> pet::Model {
    Mutation::create_pet(
        db,
        NewPet {
            name: name.to_owned(),
            species: "gato".to_owned(),
            breed: None,
            age: Some(2),
            weight: None,
            sex: None,
            owner_id,
        },
    )
    .await
    .unwrap()
}

async fn prescribe(
    db: &DatabaseConnection,
    user_id: i32,
    veterinarian_id: i32,
    pet_id: i32,
    issued_at: NaiveDateTime,
) -> prescription::Model {
    Mutation::create_prescription(
        db,
        NewPrescription {
            issued_at,
            diagnosis: "dermatitis".to_owned(),
            treatment: "crema".to_owned(),
            user_id,
            veterinarian_id,
            pet_id,
        },
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn creates_and_serializes_nested_records() {
    let db = &setup().await;

    let ana = owner(db, "Ana", "ana@clinic.test").await;
    let ruiz = vet(db, "ruiz@clinic.test").await;
    let michi = pet_of(db, ana.id, "Michi").await;
    let receta = prescribe(db, ana.id, ruiz.id, michi.id, at(5, 10)).await;

    let users = Query::list_users(db).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "Ana");
    assert_eq!(users[0].pets.len(), 1);
    assert_eq!(users[0].pets[0].owner.as_ref().unwrap().email, "ana@clinic.test");
    assert_eq!(users[0].prescriptions.len(), 1);
    assert_eq!(users[0].prescriptions[0].id, receta.id);

    let vets = Query::list_veterinarians(db).await.unwrap();
    assert_eq!(vets[0].phone.as_deref(), Some("555-0101"));
    assert_eq!(vets[0].prescriptions.len(), 1);

    let view = Query::prescription_view(db, receta).await.unwrap();
    assert_eq!(view.issued_at, "2024-03-05 10:00:00");
    assert_eq!(view.user.unwrap().name, "Ana");
    assert_eq!(view.veterinarian.unwrap().name, "Dra. Ruiz");
    assert_eq!(view.pet.unwrap().name, "Michi");

    let value = serde_json::to_value(&users).unwrap();
    assert!(value[0].get("password").is_none());
}

#[tokio::test]
async fn list_groups_pets_and_prescriptions_by_owner() {
    let db = &setup().await;

    let ana = owner(db, "Ana", "ana@clinic.test").await;
    let luis = owner(db, "Luis", "luis@clinic.test").await;
    let ruiz = vet(db, "ruiz@clinic.test").await;
    let michi = pet_of(db, ana.id, "Michi").await;
    let toby = pet_of(db, luis.id, "Toby").await;
    let nala = pet_of(db, luis.id, "Nala").await;
    prescribe(db, luis.id, ruiz.id, toby.id, at(1, 9)).await;
    prescribe(db, ana.id, ruiz.id, michi.id, at(2, 9)).await;
    prescribe(db, luis.id, ruiz.id, nala.id, at(3, 9)).await;

    let users = Query::list_users(db).await.unwrap();
    let pets: Vec<Vec<&str>> = users
        .iter()
        .map(|u| u.pets.iter().map(|p| p.name.as_str()).collect())
        .collect();
    assert_eq!(pets, vec![vec!["Michi"], vec!["Toby", "Nala"]]);

    let prescribed: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            u.prescriptions
                .iter()
                .map(|p| p.pet.as_ref().unwrap().name.clone())
                .collect()
        })
        .collect();
    assert_eq!(
        prescribed,
        vec![vec!["Michi".to_owned()], vec!["Toby".to_owned(), "Nala".to_owned()]]
    );

    let pets = Query::list_pets(db).await.unwrap();
    assert_eq!(pets[2].owner.as_ref().unwrap().name, "Luis");
}

#[tokio::test]
async fn prescriptions_filter_by_inclusive_range() {
    let db = &setup().await;

    let ana = owner(db, "Ana", "ana@clinic.test").await;
    let ruiz = vet(db, "ruiz@clinic.test").await;
    let michi = pet_of(db, ana.id, "Michi").await;

    let just_before = at(1, 0) - chrono::Duration::seconds(1);
    let before = prescribe(db, ana.id, ruiz.id, michi.id, just_before).await;
    let start = prescribe(db, ana.id, ruiz.id, michi.id, at(1, 0)).await;
    let middle = prescribe(db, ana.id, ruiz.id, michi.id, at(5, 18)).await;
    let end = prescribe(db, ana.id, ruiz.id, michi.id, at(9, 0)).await;
    let after = prescribe(db, ana.id, ruiz.id, michi.id, at(9, 8)).await;

    let range = PrescriptionRange {
        from: Some(at(1, 0)),
        to: Some(at(9, 0)),
    };
    let ids: Vec<i32> = Query::list_prescriptions(db, range)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![start.id, middle.id, end.id]);

    let open_end = PrescriptionRange {
        from: Some(at(5, 0)),
        to: None,
    };
    let ids: Vec<i32> = Query::list_prescriptions(db, open_end)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![middle.id, end.id, after.id]);

    let everything = Query::list_prescriptions(db, PrescriptionRange::default())
        .await
        .unwrap();
    assert_eq!(everything.len(), 5);
    assert_eq!(everything[0].id, before.id);
}

#[tokio::test]
async fn duplicate_email_is_a_unique_violation() {
    let db = &setup().await;

    vet(db, "dup@clinic.test").await;
    let err = Mutation::create_veterinarian(
        db,
        NewVeterinarian {
            name: "Otro".to_owned(),
            email: "dup@clinic.test".to_owned(),
            phone: None,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    ));
    assert_eq!(veterinarian::Entity::find().count(db).await.unwrap(), 1);
}

#[tokio::test]
async fn deleting_a_user_cascades_to_pets_and_prescriptions() {
    let db = &setup().await;

    let ana = owner(db, "Ana", "ana@clinic.test").await;
    let luis = owner(db, "Luis", "luis@clinic.test").await;
    let ruiz = vet(db, "ruiz@clinic.test").await;
    let michi = pet_of(db, ana.id, "Michi").await;
    let toby = pet_of(db, luis.id, "Toby").await;
    prescribe(db, ana.id, ruiz.id, michi.id, at(2, 9)).await;
    // Issued to Luis for Ana's pet: still goes with the pet.
    prescribe(db, luis.id, ruiz.id, michi.id, at(3, 9)).await;
    let kept = prescribe(db, luis.id, ruiz.id, toby.id, at(4, 9)).await;

    let res = Mutation::delete_user(db, ana.id).await.unwrap();
    assert_eq!(res.rows_affected, 1);

    assert!(Query::find_user_by_id(db, ana.id).await.unwrap().is_none());
    assert!(Query::find_pet_by_id(db, michi.id).await.unwrap().is_none());
    assert_eq!(pet::Entity::find().count(db).await.unwrap(), 1);

    let remaining = prescription::Entity::find().all(db).await.unwrap();
    assert_eq!(remaining, vec![kept]);
    assert!(Query::find_veterinarian_by_id(db, ruiz.id).await.unwrap().is_some());
}

#[tokio::test]
async fn deleting_a_veterinarian_or_pet_only_removes_their_prescriptions() {
    let db = &setup().await;

    let ana = owner(db, "Ana", "ana@clinic.test").await;
    let ruiz = vet(db, "ruiz@clinic.test").await;
    let soto = vet(db, "soto@clinic.test").await;
    let michi = pet_of(db, ana.id, "Michi").await;
    let toby = pet_of(db, ana.id, "Toby").await;
    prescribe(db, ana.id, ruiz.id, michi.id, at(2, 9)).await;
    let by_soto = prescribe(db, ana.id, soto.id, toby.id, at(3, 9)).await;

    Mutation::delete_veterinarian(db, ruiz.id).await.unwrap();
    assert_eq!(
        prescription::Entity::find().all(db).await.unwrap(),
        vec![by_soto.clone()]
    );
    assert!(Query::find_pet_by_id(db, michi.id).await.unwrap().is_some());

    Mutation::delete_pet(db, toby.id).await.unwrap();
    assert_eq!(prescription::Entity::find().count(db).await.unwrap(), 0);
    assert!(Query::find_user_by_id(db, ana.id).await.unwrap().is_some());
    assert!(Query::find_veterinarian_by_id(db, soto.id).await.unwrap().is_some());
}

#[tokio::test]
async fn deleting_a_prescription_keeps_its_references() {
    let db = &setup().await;

    let ana = owner(db, "Ana", "ana@clinic.test").await;
    let ruiz = vet(db, "ruiz@clinic.test").await;
    let michi = pet_of(db, ana.id, "Michi").await;
    let receta = prescribe(db, ana.id, ruiz.id, michi.id, at(2, 9)).await;

    Mutation::delete_prescription(db, receta.id).await.unwrap();

    assert!(Query::find_prescription_by_id(db, receta.id).await.unwrap().is_none());
    assert!(Query::find_user_by_id(db, ana.id).await.unwrap().is_some());
    assert!(Query::find_veterinarian_by_id(db, ruiz.id).await.unwrap().is_some());
    assert!(Query::find_pet_by_id(db, michi.id).await.unwrap().is_some());
}

#[tokio::test]
async fn deleting_a_missing_record_is_not_found() {
    let db = &setup().await;

    assert!(matches!(
        Mutation::delete_user(db, 42).await,
        Err(DbErr::RecordNotFound(_))
    ));
    assert!(matches!(
        Mutation::delete_prescription(db, 42).await,
        Err(DbErr::RecordNotFound(_))
    ));
}
