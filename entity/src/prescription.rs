use sea_orm::entity::prelude::*;

/// A prescription links one owner, one veterinarian and one pet.
///
/// The foreign keys carry no storage-level cascade. Removing a prescription never
/// touches the records it references; removing an owner, veterinarian or pet clears
/// its prescriptions first (see `Mutation::delete_*` in the service crate).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "recetas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_name = "fecha")]
    pub issued_at: DateTime,
    #[sea_orm(column_name = "diagnostico", column_type = "Text")]
    pub diagnosis: String,
    #[sea_orm(column_name = "tratamiento", column_type = "Text")]
    pub treatment: String,
    #[sea_orm(column_name = "id_usuario")]
    pub user_id: i32,
    #[sea_orm(column_name = "id_veterinario")]
    pub veterinarian_id: i32,
    #[sea_orm(column_name = "id_mascota")]
    pub pet_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::veterinarian::Entity",
        from = "Column::VeterinarianId",
        to = "super::veterinarian::Column::Id"
    )]
    Veterinarian,
    #[sea_orm(
        belongs_to = "super::pet::Entity",
        from = "Column::PetId",
        to = "super::pet::Column::Id"
    )]
    Pet,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::veterinarian::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Veterinarian.def()
    }
}

impl Related<super::pet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
