use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "mascota")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_name = "nombre")]
    pub name: String,
    #[sea_orm(column_name = "especie")]
    pub species: String,
    #[sea_orm(column_name = "raza")]
    pub breed: Option<String>,
    #[sea_orm(column_name = "edad")]
    pub age: Option<i32>,
    #[sea_orm(column_name = "peso")]
    pub weight: Option<i32>,
    #[sea_orm(column_name = "sexo")]
    pub sex: Option<String>,
    #[sea_orm(column_name = "propietario_id")]
    pub owner_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::prescription::Entity")]
    Prescription,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::prescription::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prescription.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
