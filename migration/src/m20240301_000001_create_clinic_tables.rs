use entity::{pet, prescription, user, veterinarian};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{DbBackend, EntityTrait, Schema};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn get_seaorm_create_stmt<E: EntityTrait>(backend: DbBackend, e: E) -> TableCreateStatement {
    let schema = Schema::new(backend);

    schema
        .create_table_from_entity(e)
        .if_not_exists()
        .to_owned()
}

fn get_seaorm_drop_stmt<E: EntityTrait>(e: E) -> TableDropStatement {
    Table::drop().table(e).if_exists().to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        // Owners first: every foreign key must point at an existing table.
        let stmts = vec![
            get_seaorm_create_stmt(backend, user::Entity),
            get_seaorm_create_stmt(backend, veterinarian::Entity),
            get_seaorm_create_stmt(backend, pet::Entity),
            get_seaorm_create_stmt(backend, prescription::Entity),
        ];

        for stmt in stmts {
            manager.create_table(stmt).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let stmts = vec![
            get_seaorm_drop_stmt(prescription::Entity),
            get_seaorm_drop_stmt(pet::Entity),
            get_seaorm_drop_stmt(veterinarian::Entity),
            get_seaorm_drop_stmt(user::Entity),
        ];

        for stmt in stmts {
            manager.drop_table(stmt).await?;
        }

        Ok(())
    }
}
