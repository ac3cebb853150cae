pub use sea_orm_migration::prelude::*;

mod m20240315_000001_create_schema_and_base_db_setup;
mod m20240315_000002_create_users;
mod m20240315_000003_create_follows_and_friend_requests;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240315_000001_create_schema_and_base_db_setup::Migration),
            Box::new(m20240315_000002_create_users::Migration),
            Box::new(m20240315_000003_create_follows_and_friend_requests::Migration),
        ]
    }
}
