use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create the users table. Rows are owned by the external account
        // service; this platform only reads and updates profile fields.
        let create_table_sql = r#"
            CREATE TABLE IF NOT EXISTS social_platform.users (
                id BIGSERIAL PRIMARY KEY,
                username VARCHAR(255) NOT NULL UNIQUE,
                email VARCHAR(255) NOT NULL UNIQUE,

                first_name VARCHAR(255),
                last_name VARCHAR(255),
                bio TEXT,
                avatar_url VARCHAR(1024),
                is_approved BOOLEAN NOT NULL DEFAULT FALSE,

                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_table_sql)
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TABLE social_platform.users OWNER TO social")
            .await?;

        // Name search matches case-insensitively on first or last name.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_users_first_name_lower
                 ON social_platform.users(LOWER(first_name))",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_users_last_name_lower
                 ON social_platform.users(LOWER(last_name))",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS social_platform.users")
            .await?;

        Ok(())
    }
}
