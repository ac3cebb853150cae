use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create the platform's schema
        manager
            .get_connection()
            .execute_unprepared("CREATE SCHEMA IF NOT EXISTS social_platform;")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("SET search_path TO social_platform, public;")
            .await?;

        // Create the base DB privileges for the user that will execute all platform queries
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DO $$ BEGIN
                    GRANT ALL PRIVILEGES ON DATABASE social TO social;
                    GRANT ALL ON SCHEMA social_platform TO social;

                    ALTER DEFAULT PRIVILEGES IN SCHEMA social_platform GRANT ALL ON TABLES TO social;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA social_platform GRANT ALL ON SEQUENCES TO social;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA social_platform GRANT ALL ON FUNCTIONS TO social;
                END $$;
            "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Revoke default privileges first
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DO $$ BEGIN
                    ALTER DEFAULT PRIVILEGES IN SCHEMA social_platform REVOKE ALL ON FUNCTIONS FROM social;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA social_platform REVOKE ALL ON SEQUENCES FROM social;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA social_platform REVOKE ALL ON TABLES FROM social;
                    REVOKE ALL ON SCHEMA social_platform FROM social;
                    REVOKE ALL PRIVILEGES ON DATABASE social FROM social;
                END $$;
            "#,
            )
            .await?;

        // Drop the schema (CASCADE will remove all objects in it)
        manager
            .get_connection()
            .execute_unprepared("DROP SCHEMA IF EXISTS social_platform CASCADE;")
            .await?;

        Ok(())
    }
}
