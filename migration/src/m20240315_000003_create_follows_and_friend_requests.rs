use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Follow edges: existence is a boolean fact, so the pair is unique
        // and self-edges are rejected at the lowest level too.
        let create_follows_sql = r#"
            CREATE TABLE IF NOT EXISTS social_platform.follows (
                id BIGSERIAL PRIMARY KEY,
                follower_id BIGINT NOT NULL REFERENCES social_platform.users(id) ON DELETE CASCADE,
                following_id BIGINT NOT NULL REFERENCES social_platform.users(id) ON DELETE CASCADE,

                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

                CHECK (follower_id <> following_id),
                UNIQUE (follower_id, following_id)
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_follows_sql)
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TABLE social_platform.follows OWNER TO social")
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_follows_following
                 ON social_platform.follows(following_id)",
            )
            .await?;

        // Friend request lifecycle states.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE social_platform.request_status AS ENUM ('pending', 'accepted', 'rejected')",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TYPE social_platform.request_status OWNER TO social")
            .await?;

        let create_friend_requests_sql = r#"
            CREATE TABLE IF NOT EXISTS social_platform.friend_requests (
                id BIGSERIAL PRIMARY KEY,
                sender_id BIGINT NOT NULL REFERENCES social_platform.users(id) ON DELETE CASCADE,
                receiver_id BIGINT NOT NULL REFERENCES social_platform.users(id) ON DELETE CASCADE,

                status social_platform.request_status NOT NULL DEFAULT 'pending',

                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

                CHECK (sender_id <> receiver_id)
            )
        "#;

        manager
            .get_connection()
            .execute_unprepared(create_friend_requests_sql)
            .await?;

        manager
            .get_connection()
            .execute_unprepared("ALTER TABLE social_platform.friend_requests OWNER TO social")
            .await?;

        // At most one pending request per unordered pair: a pending A->B
        // blocks B->A as well, and a racing duplicate insert fails here.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_friend_requests_one_pending_per_pair
                 ON social_platform.friend_requests (LEAST(sender_id, receiver_id), GREATEST(sender_id, receiver_id))
                 WHERE status = 'pending'",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_friend_requests_receiver_pending
                 ON social_platform.friend_requests(receiver_id) WHERE status = 'pending'",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_friend_requests_sender_pending
                 ON social_platform.friend_requests(sender_id) WHERE status = 'pending'",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS social_platform.friend_requests")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS social_platform.request_status")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS social_platform.follows")
            .await?;

        Ok(())
    }
}
