//! Initial database migration.
//!
//! Creates identity, model, and related content tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: IDENTITY
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(GROUPS_SQL).await?;

        // ============================================================
        // PART 2: MODELS
        // ============================================================
        db.execute_unprepared(MODELS_SQL).await?;
        db.execute_unprepared(MODEL_HISTORY_SQL).await?;
        db.execute_unprepared(MODEL_SHARE_INFO_SQL).await?;

        // ============================================================
        // PART 3: RELATED CONTENT
        // ============================================================
        db.execute_unprepared(RELATED_CONTENT_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
            DROP TABLE IF EXISTS related_content CASCADE;
            DROP TABLE IF EXISTS model_share_info CASCADE;
            DROP TABLE IF EXISTS model_history CASCADE;
            DROP TABLE IF EXISTS models CASCADE;
            DROP TABLE IF EXISTS group_members CASCADE;
            DROP TABLE IF EXISTS user_groups CASCADE;
            DROP TABLE IF EXISTS users CASCADE;
            ",
        )
        .await?;
        Ok(())
    }
}

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    first_name VARCHAR(255),
    last_name VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const GROUPS_SQL: &str = r"
CREATE TABLE user_groups (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE group_members (
    group_id UUID NOT NULL REFERENCES user_groups(id) ON DELETE CASCADE,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    PRIMARY KEY (group_id, user_id)
);

-- Group lookup for a user
CREATE INDEX idx_group_members_user ON group_members(user_id);
";

const MODELS_SQL: &str = r"
CREATE TABLE models (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(400) NOT NULL,
    model_key VARCHAR(255) NOT NULL,
    description VARCHAR(4000),
    model_comment VARCHAR(4000),
    model_type INTEGER NOT NULL,
    version INTEGER NOT NULL DEFAULT 1,
    model_editor_json TEXT NOT NULL,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    last_updated_by UUID NOT NULL REFERENCES users(id),
    last_updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_models_version_positive CHECK (version > 0)
);

CREATE INDEX idx_models_created_by ON models(created_by, model_type, name);
";

const MODEL_HISTORY_SQL: &str = r"
CREATE TABLE model_history (
    id BIGSERIAL PRIMARY KEY,
    model_id BIGINT NOT NULL,
    name VARCHAR(400) NOT NULL,
    model_key VARCHAR(255) NOT NULL,
    description VARCHAR(4000),
    model_comment VARCHAR(4000),
    model_type INTEGER NOT NULL,
    version INTEGER NOT NULL,
    model_editor_json TEXT NOT NULL,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    last_updated_by UUID NOT NULL REFERENCES users(id),
    last_updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    removal_date TIMESTAMPTZ
);

-- Deployable lookups only touch live history rows
CREATE INDEX idx_model_history_created_by ON model_history(created_by, model_type)
    WHERE removal_date IS NULL;
CREATE INDEX idx_model_history_model ON model_history(model_id, version DESC);
";

const MODEL_SHARE_INFO_SQL: &str = r"
CREATE TABLE model_share_info (
    id BIGSERIAL PRIMARY KEY,
    model_id BIGINT NOT NULL REFERENCES models(id) ON DELETE CASCADE,
    user_id UUID REFERENCES users(id) ON DELETE CASCADE,
    group_id UUID REFERENCES user_groups(id) ON DELETE CASCADE,
    permission VARCHAR(16) NOT NULL DEFAULT 'read',
    shared_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_share_target CHECK (user_id IS NOT NULL OR group_id IS NOT NULL),
    CONSTRAINT chk_share_permission CHECK (permission IN ('read', 'write'))
);

CREATE INDEX idx_model_share_user ON model_share_info(user_id) WHERE user_id IS NOT NULL;
CREATE INDEX idx_model_share_group ON model_share_info(group_id) WHERE group_id IS NOT NULL;
";

const RELATED_CONTENT_SQL: &str = r"
CREATE TABLE related_content (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    mime_type VARCHAR(255),
    task_id VARCHAR(64),
    process_instance_id VARCHAR(64),
    source VARCHAR(64),
    source_id VARCHAR(255),
    field VARCHAR(400),
    related_content BOOLEAN NOT NULL DEFAULT FALSE,
    link BOOLEAN NOT NULL DEFAULT FALSE,
    link_url VARCHAR(4000),
    content_available BOOLEAN NOT NULL DEFAULT FALSE,
    content_store_id VARCHAR(255),
    content_size BIGINT NOT NULL DEFAULT 0,
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_content_size CHECK (content_size >= 0)
);

CREATE INDEX idx_related_content_task ON related_content(task_id, related_content)
    WHERE task_id IS NOT NULL;
CREATE INDEX idx_related_content_process ON related_content(process_instance_id, related_content)
    WHERE process_instance_id IS NOT NULL;
CREATE INDEX idx_related_content_source ON related_content(source, source_id);
CREATE INDEX idx_related_content_creator ON related_content(created_by);
";
