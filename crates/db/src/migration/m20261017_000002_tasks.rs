//! Task migration.
//!
//! Creates the task table and identity links used by task actions.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(TASKS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS task_identity_links CASCADE; DROP TABLE IF EXISTS tasks CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const TASKS_SQL: &str = r"
CREATE TABLE tasks (
    id VARCHAR(64) PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    description VARCHAR(4000),
    category VARCHAR(255),
    assignee UUID REFERENCES users(id),
    owner UUID REFERENCES users(id),
    process_instance_id VARCHAR(64),
    form_key VARCHAR(255),
    priority INTEGER NOT NULL DEFAULT 50,
    due_date TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    completed_at TIMESTAMPTZ
);

CREATE INDEX idx_tasks_assignee ON tasks(assignee) WHERE completed_at IS NULL;

CREATE TABLE task_identity_links (
    id BIGSERIAL PRIMARY KEY,
    task_id VARCHAR(64) NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
    link_type VARCHAR(16) NOT NULL,
    user_id UUID REFERENCES users(id) ON DELETE CASCADE,
    group_id UUID REFERENCES user_groups(id) ON DELETE CASCADE,
    CONSTRAINT chk_link_type CHECK (link_type IN ('candidate', 'participant')),
    CONSTRAINT chk_link_target CHECK (user_id IS NOT NULL OR group_id IS NOT NULL)
);

-- One participant link per user and task
CREATE UNIQUE INDEX idx_task_links_participant ON task_identity_links(task_id, user_id)
    WHERE link_type = 'participant';
CREATE INDEX idx_task_links_task ON task_identity_links(task_id);
";
