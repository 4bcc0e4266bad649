//! Database seeder for Procdesk development and testing.
//!
//! Seeds two users, a reviewer group, an app model with a process model, a task
//! with a candidate group and some related content. Prints a bearer token for
//! each seeded user so the `/rest` API can be called locally.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde_json::json;
use uuid::Uuid;

use procdesk_core::app_definition::ModelType;
use procdesk_core::related_content::{NewRelatedContent, RelatedContentRepository as _};
use procdesk_core::task::IdentityLink;
use procdesk_db::entities::{group_members, user_groups, users};
use procdesk_db::{
    CreateModelInput, CreateTaskInput, ModelRepository, RelatedContentRepository, TaskRepository,
};
use procdesk_shared::{AppConfig, JwtConfig, JwtService};

/// Admin user ID (consistent for all seeds)
const ADMIN_USER_ID: Uuid = Uuid::from_u128(1);
/// Reviewer user ID (consistent for all seeds)
const REVIEWER_USER_ID: Uuid = Uuid::from_u128(2);
/// Reviewer group ID (consistent for all seeds)
const REVIEWERS_GROUP_ID: Uuid = Uuid::from_u128(0x100);

/// Seeded users: ID, email, first name, last name.
const SEED_USERS: [(Uuid, &str, &str, &str); 2] = [
    (ADMIN_USER_ID, "admin@procdesk.dev", "Ada", "Admin"),
    (REVIEWER_USER_ID, "reviewer@procdesk.dev", "Rui", "Reviewer"),
];

/// Process instance the seeded task and content belong to.
const PROCESS_INSTANCE_ID: &str = "seed-process-1";
/// Seeded task ID.
const TASK_ID: &str = "seed-task-1";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = procdesk_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let config = AppConfig::load().context("Failed to load configuration")?;
    let jwt_service = JwtService::new(JwtConfig::from(&config.jwt));

    if users::Entity::find_by_id(ADMIN_USER_ID).one(&db).await?.is_some() {
        println!("Seed data already present, skipping.");
    } else {
        println!("Seeding users and groups...");
        seed_identities(&db).await?;

        println!("Seeding models...");
        seed_models(&db).await?;

        println!("Seeding tasks...");
        seed_tasks(&db).await?;

        println!("Seeding related content...");
        seed_content(&db).await?;

        println!("Seeding complete!");
    }

    print_dev_tokens(&jwt_service)
}

fn print_dev_tokens(jwt_service: &JwtService) -> anyhow::Result<()> {
    println!(
        "\nDevelopment tokens (valid for {}s):",
        jwt_service.access_token_expires_in()
    );
    for (id, email, _, _) in SEED_USERS {
        let token = jwt_service
            .generate_access_token(id, email)
            .with_context(|| format!("Failed to sign token for {email}"))?;
        println!("  {email}: Bearer {token}");
    }
    Ok(())
}

async fn seed_identities(db: &DatabaseConnection) -> anyhow::Result<()> {
    let now = Utc::now();
    for (id, email, first, last) in SEED_USERS {
        users::ActiveModel {
            id: Set(id),
            email: Set(email.to_string()),
            first_name: Set(Some(first.to_string())),
            last_name: Set(Some(last.to_string())),
            created_at: Set(now.into()),
        }
        .insert(db)
        .await?;
        println!("  Created user: {email}");
    }

    user_groups::ActiveModel {
        id: Set(REVIEWERS_GROUP_ID),
        name: Set("Reviewers".to_string()),
        created_at: Set(now.into()),
    }
    .insert(db)
    .await?;

    group_members::ActiveModel {
        group_id: Set(REVIEWERS_GROUP_ID),
        user_id: Set(REVIEWER_USER_ID),
    }
    .insert(db)
    .await?;
    println!("  Created group: Reviewers");

    Ok(())
}

async fn seed_models(db: &DatabaseConnection) -> anyhow::Result<()> {
    let models = ModelRepository::new(db.clone());

    let process = models
        .create(CreateModelInput {
            name: "Expense Process".to_string(),
            model_key: "expense-process".to_string(),
            description: Some("Submit and approve an expense claim".to_string()),
            model_type: ModelType::Bpmn,
            model_editor_json: json!({ "resourceId": "canvas" }).to_string(),
            created_by: ADMIN_USER_ID,
        })
        .await?;

    let app_json = |theme: &str| {
        json!({
            "theme": theme,
            "icon": "glyphicon-euro",
            "models": [{
                "id": process.id,
                "name": process.name,
                "version": process.version,
                "modelType": ModelType::Bpmn.code(),
            }]
        })
        .to_string()
    };

    let app = models
        .create(CreateModelInput {
            name: "Expense Approvals".to_string(),
            model_key: "expense-approvals".to_string(),
            description: Some("Expense claim app".to_string()),
            model_type: ModelType::App,
            model_editor_json: app_json("theme-1"),
            created_by: ADMIN_USER_ID,
        })
        .await?;
    models
        .update_editor_json(app.id, app_json("theme-4"), ADMIN_USER_ID)
        .await?;
    models
        .share(app.id, None, Some(REVIEWERS_GROUP_ID), ADMIN_USER_ID)
        .await?;

    println!("  Created app model {} (2 versions) shared with Reviewers", app.id);
    Ok(())
}

async fn seed_tasks(db: &DatabaseConnection) -> anyhow::Result<()> {
    let tasks = TaskRepository::new(db.clone());

    tasks
        .create_task(CreateTaskInput {
            id: TASK_ID.to_string(),
            name: "Review expense claim".to_string(),
            description: Some("Check receipts and approve".to_string()),
            owner: Some(ADMIN_USER_ID),
            process_instance_id: Some(PROCESS_INSTANCE_ID.to_string()),
            form_key: Some("expense-review".to_string()),
            priority: 50,
            ..Default::default()
        })
        .await?;
    tasks
        .add_identity_link(TASK_ID, &IdentityLink::candidate_group(REVIEWERS_GROUP_ID))
        .await?;

    println!("  Created task {TASK_ID} with candidate group Reviewers");
    Ok(())
}

async fn seed_content(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = RelatedContentRepository::new(db.clone());

    let items = [
        NewRelatedContent {
            name: "receipt.pdf".to_string(),
            mime_type: Some("application/pdf".to_string()),
            task_id: Some(TASK_ID.to_string()),
            process_instance_id: Some(PROCESS_INSTANCE_ID.to_string()),
            related_content: true,
            content_store_id: Some("seed/receipt.pdf".to_string()),
            content_size: 48_213,
            created_by: ADMIN_USER_ID,
            ..Default::default()
        },
        NewRelatedContent {
            name: "id-scan.png".to_string(),
            mime_type: Some("image/png".to_string()),
            task_id: Some(TASK_ID.to_string()),
            process_instance_id: Some(PROCESS_INSTANCE_ID.to_string()),
            field: Some("idScan".to_string()),
            related_content: false,
            content_store_id: Some("seed/id-scan.png".to_string()),
            content_size: 215_004,
            created_by: REVIEWER_USER_ID,
            ..Default::default()
        },
        NewRelatedContent {
            name: "Policy".to_string(),
            process_instance_id: Some(PROCESS_INSTANCE_ID.to_string()),
            related_content: true,
            link: true,
            link_url: Some("https://intranet.example.com/expense-policy".to_string()),
            created_by: ADMIN_USER_ID,
            ..Default::default()
        },
    ];

    let count = items.len();
    for item in items {
        repo.create(item).await?;
    }

    println!("  Inserted {count} content records");
    Ok(())
}
