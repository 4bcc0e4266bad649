//! App definition aggregation.

use std::sync::Arc;

use uuid::Uuid;

use super::error::AppDefinitionError;
use super::index::ModelIndex;
use super::types::{
    AppDefinition, AppDefinitionRepresentation, AppModelSource, Model, ModelHistory, ModelType,
};
use crate::identity::CurrentUser;

/// Repository trait for model and model history lookups.
///
/// All list methods return records ordered by name ascending.
pub trait ModelRepository: Send + Sync {
    /// Models of a type created by the user.
    fn find_models_created_by(
        &self,
        user_id: Uuid,
        model_type: ModelType,
    ) -> impl std::future::Future<Output = Result<Vec<Model>, AppDefinitionError>> + Send;

    /// Models of a type shared directly with the user.
    fn find_models_shared_with_user(
        &self,
        user_id: Uuid,
        model_type: ModelType,
    ) -> impl std::future::Future<Output = Result<Vec<Model>, AppDefinitionError>> + Send;

    /// Non-removed history records of a type created by the user.
    fn find_history_created_by(
        &self,
        user_id: Uuid,
        model_type: ModelType,
    ) -> impl std::future::Future<Output = Result<Vec<ModelHistory>, AppDefinitionError>> + Send;

    /// History records of models shared directly with the user.
    fn find_history_shared_with_user(
        &self,
        user_id: Uuid,
        model_type: ModelType,
    ) -> impl std::future::Future<Output = Result<Vec<ModelHistory>, AppDefinitionError>> + Send;

    /// History records of models shared with the user or any of the groups.
    fn find_history_shared_with_user_or_groups(
        &self,
        user_id: Uuid,
        group_ids: &[Uuid],
        model_type: ModelType,
    ) -> impl std::future::Future<Output = Result<Vec<ModelHistory>, AppDefinitionError>> + Send;

    /// Whether the live model still exists.
    fn model_exists(
        &self,
        model_id: i64,
    ) -> impl std::future::Future<Output = Result<bool, AppDefinitionError>> + Send;
}

/// Service gathering the app definitions visible to a user.
pub struct AppDefinitionService<R: ModelRepository> {
    repo: Arc<R>,
}

impl<R: ModelRepository> AppDefinitionService<R> {
    /// Create a new app definition service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// App definitions the user created or that were shared with the user.
    ///
    /// Owned models are collected first; a shared model never replaces an owned one
    /// with the same id.
    ///
    /// # Errors
    ///
    /// Returns `Deserialization` if any model's editor JSON is not a valid app
    /// definition. No partial result is returned in that case.
    pub async fn get_app_definitions(
        &self,
        user: &CurrentUser,
    ) -> Result<Vec<AppDefinitionRepresentation>, AppDefinitionError> {
        let mut index = ModelIndex::new();

        for model in self
            .repo
            .find_models_created_by(user.id, ModelType::App)
            .await?
        {
            index.insert_if_absent(model);
        }

        for model in self
            .repo
            .find_models_shared_with_user(user.id, ModelType::App)
            .await?
        {
            index.insert_if_absent(model);
        }

        index.into_vec().iter().map(create_app_definition).collect()
    }

    /// Deployable app definitions for the user: the highest version of every app
    /// model the user created or that was shared with the user or the user's groups.
    ///
    /// Versions of models that no longer exist are skipped.
    ///
    /// # Errors
    ///
    /// Returns `Deserialization` if any retained record's editor JSON is not a valid
    /// app definition. No partial result is returned in that case.
    pub async fn get_deployable_app_definitions(
        &self,
        user: &CurrentUser,
    ) -> Result<Vec<AppDefinitionRepresentation>, AppDefinitionError> {
        let mut index = ModelIndex::new();

        for history in self
            .repo
            .find_history_created_by(user.id, ModelType::App)
            .await?
        {
            index.insert_if_newer(history);
        }

        let shared = if user.group_ids.is_empty() {
            self.repo
                .find_history_shared_with_user(user.id, ModelType::App)
                .await?
        } else {
            self.repo
                .find_history_shared_with_user_or_groups(user.id, &user.group_ids, ModelType::App)
                .await?
        };

        for history in shared {
            index.insert_if_newer(history);
        }

        let mut result = Vec::with_capacity(index.len());
        for history in index.into_vec() {
            if self.repo.model_exists(history.model_id).await? {
                result.push(create_app_definition(&history)?);
            }
        }

        Ok(result)
    }
}

/// Projects a model or history record into an app definition representation.
///
/// # Errors
///
/// Returns `Deserialization` if the editor JSON cannot be parsed.
pub fn create_app_definition<M: AppModelSource>(
    model: &M,
) -> Result<AppDefinitionRepresentation, AppDefinitionError> {
    let parsed: Option<AppDefinition> =
        serde_json::from_str(model.editor_json()).map_err(|e| {
            AppDefinitionError::Deserialization {
                model_id: model.definition_id(),
                reason: e.to_string(),
            }
        })?;

    let mut representation = AppDefinitionRepresentation {
        id: model.definition_id(),
        name: model.name().to_string(),
        description: model.description().map(str::to_string),
        version: model.version(),
        definition: model.editor_json().to_string(),
        theme: None,
        icon: None,
        models: None,
    };

    if let Some(app) = parsed {
        representation.theme = app.theme;
        representation.icon = app.icon;
        let ids: Vec<i64> = app
            .models
            .unwrap_or_default()
            .iter()
            .filter_map(|m| m.id)
            .collect();
        if !ids.is_empty() {
            representation.models = Some(ids);
        }
    }

    Ok(representation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeModels {
        created: Vec<Model>,
        shared: Vec<Model>,
        history_created: Vec<ModelHistory>,
        history_shared_user: Vec<ModelHistory>,
        history_shared_groups: Vec<ModelHistory>,
        existing: HashSet<i64>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl FakeModels {
        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl ModelRepository for FakeModels {
        async fn find_models_created_by(
            &self,
            _user_id: Uuid,
            _model_type: ModelType,
        ) -> Result<Vec<Model>, AppDefinitionError> {
            Ok(self.created.clone())
        }

        async fn find_models_shared_with_user(
            &self,
            _user_id: Uuid,
            _model_type: ModelType,
        ) -> Result<Vec<Model>, AppDefinitionError> {
            Ok(self.shared.clone())
        }

        async fn find_history_created_by(
            &self,
            _user_id: Uuid,
            _model_type: ModelType,
        ) -> Result<Vec<ModelHistory>, AppDefinitionError> {
            Ok(self.history_created.clone())
        }

        async fn find_history_shared_with_user(
            &self,
            _user_id: Uuid,
            _model_type: ModelType,
        ) -> Result<Vec<ModelHistory>, AppDefinitionError> {
            self.record("user");
            Ok(self.history_shared_user.clone())
        }

        async fn find_history_shared_with_user_or_groups(
            &self,
            _user_id: Uuid,
            _group_ids: &[Uuid],
            _model_type: ModelType,
        ) -> Result<Vec<ModelHistory>, AppDefinitionError> {
            self.record("groups");
            Ok(self.history_shared_groups.clone())
        }

        async fn model_exists(&self, model_id: i64) -> Result<bool, AppDefinitionError> {
            Ok(self.existing.contains(&model_id))
        }
    }

    fn app_json(theme: &str, model_ids: &[i64]) -> String {
        let models: Vec<_> = model_ids
            .iter()
            .map(|id| serde_json::json!({ "id": id }))
            .collect();
        serde_json::json!({ "theme": theme, "icon": "glyphicon-cog", "models": models })
            .to_string()
    }

    fn model(id: i64, name: &str, json: String) -> Model {
        Model {
            id,
            name: name.to_string(),
            model_key: name.to_lowercase(),
            description: Some(format!("{name} app")),
            model_type: ModelType::App,
            version: 1,
            model_editor_json: json,
            created_by: Uuid::nil(),
            created_at: Utc::now(),
            last_updated_at: Utc::now(),
        }
    }

    fn history(row: i64, model_id: i64, version: i32, theme: &str) -> ModelHistory {
        ModelHistory {
            id: row,
            model_id,
            name: format!("app-{model_id}"),
            model_key: format!("app-{model_id}"),
            description: None,
            model_type: ModelType::App,
            version,
            model_editor_json: app_json(theme, &[row]),
            created_by: Uuid::nil(),
            created_at: Utc::now(),
            removal_date: None,
        }
    }

    fn service(repo: FakeModels) -> AppDefinitionService<FakeModels> {
        AppDefinitionService::new(Arc::new(repo))
    }

    #[test]
    fn test_create_app_definition_projects_manifest() {
        let def = create_app_definition(&model(4, "Onboarding", app_json("theme-2", &[10, 11])))
            .unwrap();

        assert_eq!(def.id, 4);
        assert_eq!(def.name, "Onboarding");
        assert_eq!(def.description.as_deref(), Some("Onboarding app"));
        assert_eq!(def.version, 1);
        assert_eq!(def.theme.as_deref(), Some("theme-2"));
        assert_eq!(def.icon.as_deref(), Some("glyphicon-cog"));
        assert_eq!(def.models, Some(vec![10, 11]));
        assert!(def.definition.contains("theme-2"));
    }

    #[test]
    fn test_create_app_definition_without_models() {
        let def = create_app_definition(&model(4, "Empty", app_json("theme-1", &[]))).unwrap();
        assert_eq!(def.models, None);
        assert_eq!(def.theme.as_deref(), Some("theme-1"));
    }

    #[test]
    fn test_create_app_definition_null_document() {
        let def = create_app_definition(&model(4, "Null", "null".to_string())).unwrap();
        assert_eq!(def.theme, None);
        assert_eq!(def.icon, None);
        assert_eq!(def.models, None);
    }

    #[test]
    fn test_create_app_definition_null_models() {
        let json = r#"{"theme":"t","icon":"i","models":null}"#.to_string();
        let def = create_app_definition(&model(4, "Nulls", json)).unwrap();

        assert_eq!(def.theme.as_deref(), Some("t"));
        assert_eq!(def.icon.as_deref(), Some("i"));
        assert_eq!(def.models, None);
    }

    #[test]
    fn test_create_app_definition_skips_models_without_id() {
        let json = r#"{"theme":"t","models":[{"name":"x"},{"id":9}]}"#.to_string();
        let def = create_app_definition(&model(4, "Partial", json)).unwrap();
        assert_eq!(def.models, Some(vec![9]));

        let json = r#"{"theme":"t","models":[{"name":"x"}]}"#.to_string();
        let def = create_app_definition(&model(4, "Unnamed", json)).unwrap();
        assert_eq!(def.theme.as_deref(), Some("t"));
        assert_eq!(def.models, None);
    }

    #[test]
    fn test_create_app_definition_uses_model_id_of_history() {
        let def = create_app_definition(&history(77, 5, 3, "theme-3")).unwrap();
        assert_eq!(def.id, 5);
        assert_eq!(def.version, 3);
    }

    #[test]
    fn test_create_app_definition_rejects_invalid_json() {
        let err = create_app_definition(&model(9, "Broken", "{not json".to_string()))
            .unwrap_err();
        match err {
            AppDefinitionError::Deserialization { model_id, .. } => assert_eq!(model_id, 9),
            AppDefinitionError::Repository(_) => panic!("Expected Deserialization error"),
        }
    }

    #[tokio::test]
    async fn test_owned_model_wins_over_shared() {
        let repo = FakeModels {
            created: vec![model(1, "Alpha", app_json("owned", &[]))],
            shared: vec![
                model(1, "Alpha", app_json("shared", &[])),
                model(2, "Beta", app_json("shared", &[])),
            ],
            ..FakeModels::default()
        };

        let defs = service(repo)
            .get_app_definitions(&CurrentUser::new(Uuid::new_v4()))
            .await
            .unwrap();

        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].id, 1);
        assert_eq!(defs[0].theme.as_deref(), Some("owned"));
        assert_eq!(defs[1].id, 2);
    }

    #[tokio::test]
    async fn test_get_app_definitions_fails_without_partial_data() {
        let repo = FakeModels {
            created: vec![model(1, "Alpha", app_json("ok", &[]))],
            shared: vec![model(2, "Beta", "<xml/>".to_string())],
            ..FakeModels::default()
        };

        let result = service(repo)
            .get_app_definitions(&CurrentUser::new(Uuid::new_v4()))
            .await;

        assert!(matches!(
            result,
            Err(AppDefinitionError::Deserialization { model_id: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_deployable_keeps_highest_version() {
        let repo = FakeModels {
            history_created: vec![history(100, 1, 1, "v1"), history(101, 1, 3, "v3")],
            history_shared_user: vec![
                history(102, 1, 2, "v2"),
                history(103, 1, 3, "v3-shared"),
                history(104, 2, 1, "other"),
            ],
            existing: [1, 2].into_iter().collect(),
            ..FakeModels::default()
        };

        let defs = service(repo)
            .get_deployable_app_definitions(&CurrentUser::new(Uuid::new_v4()))
            .await
            .unwrap();

        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].id, 1);
        assert_eq!(defs[0].version, 3);
        assert_eq!(defs[0].theme.as_deref(), Some("v3"));
        assert_eq!(defs[1].id, 2);
    }

    #[tokio::test]
    async fn test_deployable_skips_deleted_models() {
        let repo = FakeModels {
            history_created: vec![history(100, 1, 1, "kept"), history(101, 2, 1, "gone")],
            existing: std::iter::once(1).collect(),
            ..FakeModels::default()
        };

        let defs = service(repo)
            .get_deployable_app_definitions(&CurrentUser::new(Uuid::new_v4()))
            .await
            .unwrap();

        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].id, 1);
    }

    #[tokio::test]
    async fn test_deployable_queries_groups_only_for_group_members() {
        let repo = Arc::new(FakeModels {
            history_shared_groups: vec![history(200, 7, 4, "group")],
            existing: std::iter::once(7).collect(),
            ..FakeModels::default()
        });
        let service = AppDefinitionService::new(repo.clone());

        let lone = CurrentUser::new(Uuid::new_v4());
        assert!(service
            .get_deployable_app_definitions(&lone)
            .await
            .unwrap()
            .is_empty());

        let member = CurrentUser::with_groups(Uuid::new_v4(), vec![Uuid::new_v4()]);
        let defs = service.get_deployable_app_definitions(&member).await.unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].theme.as_deref(), Some("group"));

        assert_eq!(*repo.calls.lock().unwrap(), vec!["user", "groups"]);
    }

    #[tokio::test]
    async fn test_deployable_fails_on_invalid_definition() {
        let mut broken = history(300, 3, 2, "x");
        broken.model_editor_json = String::new();
        let repo = FakeModels {
            history_created: vec![history(299, 2, 1, "ok"), broken],
            existing: [2, 3].into_iter().collect(),
            ..FakeModels::default()
        };

        let result = service(repo)
            .get_deployable_app_definitions(&CurrentUser::new(Uuid::new_v4()))
            .await;

        assert!(matches!(
            result,
            Err(AppDefinitionError::Deserialization { model_id: 3, .. })
        ));
    }
}
