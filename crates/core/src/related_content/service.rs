//! Related content service implementation.

use std::sync::Arc;

use procdesk_shared::types::{PageRequest, PageResponse};
use uuid::Uuid;

use super::error::RelatedContentError;
use super::types::{NewRelatedContent, RelatedContent, RelatedContentQuery};

/// Repository trait for related content persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait RelatedContentRepository: Send + Sync {
    /// Create a new content record.
    fn create(
        &self,
        input: NewRelatedContent,
    ) -> impl std::future::Future<Output = Result<RelatedContent, RelatedContentError>> + Send;

    /// Find content by ID.
    fn find_by_id(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Option<RelatedContent>, RelatedContentError>> + Send;

    /// Fetch one page of a query, returning the items and the total count.
    fn find_page(
        &self,
        query: &RelatedContentQuery,
        page: PageRequest,
    ) -> impl std::future::Future<Output = Result<(Vec<RelatedContent>, u64), RelatedContentError>>
    + Send;

    /// Delete content by ID.
    fn delete(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<bool, RelatedContentError>> + Send;

    /// Delete every content record of a process instance.
    fn delete_all_content_by_process_instance_id(
        &self,
        process_instance_id: &str,
    ) -> impl std::future::Future<Output = Result<u64, RelatedContentError>> + Send;

    /// Sum of the content sizes created by a user; `None` when the user has no content.
    fn get_total_content_size_for_user(
        &self,
        user_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<i64>, RelatedContentError>> + Send;
}

/// Related content service.
pub struct RelatedContentService<R: RelatedContentRepository> {
    repo: Arc<R>,
}

impl<R: RelatedContentRepository> RelatedContentService<R> {
    /// Create a new related content service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Lists one page of content for a query.
    pub async fn list(
        &self,
        query: &RelatedContentQuery,
        page: PageRequest,
    ) -> Result<PageResponse<RelatedContent>, RelatedContentError> {
        let page = page.normalized();
        let (items, total) = self.repo.find_page(query, page).await?;
        Ok(PageResponse::new(items, page.page, page.per_page, total))
    }

    /// Fetches one content record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no record has the given ID.
    pub async fn get(&self, id: i64) -> Result<RelatedContent, RelatedContentError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(RelatedContentError::NotFound(id))
    }

    /// Validates and stores a new content record.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if:
    /// - The name is blank
    /// - Neither a task nor a process instance is given
    /// - The size is negative
    /// - A link has no URL
    pub async fn attach(
        &self,
        input: NewRelatedContent,
    ) -> Result<RelatedContent, RelatedContentError> {
        validate_new_content(&input)?;
        self.repo.create(input).await
    }

    /// Deletes a content record created by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the content does not exist and `NotCreator` if the
    /// user did not create it.
    pub async fn delete(&self, id: i64, user_id: Uuid) -> Result<(), RelatedContentError> {
        let content = self.get(id).await?;
        if content.created_by != user_id {
            return Err(RelatedContentError::NotCreator {
                content_id: id,
                user_id,
            });
        }

        if self.repo.delete(id).await? {
            Ok(())
        } else {
            Err(RelatedContentError::NotFound(id))
        }
    }

    /// Deletes every content record of a process instance.
    pub async fn delete_for_process_instance(
        &self,
        process_instance_id: &str,
    ) -> Result<u64, RelatedContentError> {
        self.repo
            .delete_all_content_by_process_instance_id(process_instance_id)
            .await
    }

    /// Total bytes of content created by a user.
    pub async fn usage(&self, user_id: Uuid) -> Result<i64, RelatedContentError> {
        Ok(self
            .repo
            .get_total_content_size_for_user(user_id)
            .await?
            .unwrap_or(0))
    }
}

fn validate_new_content(input: &NewRelatedContent) -> Result<(), RelatedContentError> {
    if input.name.trim().is_empty() {
        return Err(RelatedContentError::validation("name is required"));
    }
    if input.task_id.is_none() && input.process_instance_id.is_none() {
        return Err(RelatedContentError::validation(
            "either a task or a process instance is required",
        ));
    }
    if input.content_size < 0 {
        return Err(RelatedContentError::validation(
            "content size cannot be negative",
        ));
    }
    if input.link && input.link_url.as_deref().is_none_or(|url| url.trim().is_empty()) {
        return Err(RelatedContentError::validation("link content needs a URL"));
    }
    Ok(())
}
