//! Batch move/copy/delete with per-item error isolation.
//!
//! One bad id in a batch must not abort the others: each item is
//! processed independently and its failure recorded, in caller order.
//! The destination write check happens once, before the loop, since a
//! batch has a single destination.

use tracing::info;
use uuid::Uuid;

use depot_core::error::AppError;
use depot_core::result::AppResult;
use depot_entity::file::File;
use depot_entity::permission::PermissionAction;

use crate::context::RequestContext;

use super::service::FileService;

/// A per-item failure within a batch.
#[derive(Debug, Clone)]
pub struct BatchItemError {
    /// The file id the failure applies to.
    pub file_id: Uuid,
    /// What went wrong for this item.
    pub error: AppError,
}

/// Result of a batch operation: which items succeeded, and what went
/// wrong with the rest, in caller order.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Ids of the items that were processed successfully.
    pub succeeded: Vec<Uuid>,
    /// Per-item failures.
    pub errors: Vec<BatchItemError>,
}

impl BatchOutcome {
    /// A batch where nothing succeeded is reported as a failure
    /// (carrying the per-item errors); any success makes it a partial
    /// or full success.
    pub fn is_failure(&self) -> bool {
        self.succeeded.is_empty()
    }

    fn record_ok(&mut self, file_id: Uuid) {
        self.succeeded.push(file_id);
    }

    fn record_err(&mut self, file_id: Uuid, error: AppError) {
        self.errors.push(BatchItemError { file_id, error });
    }
}

impl FileService {
    /// Moves a set of files to one destination folder.
    pub async fn move_many(
        &self,
        ctx: &RequestContext,
        file_ids: &[Uuid],
        new_folder_id: Option<Uuid>,
    ) -> AppResult<BatchOutcome> {
        self.check_batch_destination(ctx, file_ids, new_folder_id)
            .await?;

        let mut outcome = BatchOutcome::default();
        for &file_id in file_ids {
            match self.batch_source(ctx, file_id, PermissionAction::Read).await {
                Ok(file) => match self.move_item(&file, new_folder_id).await {
                    Ok(_) => outcome.record_ok(file_id),
                    Err(e) => outcome.record_err(file_id, e),
                },
                Err(e) => outcome.record_err(file_id, e),
            }
        }

        info!(
            moved = outcome.succeeded.len(),
            failed = outcome.errors.len(),
            "Batch move finished"
        );
        Ok(outcome)
    }

    /// Copies a set of files into one destination folder. Copies are
    /// owned by the acting user.
    pub async fn copy_many(
        &self,
        ctx: &RequestContext,
        file_ids: &[Uuid],
        new_folder_id: Option<Uuid>,
    ) -> AppResult<BatchOutcome> {
        self.check_batch_destination(ctx, file_ids, new_folder_id)
            .await?;

        let mut outcome = BatchOutcome::default();
        for &file_id in file_ids {
            match self.batch_source(ctx, file_id, PermissionAction::Read).await {
                Ok(file) => match self.copy_item(&file, new_folder_id, ctx.user_id).await {
                    Ok(_) => outcome.record_ok(file_id),
                    Err(e) => outcome.record_err(file_id, e),
                },
                Err(e) => outcome.record_err(file_id, e),
            }
        }

        info!(
            copied = outcome.succeeded.len(),
            failed = outcome.errors.len(),
            "Batch copy finished"
        );
        Ok(outcome)
    }

    /// Deletes a set of files.
    pub async fn delete_many(
        &self,
        ctx: &RequestContext,
        file_ids: &[Uuid],
    ) -> AppResult<BatchOutcome> {
        if file_ids.is_empty() {
            return Err(AppError::validation("No file ids given"));
        }

        let mut outcome = BatchOutcome::default();
        for &file_id in file_ids {
            match self
                .batch_source(ctx, file_id, PermissionAction::Delete)
                .await
            {
                Ok(file) => match self.delete_item(&file).await {
                    Ok(()) => outcome.record_ok(file_id),
                    Err(e) => outcome.record_err(file_id, e),
                },
                Err(e) => outcome.record_err(file_id, e),
            }
        }

        info!(
            deleted = outcome.succeeded.len(),
            failed = outcome.errors.len(),
            "Batch delete finished"
        );
        Ok(outcome)
    }

    /// Pre-loop checks shared by move and copy: a non-empty id list and
    /// write access on the single destination. Failures here are
    /// request-fatal, not per-item.
    async fn check_batch_destination(
        &self,
        ctx: &RequestContext,
        file_ids: &[Uuid],
        new_folder_id: Option<Uuid>,
    ) -> AppResult<()> {
        if file_ids.is_empty() {
            return Err(AppError::validation("No file ids given"));
        }

        if let Some(dest) = new_folder_id {
            if self.folder_repo().find_by_id(dest).await?.is_none() {
                return Err(AppError::not_found("Destination folder not found"));
            }
            self.access_checker()
                .require_access(ctx.user_id, dest, PermissionAction::Write)
                .await?;
        }

        Ok(())
    }

    /// Per-item source resolution: look up the file and require the
    /// given action on it. Owners and admins pass unconditionally.
    async fn batch_source(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        action: PermissionAction,
    ) -> AppResult<File> {
        let file = self
            .file_repo()
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        self.access_checker()
            .require_file_access(ctx.user_id, &file, action)
            .await?;

        Ok(file)
    }
}
