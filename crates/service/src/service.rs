use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use tokio::sync::OnceCell;
use tokio_util::task::{TaskTracker, task_tracker::TaskTrackerToken};
use tracing::{debug, error, info, warn};

use filehub_cache::CacheClient;
use filehub_core::{FileId, FileRecord, NewFile, OwnerId, StoredFile, normalize_content_type};
use filehub_repository::FileRepository;
use filehub_storage::{Locator, StorageClient};

use crate::config::FileServiceConfig;
use crate::error::ServiceError;

/// Cache key under which a file's record snapshot is stored.
pub fn cache_key(id: &FileId) -> String {
    format!("file:{id}")
}

/// Orchestrates uploads across storage, repository and cache.
///
/// Cloning is cheap; all clones share the same collaborators, task tracker
/// and shutdown state.
#[derive(Clone)]
pub struct FileService {
    inner: Arc<Inner>,
}

struct Inner {
    storage: Arc<dyn StorageClient>,
    repository: Arc<dyn FileRepository>,
    cache: Arc<dyn CacheClient>,
    config: FileServiceConfig,
    /// Upload pipelines run here so they finish even if the caller goes away.
    tracker: TaskTracker,
    cache_closed: AtomicBool,
    shutdown: OnceCell<()>,
}

impl FileService {
    /// Create a service over the given collaborators.
    ///
    /// The service takes over the cache connection: it is released by
    /// [`shutdown`](Self::shutdown) and nowhere else.
    pub fn new(
        storage: Arc<dyn StorageClient>,
        repository: Arc<dyn FileRepository>,
        cache: Arc<dyn CacheClient>,
        config: FileServiceConfig,
    ) -> Self {
        info!(storage = storage.name(), "file service created");
        Self {
            inner: Arc::new(Inner {
                storage,
                repository,
                cache,
                config,
                tracker: TaskTracker::new(),
                cache_closed: AtomicBool::new(false),
                shutdown: OnceCell::new(),
            }),
        }
    }

    /// Service configuration.
    pub fn config(&self) -> &FileServiceConfig {
        &self.inner.config
    }

    /// Store `content`, record its metadata and cache the resulting record.
    ///
    /// The payload is validated before any side effect. The pipeline itself
    /// runs as a tracked task: dropping the returned future does not abort
    /// a storage write that has already started, and a failed metadata write
    /// is always followed by a compensating delete attempt.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidPayload`] if the payload breaks the policy.
    /// - [`ServiceError::StorageUnavailable`] if the storage write fails.
    /// - [`ServiceError::Persistence`] if the metadata write fails.
    /// - [`ServiceError::ShuttingDown`] after [`shutdown`](Self::shutdown).
    pub async fn upload(
        &self,
        content: Bytes,
        content_type: &str,
        owner_id: Option<OwnerId>,
    ) -> Result<FileRecord, ServiceError> {
        let admission = self.admit()?;

        let content_type = normalize_content_type(content_type);
        if let Err(violation) = self
            .inner
            .config
            .policy
            .check(&content_type, content.len() as u64)
        {
            debug!(
                content_type = %content_type,
                size = content.len(),
                %violation,
                "upload rejected"
            );
            return Err(violation.into());
        }

        let inner = Arc::clone(&self.inner);
        let pipeline = self
            .inner
            .tracker
            .spawn(async move {
                let _admission = admission;
                inner.run_upload(content, content_type, owner_id).await
            });

        pipeline.await.map_err(|e| {
            error!(error = %e, "upload task failed");
            ServiceError::Internal(e.to_string())
        })?
    }

    /// Register an upload with the tracker before checking for shutdown.
    ///
    /// The token is taken first, so an upload admitted here is always counted
    /// by the `wait()` in [`shutdown`](Self::shutdown) and runs before the
    /// cache is closed.
    fn admit(&self) -> Result<TaskTrackerToken, ServiceError> {
        let token = self.inner.tracker.token();
        if self.inner.tracker.is_closed() {
            return Err(ServiceError::ShuttingDown);
        }
        Ok(token)
    }

    /// Look up a file, serving from the cache when possible.
    ///
    /// Cache failures and undecodable entries count as misses. On a miss the
    /// record is read from the repository and written back to the cache.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if no record exists.
    /// - [`ServiceError::Persistence`] if the repository read fails.
    pub async fn get_file(&self, id: FileId) -> Result<FileRecord, ServiceError> {
        let inner = &self.inner;
        if let Some(record) = inner.cached(&id).await {
            debug!(file_id = %id, "cache hit");
            return Ok(record);
        }

        let stored = inner
            .repository
            .find_by_id(&id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;
        let record = inner.to_record(stored);
        inner.populate_cache(&record).await;
        Ok(record)
    }

    /// Drop the cached snapshot for `id`. Failures are logged, not returned.
    pub async fn invalidate(&self, id: FileId) {
        let inner = &self.inner;
        if inner.cache_closed.load(Ordering::Acquire) {
            return;
        }
        match inner.cache.delete(&cache_key(&id)).await {
            Ok(removed) => debug!(file_id = %id, removed, "cache entry invalidated"),
            Err(e) => warn!(file_id = %id, error = %e, "cache invalidation failed"),
        }
    }

    /// Stop accepting uploads, wait for in-flight ones, then close the cache.
    ///
    /// The cache connection is closed exactly once; later calls wait for the
    /// first to finish and then return. Storage and repository state is left
    /// as is.
    pub async fn shutdown(&self) {
        let inner = &self.inner;
        inner
            .shutdown
            .get_or_init(|| async {
                inner.tracker.close();
                let in_flight = inner.tracker.len();
                if in_flight > 0 {
                    info!(in_flight, "waiting for in-flight uploads");
                }
                inner.tracker.wait().await;

                inner.cache_closed.store(true, Ordering::Release);
                if let Err(e) = inner.cache.close().await {
                    warn!(error = %e, "failed to close cache connection");
                }
                info!("file service shutdown complete");
            })
            .await;
    }
}

impl Inner {
    async fn run_upload(
        &self,
        content: Bytes,
        content_type: String,
        owner_id: Option<OwnerId>,
    ) -> Result<FileRecord, ServiceError> {
        let size = content.len() as u64;

        let locator = self
            .storage
            .put(content, &content_type)
            .await
            .inspect_err(|e| warn!(error = %e, "storage write failed"))?;

        let new_file = NewFile::new(locator.as_str(), content_type, size, owner_id);
        let id = match self.repository.save(&new_file).await {
            Ok(id) => id,
            Err(e) => {
                error!(
                    locator = %locator,
                    error = %e,
                    "metadata write failed, removing stored object"
                );
                self.compensate(&locator).await;
                return Err(e.into());
            }
        };

        let record = self.to_record(new_file.into_stored(id));
        self.populate_cache(&record).await;

        info!(file_id = %id, locator = %locator, size, "file uploaded");
        Ok(record)
    }

    /// Best-effort removal of an object whose metadata never landed.
    async fn compensate(&self, locator: &Locator) {
        match self.storage.delete(locator).await {
            Ok(()) => info!(locator = %locator, "orphaned object removed"),
            Err(e) => error!(
                locator = %locator,
                error = %e,
                "compensating delete failed, object left for garbage collection"
            ),
        }
    }

    fn to_record(&self, stored: StoredFile) -> FileRecord {
        let locator = Locator::new(stored.storage_key.clone());
        let uri = self.storage.public_url(&locator);
        let thumbnail_uri = self.storage.thumbnail_url(&locator, &stored.content_type);
        FileRecord::from_stored(stored, uri, thumbnail_uri)
    }

    async fn cached(&self, id: &FileId) -> Option<FileRecord> {
        if self.cache_closed.load(Ordering::Acquire) {
            return None;
        }
        let raw = match self.cache.get(&cache_key(id)).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(file_id = %id, error = %e, "cache read failed, falling back to repository");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(file_id = %id, error = %e, "discarding undecodable cache entry");
                None
            }
        }
    }

    async fn populate_cache(&self, record: &FileRecord) {
        if self.cache_closed.load(Ordering::Acquire) {
            return;
        }
        let value = match serde_json::to_string(record) {
            Ok(value) => value,
            Err(e) => {
                warn!(file_id = %record.id, error = %e, "failed to encode record for cache");
                return;
            }
        };
        if let Err(e) = self
            .cache
            .set(&cache_key(&record.id), &value, self.config.cache_ttl)
            .await
        {
            warn!(file_id = %record.id, error = %e, "cache population failed");
        }
    }
}
