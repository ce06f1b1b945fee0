//! Background refresh scheduler (spec §2/§5): keeps the in-memory lookup
//! and synonym snapshots current without a reload on every request.
//!
//! Unlike a fixed cron schedule, the refresh cadence is a plain interval
//! read from config, so this uses [`Job::new_repeated_async`] rather than
//! the cron-string constructor the teacher's collection jobs use.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use threadworks_core::lookup::SharedSnapshot;
use threadworks_core::synonyms::SynonymSnapshot;
use threadworks_core::{AppConfig, LookupSnapshot};

/// Build and start the scheduler, registering the lookup and synonym
/// refresh jobs. Returns the running [`JobScheduler`] handle, which must
/// be kept alive for the process lifetime — dropping it shuts down all
/// jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    pool: PgPool,
    config: Arc<AppConfig>,
    lookup: Arc<SharedSnapshot<LookupSnapshot>>,
    synonyms: Arc<SharedSnapshot<SynonymSnapshot>>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_lookup_refresh_job(&scheduler, pool.clone(), Arc::clone(&config), lookup).await?;
    register_synonym_refresh_job(&scheduler, pool, config, synonyms).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_lookup_refresh_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    config: Arc<AppConfig>,
    lookup: Arc<SharedSnapshot<LookupSnapshot>>,
) -> Result<(), JobSchedulerError> {
    let interval = Duration::from_secs(config.lookup_refresh_interval_secs.max(1));

    let job = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let pool = pool.clone();
        let lookup = Arc::clone(&lookup);

        Box::pin(async move {
            match threadworks_db::load_lookup_snapshot(&pool).await {
                Ok(snapshot) => {
                    lookup.store(snapshot);
                    tracing::info!("refresh: lookup snapshot reloaded");
                }
                Err(error) => {
                    tracing::error!(%error, "refresh: failed to reload lookup snapshot, keeping stale copy");
                }
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

async fn register_synonym_refresh_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    config: Arc<AppConfig>,
    synonyms: Arc<SharedSnapshot<SynonymSnapshot>>,
) -> Result<(), JobSchedulerError> {
    let interval = Duration::from_secs(config.synonym_refresh_interval_secs.max(1));

    let job = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let pool = pool.clone();
        let synonyms = Arc::clone(&synonyms);

        Box::pin(async move {
            match threadworks_db::load_synonym_snapshot(&pool).await {
                Ok(snapshot) => {
                    synonyms.store(snapshot);
                    tracing::info!("refresh: synonym snapshot reloaded");
                }
                Err(error) => {
                    tracing::error!(%error, "refresh: failed to reload synonym snapshot, keeping stale copy");
                }
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}
