//! # Location Client
use crate::config::LocationConfig;
use crate::context::CallerContext;
use crate::error::RelayError;
use crate::location_actor::{LocationAction, LocationQuery, LocationQueryResult};
use crate::model::{FixReport, LocationFilter, LocationFix, LocationTrack};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::instrument;

#[derive(Clone)]
pub struct LocationClient {
    inner: ResourceClient<LocationTrack>,
    limits: LocationConfig,
}

impl LocationClient {
    pub fn new(inner: ResourceClient<LocationTrack>, limits: LocationConfig) -> Self {
        Self { inner, limits }
    }

    /// Records a fix for the caller. Order-scoped fixes are pushed live to `order:<id>`.
    #[instrument(skip(self, caller, report), fields(caller = %caller.user_id, order = ?report.order_id))]
    pub async fn record(
        &self,
        caller: &CallerContext,
        report: FixReport,
    ) -> Result<LocationFix, RelayError> {
        let track = self.inner.find_or_create(caller.user_id.clone()).await?;
        Ok(self
            .inner
            .perform_action(track.id, LocationAction::Record(report))
            .await?)
    }

    /// Newest first. `limit` defaults to the configured history size and is clamped to the
    /// configured maximum.
    #[instrument(skip(self))]
    pub async fn history(
        &self,
        filter: LocationFilter,
        limit: Option<usize>,
    ) -> Result<Vec<LocationFix>, RelayError> {
        let limit = limit
            .unwrap_or(self.limits.history_limit)
            .clamp(1, self.limits.max_history_limit);
        match self
            .inner
            .query(LocationQuery::History { filter, limit })
            .await?
        {
            LocationQueryResult::History(fixes) => Ok(fixes),
            _ => unreachable!("History query must return History result"),
        }
    }

    #[instrument(skip(self))]
    pub async fn latest(&self, filter: LocationFilter) -> Result<Option<LocationFix>, RelayError> {
        match self.inner.query(LocationQuery::Latest { filter }).await? {
            LocationQueryResult::Latest(fix) => Ok(fix),
            _ => unreachable!("Latest query must return Latest result"),
        }
    }
}

#[async_trait]
impl ActorClient<LocationTrack> for LocationClient {
    type Error = RelayError;

    fn inner(&self) -> &ResourceClient<LocationTrack> {
        &self.inner
    }

    fn map_error(e: FrameworkError<RelayError>) -> RelayError {
        e.into()
    }
}
