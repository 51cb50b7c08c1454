//! [`ActorEntity`] implementation for [`LocationTrack`]: one append-only track per user.

use super::actions::{LocationAction, LocationQuery, LocationQueryResult};
use super::LocationContext;
use crate::error::RelayError;
use crate::model::{
    FixId, FixMeta, FixReport, LiveEvent, LocationFilter, LocationFix, LocationTrack, TrackId,
    UserId,
};
use crate::room::Topic;
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

#[async_trait]
impl ActorEntity for LocationTrack {
    type Id = TrackId;
    type Key = UserId;
    type Create = UserId;
    type Action = LocationAction;
    type ActionResult = LocationFix;
    type Query = LocationQuery;
    type QueryResult = LocationQueryResult;
    type Context = LocationContext;
    type Error = RelayError;

    fn key_for(user_id: &UserId) -> UserId {
        user_id.clone()
    }

    fn from_create_params(id: TrackId, user_id: UserId) -> Result<Self, RelayError> {
        Ok(Self {
            id,
            user_id,
            fixes: Vec::new(),
        })
    }

    async fn handle_action(
        &mut self,
        action: LocationAction,
        ctx: &LocationContext,
    ) -> Result<LocationFix, RelayError> {
        match action {
            LocationAction::Record(report) => self.record(report, ctx),
        }
    }

    fn handle_query<'a, I>(tracks: I, query: LocationQuery) -> Result<LocationQueryResult, RelayError>
    where
        I: Iterator<Item = &'a Self>,
    {
        match query {
            LocationQuery::History { filter, limit } => {
                Ok(LocationQueryResult::History(newest_first(tracks, &filter, limit)))
            }
            LocationQuery::Latest { filter } => Ok(LocationQueryResult::Latest(
                newest_first(tracks, &filter, 1).into_iter().next(),
            )),
        }
    }
}

impl LocationTrack {
    /// Strictly increasing per user, so newest-first is unambiguous.
    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.fixes.last() {
            Some(last) if now <= last.timestamp => last.timestamp + Duration::microseconds(1),
            _ => now,
        }
    }

    fn record(&mut self, report: FixReport, ctx: &LocationContext) -> Result<LocationFix, RelayError> {
        if !report.coordinates.is_valid() {
            return Err(RelayError::validation(format!(
                "coordinates out of range: {}, {}",
                report.coordinates.latitude, report.coordinates.longitude
            )));
        }
        validate_meta(&report.meta)?;

        let fix = LocationFix {
            id: FixId::new(),
            user_id: self.user_id.clone(),
            order_id: report.order_id,
            kind: report.kind,
            coordinates: report.coordinates,
            meta: report.meta,
            timestamp: self.next_timestamp(),
        };
        self.fixes.push(fix.clone());
        debug!(user = %self.user_id, fixes = self.fixes.len(), "Fix recorded");

        if let Some(order_id) = &fix.order_id {
            ctx.publisher.publish(
                &Topic::Order(order_id.clone()),
                &LiveEvent::LocationUpdate {
                    user_id: fix.user_id.clone(),
                    order_id: order_id.clone(),
                    coordinates: fix.coordinates,
                    timestamp: fix.timestamp,
                },
            );
        }
        Ok(fix)
    }
}

fn newest_first<'a>(
    tracks: impl Iterator<Item = &'a LocationTrack>,
    filter: &LocationFilter,
    limit: usize,
) -> Vec<LocationFix> {
    let mut fixes: Vec<LocationFix> = tracks
        .filter(|track| filter.user_id.as_ref().map_or(true, |user| &track.user_id == user))
        .flat_map(|track| track.fixes.iter())
        .filter(|fix| filter.matches(fix))
        .cloned()
        .collect();
    fixes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    fixes.truncate(limit);
    fixes
}

fn validate_meta(meta: &FixMeta) -> Result<(), RelayError> {
    let non_negative = |value: Option<f64>| value.map_or(true, |v| v.is_finite() && v >= 0.0);
    if !non_negative(meta.accuracy) {
        return Err(RelayError::validation("accuracy must be a non-negative number"));
    }
    if !non_negative(meta.speed) {
        return Err(RelayError::validation("speed must be a non-negative number"));
    }
    if !meta
        .heading
        .map_or(true, |h| h.is_finite() && (0.0..360.0).contains(&h))
    {
        return Err(RelayError::validation("heading must be within [0, 360)"));
    }
    Ok(())
}
