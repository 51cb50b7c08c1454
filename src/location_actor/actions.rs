use crate::model::{FixReport, LocationFilter, LocationFix};

#[derive(Debug, Clone)]
pub enum LocationAction {
    /// Append a fix to the track and push it to the order topic when it is order-scoped.
    Record(FixReport),
}

#[derive(Debug, Clone)]
pub enum LocationQuery {
    /// Newest first, at most `limit` fixes.
    History { filter: LocationFilter, limit: usize },
    Latest { filter: LocationFilter },
}

/// Variants match 1:1 with [`LocationQuery`].
#[derive(Debug, Clone)]
pub enum LocationQueryResult {
    History(Vec<LocationFix>),
    Latest(Option<LocationFix>),
}
