use crate::domain::FilterSnapshot;
use tokio::sync::watch;

/// Holds the filter values being edited (`live`) and the ones in effect
/// (`applied`). Only `apply_filters` moves values from one to the other.
///
/// The applied snapshot is published on a watch channel so fetch-triggering
/// consumers see each commit as one whole value.
#[derive(Debug)]
pub struct FilterStore {
    live: FilterSnapshot,
    applied: watch::Sender<FilterSnapshot>,
}

impl FilterStore {
    pub fn new(initial: FilterSnapshot) -> Self {
        let (applied, _) = watch::channel(initial);
        Self {
            live: initial,
            applied,
        }
    }

    pub const fn live(&self) -> &FilterSnapshot {
        &self.live
    }

    pub fn applied(&self) -> FilterSnapshot {
        *self.applied.borrow()
    }

    /// True when the sidebar shows values that are not yet in effect.
    pub fn has_pending(&self) -> bool {
        !self.live.same_values(&self.applied())
    }

    pub fn subscribe(&self) -> watch::Receiver<FilterSnapshot> {
        self.applied.subscribe()
    }

    pub fn set_district(&mut self, district: Option<u32>) {
        self.live.district = district;
    }

    pub fn set_youth_min(&mut self, value: f64) {
        self.live.youth_min = value;
    }

    pub fn set_margin_floor(&mut self, value: f64) {
        self.live.margin_floor = value;
    }

    /// Commit `live` as the applied snapshot. Observers are only notified
    /// when the applied value actually changes.
    pub fn apply_filters(&self) -> bool {
        let next = self.live;
        let changed = self.applied.send_if_modified(|current| {
            if current.same_values(&next) {
                false
            } else {
                *current = next;
                true
            }
        });

        if changed {
            tracing::debug!(
                district = ?next.district,
                youth_min = next.youth_min,
                margin_floor = next.margin_floor,
                "Applied filters"
            );
        }

        changed
    }
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new(FilterSnapshot::default())
    }
}
