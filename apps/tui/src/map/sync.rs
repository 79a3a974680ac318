//! Keeps the precinct layer in step with the applied filters.
//!
//! Every applied-filter change issues a fetch tagged with a sequence number.
//! Completions come back over a channel in whatever order the network
//! delivers them; only the completion for the most recently issued request
//! may touch the layer. Anything older is dropped on arrival.

use std::convert::TryFrom;
use std::fmt;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use super::layer::PrecinctLayers;
use crate::api::{self, DataService};
use crate::domain::{FilterSnapshot, PrecinctCollection};
use crate::filters;
use crate::selection::Selection;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FetchState {
    Idle,
    Fetching { seq: u64 },
}

impl fmt::Display for FetchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Fetching { seq } => write!(f, "Fetching({seq})"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum FetchEvent {
    Issue(u64),
    Loaded(u64),
    Failed(u64),
    Teardown,
}

impl fmt::Display for FetchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Issue(seq) => write!(f, "Issue({seq})"),
            Self::Loaded(seq) => write!(f, "Loaded({seq})"),
            Self::Failed(seq) => write!(f, "Failed({seq})"),
            Self::Teardown => write!(f, "Teardown"),
        }
    }
}

/// A completion that does not belong to the request in flight.
#[derive(Debug)]
struct StaleResponse {
    from: FetchState,
    event: FetchEvent,
}

impl fmt::Display for StaleResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} does not match {}", self.event, self.from)
    }
}

impl std::error::Error for StaleResponse {}

struct NextState(FetchState);

impl TryFrom<(FetchState, FetchEvent)> for NextState {
    type Error = StaleResponse;

    fn try_from(value: (FetchState, FetchEvent)) -> Result<Self, Self::Error> {
        let (current, event) = value;

        match (current, event) {
            // A new request supersedes whatever is in flight
            (_, FetchEvent::Issue(seq)) => Ok(Self(FetchState::Fetching { seq })),
            (FetchState::Fetching { seq }, FetchEvent::Loaded(done) | FetchEvent::Failed(done))
                if seq == done =>
            {
                Ok(Self(FetchState::Idle))
            }
            (_, FetchEvent::Teardown) => Ok(Self(FetchState::Idle)),
            _ => Err(StaleResponse {
                from: current,
                event,
            }),
        }
    }
}

struct FetchCompletion {
    seq: u64,
    result: api::Result<PrecinctCollection>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PointerTransition {
    Enter,
    Leave,
}

/// Everything that exists only while the map is mounted.
struct Mounted {
    layers: PrecinctLayers,
    cursor: Cursor,
    // Whether this mount has fetched yet
    fetched: bool,
    sender: mpsc::UnboundedSender<FetchCompletion>,
    completions: mpsc::UnboundedReceiver<FetchCompletion>,
}

impl Mounted {
    fn new() -> Self {
        let (sender, completions) = mpsc::unbounded_channel();
        Self {
            layers: PrecinctLayers::new(),
            cursor: Cursor::Default,
            fetched: false,
            sender,
            completions,
        }
    }
}

pub struct MapSync {
    service: Arc<dyn DataService>,
    applied: watch::Receiver<FilterSnapshot>,
    mounted: Option<Mounted>,
    state: FetchState,
    // Never reset, so requests from before a teardown can't collide with new ones
    next_seq: u64,
    failure: Option<String>,
}

impl MapSync {
    pub fn new(service: Arc<dyn DataService>, applied: watch::Receiver<FilterSnapshot>) -> Self {
        Self {
            service,
            applied,
            mounted: None,
            state: FetchState::Idle,
            next_seq: 0,
            failure: None,
        }
    }

    /// Create the empty precinct layers. The next `tick` fetches the current
    /// applied filters.
    pub fn mount(&mut self) {
        if self.mounted.is_some() {
            return;
        }
        tracing::debug!("Mounting precinct layers");
        self.mounted = Some(Mounted::new());
    }

    /// Drop the layers, interaction state and completion channel. Responses
    /// still on the wire have nowhere to land.
    pub fn teardown(&mut self) {
        if self.mounted.take().is_some() {
            tracing::debug!("Tore down precinct layers");
        }
        self.apply_event(FetchEvent::Teardown).ok();
        self.failure = None;
    }

    pub const fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub const fn state(&self) -> FetchState {
        self.state
    }

    /// The loading indicator: the latest request has not completed yet.
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, FetchState::Fetching { .. })
    }

    pub fn layers(&self) -> Option<&PrecinctLayers> {
        self.mounted.as_ref().map(|mounted| &mounted.layers)
    }

    pub fn cursor(&self) -> Cursor {
        self.mounted
            .as_ref()
            .map_or(Cursor::Default, |mounted| mounted.cursor)
    }

    /// Failure of the latest fetch, handed out once for the status line.
    pub fn take_failure(&mut self) -> Option<String> {
        self.failure.take()
    }

    /// Observe applied-filter changes and apply any completions that have
    /// arrived. Never blocks.
    pub fn tick(&mut self) {
        self.observe_applied();

        while let Some(done) = self
            .mounted
            .as_mut()
            .and_then(|mounted| mounted.completions.try_recv().ok())
        {
            self.complete(done);
        }
    }

    /// Wait for the next completion and process it. Returns whether it was
    /// applied. Only call this while a request is outstanding.
    pub async fn wait_for_completion(&mut self) -> bool {
        let Some(mounted) = self.mounted.as_mut() else {
            return false;
        };
        let Some(done) = mounted.completions.recv().await else {
            return false;
        };
        self.complete(done)
    }

    /// Pointer moved to `at` (lon, lat), or left the map when `None`.
    pub fn pointer_moved(&mut self, at: Option<(f64, f64)>) -> Option<PointerTransition> {
        let mounted = self.mounted.as_mut()?;
        let over = at.is_some_and(|(lon, lat)| mounted.layers.feature_at(lon, lat).is_some());

        match (mounted.cursor, over) {
            (Cursor::Default, true) => {
                mounted.cursor = Cursor::Pointer;
                Some(PointerTransition::Enter)
            }
            (Cursor::Pointer, false) => {
                mounted.cursor = Cursor::Default;
                Some(PointerTransition::Leave)
            }
            _ => None,
        }
    }

    /// Publish the topmost precinct under the click as the selection.
    pub fn click(&self, lon: f64, lat: f64, selection: &mut Selection) -> bool {
        let Some(feature) = self
            .mounted
            .as_ref()
            .and_then(|mounted| mounted.layers.feature_at(lon, lat))
        else {
            return false;
        };

        selection.select(feature.properties.clone());
        true
    }

    fn observe_applied(&mut self) {
        let Some(mounted) = self.mounted.as_mut() else {
            return;
        };

        // Watch versions, not values: NaN never compares equal to itself
        let changed = self.applied.has_changed().unwrap_or(false);
        if mounted.fetched && !changed {
            return;
        }
        mounted.fetched = true;
        let applied = *self.applied.borrow_and_update();
        let sender = mounted.sender.clone();

        self.next_seq += 1;
        let seq = self.next_seq;
        self.apply_event(FetchEvent::Issue(seq)).ok();

        let query = filters::encode(&applied);
        tracing::debug!(seq, %query, "Issuing precinct fetch");

        let service = Arc::clone(&self.service);
        tokio::spawn(async move {
            let result = service.precincts(&query).await;
            // The receiver is gone after teardown
            let _ = sender.send(FetchCompletion { seq, result });
        });
    }

    fn complete(&mut self, done: FetchCompletion) -> bool {
        let FetchCompletion { seq, result } = done;
        let event = if result.is_ok() {
            FetchEvent::Loaded(seq)
        } else {
            FetchEvent::Failed(seq)
        };

        if let Err(stale) = self.apply_event(event) {
            tracing::debug!(%stale, "Discarding superseded precinct response");
            return false;
        }

        match result {
            Ok(collection) => {
                if let Some(mounted) = self.mounted.as_mut() {
                    tracing::debug!(seq, count = collection.features.len(), "Replacing precinct layer");
                    mounted.layers.set_data(collection);
                }
            }
            Err(err) => {
                tracing::error!(seq, error = %err, "Precinct fetch failed");
                self.failure = Some(err.to_string());
            }
        }

        true
    }

    fn apply_event(&mut self, event: FetchEvent) -> Result<(), StaleResponse> {
        let next = NextState::try_from((self.state, event))?;
        self.state = next.0;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::domain::DistrictAggregate;
    use crate::filters::FilterStore;
    use crate::map::layer::tests::{collection, square};
    use async_trait::async_trait;
    use tokio::sync::oneshot;

    pub type Reply = oneshot::Sender<api::Result<PrecinctCollection>>;

    /// Hands every precinct request to the test, which answers it whenever
    /// (and in whatever order) it likes.
    pub struct ScriptedService {
        requests: mpsc::UnboundedSender<(String, Reply)>,
    }

    pub fn scripted() -> (Arc<dyn DataService>, mpsc::UnboundedReceiver<(String, Reply)>) {
        let (requests, receiver) = mpsc::unbounded_channel();
        (Arc::new(ScriptedService { requests }), receiver)
    }

    #[async_trait]
    impl DataService for ScriptedService {
        async fn districts(&self) -> api::Result<Vec<DistrictAggregate>> {
            Ok(Vec::new())
        }

        async fn precincts(&self, query: &str) -> api::Result<PrecinctCollection> {
            let (reply, response) = oneshot::channel();
            self.requests
                .send((query.to_string(), reply))
                .map_err(|_| ApiError::Network("test harness gone".to_string()))?;
            response
                .await
                .map_err(|_| ApiError::Network("reply dropped".to_string()))?
        }
    }

    fn ids(map: &MapSync) -> Vec<String> {
        map.layers()
            .map(|layers| {
                layers
                    .features()
                    .iter()
                    .map(|feature| feature.properties.precinct_id.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn one(id: &str) -> PrecinctCollection {
        collection(vec![square(id, Some("target"), (-120.0, 36.0), 1.0)])
    }

    #[tokio::test]
    async fn nothing_is_fetched_before_mount() {
        let (service, mut requests) = scripted();
        let store = FilterStore::default();
        let mut map = MapSync::new(service, store.subscribe());

        map.tick();
        tokio::task::yield_now().await;

        assert!(!map.is_mounted());
        assert!(!map.is_loading());
        assert!(requests.try_recv().is_err());
    }

    #[tokio::test]
    async fn mount_starts_empty_and_fetches_applied() -> Result<(), Box<dyn std::error::Error>> {
        let (service, mut requests) = scripted();
        let store = FilterStore::default();
        let mut map = MapSync::new(service, store.subscribe());

        map.mount();
        assert!(ids(&map).is_empty());

        map.tick();
        assert!(map.is_loading());

        let (query, reply) = requests.recv().await.ok_or("no request")?;
        assert_eq!(query, "youth_min=0.15&margin_floor=0");

        reply.send(Ok(one("a"))).map_err(|_| "receiver dropped")?;
        assert!(map.wait_for_completion().await);
        assert!(!map.is_loading());
        assert_eq!(ids(&map), vec!["a"]);

        Ok(())
    }

    #[tokio::test]
    async fn later_request_wins_even_if_earlier_arrives_last(
    ) -> Result<(), Box<dyn std::error::Error>> {
        let (service, mut requests) = scripted();
        let mut store = FilterStore::default();
        let mut map = MapSync::new(service, store.subscribe());
        map.mount();

        map.tick();
        let (_, first) = requests.recv().await.ok_or("no first request")?;

        store.set_district(Some(12));
        store.apply_filters();
        map.tick();
        let (query, second) = requests.recv().await.ok_or("no second request")?;
        assert_eq!(query, "youth_min=0.15&margin_floor=0&district=12");

        second.send(Ok(one("second"))).map_err(|_| "receiver dropped")?;
        assert!(map.wait_for_completion().await);
        assert_eq!(ids(&map), vec!["second"]);
        assert!(!map.is_loading());

        first.send(Ok(one("first"))).map_err(|_| "receiver dropped")?;
        assert!(!map.wait_for_completion().await);
        assert_eq!(ids(&map), vec!["second"]);
        assert!(!map.is_loading());

        Ok(())
    }

    #[tokio::test]
    async fn early_stale_arrival_keeps_loading() -> Result<(), Box<dyn std::error::Error>> {
        let (service, mut requests) = scripted();
        let mut store = FilterStore::default();
        let mut map = MapSync::new(service, store.subscribe());
        map.mount();

        map.tick();
        let (_, first) = requests.recv().await.ok_or("no first request")?;

        store.set_youth_min(0.3);
        store.apply_filters();
        map.tick();
        let (_, second) = requests.recv().await.ok_or("no second request")?;

        first.send(Ok(one("first"))).map_err(|_| "receiver dropped")?;
        assert!(!map.wait_for_completion().await);
        assert!(ids(&map).is_empty());
        assert!(map.is_loading());

        second.send(Ok(one("second"))).map_err(|_| "receiver dropped")?;
        assert!(map.wait_for_completion().await);
        assert_eq!(ids(&map), vec!["second"]);
        assert!(!map.is_loading());

        Ok(())
    }

    #[tokio::test]
    async fn failure_keeps_last_good_layer() -> Result<(), Box<dyn std::error::Error>> {
        let (service, mut requests) = scripted();
        let mut store = FilterStore::default();
        let mut map = MapSync::new(service, store.subscribe());
        map.mount();

        map.tick();
        let (_, reply) = requests.recv().await.ok_or("no request")?;
        reply.send(Ok(one("good"))).map_err(|_| "receiver dropped")?;
        map.wait_for_completion().await;

        store.set_margin_floor(0.1);
        store.apply_filters();
        map.tick();
        let (_, reply) = requests.recv().await.ok_or("no request")?;
        reply
            .send(Err(ApiError::Api {
                status: 500,
                message: "boom".to_string(),
            }))
            .map_err(|_| "receiver dropped")?;

        assert!(map.wait_for_completion().await);
        assert!(!map.is_loading());
        assert_eq!(ids(&map), vec!["good"]);
        assert!(map.take_failure().is_some_and(|msg| msg.contains("500")));
        assert!(map.take_failure().is_none());

        Ok(())
    }

    #[tokio::test]
    async fn stale_failure_is_silent() -> Result<(), Box<dyn std::error::Error>> {
        let (service, mut requests) = scripted();
        let mut store = FilterStore::default();
        let mut map = MapSync::new(service, store.subscribe());
        map.mount();

        map.tick();
        let (_, first) = requests.recv().await.ok_or("no request")?;
        store.set_district(Some(3));
        store.apply_filters();
        map.tick();
        let (_, _second) = requests.recv().await.ok_or("no request")?;

        first
            .send(Err(ApiError::Network("reset".to_string())))
            .map_err(|_| "receiver dropped")?;
        assert!(!map.wait_for_completion().await);
        assert!(map.take_failure().is_none());
        assert!(map.is_loading());

        Ok(())
    }

    #[tokio::test]
    async fn reapplying_same_values_does_not_refetch() -> Result<(), Box<dyn std::error::Error>> {
        let (service, mut requests) = scripted();
        let mut store = FilterStore::default();
        let mut map = MapSync::new(service, store.subscribe());
        map.mount();
        map.tick();
        let (_, reply) = requests.recv().await.ok_or("no request")?;
        reply.send(Ok(one("a"))).map_err(|_| "receiver dropped")?;
        map.wait_for_completion().await;

        // Edit and revert before applying
        store.set_youth_min(0.4);
        store.set_youth_min(0.15);
        store.apply_filters();
        map.tick();
        tokio::task::yield_now().await;

        assert!(requests.try_recv().is_err());
        assert!(!map.is_loading());

        Ok(())
    }

    #[tokio::test]
    async fn unchanged_nan_filters_fetch_once() -> Result<(), Box<dyn std::error::Error>> {
        let (service, mut requests) = scripted();
        let store = FilterStore::new(FilterSnapshot {
            youth_min: f64::NAN,
            ..FilterSnapshot::default()
        });
        let mut map = MapSync::new(service, store.subscribe());
        map.mount();

        for _ in 0..5 {
            map.tick();
            tokio::task::yield_now().await;
        }

        let (query, reply) = requests.recv().await.ok_or("no request")?;
        assert_eq!(query, "youth_min=NaN&margin_floor=0");
        assert!(requests.try_recv().is_err());
        assert_eq!(map.state(), FetchState::Fetching { seq: 1 });

        reply.send(Ok(one("a"))).map_err(|_| "receiver dropped")?;
        assert!(map.wait_for_completion().await);
        assert!(!map.is_loading());

        // Re-applying the same NaN snapshot stays quiet
        store.apply_filters();
        map.tick();
        tokio::task::yield_now().await;
        assert!(requests.try_recv().is_err());
        assert!(!map.is_loading());

        Ok(())
    }

    #[tokio::test]
    async fn selection_survives_refetch_without_it() -> Result<(), Box<dyn std::error::Error>> {
        let (service, mut requests) = scripted();
        let mut store = FilterStore::default();
        let mut map = MapSync::new(service, store.subscribe());
        let mut selection = Selection::default();
        map.mount();

        map.tick();
        let (_, reply) = requests.recv().await.ok_or("no request")?;
        reply.send(Ok(one("picked"))).map_err(|_| "receiver dropped")?;
        map.wait_for_completion().await;

        assert!(map.click(-119.5, 36.5, &mut selection));

        store.set_district(Some(40));
        store.apply_filters();
        map.tick();
        let (_, reply) = requests.recv().await.ok_or("no request")?;
        reply.send(Ok(one("other"))).map_err(|_| "receiver dropped")?;
        map.wait_for_completion().await;

        assert_eq!(ids(&map), vec!["other"]);
        assert_eq!(
            selection.current().map(|p| p.precinct_id.as_str()),
            Some("picked")
        );

        selection.close();
        assert!(selection.current().is_none());

        Ok(())
    }

    #[tokio::test]
    async fn click_and_hover_follow_features() -> Result<(), Box<dyn std::error::Error>> {
        let (service, mut requests) = scripted();
        let store = FilterStore::default();
        let mut map = MapSync::new(service, store.subscribe());
        let mut selection = Selection::default();
        map.mount();
        map.tick();

        let (_, reply) = requests.recv().await.ok_or("no request")?;
        reply
            .send(Ok(collection(vec![
                square("under", Some("low"), (-120.0, 36.0), 2.0),
                square("over", None, (-119.5, 36.5), 1.0),
            ])))
            .map_err(|_| "receiver dropped")?;
        map.wait_for_completion().await;

        assert_eq!(map.pointer_moved(Some((-119.0, 37.0))), Some(PointerTransition::Enter));
        assert_eq!(map.cursor(), Cursor::Pointer);
        assert_eq!(map.pointer_moved(Some((-119.9, 36.1))), None);
        assert_eq!(map.pointer_moved(Some((-100.0, 40.0))), Some(PointerTransition::Leave));
        assert_eq!(map.cursor(), Cursor::Default);

        assert!(map.click(-119.0, 37.0, &mut selection));
        assert_eq!(selection.current().map(|p| p.precinct_id.as_str()), Some("over"));

        // Missing the layer leaves the selection alone
        assert!(!map.click(-100.0, 40.0, &mut selection));
        assert_eq!(selection.current().map(|p| p.precinct_id.as_str()), Some("over"));

        Ok(())
    }

    #[tokio::test]
    async fn teardown_then_mount_starts_clean() -> Result<(), Box<dyn std::error::Error>> {
        let (service, mut requests) = scripted();
        let store = FilterStore::default();
        let mut map = MapSync::new(service, store.subscribe());
        map.mount();
        map.tick();
        let (_, before_teardown) = requests.recv().await.ok_or("no request")?;

        map.teardown();
        assert!(!map.is_mounted());
        assert!(!map.is_loading());
        assert!(map.layers().is_none());
        assert_eq!(map.cursor(), Cursor::Default);
        assert!(map.pointer_moved(Some((-119.5, 36.5))).is_none());

        map.mount();
        assert!(ids(&map).is_empty());
        map.tick();
        let (query, after_mount) = requests.recv().await.ok_or("no request")?;
        assert_eq!(query, "youth_min=0.15&margin_floor=0");

        // The old response has no channel to land on
        before_teardown.send(Ok(one("old"))).ok();
        tokio::task::yield_now().await;
        map.tick();
        assert!(ids(&map).is_empty());
        assert!(map.is_loading());

        after_mount.send(Ok(one("new"))).map_err(|_| "receiver dropped")?;
        assert!(map.wait_for_completion().await);
        assert_eq!(ids(&map), vec!["new"]);

        Ok(())
    }
}
