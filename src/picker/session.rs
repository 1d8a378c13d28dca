//! Picker session
//!
//! Owns the selection state for one editing session. Search, point clicks,
//! pincode lookups and manual edits all write to the same `PickerState`
//! behind one lock; background tasks only hold weak references to it, so
//! dropping the last `PickerSession` handle tears everything down.

use crate::error::{Error, Result};
use crate::geo::GeoBackend;
use crate::location::{Coordinates, Location, LocationPatch, SearchResult};
use crate::picker::resolver;
use crate::picker::search::{self, QueryState};
use crate::picker::sequence::Sequencer;
use crate::picker::{Phase, PickerSettings};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Mutable selection state of one session
#[derive(Debug)]
pub struct PickerState {
    pub(crate) phase: Phase,
    pub(crate) location: Location,
    pub(crate) query: QueryState,
    /// Sequencing for point and pincode resolutions
    pub(crate) resolution: Sequencer,
}

impl PickerState {
    pub(crate) fn new(settings: &PickerSettings, initial: Option<Location>) -> Self {
        let (phase, location) = match initial {
            Some(location) => (Phase::Resolved, location),
            None => (Phase::Empty, Location::default()),
        };
        Self {
            phase,
            location,
            query: QueryState::new(settings.debounce),
            resolution: Sequencer::new(),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.phase == Phase::Confirmed {
            return Err(Error::InvalidState(
                "Location already confirmed; cancel to start over".to_string(),
            ));
        }
        Ok(())
    }

    fn snapshot(&self) -> PickerSnapshot {
        PickerSnapshot {
            phase: self.phase,
            query: self.query.text().to_string(),
            searching: self.query.searching(),
            resolving: self.phase == Phase::PointOnly || self.resolution.is_pending(),
            results: self.query.results().to_vec(),
            location: self.location.clone(),
        }
    }
}

/// State shared between a session and its background tasks
#[derive(Debug)]
pub(crate) struct Shared<B> {
    pub(crate) backend: Arc<B>,
    pub(crate) settings: PickerSettings,
    pub(crate) state: Mutex<PickerState>,
}

/// Point-in-time view of a session, as shown to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickerSnapshot {
    pub phase: Phase,
    pub query: String,
    pub searching: bool,
    pub resolving: bool,
    pub results: Vec<SearchResult>,
    pub location: Location,
}

/// Handle to one location picking session
///
/// Clones share the same session.
#[derive(Debug)]
pub struct PickerSession<B> {
    shared: Arc<Shared<B>>,
}

impl<B> Clone for PickerSession<B> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<B: GeoBackend> PickerSession<B> {
    /// Start an empty session
    pub fn new(backend: Arc<B>, settings: PickerSettings) -> Self {
        Self::build(backend, settings, None)
    }

    /// Reopen the picker on a previously confirmed location
    pub fn with_initial(
        backend: Arc<B>,
        settings: PickerSettings,
        initial: Location,
    ) -> Result<Self> {
        initial.coordinates.validate()?;
        Ok(Self::build(backend, settings, Some(initial)))
    }

    fn build(backend: Arc<B>, settings: PickerSettings, initial: Option<Location>) -> Self {
        let state = PickerState::new(&settings, initial);
        Self {
            shared: Arc::new(Shared {
                backend,
                settings,
                state: Mutex::new(state),
            }),
        }
    }

    pub fn settings(&self) -> &PickerSettings {
        &self.shared.settings
    }

    /// Feed the current search box text
    ///
    /// Schedules one search after the quiet interval; short input clears the
    /// results right away.
    pub async fn set_query(&self, text: &str) -> Result<()> {
        let mut state = self.shared.state.lock().await;
        state.ensure_open()?;

        if state.query.update(text, self.shared.settings.min_query_chars) {
            debug!(query = %text, "Search scheduled");
            search::schedule_search(&self.shared, &mut state.query);
        }
        Ok(())
    }

    /// Choose one of the current search results
    ///
    /// Closes the result panel. Malformed coordinates reject the selection
    /// and keep the previous state.
    pub async fn select_result(&self, index: usize) -> Result<Location> {
        let mut state = self.shared.state.lock().await;
        state.ensure_open()?;
        resolver::select_result(&mut state, index)
    }

    /// Select a point on the map
    ///
    /// Coordinates update immediately; text fields follow once reverse
    /// geocoding completes. The returned handle resolves when that lookup
    /// finishes (or is cancelled by a newer selection).
    pub async fn select_point(&self, lat: f64, lng: f64) -> Result<JoinHandle<()>> {
        let coords = Coordinates::new(lat, lng);
        coords.validate()?;

        let mut state = self.shared.state.lock().await;
        state.ensure_open()?;
        Ok(resolver::start_point(&self.shared, &mut state, coords))
    }

    /// Enter a pincode and look up the place it belongs to
    pub async fn lookup_pincode(&self, pincode: &str) -> Result<JoinHandle<()>> {
        let pincode = resolver::normalize_pincode(pincode)?;

        let mut state = self.shared.state.lock().await;
        state.ensure_open()?;
        Ok(resolver::start_pincode(&self.shared, &mut state, pincode))
    }

    /// Manually edit text fields
    pub async fn edit(&self, patch: LocationPatch) -> Result<Location> {
        let mut state = self.shared.state.lock().await;
        state.ensure_open()?;
        Ok(resolver::apply_edit(&mut state, &patch))
    }

    /// Confirm the selection and hand the location to the caller
    pub async fn confirm(&self) -> Result<Location> {
        let mut state = self.shared.state.lock().await;

        match state.phase {
            Phase::PointOnly | Phase::Resolved => {}
            Phase::Empty => {
                return Err(Error::InvalidState("No location selected".to_string()));
            }
            Phase::Confirmed => {
                return Err(Error::InvalidState("Location already confirmed".to_string()));
            }
        }

        state.query.reset();
        state.resolution.invalidate();
        state.phase = Phase::Confirmed;
        info!(location = %state.location, "Location confirmed");
        Ok(state.location.clone())
    }

    /// Clear query, results and selection back to `Empty`
    pub async fn cancel(&self) {
        let mut state = self.shared.state.lock().await;
        state.query.reset();
        state.resolution.invalidate();
        state.location = Location::default();
        state.phase = Phase::Empty;
        debug!("Picker cancelled");
    }

    /// Stop all pending work (timer and in-flight lookups), keeping the state
    ///
    /// A point still being resolved keeps its coordinates and previous fields.
    pub async fn close(&self) {
        let mut state = self.shared.state.lock().await;
        state.query.halt();
        state.resolution.invalidate();
        if state.phase == Phase::PointOnly {
            state.phase = Phase::Resolved;
        }
    }

    /// True once no search is waiting on the timer or on the provider
    pub async fn search_settled(&self) -> bool {
        let state = self.shared.state.lock().await;
        !state.query.is_scheduled() && !state.query.searching()
    }

    pub async fn snapshot(&self) -> PickerSnapshot {
        self.shared.state.lock().await.snapshot()
    }

    pub async fn phase(&self) -> Phase {
        self.shared.state.lock().await.phase
    }

    pub async fn location(&self) -> Location {
        self.shared.state.lock().await.location.clone()
    }
}
