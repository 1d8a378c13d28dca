//! Location resolver
//!
//! Turns a map click, a chosen search result, a pincode or a manual edit into
//! the session's `Location`. Geocoding failures are logged and swallowed
//! here; text fields are only ever replaced all together.

use crate::constants::pincode::MAX_LEN;
use crate::error::{Error, Result};
use crate::geo::GeoBackend;
use crate::location::{AddressParts, Coordinates, Location, LocationPatch, SearchResult};
use crate::picker::sequence::Ticket;
use crate::picker::session::{PickerState, Shared};
use crate::picker::Phase;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Normalize and validate a user-entered pincode
pub fn normalize_pincode(pincode: &str) -> Result<String> {
    let pincode: String = pincode.chars().filter(|c| !c.is_whitespace()).collect();

    if pincode.is_empty() {
        return Err(Error::InvalidPincode("Pincode is empty".to_string()));
    }
    if pincode.len() > MAX_LEN {
        return Err(Error::InvalidPincode(format!(
            "Pincode {} is longer than {} characters",
            pincode, MAX_LEN
        )));
    }
    if !pincode.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(Error::InvalidPincode(format!(
            "Pincode {} contains invalid characters",
            pincode
        )));
    }
    Ok(pincode)
}

/// Set a clicked point and start reverse geocoding it
///
/// Coordinates change immediately, whatever the lookup later returns.
pub(crate) fn start_point<B: GeoBackend>(
    shared: &Arc<Shared<B>>,
    state: &mut PickerState,
    coords: Coordinates,
) -> JoinHandle<()> {
    state.location.coordinates = coords;
    state.phase = Phase::PointOnly;
    let ticket = state.resolution.issue();
    debug!(%coords, ticket = ticket.seq(), "Reverse geocoding point");

    let backend = Arc::clone(&shared.backend);
    let weak = Arc::downgrade(shared);
    let task = tokio::spawn(async move {
        let outcome = backend.reverse(coords).await;
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let mut state = shared.state.lock().await;
        finish_point(&mut state, ticket, outcome);
    });
    state.resolution.attach(ticket, task.abort_handle());
    task
}

/// Apply a reverse geocoding completion
///
/// Returns false if the completion was stale and dropped.
pub(crate) fn finish_point(
    state: &mut PickerState,
    ticket: Ticket,
    outcome: Result<Option<AddressParts>>,
) -> bool {
    if !state.resolution.accept(ticket) {
        return false;
    }

    match outcome {
        Ok(Some(parts)) => {
            state.location.apply_address(&parts);
            info!(location = %state.location, "Point resolved");
        }
        Ok(None) => {
            info!(coords = %state.location.coordinates, "No address for point; keeping fields");
        }
        Err(e) => log_provider_error(&e, "Reverse geocoding failed; keeping fields"),
    }
    state.phase = Phase::Resolved;
    true
}

/// Resolve the session from one of its current search results
///
/// Malformed coordinates reject the selection and leave the state untouched.
pub(crate) fn select_result(state: &mut PickerState, index: usize) -> Result<Location> {
    let result: &SearchResult = state.query.results().get(index).ok_or_else(|| {
        Error::InvalidSelection(format!(
            "No search result at index {} ({} available)",
            index,
            state.query.results().len()
        ))
    })?;
    let location = result.to_location()?;

    state.location = location.clone();
    state.query.reset();
    state.resolution.invalidate();
    state.phase = Phase::Resolved;
    info!(location = %location, "Search result selected");
    Ok(location)
}

/// Record a pincode and start looking it up
pub(crate) fn start_pincode<B: GeoBackend>(
    shared: &Arc<Shared<B>>,
    state: &mut PickerState,
    pincode: String,
) -> JoinHandle<()> {
    state.location.pincode = pincode.clone();
    let ticket = state.resolution.issue();
    debug!(pincode = %pincode, ticket = ticket.seq(), "Looking up pincode");

    let backend = Arc::clone(&shared.backend);
    let weak = Arc::downgrade(shared);
    let task = tokio::spawn(async move {
        let outcome = backend.lookup_postcode(&pincode).await;
        let Some(shared) = weak.upgrade() else {
            return;
        };
        let mut state = shared.state.lock().await;
        finish_pincode(&mut state, ticket, &pincode, outcome);
    });
    state.resolution.attach(ticket, task.abort_handle());
    task
}

/// Apply a pincode lookup completion
///
/// The first candidate with usable coordinates replaces the location; the
/// entered pincode is kept as typed.
pub(crate) fn finish_pincode(
    state: &mut PickerState,
    ticket: Ticket,
    pincode: &str,
    outcome: Result<Vec<SearchResult>>,
) -> bool {
    if !state.resolution.accept(ticket) {
        return false;
    }

    match outcome {
        Ok(results) => match results.iter().find_map(|r| r.to_location().ok()) {
            Some(mut location) => {
                location.pincode = pincode.to_string();
                state.location = location;
                info!(location = %state.location, "Pincode resolved");
            }
            None => {
                info!(pincode, "No match for pincode; keeping fields");
            }
        },
        Err(e) => log_provider_error(&e, "Pincode lookup failed; keeping fields"),
    }
    // The typed pincode stands either way so the form can be finished by hand.
    state.phase = Phase::Resolved;
    true
}

fn log_provider_error(error: &Error, message: &str) {
    if error.is_provider_failure() {
        warn!(error = %error, "{}", message);
    } else {
        error!(error = %error, "{}", message);
    }
}

/// Apply manual field edits
///
/// A pending point or pincode lookup is dropped so it cannot overwrite what
/// the user typed. An empty patch changes nothing.
pub(crate) fn apply_edit(state: &mut PickerState, patch: &LocationPatch) -> Location {
    if patch.is_empty() {
        return state.location.clone();
    }
    state.location.apply_patch(patch);
    state.resolution.invalidate();
    if matches!(state.phase, Phase::Empty | Phase::PointOnly) {
        state.phase = Phase::Resolved;
    }
    state.location.clone()
}
