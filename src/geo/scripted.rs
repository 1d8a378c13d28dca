//! In-memory geocoding backend for tests
//!
//! Answers are scripted per query / point, with an optional delay so tests
//! running on paused tokio time can control arrival order.

use crate::error::{Error, Result};
use crate::geo::GeoBackend;
use crate::location::{AddressParts, Coordinates, SearchResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Outcome<T> {
    Ok(T),
    Fail,
}

#[derive(Debug, Clone)]
struct Scripted<T> {
    outcome: Outcome<T>,
    delay: Duration,
}

#[derive(Debug, Default)]
struct Script {
    searches: HashMap<String, Scripted<Vec<SearchResult>>>,
    postcodes: HashMap<String, Scripted<Vec<SearchResult>>>,
    reverses: HashMap<String, Scripted<Option<AddressParts>>>,
    search_calls: Vec<String>,
    postcode_calls: Vec<String>,
    reverse_calls: Vec<Coordinates>,
}

/// Scripted backend; clones share the same script and call log
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
}

fn point_key(coords: Coordinates) -> String {
    format!("{},{}", coords.latitude, coords.longitude)
}

pub(crate) fn result(display_name: &str, lat: &str, lon: &str, address: AddressParts) -> SearchResult {
    SearchResult {
        display_name: display_name.to_string(),
        lat: lat.to_string(),
        lon: lon.to_string(),
        address,
    }
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_ok(self, query: &str, results: Vec<SearchResult>, delay_ms: u64) -> Self {
        self.script.lock().unwrap().searches.insert(
            query.to_string(),
            Scripted {
                outcome: Outcome::Ok(results),
                delay: Duration::from_millis(delay_ms),
            },
        );
        self
    }

    pub fn search_fails(self, query: &str) -> Self {
        self.script.lock().unwrap().searches.insert(
            query.to_string(),
            Scripted {
                outcome: Outcome::Fail,
                delay: Duration::ZERO,
            },
        );
        self
    }

    pub fn postcode_ok(self, postcode: &str, results: Vec<SearchResult>, delay_ms: u64) -> Self {
        self.script.lock().unwrap().postcodes.insert(
            postcode.to_string(),
            Scripted {
                outcome: Outcome::Ok(results),
                delay: Duration::from_millis(delay_ms),
            },
        );
        self
    }

    pub fn reverse_ok(self, lat: f64, lng: f64, address: Option<AddressParts>, delay_ms: u64) -> Self {
        self.script.lock().unwrap().reverses.insert(
            point_key(Coordinates::new(lat, lng)),
            Scripted {
                outcome: Outcome::Ok(address),
                delay: Duration::from_millis(delay_ms),
            },
        );
        self
    }

    pub fn reverse_fails(self, lat: f64, lng: f64, delay_ms: u64) -> Self {
        self.script.lock().unwrap().reverses.insert(
            point_key(Coordinates::new(lat, lng)),
            Scripted {
                outcome: Outcome::Fail,
                delay: Duration::from_millis(delay_ms),
            },
        );
        self
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.script.lock().unwrap().search_calls.clone()
    }

    pub fn postcode_calls(&self) -> Vec<String> {
        self.script.lock().unwrap().postcode_calls.clone()
    }

    pub fn reverse_calls(&self) -> Vec<Coordinates> {
        self.script.lock().unwrap().reverse_calls.clone()
    }

    async fn play<T: Clone>(entry: Option<Scripted<T>>, missing: T) -> Result<T> {
        let Some(entry) = entry else {
            return Ok(missing);
        };
        if !entry.delay.is_zero() {
            tokio::time::sleep(entry.delay).await;
        }
        match entry.outcome {
            Outcome::Ok(value) => Ok(value),
            Outcome::Fail => Err(Error::Network("scripted failure".to_string())),
        }
    }
}

impl GeoBackend for ScriptedBackend {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let entry = {
            let mut script = self.script.lock().unwrap();
            script.search_calls.push(query.to_string());
            script.searches.get(query).cloned()
        };
        Self::play(entry, Vec::new()).await
    }

    async fn lookup_postcode(&self, postcode: &str) -> Result<Vec<SearchResult>> {
        let entry = {
            let mut script = self.script.lock().unwrap();
            script.postcode_calls.push(postcode.to_string());
            script.postcodes.get(postcode).cloned()
        };
        Self::play(entry, Vec::new()).await
    }

    async fn reverse(&self, coords: Coordinates) -> Result<Option<AddressParts>> {
        let entry = {
            let mut script = self.script.lock().unwrap();
            script.reverse_calls.push(coords);
            script.reverses.get(&point_key(coords)).cloned()
        };
        Self::play(entry, None).await
    }
}
