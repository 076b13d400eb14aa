//! Map viewport for Stampbook.
//!
//! The concrete map SDK is an external collaborator reached through
//! [`MapSdk`]. [`MapViewport`] turns store snapshots into one marker per
//! distinct place and hands clicked places back to the application as a
//! [`PlaceKey`]. [`HeadlessMap`] is an in-process SDK that records what it
//! was asked to draw.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use log::{debug, info};
use serde::Serialize;

use crate::types::bookmark::{Bookmark, PlaceKey};
use crate::types::errors::MapError;
use crate::types::settings::MapSettings;
use crate::types::stamp_board::{StampBoard, StampData};

/// Callback invoked with the place under a clicked marker.
pub type MarkerClickHandler = Arc<dyn Fn(&PlaceKey) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

/// One pin on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub key: PlaceKey,
    pub address: String,
    /// True if any saved copy of the place is visited.
    pub visited: bool,
    /// Colours of the boards holding the place, in board order.
    pub board_colors: Vec<String>,
}

impl MapMarker {
    pub fn position(&self) -> LatLng {
        LatLng {
            latitude: self.key.latitude,
            longitude: self.key.longitude,
        }
    }
}

/// Capabilities required from a map SDK.
#[async_trait]
pub trait MapSdk: Send + Sync {
    async fn load_sdk(&self) -> Result<(), MapError>;
    fn render_map(&self, center: LatLng, markers: &[MapMarker]) -> Result<(), MapError>;
    fn on_marker_click(&self, handler: MarkerClickHandler);
}

fn push_place(markers: &mut Vec<MapMarker>, bookmark: &Bookmark, color: Option<&str>) {
    let key = bookmark.place_key();
    let index = match markers.iter().position(|m| m.key == key) {
        Some(i) => i,
        None => {
            markers.push(MapMarker {
                key,
                address: bookmark.address.clone(),
                visited: false,
                board_colors: Vec::new(),
            });
            markers.len() - 1
        }
    };
    let marker = &mut markers[index];
    marker.visited |= bookmark.visited;
    if let Some(color) = color {
        if !marker.board_colors.iter().any(|c| c == color) {
            marker.board_colors.push(color.to_string());
        }
    }
}

/// Markers for every place in `data`, then for saved places that sit in no board.
pub fn build_markers(data: &StampData, saved: &[Bookmark]) -> Vec<MapMarker> {
    let mut markers = Vec::new();
    for board in &data.stamp_boards {
        for bookmark in &board.bookmarks {
            push_place(&mut markers, bookmark, Some(&board.color));
        }
    }
    for bookmark in saved {
        push_place(&mut markers, bookmark, None);
    }
    markers
}

/// Owns a map SDK and keeps it in step with store snapshots.
pub struct MapViewport<S: MapSdk> {
    sdk: S,
    settings: MapSettings,
    loaded: bool,
    markers: Vec<MapMarker>,
}

impl<S: MapSdk> MapViewport<S> {
    pub fn new(sdk: S, settings: MapSettings) -> Self {
        Self {
            sdk,
            settings,
            loaded: false,
            markers: Vec::new(),
        }
    }

    pub fn sdk(&self) -> &S {
        &self.sdk
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn center(&self) -> LatLng {
        LatLng {
            latitude: self.settings.center_latitude,
            longitude: self.settings.center_longitude,
        }
    }

    /// Loads the SDK once. Later calls return immediately.
    pub async fn load(&mut self) -> Result<(), MapError> {
        if self.loaded {
            return Ok(());
        }
        self.sdk.load_sdk().await?;
        self.loaded = true;
        info!("map sdk loaded");
        Ok(())
    }

    pub fn on_place_selected<F>(&self, handler: F)
    where
        F: Fn(&PlaceKey) + Send + Sync + 'static,
    {
        self.sdk.on_marker_click(Arc::new(handler));
    }

    /// Draws every board's places plus the unassigned saved places.
    pub fn show(&mut self, data: &StampData, saved: &[Bookmark]) -> Result<usize, MapError> {
        let markers = build_markers(data, saved);
        self.render(markers)
    }

    /// Draws a single board's places.
    pub fn show_board(&mut self, board: &StampBoard) -> Result<usize, MapError> {
        let data = StampData::from_boards(vec![board.clone()]);
        self.render(build_markers(&data, &[]))
    }

    fn render(&mut self, markers: Vec<MapMarker>) -> Result<usize, MapError> {
        if !self.loaded {
            return Err(MapError::NotLoaded);
        }
        self.sdk.render_map(self.center(), &markers)?;
        debug!("rendered {} markers", markers.len());
        self.markers = markers;
        Ok(self.markers.len())
    }

    pub fn markers(&self) -> &[MapMarker] {
        &self.markers
    }
}

#[derive(Default)]
struct HeadlessState {
    loaded: bool,
    renders: Vec<Vec<MapMarker>>,
    handler: Option<MarkerClickHandler>,
}

/// Map SDK that draws nothing and records every call.
pub struct HeadlessMap {
    api_key: String,
    state: Mutex<HeadlessState>,
}

impl HeadlessMap {
    /// An empty key makes `load_sdk` fail the way a missing SDK key does.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            state: Mutex::new(HeadlessState::default()),
        }
    }

    pub fn render_count(&self) -> usize {
        self.state.lock().map(|s| s.renders.len()).unwrap_or(0)
    }

    pub fn last_render(&self) -> Option<Vec<MapMarker>> {
        self.state
            .lock()
            .ok()
            .and_then(|s| s.renders.last().cloned())
    }

    /// Simulates a click on the marker at `key`. Returns false when no such
    /// marker is on the map or no handler is registered.
    pub fn click(&self, key: &PlaceKey) -> bool {
        let handler = match self.state.lock() {
            Ok(state) => {
                let shown = state
                    .renders
                    .last()
                    .map_or(false, |markers| markers.iter().any(|m| &m.key == key));
                match (&state.handler, shown) {
                    (Some(h), true) => Arc::clone(h),
                    _ => return false,
                }
            }
            Err(_) => return false,
        };
        handler(key);
        true
    }
}

#[async_trait]
impl MapSdk for HeadlessMap {
    async fn load_sdk(&self) -> Result<(), MapError> {
        if self.api_key.trim().is_empty() {
            return Err(MapError::SdkUnavailable("map SDK key is not set".to_string()));
        }
        let mut state = self
            .state
            .lock()
            .map_err(|e| MapError::SdkUnavailable(e.to_string()))?;
        state.loaded = true;
        Ok(())
    }

    fn render_map(&self, _center: LatLng, markers: &[MapMarker]) -> Result<(), MapError> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| MapError::Render(e.to_string()))?;
        if !state.loaded {
            return Err(MapError::NotLoaded);
        }
        state.renders.push(markers.to_vec());
        Ok(())
    }

    fn on_marker_click(&self, handler: MarkerClickHandler) {
        if let Ok(mut state) = self.state.lock() {
            state.handler = Some(handler);
        }
    }
}
