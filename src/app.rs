//! Application state management for riskglobe
//!
//! This module contains the dashboard state: the working set of locations,
//! selection, the 24-hour timeline with playback, coordinate probe entry and
//! the provenance of the latest settled fetch. It never performs I/O; fetch
//! results are applied by the event loop as they arrive.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent};

use crate::cli::{parse_coordinates, Coordinates};
use crate::data::{DataSource, WeatherLocation, FORECAST_HOURS};
use crate::reconcile::LocationSet;
use crate::service::{CoordinateResponse, LocationsResponse};

/// Time between playback steps
pub const PLAYBACK_STEP: Duration = Duration::from_millis(500);

/// Highest selectable hour offset
pub const LAST_HOUR: usize = FORECAST_HOURS - 1;

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Waiting for the first location list
    Loading,
    /// List of all locations
    LocationList,
    /// Detail panel for the location with this id
    LocationDetail(String),
}

/// Connectivity shown in the footer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    /// No fetch has settled yet
    Connecting,
    /// Provenance of the latest settled fetch
    Resolved(DataSource),
}

impl SourceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SourceStatus::Connecting => "CONNECTING",
            SourceStatus::Resolved(source) => source.label(),
        }
    }
}

/// A coordinate lookup handed to the event loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeRequest {
    /// Monotonic request identity; the latest one decides the selection
    pub id: u64,
    pub coordinates: Coordinates,
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Locations shown in the list, bulk results plus probes
    pub locations: LocationSet,
    pub source_status: SourceStatus,
    /// Index of currently selected location in the list
    pub selected_index: usize,
    /// Hour offset shown everywhere (0..=23)
    pub selected_hour: usize,
    pub is_playing: bool,
    /// When playback last advanced
    last_step: Option<Instant>,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Text of the coordinate prompt while it is open
    pub probe_input: Option<String>,
    /// Parse error for the current prompt text
    pub probe_error: Option<String>,
    /// Lookups waiting to be started by the event loop
    pending_probes: VecDeque<Coordinates>,
    /// Lookups started but not yet settled
    pub probes_in_flight: usize,
    next_probe_id: u64,
    latest_probe_id: Option<u64>,
}

impl App {
    /// Creates a new App instance with default state
    pub fn new() -> Self {
        Self {
            state: AppState::Loading,
            locations: LocationSet::new(),
            source_status: SourceStatus::Connecting,
            selected_index: 0,
            selected_hour: 0,
            is_playing: false,
            last_step: None,
            should_quit: false,
            show_help: false,
            probe_input: None,
            probe_error: None,
            pending_probes: VecDeque::new(),
            probes_in_flight: 0,
            next_probe_id: 0,
            latest_probe_id: None,
        }
    }

    /// Creates an App that looks up these coordinates once locations have loaded
    pub fn with_probes(probes: Vec<Coordinates>) -> Self {
        let mut app = Self::new();
        app.pending_probes.extend(probes);
        app
    }

    /// Returns the currently selected location, if any
    pub fn selected_location(&self) -> Option<&WeatherLocation> {
        self.locations.get(self.selected_index)
    }

    /// Whether a fetch is outstanding (bulk load or probe)
    pub fn is_fetching(&self) -> bool {
        self.state == AppState::Loading || self.probes_in_flight > 0
    }

    /// Time the selected hour refers to: taken from the selected location,
    /// else the first location, else now.
    pub fn current_timestamp(&self) -> DateTime<Utc> {
        self.selected_location()
            .or_else(|| self.locations.get(0))
            .and_then(|location| location.hour(self.selected_hour))
            .map(|hour| hour.timestamp)
            .unwrap_or_else(Utc::now)
    }

    /// Applies a settled bulk fetch
    pub fn apply_locations(&mut self, response: LocationsResponse) {
        self.locations.replace_all(response.locations);
        self.source_status = SourceStatus::Resolved(response.source);

        if self.selected_index >= self.locations.len() {
            self.selected_index = 0;
        }
        match &self.state {
            AppState::LocationDetail(id) if self.locations.position_by_id(id).is_none() => {
                self.state = AppState::LocationList;
            }
            AppState::Loading => self.state = AppState::LocationList,
            _ => {}
        }
    }

    /// Hands out the next queued lookup. Nothing is released while the
    /// initial list is loading, so probes are never overwritten by it.
    pub fn take_pending_probe(&mut self) -> Option<ProbeRequest> {
        if self.state == AppState::Loading {
            return None;
        }
        let coordinates = self.pending_probes.pop_front()?;

        let id = self.next_probe_id;
        self.next_probe_id += 1;
        self.latest_probe_id = Some(id);
        self.probes_in_flight += 1;

        Some(ProbeRequest { id, coordinates })
    }

    /// Applies a settled coordinate lookup.
    ///
    /// The location is always reconciled into the set. Only the most recent
    /// request moves the selection, so a slow earlier lookup that settles
    /// late cannot steal focus.
    pub fn apply_probe(&mut self, request: ProbeRequest, response: CoordinateResponse) {
        self.probes_in_flight = self.probes_in_flight.saturating_sub(1);
        self.source_status = SourceStatus::Resolved(response.source);

        let Some(location) = response.location else {
            return;
        };
        let id = location.id.clone();
        let placement = self.locations.upsert_probe(
            request.coordinates.latitude,
            request.coordinates.longitude,
            location,
        );

        if self.latest_probe_id == Some(request.id) {
            self.selected_index = placement.index();
            self.state = AppState::LocationDetail(id);
        } else if let AppState::LocationDetail(shown) = &self.state {
            // A replaced entry may have been the one on screen
            if self.locations.position_by_id(shown).is_none() {
                self.state = AppState::LocationDetail(id);
            }
        }
    }

    /// Advances playback when a step is due
    pub fn tick(&mut self, now: Instant) {
        if !self.is_playing {
            return;
        }
        match self.last_step {
            None => self.last_step = Some(now),
            Some(last) if now.duration_since(last) >= PLAYBACK_STEP => {
                self.advance_playback();
                self.last_step = Some(now);
            }
            Some(_) => {}
        }
    }

    /// One playback step. After the last hour playback stops and rewinds.
    pub fn advance_playback(&mut self) {
        if self.selected_hour >= LAST_HOUR {
            self.is_playing = false;
            self.selected_hour = 0;
            self.last_step = None;
        } else {
            self.selected_hour += 1;
        }
    }

    pub fn toggle_playback(&mut self) {
        self.is_playing = !self.is_playing;
        self.last_step = None;
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit the application (`Esc` also quits from the list)
    /// - `Up`/`k`, `Down`/`j`: Move selection
    /// - `Enter`: Open the detail panel, or close it when open
    /// - `Esc` (in detail): Close the panel
    /// - `Left`/`h`, `Right`/`l`: Move along the timeline
    /// - `Space`: Toggle timeline playback
    /// - `c`: Open the coordinate prompt
    /// - `?`: Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Help overlay intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        if self.probe_input.is_some() {
            self.handle_probe_key(key_event);
            return;
        }

        match self.state {
            AppState::Loading => {
                // Only quit is allowed during loading
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::LocationList => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Enter => {
                    if let Some(location) = self.selected_location() {
                        self.state = AppState::LocationDetail(location.id.clone());
                    }
                }
                code => self.handle_common_key(code),
            },
            AppState::LocationDetail(_) => match key_event.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Esc | KeyCode::Enter => {
                    self.state = AppState::LocationList;
                }
                code => {
                    self.handle_common_key(code);
                    // Keep the panel on the selected location
                    if let Some(location) = self.selected_location() {
                        self.state = AppState::LocationDetail(location.id.clone());
                    }
                }
            },
        }
    }

    /// Bindings shared by the list and the detail panel
    fn handle_common_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection_down(),
            KeyCode::Left | KeyCode::Char('h') => self.step_hour_back(),
            KeyCode::Right | KeyCode::Char('l') => self.step_hour_forward(),
            KeyCode::Char(' ') => self.toggle_playback(),
            KeyCode::Char('c') => {
                self.probe_input = Some(String::new());
                self.probe_error = None;
            }
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    fn handle_probe_key(&mut self, key_event: KeyEvent) {
        let Some(input) = self.probe_input.as_mut() else {
            return;
        };
        match key_event.code {
            KeyCode::Esc => {
                self.probe_input = None;
                self.probe_error = None;
            }
            KeyCode::Enter => match parse_coordinates(input) {
                Ok(coordinates) => {
                    self.pending_probes.push_back(coordinates);
                    self.probe_input = None;
                    self.probe_error = None;
                }
                Err(e) => self.probe_error = Some(e.to_string()),
            },
            KeyCode::Backspace => {
                input.pop();
                self.probe_error = None;
            }
            KeyCode::Char(c) if c.is_ascii_digit() || matches!(c, '-' | '.' | ',' | ' ') => {
                input.push(c);
                self.probe_error = None;
            }
            _ => {}
        }
    }

    /// Moves the selection up in the list, wrapping to bottom if at top
    fn move_selection_up(&mut self) {
        let count = self.locations.len();
        if count == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = count - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Moves the selection down in the list, wrapping to top if at bottom
    fn move_selection_down(&mut self) {
        let count = self.locations.len();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }

    /// Moves the timeline back one hour, stopping at 0
    fn step_hour_back(&mut self) {
        self.selected_hour = self.selected_hour.saturating_sub(1);
    }

    /// Moves the timeline forward one hour, stopping at the last hour
    fn step_hour_forward(&mut self) {
        self.selected_hour = (self.selected_hour + 1).min(LAST_HOUR);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
