//! Background fetch tasks
//!
//! Fetches run on spawned tokio tasks so the dashboard keeps drawing while a
//! request (or its fallback delay) is pending. Results come back over a
//! channel and are applied by the event loop, which is the only writer of
//! application state.

use tokio::sync::mpsc;

use crate::app::ProbeRequest;
use crate::service::{CoordinateResponse, LocationsResponse, WeatherService};

/// Messages sent from background fetches to the main loop
#[derive(Debug, Clone)]
pub enum FetchMessage {
    /// The bulk location list settled
    Locations(LocationsResponse),
    /// A coordinate lookup settled
    Probe {
        request: ProbeRequest,
        response: CoordinateResponse,
    },
}

/// Handle for starting fetches and receiving their results
pub struct FetchHandle {
    service: WeatherService,
    sender: mpsc::Sender<FetchMessage>,
    receiver: mpsc::Receiver<FetchMessage>,
}

impl FetchHandle {
    pub fn new(service: WeatherService) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        Self {
            service,
            sender,
            receiver,
        }
    }

    /// Starts a bulk location fetch
    pub fn load_locations(&self) {
        let service = self.service.clone();
        let tx = self.sender.clone();
        tokio::spawn(async move {
            let response = service.fetch_all_locations().await;
            let _ = tx.send(FetchMessage::Locations(response)).await;
        });
    }

    /// Starts a coordinate lookup
    pub fn probe(&self, request: ProbeRequest) {
        let service = self.service.clone();
        let tx = self.sender.clone();
        tokio::spawn(async move {
            let response = service
                .fetch_by_coordinates(
                    request.coordinates.latitude,
                    request.coordinates.longitude,
                )
                .await;
            let _ = tx.send(FetchMessage::Probe { request, response }).await;
        });
    }

    /// Checks for a settled fetch without blocking
    pub fn try_recv(&mut self) -> Option<FetchMessage> {
        self.receiver.try_recv().ok()
    }
}
