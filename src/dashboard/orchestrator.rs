use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

use crate::forecast::{Forecast, ForecastService};
use crate::lookup::{CityKey, ErrorKind, WeatherLookupService, WeatherSnapshot};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryState {
    Idle,
    Pending {
        city: CityKey,
    },
    Success {
        city: CityKey,
        snapshot: WeatherSnapshot,
        forecast: Forecast,
    },
    Failed {
        city: CityKey,
        error: ErrorKind,
    },
}

impl QueryState {
    pub fn city(&self) -> Option<&CityKey> {
        match self {
            Self::Idle => None,
            Self::Pending { city } | Self::Success { city, .. } | Self::Failed { city, .. } => {
                Some(city)
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// The current state together with the latest issued sequence number
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommittedState {
    pub sequence: u64,
    #[serde(flatten)]
    pub state: QueryState,
}

/// An issued request awaiting completion.
#[must_use = "a pending request must be completed or the dashboard stays pending"]
#[derive(Debug)]
pub struct PendingRequest {
    sequence: u64,
    city: CityKey,
}

impl PendingRequest {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn city(&self) -> &CityKey {
        &self.city
    }
}

#[derive(Debug)]
pub enum Admission {
    /// A new request was issued
    Issued(PendingRequest),
    /// Same city as the request already in flight; no new request issued
    Coalesced { sequence: u64 },
}

/// Sequences lookup and forecast into one state transition per query.
///
/// Each accepted request gets the next sequence number. Only a completion whose
/// sequence is still the latest may commit; older completions are dropped.
pub struct SnapshotOrchestrator {
    lookup: Arc<WeatherLookupService>,
    forecasts: Arc<ForecastService>,
    state: watch::Sender<CommittedState>,
}

impl SnapshotOrchestrator {
    pub fn new(lookup: Arc<WeatherLookupService>, forecasts: Arc<ForecastService>) -> Self {
        let (state, _) = watch::channel(CommittedState {
            sequence: 0,
            state: QueryState::Idle,
        });

        Self {
            lookup,
            forecasts,
            state,
        }
    }

    /// Accept a request and move to Pending.
    /// Issue order is fixed here, independent of when `complete` runs.
    pub fn begin(&self, city_name: &str) -> Admission {
        let city = CityKey::new(city_name);
        let mut coalesced = false;
        let mut sequence = 0;

        self.state.send_if_modified(|current| {
            if let QueryState::Pending { city: in_flight } = &current.state {
                if *in_flight == city {
                    coalesced = true;
                    sequence = current.sequence;
                    return false;
                }
            }

            current.sequence += 1;
            current.state = QueryState::Pending { city: city.clone() };
            sequence = current.sequence;
            true
        });

        if coalesced {
            tracing::debug!(city = %city, sequence, "Request coalesced with in-flight query");
            Admission::Coalesced { sequence }
        } else {
            tracing::debug!(city = %city, sequence, "Request issued");
            Admission::Issued(PendingRequest { sequence, city })
        }
    }

    /// Resolve and forecast an issued request, then commit if it is still the latest.
    /// Returns whether the result was committed.
    pub async fn complete(&self, pending: PendingRequest) -> bool {
        let PendingRequest { sequence, city } = pending;

        let outcome = match self.lookup.resolve_key(&city).await {
            Ok(snapshot) => {
                let reference_time = chrono::Utc::now().timestamp();
                match self
                    .forecasts
                    .forecast_for(&city, &snapshot, reference_time)
                    .await
                {
                    Ok(forecast) => QueryState::Success {
                        city: city.clone(),
                        snapshot,
                        forecast,
                    },
                    Err(e) => QueryState::Failed {
                        city: city.clone(),
                        error: e.kind(),
                    },
                }
            }
            Err(e) => QueryState::Failed {
                city: city.clone(),
                error: e.kind(),
            },
        };

        let committed = self.state.send_if_modified(|current| {
            if current.sequence != sequence {
                return false;
            }
            current.state = outcome;
            true
        });

        if committed {
            tracing::info!(city = %city, sequence, "Dashboard state committed");
        } else {
            tracing::debug!(city = %city, sequence, "Discarding stale completion");
        }

        committed
    }

    /// Issue and complete a request. A coalesced request waits for the
    /// in-flight one to settle. Returns the state committed afterwards.
    pub async fn request(&self, city_name: &str) -> CommittedState {
        match self.begin(city_name) {
            Admission::Issued(pending) => {
                self.complete(pending).await;
            }
            Admission::Coalesced { sequence } => {
                let mut receiver = self.subscribe();
                // The sender lives in self, so this only returns once settled
                let _ = receiver
                    .wait_for(|c| c.sequence != sequence || !c.state.is_pending())
                    .await;
            }
        }

        self.current()
    }

    pub fn current_state(&self) -> QueryState {
        self.state.borrow().state.clone()
    }

    pub fn current(&self) -> CommittedState {
        self.state.borrow().clone()
    }

    pub fn latest_sequence(&self) -> u64 {
        self.state.borrow().sequence
    }

    pub fn subscribe(&self) -> watch::Receiver<CommittedState> {
        self.state.subscribe()
    }
}
