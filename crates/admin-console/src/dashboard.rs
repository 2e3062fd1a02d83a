//! # Dashboard KPIs
//!
//! A single-record cache of `GET /dashboard/kpi`. It follows the Resource Store rules on a
//! smaller scale: one loading flag derived from in-flight refreshes, one error field, the
//! previous KPI kept visible when a refresh fails, and only the latest refresh applied.
//!
//! There is no actor here. Every transition is a single [`watch::Sender::send_modify`]
//! call, which runs under the channel's lock, so observers never see half of one.

use crate::model::DashboardKpi;
use std::sync::Arc;
use store_framework::{ApiRequest, StoreError, StoreFailure, Transport};
use tokio::sync::watch;
use tracing::{info, instrument, warn};

pub const KPI_PATH: &str = "/dashboard/kpi";
const FETCH_FAILED: &str = "Failed to fetch dashboard data";

/// Observable state of the dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    kpi: Option<DashboardKpi>,
    in_flight: usize,
    error: Option<StoreFailure>,
    latest: u64,
}

impl DashboardState {
    pub fn kpi(&self) -> Option<&DashboardKpi> {
        self.kpi.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn error(&self) -> Option<&StoreFailure> {
        self.error.as_ref()
    }
}

/// Cloneable handle to the dashboard cache.
#[derive(Clone)]
pub struct DashboardStore {
    state: Arc<watch::Sender<DashboardState>>,
    transport: Arc<dyn Transport>,
}

impl DashboardStore {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let (state, _) = watch::channel(DashboardState::default());
        Self {
            state: Arc::new(state),
            transport,
        }
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    /// Fetches the KPIs. A refresh overtaken by a newer one returns
    /// [`StoreError::Superseded`] and leaves the state alone.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<DashboardKpi, StoreError> {
        let mut seq = 0;
        self.state.send_modify(|state| {
            state.latest += 1;
            state.in_flight += 1;
            state.error = None;
            seq = state.latest;
        });
        let mut guard = InFlight {
            state: Some(self.state.clone()),
        };

        let result = match self.transport.send(ApiRequest::get(KPI_PATH)).await {
            Ok(body) => serde_json::from_value::<DashboardKpi>(body).map_err(|e| {
                warn!(error = %e, "Dashboard response does not decode");
                StoreError::Transport {
                    message: FETCH_FAILED.to_owned(),
                    status: None,
                }
            }),
            Err(e) => Err(StoreError::from_transport(e, FETCH_FAILED)),
        };

        let mut applied = Err(StoreError::Superseded);
        self.state.send_modify(|state| {
            state.in_flight = state.in_flight.saturating_sub(1);
            if seq != state.latest {
                return;
            }
            applied = match result {
                Ok(kpi) => {
                    state.kpi = Some(kpi.clone());
                    Ok(kpi)
                }
                Err(error) => {
                    state.error = StoreFailure::from_error(&error);
                    Err(error)
                }
            };
        });
        guard.disarm();

        match &applied {
            Ok(kpi) => info!(open_orders = kpi.open_orders, "Dashboard refreshed"),
            Err(StoreError::Superseded) => warn!(seq, "Dashboard response superseded"),
            Err(e) => warn!(error = %e, "Dashboard refresh failed"),
        }
        applied
    }

    /// Forgets the KPIs and discards any refresh still in flight.
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            state.latest += 1;
            state.kpi = None;
            state.error = None;
        });
    }
}

/// Releases the in-flight slot of a refresh dropped before it settled.
struct InFlight {
    state: Option<Arc<watch::Sender<DashboardState>>>,
}

impl InFlight {
    fn disarm(&mut self) {
        self.state = None;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            state.send_modify(|state| {
                state.in_flight = state.in_flight.saturating_sub(1);
            });
        }
    }
}
