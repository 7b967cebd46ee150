use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::TrackingError;
use crate::http::{HttpExecutor, WreqExecutor};
use crate::request::{CreateTrackingRequest, TracksQueryParams};
use crate::types::{CreateResult, Envelope, Track};
use crate::validation::Validate;

pub const CREATE_PATH: &str = "/create";
pub const QUERY_PATH: &str = "/get";

/// One page of query results
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<Track>,
    /// True when the server returned fewer items than requested. A page that
    /// is exactly full is never reported as last, even if nothing follows.
    pub is_last_page: bool,
}

/// Client for the tracking API.
///
/// Cloning is cheap; clones share one executor.
pub struct TrackingClient<E = WreqExecutor> {
    executor: Arc<E>,
}

impl<E> Clone for TrackingClient<E> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
        }
    }
}

impl TrackingClient<WreqExecutor> {
    pub fn new(config: &ClientConfig) -> Result<Self, TrackingError> {
        Ok(Self::with_executor(Arc::new(WreqExecutor::new(config)?)))
    }

    pub fn from_env() -> Result<Self, TrackingError> {
        Self::new(&ClientConfig::from_env()?)
    }
}

impl<E: HttpExecutor> TrackingClient<E> {
    pub fn with_executor(executor: Arc<E>) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Register one parcel for tracking.
    ///
    /// Rejected parcels are reported in [`CreateResult::error`], not as an
    /// `Err`; callers should inspect both lists.
    pub async fn create(&self, request: CreateTrackingRequest) -> Result<CreateResult, TrackingError> {
        if let Err(errors) = request.validate() {
            tracing::warn!(
                tracking_number = %request.tracking_number,
                "create request rejected: {}",
                errors
            );
            return Err(errors.into());
        }

        let body = serde_json::to_string(&request).map_err(TrackingError::encode)?;
        tracing::debug!(
            tracking_number = %request.tracking_number,
            courier_code = %request.courier_code,
            "creating tracking"
        );

        let raw = self.executor.put_json(CREATE_PATH, body).await?;
        let result: CreateResult = decode(&raw)?;

        tracing::debug!(
            accepted = result.success.len(),
            rejected = result.error.len(),
            "tracking created"
        );
        Ok(result)
    }

    /// Fetch one page of tracked parcels matching `params`.
    pub async fn all(&self, params: &TracksQueryParams) -> Result<Page, TrackingError> {
        params.validate()?;

        let query = params.to_query();
        let raw = self.executor.get(QUERY_PATH, &query).await?;
        let items: Vec<Track> = decode(&raw)?;

        let is_last_page = is_last_page(items.len(), params.items_amount);
        tracing::debug!(count = items.len(), is_last_page, "tracks fetched");

        Ok(Page {
            items,
            is_last_page,
        })
    }
}

/// A short page is the only end-of-results signal.
fn is_last_page(received: usize, items_amount: Option<u32>) -> bool {
    received < items_amount.unwrap_or(0) as usize
}

/// Unwrap the response envelope, returning its `data`.
fn decode<T>(raw: &str) -> Result<T, TrackingError>
where
    T: DeserializeOwned + Default,
{
    let envelope: Envelope<T> = serde_json::from_str(raw).map_err(TrackingError::Decode)?;
    tracing::debug!(
        code = ?envelope.status_code(),
        message = envelope.status_message().unwrap_or(""),
        "response envelope"
    );
    Ok(envelope.into_data())
}
