pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod request;
pub mod types;
pub mod validation;

pub use client::{Page, TrackingClient};
pub use config::ClientConfig;
pub use error::{FieldError, TrackingError, ValidationErrors};
pub use http::{HttpExecutor, WreqExecutor};
pub use request::{CreateTrackingRequest, TracksQueryParams};
pub use types::{CreateItem, CreateResult, DeliveryStatus, Track, TrackInfo, TrackOriginInfo};
pub use validation::Validate;
