use serde::{Deserialize, Deserializer};
use std::fmt;

/// Decode `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Normalized parcel delivery status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Pending,
    NotFound,
    InfoReceived,
    Transit,
    Pickup,
    Delivered,
    Undelivered,
    Exception,
    Expired,
    Unknown,
}

impl DeliveryStatus {
    /// Parse from the API's status strings (`transit`, `delivered`, ...)
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "notfound" | "not_found" => Self::NotFound,
            "inforeceived" | "info_received" => Self::InfoReceived,
            "transit" | "intransit" | "in_transit" => Self::Transit,
            "pickup" => Self::Pickup,
            "delivered" => Self::Delivered,
            "undelivered" => Self::Undelivered,
            "exception" => Self::Exception,
            "expired" => Self::Expired,
            _ => Self::Unknown,
        }
    }

    /// Wire value accepted by the `delivery_status` query filter
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::NotFound => "notfound",
            Self::InfoReceived => "inforeceived",
            Self::Transit => "transit",
            Self::Pickup => "pickup",
            Self::Delivered => "delivered",
            Self::Undelivered => "undelivered",
            Self::Exception => "exception",
            Self::Expired => "expired",
            Self::Unknown => "",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::InfoReceived => write!(f, "INFO_RECEIVED"),
            Self::Transit => write!(f, "TRANSIT"),
            Self::Pickup => write!(f, "PICKUP"),
            Self::Delivered => write!(f, "DELIVERED"),
            Self::Undelivered => write!(f, "UNDELIVERED"),
            Self::Exception => write!(f, "EXCEPTION"),
            Self::Expired => write!(f, "EXPIRED"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Read a status code sent either as a number or as a numeric string.
fn status_number(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Outer wrapper of every API response.
///
/// Status fields arrive either at the top level or under `meta`. They are
/// informational only and left untyped; only `data` has a required shape.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<serde_json::Value>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
    pub data: Option<T>,
}

impl<T: Default> Envelope<T> {
    pub fn status_code(&self) -> Option<i64> {
        self.code
            .as_ref()
            .and_then(status_number)
            .or_else(|| self.meta.as_ref()?.get("code").and_then(status_number))
    }

    pub fn status_message(&self) -> Option<&str> {
        self.message
            .as_ref()
            .and_then(|m| m.as_str())
            .or_else(|| self.meta.as_ref()?.get("message")?.as_str())
    }

    /// Payload, with a missing or `null` `data` treated as empty
    pub fn into_data(self) -> T {
        self.data.unwrap_or_default()
    }
}

/// Echo of one submitted parcel
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tracking_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub courier_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_number: String,
}

/// Accepted and rejected parcels of one create call
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: Vec<CreateItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error: Vec<CreateItem>,
}

impl CreateResult {
    pub fn is_complete_success(&self) -> bool {
        self.error.is_empty()
    }
}

/// Current state of one tracked parcel
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Track {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tracking_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub courier_code: String,
    pub logistics_channel: Option<String>,
    /// Destination country code
    pub destination: Option<String>,
    /// Whether the server keeps refreshing this parcel automatically
    #[serde(default, deserialize_with = "null_as_default")]
    pub track_update: bool,
    pub consignee: Option<String>,
    /// False once the parcel stopped receiving updates
    #[serde(default, deserialize_with = "null_as_default")]
    pub updating: bool,
    pub created_at: Option<String>,
    pub update_date: Option<String>,
    pub order_create_time: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub title: Option<String>,
    pub order_number: Option<String>,
    pub note: Option<String>,
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub archived: bool,
    /// Origin country name
    pub original: Option<String>,
    pub destination_country: Option<String>,
    pub delivery_status: Option<String>,
    /// Days from pickup to delivery
    pub transit_time: Option<i64>,
    /// Days since the last checkpoint
    pub stay_time: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub origin_info: TrackOriginInfo,
}

impl Track {
    /// Parcel status, falling back to the latest checkpoint's status
    pub fn status(&self) -> DeliveryStatus {
        self.delivery_status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(DeliveryStatus::from_code)
            .or_else(|| {
                self.origin_info
                    .latest_checkpoint()
                    .map(TrackInfo::delivery_status)
            })
            .unwrap_or(DeliveryStatus::Unknown)
    }
}

/// Origin-side logistics detail
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackOriginInfo {
    /// Tracking number at the destination courier
    pub destination_track_number: Option<String>,
    pub reference_number: Option<String>,
    /// Tracking number at the transfer courier
    #[serde(rename = "exchangeNumber")]
    pub exchange_number: Option<String>,
    pub received_date: Option<String>,
    pub dispatched_date: Option<String>,
    pub departed_airport_date: Option<String>,
    pub arrived_abroad_date: Option<String>,
    pub customs_received_date: Option<String>,
    pub arrived_destination_date: Option<String>,
    pub weblink: Option<String>,
    pub courier_phone: Option<String>,
    /// Checkpoints in the order the courier reported them
    #[serde(default, deserialize_with = "null_as_default")]
    pub trackinfo: Vec<TrackInfo>,
    pub service_code: Option<String>,
    pub status_info: Option<String>,
    pub weight: Option<String>,
    pub destination_info: Option<String>,
    pub latest_event: Option<String>,
    #[serde(rename = "lastest_checkpoint_time", alias = "latest_checkpoint_time")]
    pub latest_checkpoint_time: Option<String>,
}

impl TrackOriginInfo {
    /// Most recent checkpoint. `trackinfo` is chronological, so this is the
    /// last entry; checkpoint dates are not compared.
    pub fn latest_checkpoint(&self) -> Option<&TrackInfo> {
        self.trackinfo.last()
    }
}

/// One checkpoint scan
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackInfo {
    pub checkpoint_date: Option<String>,
    pub tracking_detail: Option<String>,
    pub location: Option<String>,
    pub checkpoint_delivery_status: Option<String>,
    pub checkpoint_delivery_substatus: Option<String>,
}

impl TrackInfo {
    pub fn delivery_status(&self) -> DeliveryStatus {
        self.checkpoint_delivery_status
            .as_deref()
            .map(DeliveryStatus::from_code)
            .unwrap_or(DeliveryStatus::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parsing() {
        assert_eq!(DeliveryStatus::from_code("transit"), DeliveryStatus::Transit);
        assert_eq!(DeliveryStatus::from_code("Delivered"), DeliveryStatus::Delivered);
        assert_eq!(DeliveryStatus::from_code("notfound"), DeliveryStatus::NotFound);
        assert_eq!(DeliveryStatus::from_code("InfoReceived"), DeliveryStatus::InfoReceived);
        assert_eq!(DeliveryStatus::from_code("lost_at_sea"), DeliveryStatus::Unknown);
        assert_eq!(DeliveryStatus::Pickup.to_string(), "PICKUP");
        assert_eq!(DeliveryStatus::NotFound.as_code(), "notfound");
    }

    #[test]
    fn test_create_result_nulls() {
        let res: CreateResult =
            serde_json::from_str(r#"{"success":null,"error":[{"tracking_number":"X","courier_code":"dhl","order_number":null}]}"#)
                .unwrap();
        assert!(res.success.is_empty());
        assert_eq!(res.error.len(), 1);
        assert_eq!(res.error[0].order_number, "");
        assert!(!res.is_complete_success());
    }

    #[test]
    fn test_envelope_status_locations() {
        let top: Envelope<CreateResult> =
            serde_json::from_str(r#"{"code":200,"message":"Success","data":null}"#).unwrap();
        assert_eq!(top.status_code(), Some(200));
        assert_eq!(top.status_message(), Some("Success"));
        assert_eq!(top.into_data(), CreateResult::default());

        let nested: Envelope<Vec<Track>> =
            serde_json::from_str(r#"{"meta":{"code":4101,"message":"Tracking No. already exists"}}"#)
                .unwrap();
        assert_eq!(nested.status_code(), Some(4101));
        assert_eq!(nested.status_message(), Some("Tracking No. already exists"));
        assert!(nested.into_data().is_empty());
    }

    #[test]
    fn test_latest_checkpoint_is_last_entry() {
        let info: TrackOriginInfo = serde_json::from_str(
            r#"{"trackinfo": [
                {"checkpoint_date": "09/05/2024 08:00", "tracking_detail": "Accepted"},
                {"checkpoint_date": "10/05/2024 08:00", "tracking_detail": "Sorted"},
                {"checkpoint_date": "10/05/2024 08:00", "tracking_detail": "Departed"},
                {"checkpoint_date": "01/06/2024 09:30", "tracking_detail": "Delivered"}
            ]}"#,
        )
        .unwrap();
        let latest = info.latest_checkpoint().unwrap();
        assert_eq!(latest.tracking_detail.as_deref(), Some("Delivered"));
        assert!(TrackOriginInfo::default().latest_checkpoint().is_none());
    }

    #[test]
    fn test_track_decoding() {
        let json = r#"{
            "tracking_number": "1Z999",
            "courier_code": "ups",
            "track_update": true,
            "updating": null,
            "archived": false,
            "transit_time": 4,
            "stay_time": 1,
            "origin_info": {
                "exchangeNumber": "EX1",
                "lastest_checkpoint_time": "2024-05-03 10:00",
                "trackinfo": [
                    {"checkpoint_date": "2024-05-01 08:00", "tracking_detail": "Picked up", "location": "Shenzhen", "checkpoint_delivery_status": "transit"},
                    {"checkpoint_date": "2024-05-03 10:00", "tracking_detail": "Delivered", "location": "Chicago", "checkpoint_delivery_status": "delivered"}
                ]
            }
        }"#;
        let track: Track = serde_json::from_str(json).unwrap();
        assert!(track.track_update);
        assert!(!track.updating);
        assert_eq!(track.transit_time, Some(4));
        assert_eq!(track.origin_info.exchange_number.as_deref(), Some("EX1"));
        assert_eq!(
            track.origin_info.latest_checkpoint_time.as_deref(),
            Some("2024-05-03 10:00")
        );
        assert_eq!(track.origin_info.trackinfo.len(), 2);
        assert_eq!(
            track.origin_info.trackinfo[0].tracking_detail.as_deref(),
            Some("Picked up")
        );
        // No parcel-level status, so the latest checkpoint decides
        assert_eq!(track.status(), DeliveryStatus::Delivered);
    }

    #[test]
    fn test_track_null_origin_info() {
        let track: Track =
            serde_json::from_str(r#"{"tracking_number":"A","courier_code":"dhl","origin_info":null,"delivery_status":"pending"}"#)
                .unwrap();
        assert!(track.origin_info.trackinfo.is_empty());
        assert_eq!(track.status(), DeliveryStatus::Pending);
    }
}
