use serde::Serialize;

use crate::error::ValidationErrors;
use crate::validation::{self, Rules, Validate};

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

/// One parcel to register for tracking.
///
/// Only `tracking_number` and `courier_code` are required; the remaining
/// fields are needed by specific couriers and are left out of the payload
/// when unset or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateTrackingRequest {
    pub tracking_number: String,
    pub courier_code: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub order_number: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub title: Option<String>,
    /// Two-letter destination country code
    #[serde(skip_serializing_if = "is_blank")]
    pub destination_code: Option<String>,
    /// Free-form channel name, e.g. a freight forwarder
    #[serde(skip_serializing_if = "is_blank")]
    pub logistics_channel: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub customer_email: Option<String>,
    /// `+<dialing code><number>`, e.g. `+8612345678910`
    #[serde(skip_serializing_if = "is_blank")]
    pub customer_phone: Option<String>,
    /// `YYYY-MM-DD HH:MM`
    #[serde(skip_serializing_if = "is_blank")]
    pub shipping_date: Option<String>,
    /// `YYYYMMDD`, required by some couriers (deutsch-post)
    #[serde(skip_serializing_if = "is_blank")]
    pub tracking_shipping_date: Option<String>,
    /// Recipient postal code (postnl-3s)
    #[serde(skip_serializing_if = "is_blank")]
    pub tracking_postal_code: Option<String>,
    /// Destination country code (postnl-3s)
    #[serde(skip_serializing_if = "is_blank")]
    pub tracking_destination_code: Option<String>,
    /// Courier account (dynamic-logistics)
    #[serde(skip_serializing_if = "is_blank")]
    pub tracking_courier_account: Option<String>,
}

macro_rules! optional_setters {
    ($($field:ident),* $(,)?) => {
        $(
            pub fn $field(mut self, value: impl Into<String>) -> Self {
                self.$field = Some(value.into());
                self
            }
        )*
    };
}

impl CreateTrackingRequest {
    pub fn new(tracking_number: impl Into<String>, courier_code: impl Into<String>) -> Self {
        Self {
            tracking_number: tracking_number.into(),
            courier_code: courier_code.into(),
            ..Default::default()
        }
    }

    optional_setters!(
        order_number,
        title,
        destination_code,
        logistics_channel,
        note,
        customer_name,
        customer_email,
        customer_phone,
        shipping_date,
        tracking_shipping_date,
        tracking_postal_code,
        tracking_destination_code,
        tracking_courier_account,
    );
}

impl Validate for CreateTrackingRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Rules::new()
            .required(
                "tracking_number",
                &self.tracking_number,
                "tracking number must not be empty",
            )
            .required(
                "courier_code",
                &self.courier_code,
                "courier code must not be empty",
            )
            .when_present(
                "customer_email",
                self.customer_email.as_deref(),
                validation::is_email,
                "customer email is not a valid address",
            )
            .when_present(
                "customer_phone",
                self.customer_phone.as_deref(),
                validation::is_phone,
                "customer phone must be + followed by a 2-digit dialing code and 11 digits",
            )
            .when_present(
                "shipping_date",
                self.shipping_date.as_deref(),
                validation::is_shipping_date,
                "shipping date must be formatted as YYYY-MM-DD HH:MM",
            )
            .when_present(
                "tracking_shipping_date",
                self.tracking_shipping_date.as_deref(),
                validation::is_compact_date,
                "tracking shipping date must be formatted as YYYYMMDD",
            )
            .finish()
    }
}

/// Filter for querying already registered parcels.
///
/// `tracking_numbers` and `order_numbers` are comma-joined lists of at most
/// 40 entries each; the limit is enforced by the server. Date bounds are
/// epoch seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TracksQueryParams {
    pub tracking_numbers: Option<String>,
    pub order_numbers: Option<String>,
    pub delivery_status: Option<String>,
    pub archived_status: Option<String>,
    /// Page size; also drives last-page detection in `TrackingClient::all`
    pub items_amount: Option<u32>,
    pub pages_amount: Option<u32>,
    pub created_date_min: Option<i64>,
    pub created_date_max: Option<i64>,
    pub shipping_date_min: Option<i64>,
    pub shipping_date_max: Option<i64>,
    pub updated_date_min: Option<i64>,
    pub updated_date_max: Option<i64>,
    /// Result language hint (`en`, `cn`), honoured only by some couriers
    pub lang: Option<String>,
}

impl TracksQueryParams {
    pub fn with_tracking_numbers<S: AsRef<str>>(numbers: &[S]) -> Self {
        let joined = numbers
            .iter()
            .map(|n| n.as_ref().trim())
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        Self {
            tracking_numbers: Some(joined),
            ..Default::default()
        }
    }

    pub fn items_amount(mut self, amount: u32) -> Self {
        self.items_amount = Some(amount);
        self
    }

    pub fn pages_amount(mut self, amount: u32) -> Self {
        self.pages_amount = Some(amount);
        self
    }

    /// Flatten into query pairs keyed by wire name. Every `Some` number is
    /// sent as-is, including zero and negative values; unset fields and
    /// empty strings are skipped.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let text = [
            ("tracking_numbers", &self.tracking_numbers),
            ("order_numbers", &self.order_numbers),
            ("delivery_status", &self.delivery_status),
            ("archived_status", &self.archived_status),
        ];
        let amounts = [
            ("items_amount", self.items_amount),
            ("pages_amount", self.pages_amount),
        ];
        let dates = [
            ("created_date_min", self.created_date_min),
            ("created_date_max", self.created_date_max),
            ("shipping_date_min", self.shipping_date_min),
            ("shipping_date_max", self.shipping_date_max),
            ("updated_date_min", self.updated_date_min),
            ("updated_date_max", self.updated_date_max),
        ];

        let mut pairs = Vec::new();
        for (key, value) in text {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                pairs.push((key, v.to_string()));
            }
        }
        for (key, value) in amounts {
            if let Some(v) = value {
                pairs.push((key, v.to_string()));
            }
        }
        for (key, value) in dates {
            if let Some(v) = value {
                pairs.push((key, v.to_string()));
            }
        }
        if let Some(lang) = self.lang.as_deref().filter(|v| !v.is_empty()) {
            pairs.push(("lang", lang.to_string()));
        }
        pairs
    }
}

impl Validate for TracksQueryParams {
    // No local rules yet; list limits are checked by the server.
    fn validate(&self) -> Result<(), ValidationErrors> {
        Rules::new().finish()
    }
}
