//! # Enrichment
//!
//! Metadata the server attaches to every post: device class, coarse
//! location and the display timestamp.

use chrono::{DateTime, Local};

use crate::models::DeviceClass;
use crate::traits::GeoLocator;

/// Country code recorded when the lookup fails.
pub const UNKNOWN_COUNTRY: &str = "??";

/// Markers checked in order; the first hit wins.
const DEVICE_MARKERS: [(&str, DeviceClass); 5] = [
    ("iphone", DeviceClass::IPhone),
    ("android", DeviceClass::Android),
    ("windows", DeviceClass::Windows),
    ("macintosh", DeviceClass::Mac),
    ("linux", DeviceClass::Linux),
];

/// Classifies a `User-Agent` string by case-insensitive substring match.
pub fn device_from_user_agent(ua: &str) -> DeviceClass {
    let ua = ua.to_lowercase();
    DEVICE_MARKERS
        .iter()
        .find(|(marker, _)| ua.contains(marker))
        .map(|(_, device)| *device)
        .unwrap_or(DeviceClass::Guest)
}

/// Result of the geolocation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub country: String,
    pub is_foreign: bool,
}

impl Location {
    pub fn unknown() -> Self {
        Self {
            country: UNKNOWN_COUNTRY.to_string(),
            is_foreign: false,
        }
    }

    pub fn resolved(country: String, home_country: &str) -> Self {
        let is_foreign = country != home_country;
        Self { country, is_foreign }
    }
}

/// Looks up the client's country. Lookup failures never block a post:
/// they degrade to `("??", not foreign)`.
pub async fn locate(geo: &dyn GeoLocator, ip: &str, home_country: &str) -> Location {
    match geo.lookup_country(ip).await {
        Ok(code) => Location::resolved(code, home_country),
        Err(e) => {
            log::debug!("geolocation failed for {ip}: {e:#}");
            Location::unknown()
        }
    }
}

/// "MM/DD HH:MM" in server local time. No year, no zone.
pub fn display_time(now: DateTime<Local>) -> String {
    now.format("%m/%d %H:%M").to_string()
}
