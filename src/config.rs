//! Session configuration.
//!
//! A [`SessionConfig`] is built once at startup (defaults overridden by
//! CLI input), normalized, validated, and read-only from then on. All
//! range checks happen here, before any socket is opened and before the
//! unit mappers run; the mappers themselves never clamp.

use std::net::{Ipv4Addr, SocketAddrV4};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::packet::TEXT_FIELD_LEN;
use crate::scale::GeoCodes;

/// Maximum supported send rate in packets per second.
pub const MAX_RATE: f64 = 1_000_000.0;

/// Immutable per-session settings for the KLV stream.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Destination address.
    pub address: Ipv4Addr,
    /// Destination port.
    pub port: u16,
    /// Send rate in packets per second. Fractional rates are allowed.
    pub rate: f64,
    /// Mission ID, at most 12 ASCII characters.
    pub mission_id: String,
    /// Platform designation, at most 12 ASCII characters.
    pub platform: String,
    /// Sensor latitude in degrees, [-90, 90].
    pub latitude: f64,
    /// Sensor longitude in degrees, [-180, 180].
    pub longitude: f64,
    /// Sensor true altitude in meters, [-900, 19000].
    pub altitude: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            address: Ipv4Addr::LOCALHOST,
            port: 9000,
            rate: 1.0,
            mission_id: "Mission 01".to_string(),
            platform: "Demo".to_string(),
            latitude: 44.64423,
            longitude: -93.24013,
            altitude: 333.0,
        }
    }
}

impl SessionConfig {
    /// Destination socket address.
    pub fn destination(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.address, self.port)
    }

    /// Interval between ticks of the transmission loop.
    ///
    /// Only meaningful after [`validate`](Self::validate) has accepted
    /// the rate.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.rate)
    }

    /// Truncate over-long text fields to the 12 characters the wire
    /// format carries, warning when anything is dropped.
    pub fn normalized(mut self) -> Self {
        clamp_text(&mut self.mission_id, "mission ID");
        clamp_text(&mut self.platform, "platform");
        self
    }

    /// Check every range the standard and the transport require.
    ///
    /// Rejects rather than clamps: an out-of-range latitude never
    /// reaches the unit mapper, so the reserved error-indicator code
    /// cannot be produced by accident.
    pub fn validate(&self) -> Result<()> {
        if !self.rate.is_finite() || self.rate <= 0.0 {
            return Err(Error::Config(format!(
                "rate must be a positive number of packets per second, got {}",
                self.rate
            )));
        }
        if self.rate > MAX_RATE {
            return Err(Error::Config(format!(
                "rates above 1,000,000 packets per second are not supported, got {}",
                self.rate
            )));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::Config(format!(
                "latitude out of range [-90, 90]: {}",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::Config(format!(
                "longitude out of range [-180, 180]: {}",
                self.longitude
            )));
        }
        if !(-900.0..=19000.0).contains(&self.altitude) {
            return Err(Error::Config(format!(
                "altitude out of range [-900, 19000]: {}",
                self.altitude
            )));
        }
        if !self.mission_id.is_ascii() {
            return Err(Error::Config("mission ID must be ASCII".to_string()));
        }
        if !self.platform.is_ascii() {
            return Err(Error::Config("platform must be ASCII".to_string()));
        }
        Ok(())
    }

    /// Scale the configured position to its wire codes.
    pub fn geo_codes(&self) -> GeoCodes {
        GeoCodes::from_position(self.latitude, self.longitude, self.altitude)
    }
}

// Non-ASCII input is left for validate() to reject; truncating it here
// could split a multi-byte character.
fn clamp_text(field: &mut String, label: &str) {
    if field.len() <= TEXT_FIELD_LEN || !field.is_ascii() {
        return;
    }
    tracing::warn!("{label} truncated to {TEXT_FIELD_LEN} characters");
    field.truncate(TEXT_FIELD_LEN);
}
