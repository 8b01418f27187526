//! Physical-unit scaling per MISB ST 601.2.
//!
//! Maps sensor values in physical units (degrees, meters) onto the
//! fixed-width integer codes the Local Data Set carries on the wire:
//!
//! - Latitude: [-90, 90] degrees → signed 32-bit
//! - Longitude: [-180, 180] degrees → signed 32-bit
//! - Altitude: [-900, 19000] meters → unsigned 16-bit
//!
//! For latitude and longitude the standard reserves `i32::MIN` as the
//! "value unknown" error indicator, so valid mappings span the asymmetric
//! range ±(2^31 - 1). None of these functions clamp: callers validate
//! range first (see [`crate::config::SessionConfig::validate`]).

/// Error indicator reserved by the standard for latitude/longitude.
///
/// Never produced by [`map_latitude`] or [`map_longitude`] for in-domain
/// input.
pub const GEO_ERROR_INDICATOR: i32 = i32::MIN;

const GEO_CODE_MAX: f64 = 2_147_483_647.0; // 2^31 - 1

/// Affine linear mapping of `value` from `[in_low, in_high]` onto
/// `[out_low, out_high]`.
///
/// No clamping: out-of-range input produces out-of-range output. The
/// ratio is formed before the span multiply so that `in_low` and
/// `in_high` land exactly on `out_low` and `out_high`.
pub fn map_value(value: f64, in_low: f64, in_high: f64, out_low: f64, out_high: f64) -> f64 {
    out_low + (out_high - out_low) * ((value - in_low) / (in_high - in_low))
}

/// Map sensor latitude in degrees to its 32-bit wire code.
///
/// Domain [-90, 90] maps onto [-2147483647, 2147483647], truncating
/// toward zero.
pub fn map_latitude(degrees: f64) -> i32 {
    map_value(degrees, -90.0, 90.0, -GEO_CODE_MAX, GEO_CODE_MAX) as i32
}

/// Map sensor longitude in degrees to its 32-bit wire code.
///
/// Domain [-180, 180] maps onto [-2147483647, 2147483647], truncating
/// toward zero.
pub fn map_longitude(degrees: f64) -> i32 {
    map_value(degrees, -180.0, 180.0, -GEO_CODE_MAX, GEO_CODE_MAX) as i32
}

/// Map sensor true altitude in meters to its 16-bit wire code.
///
/// Domain [-900, 19000] maps onto [0, 65535], truncating toward zero.
pub fn map_altitude(meters: f64) -> u16 {
    map_value(meters, -900.0, 19000.0, 0.0, 65535.0) as u16
}

/// Wire codes for the sensor position.
///
/// Computed once from validated configuration and reused every tick;
/// only the timestamp and checksum change between packets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoCodes {
    /// Scaled latitude, 32-bit signed.
    pub latitude: i32,
    /// Scaled longitude, 32-bit signed.
    pub longitude: i32,
    /// Scaled altitude, 16-bit unsigned.
    pub altitude: u16,
}

impl GeoCodes {
    /// Scale a sensor position given in degrees and meters.
    pub fn from_position(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self {
            latitude: map_latitude(latitude_deg),
            longitude: map_longitude(longitude_deg),
            altitude: map_altitude(altitude_m),
        }
    }
}
