//! Geodetic and flight-geometry utilities
//!
//! Pure functions for great-circle course/distance, destination points,
//! angle wrapping and the wind triangle. Spherical earth model.

use libm::{asin, atan2, cos, sin, sqrt};

/// Mean earth radius used by the spherical model (m)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Feet to meters
pub const FT_TO_M: f64 = 0.3048;

/// Meters to feet
pub const M_TO_FT: f64 = 1.0 / FT_TO_M;

/// Knots to meters per second
pub const KT_TO_MPS: f64 = 1852.0 / 3600.0;

/// Meters per second to knots
pub const MPS_TO_KT: f64 = 3600.0 / 1852.0;

const DEG_TO_RAD: f64 = core::f64::consts::PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / core::f64::consts::PI;

/// Calculate distance and bearing between two positions using Haversine formula
///
/// # Arguments
///
/// * `lat1`, `lon1` - Start position in degrees
/// * `lat2`, `lon2` - End position in degrees
///
/// # Returns
///
/// Tuple of (distance in meters, bearing in degrees 0-360)
pub fn haversine_distance_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> (f64, f64) {
    let lat1_rad = lat1 * DEG_TO_RAD;
    let lat2_rad = lat2 * DEG_TO_RAD;
    let delta_lat = (lat2 - lat1) * DEG_TO_RAD;
    let delta_lon = (lon2 - lon1) * DEG_TO_RAD;

    let sin_dlat = sin(delta_lat / 2.0);
    let sin_dlon = sin(delta_lon / 2.0);
    let a = sin_dlat * sin_dlat + cos(lat1_rad) * cos(lat2_rad) * sin_dlon * sin_dlon;
    let c = 2.0 * atan2(sqrt(a), sqrt(1.0 - a));
    let distance = EARTH_RADIUS_M * c;

    // Forward azimuth
    let y = sin(delta_lon) * cos(lat2_rad);
    let x = cos(lat1_rad) * sin(lat2_rad) - sin(lat1_rad) * cos(lat2_rad) * cos(delta_lon);
    let bearing = wrap_360(atan2(y, x) * RAD_TO_DEG);

    (distance, bearing)
}

/// Destination reached from a start point along a great circle
///
/// # Arguments
///
/// * `lat`, `lon` - Start position in degrees
/// * `bearing_deg` - Initial course in degrees
/// * `distance_m` - Distance to travel in meters
///
/// # Returns
///
/// Tuple of (latitude, longitude) in degrees
pub fn offset_position(lat: f64, lon: f64, bearing_deg: f64, distance_m: f64) -> (f64, f64) {
    let lat1 = lat * DEG_TO_RAD;
    let lon1 = lon * DEG_TO_RAD;
    let brg = bearing_deg * DEG_TO_RAD;
    let ang = distance_m / EARTH_RADIUS_M;

    let lat2 = asin(sin(lat1) * cos(ang) + cos(lat1) * sin(ang) * cos(brg));
    let lon2 = lon1 + atan2(sin(brg) * sin(ang) * cos(lat1), cos(ang) - sin(lat1) * sin(lat2));

    (lat2 * RAD_TO_DEG, wrap_180(lon2 * RAD_TO_DEG))
}

/// Wrap angle into [0, 360)
pub fn wrap_360(angle: f64) -> f64 {
    let a = angle % 360.0;
    if a < 0.0 {
        a + 360.0
    } else {
        a
    }
}

/// Narrow a heading to f32, wrapped into [0, 360)
///
/// Values just below 360 in f64 round up to 360.0 in f32.
pub fn heading_f32(angle: f64) -> f32 {
    let h = wrap_360(angle) as f32;
    if h >= 360.0 {
        h - 360.0
    } else {
        h
    }
}

/// Signed difference `a - b` in degrees, wrapped into [-180, 180]
pub fn angle_diff(a: f64, b: f64) -> f64 {
    wrap_180(a - b)
}

/// Wrap angle into [-180, 180]
pub fn wrap_180(angle: f64) -> f64 {
    let mut a = angle % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a < -180.0 {
        a += 360.0;
    }
    a
}

/// Solve the wind triangle for a desired ground course
///
/// # Arguments
///
/// * `wind_speed_kt` - Wind speed
/// * `true_airspeed_kt` - Aircraft true airspeed
/// * `wind_from_deg` - Direction the wind blows from
/// * `course_deg` - Desired course over ground
///
/// # Returns
///
/// `Some((heading_deg, groundspeed_kt))`, or `None` when the course cannot be
/// flown (no airspeed, or the wind is too strong to hold the course).
pub fn wind_course(
    wind_speed_kt: f64,
    true_airspeed_kt: f64,
    wind_from_deg: f64,
    course_deg: f64,
) -> Option<(f64, f64)> {
    if true_airspeed_kt <= 0.0 {
        return None;
    }

    let crs = course_deg * DEG_TO_RAD;
    let wd = wind_from_deg * DEG_TO_RAD;

    let swc = (wind_speed_kt / true_airspeed_kt) * sin(wd - crs);
    if swc.abs() > 1.0 {
        return None;
    }

    let heading = crs + asin(swc);
    let groundspeed = true_airspeed_kt * sqrt(1.0 - swc * swc) - wind_speed_kt * cos(wd - crs);
    if groundspeed < 0.0 {
        return None;
    }

    Some((wrap_360(heading * RAD_TO_DEG), groundspeed))
}
