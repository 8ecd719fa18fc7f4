//! Waypoint model
//!
//! A waypoint is either absolute (fixed lon/lat) or relative: an offset
//! heading and distance resolved against an anchor point and reference
//! course when the pattern is positioned.
//!
//! Altitudes use `ALT_UNSET_M` for "not specified"; the route manager only
//! honors altitudes above 1 m.

use crate::navigation::geo::{haversine_distance_bearing, offset_position, wrap_360, FT_TO_M};
use crate::parameters::{ConfigError, ConfigSection, ParamValue};

use super::error::RouteError;

/// Sentinel for an unspecified altitude (m)
pub const ALT_UNSET_M: f64 = -9999.0;

/// How a waypoint's position is defined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaypointMode {
    #[default]
    Absolute,
    Relative,
}

impl WaypointMode {
    /// Numeric mode flag: 0 relative, 1 absolute
    pub fn from_flag(flag: i32) -> Option<Self> {
        match flag {
            0 => Some(WaypointMode::Relative),
            1 => Some(WaypointMode::Absolute),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "absolute" => Some(WaypointMode::Absolute),
            "relative" => Some(WaypointMode::Relative),
            _ => None,
        }
    }
}

/// Route waypoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub mode: WaypointMode,
    /// Longitude (degrees)
    pub lon_deg: f64,
    /// Latitude (degrees)
    pub lat_deg: f64,
    /// Altitude above mean sea level (m), or `ALT_UNSET_M`
    pub alt_msl_m: f64,
    /// Height above ground (m), or `ALT_UNSET_M`
    pub agl_m: f64,
    /// Target speed (kt); 0 keeps the current speed target
    pub speed_kt: f32,
    /// Relative waypoints: offset from the reference course (degrees)
    pub offset_hdg_deg: f64,
    /// Relative waypoints: distance from the anchor (m)
    pub offset_dist_m: f64,
}

impl Default for Waypoint {
    fn default() -> Self {
        Self {
            mode: WaypointMode::Absolute,
            lon_deg: 0.0,
            lat_deg: 0.0,
            alt_msl_m: ALT_UNSET_M,
            agl_m: ALT_UNSET_M,
            speed_kt: 0.0,
            offset_hdg_deg: 0.0,
            offset_dist_m: 0.0,
        }
    }
}

impl Waypoint {
    /// Absolute waypoint
    pub fn absolute(lon_deg: f64, lat_deg: f64, alt_msl_m: f64) -> Self {
        Self {
            lon_deg,
            lat_deg,
            alt_msl_m,
            ..Self::default()
        }
    }

    /// Relative waypoint, positioned later by `update_relative_pos`
    pub fn relative(offset_hdg_deg: f64, offset_dist_m: f64) -> Self {
        Self {
            mode: WaypointMode::Relative,
            offset_hdg_deg,
            offset_dist_m,
            ..Self::default()
        }
    }

    /// Parse `"<lon>,<lat>[@<alt_ft>]"`
    ///
    /// The altitude clause is in feet and stored in meters; without it the
    /// MSL altitude is left unset.
    pub fn parse(text: &str) -> Result<Self, RouteError> {
        let (position, altitude) = match text.split_once('@') {
            Some((pos, alt)) => (pos, Some(alt)),
            None => (text, None),
        };

        let (lon, lat) = position
            .split_once(',')
            .ok_or(RouteError::InvalidWaypoint("expected lon,lat"))?;
        let lon_deg = parse_number(lon, "bad longitude")?;
        let lat_deg = parse_number(lat, "bad latitude")?;

        let alt_msl_m = match altitude {
            Some(alt) => parse_number(alt, "bad altitude")? * FT_TO_M,
            None => ALT_UNSET_M,
        };

        Ok(Self::absolute(lon_deg, lat_deg, alt_msl_m))
    }

    /// Build from a `wpt` configuration section
    ///
    /// Recognized fields: `lon`, `lat`, `alt-ft`, `agl-ft`, `speed-kt`,
    /// `offset-heading-deg`, `offset-dist-m`, `mode`. Unknown fields are
    /// logged and ignored.
    pub fn from_section(section: &ConfigSection) -> Result<Self, ConfigError> {
        let mut wp = Self::default();

        for (key, value) in section.fields() {
            let invalid = || section.invalid_field(key);
            match key {
                "mode" => {
                    let mode = match value {
                        ParamValue::Int(flag) => WaypointMode::from_flag(*flag),
                        other => other.as_str().and_then(WaypointMode::from_name),
                    };
                    wp.mode = mode.ok_or_else(invalid)?;
                }
                "lon" => wp.lon_deg = value.as_f64().ok_or_else(invalid)?,
                "lat" => wp.lat_deg = value.as_f64().ok_or_else(invalid)?,
                "alt-ft" => wp.alt_msl_m = value.as_f64().ok_or_else(invalid)? * FT_TO_M,
                "agl-ft" => wp.agl_m = value.as_f64().ok_or_else(invalid)? * FT_TO_M,
                "speed-kt" => wp.speed_kt = value.as_f64().ok_or_else(invalid)? as f32,
                "offset-heading-deg" => wp.offset_hdg_deg = value.as_f64().ok_or_else(invalid)?,
                "offset-dist-m" => wp.offset_dist_m = value.as_f64().ok_or_else(invalid)?,
                other => crate::log_warn!("route: ignoring waypoint field {}", other),
            }
        }

        Ok(wp)
    }

    /// Course (degrees, 0-360) and distance (m) from the given position to this waypoint
    pub fn course_and_distance(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let (distance, course) =
            haversine_distance_bearing(lat_deg, lon_deg, self.lat_deg, self.lon_deg);
        (course, distance)
    }

    /// Resolve a relative waypoint against an anchor and reference course
    ///
    /// Absolute waypoints are left untouched.
    pub fn update_relative_pos(&mut self, anchor: &Waypoint, ref_heading_deg: f64) {
        if self.mode != WaypointMode::Relative {
            return;
        }
        let course = wrap_360(ref_heading_deg + self.offset_hdg_deg);
        let (lat, lon) =
            offset_position(anchor.lat_deg, anchor.lon_deg, course, self.offset_dist_m);
        self.lat_deg = lat;
        self.lon_deg = lon;
    }

    pub fn has_msl(&self) -> bool {
        self.alt_msl_m > 1.0
    }

    pub fn has_agl(&self) -> bool {
        self.agl_m > 1.0
    }
}

fn parse_number(text: &str, reason: &'static str) -> Result<f64, RouteError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| RouteError::InvalidWaypoint(reason))
}
