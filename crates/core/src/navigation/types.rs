//! Navigation type definitions
//!
//! This module contains core types used by the navigation subsystem:
//! - `ImuSample` / `GpsSample`: Raw sensor samples latched for the current tick
//! - `GpsMeasurement`: GPS fix in the backend convention (radians, down-positive)
//! - `InitialState`: Cold-start seed for filters that need one
//! - `NavSolution`: Fused attitude/position/velocity estimate

use nalgebra::Vector3;

use super::geo::{heading_f32, M_TO_FT};

const DEG_TO_RAD: f64 = core::f64::consts::PI / 180.0;
const MPS_TO_FPS: f32 = 3.280_84;

/// Inertial sample
///
/// Body frame, SI units.
#[derive(Debug, Clone, Copy)]
pub struct ImuSample {
    /// Sample time (s)
    pub timestamp_s: f64,
    /// Angular rate (rad/s)
    pub gyro: Vector3<f32>,
    /// Specific force (m/s², includes gravity)
    pub accel: Vector3<f32>,
    /// Magnetic field (normalized or µT, backend-defined)
    pub mag: Vector3<f32>,
}

impl Default for ImuSample {
    fn default() -> Self {
        Self {
            timestamp_s: 0.0,
            gyro: Vector3::zeros(),
            accel: Vector3::zeros(),
            mag: Vector3::zeros(),
        }
    }
}

/// GPS fix as reported by the receiver
#[derive(Debug, Clone, Copy)]
pub struct GpsSample {
    /// Fix time (s)
    pub timestamp_s: f64,
    /// Latitude (degrees)
    pub lat_deg: f64,
    /// Longitude (degrees)
    pub lon_deg: f64,
    /// Altitude above mean sea level (m)
    pub alt_m: f64,
    /// Velocity north/east/down (m/s)
    pub vel_ned: Vector3<f32>,
}

impl Default for GpsSample {
    fn default() -> Self {
        Self {
            timestamp_s: 0.0,
            lat_deg: 0.0,
            lon_deg: 0.0,
            alt_m: 0.0,
            vel_ned: Vector3::zeros(),
        }
    }
}

impl GpsSample {
    /// Age of this fix relative to `now_s`
    pub fn age_s(&self, now_s: f64) -> f64 {
        now_s - self.timestamp_s
    }
}

/// GPS fix converted for the estimators
///
/// Angles in radians, vertical axis down-positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsMeasurement {
    pub timestamp_s: f64,
    pub lat_rad: f64,
    pub lon_rad: f64,
    pub down_m: f64,
    pub vel_ned: Vector3<f32>,
}

impl From<&GpsSample> for GpsMeasurement {
    fn from(gps: &GpsSample) -> Self {
        Self {
            timestamp_s: gps.timestamp_s,
            lat_rad: gps.lat_deg * DEG_TO_RAD,
            lon_rad: gps.lon_deg * DEG_TO_RAD,
            down_m: -gps.alt_m,
            vel_ned: gps.vel_ned,
        }
    }
}

/// Cold-start seed handed to a filter exactly once per session
///
/// Only position is seeded; velocity starts at rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialState {
    pub lat_rad: f64,
    pub lon_rad: f64,
    pub down_m: f64,
    pub vel_ned: Vector3<f32>,
}

impl From<&GpsSample> for InitialState {
    fn from(gps: &GpsSample) -> Self {
        let meas = GpsMeasurement::from(gps);
        Self {
            lat_rad: meas.lat_rad,
            lon_rad: meas.lon_rad,
            down_m: meas.down_m,
            vel_ned: Vector3::zeros(),
        }
    }
}

/// Fused navigation estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavSolution {
    /// Roll (degrees)
    pub roll_deg: f32,
    /// Pitch (degrees)
    pub pitch_deg: f32,
    /// True heading (degrees, 0-360)
    pub heading_deg: f32,
    /// Latitude (degrees)
    pub lat_deg: f64,
    /// Longitude (degrees)
    pub lon_deg: f64,
    /// Altitude above mean sea level (m)
    pub alt_m: f64,
    /// Velocity north/east/down (m/s)
    pub vel_ned: Vector3<f32>,
    /// Filter reports a converged solution
    pub healthy: bool,
}

impl Default for NavSolution {
    fn default() -> Self {
        Self {
            roll_deg: 0.0,
            pitch_deg: 0.0,
            heading_deg: 0.0,
            lat_deg: 0.0,
            lon_deg: 0.0,
            alt_m: 0.0,
            vel_ned: Vector3::zeros(),
            healthy: false,
        }
    }
}

impl NavSolution {
    /// Altitude above mean sea level (ft)
    pub fn alt_ft(&self) -> f64 {
        self.alt_m * M_TO_FT
    }

    /// Course over ground (degrees, 0-360)
    pub fn groundtrack_deg(&self) -> f32 {
        let deg = libm::atan2f(self.vel_ned.y, self.vel_ned.x).to_degrees();
        heading_f32(deg as f64)
    }

    /// Horizontal speed (m/s)
    pub fn groundspeed_mps(&self) -> f32 {
        libm::sqrtf(self.vel_ned.x * self.vel_ned.x + self.vel_ned.y * self.vel_ned.y)
    }

    /// Climb rate (ft/s, up-positive)
    pub fn vertical_speed_fps(&self) -> f32 {
        -self.vel_ned.z * MPS_TO_FPS
    }
}
