//! Control lock assignment
//!
//! A lock binds one control axis to the loop that drives it. Engaging a
//! mode writes a complete row of this table; disengaging clears every axis.
//!
//! | Mode          | heading | roll    | yaw        | altitude | speed    | pitch    | pointing |
//! |---------------|---------|---------|------------|----------|----------|----------|----------|
//! | basic         | -       | aileron | -          | -        | throttle | elevator | on       |
//! | basic+alt     | -       | aileron | turn-coord | pitch    | throttle | elevator | on       |
//! | basic+alt+nav | route   | aileron | turn-coord | pitch    | throttle | elevator | on       |
//! | cas           | -       | aileron | -          | -        | -        | elevator | on       |

use nalgebra::Vector3;

use super::mode::FcsMode;

/// Loop bound to an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockLoop {
    Aileron,
    Route,
    TurnCoord,
    Pitch,
    Throttle,
    Elevator,
    On,
}

impl LockLoop {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockLoop::Aileron => "aileron",
            LockLoop::Route => "route",
            LockLoop::TurnCoord => "turn-coord",
            LockLoop::Pitch => "pitch",
            LockLoop::Throttle => "throttle",
            LockLoop::Elevator => "elevator",
            LockLoop::On => "on",
        }
    }
}

/// Loop assignment for every control axis; `None` means unassigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LockAssignment {
    pub heading: Option<LockLoop>,
    pub roll: Option<LockLoop>,
    pub yaw: Option<LockLoop>,
    pub altitude: Option<LockLoop>,
    pub speed: Option<LockLoop>,
    pub pitch: Option<LockLoop>,
    pub pointing: Option<LockLoop>,
}

impl LockAssignment {
    /// All axes unassigned
    pub const UNASSIGNED: Self = Self {
        heading: None,
        roll: None,
        yaw: None,
        altitude: None,
        speed: None,
        pitch: None,
        pointing: None,
    };

    /// Table row for `mode`
    pub fn for_mode(mode: FcsMode) -> Self {
        use LockLoop::*;

        match mode {
            FcsMode::Off => Self::UNASSIGNED,
            FcsMode::Basic => Self {
                heading: None,
                roll: Some(Aileron),
                yaw: None,
                altitude: None,
                speed: Some(Throttle),
                pitch: Some(Elevator),
                pointing: Some(On),
            },
            FcsMode::BasicAlt => Self {
                heading: None,
                roll: Some(Aileron),
                yaw: Some(TurnCoord),
                altitude: Some(Pitch),
                speed: Some(Throttle),
                pitch: Some(Elevator),
                pointing: Some(On),
            },
            FcsMode::BasicAltNav => Self {
                heading: Some(Route),
                roll: Some(Aileron),
                yaw: Some(TurnCoord),
                altitude: Some(Pitch),
                speed: Some(Throttle),
                pitch: Some(Elevator),
                pointing: Some(On),
            },
            FcsMode::Cas => Self {
                heading: None,
                roll: Some(Aileron),
                yaw: None,
                altitude: None,
                speed: None,
                pitch: Some(Elevator),
                pointing: Some(On),
            },
        }
    }

    pub fn is_unassigned(&self) -> bool {
        *self == Self::UNASSIGNED
    }
}

/// Where the payload pointing loop looks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LookAtMode {
    #[default]
    Idle,
    /// Follow a fixed NED direction vector
    NedVector,
}

/// Pointing loop command
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointingCommand {
    pub lookat_mode: LookAtMode,
    pub ned_vector: Vector3<f32>,
}

impl PointingCommand {
    /// Look straight down
    pub fn nadir() -> Self {
        Self {
            lookat_mode: LookAtMode::NedVector,
            ned_vector: Vector3::new(0.0, 0.0, 1.0),
        }
    }
}

impl Default for PointingCommand {
    fn default() -> Self {
        Self {
            lookat_mode: LookAtMode::Idle,
            ned_vector: Vector3::zeros(),
        }
    }
}
