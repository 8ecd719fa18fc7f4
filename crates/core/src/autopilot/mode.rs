//! Flight-control-system modes
//!
//! The commanded mode selects which control loops own which axes. Names
//! match the ones operators type at the ground station.

/// Flight-control-system mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FcsMode {
    /// No automatic control
    #[default]
    Off,
    /// Roll, pitch and throttle stabilization
    Basic,
    /// Basic plus altitude hold and coordinated turns
    BasicAlt,
    /// Basic plus altitude plus route following
    BasicAltNav,
    /// Control-augmented stick: roll and pitch attitude hold
    Cas,
}

impl FcsMode {
    /// Ground-station name of the mode
    pub fn name(&self) -> &'static str {
        match self {
            FcsMode::Off => "off",
            FcsMode::Basic => "basic",
            FcsMode::BasicAlt => "basic+alt",
            FcsMode::BasicAltNav => "basic+alt+nav",
            FcsMode::Cas => "cas",
        }
    }

    /// Any mode other than off
    pub fn is_engaged(&self) -> bool {
        *self != FcsMode::Off
    }
}
