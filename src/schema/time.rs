use serde::{Deserialize, Serialize};

/// Named points of the solar day, reported by the host as time advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SunEvent {
    Sunrise,
    SunriseEnd,
    GoldenHourEnd,
    #[default]
    SolarNoon,
    GoldenHour,
    SunsetStart,
    Sunset,
    Dusk,
    NauticalDusk,
    Night,
    Nadir,
    NightEnd,
    NauticalDawn,
    Dawn,
}

impl SunEvent {
    pub const ALL: [SunEvent; 14] = [
        Self::Sunrise,
        Self::SunriseEnd,
        Self::GoldenHourEnd,
        Self::SolarNoon,
        Self::GoldenHour,
        Self::SunsetStart,
        Self::Sunset,
        Self::Dusk,
        Self::NauticalDusk,
        Self::Night,
        Self::Nadir,
        Self::NightEnd,
        Self::NauticalDawn,
        Self::Dawn,
    ];

    /// Dusk through nautical dawn counts as night.
    pub fn is_night(&self) -> bool {
        matches!(
            self,
            Self::Dusk
                | Self::NauticalDusk
                | Self::Night
                | Self::Nadir
                | Self::NightEnd
                | Self::NauticalDawn
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sunrise => "sunrise",
            Self::SunriseEnd => "sunriseEnd",
            Self::GoldenHourEnd => "goldenHourEnd",
            Self::SolarNoon => "solarNoon",
            Self::GoldenHour => "goldenHour",
            Self::SunsetStart => "sunsetStart",
            Self::Sunset => "sunset",
            Self::Dusk => "dusk",
            Self::NauticalDusk => "nauticalDusk",
            Self::Night => "night",
            Self::Nadir => "nadir",
            Self::NightEnd => "nightEnd",
            Self::NauticalDawn => "nauticalDawn",
            Self::Dawn => "dawn",
        }
    }

    /// Parse a host-side event name, case-insensitively.
    pub fn from_name(name: &str) -> Option<SunEvent> {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.name().eq_ignore_ascii_case(name))
    }
}
