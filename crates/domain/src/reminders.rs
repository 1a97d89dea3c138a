use serde::{Deserialize, Serialize};

/// Daily reminder presets consumed by the external notification
/// scheduler. The core only owns the preset-to-clock-time mapping.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReminderPreset {
    Off,
    Morning,
    Noon,
    Evening,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReminderTime {
    pub hour: u8,
    pub minute: u8,
}

impl ReminderPreset {
    pub fn time(self) -> Option<ReminderTime> {
        match self {
            ReminderPreset::Off => None,
            ReminderPreset::Morning => Some(ReminderTime { hour: 8, minute: 0 }),
            ReminderPreset::Noon => Some(ReminderTime {
                hour: 12,
                minute: 0,
            }),
            ReminderPreset::Evening => Some(ReminderTime {
                hour: 18,
                minute: 0,
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReminderPreset::Off => "off",
            ReminderPreset::Morning => "morning",
            ReminderPreset::Noon => "noon",
            ReminderPreset::Evening => "evening",
        }
    }
}

impl std::str::FromStr for ReminderPreset {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "off" => Ok(ReminderPreset::Off),
            "morning" => Ok(ReminderPreset::Morning),
            "noon" => Ok(ReminderPreset::Noon),
            "evening" => Ok(ReminderPreset::Evening),
            other => Err(format!("unknown reminder preset: {other}")),
        }
    }
}
