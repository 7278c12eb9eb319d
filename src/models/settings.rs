use serde::{Deserialize, Serialize};
use std::fmt;

/// How sections without questions show up in progress reports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptySectionPolicy {
    #[default]
    ZeroPercent,
    Exclude,
}

impl EmptySectionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmptySectionPolicy::ZeroPercent => "zero_percent",
            EmptySectionPolicy::Exclude => "exclude",
        }
    }
}

impl fmt::Display for EmptySectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for EmptySectionPolicy {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "zero_percent" => Ok(EmptySectionPolicy::ZeroPercent),
            "exclude" => Ok(EmptySectionPolicy::Exclude),
            other => Err(format!("unsupported empty section policy: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSettings {
    pub questions_per_panel: usize,
    pub streak_lookback_days: u32,
    pub empty_section_policy: EmptySectionPolicy,
    pub updated_at: String,
}
