use serde::{Deserialize, Serialize};
use std::fmt;

/// Onboarding pathway chosen on the sign-in screen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Pathway {
    #[default]
    Pryd,
    Ally,
}

impl Pathway {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pathway::Pryd => "pryd",
            Pathway::Ally => "ally",
        }
    }
}

impl fmt::Display for Pathway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Pathway {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pryd" => Ok(Pathway::Pryd),
            "ally" => Ok(Pathway::Ally),
            other => Err(format!("unsupported pathway: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    #[serde(default)]
    pub preferred_name: String,
    #[serde(default)]
    pub pronouns: String,
    #[serde(default)]
    pub age_range: String,
    #[serde(default)]
    pub pathway: Pathway,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub preferred_name: String,
    pub pronouns: String,
    pub age_range: String,
    pub pathway: Pathway,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFormOptions {
    pub pathway: Pathway,
    pub pronouns: Vec<String>,
    pub age_ranges: Vec<String>,
}
