use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::profile::{Pathway, Profile, ProfileFormOptions, ProfileInput};
use crate::storage::LocalStorage;

pub const PROFILE_KEY: &str = "pridally_profile";

const PRYD_PRONOUNS: [&str; 6] = [
    "she/her",
    "he/him",
    "they/them",
    "ze/zir",
    "xe/xem",
    "other/ask me",
];
const ALLY_PRONOUNS: [&str; 2] = ["Male", "Female"];
const AGE_RANGES: [&str; 7] = ["13-17", "18-24", "25-34", "35-44", "45-54", "55-64", "65+"];

/// Onboarding profile, kept in local storage next to the daily entries.
pub struct ProfileService {
    storage: Arc<dyn LocalStorage>,
}

impl ProfileService {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self { storage }
    }

    pub fn form_options(pathway: Pathway) -> ProfileFormOptions {
        ProfileFormOptions {
            pathway,
            pronouns: pronoun_options(pathway)
                .iter()
                .map(|value| value.to_string())
                .collect(),
            age_ranges: AGE_RANGES.iter().map(|value| value.to_string()).collect(),
        }
    }

    pub fn save(&self, input: ProfileInput) -> AppResult<Profile> {
        let profile = validate(input)?;
        let payload = serde_json::to_string(&profile)?;
        self.storage.set_item(PROFILE_KEY, &payload)?;

        info!(target: "app::profile", pathway = %profile.pathway, "profile saved");
        Ok(profile)
    }

    pub fn load(&self) -> Option<Profile> {
        let raw = match self.storage.get_item(PROFILE_KEY) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(target: "app::profile", error = %err, "profile unreadable");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(err) => {
                warn!(target: "app::profile", error = %err, "stored profile corrupt");
                None
            }
        }
    }
}

fn pronoun_options(pathway: Pathway) -> &'static [&'static str] {
    match pathway {
        Pathway::Pryd => &PRYD_PRONOUNS,
        Pathway::Ally => &ALLY_PRONOUNS,
    }
}

fn validate(input: ProfileInput) -> AppResult<Profile> {
    let preferred_name = input.preferred_name.trim().to_string();
    let pronouns = input.pronouns.trim().to_string();
    let age_range = input.age_range.trim().to_string();

    let missing: Vec<&str> = [
        ("preferredName", preferred_name.is_empty()),
        ("pronouns", pronouns.is_empty()),
        ("ageRange", age_range.is_empty()),
    ]
    .into_iter()
    .filter(|(_, empty)| *empty)
    .map(|(field, _)| field)
    .collect();

    if !missing.is_empty() {
        return Err(AppError::validation_with_details(
            "please complete all fields",
            json!({ "missingFields": missing }),
        ));
    }

    if !pronoun_options(input.pathway).contains(&pronouns.as_str()) {
        return Err(AppError::validation_with_details(
            format!("{pronouns} is not an option for the {} pathway", input.pathway),
            json!({ "field": "pronouns" }),
        ));
    }

    if !AGE_RANGES.contains(&age_range.as_str()) {
        return Err(AppError::validation_with_details(
            format!("{age_range} is not a supported age range"),
            json!({ "field": "ageRange" }),
        ));
    }

    Ok(Profile {
        preferred_name,
        pronouns,
        age_range,
        pathway: input.pathway,
    })
}
