use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use crate::db::repositories::settings_repository::{AppSettingRow, SettingsRepository};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::settings::{EmptySectionPolicy, TrackerSettings};
use crate::services::check_in_session::DEFAULT_QUESTIONS_PER_PANEL;
use crate::services::progress_service::DEFAULT_STREAK_LOOKBACK_DAYS;

const KEY_QUESTIONS_PER_PANEL: &str = "questions_per_panel";
const KEY_STREAK_LOOKBACK_DAYS: &str = "streak_lookback_days";
const KEY_EMPTY_SECTION_POLICY: &str = "empty_section_policy";

const QUESTIONS_PER_PANEL_RANGE: std::ops::RangeInclusive<usize> = 1..=10;
const STREAK_LOOKBACK_RANGE: std::ops::RangeInclusive<u32> = 1..=366;

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdateInput {
    pub questions_per_panel: Option<usize>,
    pub streak_lookback_days: Option<u32>,
    pub empty_section_policy: Option<String>,
}

pub struct SettingsService {
    db: DbPool,
    cache: RwLock<Option<TrackerSettings>>,
}

impl SettingsService {
    pub fn new(db: DbPool) -> AppResult<Self> {
        Ok(Self {
            db,
            cache: RwLock::new(None),
        })
    }

    pub fn get(&self) -> AppResult<TrackerSettings> {
        if let Ok(guard) = self.cache.read() {
            if let Some(settings) = guard.as_ref() {
                return Ok(settings.clone());
            }
        }

        let settings = self.load_settings_from_db()?;
        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(settings.clone());
        }
        Ok(settings)
    }

    pub fn update(&self, input: SettingsUpdateInput) -> AppResult<TrackerSettings> {
        let mut current = self.get()?;

        if let Some(per_panel) = input.questions_per_panel {
            if !QUESTIONS_PER_PANEL_RANGE.contains(&per_panel) {
                return Err(AppError::validation(format!(
                    "questions per panel must be between {} and {}",
                    QUESTIONS_PER_PANEL_RANGE.start(),
                    QUESTIONS_PER_PANEL_RANGE.end()
                )));
            }
            current.questions_per_panel = per_panel;
        }

        if let Some(lookback) = input.streak_lookback_days {
            if !STREAK_LOOKBACK_RANGE.contains(&lookback) {
                return Err(AppError::validation(format!(
                    "streak lookback must be between {} and {} days",
                    STREAK_LOOKBACK_RANGE.start(),
                    STREAK_LOOKBACK_RANGE.end()
                )));
            }
            current.streak_lookback_days = lookback;
        }

        let policy = match input.empty_section_policy.as_deref() {
            Some(raw) => {
                let normalized = raw.trim().to_lowercase();
                Some(EmptySectionPolicy::try_from(normalized.as_str()).map_err(AppError::validation)?)
            }
            None => None,
        };
        if let Some(policy) = policy {
            current.empty_section_policy = policy;
        }

        self.db.with_connection(|conn| {
            let tx = conn.unchecked_transaction()?;

            if let Some(value) = input.questions_per_panel {
                SettingsRepository::upsert(&tx, KEY_QUESTIONS_PER_PANEL, &value.to_string())?;
            }

            if let Some(value) = input.streak_lookback_days {
                SettingsRepository::upsert(&tx, KEY_STREAK_LOOKBACK_DAYS, &value.to_string())?;
            }

            if let Some(value) = policy {
                SettingsRepository::upsert(&tx, KEY_EMPTY_SECTION_POLICY, value.as_str())?;
            }

            tx.commit()?;
            Ok(())
        })?;

        current.updated_at = Utc::now().to_rfc3339();
        info!(
            target: "app::settings",
            questions_per_panel = current.questions_per_panel,
            streak_lookback_days = current.streak_lookback_days,
            empty_section_policy = %current.empty_section_policy,
            "tracker settings updated"
        );

        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(current.clone());
        }

        Ok(current)
    }

    fn load_settings_from_db(&self) -> AppResult<TrackerSettings> {
        self.db.with_connection(|conn| {
            let rows = SettingsRepository::list(conn)?;
            let mut map: HashMap<String, AppSettingRow> = HashMap::new();
            let mut latest_updated_at: Option<String> = None;

            for row in rows {
                latest_updated_at = match latest_updated_at {
                    Some(ref current) if current >= &row.updated_at => Some(current.clone()),
                    _ => Some(row.updated_at.clone()),
                };
                map.insert(row.key.clone(), row);
            }

            let questions_per_panel = read_setting(&map, KEY_QUESTIONS_PER_PANEL, |value| {
                value
                    .parse::<usize>()
                    .ok()
                    .filter(|parsed| QUESTIONS_PER_PANEL_RANGE.contains(parsed))
            })
            .unwrap_or(DEFAULT_QUESTIONS_PER_PANEL);

            let streak_lookback_days = read_setting(&map, KEY_STREAK_LOOKBACK_DAYS, |value| {
                value
                    .parse::<u32>()
                    .ok()
                    .filter(|parsed| STREAK_LOOKBACK_RANGE.contains(parsed))
            })
            .unwrap_or(DEFAULT_STREAK_LOOKBACK_DAYS);

            let empty_section_policy = read_setting(&map, KEY_EMPTY_SECTION_POLICY, |value| {
                EmptySectionPolicy::try_from(value).ok()
            })
            .unwrap_or_default();

            Ok(TrackerSettings {
                questions_per_panel,
                streak_lookback_days,
                empty_section_policy,
                updated_at: latest_updated_at.unwrap_or_else(|| Utc::now().to_rfc3339()),
            })
        })
    }
}

fn read_setting<T>(
    map: &HashMap<String, AppSettingRow>,
    key: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Option<T> {
    let row = map.get(key)?;
    let parsed = parse(row.value.as_str());
    if parsed.is_none() {
        warn!(
            target: "app::settings",
            %key,
            value = %row.value,
            "stored setting invalid, falling back to default"
        );
    }
    parsed
}
