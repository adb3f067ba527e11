use serde::{Deserialize, Serialize};

use crate::{
    APP_NAME,
    error::TrResult,
    race::filter::{RaceFilters, RangePreset},
    race::playback::PlaybackSpeed,
};

const PREFS_NAME: &str = "prefs";

/// Viewer state carried across sessions.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Prefs {
    pub filters: RaceFilters,
    pub range_preset: RangePreset,
    pub speed: PlaybackSpeed,
}

pub fn load() -> TrResult<Prefs> {
    Ok(confy::load::<Prefs>(APP_NAME, Some(PREFS_NAME))?)
}

pub fn store(prefs: &Prefs) -> TrResult<()> {
    Ok(confy::store(APP_NAME, Some(PREFS_NAME), prefs)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::race::filter::TeamFilter;

    #[test]
    fn test_prefs_defaults() {
        let prefs = Prefs::default();

        assert_eq!(prefs.filters.team, TeamFilter::All);
        assert!(prefs.filters.selected_sectors.is_empty());
        assert_eq!(prefs.range_preset, RangePreset::All);
        assert_eq!(prefs.speed, PlaybackSpeed::X0_5);
    }

    #[test]
    fn test_prefs_parse_partial() {
        let prefs: Prefs = serde_json::from_str(r#"{ "speed": "1x" }"#).unwrap();

        assert_eq!(prefs.speed, PlaybackSpeed::X1);
        assert_eq!(prefs.filters, RaceFilters::default());
    }
}
