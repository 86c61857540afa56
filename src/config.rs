use serde::{Deserialize, Serialize};

use crate::{AvailabilityCalendar, CalendarDay, Constraints, DayRange, SelectionMode};

/// Serializable description of one calendar instance.
///
/// Everything except `today` comes from the host; `today` is supplied when
/// the calendar is built so that it stays injectable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalendarConfig {
    pub mode:            SelectionMode,
    /// Select a year of availability when a range calendar starts empty
    pub auto_select:     bool,
    pub ignore_disabled: bool,
    /// Longest committed run in days; `0` or absent means uncapped
    pub max_run_length:  Option<u32>,
    pub lower_bound:     Option<CalendarDay>,
    pub upper_bound:     Option<CalendarDay>,
    pub disabled_days:   Vec<CalendarDay>,
    /// Blocked runs written as `start/end`, both ends disabled
    pub disabled_ranges: Vec<DayRange>,
    pub seed_dates:      Vec<CalendarDay>,
}

/// Error type for loading a calendar configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid calendar configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid exception window: lower bound ({lower}) is after upper bound ({upper})")]
    InvertedWindow { lower: CalendarDay, upper: CalendarDay },
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            mode:            SelectionMode::Range,
            auto_select:     true,
            ignore_disabled: false,
            max_run_length:  None,
            lower_bound:     None,
            upper_bound:     None,
            disabled_days:   Vec::new(),
            disabled_ranges: Vec::new(),
            seed_dates:      Vec::new(),
        }
    }
}

impl CalendarConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    /// Returns `ConfigError::Json` for malformed JSON or invalid days and
    /// `ConfigError::InvertedWindow` when the lower bound is after the upper bound.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns `ConfigError::InvertedWindow` when the lower bound is after the upper bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (self.lower_bound, self.upper_bound) {
            (Some(lower), Some(upper)) if lower > upper => Err(ConfigError::InvertedWindow { lower, upper }),
            _ => Ok(()),
        }
    }

    /// The constraints this configuration describes, as of `today`
    pub fn constraints(&self, today: CalendarDay) -> Constraints {
        Constraints::new(today, self.mode)
            .with_disabled_days(
                self.disabled_days
                    .iter()
                    .copied()
                    .chain(self.disabled_ranges.iter().flat_map(DayRange::iter)),
            )
            .with_bounds(self.lower_bound, self.upper_bound)
            .with_max_run_length(self.max_run_length.unwrap_or_default())
            .with_ignore_disabled(self.ignore_disabled)
    }

    /// Builds the calendar, seeding it from `seed_dates`.
    pub fn into_calendar(self, today: CalendarDay) -> AvailabilityCalendar {
        let constraints = self.constraints(today);
        AvailabilityCalendar::new(constraints, self.seed_dates, self.auto_select)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::day;

    #[test]
    fn test_defaults() {
        let config = CalendarConfig::from_json("{}").unwrap();
        assert_eq!(config, CalendarConfig::default());
        assert_eq!(config.mode, SelectionMode::Range);
        assert!(config.auto_select);
    }

    #[test]
    fn test_full_config() {
        let json = r#"{
            "mode": "exception",
            "auto_select": false,
            "ignore_disabled": true,
            "max_run_length": 80,
            "lower_bound": "2024-03-01",
            "upper_bound": "2024-06-30",
            "disabled_days": ["2024-03-12", "2024-03-13"],
            "seed_dates": ["2024-03-20"]
        }"#;
        let config = CalendarConfig::from_json(json).unwrap();

        let c = config.constraints(day(2024, 3, 1));
        assert_eq!(c.mode, SelectionMode::Exception);
        assert!(c.ignore_disabled);
        assert_eq!(c.max_run_length.map(std::num::NonZeroU32::get), Some(80));
        assert_eq!(c.lower_bound, Some(day(2024, 3, 1)));
        assert_eq!(c.upper_bound, Some(day(2024, 6, 30)));
        assert_eq!(c.disabled_days.len(), 2);

        let calendar = config.into_calendar(day(2024, 3, 1));
        assert_eq!(calendar.selected_dates().to_vec(), vec![day(2024, 3, 20)]);
    }

    #[test]
    fn test_invalid_day_rejected() {
        let err = CalendarConfig::from_json(r#"{"disabled_days": ["2024-02-30"]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_disabled_ranges_expand_to_days() {
        let json = r#"{
            "mode": "exception",
            "disabled_days": ["2024-03-20"],
            "disabled_ranges": ["2024-03-12/2024-03-14", "2024-03-14/2024-03-15"]
        }"#;
        let config = CalendarConfig::from_json(json).unwrap();
        let c = config.constraints(day(2024, 3, 1));

        assert_eq!(c.disabled_days.len(), 5);
        for d in [12, 13, 14, 15, 20] {
            assert!(c.is_disabled_day(&day(2024, 3, d)), "2024-03-{d:02} disabled");
        }
        assert!(!c.is_disabled_day(&day(2024, 3, 16)));
    }

    #[test]
    fn test_invalid_disabled_range_rejected() {
        for json in [
            r#"{"disabled_ranges": ["2024-03-14/2024-03-12"]}"#,
            r#"{"disabled_ranges": ["2024-03-14"]}"#,
        ] {
            let err = CalendarConfig::from_json(json).unwrap_err();
            assert!(matches!(err, ConfigError::Json(_)), "{json}");
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(CalendarConfig::from_json(r#"{"today": "2024-03-01"}"#).is_err());
    }

    #[test]
    fn test_inverted_window_rejected() {
        let err = CalendarConfig::from_json(r#"{"lower_bound": "2024-06-01", "upper_bound": "2024-03-01"}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvertedWindow { .. }));
        assert!(err.to_string().contains("2024-06-01"));
    }

    #[test]
    fn test_auto_select_from_config() {
        let calendar = CalendarConfig::default().into_calendar(day(2024, 1, 1));
        assert_eq!(calendar.selected_dates().len(), 366);
    }
}
