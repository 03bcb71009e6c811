//! Loading of tuning overrides from TOML files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use snow_day_core::Tuning;

/// Reads and validates the tuning stored at `path`.
pub(crate) fn load_tuning(path: &Path) -> Result<Tuning> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file at {}", path.display()))?;
    parse_tuning(&contents).with_context(|| format!("invalid tuning in {}", path.display()))
}

/// Parses tuning overrides; keys that are absent keep their default value.
pub(crate) fn parse_tuning(contents: &str) -> Result<Tuning> {
    let tuning: Tuning = toml::from_str(contents).context("failed to parse tuning toml contents")?;
    tuning.validate()?;
    Ok(tuning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snow_day_core::EngagementPolicy;

    #[test]
    fn bundled_tuning_matches_defaults() {
        let tuning = parse_tuning(include_str!("../../../demos/tuning.toml"))
            .expect("bundled tuning is valid");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let tuning = parse_tuning("move_delay = 4\nengagement = \"first_in_range\"\n")
            .expect("valid overrides");
        assert_eq!(tuning.move_delay, 4);
        assert_eq!(tuning.engagement, EngagementPolicy::FirstInRange);
        assert_eq!(tuning.reveal_radius, 3);
        assert_eq!(tuning.max_health, 100);
    }

    #[test]
    fn contradictory_overrides_are_rejected() {
        let error = parse_tuning("damage_min = 30\ndamage_max = 5\n").expect_err("inverted range");
        assert!(error.to_string().contains("damage_min (30) exceeds damage_max (5)"));
    }

    #[test]
    fn malformed_toml_is_rejected() {
        assert!(parse_tuning("move_delay = \"soon\"").is_err());
    }
}
