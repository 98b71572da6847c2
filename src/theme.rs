//! Theme descriptors and selection policy.
//!
//! Themes here are data only: palette values, style tags, and asset
//! paths consumed by an embedding presentation layer. No rendering or
//! audio playback happens in this crate.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Visual treatment applied to grid cells by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GridStyle {
    /// Soft glow around cells.
    Glow,
    /// Rolling wave shimmer.
    Wave,
    /// Ember flicker.
    Fire,
    /// Drifting mist.
    Mist,
    /// Fractal shimmer.
    Fractal,
}

/// Ambient background animation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BackgroundAnimation {
    /// No background animation.
    None,
    /// Drifting starfield.
    Starfield,
    /// Rising embers.
    Embers,
    /// Water ripples.
    WaterRipples,
    /// Slow light beams.
    LightBeams,
}

/// A presentation theme: palette, grid style, and soundscape reference.
///
/// Colors are packed ARGB (`0xAARRGGBB`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Theme {
    id: String,
    name: String,
    description: String,
    primary_color: u32,
    secondary_color: u32,
    background_color: u32,
    grid_style: GridStyle,
    soundscape_path: String,
    premium: bool,
    background_animation: BackgroundAnimation,
}

/// The built-in theme catalog.
pub fn default_themes() -> Vec<Theme> {
    vec![
        Theme {
            id: "starlight_realm".to_string(),
            name: "Starlight Realm".to_string(),
            description: "A celestial journey through the cosmos".to_string(),
            primary_color: 0xFF1A_237E,
            secondary_color: 0xFF7C_4DFF,
            background_color: 0xFF00_0033,
            grid_style: GridStyle::Glow,
            soundscape_path: "audio/themes/starlight_ambience.mp3".to_string(),
            premium: false,
            background_animation: BackgroundAnimation::Starfield,
        },
        Theme {
            id: "ashwood".to_string(),
            name: "Ashwood".to_string(),
            description: "Ancient forest wrapped in mystic embers".to_string(),
            primary_color: 0xFF4E_342E,
            secondary_color: 0xFFFF_5722,
            background_color: 0xFF1B_0000,
            grid_style: GridStyle::Fire,
            soundscape_path: "audio/themes/forest_fire.mp3".to_string(),
            premium: true,
            background_animation: BackgroundAnimation::Embers,
        },
        Theme {
            id: "tideglass".to_string(),
            name: "Tideglass".to_string(),
            description: "Depths of the ocean's mysteries".to_string(),
            primary_color: 0xFF00_6064,
            secondary_color: 0xFF00_BCD4,
            background_color: 0xFF00_2633,
            grid_style: GridStyle::Wave,
            soundscape_path: "audio/themes/ocean_waves.mp3".to_string(),
            premium: true,
            background_animation: BackgroundAnimation::WaterRipples,
        },
        Theme {
            id: "everdawn".to_string(),
            name: "Everdawn".to_string(),
            description: "First light through ancient stones".to_string(),
            primary_color: 0xFF33_691E,
            secondary_color: 0xFF8B_C34A,
            background_color: 0xFF1A_2F00,
            grid_style: GridStyle::Mist,
            soundscape_path: "audio/themes/morning_forest.mp3".to_string(),
            premium: true,
            background_animation: BackgroundAnimation::LightBeams,
        },
    ]
}

/// Selects the theme a session should start with.
///
/// Policy: the theme with `preferred_id` if it is present in `available`,
/// else the first available theme. Returns `None` only when `available`
/// is empty.
pub fn resolve_theme(preferred_id: &str, available: &[Theme]) -> Option<Theme> {
    available
        .iter()
        .find(|theme| theme.id().as_str() == preferred_id)
        .or_else(|| {
            debug!(preferred_id, "preferred theme unavailable, falling back to first");
            available.first()
        })
        .cloned()
}

/// Filters the catalog to themes the player may use: free themes plus
/// premium themes whose ids appear in `unlocked`.
pub fn available_themes(catalog: &[Theme], unlocked: &BTreeSet<String>) -> Vec<Theme> {
    catalog
        .iter()
        .filter(|theme| !theme.premium() || unlocked.contains(theme.id()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_matching_id() {
        let themes = default_themes();
        let resolved = resolve_theme("everdawn", &themes).unwrap();
        assert_eq!(resolved.id(), "everdawn");
    }

    #[test]
    fn test_resolve_falls_back_to_first() {
        let themes = default_themes();
        let resolved = resolve_theme("missing", &themes).unwrap();
        assert_eq!(resolved.id(), "starlight_realm");
    }

    #[test]
    fn test_resolve_empty_catalog() {
        assert_eq!(resolve_theme("anything", &[]), None);
    }

    #[test]
    fn test_premium_themes_require_unlock() {
        let catalog = default_themes();

        let locked = available_themes(&catalog, &BTreeSet::new());
        let ids: Vec<&str> = locked.iter().map(|theme| theme.id().as_str()).collect();
        assert_eq!(ids, ["starlight_realm"]);

        let unlocked: BTreeSet<String> = ["ashwood".to_string()].into();
        let with_unlock = available_themes(&catalog, &unlocked);
        assert!(with_unlock.iter().any(|theme| theme.id().as_str() == "ashwood"));
        assert!(!with_unlock.iter().any(|theme| theme.id().as_str() == "tideglass"));
    }
}
