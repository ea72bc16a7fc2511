use image::Rgb;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Grey used for the grid lines drawn along the left and top edge of every tile.
pub const GRID_LINE_COLOR: Rgb<u8> = Rgb([100, 100, 100]);

/// Named colors agents and cell states refer to. Resolved to RGB via [`Palette`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorName {
    Red,
    Green,
    Blue,
    Purple,
    Yellow,
    Grey,
    Orange,
    Brown,
    Black,
}

impl ColorName {
    pub const ALL: [ColorName; 9] = [
        ColorName::Red,
        ColorName::Green,
        ColorName::Blue,
        ColorName::Purple,
        ColorName::Yellow,
        ColorName::Grey,
        ColorName::Orange,
        ColorName::Brown,
        ColorName::Black,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColorName::Red => "red",
            ColorName::Green => "green",
            ColorName::Blue => "blue",
            ColorName::Purple => "purple",
            ColorName::Yellow => "yellow",
            ColorName::Grey => "grey",
            ColorName::Orange => "orange",
            ColorName::Brown => "brown",
            ColorName::Black => "black",
        }
    }

    fn default_rgb(self) -> Rgb<u8> {
        match self {
            ColorName::Red => Rgb([255, 0, 0]),
            ColorName::Green => Rgb([0, 255, 0]),
            ColorName::Blue => Rgb([0, 0, 255]),
            ColorName::Purple => Rgb([112, 39, 195]),
            ColorName::Yellow => Rgb([255, 255, 0]),
            ColorName::Grey => Rgb([100, 100, 100]),
            ColorName::Orange => Rgb([255, 165, 0]),
            ColorName::Brown => Rgb([139, 69, 19]),
            ColorName::Black => Rgb([0, 0, 0]),
        }
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown color name `{0}`")]
pub struct UnknownColor(pub String);

impl FromStr for ColorName {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorName::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownColor(s.to_owned()))
    }
}

/// Total mapping from [`ColorName`] to RGB.
///
/// Every name always resolves; overrides replace individual entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: [Rgb<u8>; ColorName::ALL.len()],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: ColorName::ALL.map(ColorName::default_rgb),
        }
    }
}

impl Palette {
    /// Default palette with the given entries replaced.
    pub fn with_overrides(overrides: &BTreeMap<ColorName, [u8; 3]>) -> Self {
        let mut palette = Self::default();
        for (&name, &rgb) in overrides {
            palette.set(name, Rgb(rgb));
        }
        palette
    }

    #[inline]
    pub fn rgb(&self, name: ColorName) -> Rgb<u8> {
        self.colors[name as usize]
    }

    pub fn set(&mut self, name: ColorName, rgb: Rgb<u8>) {
        self.colors[name as usize] = rgb;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_round_trips_through_its_string_form() {
        for name in ColorName::ALL {
            assert_eq!(name.as_str().parse::<ColorName>(), Ok(name));
        }
        assert!("magenta".parse::<ColorName>().is_err());
    }

    #[test]
    fn default_palette_matches_reference_colors() {
        let palette = Palette::default();
        assert_eq!(palette.rgb(ColorName::Red), Rgb([255, 0, 0]));
        assert_eq!(palette.rgb(ColorName::Purple), Rgb([112, 39, 195]));
        assert_eq!(palette.rgb(ColorName::Orange), Rgb([255, 165, 0]));
        assert_eq!(palette.rgb(ColorName::Grey), GRID_LINE_COLOR);
    }

    #[test]
    fn overrides_replace_only_named_entries() {
        let overrides = BTreeMap::from([(ColorName::Orange, [250, 128, 0])]);
        let palette = Palette::with_overrides(&overrides);
        assert_eq!(palette.rgb(ColorName::Orange), Rgb([250, 128, 0]));
        assert_eq!(palette.rgb(ColorName::Green), Rgb([0, 255, 0]));
    }

    #[test]
    fn serde_uses_snake_case_names() {
        let json = serde_json::to_string(&ColorName::Brown).unwrap();
        assert_eq!(json, "\"brown\"");
        assert!(serde_json::from_str::<ColorName>("\"light_blue\"").is_err());
    }
}
