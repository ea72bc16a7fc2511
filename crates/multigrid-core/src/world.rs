use crate::color::{ColorName, Palette};
use crate::config::{ConfigError, SimConfig, TILE_PIXELS};
use crate::grid::CellState;
use crate::render::RenderError;
use image::Rgb;
use std::collections::BTreeMap;

/// Table from cell state to display color.
///
/// Built from an arbitrary set of entries; [`StateColorMap::validate`] checks
/// that every [`CellState`] is covered, and lookups of unmapped states fail
/// rather than fall back to some default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateColorMap {
    entries: [Option<ColorName>; CellState::ALL.len()],
}

impl StateColorMap {
    pub fn from_entries(entries: &BTreeMap<CellState, ColorName>) -> Self {
        let mut table = [None; CellState::ALL.len()];
        for (&state, &color) in entries {
            table[state.index() as usize] = Some(color);
        }
        Self { entries: table }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match CellState::ALL
            .into_iter()
            .find(|s| self.entries[s.index() as usize].is_none())
        {
            Some(missing) => Err(ConfigError::UnmappedState(missing)),
            None => Ok(()),
        }
    }

    pub fn get(&self, state: CellState) -> Result<ColorName, RenderError> {
        self.entries[state.index() as usize].ok_or(RenderError::UnmappedState(state))
    }
}

/// Drawing parameters of a wildfire world: palette, state colors and tile size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WildfireWorld {
    palette: Palette,
    state_colors: StateColorMap,
    tile_size: u32,
}

impl Default for WildfireWorld {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            state_colors: StateColorMap::from_entries(&crate::config::default_state_colors()),
            tile_size: TILE_PIXELS,
        }
    }
}

impl WildfireWorld {
    pub fn new(
        palette: Palette,
        state_colors: StateColorMap,
        tile_size: u32,
    ) -> Result<Self, ConfigError> {
        if tile_size == 0 {
            return Err(ConfigError::InvalidTileSize);
        }
        state_colors.validate()?;
        Ok(Self {
            palette,
            state_colors,
            tile_size,
        })
    }

    pub fn from_config(config: &SimConfig) -> Result<Self, ConfigError> {
        Self::new(
            Palette::with_overrides(&config.palette),
            StateColorMap::from_entries(&config.state_colors),
            config.tile_size,
        )
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    #[inline]
    pub fn color(&self, name: ColorName) -> Rgb<u8> {
        self.palette.rgb(name)
    }

    /// RGB background for a cell in `state`.
    pub fn state_color(&self, state: CellState) -> Result<Rgb<u8>, RenderError> {
        Ok(self.color(self.state_colors.get(state)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_world_maps_every_state() {
        let world = WildfireWorld::default();
        assert_eq!(world.state_color(CellState::Healthy), Ok(Rgb([0, 255, 0])));
        assert_eq!(world.state_color(CellState::OnFire), Ok(Rgb([255, 165, 0])));
        assert_eq!(world.state_color(CellState::Burnt), Ok(Rgb([139, 69, 19])));
    }

    #[test]
    fn incomplete_state_map_is_a_config_error() {
        let partial = StateColorMap::from_entries(&BTreeMap::from([
            (CellState::Healthy, ColorName::Green),
            (CellState::Burnt, ColorName::Brown),
        ]));
        assert_eq!(
            partial.get(CellState::OnFire),
            Err(RenderError::UnmappedState(CellState::OnFire))
        );
        let err = WildfireWorld::new(Palette::default(), partial, TILE_PIXELS).unwrap_err();
        assert!(matches!(err, ConfigError::UnmappedState(CellState::OnFire)));
    }

    #[test]
    fn zero_tile_size_is_rejected() {
        let err = WildfireWorld::new(
            Palette::default(),
            StateColorMap::from_entries(&crate::config::default_state_colors()),
            0,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTileSize));
    }

    #[test]
    fn config_palette_overrides_reach_state_colors() {
        let mut config = SimConfig::default();
        config.palette.insert(ColorName::Orange, [200, 100, 0]);
        let world = WildfireWorld::from_config(&config).unwrap();
        assert_eq!(world.state_color(CellState::OnFire), Ok(Rgb([200, 100, 0])));
    }
}
