//! Minimal wildfire dynamics used to generate episodes for rendering.

use crate::agent::{Action, Agent};
use crate::config::{ConfigError, SimConfig};
use crate::grid::{CellState, Grid, Position};
use crate::render::{render_frame, RenderError};
use crate::seed::{self, SeedError};
use crate::world::WildfireWorld;
use image::RgbImage;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Seed(#[from] SeedError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Counts of tree states after a step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FireStats {
    pub healthy: usize,
    pub on_fire: usize,
    pub burnt: usize,
}

pub struct WildfireSim {
    grid: Grid,
    agents: Vec<Agent>,
    world: WildfireWorld,
    config: SimConfig,
    rng: ChaCha12Rng,
    step_index: usize,
}

impl WildfireSim {
    /// Builds a simulation whose generator is drawn from the process-global one,
    /// so [`seed::set_seed`] must have been called.
    pub fn from_global_rng(config: SimConfig) -> Result<Self, SimError> {
        let rng = seed::with_global_rng(|global| ChaCha12Rng::from_rng(global))?;
        Self::try_new(config, rng)
    }

    /// Forest of healthy trees with `initial_fires` burning cells and
    /// `num_agents` agents, all placed at distinct random cells.
    pub fn try_new(config: SimConfig, mut rng: ChaCha12Rng) -> Result<Self, SimError> {
        config.validate()?;
        let world = WildfireWorld::from_config(&config)?;
        let (width, height) = (config.grid_width, config.grid_height);
        let cells = width * height;

        let mut grid = Grid::try_filled(width, height, CellState::Healthy)?;
        for idx in index::sample(&mut rng, cells, config.initial_fires) {
            if let Some(tree) = grid.get_mut(Position::new(idx % width, idx / width))? {
                tree.state = CellState::OnFire;
            }
        }
        let agents = index::sample(&mut rng, cells, config.num_agents)
            .into_iter()
            .enumerate()
            .map(|(i, idx)| Agent::with_default_color(i, Position::new(idx % width, idx / width)))
            .collect();

        Ok(Self {
            grid,
            agents,
            world,
            config,
            rng,
            step_index: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn world(&self) -> &WildfireWorld {
        &self.world
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn stats(&self) -> FireStats {
        FireStats {
            healthy: self.grid.count(CellState::Healthy),
            on_fire: self.grid.count(CellState::OnFire),
            burnt: self.grid.count(CellState::Burnt),
        }
    }

    pub fn is_done(&self) -> bool {
        self.step_index >= self.config.max_steps || self.grid.count(CellState::OnFire) == 0
    }

    /// Advances fire and agents by one step.
    pub fn step(&mut self) -> FireStats {
        self.spread_fire();
        self.move_agents();
        self.step_index += 1;
        self.stats()
    }

    fn spread_fire(&mut self) {
        let (width, height) = (self.grid.width(), self.grid.height());
        let burning: Vec<Position> = self
            .grid
            .iter()
            .filter(|(_, tree)| tree.map(|t| t.state) == Some(CellState::OnFire))
            .map(|(pos, _)| pos)
            .collect();

        let mut ignite = Vec::new();
        for &pos in &burning {
            for action in [Action::Left, Action::Right, Action::Up, Action::Down] {
                let Some(next) = action.apply(pos, width, height) else {
                    continue;
                };
                let healthy = matches!(
                    self.grid.get(next),
                    Ok(Some(tree)) if tree.state == CellState::Healthy
                );
                if healthy && self.rng.random_bool(self.config.spread_probability) {
                    ignite.push(next);
                }
            }
        }
        for pos in burning {
            if self.rng.random_bool(self.config.burnout_probability) {
                self.set_state(pos, CellState::Burnt);
            }
        }
        for pos in ignite {
            self.set_state(pos, CellState::OnFire);
        }
    }

    fn set_state(&mut self, pos: Position, state: CellState) {
        if let Ok(Some(tree)) = self.grid.get_mut(pos) {
            tree.state = state;
        }
    }

    fn move_agents(&mut self) {
        let (width, height) = (self.grid.width(), self.grid.height());
        for i in 0..self.agents.len() {
            let action = Action::ALL[self.rng.random_range(0..Action::ALL.len())];
            let Some(target) = action.apply(self.agents[i].pos, width, height) else {
                continue;
            };
            let occupied = self
                .agents
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && other.pos == target);
            if !occupied {
                self.agents[i].pos = target;
            }
        }
    }

    pub fn render(&self) -> Result<RgbImage, RenderError> {
        render_frame(&self.grid, &self.agents, &self.world)
    }

    /// Renders the initial state and every step until the episode ends.
    pub fn run_episode(&mut self) -> Result<Vec<RgbImage>, SimError> {
        let mut frames = vec![self.render()?];
        while !self.is_done() {
            self.step();
            frames.push(self.render()?);
        }
        let stats = self.stats();
        debug!(
            steps = self.step_index,
            frames = frames.len(),
            burnt = stats.burnt,
            "episode finished"
        );
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SimConfig {
        SimConfig {
            grid_width: 8,
            grid_height: 6,
            num_agents: 3,
            initial_fires: 2,
            max_steps: 30,
            tile_size: 8,
            ..SimConfig::default()
        }
    }

    #[test]
    fn setup_places_fires_and_agents_on_distinct_cells() {
        let sim = WildfireSim::try_new(config(), ChaCha12Rng::seed_from_u64(5)).unwrap();
        assert_eq!(sim.stats().on_fire, 2);
        assert_eq!(sim.stats().healthy, 46);
        let mut positions: Vec<_> = sim.agents().iter().map(|a| a.pos).collect();
        positions.sort();
        positions.dedup();
        assert_eq!(positions.len(), 3);
    }

    #[test]
    fn same_seed_gives_same_episode() {
        let mut a = WildfireSim::try_new(config(), ChaCha12Rng::seed_from_u64(11)).unwrap();
        let mut b = WildfireSim::try_new(config(), ChaCha12Rng::seed_from_u64(11)).unwrap();
        for _ in 0..20 {
            assert_eq!(a.step(), b.step());
            assert_eq!(a.agents(), b.agents());
        }
        assert_eq!(a.grid(), b.grid());
    }

    #[test]
    fn trees_never_recover() {
        let mut sim = WildfireSim::try_new(
            SimConfig {
                spread_probability: 0.6,
                burnout_probability: 0.3,
                ..config()
            },
            ChaCha12Rng::seed_from_u64(3),
        )
        .unwrap();
        let mut burnt = 0;
        while !sim.is_done() {
            let stats = sim.step();
            assert!(stats.burnt >= burnt);
            assert_eq!(stats.healthy + stats.on_fire + stats.burnt, 48);
            burnt = stats.burnt;
        }
    }

    #[test]
    fn agents_stay_on_grid_and_apart() {
        let mut sim = WildfireSim::try_new(
            SimConfig {
                num_agents: 10,
                ..config()
            },
            ChaCha12Rng::seed_from_u64(8),
        )
        .unwrap();
        for _ in 0..50 {
            sim.step();
            for (i, a) in sim.agents().iter().enumerate() {
                assert!(sim.grid().contains(a.pos));
                assert!(sim.agents()[i + 1..].iter().all(|b| b.pos != a.pos));
            }
        }
    }

    #[test]
    fn episode_has_initial_frame_plus_one_per_step() {
        let mut sim = WildfireSim::try_new(config(), ChaCha12Rng::seed_from_u64(2)).unwrap();
        let frames = sim.run_episode().unwrap();
        assert_eq!(frames.len(), sim.step_index() + 1);
        assert!(frames.iter().all(|f| f.dimensions() == (64, 48)));
    }

    #[test]
    fn zero_fires_ends_immediately() {
        let mut sim = WildfireSim::try_new(
            SimConfig {
                initial_fires: 0,
                ..config()
            },
            ChaCha12Rng::seed_from_u64(1),
        )
        .unwrap();
        assert!(sim.is_done());
        assert_eq!(sim.run_episode().unwrap().len(), 1);
    }
}
