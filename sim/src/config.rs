use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// How many pairs one pairing scan may produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairingPolicy {
    /// One pair per tick: the last animal in scan order that found a partner
    LastWins,
    /// Every partner found during the scan
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub board_width: usize,
    pub board_height: usize,
    /// Health for species that do not bring their own
    pub starting_health: f64,
    pub max_health: f64,
    /// Health lost per tick of walking, hunting or idling
    pub health_decay: f64,
    /// Damage a predator deals per attack
    pub bite: f64,
    /// Health a predator regains per attack
    pub heal: f64,
    /// Cells on each axis within which paired animals count as together
    pub pairing_distance: u32,
    /// Ticks a pair must stay together before producing offspring
    pub reproduction_threshold: u32,
    /// New animals are only added while occupied cells < capacity * ratio
    pub add_guard_ratio: f64,
    /// Charge the per-tick decay on turns spent fleeing as well
    pub flee_upkeep: bool,
    pub pairing_policy: PairingPolicy,
    /// Animals placed at start-up, keyed by species trigger
    pub initial_population: BTreeMap<char, usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            board_width: 15,
            board_height: 10,
            starting_health: 100.0,
            max_health: 100.0,
            health_decay: 0.5,
            bite: 10.0,
            heal: 10.0,
            pairing_distance: 1,
            reproduction_threshold: 2,
            add_guard_ratio: 0.5,
            flee_upkeep: false,
            pairing_policy: PairingPolicy::LastWins,
            initial_population: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("board must be at least 1x1, got {width}x{height}")]
    EmptyBoard { width: usize, height: usize },

    #[error("max health must be positive, got {0}")]
    MaxHealth(f64),

    #[error("starting health must be in (0, {max}], got {value}")]
    StartingHealth { value: f64, max: f64 },

    #[error("{name} must be a non-negative number, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("add guard ratio must be in (0, 1], got {0}")]
    GuardRatio(f64),

    #[error("reproduction threshold must be at least 1")]
    ReproductionThreshold,
}

impl SimConfig {
    pub fn with_board(width: usize, height: usize) -> Self {
        Self {
            board_width: width,
            board_height: height,
            ..Default::default()
        }
    }

    pub fn capacity(&self) -> usize {
        self.board_width * self.board_height
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_width == 0 || self.board_height == 0 {
            return Err(ConfigError::EmptyBoard {
                width: self.board_width,
                height: self.board_height,
            });
        }
        if !(self.max_health > 0.0) {
            return Err(ConfigError::MaxHealth(self.max_health));
        }
        if !(self.starting_health > 0.0 && self.starting_health <= self.max_health) {
            return Err(ConfigError::StartingHealth {
                value: self.starting_health,
                max: self.max_health,
            });
        }
        for (name, value) in [
            ("health decay", self.health_decay),
            ("bite", self.bite),
            ("heal", self.heal),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { name, value });
            }
        }
        if !(self.add_guard_ratio > 0.0 && self.add_guard_ratio <= 1.0) {
            return Err(ConfigError::GuardRatio(self.add_guard_ratio));
        }
        if self.reproduction_threshold == 0 {
            return Err(ConfigError::ReproductionThreshold);
        }
        Ok(())
    }

    /// Health a newly placed animal starts with: the species' own value when
    /// it has one, capped at max health
    pub fn spawn_health(&self, species_health: f64) -> f64 {
        let health = if species_health > 0.0 {
            species_health
        } else {
            self.starting_health
        };
        health.min(self.max_health)
    }

    /// Whether one more animal may be added with `occupied` cells taken
    pub fn allows_addition(&self, occupied: usize) -> bool {
        (occupied as f64) < self.capacity() as f64 * self.add_guard_ratio
    }
}
