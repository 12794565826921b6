use crate::movement::is_occupied;
use crate::{Animal, AnimalId, Board, IdAllocator, Position, SimConfig, Species};
use rand::seq::SliceRandom;
use rand::Rng;
use shared::Sex;
use std::collections::HashSet;
use tracing::debug;

/// The animals on the board plus the ones born this tick
#[derive(Debug, Clone, Default)]
pub struct Population {
    pub animals: Vec<Animal>,
    /// Born during the current tick; invisible until merged
    pub newborns: Vec<Animal>,
    pub(crate) ids: IdAllocator,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allocator(ids: IdAllocator) -> Self {
        Self {
            ids,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.animals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animals.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, id: AnimalId) -> Option<&Animal> {
        self.animals.iter().find(|animal| animal.id == id)
    }

    /// Create an animal with a fresh id and put it on `position` unchecked
    pub fn spawn_at(&mut self, species: &Species, sex: Sex, position: Position) -> AnimalId {
        let id = self.ids.allocate();
        self.animals.push(species.spawn(id, sex).at(position));
        id
    }

    /// Number of distinct cells animals stand on
    pub fn occupied_cells(&self) -> usize {
        self.animals
            .iter()
            .map(|animal| animal.position)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Every cell of the board nobody stands on, x outer, y inner
    pub fn free_cells(&self, board: &Board) -> Vec<Position> {
        board
            .positions()
            .filter(|&pos| !is_occupied(&self.animals, pos))
            .collect()
    }

    /// Place a new animal of `species` on a random free cell.
    ///
    /// Does nothing once the board is at the configured fill ratio, or when
    /// no cell is free.
    pub fn try_add<R: Rng>(
        &mut self,
        species: &Species,
        board: &Board,
        config: &SimConfig,
        rng: &mut R,
    ) -> Option<AnimalId> {
        if !config.allows_addition(self.occupied_cells()) {
            debug!(species = species.name(), "board too crowded, animal not added");
            return None;
        }

        let cell = *self.free_cells(board).choose(rng)?;
        let id = self.ids.allocate();
        let mut animal = species.spawn(id, Sex::random(rng)).at(cell);
        animal.health = config.spawn_health(animal.health);
        self.animals.push(animal);

        debug!(id = %id, species = species.name(), x = cell.x, y = cell.y, "animal added");
        Some(id)
    }

    /// Move this tick's newborns into the population
    pub fn merge_newborns(&mut self) -> usize {
        let count = self.newborns.len();
        self.animals.append(&mut self.newborns);
        count
    }

    /// Remove every inactive animal; returns how many were removed
    pub fn purge_dead(&mut self) -> usize {
        let before = self.animals.len();
        self.animals.retain(|animal| animal.is_active);
        before - self.animals.len()
    }
}
