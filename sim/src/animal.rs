use crate::Position;
use serde::{Deserialize, Serialize};
use shared::{DisplayColor, Role, Sex, SpeciesDescriptor};
use std::fmt;
use std::sync::Arc;

/// Identity of an animal, unique for the lifetime of a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AnimalId(pub u64);

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out ids in increasing order; ids are never reused
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from `next`
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    pub fn allocate(&mut self) -> AnimalId {
        let id = AnimalId(self.next);
        self.next += 1;
        id
    }

    #[cfg(test)]
    pub fn peek(&self) -> AnimalId {
        AnimalId(self.next)
    }
}

/// A concrete species shared by all of its animals
#[derive(Debug, Clone)]
pub struct Species(Arc<SpeciesDescriptor>);

impl Species {
    pub fn new(descriptor: SpeciesDescriptor) -> Self {
        Species(Arc::new(descriptor))
    }

    pub fn descriptor(&self) -> &SpeciesDescriptor {
        &self.0
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    /// Create a fresh animal of this species at the origin
    pub fn spawn(&self, id: AnimalId, sex: Sex) -> Animal {
        Animal {
            id,
            position: Position::new(0, 0),
            species: self.clone(),
            vision: self.0.vision,
            health: self.0.initial_health,
            sex,
            is_paired: false,
            is_active: true,
        }
    }
}

impl PartialEq for Species {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.name == other.0.name
    }
}

impl Eq for Species {}

#[derive(Debug, Clone)]
pub struct Animal {
    pub id: AnimalId,
    pub position: Position,
    pub species: Species,
    pub vision: u32,
    pub health: f64,
    pub sex: Sex,
    pub is_paired: bool,
    pub is_active: bool,
}

impl Animal {
    pub fn at(mut self, position: impl Into<Position>) -> Self {
        self.position = position.into();
        self
    }

    pub fn role(&self) -> Role {
        self.species.role()
    }

    pub fn glyph(&self) -> char {
        self.species.descriptor().glyph
    }

    pub fn color(&self) -> DisplayColor {
        self.species.descriptor().color
    }

    /// Check if animal is dead
    pub fn is_dead(&self) -> bool {
        !self.is_active
    }

    pub fn die(&mut self) {
        self.is_active = false;
    }

    /// Lose health, floored at zero; dies on reaching zero
    pub fn take_damage(&mut self, amount: f64) {
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.die();
        }
    }

    /// Gain health, capped at `max`
    pub fn heal(&mut self, amount: f64, max: f64) {
        self.health = (self.health + amount).min(max);
    }

    pub fn restore(&mut self, max: f64) {
        self.health = max;
    }

    /// Whether `other` is an unpaired, opposite-sex animal of the same species
    pub fn can_pair_with(&self, other: &Animal) -> bool {
        other.id != self.id
            && other.is_active
            && !other.is_paired
            && other.sex == self.sex.opposite()
            && other.species == self.species
    }

    /// Create an offspring of the same species at `position`
    pub fn offspring(&self, id: AnimalId, sex: Sex, position: Position) -> Animal {
        self.species.spawn(id, sex).at(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lion(id: u64, sex: Sex) -> Animal {
        Species::new(SpeciesDescriptor::lion()).spawn(AnimalId(id), sex)
    }

    #[test]
    fn test_animal_creation() {
        let animal = lion(3, Sex::Male);
        assert_eq!(animal.id, AnimalId(3));
        assert_eq!(animal.health, 100.0);
        assert_eq!(animal.vision, 2);
        assert!(animal.is_active);
        assert!(!animal.is_paired);
        assert_eq!(animal.role(), Role::Predator);
        assert_eq!(animal.glyph(), 'L');
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.allocate(), AnimalId(0));
        assert_eq!(ids.allocate(), AnimalId(1));
        assert_eq!(ids.peek(), AnimalId(2));

        let mut ids = IdAllocator::starting_at(10);
        assert_eq!(ids.allocate(), AnimalId(10));
    }

    #[test]
    fn test_damage_floors_and_kills() {
        let mut animal = lion(0, Sex::Male);
        animal.health = 5.0;

        animal.take_damage(10.0);

        assert_eq!(animal.health, 0.0);
        assert!(animal.is_dead());
    }

    #[test]
    fn test_heal_is_capped() {
        let mut animal = lion(0, Sex::Male);
        animal.health = 95.0;

        animal.heal(10.0, 100.0);
        assert_eq!(animal.health, 100.0);
    }

    #[test]
    fn test_pairing_candidates() {
        let male = lion(0, Sex::Male);
        let female = lion(1, Sex::Female);
        let other_male = lion(2, Sex::Male);
        let antilope = Species::new(SpeciesDescriptor::antilope()).spawn(AnimalId(3), Sex::Female);

        assert!(male.can_pair_with(&female));
        assert!(!male.can_pair_with(&other_male));
        assert!(!male.can_pair_with(&antilope));

        let mut taken = female.clone();
        taken.is_paired = true;
        assert!(!male.can_pair_with(&taken));
    }

    #[test]
    fn test_species_equality_by_name() {
        let a = Species::new(SpeciesDescriptor::lion());
        let b = Species::new(SpeciesDescriptor::lion());
        let c = Species::new(SpeciesDescriptor::fox());

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_offspring_keeps_species() {
        let parent = lion(0, Sex::Female).at((4, 4));
        let child = parent.offspring(AnimalId(9), Sex::Male, Position::new(5, 4));

        assert_eq!(child.species, parent.species);
        assert_eq!(child.position, Position::new(5, 4));
        assert_eq!(child.health, 100.0);
        assert!(!child.is_paired);
    }
}
