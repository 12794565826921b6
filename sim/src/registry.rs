use crate::Species;
use shared::{SpeciesCatalog, SpeciesDescriptor};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("trigger '{0}' is already registered")]
    DuplicateTrigger(char),

    #[error("no species registered under trigger '{0}'")]
    UnknownTrigger(char),
}

/// Species the simulation can create, keyed by trigger symbol.
///
/// Triggers are case-insensitive and kept in registration order, which is
/// also the order the front-end lists them in.
#[derive(Debug, Clone, Default)]
pub struct SpeciesRegistry {
    entries: Vec<(char, Species)>,
}

fn normalize(trigger: char) -> char {
    trigger.to_ascii_uppercase()
}

impl SpeciesRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding Antilope, Lion, Rabbit and Fox under their glyphs
    pub fn built_in() -> Self {
        let entries = SpeciesCatalog::built_in()
            .entries
            .into_iter()
            .map(|entry| (normalize(entry.trigger), Species::new(entry.species)))
            .collect();
        Self { entries }
    }

    pub fn register(&mut self, trigger: char, descriptor: SpeciesDescriptor) -> Result<&Species, RegistryError> {
        let trigger = normalize(trigger);
        if self.contains(trigger) {
            return Err(RegistryError::DuplicateTrigger(trigger));
        }
        self.entries.push((trigger, Species::new(descriptor)));
        Ok(&self.entries[self.entries.len() - 1].1)
    }

    /// Register every catalog entry; stops at the first clash
    pub fn extend_from_catalog(&mut self, catalog: &SpeciesCatalog) -> Result<usize, RegistryError> {
        for entry in &catalog.entries {
            self.register(entry.trigger, entry.species.clone())?;
        }
        Ok(catalog.entries.len())
    }

    pub fn contains(&self, trigger: char) -> bool {
        self.get(trigger).is_some()
    }

    pub fn get(&self, trigger: char) -> Option<&Species> {
        let trigger = normalize(trigger);
        self.entries
            .iter()
            .find(|(key, _)| *key == trigger)
            .map(|(_, species)| species)
    }

    pub fn lookup(&self, trigger: char) -> Result<&Species, RegistryError> {
        self.get(trigger)
            .ok_or(RegistryError::UnknownTrigger(normalize(trigger)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &Species)> {
        self.entries.iter().map(|(trigger, species)| (*trigger, species))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{CatalogEntry, DisplayColor, Role};

    #[test]
    fn test_built_in_registry() {
        let registry = SpeciesRegistry::built_in();
        assert_eq!(registry.len(), 4);

        let triggers: Vec<char> = registry.iter().map(|(t, _)| t).collect();
        assert_eq!(triggers, vec!['A', 'L', 'R', 'F']);

        assert_eq!(registry.get('l').map(|s| s.name()), Some("Lion"));
        assert_eq!(registry.get('a').map(|s| s.role()), Some(Role::Prey));
    }

    #[test]
    fn test_duplicate_trigger() {
        let mut registry = SpeciesRegistry::built_in();
        let err = registry
            .register('l', SpeciesDescriptor::fox())
            .unwrap_err();

        assert_eq!(err, RegistryError::DuplicateTrigger('L'));
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_unknown_trigger() {
        let registry = SpeciesRegistry::built_in();
        assert!(registry.get('Z').is_none());
        assert_eq!(
            registry.lookup('z').unwrap_err(),
            RegistryError::UnknownTrigger('Z')
        );
    }

    #[test]
    fn test_extend_from_catalog() {
        let mut registry = SpeciesRegistry::built_in();
        let catalog = SpeciesCatalog::new(vec![CatalogEntry {
            trigger: 'H',
            species: SpeciesDescriptor::new("Hyena", Role::Predator, 'H', DisplayColor::DarkGreen, 3, 90.0),
        }]);

        assert_eq!(registry.extend_from_catalog(&catalog), Ok(1));
        assert_eq!(registry.lookup('h').map(|s| s.descriptor().vision), Ok(3));
    }
}
