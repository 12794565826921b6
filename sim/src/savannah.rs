use crate::movement::resolve_movement;
use crate::pairing::{advance_pairs, form_pair, prune_dissolved_pairs};
use crate::{Board, Pair, Population, SimConfig, SimError, SpeciesRegistry};
use rand::Rng;
use shared::Command;
use std::convert::Infallible;
use tracing::debug;

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub births: usize,
    pub deaths: usize,
    pub pairs_formed: usize,
    /// Animals alive after the purge
    pub population: usize,
}

/// Whether the loop should keep going after a command was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Quit,
}

pub struct Savannah {
    pub config: SimConfig,
    pub board: Board,
    pub population: Population,
    pub pairs: Vec<Pair>,
    pub registry: SpeciesRegistry,
    pub tick: u64,
}

impl Savannah {
    /// Create an empty savannah after checking the configuration and that
    /// every species in the initial population is registered
    pub fn new(config: SimConfig, registry: SpeciesRegistry) -> Result<Self, SimError> {
        config.validate()?;
        for &trigger in config.initial_population.keys() {
            registry.lookup(trigger)?;
        }

        let board = Board::new(config.board_width, config.board_height);

        Ok(Self {
            config,
            board,
            population: Population::new(),
            pairs: Vec::new(),
            registry,
            tick: 0,
        })
    }

    /// Place the configured initial population; returns how many were placed.
    ///
    /// Seeding goes through the same guard as player additions, so it stops
    /// early on a crowded board.
    pub fn seed<R: Rng>(&mut self, rng: &mut R) -> usize {
        let mut placed = 0;
        for (&trigger, &count) in &self.config.initial_population {
            let Some(species) = self.registry.get(trigger) else {
                continue;
            };
            for _ in 0..count {
                if self
                    .population
                    .try_add(species, &self.board, &self.config, rng)
                    .is_some()
                {
                    placed += 1;
                }
            }
        }
        debug!(placed, "initial population seeded");
        placed
    }

    /// Run one tick up to, not including, the command step.
    ///
    /// `render` sees the board with this tick's occupancy markers before
    /// anything moves.
    pub fn advance<R, F, E>(&mut self, rng: &mut R, render: F) -> Result<TickReport, E>
    where
        R: Rng,
        F: FnOnce(&Board) -> Result<(), E>,
    {
        // 1. Show where everyone stands
        self.board.fill(&self.population.animals);
        render(&self.board)?;

        // 2. Clear the markers again
        self.board.prepare(&self.population.animals);

        // 3. Movement and combat
        let movement = resolve_movement(
            &self.board,
            &mut self.population.animals,
            &self.config,
            rng,
        );

        // 4. Forget dissolved pairs
        prune_dissolved_pairs(&mut self.pairs);

        // 5. Age the remaining pairs, possibly giving birth
        let births = advance_pairs(
            &mut self.pairs,
            &self.board,
            &mut self.population.animals,
            &self.config,
            &mut self.population.ids,
            rng,
            &mut self.population.newborns,
        );

        // 6. Look for new couples
        let formed = form_pair(&mut self.population.animals, &self.config);
        let pairs_formed = formed.len();
        self.pairs.extend(formed);

        // 7. Newborns join
        self.population.merge_newborns();

        // 8. Remove the dead
        let purged = self.population.purge_dead();

        self.tick += 1;
        let report = TickReport {
            tick: self.tick,
            births,
            deaths: purged,
            pairs_formed,
            population: self.population.len(),
        };
        debug!(?report, starved = movement.starved, killed = movement.killed, "tick advanced");

        Ok(report)
    }

    /// Apply the command received after a tick
    pub fn handle_command<R: Rng>(&mut self, command: Option<Command>, rng: &mut R) -> TickControl {
        match command {
            None => TickControl::Continue,
            Some(Command::Quit) => TickControl::Quit,
            Some(Command::AddSpecies(trigger)) => {
                match self.registry.get(trigger) {
                    Some(species) => {
                        self.population
                            .try_add(species, &self.board, &self.config, rng);
                    }
                    None => debug!(%trigger, "no species for trigger"),
                }
                TickControl::Continue
            }
        }
    }

    /// Full tick without a renderer
    pub fn tick<R: Rng>(&mut self, rng: &mut R, command: Option<Command>) -> (TickReport, TickControl) {
        let report = match self.advance(rng, |_| Ok::<(), Infallible>(())) {
            Ok(report) => report,
            Err(never) => match never {},
        };
        let control = self.handle_command(command, rng);
        (report, control)
    }
}
