use crate::behavior::{decide_action, Action};
use crate::perception::look_around;
use crate::{Animal, Board, Position, SimConfig};
use rand::Rng;
use tracing::debug;

/// Outcome of one movement phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovementReport {
    /// Animals that ran out of health through upkeep
    pub starved: usize,
    /// Prey killed by predators
    pub killed: usize,
}

/// Whether any animal still in the list stands on `pos`.
///
/// Animals that died earlier in the tick keep their cell until the purge.
pub fn is_occupied(population: &[Animal], pos: Position) -> bool {
    population.iter().any(|animal| animal.position == pos)
}

/// Free in-bounds cells around `animal`, followed by its own cell
pub fn candidate_cells(board: &Board, population: &[Animal], animal: &Animal) -> Vec<Position> {
    let mut cells: Vec<Position> = animal
        .position
        .neighborhood()
        .filter(|&pos| board.contains(pos) && !is_occupied(population, pos))
        .collect();
    cells.push(animal.position);
    cells
}

/// Let every active animal act once, in list order.
///
/// Each animal sees the board as left by the animals before it. Animals that
/// die are only flagged inactive; removing them is the purge's job.
pub fn resolve_movement<R: Rng>(
    board: &Board,
    population: &mut [Animal],
    config: &SimConfig,
    rng: &mut R,
) -> MovementReport {
    let mut report = MovementReport::default();

    for idx in 0..population.len() {
        if !population[idx].is_active {
            continue;
        }

        let action = {
            let animal = &population[idx];
            let candidates = candidate_cells(board, population, animal);
            let perceived = look_around(animal, population);
            decide_action(animal, &perceived, &candidates, rng)
        };

        if action.costs_upkeep(config.flee_upkeep) {
            let animal = &mut population[idx];
            animal.take_damage(config.health_decay);
            if animal.is_dead() {
                debug!(id = %animal.id, species = animal.species.name(), "animal starved");
                report.starved += 1;
                continue;
            }
        }

        match action {
            Action::Walk(to) | Action::Approach { to, .. } | Action::Flee { to, .. } => {
                population[idx].position = to;
            }
            Action::Attack(target) => {
                if attack(population, idx, target, config) {
                    report.killed += 1;
                }
            }
        }
    }

    report
}

/// Predator at `hunter` bites `target`; returns true when the bite kills
fn attack(population: &mut [Animal], hunter: usize, target: crate::AnimalId, config: &SimConfig) -> bool {
    let Some(prey_idx) = population.iter().position(|a| a.id == target) else {
        return false;
    };

    let prey = &mut population[prey_idx];
    prey.take_damage(config.bite);
    let prey_killed = prey.is_dead();
    let prey_position = prey.position;

    let predator = &mut population[hunter];
    predator.heal(config.heal, config.max_health);

    if prey_killed {
        predator.position = prey_position;
        predator.restore(config.max_health);
        debug!(predator = %predator.id, prey = %target, "prey killed");
    }

    prey_killed
}
