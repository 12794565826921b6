use crate::geometry::{closest_to, farthest_from};
use crate::perception::{nearest, with_role};
use crate::{Animal, AnimalId, Position};
use rand::seq::SliceRandom;
use rand::Rng;
use shared::Role;

/// What an animal does this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Nothing worth reacting to: step to a random candidate cell
    Walk(Position),
    /// Close in on prey that is out of reach
    Approach { to: Position, target: AnimalId },
    /// Bite adjacent prey
    Attack(AnimalId),
    /// Get as far as possible from a predator that is close
    Flee { to: Position, threat: AnimalId },
}

impl Action {
    /// Whether this action costs the per-tick health decay
    pub fn costs_upkeep(&self, flee_upkeep: bool) -> bool {
        match self {
            Action::Flee { .. } => flee_upkeep,
            _ => true,
        }
    }
}

/// Choose an action for `animal` from what it sees and where it may step.
///
/// `perceived` must be the animal's perception result and `candidates` its
/// candidate destination set, which always ends with its own cell.
pub fn decide_action<R: Rng>(
    animal: &Animal,
    perceived: &[&Animal],
    candidates: &[Position],
    rng: &mut R,
) -> Action {
    match animal.role() {
        Role::Predator => hunt(animal, perceived, candidates, rng),
        Role::Prey => evade(animal, perceived, candidates, rng),
    }
}

fn hunt<R: Rng>(animal: &Animal, perceived: &[&Animal], candidates: &[Position], rng: &mut R) -> Action {
    let prey = with_role(perceived, Role::Prey);
    let Some(target) = nearest(animal, &prey) else {
        return random_walk(animal, candidates, rng);
    };

    if is_far(animal.position, target.position) {
        let to = closest_to(candidates, target.position)
            .map(|idx| candidates[idx])
            .unwrap_or(animal.position);
        Action::Approach {
            to,
            target: target.id,
        }
    } else {
        Action::Attack(target.id)
    }
}

fn evade<R: Rng>(animal: &Animal, perceived: &[&Animal], candidates: &[Position], rng: &mut R) -> Action {
    let predators = with_role(perceived, Role::Predator);
    match nearest(animal, &predators) {
        Some(threat) if is_near(animal.position, threat.position) => {
            let to = farthest_from(candidates, threat.position)
                .map(|idx| candidates[idx])
                .unwrap_or(animal.position);
            Action::Flee {
                to,
                threat: threat.id,
            }
        }
        _ => random_walk(animal, candidates, rng),
    }
}

fn random_walk<R: Rng>(animal: &Animal, candidates: &[Position], rng: &mut R) -> Action {
    Action::Walk(candidates.choose(rng).copied().unwrap_or(animal.position))
}

/// Out of biting reach: more than one cell away on either axis
fn is_far(from: Position, to: Position) -> bool {
    let (dx, dy) = from.delta(to);
    dx > 1 || dy > 1
}

/// Close enough to flee from: under two cells on either axis
fn is_near(from: Position, to: Position) -> bool {
    let (dx, dy) = from.delta(to);
    dx < 2 || dy < 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perception::look_around;
    use crate::Species;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shared::{Sex, SpeciesDescriptor};

    fn animal(id: u64, descriptor: SpeciesDescriptor, x: i32, y: i32) -> Animal {
        Species::new(descriptor)
            .spawn(AnimalId(id), Sex::Male)
            .at((x, y))
    }

    fn cells(list: &[(i32, i32)]) -> Vec<Position> {
        list.iter().map(|&p| Position::from(p)).collect()
    }

    #[test]
    fn test_predator_approaches_far_prey() {
        let population = vec![
            animal(0, SpeciesDescriptor::lion(), 0, 0),
            animal(1, SpeciesDescriptor::antilope(), 2, 2),
        ];
        let seen = look_around(&population[0], &population);
        let candidates = cells(&[(0, 1), (1, 0), (1, 1), (0, 0)]);
        let mut rng = StdRng::seed_from_u64(1);

        let action = decide_action(&population[0], &seen, &candidates, &mut rng);

        assert_eq!(
            action,
            Action::Approach {
                to: Position::new(1, 1),
                target: AnimalId(1)
            }
        );
    }

    #[test]
    fn test_predator_attacks_adjacent_prey() {
        let population = vec![
            animal(0, SpeciesDescriptor::lion(), 0, 0),
            animal(1, SpeciesDescriptor::antilope(), 1, 1),
        ];
        let seen = look_around(&population[0], &population);
        let mut rng = StdRng::seed_from_u64(1);

        let action = decide_action(&population[0], &seen, &cells(&[(0, 0)]), &mut rng);
        assert_eq!(action, Action::Attack(AnimalId(1)));
    }

    #[test]
    fn test_predator_ignores_other_predators() {
        let population = vec![
            animal(0, SpeciesDescriptor::lion(), 0, 0),
            animal(1, SpeciesDescriptor::fox(), 1, 1),
        ];
        let seen = look_around(&population[0], &population);
        let candidates = cells(&[(0, 1), (1, 0), (0, 0)]);
        let mut rng = StdRng::seed_from_u64(3);

        let action = decide_action(&population[0], &seen, &candidates, &mut rng);
        match action {
            Action::Walk(to) => assert!(candidates.contains(&to)),
            other => panic!("expected a walk, got {other:?}"),
        }
    }

    #[test]
    fn test_prey_flees_near_predator() {
        let population = vec![
            animal(0, SpeciesDescriptor::antilope(), 1, 1),
            animal(1, SpeciesDescriptor::lion(), 0, 0),
        ];
        let seen = look_around(&population[0], &population);
        let candidates = cells(&[(0, 2), (2, 0), (2, 1), (2, 2), (1, 1)]);
        let mut rng = StdRng::seed_from_u64(1);

        let action = decide_action(&population[0], &seen, &candidates, &mut rng);
        assert_eq!(
            action,
            Action::Flee {
                to: Position::new(2, 2),
                threat: AnimalId(1)
            }
        );
        assert!(!action.costs_upkeep(false));
        assert!(action.costs_upkeep(true));
    }

    #[test]
    fn test_prey_walks_when_predator_not_near() {
        // Two cells away on both axes: visible, but not near
        let population = vec![
            animal(0, SpeciesDescriptor::antilope(), 2, 2),
            animal(1, SpeciesDescriptor::lion(), 0, 0),
        ];
        let seen = look_around(&population[0], &population);
        assert_eq!(seen.len(), 1);

        let candidates = cells(&[(3, 3), (2, 2)]);
        let mut rng = StdRng::seed_from_u64(9);
        let action = decide_action(&population[0], &seen, &candidates, &mut rng);

        assert!(matches!(action, Action::Walk(_)));
        assert!(action.costs_upkeep(false));
    }

    #[test]
    fn test_near_uses_either_axis() {
        assert!(is_near(Position::new(0, 0), Position::new(1, 5)));
        assert!(is_near(Position::new(0, 0), Position::new(5, 1)));
        assert!(!is_near(Position::new(0, 0), Position::new(2, 2)));
        assert!(is_far(Position::new(0, 0), Position::new(0, 2)));
        assert!(!is_far(Position::new(0, 0), Position::new(1, 1)));
    }
}
