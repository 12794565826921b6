use crate::movement::is_occupied;
use crate::perception::find_in_range;
use crate::{Animal, AnimalId, Board, IdAllocator, PairingPolicy, Position, SimConfig};
use rand::Rng;
use shared::Sex;
use tracing::debug;

/// Two animals courting each other.
///
/// A pair only refers to its members by id; it never keeps them alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub first: AnimalId,
    pub second: AnimalId,
    /// Consecutive ticks together since forming or last birth
    pub relationship_duration: u32,
    pub is_pair_exist: bool,
}

impl Pair {
    pub fn new(first: AnimalId, second: AnimalId) -> Self {
        Self {
            first,
            second,
            relationship_duration: 0,
            is_pair_exist: true,
        }
    }
}

fn index_of(population: &[Animal], id: AnimalId) -> Option<usize> {
    population.iter().position(|animal| animal.id == id)
}

/// Scan for unpaired animals with an eligible partner next to them.
///
/// Each unpaired animal takes the first partner in population order. With
/// [`PairingPolicy::LastWins`] only the pair found last survives the scan and
/// the animals of every earlier pair are released again.
pub fn form_pair(population: &mut [Animal], config: &SimConfig) -> Vec<Pair> {
    let mut found: Vec<Pair> = Vec::new();

    for idx in 0..population.len() {
        let animal = &population[idx];
        if !animal.is_active || animal.is_paired {
            continue;
        }

        let partner = find_in_range(animal, population, config.pairing_distance)
            .into_iter()
            .find(|other| animal.can_pair_with(other))
            .map(|other| other.id);

        if let Some(partner) = partner {
            let pair = Pair::new(animal.id, partner);
            set_paired(population, &pair, true);
            found.push(pair);
        }
    }

    if config.pairing_policy == PairingPolicy::LastWins && found.len() > 1 {
        let last = found.len() - 1;
        for pair in found.drain(..last) {
            set_paired(population, &pair, false);
        }
    }

    for pair in &found {
        debug!(first = %pair.first, second = %pair.second, "pair formed");
    }

    found
}

fn set_paired(population: &mut [Animal], pair: &Pair, paired: bool) {
    for id in [pair.first, pair.second] {
        if let Some(idx) = index_of(population, id) {
            population[idx].is_paired = paired;
        }
    }
}

fn dissolve(pair: &mut Pair, population: &mut [Animal]) {
    set_paired(population, pair, false);
    pair.is_pair_exist = false;
    debug!(first = %pair.first, second = %pair.second, "pair dissolved");
}

/// Age every pair by one tick.
///
/// Pairs that drifted apart, or lost a member, are dissolved. The others grow
/// their duration and, on reaching the reproduction threshold, place one
/// offspring next to the female and start counting again. Newborns go to
/// `newborns`, not into the population.
pub fn advance_pairs<R: Rng>(
    pairs: &mut [Pair],
    board: &Board,
    population: &mut [Animal],
    config: &SimConfig,
    ids: &mut IdAllocator,
    rng: &mut R,
    newborns: &mut Vec<Animal>,
) -> usize {
    let mut births = 0;

    for pair in pairs.iter_mut() {
        if !pair.is_pair_exist {
            continue;
        }

        let members = (index_of(population, pair.first), index_of(population, pair.second));
        let (first, second) = match members {
            (Some(a), Some(b)) if population[a].is_active && population[b].is_active => (a, b),
            _ => {
                dissolve(pair, population);
                continue;
            }
        };

        if !population[first]
            .position
            .within(population[second].position, config.pairing_distance)
        {
            dissolve(pair, population);
            continue;
        }

        pair.relationship_duration += 1;
        if pair.relationship_duration < config.reproduction_threshold {
            continue;
        }
        pair.relationship_duration = 0;

        let parent = if population[first].sex == Sex::Female {
            &population[first]
        } else {
            &population[second]
        };

        match birth_cell(board, population, newborns, parent.position) {
            Some(cell) => {
                let mut child = parent.offspring(ids.allocate(), Sex::random(rng), cell);
                child.health = config.spawn_health(child.health);
                debug!(
                    id = %child.id,
                    species = child.species.name(),
                    x = cell.x,
                    y = cell.y,
                    "offspring born"
                );
                newborns.push(child);
                births += 1;
            }
            None => debug!(parent = %parent.id, "no room to give birth"),
        }
    }

    births
}

/// First free in-bounds cell around `around`, scanning x then y
pub fn birth_cell(
    board: &Board,
    population: &[Animal],
    newborns: &[Animal],
    around: Position,
) -> Option<Position> {
    around.neighborhood().find(|&pos| {
        board.contains(pos) && !is_occupied(population, pos) && !is_occupied(newborns, pos)
    })
}

/// Drop pairs that have been dissolved
pub fn prune_dissolved_pairs(pairs: &mut Vec<Pair>) -> usize {
    let before = pairs.len();
    pairs.retain(|pair| pair.is_pair_exist);
    before - pairs.len()
}
