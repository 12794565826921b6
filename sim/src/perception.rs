//! What an animal can see.
//!
//! Vision is a square: another animal is visible when it is within the radius
//! on each axis independently. Results keep population order, which is what
//! every "nearest" tie-break downstream relies on.

use crate::geometry::squared_distance;
use crate::Animal;
use shared::Role;

/// Active animals other than `observer` within `radius` on both axes
pub fn find_in_range<'a>(observer: &Animal, population: &'a [Animal], radius: u32) -> Vec<&'a Animal> {
    population
        .iter()
        .filter(|other| {
            other.id != observer.id
                && other.is_active
                && observer.position.within(other.position, radius)
        })
        .collect()
}

/// Everything `observer` sees with its own vision
pub fn look_around<'a>(observer: &Animal, population: &'a [Animal]) -> Vec<&'a Animal> {
    find_in_range(observer, population, observer.vision)
}

pub fn with_role<'a>(animals: &[&'a Animal], role: Role) -> Vec<&'a Animal> {
    animals
        .iter()
        .copied()
        .filter(|animal| animal.role() == role)
        .collect()
}

/// Closest animal to `observer`; the first one seen wins a tie
pub fn nearest<'a>(observer: &Animal, candidates: &[&'a Animal]) -> Option<&'a Animal> {
    let mut best: Option<(&'a Animal, i64)> = None;
    for &candidate in candidates {
        let distance = squared_distance(observer.position, candidate.position);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }
    best.map(|(animal, _)| animal)
}
