pub mod animal;
pub mod behavior;
pub mod board;
pub mod config;
pub mod error;
pub mod geometry;
pub mod movement;
pub mod pairing;
pub mod perception;
pub mod population;
pub mod registry;
pub mod savannah;

pub use animal::{Animal, AnimalId, IdAllocator, Species};
pub use behavior::{decide_action, Action};
pub use board::{Board, Cell};
pub use config::{ConfigError, PairingPolicy, SimConfig};
pub use error::SimError;
pub use geometry::Position;
pub use movement::MovementReport;
pub use pairing::Pair;
pub use population::Population;
pub use registry::{RegistryError, SpeciesRegistry};
pub use savannah::{Savannah, TickControl, TickReport};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Run a seeded savannah without a front-end for a number of ticks
pub fn run_headless(
    config: SimConfig,
    registry: SpeciesRegistry,
    seed: u64,
    ticks: u64,
) -> Result<(Savannah, Vec<TickReport>), SimError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut savannah = Savannah::new(config, registry)?;
    savannah.seed(&mut rng);

    let reports = (0..ticks)
        .map(|_| savannah.tick(&mut rng, None).0)
        .collect();

    Ok((savannah, reports))
}
