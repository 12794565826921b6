use rand::Rng;
use serde::{Deserialize, Serialize};

/// What an animal does when it meets another species.
///
/// Predators hunt the nearest prey they can see; prey run from the nearest
/// predator. Every concrete species has exactly one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Predator,
    Prey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Pick a sex with equal probability
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Sex::Male
        } else {
            Sex::Female
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Sex::Male => Sex::Female,
            Sex::Female => Sex::Male,
        }
    }
}

/// Terminal palette used to draw a species.
///
/// The engine never looks at this; it is carried through to the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayColor {
    Gray,
    White,
    Yellow,
    DarkYellow,
    Red,
    DarkRed,
    Green,
    DarkGreen,
    Blue,
    Cyan,
    Magenta,
}

impl Default for DisplayColor {
    fn default() -> Self {
        DisplayColor::Gray
    }
}

/// Everything needed to create animals of one concrete species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesDescriptor {
    /// Species name, e.g. "Lion". Animals pair only within the same name.
    pub name: String,

    pub role: Role,

    /// Letter drawn on the board
    pub glyph: char,

    #[serde(default)]
    pub color: DisplayColor,

    /// Per-axis perception radius in cells
    pub vision: u32,

    /// Health a freshly created animal starts with
    pub initial_health: f64,
}

impl SpeciesDescriptor {
    pub fn new(
        name: impl Into<String>,
        role: Role,
        glyph: char,
        color: DisplayColor,
        vision: u32,
        initial_health: f64,
    ) -> Self {
        Self {
            name: name.into(),
            role,
            glyph,
            color,
            vision,
            initial_health,
        }
    }

    pub fn lion() -> Self {
        Self::new("Lion", Role::Predator, 'L', DisplayColor::DarkYellow, 2, 100.0)
    }

    pub fn antilope() -> Self {
        Self::new("Antilope", Role::Prey, 'A', DisplayColor::Yellow, 2, 100.0)
    }

    pub fn fox() -> Self {
        Self::new("Fox", Role::Predator, 'F', DisplayColor::DarkRed, 3, 100.0)
    }

    pub fn rabbit() -> Self {
        Self::new("Rabbit", Role::Prey, 'R', DisplayColor::White, 3, 100.0)
    }

    /// The species that ship with the game, in legend order
    pub fn built_in() -> Vec<SpeciesDescriptor> {
        vec![Self::antilope(), Self::lion(), Self::rabbit(), Self::fox()]
    }
}
