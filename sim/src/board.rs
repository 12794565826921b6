use crate::{Animal, Position};
use shared::DisplayColor;

/// What the front-end draws in one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Empty,
    Occupied { glyph: char, color: DisplayColor },
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Fixed-size occupancy grid.
///
/// The board knows coordinates and markers only; who stands where is decided
/// by the population, and the markers are refreshed from it once per tick.
#[derive(Debug, Clone)]
pub struct Board {
    width: usize,
    height: usize,
    grid: Vec<Vec<Cell>>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        let grid = vec![vec![Cell::Empty; width]; height];
        Board {
            width,
            height,
            grid,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_out_of_bounds(&self, x: i32, y: i32) -> bool {
        x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        !self.is_out_of_bounds(pos.x, pos.y)
    }

    /// Get the cell at position (returns None if out of bounds)
    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        if self.is_out_of_bounds(x, y) {
            None
        } else {
            Some(&self.grid[y as usize][x as usize])
        }
    }

    fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        if self.contains(pos) {
            Some(&mut self.grid[pos.y as usize][pos.x as usize])
        } else {
            None
        }
    }

    /// Mark every listed animal's cell with its glyph and color
    pub fn fill(&mut self, animals: &[Animal]) {
        for animal in animals {
            let marker = Cell::Occupied {
                glyph: animal.glyph(),
                color: animal.color(),
            };
            if let Some(cell) = self.cell_mut(animal.position) {
                *cell = marker;
            }
        }
    }

    /// Reset the markers left by `fill` for the same animals
    pub fn prepare(&mut self, animals: &[Animal]) {
        for animal in animals {
            if let Some(cell) = self.cell_mut(animal.position) {
                *cell = Cell::Empty;
            }
        }
    }

    /// Number of cells currently carrying a marker
    pub fn occupied_cells(&self) -> usize {
        self.grid
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count()
    }

    /// All in-bounds positions, column by column (x outer, y inner)
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.width as i32)
            .flat_map(move |x| (0..self.height as i32).map(move |y| Position::new(x, y)))
    }

    /// Rows of cells, top to bottom, for rendering
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.grid.iter().map(|row| row.as_slice())
    }
}
