use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// Default pixel width of a cell: an 800px window split into 50 rows
pub const DEFAULT_CELL_WIDTH: u32 = 16;

/// The classification of a single cell. Exactly one of these applies at any time.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Empty,
    Start,
    End,
    Barrier,
    /// discovered by the search but not yet expanded
    Open,
    /// expanded by the search
    Closed,
    /// part of the reconstructed route
    Path,
}

impl CellState {
    pub fn symbol(&self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Start => 'S',
            CellState::End => 'E',
            CellState::Barrier => '#',
            CellState::Open => 'o',
            CellState::Closed => 'x',
            CellState::Path => '*',
        }
    }

    /// States written by a search run, as opposed to user edits
    pub fn is_search_mark(&self) -> bool {
        matches!(self, CellState::Open | CellState::Closed | CellState::Path)
    }
}

impl Display for CellState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<char> for CellState {
    type Error = anyhow::Error;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '.' | ' ' => Ok(CellState::Empty),
            'S' => Ok(CellState::Start),
            'E' => Ok(CellState::End),
            '#' => Ok(CellState::Barrier),
            'o' => Ok(CellState::Open),
            'x' => Ok(CellState::Closed),
            '*' => Ok(CellState::Path),
            _ => Err(anyhow::anyhow!("Invalid cell symbol: {:?}", c)),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Direction {
    Down,
    Up,
    Right,
    Left,
}

impl Direction {
    /// The order in which neighbors are collected. The search pushes them in this order, so the
    /// last one (left) is expanded first.
    pub const EXPANSION_ORDER: [Direction; 4] = [
        Direction::Down,
        Direction::Up,
        Direction::Right,
        Direction::Left,
    ];
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::Up => "up",
                Direction::Down => "down",
                Direction::Left => "left",
                Direction::Right => "right",
            }
        )
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(anyhow::anyhow!("Invalid direction: {}", s)),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns the point one step in the given direction, or None if it falls outside a square
    /// grid with `rows` rows
    pub fn step(&self, direction: Direction, rows: usize) -> Option<Point> {
        match direction {
            Direction::Down if self.row + 1 < rows => Some(Point::new(self.row + 1, self.col)),
            Direction::Up if self.row > 0 => Some(Point::new(self.row - 1, self.col)),
            Direction::Right if self.col + 1 < rows => Some(Point::new(self.row, self.col + 1)),
            Direction::Left if self.col > 0 => Some(Point::new(self.row, self.col - 1)),
            _ => None,
        }
    }

    pub fn is_adjacent(&self, other: &Point) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One addressable position in the grid
#[derive(Clone, Debug)]
pub struct Cell {
    point: Point,
    width: u32,
    state: CellState,
    // cached adjacency, only valid until the next barrier edit
    neighbors: Vec<Point>,
}

impl Cell {
    pub fn new(row: usize, col: usize, width: u32) -> Self {
        Self {
            point: Point::new(row, col),
            width,
            state: CellState::Empty,
            neighbors: Vec::new(),
        }
    }

    pub fn point(&self) -> Point {
        self.point
    }

    pub fn row(&self) -> usize {
        self.point.row
    }

    pub fn col(&self) -> usize {
        self.point.col
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel offset along the horizontal axis (the row index runs horizontally)
    pub fn x(&self) -> u32 {
        self.point.row as u32 * self.width
    }

    /// Pixel offset along the vertical axis
    pub fn y(&self) -> u32 {
        self.point.col as u32 * self.width
    }

    pub fn classify(&self) -> CellState {
        self.state
    }

    pub fn is(&self, state: CellState) -> bool {
        self.state == state
    }

    /// Overwrites the state without any validation
    pub fn set_state(&mut self, state: CellState) {
        self.state = state;
    }

    pub fn reset(&mut self) {
        self.state = CellState::Empty;
    }

    /// The adjacency computed by the last [`Cell::compute_neighbors`] or
    /// [`Grid::refresh_all_neighbors`] call
    pub fn neighbors(&self) -> &[Point] {
        &self.neighbors
    }

    /// Recomputes and stores the non-barrier orthogonal neighbors, in down, up, right, left order
    pub fn compute_neighbors(&mut self, grid: &Grid) -> &[Point] {
        self.neighbors = grid.open_neighbors(self.point);
        &self.neighbors
    }
}

/// A square grid of cells, indexed `[row][col]`
#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    width: u32,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// Allocates `rows` x `rows` empty cells sharing the same pixel width
    pub fn build(rows: usize, width: u32) -> Self {
        let width = width.max(1);
        let cells = (0..rows)
            .map(|row| (0..rows).map(|col| Cell::new(row, col, width)).collect())
            .collect();

        Self { rows, width, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn contains(&self, point: Point) -> bool {
        point.row < self.rows && point.col < self.rows
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row).and_then(|r| r.get(col))
    }

    pub fn cell_at_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.cells.get_mut(row).and_then(|r| r.get_mut(col))
    }

    pub fn state(&self, point: Point) -> Option<CellState> {
        self.cell_at(point.row, point.col).map(Cell::classify)
    }

    /// Sets the state of the cell at `point`, returns false if the point is out of bounds
    pub fn set_state(&mut self, point: Point, state: CellState) -> bool {
        match self.cell_at_mut(point.row, point.col) {
            Some(cell) => {
                cell.set_state(state);
                true
            }
            None => false,
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells().filter(|c| c.is(state)).count()
    }

    /// Maps a pixel position to a `(row, col)` pair by integer division. The result is not
    /// bounds checked.
    pub fn pixel_to_cell(pixel: (u32, u32), width: u32) -> (usize, usize) {
        let width = width.max(1);
        let (x, y) = pixel;
        ((x / width) as usize, (y / width) as usize)
    }

    /// Returns the cell under the given pixel position if it lies inside the grid
    pub fn point_at_pixel(&self, pixel: (u32, u32)) -> Option<Point> {
        let (row, col) = Self::pixel_to_cell(pixel, self.width);
        let point = Point::new(row, col);
        self.contains(point).then_some(point)
    }

    /// Computes the in-bounds, non-barrier orthogonal neighbors of `point` from the current
    /// barrier state
    pub fn open_neighbors(&self, point: Point) -> Vec<Point> {
        Direction::EXPANSION_ORDER
            .iter()
            .filter_map(|&direction| point.step(direction, self.rows))
            .filter(|p| self.state(*p) != Some(CellState::Barrier))
            .collect()
    }

    /// Recomputes the cached adjacency of every cell. Must be called after barrier edits for
    /// [`Cell::neighbors`] to be accurate.
    pub fn refresh_all_neighbors(&mut self) {
        for row in 0..self.rows {
            for col in 0..self.rows {
                let neighbors = self.open_neighbors(Point::new(row, col));
                self.cells[row][col].neighbors = neighbors;
            }
        }
    }

    /// Turns every Open, Closed and Path cell back into Empty
    pub fn clear_search_marks(&mut self) {
        self.cells
            .iter_mut()
            .flatten()
            .filter(|c| c.classify().is_search_mark())
            .for_each(Cell::reset);
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            for cell in row {
                write!(f, "{}", cell.classify())?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl FromStr for Grid {
    type Err = anyhow::Error;

    /// Parses the format written by `Display`, using [`DEFAULT_CELL_WIDTH`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let rows = lines.len();

        let mut grid = Grid::build(rows, DEFAULT_CELL_WIDTH);

        for (row, line) in lines.iter().enumerate() {
            let columns = line.chars().count();
            if columns != rows {
                return Err(anyhow::anyhow!(
                    "Grid must be square: row {} has {} columns, expected {}",
                    row,
                    columns,
                    rows
                ));
            }
            for (col, c) in line.chars().enumerate() {
                grid.set_state(Point::new(row, col), CellState::try_from(c)?);
            }
        }

        Ok(grid)
    }
}
