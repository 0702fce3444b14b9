use log::debug;

use crate::find::{validate, Dfs, DfsOptions, FindError, RenderHook, Step};
use crate::grid::{CellState, Grid, Point};

/// A grid together with the start and end designations made by the user.
///
/// Keeps at most one Start and one End cell on the grid.
#[derive(Clone, Debug)]
pub struct Board {
    grid: Grid,
    start: Option<Point>,
    end: Option<Point>,
}

impl Board {
    pub fn new(rows: usize, width: u32) -> Self {
        Self::from_grid(Grid::build(rows, width))
    }

    /// Wraps an existing grid. Start and End cells already on it are picked up; if there are
    /// several, the first one in row order wins and the others are reset.
    pub fn from_grid(mut grid: Grid) -> Self {
        let mut start = None;
        let mut end = None;

        for row in 0..grid.rows() {
            for col in 0..grid.rows() {
                let point = Point::new(row, col);
                let slot = match grid.state(point) {
                    Some(CellState::Start) => &mut start,
                    Some(CellState::End) => &mut end,
                    _ => continue,
                };
                if slot.is_none() {
                    *slot = Some(point);
                } else {
                    grid.set_state(point, CellState::Empty);
                }
            }
        }

        Self { grid, start, end }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn end(&self) -> Option<Point> {
        self.end
    }

    /// Applies a "paint" click: the first click places the start, the second the end and any
    /// further click places a barrier. Returns the new state of the cell, or None if the click
    /// was ignored.
    pub fn paint(&mut self, point: Point) -> Option<CellState> {
        if !self.grid.contains(point) {
            return None;
        }

        let state = if self.start.is_none() && self.end != Some(point) {
            self.start = Some(point);
            CellState::Start
        } else if self.end.is_none() && self.start != Some(point) {
            self.end = Some(point);
            CellState::End
        } else if self.start != Some(point) && self.end != Some(point) {
            CellState::Barrier
        } else {
            return None;
        };

        self.grid.set_state(point, state);
        Some(state)
    }

    /// Resets a cell to Empty, dropping the start or end designation if it was one
    pub fn erase(&mut self, point: Point) -> bool {
        if !self.grid.set_state(point, CellState::Empty) {
            return false;
        }

        if self.start == Some(point) {
            self.start = None;
        } else if self.end == Some(point) {
            self.end = None;
        }
        true
    }

    /// Discards everything and rebuilds an empty grid of the same size
    pub fn clear(&mut self) {
        debug!("clearing {}x{} board", self.rows(), self.rows());
        self.grid = Grid::build(self.grid.rows(), self.grid.width());
        self.start = None;
        self.end = None;
    }

    /// Removes the marks of a previous search, keeping barriers and endpoints
    pub fn clear_search(&mut self) {
        self.grid.clear_search_marks();
    }

    /// Recomputes the cached adjacency after edits
    pub fn refresh_neighbors(&mut self) {
        self.grid.refresh_all_neighbors();
    }

    /// Validates the endpoints, refreshes adjacency and returns a search ready to be stepped
    /// with [`Board::step`]
    pub fn search(&mut self, options: DfsOptions) -> Result<Dfs, FindError> {
        let (start, end) = validate(&self.grid, self.start, self.end)?;
        self.grid.refresh_all_neighbors();
        Ok(Dfs::with_options(start, end, options))
    }

    pub fn step(&mut self, dfs: &mut Dfs) -> Step {
        dfs.step(&mut self.grid)
    }

    /// Blocking run: searches and calls `hook` after every visible change
    pub fn run(
        &mut self,
        options: DfsOptions,
        hook: &mut impl RenderHook,
    ) -> Result<bool, FindError> {
        let mut dfs = self.search(options)?;
        dfs.finish(&mut self.grid, hook)
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::find::{InvalidInput, NoRender};

    #[test]
    fn test_paint_order() {
        let mut board = Board::new(5, 10);
        let (a, b, c) = (Point::new(0, 0), Point::new(4, 4), Point::new(2, 2));

        assert_eq!(board.paint(a), Some(CellState::Start));
        // painting the start again does nothing
        assert_eq!(board.paint(a), None);
        assert_eq!(board.paint(b), Some(CellState::End));
        assert_eq!(board.paint(b), None);
        assert_eq!(board.paint(c), Some(CellState::Barrier));
        assert_eq!(board.paint(Point::new(5, 0)), None);

        assert_eq!(board.start(), Some(a));
        assert_eq!(board.end(), Some(b));
        assert_eq!(board.grid().count(CellState::Barrier), 1);
    }

    #[test]
    fn test_erase_endpoints() {
        let mut board = Board::new(3, 10);
        let (a, b) = (Point::new(0, 0), Point::new(2, 2));
        board.paint(a);
        board.paint(b);

        assert!(board.erase(a));
        assert_eq!(board.start(), None);
        assert_eq!(board.grid().state(a), Some(CellState::Empty));

        // the next paint places the start again
        board.paint(Point::new(1, 1));
        assert_eq!(board.start(), Some(Point::new(1, 1)));
        assert_eq!(board.end(), Some(b));

        assert!(board.erase(b));
        assert_eq!(board.end(), None);
        assert!(!board.erase(Point::new(9, 9)));
    }

    #[test]
    fn test_start_only_on_non_end_cell() {
        let mut board = Board::new(3, 10);
        board.paint(Point::new(0, 0));
        board.paint(Point::new(1, 1));
        board.erase(Point::new(0, 0));

        // the end cell cannot become the start
        assert_eq!(board.paint(Point::new(1, 1)), None);
        assert_eq!(board.paint(Point::new(0, 1)), Some(CellState::Start));
    }

    #[test]
    fn test_clear_rebuilds() {
        let mut board = Board::new(4, 10);
        board.paint(Point::new(0, 0));
        board.paint(Point::new(3, 3));
        board.paint(Point::new(1, 1));
        board.run(DfsOptions::default(), &mut NoRender).unwrap();

        board.clear();
        assert_eq!(board.start(), None);
        assert_eq!(board.end(), None);
        assert_eq!(board.rows(), 4);
        assert_eq!(board.grid().count(CellState::Empty), 16);
        assert!(board.grid().cells().all(|c| c.neighbors().is_empty()));
    }

    #[test]
    fn test_search_requires_endpoints() {
        let mut board = Board::new(3, 10);
        assert_eq!(
            board.search(DfsOptions::default()).unwrap_err(),
            FindError::InvalidInput(InvalidInput::MissingStart)
        );
        board.paint(Point::new(0, 0));
        assert_eq!(
            board.run(DfsOptions::default(), &mut NoRender),
            Err(FindError::InvalidInput(InvalidInput::MissingEnd))
        );
    }

    #[test]
    fn test_search_refreshes_neighbors() {
        let mut board = Board::new(3, 10);
        board.paint(Point::new(0, 0));
        board.paint(Point::new(2, 2));
        board.paint(Point::new(1, 0));

        let mut dfs = board.search(DfsOptions::default()).unwrap();
        assert_eq!(
            board.grid().cell_at(0, 0).unwrap().neighbors(),
            &[Point::new(0, 1)]
        );

        let mut frames = 0;
        while board.step(&mut dfs) == Step::Redraw {
            frames += 1;
        }
        assert_eq!(frames, dfs.frames());
        assert_eq!(dfs.outcome(), Some(Ok(true)));
    }

    #[test]
    fn test_clear_search_then_rerun() {
        let mut board = Board::new(5, 10);
        board.paint(Point::new(0, 0));
        board.paint(Point::new(4, 4));

        assert_eq!(board.run(DfsOptions::default(), &mut NoRender), Ok(true));
        let first = board.grid().to_string();

        board.clear_search();
        assert_eq!(board.grid().count(CellState::Path), 0);
        assert_eq!(board.grid().count(CellState::Closed), 0);

        assert_eq!(board.run(DfsOptions::default(), &mut NoRender), Ok(true));
        assert_eq!(board.grid().to_string(), first);
    }

    #[test]
    fn test_from_grid_keeps_one_start() {
        let grid: Grid = "S.S\n...\nE.E".parse().unwrap();
        let board = Board::from_grid(grid);
        assert_eq!(board.start(), Some(Point::new(0, 0)));
        assert_eq!(board.end(), Some(Point::new(2, 0)));
        assert_eq!(board.grid().count(CellState::Start), 1);
        assert_eq!(board.grid().count(CellState::End), 1);
    }
}
