pub mod board;
pub mod find;
pub mod grid;
pub mod util;

pub use board::Board;
pub use find::{run, Dfs, DfsOptions, FindError, InvalidInput, RenderHook, SearchState, Step};
pub use grid::{Cell, CellState, Direction, Grid, Point};
