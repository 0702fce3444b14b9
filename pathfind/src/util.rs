use crate::board::Board;
use crate::grid::{CellState, Grid, Point};

/// Open 10x10 field, start and end in opposite corners
pub const OPEN_PRESET: &str = "\
S.........
..........
..........
..........
..........
..........
..........
..........
..........
.........E";

/// The start is sealed off from the end by a full wall
pub const WALL_PRESET: &str = "\
S.........
..........
..........
..........
##########
..........
..........
..........
..........
.........E";

pub const MAZE_PRESET: &str = "\
S.#.......#.....
..#.#####.#.###.
..#.#...#.#...#.
..#.#.#.#.###.#.
....#.#.#.....#.
.####.#.#####.#.
......#.....#.#.
.######.###.#.#.
.#......#...#...
.#.######.#####.
.#......#.....#.
.######.#####.#.
......#.#.....#.
.####.#.#.#####.
....#...#.......
###.#########.#E";

pub fn preset(name: &str) -> Option<&'static str> {
    match name {
        "open" => Some(OPEN_PRESET),
        "wall" => Some(WALL_PRESET),
        "maze" => Some(MAZE_PRESET),
        _ => None,
    }
}

/// Builds a board from an ASCII map such as [`MAZE_PRESET`]. `S` and `E` mark the endpoints,
/// `#` barriers and `.` empty cells.
pub fn parse_ascii(text: &str, width: u32) -> Result<Board, anyhow::Error> {
    let parsed: Grid = text.parse()?;

    for state in [CellState::Start, CellState::End] {
        let count = parsed.count(state);
        if count > 1 {
            return Err(anyhow::anyhow!(
                "Map contains {} '{}' cells, at most one is allowed",
                count,
                state
            ));
        }
    }

    // copy into a grid with the requested cell width
    let mut grid = Grid::build(parsed.rows(), width);
    for cell in parsed.cells() {
        grid.set_state(Point::new(cell.row(), cell.col()), cell.classify());
    }

    Ok(Board::from_grid(grid))
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::find::{DfsOptions, NoRender};

    #[test]
    fn test_parse_presets() {
        for name in ["open", "wall", "maze"] {
            let board = parse_ascii(preset(name).unwrap(), 20).unwrap();
            assert!(board.start().is_some(), "{}", name);
            assert!(board.end().is_some(), "{}", name);
            assert_eq!(board.grid().width(), 20);
        }
        assert!(preset("spiral").is_none());
    }

    #[test]
    fn test_preset_outcomes() {
        let mut open = parse_ascii(OPEN_PRESET, 10).unwrap();
        assert_eq!(open.run(DfsOptions::default(), &mut NoRender), Ok(true));

        let mut wall = parse_ascii(WALL_PRESET, 10).unwrap();
        assert_eq!(wall.run(DfsOptions::default(), &mut NoRender), Ok(false));

        let mut maze = parse_ascii(MAZE_PRESET, 10).unwrap();
        assert_eq!(maze.run(DfsOptions::default(), &mut NoRender), Ok(true));
    }

    #[test]
    fn test_rejects_two_starts() {
        let err = parse_ascii("S.S\n...\n..E", 10).unwrap_err();
        assert!(err.to_string().contains("'S'"));
    }
}
