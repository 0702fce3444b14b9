use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pathfind::{
    find::NoRender,
    util::{parse_ascii, MAZE_PRESET},
    Board, CellState, DfsOptions, Grid, Point,
};

/// Repeats the maze preset `factor` times in both directions, with the end in the far corner
fn load_maze_tiled(factor: usize) -> Board {
    let base = parse_ascii(MAZE_PRESET, 16).unwrap();
    let rows = base.rows();

    let mut grid = Grid::build(rows * factor, 16);
    for cell in base.grid().cells() {
        if cell.is(CellState::Barrier) {
            for r in 0..factor {
                for c in 0..factor {
                    grid.set_state(
                        Point::new(r * rows + cell.row(), c * rows + cell.col()),
                        CellState::Barrier,
                    );
                }
            }
        }
    }

    let last = rows * factor - 1;
    grid.set_state(Point::new(0, 0), CellState::Start);
    grid.set_state(Point::new(last, last), CellState::End);

    Board::from_grid(grid)
}

fn bench_maze_tiled(c: &mut Criterion, factor: usize) {
    let board = load_maze_tiled(factor);

    c.bench_function(&format!("maze_tiled_{}", factor), |b| {
        b.iter(|| {
            let mut board = black_box(board.clone());
            board
                .run(DfsOptions::default(), &mut NoRender)
                .unwrap();
        })
    });
}

fn bench_open_grid(c: &mut Criterion) {
    c.bench_function("open_50", |b| {
        b.iter(|| {
            let mut board = Board::new(50, 16);
            board.paint(black_box(Point::new(0, 0)));
            board.paint(black_box(Point::new(49, 49)));
            let found = board.run(DfsOptions::default(), &mut NoRender).unwrap();
            assert!(found);
        })
    });
}

pub fn maze_small(c: &mut Criterion) {
    bench_maze_tiled(c, 1);
}

pub fn maze_medium(c: &mut Criterion) {
    bench_maze_tiled(c, 2);
}

pub fn maze_large(c: &mut Criterion) {
    bench_maze_tiled(c, 4);
}

criterion_group!(benches, maze_small, maze_medium, maze_large, bench_open_grid);
criterion_main!(benches);
