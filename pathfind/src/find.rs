use std::collections::HashSet;

use log::{debug, trace};

use crate::grid::{CellState, Grid, Point};

/// Called by the search after every mutation that should become visible.
///
/// The hook only gets a shared borrow of the grid, so it can draw it but never change it.
pub trait RenderHook {
    fn on_step(&mut self, grid: &Grid);
}

impl<F: FnMut(&Grid)> RenderHook for F {
    fn on_step(&mut self, grid: &Grid) {
        self(grid)
    }
}

/// A hook that does nothing, for headless runs
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRender;

impl RenderHook for NoRender {
    fn on_step(&mut self, _grid: &Grid) {}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInput {
    #[error("no start cell selected")]
    MissingStart,
    #[error("no end cell selected")]
    MissingEnd,
    #[error("start and end are the same cell {0}")]
    SameCell(Point),
    #[error("cell {point} is outside the {rows}x{rows} grid")]
    OutOfBounds { point: Point, rows: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FindError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
    #[error("search cancelled after {frames} frames")]
    Cancelled { frames: usize },
}

/// Checks that both endpoints are present, distinct and inside the grid
pub fn validate(
    grid: &Grid,
    start: Option<Point>,
    end: Option<Point>,
) -> Result<(Point, Point), InvalidInput> {
    let start = start.ok_or(InvalidInput::MissingStart)?;
    let end = end.ok_or(InvalidInput::MissingEnd)?;

    for point in [start, end] {
        if !grid.contains(point) {
            return Err(InvalidInput::OutOfBounds {
                point,
                rows: grid.rows(),
            });
        }
    }

    if start == end {
        return Err(InvalidInput::SameCell(start));
    }

    Ok((start, end))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DfsOptions {
    /// Re-close the cells of the last explored branch before reporting that no path exists
    pub replay_failed_branch: bool,
}

impl Default for DfsOptions {
    fn default() -> Self {
        Self {
            replay_failed_branch: true,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct PathResult {
    /// The route from start to goal, both included
    pub path: Vec<Point>,
    pub start: Point,
    pub goal: Point,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState {
    Searching,
    NoPathFound,
    PathFound(PathResult),
    Cancelled,
}

impl SearchState {
    pub fn is_done(&self) -> bool {
        !matches!(self, SearchState::Searching)
    }
}

/// What the caller should do after a call to [`Dfs::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// the grid changed and should be drawn
    Redraw,
    /// the search is over, further calls do nothing
    Done,
}

#[derive(Debug)]
enum Phase {
    Search,
    /// marking the found route, one cell per frame
    Trace { path: Vec<Point>, next: usize },
    /// re-closing the last explored branch after the stack ran dry
    Replay { path: Vec<Point>, next: usize },
    /// putting the endpoint markers back before the final frame
    Restore(SearchState),
    Done,
}

/// Depth-first search over a [`Grid`], advanced one frame at a time.
///
/// Every call to [`Dfs::step`] applies the mutations up to the next point where the grid should
/// be redrawn. Driving it to completion with [`Dfs::finish`] gives the blocking behaviour.
#[derive(Debug)]
pub struct Dfs {
    start: Point,
    goal: Point,
    options: DfsOptions,
    stack: Vec<(Point, Vec<Point>)>,
    visited: HashSet<Point>,
    // the path of the most recently popped entry
    last_path: Vec<Point>,
    // a closed cell whose neighbors are pushed before the next pop
    pending: Option<Point>,
    phase: Phase,
    state: SearchState,
    cancel_requested: bool,
    transitions: Vec<(Point, CellState)>,
    frames: usize,
}

impl Dfs {
    pub fn new(start: Point, goal: Point) -> Self {
        Self::with_options(start, goal, DfsOptions::default())
    }

    pub fn with_options(start: Point, goal: Point, options: DfsOptions) -> Self {
        debug!("dfs from {} to {} ({:?})", start, goal, options);

        Self {
            start,
            goal,
            options,
            stack: vec![(start, vec![start])],
            visited: HashSet::new(),
            last_path: Vec::new(),
            pending: None,
            phase: Phase::Search,
            state: SearchState::Searching,
            cancel_requested: false,
            transitions: Vec::new(),
            frames: 0,
        }
    }

    /// Drives the search to the end, calling `hook` after every step that changed the grid
    pub fn finish(
        &mut self,
        grid: &mut Grid,
        hook: &mut impl RenderHook,
    ) -> Result<bool, FindError> {
        while let Step::Redraw = self.step(grid) {
            hook.on_step(grid);
        }

        // the loop above only exits once the state is final
        self.outcome().unwrap_or(Ok(false))
    }

    /// Requests the search to stop. Takes effect on the next call to [`Dfs::step`], which
    /// restores the endpoint markers and asks for one last redraw.
    pub fn cancel(&mut self) {
        if !matches!(self.phase, Phase::Restore(_) | Phase::Done) {
            self.cancel_requested = true;
        }
    }

    pub fn step(&mut self, grid: &mut Grid) -> Step {
        if self.cancel_requested {
            self.cancel_requested = false;
            self.pending = None;
            self.phase = Phase::Restore(SearchState::Cancelled);
        }

        loop {
            match std::mem::replace(&mut self.phase, Phase::Done) {
                Phase::Search => {
                    self.phase = Phase::Search;
                    if self.search_until_redraw(grid) {
                        return self.redraw();
                    }
                }
                Phase::Trace { path, next } => {
                    if let Some(&point) = path.get(next) {
                        self.mark(grid, point, CellState::Path);
                        self.phase = Phase::Trace {
                            path,
                            next: next + 1,
                        };
                        return self.redraw();
                    }

                    self.phase = Phase::Restore(SearchState::PathFound(PathResult {
                        path,
                        start: self.start,
                        goal: self.goal,
                    }));
                }
                Phase::Replay { path, mut next } => {
                    while let Some(&point) = path.get(next) {
                        next += 1;
                        if point != self.start && point != self.goal {
                            self.mark(grid, point, CellState::Closed);
                            self.phase = Phase::Replay { path, next };
                            return self.redraw();
                        }
                    }

                    self.phase = Phase::Restore(SearchState::NoPathFound);
                }
                Phase::Restore(state) => {
                    if let SearchState::PathFound(_) = state {
                        self.mark(grid, self.goal, CellState::End);
                        self.mark(grid, self.start, CellState::Start);
                    } else {
                        self.mark(grid, self.start, CellState::Start);
                        self.mark(grid, self.goal, CellState::End);
                    }

                    debug!(
                        "dfs finished: {:?} after {} frames, {} cells expanded",
                        state,
                        self.frames + 1,
                        self.visited.len()
                    );

                    self.state = state;
                    return self.redraw();
                }
                Phase::Done => return Step::Done,
            }
        }
    }

    /// Pops entries until one gets expanded (returns true) or the search leaves the search phase
    fn search_until_redraw(&mut self, grid: &mut Grid) -> bool {
        loop {
            if let Some(current) = self.pending.take() {
                self.expand(grid, current);
            }

            let Some((current, path)) = self.stack.pop() else {
                let path = std::mem::take(&mut self.last_path);
                self.phase = if self.options.replay_failed_branch {
                    Phase::Replay { path, next: 0 }
                } else {
                    Phase::Restore(SearchState::NoPathFound)
                };
                return false;
            };

            if current == self.goal {
                self.phase = Phase::Trace { path, next: 0 };
                return false;
            }

            self.last_path = path;

            // a cell can be on the stack several times, only the first pop expands it
            if self.visited.insert(current) {
                self.mark(grid, current, CellState::Closed);
                self.pending = Some(current);
                return true;
            }
        }
    }

    fn expand(&mut self, grid: &mut Grid, current: Point) {
        trace!("expanding {}", current);

        for neighbor in grid.open_neighbors(current) {
            if self.visited.contains(&neighbor) {
                continue;
            }

            let mut path = Vec::with_capacity(self.last_path.len() + 1);
            path.extend_from_slice(&self.last_path);
            path.push(neighbor);

            self.stack.push((neighbor, path));
            self.mark(grid, neighbor, CellState::Open);
        }
    }

    fn mark(&mut self, grid: &mut Grid, point: Point, state: CellState) {
        if grid.set_state(point, state) {
            self.transitions.push((point, state));
        }
    }

    fn redraw(&mut self) -> Step {
        self.frames += 1;
        Step::Redraw
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// The final result, or None while the search is still running
    pub fn outcome(&self) -> Option<Result<bool, FindError>> {
        match self.state {
            SearchState::Searching => None,
            SearchState::PathFound(_) => Some(Ok(true)),
            SearchState::NoPathFound => Some(Ok(false)),
            SearchState::Cancelled => Some(Err(FindError::Cancelled {
                frames: self.frames,
            })),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Done)
    }

    /// Every state change applied to the grid so far, in order
    pub fn transitions(&self) -> &[(Point, CellState)] {
        &self.transitions
    }

    /// Number of redraws requested so far
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Number of cells expanded so far
    pub fn expanded(&self) -> usize {
        self.visited.len()
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn goal(&self) -> Point {
        self.goal
    }
}

/// Runs a depth-first search from `start` to `end`, calling `hook` after every visible change.
/// Returns whether a path was found.
pub fn run(
    grid: &mut Grid,
    start: Point,
    end: Point,
    hook: &mut impl RenderHook,
) -> Result<bool, FindError> {
    run_with_options(grid, start, end, DfsOptions::default(), hook)
}

pub fn run_with_options(
    grid: &mut Grid,
    start: Point,
    end: Point,
    options: DfsOptions,
    hook: &mut impl RenderHook,
) -> Result<bool, FindError> {
    let (start, end) = validate(grid, Some(start), Some(end))?;
    Dfs::with_options(start, end, options).finish(grid, hook)
}
