use egui::{Color32, Pos2, Rect, Stroke, Vec2};
use log::{debug, info, warn};
use pathfind::{Board, CellState, Dfs, DfsOptions, Point, SearchState, Step};

use crate::context::Context;
use crate::event::{Command, Event};
use crate::settings::Settings;

const EMPTY_COLOR: Color32 = Color32::from_rgb(240, 241, 249);
const CLOSED_COLOR: Color32 = Color32::from_rgb(66, 70, 140);
const OPEN_COLOR: Color32 = Color32::from_rgb(245, 167, 200);
const BARRIER_COLOR: Color32 = Color32::from_rgb(3, 10, 140);
const PATH_COLOR: Color32 = Color32::from_rgb(92, 116, 245);
const START_COLOR: Color32 = Color32::from_rgb(255, 165, 0);
const END_COLOR: Color32 = Color32::from_rgb(64, 224, 208);
const GRID_LINE_COLOR: Color32 = Color32::from_rgb(128, 128, 128);

fn state_color(state: CellState) -> Color32 {
    match state {
        CellState::Empty => EMPTY_COLOR,
        CellState::Start => START_COLOR,
        CellState::End => END_COLOR,
        CellState::Barrier => BARRIER_COLOR,
        CellState::Open => OPEN_COLOR,
        CellState::Closed => CLOSED_COLOR,
        CellState::Path => PATH_COLOR,
    }
}

pub struct App {
    settings: Settings,
    board: Board,
    /// the running search, if any. Edits are blocked while it is set.
    search: Option<Dfs>,
    context: Context,
}

impl App {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Load previous settings (if any).
        // Note that you must enable the `persistence` feature for this to work.
        let settings: Settings = if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            Default::default()
        };

        Self::with_settings(settings.with_env_override())
    }

    pub fn with_settings(settings: Settings) -> Self {
        info!(
            "creating {}x{} board, cell width {}px",
            settings.rows,
            settings.rows,
            settings.cell_width()
        );

        Self {
            board: Board::new(settings.rows, settings.cell_width()),
            settings,
            search: None,
            context: Context::default(),
        }
    }

    fn options(&self) -> DfsOptions {
        DfsOptions {
            replay_failed_branch: self.settings.replay_failed_branch,
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Hover(_) => return,
            Event::Paint(point) | Event::Erase(point) if self.search.is_some() => {
                debug!("ignoring edit at {} during search", point);
                return;
            }
            Event::Paint(point) => {
                if self.board.paint(point).is_some() {
                    self.board.refresh_neighbors();
                }
            }
            Event::Erase(point) => {
                if self.board.erase(point) {
                    self.board.refresh_neighbors();
                }
            }
            Event::Command(command) => self.handle_command(command),
        }

        self.context.request_repaint();
    }

    fn handle_command(&mut self, command: Command) {
        if self.search.is_some() && !command.allowed_while_searching() {
            self.context
                .set_output(format!("{} is not available during a search", command.label()));
            return;
        }

        match command {
            Command::Run => {
                self.start_search();
            }
            Command::Step => {
                if self.search.is_some() || self.start_search() {
                    self.advance(1);
                }
            }
            Command::Finish => {
                if self.search.is_some() || self.start_search() {
                    self.advance(usize::MAX);
                }
            }
            Command::Cancel => {
                if let Some(dfs) = &mut self.search {
                    dfs.cancel();
                    // apply right away, auto step might be off
                    self.advance(1);
                }
            }
            Command::ClearSearch => {
                self.board.clear_search();
                self.context.set_output("");
            }
            Command::Reset => {
                if self.board.rows() == self.settings.rows
                    && self.board.grid().width() == self.settings.cell_width()
                {
                    self.board.clear();
                } else {
                    self.board = Board::new(self.settings.rows, self.settings.cell_width());
                }
                self.board.refresh_neighbors();
                self.context.set_output("");
            }
        }
    }

    /// Starts a new search on the current board, returns false if the input was rejected
    fn start_search(&mut self) -> bool {
        match self.board.search(self.options()) {
            Ok(dfs) => {
                self.search = Some(dfs);
                self.context.set_output("Searching...");
                true
            }
            Err(e) => {
                warn!("cannot start search: {}", e);
                self.context.set_output(e.to_string());
                false
            }
        }
    }

    /// Advances the running search by up to `steps` redraws
    fn advance(&mut self, steps: usize) {
        let Some(dfs) = self.search.as_mut() else {
            return;
        };

        for _ in 0..steps {
            if self.board.step(dfs) == Step::Done {
                break;
            }
        }

        let done = dfs.is_done();
        self.context.set_output(report(dfs));
        self.context.request_repaint();

        if done {
            info!("{}", self.context.output());
            self.search = None;
        }
    }

    fn side_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("DFS Pathfinder");
        ui.label("Left click: start, end, then barriers. Right click: erase.");
        ui.separator();

        let searching = self.search.is_some();
        ui.horizontal_wrapped(|ui| {
            for command in Command::iterate() {
                let enabled = if searching {
                    command.allowed_while_searching()
                } else {
                    command != Command::Cancel
                };
                let button = ui
                    .add_enabled(enabled, egui::Button::new(command.label()))
                    .on_hover_text(format!("Key: {}", command.key().name()));
                if button.clicked() {
                    self.context.push_event(Event::Command(command));
                }
            }
        });

        ui.checkbox(&mut self.settings.auto_step, "Auto step");
        ui.add(
            egui::Slider::new(&mut self.settings.steps_per_frame, 1..=100).text("Steps per frame"),
        );
        ui.checkbox(
            &mut self.settings.replay_failed_branch,
            "Replay last branch on failure",
        );
        ui.checkbox(&mut self.settings.draw_grid_lines, "Draw grid lines");
        ui.checkbox(&mut self.settings.draw_neighbors, "Draw neighbors");
        ui.add(egui::Slider::new(&mut self.settings.rows, 2..=100).text("Rows (on reset)"));

        ui.separator();
        if let Some(point) = self.context.hovered() {
            if let Some(cell) = self.board.grid().cell_at(point.row, point.col) {
                ui.label(format!(
                    "Cell {}: {:?}, {} neighbors",
                    point,
                    cell.classify(),
                    cell.neighbors().len()
                ));
            }
        }
        ui.label(self.context.output());

        ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
            powered_by_egui_and_eframe(ui);
            egui::warn_if_debug_build(ui);
        });
    }

    fn grid_panel(&mut self, ui: &mut egui::Ui) {
        let grid = self.board.grid();
        let width = grid.width() as f32;
        let extent = grid.rows() as f32 * width;

        let (response, painter) =
            ui.allocate_painter(Vec2::splat(extent), egui::Sense::click_and_drag());
        let origin = response.rect.min;

        // translate the pointer into a cell, the drawing area starts at `origin`
        let hovered = response.hover_pos().and_then(|pos| {
            let offset = pos - origin;
            if offset.x < 0.0 || offset.y < 0.0 {
                return None;
            }
            grid.point_at_pixel((offset.x as u32, offset.y as u32))
        });

        for cell in grid.cells() {
            let rect = Rect::from_min_size(
                origin + Vec2::new(cell.x() as f32, cell.y() as f32),
                Vec2::splat(width),
            );
            painter.rect_filled(rect, 0.0, state_color(cell.classify()));
        }

        if self.settings.draw_grid_lines {
            let stroke = Stroke::new(1.0, GRID_LINE_COLOR);
            for i in 0..=grid.rows() {
                let offset = i as f32 * width;
                painter.line_segment(
                    [origin + Vec2::new(0.0, offset), origin + Vec2::new(extent, offset)],
                    stroke,
                );
                painter.line_segment(
                    [origin + Vec2::new(offset, 0.0), origin + Vec2::new(offset, extent)],
                    stroke,
                );
            }
        }

        if self.settings.draw_neighbors {
            if let Some(point) = hovered {
                draw_neighbors(&painter, origin, width, point, &self.board);
            }
        }

        self.context.push_event(Event::Hover(hovered));
        if let Some(point) = hovered {
            let (primary, secondary) =
                ui.input(|i| (i.pointer.primary_down(), i.pointer.secondary_down()));
            if primary {
                self.context.push_event(Event::Paint(point));
            } else if secondary {
                self.context.push_event(Event::Erase(point));
            }
        }
    }
}

fn report(dfs: &Dfs) -> String {
    match dfs.state() {
        SearchState::Searching => format!(
            "Searching... {} expanded, {} on the stack",
            dfs.expanded(),
            dfs.stack_len()
        ),
        SearchState::PathFound(result) => format!(
            "Path found: {} cells, {} expanded, {} frames",
            result.path.len(),
            dfs.expanded(),
            dfs.frames()
        ),
        SearchState::NoPathFound => format!(
            "No path found: {} expanded, {} frames",
            dfs.expanded(),
            dfs.frames()
        ),
        SearchState::Cancelled => match dfs.outcome() {
            Some(Err(e)) => e.to_string(),
            _ => "Cancelled".to_string(),
        },
    }
}

fn cell_center(origin: Pos2, width: f32, point: Point) -> Pos2 {
    origin + Vec2::new(point.row as f32 + 0.5, point.col as f32 + 0.5) * width
}

/// Draws lines to the cached neighbors of the hovered cell
fn draw_neighbors(painter: &egui::Painter, origin: Pos2, width: f32, point: Point, board: &Board) {
    let Some(cell) = board.grid().cell_at(point.row, point.col) else {
        return;
    };

    let color = Color32::GREEN;
    let center = cell_center(origin, width, point);
    let padding = 0.3 * width;

    for neighbor in cell.neighbors() {
        let target = cell_center(origin, width, *neighbor);
        painter.line_segment([center, target], Stroke::new(2.0, color));
        painter.rect_filled(
            Rect::from_center_size(target, Vec2::splat(width - 2.0 * padding)),
            0.0,
            color,
        );
    }
}

impl eframe::App for App {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let pressed: Vec<Command> = ctx.input(|i| {
            Command::iterate()
                .filter(|command| i.key_pressed(command.key()))
                .collect()
        });
        for command in pressed {
            self.context.push_event(Event::Command(command));
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.add_space(16.0);

                egui::widgets::global_dark_light_mode_buttons(ui);
            });
        });

        egui::SidePanel::left("side_panel").show(ctx, |ui| self.side_panel(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.grid_panel(ui));

        while let Some(event) = self.context.pop_event() {
            self.handle_event(event);
        }

        // pacing depends only on the number of redraws, not on time
        if self.search.is_some() && self.settings.auto_step {
            self.advance(self.settings.steps_per_frame);
        }

        if self.context.is_repaint_requested() {
            ctx.request_repaint();
        }
    }
}

fn powered_by_egui_and_eframe(ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        ui.label("Powered by ");
        ui.hyperlink_to("egui", "https://github.com/emilk/egui");
        ui.label(" and ");
        ui.hyperlink_to(
            "eframe",
            "https://github.com/emilk/egui/tree/master/crates/eframe",
        );
        ui.label(".");
    });
}
