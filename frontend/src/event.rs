use pathfind::Point;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Command(Command),
    /// main button held over a cell
    Paint(Point),
    /// secondary button held over a cell
    Erase(Point),
    Hover(Option<Point>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Run,
    Step,
    Finish,
    Cancel,
    ClearSearch,
    Reset,
}

impl Command {
    /// Label of the button in the side panel
    pub fn label(&self) -> &str {
        match self {
            Command::Run => "Run",
            Command::Step => "Step",
            Command::Finish => "Finish",
            Command::Cancel => "Cancel",
            Command::ClearSearch => "Clear search",
            Command::Reset => "Reset",
        }
    }

    /// iterates over all commands
    pub fn iterate() -> impl Iterator<Item = Command> {
        [
            Command::Run,
            Command::Step,
            Command::Finish,
            Command::Cancel,
            Command::ClearSearch,
            Command::Reset,
        ]
        .iter()
        .copied()
    }

    pub fn from_key(key: egui::Key) -> Option<Command> {
        match key {
            egui::Key::Space => Some(Command::Run),
            egui::Key::T => Some(Command::Step),
            egui::Key::F => Some(Command::Finish),
            egui::Key::Escape => Some(Command::Cancel),
            egui::Key::X => Some(Command::ClearSearch),
            egui::Key::C => Some(Command::Reset),
            _ => None,
        }
    }

    pub fn key(&self) -> egui::Key {
        match self {
            Command::Run => egui::Key::Space,
            Command::Step => egui::Key::T,
            Command::Finish => egui::Key::F,
            Command::Cancel => egui::Key::Escape,
            Command::ClearSearch => egui::Key::X,
            Command::Reset => egui::Key::C,
        }
    }

    /// Whether the command makes sense while a search is in progress
    pub fn allowed_while_searching(&self) -> bool {
        matches!(self, Command::Step | Command::Finish | Command::Cancel)
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_key_bindings_round_trip() {
        for command in Command::iterate() {
            assert_eq!(Command::from_key(command.key()), Some(command));
        }
        assert_eq!(Command::from_key(egui::Key::Q), None);
    }
}
