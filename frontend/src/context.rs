use std::collections::VecDeque;

use log::debug;
use pathfind::Point;

use crate::event::Event;

/// Collects the events of one UI frame and the feedback shown to the user
#[derive(Debug, Default)]
pub struct Context {
    events: VecDeque<Event>,
    output: String,
    hovered: Option<Point>,
    repaint_requested: bool,
}

impl Context {
    pub fn push_event(&mut self, event: Event) {
        // hover updates arrive every frame
        if !matches!(event, Event::Hover(_)) {
            debug!("pushing event: {:?}", event);
        }
        if let Event::Hover(point) = event {
            self.hovered = point;
        }
        self.events.push_back(event);
    }

    pub fn pop_event(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    pub fn set_output(&mut self, output: impl Into<String>) {
        self.output = output.into();
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn hovered(&self) -> Option<Point> {
        self.hovered
    }

    pub fn request_repaint(&mut self) {
        self.repaint_requested = true;
    }

    /// Returns whether a repaint was requested and clears the request
    pub fn is_repaint_requested(&mut self) -> bool {
        std::mem::take(&mut self.repaint_requested)
    }
}
