//! Host input events and per-effect buffering
//!
//! Host callbacks arrive unordered with respect to frames. They are buffered
//! here and handed to the simulator as one `TickInput` at the next tick.

use glam::Vec2;

/// Events the host delivers to the stage
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Pointer position in viewport pixels
    PointerMove { x: f32, y: f32 },
    PointerDown,
    PointerUp,
    /// Completed click at a position (ripples)
    Click { x: f32, y: f32 },
    /// Pointer entered an interactive element (links, buttons)
    HoverEnter,
    /// Window resized
    Resize { width: f32, height: f32 },
    /// Vertical scroll offset of the page
    Scroll { offset: f32 },
    /// A page section became visible or hidden
    Visibility {
        section: String,
        visible: bool,
        items: usize,
    },
}

/// Input snapshot for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer-move samples since the previous tick, oldest first
    pub pointer_samples: Vec<Vec2>,
    /// Latest known pointer position
    pub pointer: Option<Vec2>,
    /// Pointer button held
    pub pressed: bool,
    /// Pointer-down edges since the previous tick
    pub pointer_downs: u32,
    /// Click positions since the previous tick
    pub clicks: Vec<Vec2>,
    /// Hover-enter edges since the previous tick
    pub hover_enters: u32,
}

/// Accumulates events between ticks
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    pending: TickInput,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event. Resize, scroll and visibility are stage concerns and
    /// ignored here.
    pub fn push(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerMove { x, y } => {
                let pos = Vec2::new(x, y);
                self.pending.pointer_samples.push(pos);
                self.pending.pointer = Some(pos);
            }
            InputEvent::PointerDown => {
                self.pending.pressed = true;
                self.pending.pointer_downs += 1;
            }
            InputEvent::PointerUp => self.pending.pressed = false,
            InputEvent::Click { x, y } => self.pending.clicks.push(Vec2::new(x, y)),
            InputEvent::HoverEnter => self.pending.hover_enters += 1,
            InputEvent::Resize { .. }
            | InputEvent::Scroll { .. }
            | InputEvent::Visibility { .. } => {}
        }
    }

    /// Hand the buffered input to one tick. One-shot fields are cleared;
    /// pointer position and button state persist.
    pub fn take(&mut self) -> TickInput {
        let persistent = TickInput {
            pointer: self.pending.pointer,
            pressed: self.pending.pressed,
            ..Default::default()
        };
        std::mem::replace(&mut self.pending, persistent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_clears_one_shots() {
        let mut buffer = InputBuffer::new();
        buffer.push(&InputEvent::PointerMove { x: 1.0, y: 2.0 });
        buffer.push(&InputEvent::PointerMove { x: 3.0, y: 4.0 });
        buffer.push(&InputEvent::PointerDown);
        buffer.push(&InputEvent::Click { x: 3.0, y: 4.0 });

        let first = buffer.take();
        assert_eq!(first.pointer_samples.len(), 2);
        assert_eq!(first.pointer_downs, 1);
        assert_eq!(first.clicks.len(), 1);
        assert!(first.pressed);

        let second = buffer.take();
        assert!(second.pointer_samples.is_empty());
        assert_eq!(second.pointer_downs, 0);
        assert!(second.clicks.is_empty());
        assert_eq!(second.pointer, Some(Vec2::new(3.0, 4.0)));
        assert!(second.pressed);
    }

    #[test]
    fn test_pointer_up_releases() {
        let mut buffer = InputBuffer::new();
        buffer.push(&InputEvent::PointerDown);
        buffer.push(&InputEvent::PointerUp);
        let input = buffer.take();
        assert!(!input.pressed);
        assert_eq!(input.pointer_downs, 1);
    }
}
