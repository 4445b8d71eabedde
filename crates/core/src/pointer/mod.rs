use serde::Serialize;

use crate::ambient::{channel, Publisher, Reader};

/// Last known pointer position in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

impl PointerState {
    /// Custom properties consumed by the radial spotlight layer.
    pub fn spotlight_properties(&self) -> [(&'static str, String); 2] {
        [
            ("--mouse-x", format!("{}px", self.x)),
            ("--mouse-y", format!("{}px", self.y)),
        ]
    }
}

/// Republishes pointer-move events as ambient [`PointerState`].
///
/// Events are only accepted between [`attach`](Self::attach) and
/// [`detach`](Self::detach); outside that window the tracker behaves as an
/// unregistered listener.
#[derive(Debug)]
pub struct PointerTracker {
    publisher: Publisher<PointerState>,
    attached: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        let (publisher, _) = channel(PointerState::default());
        Self {
            publisher,
            attached: false,
        }
    }

    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Returns `false` when the event was ignored because the tracker is
    /// detached.
    pub fn on_pointer_move(&self, x: f32, y: f32) -> bool {
        if !self.attached {
            return false;
        }
        self.publisher.publish(PointerState { x, y });
        true
    }

    pub fn state(&self) -> PointerState {
        self.publisher.current()
    }

    pub fn reader(&self) -> Reader<PointerState> {
        self.publisher.reader()
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publishes_only_while_attached() {
        let mut tracker = PointerTracker::new();
        let reader = tracker.reader();

        assert!(!tracker.on_pointer_move(10.0, 10.0));
        assert_eq!(reader.get(), PointerState::default());

        tracker.attach();
        assert!(tracker.on_pointer_move(120.0, 48.5));
        tracker.on_pointer_move(121.0, 50.0);
        assert_eq!(reader.get(), PointerState { x: 121.0, y: 50.0 });

        tracker.detach();
        tracker.on_pointer_move(0.0, 0.0);
        assert_eq!(tracker.state(), PointerState { x: 121.0, y: 50.0 });
    }

    #[test]
    fn formats_spotlight_properties() {
        let state = PointerState { x: 12.0, y: 340.5 };
        let [x, y] = state.spotlight_properties();
        assert_eq!(x, ("--mouse-x", "12px".to_string()));
        assert_eq!(y, ("--mouse-y", "340.5px".to_string()));
    }
}
