//! Page scroll tracking and region progress.

use serde::{Deserialize, Serialize};

use crate::ambient::{channel, Publisher, Reader};
use crate::geometry::{Rect, Viewport};

/// Offset past which the navigation chrome switches treatment.
pub const DEFAULT_SCROLL_THRESHOLD: f32 = 50.0;

/// Current page scroll offset and whether it is past the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScrollState {
    pub offset: f32,
    pub past_threshold: bool,
}

impl ScrollState {
    /// No hysteresis: strictly greater than `threshold`.
    pub fn at(offset: f32, threshold: f32) -> Self {
        Self {
            offset,
            past_threshold: offset > threshold,
        }
    }
}

/// Visual treatment of the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavTreatment {
    Transparent,
    /// Translucent background with backdrop blur.
    Blurred,
}

impl From<ScrollState> for NavTreatment {
    fn from(state: ScrollState) -> Self {
        if state.past_threshold {
            NavTreatment::Blurred
        } else {
            NavTreatment::Transparent
        }
    }
}

/// Republishes scroll events as ambient [`ScrollState`]. Only reads the
/// offset it is handed; never touches layout.
#[derive(Debug)]
pub struct ScrollTracker {
    publisher: Publisher<ScrollState>,
    threshold: f32,
    attached: bool,
}

impl ScrollTracker {
    pub fn new(threshold: f32) -> Self {
        let (publisher, _) = channel(ScrollState::at(0.0, threshold));
        Self {
            publisher,
            threshold,
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

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Returns the published state, or `None` while detached.
    pub fn on_scroll(&self, offset: f32) -> Option<ScrollState> {
        if !self.attached {
            return None;
        }
        let state = ScrollState::at(offset, self.threshold);
        self.publisher.publish(state);
        Some(state)
    }

    pub fn state(&self) -> ScrollState {
        self.publisher.current()
    }

    pub fn nav_treatment(&self) -> NavTreatment {
        self.state().into()
    }

    pub fn reader(&self) -> Reader<ScrollState> {
        self.publisher.reader()
    }
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_THRESHOLD)
    }
}

/// Reference edge of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Start,
    Center,
    End,
}

impl Edge {
    fn fraction(self) -> f32 {
        match self {
            Edge::Start => 0.0,
            Edge::Center => 0.5,
            Edge::End => 1.0,
        }
    }
}

/// "When this edge of the region meets that edge of the viewport".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgePair {
    pub target: Edge,
    pub container: Edge,
}

impl EdgePair {
    pub const fn new(target: Edge, container: Edge) -> Self {
        Self { target, container }
    }

    /// Scroll offset at which the two edges line up.
    fn scroll_position(&self, region: &Rect, viewport: &Viewport) -> f32 {
        region.top() + self.target.fraction() * region.height
            - self.container.fraction() * viewport.height
    }
}

/// Start/end reference pair that defines progress 0 and progress 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollOffsets {
    pub start: EdgePair,
    pub end: EdgePair,
}

impl ScrollOffsets {
    /// Progress runs from the region's top at the viewport top to the
    /// region's bottom at the viewport top.
    pub const REGION_EXIT_TOP: ScrollOffsets = ScrollOffsets {
        start: EdgePair::new(Edge::Start, Edge::Start),
        end: EdgePair::new(Edge::End, Edge::Start),
    };

    /// Ratio in `[0, 1]` of how far `viewport` has scrolled through `region`.
    pub fn progress(&self, region: &Rect, viewport: &Viewport) -> f32 {
        let start = self.start.scroll_position(region, viewport);
        let end = self.end.scroll_position(region, viewport);
        let span = end - start;
        if span.abs() <= f32::EPSILON {
            return if viewport.scroll_y >= end { 1.0 } else { 0.0 };
        }
        ((viewport.scroll_y - start) / span).clamp(0.0, 1.0)
    }
}

impl Default for ScrollOffsets {
    fn default() -> Self {
        Self::REGION_EXIT_TOP
    }
}
