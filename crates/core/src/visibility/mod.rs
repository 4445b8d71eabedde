//! One-shot viewport entry detection.
//!
//! A [`VisibilityTrigger`] has two states and a single irreversible edge,
//! `NotYetSeen -> Seen`. Scrolling an element away and back never re-arms
//! it; only a fresh trigger (a remount) starts over.

use serde::Serialize;

use crate::geometry::{Rect, Viewport};
use crate::layout::{ElementKey, Layout};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityState {
    #[default]
    NotYetSeen,
    Seen,
}

/// The `NotYetSeen -> Seen` edge, with the instant it happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeenTransition {
    pub at_ms: f64,
}

#[derive(Debug, Clone)]
pub struct VisibilityTrigger {
    margin: f32,
    seen_at: Option<f64>,
}

impl VisibilityTrigger {
    /// `margin` shrinks the viewport on every side before testing.
    pub fn new(margin: f32) -> Self {
        Self {
            margin,
            seen_at: None,
        }
    }

    pub fn state(&self) -> VisibilityState {
        if self.seen_at.is_some() {
            VisibilityState::Seen
        } else {
            VisibilityState::NotYetSeen
        }
    }

    pub fn seen_at(&self) -> Option<f64> {
        self.seen_at
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Whether `element` (document space) overlaps the inset viewport.
    /// Zero-area elements count when they sit inside it.
    pub fn intersects(&self, element: &Rect, viewport: &Viewport) -> bool {
        viewport
            .to_viewport_space(element)
            .is_visible_in(&viewport.intersection_root(self.margin))
    }

    /// Feeds one intersection sample. Returns the transition only on the
    /// call that performs it; every later call is a no-op.
    pub fn observe(&mut self, element: &Rect, viewport: &Viewport, now_ms: f64) -> Option<SeenTransition> {
        if self.seen_at.is_some() || !self.intersects(element, viewport) {
            return None;
        }
        self.seen_at = Some(now_ms);
        Some(SeenTransition { at_ms: now_ms })
    }
}

/// Set of keyed triggers sharing one margin.
#[derive(Debug)]
pub struct VisibilityObserver {
    margin: f32,
    triggers: Vec<(ElementKey, VisibilityTrigger)>,
    connected: bool,
}

impl VisibilityObserver {
    pub fn new(margin: f32) -> Self {
        Self {
            margin,
            triggers: Vec::new(),
            connected: true,
        }
    }

    /// Starts tracking `key`. Already-tracked keys keep their state.
    pub fn observe(&mut self, key: ElementKey) {
        if !self.connected || self.triggers.iter().any(|(k, _)| *k == key) {
            return;
        }
        self.triggers.push((key, VisibilityTrigger::new(self.margin)));
    }

    /// Stops tracking `key` and forgets its state.
    pub fn unobserve(&mut self, key: &ElementKey) {
        self.triggers.retain(|(k, _)| k != key);
    }

    /// Drops every trigger; nothing fires afterwards.
    pub fn disconnect(&mut self) {
        self.triggers.clear();
        self.connected = false;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    pub fn state(&self, key: &ElementKey) -> Option<VisibilityState> {
        self.trigger(key).map(VisibilityTrigger::state)
    }

    pub fn seen_at(&self, key: &ElementKey) -> Option<f64> {
        self.trigger(key).and_then(VisibilityTrigger::seen_at)
    }

    /// Runs one intersection pass and returns the keys that became visible,
    /// in observation order. Keys without a layout rect are skipped.
    pub fn evaluate(&mut self, viewport: &Viewport, layout: &dyn Layout, now_ms: f64) -> Vec<ElementKey> {
        if !self.connected {
            return Vec::new();
        }
        let mut fired = Vec::new();
        for (key, trigger) in &mut self.triggers {
            let Some(rect) = layout.rect(key) else {
                continue;
            };
            if trigger.observe(&rect, viewport, now_ms).is_some() {
                tracing::debug!(%key, at_ms = now_ms, "element entered view");
                fired.push(key.clone());
            }
        }
        fired
    }

    fn trigger(&self, key: &ElementKey) -> Option<&VisibilityTrigger> {
        self.triggers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, trigger)| trigger)
    }
}
