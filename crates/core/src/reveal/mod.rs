//! Staggered one-shot reveals.
//!
//! A [`RevealSequencer`] owns an ordered list of children and decides, from
//! array position alone, how long each child waits before animating from its
//! hidden pose to its visible pose. It does not observe anything itself:
//! callers report visibility through [`RevealSequencer::reveal_all`]
//! (container flavor) or [`RevealSequencer::reveal_child`] (own-visibility
//! flavor).

use serde::{Deserialize, Serialize};

use crate::layout::ElementKey;
use crate::motion::{Pose, Variant};
use crate::{FolioError, Result};

/// `delay(i) = base_delay_ms + i * stagger_ms`.
///
/// Both parts are finite and the stagger is never negative, so delays are
/// non-decreasing in index order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleParts", into = "ScheduleParts")]
pub struct RevealSchedule {
    base_delay_ms: f64,
    stagger_ms: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ScheduleParts {
    base_delay_ms: f64,
    stagger_ms: f64,
}

impl RevealSchedule {
    pub fn new(base_delay_ms: f64, stagger_ms: f64) -> Result<Self> {
        if !base_delay_ms.is_finite() || !stagger_ms.is_finite() {
            return Err(FolioError::InvalidSchedule("delays must be finite"));
        }
        if stagger_ms < 0.0 {
            return Err(FolioError::InvalidSchedule("stagger must not be negative"));
        }
        Ok(Self::from_parts(base_delay_ms, stagger_ms))
    }

    /// Every child waits the same `delay_ms`. Non-finite delays collapse
    /// to zero.
    pub fn after(delay_ms: f64) -> Self {
        let delay_ms = if delay_ms.is_finite() { delay_ms } else { 0.0 };
        Self::from_parts(delay_ms, 0.0)
    }

    /// Unchecked; only for literal constants known to be valid.
    pub(crate) const fn from_parts(base_delay_ms: f64, stagger_ms: f64) -> Self {
        Self {
            base_delay_ms,
            stagger_ms,
        }
    }

    pub fn base_delay_ms(&self) -> f64 {
        self.base_delay_ms
    }

    pub fn stagger_ms(&self) -> f64 {
        self.stagger_ms
    }

    pub fn delay(&self, index: usize) -> f64 {
        self.base_delay_ms + index as f64 * self.stagger_ms
    }

    pub fn delays(&self, count: usize) -> impl Iterator<Item = f64> + '_ {
        (0..count).map(move |index| self.delay(index))
    }
}

impl TryFrom<ScheduleParts> for RevealSchedule {
    type Error = FolioError;

    fn try_from(parts: ScheduleParts) -> Result<Self> {
        Self::new(parts.base_delay_ms, parts.stagger_ms)
    }
}

impl From<RevealSchedule> for ScheduleParts {
    fn from(schedule: RevealSchedule) -> Self {
        Self {
            base_delay_ms: schedule.base_delay_ms,
            stagger_ms: schedule.stagger_ms,
        }
    }
}

/// Which visibility instant a child's delay is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StaggerMode {
    /// One trigger on the parent; every child shares its instant.
    Container,
    /// Each child has its own trigger and its own instant.
    OwnVisibility,
}

/// Where a child is in its entrance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealPhase {
    /// Not yet triggered.
    Hidden,
    /// Triggered, still inside its delay.
    Pending,
    Animating,
    Settled,
}

#[derive(Debug, Clone)]
pub struct RevealChild {
    pub key: ElementKey,
    pub variant: Variant,
}

impl RevealChild {
    pub fn new(key: ElementKey, variant: Variant) -> Self {
        Self { key, variant }
    }
}

/// Rendered state of one child at a given instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildFrame {
    pub key: ElementKey,
    pub index: usize,
    pub delay_ms: f64,
    pub phase: RevealPhase,
    pub pose: Pose,
}

#[derive(Debug, Clone)]
struct Sequenced {
    child: RevealChild,
    started_at: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct RevealSequencer {
    mode: StaggerMode,
    schedule: RevealSchedule,
    children: Vec<Sequenced>,
    cancelled: bool,
}

impl RevealSequencer {
    /// Children keyed by a shared container trigger.
    pub fn container(schedule: RevealSchedule, children: Vec<RevealChild>) -> Self {
        Self::with_mode(StaggerMode::Container, schedule, children)
    }

    /// Children keyed by their own triggers.
    pub fn own_visibility(schedule: RevealSchedule, children: Vec<RevealChild>) -> Self {
        Self::with_mode(StaggerMode::OwnVisibility, schedule, children)
    }

    fn with_mode(mode: StaggerMode, schedule: RevealSchedule, children: Vec<RevealChild>) -> Self {
        Self {
            mode,
            schedule,
            children: children
                .into_iter()
                .map(|child| Sequenced {
                    child,
                    started_at: None,
                })
                .collect(),
            cancelled: false,
        }
    }

    pub fn mode(&self) -> StaggerMode {
        self.mode
    }

    pub fn schedule(&self) -> RevealSchedule {
        self.schedule
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ElementKey> {
        self.children.iter().map(|entry| &entry.child.key)
    }

    pub fn delay(&self, index: usize) -> f64 {
        self.schedule.delay(index)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Starts every child at `at_ms`. Returns `false` if anything had
    /// already started or the sequencer was cancelled; a repeated call never
    /// restarts an entrance.
    pub fn reveal_all(&mut self, at_ms: f64) -> bool {
        if self.cancelled || self.children.iter().any(|entry| entry.started_at.is_some()) {
            return false;
        }
        for entry in &mut self.children {
            entry.started_at = Some(at_ms);
        }
        tracing::debug!(children = self.children.len(), at_ms, "container reveal started");
        true
    }

    /// Starts the child keyed `key` at `at_ms`. Idempotent per child.
    pub fn reveal_child(&mut self, key: &ElementKey, at_ms: f64) -> bool {
        if self.cancelled {
            return false;
        }
        let Some(entry) = self.children.iter_mut().find(|entry| entry.child.key == *key) else {
            return false;
        };
        if entry.started_at.is_some() {
            return false;
        }
        entry.started_at = Some(at_ms);
        tracing::debug!(%key, at_ms, "child reveal started");
        true
    }

    /// Routes a visibility edge according to the stagger mode: any key
    /// starts a container sequencer, only a child's own key starts an
    /// own-visibility child.
    pub fn on_seen(&mut self, key: &ElementKey, at_ms: f64) -> bool {
        match self.mode {
            StaggerMode::Container => self.reveal_all(at_ms),
            StaggerMode::OwnVisibility => self.reveal_child(key, at_ms),
        }
    }

    /// Cancels pending and running entrances. Children freeze in their
    /// hidden pose and can no longer be started.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        for entry in &mut self.children {
            entry.started_at = None;
        }
    }

    pub fn frames(&self, now_ms: f64) -> Vec<ChildFrame> {
        self.children
            .iter()
            .enumerate()
            .map(|(index, entry)| self.frame_for(index, entry, now_ms))
            .collect()
    }

    pub fn frame(&self, index: usize, now_ms: f64) -> Option<ChildFrame> {
        self.children
            .get(index)
            .map(|entry| self.frame_for(index, entry, now_ms))
    }

    /// True once every child has finished animating.
    pub fn is_settled(&self, now_ms: f64) -> bool {
        self.frames(now_ms)
            .iter()
            .all(|frame| frame.phase == RevealPhase::Settled)
    }

    fn frame_for(&self, index: usize, entry: &Sequenced, now_ms: f64) -> ChildFrame {
        let delay_ms = self.schedule.delay(index);
        let variant = &entry.child.variant;
        let (phase, pose) = match entry.started_at {
            None => (RevealPhase::Hidden, variant.hidden),
            Some(start) => {
                let elapsed = (now_ms - start).max(0.0);
                let phase = if elapsed < delay_ms {
                    RevealPhase::Pending
                } else if elapsed < delay_ms + variant.duration_ms {
                    RevealPhase::Animating
                } else {
                    RevealPhase::Settled
                };
                (phase, variant.pose_at(elapsed, delay_ms))
            }
        };
        ChildFrame {
            key: entry.child.key.clone(),
            index,
            delay_ms,
            phase,
            pose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(base_delay_ms: f64, stagger_ms: f64) -> RevealSchedule {
        RevealSchedule::new(base_delay_ms, stagger_ms).unwrap()
    }

    fn children(names: &[&str]) -> Vec<RevealChild> {
        names
            .iter()
            .map(|name| RevealChild::new(ElementKey::new(*name), Variant::fade_in_up(40.0, 800.0)))
            .collect()
    }

    #[test]
    fn delays_are_strictly_increasing() {
        let schedule = schedule(200.0, 150.0);
        let delays: Vec<f64> = schedule.delays(5).collect();
        assert_eq!(delays, vec![200.0, 350.0, 500.0, 650.0, 800.0]);
        assert!(delays.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn children_stay_hidden_until_revealed() {
        let sequencer = RevealSequencer::container(schedule(200.0, 150.0), children(&["a", "b"]));
        for frame in sequencer.frames(10_000.0) {
            assert_eq!(frame.phase, RevealPhase::Hidden);
            assert_eq!(frame.pose, Pose::hidden_below(40.0));
        }
    }

    #[test]
    fn container_children_share_instant() {
        let schedule = schedule(200.0, 150.0);
        let mut sequencer = RevealSequencer::container(schedule, children(&["a", "b", "c"]));
        assert!(sequencer.reveal_all(1_000.0));

        let frames = sequencer.frames(1_300.0);
        for (index, frame) in frames.iter().enumerate() {
            assert_eq!(frame.delay_ms, 200.0 + index as f64 * 150.0);
        }
        assert_eq!(frames[0].phase, RevealPhase::Animating);
        assert_eq!(frames[1].phase, RevealPhase::Pending);
        assert_eq!(frames[2].phase, RevealPhase::Pending);
        assert!(sequencer.is_settled(1_000.0 + 500.0 + 800.0));
    }

    #[test]
    fn repeated_reveal_does_not_restart() {
        let mut sequencer = RevealSequencer::container(schedule(0.0, 100.0), children(&["a"]));
        assert!(sequencer.reveal_all(0.0));
        assert!(!sequencer.reveal_all(5_000.0));
        assert!(!sequencer.on_seen(&ElementKey::new("a"), 5_000.0));
        assert_eq!(sequencer.frame(0, 900.0).unwrap().phase, RevealPhase::Settled);
    }

    #[test]
    fn own_visibility_children_use_their_own_instant() {
        let mut sequencer = RevealSequencer::own_visibility(schedule(0.0, 150.0), children(&["a", "b"]));
        assert!(sequencer.on_seen(&ElementKey::new("a"), 0.0));
        assert!(!sequencer.on_seen(&ElementKey::new("missing"), 0.0));

        let frames = sequencer.frames(2_000.0);
        assert_eq!(frames[0].phase, RevealPhase::Settled);
        assert_eq!(frames[1].phase, RevealPhase::Hidden);

        assert!(sequencer.reveal_child(&ElementKey::new("b"), 2_000.0));
        assert!(!sequencer.reveal_child(&ElementKey::new("b"), 2_100.0));
        let late = sequencer.frame(1, 2_100.0).unwrap();
        assert_eq!(late.phase, RevealPhase::Pending);
        assert_eq!(late.delay_ms, 150.0);
    }

    #[test]
    fn reordering_input_reorders_delays() {
        let mut forward = RevealSequencer::container(schedule(0.0, 100.0), children(&["a", "b"]));
        let mut reversed = RevealSequencer::container(schedule(0.0, 100.0), children(&["b", "a"]));
        forward.reveal_all(0.0);
        reversed.reveal_all(0.0);

        let delay_of = |s: &RevealSequencer, key: &str| {
            s.frames(0.0)
                .into_iter()
                .find(|f| f.key.as_str() == key)
                .map(|f| f.delay_ms)
        };
        assert_eq!(delay_of(&forward, "a"), Some(0.0));
        assert_eq!(delay_of(&reversed, "a"), Some(100.0));
    }

    #[test]
    fn cancel_freezes_hidden() {
        let mut sequencer = RevealSequencer::container(schedule(0.0, 100.0), children(&["a", "b"]));
        sequencer.reveal_all(0.0);
        sequencer.cancel();

        assert!(sequencer.is_cancelled());
        assert!(!sequencer.reveal_all(10.0));
        assert!(sequencer
            .frames(5_000.0)
            .iter()
            .all(|frame| frame.phase == RevealPhase::Hidden));
    }

    #[test]
    fn schedule_rejects_unordered_delays() {
        assert!(matches!(
            RevealSchedule::new(0.0, -150.0),
            Err(FolioError::InvalidSchedule(_))
        ));
        assert!(RevealSchedule::new(f64::NAN, 100.0).is_err());
        assert!(RevealSchedule::new(0.0, f64::INFINITY).is_err());
        assert_eq!(RevealSchedule::new(300.0, 0.0).unwrap().delay(4), 300.0);
        assert_eq!(RevealSchedule::after(f64::NAN).delay(1), 0.0);
    }
}
