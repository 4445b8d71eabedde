use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Viewport};
use crate::motion::{lerp, Pose, Property};
use crate::scroll::ScrollOffsets;
use crate::{FolioError, Result};

/// A `(progress, value)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub progress: f32,
    pub value: f32,
}

impl Breakpoint {
    pub const fn new(progress: f32, value: f32) -> Self {
        Self { progress, value }
    }
}

/// Piecewise-linear curve over scroll progress. Clamps outside its first and
/// last breakpoints; never extrapolates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Breakpoint>", into = "Vec<Breakpoint>")]
pub struct Interpolation {
    points: Vec<Breakpoint>,
}

impl Interpolation {
    /// Requires at least two finite breakpoints with strictly increasing
    /// progress.
    pub fn new(points: Vec<Breakpoint>) -> Result<Self> {
        if points.len() < 2 {
            return Err(FolioError::InvalidBreakpoints(
                "at least two breakpoints are required",
            ));
        }
        if points
            .iter()
            .any(|p| !p.progress.is_finite() || !p.value.is_finite())
        {
            return Err(FolioError::InvalidBreakpoints(
                "breakpoints must be finite",
            ));
        }
        if points.windows(2).any(|w| w[1].progress <= w[0].progress) {
            return Err(FolioError::InvalidBreakpoints(
                "breakpoint progress must be strictly increasing",
            ));
        }
        Ok(Self { points })
    }

    /// Two-point curve mapping `input` onto `output`.
    pub fn linear(input: [f32; 2], output: [f32; 2]) -> Result<Self> {
        Self::new(vec![
            Breakpoint::new(input[0], output[0]),
            Breakpoint::new(input[1], output[1]),
        ])
    }

    pub fn points(&self) -> &[Breakpoint] {
        &self.points
    }

    pub fn sample(&self, progress: f32) -> f32 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if progress.is_nan() || progress <= first.progress {
            return first.value;
        }
        if progress >= last.progress {
            return last.value;
        }

        for window in self.points.windows(2) {
            let (a, b) = (window[0], window[1]);
            if progress <= b.progress {
                let t = (progress - a.progress) / (b.progress - a.progress);
                return lerp(a.value, b.value, t);
            }
        }
        last.value
    }
}

impl TryFrom<Vec<Breakpoint>> for Interpolation {
    type Error = FolioError;

    fn try_from(points: Vec<Breakpoint>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<Interpolation> for Vec<Breakpoint> {
    fn from(curve: Interpolation) -> Self {
        curve.points
    }
}

/// A property driven by a curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformTrack {
    pub property: Property,
    pub curve: Interpolation,
}

/// Region reference plus tracked properties, as stored in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    #[serde(default)]
    pub offsets: ScrollOffsets,
    pub tracks: Vec<TransformTrack>,
}

impl TransformConfig {
    /// Drift down 200px over the whole region and fade out by its midpoint.
    pub fn hero() -> Self {
        Self {
            offsets: ScrollOffsets::REGION_EXIT_TOP,
            tracks: vec![
                TransformTrack {
                    property: Property::TranslateY,
                    curve: Interpolation {
                        points: vec![Breakpoint::new(0.0, 0.0), Breakpoint::new(1.0, 200.0)],
                    },
                },
                TransformTrack {
                    property: Property::Opacity,
                    curve: Interpolation {
                        points: vec![Breakpoint::new(0.0, 1.0), Breakpoint::new(0.5, 0.0)],
                    },
                },
            ],
        }
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self::hero()
    }
}

/// Maps scroll progress through a region onto visual properties.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollLinkedTransform {
    offsets: ScrollOffsets,
    tracks: Vec<TransformTrack>,
}

impl ScrollLinkedTransform {
    pub fn new(offsets: ScrollOffsets) -> Self {
        Self {
            offsets,
            tracks: Vec::new(),
        }
    }

    pub fn from_config(config: &TransformConfig) -> Self {
        Self {
            offsets: config.offsets,
            tracks: config.tracks.clone(),
        }
    }

    /// Adds or replaces the curve for `property`.
    pub fn with_track(mut self, property: Property, curve: Interpolation) -> Self {
        self.tracks.retain(|track| track.property != property);
        self.tracks.push(TransformTrack { property, curve });
        self
    }

    pub fn progress(&self, region: &Rect, viewport: &Viewport) -> f32 {
        self.offsets.progress(region, viewport)
    }

    pub fn sample(&self, property: Property, progress: f32) -> Option<f32> {
        self.tracks
            .iter()
            .find(|track| track.property == property)
            .map(|track| track.curve.sample(progress))
    }

    /// `base` with every tracked property overwritten at `progress`.
    pub fn apply(&self, progress: f32, base: Pose) -> Pose {
        let mut pose = base;
        for track in &self.tracks {
            pose.set(track.property, track.curve.sample(progress));
        }
        pose
    }

    /// Convenience: progress of `viewport` through `region`, then
    /// [`apply`](Self::apply).
    pub fn pose_for(&self, region: &Rect, viewport: &Viewport, base: Pose) -> Pose {
        self.apply(self.progress(region, viewport), base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero() -> ScrollLinkedTransform {
        ScrollLinkedTransform::from_config(&TransformConfig::hero())
    }

    #[test]
    fn opacity_reaches_zero_at_midpoint() {
        let transform = hero();
        assert_eq!(transform.sample(Property::Opacity, 0.0), Some(1.0));
        let quarter = transform.sample(Property::Opacity, 0.25).unwrap();
        assert!((quarter - 0.5).abs() < 1e-6);
        assert_eq!(transform.sample(Property::Opacity, 0.5), Some(0.0));
        assert_eq!(transform.sample(Property::Opacity, 0.9), Some(0.0));
    }

    #[test]
    fn clamps_instead_of_extrapolating() {
        let transform = hero();
        assert_eq!(transform.sample(Property::TranslateY, -0.5), Some(0.0));
        assert_eq!(transform.sample(Property::TranslateY, 1.7), Some(200.0));
        assert_eq!(transform.sample(Property::Opacity, -1.0), Some(1.0));
        assert_eq!(transform.sample(Property::Scale, 0.5), None);
    }

    #[test]
    fn multi_segment_curves() {
        let curve = Interpolation::new(vec![
            Breakpoint::new(0.0, 0.0),
            Breakpoint::new(0.5, 10.0),
            Breakpoint::new(1.0, 0.0),
        ])
        .unwrap();
        assert_eq!(curve.sample(0.25), 5.0);
        assert_eq!(curve.sample(0.75), 5.0);
    }

    #[test]
    fn rejects_unusable_breakpoints() {
        assert!(Interpolation::linear([0.5, 0.5], [0.0, 1.0]).is_err());
        assert!(Interpolation::new(vec![Breakpoint::new(0.0, 1.0)]).is_err());
        assert!(Interpolation::linear([0.0, f32::NAN], [0.0, 1.0]).is_err());

        let parsed: std::result::Result<Interpolation, _> =
            serde_json::from_str(r#"[{"progress":1.0,"value":0.0},{"progress":0.0,"value":1.0}]"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn applies_region_progress_to_pose() {
        let transform = hero();
        let region = Rect::new(0.0, 0.0, 1280.0, 800.0);
        let viewport = Viewport::new(1280.0, 800.0).scrolled_to(200.0);

        let pose = transform.pose_for(&region, &viewport, Pose::VISIBLE);
        assert!((pose.translate_y - 50.0).abs() < 1e-4);
        assert!((pose.opacity - 0.5).abs() < 1e-4);
        assert_eq!(pose.scale, 1.0);
    }
}
