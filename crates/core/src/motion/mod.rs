//! Plain-data animation descriptions.
//!
//! Poses, easing curves and per-property animation specs carry no reference
//! to a display surface. Sequencers decide *when* a spec starts; the spec
//! itself only answers "what is the value `n` milliseconds in".

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 24;
const SOLVE_EPSILON: f32 = 1e-5;

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Timing curve applied to normalised animation progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Easing {
    Linear,
    /// Sinusoidal ease-in-out.
    EaseInOut,
    /// CSS-style cubic bezier with fixed endpoints at (0,0) and (1,1).
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Easing {
    /// Fast-out, long settle curve used for every reveal on the site.
    pub const EXPO_OUT: Easing = Easing::CubicBezier {
        x1: 0.16,
        y1: 1.0,
        x2: 0.3,
        y2: 1.0,
    };

    /// Apply the easing function to a progress value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseInOut => 0.5 - 0.5 * (PI * t).cos(),
            Easing::CubicBezier { x1, y1, x2, y2 } => {
                if t <= 0.0 || t >= 1.0 {
                    return t;
                }
                let s = solve_curve_x(t, x1, x2);
                bezier_component(s, y1, y2)
            }
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Self::EXPO_OUT
    }
}

fn bezier_component(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Finds the curve parameter whose x coordinate equals `x`.
fn solve_curve_x(x: f32, x1: f32, x2: f32) -> f32 {
    let mut s = x;
    for _ in 0..NEWTON_ITERATIONS {
        let error = bezier_component(s, x1, x2) - x;
        if error.abs() < SOLVE_EPSILON {
            return s;
        }
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        s = (s - error / slope).clamp(0.0, 1.0);
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    s = x;
    for _ in 0..BISECTION_ITERATIONS {
        let value = bezier_component(s, x1, x2);
        if (value - x).abs() < SOLVE_EPSILON {
            break;
        }
        if value < x {
            lo = s;
        } else {
            hi = s;
        }
        s = 0.5 * (lo + hi);
    }
    s
}

/// Animatable visual property. All of them are compositor-friendly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Opacity,
    TranslateY,
    Scale,
}

impl Property {
    pub const ALL: [Property; 3] = [Property::Opacity, Property::TranslateY, Property::Scale];
}

/// Snapshot of every animatable property for one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pose {
    pub opacity: f32,
    pub translate_y: f32,
    pub scale: f32,
}

impl Pose {
    pub const VISIBLE: Pose = Pose {
        opacity: 1.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    /// Zero opacity pushed down by `offset` pixels.
    pub fn hidden_below(offset: f32) -> Self {
        Self {
            opacity: 0.0,
            translate_y: offset,
            scale: 1.0,
        }
    }

    pub fn get(&self, property: Property) -> f32 {
        match property {
            Property::Opacity => self.opacity,
            Property::TranslateY => self.translate_y,
            Property::Scale => self.scale,
        }
    }

    pub fn set(&mut self, property: Property, value: f32) {
        match property {
            Property::Opacity => self.opacity = value,
            Property::TranslateY => self.translate_y = value,
            Property::Scale => self.scale = value,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// One property moving from `from` to `to` after `delay_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationSpec {
    pub property: Property,
    pub from: f32,
    pub to: f32,
    pub duration_ms: f64,
    pub easing: Easing,
    pub delay_ms: f64,
}

impl AnimationSpec {
    /// Value of the property `elapsed_ms` after the animation was started.
    pub fn sample(&self, elapsed_ms: f64) -> f32 {
        let local = elapsed_ms - self.delay_ms;
        if local <= 0.0 {
            return self.from;
        }
        if self.duration_ms <= 0.0 || local >= self.duration_ms {
            return self.to;
        }
        let t = (local / self.duration_ms) as f32;
        lerp(self.from, self.to, self.easing.apply(t))
    }

    pub fn end_ms(&self) -> f64 {
        self.delay_ms + self.duration_ms.max(0.0)
    }
}

/// Hidden/visible pose pair with the timing used to move between them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Variant {
    pub hidden: Pose,
    pub visible: Pose,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Variant {
    /// Rise-and-fade entrance from `offset` pixels below.
    pub fn fade_in_up(offset: f32, duration_ms: f64) -> Self {
        Self {
            hidden: Pose::hidden_below(offset),
            visible: Pose::VISIBLE,
            duration_ms,
            easing: Easing::EXPO_OUT,
        }
    }

    /// Grow-and-fade entrance from `scale`.
    pub fn scale_in(scale: f32, duration_ms: f64) -> Self {
        Self {
            hidden: Pose {
                opacity: 0.0,
                translate_y: 0.0,
                scale,
            },
            visible: Pose::VISIBLE,
            duration_ms,
            easing: Easing::EXPO_OUT,
        }
    }

    /// Opacity-only entrance.
    pub fn fade_in(duration_ms: f64) -> Self {
        Self::fade_in_up(0.0, duration_ms)
    }

    /// One spec per property that differs between the two poses.
    pub fn specs(&self, delay_ms: f64) -> Vec<AnimationSpec> {
        Property::ALL
            .iter()
            .filter(|p| self.hidden.get(**p) != self.visible.get(**p))
            .map(|&property| AnimationSpec {
                property,
                from: self.hidden.get(property),
                to: self.visible.get(property),
                duration_ms: self.duration_ms,
                easing: self.easing,
                delay_ms,
            })
            .collect()
    }

    /// Pose `elapsed_ms` after the entrance was started with `delay_ms`.
    pub fn pose_at(&self, elapsed_ms: f64, delay_ms: f64) -> Pose {
        let mut pose = self.hidden;
        for spec in self.specs(delay_ms) {
            pose.set(spec.property, spec.sample(elapsed_ms));
        }
        pose
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self::fade_in_up(40.0, 800.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bezier_hits_endpoints_and_is_monotonic() {
        let ease = Easing::EXPO_OUT;
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);

        let mut last = 0.0;
        for step in 1..=20 {
            let value = ease.apply(step as f32 / 20.0);
            assert!(value >= last - 1e-4, "curve dipped at step {step}");
            last = value;
        }
    }

    #[test]
    fn expo_out_front_loads_progress() {
        assert!(Easing::EXPO_OUT.apply(0.25) > 0.7);
    }

    #[test]
    fn linear_bezier_matches_identity() {
        let ease = Easing::CubicBezier {
            x1: 0.25,
            y1: 0.25,
            x2: 0.75,
            y2: 0.75,
        };
        assert!((ease.apply(0.4) - 0.4).abs() < 1e-3);
    }

    #[test]
    fn spec_holds_from_value_during_delay() {
        let spec = AnimationSpec {
            property: Property::Opacity,
            from: 0.0,
            to: 1.0,
            duration_ms: 100.0,
            easing: Easing::Linear,
            delay_ms: 50.0,
        };
        assert_eq!(spec.sample(0.0), 0.0);
        assert_eq!(spec.sample(50.0), 0.0);
        assert!((spec.sample(100.0) - 0.5).abs() < 1e-6);
        assert_eq!(spec.sample(500.0), 1.0);
        assert_eq!(spec.end_ms(), 150.0);
    }

    #[test]
    fn variant_only_animates_changed_properties() {
        let variant = Variant::fade_in_up(40.0, 800.0);
        let specs = variant.specs(0.0);
        let properties: Vec<_> = specs.iter().map(|s| s.property).collect();
        assert_eq!(properties, vec![Property::Opacity, Property::TranslateY]);
    }

    #[test]
    fn variant_pose_settles_on_visible() {
        let variant = Variant::scale_in(0.9, 600.0);
        assert_eq!(variant.pose_at(0.0, 0.0), variant.hidden);
        assert_eq!(variant.pose_at(10_000.0, 0.0), Pose::VISIBLE);
    }
}
