//! Core library for the portfolio site's motion layer.
//!
//! The crate decides, for every visual element on the page, when it becomes
//! visible and how it moves: one-shot viewport triggers, staggered reveals,
//! scroll-linked transforms, and the ambient pointer/scroll state they read.
//! Nothing here touches a display surface; sections render into plain data
//! frames that a renderer can paint.

pub mod ambient;
pub mod carousel;
pub mod compose;
pub mod config;
pub mod content;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod motion;
pub mod page;
pub mod pointer;
pub mod reveal;
pub mod scroll;
pub mod transform;
pub mod visibility;

pub use ambient::{channel, Publisher, Reader, Subscription};
pub use carousel::{CarouselAdapter, CarouselItem, CarouselRenderer};
pub use compose::{AmbientContext, CardView, ElementContent, RenderedElement, SectionComposer, SectionFrame};
pub use config::{AppConfig, CarouselConfig, ContentConfig, LayoutConfig, MotionConfig, NavLink, SiteMetadata};
pub use content::{ContentLoader, ContentSource, FileContentSource, LoadState, ProjectEntry, StaticContentSource};
pub use error::{FolioError, Result};
pub use geometry::{Rect, Viewport};
pub use layout::{ElementKey, Layout, SectionId, StackLayout};
pub use motion::{AnimationSpec, Easing, Pose, Property, Variant};
pub use page::{ContentStatus, Page, PageEvent, PageFrame};
pub use pointer::{PointerState, PointerTracker};
pub use reveal::{ChildFrame, RevealPhase, RevealSchedule, RevealSequencer, StaggerMode};
pub use scroll::{NavTreatment, ScrollOffsets, ScrollState, ScrollTracker};
pub use transform::{Breakpoint, Interpolation, ScrollLinkedTransform, TransformConfig};
pub use visibility::{VisibilityObserver, VisibilityState, VisibilityTrigger};
