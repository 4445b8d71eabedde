use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::motion::{Easing, Pose, Variant};
use crate::reveal::RevealSchedule;
use crate::scroll::DEFAULT_SCROLL_THRESHOLD;
use crate::transform::TransformConfig;
use crate::Result;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub motion: MotionConfig,
    pub content: ContentConfig,
    pub layout: LayoutConfig,
    pub carousel: CarouselConfig,
    pub site: SiteMetadata,
}

impl AppConfig {
    /// Parses a (possibly partial) JSON document over the defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Timing and pose constants for every animated region.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub scroll_threshold: f32,
    /// Pixels the viewport is shrunk by on every side before intersection
    /// tests.
    pub intersection_margin: f32,
    pub fade_in_up: Variant,
    pub scale_in: Variant,
    pub stagger: RevealSchedule,
    pub card: Variant,
    pub card_stagger: RevealSchedule,
    pub nav_bar: Variant,
    pub nav_bar_delay_ms: f64,
    pub nav_link: Variant,
    pub nav_link_stagger: RevealSchedule,
    pub scroll_indicator: Variant,
    pub scroll_indicator_delay_ms: f64,
    pub hero_transform: TransformConfig,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            intersection_margin: 100.0,
            fade_in_up: Variant::fade_in_up(40.0, 800.0),
            scale_in: Variant::scale_in(0.9, 600.0),
            stagger: RevealSchedule::from_parts(200.0, 150.0),
            card: Variant::fade_in_up(60.0, 800.0),
            card_stagger: RevealSchedule::from_parts(0.0, 150.0),
            nav_bar: Variant::fade_in_up(-100.0, 800.0),
            nav_bar_delay_ms: 500.0,
            nav_link: Variant {
                hidden: Pose::hidden_below(-20.0),
                visible: Pose::VISIBLE,
                duration_ms: 300.0,
                easing: Easing::EaseInOut,
            },
            nav_link_stagger: RevealSchedule::from_parts(700.0, 100.0),
            scroll_indicator: Variant {
                easing: Easing::EaseInOut,
                ..Variant::fade_in(300.0)
            },
            scroll_indicator_delay_ms: 1500.0,
            hero_transform: TransformConfig::hero(),
        }
    }
}

/// Where the project list document lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub path: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            path: "/projects.json".to_string(),
        }
    }
}

/// Block sizes used by [`StackLayout`](crate::layout::StackLayout).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub nav_height: f32,
    pub side_padding: f32,
    pub section_padding: f32,
    pub header_height: f32,
    pub placeholder_height: f32,
    pub grid_columns: usize,
    pub card_height: f32,
    pub card_gap: f32,
    pub about_height: f32,
    pub contact_height: f32,
    pub footer_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            nav_height: 80.0,
            side_padding: 48.0,
            section_padding: 128.0,
            header_height: 220.0,
            placeholder_height: 400.0,
            grid_columns: 2,
            card_height: 560.0,
            card_gap: 32.0,
            about_height: 960.0,
            contact_height: 720.0,
            footer_height: 120.0,
        }
    }
}

/// Options handed to the external carousel widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub autoplay: bool,
    pub interval_ms: u64,
    #[serde(rename = "loop")]
    pub looping: bool,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            autoplay: true,
            interval_ms: 5000,
            looping: true,
        }
    }
}

/// Labelled link used by the navigation and contact sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

impl NavLink {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

/// Page metadata and chrome links.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteMetadata {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub author: String,
    pub nav_links: Vec<NavLink>,
    pub contact_email: String,
    pub social_links: Vec<NavLink>,
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            title: "Bar Maizel | Full-Stack Developer & Creative Technologist".to_string(),
            description: "Premium portfolio showcasing innovative web applications, SaaS products, and creative development solutions.".to_string(),
            keywords: ["Full-Stack Developer", "Web Developer", "React", "Next.js", "SaaS", "Portfolio"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            author: "Bar Maizel".to_string(),
            nav_links: vec![
                NavLink::new("Work", "#work"),
                NavLink::new("About", "#about"),
                NavLink::new("Contact", "#contact"),
            ],
            contact_email: "barmaizel1@gmail.com".to_string(),
            social_links: vec![
                NavLink::new("LinkedIn", "https://linkedin.com/in/barmaizel"),
                NavLink::new("GitHub", "https://github.com/barmaizel"),
            ],
        }
    }
}
