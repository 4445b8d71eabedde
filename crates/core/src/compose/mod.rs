//! Section composition.
//!
//! Binds content and site chrome to reveal sequencers and the hero's
//! scroll-linked transform, and renders every section into plain
//! [`SectionFrame`] data in page order.

use std::collections::HashSet;

use serde::Serialize;

use crate::ambient::Reader;
use crate::config::{AppConfig, MotionConfig, NavLink, SiteMetadata};
use crate::content::ProjectEntry;
use crate::geometry::Viewport;
use crate::layout::{card_key, ElementKey, Layout, SectionId};
use crate::motion::{Pose, Variant};
use crate::pointer::PointerState;
use crate::reveal::{RevealChild, RevealPhase, RevealSchedule, RevealSequencer};
use crate::scroll::{NavTreatment, ScrollState};
use crate::transform::ScrollLinkedTransform;

/// Read handles on the ambient pointer and scroll channels.
#[derive(Debug, Clone)]
pub struct AmbientContext {
    pub pointer: Reader<PointerState>,
    pub scroll: Reader<ScrollState>,
}

/// Two-digit, one-based position badge: `01`, `02`, ...
pub fn index_badge(index: usize) -> String {
    format!("{:02}", index + 1)
}

/// What a project card displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub badge: String,
    pub name: String,
    pub tools: Vec<String>,
    pub description: String,
    pub image: String,
    pub external_url: Option<String>,
}

impl CardView {
    pub fn new(index: usize, project: &ProjectEntry) -> Self {
        Self {
            badge: index_badge(index),
            name: project.name.clone(),
            tools: project.tools.clone(),
            description: project.description.clone(),
            image: project.cover().to_string(),
            external_url: project.external_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementContent {
    Block { role: &'static str },
    Links { links: Vec<NavLink> },
    Card(CardView),
    /// Deterministic stand-in while the project list loads.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedElement {
    pub key: ElementKey,
    pub phase: RevealPhase,
    pub pose: Pose,
    pub content: ElementContent,
}

impl RenderedElement {
    fn settled(key: ElementKey, content: ElementContent) -> Self {
        Self {
            key,
            phase: RevealPhase::Settled,
            pose: Pose::VISIBLE,
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionFrame {
    pub id: SectionId,
    pub anchor: Option<&'static str>,
    /// Scroll-linked pose applied to the whole section body.
    pub transform: Option<Pose>,
    pub treatment: Option<NavTreatment>,
    pub elements: Vec<RenderedElement>,
}

impl SectionFrame {
    fn new(id: SectionId, elements: Vec<RenderedElement>) -> Self {
        Self {
            id,
            anchor: id.anchor(),
            transform: None,
            treatment: None,
            elements,
        }
    }

    pub fn cards(&self) -> impl Iterator<Item = &CardView> {
        self.elements.iter().filter_map(|element| match &element.content {
            ElementContent::Card(card) => Some(card),
            _ => None,
        })
    }

    pub fn has_placeholder(&self) -> bool {
        self.elements
            .iter()
            .any(|element| element.content == ElementContent::Placeholder)
    }

    pub fn element(&self, key: &ElementKey) -> Option<&RenderedElement> {
        self.elements.iter().find(|element| element.key == *key)
    }
}

/// Sequencer plus the content of each of its children, index-aligned.
#[derive(Debug, Clone)]
struct RevealGroup {
    sequencer: RevealSequencer,
    contents: Vec<ElementContent>,
}

impl RevealGroup {
    fn container(schedule: RevealSchedule, items: Vec<(ElementKey, Variant, ElementContent)>) -> Self {
        let (children, contents) = split(items);
        Self {
            sequencer: RevealSequencer::container(schedule, children),
            contents,
        }
    }

    fn own_visibility(schedule: RevealSchedule, items: Vec<(ElementKey, Variant, ElementContent)>) -> Self {
        let (children, contents) = split(items);
        Self {
            sequencer: RevealSequencer::own_visibility(schedule, children),
            contents,
        }
    }

    fn render(&self, now_ms: f64) -> Vec<RenderedElement> {
        self.sequencer
            .frames(now_ms)
            .into_iter()
            .zip(&self.contents)
            .map(|(frame, content)| RenderedElement {
                key: frame.key,
                phase: frame.phase,
                pose: frame.pose,
                content: content.clone(),
            })
            .collect()
    }
}

fn split(items: Vec<(ElementKey, Variant, ElementContent)>) -> (Vec<RevealChild>, Vec<ElementContent>) {
    items
        .into_iter()
        .map(|(key, variant, content)| (RevealChild::new(key, variant), content))
        .unzip()
}

fn blocks(parent: SectionId, variant: Variant, roles: &[&'static str]) -> Vec<(ElementKey, Variant, ElementContent)> {
    roles
        .iter()
        .map(|&role| (parent.key().child(role), variant, ElementContent::Block { role }))
        .collect()
}

/// Assembles every page section from configuration, content and ambient
/// state.
#[derive(Debug)]
pub struct SectionComposer {
    motion: MotionConfig,
    site: SiteMetadata,
    ambient: AmbientContext,
    hero_transform: ScrollLinkedTransform,
    nav_bar: RevealGroup,
    nav_links: RevealGroup,
    hero_content: RevealGroup,
    hero_indicator: RevealGroup,
    projects_header: RevealGroup,
    project_grid: Option<RevealGroup>,
    card_names: Vec<String>,
    about_content: RevealGroup,
    about_visual: RevealGroup,
    contact_content: RevealGroup,
    mounted: bool,
}

impl SectionComposer {
    /// Builds every section and starts the entrances that play on mount
    /// (navigation and hero).
    pub fn mount(config: &AppConfig, ambient: AmbientContext, now_ms: f64) -> Self {
        let motion = config.motion.clone();
        let site = config.site.clone();

        let nav_bar = RevealGroup::container(
            RevealSchedule::after(motion.nav_bar_delay_ms),
            blocks(SectionId::Navigation, motion.nav_bar, &["bar"]),
        );
        let nav_links = RevealGroup::container(
            motion.nav_link_stagger,
            site.nav_links
                .iter()
                .map(|link| {
                    (
                        SectionId::Navigation.key().child("link").child(&link.label),
                        motion.nav_link,
                        ElementContent::Links {
                            links: vec![link.clone()],
                        },
                    )
                })
                .collect(),
        );

        let mut hero_items = blocks(SectionId::Hero, motion.fade_in_up, &["eyebrow", "heading", "description"]);
        hero_items.push((
            SectionId::Hero.key().child("actions"),
            motion.fade_in_up,
            ElementContent::Links {
                links: vec![
                    NavLink::new("View Projects", "#work"),
                    NavLink::new("Get in Touch", "#contact"),
                ],
            },
        ));
        let hero_content = RevealGroup::container(motion.stagger, hero_items);
        let hero_indicator = RevealGroup::container(
            RevealSchedule::after(motion.scroll_indicator_delay_ms),
            blocks(SectionId::Hero, motion.scroll_indicator, &["scroll_indicator"]),
        );

        let projects_header = RevealGroup::container(
            RevealSchedule::after(0.0),
            blocks(SectionId::Projects, motion.fade_in_up, &["header"]),
        );

        let about_content = RevealGroup::container(
            motion.stagger,
            blocks(SectionId::About, motion.fade_in_up, &["eyebrow", "heading", "body", "skills"]),
        );
        let about_visual = RevealGroup::container(
            RevealSchedule::after(0.0),
            blocks(SectionId::About, motion.scale_in, &["visual"]),
        );

        let mut contact_items = blocks(SectionId::Contact, motion.fade_in_up, &["eyebrow", "heading", "body"]);
        let mut contact_links = vec![NavLink::new(
            "Start a Conversation",
            format!("mailto:{}", site.contact_email),
        )];
        contact_links.extend(site.social_links.iter().cloned());
        contact_items.push((
            SectionId::Contact.key().child("actions"),
            motion.fade_in_up,
            ElementContent::Links {
                links: contact_links,
            },
        ));
        let contact_content = RevealGroup::container(motion.stagger, contact_items);

        let mut composer = Self {
            hero_transform: ScrollLinkedTransform::from_config(&motion.hero_transform),
            motion,
            site,
            ambient,
            nav_bar,
            nav_links,
            hero_content,
            hero_indicator,
            projects_header,
            project_grid: None,
            card_names: Vec::new(),
            about_content,
            about_visual,
            contact_content,
            mounted: true,
        };

        for group in [
            &mut composer.nav_bar,
            &mut composer.nav_links,
            &mut composer.hero_content,
            &mut composer.hero_indicator,
        ] {
            group.sequencer.reveal_all(now_ms);
        }
        composer
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// True until a project list (possibly empty) has been bound.
    pub fn is_loading(&self) -> bool {
        self.project_grid.is_none()
    }

    pub fn site(&self) -> &SiteMetadata {
        &self.site
    }

    pub fn motion(&self) -> &MotionConfig {
        &self.motion
    }

    /// Triggers that exist from mount onwards.
    pub fn static_triggers(&self) -> Vec<ElementKey> {
        vec![SectionId::About.key(), SectionId::Contact.key()]
    }

    /// Names of the bound cards in render order; `None` while loading.
    pub fn card_names(&self) -> Option<&[String]> {
        self.project_grid.as_ref().map(|_| self.card_names.as_slice())
    }

    /// Replaces the loading placeholder with the project grid. Cards keep
    /// content order, which is also their stagger order. Returns the
    /// trigger keys the grid introduces; empty if projects were already
    /// bound or the composer is unmounted.
    pub fn bind_projects(&mut self, projects: &[ProjectEntry]) -> Vec<ElementKey> {
        if !self.mounted || self.project_grid.is_some() {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let unique: Vec<&ProjectEntry> = projects
            .iter()
            .filter(|project| {
                let fresh = seen.insert(project.name.as_str());
                if !fresh {
                    tracing::warn!(name = %project.name, "skipping card with duplicate name");
                }
                fresh
            })
            .collect();

        let items = unique
            .iter()
            .enumerate()
            .map(|(index, project)| {
                (
                    card_key(&project.name),
                    self.motion.card,
                    ElementContent::Card(CardView::new(index, project)),
                )
            })
            .collect();
        self.card_names = unique.iter().map(|project| project.name.clone()).collect();
        self.project_grid = Some(RevealGroup::own_visibility(self.motion.card_stagger, items));
        tracing::info!(cards = self.card_names.len(), "project grid bound");

        let mut triggers = vec![SectionId::Projects.key()];
        triggers.extend(self.card_names.iter().map(|name| card_key(name)));
        triggers
    }

    /// Routes a visibility edge to the sequencers that depend on it.
    pub fn on_seen(&mut self, key: &ElementKey, now_ms: f64) -> bool {
        if !self.mounted {
            return false;
        }
        if *key == SectionId::Projects.key() {
            return self.projects_header.sequencer.reveal_all(now_ms);
        }
        if *key == SectionId::About.key() {
            let content = self.about_content.sequencer.reveal_all(now_ms);
            let visual = self.about_visual.sequencer.reveal_all(now_ms);
            return content || visual;
        }
        if *key == SectionId::Contact.key() {
            return self.contact_content.sequencer.reveal_all(now_ms);
        }
        match &mut self.project_grid {
            Some(grid) if key.is_within(&SectionId::Projects.key()) => grid.sequencer.on_seen(key, now_ms),
            _ => false,
        }
    }

    /// Spotlight custom properties from the last pointer position.
    pub fn spotlight(&self) -> [(&'static str, String); 2] {
        self.ambient.pointer.get().spotlight_properties()
    }

    pub fn nav_treatment(&self) -> NavTreatment {
        self.ambient.scroll.get().into()
    }

    /// Renders every section in page order. Nothing is rendered once
    /// unmounted.
    pub fn compose(&self, viewport: &Viewport, layout: &dyn Layout, now_ms: f64) -> Vec<SectionFrame> {
        if !self.mounted {
            return Vec::new();
        }
        SectionId::ORDER
            .iter()
            .map(|&id| self.compose_section(id, viewport, layout, now_ms))
            .collect()
    }

    fn compose_section(&self, id: SectionId, viewport: &Viewport, layout: &dyn Layout, now_ms: f64) -> SectionFrame {
        match id {
            SectionId::Navigation => {
                let mut elements = self.nav_bar.render(now_ms);
                elements.extend(self.nav_links.render(now_ms));
                let mut frame = SectionFrame::new(id, elements);
                frame.treatment = Some(self.nav_treatment());
                frame
            }
            SectionId::Hero => {
                let mut elements = self.hero_content.render(now_ms);
                elements.extend(self.hero_indicator.render(now_ms));
                let mut frame = SectionFrame::new(id, elements);
                frame.transform = layout
                    .rect(&id.key())
                    .map(|region| self.hero_transform.pose_for(&region, viewport, Pose::VISIBLE));
                frame
            }
            SectionId::Projects => {
                let mut elements = Vec::new();
                match &self.project_grid {
                    None => elements.push(RenderedElement::settled(
                        id.key().child("placeholder"),
                        ElementContent::Placeholder,
                    )),
                    Some(grid) => {
                        elements.extend(self.projects_header.render(now_ms));
                        elements.extend(grid.render(now_ms));
                    }
                }
                SectionFrame::new(id, elements)
            }
            SectionId::About => {
                let mut elements = self.about_content.render(now_ms);
                elements.extend(self.about_visual.render(now_ms));
                SectionFrame::new(id, elements)
            }
            SectionId::Contact => SectionFrame::new(id, self.contact_content.render(now_ms)),
            SectionId::Footer => SectionFrame::new(
                id,
                vec![RenderedElement::settled(
                    id.key().child("footer"),
                    ElementContent::Block { role: "footer" },
                )],
            ),
        }
    }

    /// Cancels every pending entrance; later visibility edges are ignored.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        for group in [
            &mut self.nav_bar,
            &mut self.nav_links,
            &mut self.hero_content,
            &mut self.hero_indicator,
            &mut self.projects_header,
            &mut self.about_content,
            &mut self.about_visual,
            &mut self.contact_content,
        ] {
            group.sequencer.cancel();
        }
        if let Some(grid) = &mut self.project_grid {
            grid.sequencer.cancel();
        }
        self.mounted = false;
        tracing::debug!("sections unmounted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ambient::channel;
    use crate::config::AppConfig;
    use crate::layout::StackLayout;

    fn composer_at(now_ms: f64) -> SectionComposer {
        let (_pointer_tx, pointer) = channel(PointerState::default());
        let (_scroll_tx, scroll) = channel(ScrollState::default());
        SectionComposer::mount(&AppConfig::default(), AmbientContext { pointer, scroll }, now_ms)
    }

    fn project(name: &str) -> ProjectEntry {
        ProjectEntry {
            name: name.to_string(),
            tools: vec!["Rust".to_string()],
            description: String::new(),
            screenshots: vec![format!("/{name}.png")],
            external_url: None,
        }
    }

    fn section(frames: &[SectionFrame], id: SectionId) -> &SectionFrame {
        frames.iter().find(|frame| frame.id == id).unwrap()
    }

    #[test]
    fn renders_sections_in_page_order() {
        let composer = composer_at(0.0);
        let viewport = Viewport::default();
        let layout = StackLayout::build(&AppConfig::default().layout, &viewport, None);
        let ids: Vec<_> = composer
            .compose(&viewport, &layout, 0.0)
            .iter()
            .map(|frame| frame.id)
            .collect();
        assert_eq!(ids, SectionId::ORDER.to_vec());
    }

    #[test]
    fn hero_plays_on_mount_with_stagger() {
        let composer = composer_at(1_000.0);
        let viewport = Viewport::default();
        let layout = StackLayout::build(&AppConfig::default().layout, &viewport, None);
        let frames = composer.compose(&viewport, &layout, 1_300.0);
        let hero = section(&frames, SectionId::Hero);

        let phases: Vec<_> = hero.elements.iter().map(|element| element.phase).collect();
        assert_eq!(phases[0], RevealPhase::Animating);
        assert_eq!(phases[1], RevealPhase::Pending);
        assert_eq!(hero.transform, Some(Pose::VISIBLE));

        let indicator = hero
            .element(&SectionId::Hero.key().child("scroll_indicator"))
            .unwrap();
        assert_eq!(indicator.phase, RevealPhase::Pending);
    }

    #[test]
    fn placeholder_until_projects_bound() {
        let mut composer = composer_at(0.0);
        let viewport = Viewport::default();
        let config = AppConfig::default();
        let layout = StackLayout::build(&config.layout, &viewport, None);

        let frames = composer.compose(&viewport, &layout, 0.0);
        assert!(section(&frames, SectionId::Projects).has_placeholder());
        assert!(composer.card_names().is_none());

        let triggers = composer.bind_projects(&[project("Alpha"), project("Beta"), project("Alpha")]);
        assert_eq!(
            triggers,
            vec![SectionId::Projects.key(), card_key("Alpha"), card_key("Beta")]
        );
        assert!(composer.bind_projects(&[project("Late")]).is_empty());

        let frames = composer.compose(&viewport, &layout, 0.0);
        let projects = section(&frames, SectionId::Projects);
        assert!(!projects.has_placeholder());
        let badges: Vec<_> = projects.cards().map(|card| card.badge.as_str()).collect();
        assert_eq!(badges, vec!["01", "02"]);
    }

    #[test]
    fn visibility_edges_route_to_sections() {
        let mut composer = composer_at(0.0);
        composer.bind_projects(&[project("Alpha"), project("Beta")]);

        assert!(composer.on_seen(&SectionId::About.key(), 10.0));
        assert!(!composer.on_seen(&SectionId::About.key(), 20.0));
        assert!(composer.on_seen(&card_key("Beta"), 30.0));
        assert!(!composer.on_seen(&card_key("Beta"), 40.0));
        assert!(!composer.on_seen(&ElementKey::new("elsewhere"), 50.0));
    }

    #[test]
    fn unmount_cancels_and_renders_nothing() {
        let mut composer = composer_at(0.0);
        composer.bind_projects(&[project("Alpha")]);
        composer.unmount();

        assert!(!composer.on_seen(&card_key("Alpha"), 10.0));
        let viewport = Viewport::default();
        let layout = StackLayout::build(&AppConfig::default().layout, &viewport, Some(&[] as &[String]));
        assert!(composer.compose(&viewport, &layout, 10.0).is_empty());
    }

    #[test]
    fn navigation_reflects_scroll_threshold() {
        let (_pointer_tx, pointer) = channel(PointerState::default());
        let (scroll_tx, scroll) = channel(ScrollState::default());
        let composer = SectionComposer::mount(&AppConfig::default(), AmbientContext { pointer, scroll }, 0.0);

        assert_eq!(composer.nav_treatment(), NavTreatment::Transparent);
        scroll_tx.publish(ScrollState::at(51.0, 50.0));
        assert_eq!(composer.nav_treatment(), NavTreatment::Blurred);
    }
}
