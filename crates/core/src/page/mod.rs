//! Single-threaded page runtime.
//!
//! [`Page`] owns the trackers, the content loader, the layout and the
//! visibility observer, and feeds discrete events through them in arrival
//! order. Every call is synchronous; the caller supplies the event-loop
//! clock as `now_ms`.

use std::cell::Cell;
use std::rc::Rc;

use serde::Serialize;

use crate::ambient::{Reader, Subscription};
use crate::compose::{AmbientContext, SectionComposer, SectionFrame};
use crate::config::AppConfig;
use crate::content::{self, ContentLoader, ContentSource, LoadState, ProjectEntry};
use crate::geometry::Viewport;
use crate::layout::{ElementKey, StackLayout};
use crate::pointer::{PointerState, PointerTracker};
use crate::scroll::{ScrollState, ScrollTracker};
use crate::visibility::{VisibilityObserver, VisibilityState};
use crate::Result;

/// Discrete inputs from the host.
#[derive(Debug)]
pub enum PageEvent {
    PointerMove { x: f32, y: f32 },
    Scroll { offset: f32 },
    Resize { width: f32, height: f32 },
    ContentLoaded(Result<Vec<ProjectEntry>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

impl From<&LoadState> for ContentStatus {
    fn from(state: &LoadState) -> Self {
        match state {
            LoadState::Idle => ContentStatus::Idle,
            LoadState::Loading => ContentStatus::Loading,
            LoadState::Ready(_) => ContentStatus::Ready,
            LoadState::Failed => ContentStatus::Failed,
        }
    }
}

/// Everything a renderer needs for one paint.
#[derive(Debug, Clone, Serialize)]
pub struct PageFrame {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub author: String,
    pub at_ms: f64,
    pub viewport: Viewport,
    pub content: ContentStatus,
    pub spotlight: Vec<(&'static str, String)>,
    pub sections: Vec<SectionFrame>,
}

impl PageFrame {
    pub fn section(&self, id: crate::layout::SectionId) -> Option<&SectionFrame> {
        self.sections.iter().find(|section| section.id == id)
    }
}

#[derive(Debug)]
pub struct Page {
    config: AppConfig,
    viewport: Viewport,
    pointer: PointerTracker,
    scroll: ScrollTracker,
    loader: ContentLoader,
    composer: SectionComposer,
    layout: StackLayout,
    observer: VisibilityObserver,
    needs_visibility_pass: Rc<Cell<bool>>,
    scroll_listener: Option<Subscription>,
    mounted: bool,
}

impl Page {
    /// Mounts the page: attaches trackers, builds sections and runs the
    /// first intersection pass. Content stays `Idle` until
    /// [`begin_load`](Self::begin_load).
    pub fn mount(config: AppConfig, width: f32, height: f32, now_ms: f64) -> Self {
        let mut pointer = PointerTracker::new();
        pointer.attach();
        let mut scroll = ScrollTracker::new(config.motion.scroll_threshold);
        scroll.attach();

        let ambient = AmbientContext {
            pointer: pointer.reader(),
            scroll: scroll.reader(),
        };
        let composer = SectionComposer::mount(&config, ambient, now_ms);

        let viewport = Viewport::new(width, height);
        let layout = StackLayout::build(&config.layout, &viewport, None);
        let mut observer = VisibilityObserver::new(config.motion.intersection_margin);
        for key in composer.static_triggers() {
            observer.observe(key);
        }

        let needs_visibility_pass = Rc::new(Cell::new(false));
        let flag = Rc::clone(&needs_visibility_pass);
        let scroll_listener = scroll.reader().subscribe(move |_| flag.set(true));

        let loader = ContentLoader::new(config.content.path.clone());
        let mut page = Self {
            config,
            viewport,
            pointer,
            scroll,
            loader,
            composer,
            layout,
            observer,
            needs_visibility_pass,
            scroll_listener: Some(scroll_listener),
            mounted: true,
        };
        page.evaluate_visibility(now_ms);
        tracing::info!(width, height, "page mounted");
        page
    }

    /// Issues the content fetch. Returns the path to fetch, or `None` if a
    /// fetch was already issued or the page is unmounted.
    pub fn begin_load(&mut self) -> Option<String> {
        if !self.mounted || !self.loader.begin() {
            return None;
        }
        Some(self.loader.path().to_string())
    }

    /// Fetches from `source` and delivers the completion in one step.
    pub fn load_from(&mut self, source: &dyn ContentSource, now_ms: f64) {
        if let Some(path) = self.begin_load() {
            let result = content::load(source, &path);
            self.handle(PageEvent::ContentLoaded(result), now_ms);
        }
    }

    pub fn handle(&mut self, event: PageEvent, now_ms: f64) {
        if !self.mounted {
            tracing::debug!(?event, "event after unmount ignored");
            return;
        }
        match event {
            PageEvent::PointerMove { x, y } => {
                self.pointer.on_pointer_move(x, y);
            }
            PageEvent::Scroll { offset } => {
                self.viewport.scroll_y = offset;
                self.scroll.on_scroll(offset);
            }
            PageEvent::Resize { width, height } => {
                self.viewport.width = width;
                self.viewport.height = height;
                self.relayout();
                self.needs_visibility_pass.set(true);
            }
            PageEvent::ContentLoaded(result) => {
                self.loader.complete(result);
                if self.loader.state().is_settled() && self.composer.is_loading() {
                    let triggers = self.composer.bind_projects(self.loader.projects());
                    for key in triggers {
                        self.observer.observe(key);
                    }
                    self.relayout();
                    self.needs_visibility_pass.set(true);
                }
            }
        }

        if self.needs_visibility_pass.replace(false) {
            self.evaluate_visibility(now_ms);
        }
    }

    pub fn frame(&self, now_ms: f64) -> PageFrame {
        let site = self.composer.site();
        PageFrame {
            title: site.title.clone(),
            description: site.description.clone(),
            keywords: site.keywords.clone(),
            author: site.author.clone(),
            at_ms: now_ms,
            viewport: self.viewport,
            content: self.loader.state().into(),
            spotlight: self.composer.spotlight().to_vec(),
            sections: self.composer.compose(&self.viewport, &self.layout, now_ms),
        }
    }

    /// Tears down listeners, triggers and pending entrances. No callback
    /// fires after this returns.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        if let Some(listener) = self.scroll_listener.take() {
            listener.cancel();
        }
        self.pointer.detach();
        self.scroll.detach();
        self.observer.disconnect();
        self.composer.unmount();
        self.mounted = false;
        tracing::info!("page unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn load_state(&self) -> &LoadState {
        self.loader.state()
    }

    pub fn pointer_state(&self) -> PointerState {
        self.pointer.state()
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll.state()
    }

    pub fn scroll_reader(&self) -> Reader<ScrollState> {
        self.scroll.reader()
    }

    pub fn visibility(&self, key: &ElementKey) -> Option<VisibilityState> {
        self.observer.state(key)
    }

    pub fn layout(&self) -> &StackLayout {
        &self.layout
    }

    fn relayout(&mut self) {
        self.layout = StackLayout::build(&self.config.layout, &self.viewport, self.composer.card_names());
    }

    fn evaluate_visibility(&mut self, now_ms: f64) {
        for key in self.observer.evaluate(&self.viewport, &self.layout, now_ms) {
            self.composer.on_seen(&key, now_ms);
        }
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        self.unmount();
    }
}
