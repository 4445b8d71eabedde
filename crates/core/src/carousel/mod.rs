use serde::Serialize;

use crate::config::CarouselConfig;
use crate::content::ProjectEntry;

/// One slide as handed to the carousel widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselItem {
    pub name: String,
    pub description: String,
    pub screenshots: Vec<String>,
    pub external_url: Option<String>,
}

impl From<&ProjectEntry> for CarouselItem {
    fn from(project: &ProjectEntry) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
            screenshots: project.screenshots.clone(),
            external_url: project.external_url.clone(),
        }
    }
}

/// Seam to the slide widget. Slide transitions belong to the implementor.
pub trait CarouselRenderer {
    fn render(&mut self, items: &[CarouselItem], config: &CarouselConfig);
}

/// Narrow adapter between the project list and an external carousel.
#[derive(Debug, Clone, Serialize)]
pub struct CarouselAdapter {
    items: Vec<CarouselItem>,
    config: CarouselConfig,
}

impl CarouselAdapter {
    pub fn from_projects(projects: &[ProjectEntry], config: CarouselConfig) -> Self {
        Self {
            items: projects.iter().map(CarouselItem::from).collect(),
            config,
        }
    }

    pub fn items(&self) -> &[CarouselItem] {
        &self.items
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Click-through target of the slide at `index`, if it has one.
    pub fn open_target(&self, index: usize) -> Option<&str> {
        self.items
            .get(index)
            .and_then(|item| item.external_url.as_deref())
    }

    pub fn render(&self, renderer: &mut dyn CarouselRenderer) {
        renderer.render(&self.items, &self.config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str, url: Option<&str>) -> ProjectEntry {
        ProjectEntry {
            name: name.to_string(),
            tools: vec!["Next.js".to_string()],
            description: format!("{name} description"),
            screenshots: vec![format!("/screenshots/{name}.png")],
            external_url: url.map(str::to_string),
        }
    }

    #[derive(Default)]
    struct Recorder {
        names: Vec<String>,
        interval_ms: u64,
    }

    impl CarouselRenderer for Recorder {
        fn render(&mut self, items: &[CarouselItem], config: &CarouselConfig) {
            self.names = items.iter().map(|item| item.name.clone()).collect();
            self.interval_ms = config.interval_ms;
        }
    }

    #[test]
    fn click_through_only_with_url() {
        let adapter = CarouselAdapter::from_projects(
            &[project("RF Lab", Some("https://example.com/rf")), project("GPT Bot", None)],
            CarouselConfig::default(),
        );
        assert_eq!(adapter.open_target(0), Some("https://example.com/rf"));
        assert_eq!(adapter.open_target(1), None);
        assert_eq!(adapter.open_target(9), None);
    }

    #[test]
    fn renders_items_in_order_with_config() {
        let adapter = CarouselAdapter::from_projects(
            &[project("A", None), project("B", None)],
            CarouselConfig {
                interval_ms: 2500,
                ..CarouselConfig::default()
            },
        );
        let mut recorder = Recorder::default();
        adapter.render(&mut recorder);
        assert_eq!(recorder.names, vec!["A", "B"]);
        assert_eq!(recorder.interval_ms, 2500);
    }
}
