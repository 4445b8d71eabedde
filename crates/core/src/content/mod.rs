//! Static project list: schema, parsing and the page-load state machine.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{FolioError, Result};

/// One portfolio project. Identity is `name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProjectEntry", rename_all = "camelCase")]
pub struct ProjectEntry {
    pub name: String,
    pub tools: Vec<String>,
    pub description: String,
    /// Never empty.
    pub screenshots: Vec<String>,
    pub external_url: Option<String>,
}

impl ProjectEntry {
    pub fn cover(&self) -> &str {
        self.screenshots.first().map(String::as_str).unwrap_or_default()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Tools {
    List(Vec<String>),
    Joined(String),
}

impl Default for Tools {
    fn default() -> Self {
        Tools::List(Vec::new())
    }
}

impl From<Tools> for Vec<String> {
    fn from(tools: Tools) -> Self {
        let raw = match tools {
            Tools::List(list) => list,
            Tools::Joined(joined) => joined.split(',').map(str::to_string).collect(),
        };
        raw.into_iter()
            .map(|tool| tool.trim().to_string())
            .filter(|tool| !tool.is_empty())
            .collect()
    }
}

/// Optional fields accept an explicit `null` as absent.
#[derive(Deserialize)]
struct RawProjectEntry {
    name: String,
    #[serde(default)]
    tools: Option<Tools>,
    #[serde(default, alias = "desc")]
    description: Option<String>,
    #[serde(default)]
    screenshots: Option<Vec<String>>,
    #[serde(default, rename = "externalUrl", alias = "url")]
    external_url: Option<String>,
}

impl TryFrom<RawProjectEntry> for ProjectEntry {
    type Error = FolioError;

    fn try_from(raw: RawProjectEntry) -> Result<Self> {
        let name = raw.name.trim().to_string();
        if name.is_empty() {
            return Err(FolioError::MalformedContent("project entry has an empty name"));
        }
        let screenshots = raw.screenshots.unwrap_or_default();
        if screenshots.is_empty() {
            return Err(FolioError::MalformedContent("project entry has no screenshots"));
        }
        Ok(Self {
            name,
            tools: raw.tools.unwrap_or_default().into(),
            description: raw.description.unwrap_or_default(),
            screenshots,
            external_url: raw.external_url.filter(|url| !url.trim().is_empty()),
        })
    }
}

/// Parses `{ "projects": [...] }`.
///
/// A missing or non-array `projects` is [`FolioError::MalformedContent`].
/// Individual entries that fail validation, or repeat an earlier name, are
/// dropped with a warning so the remaining cards still render.
pub fn parse_document(text: &str) -> Result<Vec<ProjectEntry>> {
    let document: serde_json::Value = serde_json::from_str(text)?;
    let entries = document
        .get("projects")
        .and_then(serde_json::Value::as_array)
        .ok_or(FolioError::MalformedContent("`projects` is missing or not an array"))?;

    let mut names = HashSet::new();
    let mut projects = Vec::with_capacity(entries.len());
    for (index, value) in entries.iter().enumerate() {
        match serde_json::from_value::<ProjectEntry>(value.clone()) {
            Ok(entry) if names.insert(entry.name.clone()) => projects.push(entry),
            Ok(entry) => {
                tracing::warn!(index, name = %entry.name, "dropping project with duplicate name");
            }
            Err(err) => {
                tracing::warn!(index, error = %err, "dropping invalid project entry");
            }
        }
    }
    Ok(projects)
}

/// Read-only fetch of the content document.
pub trait ContentSource {
    fn fetch(&self, path: &str) -> Result<String>;
}

/// Serves content paths from a directory, the way a static host serves its
/// public folder.
#[derive(Debug, Clone)]
pub struct FileContentSource {
    root: PathBuf,
}

impl FileContentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl ContentSource for FileContentSource {
    fn fetch(&self, path: &str) -> Result<String> {
        std::fs::read_to_string(self.resolve(path)).map_err(|err| FolioError::ContentLoad {
            path: path.to_string(),
            reason: err.to_string(),
        })
    }
}

/// In-memory document, or a canned failure.
#[derive(Debug, Clone)]
pub enum StaticContentSource {
    Document(String),
    Unavailable(String),
}

impl ContentSource for StaticContentSource {
    fn fetch(&self, path: &str) -> Result<String> {
        match self {
            StaticContentSource::Document(text) => Ok(text.clone()),
            StaticContentSource::Unavailable(reason) => Err(FolioError::ContentLoad {
                path: path.to_string(),
                reason: reason.clone(),
            }),
        }
    }
}

/// Fetch and parse in one step.
pub fn load(source: &dyn ContentSource, path: &str) -> Result<Vec<ProjectEntry>> {
    let text = source.fetch(path)?;
    parse_document(&text)
}

/// Page-load data flow: `Idle -> Loading -> Ready | Failed`. Both outcomes
/// are terminal; there is no retry.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready(Vec<ProjectEntry>),
    Failed,
}

impl LoadState {
    pub fn is_settled(&self) -> bool {
        matches!(self, LoadState::Ready(_) | LoadState::Failed)
    }
}

#[derive(Debug, Clone)]
pub struct ContentLoader {
    path: String,
    state: LoadState,
}

impl ContentLoader {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            state: LoadState::Idle,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// `Idle -> Loading`. Returns `false` if a fetch was already issued.
    pub fn begin(&mut self) -> bool {
        if self.state != LoadState::Idle {
            return false;
        }
        tracing::info!(path = %self.path, "fetching content");
        self.state = LoadState::Loading;
        true
    }

    /// `Loading -> Ready | Failed`. Completions outside `Loading` are
    /// ignored. Failures are logged and never propagated.
    pub fn complete(&mut self, result: Result<Vec<ProjectEntry>>) -> &LoadState {
        if self.state != LoadState::Loading {
            tracing::debug!(path = %self.path, "ignoring late content completion");
            return &self.state;
        }
        self.state = match result {
            Ok(projects) => {
                tracing::info!(path = %self.path, count = projects.len(), "content ready");
                LoadState::Ready(projects)
            }
            Err(err) => {
                tracing::warn!(path = %self.path, error = %err, "failed to load projects");
                LoadState::Failed
            }
        };
        &self.state
    }

    /// Loaded projects; empty unless `Ready`.
    pub fn projects(&self) -> &[ProjectEntry] {
        match &self.state {
            LoadState::Ready(projects) => projects,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_both_tool_forms_and_aliases() {
        let text = json!({
            "projects": [
                {
                    "name": "Minerva LMS",
                    "tools": "React, Node.js, Docker",
                    "desc": "Virtual patient simulations.",
                    "screenshots": ["/screenshots/Minerva/2.png"],
                    "url": "https://minervaxr.com/"
                },
                {
                    "name": "Switcher App",
                    "tools": ["CustomTkinter", "pymongo"],
                    "description": "Track name converter.",
                    "screenshots": ["/s/1.png", "/s/2.png"]
                }
            ]
        })
        .to_string();

        let projects = parse_document(&text).unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].tools, vec!["React", "Node.js", "Docker"]);
        assert_eq!(projects[0].external_url.as_deref(), Some("https://minervaxr.com/"));
        assert_eq!(projects[1].description, "Track name converter.");
        assert_eq!(projects[1].external_url, None);
        assert_eq!(projects[1].cover(), "/s/1.png");
    }

    #[test]
    fn missing_projects_is_malformed() {
        for text in [r#"{}"#, r#"{"projects": {"a": 1}}"#, r#"[]"#] {
            assert!(matches!(
                parse_document(text),
                Err(FolioError::MalformedContent(_))
            ));
        }
        assert!(matches!(parse_document("not json"), Err(FolioError::Json(_))));
    }

    #[test]
    fn bad_entries_do_not_block_others() {
        let text = json!({
            "projects": [
                { "name": "No Shots", "screenshots": [] },
                { "name": "Alpha", "screenshots": ["/a.png"] },
                { "name": "Alpha", "screenshots": ["/b.png"] },
                { "screenshots": ["/c.png"] },
                { "name": "Beta", "screenshots": ["/d.png"] }
            ]
        })
        .to_string();

        let names: Vec<_> = parse_document(&text)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn null_optional_fields_read_as_absent() {
        let text = json!({
            "projects": [
                { "name": "Quiet", "tools": null, "description": null, "url": null, "screenshots": ["/q.png"] },
                { "name": "Blank", "screenshots": null }
            ]
        })
        .to_string();

        let projects = parse_document(&text).unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "Quiet");
        assert!(projects[0].tools.is_empty());
        assert_eq!(projects[0].description, "");
        assert_eq!(projects[0].external_url, None);
    }

    #[test]
    fn loader_walks_states_once() {
        let mut loader = ContentLoader::new("/projects.json");
        assert_eq!(loader.state(), &LoadState::Idle);
        assert!(loader.begin());
        assert!(!loader.begin());

        let source = StaticContentSource::Unavailable("503".to_string());
        loader.complete(load(&source, loader.path()));
        assert_eq!(loader.state(), &LoadState::Failed);
        assert!(loader.projects().is_empty());

        let late = vec![ProjectEntry {
            name: "Late".to_string(),
            tools: Vec::new(),
            description: String::new(),
            screenshots: vec!["/late.png".to_string()],
            external_url: None,
        }];
        loader.complete(Ok(late));
        assert_eq!(loader.state(), &LoadState::Failed);
        assert!(loader.state().is_settled());
    }

    #[test]
    fn file_source_resolves_under_root() {
        let dir = std::env::temp_dir().join(format!("folio-content-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("projects.json"),
            r#"{"projects":[{"name":"Alpha","screenshots":["/a.png"]}]}"#,
        )
        .unwrap();

        let source = FileContentSource::new(&dir);
        let projects = load(&source, "/projects.json").unwrap();
        assert_eq!(projects[0].name, "Alpha");

        let missing = source.fetch("/missing.json").unwrap_err();
        assert!(matches!(missing, FolioError::ContentLoad { .. }));
        assert!(missing.is_content_failure());

        std::fs::remove_dir_all(&dir).ok();
    }
}
