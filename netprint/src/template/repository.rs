//! Template repository: loading and keyword filtering.

use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use super::Template;
use crate::error::{Result, TemplateError};

/// Extension of template files in a directory store.
const TEMPLATE_EXTENSION: &str = "textfsm";

/// Read-only collection of templates, in store order.
#[derive(Debug, Clone, Default)]
pub struct TemplateRepository {
    templates: Vec<Template>,
}

/// One row of a JSON template store.
#[derive(Deserialize)]
struct TemplateRow {
    id: String,
    context_label: String,
    body: String,
}

impl TemplateRepository {
    /// Build an in-memory repository.
    pub fn from_templates(templates: impl IntoIterator<Item = Template>) -> Self {
        Self {
            templates: templates.into_iter().collect(),
        }
    }

    /// Load every `*.textfsm` file in `dir`, ordered by file name.
    ///
    /// The file stem is both the template id and its context label, the way
    /// ntc-templates names its files (`cisco_ios_show_version.textfsm`).
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let unavailable = |reason: String| TemplateError::RepositoryUnavailable {
            location: dir.display().to_string(),
            reason,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| unavailable(e.to_string()))? {
            let path = entry.map_err(|e| unavailable(e.to_string()))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == TEMPLATE_EXTENSION) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut templates = Vec::with_capacity(paths.len());
        for path in paths {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let body = fs::read_to_string(&path)
                .map_err(|e| unavailable(format!("{}: {}", path.display(), e)))?;
            templates.push(Template::new(stem, stem, body));
        }

        debug!("loaded {} templates from {}", templates.len(), dir.display());
        Ok(Self { templates })
    }

    /// Load a JSON array of `{id, context_label, body}` rows.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let unavailable = |reason: String| TemplateError::RepositoryUnavailable {
            location: path.display().to_string(),
            reason,
        };

        let text = fs::read_to_string(path).map_err(|e| unavailable(e.to_string()))?;
        let rows: Vec<TemplateRow> =
            serde_json::from_str(&text).map_err(|e| unavailable(e.to_string()))?;

        debug!("loaded {} templates from {}", rows.len(), path.display());
        Ok(Self::from_templates(
            rows.into_iter()
                .map(|row| Template::new(row.id, row.context_label, row.body)),
        ))
    }

    /// All templates, in store order.
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the repository holds no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Templates whose label contains every significant term of `filter`.
    ///
    /// The filter is split on `_`, `-` and whitespace; terms of two
    /// characters or fewer are ignored. With no significant terms (or no
    /// filter) every template is returned.
    pub fn filtered_templates(&self, filter: Option<&str>) -> Vec<&Template> {
        let terms = filter.map(filter_terms).unwrap_or_default();
        self.templates
            .iter()
            .filter(|t| terms.iter().all(|term| t.context_label.contains(term.as_str())))
            .collect()
    }
}

fn filter_terms(filter: &str) -> Vec<String> {
    filter
        .replace('-', "_")
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|term| term.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn repo() -> TemplateRepository {
        TemplateRepository::from_templates([
            Template::new("1", "cisco_ios_show_version", ""),
            Template::new("2", "cisco_nxos_show_version", ""),
            Template::new("3", "cisco_ios_show_cdp_neighbors_detail", ""),
            Template::new("4", "arista_eos_show_version", ""),
        ])
    }

    fn ids(templates: Vec<&Template>) -> Vec<&str> {
        templates.into_iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_no_filter_returns_all_in_order() {
        assert_eq!(ids(repo().filtered_templates(None)), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_filter_is_conjunctive() {
        let repo = repo();
        assert_eq!(ids(repo.filtered_templates(Some("cisco_ios_show_version"))), vec!["1"]);
        assert_eq!(ids(repo.filtered_templates(Some("show_version"))), vec!["1", "2", "4"]);
        assert_eq!(
            ids(repo.filtered_templates(Some("cisco_ios neighbors"))),
            vec!["3"]
        );
        assert!(repo.filtered_templates(Some("juniper_junos_show_version")).is_empty());
    }

    #[test]
    fn test_filter_order_independent() {
        let repo = repo();
        assert_eq!(
            ids(repo.filtered_templates(Some("cisco_ios_show_version"))),
            ids(repo.filtered_templates(Some("show_version_cisco_ios")))
        );
    }

    #[test]
    fn test_short_terms_are_noise() {
        let repo = repo();
        // "ios" survives, "sh" and "ve" do not
        assert_eq!(ids(repo.filtered_templates(Some("sh-ve-ios"))), vec!["1", "3"]);
        assert_eq!(repo.filtered_templates(Some("a_b-cd")).len(), 4);
        assert_eq!(repo.filtered_templates(Some("")).len(), 4);
    }

    #[test]
    fn test_from_dir_sorted_and_filtered_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b_show_version.textfsm", "a_show_version.textfsm", "notes.txt"] {
            let mut file = fs::File::create(dir.path().join(name)).unwrap();
            writeln!(file, "Value X (.*)\n\nStart\n  ^${{X}} -> Record").unwrap();
        }

        let repo = TemplateRepository::from_dir(dir.path()).unwrap();
        assert_eq!(repo.len(), 2);
        assert_eq!(repo.templates()[0].id, "a_show_version");
        assert_eq!(repo.templates()[1].context_label, "b_show_version");
        assert!(repo.templates()[0].body.contains("Value X"));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "17", "context_label": "cisco_ios_show_cdp_neighbors_detail", "body": "Value A (.*)"}}]"#
        )
        .unwrap();

        let repo = TemplateRepository::from_json_file(file.path()).unwrap();
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.templates()[0].id, "17");
        assert_eq!(
            repo.templates()[0].category,
            crate::template::TemplateCategory::Neighbors
        );
    }

    #[test]
    fn test_unavailable_store() {
        let missing = TemplateRepository::from_dir("/nonexistent/netprint/templates");
        assert!(matches!(
            missing,
            Err(crate::Error::Template(TemplateError::RepositoryUnavailable { .. }))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            TemplateRepository::from_json_file(file.path()),
            Err(crate::Error::Template(TemplateError::RepositoryUnavailable { .. }))
        ));
    }
}
