use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PROJECTS_ENDPOINT: &str = "/api/notion/projects";

/// A database page as returned by Notion, reduced to the properties the site reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotionPage {
    pub id: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub properties: PageProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageProperties {
    #[serde(rename = "Cover", default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<FilesProperty>,
    #[serde(rename = "Link", default, skip_serializing_if = "Option::is_none")]
    pub link: Option<UrlProperty>,
    #[serde(rename = "Skills", default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<RichTextProperty>,
    #[serde(rename = "Category", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<SelectProperty>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<TitleProperty>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilesProperty {
    #[serde(default)]
    pub files: Vec<FileObject>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileUrl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<FileUrl>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileUrl {
    pub url: String,
}

impl FileObject {
    /// Notion-hosted uploads take precedence over external links.
    pub fn url(&self) -> Option<&str> {
        self.file
            .as_ref()
            .or(self.external.as_ref())
            .map(|f| f.url.as_str())
            .filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlProperty {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichTextProperty {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectProperty {
    #[serde(default)]
    pub select: Option<SelectOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleProperty {
    #[serde(default)]
    pub title: Vec<RichText>,
}

impl NotionPage {
    /// Whether the page carries everything a project card needs.
    ///
    /// Shared by the proxy filter and the client-side transform.
    pub fn is_complete(&self) -> bool {
        let props = &self.properties;
        !self.archived
            && props.cover.as_ref().is_some_and(|c| !c.files.is_empty())
            && props
                .category
                .as_ref()
                .is_some_and(|c| c.select.is_some())
            && props
                .skills
                .as_ref()
                .is_some_and(|s| !s.rich_text.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: String,
    pub name: String,
    pub image: String,
    pub link: Option<String>,
    pub skills: String,
    pub category: String,
}

impl ContentRecord {
    pub fn from_page(page: &NotionPage) -> Option<Self> {
        if !page.is_complete() {
            return None;
        }
        let props = &page.properties;
        let image = props.cover.as_ref()?.files.first()?.url()?.to_string();
        let category = props.category.as_ref()?.select.as_ref()?.name.clone();
        if category.is_empty() {
            return None;
        }
        let skills = props
            .skills
            .as_ref()?
            .rich_text
            .iter()
            .map(|t| t.plain_text.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        if skills.is_empty() {
            return None;
        }
        let link = props
            .link
            .as_ref()
            .and_then(|l| l.url.clone())
            .filter(|l| !l.is_empty());
        let name = props
            .name
            .as_ref()
            .map(|n| n.title.iter().map(|t| t.plain_text.as_str()).collect())
            .unwrap_or_default();

        Some(Self {
            id: page.id.clone(),
            name,
            image,
            link,
            skills,
            category,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub name: String,
    pub projects: Vec<ContentRecord>,
}

/// Groups valid records by category, keeping first-seen category order and
/// source order inside each category. Invalid pages are skipped.
pub fn group_by_category(pages: &[NotionPage]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for record in pages.iter().filter_map(ContentRecord::from_page) {
        match groups.iter_mut().find(|g| g.name == record.category) {
            Some(group) => group.projects.push(record),
            None => groups.push(CategoryGroup {
                name: record.category.clone(),
                projects: vec![record],
            }),
        }
    }
    groups
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub property: String,
    pub direction: SortDirection,
}

/// Optional body of `POST /api/notion/projects`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorts: Option<Vec<SortSpec>>,
}

/// Response of the projects proxy.
///
/// On the wire this is `{success: true, results, total}` or
/// `{success: false, error}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEnvelope", into = "RawEnvelope")]
pub enum ProjectsEnvelope {
    Success {
        results: Vec<NotionPage>,
        total: usize,
    },
    Failure {
        error: String,
    },
}

impl ProjectsEnvelope {
    pub fn success(results: Vec<NotionPage>) -> Self {
        let total = results.len();
        Self::Success { results, total }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawEnvelope {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    results: Option<Vec<NotionPage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl TryFrom<RawEnvelope> for ProjectsEnvelope {
    type Error = EnvelopeError;

    fn try_from(raw: RawEnvelope) -> Result<Self, Self::Error> {
        match (raw.success, raw.results) {
            (true, Some(results)) => {
                let total = raw.total.unwrap_or(results.len());
                Ok(Self::Success { results, total })
            }
            (true, None) => Err(EnvelopeError::MissingResults),
            (false, _) => Ok(Self::Failure {
                error: raw.error.unwrap_or_else(|| "Unknown error".to_string()),
            }),
        }
    }
}

impl From<ProjectsEnvelope> for RawEnvelope {
    fn from(envelope: ProjectsEnvelope) -> Self {
        match envelope {
            ProjectsEnvelope::Success { results, total } => Self {
                success: true,
                results: Some(results),
                total: Some(total),
                error: None,
            },
            ProjectsEnvelope::Failure { error } => Self {
                success: false,
                results: None,
                total: None,
                error: Some(error),
            },
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvelopeError {
    #[error("successful response is missing results")]
    MissingResults,
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_groups_in_first_seen_order() {
        let pages = vec![
            with_link(
                page("p1", Some("Web"), Some("https://img/1.png"), &["Rust"]),
                "https://one.dev",
            ),
            page("p3", Some("Mobile"), Some("https://img/3.png"), &["Swift"]),
            page("p2", Some("Web"), Some("https://img/2.png"), &["Leptos", "CSS"]),
        ];
        let groups = group_by_category(&pages);

        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Web", "Mobile"]);
        let web: Vec<&str> = groups[0].projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(web, vec!["p1", "p2"]);
        assert_eq!(groups[0].projects[1].skills, "Leptos, CSS");
        assert_eq!(groups[0].projects[0].link.as_deref(), Some("https://one.dev"));
        assert_eq!(groups[1].projects.len(), 1);
    }

    #[test]
    fn test_web_mobile_scenario() {
        let p1 = with_link(
            page("p1", Some("Web"), Some("https://img/1.png"), &["TS"]),
            "https://p1.dev",
        );
        let p2 = page("p2", Some("Web"), Some("https://img/2.png"), &["Rust"]);
        let p3 = page("p3", Some("Mobile"), Some("https://img/3.png"), &["Kotlin"]);
        let groups = group_by_category(&[p1.clone(), p2.clone(), p3.clone()]);

        assert_eq!(
            groups,
            vec![
                CategoryGroup {
                    name: "Web".to_string(),
                    projects: vec![
                        ContentRecord::from_page(&p1).unwrap(),
                        ContentRecord::from_page(&p2).unwrap(),
                    ],
                },
                CategoryGroup {
                    name: "Mobile".to_string(),
                    projects: vec![ContentRecord::from_page(&p3).unwrap()],
                },
            ]
        );
    }

    #[test]
    fn test_incomplete_records_are_skipped() {
        let no_cover = page("a", Some("Web"), None, &["Rust"]);
        let no_category = page("b", None, Some("https://img/b.png"), &["Rust"]);
        let no_skills = page("c", Some("Web"), Some("https://img/c.png"), &[]);
        let mut archived = page("d", Some("Web"), Some("https://img/d.png"), &["Rust"]);
        archived.archived = true;
        let mut no_props = page("e", Some("Web"), Some("https://img/e.png"), &["Rust"]);
        no_props.properties = PageProperties::default();

        for p in [&no_cover, &no_category, &no_skills, &archived, &no_props] {
            assert!(!p.is_complete(), "{} should be incomplete", p.id);
            assert!(ContentRecord::from_page(p).is_none());
        }
        let groups = group_by_category(&[no_cover, no_category, no_skills, archived, no_props]);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_empty_cover_list_excludes_record() {
        // category and skills present, but the files list is empty
        let p = page("x", Some("Web"), None, &["Rust"]);
        assert_eq!(p.properties.cover.as_ref().map(|c| c.files.len()), Some(0));
        assert!(group_by_category(&[p]).is_empty());
    }

    #[test]
    fn test_external_cover_and_empty_link() {
        let mut p = page("x", Some("Web"), None, &["Rust"]);
        p.properties.cover = Some(FilesProperty {
            files: vec![FileObject {
                name: None,
                file: None,
                external: Some(FileUrl {
                    url: "https://cdn/x.jpg".to_string(),
                }),
            }],
        });
        let p = with_link(p, "");
        let record = ContentRecord::from_page(&p).unwrap();
        assert_eq!(record.image, "https://cdn/x.jpg");
        assert_eq!(record.link, None);
        assert_eq!(record.name, "Project x");
    }

    #[test]
    fn test_transform_is_deterministic() {
        let pages = vec![
            page("1", Some("B"), Some("https://i/1"), &["x"]),
            page("2", Some("A"), Some("https://i/2"), &["y"]),
            page("3", Some("B"), Some("https://i/3"), &["z"]),
        ];
        assert_eq!(group_by_category(&pages), group_by_category(&pages));
        assert!(group_by_category(&[]).is_empty());
    }

    #[test]
    fn test_parses_notion_page_json() {
        let json = serde_json::json!({
            "object": "page",
            "id": "abc",
            "archived": false,
            "properties": {
                "Cover": {"type": "files", "files": [
                    {"name": "c.png", "type": "file", "file": {"url": "https://s3/c.png", "expiry_time": "2024-01-01T00:00:00Z"}}
                ]},
                "Link": {"type": "url", "url": null},
                "Skills": {"type": "rich_text", "rich_text": [{"plain_text": "Rust"}, {"plain_text": "WASM"}]},
                "Category": {"type": "select", "select": {"id": "1", "name": "Web", "color": "blue"}},
                "Name": {"type": "title", "title": [{"plain_text": "Site"}]},
                "Unused": {"type": "checkbox", "checkbox": true}
            }
        });
        let page: NotionPage = serde_json::from_value(json).unwrap();
        let record = ContentRecord::from_page(&page).unwrap();
        assert_eq!(record.image, "https://s3/c.png");
        assert_eq!(record.skills, "Rust, WASM");
        assert_eq!(record.category, "Web");
        assert_eq!(record.name, "Site");
        assert_eq!(record.link, None);
    }

    #[test]
    fn test_envelope_wire_shape() {
        let ok = ProjectsEnvelope::success(vec![page("p", Some("Web"), Some("https://i"), &["x"])]);
        let value = serde_json::to_value(&ok).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["total"], 1);
        assert!(value.get("error").is_none());

        let err = ProjectsEnvelope::failure("Notion API key not configured");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"success": false, "error": "Notion API key not configured"})
        );
    }

    #[test]
    fn test_envelope_rejects_success_without_results() {
        let parsed = serde_json::from_str::<ProjectsEnvelope>(r#"{"success": true}"#);
        assert!(parsed.is_err());

        let parsed: ProjectsEnvelope = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert_eq!(parsed, ProjectsEnvelope::failure("Unknown error"));
    }

    #[test]
    fn test_query_body_parsing() {
        let q: ProjectQuery = serde_json::from_str(
            r#"{"sorts": [{"property": "Name", "direction": "descending"}]}"#,
        )
        .unwrap();
        assert_eq!(
            q.sorts,
            Some(vec![SortSpec {
                property: "Name".to_string(),
                direction: SortDirection::Descending,
            }])
        );
        assert!(q.filters.is_none());
        assert!(serde_json::from_str::<ProjectQuery>(r#"{"sorts": [{"property": "Name", "direction": "up"}]}"#).is_err());
    }
}
