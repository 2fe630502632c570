use serde::Serialize;
use uuid::Uuid;

use super::repo::Project;

/// Public projection of a project for the portfolio page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image_url: String,
    pub project_url: String,
    pub technologies: Vec<String>,
    pub status: String,
}

impl From<Project> for ProjectSummary {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            title: project.title,
            description: project.description,
            category: project.category,
            image_url: project.image_url,
            project_url: project.project_url,
            technologies: project.technologies,
            status: project.status,
        }
    }
}

/// Aggregate site counters.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub courses: i64,
    pub projects: i64,
    pub users: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_summary_uses_camel_case_keys() {
        let summary = ProjectSummary {
            id: Uuid::new_v4(),
            title: "Site".into(),
            description: "A site".into(),
            category: "Web".into(),
            image_url: "/images/site.png".into(),
            project_url: "https://example.com".into(),
            technologies: vec!["Rust".into()],
            status: "Completed".into(),
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("imageUrl"));
        assert!(json.contains("projectUrl"));
        assert!(!json.contains("image_url"));
    }
}
