//! Saved builder state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::block::{BlockResult, Command, PtbBlock};

/// A named, timestamped snapshot of a block's command list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub commands: Vec<Command>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

impl Template {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        commands: Vec<Command>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            commands,
            created_at: Utc::now(),
            project_id: None,
        }
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }
}

impl PtbBlock {
    /// Restore a block from a template's command list.
    pub fn from_template(template: &Template) -> BlockResult<Self> {
        PtbBlock::from_commands(template.commands.clone())
    }

    /// Capture the current command list as a new template.
    pub fn to_template(&self, name: impl Into<String>, description: impl Into<String>) -> Template {
        Template::new(name, description, self.get_commands())
    }
}
