use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const FIELD_TITLE: &str = "System.Title";
pub const FIELD_STATE: &str = "System.State";
pub const FIELD_WORK_ITEM_TYPE: &str = "System.WorkItemType";
pub const FIELD_ASSIGNED_TO: &str = "System.AssignedTo";
pub const FIELD_CLOSED_DATE: &str = "System.ClosedDate";
pub const FIELD_PRIORITY: &str = "Microsoft.VSTS.Common.Priority";

#[derive(Debug, Serialize, Deserialize)]
pub struct WiqlQuery {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WiqlResponse {
    #[serde(rename = "workItems", default)]
    pub work_items: Vec<WorkItemReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItemReference {
    pub id: u32,
    #[serde(default)]
    pub url: Option<String>,
}

impl WorkItemReference {
    pub fn new(id: u32) -> Self {
        Self { id, url: None }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WorkItemListResponse {
    #[serde(default)]
    pub value: Vec<WorkItem>,
}

/// A work item as returned by the detail endpoint. Any field may be absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: u32,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl WorkItem {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    fn text_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn title(&self) -> &str {
        self.text_field(FIELD_TITLE).unwrap_or("No title")
    }

    pub fn state(&self) -> &str {
        self.text_field(FIELD_STATE).unwrap_or("Unknown")
    }

    pub fn work_item_type(&self) -> &str {
        self.text_field(FIELD_WORK_ITEM_TYPE).unwrap_or("Unknown")
    }

    /// Display name of the assignee; identity objects without one count as unassigned.
    pub fn assignee(&self) -> &str {
        self.fields
            .get(FIELD_ASSIGNED_TO)
            .and_then(|v| v.get("displayName"))
            .and_then(Value::as_str)
            .unwrap_or("Unassigned")
    }

    pub fn priority(&self) -> Option<i64> {
        self.fields.get(FIELD_PRIORITY).and_then(Value::as_i64)
    }

    pub fn priority_label(&self) -> String {
        self.priority()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "Not set".to_string())
    }

    pub fn closed_date(&self) -> Option<&str> {
        self.text_field(FIELD_CLOSED_DATE)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityRef {
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

impl IdentityRef {
    pub fn named(name: &str) -> Self {
        Self {
            display_name: Some(name.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PullRequestListResponse {
    #[serde(default)]
    pub value: Vec<PullRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    #[serde(rename = "pullRequestId")]
    pub pull_request_id: u32,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "createdBy", default)]
    pub created_by: IdentityRef,
    #[serde(rename = "targetRefName", default)]
    pub target_ref_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reviewers: Vec<IdentityRef>,
}

impl PullRequest {
    /// Target branch without the `refs/heads/` prefix.
    pub fn target_branch(&self) -> &str {
        self.target_ref_name
            .strip_prefix("refs/heads/")
            .unwrap_or(&self.target_ref_name)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BuildListResponse {
    #[serde(default)]
    pub value: Vec<Build>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildDefinitionRef {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    pub id: u32,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub definition: Option<BuildDefinitionRef>,
    #[serde(rename = "requestedFor", default)]
    pub requested_for: Option<IdentityRef>,
    #[serde(rename = "startTime", default)]
    pub start_time: Option<String>,
}

impl Build {
    pub fn definition_name(&self) -> &str {
        self.definition
            .as_ref()
            .and_then(|d| d.name.as_deref())
            .unwrap_or("Unknown")
    }

    pub fn requested_by(&self) -> &str {
        self.requested_for
            .as_ref()
            .and_then(|r| r.display_name.as_deref())
            .unwrap_or("Unknown")
    }

    /// Builds without a result are still running.
    pub fn result_label(&self) -> &str {
        self.result.as_deref().unwrap_or("in progress")
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectListResponse {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub value: Vec<ProjectReference>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectReference {
    pub name: String,
}

/// Outcome of the connection probe, serialized as-is to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConnectionStatus {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            connected: false,
            project_count: None,
            projects: None,
            error: Some(error.into()),
        }
    }
}
