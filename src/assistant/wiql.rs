use crate::assistant::intent::IntentTag;

/// Day window used for completed items when the question names none.
pub const DEFAULT_COMPLETED_WINDOW_DAYS: u32 = 7;

/// Number of builds requested from the build listing.
pub const BUILD_LIST_TOP: u32 = 10;

pub const PULL_REQUEST_STATUS: &str = "active";

/// Sub-modifiers read from the lower-cased question text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryModifiers {
    /// "open" or "active" was mentioned.
    pub open_only: bool,
    pub high_priority: bool,
    pub window_days: u32,
}

impl QueryModifiers {
    pub fn from_text(text: &str) -> Self {
        let text = text.to_lowercase();
        Self {
            open_only: text.contains("open") || text.contains("active"),
            high_priority: text.contains("high priority"),
            window_days: window_days(&text),
        }
    }
}

/// "week" → 7, "month" → 30, "today" → 1, checked in that order.
pub fn window_days(text: &str) -> u32 {
    if text.contains("week") {
        7
    } else if text.contains("month") {
        30
    } else if text.contains("today") {
        1
    } else {
        DEFAULT_COMPLETED_WINDOW_DAYS
    }
}

/// How an intent is answered remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    /// Run a WIQL statement, then fetch details for the first `fetch_cap` ids.
    Wiql { statement: String, fetch_cap: usize },
    PullRequests { status: &'static str },
    Builds { top: u32 },
}

/// Detail-fetch cap per WIQL intent. These values carry no deeper policy;
/// they are kept stable so answers stay comparable across releases.
pub fn fetch_cap(intent: IntentTag) -> usize {
    match intent {
        IntentTag::Sprint => 50,
        IntentTag::Completed | IntentTag::All => 30,
        IntentTag::Bugs | IntentTag::MyItems | IntentTag::Critical | IntentTag::UserStories => 20,
        IntentTag::PullRequests | IntentTag::Builds => 0,
    }
}

pub fn build_plan(intent: IntentTag, modifiers: &QueryModifiers, project: &str) -> QueryPlan {
    let statement = match intent {
        IntentTag::PullRequests => {
            return QueryPlan::PullRequests {
                status: PULL_REQUEST_STATUS,
            };
        }
        IntentTag::Builds => return QueryPlan::Builds { top: BUILD_LIST_TOP },
        IntentTag::Bugs => bugs_statement(project, modifiers.open_only),
        IntentTag::MyItems => my_items_statement(project),
        IntentTag::Sprint => sprint_statement(project),
        IntentTag::Critical => critical_statement(project),
        IntentTag::UserStories => user_stories_statement(project, modifiers.high_priority),
        IntentTag::Completed => completed_statement(project, modifiers.window_days),
        IntentTag::All => all_items_statement(project),
    };

    QueryPlan::Wiql {
        statement,
        fetch_cap: fetch_cap(intent),
    }
}

fn statement(select: &[&str], conditions: &[String], order_by: &str) -> String {
    let columns = select
        .iter()
        .map(|f| format!("[{}]", f))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT {}\nFROM WorkItems\nWHERE {}\nORDER BY {}",
        columns,
        conditions.join("\nAND "),
        order_by
    )
}

fn in_project(project: &str) -> String {
    format!("[System.TeamProject] = '{}'", project)
}

pub fn bugs_statement(project: &str, open_only: bool) -> String {
    let select = [
        "System.Id",
        "System.Title",
        "System.State",
        "System.AssignedTo",
        "Microsoft.VSTS.Common.Priority",
    ];
    let mut conditions = vec![
        in_project(project),
        "[System.WorkItemType] = 'Bug'".to_string(),
    ];

    if open_only {
        conditions.push("[System.State] NOT IN ('Closed', 'Resolved', 'Done')".to_string());
        statement(&select, &conditions, "[Microsoft.VSTS.Common.Priority] ASC")
    } else {
        statement(&select, &conditions, "[System.ChangedDate] DESC")
    }
}

pub fn my_items_statement(project: &str) -> String {
    statement(
        &[
            "System.Id",
            "System.Title",
            "System.WorkItemType",
            "System.State",
        ],
        &[
            in_project(project),
            "[System.AssignedTo] = @Me".to_string(),
            "[System.State] NOT IN ('Closed', 'Done', 'Removed')".to_string(),
        ],
        "[Microsoft.VSTS.Common.Priority] ASC, [System.ChangedDate] DESC",
    )
}

/// The current sprint is approximated by everything under the project's iteration root.
pub fn sprint_statement(project: &str) -> String {
    statement(
        &[
            "System.Id",
            "System.Title",
            "System.WorkItemType",
            "System.State",
            "System.AssignedTo",
        ],
        &[
            in_project(project),
            format!("[System.IterationPath] UNDER '{}'", project),
            "[System.State] NOT IN ('Removed')".to_string(),
        ],
        "[System.WorkItemType], [System.State]",
    )
}

pub fn critical_statement(project: &str) -> String {
    statement(
        &[
            "System.Id",
            "System.Title",
            "System.WorkItemType",
            "System.State",
            "Microsoft.VSTS.Common.Priority",
        ],
        &[
            in_project(project),
            "[Microsoft.VSTS.Common.Priority] <= 2".to_string(),
            "[System.State] NOT IN ('Closed', 'Done', 'Resolved')".to_string(),
        ],
        "[Microsoft.VSTS.Common.Priority] ASC, [System.ChangedDate] DESC",
    )
}

pub fn user_stories_statement(project: &str, high_priority: bool) -> String {
    let mut conditions = vec![
        in_project(project),
        "[System.WorkItemType] = 'User Story'".to_string(),
    ];

    if high_priority {
        conditions.push("[Microsoft.VSTS.Common.Priority] <= 2".to_string());
        statement(
            &[
                "System.Id",
                "System.Title",
                "System.State",
                "Microsoft.VSTS.Common.Priority",
            ],
            &conditions,
            "[Microsoft.VSTS.Common.Priority] ASC",
        )
    } else {
        conditions.push("[System.State] NOT IN ('Closed', 'Done', 'Removed')".to_string());
        statement(
            &[
                "System.Id",
                "System.Title",
                "System.State",
                "System.AssignedTo",
            ],
            &conditions,
            "[System.ChangedDate] DESC",
        )
    }
}

pub fn completed_statement(project: &str, window_days: u32) -> String {
    statement(
        &[
            "System.Id",
            "System.Title",
            "System.WorkItemType",
            "System.ClosedDate",
        ],
        &[
            in_project(project),
            "[System.State] IN ('Closed', 'Done', 'Resolved')".to_string(),
            format!("[System.ClosedDate] >= @Today - {}", window_days),
        ],
        "[System.ClosedDate] DESC",
    )
}

pub fn all_items_statement(project: &str) -> String {
    statement(
        &[
            "System.Id",
            "System.Title",
            "System.WorkItemType",
            "System.State",
        ],
        &[
            in_project(project),
            "[System.State] NOT IN ('Closed', 'Done', 'Removed', 'Resolved')".to_string(),
        ],
        "[System.ChangedDate] DESC",
    )
}
