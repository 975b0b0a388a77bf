use crate::assistant::intent::IntentTag;
use crate::assistant::result::QueryResult;
use crate::assistant::wiql::QueryModifiers;
use crate::azure::models::{Build, PullRequest, WorkItem};
use std::collections::BTreeMap;
use std::fmt::{Display, Write};

/// Narrative lines rendered for list-style answers.
pub const MAX_LISTED: usize = 10;
pub const MY_ITEMS_PER_TYPE: usize = 5;
pub const COMPLETED_PER_TYPE: usize = 3;
pub const ALL_ITEMS_PER_TYPE: usize = 10;

/// Answer for a failed id-list or listing call. No detail fetch follows.
pub fn failure(intent: IntentTag, error: &impl Display) -> QueryResult {
    QueryResult::new(
        format!("Failed to query {}: {}", intent.subject(), error),
        intent,
        0,
        1,
    )
}

/// Answer for a successful call that matched nothing.
pub fn empty(intent: IntentTag, modifiers: &QueryModifiers) -> QueryResult {
    let answer = match intent {
        IntentTag::Bugs => "No bugs found matching your criteria.".to_string(),
        IntentTag::MyItems => "You have no work items currently assigned to you.".to_string(),
        IntentTag::Sprint => "No work items found in the current sprint.".to_string(),
        IntentTag::PullRequests => "No active pull requests found.".to_string(),
        IntentTag::Builds => "No recent builds found.".to_string(),
        IntentTag::Critical => "No critical or high priority items found.".to_string(),
        IntentTag::UserStories => "No user stories found.".to_string(),
        IntentTag::Completed => format!(
            "No items completed in the last {} day(s).",
            modifiers.window_days
        ),
        IntentTag::All => "No active work items found in the project.".to_string(),
    };
    QueryResult::new(answer, intent, 0, 1)
}

/// Renders the answer for a WIQL intent from the total match count and the
/// fetched details. `found` is the id-list length, not the detail count.
pub fn render_work_items(
    intent: IntentTag,
    modifiers: &QueryModifiers,
    found: usize,
    details: &[WorkItem],
) -> String {
    match intent {
        IntentTag::Bugs => render_bugs(found, details),
        IntentTag::MyItems => render_my_items(found, details),
        IntentTag::Sprint => render_sprint(&SprintStats::collect(found, details)),
        IntentTag::Critical => render_critical(found, details),
        IntentTag::UserStories => render_user_stories(found, details),
        IntentTag::Completed => render_completed(found, modifiers.window_days, details),
        IntentTag::All => render_all(found, details),
        IntentTag::PullRequests | IntentTag::Builds => {
            log::warn!("{} is not a work item intent", intent);
            String::new()
        }
    }
}

fn push_overflow(answer: &mut String, found: usize, rendered: usize, noun: &str) {
    if found > rendered {
        let _ = write!(answer, "... and {} more {}", found - rendered, noun);
    }
}

fn render_bugs(found: usize, details: &[WorkItem]) -> String {
    let mut answer = format!("Found {} bug(s):\n\n", found);
    let shown = &details[..details.len().min(MAX_LISTED)];

    for item in shown {
        let _ = writeln!(answer, "• #{}: {}", item.id, item.title());
        let _ = write!(
            answer,
            "  State: {} | Priority: {} | Assigned to: {}\n\n",
            item.state(),
            item.priority_label(),
            item.assignee()
        );
    }

    push_overflow(&mut answer, found, shown.len(), "bugs");
    answer
}

fn render_critical(found: usize, details: &[WorkItem]) -> String {
    let mut answer = format!("Found {} critical/high priority item(s):\n\n", found);
    let shown = &details[..details.len().min(MAX_LISTED)];

    for item in shown {
        let label = if item.priority() == Some(1) {
            "🔴 Critical"
        } else {
            "🟠 High"
        };
        let _ = writeln!(answer, "{} #{}: {}", label, item.id, item.title());
        let _ = write!(
            answer,
            "  Type: {} | State: {} | Assigned: {}\n\n",
            item.work_item_type(),
            item.state(),
            item.assignee()
        );
    }

    push_overflow(&mut answer, found, shown.len(), "items");
    answer
}

fn render_user_stories(found: usize, details: &[WorkItem]) -> String {
    let mut answer = format!("Found {} user story(ies):\n\n", found);
    let shown = &details[..details.len().min(MAX_LISTED)];

    for item in shown {
        let _ = writeln!(answer, "• #{}: {}", item.id, item.title());
        let _ = write!(answer, "  State: {}", item.state());
        if let Some(priority) = item.priority() {
            let _ = write!(answer, " | Priority: {}", priority);
        }
        answer.push_str("\n\n");
    }

    push_overflow(&mut answer, found, shown.len(), "user stories");
    answer
}

/// Groups items by work item type, ordered by the first appearance of each type.
pub fn group_by_type(details: &[WorkItem]) -> Vec<(&str, Vec<&WorkItem>)> {
    let mut groups: Vec<(&str, Vec<&WorkItem>)> = Vec::new();
    for item in details {
        let wi_type = item.work_item_type();
        match groups.iter_mut().find(|(t, _)| *t == wi_type) {
            Some((_, items)) => items.push(item),
            None => groups.push((wi_type, vec![item])),
        }
    }
    groups
}

/// Writes one `Types (n):` block per group and returns the number of item lines written.
fn push_groups(
    answer: &mut String,
    details: &[WorkItem],
    per_group: usize,
    line: impl Fn(&WorkItem) -> String,
) -> usize {
    let mut rendered = 0;
    for (wi_type, items) in group_by_type(details) {
        let _ = writeln!(answer, "{}s ({}):", wi_type, items.len());
        for item in items.iter().take(per_group) {
            answer.push_str(&line(item));
            answer.push('\n');
            rendered += 1;
        }
        answer.push('\n');
    }
    rendered
}

fn render_my_items(found: usize, details: &[WorkItem]) -> String {
    let mut answer = format!("You have {} work item(s) assigned:\n\n", found);
    let rendered = push_groups(&mut answer, details, MY_ITEMS_PER_TYPE, |item| {
        format!("• #{}: {} [{}]", item.id, item.title(), item.state())
    });
    push_overflow(&mut answer, found, rendered, "items");
    answer
}

fn render_completed(found: usize, window_days: u32, details: &[WorkItem]) -> String {
    let mut answer = format!(
        "Completed in the last {} day(s): {} item(s)\n\n",
        window_days, found
    );
    let rendered = push_groups(&mut answer, details, COMPLETED_PER_TYPE, |item| {
        format!("• #{}: {}", item.id, item.title())
    });
    push_overflow(&mut answer, found, rendered, "items");
    answer
}

fn render_all(found: usize, details: &[WorkItem]) -> String {
    let mut answer = format!("Active work items in project: {}\n\n", found);
    let rendered = push_groups(&mut answer, details, ALL_ITEMS_PER_TYPE, |item| {
        format!("• #{}: {} [{}]", item.id, item.title(), item.state())
    });
    push_overflow(&mut answer, found, rendered, "items");
    answer
}

/// Sprint statistics over the fetched details. `total` is the id-list length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SprintStats {
    pub total: usize,
    pub by_state: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
}

impl SprintStats {
    pub fn collect(total: usize, details: &[WorkItem]) -> Self {
        let mut stats = SprintStats {
            total,
            ..Default::default()
        };
        for item in details {
            *stats.by_state.entry(item.state().to_string()).or_insert(0) += 1;
            *stats
                .by_type
                .entry(item.work_item_type().to_string())
                .or_insert(0) += 1;
        }
        stats
    }

    /// Items in state Done or Closed.
    pub fn completed(&self) -> usize {
        ["Done", "Closed"]
            .iter()
            .filter_map(|state| self.by_state.get(*state))
            .sum()
    }

    /// Completed share of `total` in percent; `None` when the sprint is empty.
    pub fn completion_percentage(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(self.completed() as f64 / self.total as f64 * 100.0)
    }
}

fn render_sprint(stats: &SprintStats) -> String {
    let mut answer = String::from("Current Sprint Status:\n\n");
    let _ = write!(answer, "Total Work Items: {}\n\n", stats.total);

    answer.push_str("By State:\n");
    for (state, count) in &stats.by_state {
        let _ = writeln!(answer, "• {}: {}", state, count);
    }

    answer.push_str("\nBy Type:\n");
    for (wi_type, count) in &stats.by_type {
        let _ = writeln!(answer, "• {}: {}", wi_type, count);
    }

    if let Some(completion) = stats.completion_percentage() {
        let _ = write!(
            answer,
            "\nCompletion: {:.1}% ({}/{})",
            completion,
            stats.completed(),
            stats.total
        );
    }
    answer
}

pub fn render_pull_requests(prs: &[PullRequest]) -> QueryResult {
    if prs.is_empty() {
        return empty(IntentTag::PullRequests, &QueryModifiers::from_text(""));
    }

    let mut answer = format!("Found {} active pull request(s):\n\n", prs.len());
    let shown = &prs[..prs.len().min(MAX_LISTED)];

    for pr in shown {
        let _ = writeln!(answer, "• PR #{}: {}", pr.pull_request_id, pr.title);
        let _ = writeln!(
            answer,
            "  By: {} | Target: {}",
            pr.created_by.display_name.as_deref().unwrap_or("Unknown"),
            pr.target_branch()
        );
        let _ = write!(
            answer,
            "  Status: {} | Reviewers: {}\n\n",
            pr.status,
            pr.reviewers.len()
        );
    }

    push_overflow(&mut answer, prs.len(), shown.len(), "pull requests");
    QueryResult::new(answer, IntentTag::PullRequests, prs.len(), 1)
}

pub fn render_builds(builds: &[Build]) -> QueryResult {
    if builds.is_empty() {
        return empty(IntentTag::Builds, &QueryModifiers::from_text(""));
    }

    let mut answer = String::from("Recent builds:\n\n");
    let mut succeeded = 0;
    let mut failed = 0;

    for build in builds {
        let result = build.result_label();
        let marker = match result {
            "succeeded" => {
                succeeded += 1;
                "✅"
            }
            "failed" => {
                failed += 1;
                "❌"
            }
            _ => "⏳",
        };

        let _ = writeln!(
            answer,
            "{} Build #{}: {}",
            marker,
            build.id,
            build.definition_name()
        );
        let _ = writeln!(
            answer,
            "   Status: {} | Requested by: {}",
            result,
            build.requested_by()
        );
        let _ = write!(
            answer,
            "   Started: {}\n\n",
            build.start_time.as_deref().unwrap_or("N/A")
        );
    }

    let _ = write!(
        answer,
        "\nSummary: {} succeeded, {} failed",
        succeeded, failed
    );
    QueryResult::new(answer, IntentTag::Builds, builds.len(), 1)
}
