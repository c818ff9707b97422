//! Best-effort translation of structured query strings into the simple
//! parameters understood by custom backends.
//!
//! Neither translator is a parser. Content queries degrade to a bag of
//! search terms; issue queries keep only `project`, `status` and `assignee`
//! equality clauses. Both accept any input, including plain free text.

use std::sync::LazyLock;

use regex::Regex;

static BOOLEAN_KEYWORDS: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)\b(and|or|not)\b").expect("boolean keyword pattern is valid"));

static CONTENT_QUALIFIER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"(?i)(space|type|title|text)\s*=\s*["']?([^"']+)["']?"#).expect("qualifier pattern is valid")
});

static PROJECT_CLAUSE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)project\s*=\s*(\S+)").expect("project pattern is valid"));

static STATUS_CLAUSE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)status\s*=\s*(\S+)").expect("status pattern is valid"));

static ASSIGNEE_CLAUSE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)assignee\s*=\s*(\S+)").expect("assignee pattern is valid"));

/// Sentinel the custom issue API understands as "the authenticated user".
pub const CURRENT_USER: &str = "me";

/// Reduce a content query to space-separated search terms.
///
/// Boolean keywords are dropped, `space|type|title|text = "value"` clauses
/// are replaced by their bare value, and tokens of two characters or fewer
/// are discarded.
pub fn content_query_terms(query: &str) -> String {
  let without_keywords = BOOLEAN_KEYWORDS.replace_all(query, " ");
  let without_qualifiers = CONTENT_QUALIFIER.replace_all(&without_keywords, "${2}");

  without_qualifiers
    .split_whitespace()
    .filter(|term| term.chars().count() > 2)
    .collect::<Vec<_>>()
    .join(" ")
}

/// Filters extracted from an issue query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilters {
  pub project: Option<String>,
  pub status: Option<String>,
  pub assignee: Option<String>,
}

impl IssueFilters {
  /// Filters as query parameters, in `project`, `status`, `assignee` order.
  pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
    [
      ("project", &self.project),
      ("status", &self.status),
      ("assignee", &self.assignee),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.clone().map(|value| (key, value)))
    .collect()
  }

  pub fn is_empty(&self) -> bool {
    self.project.is_none() && self.status.is_none() && self.assignee.is_none()
  }
}

/// Extract `project`, `status` and `assignee` equality filters.
///
/// Matching is case-insensitive and surrounding quotes are stripped. When a
/// clause occurs more than once the last occurrence wins. An assignee of
/// `currentUser()` becomes [`CURRENT_USER`].
pub fn issue_query_filters(query: &str) -> IssueFilters {
  let project = last_clause_value(&PROJECT_CLAUSE, query).map(|v| strip_quotes(&v));
  let status = last_clause_value(&STATUS_CLAUSE, query).map(|v| strip_quotes(&v).replace('"', ""));
  let assignee = last_clause_value(&ASSIGNEE_CLAUSE, query).map(|v| {
    let value = strip_quotes(&v);
    if value.eq_ignore_ascii_case("currentuser()") {
      CURRENT_USER.to_string()
    } else {
      value
    }
  });

  IssueFilters {
    project,
    status,
    assignee,
  }
}

fn last_clause_value(pattern: &Regex, query: &str) -> Option<String> {
  pattern
    .captures_iter(query)
    .last()
    .and_then(|captures| captures.get(1))
    .map(|m| m.as_str().to_string())
}

fn strip_quotes(value: &str) -> String {
  value.trim_matches(|c| c == '"' || c == '\'').to_string()
}
