//! PR checklist: YAML-backed questions with conditional follow-ups, and
//! named task lists with single-parent inheritance.
//!
//! The wire format is camelCase to match existing checklist documents, and
//! every document is validated against the embedded JSON Schema before any
//! of it is interpreted.

use crate::error::{Result, StrideError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

pub const CHECKLIST_SCHEMA: &str = include_str!("../schema/checklist.schema.json");

// ---------------------------------------------------------------------------
// Data model
// ---------------------------------------------------------------------------

/// A leaf action item. Identity is the text itself: two tasks with the same
/// text are the same task, no matter which list they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskData {
    pub text: String,
}

impl TaskData {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends_task_list: Option<String>,
    pub tasks: Vec<TaskData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_list_to_include: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_questions_to_ask: Vec<QuestionData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionData {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_true: Option<ConditionData>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_checked: bool,
}

fn is_false(b: &bool) -> bool {
    !b
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistData {
    pub questions: Vec<QuestionData>,
    pub task_lists: BTreeMap<String, TaskListData>,
}

// ---------------------------------------------------------------------------
// Loading & schema validation
// ---------------------------------------------------------------------------

impl ChecklistData {
    /// Parse and validate a checklist document. Nothing downstream runs on a
    /// document that fails schema validation.
    pub fn from_yaml(data: &str) -> Result<Self> {
        let value: serde_json::Value = serde_yaml::from_str(data)?;
        validate_against_schema(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_yaml(&data)
    }
}

fn validate_against_schema(instance: &serde_json::Value) -> Result<()> {
    let schema: serde_json::Value = serde_json::from_str(CHECKLIST_SCHEMA)?;
    let validator =
        jsonschema::validator_for(&schema).map_err(|e| StrideError::Schema(e.to_string()))?;
    let messages: Vec<String> = validator
        .iter_errors(instance)
        .map(|err| format!("At '{}': {}", err.instance_path(), err))
        .collect();
    if messages.is_empty() {
        Ok(())
    } else {
        Err(StrideError::SchemaInvalid { messages })
    }
}

// ---------------------------------------------------------------------------
// Task-list resolution
// ---------------------------------------------------------------------------

/// Flatten a task list and its inheritance chain into the tasks it implies.
///
/// Ancestors contribute first, then the list's own tasks; duplicates (by
/// text) collapse to the first occurrence. Unknown names and inheritance
/// cycles are configuration errors, not something to loop on.
pub fn resolve_tasks(
    task_lists: &BTreeMap<String, TaskListData>,
    name: &str,
) -> Result<Vec<TaskData>> {
    let mut resolved = Vec::new();
    let mut chain = Vec::new();
    resolve_into(task_lists, name, &mut chain, &mut resolved)?;
    Ok(resolved)
}

fn resolve_into(
    task_lists: &BTreeMap<String, TaskListData>,
    name: &str,
    chain: &mut Vec<String>,
    resolved: &mut Vec<TaskData>,
) -> Result<()> {
    if chain.iter().any(|seen| seen == name) {
        return Err(StrideError::TaskListCycle(name.to_string()));
    }
    let list = task_lists
        .get(name)
        .ok_or_else(|| StrideError::TaskListNotFound(name.to_string()))?;

    chain.push(name.to_string());
    if let Some(parent) = &list.extends_task_list {
        resolve_into(task_lists, parent, chain, resolved)?;
    }
    chain.pop();

    for task in &list.tasks {
        if !resolved.iter().any(|have| have.text == task.text) {
            resolved.push(task.clone());
        }
    }
    Ok(())
}

/// The additional tasks implied by every checked question, recursively
/// including checked follow-ups. Follow-ups under an unchecked question are
/// not visited: their answers are not on display, so they carry no weight.
pub fn required_tasks(checklist: &ChecklistData) -> Result<Vec<TaskData>> {
    let mut tasks = Vec::new();
    collect_required(&checklist.questions, &checklist.task_lists, &mut tasks)?;
    Ok(tasks)
}

fn collect_required(
    questions: &[QuestionData],
    task_lists: &BTreeMap<String, TaskListData>,
    tasks: &mut Vec<TaskData>,
) -> Result<()> {
    for question in questions {
        if !question.is_checked {
            continue;
        }
        let Some(condition) = &question.when_true else {
            continue;
        };
        if let Some(list_name) = &condition.task_list_to_include {
            for task in resolve_tasks(task_lists, list_name)? {
                if !tasks.iter().any(|have| have.text == task.text) {
                    tasks.push(task);
                }
            }
        }
        collect_required(&condition.additional_questions_to_ask, task_lists, tasks)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Question addressing
// ---------------------------------------------------------------------------

/// Explicit address of a question in the tree: the first index picks a
/// top-level question, each further index descends into that question's
/// `whenTrue.additionalQuestionsToAsk`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionPath(Vec<usize>);

impl QuestionPath {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for QuestionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        f.write_str(&parts.join("."))
    }
}

impl std::str::FromStr for QuestionPath {
    type Err = StrideError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(StrideError::InvalidPath(s.to_string()));
        }
        let indices = s
            .split('.')
            .map(|part| {
                part.parse::<usize>()
                    .map_err(|_| StrideError::InvalidPath(s.to_string()))
            })
            .collect::<Result<Vec<usize>>>()?;
        Ok(QuestionPath(indices))
    }
}

/// Look up the question a path addresses, if any.
pub fn question_at<'a>(
    questions: &'a [QuestionData],
    path: &QuestionPath,
) -> Option<&'a QuestionData> {
    let (first, rest) = path.0.split_first()?;
    let mut current = questions.get(*first)?;
    for index in rest {
        current = current
            .when_true
            .as_ref()?
            .additional_questions_to_ask
            .get(*index)?;
    }
    Some(current)
}

/// Set the checked state of the question a path addresses.
pub fn set_checked(
    questions: &mut [QuestionData],
    path: &QuestionPath,
    checked: bool,
) -> Result<()> {
    let dangling = || StrideError::QuestionNotFound(path.to_string());
    let (first, rest) = path.0.split_first().ok_or_else(dangling)?;
    let mut current = questions.get_mut(*first).ok_or_else(dangling)?;
    for index in rest {
        current = current
            .when_true
            .as_mut()
            .ok_or_else(dangling)?
            .additional_questions_to_ask
            .get_mut(*index)
            .ok_or_else(dangling)?;
    }
    current.is_checked = checked;
    Ok(())
}

/// Paths of every checked question, in document order. Follow-ups under an
/// unchecked question are not reported.
pub fn checked_paths(questions: &[QuestionData]) -> Vec<QuestionPath> {
    let mut paths = Vec::new();
    let mut prefix = Vec::new();
    collect_checked(questions, &mut prefix, &mut paths);
    paths
}

fn collect_checked(
    questions: &[QuestionData],
    prefix: &mut Vec<usize>,
    paths: &mut Vec<QuestionPath>,
) {
    for (index, question) in questions.iter().enumerate() {
        if !question.is_checked {
            continue;
        }
        prefix.push(index);
        paths.push(QuestionPath(prefix.clone()));
        if let Some(condition) = &question.when_true {
            collect_checked(&condition.additional_questions_to_ask, prefix, paths);
        }
        prefix.pop();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn severity_lists() -> BTreeMap<String, TaskListData> {
        let mut lists = BTreeMap::new();
        lists.insert(
            "Medium".to_string(),
            TaskListData {
                extends_task_list: None,
                tasks: vec![TaskData::new("Update the threat model for this service")],
            },
        );
        lists.insert(
            "High".to_string(),
            TaskListData {
                extends_task_list: Some("Medium".to_string()),
                tasks: vec![TaskData::new("Consult a security engineer before merging")],
            },
        );
        lists
    }

    #[test]
    fn resolve_base_list() {
        let lists = severity_lists();
        let tasks = resolve_tasks(&lists, "Medium").unwrap();
        assert_eq!(tasks, vec![TaskData::new("Update the threat model for this service")]);
    }

    #[test]
    fn resolve_inherits_ancestor_tasks() {
        let lists = severity_lists();
        let tasks = resolve_tasks(&lists, "High").unwrap();
        assert_eq!(
            tasks,
            vec![
                TaskData::new("Update the threat model for this service"),
                TaskData::new("Consult a security engineer before merging"),
            ]
        );
    }

    #[test]
    fn resolve_dedups_by_text() {
        let mut lists = severity_lists();
        lists
            .get_mut("High")
            .unwrap()
            .tasks
            .push(TaskData::new("Update the threat model for this service"));
        let tasks = resolve_tasks(&lists, "High").unwrap();
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn resolve_unknown_name_fails() {
        let lists = severity_lists();
        assert!(matches!(
            resolve_tasks(&lists, "Critical"),
            Err(StrideError::TaskListNotFound(_))
        ));
    }

    #[test]
    fn resolve_detects_cycle() {
        let mut lists = BTreeMap::new();
        lists.insert(
            "A".to_string(),
            TaskListData {
                extends_task_list: Some("B".to_string()),
                tasks: vec![],
            },
        );
        lists.insert(
            "B".to_string(),
            TaskListData {
                extends_task_list: Some("A".to_string()),
                tasks: vec![],
            },
        );
        assert!(matches!(
            resolve_tasks(&lists, "A"),
            Err(StrideError::TaskListCycle(_))
        ));
    }

    #[test]
    fn resolve_self_cycle() {
        let mut lists = BTreeMap::new();
        lists.insert(
            "A".to_string(),
            TaskListData {
                extends_task_list: Some("A".to_string()),
                tasks: vec![],
            },
        );
        assert!(matches!(
            resolve_tasks(&lists, "A"),
            Err(StrideError::TaskListCycle(_))
        ));
    }

    const SAMPLE: &str = r#"
questions:
  - text: Does this PR change authentication or authorization logic?
    whenTrue:
      taskListToInclude: High
      additionalQuestionsToAsk:
        - text: Does it touch session handling?
          whenTrue:
            taskListToInclude: Medium
  - text: Does this PR add a new dependency?
    whenTrue:
      taskListToInclude: Medium
taskLists:
  Medium:
    tasks:
      - text: Update the threat model for this service
  High:
    extendsTaskList: Medium
    tasks:
      - text: Consult a security engineer before merging
"#;

    #[test]
    fn from_yaml_parses_valid_document() {
        let checklist = ChecklistData::from_yaml(SAMPLE).unwrap();
        assert_eq!(checklist.questions.len(), 2);
        assert_eq!(checklist.task_lists.len(), 2);
        assert_eq!(
            checklist.task_lists["High"].extends_task_list.as_deref(),
            Some("Medium")
        );
    }

    #[test]
    fn from_yaml_rejects_wrong_shape() {
        let err = ChecklistData::from_yaml("questions: nope\ntaskLists: {}\n").unwrap_err();
        match err {
            StrideError::SchemaInvalid { messages } => {
                assert!(!messages.is_empty());
                assert!(messages[0].contains("/questions"));
            }
            other => panic!("expected SchemaInvalid, got {other:?}"),
        }
    }

    #[test]
    fn from_yaml_rejects_unknown_fields() {
        let yaml = "questions:\n  - text: Q\n    severity: high\ntaskLists: {}\n";
        assert!(matches!(
            ChecklistData::from_yaml(yaml),
            Err(StrideError::SchemaInvalid { .. })
        ));
    }

    #[test]
    fn from_yaml_rejects_missing_task_lists() {
        assert!(matches!(
            ChecklistData::from_yaml("questions: []\n"),
            Err(StrideError::SchemaInvalid { .. })
        ));
    }

    #[test]
    fn from_yaml_reports_all_violations() {
        let yaml = "questions:\n  - text: 1\n  - nope: true\ntaskLists: {}\n";
        match ChecklistData::from_yaml(yaml).unwrap_err() {
            StrideError::SchemaInvalid { messages } => assert!(messages.len() >= 2),
            other => panic!("expected SchemaInvalid, got {other:?}"),
        }
    }

    #[test]
    fn required_tasks_empty_when_nothing_checked() {
        let checklist = ChecklistData::from_yaml(SAMPLE).unwrap();
        assert!(required_tasks(&checklist).unwrap().is_empty());
    }

    #[test]
    fn required_tasks_unions_checked_questions() {
        let mut checklist = ChecklistData::from_yaml(SAMPLE).unwrap();
        set_checked(
            &mut checklist.questions,
            &QuestionPath::from_str("0").unwrap(),
            true,
        )
        .unwrap();
        set_checked(
            &mut checklist.questions,
            &QuestionPath::from_str("1").unwrap(),
            true,
        )
        .unwrap();

        let tasks = required_tasks(&checklist).unwrap();
        // High already includes everything Medium implies; the union stays
        // deduplicated.
        assert_eq!(
            tasks,
            vec![
                TaskData::new("Update the threat model for this service"),
                TaskData::new("Consult a security engineer before merging"),
            ]
        );
    }

    #[test]
    fn required_tasks_includes_checked_followups() {
        let mut checklist = ChecklistData::from_yaml(SAMPLE).unwrap();
        set_checked(
            &mut checklist.questions,
            &QuestionPath::from_str("0").unwrap(),
            true,
        )
        .unwrap();
        set_checked(
            &mut checklist.questions,
            &QuestionPath::from_str("0.0").unwrap(),
            true,
        )
        .unwrap();

        let tasks = required_tasks(&checklist).unwrap();
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn followups_under_unchecked_parent_are_ignored() {
        let mut checklist = ChecklistData::from_yaml(SAMPLE).unwrap();
        // Check only the nested follow-up; its parent stays unchecked.
        set_checked(
            &mut checklist.questions,
            &QuestionPath::from_str("0.0").unwrap(),
            true,
        )
        .unwrap();
        assert!(required_tasks(&checklist).unwrap().is_empty());
        assert!(checked_paths(&checklist.questions).is_empty());
    }

    #[test]
    fn path_parse_and_display_roundtrip() {
        let path = QuestionPath::from_str("2.0.1").unwrap();
        assert_eq!(path.indices(), &[2, 0, 1]);
        assert_eq!(path.to_string(), "2.0.1");
    }

    #[test]
    fn path_rejects_garbage() {
        assert!(QuestionPath::from_str("").is_err());
        assert!(QuestionPath::from_str("1.x").is_err());
        assert!(QuestionPath::from_str(".1").is_err());
    }

    #[test]
    fn question_at_walks_nesting() {
        let checklist = ChecklistData::from_yaml(SAMPLE).unwrap();
        let q = question_at(
            &checklist.questions,
            &QuestionPath::from_str("0.0").unwrap(),
        )
        .unwrap();
        assert_eq!(q.text, "Does it touch session handling?");
        assert!(question_at(
            &checklist.questions,
            &QuestionPath::from_str("0.7").unwrap()
        )
        .is_none());
    }

    #[test]
    fn set_checked_dangling_path_fails() {
        let mut checklist = ChecklistData::from_yaml(SAMPLE).unwrap();
        assert!(matches!(
            set_checked(
                &mut checklist.questions,
                &QuestionPath::from_str("1.0").unwrap(),
                true
            ),
            Err(StrideError::QuestionNotFound(_))
        ));
    }

    #[test]
    fn checked_paths_in_document_order() {
        let mut checklist = ChecklistData::from_yaml(SAMPLE).unwrap();
        for raw in ["1", "0", "0.0"] {
            set_checked(
                &mut checklist.questions,
                &QuestionPath::from_str(raw).unwrap(),
                true,
            )
            .unwrap();
        }
        let paths: Vec<String> = checked_paths(&checklist.questions)
            .iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(paths, vec!["0", "0.0", "1"]);
    }

    #[test]
    fn is_checked_roundtrips_through_yaml() {
        let mut checklist = ChecklistData::from_yaml(SAMPLE).unwrap();
        set_checked(
            &mut checklist.questions,
            &QuestionPath::from_str("0").unwrap(),
            true,
        )
        .unwrap();
        let yaml = serde_yaml::to_string(&checklist).unwrap();
        let reloaded = ChecklistData::from_yaml(&yaml).unwrap();
        assert!(reloaded.questions[0].is_checked);
        assert!(!reloaded.questions[1].is_checked);
    }
}
