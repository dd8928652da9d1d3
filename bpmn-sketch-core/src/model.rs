use serde::{Deserialize, Serialize};

/// Upper bound on tasks carried into a diagram. Extra entries are dropped.
pub const MAX_TASKS: usize = 8;

/// Upper bound on decisions carried into a diagram.
pub const MAX_DECISIONS: usize = 3;

fn default_process_name() -> String {
    "Business Process".to_string()
}

/// The structured process description produced by an extractor.
///
/// Every field defaults when absent, so any JSON object deserializes into a
/// usable model. `events` and `sequence` are informational only; routing is
/// derived from `tasks` and `decisions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessModel {
    #[serde(default = "default_process_name")]
    pub process_name: String,
    #[serde(default)]
    pub tasks: Vec<TaskModel>,
    #[serde(default)]
    pub decisions: Vec<DecisionModel>,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub sequence: Vec<String>,
}

impl Default for ProcessModel {
    fn default() -> Self {
        Self {
            process_name: default_process_name(),
            tasks: Vec::new(),
            decisions: Vec::new(),
            events: Vec::new(),
            sequence: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskModel {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub actor: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionModel {
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub yes: String,
    #[serde(default)]
    pub no: String,
}

impl ProcessModel {
    /// Apply defaults and size caps. Idempotent; the compiler calls this on
    /// every input, callers may pre-apply it.
    pub fn normalized(mut self) -> Self {
        if self.process_name.trim().is_empty() {
            self.process_name = default_process_name();
        }
        self.tasks.truncate(MAX_TASKS);
        self.decisions.truncate(MAX_DECISIONS);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_deserializes_to_defaults() {
        let model: ProcessModel = serde_json::from_str("{}").unwrap();
        assert_eq!(model.process_name, "Business Process");
        assert!(model.tasks.is_empty());
        assert!(model.decisions.is_empty());
        assert!(model.events.is_empty());
        assert!(model.sequence.is_empty());
    }

    #[test]
    fn partial_entries_default_their_fields() {
        let model: ProcessModel = serde_json::from_str(
            r#"{"process_name":"Refund","tasks":[{"name":"Check order"}],"decisions":[{"condition":"Valid?"}]}"#,
        )
        .unwrap();
        assert_eq!(model.tasks[0].actor, "");
        assert_eq!(model.decisions[0].yes, "");
        assert_eq!(model.decisions[0].no, "");
    }

    #[test]
    fn normalization_caps_lists_and_names_blank_processes() {
        let model = ProcessModel {
            process_name: "   ".to_string(),
            tasks: (0..20)
                .map(|i| TaskModel {
                    name: format!("t{}", i),
                    actor: String::new(),
                })
                .collect(),
            decisions: (0..5)
                .map(|i| DecisionModel {
                    condition: format!("d{}", i),
                    yes: String::new(),
                    no: String::new(),
                })
                .collect(),
            events: Vec::new(),
            sequence: Vec::new(),
        }
        .normalized();

        assert_eq!(model.process_name, "Business Process");
        assert_eq!(model.tasks.len(), MAX_TASKS);
        assert_eq!(model.decisions.len(), MAX_DECISIONS);
        assert_eq!(model.tasks[0].name, "t0");
    }
}
