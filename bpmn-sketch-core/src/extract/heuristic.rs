use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;

use super::ModelExtractor;
use crate::model::{DecisionModel, ProcessModel, TaskModel, MAX_DECISIONS};

/// Verbs that mark a sentence as an actionable task.
const TASK_VERBS: [&str; 8] = [
    "check", "process", "validate", "approve", "send", "create", "update", "verify",
];

/// The heuristic keeps fewer tasks than the compiler cap; short diagrams
/// read better when nothing ranked the sentences.
const MAX_HEURISTIC_TASKS: usize = 6;

/// Keyword-based extractor used when no language model is reachable.
///
/// Splits the text into sentences; verb-bearing sentences become tasks and
/// "if"/"when" sentences become decisions.
#[derive(Debug, Clone)]
pub struct HeuristicExtractor {
    sentence_split: Regex,
}

impl Default for HeuristicExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl HeuristicExtractor {
    pub fn new() -> Self {
        Self {
            sentence_split: Regex::new(r"[.!?]+").unwrap(),
        }
    }

    /// Synchronous extraction; never fails.
    pub fn extract_model(&self, text: &str) -> ProcessModel {
        let mut tasks = Vec::new();
        let mut decisions = Vec::new();

        for raw in self.sentence_split.split(text) {
            let sentence = raw.trim();
            if sentence.is_empty() {
                continue;
            }
            let lowered = sentence.to_lowercase();

            if TASK_VERBS.iter().any(|verb| lowered.contains(verb)) {
                tasks.push(TaskModel {
                    name: clip(sentence, 80),
                    actor: "User".to_string(),
                });
            }

            if lowered.contains("if") || lowered.contains("when") {
                decisions.push(DecisionModel {
                    condition: clip(sentence, 100),
                    yes: "Continue process".to_string(),
                    no: "Take alternative action".to_string(),
                });
            }
        }

        if tasks.is_empty() {
            tasks.push(TaskModel {
                name: "Main Process Task".to_string(),
                actor: "User".to_string(),
            });
        }
        tasks.truncate(MAX_HEURISTIC_TASKS);
        decisions.truncate(MAX_DECISIONS);

        let sequence = std::iter::once("start".to_string())
            .chain((1..=tasks.len()).map(|i| format!("task_{}", i)))
            .chain(std::iter::once("end".to_string()))
            .collect();

        ProcessModel {
            process_name: format!("{} Process", clip(text.trim(), 50)),
            tasks,
            decisions,
            events: vec!["start".to_string(), "end".to_string()],
            sequence,
        }
        .normalized()
    }
}

#[async_trait]
impl ModelExtractor for HeuristicExtractor {
    async fn extract(&self, text: &str) -> Result<ProcessModel> {
        Ok(self.extract_model(text))
    }

    fn provider_name(&self) -> &str {
        "heuristic"
    }
}

fn clip(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
