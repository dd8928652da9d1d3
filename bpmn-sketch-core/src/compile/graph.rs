use crate::model::{ProcessModel, MAX_DECISIONS, MAX_TASKS};

pub const START_EVENT_ID: &str = "StartEvent_1";
pub const END_EVENT_ID: &str = "EndEvent_1";

/// A typed diagram element.
///
/// Elements are kept in emission order (Start, Tasks, Gateways, End); id
/// generation and layout both depend on first-seen order, never on sorting.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Start { id: String },
    Task { id: String, name: String },
    Gateway { id: String, condition: String },
    End { id: String },
}

impl Element {
    /// Returns the id regardless of variant.
    pub fn id(&self) -> &str {
        match self {
            Element::Start { id } => id,
            Element::Task { id, .. } => id,
            Element::Gateway { id, .. } => id,
            Element::End { id } => id,
        }
    }

    /// The label rendered into the shape's `name` attribute.
    pub fn label(&self) -> &str {
        match self {
            Element::Start { .. } => "Start",
            Element::Task { name, .. } => name,
            Element::Gateway { condition, .. } => condition,
            Element::End { .. } => "End",
        }
    }
}

/// Build the element set for a normalized model.
///
/// Always emits exactly one Start and one End; one Task per `tasks` entry
/// (capped at [`MAX_TASKS`]) and one Gateway per `decisions` entry (capped
/// at [`MAX_DECISIONS`]). Never fails; absent lists are empty lists.
pub fn build_elements(model: &ProcessModel) -> Vec<Element> {
    let mut elements = Vec::with_capacity(model.tasks.len() + model.decisions.len() + 2);

    elements.push(Element::Start {
        id: START_EVENT_ID.to_string(),
    });

    for (i, task) in model.tasks.iter().take(MAX_TASKS).enumerate() {
        let ordinal = i + 1;
        let name = if task.name.trim().is_empty() {
            format!("Task {}", ordinal)
        } else {
            task.name.clone()
        };
        elements.push(Element::Task {
            id: format!("Task_{}", ordinal),
            name,
        });
    }

    for (i, decision) in model.decisions.iter().take(MAX_DECISIONS).enumerate() {
        let ordinal = i + 1;
        let condition = if decision.condition.trim().is_empty() {
            format!("Decision {}", ordinal)
        } else {
            decision.condition.clone()
        };
        elements.push(Element::Gateway {
            id: format!("Gateway_{}", ordinal),
            condition,
        });
    }

    elements.push(Element::End {
        id: END_EVENT_ID.to_string(),
    });

    elements
}
