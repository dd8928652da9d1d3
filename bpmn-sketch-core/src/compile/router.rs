use super::graph::{Element, END_EVENT_ID, START_EVENT_ID};

/// A directed sequence flow between two elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Flow {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Branch label ("Yes"/"No" on gateway exits), rendered as the flow name.
    pub label: Option<String>,
}

/// Derive the sequence flows for an element set.
///
/// Builds the default linear chain Start → Task_1 → … → Task_N → End
/// (Start → End when there are no tasks), then applies the single-decision
/// rewrite: when at least one gateway and one task exist, every flow leaving
/// Task_1 is removed and Task_1 is routed through Gateway_1, whose "Yes" exit
/// goes to Task_2 and "No" exit to Task_3 (End when the task runs out).
///
/// Only the first gateway is ever wired; further gateways stay disconnected.
/// `Flow_<n>` ids are assigned over the final list in emission order.
pub fn route(elements: &[Element]) -> Vec<Flow> {
    let task_ids: Vec<&str> = elements
        .iter()
        .filter(|e| matches!(e, Element::Task { .. }))
        .map(Element::id)
        .collect();
    let gateway_ids: Vec<&str> = elements
        .iter()
        .filter(|e| matches!(e, Element::Gateway { .. }))
        .map(Element::id)
        .collect();

    let mut routed: Vec<(&str, &str, Option<&str>)> = Vec::new();
    let mut current = START_EVENT_ID;
    for &task_id in &task_ids {
        routed.push((current, task_id, None));
        current = task_id;
    }
    routed.push((current, END_EVENT_ID, None));

    if let (Some(&gateway), Some(&first_task)) = (gateway_ids.first(), task_ids.first()) {
        routed.retain(|(source, _, _)| *source != first_task);

        let yes_target = task_ids.get(1).copied().unwrap_or(END_EVENT_ID);
        let no_target = task_ids.get(2).copied().unwrap_or(END_EVENT_ID);
        routed.push((first_task, gateway, None));
        routed.push((gateway, yes_target, Some("Yes")));
        routed.push((gateway, no_target, Some("No")));
    }

    routed
        .into_iter()
        .enumerate()
        .map(|(i, (source, target, label))| Flow {
            id: format!("Flow_{}", i + 1),
            source: source.to_string(),
            target: target.to_string(),
            label: label.map(str::to_string),
        })
        .collect()
}
