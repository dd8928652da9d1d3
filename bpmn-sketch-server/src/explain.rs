use std::fmt::Write;

use bpmn_sketch_core::ProcessModel;

/// Render an HTML explanation of an extracted process, returned to the
/// client alongside the diagram.
pub fn explain_process(model: &ProcessModel) -> String {
    let mut html = String::new();
    let _ = write!(html, "<h3>Process: {}</h3>", model.process_name);
    html.push_str(
        "<p>This BPMN diagram represents the business process with proper sequence flows and layout.</p>",
    );

    html.push_str("<h4>Process Flow</h4><ol>");
    html.push_str("<li>Start Event: Process begins</li>");

    for (i, task) in model.tasks.iter().enumerate() {
        let name = if task.name.is_empty() {
            "Unnamed task"
        } else {
            &task.name
        };
        let _ = write!(html, "<li>Task {}: {}", i + 1, name);
        if !task.actor.is_empty() {
            let _ = write!(html, " (performed by: {})", task.actor);
        }
        html.push_str("</li>");
    }

    for (i, decision) in model.decisions.iter().enumerate() {
        let condition = if decision.condition.is_empty() {
            "Unspecified condition"
        } else {
            &decision.condition
        };
        let yes = if decision.yes.is_empty() {
            "Continue process"
        } else {
            &decision.yes
        };
        let no = if decision.no.is_empty() {
            "Alternative path"
        } else {
            &decision.no
        };
        let _ = write!(html, "<li>Decision {}: {}<ul>", i + 1, condition);
        let _ = write!(html, "<li>If Yes: {}</li>", yes);
        let _ = write!(html, "<li>If No: {}</li></ul></li>", no);
    }

    html.push_str("<li>End Event: Process completes</li></ol>");

    html.push_str("<h4>Technical Details</h4>");
    html.push_str(
        "<p>The diagram includes proper BPMN 2.0 elements with sequence flows connecting all activities.</p>",
    );
    html.push_str(
        "<p>Each element is positioned correctly with appropriate spacing for readability.</p>",
    );

    html
}
