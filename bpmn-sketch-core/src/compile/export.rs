use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::fmt::Write;

use super::graph::{self, Element};
use super::layout;
use super::router;
use crate::model::ProcessModel;

const PROCESS_ID: &str = "Process_1";

/// Outcome of a compile.
///
/// `used_fallback` distinguishes a freshly rendered document from the static
/// fallback substituted after a rendering failure, so callers never have to
/// guess from the bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledBpmn {
    pub xml: String,
    pub used_fallback: bool,
}

/// Compile a process model into a BPMN 2.0 + DI document.
///
/// Normalizes the model, builds the element graph, routes the sequence
/// flows, lays the shapes out, and renders everything as indented XML.
/// Never fails: a rendering error is logged and answered with the static
/// fallback document instead.
pub fn compile(model: &ProcessModel) -> CompiledBpmn {
    let model = model.clone().normalized();
    match render_definitions(&model) {
        Ok(xml) => CompiledBpmn {
            xml,
            used_fallback: false,
        },
        Err(err) => {
            tracing::warn!("BPMN rendering failed, substituting fallback document: {:?}", err);
            CompiledBpmn {
                xml: FALLBACK_BPMN.to_string(),
                used_fallback: true,
            }
        }
    }
}

fn render_definitions(model: &ProcessModel) -> Result<String> {
    let elements = graph::build_elements(model);
    let flows = router::route(&elements);
    let positions = layout::layout(&elements);

    let mut xml = String::new();

    // ── Header ──
    writeln!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        xml,
        r#"<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL""#
    )?;
    writeln!(
        xml,
        r#"                  xmlns:bpmndi="http://www.omg.org/spec/BPMN/20100524/DI""#
    )?;
    writeln!(
        xml,
        r#"                  xmlns:dc="http://www.omg.org/spec/DD/20100524/DC""#
    )?;
    writeln!(
        xml,
        r#"                  xmlns:di="http://www.omg.org/spec/DD/20100524/DI""#
    )?;
    writeln!(
        xml,
        r#"                  id="Definitions_1" targetNamespace="http://bpmn.io/schema/bpmn">"#
    )?;
    writeln!(
        xml,
        r#"  <bpmn:process id="{}" name="{}" isExecutable="false">"#,
        PROCESS_ID,
        xml_escape(&model.process_name)
    )?;

    // ── Shapes ──
    for element in &elements {
        writeln!(
            xml,
            r#"    <bpmn:{} id="{}" name="{}" />"#,
            element_tag(element),
            element.id(),
            xml_escape(element.label())
        )?;
    }

    // ── Sequence flows ──
    for flow in &flows {
        match &flow.label {
            Some(label) => writeln!(
                xml,
                r#"    <bpmn:sequenceFlow id="{}" sourceRef="{}" targetRef="{}" name="{}" />"#,
                flow.id,
                flow.source,
                flow.target,
                xml_escape(label)
            )?,
            None => writeln!(
                xml,
                r#"    <bpmn:sequenceFlow id="{}" sourceRef="{}" targetRef="{}" />"#,
                flow.id, flow.source, flow.target
            )?,
        }
    }

    writeln!(xml, r#"  </bpmn:process>"#)?;

    // ── BPMN DI ──
    writeln!(xml, r#"  <bpmndi:BPMNDiagram id="BPMNDiagram_1">"#)?;
    writeln!(
        xml,
        r#"    <bpmndi:BPMNPlane id="BPMNPlane_1" bpmnElement="{}">"#,
        PROCESS_ID
    )?;

    for (element, position) in elements.iter().zip(&positions) {
        let (width, height) = layout::shape_size(element);
        writeln!(
            xml,
            r#"      <bpmndi:BPMNShape id="Shape_{}" bpmnElement="{}">
        <dc:Bounds x="{}" y="{}" width="{}" height="{}" />
      </bpmndi:BPMNShape>"#,
            element.id(),
            element.id(),
            position.x,
            position.y,
            width,
            height
        )?;
    }

    // Anchor points: shape center per element kind, two waypoints per edge.
    let anchors: HashMap<&str, (i32, i32)> = elements
        .iter()
        .zip(&positions)
        .map(|(element, position)| {
            let (dx, dy) = layout::anchor_offset(element);
            (element.id(), (position.x + dx, position.y + dy))
        })
        .collect();

    for flow in &flows {
        let (x1, y1) = *anchors
            .get(flow.source.as_str())
            .ok_or_else(|| anyhow!("flow {} has unknown source {}", flow.id, flow.source))?;
        let (x2, y2) = *anchors
            .get(flow.target.as_str())
            .ok_or_else(|| anyhow!("flow {} has unknown target {}", flow.id, flow.target))?;
        writeln!(
            xml,
            r#"      <bpmndi:BPMNEdge id="Edge_{}" bpmnElement="{}">
        <di:waypoint x="{}" y="{}" />
        <di:waypoint x="{}" y="{}" />
      </bpmndi:BPMNEdge>"#,
            flow.id, flow.id, x1, y1, x2, y2
        )?;
    }

    writeln!(xml, r#"    </bpmndi:BPMNPlane>"#)?;
    writeln!(xml, r#"  </bpmndi:BPMNDiagram>"#)?;
    writeln!(xml, r#"</bpmn:definitions>"#)?;

    Ok(xml)
}

fn element_tag(element: &Element) -> &'static str {
    match element {
        Element::Start { .. } => "startEvent",
        Element::Task { .. } => "task",
        Element::Gateway { .. } => "exclusiveGateway",
        Element::End { .. } => "endEvent",
    }
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Minimal single-task diagram served when rendering fails. Must itself pass
/// the structural validator.
pub const FALLBACK_BPMN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL" xmlns:bpmndi="http://www.omg.org/spec/BPMN/20100524/DI" xmlns:dc="http://www.omg.org/spec/DD/20100524/DC" xmlns:di="http://www.omg.org/spec/DD/20100524/DI" targetNamespace="http://bpmn.io/schema/bpmn">
  <bpmn:process id="Process_1" isExecutable="false">
    <bpmn:startEvent id="StartEvent_1" />
    <bpmn:task id="Task_1" name="Process Task" />
    <bpmn:endEvent id="EndEvent_1" />
    <bpmn:sequenceFlow id="Flow_1" sourceRef="StartEvent_1" targetRef="Task_1" />
    <bpmn:sequenceFlow id="Flow_2" sourceRef="Task_1" targetRef="EndEvent_1" />
  </bpmn:process>
  <bpmndi:BPMNDiagram id="BPMNDiagram_1">
    <bpmndi:BPMNPlane id="BPMNPlane_1" bpmnElement="Process_1">
      <bpmndi:BPMNShape id="Shape_StartEvent_1" bpmnElement="StartEvent_1">
        <dc:Bounds x="100" y="100" width="36" height="36" />
      </bpmndi:BPMNShape>
      <bpmndi:BPMNShape id="Shape_Task_1" bpmnElement="Task_1">
        <dc:Bounds x="100" y="200" width="100" height="80" />
      </bpmndi:BPMNShape>
      <bpmndi:BPMNShape id="Shape_EndEvent_1" bpmnElement="EndEvent_1">
        <dc:Bounds x="100" y="350" width="36" height="36" />
      </bpmndi:BPMNShape>
      <bpmndi:BPMNEdge id="Edge_Flow_1" bpmnElement="Flow_1">
        <di:waypoint x="136" y="118" />
        <di:waypoint x="136" y="200" />
      </bpmndi:BPMNEdge>
      <bpmndi:BPMNEdge id="Edge_Flow_2" bpmnElement="Flow_2">
        <di:waypoint x="136" y="280" />
        <di:waypoint x="136" y="350" />
      </bpmndi:BPMNEdge>
    </bpmndi:BPMNPlane>
  </bpmndi:BPMNDiagram>
</bpmn:definitions>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DecisionModel, TaskModel};
    use crate::validate::validate;

    fn refund_model() -> ProcessModel {
        ProcessModel {
            process_name: "Refund".to_string(),
            tasks: vec![
                TaskModel {
                    name: "Check order".to_string(),
                    actor: "User".to_string(),
                },
                TaskModel {
                    name: "Approve".to_string(),
                    actor: "Manager".to_string(),
                },
                TaskModel {
                    name: "Issue refund".to_string(),
                    actor: "System".to_string(),
                },
            ],
            decisions: vec![DecisionModel {
                condition: "Order valid?".to_string(),
                yes: "Approve".to_string(),
                no: "Reject".to_string(),
            }],
            events: vec!["start".to_string(), "end".to_string()],
            sequence: Vec::new(),
        }
    }

    /// T-EXP-1: a minimal model renders every required construct.
    #[test]
    fn t_exp_1_basic_document() {
        let compiled = compile(&ProcessModel::default());
        assert!(!compiled.used_fallback);
        assert!(compiled.xml.contains("<bpmn:startEvent"));
        assert!(compiled.xml.contains("<bpmn:endEvent"));
        assert!(compiled.xml.contains("<bpmn:sequenceFlow"));
        assert!(compiled.xml.contains("bpmndi:BPMNDiagram"));
        assert!(compiled.xml.contains("bpmndi:BPMNShape"));
        assert!(compiled.xml.contains("bpmndi:BPMNEdge"));
    }

    /// T-EXP-2: compiling the same model twice is byte-identical.
    #[test]
    fn t_exp_2_deterministic() {
        let model = refund_model();
        assert_eq!(compile(&model).xml, compile(&model).xml);
    }

    /// T-EXP-3: the refund reference model. Gateway rewiring, branch names,
    /// and the gateway column all appear in the document.
    #[test]
    fn t_exp_3_refund_reference() {
        let compiled = compile(&refund_model());
        let xml = &compiled.xml;
        assert!(xml.contains(r#"<bpmn:process id="Process_1" name="Refund" isExecutable="false">"#));
        assert!(xml.contains(r#"<bpmn:exclusiveGateway id="Gateway_1" name="Order valid?" />"#));
        assert!(xml.contains(r#"sourceRef="Task_1" targetRef="Gateway_1""#));
        assert!(xml.contains(r#"sourceRef="Gateway_1" targetRef="Task_2" name="Yes""#));
        assert!(xml.contains(r#"sourceRef="Gateway_1" targetRef="Task_3" name="No""#));
        assert!(xml.contains(r#"sourceRef="Task_2" targetRef="Task_3""#));
        // Gateway shape in the offset column with diamond sizing.
        assert!(xml.contains(r#"<dc:Bounds x="300" y="220" width="50" height="50" />"#));
        // Task anchor (100+50, 220+40) → gateway anchor (300+25, 220+25).
        assert!(xml.contains(r#"<di:waypoint x="150" y="260" />"#));
        assert!(xml.contains(r#"<di:waypoint x="325" y="245" />"#));
    }

    /// T-EXP-4: compile → validate round-trips valid for every supported
    /// task/decision count.
    #[test]
    fn t_exp_4_always_validates() {
        for tasks in 0..=8 {
            for decisions in 0..=3 {
                let model = ProcessModel {
                    tasks: (0..tasks)
                        .map(|i| TaskModel {
                            name: format!("Task name {}", i + 1),
                            actor: String::new(),
                        })
                        .collect(),
                    decisions: (0..decisions)
                        .map(|i| DecisionModel {
                            condition: format!("Condition {}?", i + 1),
                            yes: String::new(),
                            no: String::new(),
                        })
                        .collect(),
                    ..ProcessModel::default()
                };
                let compiled = compile(&model);
                let verdict = validate(&compiled.xml);
                assert!(verdict.valid, "{}x{}: {}", tasks, decisions, verdict.message);
            }
        }
    }

    /// T-EXP-5: the static fallback document passes validation.
    #[test]
    fn t_exp_5_fallback_validates() {
        let verdict = validate(FALLBACK_BPMN);
        assert!(verdict.valid, "{}", verdict.message);
    }

    /// T-EXP-6: reserved XML characters in labels are escaped.
    #[test]
    fn t_exp_6_escaping() {
        let model = ProcessModel {
            process_name: r#"Orders & "Refunds""#.to_string(),
            tasks: vec![TaskModel {
                name: "Check <amount>".to_string(),
                actor: String::new(),
            }],
            ..ProcessModel::default()
        };
        let xml = compile(&model).xml;
        assert!(xml.contains("Orders &amp; &quot;Refunds&quot;"));
        assert!(xml.contains("Check &lt;amount&gt;"));
        assert!(!xml.contains("Check <amount>"));
    }
}
