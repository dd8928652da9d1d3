use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use serde::{Deserialize, Serialize};

pub const BPMN_MODEL_NS: &str = "http://www.omg.org/spec/BPMN/20100524/MODEL";
pub const BPMN_DI_NS: &str = "http://www.omg.org/spec/BPMN/20100524/DI";

/// Structural verdict over a BPMN document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: String,
}

impl ValidationResult {
    fn invalid(message: String) -> Self {
        Self {
            valid: false,
            message,
        }
    }
}

/// Check a document for the required BPMN constructs: a start event, an end
/// event, at least one sequence flow, and a diagram block.
///
/// Matching is namespace-aware: documents binding the BPMN/DI namespaces to
/// any prefix validate identically. No semantic checks (reachability, flow
/// target existence) are performed. Parse failures and missing constructs
/// are reported as a `valid: false` result, never as an error.
pub fn validate(xml: &str) -> ValidationResult {
    let mut reader = NsReader::from_str(xml);

    let mut start_events = 0usize;
    let mut end_events = 0usize;
    let mut sequence_flows = 0usize;
    let mut diagrams = 0usize;

    loop {
        match reader.read_resolved_event() {
            Err(err) => {
                return ValidationResult::invalid(format!("XML parsing error: {}", err));
            }
            Ok((_, Event::Eof)) => break,
            Ok((ns, Event::Start(element))) | Ok((ns, Event::Empty(element))) => {
                let in_model = resolved_ns(&ns) == Some(BPMN_MODEL_NS);
                let in_di = resolved_ns(&ns) == Some(BPMN_DI_NS);
                match element.local_name().as_ref() {
                    b"startEvent" if in_model => start_events += 1,
                    b"endEvent" if in_model => end_events += 1,
                    b"sequenceFlow" if in_model => sequence_flows += 1,
                    b"BPMNDiagram" if in_di => diagrams += 1,
                    _ => {}
                }
            }
            Ok(_) => {}
        }
    }

    let mut issues: Vec<&str> = Vec::new();
    if start_events == 0 {
        issues.push("Missing start event");
    }
    if end_events == 0 {
        issues.push("Missing end event");
    }
    if sequence_flows == 0 {
        issues.push("No sequence flows found");
    }
    if diagrams == 0 {
        issues.push("No diagram information found");
    }

    if issues.is_empty() {
        ValidationResult {
            valid: true,
            message: "BPMN is valid with proper sequence flows and layout".to_string(),
        }
    } else {
        ValidationResult::invalid(format!("Validation issues: {}", issues.join("; ")))
    }
}

fn resolved_ns<'a>(resolution: &'a ResolveResult) -> Option<&'a str> {
    match resolution {
        ResolveResult::Bound(Namespace(ns)) => std::str::from_utf8(ns).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// T-VAL-1: a complete compiled document validates.
    #[test]
    fn t_val_1_valid_document() {
        let compiled = crate::compile(&crate::ProcessModel::default());
        let verdict = validate(&compiled.xml);
        assert!(verdict.valid);
        assert_eq!(
            verdict.message,
            "BPMN is valid with proper sequence flows and layout"
        );
    }

    /// T-VAL-2: malformed markup reports a parse error.
    #[test]
    fn t_val_2_malformed_xml() {
        let verdict = validate("<bpmn:definitions><bpmn:process></bpmn:definitions>");
        assert!(!verdict.valid);
        assert!(
            verdict.message.starts_with("XML parsing error:"),
            "{}",
            verdict.message
        );
    }

    /// T-VAL-3: every absent construct is named, semicolon-joined.
    #[test]
    fn t_val_3_missing_constructs() {
        let xml = r#"<?xml version="1.0"?>
<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL">
  <bpmn:process id="Process_1">
    <bpmn:startEvent id="StartEvent_1" />
  </bpmn:process>
</bpmn:definitions>"#;
        let verdict = validate(xml);
        assert!(!verdict.valid);
        assert_eq!(
            verdict.message,
            "Validation issues: Missing end event; No sequence flows found; No diagram information found"
        );
    }

    /// T-VAL-4: namespace binding matters, prefixes do not; an unprefixed
    /// document bound to the BPMN namespaces validates the same.
    #[test]
    fn t_val_4_prefix_independent() {
        let xml = r#"<?xml version="1.0"?>
<definitions xmlns="http://www.omg.org/spec/BPMN/20100524/MODEL"
             xmlns:d="http://www.omg.org/spec/BPMN/20100524/DI">
  <process id="Process_1">
    <startEvent id="StartEvent_1" />
    <endEvent id="EndEvent_1" />
    <sequenceFlow id="Flow_1" sourceRef="StartEvent_1" targetRef="EndEvent_1" />
  </process>
  <d:BPMNDiagram id="BPMNDiagram_1" />
</definitions>"#;
        assert!(validate(xml).valid);
    }

    /// T-VAL-5: right local names in the wrong namespace do not count.
    #[test]
    fn t_val_5_foreign_namespace_rejected() {
        let xml = r#"<?xml version="1.0"?>
<definitions xmlns="urn:example:not-bpmn">
  <startEvent id="s" />
  <endEvent id="e" />
  <sequenceFlow id="f" />
  <BPMNDiagram id="d" />
</definitions>"#;
        let verdict = validate(xml);
        assert!(!verdict.valid);
        assert!(verdict.message.starts_with("Validation issues:"));
    }
}
