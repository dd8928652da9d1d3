use super::graph::Element;

/// Top-left corner of a shape, in diagram pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

const BASE_X: i32 = 100;
const GATEWAY_X_OFFSET: i32 = 200;
const TOP_Y: i32 = 100;
const ROW_SPACING: i32 = 120;

/// Assign a position to every element, index-aligned with the input slice.
///
/// Start, Tasks, and End share the base column; gateways sit one column to
/// the right. Tasks and gateways descend on the same vertical rhythm but
/// count independently. Pure function of the element list: no randomness,
/// no clock.
pub fn layout(elements: &[Element]) -> Vec<Position> {
    let task_count = elements
        .iter()
        .filter(|e| matches!(e, Element::Task { .. }))
        .count() as i32;

    let mut task_row = 0;
    let mut gateway_row = 0;
    elements
        .iter()
        .map(|element| match element {
            Element::Start { .. } => Position { x: BASE_X, y: TOP_Y },
            Element::Task { .. } => {
                task_row += 1;
                Position {
                    x: BASE_X,
                    y: TOP_Y + task_row * ROW_SPACING,
                }
            }
            Element::Gateway { .. } => {
                gateway_row += 1;
                Position {
                    x: BASE_X + GATEWAY_X_OFFSET,
                    y: TOP_Y + gateway_row * ROW_SPACING,
                }
            }
            Element::End { .. } => Position {
                x: BASE_X,
                y: TOP_Y + (task_count + 1) * ROW_SPACING,
            },
        })
        .collect()
}

/// Rendered width/height per element kind.
pub fn shape_size(element: &Element) -> (i32, i32) {
    match element {
        Element::Start { .. } | Element::End { .. } => (36, 36),
        Element::Gateway { .. } => (50, 50),
        Element::Task { .. } => (100, 80),
    }
}

/// Offset from a shape's top-left corner to its edge anchor (the shape
/// center). Edges connect anchor to anchor with exactly two waypoints.
pub fn anchor_offset(element: &Element) -> (i32, i32) {
    match element {
        Element::Start { .. } | Element::End { .. } => (18, 18),
        Element::Gateway { .. } => (25, 25),
        Element::Task { .. } => (50, 40),
    }
}
