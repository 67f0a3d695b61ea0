use fontscaler_dom::{DeterministicTextMeasurer, Document, NodeId};
use serde_json::json;
use std::sync::Arc;

/// 10px text: 5px per character, 10px per line.
fn document(viewport_width: f64) -> Document {
    let mut doc = Document::with_text_measurer(
        viewport_width,
        Arc::new(DeterministicTextMeasurer::monospace(0.5, 1.0)),
    );
    let root = doc.root();
    doc.set_style(root, "font-size", "10px").unwrap();
    doc
}

fn paragraph(doc: &mut Document, parent: NodeId, text: &str) -> NodeId {
    let p = doc.append_element(parent, "p").unwrap();
    doc.append_text(p, text).unwrap();
    p
}

#[test]
fn text_wraps_at_the_content_width() {
    let mut doc = document(45.0);
    let root = doc.root();
    let p = paragraph(&mut doc, root, "aaaa bbbb cccc");
    assert_eq!(doc.content_width(p), 45.0);
    assert_eq!(doc.content_height(p), 20.0);

    doc.set_viewport_width(100.0);
    assert_eq!(doc.content_height(p), 10.0);
}

#[test]
fn blocks_stack_and_out_of_flow_children_are_skipped() {
    let mut doc = document(400.0);
    let root = doc.root();
    let parent = doc.append_element(root, "div").unwrap();
    paragraph(&mut doc, parent, "one");
    paragraph(&mut doc, parent, "two");
    assert_eq!(doc.content_height(parent), 20.0);

    let floating = paragraph(&mut doc, parent, "three");
    doc.set_style(floating, "position", "absolute").unwrap();
    let hidden = paragraph(&mut doc, parent, "four");
    doc.set_style(hidden, "display", "none").unwrap();
    assert_eq!(doc.content_height(parent), 20.0);
    assert_eq!(doc.content_height(floating), 10.0);
}

#[test]
fn out_of_flow_elements_shrink_to_fit_unless_pinned() {
    let mut doc = document(400.0);
    let root = doc.root();
    let parent = doc.append_element(root, "div").unwrap();
    doc.set_style(parent, "width", "100px").unwrap();
    let p = paragraph(&mut doc, parent, "ab cd");
    doc.set_style(p, "position", "absolute").unwrap();
    assert_eq!(doc.content_width(p), 25.0);

    let long = paragraph(&mut doc, parent, &"x ".repeat(40));
    doc.set_style(long, "position", "absolute").unwrap();
    assert_eq!(doc.content_width(long), 100.0);

    doc.set_style(p, "width", "10px").unwrap();
    assert_eq!(doc.content_width(p), 10.0);
    assert_eq!(doc.content_height(p), 20.0);
}

#[test]
fn inline_elements_join_the_line_run() {
    let mut doc = document(400.0);
    let root = doc.root();
    let p = paragraph(&mut doc, root, "hello ");
    let span = doc.append_element(p, "span").unwrap();
    doc.append_text(span, "world").unwrap();
    assert_eq!(doc.content_height(p), 10.0);

    doc.append_element(p, "br").unwrap();
    doc.append_text(p, "again").unwrap();
    assert_eq!(doc.content_height(p), 20.0);
}

#[test]
fn explicit_and_percentage_heights() {
    let mut doc = document(400.0);
    let root = doc.root();
    let parent = doc.append_element(root, "div").unwrap();
    doc.set_style(parent, "height", "200px").unwrap();
    let child = paragraph(&mut doc, parent, "text");
    doc.set_style(child, "height", "25%").unwrap();
    assert_eq!(doc.content_height(parent), 200.0);
    assert_eq!(doc.content_height(child), 50.0);

    // No definite parent height: the percentage behaves as auto.
    doc.remove_style(parent, "height").unwrap();
    assert_eq!(doc.content_height(child), 10.0);
}

#[test]
fn font_size_scales_line_boxes_and_inherits() {
    let mut doc = document(400.0);
    let root = doc.root();
    let parent = doc.append_element(root, "div").unwrap();
    doc.set_style(parent, "font-size", "2em").unwrap();
    let p = paragraph(&mut doc, parent, "abc");
    assert_eq!(doc.font_size_px(p), 20.0);
    assert_eq!(doc.content_height(p), 20.0);

    doc.set_style(p, "line-height", "1.5").unwrap();
    assert_eq!(doc.content_height(p), 30.0);
}

#[test]
fn every_height_query_is_a_layout_pass() {
    let mut doc = document(400.0);
    let root = doc.root();
    let p = paragraph(&mut doc, root, "abc");
    let before = doc.layout_passes();
    doc.content_height(p);
    doc.content_height(p);
    assert_eq!(doc.layout_passes(), before + 2);
}

#[test]
fn snapshot_serializes_structure_and_inline_style() {
    let mut doc = document(400.0);
    let root = doc.root();
    let p = paragraph(&mut doc, root, "hi");
    doc.set_style_attribute(p, "font-size: 12px").unwrap();

    let snapshot = serde_json::to_value(doc.snapshot(p).unwrap()).unwrap();
    assert_eq!(
        snapshot,
        json!({
            "kind": { "type": "element", "value": { "tag": "p" } },
            "style": "font-size: 12px;",
            "children": [
                { "kind": { "type": "text", "value": "hi" } }
            ]
        })
    );
}
