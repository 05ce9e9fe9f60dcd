use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use stepflow::config::EditorConfig;
use stepflow::editor::WorkflowEditor;
use stepflow::graph::{Ignored, NodeHandlers, Outcome};
use stepflow::workflow::{Delay, DelayUnit, Position, StepData, StepNode, StepType};

fn call(label: &str) -> StepData {
    StepData::new(label, StepType::Call, Delay::IMMEDIATE)
}

#[test]
fn test_end_to_end_scenario() {
    let mut editor = WorkflowEditor::headless(EditorConfig::default());
    let wf = editor.new_workflow("Onboarding", "");

    let edge = editor.add_step(Some("n1".to_string()), call("Call")).applied().unwrap();
    assert!(edge.is_none());
    let store = editor.store().unwrap();
    assert_eq!(store.nodes().iter().map(|n| n.id.as_str()).collect::<Vec<_>>(), vec!["n1"]);
    assert!(store.edges().is_empty());

    let sms = StepData::new("SMS", StepType::Sms, Delay::IMMEDIATE);
    let edge = editor.add_step(Some("n2".to_string()), sms).applied().unwrap().unwrap();
    assert_eq!((edge.source.as_str(), edge.target.as_str()), ("n1", "n2"));
    let store = editor.store().unwrap();
    assert_eq!(store.nodes().iter().map(|n| n.id.as_str()).collect::<Vec<_>>(), vec!["n1", "n2"]);
    assert_eq!(store.edges().len(), 1);

    let mut form = editor.edit_form("n1").unwrap();
    form.delay_value = 30;
    form.delay_unit = DelayUnit::Mins;
    assert!(editor.edit_step("n1", form).is_applied());
    assert_eq!(editor.store().unwrap().node("n1").unwrap().data.delay, "30 mins delay");

    assert!(editor.remove_step("n1").is_applied());
    let store = editor.store().unwrap();
    assert_eq!(store.nodes().iter().map(|n| n.id.as_str()).collect::<Vec<_>>(), vec!["n2"]);
    assert!(store.edges().is_empty());

    assert!(editor.save().is_applied());
    let persisted = editor.repository().get(&wf.id).unwrap();
    assert_eq!(persisted.nodes.len(), 1);
    assert!(persisted.nodes.iter().all(|n| n.id != "n1"));
    assert!(persisted.edges.iter().all(|e| e.source != "n1" && e.target != "n1"));
}

#[test]
fn test_save_then_switch_back_round_trips() {
    let mut editor = WorkflowEditor::headless(EditorConfig::default());
    let first = editor.new_workflow("First", "");

    let _ = editor.add_step(Some("a".to_string()), call("Open"));
    let _ = editor.add_step(
        Some("b".to_string()),
        StepData::new("Mail", StepType::Email, Delay::hours(2)).with_description("Recap"),
    );
    let _ = editor.move_step("b", Position::new(512.5, 380.0));
    let _ = editor.save();
    let (nodes_before, edges_before) = editor.store().unwrap().snapshot();

    let _ = editor.new_workflow("Second", "");
    let switch = editor.switch_to(&first.id);
    assert!(switch.outcome.is_applied());
    assert!(!switch.discarded_edits);

    let (nodes_after, edges_after) = editor.store().unwrap().snapshot();
    assert_eq!(nodes_before, nodes_after);
    assert_eq!(edges_before, edges_after);
    assert!(!editor.is_dirty());
}

#[test]
fn test_switch_without_save_discards_edits() {
    let mut editor = WorkflowEditor::headless(EditorConfig::default());
    let first = editor.new_workflow("First", "");
    let _ = editor.add_step(Some("a".to_string()), call("Open"));
    let _ = editor.save();

    let _ = editor.add_step(Some("b".to_string()), call("Unsaved"));
    assert!(editor.is_dirty());

    let second = editor.new_workflow("Second", "");
    assert_eq!(editor.active().map(|w| w.id.as_str()), Some(second.id.as_str()));

    let switch = editor.switch_to(&first.id);
    assert!(!switch.discarded_edits);
    let store = editor.store().unwrap();
    assert_eq!(store.len(), 1);
    assert!(store.node("b").is_none());
}

#[test]
fn test_switch_reports_discarded_edits() {
    let mut editor = WorkflowEditor::headless(EditorConfig::default());
    let first = editor.new_workflow("First", "");
    let _ = editor.new_workflow("Second", "");
    let _ = editor.add_step(None, call("Unsaved"));

    let switch = editor.switch_to(&first.id);
    assert!(switch.discarded_edits);
    assert!(editor.store().unwrap().is_empty());
}

#[test]
fn test_switch_to_unknown_leaves_nothing_active() {
    let mut editor = WorkflowEditor::headless(EditorConfig::default());
    let _ = editor.new_workflow("Only", "");

    let switch = editor.switch_to("missing");
    assert_eq!(switch.outcome, Outcome::Ignored(Ignored::WorkflowNotFound("missing".to_string())));
    assert!(editor.active().is_none());
    assert!(editor.store().is_none());
    assert_eq!(
        editor.add_step(None, call("x")),
        Outcome::Ignored(Ignored::NoActiveWorkflow)
    );
    assert_eq!(editor.save(), Outcome::Ignored(Ignored::NoActiveWorkflow));
}

#[test]
fn test_rehydration_binds_fresh_handlers() {
    let edits = Arc::new(AtomicUsize::new(0));
    let deletes = Arc::new(AtomicUsize::new(0));
    let factory = {
        let edits = edits.clone();
        let deletes = deletes.clone();
        move |_node: &StepNode| {
            let edits = edits.clone();
            let deletes = deletes.clone();
            NodeHandlers::new()
                .on_edit(move |_| {
                    edits.fetch_add(1, Ordering::SeqCst);
                })
                .on_delete(move |_| {
                    deletes.fetch_add(1, Ordering::SeqCst);
                })
        }
    };

    let mut editor = WorkflowEditor::new(EditorConfig::default(), factory);
    let first = editor.new_workflow("First", "");
    let _ = editor.add_step(Some("a".to_string()), call("Open"));
    let _ = editor.add_step(Some("b".to_string()), call("Close"));
    let _ = editor.save();

    assert!(editor.store().unwrap().handlers("a").unwrap().edit("a"));

    let _ = editor.new_workflow("Second", "");
    let _ = editor.switch_to(&first.id);

    let store = editor.store().unwrap();
    for id in ["a", "b"] {
        let handlers = store.handlers(id).expect("handlers rebound on load");
        assert!(handlers.edit(id));
        assert!(handlers.delete(id));
    }
    assert_eq!(edits.load(Ordering::SeqCst), 3);
    assert_eq!(deletes.load(Ordering::SeqCst), 2);
}

#[test]
fn test_removed_node_loses_handlers() {
    let factory = |_node: &StepNode| NodeHandlers::new().on_edit(|_| {});
    let mut editor = WorkflowEditor::new(EditorConfig::default(), factory);
    let _ = editor.new_workflow("Only", "");
    let _ = editor.add_step(Some("a".to_string()), call("Open"));
    assert!(editor.store().unwrap().handlers("a").is_some());

    let _ = editor.remove_step("a");
    assert!(editor.store().unwrap().handlers("a").is_none());
}
