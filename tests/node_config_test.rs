use stepflow::graph::{GraphStore, Ignored, NodeConfigController, NodeEdit, Outcome};
use stepflow::workflow::{Delay, DelayUnit, Position, StepData, StepNode, StepType};

fn store_with(id: &str) -> GraphStore {
    let mut store = GraphStore::new();
    let data = StepData::new("Intro call", StepType::Call, Delay::IMMEDIATE).with_description("keep me");
    let _ = store.add_node(StepNode::new(id, Position::default(), data));
    store
}

fn commit_delay(value: u32, unit: DelayUnit) -> String {
    let mut store = store_with("n1");
    let edit = NodeEdit::new("Intro call", "Call", value, unit);
    assert!(NodeConfigController::new().commit(&mut store, "n1", edit).is_applied());
    store.node("n1").unwrap().data.delay.clone()
}

#[test]
fn test_delay_string_derivation() {
    assert_eq!(commit_delay(0, DelayUnit::Mins), "Start immediately");
    assert_eq!(commit_delay(0, DelayUnit::Hours), "Start immediately");
    assert_eq!(commit_delay(45, DelayUnit::Mins), "45 mins delay");
    assert_eq!(commit_delay(2, DelayUnit::Hours), "2 hours delay");
}

#[test]
fn test_commit_updates_label_and_type() {
    let mut store = store_with("n1");
    let edit = NodeEdit::new("Follow-up text", "SMS", 1, DelayUnit::Hours);
    assert_eq!(NodeConfigController::new().commit(&mut store, "n1", edit), Outcome::done());

    let data = &store.node("n1").unwrap().data;
    assert_eq!(data.label, "Follow-up text");
    assert_eq!(data.step_type, StepType::Sms);
    assert_eq!(data.delay, "1 hours delay");
    assert_eq!(data.description.as_deref(), Some("keep me"));
}

#[test]
fn test_invalid_type_rejects_whole_edit() {
    let mut store = store_with("n1");
    let edit = NodeEdit::new("Renamed", "Fax", 10, DelayUnit::Mins);

    assert_eq!(
        NodeConfigController::new().commit(&mut store, "n1", edit),
        Outcome::Ignored(Ignored::InvalidStepType("Fax".to_string()))
    );

    let data = &store.node("n1").unwrap().data;
    assert_eq!(data.label, "Intro call");
    assert_eq!(data.delay, "Start immediately");
}

#[test]
fn test_blank_label_is_rejected() {
    let mut store = store_with("n1");
    let edit = NodeEdit::new("   ", "Email", 0, DelayUnit::Mins);
    assert_eq!(
        NodeConfigController::new().commit(&mut store, "n1", edit),
        Outcome::Ignored(Ignored::EmptyLabel)
    );
    assert_eq!(store.node("n1").unwrap().data.step_type, StepType::Call);
}

#[test]
fn test_unknown_node_is_ignored() {
    let mut store = store_with("n1");
    let edit = NodeEdit::new("x", "Call", 0, DelayUnit::Mins);
    assert_eq!(
        NodeConfigController::new().commit(&mut store, "n9", edit),
        Outcome::Ignored(Ignored::NodeNotFound("n9".to_string()))
    );
}

#[test]
fn test_form_reflects_stored_values() {
    let mut store = store_with("n1");
    let controller = NodeConfigController::new();
    let _ = controller.commit(&mut store, "n1", NodeEdit::new("Wait a bit", "Wait", 3, DelayUnit::Hours));

    let form = controller.form_for(&store, "n1").unwrap();
    assert_eq!(form.label, "Wait a bit");
    assert_eq!(form.step_type, "Wait");
    assert_eq!(form.delay_value, 3);
    assert_eq!(form.delay_unit, DelayUnit::Hours);
    assert_eq!(form.description.as_deref(), Some("keep me"));

    assert!(controller.form_for(&store, "missing").is_none());
}

#[test]
fn test_description_can_be_set_and_cleared() {
    let mut store = store_with("n1");
    let controller = NodeConfigController::new();

    let mut edit = controller.form_for(&store, "n1").unwrap();
    edit.description = Some("Mention the renewal offer".to_string());
    assert!(controller.commit(&mut store, "n1", edit).is_applied());
    assert_eq!(
        store.node("n1").unwrap().data.description.as_deref(),
        Some("Mention the renewal offer")
    );

    let mut edit = controller.form_for(&store, "n1").unwrap();
    edit.description = Some("   ".to_string());
    assert!(controller.commit(&mut store, "n1", edit).is_applied());
    assert_eq!(store.node("n1").unwrap().data.description, None);
}
