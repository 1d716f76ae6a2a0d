use linkboard_model::{LinkedTable, LinkedTableConfig, Row, Value};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

fn config() -> LinkedTableConfig {
    serde_json::from_str(
        r#"{"name": "Vehicles", "dataset": "vehicles.csv", "idColumn": "vehicle_id",
            "linkColumn": "scenario_id"}"#,
    )
    .unwrap()
}

fn vehicles() -> LinkedTable {
    let rows = vec![
        Row::new().with("vehicle_id", "v1").with("scenario_id", 1).with("seats", 4),
        Row::new().with("vehicle_id", "v2").with("scenario_id", 1).with("seats", 8),
        Row::new().with("vehicle_id", "v3").with("scenario_id", 2).with("seats", 4),
    ];
    LinkedTable::new(config(), rows)
}

fn ids(rows: &[&Row]) -> Vec<Value> {
    rows.iter()
        .filter_map(|r| r.get("vehicle_id").cloned())
        .collect()
}

#[test]
fn empty_parent_selection_shows_every_row() {
    let mut table = vehicles();
    assert_eq!(table.filtered_rows().len(), 3);

    table.set_parent_selection([Value::from(2)]);
    assert_eq!(table.filtered_rows().len(), 1);

    table.set_parent_selection(Vec::new());
    assert_eq!(table.filtered_rows().len(), table.all_rows().len());
}

#[test]
fn parent_selection_filters_on_link_column() {
    let mut table = vehicles();
    table.set_parent_selection([Value::from(1)]);
    assert_eq!(
        ids(&table.filtered_rows()),
        vec![Value::from("v1"), Value::from("v2")]
    );
    assert_eq!(table.column_values("seats"), vec![Value::from(4), Value::from(8)]);
}

#[test]
fn lookups_are_scoped_to_the_filtered_view() {
    let mut table = vehicles();
    table.set_parent_selection([Value::from(1)]);

    assert!(table.row_by_id(&Value::from("v1")).is_some());
    assert!(table.row_by_id(&Value::from("v3")).is_none());

    let wanted: HashSet<Value> = [Value::from("v2"), Value::from("v3")].into_iter().collect();
    assert_eq!(ids(&table.rows_by_ids(&wanted)), vec![Value::from("v2")]);
}

#[test]
fn listeners_receive_the_filtered_rows() {
    let mut table = vehicles();
    let seen: Rc<RefCell<Vec<usize>>> = Rc::default();

    let sink = Rc::clone(&seen);
    let id = table.add_listener(move |rows| sink.borrow_mut().push(rows.len()));

    table.set_parent_selection([Value::from(1)]);
    table.set_parent_selection([Value::from(2)]);
    assert!(table.remove_listener(id));
    table.set_parent_selection(Vec::new());

    assert_eq!(*seen.borrow(), vec![2, 1]);
}

#[test]
fn config_requires_link_column() {
    let mut cfg = config();
    cfg.link_column = String::new();
    assert!(cfg.validate().is_err());
    assert!(LinkedTable::from_json(cfg, "[]").is_err());
}
