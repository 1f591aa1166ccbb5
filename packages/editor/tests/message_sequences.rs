//! Tests for longer message sequences
//!
//! This tests:
//! - Nested addChildren / removeChildren chains
//! - Cascading removal of whole linked subtrees
//! - Referential integrity after every step
//! - Navigation staying in sync with the data dictionary
//! - Array splices above linked children
//! - Rejected requests leaving the session untouched

use formsync_editor::{
    ChildFragment, ChildReference, DataDictionary, DataDictionaryEntry, DataLocation, DataRequest, DataType,
    DictionaryRequest, EditorError, MessageSystem, Request, Response, SchemaDictionary,
};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;

fn items() -> DataLocation {
    DataLocation::parse("items").unwrap()
}

fn initialize() -> Request {
    Request::Initialize {
        data_dictionary: DataDictionary::new(
            "root",
            DataDictionaryEntry::new(
                "S",
                json!({ "title": "Root", "items": [], "list": [{ "children": [] }, { "children": [] }] }),
            ),
        ),
        schema_dictionary: SchemaDictionary::new().with_schema(
            "S",
            json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string" },
                    "tags": { "type": "array", "items": { "type": "string" } },
                    "items": { "type": "array", "link": true },
                    "list": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": { "children": { "type": "array", "link": true } }
                        }
                    }
                }
            }),
        ),
    }
}

fn add_children(system: &mut MessageSystem, titles: &[&str]) -> Vec<String> {
    add_children_at(system, items(), titles)
}

fn add_children_at(system: &mut MessageSystem, data_location: DataLocation, titles: &[&str]) -> Vec<String> {
    let request = Request::Data(DataRequest::AddChildren {
        data_location,
        children: titles
            .iter()
            .map(|title| ChildFragment::new(json!({ "title": title, "items": [] })))
            .collect(),
    });
    match system.post_message(request).unwrap() {
        Response::Data(response) => response.added_dictionary_ids,
        other => panic!("Expected data response, got {:?}", other),
    }
}

fn activate(system: &mut MessageSystem, id: &str) {
    system
        .post_message(Request::DataDictionary(DictionaryRequest::UpdateActiveId {
            active_dictionary_id: id.to_string(),
        }))
        .unwrap();
}

fn location(path: &str) -> DataLocation {
    DataLocation::parse(path).unwrap()
}

fn parent_location(system: &MessageSystem, id: &str) -> String {
    let data = system.session().data_dictionary().unwrap();
    data.get(id).unwrap().parent.as_ref().unwrap().data_location.to_string()
}

fn assert_consistent(system: &MessageSystem) {
    let session = system.session();
    let data = session.data_dictionary().unwrap();
    let navigation = session.navigation_dictionary().unwrap();

    assert!(
        data.integrity_issues().is_empty(),
        "Integrity issues: {:?}",
        data.integrity_issues()
    );

    // Every entry is reachable, so every entry has navigation
    let data_ids: Vec<&String> = data.entries.keys().collect();
    let navigation_ids: Vec<&String> = navigation.dictionaries.keys().collect();
    assert_eq!(data_ids, navigation_ids);

    let active = session.active().unwrap();
    assert!(navigation.contains(&active.dictionary_id, &active.navigation_config_id));
}

#[test]
fn test_nested_children_then_cascading_removal() {
    let mut system = MessageSystem::new();
    system.post_message(initialize()).unwrap();
    assert_consistent(&system);

    let top = add_children(&mut system, &["B", "C"]);
    assert_consistent(&system);

    activate(&mut system, &top[0]);
    let nested = add_children(&mut system, &["B1", "B2"]);
    assert_consistent(&system);

    activate(&mut system, &nested[1]);
    let deepest = add_children(&mut system, &["B2a"]);
    assert_consistent(&system);
    assert_eq!(system.session().data_dictionary().unwrap().len(), 6);

    // Removing B from the root takes B1, B2 and B2a with it
    activate(&mut system, "root");
    let response = system
        .post_message(Request::Data(DataRequest::RemoveChildren {
            data_location: items(),
            children: vec![ChildReference { id: top[0].clone() }],
        }))
        .unwrap();
    assert_consistent(&system);

    let removed = match response {
        Response::Data(response) => response.removed_dictionary_ids,
        other => panic!("Expected data response, got {:?}", other),
    };
    let mut expected = vec![top[0].clone(), nested[0].clone(), nested[1].clone(), deepest[0].clone()];
    expected.sort();
    assert_eq!(removed, expected);

    let data = system.session().data_dictionary().unwrap();
    assert_eq!(data.len(), 2);
    assert!(data.contains(&top[1]));
}

#[test]
fn test_overwriting_references_prunes_unlinked_entries() {
    let mut system = MessageSystem::new();
    system.post_message(initialize()).unwrap();
    let added = add_children(&mut system, &["B", "C"]);

    // Plain data updates may drop references too
    system
        .post_message(Request::Data(DataRequest::Update {
            data_location: items(),
            data: json!([{ "id": added[1] }]),
        }))
        .unwrap();
    assert_consistent(&system);

    let data = system.session().data_dictionary().unwrap();
    assert!(!data.contains(&added[0]));
    assert!(data.contains(&added[1]));

    system
        .post_message(Request::Data(DataRequest::Remove { data_location: items() }))
        .unwrap();
    assert_consistent(&system);
    assert_eq!(system.session().data_dictionary().unwrap().len(), 1);
}

#[test]
fn test_removing_selected_subtree_keeps_cursor_valid() {
    let mut system = MessageSystem::new();
    system.post_message(initialize()).unwrap();
    let added = add_children(&mut system, &["B"]);

    activate(&mut system, &added[0]);
    let nested = add_children(&mut system, &["B1"]);

    // Select the grandchild, then remove its parent from the root
    activate(&mut system, &nested[0]);
    activate(&mut system, "root");
    system
        .post_message(Request::Data(DataRequest::RemoveChildren {
            data_location: items(),
            children: vec![ChildReference { id: added[0].clone() }],
        }))
        .unwrap();

    assert_consistent(&system);
    assert_eq!(system.session().active().unwrap().dictionary_id, "root");
}

#[test]
fn test_add_and_duplicate_sequence() {
    let mut system = MessageSystem::new();
    system.post_message(initialize()).unwrap();
    let tags = DataLocation::parse("tags").unwrap();

    for tag in ["a", "b"] {
        system
            .post_message(Request::Data(DataRequest::Add {
                data_location: tags.clone(),
                data_type: DataType::Array,
                data: json!(tag),
            }))
            .unwrap();
    }
    system
        .post_message(Request::Data(DataRequest::Duplicate {
            source_data_location: DataLocation::parse("tags[1]").unwrap(),
        }))
        .unwrap();
    assert_consistent(&system);

    let data = system.session().data_dictionary().unwrap();
    assert_eq!(data.get("root").unwrap().data["tags"], json!(["a", "b", "b"]));

    let navigation = system.session().navigation_dictionary().unwrap();
    assert_eq!(
        navigation.item("root", "root::tags").unwrap().items,
        vec!["root::tags[0]", "root::tags[1]", "root::tags[2]"]
    );
}

#[test]
fn test_listeners_see_every_step() {
    let mut system = MessageSystem::new();
    let kinds = Rc::new(RefCell::new(Vec::new()));
    let sink = kinds.clone();
    system.add(move |response| {
        let kind = serde_json::to_value(response).unwrap()["type"].as_str().unwrap().to_string();
        sink.borrow_mut().push(kind);
    });

    system.post_message(initialize()).unwrap();
    add_children(&mut system, &["B"]);
    system
        .post_json(r#"{ "type": "navigation", "action": "get" }"#)
        .unwrap();

    assert_eq!(*kinds.borrow(), vec!["initialize", "data", "navigation"]);
}

#[test]
fn test_removing_array_item_keeps_children_of_later_items() {
    let mut system = MessageSystem::new();
    system.post_message(initialize()).unwrap();
    let first = add_children_at(&mut system, location("list[0].children"), &["B"]);
    let second = add_children_at(&mut system, location("list[1].children"), &["C"]);
    assert_consistent(&system);

    system
        .post_message(Request::Data(DataRequest::Remove {
            data_location: location("list[0]"),
        }))
        .unwrap();
    assert_consistent(&system);

    let data = system.session().data_dictionary().unwrap();
    assert!(!data.contains(&first[0]));
    assert!(data.contains(&second[0]));
    assert_eq!(data.get("root").unwrap().data["list"], json!([{ "children": [{ "id": second[0] }] }]));
    assert_eq!(parent_location(&system, &second[0]), "list[0].children");

    let navigation = system.session().navigation_dictionary().unwrap();
    assert_eq!(
        navigation.item("root", "root::list[0].children").unwrap().linked_dictionary_ids,
        vec![second[0].clone()]
    );
}

#[test]
fn test_duplicating_array_item_shifts_children_of_later_items() {
    let mut system = MessageSystem::new();
    system.post_message(initialize()).unwrap();
    let added = add_children_at(&mut system, location("list[1].children"), &["C"]);

    system
        .post_message(Request::Data(DataRequest::Duplicate {
            source_data_location: location("list[0]"),
        }))
        .unwrap();
    assert_consistent(&system);

    assert!(system.session().data_dictionary().unwrap().contains(&added[0]));
    assert_eq!(parent_location(&system, &added[0]), "list[2].children");
}

#[test]
fn test_remove_children_only_touches_references_at_location() {
    let mut system = MessageSystem::new();
    system.post_message(initialize()).unwrap();
    let added = add_children(&mut system, &["B"]);
    let before = system.session().snapshot().unwrap();

    // Referenced under `items`, not under `list[0].children`
    system
        .post_message(Request::Data(DataRequest::RemoveChildren {
            data_location: location("list[0].children"),
            children: vec![ChildReference { id: added[0].clone() }],
        }))
        .unwrap();
    assert_consistent(&system);
    assert!(system.session().data_dictionary().unwrap().contains(&added[0]));

    // A scalar is not a reference list
    let err = system
        .post_message(Request::Data(DataRequest::RemoveChildren {
            data_location: location("title"),
            children: vec![ChildReference { id: added[0].clone() }],
        }))
        .unwrap_err();
    assert!(matches!(err, EditorError::Path(_)));
    assert_consistent(&system);
    assert_eq!(system.session().snapshot().unwrap(), before);
}

#[test]
fn test_huge_indices_are_rejected() {
    let mut system = MessageSystem::new();
    system.post_message(initialize()).unwrap();
    let before = system.session().snapshot().unwrap();

    for path in ["tags[18446744073709551615]", "tags[1000000000000]", "list[99999999].children"] {
        let err = system
            .post_message(Request::Data(DataRequest::Update {
                data_location: location(path),
                data: json!(1),
            }))
            .unwrap_err();
        assert!(matches!(err, EditorError::Path(_)), "{}: {:?}", path, err);
        assert_consistent(&system);
    }
    assert_eq!(system.session().snapshot().unwrap(), before);

    // Out-of-range removals and duplicates leave the data as it was
    for request in [
        DataRequest::Remove {
            data_location: location("list[7]"),
        },
        DataRequest::Duplicate {
            source_data_location: location("list[7]"),
        },
    ] {
        system.post_message(Request::Data(request)).unwrap();
        assert_consistent(&system);
    }
    assert_eq!(system.session().snapshot().unwrap().data, before.data);
}
