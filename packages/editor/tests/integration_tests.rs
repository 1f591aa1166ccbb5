//! Integration tests for the editor crate

use formsync_editor::{
    ChildFragment, ChildReference, DataDictionary, DataDictionaryEntry, DataDictionaryResponse, DataLocation,
    DataRequest, DictionaryRequest, EditorError, NavigationDictionaryResponse, NavigationRequest, NavigationResponse,
    Request, Response, SchemaDictionary, Session,
};
use serde_json::json;

fn schema_dictionary() -> SchemaDictionary {
    SchemaDictionary::new().with_schema(
        "S",
        json!({
            "type": "object",
            "properties": {
                "title": { "type": "string" },
                "items": { "type": "array", "link": true }
            }
        }),
    )
}

fn initialize() -> Request {
    Request::Initialize {
        data_dictionary: DataDictionary::new(
            "root",
            DataDictionaryEntry::new("S", json!({ "title": "A", "items": [] })),
        ),
        schema_dictionary: schema_dictionary(),
    }
}

fn items() -> DataLocation {
    DataLocation::parse("items").unwrap()
}

fn data_response(response: Response) -> formsync_editor::DataResponse {
    match response {
        Response::Data(response) => response,
        other => panic!("Expected data response, got {:?}", other),
    }
}

#[test]
fn test_initialize_derives_root_navigation() {
    let mut session = Session::new();
    let snapshot = match session.handle(initialize()).unwrap() {
        Response::Initialize(snapshot) => snapshot,
        other => panic!("Expected initialize response, got {:?}", other),
    };

    let root = snapshot.navigation.root().unwrap();
    assert_eq!(root.items.len(), 2);
    assert_eq!(root.items, vec!["root::title", "root::items"]);

    let items_node = snapshot.navigation.get("root::items").unwrap();
    assert!(items_node.items.is_empty());
}

#[test]
fn test_add_children_links_new_entry() {
    let mut session = Session::new();
    session.handle(initialize()).unwrap();

    let response = data_response(
        session
            .handle(Request::Data(DataRequest::AddChildren {
                data_location: items(),
                children: vec![ChildFragment::new(json!({ "title": "B" }))],
            }))
            .unwrap(),
    );

    assert_eq!(response.added_dictionary_ids.len(), 1);
    let id = &response.added_dictionary_ids[0];
    assert_eq!(response.data, json!({ "title": "A", "items": [{ "id": id }] }));

    let link = response.navigation.get("root::items").unwrap();
    assert_eq!(link.items.len(), 1);

    let navigation = session.navigation_dictionary().unwrap();
    let child_root = navigation.item(id, &link.items[0]).unwrap();
    assert_eq!(child_root.text, "B");

    let entry = session.data_dictionary().unwrap().get(id).unwrap().clone();
    assert_eq!(entry.schema_id, "S");
    assert_eq!(entry.parent.unwrap().id, "root");
}

#[test]
fn test_remove_children_deletes_entry() {
    let mut session = Session::new();
    session.handle(initialize()).unwrap();

    let added = data_response(
        session
            .handle(Request::Data(DataRequest::AddChildren {
                data_location: items(),
                children: vec![ChildFragment::new(json!({ "title": "B" }))],
            }))
            .unwrap(),
    );
    let id = added.added_dictionary_ids[0].clone();

    let response = data_response(
        session
            .handle(Request::Data(DataRequest::RemoveChildren {
                data_location: items(),
                children: vec![ChildReference { id: id.clone() }],
            }))
            .unwrap(),
    );

    assert_eq!(response.removed_dictionary_ids, vec![id.clone()]);
    assert_eq!(response.data, json!({ "title": "A", "items": [] }));
    assert!(response.navigation.get("root::items").unwrap().items.is_empty());
    assert!(!session.data_dictionary().unwrap().contains(&id));
    assert!(session.navigation_dictionary().unwrap().get(&id).is_none());
}

#[test]
fn test_update_empty_location_replaces_value() {
    let mut session = Session::new();
    session.handle(initialize()).unwrap();

    let response = data_response(
        session
            .handle(Request::Data(DataRequest::Update {
                data_location: DataLocation::root(),
                data: json!({ "title": "X" }),
            }))
            .unwrap(),
    );

    assert_eq!(response.data, json!({ "title": "X" }));
    assert_eq!(response.navigation.root().unwrap().text, "X");
}

#[test]
fn test_requests_before_initialize_fail() {
    let mut session = Session::new();
    let requests = vec![
        Request::Data(DataRequest::Remove { data_location: items() }),
        Request::DataDictionary(DictionaryRequest::Get),
        Request::Navigation(NavigationRequest::Get),
        Request::NavigationDictionary(DictionaryRequest::Get),
    ];

    for request in requests {
        let err = session.handle(request).unwrap_err();
        assert!(matches!(err, EditorError::UninitializedState), "got {:?}", err);
    }
}

#[test]
fn test_invalid_path_leaves_state_unchanged() {
    let mut session = Session::new();
    session.handle(initialize()).unwrap();
    let before = session.snapshot().unwrap();

    let err = session
        .handle(Request::Data(DataRequest::Update {
            data_location: DataLocation::parse("title.first").unwrap(),
            data: json!("x"),
        }))
        .unwrap_err();

    assert!(matches!(err, EditorError::Path(_)));
    assert_eq!(session.snapshot().unwrap(), before);
}

#[test]
fn test_duplicate_echoes_source_location() {
    let mut session = Session::new();
    session
        .handle(Request::Initialize {
            data_dictionary: DataDictionary::new(
                "root",
                DataDictionaryEntry::new("L", json!({ "list": [{ "name": "a" }, { "name": "b" }] })),
            ),
            schema_dictionary: SchemaDictionary::new().with_schema(
                "L",
                json!({
                    "type": "object",
                    "properties": {
                        "list": { "type": "array", "items": { "type": "object", "properties": { "name": { "type": "string" } } } }
                    }
                }),
            ),
        })
        .unwrap();

    let source = DataLocation::parse("list[0]").unwrap();
    let response = data_response(
        session
            .handle(Request::Data(DataRequest::Duplicate {
                source_data_location: source.clone(),
            }))
            .unwrap(),
    );

    assert_eq!(response.source_data_location, Some(source));
    assert_eq!(
        response.data,
        json!({ "list": [{ "name": "a" }, { "name": "a" }, { "name": "b" }] })
    );
    assert_eq!(response.navigation.get("root::list").unwrap().items.len(), 3);

    // Removing the copy restores the original array
    let response = data_response(
        session
            .handle(Request::Data(DataRequest::Remove {
                data_location: DataLocation::parse("list[1]").unwrap(),
            }))
            .unwrap(),
    );
    assert_eq!(response.data, json!({ "list": [{ "name": "a" }, { "name": "b" }] }));
}

#[test]
fn test_navigation_get_returns_active_dictionary() -> anyhow::Result<()> {
    let mut session = Session::new();
    session.handle(initialize())?;
    let added = data_response(session.handle(Request::Data(DataRequest::AddChildren {
        data_location: items(),
        children: vec![ChildFragment::new(json!({ "title": "B" }))],
    }))?);
    let child = added.added_dictionary_ids[0].clone();

    match session.handle(Request::DataDictionary(DictionaryRequest::UpdateActiveId {
        active_dictionary_id: child.clone(),
    }))? {
        Response::DataDictionary(DataDictionaryResponse::UpdateActiveId { active_dictionary_id }) => {
            assert_eq!(active_dictionary_id, child);
        }
        other => panic!("Unexpected response {:?}", other),
    }

    match session.handle(Request::Navigation(NavigationRequest::Get))? {
        Response::Navigation(NavigationResponse::Get {
            active_dictionary_id,
            active_navigation_config_id,
            navigation,
        }) => {
            assert_eq!(active_dictionary_id, child);
            assert_eq!(active_navigation_config_id, format!("{}::", child));
            assert_eq!(navigation.root().map(|root| root.text.as_str()), Some("B"));
        }
        other => panic!("Unexpected response {:?}", other),
    }

    // Data mutations now target the child entry
    let response = data_response(session.handle(Request::Data(DataRequest::Update {
        data_location: DataLocation::parse("title")?,
        data: json!("C"),
    }))?);
    assert_eq!(response.data, json!({ "title": "C" }));
    assert_eq!(response.active_dictionary_id, child);
    Ok(())
}

#[test]
fn test_navigation_update_validates_target() {
    let mut session = Session::new();
    session.handle(initialize()).unwrap();

    let response = session
        .handle(Request::Navigation(NavigationRequest::Update {
            active_dictionary_id: "root".to_string(),
            active_navigation_config_id: "root::title".to_string(),
        }))
        .unwrap();
    assert_eq!(
        response,
        Response::Navigation(NavigationResponse::Update {
            active_dictionary_id: "root".to_string(),
            active_navigation_config_id: "root::title".to_string(),
        })
    );

    let err = session
        .handle(Request::Navigation(NavigationRequest::Update {
            active_dictionary_id: "root".to_string(),
            active_navigation_config_id: "root::nowhere".to_string(),
        }))
        .unwrap_err();
    assert!(matches!(err, EditorError::InvalidSelection { .. }));
    assert_eq!(session.active().unwrap().navigation_config_id, "root::title");
}

#[test]
fn test_navigation_dictionary_update_active_id_resets_cursor() {
    let mut session = Session::new();
    session.handle(initialize()).unwrap();
    session
        .handle(Request::Navigation(NavigationRequest::Update {
            active_dictionary_id: "root".to_string(),
            active_navigation_config_id: "root::title".to_string(),
        }))
        .unwrap();

    let response = session
        .handle(Request::NavigationDictionary(DictionaryRequest::UpdateActiveId {
            active_dictionary_id: "root".to_string(),
        }))
        .unwrap();
    match response {
        Response::NavigationDictionary(NavigationDictionaryResponse::UpdateActiveId {
            active_navigation_config_id,
            ..
        }) => assert_eq!(active_navigation_config_id, "root::"),
        other => panic!("Unexpected response {:?}", other),
    }

    let err = session
        .handle(Request::NavigationDictionary(DictionaryRequest::UpdateActiveId {
            active_dictionary_id: "ghost".to_string(),
        }))
        .unwrap_err();
    assert!(matches!(err, EditorError::InvalidSelection { .. }));
}

#[test]
fn test_second_initialize_replaces_session() {
    let mut session = Session::new();
    session.handle(initialize()).unwrap();
    session
        .handle(Request::Data(DataRequest::AddChildren {
            data_location: items(),
            children: vec![ChildFragment::new(json!({}))],
        }))
        .unwrap();
    assert_eq!(session.data_dictionary().unwrap().len(), 2);

    session.handle(initialize()).unwrap();
    assert_eq!(session.data_dictionary().unwrap().len(), 1);
    assert_eq!(session.active().unwrap().navigation_config_id, "root::");
}
