//! End-to-end editing flow over a small capture: import, resolve display
//! fields, classify layers, edit through every surface, publish.

use pktedit::bridge::{import_into, JsonImporter};
use pktedit::json_edit::{get, segment_for, Edit, KeyPath, PathSegment};
use pktedit::layer_edit::{bytes_of, tree_of, BytesTarget, FieldDraft, TreeTarget};
use pktedit::raw_bytes::HexDraft;
use pktedit::{classify, resolve, Capability, LayerError, ParseError, RecordStore, StoreError};
use serde_json::json;

const CAPTURE: &str = r#"[
  {
    "timestamp": "1700000000.000001",
    "length": 142,
    "layers": [
      {"name": "Ether", "src": "02:00:00:00:00:01", "dst": "02:00:00:00:00:02"},
      {"name": "IP", "src": "10.0.0.1", "dst": "10.0.0.2"},
      {"name": "SCTP", "sport": 38412, "dport": 38412},
      {"name": "SCTPChunkData", "tsn": 7, "stream_id": 1, "proto_id": 60},
      {"name": "NGAP", "data": ["initiatingMessage", {
        "procedureCode": 15,
        "criticality": "reject",
        "value": ["NGSetupRequest", {"protocolIEs": [
          {"id": 27, "value": "GlobalRANNodeID"},
          {"id": 82, "value": "RANNodeName"}
        ]}]
      }]}
    ]
  },
  {
    "timestamp": "1700000001.5",
    "length": 74,
    "layers": [
      {"name": "IP", "src": "192.168.1.10", "dst": "192.168.1.1"},
      {"name": "TCP", "sport": 51000, "dport": 80},
      {"name": "HTTPRequest", "headers": {"Method": "GET", "Path": "/"}, "body": null}
    ]
  },
  {
    "timestamp": "1700000002.25",
    "length": 60,
    "layers": [
      {"name": "IP", "src": "10.0.0.9", "dst": "10.0.0.8"},
      {"name": "Raw", "load": [222, 173]},
      {"name": "Padding", "load": [0, 0]}
    ]
  }
]"#;

fn store() -> RecordStore {
    let mut store = RecordStore::default();
    let loaded = import_into(&mut store, &mut JsonImporter, CAPTURE.as_bytes()).unwrap();
    assert_eq!(loaded, 3);
    store
}

#[test]
fn table_rows() {
    let rows = store().rows();
    assert_eq!(rows[0].source, "10.0.0.1:38412");
    assert_eq!(rows[0].protocol, "NGAP");
    assert_eq!(rows[1].destination, "192.168.1.1:80");
    assert_eq!(rows[1].protocol, "HTTPRequest");
    assert_eq!(rows[2].protocol, "IP");
    assert_eq!(rows[2].source, "10.0.0.9");
    assert_eq!(rows[2].number, 3);
}

#[test]
fn capabilities_per_layer() {
    let store = store();
    let caps: Vec<Capability> = store.records()[0].layers.iter().map(classify).collect();
    assert_eq!(
        caps,
        vec![
            Capability::ReadOnly,
            Capability::StructuredFields,
            Capability::StructuredFields,
            Capability::StructuredFields,
            Capability::StructuredAsn1,
        ]
    );
    assert_eq!(classify(&store.records()[1].layers[2]), Capability::HeaderAndBody);
    assert_eq!(classify(&store.records()[2].layers[2]), Capability::RawBytes);
}

#[test]
fn tree_view_delete_uses_leaf_first_path() {
    let mut store = store();
    store.select(0).unwrap();
    // Tree views report the path innermost first with the root label last.
    let path = KeyPath::from_tree_view(vec![
        PathSegment::Index(0),
        PathSegment::Key("protocolIEs".into()),
        PathSegment::Index(1),
        PathSegment::Key("value".into()),
        PathSegment::Index(1),
        PathSegment::Key("root".into()),
    ]);
    assert_eq!(path.to_pointer(), "/1/value/1/protocolIEs/0");

    let out = store
        .apply_tree_edit(0, 4, TreeTarget::Data, &Edit::Delete { path })
        .unwrap();
    let ies = get(
        tree_of(&out.record.layers[4], TreeTarget::Data).unwrap(),
        &KeyPath::parse_pointer("/1/value/1/protocolIEs").unwrap(),
    )
    .unwrap();
    assert_eq!(ies, &json!([{"id": 82, "value": "RANNodeName"}]));
    assert_eq!(store.selected().unwrap(), &out);
    // Siblings untouched.
    assert_eq!(out.record.layers[4].get("data").unwrap()[1]["criticality"], json!("reject"));
}

#[test]
fn tree_insert_with_text_key() {
    let mut store = store();
    let parent = KeyPath::parse_pointer("/1/value/1/protocolIEs").unwrap();
    let doc = tree_of(store.layer(0, 4).unwrap(), TreeTarget::Data).unwrap();
    let key = segment_for(doc, &parent, "0").unwrap();
    let edit = Edit::Insert {
        parent: parent.clone(),
        key,
        value: json!({"id": 21, "value": "DefaultPagingDRX"}),
    };
    let out = store.apply_tree_edit(0, 4, TreeTarget::Data, &edit).unwrap();
    let ies = get(out.record.layers[4].get("data").unwrap(), &parent).unwrap();
    assert_eq!(ies.as_array().unwrap().len(), 3);
    assert_eq!(ies[0]["id"], json!(21));

    let doc = tree_of(store.layer(0, 4).unwrap(), TreeTarget::Data).unwrap();
    assert!(segment_for(doc, &parent, "-1").is_err());
}

#[test]
fn http_headers_and_body() {
    let mut store = store();
    let edit = Edit::Insert {
        parent: KeyPath::root(),
        key: "Host".into(),
        value: json!("example.com"),
    };
    store.apply_tree_edit(1, 2, TreeTarget::Headers, &edit).unwrap();
    let out = store.apply_hex_edit(1, 2, BytesTarget::Body, "7b7d").unwrap();
    let layer = &out.record.layers[2];
    assert_eq!(
        layer.get("headers"),
        Some(&json!({"Method": "GET", "Path": "/", "Host": "example.com"}))
    );
    assert_eq!(bytes_of(layer, BytesTarget::Body).unwrap(), b"{}".to_vec());
}

#[test]
fn raw_payload_draft() {
    let mut store = store();
    let current = bytes_of(store.layer(2, 1).unwrap(), BytesTarget::Load).unwrap();
    let mut draft = HexDraft::new(&current);
    assert_eq!(draft.text(), "dead");
    draft.set_text("0a1");
    assert!(!draft.can_commit());
    draft.set_text("0a1b");
    let bytes = draft.commit().unwrap();
    assert_eq!(bytes, vec![10, 27]);
    let out = store.apply_hex_edit(2, 1, BytesTarget::Load, draft.text()).unwrap();
    assert_eq!(out.record.layers[1].get("load"), Some(&json!([10, 27])));
    assert_eq!(out.record.layers[2].get("load"), Some(&json!([0, 0])));
}

#[test]
fn structured_fields_commit_is_all_or_nothing() {
    let mut store = store();
    let before = store.records().to_vec();
    let mut draft = FieldDraft::from_layer(store.layer(0, 2).unwrap()).unwrap();
    draft.set_field("sport", "2152").unwrap();
    draft.set_field("dport", "{oops").unwrap();
    let err = store.apply_field_draft(0, 2, &draft).unwrap_err();
    match err {
        StoreError::Layer(LayerError::Field { field, source }) => {
            assert_eq!(field, "dport");
            assert!(matches!(source, ParseError::Json(_)));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(store.records(), before.as_slice());

    draft.set_field("dport", "2152").unwrap();
    store.apply_field_draft(0, 2, &draft).unwrap();
    assert_eq!(resolve::destination(&store.records()[0].layers), "10.0.0.2:2152");
}

#[test]
fn read_only_layers_reject_edits() {
    let mut store = store();
    let err = store
        .apply_tree_edit(
            0,
            0,
            TreeTarget::Data,
            &Edit::Delete {
                path: KeyPath::parse_pointer("/src").unwrap(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, StoreError::Layer(LayerError::NotEditable { .. })));
}
