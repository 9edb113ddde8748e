//! End-to-end flows: envelope in, envelope out, through the full catalog.

use std::sync::Arc;
use std::time::Duration;

use soapbridge_connector::{
    register_builtins, Connector, ConnectorConfig, RecordingDispatcher, ScriptCatalog,
};
use soapbridge_core::{SoapMessage, XmlElement};
use soapbridge_samples::{register_all, StoreSettings, SAMPLES_NS};

struct Setup {
    dispatcher: Arc<RecordingDispatcher>,
    connector: Connector,
    _save_dir: tempfile::TempDir,
}

fn setup() -> Setup {
    let save_dir = tempfile::tempdir().expect("create temp dir");
    let mut catalog = ScriptCatalog::new();
    register_all(&mut catalog, StoreSettings::default());
    register_builtins(&mut catalog);

    let dispatcher = Arc::new(RecordingDispatcher::new());
    let config = ConnectorConfig {
        transaction_save_path: save_dir.path().to_path_buf(),
        default_user_dn: "cn=flow-caller".into(),
        ..ConnectorConfig::default()
    };
    let connector = Connector::new(catalog, config, dispatcher.clone());
    Setup {
        dispatcher,
        connector,
        _save_dir: save_dir,
    }
}

fn envelope_for(method: XmlElement) -> String {
    SoapMessage::new(method).to_envelope_string()
}

fn method_of(envelope: &str) -> XmlElement {
    SoapMessage::from_envelope_str(envelope)
        .expect("parse response envelope")
        .method
}

#[test]
fn echo_wraps_the_request_envelope_to_envelope() {
    let setup = setup();
    let request = XmlElement::in_namespace("Echo", SAMPLES_NS)
        .with_child(XmlElement::new("x").with_text("1"));

    let response = setup
        .connector
        .process_envelope(&envelope_for(request.clone()), None)
        .unwrap();

    let method = method_of(&response);
    assert_eq!(method.name, "EchoResponse");
    assert_eq!(method.namespace.as_deref(), Some(SAMPLES_NS));
    assert_eq!(
        method.descendant_text("Message").as_deref(),
        Some("Hello cn=flow-caller")
    );
    // Parsing resolves the inherited namespace onto the children, so
    // compare against the request's parsed form.
    let expected = method_of(&envelope_for(request));
    let original = method.find_descendant("OriginalRequest", None).unwrap();
    assert_eq!(original.first_child_element(), Some(&expected));
}

#[test]
fn read_from_store_builds_the_documented_key() {
    let setup = setup();
    let request = XmlElement::in_namespace("ReadFromStore", SAMPLES_NS)
        .with_child(XmlElement::new("CITY").with_text("London"))
        .with_child(XmlElement::new("LAST_NAME").with_text("O'Neil"))
        .with_child(XmlElement::new("FIRST_NAME").with_text("Ann"));

    setup
        .connector
        .process_envelope(&envelope_for(request), None)
        .unwrap();

    let outbound = setup.dispatcher.requests();
    assert_eq!(outbound.len(), 1);
    assert_eq!(
        outbound[0].method.descendant_text("key").as_deref(),
        Some("/scriptsample/London/O#Neil/Ann")
    );
}

#[test]
fn list_files_on_missing_directory_returns_empty_listing() {
    let setup = setup();
    let request = XmlElement::in_namespace("ListFiles", SAMPLES_NS)
        .with_child(XmlElement::new("dir").with_text("/definitely/not/here"));

    let response = setup
        .connector
        .process_envelope(&envelope_for(request), None)
        .unwrap();

    let files = method_of(&response)
        .find_descendant("files", None)
        .cloned()
        .unwrap();
    assert!(files.children.is_empty());
}

#[test]
fn write_then_saved_transactions_are_queryable_and_deletable() {
    let setup = setup();

    // WriteToStore runs against the recorded backend.
    let write = XmlElement::in_namespace("WriteToStore", SAMPLES_NS)
        .with_child(XmlElement::new("CITY").with_text("Oslo"))
        .with_child(XmlElement::new("LAST_NAME").with_text("Berg"))
        .with_child(XmlElement::new("FIRST_NAME").with_text("Ida"))
        .with_child(XmlElement::new("DATA").with_child(XmlElement::new("note").with_text("hi")));
    let response = setup
        .connector
        .process_envelope(&envelope_for(write), None)
        .unwrap();
    assert_eq!(
        method_of(&response).descendant_text("result").as_deref(),
        Some("OK")
    );

    // Persist a pair directly, then read it back through the built-in.
    let seq = setup
        .connector
        .saved_store()
        .save_request("flow-1", &XmlElement::new("Order").with_text("x"))
        .unwrap();
    setup
        .connector
        .saved_store()
        .save_response("flow-1", seq, &XmlElement::new("OrderResponse"))
        .unwrap();

    let get = XmlElement::in_namespace("GetSavedTransactions", SAMPLES_NS)
        .with_child(XmlElement::new("TransactionId").with_text("flow-1"));
    let listed = setup
        .connector
        .process_envelope(&envelope_for(get), None)
        .unwrap();
    let listed = method_of(&listed);
    let transaction = listed.find_descendant("transaction", None).unwrap();
    assert_eq!(transaction.attr("id"), Some("1"));
    assert!(transaction.find_descendant("response", None).is_some());

    let delete = XmlElement::in_namespace("DeleteSavedTransactions", SAMPLES_NS)
        .with_child(XmlElement::new("TransactionId").with_text("flow-1"));
    setup
        .connector
        .process_envelope(&envelope_for(delete), None)
        .unwrap();
    assert!(setup
        .connector
        .saved_store()
        .read_all("flow-1")
        .unwrap()
        .is_empty());
}

#[test]
fn unknown_method_is_rejected() {
    let setup = setup();
    let request = XmlElement::in_namespace("NoSuchMethod", SAMPLES_NS);
    let result = setup
        .connector
        .process_envelope(&envelope_for(request), None);
    assert!(result.is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn async_store_write_outlives_its_transaction() {
    // Same catalog as `setup`, but with a short delivery delay.
    let save_dir = tempfile::tempdir().expect("create temp dir");
    let mut catalog = ScriptCatalog::new();
    register_all(&mut catalog, StoreSettings::default());
    catalog.register(
        soapbridge_connector::MethodLocator::in_namespace("AsyncStoreWrite", SAMPLES_NS),
        Arc::new(soapbridge_samples::AsyncStoreWrite::new(
            "/soapbridge/samples/AsyncStoreWriteOutput",
            Duration::from_millis(20),
        )),
    );
    let dispatcher = Arc::new(RecordingDispatcher::new());
    let config = ConnectorConfig {
        transaction_save_path: save_dir.path().to_path_buf(),
        ..ConnectorConfig::default()
    };
    let setup = Setup {
        connector: Connector::new(catalog, config, dispatcher.clone()),
        dispatcher,
        _save_dir: save_dir,
    };
    let request = XmlElement::in_namespace("AsyncStoreWrite", SAMPLES_NS);

    let response = setup
        .connector
        .process_envelope(&envelope_for(request), Some("cn=scheduler"))
        .unwrap();
    let method = method_of(&response);
    assert_eq!(method.name, "AsyncStoreWriteResponse");
    assert!(method.children.is_empty());

    let dispatcher = Arc::clone(&setup.dispatcher);
    let delivered = tokio::task::spawn_blocking(move || {
        dispatcher.wait_for_request(0, Duration::from_secs(30))
    })
    .await
    .expect("join waiter")
    .expect("delayed update delivered");

    assert_eq!(delivered.method_name(), "UpdateXMLObject");
    assert_eq!(delivered.user_dn.as_deref(), Some("cn=scheduler"));
}
