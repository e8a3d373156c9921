//! Change classification scenarios driven through a CookieClient.

use cookie_events::client::CookieClient;
use cookie_events::cookies::{CookieAttributes, CookieHost, CookieMonster, Enumerating};
use cookie_events::events::{ChangeNotification, ChangedCookie, CookieEvent, EventType};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// Host whose header is set directly by the test.
#[derive(Default)]
struct ScriptedHost {
    header: Mutex<String>,
}

impl ScriptedHost {
    fn with_header(header: &str) -> Arc<Self> {
        Arc::new(Self {
            header: Mutex::new(header.to_string()),
        })
    }

    fn set_header(&self, header: &str) {
        *self.header.lock().unwrap() = header.to_string();
    }
}

impl CookieHost for ScriptedHost {
    fn cookie_header(&self) -> String {
        self.header.lock().unwrap().clone()
    }

    fn set_cookie_header(&self, _setter: &str) {}

    fn get_all(&self) -> Enumerating {
        Box::pin(async { Ok(Vec::new()) })
    }
}

fn record_events(client: &CookieClient) -> Arc<Mutex<Vec<EventType>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    client.on("insert update delete clear change", move |e: &CookieEvent| {
        sink.lock().unwrap().push(e.kind)
    });
    seen
}

#[test]
fn test_scenario_insert() {
    let host = ScriptedHost::with_header("");
    let client = CookieClient::new(host.clone());
    let seen = record_events(&client);

    host.set_header("a=1");
    client.handle_change(&ChangeNotification::for_change("a", "1"));

    assert_eq!(*seen.lock().unwrap(), vec![EventType::Insert, EventType::Change]);
    assert_eq!(client.list_cookies(), vec![("a".to_string(), json!(1))]);
}

#[test]
fn test_scenario_update() {
    let host = ScriptedHost::with_header("a=1");
    let client = CookieClient::new(host.clone());
    let seen = record_events(&client);

    host.set_header("a=2");
    client.handle_change(&ChangeNotification::for_change("a", "2"));

    assert_eq!(*seen.lock().unwrap(), vec![EventType::Update, EventType::Change]);
    assert_eq!(client.get_cookie("a"), Some(json!(2)));
}

#[test]
fn test_scenario_clear() {
    let host = ScriptedHost::with_header("a=1");
    let client = CookieClient::new(host.clone());
    let seen = record_events(&client);

    host.set_header("");
    client.handle_change(&ChangeNotification::for_delete("a"));

    assert_eq!(*seen.lock().unwrap(), vec![EventType::Clear, EventType::Change]);
    assert!(client.snapshot().is_empty());
}

#[test]
fn test_scenario_delete() {
    let host = ScriptedHost::with_header("a=1; b=2");
    let client = CookieClient::new(host.clone());
    let seen = record_events(&client);

    host.set_header("b=2");
    client.handle_change(&ChangeNotification::for_delete("a"));

    assert_eq!(*seen.lock().unwrap(), vec![EventType::Delete, EventType::Change]);
    assert!(!client.has_cookie("a"));
    assert!(client.has_cookie("b"));
}

#[test]
fn test_unchanged_rewrite_fires_only_change() {
    let host = ScriptedHost::with_header("a=1");
    let client = CookieClient::new(host.clone());
    let seen = record_events(&client);

    client.handle_change(&ChangeNotification::for_change("a", "1"));

    assert_eq!(*seen.lock().unwrap(), vec![EventType::Change]);
}

#[test]
fn test_subsequent_changes_compare_against_refreshed_snapshot() {
    let host = ScriptedHost::with_header("");
    let client = CookieClient::new(host.clone());
    let seen = record_events(&client);

    host.set_header("a=1");
    client.handle_change(&ChangeNotification::for_change("a", "1"));
    host.set_header("a=5");
    client.handle_change(&ChangeNotification::for_change("a", "5"));

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            EventType::Insert,
            EventType::Change,
            EventType::Update,
            EventType::Change
        ]
    );
}

#[test]
fn test_event_payload_carries_notification() {
    let host = ScriptedHost::with_header("");
    let client = CookieClient::new(host.clone());
    let payloads = Arc::new(Mutex::new(Vec::new()));
    let sink = payloads.clone();
    client.on("insert", move |e: &CookieEvent| sink.lock().unwrap().push(e.clone()));

    let notification = ChangeNotification::new(
        vec![ChangedCookie::new("a", "1"), ChangedCookie::new("b", "2")],
        Vec::new(),
    )
    .with_target("cookieStore");
    host.set_header("a=1; b=2");
    client.handle_change(&notification);

    let payloads = payloads.lock().unwrap();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].kind, EventType::Insert);
    assert_eq!(payloads[0].changed.len(), 2);
    assert_eq!(payloads[0].target.as_deref(), Some("cookieStore"));
    assert_eq!(payloads[0].origin, notification);
}

#[test]
fn test_jar_notifications_drive_events() {
    let (jar, mut changes) = CookieMonster::with_change_stream();
    let client = CookieClient::new(Arc::new(jar));
    let seen = record_events(&client);

    // Deliver each notification right after the write that caused it.
    let mut deliver = || {
        let notification = changes.try_recv().expect("write produced a notification");
        client.handle_change(&notification);
    };

    client.set_cookie("a", "1", &CookieAttributes::new());
    deliver();
    client.set_cookie("b", "2", &CookieAttributes::new());
    deliver();
    client.set_cookie("a", "3", &CookieAttributes::new());
    deliver();
    client.remove_cookie("a", None, None);
    deliver();
    client.remove_cookie("b", None, None);
    deliver();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            EventType::Insert,
            EventType::Change,
            EventType::Insert,
            EventType::Change,
            EventType::Update,
            EventType::Change,
            EventType::Delete,
            EventType::Change,
            EventType::Clear,
            EventType::Change,
        ]
    );
}

#[tokio::test]
async fn test_watch_drains_until_stream_closes() {
    let host = ScriptedHost::with_header("a=1");
    let client = CookieClient::new(host.clone());
    let seen = record_events(&client);

    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(ChangeNotification::for_change("a", "1")).unwrap();
    tx.send(ChangeNotification::for_change("b", "2")).unwrap();
    drop(tx);

    // Header stays at "a=1" throughout.
    client.watch(rx).await;

    assert_eq!(
        *seen.lock().unwrap(),
        vec![EventType::Change, EventType::Insert, EventType::Change]
    );
    assert_eq!(client.snapshot().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_watch_after_several_writes_uses_per_change_state() {
    let (jar, changes) = CookieMonster::with_change_stream();
    let client = CookieClient::new(Arc::new(jar));
    let seen = record_events(&client);

    client.set_cookie("a", "1", &CookieAttributes::new());
    client.set_cookie("b", "2", &CookieAttributes::new());
    client.set_cookie("a", "3", &CookieAttributes::new());

    // The jar keeps the stream open; stop once the queue is drained.
    let drained = tokio::time::timeout(Duration::from_secs(1), client.watch(changes)).await;
    assert!(drained.is_err());

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            EventType::Insert,
            EventType::Change,
            EventType::Insert,
            EventType::Change,
            EventType::Update,
            EventType::Change,
        ]
    );
    assert_eq!(client.get_cookie("a"), Some(json!(3)));
    assert_eq!(client.get_cookie("b"), Some(json!(2)));
}

#[test]
fn test_notification_header_preferred_over_live_header() {
    // The cookie is already gone again by the time the change is handled.
    let host = ScriptedHost::with_header("");
    let client = CookieClient::new(host.clone());
    let seen = record_events(&client);

    client.handle_change(&ChangeNotification::for_change("a", "1").with_header("a=1"));

    assert_eq!(*seen.lock().unwrap(), vec![EventType::Insert, EventType::Change]);
    assert_eq!(client.get_cookie("a"), Some(json!(1)));
}
