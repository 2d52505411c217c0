//! Property-based tests for clipboard request building and `clear_all`
//! bookkeeping, driven through the blocking facade and a scripted
//! transport.

use std::sync::Arc;

use pluggedin_sdk::blocking;
use pluggedin_sdk::clipboard::envelope::parse_deleted;
use pluggedin_sdk::clipboard::payload::write_payload;
use pluggedin_sdk::{
    ClearStrategy, ClipboardEncoding, ClipboardVisibility, Method, PluggedIn, ScriptedTransport,
    WriteOptions,
};
use proptest::prelude::*;
use serde_json::{json, Value};

/// What the fake server does with one entry during an iterative clear.
#[derive(Debug, Clone, Copy)]
enum Outcome {
    Deleted,
    NothingDeleted,
    ServerError,
    Unaddressable,
}

fn arb_outcome() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        3 => Just(Outcome::Deleted),
        1 => Just(Outcome::NothingDeleted),
        1 => Just(Outcome::ServerError),
        1 => Just(Outcome::Unaddressable),
    ]
}

fn arb_encoding() -> impl Strategy<Value = ClipboardEncoding> {
    prop::sample::select(ClipboardEncoding::ALL.to_vec())
}

fn arb_visibility() -> impl Strategy<Value = ClipboardVisibility> {
    prop::sample::select(ClipboardVisibility::ALL.to_vec())
}

fn arb_write_options() -> impl Strategy<Value = WriteOptions> {
    (
        arb_encoding(),
        arb_visibility(),
        prop::option::of("[a-z-]{0,8}"),
        prop::option::of(-10i64..10_000),
    )
        .prop_map(|(encoding, visibility, tool, ttl)| WriteOptions {
            encoding,
            visibility,
            created_by_tool: tool,
            ttl_seconds: ttl,
            ..WriteOptions::default()
        })
}

fn blocking_client(transport: &Arc<ScriptedTransport>, bulk_clear: bool) -> blocking::PluggedIn {
    let client = PluggedIn::builder()
        .transport(transport.clone())
        .bulk_clear(bulk_clear)
        .build()
        .unwrap();
    blocking::PluggedIn::new(client).unwrap()
}

proptest! {
    // ============================================
    // clear_all tally
    // ============================================

    #[test]
    fn iterative_clear_accounts_for_every_entry(
        outcomes in prop::collection::vec(arb_outcome(), 0..12)
    ) {
        let transport = Arc::new(ScriptedTransport::new());

        let entries: Vec<Value> = outcomes
            .iter()
            .enumerate()
            .map(|(i, outcome)| match outcome {
                Outcome::Unaddressable => json!({"value": "orphan"}),
                _ if i % 2 == 0 => json!({"name": format!("n{}", i), "value": "v"}),
                _ => json!({"idx": i, "value": "v"}),
            })
            .collect();
        transport.push_json(200, json!({"success": true, "entries": entries}));

        for outcome in &outcomes {
            match outcome {
                Outcome::Deleted => {
                    transport.push_json(200, json!({"success": true, "deleted": true}));
                }
                Outcome::NothingDeleted => {
                    transport.push_json(200, json!({"success": true, "deleted": 0}));
                }
                Outcome::ServerError => {
                    transport.push_text(500, "Internal Server Error");
                }
                Outcome::Unaddressable => {}
            }
        }

        let client = blocking_client(&transport, false);
        let result = client.clipboard().clear_all().unwrap();

        let expected_deleted =
            outcomes.iter().filter(|o| matches!(o, Outcome::Deleted)).count() as u64;
        let unaddressable = outcomes.iter().filter(|o| matches!(o, Outcome::Unaddressable)).count();

        prop_assert_eq!(result.strategy, ClearStrategy::Iterative);
        prop_assert_eq!(result.deleted, expected_deleted);
        prop_assert_eq!(result.total(), outcomes.len() as u64);
        prop_assert_eq!(result.success(), result.failed == 0);
        prop_assert_eq!(transport.remaining(), 0);
        prop_assert_eq!(transport.requests().len(), 1 + outcomes.len() - unaddressable);
    }

    #[test]
    fn bulk_clear_is_a_single_request(deleted in 0u64..10_000) {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, json!({"success": true, "deleted": deleted}));

        let result = blocking_client(&transport, true).clipboard().clear_all().unwrap();

        prop_assert_eq!(result.deleted, deleted);
        prop_assert_eq!(result.failed, 0);
        let sent = transport.requests();
        prop_assert_eq!(sent.len(), 1);
        prop_assert_eq!(sent[0].method, Method::Delete);
    }

    // ============================================
    // Payload invariants
    // ============================================

    #[test]
    fn payload_is_sdk_tagged_or_rejected(
        value in ".{0,32}",
        name in prop::option::of("[a-z]{0,6}"),
        options in arb_write_options(),
    ) {
        match write_payload(&value, name.as_deref(), &options) {
            Ok(body) => {
                prop_assert!(options.ttl_seconds.map_or(true, |t| t > 0));
                prop_assert_eq!(&body["source"], "sdk");
                prop_assert_eq!(&body["value"], value.as_str());
                prop_assert_eq!(&body["encoding"], options.encoding.as_str());
                prop_assert_eq!(&body["visibility"], options.visibility.as_str());
                let has_name = name.as_deref().map_or(false, |n| !n.is_empty());
                prop_assert_eq!(body.get("name").is_some(), has_name);
                for (_, field) in body.as_object().unwrap() {
                    prop_assert!(!field.is_null());
                }
            }
            Err(err) => {
                prop_assert!(err.is_validation());
                prop_assert!(options.ttl_seconds.map_or(false, |t| t <= 0));
            }
        }
    }

    #[test]
    fn deleted_count_reads_bools_and_counts(raw in prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        ".{0,8}".prop_map(Value::String),
        Just(Value::Null),
    ]) {
        let expected = match &raw {
            Value::Bool(b) => u64::from(*b),
            Value::Number(n) => n.as_u64().unwrap_or(0),
            Value::String(s) => s.trim().parse().unwrap_or(0),
            _ => 0,
        };
        prop_assert_eq!(parse_deleted(&json!({"success": true, "deleted": raw.clone()})), expected);
        prop_assert_eq!(parse_deleted(&json!({"success": false, "deleted": raw})), 0);
    }
}
