use proptest::prelude::*;
use proptest::test_runner::Config;
use serde_json::{json, Value};

use test_case_generator::models::MAX_DEPTH;
use test_case_generator::{extract, extract_description};

fn leaf() -> impl Strategy<Value = Value> {
    let media_ref = prop_oneof![
        Just(Value::Null),
        Just(json!("")),
        "[a-z0-9:/.]{1,16}".prop_map(Value::String),
        any::<u32>().prop_map(|n| json!(n)),
    ];

    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        ".{0,8}".prop_map(Value::String),
        ".{0,12}".prop_map(|text| json!({"type": "text", "text": text})),
        prop::sample::select(vec![
            json!({"type": "text"}),
            json!({"type": "text", "text": 7}),
            json!({"type": "mediaSingle", "attrs": "roto"}),
            json!({"type": "mediaSingle"}),
            json!({"type": "table"}),
            json!({"type": "table", "content": [1, "fila", null]}),
            json!({}),
        ]),
        media_ref.clone().prop_map(|url| json!({"type": "mediaSingle", "attrs": {"url": url}})),
        media_ref.prop_map(|id| json!({"type": "mediaSingle", "attrs": {"id": id}})),
    ]
}

/// Árboles arbitrarios con tipos conocidos, desconocidos y `content` mal formado
fn document() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(8, 96, 6, |inner| {
        let kind = prop_oneof![
            Just("doc"),
            Just("paragraph"),
            Just("table"),
            Just("tableRow"),
            Just("tableCell"),
            Just("mediaSingle"),
            Just("bulletList"),
            Just("extensionDesconocida"),
        ];

        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            (kind.clone(), prop::collection::vec(inner.clone(), 0..6))
                .prop_map(|(kind, content)| json!({"type": kind, "content": content})),
            (kind, inner.clone()).prop_map(|(kind, content)| json!({"type": kind, "content": content})),
            prop::collection::vec(inner, 0..6).prop_map(|content| json!({"content": content})),
        ]
    })
}

fn nest(levels: usize, inner: Value) -> Value {
    (0..levels).fold(inner, |node, _| json!({"type": "paragraph", "content": [node]}))
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn extract_is_total(tree in document(), levels in 0..MAX_DEPTH + 32) {
        let nested = nest(levels, tree);
        let _ = extract(&nested);
        let _ = extract_description(&json!({"content": [nested.clone()]}));
        let _ = extract_description(&nested);
    }

    #[test]
    fn content_beyond_depth_limit_is_empty(
        tree in document(),
        extra in 1..64usize,
    ) {
        let nested = nest(MAX_DEPTH + extra, tree);
        prop_assert_eq!(extract(&nested), "");
        prop_assert_eq!(extract_description(&json!({"content": [nested]})), "");
    }

    #[test]
    fn text_within_depth_limit_is_kept(
        text in "[a-zA-Z]{1,12}",
        levels in 0..=MAX_DEPTH,
    ) {
        let nested = nest(levels, json!({"type": "text", "text": text.clone()}));
        prop_assert_eq!(extract(&nested), text);
    }
}

#[test]
fn very_deep_chain_renders_empty() {
    let nested = nest(1000, json!({"type": "text", "text": "oculto"}));
    assert_eq!(extract(&nested), "");
    assert_eq!(extract_description(&json!({"content": [nested]})), "");
}
