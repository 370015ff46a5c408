//! End-to-end behavior of bracket-key normalization against compiled schemas.

use formkeys_core::{normalize, ContentType, FormEncoding, Normalizer, NormalizerConfig, Schema};
use serde_json::{json, Value};

fn multipart() -> ContentType {
    ContentType::new("multipart", "form-data")
}

fn urlencoded() -> ContentType {
    ContentType::new("application", "x-www-form-urlencoded")
}

fn texts_schema() -> Schema {
    Schema::compile(&json!({
        "type": "object",
        "properties": {
            "texts[]": {"type": "array", "items": {"type": "string"}},
            "name": {"type": "string"}
        }
    }))
    .unwrap()
}

fn sample_bodies() -> Vec<Value> {
    vec![
        json!({"texts": ["a", "b"], "name": "test"}),
        json!({"nested": {"tags": ["x"]}, "items": [{"ids": [1]}]}),
        json!({}),
        json!(["texts"]),
        json!("texts"),
        json!(null),
        json!(42),
    ]
}

#[test]
fn rewrites_top_level_bracket_key() {
    let schema = texts_schema();
    let out = normalize(
        json!({"texts": ["a", "b"], "name": "test"}),
        &multipart(),
        Some(schema.root()),
    );
    assert_eq!(out, json!({"texts[]": ["a", "b"], "name": "test"}));
}

#[test]
fn urlencoded_bodies_are_normalized_too() {
    let schema = texts_schema();
    let out = normalize(json!({"texts": "only"}), &urlencoded(), Some(schema.root()));
    assert_eq!(out, json!({"texts[]": "only"}));
}

#[test]
fn json_bodies_pass_through() {
    let schema = texts_schema();
    let body = json!({"texts": ["a", "b"], "name": "test"});
    let out = normalize(
        body.clone(),
        &ContentType::new("application", "json"),
        Some(schema.root()),
    );
    assert_eq!(out, body);
}

#[test]
fn non_form_content_types_are_identity_for_any_body() {
    let schema = texts_schema();
    let others = [
        ContentType::new("application", "json"),
        ContentType::new("text", "plain"),
        ContentType::new("multipart", "mixed"),
        ContentType::new("Multipart", "form-data"),
        ContentType::new("application", "X-WWW-FORM-URLENCODED"),
    ];
    for content_type in &others {
        for body in sample_bodies() {
            let out = normalize(body.clone(), content_type, Some(schema.root()));
            assert_eq!(out, body, "{content_type} must not touch {body}");
        }
    }
}

#[test]
fn non_object_bodies_are_identity() {
    let schema = texts_schema();
    for encoding in FormEncoding::ALL {
        let content_type: ContentType = encoding.into();
        for body in [json!(["texts"]), json!("texts"), json!(null), json!(1.5)] {
            let out = normalize(body.clone(), &content_type, Some(schema.root()));
            assert_eq!(out, body);
        }
    }
}

#[test]
fn exact_match_wins_over_bracket_form() {
    let schema = Schema::compile(&json!({
        "properties": {"texts": {"type": "string"}, "texts[]": {"type": "array"}}
    }))
    .unwrap();
    let out = normalize(
        json!({"texts": "single value"}),
        &multipart(),
        Some(schema.root()),
    );
    assert_eq!(out, json!({"texts": "single value"}));
}

#[test]
fn descends_into_nested_objects() {
    let schema = Schema::compile(&json!({
        "properties": {
            "nested": {"properties": {"tags[]": {"type": "array"}}}
        }
    }))
    .unwrap();
    let out = normalize(
        json!({"nested": {"tags": ["x", "y"]}}),
        &multipart(),
        Some(schema.root()),
    );
    assert_eq!(out, json!({"nested": {"tags[]": ["x", "y"]}}));
}

#[test]
fn descends_into_arrays_of_objects() {
    let schema = Schema::compile(&json!({
        "properties": {
            "items": {
                "type": "array",
                "items": {"properties": {"ids[]": {"type": "array"}}}
            }
        }
    }))
    .unwrap();
    let out = normalize(
        json!({"items": [{"ids": [1, 2, 3]}, {"ids": [4, 5]}]}),
        &multipart(),
        Some(schema.root()),
    );
    assert_eq!(out, json!({"items": [{"ids[]": [1, 2, 3]}, {"ids[]": [4, 5]}]}));
}

#[test]
fn bracketed_parent_key_still_guides_descent() {
    let schema = Schema::compile(&json!({
        "properties": {
            "rows[]": {"items": {"properties": {"cells[]": {}}}}
        }
    }))
    .unwrap();
    let out = normalize(
        json!({"rows": [{"cells": ["a"]}, "plain"]}),
        &multipart(),
        Some(schema.root()),
    );
    assert_eq!(out, json!({"rows[]": [{"cells[]": ["a"]}, "plain"]}));
}

#[test]
fn empty_body_stays_empty() {
    let schema = texts_schema();
    for encoding in FormEncoding::ALL {
        let out = normalize(json!({}), &encoding.into(), Some(schema.root()));
        assert_eq!(out, json!({}));
    }
    assert_eq!(normalize::<&Value>(json!({}), &multipart(), None), json!({}));
}

#[test]
fn unmapped_keys_are_preserved_at_every_depth() {
    let schema = Schema::compile(&json!({
        "properties": {
            "tags[]": {},
            "nested": {"properties": {"ids[]": {}}}
        }
    }))
    .unwrap();
    let out = normalize(
        json!({
            "tags": [1],
            "other": {"tags": [2]},
            "nested": {"ids": [3], "tags": [4], "deeper": {"ids": [5]}}
        }),
        &multipart(),
        Some(schema.root()),
    );
    assert_eq!(
        out,
        json!({
            "tags[]": [1],
            "other": {"tags": [2]},
            "nested": {"ids[]": [3], "tags": [4], "deeper": {"ids": [5]}}
        })
    );
}

#[test]
fn missing_schema_guidance_is_identity() {
    let body = json!({"texts": ["a"], "items": [{"ids": [1]}]});

    assert_eq!(normalize::<&Value>(body.clone(), &multipart(), None), body);

    let scalar = Schema::compile(&json!({"type": "string"})).unwrap();
    assert_eq!(normalize(body.clone(), &multipart(), Some(scalar.root())), body);

    let empty = Schema::compile(&json!({"properties": {}})).unwrap();
    assert_eq!(normalize(body.clone(), &multipart(), Some(empty.root())), body);

    let unconstrained = Schema::compile(&json!(true)).unwrap();
    assert_eq!(
        normalize(body.clone(), &multipart(), Some(unconstrained.root())),
        body
    );
}

#[test]
fn unguided_arrays_of_objects_are_not_guessed() {
    let schema = Schema::compile(&json!({
        "properties": {"ids[]": {}, "list": {"type": "array"}}
    }))
    .unwrap();
    let body = json!({"list": [{"ids": [1]}], "loose": {"ids": [2]}});
    let out = normalize(body.clone(), &multipart(), Some(schema.root()));
    assert_eq!(out, body);
}

#[test]
fn recursive_schema_follows_body_depth() {
    let schema = Schema::compile(&json!({
        "properties": {
            "labels[]": {"type": "array"},
            "children": {"type": "array", "items": {"$ref": "#"}}
        }
    }))
    .unwrap();
    let out = normalize(
        json!({
            "labels": ["root"],
            "children": [
                {"labels": ["a"], "children": [{"labels": ["a1"], "children": []}]},
                {"labels": ["b"]}
            ]
        }),
        &multipart(),
        Some(schema.root()),
    );
    assert_eq!(
        out,
        json!({
            "labels[]": ["root"],
            "children": [
                {"labels[]": ["a"], "children": [{"labels[]": ["a1"], "children": []}]},
                {"labels[]": ["b"]}
            ]
        })
    );
}

#[test]
fn body_schema_compiled_from_definitions() {
    let document = json!({
        "definitions": {
            "upload": {
                "properties": {
                    "files[]": {"type": "array"},
                    "meta": {"$ref": "#/definitions/meta"}
                }
            },
            "meta": {"properties": {"keywords[]": {"type": "array"}}}
        }
    });
    let schema = Schema::compile_at(&document, "/definitions/upload").unwrap();
    let out = normalize(
        json!({"files": ["a.txt"], "meta": {"keywords": ["k"]}}),
        &multipart(),
        Some(schema.root()),
    );
    assert_eq!(out, json!({"files[]": ["a.txt"], "meta": {"keywords[]": ["k"]}}));
}

#[test]
fn raw_schema_documents_normalize_like_compiled_ones() {
    let document = json!({
        "properties": {
            "nested": {"properties": {"tags[]": {}}},
            "items": {"items": {"properties": {"ids[]": {}}}}
        }
    });
    let compiled = Schema::compile(&document).unwrap();
    let body = json!({"nested": {"tags": ["x"]}, "items": [{"ids": [1]}]});

    let from_raw = normalize(body.clone(), &multipart(), Some(&document));
    let from_compiled = normalize(body, &multipart(), Some(compiled.root()));
    assert_eq!(from_raw, from_compiled);
    assert_eq!(
        from_raw,
        json!({"nested": {"tags[]": ["x"]}, "items": [{"ids[]": [1]}]})
    );
}

#[test]
fn configured_depth_limit_passes_deep_levels_through() {
    let schema = Schema::compile(&json!({
        "properties": {
            "tags[]": {},
            "children": {"items": {"$ref": "#"}}
        }
    }))
    .unwrap();
    let body = json!({
        "tags": [0],
        "children": [{"tags": [1], "children": [{"tags": [2]}]}]
    });

    let config = NormalizerConfig::parse_str("[normalizer]\nmax_depth = 3\n").unwrap();
    let out = Normalizer::new(config).normalize(body, &multipart(), Some(schema.root()));
    assert_eq!(
        out,
        json!({
            "tags[]": [0],
            "children": [{"tags[]": [1], "children": [{"tags": [2]}]}]
        })
    );
}
