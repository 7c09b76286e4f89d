//! JSON document form of a compiled expression.
//!
//! The admin side stores the tree verbatim next to the rule record and later
//! hands it to the protobuf JSON parser, so the layout follows the message
//! schema field names:
//!
//! ```text
//! {"comparison": {"operator": "GREATER_THAN",
//!                 "left":  {"field": {"field": "AMOUNT"}},
//!                 "right": {"literal": {"int_value": 1000}}}}
//! ```
//!
//! Literal payloads use `int_value`, `int64_value`, `float_value`,
//! `string_value` or `bool_value`. Aggregates are
//! `{"aggregate": {"function": "COUNT", "operand": ...}}` where the operand is
//! a field or `{"wildcard": {}}`; logical nodes are
//! `{"logical": {"operator": "AND", "operands": [...]}}`.

use serde_json::Value;
use thiserror::Error;

use crate::AstNode;

/// Errors converting between [`AstNode`] and its JSON document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document is not valid JSON, does not have the expected shape, or
    /// breaks a tree invariant such as logical operand arity.
    #[error("invalid rule document: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Render a tree as a JSON value.
///
/// # Errors
///
/// Returns [`DocumentError`] if serialization fails.
pub fn to_document(node: &AstNode) -> Result<Value, DocumentError> {
    Ok(serde_json::to_value(node)?)
}

/// Rebuild a tree from its JSON value, re-checking every structural invariant.
///
/// # Errors
///
/// Returns [`DocumentError`] for documents that do not describe a valid tree.
pub fn from_document(document: Value) -> Result<AstNode, DocumentError> {
    Ok(serde_json::from_value(document)?)
}

/// Render a tree as compact JSON text.
///
/// # Errors
///
/// Returns [`DocumentError`] if serialization fails.
pub fn to_json_string(node: &AstNode) -> Result<String, DocumentError> {
    Ok(serde_json::to_string(node)?)
}

/// Parse JSON text into a tree.
///
/// # Errors
///
/// Returns [`DocumentError`] for malformed text or documents that do not
/// describe a valid tree.
pub fn from_json_str(text: &str) -> Result<AstNode, DocumentError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{aggregate, count_all, field, AggFn, Field, Literal};

    #[test]
    fn comparison_layout() {
        let doc = to_document(&field(Field::Amount).gt(1000)).unwrap();
        assert_eq!(
            doc,
            json!({"comparison": {
                "operator": "GREATER_THAN",
                "left": {"field": {"field": "AMOUNT"}},
                "right": {"literal": {"int_value": 1000}},
            }})
        );
    }

    #[test]
    fn literal_payload_names() {
        let cases = [
            (Literal::Int32(5), json!({"int_value": 5})),
            (Literal::Int64(5_000_000_000), json!({"int64_value": 5_000_000_000_i64})),
            (Literal::Float(1.5), json!({"float_value": 1.5})),
            (Literal::String("night".into()), json!({"string_value": "night"})),
            (Literal::Bool(true), json!({"bool_value": true})),
        ];
        for (literal, payload) in cases {
            let doc = to_document(&AstNode::Literal(literal)).unwrap();
            assert_eq!(doc, json!({ "literal": payload }));
        }
    }

    #[test]
    fn aggregate_layout() {
        let doc = to_document(&count_all().gte(10)).unwrap();
        assert_eq!(
            doc["comparison"]["left"],
            json!({"aggregate": {"function": "COUNT", "operand": {"wildcard": {}}}})
        );

        let doc = to_document(&aggregate(AggFn::CountDistinct, Field::DeviceHash).gt(2)).unwrap();
        assert_eq!(
            doc["comparison"]["left"],
            json!({"aggregate": {
                "function": "COUNT_DISTINCT",
                "operand": {"field": {"field": "DEVICE_HASH"}},
            }})
        );
    }

    #[test]
    fn logical_layout() {
        let node = field(Field::Amount).gt(100).and(field(Field::Time).eq("night"));
        let doc = to_document(&node).unwrap();
        assert_eq!(doc["logical"]["operator"], json!("AND"));
        assert_eq!(doc["logical"]["operands"].as_array().map(Vec::len), Some(2));
        assert_eq!(from_document(doc).unwrap(), node);
    }

    #[test]
    fn json_text_round_trip() {
        let node = !field(Field::PaymentChannel).eq("card");
        let text = to_json_string(&node).unwrap();
        assert_eq!(from_json_str(&text).unwrap(), node);
    }

    #[test]
    fn rejects_bad_logical_arity() {
        let doc = json!({"logical": {"operator": "NOT", "operands": []}});
        let err = from_document(doc).unwrap_err();
        assert!(err.to_string().contains("NOT requires exactly one"), "{err}");

        let doc = json!({"logical": {"operator": "OR", "operands": [
            {"literal": {"bool_value": true}}
        ]}});
        assert!(from_document(doc).is_err());
    }

    #[test]
    fn rejects_literal_aggregate_operand() {
        let doc = json!({"aggregate": {"function": "SUM", "operand": {"literal": {"int_value": 1}}}});
        assert!(from_document(doc).is_err());
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(from_document(json!({"field": {"field": "CARD_NUMBER"}})).is_err());
        assert!(from_document(json!({"comparison": {
            "operator": "LIKE",
            "left": {"field": {"field": "AMOUNT"}},
            "right": {"literal": {"int_value": 1}},
        }}))
        .is_err());
    }

    #[test]
    fn rejects_out_of_range_narrow_int() {
        let doc = json!({"literal": {"int_value": 5_000_000_000_i64}});
        assert!(from_document(doc).is_err());
    }
}
