//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB items and JSON attribute
//! maps through `serde_dynamo`. These are testable in isolation without
//! DynamoDB access.
//!
//! Only attribute types with a JSON counterpart are accepted: `S`, `N`,
//! `BOOL`, `NULL`, `L` and `M`. Sets and binary values would come back as
//! plain lists or strings and be rewritten with a different type, so items
//! holding them are rejected.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use stepinto_core::Attributes;

use super::error::ConversionError;

/// Convert an attribute map to a DynamoDB item.
pub fn item_to_dynamo(
    item: &Attributes,
) -> Result<HashMap<String, AttributeValue>, ConversionError> {
    serde_dynamo::to_item(item).map_err(|e| ConversionError::Serde(e.to_string()))
}

/// Convert a DynamoDB item to an attribute map.
pub fn dynamo_to_item(
    item: &HashMap<String, AttributeValue>,
) -> Result<Attributes, ConversionError> {
    for (name, attribute) in item {
        check_supported(name, attribute)?;
    }

    serde_dynamo::from_item(item.clone()).map_err(|e| ConversionError::Serde(e.to_string()))
}

fn check_supported(name: &str, attribute: &AttributeValue) -> Result<(), ConversionError> {
    match attribute {
        AttributeValue::S(_)
        | AttributeValue::N(_)
        | AttributeValue::Bool(_)
        | AttributeValue::Null(_) => Ok(()),
        AttributeValue::L(values) => values.iter().try_for_each(|v| check_supported(name, v)),
        AttributeValue::M(map) => map.values().try_for_each(|v| check_supported(name, v)),
        _ => Err(ConversionError::UnsupportedAttribute(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::primitives::Blob;
    use serde_json::{json, Value};

    fn attributes(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn key_item() -> HashMap<String, AttributeValue> {
        HashMap::from([
            ("pk".to_string(), AttributeValue::S("primary#id".to_string())),
            ("sk".to_string(), AttributeValue::S("sort#value".to_string())),
        ])
    }

    #[test]
    fn test_item_to_dynamo_key_attributes() {
        let item = attributes(json!({"pk": "primary#id", "sk": "sort#value"}));

        let dynamo = item_to_dynamo(&item).unwrap();

        assert_eq!(dynamo, key_item());
    }

    #[test]
    fn test_item_to_dynamo_scalars_and_nesting() {
        let item = attributes(json!({
            "count": 7,
            "ratio": 1.5,
            "active": true,
            "missing": null,
            "tags": ["a", 1],
            "inner": {"flag": false}
        }));

        let dynamo = item_to_dynamo(&item).unwrap();

        assert_eq!(dynamo["count"], AttributeValue::N("7".to_string()));
        assert_eq!(dynamo["ratio"], AttributeValue::N("1.5".to_string()));
        assert_eq!(dynamo["active"], AttributeValue::Bool(true));
        assert_eq!(dynamo["missing"], AttributeValue::Null(true));
        assert_eq!(
            dynamo["tags"],
            AttributeValue::L(vec![
                AttributeValue::S("a".to_string()),
                AttributeValue::N("1".to_string()),
            ])
        );
        let AttributeValue::M(inner) = &dynamo["inner"] else {
            panic!("expected a map attribute");
        };
        assert_eq!(inner["flag"], AttributeValue::Bool(false));
    }

    #[test]
    fn test_dynamo_to_item_round_trip() {
        let item = attributes(json!({
            "pk": "USER#u1",
            "sk": "PROFILE#main",
            "age": 42,
            "score": -0.25,
            "tags": ["a", "b"],
            "address": {"city": "Lisbon", "zip": null},
            "active": true
        }));

        let restored = dynamo_to_item(&item_to_dynamo(&item).unwrap()).unwrap();

        assert_eq!(restored, item);
    }

    #[test]
    fn test_string_set_is_rejected() {
        let mut item = key_item();
        item.insert(
            "labels".to_string(),
            AttributeValue::Ss(vec!["x".to_string(), "y".to_string()]),
        );

        assert_eq!(
            dynamo_to_item(&item),
            Err(ConversionError::UnsupportedAttribute("labels".to_string()))
        );
    }

    #[test]
    fn test_number_set_and_binary_are_rejected() {
        let mut numbers = key_item();
        numbers.insert("ids".to_string(), AttributeValue::Ns(vec!["1".to_string()]));
        assert_eq!(
            dynamo_to_item(&numbers),
            Err(ConversionError::UnsupportedAttribute("ids".to_string()))
        );

        let mut binary = key_item();
        binary.insert("blob".to_string(), AttributeValue::B(Blob::new(b"hi".to_vec())));
        assert_eq!(
            dynamo_to_item(&binary),
            Err(ConversionError::UnsupportedAttribute("blob".to_string()))
        );
    }

    #[test]
    fn test_nested_binary_set_is_rejected() {
        let mut item = key_item();
        item.insert(
            "meta".to_string(),
            AttributeValue::M(HashMap::from([(
                "files".to_string(),
                AttributeValue::L(vec![AttributeValue::Bs(vec![Blob::new(b"a".to_vec())])]),
            )])),
        );

        assert_eq!(
            dynamo_to_item(&item),
            Err(ConversionError::UnsupportedAttribute("meta".to_string()))
        );
    }
}
