//! JSON conversion with envelope handling
//!
//! API responses may wrap their payload as `{"data": <payload>}`. Both
//! deserializers look for a top-level `data` member and use it as the payload
//! root when present, otherwise the whole document. Bodies produced by
//! `serialize` are never wrapped.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Key of the response envelope
const ENVELOPE_KEY: &str = "data";

/// JSON could not be parsed, did not match the target shape, or a value
/// could not be serialized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("JSON conversion failed: {message}")]
pub struct ConversionError {
    pub message: String,
}

impl From<serde_json::Error> for ConversionError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// Maps between JSON text and typed models.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelConverter;

impl ModelConverter {
    pub fn serialize<T: Serialize>(&self, value: &T) -> Result<String, ConversionError> {
        Ok(serde_json::to_string(value)?)
    }

    /// Deserialize one value, unwrapping the `data` envelope if present.
    pub fn deserialize_single<T: DeserializeOwned>(&self, json: &str) -> Result<T, ConversionError> {
        Ok(serde_json::from_value(payload(json)?)?)
    }

    /// Deserialize a JSON array, unwrapping the `data` envelope if present.
    pub fn deserialize_list<T: DeserializeOwned>(
        &self,
        json: &str,
    ) -> Result<Vec<T>, ConversionError> {
        Ok(serde_json::from_value(payload(json)?)?)
    }
}

fn payload(json: &str) -> Result<Value, ConversionError> {
    let mut tree: Value = serde_json::from_str(json)?;
    if let Value::Object(map) = &mut tree
        && let Some(data) = map.remove(ENVELOPE_KEY)
    {
        return Ok(data);
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Thing {
        id: String,
        count: u32,
    }

    fn thing() -> Thing {
        Thing {
            id: "5303d74c64f66366f00cb9b2a94f3251bf5".into(),
            count: 3,
        }
    }

    #[test]
    fn single_with_and_without_envelope_agree() {
        let converter = ModelConverter;
        let bare = r#"{"id":"5303d74c64f66366f00cb9b2a94f3251bf5","count":3}"#;
        let wrapped = format!(r#"{{"data":{bare}}}"#);

        let from_bare: Thing = converter.deserialize_single(bare).unwrap();
        let from_wrapped: Thing = converter.deserialize_single(&wrapped).unwrap();
        assert_eq!(from_bare, thing());
        assert_eq!(from_wrapped, from_bare);
    }

    #[test]
    fn list_with_and_without_envelope_agree() {
        let converter = ModelConverter;
        let bare = r#"[{"id":"a","count":1},{"id":"b","count":2}]"#;
        let wrapped = format!(r#"{{"data":{bare}}}"#);

        let from_bare: Vec<Thing> = converter.deserialize_list(bare).unwrap();
        let from_wrapped: Vec<Thing> = converter.deserialize_list(&wrapped).unwrap();
        assert_eq!(from_bare.len(), 2);
        assert_eq!(from_bare[1].id, "b");
        assert_eq!(from_wrapped, from_bare);
    }

    #[test]
    fn serialized_value_reads_back_wrapped_or_not() {
        let converter = ModelConverter;
        let json = converter.serialize(&thing()).unwrap();
        assert!(!json.contains("\"data\""), "serialize must not add an envelope");

        let back: Thing = converter.deserialize_single(&json).unwrap();
        assert_eq!(back, thing());

        let wrapped: Thing = converter
            .deserialize_single(&format!(r#"{{"data":{json}}}"#))
            .unwrap();
        assert_eq!(wrapped, thing());
    }

    #[test]
    fn malformed_json_is_conversion_error() {
        let err = ModelConverter
            .deserialize_single::<Thing>("{\"id\": ")
            .unwrap_err();
        assert!(!err.message.is_empty());
        assert!(err.to_string().starts_with("JSON conversion failed"));

        assert!(ModelConverter.deserialize_list::<Thing>("not json").is_err());
    }

    #[test]
    fn shape_mismatch_is_conversion_error() {
        let err = ModelConverter
            .deserialize_single::<Thing>(r#"{"data":{"id":"x"}}"#)
            .unwrap_err();
        assert!(err.message.contains("count"), "got: {}", err.message);

        let not_a_list = ModelConverter.deserialize_list::<Thing>(r#"{"data":{"id":"x","count":1}}"#);
        assert!(not_a_list.is_err());
    }

    #[test]
    fn envelope_only_applies_to_top_level_objects() {
        // An array is never an envelope, even if an element has a data key
        let list: Vec<serde_json::Value> = ModelConverter
            .deserialize_list(r#"[{"data":1}]"#)
            .unwrap();
        assert_eq!(list[0]["data"], 1);
    }
}
