use serde_json::{Map, Value};
use thiserror::Error;

/// Why a language-model response yielded no commands.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("response body is not valid JSON: {0}")]
    MalformedResponse(serde_json::Error),
    #[error("response has no choices[0].message.content string")]
    MissingContent,
    #[error("embedded command document is not valid JSON: {0}")]
    MalformedCommands(serde_json::Error),
    #[error("embedded command document is not a JSON object")]
    NotAnObject,
}

/// Pull the action-name → payload mapping out of a raw chat-completions body.
///
/// The model's answer lives at `choices[0].message.content` as a string that
/// itself holds a JSON object. Key order of that object is preserved so
/// dispatch order is deterministic. Callers that want the original
/// fail-soft behavior treat `Err` as an empty mapping.
pub fn extract(raw: &str) -> Result<Map<String, Value>, ExtractError> {
    let outer: Value = serde_json::from_str(raw).map_err(ExtractError::MalformedResponse)?;
    let content = outer["choices"][0]["message"]["content"]
        .as_str()
        .ok_or(ExtractError::MissingContent)?;
    let commands: Value =
        serde_json::from_str(content).map_err(ExtractError::MalformedCommands)?;
    match commands {
        Value::Object(map) => Ok(map),
        _ => Err(ExtractError::NotAnObject),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wrap(content: &str) -> String {
        json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        })
        .to_string()
    }

    #[test]
    fn two_commands_in_order() {
        let content = r#"{"plant": {"bedId": "b1", "rowPosition": 1}, "water": {"bedId": "b1", "volume": 0.5}}"#;
        let commands = extract(&wrap(content)).unwrap();
        let keys: Vec<&String> = commands.keys().collect();
        assert_eq!(keys, ["plant", "water"]);
        assert_eq!(commands["water"]["volume"], json!(0.5));
    }

    #[test]
    fn order_follows_document_not_alphabet() {
        let content = r#"{"water": {}, "plant": {}}"#;
        let commands = extract(&wrap(content)).unwrap();
        let keys: Vec<&String> = commands.keys().collect();
        assert_eq!(keys, ["water", "plant"]);
    }

    #[test]
    fn malformed_outer_json() {
        let err = extract("not json at all").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedResponse(_)));
    }

    #[test]
    fn missing_choices() {
        let err = extract(r#"{"error": {"message": "rate limited"}}"#).unwrap_err();
        assert!(matches!(err, ExtractError::MissingContent));
    }

    #[test]
    fn malformed_inner_json() {
        let err = extract(&wrap("Sure! Here are your commands:")).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedCommands(_)));
    }

    #[test]
    fn inner_json_not_an_object() {
        let err = extract(&wrap("[1, 2, 3]")).unwrap_err();
        assert!(matches!(err, ExtractError::NotAnObject));
    }

    #[test]
    fn empty_object_is_fine() {
        let commands = extract(&wrap("{}")).unwrap();
        assert!(commands.is_empty());
    }
}
