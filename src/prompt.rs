use crate::command;

/// Fixed instruction preamble sent as the system message.
///
/// Enumerates the schema via `command::schema_summary()` so the prompt can
/// never drift from what `validate` accepts.
pub fn system_prompt() -> String {
    format!(
        r#"You are a helpful assistant that turns gardening instructions into a JSON object.
Keys are garden-bed actions and values are objects with the details for that action.
The available actions and their parameters are:

{}The 'started' field must be in ISO 8601 format (e.g. "2024-05-15T12:00:00").
Respond with ONLY the JSON object, no prose and no code fences.

Example:
{{
    "plant": {{"bedId": "someId", "rowPosition": 1, "cellPositionInRow": 2, "plantType": "tomato", "plantCultivar": "Brandywine"}},
    "water": {{"bedId": "someId", "started": "2024-05-15T12:00:00", "volume": 0.5}}
}}"#,
        command::schema_summary()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_mentions_every_action() {
        let prompt = system_prompt();
        for action in command::ACTION_NAMES {
            assert!(prompt.contains(action), "prompt missing `{}`", action);
        }
    }

    #[test]
    fn prompt_spells_out_the_timestamp_format() {
        assert!(system_prompt().contains("ISO 8601"));
    }
}
