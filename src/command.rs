use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// The five action names the backend understands.
pub const ACTION_NAMES: [&str; 5] = ["prepare", "plant", "fertilize", "water", "harvest"];

/// Physical dimensions of a bed in meters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dimensions {
    pub width: f64,
    pub length: f64,
}

/// A validated command targeting one garden bed.
///
/// Exactly one variant per logical command; the action name selects the
/// variant and its required field set. Serializes to the flat camelCase
/// object the backend expects, with optional fields omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum BedCommand {
    Prepare {
        bed_id: String,
        name: String,
        dimensions: Dimensions,
    },
    Plant {
        bed_id: String,
        row_position: u32,
        cell_position_in_row: u32,
        plant_type: String,
        plant_cultivar: String,
    },
    Fertilize {
        bed_id: String,
        started: NaiveDateTime,
        volume: f64,
        fertilizer: String,
    },
    Water {
        bed_id: String,
        started: NaiveDateTime,
        volume: f64,
    },
    Harvest {
        bed_id: String,
        started: NaiveDateTime,
        plant_type: String,
        plant_cultivar: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        quantity: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        weight: Option<f64>,
    },
}

/// Why a raw payload failed schema validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    #[error("action `{action}` is missing required field `{field}`")]
    MissingField { action: String, field: String },
    #[error("action `{action}` field `{field}`: {reason}")]
    TypeMismatch {
        action: String,
        field: String,
        reason: String,
    },
}

impl BedCommand {
    /// Action name this command dispatches under.
    pub fn action(&self) -> &'static str {
        match self {
            BedCommand::Prepare { .. } => "prepare",
            BedCommand::Plant { .. } => "plant",
            BedCommand::Fertilize { .. } => "fertilize",
            BedCommand::Water { .. } => "water",
            BedCommand::Harvest { .. } => "harvest",
        }
    }
}

/// Validate a raw payload against the schema for `action`.
///
/// Coercion is strict: a present field that cannot be read as its declared
/// type is a `TypeMismatch`, an absent required field is a `MissingField`.
/// No side effects and no partial results.
pub fn validate(action: &str, payload: &Value) -> Result<BedCommand, SchemaError> {
    match action {
        "prepare" => Ok(BedCommand::Prepare {
            bed_id: str_field(action, payload, "bedId")?,
            name: str_field(action, payload, "name")?,
            dimensions: dimensions_field(action, payload, "dimensions")?,
        }),
        "plant" => Ok(BedCommand::Plant {
            bed_id: str_field(action, payload, "bedId")?,
            row_position: coord_field(action, payload, "rowPosition")?,
            cell_position_in_row: coord_field(action, payload, "cellPositionInRow")?,
            plant_type: str_field(action, payload, "plantType")?,
            plant_cultivar: str_field(action, payload, "plantCultivar")?,
        }),
        "fertilize" => Ok(BedCommand::Fertilize {
            bed_id: str_field(action, payload, "bedId")?,
            started: timestamp_field(action, payload, "started")?,
            volume: volume_field(action, payload, "volume")?,
            fertilizer: str_field(action, payload, "fertilizer")?,
        }),
        "water" => Ok(BedCommand::Water {
            bed_id: str_field(action, payload, "bedId")?,
            started: timestamp_field(action, payload, "started")?,
            volume: volume_field(action, payload, "volume")?,
        }),
        "harvest" => Ok(BedCommand::Harvest {
            bed_id: str_field(action, payload, "bedId")?,
            started: timestamp_field(action, payload, "started")?,
            plant_type: str_field(action, payload, "plantType")?,
            plant_cultivar: str_field(action, payload, "plantCultivar")?,
            // Quantity and weight are both optional; the backend accepts
            // either, and "at least one" is not enforced here.
            quantity: opt_count_field(action, payload, "quantity")?,
            weight: opt_f64_field(action, payload, "weight")?,
        }),
        other => Err(SchemaError::UnknownAction(other.to_string())),
    }
}

/// Human-readable action/field reference, embedded in the LLM system prompt.
pub fn schema_summary() -> String {
    let mut out = String::new();
    for action in ACTION_NAMES {
        out.push_str(action);
        out.push_str(":\n");
        let fields: &[&str] = match action {
            "prepare" => &[
                "- bedId: string",
                "- name: string",
                "- dimensions: object with width (number) and length (number)",
            ],
            "plant" => &[
                "- bedId: string",
                "- rowPosition: non-negative integer",
                "- cellPositionInRow: non-negative integer",
                "- plantType: string",
                "- plantCultivar: string",
            ],
            "fertilize" => &[
                "- bedId: string",
                "- started: ISO-8601 timestamp",
                "- volume: positive number",
                "- fertilizer: string",
            ],
            "water" => &[
                "- bedId: string",
                "- started: ISO-8601 timestamp",
                "- volume: positive number",
            ],
            "harvest" => &[
                "- bedId: string",
                "- started: ISO-8601 timestamp",
                "- plantType: string",
                "- plantCultivar: string",
                "- quantity: integer (optional)",
                "- weight: number (optional)",
            ],
            _ => unreachable!(),
        };
        for line in fields {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

fn missing(action: &str, field: &str) -> SchemaError {
    SchemaError::MissingField {
        action: action.to_string(),
        field: field.to_string(),
    }
}

fn mismatch(action: &str, field: &str, reason: impl Into<String>) -> SchemaError {
    SchemaError::TypeMismatch {
        action: action.to_string(),
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn str_field(action: &str, payload: &Value, field: &str) -> Result<String, SchemaError> {
    let value = payload.get(field).ok_or_else(|| missing(action, field))?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| mismatch(action, field, "expected a string"))
}

fn coord_field(action: &str, payload: &Value, field: &str) -> Result<u32, SchemaError> {
    let value = payload.get(field).ok_or_else(|| missing(action, field))?;
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| mismatch(action, field, "expected a non-negative integer"))
}

fn volume_field(action: &str, payload: &Value, field: &str) -> Result<f64, SchemaError> {
    let value = payload.get(field).ok_or_else(|| missing(action, field))?;
    let volume = value
        .as_f64()
        .ok_or_else(|| mismatch(action, field, "expected a number"))?;
    if volume > 0.0 {
        Ok(volume)
    } else {
        Err(mismatch(action, field, "expected a positive number"))
    }
}

fn timestamp_field(action: &str, payload: &Value, field: &str) -> Result<NaiveDateTime, SchemaError> {
    let value = payload.get(field).ok_or_else(|| missing(action, field))?;
    let text = value
        .as_str()
        .ok_or_else(|| mismatch(action, field, "expected an ISO-8601 timestamp string"))?;
    text.parse::<NaiveDateTime>()
        .map_err(|e| mismatch(action, field, format!("not a valid ISO-8601 timestamp: {}", e)))
}

fn dimensions_field(action: &str, payload: &Value, field: &str) -> Result<Dimensions, SchemaError> {
    let value = payload.get(field).ok_or_else(|| missing(action, field))?;
    if !value.is_object() {
        return Err(mismatch(action, field, "expected an object with width and length"));
    }
    let width = value
        .get("width")
        .ok_or_else(|| missing(action, "dimensions.width"))?
        .as_f64()
        .ok_or_else(|| mismatch(action, "dimensions.width", "expected a number"))?;
    let length = value
        .get("length")
        .ok_or_else(|| missing(action, "dimensions.length"))?
        .as_f64()
        .ok_or_else(|| mismatch(action, "dimensions.length", "expected a number"))?;
    Ok(Dimensions { width, length })
}

fn opt_count_field(action: &str, payload: &Value, field: &str) -> Result<Option<u32>, SchemaError> {
    match payload.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| mismatch(action, field, "expected a non-negative integer")),
    }
}

fn opt_f64_field(action: &str, payload: &Value, field: &str) -> Result<Option<f64>, SchemaError> {
    match payload.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| mismatch(action, field, "expected a number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payloads() -> Vec<(&'static str, Value)> {
        vec![
            (
                "prepare",
                json!({"bedId": "b1", "name": "North bed", "dimensions": {"width": 1.2, "length": 2.4}}),
            ),
            (
                "plant",
                json!({"bedId": "b1", "rowPosition": 1, "cellPositionInRow": 2, "plantType": "tomato", "plantCultivar": "Brandywine"}),
            ),
            (
                "fertilize",
                json!({"bedId": "b1", "started": "2024-05-15T12:00:00", "volume": 1.5, "fertilizer": "compost tea"}),
            ),
            (
                "water",
                json!({"bedId": "b1", "started": "2024-05-15T12:00:00", "volume": 0.5}),
            ),
            (
                "harvest",
                json!({"bedId": "b1", "started": "2024-05-15T12:00:00", "plantType": "tomato", "plantCultivar": "Brandywine", "quantity": 4, "weight": 1.2}),
            ),
        ]
    }

    #[test]
    fn all_actions_round_trip() {
        for (action, payload) in payloads() {
            let command = validate(action, &payload).unwrap();
            assert_eq!(command.action(), action);
            let body = serde_json::to_value(&command).unwrap();
            assert_eq!(body, payload, "payload changed for `{}`", action);
        }
    }

    #[test]
    fn unknown_action_rejected() {
        let err = validate("compost", &json!({"bedId": "b1"})).unwrap_err();
        assert_eq!(err, SchemaError::UnknownAction("compost".to_string()));
    }

    #[test]
    fn missing_field_names_the_field() {
        let payload = json!({"bedId": "b1", "started": "2024-05-15T12:00:00"});
        let err = validate("water", &payload).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingField {
                action: "water".to_string(),
                field: "volume".to_string(),
            }
        );
    }

    #[test]
    fn non_numeric_volume_is_type_mismatch() {
        let payload = json!({"bedId": "b1", "started": "2024-05-15T12:00:00", "volume": "lots"});
        let err = validate("water", &payload).unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch { ref field, .. } if field == "volume"));
    }

    #[test]
    fn zero_volume_rejected() {
        let payload = json!({"bedId": "b1", "started": "2024-05-15T12:00:00", "volume": 0.0});
        let err = validate("water", &payload).unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch { ref field, .. } if field == "volume"));
    }

    #[test]
    fn negative_coordinate_rejected() {
        let payload = json!({"bedId": "b1", "rowPosition": -1, "cellPositionInRow": 2, "plantType": "tomato", "plantCultivar": "Brandywine"});
        let err = validate("plant", &payload).unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch { ref field, .. } if field == "rowPosition"));
    }

    #[test]
    fn bad_timestamp_rejected() {
        let payload = json!({"bedId": "b1", "started": "yesterday", "volume": 0.5});
        let err = validate("water", &payload).unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch { ref field, .. } if field == "started"));
    }

    #[test]
    fn harvest_optionals_omitted_from_body() {
        let payload = json!({"bedId": "b1", "started": "2024-05-15T12:00:00", "plantType": "tomato", "plantCultivar": "Brandywine"});
        let command = validate("harvest", &payload).unwrap();
        let body = serde_json::to_value(&command).unwrap();
        assert_eq!(body, payload);
        assert!(body.get("quantity").is_none());
        assert!(body.get("weight").is_none());
    }

    #[test]
    fn schema_summary_covers_every_action() {
        let summary = schema_summary();
        for action in ACTION_NAMES {
            assert!(summary.contains(action), "summary missing `{}`", action);
        }
        assert!(summary.contains("cellPositionInRow"));
    }
}
