use super::types::{BagType, ClassificationVerdict};
use crate::error::ClassifierError;
use serde::Deserialize;
use serde_json::Value;

/// Locate the JSON object inside a model answer.
///
/// Models are instructed, not guaranteed, to answer with bare JSON. This
/// accepts a ```json fence, a bare ``` fence, or the outermost `{ … }` span.
pub fn extract_json(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let rest = &text[start + "```json".len()..];
        if let Some(end) = rest.find("```") {
            let candidate = rest[..end].trim();
            if !candidate.is_empty() {
                return Some(candidate);
            }
        }
    }

    if let Some(start) = text.find("```") {
        let rest = &text[start + "```".len()..];
        if let Some(end) = rest.find("```") {
            let candidate = rest[..end].trim();
            if candidate.starts_with('{') {
                return Some(candidate);
            }
        }
    }

    let open = text.find('{')?;
    let close = text.rfind('}')?;
    (close > open).then(|| &text[open..=close])
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVerdict {
    bag_type: Option<String>,
    receipt_detected: Option<bool>,
    receipt_valid: Option<bool>,
    #[serde(default)]
    confidence_score: Option<Value>,
    #[serde(default)]
    explanation: Option<String>,
    /// Older prompt revisions asked for this key instead of `explanation`.
    #[serde(default)]
    detailed_analysis: Option<String>,
}

fn confidence_from_value(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').parse::<f64>().map_or(0.0, |v| {
            if s.trim().ends_with('%') { v / 100.0 } else { v }
        }),
        _ => 0.0,
    }
}

/// Parse a model answer into a verdict, or fail without partial data.
pub fn parse_verdict(text: &str) -> Result<ClassificationVerdict, ClassifierError> {
    let json = extract_json(text).ok_or(ClassifierError::NoJson)?;
    let raw: RawVerdict =
        serde_json::from_str(json).map_err(|e| ClassifierError::Malformed(e.to_string()))?;

    let bag_type = raw
        .bag_type
        .as_deref()
        .map(BagType::from_label)
        .ok_or(ClassifierError::MissingField("bagType"))?;
    let receipt_detected = raw
        .receipt_detected
        .ok_or(ClassifierError::MissingField("receiptDetected"))?;
    let receipt_valid = raw
        .receipt_valid
        .ok_or(ClassifierError::MissingField("receiptValid"))?;

    let explanation = raw
        .explanation
        .or(raw.detailed_analysis)
        .unwrap_or_default();

    Ok(ClassificationVerdict::new(
        bag_type,
        receipt_detected,
        receipt_valid,
        confidence_from_value(raw.confidence_score.as_ref()),
        explanation,
    ))
}
