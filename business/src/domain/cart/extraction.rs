use serde_json::Value;

use super::errors::{AnalysisError, EntryRejection};
use super::model::RecognizedProduct;

const DEFAULT_QUANTITY: u32 = 1;

/// A product entry that did not survive validation.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedEntry {
    pub index: usize,
    pub reason: EntryRejection,
}

/// Products extracted from a model reply, plus the entries that were dropped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedReply {
    pub products: Vec<RecognizedProduct>,
    pub rejected: Vec<RejectedEntry>,
}

/// Parses the free-text reply of the vision model into validated products.
///
/// The reply may wrap the JSON object in prose or code fences. Entries that
/// fail validation are collected in [`ParsedReply::rejected`] instead of
/// failing the whole reply.
pub fn parse_reply(text: &str) -> Result<ParsedReply, AnalysisError> {
    let parsed = locate_json_object(text).ok_or(AnalysisError::MalformedResponse)?;

    let entries = match parsed.get("products") {
        None | Some(Value::Null) => return Ok(ParsedReply::default()),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(AnalysisError::MalformedResponse),
    };

    let mut reply = ParsedReply::default();
    let mut subtotal: u64 = 0;

    for (index, entry) in entries.iter().enumerate() {
        let product = match parse_entry(entry) {
            Ok(product) => product,
            Err(reason) => {
                reply.rejected.push(RejectedEntry { index, reason });
                continue;
            }
        };

        match subtotal.checked_add(product.line_total()) {
            Some(next) => {
                subtotal = next;
                reply.products.push(product);
            }
            None => reply.rejected.push(RejectedEntry {
                index,
                reason: EntryRejection::InvalidPrice,
            }),
        }
    }

    Ok(reply)
}

/// Finds the JSON object embedded in `text`.
///
/// Takes the greedy span from the first `{` to the last `}` first. When that
/// does not decode (for example two separate objects), falls back to the
/// first balanced `{...}` span that does.
fn locate_json_object(text: &str) -> Option<Value> {
    let greedy = regex::Regex::new(r"\{[\s\S]*\}")
        .ok()
        .and_then(|re| re.find(text));

    if let Some(m) = greedy
        && let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(m.as_str())
    {
        return Some(value);
    }

    text.match_indices('{').find_map(|(start, _)| {
        let end = balanced_end(text.as_bytes(), start)?;
        match serde_json::from_str::<Value>(&text[start..=end]) {
            Ok(value @ Value::Object(_)) => Some(value),
            _ => None,
        }
    })
}

/// Index of the `}` closing the `{` at `start`, ignoring braces inside strings.
fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}

fn parse_entry(entry: &Value) -> Result<RecognizedProduct, EntryRejection> {
    let fields = entry.as_object().ok_or(EntryRejection::NotAnObject)?;

    let name = fields
        .get("name")
        .and_then(|n| n.as_str())
        .ok_or(EntryRejection::MissingName)?;

    let unit_price = fields
        .get("price")
        .and_then(whole_rupees)
        .ok_or(EntryRejection::InvalidPrice)?;

    let quantity = match fields.get("quantity") {
        None | Some(Value::Null) => DEFAULT_QUANTITY,
        Some(q) => positive_count(q).ok_or(EntryRejection::InvalidQuantity)?,
    };

    let confidence = fields
        .get("confidence")
        .and_then(|c| c.as_f64())
        .ok_or(EntryRejection::InvalidConfidence)?;

    RecognizedProduct::new(name, unit_price, quantity, confidence)
}

/// Non-negative JSON number rounded to the nearest whole rupee.
fn whole_rupees(value: &Value) -> Option<u64> {
    if let Some(price) = value.as_u64() {
        return Some(price);
    }

    let price = value.as_f64()?;
    if !price.is_finite() || price < 0.0 {
        return None;
    }

    let rounded = price.round();
    if rounded >= u64::MAX as f64 {
        return None;
    }
    Some(rounded as u64)
}

/// Integral JSON number of at least one.
fn positive_count(value: &Value) -> Option<u32> {
    let count = match value.as_u64() {
        Some(count) => count,
        None => {
            let count = value.as_f64()?;
            if count.fract() != 0.0 || count < 1.0 || count > f64::from(u32::MAX) {
                return None;
            }
            count as u64
        }
    };

    u32::try_from(count).ok().filter(|c| *c >= 1)
}
