//! Turning completion text into a payload: fence stripping, parsing, the
//! top-level shape check and the completeness policy.
//!
//! Records inside the state arrays are never inspected, so whatever the
//! service put in them comes back out as-is.

use serde_json::{Map, Value};

use crate::error::Rejection;
use crate::model::State;


/// A completion that parsed as a JSON object, in the key order it arrived in.
pub type GeneratedPayload = Map<String, Value>;


/// Minimum shape a generated payload must have before it is returned instead
/// of the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletenessPolicy {
    pub min_total_events: usize,
    pub require_every_state: bool,
}

impl Default for CompletenessPolicy {
    fn default() -> Self {
        Self {
            min_total_events: 20,
            require_every_state: true,
        }
    }
}

impl CompletenessPolicy {
    /// Accepts anything that parses.
    pub fn disabled() -> Self {
        Self {
            min_total_events: 0,
            require_every_state: false,
        }
    }

    /// `counts` is indexed like `State::ALL`.
    pub fn check(&self, counts: [usize; 4]) -> Result<(), Rejection> {
        let total = counts.iter().sum();
        let empty_states: Vec<State> = if self.require_every_state {
            State::ALL
                .into_iter()
                .zip(counts)
                .filter(|(_, count)| *count == 0)
                .map(|(state, _)| state)
                .collect()
        } else {
            Vec::new()
        };

        if !empty_states.is_empty() || total < self.min_total_events {
            return Err(Rejection::InsufficientResults {
                total,
                min_total: self.min_total_events,
                empty_states,
            });
        }

        Ok(())
    }

    /// Events to ask for per state so that the total clears the threshold.
    pub fn per_state_target(&self) -> usize {
        self.min_total_events.div_ceil(4).max(1)
    }
}


/// Removes one Markdown code fence wrapped around the payload, if there is
/// one. Unfenced text comes back trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```") {
        // info string, e.g. ```json
        body = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    }
    if let Some(rest) = body.trim_end().strip_suffix("```") {
        body = rest;
    }

    body.trim()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parses a completion. Anything but a JSON object is malformed.
pub fn parse(text: &str) -> Result<GeneratedPayload, Rejection> {
    match serde_json::from_str(strip_code_fences(text)) {
        Ok(Value::Object(payload)) => Ok(payload),
        Ok(other) => Err(Rejection::MalformedResponse(format!(
            "expected a JSON object, got {}",
            kind(&other)
        ))),
        Err(e) => Err(Rejection::MalformedResponse(e.to_string())),
    }
}

/// Gives every state key an array, defaulting missing or `null` ones to
/// `[]`, and returns the array lengths in `State::ALL` order. Other keys and
/// the contents of the arrays are left alone.
pub fn state_counts(payload: &mut GeneratedPayload) -> Result<[usize; 4], Rejection> {
    let mut counts = [0; 4];

    for (state, count) in State::ALL.into_iter().zip(counts.iter_mut()) {
        let entry = payload
            .entry(state.name())
            .or_insert_with(|| Value::Array(Vec::new()));
        if entry.is_null() {
            *entry = Value::Array(Vec::new());
        }

        match entry {
            Value::Array(events) => *count = events.len(),
            other => {
                return Err(Rejection::MalformedResponse(format!(
                    "\"{}\" is {}, not an array",
                    state,
                    kind(other)
                )))
            }
        }
    }

    Ok(counts)
}

/// Parses and validates a completion. `Ok` holds the parsed object with its
/// records untouched; only absent state keys have been filled in with `[]`.
pub fn interpret(text: &str, policy: &CompletenessPolicy) -> Result<GeneratedPayload, Rejection> {
    let mut payload = parse(text)?;
    let counts = state_counts(&mut payload)?;
    policy.check(counts)?;
    Ok(payload)
}
