use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};


/// The states a lookup covers, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum State {
    Massachusetts,
    Maine,
    #[serde(rename = "Rhode Island")]
    RhodeIsland,
    Vermont,
}

impl State {
    pub const ALL: [State; 4] = [State::Massachusetts, State::Maine, State::RhodeIsland, State::Vermont];

    pub fn name(self) -> &'static str {
        match self {
            State::Massachusetts => "Massachusetts",
            State::Maine => "Maine",
            State::RhodeIsland => "Rhode Island",
            State::Vermont => "Vermont",
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            State::Massachusetts => "MA",
            State::Maine => "ME",
            State::RhodeIsland => "RI",
            State::Vermont => "VT",
        }
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}


/// Body of a lookup submission. Nothing is required; whatever is missing
/// or unusable becomes a placeholder in the prompt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpportunityRequest {
    pub service_areas: Vec<String>,
    pub bbb_topics: Vec<String>,
    pub timeframe: Option<String>,
}

impl OpportunityRequest {
    /// Reads a request body field by field. A field of the wrong type is
    /// dropped on its own; the rest of the request is kept.
    pub fn from_body(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::default();
        }

        let fields = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => {
                tracing::warn!("request body is not a JSON object, continuing with an empty request");
                return Self::default();
            }
            Err(e) => {
                tracing::warn!(error = %e, "unreadable request body, continuing with an empty request");
                return Self::default();
            }
        };

        let timeframe = match fields.get("timeframe") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                tracing::warn!(field = "timeframe", "ignoring request field of the wrong type");
                None
            }
        };

        Self {
            service_areas: string_list(&fields, "serviceAreas"),
            bbb_topics: string_list(&fields, "bbbTopics"),
            timeframe,
        }
    }
}

fn string_list(fields: &Map<String, Value>, key: &'static str) -> Vec<String> {
    match fields.get(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(_) => {
            tracing::warn!(field = key, "ignoring request field of the wrong type");
            Vec::new()
        }
    }
}


/// One bundled event. Generated events are never forced into this shape.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub date: String,
    pub location: String,
    pub cost: String,
    pub name: String,
    pub audience_type: String,
    pub contact_info: String,
    pub link: String,
    #[serde(rename = "whyBBBShouldBeThere")]
    pub why_bbb_should_be_there: String,
}


/// Bundled events keyed by state, serialized in `State::ALL` order.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Opportunities {
    #[serde(rename = "Massachusetts")]
    pub massachusetts: Vec<Event>,
    #[serde(rename = "Maine")]
    pub maine: Vec<Event>,
    #[serde(rename = "Rhode Island")]
    pub rhode_island: Vec<Event>,
    #[serde(rename = "Vermont")]
    pub vermont: Vec<Event>,
}

impl Opportunities {
    pub fn events(&self, state: State) -> &[Event] {
        match state {
            State::Massachusetts => &self.massachusetts,
            State::Maine => &self.maine,
            State::RhodeIsland => &self.rhode_island,
            State::Vermont => &self.vermont,
        }
    }

    pub fn events_mut(&mut self, state: State) -> &mut Vec<Event> {
        match state {
            State::Massachusetts => &mut self.massachusetts,
            State::Maine => &mut self.maine,
            State::RhodeIsland => &mut self.rhode_island,
            State::Vermont => &mut self.vermont,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (State, &[Event])> + '_ {
        State::ALL.into_iter().map(move |s| (s, self.events(s)))
    }

    /// Event counts in `State::ALL` order.
    pub fn counts(&self) -> [usize; 4] {
        State::ALL.map(|s| self.events(s).len())
    }

    pub fn total(&self) -> usize {
        self.counts().iter().sum()
    }
}
