use chrono::NaiveDate;

use crate::interpret::CompletenessPolicy;
use crate::model::{OpportunityRequest, State};


const DEFAULT_TOPICS: [&str; 4] = [
    "small business growth",
    "consumer protection",
    "scam prevention",
    "workforce and community events",
];

const DEFAULT_TIMEFRAME: &str = "the next 3 months";

const EVENT_CATEGORIES: &str = "business expos, chamber of commerce events, networking mixers, \
small business workshops, community fairs, senior and consumer safety events, and trade shows";


fn join_or<'a>(items: &'a [String], default: &'a str) -> std::borrow::Cow<'a, str> {
    let items: Vec<&str> = items.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect();
    if items.is_empty() {
        default.into()
    } else {
        items.join(", ").into()
    }
}

fn state_list() -> String {
    State::ALL.iter().map(|s| s.name()).collect::<Vec<_>>().join(", ")
}

/// Builds the single user prompt sent to the generation service.
pub fn build(request: &OpportunityRequest, today: NaiveDate, policy: &CompletenessPolicy) -> String {
    let states = state_list();
    let areas = join_or(&request.service_areas, &states);
    let default_topics = DEFAULT_TOPICS.join(", ");
    let topics = join_or(&request.bbb_topics, &default_topics);
    let timeframe = request
        .timeframe
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TIMEFRAME);

    let per_state = policy.per_state_target();
    let total = policy.min_total_events.max(per_state * State::ALL.len());

    let shape = State::ALL
        .iter()
        .map(|s| format!("  \"{}\": [ {{ ...event... }} ]", s.name()))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "Today is {today}. You are researching outreach opportunities for the Better Business Bureau (BBB).\n\
\n\
Find upcoming in-person events within {timeframe} in these service areas: {areas}.\n\
Group every event under the state it takes place in. The only states are: {states}.\n\
Focus on these topics: {topics}.\n\
Look for {EVENT_CATEGORIES}.\n\
\n\
Return at least {per_state} events for each state and at least {total} events in total.\n\
Every state must have at least one event.\n\
\n\
Each event is an object with exactly these string fields:\n\
  \"date\", \"location\" (city followed by the state's two-letter abbreviation), \"cost\", \"name\",\n\
  \"audienceType\", \"contactInfo\", \"link\", \"whyBBBShouldBeThere\".\n\
\n\
Reply with a single JSON object and nothing else, no Markdown code fences, in this shape:\n\
{{\n{shape}\n}}\n",
        today = today.format("%B %-d, %Y"),
    )
}
