use std::sync::LazyLock;

use crate::model::Opportunities;


static FALLBACK_JSON: &str = include_str!("../assets/fallback.json");

pub static FALLBACK: LazyLock<Opportunities> = LazyLock::new(|| {
    serde_json::from_str(FALLBACK_JSON).expect("bundled fallback.json is not a valid payload")
});

/// The payload returned whenever a completion can't be used.
pub fn fallback() -> &'static Opportunities {
    &FALLBACK
}
