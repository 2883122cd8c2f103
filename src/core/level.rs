use std::sync::OnceLock;

use regex::Regex;

use crate::core::category::sanitize_token;

fn short_map_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:[0-9][0-9]?s?|s[0-9])$").expect("valid level regex"))
}

/// Normalize a level query the way DSDA labels levels.
///
/// `1`, `01` and `07s` become `map01`, `map01` and `map07s`; episode style
/// labels such as `e1m1` or `d2all` only lose punctuation and case.
pub fn sanitize_level(raw: &str) -> String {
    let level = sanitize_token(raw);
    if short_map_regex().is_match(&level) {
        format!("map{level:0>2}")
    } else {
        level
    }
}

/// Label of the navigation cell linking to a level's page: secret exits
/// share the page of their base level.
pub fn page_label(level: &str) -> &str {
    level.trim_end_matches('s')
}
