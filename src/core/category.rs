//! Category vocabulary.
//!
//! Users type loose category tokens (`uvmax`, `UV-Speed`, `nomo`); DSDA prints
//! exact labels (`UV Max`, `UV Speed`, `NoMo`). Some queries accept runs from
//! stricter categories as well: a Pacifist or UV Max run also satisfies UV
//! Speed, so those queries map to several DSDA labels, the first being the
//! category actually asked for.

/// Query token to the DSDA categories that satisfy it
const CATEGORY_QUERIES: &[(&str, &[&str])] = &[
    ("uvmax", &["UV Max"]),
    ("max", &["UV Max"]),
    ("uvspeed", &["UV Speed", "Pacifist", "UV Max"]),
    ("nmspeed", &["NM Speed", "NM 100"]),
    ("nm100", &["NM 100"]),
    ("nm100s", &["NM 100"]),
    ("uvfast", &["UV -Fast"]),
    ("fast", &["UV -Fast"]),
    ("uvrespawn", &["Respawn"]),
    ("respawn", &["Respawn"]),
    ("uvpacifist", &["Pacifist"]),
    ("pacifist", &["Pacifist"]),
    ("uvtyson", &["Tyson"]),
    ("tyson", &["Tyson"]),
    ("nomo", &["NoMo", "NoMo 100"]),
    ("uvnomo", &["NoMo", "NoMo 100"]),
    ("nomonsters", &["NoMo", "NoMo 100"]),
    ("uvnomonsters", &["NoMo", "NoMo 100"]),
    ("nomo100", &["NoMo 100"]),
    ("uvnomo100", &["NoMo 100"]),
    ("nomonsters100", &["NoMo 100"]),
    ("uvnomonsters100", &["NoMo 100"]),
];

/// DSDA label to the name shown when a record comes from a substitute category
const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("UV Max", "UV-Max"),
    ("UV Speed", "UV-Speed"),
    ("NM Speed", "NM-Speed"),
    ("NM 100", "NM100"),
    ("Pacifist", "UV Pacifist"),
    ("Tyson", "UV Tyson"),
    ("UV -Fast", "UV -fast"),
    ("Respawn", "UV -respawn"),
    ("NoMo", "Nomo"),
    ("NoMo 100", "Nomo100"),
];

/// Categories a record query accepts, primary category first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySet {
    labels: &'static [&'static str],
}

impl CategorySet {
    /// Look up a user-supplied category token
    pub fn lookup(query: &str) -> Option<Self> {
        let token = sanitize_token(query);
        CATEGORY_QUERIES
            .iter()
            .find(|(key, _)| *key == token)
            .map(|(_, labels)| Self { labels })
    }

    pub fn primary(&self) -> &'static str {
        self.labels[0]
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(&label)
    }

    pub fn labels(&self) -> &'static [&'static str] {
        self.labels
    }
}

/// Display name for a DSDA category label
pub fn display_name(label: &str) -> &str {
    DISPLAY_NAMES
        .iter()
        .find(|(dsda, _)| *dsda == label)
        .map_or(label, |(_, fixed)| fixed)
}

/// Lowercase and drop everything but `[a-z0-9]`
pub fn sanitize_token(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_sanitizes_query() {
        let set = CategorySet::lookup("UV-Max").unwrap();
        assert_eq!(set.labels(), &["UV Max"]);
        assert_eq!(CategorySet::lookup("uv max"), Some(set));
    }

    #[test]
    fn test_uvspeed_accepts_stricter_categories() {
        let set = CategorySet::lookup("uvspeed").unwrap();
        assert_eq!(set.primary(), "UV Speed");
        assert!(set.contains("Pacifist"));
        assert!(set.contains("UV Max"));
        assert!(!set.contains("NM Speed"));
    }

    #[test]
    fn test_unknown_category() {
        assert!(CategorySet::lookup("fastest").is_none());
        assert!(CategorySet::lookup("").is_none());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("Pacifist"), "UV Pacifist");
        assert_eq!(display_name("NoMo 100"), "Nomo100");
        assert_eq!(display_name("Other"), "Other");
    }
}
