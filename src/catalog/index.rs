use std::collections::{BTreeMap, HashMap};

/// Name-keyed cache contents with case-insensitive lookup.
///
/// Names keep the spelling DSDA uses; the folded index maps lowercase
/// spellings back to it. A later entry whose name folds to the same
/// lowercase spelling takes over the folded slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameIndex<V> {
    entries: BTreeMap<String, V>,
    folded: HashMap<String, String>,
}

impl<V> Default for NameIndex<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            folded: HashMap::new(),
        }
    }
}

impl<V> NameIndex<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: V) {
        let name = name.into();
        self.folded.insert(name.to_lowercase(), name.clone());
        self.entries.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries.get(name)
    }

    /// Canonical spelling of `query`: exact match first, then case-insensitive
    pub fn canonical(&self, query: &str) -> Option<&str> {
        if let Some((name, _)) = self.entries.get_key_value(query) {
            return Some(name.as_str());
        }
        self.folded.get(&query.to_lowercase()).map(String::as_str)
    }

    /// Names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Name of the first entry holding `value`
    pub fn name_of(&self, value: &V) -> Option<&str>
    where
        V: PartialEq,
    {
        self.iter().find(|(_, v)| *v == value).map(|(name, _)| name)
    }

    pub fn contains_folded(&self, name: &str) -> bool {
        self.folded.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> FromIterator<(String, V)> for NameIndex<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (name, value) in iter {
            index.insert(name, value);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> NameIndex<String> {
        [
            ("Cybermind", "http://doomedsda.us/player1lmps.html"),
            ("Ancalagon", "http://doomedsda.us/player2lmps.html"),
        ]
        .into_iter()
        .map(|(n, u)| (n.to_string(), u.to_string()))
        .collect()
    }

    #[test]
    fn test_canonical_prefers_exact_spelling() {
        let mut index = index();
        index.insert("cybermind", "http://doomedsda.us/player9lmps.html".to_string());
        assert_eq!(index.canonical("Cybermind"), Some("Cybermind"));
        assert_eq!(index.canonical("cybermind"), Some("cybermind"));
        assert_eq!(index.canonical("CYBERMIND"), Some("cybermind"));
    }

    #[test]
    fn test_canonical_case_insensitive() {
        let index = index();
        assert_eq!(index.canonical("ancalagon"), Some("Ancalagon"));
        assert_eq!(index.canonical("Ancal"), None);
        assert!(index.contains_folded("ANCALAGON"));
    }

    #[test]
    fn test_name_of_value() {
        let index = index();
        let url = "http://doomedsda.us/player2lmps.html".to_string();
        assert_eq!(index.name_of(&url), Some("Ancalagon"));
        assert_eq!(index.name_of(&"nope".to_string()), None);
    }

    #[test]
    fn test_names_sorted() {
        let index = index();
        let names: Vec<&str> = index.names().collect();
        assert_eq!(names, vec!["Ancalagon", "Cybermind"]);
    }
}
