//! Key/value reply records

/// One record of a server reply
///
/// Keys keep the order and case the server sent, and may repeat (an `idle`
/// reply lists one `changed` key per subsystem).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs {
    pairs: Vec<(String, String)>,
}

impl Attrs {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a key/value pair
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Builder form of `insert`
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// First value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value stored under `key`, in reply order
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Attrs {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_first_match() {
        let attrs = Attrs::new().with("changed", "player").with("changed", "mixer");
        assert_eq!(attrs.get("changed"), Some("player"));
        assert_eq!(attrs.get("missing"), None);
    }

    #[test]
    fn test_get_all_keeps_order() {
        let attrs: Attrs = [("changed", "player"), ("volume", "5"), ("changed", "mixer")]
            .into_iter()
            .collect();
        let changed: Vec<_> = attrs.get_all("changed").collect();
        assert_eq!(changed, vec!["player", "mixer"]);
        assert_eq!(attrs.len(), 3);
    }

    #[test]
    fn test_iteration_preserves_case() {
        let attrs = Attrs::new().with("Artist", "Nina Simone");
        let pairs: Vec<_> = (&attrs).into_iter().collect();
        assert_eq!(pairs, vec![("Artist", "Nina Simone")]);
    }
}
