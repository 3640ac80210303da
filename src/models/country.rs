//! Country code to dataset name lookup used by the HTTP layer.

use hashbrown::HashMap;

/// Name used when a code is not in the table.
pub const DEFAULT_COUNTRY_NAME: &str = "United States of America";

const BUILTIN: &[(&str, &str)] = &[
    ("US", "United States of America"),
    ("FR", "France"),
    ("CA", "Canada"),
    ("UK", "United Kingdom"),
    ("AU", "Australia"),
];

/// Codes that are rewritten before lookup
const ALIASES: &[(&str, &str)] = &[("GB", "UK")];

/// Case-insensitive table from ISO-like country codes to the names used by
/// the boundary dataset. Unknown codes resolve to a fixed default.
#[derive(Debug, Clone)]
pub struct CountryTable {
    names: HashMap<String, String>,
    default_name: String,
}

impl Default for CountryTable {
    fn default() -> Self {
        Self {
            names: BUILTIN
                .iter()
                .map(|(code, name)| (code.to_string(), name.to_string()))
                .collect(),
            default_name: DEFAULT_COUNTRY_NAME.to_string(),
        }
    }
}

impl CountryTable {
    /// Built-in table extended (or overridden) by `extra` entries.
    pub fn with_overrides<I, K, V>(extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut table = Self::default();
        for (code, name) in extra {
            table
                .names
                .insert(code.as_ref().to_ascii_uppercase(), name.into());
        }
        table
    }

    /// Map a code to a dataset name, falling back to the default country.
    pub fn resolve(&self, code: &str) -> &str {
        self.lookup(code).unwrap_or(self.default_name.as_str())
    }

    /// Map a code to a dataset name without fallback
    pub fn lookup(&self, code: &str) -> Option<&str> {
        let code = code.trim().to_ascii_uppercase();
        let code = ALIASES
            .iter()
            .find(|(alias, _)| *alias == code)
            .map(|(_, target)| target.to_string())
            .unwrap_or(code);

        self.names.get(&code).map(String::as_str)
    }

    /// Iterate over (code, name) entries, unordered
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(c, n)| (c.as_str(), n.as_str()))
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_codes_case_insensitive() {
        let table = CountryTable::default();
        assert_eq!(table.resolve("FR"), "France");
        assert_eq!(table.resolve("ca"), "Canada");
        assert_eq!(table.resolve(" au "), "Australia");
    }

    #[test]
    fn test_gb_alias() {
        let table = CountryTable::default();
        assert_eq!(table.resolve("GB"), "United Kingdom");
        assert_eq!(table.resolve("gb"), table.resolve("UK"));
    }

    #[test]
    fn test_unknown_code_falls_back() {
        let table = CountryTable::default();
        assert_eq!(table.lookup("ZZ"), None);
        assert_eq!(table.resolve("ZZ"), DEFAULT_COUNTRY_NAME);
        assert_eq!(table.resolve(""), DEFAULT_COUNTRY_NAME);
    }

    #[test]
    fn test_overrides() {
        let table = CountryTable::with_overrides([("de", "Germany"), ("FR", "French Republic")]);
        assert_eq!(table.resolve("DE"), "Germany");
        assert_eq!(table.resolve("FR"), "French Republic");
        assert_eq!(table.len(), 6);
    }
}
