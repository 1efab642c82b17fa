use std::collections::HashSet;

use crate::types::Severity;

/// Static mapping from normalized crime-category strings to a severity tag.
/// Red is checked before yellow; unknown categories default to yellow —
/// unclassified types are treated as lower severity, not as an error.
#[derive(Debug, Clone)]
pub struct SeverityTable {
    red: HashSet<String>,
    yellow: HashSet<String>,
}

impl Default for SeverityTable {
    fn default() -> Self {
        let red = ["murder", "rape", "robbery", "violent assault"];
        let yellow = ["theft", "drug", "nuisance"];
        Self {
            red: red.iter().map(|s| s.to_string()).collect(),
            yellow: yellow.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SeverityTable {
    /// Build the default table extended with extra categories from config.
    pub fn with_extra(extra_red: &[String], extra_yellow: &[String]) -> Self {
        let mut table = Self::default();
        for t in extra_red {
            table.red.insert(normalize(t));
        }
        for t in extra_yellow {
            table.yellow.insert(normalize(t));
        }
        table
    }

    /// Classify a free-text category. Total: never fails, no side effects.
    /// Unclassified types are treated as lower severity, not as an error.
    pub fn classify(&self, crime_type: &str) -> Severity {
        self.lookup(&normalize(crime_type)).unwrap_or(Severity::Yellow)
    }

    /// Exact-match lookup; red wins over yellow.
    fn lookup(&self, key: &str) -> Option<Severity> {
        if self.red.contains(key) {
            Some(Severity::Red)
        } else if self.yellow.contains(key) {
            Some(Severity::Yellow)
        } else {
            None
        }
    }
}

fn normalize(crime_type: &str) -> String {
    crime_type.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercase_murder_is_red() {
        let table = SeverityTable::default();
        assert_eq!(table.classify("MURDER"), Severity::Red);
    }

    #[test]
    fn theft_is_yellow() {
        let table = SeverityTable::default();
        assert_eq!(table.classify("Theft"), Severity::Yellow);
    }

    #[test]
    fn unknown_category_defaults_to_yellow() {
        let table = SeverityTable::default();
        assert_eq!(table.classify("jaywalking"), Severity::Yellow);
    }

    #[test]
    fn multi_word_category_is_red() {
        let table = SeverityTable::default();
        assert_eq!(table.classify("Violent Assault"), Severity::Red);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let table = SeverityTable::default();
        assert_eq!(table.classify("  robbery "), Severity::Red);
    }

    #[test]
    fn config_extension_classifies_red() {
        let table = SeverityTable::with_extra(&["Arson".to_string()], &[]);
        assert_eq!(table.classify("arson"), Severity::Red);
        // Defaults still apply
        assert_eq!(table.classify("murder"), Severity::Red);
        assert_eq!(table.classify("theft"), Severity::Yellow);
    }
}
