//! Column-to-rule mapping for one validation run.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, SheetError};

use super::report::{Classifier, classify_by_prefix};
use super::rules::{BuiltinRule, Rule};

/// Maps column indices to rules.
///
/// Columns are always visited in ascending index order. Columns without a
/// rule are never read.
#[derive(Clone)]
pub struct ValidatorConfig {
    rules: BTreeMap<usize, Arc<dyn Rule>>,
    names: BTreeMap<usize, String>,
    classifier: Classifier,
}

impl ValidatorConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self {
            rules: BTreeMap::new(),
            names: BTreeMap::new(),
            classifier: classify_by_prefix,
        }
    }

    /// Attach a rule to a column, replacing any previous rule there.
    pub fn column(mut self, index: usize, rule: impl Rule + 'static) -> Self {
        self.rules.insert(index, Arc::new(rule));
        self
    }

    /// Attach a rule already shared with other configurations.
    pub fn shared_column(mut self, index: usize, rule: Arc<dyn Rule>) -> Self {
        self.rules.insert(index, rule);
        self
    }

    /// Attach a rule and a display name to a column.
    pub fn named_column(
        self,
        index: usize,
        name: impl Into<String>,
        rule: impl Rule + 'static,
    ) -> Self {
        self.column(index, rule).with_column_name(index, name)
    }

    /// Set the display name reported on errors for a column.
    pub fn with_column_name(mut self, index: usize, name: impl Into<String>) -> Self {
        self.names.insert(index, name.into());
        self
    }

    /// Replace the function used to group error messages into types.
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Build a configuration from `(column, rule name)` pairs.
    pub fn from_names<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, S)>,
        S: AsRef<str>,
    {
        let mut config = Self::new();
        for (index, name) in pairs {
            let rule: BuiltinRule = name.as_ref().parse()?;
            config = config.column(index, rule);
        }
        Ok(config)
    }

    /// Parse a `<column>=<rule>` spec such as `"0=aadhaar"`.
    pub fn parse_column_spec(spec: &str) -> Result<(usize, BuiltinRule)> {
        let (index, name) = parse_assignment(spec)?;
        Ok((index, name.parse()?))
    }

    /// Parse a `<column>=<name>` spec such as `"1=Phone"`.
    pub fn parse_name_spec(spec: &str) -> Result<(usize, String)> {
        let (index, name) = parse_assignment(spec)?;
        Ok((index, name.to_string()))
    }

    /// Configured columns and their rules, in ascending index order.
    pub fn rules(&self) -> impl Iterator<Item = (usize, &dyn Rule)> {
        self.rules.iter().map(|(index, rule)| (*index, rule.as_ref()))
    }

    /// Display name for a column, if one was set.
    pub fn column_name(&self, index: usize) -> Option<&str> {
        self.names.get(&index).map(String::as_str)
    }

    /// The error-type classifier.
    pub fn classifier(&self) -> Classifier {
        self.classifier
    }

    /// Number of configured columns.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no column has a rule.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ValidatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorConfig")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|(index, rule)| (*index, rule.name()))
                    .collect::<BTreeMap<_, _>>(),
            )
            .field("names", &self.names)
            .finish()
    }
}

fn parse_assignment(spec: &str) -> Result<(usize, &str)> {
    let invalid = || SheetError::InvalidColumnSpec(format!("'{}' (expected <column>=<value>)", spec));

    let (index, value) = spec.split_once('=').ok_or_else(invalid)?;
    let index = index.trim().parse::<usize>().map_err(|_| invalid())?;
    let value = value.trim();
    if value.is_empty() {
        return Err(invalid());
    }

    Ok((index, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Cell;
    use crate::validation::rules::{RuleFault, Verdict, rule_fn};

    #[test]
    fn test_rules_iterate_in_ascending_order() {
        let config = ValidatorConfig::new()
            .column(3, BuiltinRule::Email)
            .column(0, BuiltinRule::Aadhaar)
            .column(1, BuiltinRule::Phone);

        let order: Vec<(usize, &str)> = config.rules().map(|(i, r)| (i, r.name())).collect();
        assert_eq!(order, vec![(0, "aadhaar"), (1, "phone"), (3, "email")]);
    }

    #[test]
    fn test_column_replaces_previous_rule() {
        let config = ValidatorConfig::new()
            .column(0, BuiltinRule::Email)
            .column(0, BuiltinRule::Required);

        assert_eq!(config.len(), 1);
        assert_eq!(config.rules().next().map(|(_, r)| r.name()), Some("required"));
    }

    #[test]
    fn test_from_names() {
        let config = ValidatorConfig::from_names([(0, "aadhaar"), (2, "pinCode")]).unwrap();
        assert_eq!(config.len(), 2);

        let err = ValidatorConfig::from_names([(0, "aadhaar"), (1, "ssn")]).unwrap_err();
        assert!(matches!(err, SheetError::UnknownRule(name) if name == "ssn"));
    }

    #[test]
    fn test_parse_column_spec() {
        assert_eq!(
            ValidatorConfig::parse_column_spec("0=aadhaar").unwrap(),
            (0, BuiltinRule::Aadhaar)
        );
        assert_eq!(
            ValidatorConfig::parse_column_spec(" 4 = pinCode ").unwrap(),
            (4, BuiltinRule::PinCode)
        );
        for bad in ["aadhaar", "x=phone", "-1=phone", "2="] {
            assert!(matches!(
                ValidatorConfig::parse_column_spec(bad),
                Err(SheetError::InvalidColumnSpec(_))
            ));
        }
        assert!(matches!(
            ValidatorConfig::parse_column_spec("1=passport"),
            Err(SheetError::UnknownRule(_))
        ));
    }

    #[test]
    fn test_named_column() {
        let config = ValidatorConfig::new().named_column(1, "Phone", BuiltinRule::Phone);
        assert_eq!(config.column_name(1), Some("Phone"));
        assert_eq!(config.column_name(0), None);
        assert_eq!(
            ValidatorConfig::parse_name_spec("1=Mobile No").unwrap(),
            (1, "Mobile No".to_string())
        );
    }

    #[test]
    fn test_custom_rule_and_classifier() {
        fn whole(message: &str) -> String {
            message.to_string()
        }

        let config = ValidatorConfig::new()
            .column(
                0,
                rule_fn("never", |_: &Cell| -> std::result::Result<Verdict, RuleFault> {
                    Ok(Verdict::fail("Nope"))
                }),
            )
            .with_classifier(whole);

        assert_eq!((config.classifier())("A (b)"), "A (b)");
        assert!(format!("{:?}", config).contains("never"));
    }
}
