/// Ordered `(trigger, outcome)` rules matched by substring containment.
///
/// Priority is list order: the first rule whose trigger occurs in the
/// haystack decides.
#[derive(Debug, Clone)]
pub struct DecisionList<O> {
    rules: Vec<(String, O)>,
}

impl<O> DecisionList<O> {
    /// Triggers are lowercased; blank triggers are dropped since they would
    /// match everything.
    pub fn new(rules: impl IntoIterator<Item = (String, O)>) -> Self {
        let rules = rules
            .into_iter()
            .map(|(trigger, outcome)| (trigger.trim().to_lowercase(), outcome))
            .filter(|(trigger, _)| !trigger.is_empty())
            .collect();
        Self { rules }
    }

    /// First rule contained in `haystack`, which must already be lowercase.
    pub fn first_match(&self, haystack: &str) -> Option<(&str, &O)> {
        self.rules
            .iter()
            .find(|(trigger, _)| haystack.contains(trigger.as_str()))
            .map(|(trigger, outcome)| (trigger.as_str(), outcome))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_rule_in_order_wins() {
        let list = DecisionList::new(vec![
            ("corn syrup".to_string(), 1),
            ("high fructose".to_string(), 2),
        ]);
        assert_eq!(
            list.first_match("high fructose corn syrup"),
            Some(("corn syrup", &1))
        );
        assert_eq!(list.first_match("high fructose"), Some(("high fructose", &2)));
        assert_eq!(list.first_match("honey"), None);
    }

    #[test]
    fn test_triggers_lowercased_and_blank_dropped() {
        let list = DecisionList::new(vec![("  ".to_string(), 0), ("MSG".to_string(), 1)]);
        assert_eq!(list.len(), 1);
        assert!(!list.is_empty());
        assert!(DecisionList::<u8>::new(Vec::new()).is_empty());
        assert_eq!(list.first_match("contains msg"), Some(("msg", &1)));
    }
}
