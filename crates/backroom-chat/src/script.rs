//! Greeting script and suggested-action shortcuts.

use backroom_core::types::StatisticsSnapshot;

/// Shortcut phrases offered after the greeting. Choosing one submits it
/// exactly as if the operator had typed it.
pub const SUGGESTED_ACTIONS: &[&str] = &[
    "Show me today's sales",
    "Check low stock items",
    "How many customers do we have?",
    "What can you help with?",
];

/// Number of messages in the greeting.
pub const GREETING_LEN: usize = 3;

/// Renders the fixed opening lines of a session.
#[derive(Debug, Clone)]
pub struct GreetingScript {
    currency: String,
}

impl GreetingScript {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }

    /// Render every greeting line against one snapshot, in delivery order.
    pub fn render(&self, stats: &StatisticsSnapshot) -> [String; GREETING_LEN] {
        [
            "Hello! I'm your Backroom assistant.".to_string(),
            format!(
                "So far today you've made {} {:.2} across {} transactions.",
                self.currency,
                stats.revenue(),
                stats.transactions()
            ),
            format!(
                "{} items are running low on stock. How can I help you today?",
                stats.low_stock()
            ),
        ]
    }

    pub fn suggestions(&self) -> &'static [&'static str] {
        SUGGESTED_ACTIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Intent, IntentClassifier};

    #[test]
    fn test_greeting_interpolates_stats() {
        let stats = StatisticsSnapshot {
            total_revenue: Some(250.0),
            transaction_count: Some(9),
            low_stock_count: Some(4),
            ..Default::default()
        };
        let lines = GreetingScript::new("GHS").render(&stats);
        assert_eq!(lines.len(), GREETING_LEN);
        assert!(lines[1].contains("GHS 250.00"));
        assert!(lines[1].contains("9 transactions"));
        assert!(lines[2].starts_with("4 items"));
    }

    #[test]
    fn test_greeting_defaults_missing_stats() {
        let lines = GreetingScript::new("GHS").render(&StatisticsSnapshot::default());
        assert!(lines[1].contains("GHS 0.00"));
        assert!(lines[1].contains("0 transactions"));
        assert!(lines[2].starts_with("0 items"));
    }

    #[test]
    fn test_each_suggestion_hits_a_distinct_rule() {
        let classifier = IntentClassifier::default();
        let intents: Vec<Intent> = SUGGESTED_ACTIONS
            .iter()
            .map(|s| classifier.classify_intent(s))
            .collect();
        assert_eq!(
            intents,
            vec![Intent::Sales, Intent::Inventory, Intent::Customers, Intent::Help]
        );
    }
}
