//! Keyword intent classifier.
//!
//! Maps operator input to one of a fixed set of intents with an ordered
//! rule table (first match wins), then renders a canned reply against the
//! current [`StatisticsSnapshot`].

use backroom_core::types::StatisticsSnapshot;

/// What the operator is asking about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Sales,
    Inventory,
    Customers,
    Help,
    Fallback,
}

struct Rule {
    intent: Intent,
    keywords: &'static [&'static str],
}

/// Ordered rule table. Earlier rules win; matching is a case-insensitive
/// substring test with no word boundaries.
static RULES: &[Rule] = &[
    Rule {
        intent: Intent::Sales,
        keywords: &["sales", "revenue"],
    },
    Rule {
        intent: Intent::Inventory,
        keywords: &["stock", "inventory"],
    },
    Rule {
        intent: Intent::Customers,
        keywords: &["customer"],
    },
    Rule {
        intent: Intent::Help,
        keywords: &["help"],
    },
];

/// Number of low-stock item names quoted in an inventory reply.
const LOW_STOCK_PREVIEW: usize = 2;

const HELP_REPLY: &str = "I can help you with:\n\
- Sales and revenue summaries\n\
- Stock and inventory alerts\n\
- Customer counts\n\
Just ask!";

const FALLBACK_REPLY: &str = "I'm not sure about that one. I'd recommend checking the \
dashboard reports for the details, or ask me about sales, stock, or customers.";

/// Rule-based reply generator.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    currency: String,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new("GHS")
    }
}

impl IntentClassifier {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }

    /// Classify raw input. Falls back to [`Intent::Fallback`] if no rule matches.
    pub fn classify_intent(&self, input: &str) -> Intent {
        let lower = input.to_lowercase();
        RULES
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Fallback)
    }

    /// Render the reply for an intent.
    pub fn respond(&self, intent: Intent, stats: &StatisticsSnapshot) -> String {
        match intent {
            Intent::Sales => format!(
                "Today's sales: {cur} {:.2} from {} transactions. Average order value is {cur} {:.2}.",
                stats.revenue(),
                stats.transactions(),
                stats.average_order(),
                cur = self.currency,
            ),
            Intent::Inventory => format!(
                "You have {} items running low on stock. Top items: {}.",
                stats.low_stock(),
                low_stock_preview(stats),
            ),
            Intent::Customers => format!(
                "You have {} total customers in your database.",
                stats.customers()
            ),
            Intent::Help => HELP_REPLY.to_string(),
            Intent::Fallback => FALLBACK_REPLY.to_string(),
        }
    }

    /// Classify `input` and render the reply in one go.
    pub fn classify(&self, input: &str, stats: &StatisticsSnapshot) -> String {
        let intent = self.classify_intent(input);
        tracing::debug!(?intent, "Classified chat input");
        self.respond(intent, stats)
    }
}

fn low_stock_preview(stats: &StatisticsSnapshot) -> String {
    let items = stats.low_stock_items();
    if items.is_empty() {
        return "None".to_string();
    }
    items
        .iter()
        .take(LOW_STOCK_PREVIEW)
        .map(|item| item.name())
        .collect::<Vec<_>>()
        .join(", ")
}
