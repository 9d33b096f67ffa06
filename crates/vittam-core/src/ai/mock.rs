//! Mock backend for testing
//!
//! Provides canned responses for every advisor operation, plus scripted
//! replies and failures. Useful for unit tests and development without an
//! API key.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::prompts::{CATEGORIZE_SYSTEM, INSIGHTS_USER_MARKER};

use super::types::CompletionRequest;
use super::AIBackend;

const CANNED_INSIGHTS: &str = r#"```json
[
  {
    "type": "tip",
    "title": "Track daily spends",
    "message": "Logging small purchases like chai and snacks keeps your ₹ totals honest.",
    "action": "Add expenses as they happen",
    "confidence": 0.8
  }
]
```"#;

const CANNED_ANSWER: &str =
    "Your largest spends are in Food. Cooking at home twice a week could save around ₹1,500 a month.";

/// How the mock responds to completion calls
#[derive(Clone, Debug)]
enum Reply {
    /// Pick a canned response based on the prompt
    Canned,
    /// Always return this text
    Fixed(String),
    /// Always fail as if the service were unreachable
    Fail,
}

/// Mock AI backend for testing
///
/// Records every request it receives so tests can assert on prompts and
/// sampling parameters.
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    reply: Reply,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy, canned responses)
    pub fn new() -> Self {
        Self {
            healthy: true,
            reply: Reply::Canned,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that always returns `text`
    pub fn with_reply(text: &str) -> Self {
        Self {
            reply: Reply::Fixed(text.to_string()),
            ..Self::new()
        }
    }

    /// Create a mock whose calls always fail
    pub fn failing() -> Self {
        Self {
            healthy: false,
            reply: Reply::Fail,
            ..Self::new()
        }
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

/// Keyword classifier standing in for the model's categorization
fn classify_description(prompt: &str) -> &'static str {
    let text = prompt.to_lowercase();
    let matches = |words: &[&str]| words.iter().any(|w| text.contains(w));

    if matches(&["uber", "ola", "auto", "taxi", "metro", "petrol", "bus"]) {
        "Transportation"
    } else if matches(&["lunch", "dinner", "swiggy", "zomato", "chai", "grocer"]) {
        "Food"
    } else if matches(&["movie", "netflix", "concert", "hotstar"]) {
        "Entertainment"
    } else if matches(&["amazon", "flipkart", "shoes", "shirt"]) {
        "Shopping"
    } else if matches(&["electricity", "rent", "broadband", "recharge"]) {
        "Bills"
    } else if matches(&["doctor", "pharmacy", "medicine", "hospital"]) {
        "Healthcare"
    } else {
        "Other"
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        match &self.reply {
            Reply::Fail => Err(Error::Ai("mock backend failure".into())),
            Reply::Fixed(text) => Ok(text.clone()),
            Reply::Canned => {
                let text = if request.system == CATEGORIZE_SYSTEM {
                    classify_description(&request.user)
                } else if request.user.contains(INSIGHTS_USER_MARKER) {
                    CANNED_INSIGHTS
                } else {
                    CANNED_ANSWER
                };
                Ok(text.to_string())
            }
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
