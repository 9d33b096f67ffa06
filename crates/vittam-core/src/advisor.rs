//! AI-backed expense advisor
//!
//! Wraps an optional `AIClient` with the three advisor operations. Each one is
//! total: service errors, malformed output and a missing backend all resolve to
//! a well-formed result, never an `Err`.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::ai::parsing::{parse_category, parse_insights};
use crate::ai::{AIBackend, AIClient};
use crate::error::{Error, Result};
use crate::models::{AIInsight, Category, ExpenseRecord, InsightType};
use crate::prompts;

/// Returned by `answer` whenever the service cannot produce one
pub const ANSWER_FALLBACK: &str = "I'm unable to provide a detailed answer at the moment. \
Please try refreshing the insights or check your connection.";

/// The single insight returned when generation fails
pub fn fallback_insights() -> Vec<AIInsight> {
    vec![AIInsight {
        id: "fallback-1".to_string(),
        insight_type: InsightType::Info,
        title: "AI Analysis Unavailable".to_string(),
        message: "Unable to generate personalized insights at this time. Please try again later."
            .to_string(),
        action: Some("Refresh insights".to_string()),
        confidence: 0.5,
    }]
}

#[derive(Clone)]
pub struct ExpenseAdvisor {
    ai: Option<AIClient>,
}

impl ExpenseAdvisor {
    pub fn new(ai: Option<AIClient>) -> Self {
        Self { ai }
    }

    /// Build from environment variables (see `AIClient::from_env`)
    pub fn from_env() -> Self {
        let ai = AIClient::from_env();
        match &ai {
            Some(client) => info!(model = %client.model(), host = %client.host(), "AI backend configured"),
            None => info!("No AI backend configured, advisor will use fallbacks"),
        }
        Self::new(ai)
    }

    pub fn is_configured(&self) -> bool {
        self.ai.is_some()
    }

    pub fn ai(&self) -> Option<&AIClient> {
        self.ai.as_ref()
    }

    fn client(&self) -> Result<&AIClient> {
        self.ai
            .as_ref()
            .ok_or_else(|| Error::Ai("No AI backend configured".into()))
    }

    async fn try_generate_insights(&self, records: &[ExpenseRecord]) -> Result<Vec<AIInsight>> {
        let client = self.client()?;
        let response = client.complete(&prompts::insights_request(records)).await?;
        parse_insights(&response, Utc::now().timestamp_millis())
    }

    /// Generate 3-4 insights about the given records
    ///
    /// Never empty: any failure yields `fallback_insights()`.
    pub async fn generate_insights(&self, records: &[ExpenseRecord]) -> Vec<AIInsight> {
        match self.try_generate_insights(records).await {
            Ok(insights) => {
                debug!(count = insights.len(), records = records.len(), "Generated insights");
                insights
            }
            Err(e) => {
                warn!(error = %e, "Error generating AI insights");
                fallback_insights()
            }
        }
    }

    /// Suggest a category for a free-text description
    pub async fn categorize(&self, description: &str) -> Category {
        let client = match self.client() {
            Ok(c) => c,
            Err(_) => return Category::Other,
        };

        match client.complete(&prompts::categorize_request(description)).await {
            Ok(response) => {
                let category = parse_category(&response);
                debug!(description = %description, category = %category, "Categorized expense");
                category
            }
            Err(e) => {
                warn!(error = %e, "Error categorizing expense");
                Category::Other
            }
        }
    }

    async fn try_answer(&self, question: &str, records: &[ExpenseRecord]) -> Result<String> {
        let client = self.client()?;
        let response = client
            .complete(&prompts::answer_request(question, records))
            .await?;
        let answer = response.trim();
        if answer.is_empty() {
            return Err(Error::Ai("No response from AI".into()));
        }
        Ok(answer.to_string())
    }

    /// Answer a free-form question about the given records
    pub async fn answer(&self, question: &str, records: &[ExpenseRecord]) -> String {
        match self.try_answer(question, records).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "Error generating AI answer");
                ANSWER_FALLBACK.to_string()
            }
        }
    }
}
