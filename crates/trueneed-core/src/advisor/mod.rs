//! Product advisor with canned responses.
//!
//! There is no model behind the advisor yet: replies are fixed text delivered
//! after a simulated typing delay, and product analysis returns a placeholder.

pub mod catalog;

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use catalog::{Product, Ratings, featured_products};

use crate::config::Config;

/// Reply to any free-form question.
pub const CANNED_REPLY: &str =
    "I understand you need help with that. Let me analyze your requirements...";

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub products: Vec<Product>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            products: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            ..Self::user(text)
        }
    }

    #[must_use]
    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = products;
        self
    }
}

/// Placeholder result of analysing a product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductAnalysis {
    pub url: String,
    pub name: String,
    pub price: String,
    pub analysis: String,
}

#[derive(Debug, Clone)]
pub struct Advisor {
    typing_delay: Duration,
}

impl Default for Advisor {
    fn default() -> Self {
        Self::new(Config::default().typing_delay())
    }
}

impl Advisor {
    pub fn new(typing_delay: Duration) -> Self {
        Self { typing_delay }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.typing_delay())
    }

    pub fn typing_delay(&self) -> Duration {
        self.typing_delay
    }

    /// Answers a question after the typing delay.
    pub async fn send_message(&self, text: &str) -> Message {
        tracing::debug!(chars = text.chars().count(), "advisor message");
        tokio::time::sleep(self.typing_delay).await;
        Message::assistant(CANNED_REPLY)
    }

    pub async fn analyze_product(&self, url: &str) -> ProductAnalysis {
        tokio::time::sleep(self.typing_delay).await;
        ProductAnalysis {
            url: url.trim().to_string(),
            name: "Sample Product".to_string(),
            price: "$99.99".to_string(),
            analysis: "Analysis coming soon".to_string(),
        }
    }
}

/// Conversation shown to first-time visitors.
pub fn sample_conversation() -> Vec<Message> {
    vec![
        Message::user("I need a laptop for coding and video editing under ₹80,000"),
        Message::assistant(
            "Great! I've analyzed your requirements and found some excellent options for you. \
             Based on your needs for coding and video editing under ₹80,000, here are my top \
             recommendations:",
        )
        .with_products(featured_products()),
        Message::user("Which one has better battery life?"),
        Message::assistant(
            "The MacBook Air M1 has superior battery life, lasting up to 15-18 hours on a single \
             charge. The M1 chip is incredibly power-efficient, making it perfect for long coding \
             sessions without needing to plug in.",
        )
        .with_products(vec![catalog::battery_pick()]),
    ]
}
