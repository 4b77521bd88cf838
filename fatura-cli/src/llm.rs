//! Expense classification through an OpenAI-compatible chat completions API.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use fatura_finance::Classifier;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use crate::config::ClassifierSection;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that categorizes expenses.";

pub struct OpenAiClassifier {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
}

impl OpenAiClassifier {
    pub fn new(section: &ClassifierSection, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(section.timeout_secs.max(1)))
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            api_key,
            model: section.model.clone(),
            base_url: section.base_url.trim_end_matches('/').to_string(),
            temperature: section.temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    async fn complete(&self, description: &str, categories: &[&str]) -> Result<String> {
        #[derive(Serialize)]
        struct Msg {
            role: &'static str,
            content: String,
        }

        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg>,
            max_tokens: u32,
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: MsgOut,
        }

        #[derive(Deserialize)]
        struct MsgOut {
            content: Option<String>,
        }

        let body = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                Msg {
                    role: "user",
                    content: user_prompt(description, categories),
                },
            ],
            max_tokens: 20,
            temperature: self.temperature,
        };

        let resp = self
            .client
            .post(self.endpoint())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .context("openai request")?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("openai error: {status} {txt}");
        }

        let out: Resp = resp.json().await.context("parse openai response")?;
        let content = out
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        if content.trim().is_empty() {
            bail!("openai returned an empty answer");
        }
        Ok(content.trim().to_string())
    }
}

impl Classifier for OpenAiClassifier {
    fn classify(&self, description: &str, categories: &[&str]) -> Result<String> {
        // Inside the CLI's runtime a nested block_on would panic, so hop out
        // with block_in_place; otherwise spin up a runtime for the call.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            tokio::task::block_in_place(|| handle.block_on(self.complete(description, categories)))
        } else {
            let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
            rt.block_on(self.complete(description, categories))
        }
    }
}

fn user_prompt(description: &str, categories: &[&str]) -> String {
    format!(
        "Given the description: '{}', classify it into one of the following categories: {}. \
         Answer with the category name only.",
        description.trim(),
        categories.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fatura_core::{Category, Locale};

    #[test]
    fn test_prompt_lists_every_category() {
        let labels = Category::labels(Locale::PtBr);
        let prompt = user_prompt("  POSTO IPIRANGA ", &labels);
        assert!(prompt.starts_with("Given the description: 'POSTO IPIRANGA'"));
        for label in &labels {
            assert!(prompt.contains(label));
        }
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let section = ClassifierSection {
            base_url: "http://localhost:8080/".to_string(),
            ..ClassifierSection::default()
        };
        let c = OpenAiClassifier::new(&section, "sk-test".to_string()).unwrap();
        assert_eq!(c.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_unreachable_server_is_a_classification_error() {
        let section = ClassifierSection {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..ClassifierSection::default()
        };
        let c = OpenAiClassifier::new(&section, "sk-test".to_string()).unwrap();
        assert!(c.classify("MERCADO", &["Outros"]).is_err());
    }
}
