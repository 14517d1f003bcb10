//! AI assistant client.
//!
//! A thin client for an opaque text-completion HTTP service. Every call is a
//! single attempt with no retry; any failure is replaced by a localized
//! fallback sentence so the assistant can never crash a session.

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Fallback when the assistant call fails outright.
pub const FALLBACK_ANSWER: &str = "حدث خطأ أثناء التواصل مع الذكاء الاصطناعي.";
/// Fallback when a completion returns empty text.
pub const EMPTY_ANSWER: &str = "عذراً، لم أستطع معالجة طلبك حالياً.";
/// Fallback for a failed memo summary.
pub const FALLBACK_SUMMARY: &str = "عذراً، فشل توليد الملخص حالياً.";
/// Fallback when a summary comes back empty.
pub const EMPTY_SUMMARY: &str = "لم يتم العثور على ملخص.";

const STAFF_SYSTEM_INSTRUCTION: &str = "أنت مساعد ذكي لموظفي المديرية الإقليمية. \
تساعد الموظفين في الأسئلة المتعلقة بالعمل، الإعلانات، والمساطر الإدارية. \
اجعل إجاباتك ودودة، مهنية، وباللغة العربية.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionRequest<'a> {
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<&'a str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    use_search: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompletionResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    sources: Vec<Source>,
}

/// A retrieval source cited by a search-grounded completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A search-grounded answer with its cited sources.
#[derive(Debug, Clone)]
pub struct Summary {
    pub text: String,
    pub sources: Vec<Source>,
}

/// Client for the text-completion service. Unconfigured (no endpoint), it
/// answers with the fallback sentence immediately.
#[derive(Debug, Clone)]
pub struct Assistant {
    client: reqwest::Client,
    endpoint: Option<String>,
    api_key: Option<String>,
}

impl Assistant {
    pub fn new(config: &Config) -> Self {
        if config.assistant_url.is_none() {
            tracing::warn!(
                "No assistant URL configured (PORTAL_ASSISTANT_URL). AI answers are disabled."
            );
        }
        Self {
            client: reqwest::Client::new(),
            endpoint: config.assistant_url.clone(),
            api_key: config.assistant_api_key.clone(),
        }
    }

    /// Ask the staff assistant a free-form question.
    pub async fn complete(&self, prompt: &str, system_instruction: Option<&str>) -> String {
        let request = CompletionRequest {
            prompt,
            system_instruction: system_instruction.or(Some(STAFF_SYSTEM_INSTRUCTION)),
            use_search: false,
        };
        match self.call(&request).await {
            Some(response) => response
                .text
                .filter(|text| !text.trim().is_empty())
                .unwrap_or_else(|| EMPTY_ANSWER.to_string()),
            None => FALLBACK_ANSWER.to_string(),
        }
    }

    /// Summarize a memo from its title and reference: three short points,
    /// formal register.
    pub async fn summarize_memo(&self, title: &str, reference: &str) -> String {
        let prompt = format!(
            "بناءً على عنوان المذكرة التالية: \"{}\" ومرجعها \"{}\"، قدم ملخصاً إدارياً \
             سريعاً في 3 نقاط قصيرة جداً (ما هي المذكرة، من المستهدف، وما هو الإجراء \
             المطلوب). اجعل الأسلوب رسمياً ومختصراً جداً.",
            title, reference
        );
        let request = CompletionRequest {
            prompt: &prompt,
            system_instruction: None,
            use_search: false,
        };
        match self.call(&request).await {
            Some(response) => response
                .text
                .filter(|text| !text.trim().is_empty())
                .unwrap_or_else(|| EMPTY_SUMMARY.to_string()),
            None => FALLBACK_SUMMARY.to_string(),
        }
    }

    /// Retrieval-augmented variant: search the topic, summarize the latest
    /// findings and return the cited sources.
    pub async fn search_and_summarize(&self, topic: &str) -> Summary {
        let prompt = format!(
            "ابحث عن آخر الأخبار حول: {}. استخرج لكل خبر عنواناً جذاباً، ملخصاً \
             للمحتوى، تاريخ النشر إن وجد، ورابط المصدر. افصل كل خبر عن الآخر بوضوح.",
            topic
        );
        let request = CompletionRequest {
            prompt: &prompt,
            system_instruction: None,
            use_search: true,
        };
        match self.call(&request).await {
            Some(response) => Summary {
                text: response
                    .text
                    .filter(|text| !text.trim().is_empty())
                    .unwrap_or_else(|| EMPTY_ANSWER.to_string()),
                sources: response.sources,
            },
            None => Summary {
                text: FALLBACK_ANSWER.to_string(),
                sources: Vec::new(),
            },
        }
    }

    async fn call(&self, request: &CompletionRequest<'_>) -> Option<CompletionResponse> {
        let endpoint = self.endpoint.as_ref()?;

        let mut builder = self.client.post(endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.header(crate::mirror::API_KEY_HEADER, key);
        }

        match builder.send().await.and_then(|r| r.error_for_status()) {
            Ok(response) => match response.json().await {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    tracing::warn!("Assistant returned a malformed response: {}", err);
                    None
                }
            },
            Err(err) => {
                tracing::warn!("Assistant call failed: {}", err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unconfigured() -> Assistant {
        Assistant {
            client: reqwest::Client::new(),
            endpoint: None,
            api_key: None,
        }
    }

    #[tokio::test]
    async fn test_unconfigured_complete_falls_back() {
        let assistant = unconfigured();
        assert_eq!(assistant.complete("سؤال", None).await, FALLBACK_ANSWER);
    }

    #[tokio::test]
    async fn test_unconfigured_summary_falls_back() {
        let assistant = unconfigured();
        assert_eq!(
            assistant.summarize_memo("عنوان", "مرجع").await,
            FALLBACK_SUMMARY
        );
        let summary = assistant.search_and_summarize("أخبار").await;
        assert_eq!(summary.text, FALLBACK_ANSWER);
        assert!(summary.sources.is_empty());
    }
}
