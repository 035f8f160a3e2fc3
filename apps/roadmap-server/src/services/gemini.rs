//! Gemini-backed summary generator.

use async_trait::async_trait;
use entities::{Roadmap, RoadmapCircle};
use serde::{Deserialize, Serialize};

use super::summary::{SummaryError, SummaryGenerator};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .map(|part| part.text.trim().to_string())
            .find(|text| !text.is_empty())
    }
}

/// Builds the prompt sent for a roadmap.
pub fn build_prompt(roadmap: &Roadmap, circles: &[RoadmapCircle]) -> String {
    let mut prompt = format!(
        "Summarize the following learning roadmap in two or three sentences.\n\
         Title: {}\n",
        roadmap.title
    );
    for circle in circles {
        prompt.push_str(&format!(
            "- {} | {} (level {}): {}\n",
            circle.date, circle.title, circle.level, circle.content
        ));
    }
    prompt
}

/// Summary generator calling the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiSummarizer {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiSummarizer {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", GEMINI_BASE_URL, self.model)
    }
}

#[async_trait]
impl SummaryGenerator for GeminiSummarizer {
    async fn summarize(
        &self,
        roadmap: &Roadmap,
        circles: &[RoadmapCircle],
    ) -> Result<String, SummaryError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(roadmap, circles),
                }],
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SummaryError::Upstream {
                status: response.status().as_u16(),
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        body.first_text().ok_or(SummaryError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use entities::ColorType;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_prompt_lists_circles_in_order() {
        let roadmap = Roadmap::new(Uuid::new_v4(), "Backend");
        let date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let circles = vec![
            RoadmapCircle::new(roadmap.id, "HTTP", date, "basics", 1, ColorType::Red),
            RoadmapCircle::new(roadmap.id, "SQL", date, "joins", 2, ColorType::Blue),
        ];

        let prompt = build_prompt(&roadmap, &circles);
        assert!(prompt.contains("Title: Backend"));
        let http = prompt.find("HTTP").unwrap();
        let sql = prompt.find("SQL").unwrap();
        assert!(http < sql);
        assert!(prompt.contains("2024-04-01 | SQL (level 2): joins"));
    }

    #[test]
    fn test_first_text_skips_empty_parts() {
        let body: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                { "content": { "parts": [{ "text": "  " }] } },
                { "content": { "parts": [{ "text": " A roadmap about SQL. " }] } }
            ]
        }))
        .unwrap();

        assert_eq!(body.first_text().as_deref(), Some("A roadmap about SQL."));
    }

    #[test]
    fn test_first_text_empty_response() {
        let body: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(body.first_text().is_none());
    }

    #[test]
    fn test_endpoint_uses_model() {
        let summarizer = GeminiSummarizer::new("key", "gemini-1.5-flash");
        assert!(summarizer
            .endpoint()
            .ends_with("/models/gemini-1.5-flash:generateContent"));
    }
}
