//! Coach chat boundary.
//!
//! The coach is an external collaborator with a deliberately tiny
//! contract: a query plus a one-line workout context in, advice text out.
//! The boundary is infallible by design. Every failure path, from a
//! missing API key to a transport error, collapses into a fixed apology
//! string so a broken chat can never abort or corrupt a session.

use crate::config::CoachConfig;
use serde::{Deserialize, Serialize};

/// In-band failure text shown when the coach cannot be reached
pub const COACH_FAILURE_MESSAGE: &str =
    "Ocorreu um erro ao consultar o IronCoach. Verifique sua chave de API.";

/// Shown when the backend answers without any usable text
const COACH_EMPTY_MESSAGE: &str = "Desculpe, não consegui processar sua pergunta agora.";

const SYSTEM_INSTRUCTION: &str = "\
Você é um treinador de musculação experiente e motivador, especialista em hipertrofia e força.
Seu nome é \"IronCoach\".
Responda sempre em Português do Brasil.
Seja conciso, direto e útil.
Use o contexto fornecido sobre o treino/exercício do usuário para dar conselhos personalizados.
Se o usuário perguntar sobre execução, explique a técnica correta.
Se o usuário perguntar sobre progressão de carga, sugira estratégias seguras.";

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Something that can answer a workout question
///
/// Answers are plain text, never errors; implementations convert their
/// failures into user-readable Portuguese messages.
pub trait Coach {
    fn ask(&self, query: &str, context: &str) -> String;
}

/// Gemini-backed coach over blocking HTTP
pub struct GeminiCoach {
    api_key: String,
    model: String,
}

impl GeminiCoach {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Build from config; `None` when no API key is set
    pub fn from_config(config: &CoachConfig) -> Option<Self> {
        let api_key = config.api_key.as_deref()?;
        if api_key.is_empty() {
            return None;
        }
        Some(Self::new(api_key, config.model.clone()))
    }

    fn call(&self, query: &str, context: &str) -> Result<String, String> {
        let url = format!(
            "{}/{}:generateContent",
            GEMINI_BASE_URL, self.model
        );
        let request_body = GenerateRequest {
            system_instruction: Content {
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            contents: vec![Content {
                parts: vec![Part {
                    text: user_prompt(query, context),
                }],
            }],
        };

        let agent = ureq::Agent::new_with_defaults();
        let response = agent
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .send_json(&request_body)
            .map_err(|e| format!("coach request failed: {e}"))?;

        let resp: GenerateResponse = response
            .into_body()
            .read_json()
            .map_err(|e| format!("failed to parse coach response: {e}"))?;

        Ok(resp
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| COACH_EMPTY_MESSAGE.to_string()))
    }
}

impl Coach for GeminiCoach {
    fn ask(&self, query: &str, context: &str) -> String {
        match self.call(query, context) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("{}", e);
                COACH_FAILURE_MESSAGE.to_string()
            }
        }
    }
}

fn user_prompt(query: &str, context: &str) -> String {
    format!(
        "Contexto do Treino/Exercício Atual:\n{context}\n\nPergunta do Usuário:\n{query}"
    )
}

#[derive(Serialize)]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedCoach(&'static str);

    impl Coach for CannedCoach {
        fn ask(&self, _query: &str, _context: &str) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn test_coach_trait_is_object_safe() {
        let coach: Box<dyn Coach> = Box::new(CannedCoach("Mantenha a coluna neutra."));
        assert_eq!(
            coach.ask("Como agachar?", "Treino: A."),
            "Mantenha a coluna neutra."
        );
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let mut config = CoachConfig::default();
        assert!(GeminiCoach::from_config(&config).is_none());

        config.api_key = Some(String::new());
        assert!(GeminiCoach::from_config(&config).is_none());

        config.api_key = Some("key".into());
        assert!(GeminiCoach::from_config(&config).is_some());
    }

    #[test]
    fn test_user_prompt_embeds_context_and_query() {
        let prompt = user_prompt("Quantas séries?", "Treino: A. Exercícios: Agachamento Livre.");
        assert!(prompt.contains("Treino: A."));
        assert!(prompt.contains("Quantas séries?"));
    }

    #[test]
    fn test_response_shape_parses() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"Foque na cadência."}]}}]}"#;
        let resp: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.candidates[0].content.parts[0].text, "Foque na cadência.");
    }
}
