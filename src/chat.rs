//! Text-polish service
//!
//! Two jobs: combine transit/climate/vision signals into one friendly
//! sentence, and decode messy speech-to-text into an intended
//! destination. Gemini does the wording when configured; both jobs have
//! deterministic offline paths so a collaborator failure never reaches
//! the caller.

use crate::llm::{Exchange, LlmService};
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, OnceLock};

const SYNTHESIZE_SYSTEM_PROMPT: &str = "You are an accessibility-first transit assistant. \
Write 1-2 friendly, helpful sentences for a rider. Be concrete and encouraging. \
If ramp is detected true, explicitly mention wheelchair ramp availability. \
If ramp is false or unknown, phrase cautiously. \
If climate contains CO2 saved, you may add a simple, fun equivalence but do not invent \
extreme numbers. Do not output bullet points; output plain text.";

const INTERPRET_SYSTEM_PROMPT: &str = "You decode messy speech-to-text into the intended \
transit destination. The user is likely trying to say a place name (station, mall, \
street, etc.). Return STRICT JSON only, matching this schema:\n\
{\n  \"destination\": string,\n  \"confidence\": number,\n  \"notes\": string\n}\n\
Confidence is 0 to 1. Keep notes short.";

pub struct ChatService {
    client: Option<Arc<dyn LlmService>>,
}

impl ChatService {
    pub fn new(client: Option<Arc<dyn LlmService>>) -> Self {
        Self { client }
    }

    /// Combine transit, climate, and vision signals into one update.
    pub async fn synthesize(&self, transit: &str, climate: &str, vision: &str) -> String {
        let transit = transit.trim();
        let climate = climate.trim();
        let vision = vision.trim();

        if let Some(client) = &self.client {
            let exchange = Exchange {
                system: SYNTHESIZE_SYSTEM_PROMPT.to_string(),
                user: format!(
                    "Transit info: {transit}\nClimate info: {climate}\nVision info: {vision}\n\n\
                     Return a helpful message for the user."
                ),
                max_tokens: Some(200),
            };
            match client.complete(&exchange).await {
                Ok(text) if !text.is_empty() => return text,
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "synthesize fell back to offline template");
                }
            }
        }

        fallback_synthesis(transit, climate, vision)
    }

    /// Decode messy speech-to-text into a destination name. Empty input
    /// stays empty; this never invents a destination out of nothing.
    pub async fn interpret_destination(&self, noisy_text: &str) -> String {
        let raw = noisy_text.trim();
        if raw.is_empty() {
            return String::new();
        }

        if let Some(client) = &self.client {
            let exchange = Exchange {
                system: INTERPRET_SYSTEM_PROMPT.to_string(),
                user: format!(
                    "Messy speech-to-text:\n{raw}\n\n\
                     Decode the intended destination.\nReturn STRICT JSON only."
                ),
                max_tokens: Some(100),
            };
            match client.complete(&exchange).await {
                Ok(text) => {
                    if let Some(destination) = destination_from_json(&text) {
                        return destination;
                    }
                    // Model ignored the JSON contract; salvage from prose.
                    if let Some(destination) = destination_from_text(&text) {
                        return destination;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "interpret fell back to offline heuristic");
                }
            }
        }

        heuristic_destination(raw)
    }
}

/// Offline synthesis: a fixed template around the ramp signal.
fn fallback_synthesis(transit: &str, climate: &str, vision: &str) -> String {
    let ramp_msg = match ramp_detected(vision) {
        Some(true) => "has a wheelchair ramp available",
        Some(false) => "may not have a wheelchair ramp",
        None => "ramp availability is unknown",
    };
    format!(
        "Your trip update: {transit}. Accessibility: this vehicle {ramp_msg}. \
         Climate impact: {climate}."
    )
}

/// Extract "Ramp Detected: true/false" from a vision summary.
fn ramp_detected(vision: &str) -> Option<bool> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?i)ramp\s*detected\s*[:=]\s*(true|false)").expect("ramp rule")
    });
    let caps = re.captures(vision)?;
    Some(caps[1].eq_ignore_ascii_case("true"))
}

/// Parse the destination out of a strict-JSON reply, tolerating code
/// fences around the object.
fn destination_from_json(text: &str) -> Option<String> {
    let parsed = parse_json_block(text)?;
    let destination = parsed.get("destination")?.as_str()?.trim().to_string();
    (!destination.is_empty()).then_some(destination)
}

fn parse_json_block(text: &str) -> Option<Value> {
    let trimmed = text.trim();

    let without_fences = if trimmed.starts_with("```") {
        trimmed
            .trim_start_matches("```")
            .trim_start_matches(|c: char| c.is_ascii_alphabetic())
            .trim_end_matches("```")
            .trim()
    } else {
        trimmed
    };

    if let Ok(value) = serde_json::from_str(without_fences) {
        return Some(value);
    }

    // Last resort: the first {...} block anywhere in the text.
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("json rule"));
    let block = re.find(without_fences)?;
    serde_json::from_str(block.as_str()).ok()
}

/// Pull a destination from free text, e.g. "Destination: Union Station".
fn destination_from_text(text: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?i)destination\s*[:\-]\s*(.+)").expect("destination rule")
    });
    if let Some(caps) = re.captures(text) {
        let destination = caps[1].trim().trim_matches('"').trim().to_string();
        if !destination.is_empty() {
            return Some(destination);
        }
    }

    let line = text.trim().lines().next()?.trim();
    if line.is_empty() || line.starts_with('{') || line.starts_with('[') {
        return None;
    }
    Some(line.trim_matches(['"', '\'', ' ']).to_string())
}

/// Offline destination cleanup: drop fillers and stutter ellipses, keep
/// word characters, title-case the rest.
fn heuristic_destination(raw: &str) -> String {
    static FILLER: OnceLock<Regex> = OnceLock::new();
    static ELLIPSIS: OnceLock<Regex> = OnceLock::new();
    static JUNK: OnceLock<Regex> = OnceLock::new();

    let filler = FILLER.get_or_init(|| Regex::new(r"(?i)\b(um+|uh+)\b").expect("filler rule"));
    let ellipsis = ELLIPSIS.get_or_init(|| Regex::new(r"\.{2,}").expect("ellipsis rule"));
    let junk = JUNK.get_or_init(|| Regex::new(r"[^a-zA-Z0-9\s\-']").expect("junk rule"));

    let cleaned = filler.replace_all(raw, " ");
    let cleaned = ellipsis.replace_all(&cleaned, " ");
    let cleaned = junk.replace_all(&cleaned, " ");

    cleaned
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmError, LlmErrorKind};
    use async_trait::async_trait;

    /// Scripted stand-in for the Gemini client.
    struct ScriptedLlm {
        reply: Result<String, LlmErrorKind>,
    }

    #[async_trait]
    impl LlmService for ScriptedLlm {
        async fn complete(&self, _exchange: &Exchange) -> Result<String, LlmError> {
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(kind) => Err(LlmError::new(*kind, "scripted failure")),
            }
        }

        fn model_id(&self) -> &str {
            "scripted"
        }
    }

    fn offline() -> ChatService {
        ChatService::new(None)
    }

    fn scripted(reply: Result<String, LlmErrorKind>) -> ChatService {
        ChatService::new(Some(Arc::new(ScriptedLlm { reply })))
    }

    #[tokio::test]
    async fn interpret_empty_returns_empty() {
        assert_eq!(offline().interpret_destination("").await, "");
        assert_eq!(offline().interpret_destination("   ").await, "");
    }

    #[tokio::test]
    async fn interpret_fallback_reflects_input() {
        let out = offline().interpret_destination("metrotown").await;
        assert!(out.to_lowercase().contains("metrotown"));
        assert!(!out.to_lowercase().contains("union station"));
    }

    #[tokio::test]
    async fn interpret_cleans_stutters_offline() {
        let out = offline()
            .interpret_destination("um... un... union sta... station!")
            .await;
        assert_eq!(out, "Un Union Sta Station");
    }

    #[tokio::test]
    async fn interpret_uses_llm_json_when_available() {
        let service = scripted(Ok(
            r#"{"destination":"Union Station","confidence":0.92,"notes":"best match"}"#
                .to_string(),
        ));
        let out = service
            .interpret_destination("Un... un... onion... sta... shun.")
            .await;
        assert_eq!(out, "Union Station");
    }

    #[tokio::test]
    async fn interpret_tolerates_fenced_json() {
        let service = scripted(Ok(
            "```json\n{\"destination\":\"Eaton Centre\",\"confidence\":0.8,\"notes\":\"\"}\n```"
                .to_string(),
        ));
        let out = service.interpret_destination("eatn centr").await;
        assert_eq!(out, "Eaton Centre");
    }

    #[tokio::test]
    async fn interpret_salvages_prose_replies() {
        let service = scripted(Ok("Destination: CN Tower".to_string()));
        let out = service.interpret_destination("see en towr").await;
        assert_eq!(out, "CN Tower");
    }

    #[tokio::test]
    async fn interpret_falls_back_on_llm_failure() {
        let service = scripted(Err(LlmErrorKind::Network));
        let out = service.interpret_destination("metrotown").await;
        assert_eq!(out, "Metrotown");
    }

    #[tokio::test]
    async fn synthesize_fallback_combines_all_signals() {
        let out = offline()
            .synthesize("Bus 504, 15 mins", "0.4kg CO2 saved", "Ramp Detected: True")
            .await;
        assert!(out.contains("504"));
        assert!(out.contains("15"));
        assert!(out.to_lowercase().contains("co2"));
        assert!(out.contains("0.4"));
        assert!(out.to_lowercase().contains("ramp") || out.to_lowercase().contains("wheelchair"));
    }

    #[tokio::test]
    async fn synthesize_phrasing_follows_ramp_signal() {
        let with_ramp = offline().synthesize("", "", "Ramp Detected: true").await;
        assert!(with_ramp.contains("has a wheelchair ramp available"));

        let without = offline().synthesize("", "", "Ramp Detected: false").await;
        assert!(without.contains("may not have a wheelchair ramp"));

        let unknown = offline().synthesize("", "", "nothing to see").await;
        assert!(unknown.contains("ramp availability is unknown"));
    }

    #[tokio::test]
    async fn synthesize_uses_llm_text_when_available() {
        let service = scripted(Ok(
            "Great news! The 504 arrives in 15 minutes and has a wheelchair ramp available."
                .to_string(),
        ));
        let out = service
            .synthesize("Bus 504, 15 mins", "0.4kg CO2 saved", "Ramp Detected: True")
            .await;
        assert!(out.starts_with("Great news!"));
    }

    #[tokio::test]
    async fn synthesize_falls_back_on_llm_failure() {
        let service = scripted(Err(LlmErrorKind::ServerError));
        let out = service
            .synthesize("Bus 504, 15 mins", "0.4kg CO2 saved", "Ramp Detected: True")
            .await;
        assert!(out.starts_with("Your trip update:"));
    }
}
