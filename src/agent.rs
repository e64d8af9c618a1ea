use crate::cli::Args;
use crate::config::persona::{ load_persona, PersonaConfig };
use crate::llm::gemini::{ Content, GeminiClient };
use crate::models::chat::{ ChatReply, ChatTurn, ReplySource };
use log::{ info, warn };
use regex::Regex;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

/// The chat responder. Immutable after construction and shared across
/// requests without locking; the provider round trip is the only await
/// point.
pub struct ChatAgent {
    persona: Arc<PersonaConfig>,
    rules: Vec<(Regex, String)>,
    gemini: Option<GeminiClient>,
}

impl ChatAgent {
    pub fn new(args: &Args) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let persona = load_persona(args.persona_path.as_deref())?;

        let mut rules = Vec::with_capacity(persona.rules.len());
        for rule in &persona.rules {
            let pattern = Regex::new(&rule.pattern).map_err(|e|
                format!("Invalid fallback pattern '{}': {}", rule.pattern, e)
            )?;
            rules.push((pattern, rule.reply.clone()));
        }

        let api_key = args.gemini_api_key.clone().filter(|k| !k.trim().is_empty());
        let gemini = match api_key {
            Some(key) => {
                info!("Gemini configured (model: {})", args.chat_model);
                Some(
                    GeminiClient::new(
                        key,
                        args.chat_model.clone(),
                        args.chat_base_url.clone(),
                        Duration::from_secs(args.request_timeout_secs)
                    )?
                )
            }
            None => {
                warn!("GEMINI_API_KEY not set. Serving local fallback replies only.");
                None
            }
        };

        Ok(Self { persona, rules, gemini })
    }

    pub fn gemini_configured(&self) -> bool {
        self.gemini.is_some()
    }

    pub fn api_key_len(&self) -> usize {
        self.gemini.as_ref().map(|g| g.api_key_len()).unwrap_or(0)
    }

    pub fn persona(&self) -> &PersonaConfig {
        &self.persona
    }

    /// Answers `message` given the prior turns. Never fails: every
    /// provider-side problem degrades to a local reply, and the provenance
    /// tag records which path produced the text.
    pub async fn respond(&self, message: &str, history: &[ChatTurn]) -> ChatReply {
        let gemini = match &self.gemini {
            Some(client) => client,
            None => {
                return ChatReply {
                    response: self.fallback_reply(message),
                    source: ReplySource::Local,
                };
            }
        };

        let contents = self.build_contents(message, history);

        match gemini.generate(contents).await {
            Ok(data) => {
                if let Some(error) = &data.error {
                    warn!("Gemini error response: {:?}", error);
                    return ChatReply {
                        response: self.fallback_reply(message),
                        source: ReplySource::LocalError,
                    };
                }

                match data.first_text() {
                    Some(text) =>
                        ChatReply {
                            response: text.to_string(),
                            source: ReplySource::Gemini,
                        },
                    None => {
                        warn!("Gemini returned no usable candidate text");
                        ChatReply {
                            response: self.fallback_reply(message),
                            source: ReplySource::LocalNoResponse,
                        }
                    }
                }
            }
            Err(e) => {
                warn!("Gemini call failed: {}", e);
                ChatReply {
                    response: self.fallback_reply(message),
                    source: ReplySource::Error,
                }
            }
        }
    }

    /// Provider payload: persona context, primer acknowledgement, the
    /// recognized history turns in order, then the live message last.
    /// Turns whose `type` is neither `user` nor `bot` are dropped.
    fn build_contents(&self, message: &str, history: &[ChatTurn]) -> Vec<Content> {
        let mut contents = Vec::with_capacity(history.len() + 3);
        contents.push(Content::user(self.persona.system_context.clone()));
        contents.push(Content::model(self.persona.primer_ack.clone()));

        for turn in history {
            match turn.kind.as_str() {
                "user" => contents.push(Content::user(turn.text.clone())),
                "bot" => contents.push(Content::model(turn.text.clone())),
                _ => {}
            }
        }

        contents.push(Content::user(message.to_string()));
        contents
    }

    /// Deterministic rule engine: the first rule matching the lower-cased
    /// message wins, in table order.
    pub fn fallback_reply(&self, message: &str) -> String {
        let text = message.to_lowercase();
        for (pattern, reply) in &self.rules {
            if pattern.is_match(&text) {
                return reply.clone();
            }
        }
        self.persona.default_reply.clone()
    }
}
