use serde::{ Serialize, Deserialize };

/// One prior exchange as the chat widget sends it. `type` stays a free
/// string at the wire: unrecognized roles are dropped when the provider
/// payload is built, not rejected at deserialization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatTurn {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl ChatTurn {
    pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Self { kind: kind.into(), text: text.into() }
    }
}

/// Inbound body of `POST /api/chat`. `message` is optional at the wire so
/// the handler owns the missing-message contract.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub history: Option<Vec<ChatTurn>>,
}

/// Provenance of a reply. Observability data only; callers must not branch
/// on it for business logic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReplySource {
    /// Text extracted from a Gemini candidate.
    Gemini,
    /// No credential configured; local rule engine answered.
    Local,
    /// Gemini returned an error payload.
    LocalError,
    /// Gemini answered without usable candidate text.
    LocalNoResponse,
    /// Transport-level failure (timeout, connection error, bad body).
    Error,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub source: ReplySource,
}
