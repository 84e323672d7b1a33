use serde::{ Serialize, Deserialize };

pub const USER_ROLE: &str = "user";
pub const MODEL_ROLE: &str = "model";

/// One message of a conversation as sent by the caller. The role is kept as
/// free text; anything other than "user" is treated as the assistant side.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConversationTurn {
    pub role: String,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: USER_ROLE.to_string(), content: content.into() }
    }

    /// Role in the generation API vocabulary.
    pub fn backend_role(&self) -> &'static str {
        if self.role == USER_ROLE { USER_ROLE } else { MODEL_ROLE }
    }
}

/// Both request shapes the chat endpoint has accepted over time.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ChatRequest {
    Conversation {
        messages: Vec<ConversationTurn>,
    },
    Legacy {
        message: String,
        #[serde(default)]
        history: Vec<ConversationTurn>,
    },
}

impl ChatRequest {
    /// Flattens the request into an ordered list of turns, oldest first. For the
    /// legacy shape the current message is appended after the history.
    pub fn into_turns(self) -> Vec<ConversationTurn> {
        match self {
            ChatRequest::Conversation { messages } => messages,
            ChatRequest::Legacy { message, mut history } => {
                history.push(ConversationTurn::user(message));
                history
            }
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Citation {
    pub title: String,
    pub uri: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    pub text: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
}

impl ChatReply {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self { text: text.into(), citations: Vec::new() }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
