//! Reply and callback types shared by the command handlers.

use std::fmt;

use thiserror::Error;

/// One inline keyboard button: a label plus encoded callback data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub data: String,
}

impl Button {
    /// Creates a button that triggers `action` in `namespace`.
    #[must_use]
    pub fn new(label: impl Into<String>, namespace: &str, action: &CallbackAction) -> Self {
        Self {
            label: label.into(),
            data: action.encode(namespace),
        }
    }
}

/// A handler reply: message text plus an optional inline keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Vec<Vec<Button>>>,
}

impl Reply {
    /// Creates a plain text reply.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    /// Creates a reply with an inline keyboard.
    #[must_use]
    pub fn with_keyboard(text: impl Into<String>, keyboard: Vec<Vec<Button>>) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

/// Actions encoded into inline button callback data.
///
/// Wire format: `<namespace>:<action>`, e.g. `startrek:list` or
/// `startrek:page_2`. The namespace ties a button to the command that
/// produced it, so unrelated callbacks can be told apart and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// Fetch the full result list and show the first page.
    List,

    /// Prompt for a title and show detailed info.
    Info,

    /// Jump to the given zero-based page.
    Page(usize),
}

/// Errors produced when decoding callback data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CallbackParseError {
    /// The data belongs to a different namespace.
    #[error("Callback data belongs to another namespace")]
    ForeignNamespace,

    /// The page number is not a valid non-negative integer.
    #[error("Invalid page number: {0}")]
    InvalidPageNumber(String),

    /// The action tag is not recognized.
    #[error("Unknown callback action: {0}")]
    UnknownAction(String),
}

impl CallbackAction {
    /// Encodes the action into callback data for `namespace`.
    #[must_use]
    pub fn encode(&self, namespace: &str) -> String {
        format!("{namespace}:{self}")
    }

    /// Decodes callback data previously produced by [`encode`](Self::encode).
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace does not match or the action
    /// tag is malformed.
    pub fn parse(namespace: &str, data: &str) -> Result<Self, CallbackParseError> {
        let action = data
            .strip_prefix(namespace)
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or(CallbackParseError::ForeignNamespace)?;

        match action {
            "list" => Ok(Self::List),
            "info" => Ok(Self::Info),
            _ => match action.strip_prefix("page_") {
                Some(number) => number
                    .parse()
                    .map(Self::Page)
                    .map_err(|_| CallbackParseError::InvalidPageNumber(number.to_owned())),
                None => Err(CallbackParseError::UnknownAction(action.to_owned())),
            },
        }
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Info => write!(f, "info"),
            Self::Page(page) => write!(f, "page_{page}"),
        }
    }
}
