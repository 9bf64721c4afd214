use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One captured piece of cell output, shaped like an nbformat v4 output record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    Stream {
        name: String,
        #[serde(deserialize_with = "multiline")]
        text: String,
    },
    ExecuteResult {
        #[serde(default)]
        execution_count: Option<u64>,
        #[serde(default)]
        data: Map<String, Value>,
        #[serde(default)]
        metadata: Map<String, Value>,
    },
    DisplayData {
        #[serde(default)]
        data: Map<String, Value>,
        #[serde(default)]
        metadata: Map<String, Value>,
    },
    Error {
        ename: String,
        evalue: String,
        #[serde(default)]
        traceback: Vec<String>,
    },
}

impl Output {
    pub fn stream(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Stream {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn stdout(text: impl Into<String>) -> Self {
        Self::stream("stdout", text)
    }

    pub fn stderr(text: impl Into<String>) -> Self {
        Self::stream("stderr", text)
    }

    /// Console text carried by this output.
    ///
    /// Rich outputs contribute their `text/plain` representation and errors
    /// their rendered traceback.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Stream { text, .. } => Cow::Borrowed(text),
            Self::ExecuteResult { data, .. } | Self::DisplayData { data, .. } => {
                match data.get("text/plain") {
                    Some(Value::String(text)) => Cow::Borrowed(text),
                    Some(Value::Array(lines)) => Cow::Owned(
                        lines
                            .iter()
                            .filter_map(Value::as_str)
                            .collect::<String>(),
                    ),
                    _ => Cow::Borrowed(""),
                }
            }
            Self::Error { traceback, .. } => Cow::Owned(traceback.join("\n")),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MultilineText {
    Single(String),
    Lines(Vec<String>),
}

impl MultilineText {
    fn into_string(self) -> String {
        match self {
            Self::Single(text) => text,
            Self::Lines(lines) => lines.concat(),
        }
    }
}

/// nbformat stores text either as one string or as a list of lines.
pub(crate) fn multiline<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    MultilineText::deserialize(deserializer).map(MultilineText::into_string)
}
