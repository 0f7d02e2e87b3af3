use serde::Deserialize;

/// `POST /next` for Hints and Pictionary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WordReply {
    pub word: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub category_color: Option<String>,
}

/// `POST /wbi/next`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PersonReply {
    pub person: String,
    pub number: usize,
    pub total: usize,
}

/// `POST /dod/next`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DilemmaReply {
    pub option_a: String,
    pub option_b: String,
    pub number: usize,
    pub total: usize,
}
