use alloc::string::String;
use alloc::vec::Vec;

use rkyv::{Archive, Deserialize, Serialize};

use crate::ids::{SentenceId, TokenId};
use crate::morphology::{Features, Upos};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// One syntactic word of a UD sentence.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct TokenRecord {
    pub id: TokenId,
    pub form: String,
    pub lemma: String,
    pub upos: Upos,
    /// `None` when the FEATS column is `_`.
    pub feats: Option<Features>,
    pub head: TokenId,
    pub deprel: String,
}

impl TokenRecord {
    pub fn new(
        id: u32,
        form: impl Into<String>,
        lemma: impl Into<String>,
        upos: Upos,
        head: u32,
        deprel: impl Into<String>,
    ) -> Self {
        Self {
            id: TokenId(id),
            form: form.into(),
            lemma: lemma.into(),
            upos,
            feats: None,
            head: TokenId(head),
            deprel: deprel.into(),
        }
    }

    pub fn with_feats(mut self, feats: Features) -> Self {
        self.feats = Some(feats);
        self
    }

    pub fn feature(&self, name: &str) -> Option<&str> {
        self.feats.as_ref().and_then(|f| f.get(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Sentence {
    pub id: SentenceId,
    /// `# sent_id` comment, if present.
    pub sent_id: Option<String>,
    /// `# text` comment, if present.
    pub text: Option<String>,
    pub tokens: Vec<TokenRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Treebank {
    pub version: u32,
    pub sentences: Vec<Sentence>,
}

impl Treebank {
    pub const VERSION: u32 = 1;

    pub fn new(sentences: Vec<Sentence>) -> Self {
        Self {
            version: Self::VERSION,
            sentences,
        }
    }
}
