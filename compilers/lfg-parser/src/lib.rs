pub mod line;
pub mod parser;

use std::iter::Enumerate;
use std::str::Lines;

use lfg_protocol::{Sentence, SentenceId, TokenRecord, UposError};
use thiserror::Error;

use crate::line::Line;
use crate::parser::parse_line;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: expected 10 tab-separated columns, found {found}")]
    ColumnCount { line: usize, found: usize },

    #[error("line {line}: malformed {column} column '{value}'")]
    Column {
        line: usize,
        column: &'static str,
        value: String,
    },

    #[error("line {line}: {source}")]
    Upos {
        line: usize,
        #[source]
        source: UposError,
    },
}

/// Streams sentences out of CoNLL-U text, one per blank-line-terminated block.
pub struct SentenceReader<'a> {
    lines: Enumerate<Lines<'a>>,
    next_id: u32,
}

impl<'a> SentenceReader<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines().enumerate(),
            next_id: 0,
        }
    }

    fn finish(
        &mut self,
        sent_id: Option<String>,
        text: Option<String>,
        tokens: Vec<TokenRecord>,
    ) -> Sentence {
        let id = SentenceId(self.next_id);
        self.next_id += 1;
        Sentence { id, sent_id, text, tokens }
    }
}

impl<'a> Iterator for SentenceReader<'a> {
    type Item = Result<Sentence, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut sent_id = None;
        let mut text = None;
        let mut tokens = Vec::new();
        let mut seen_content = false;

        while let Some((idx, raw)) = self.lines.next() {
            let line = match parse_line(idx + 1, raw) {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };

            match line {
                Line::Blank => {
                    if seen_content {
                        return Some(Ok(self.finish(sent_id, text, tokens)));
                    }
                }
                Line::Comment { key, value } => {
                    seen_content = true;
                    match (key, value) {
                        ("sent_id", Some(v)) => sent_id = Some(v.to_string()),
                        ("text", Some(v)) => text = Some(v.to_string()),
                        _ => {}
                    }
                }
                Line::Word(token) => {
                    seen_content = true;
                    tokens.push(token);
                }
                Line::Skipped(id) => {
                    seen_content = true;
                    tracing::trace!(line = idx + 1, ?id, "skipping non-word line");
                }
            }
        }

        // Last block may lack a terminating blank line
        if seen_content {
            Some(Ok(self.finish(sent_id, text, tokens)))
        } else {
            None
        }
    }
}

/// Parses a whole CoNLL-U document.
pub fn parse_conllu(input: &str) -> Result<Vec<Sentence>, ParseError> {
    SentenceReader::new(input).collect()
}
