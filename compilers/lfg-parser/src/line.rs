use lfg_protocol::TokenRecord;

/// ID column of a CoNLL-U line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawId {
    /// Syntactic word, `7`
    Word(u32),
    /// Multiword token, `7-8`
    Range(u32, u32),
    /// Enhanced-graph empty node, `7.1`
    Empty(u32, u32),
}

/// One classified line of a CoNLL-U file.
#[derive(Debug, Clone, PartialEq)]
pub enum Line<'a> {
    /// Sentence separator
    Blank,
    /// `# key = value`, or `# free text` with no value
    Comment { key: &'a str, value: Option<&'a str> },
    Word(TokenRecord),
    /// Range or empty node; not part of the basic tree
    Skipped(RawId),
}
