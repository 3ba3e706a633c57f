//! Composes LFG f-structures out of Universal Dependencies trees.
//!
//! A sentence is filtered against the [`Taxonomy`], its tokens are converted
//! into [`Node`]s, and dependants are merged into their heads bottom-up.

pub mod compose;
pub mod filter;
pub mod format;
pub mod function;
pub mod node;
pub mod order;
pub mod taxonomy;
pub mod value;

use lfg_protocol::{Sentence, TokenId, TokenRecord};
use rayon::prelude::*;
use thiserror::Error;

pub use function::Function;
pub use node::Node;
pub use taxonomy::{Category, Class, CoordKind, Scope, Subtype, Taxonomy, TaxonomyError};
pub use value::{AttrMap, FStructure, FValue, Frame, NodeValue, Predicate};

use crate::compose::{merge, Contribution};

/// Why a sentence produced no f-structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("token {id}: relation '{deprel}' is not supported ({scope:?} scope)")]
    UnsupportedRelation {
        id: TokenId,
        deprel: String,
        scope: Scope,
    },

    #[error("token {id}: unknown relation '{deprel}'")]
    UnknownRelation { id: TokenId, deprel: String },

    #[error("no matrix predicate")]
    MissingRoot,

    #[error("tokens {first} and {second} both attach to the root")]
    MultipleRoots { first: TokenId, second: TokenId },

    #[error("token {id}: head {head} is not part of the sentence")]
    DanglingHead { id: TokenId, head: TokenId },

    #[error("token {id} is not reachable from the matrix predicate")]
    Detached { id: TokenId },

    #[error("token id {id} occurs twice")]
    DuplicateId { id: TokenId },
}

impl Rejection {
    /// Short label used when counting rejections.
    pub const fn kind(&self) -> &'static str {
        match self {
            Rejection::UnsupportedRelation { .. } => "unsupported-relation",
            Rejection::UnknownRelation { .. } => "unknown-relation",
            Rejection::MissingRoot => "missing-root",
            Rejection::MultipleRoots { .. } => "multiple-roots",
            Rejection::DanglingHead { .. } => "dangling-head",
            Rejection::Detached { .. } => "detached",
            Rejection::DuplicateId { .. } => "duplicate-id",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComposerConfig {
    /// Copy morphological features (CASE, NUM, ...) onto nominal and verbal
    /// descriptions.
    pub feature_attributes: bool,
}

/// Sentence → f-structure converter. Holds only immutable tables, so one
/// composer can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    taxonomy: Taxonomy,
    config: ComposerConfig,
}

impl Composer {
    pub fn new(taxonomy: Taxonomy, config: ComposerConfig) -> Self {
        Self { taxonomy, config }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn config(&self) -> ComposerConfig {
        self.config
    }

    /// Composes the f-structure of one sentence.
    pub fn compose(&self, tokens: &[TokenRecord]) -> Result<FStructure, Rejection> {
        let kept = filter::filter_sentence(&self.taxonomy, tokens)?;

        let mut nodes = kept
            .into_iter()
            .map(|(token, class)| Node::convert(token, class, &self.taxonomy))
            .collect::<Result<Vec<_>, _>>()?;

        if self.config.feature_attributes {
            for node in &mut nodes {
                node.project_features();
            }
        }

        let order = order::composition_order(&mut nodes)?;

        for &head in &order.heads {
            let dependants = nodes[head].dependants.clone();
            for dep in dependants {
                let contribution = Contribution::take(&mut nodes[dep]);
                merge(&mut nodes[head], contribution);
            }
            format::finalize(&mut nodes[head]);
        }

        let root = &mut nodes[order.root];
        Ok(FStructure::new(root.function, std::mem::take(&mut root.value)))
    }

    /// Like [`Composer::compose`], logging the rejection with the sentence's
    /// identifier.
    pub fn compose_sentence(&self, sentence: &Sentence) -> Result<FStructure, Rejection> {
        let result = self.compose(&sentence.tokens);
        if let Err(rejection) = &result {
            tracing::debug!(
                sentence = %sentence.id,
                sent_id = sentence.sent_id.as_deref().unwrap_or("-"),
                %rejection,
                "sentence rejected"
            );
        }
        result
    }

    /// Composes every sentence in parallel. Results are in input order.
    pub fn compose_batch(&self, sentences: &[Sentence]) -> Vec<Result<FStructure, Rejection>> {
        sentences
            .par_iter()
            .map(|sentence| self.compose_sentence(sentence))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lfg_protocol::Upos;

    fn lookup_text(fs: &FStructure, path: &[&str]) -> Option<String> {
        fs.lookup(path).and_then(FValue::text)
    }

    fn hans_isst_einen_apfel() -> Vec<TokenRecord> {
        vec![
            TokenRecord::new(1, "Hans", "Hans", Upos::Propn, 2, "nsubj"),
            TokenRecord::new(2, "isst", "essen", Upos::Verb, 0, "root"),
            TokenRecord::new(3, "einen", "ein", Upos::Det, 4, "det"),
            TokenRecord::new(4, "Apfel", "Apfel", Upos::Noun, 2, "obj"),
            TokenRecord::new(5, ".", ".", Upos::Punct, 2, "punct"),
        ]
    }

    #[test]
    fn test_simple_transitive_clause() {
        let fs = Composer::default().compose(&hans_isst_einen_apfel()).unwrap();

        let json = serde_json::to_string(&fs).unwrap();
        assert_eq!(
            json,
            r#"{"ROOT":{"PRED":"essen<(SUBJ)(OBJ)>","SUBJ":{"PRED":"Hans"},"OBJ":{"PRED":"Apfel","DEF":{"BOOL":"-"}}}}"#
        );
    }

    #[test]
    fn test_single_top_level_key() {
        let fs = Composer::default().compose(&hans_isst_einen_apfel()).unwrap();
        assert_eq!(fs.as_map().len(), 1);
        assert_eq!(fs.root_label(), Some("ROOT"));
    }

    #[test]
    fn test_composition_is_idempotent() {
        let composer = Composer::default();
        let tokens = hans_isst_einen_apfel();
        assert_eq!(composer.compose(&tokens), composer.compose(&tokens));
    }

    #[test]
    fn test_particle_verb() {
        // Der Zug steht auf
        let tokens = vec![
            TokenRecord::new(1, "Der", "der", Upos::Det, 2, "det"),
            TokenRecord::new(2, "Zug", "Zug", Upos::Noun, 3, "nsubj"),
            TokenRecord::new(3, "steht", "stehen", Upos::Verb, 0, "root"),
            TokenRecord::new(4, "auf", "auf", Upos::Adp, 3, "compound:prt"),
        ];
        let fs = Composer::default().compose(&tokens).unwrap();
        assert_eq!(lookup_text(&fs, &["ROOT", "PRED"]).as_deref(), Some("stehen-auf<(SUBJ)>"));
        assert_eq!(lookup_text(&fs, &["ROOT", "SUBJ", "DEF", "BOOL"]).as_deref(), Some("+"));
        assert!(fs.lookup(&["ROOT", "*CPOUND"]).is_none());
    }

    #[test]
    fn test_auxiliary_prefixes_the_verb() {
        // Er hat geschlafen
        let tokens = vec![
            TokenRecord::new(1, "Er", "er", Upos::Pron, 3, "nsubj"),
            TokenRecord::new(2, "hat", "haben", Upos::Aux, 3, "aux"),
            TokenRecord::new(3, "geschlafen", "schlafen", Upos::Verb, 0, "root"),
        ];
        let fs = Composer::default().compose(&tokens).unwrap();
        assert_eq!(lookup_text(&fs, &["ROOT", "PRED"]).as_deref(), Some("hat-schlafen<(SUBJ)>"));
        assert_eq!(lookup_text(&fs, &["ROOT", "SUBJ", "PRED"]).as_deref(), Some("PRO"));
    }

    #[test]
    fn test_coordination_with_named_coordinator() {
        // Hans , Maria und Peter schlafen
        let tokens = vec![
            TokenRecord::new(1, "Hans", "Hans", Upos::Propn, 6, "nsubj"),
            TokenRecord::new(2, ",", ",", Upos::Punct, 3, "punct"),
            TokenRecord::new(3, "Maria", "Maria", Upos::Propn, 1, "conj"),
            TokenRecord::new(4, "und", "und", Upos::Cconj, 5, "cc"),
            TokenRecord::new(5, "Peter", "Peter", Upos::Propn, 1, "conj"),
            TokenRecord::new(6, "schlafen", "schlafen", Upos::Verb, 0, "root"),
        ];
        let fs = Composer::default().compose(&tokens).unwrap();

        let items = fs.lookup(&["ROOT", "SUBJ"]).and_then(FValue::as_list).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].get("PRED").and_then(FValue::text).as_deref(), Some("Hans"));
        assert_eq!(items[1].get("COORD"), Some(&FValue::atom("LIST")));
        assert_eq!(items[2].get("COORD"), Some(&FValue::atom("UND")));
        assert_eq!(lookup_text(&fs, &["ROOT", "PRED"]).as_deref(), Some("schlafen<(SUBJ)>"));
    }

    #[test]
    fn test_feature_attributes_are_optional() {
        let tokens = vec![
            TokenRecord::new(1, "Kinder", "Kind", Upos::Noun, 2, "nsubj")
                .with_feats([("Case", "Nom"), ("Number", "Plur")].into_iter().collect()),
            TokenRecord::new(2, "lachen", "lachen", Upos::Verb, 0, "root")
                .with_feats([("Mood", "Ind"), ("Tense", "Pres")].into_iter().collect()),
        ];

        let plain = Composer::default().compose(&tokens).unwrap();
        assert!(plain.lookup(&["ROOT", "TENSE"]).is_none());

        let config = ComposerConfig { feature_attributes: true };
        let rich = Composer::new(Taxonomy::hdt(), config).compose(&tokens).unwrap();
        assert_eq!(lookup_text(&rich, &["ROOT", "TENSE"]).as_deref(), Some("PRES"));
        assert_eq!(lookup_text(&rich, &["ROOT", "MOOD"]).as_deref(), Some("IND"));
        assert_eq!(lookup_text(&rich, &["ROOT", "SUBJ", "NUM"]).as_deref(), Some("PLUR"));
        assert_eq!(lookup_text(&rich, &["ROOT", "SUBJ", "PRED"]).as_deref(), Some("Kind"));
    }

    #[test]
    fn test_case_dependant_survives_feature_attributes() {
        // Er fährt zu Bahnhof
        let tokens = vec![
            TokenRecord::new(1, "Er", "er", Upos::Pron, 2, "nsubj"),
            TokenRecord::new(2, "fährt", "fahren", Upos::Verb, 0, "root"),
            TokenRecord::new(3, "zu", "zu", Upos::Adp, 4, "case"),
            TokenRecord::new(4, "Bahnhof", "Bahnhof", Upos::Noun, 2, "obl")
                .with_feats([("Case", "Dat")].into_iter().collect()),
        ];
        let plain = Composer::default().compose(&tokens).unwrap();
        let config = ComposerConfig { feature_attributes: true };
        let rich = Composer::new(Taxonomy::hdt(), config).compose(&tokens).unwrap();

        for fs in [&plain, &rich] {
            assert_eq!(lookup_text(fs, &["ROOT", "OBL", "CASE", "PRED"]).as_deref(), Some("ZU"));
        }
        assert_eq!(plain.lookup(&["ROOT", "OBL"]), rich.lookup(&["ROOT", "OBL"]));
    }

    #[test]
    fn test_rejections() {
        let composer = Composer::default();

        let mut fatal = hans_isst_einen_apfel();
        fatal[4].deprel = "vocative".into();
        assert!(matches!(
            composer.compose(&fatal),
            Err(Rejection::UnsupportedRelation { scope: Scope::Sentence, .. })
        ));

        // The object hangs off the dropped punctuation token
        let mut dangling = hans_isst_einen_apfel();
        dangling[3].head = TokenId(5);
        assert_eq!(
            composer.compose(&dangling),
            Err(Rejection::DanglingHead { id: TokenId(4), head: TokenId(5) })
        );

        assert_eq!(composer.compose(&[]), Err(Rejection::MissingRoot));
        assert_eq!(Rejection::MissingRoot.kind(), "missing-root");
    }

    #[test]
    fn test_batch_keeps_input_order() {
        let good = Sentence {
            id: lfg_protocol::SentenceId(0),
            sent_id: Some("good".into()),
            text: None,
            tokens: hans_isst_einen_apfel(),
        };
        let bad = Sentence {
            id: lfg_protocol::SentenceId(1),
            sent_id: None,
            text: None,
            tokens: vec![TokenRecord::new(1, "Hey", "hey", Upos::Intj, 0, "discourse")],
        };

        let results = Composer::default().compose_batch(&[good.clone(), bad, good]);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert_eq!(results[0], results[2]);
    }
}
