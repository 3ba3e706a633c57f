//! Classification of UD relation labels.
//!
//! A [`Taxonomy`] is built once (the bundled HDT tables, or a JSON file) and
//! shared read-only by every sentence.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::function::Function;

/// Default tag of a coordination before a `cc` dependant names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CoordKind {
    List,
    Parataxis,
}

impl CoordKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            CoordKind::List => "LIST",
            CoordKind::Parataxis => "PARATAXIS",
        }
    }
}

/// How much of the input an unsupported relation takes down with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Sentence,
    Token,
}

/// Conversion class of a relation label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Class {
    /// One-to-one mapping onto a grammatical function.
    Simple(Function),
    Auxiliary,
    Determiner,
    /// `particle` marks verb-particle compounds, which attach as suffixes.
    Compound { particle: bool },
    ClausalModifier,
    Expletive,
    Copula,
    Conjunct(CoordKind),
    Coordinator,
    Unsupported(Scope),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subtype {
    Auxiliary,
    Determiner,
    Compound,
    ClausalModifier,
    ComplexPredicate,
}

/// The four disjoint relation categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Simple,
    Complex(Subtype),
    Coordinant,
    Unsupported(Scope),
}

impl Class {
    pub const fn category(self) -> Category {
        match self {
            Class::Simple(_) => Category::Simple,
            Class::Auxiliary => Category::Complex(Subtype::Auxiliary),
            Class::Determiner => Category::Complex(Subtype::Determiner),
            Class::Compound { .. } => Category::Complex(Subtype::Compound),
            Class::ClausalModifier => Category::Complex(Subtype::ClausalModifier),
            Class::Expletive | Class::Copula => Category::Complex(Subtype::ComplexPredicate),
            Class::Conjunct(_) | Class::Coordinator => Category::Coordinant,
            Class::Unsupported(scope) => Category::Unsupported(scope),
        }
    }
}

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("failed to read taxonomy file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid taxonomy JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("relation '{deprel}' maps onto marker function {function}")]
    MarkerFunction { deprel: String, function: Function },

    #[error("taxonomy defines no relations")]
    Empty,
}

/// Relation classes plus the article lexicon used for determiners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    relations: BTreeMap<String, Class>,
    #[serde(default)]
    definite_articles: Vec<String>,
    #[serde(default)]
    indefinite_articles: Vec<String>,
}

const HDT_RELATIONS: &[(&str, Class)] = &[
    // simple
    ("root", Class::Simple(Function::Root)),
    ("nsubj", Class::Simple(Function::Subj)),
    ("nsubj:pass", Class::Simple(Function::Subj)),
    ("csubj", Class::Simple(Function::Subj)),
    ("csubj:pass", Class::Simple(Function::Subj)),
    ("obj", Class::Simple(Function::Obj)),
    ("expl:pv", Class::Simple(Function::Obj)),
    ("iobj", Class::Simple(Function::ObjInd)),
    ("obl", Class::Simple(Function::Obl)),
    ("obl:arg", Class::Simple(Function::Obl)),
    ("ccomp", Class::Simple(Function::Comp)),
    ("xcomp", Class::Simple(Function::XComp)),
    ("nmod", Class::Simple(Function::Adj)),
    ("amod", Class::Simple(Function::Adj)),
    ("advmod", Class::Simple(Function::Adj)),
    ("nmod:poss", Class::Simple(Function::Poss)),
    ("det:poss", Class::Simple(Function::Poss)),
    ("nummod", Class::Simple(Function::Spec)),
    ("case", Class::Simple(Function::Case)),
    // complex
    ("aux", Class::Auxiliary),
    ("aux:pass", Class::Auxiliary),
    ("det", Class::Determiner),
    ("flat", Class::Compound { particle: false }),
    ("flat:name", Class::Compound { particle: false }),
    ("compound", Class::Compound { particle: false }),
    ("compound:prt", Class::Compound { particle: true }),
    ("appos", Class::ClausalModifier),
    ("advcl", Class::ClausalModifier),
    ("acl", Class::ClausalModifier),
    ("expl", Class::Expletive),
    ("cop", Class::Copula),
    // coordinants
    ("conj", Class::Conjunct(CoordKind::List)),
    ("parataxis", Class::Conjunct(CoordKind::Parataxis)),
    ("cc", Class::Coordinator),
    // unsupported
    ("reparandum", Class::Unsupported(Scope::Sentence)),
    ("orphan", Class::Unsupported(Scope::Sentence)),
    ("vocative", Class::Unsupported(Scope::Sentence)),
    ("punct", Class::Unsupported(Scope::Token)),
    ("discourse", Class::Unsupported(Scope::Token)),
    ("mark", Class::Unsupported(Scope::Token)),
];

const HDT_DEFINITE: &[&str] = &["der", "die", "das", "des", "den", "dem"];
const HDT_INDEFINITE: &[&str] = &["ein", "eine", "eines", "einen", "einem"];

impl Taxonomy {
    /// Tables for the German HDT treebank.
    pub fn hdt() -> Self {
        Self {
            relations: HDT_RELATIONS
                .iter()
                .map(|(deprel, class)| (deprel.to_string(), *class))
                .collect(),
            definite_articles: HDT_DEFINITE.iter().map(|s| s.to_string()).collect(),
            indefinite_articles: HDT_INDEFINITE.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn from_json(input: &str) -> Result<Self, TaxonomyError> {
        let mut taxonomy: Taxonomy = serde_json::from_str(input)?;
        taxonomy.validate()?;
        for article in taxonomy
            .definite_articles
            .iter_mut()
            .chain(taxonomy.indefinite_articles.iter_mut())
        {
            *article = article.to_lowercase();
        }
        Ok(taxonomy)
    }

    pub fn load(path: &Path) -> Result<Self, TaxonomyError> {
        let input = fs::read_to_string(path)?;
        Self::from_json(&input)
    }

    fn validate(&self) -> Result<(), TaxonomyError> {
        if self.relations.is_empty() {
            return Err(TaxonomyError::Empty);
        }
        for (deprel, class) in &self.relations {
            if let Class::Simple(function) = class {
                if function.is_marker() {
                    return Err(TaxonomyError::MarkerFunction {
                        deprel: deprel.clone(),
                        function: *function,
                    });
                }
            }
        }
        Ok(())
    }

    /// `None` for labels outside every category.
    pub fn classify(&self, deprel: &str) -> Option<Class> {
        self.relations.get(deprel).copied()
    }

    pub fn category(&self, deprel: &str) -> Option<Category> {
        self.classify(deprel).map(Class::category)
    }

    /// `Some(true)` for definite, `Some(false)` for indefinite articles.
    pub fn definiteness(&self, lemma: &str) -> Option<bool> {
        let lemma = lemma.to_lowercase();
        if self.definite_articles.contains(&lemma) {
            Some(true)
        } else if self.indefinite_articles.contains(&lemma) {
            Some(false)
        } else {
            None
        }
    }

    pub fn relations(&self) -> impl Iterator<Item = (&str, Class)> {
        self.relations.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::hdt()
    }
}
