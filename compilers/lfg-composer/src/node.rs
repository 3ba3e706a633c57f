use lfg_protocol::{Features, TokenId, TokenRecord, Upos};

use crate::function::Function;
use crate::taxonomy::{Class, Scope, Taxonomy};
use crate::value::{AttrMap, FValue, NodeValue, Predicate, PRED};
use crate::Rejection;

/// Marker carried by open complements: the subject is controlled from above.
pub const CONTROLLED_SUBJECT: (&str, &str) = ("SSUBJ", "(SUBJ^)");

/// A token with its conversion state during composition.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: TokenId,
    pub form: String,
    pub lemma: String,
    pub upos: Upos,
    pub feats: Option<Features>,
    pub head: TokenId,
    pub deprel: String,
    pub class: Class,
    pub function: Function,
    pub value: NodeValue,
    pub is_argument: bool,
    /// Indices into the sentence's node list, in sibling order.
    pub dependants: Vec<usize>,
    /// Argument functions collected from dependants, in merge order.
    pub arguments: Vec<Function>,
    /// Attributes filled from FEATS rather than from a dependant.
    pub projected: Vec<&'static str>,
}

/// Result of converting a single token.
struct Conversion {
    function: Function,
    value: NodeValue,
}

impl Conversion {
    fn map(function: Function, map: AttrMap) -> Self {
        Self { function, value: NodeValue::Map(map) }
    }

    fn template(function: Function, lemma: &str) -> Self {
        Self::map(function, pred_template(lemma))
    }

    fn listed(function: Function, map: AttrMap) -> Self {
        Self { function, value: NodeValue::single_item(map) }
    }

    fn atom(function: Function, text: String) -> Self {
        Self::map(function, AttrMap::new().with(PRED, FValue::Atom(text)))
    }
}

fn pred_template(lemma: &str) -> AttrMap {
    AttrMap::new().with(PRED, FValue::Pred(Predicate::open(lemma)))
}

impl Node {
    /// Converts `token` into a node. Function, value and argument flag are
    /// fixed here and never reassigned. Unsupported relations have no
    /// conversion.
    pub fn convert(
        token: &TokenRecord,
        class: Class,
        taxonomy: &Taxonomy,
    ) -> Result<Self, Rejection> {
        let conversion = convert_token(token, class, taxonomy)?;
        Ok(Self {
            id: token.id,
            form: token.form.clone(),
            lemma: token.lemma.clone(),
            upos: token.upos,
            feats: token.feats.clone(),
            head: token.head,
            deprel: token.deprel.clone(),
            class,
            is_argument: conversion.function.is_argument(),
            function: conversion.function,
            value: conversion.value,
            dependants: Vec::new(),
            arguments: Vec::new(),
            projected: Vec::new(),
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.dependants.is_empty()
    }

    /// Copies CASE, GEN, NUM, PERS, MOOD, TENSE and ASP from the token's
    /// features onto the node's own description. A dependant with the same
    /// function later replaces the projected value.
    pub fn project_features(&mut self) {
        let attrs = lfg_morph::project(self.upos, self.feats.as_ref());
        let target = self.value.head_mut();
        for (attr, value) in attrs {
            if target.insert(attr, FValue::Atom(value)) {
                self.projected.push(attr);
            }
        }
    }
}

fn convert_token(
    token: &TokenRecord,
    class: Class,
    taxonomy: &Taxonomy,
) -> Result<Conversion, Rejection> {
    let conversion = match class {
        Class::Simple(function) => convert_simple(token, function),
        Class::Auxiliary => Conversion::atom(Function::Compound, format!("{}-", token.form)),
        Class::Determiner => convert_determiner(token, taxonomy),
        Class::Compound { particle: true } => {
            Conversion::atom(Function::Compound, format!("-{}", token.lemma))
        }
        Class::Compound { particle: false } => {
            Conversion::atom(Function::Compound, token.lemma.clone())
        }
        Class::ClausalModifier => Conversion::listed(Function::Adj, pred_template(&token.lemma)),
        Class::Expletive => Conversion::template(Function::ExplSubj, &token.lemma),
        Class::Copula => Conversion::template(Function::Cop, &token.form),
        Class::Conjunct(kind) => Conversion::listed(
            Function::Conjunct,
            pred_template(&token.lemma).with("COORD", FValue::atom(kind.as_str())),
        ),
        Class::Coordinator => Conversion::atom(Function::Coord, token.lemma.to_uppercase()),
        Class::Unsupported(scope) => {
            return Err(Rejection::UnsupportedRelation {
                id: token.id,
                deprel: token.deprel.clone(),
                scope,
            })
        }
    };
    Ok(conversion)
}

fn convert_simple(token: &TokenRecord, function: Function) -> Conversion {
    match function {
        Function::Case => Conversion::atom(Function::Case, lfg_morph::case_tag(token)),
        Function::Adj => Conversion::listed(Function::Adj, pred_template(&token.lemma)),
        Function::XComp => {
            let (key, marker) = CONTROLLED_SUBJECT;
            Conversion::map(
                Function::XComp,
                pred_template(&token.lemma).with(key, FValue::atom(marker)),
            )
        }
        other => Conversion::template(other, &token.lemma),
    }
}

fn convert_determiner(token: &TokenRecord, taxonomy: &Taxonomy) -> Conversion {
    match token.upos {
        Upos::Det => match taxonomy.definiteness(&token.lemma) {
            Some(definite) => {
                let flag = if definite { "+" } else { "-" };
                Conversion::map(Function::Def, AttrMap::new().with("BOOL", FValue::atom(flag)))
            }
            None => Conversion::template(Function::Spec, &token.lemma),
        },
        Upos::Pron => Conversion::template(Function::Poss, &token.lemma),
        // Numerals and other tags under `det` behave like unknown determiners
        _ => Conversion::template(Function::Spec, &token.lemma),
    }
}
