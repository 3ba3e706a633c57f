use lfg_protocol::Upos;

use crate::function::Function;
use crate::node::Node;
use crate::value::{FValue, Predicate, PRED};

/// Pronoun abstraction.
pub const PRO: &str = "PRO";

/// Finalizes the PRED of `node` once all of its dependants are merged.
///
/// Pronouns become `PRO`; heads with arguments get an argument frame;
/// everything else is reduced to the bare lemma. Functions whose value is
/// already final (DEF, CASE, COORD and the markers) are left untouched.
pub fn finalize(node: &mut Node) {
    if node.upos == Upos::Pron && node.function != Function::Spec {
        node.value.head_mut().set(PRED, FValue::atom(PRO));
        return;
    }

    if node.function.keeps_value() {
        return;
    }

    let target = node.value.head_mut();
    let pred = if node.arguments.is_empty() {
        Predicate::bare(node.lemma.clone())
    } else {
        let lemma = match target.get(PRED) {
            Some(FValue::Pred(open)) => open.lemma.clone(),
            _ => node.lemma.clone(),
        };
        Predicate::with_args(lemma, node.arguments.clone())
    };
    target.set(PRED, FValue::Pred(pred));
}
