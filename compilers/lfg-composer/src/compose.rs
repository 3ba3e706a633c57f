use std::mem;

use crate::function::Function;
use crate::node::Node;
use crate::value::{FValue, NodeValue, Predicate, PRED};

/// What a finished dependant hands to its head.
#[derive(Debug, Clone)]
pub struct Contribution {
    pub function: Function,
    pub is_argument: bool,
    pub value: NodeValue,
}

impl Contribution {
    /// Moves the value out of a finished node. A node has exactly one head,
    /// so its value is taken once.
    pub fn take(node: &mut Node) -> Self {
        Self {
            function: node.function,
            is_argument: node.is_argument,
            value: mem::take(&mut node.value),
        }
    }
}

/// Merges one dependant into `head` according to the dependant's function.
pub fn merge(head: &mut Node, dependant: Contribution) {
    if dependant.is_argument {
        head.arguments.push(dependant.function);
    }

    match dependant.function {
        Function::Conjunct => {
            let mut items = mem::take(&mut head.value).into_list();
            items.extend(dependant.value.into_list());
            head.value = NodeValue::List(items);
        }
        Function::Coord => {
            let tag = dependant.value.pred_text().unwrap_or_default();
            if matches!(head.value, NodeValue::Map(_)) {
                tracing::debug!(head = %head.id, %tag, "coordinator outside a coordination");
            }
            head.value.head_mut().set("COORD", FValue::Atom(tag));
        }
        Function::Compound => {
            let part = dependant.value.pred_text().unwrap_or_default();
            let lemma = lfg_morph::join_compound(&head.lemma, &part);
            head.value
                .head_mut()
                .set(PRED, FValue::Pred(Predicate::open(lemma.clone())));
            head.form = lemma.clone();
            head.lemma = lemma;
        }
        Function::Adj => {
            let target = head.value.head_mut();
            match target.get_mut("ADJ") {
                Some(FValue::List(items)) => items.extend(dependant.value.into_list()),
                Some(_) => {
                    tracing::debug!(head = %head.id, "ADJ slot is not a list; adjunct dropped")
                }
                None => {
                    target.insert("ADJ", dependant.value.into_fvalue());
                }
            }
        }
        function => {
            let key = function.as_str();
            let value = dependant.value.into_fvalue();
            if let Some(pos) = head.projected.iter().position(|&attr| attr == key) {
                // Dependants take precedence over FEATS
                head.projected.swap_remove(pos);
                head.value.head_mut().set(key, value);
            } else if !head.value.head_mut().insert(key, value) {
                tracing::debug!(head = %head.id, %function, "duplicate function; first kept");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Taxonomy;
    use crate::value::AttrMap;
    use lfg_protocol::{TokenRecord, Upos};

    fn node(token: TokenRecord) -> Node {
        let tax = Taxonomy::hdt();
        let class = tax.classify(&token.deprel).unwrap();
        Node::convert(&token, class, &tax).unwrap()
    }

    fn pred_of(map: &AttrMap) -> String {
        map.get(PRED).and_then(FValue::text).unwrap()
    }

    #[test]
    fn test_particle_attaches_as_suffix() {
        let mut verb = node(TokenRecord::new(1, "steht", "stehen", Upos::Verb, 0, "root"));
        let mut prt = node(TokenRecord::new(3, "auf", "auf", Upos::Adp, 1, "compound:prt"));
        merge(&mut verb, Contribution::take(&mut prt));

        assert_eq!(verb.lemma, "stehen-auf");
        assert_eq!(verb.form, "stehen-auf");
        assert_eq!(pred_of(verb.value.head().unwrap()), "stehen-auf< >");
        assert!(verb.arguments.is_empty());
    }

    #[test]
    fn test_compound_attaches_as_prefix() {
        let mut noun = node(TokenRecord::new(2, "hof", "hof", Upos::Noun, 0, "root"));
        let mut part = node(TokenRecord::new(1, "Bahn", "Bahn", Upos::Noun, 2, "compound"));
        merge(&mut noun, Contribution::take(&mut part));
        assert_eq!(noun.lemma, "Bahnhof");
    }

    #[test]
    fn test_conjuncts_build_a_list() {
        let mut hans = node(TokenRecord::new(1, "Hans", "Hans", Upos::Propn, 0, "root"));
        let mut maria = node(TokenRecord::new(3, "Maria", "Maria", Upos::Propn, 1, "conj"));
        let mut peter = node(TokenRecord::new(5, "Peter", "Peter", Upos::Propn, 1, "conj"));
        merge(&mut hans, Contribution::take(&mut maria));
        merge(&mut hans, Contribution::take(&mut peter));

        let NodeValue::List(items) = &hans.value else {
            panic!("coordination must be a list");
        };
        assert_eq!(items.len(), 3);
        assert_eq!(pred_of(&items[0]), "Hans< >");
        assert_eq!(items[2].get("COORD"), Some(&FValue::atom("LIST")));
    }

    #[test]
    fn test_coordinator_overwrites_default_tag() {
        let mut maria = node(TokenRecord::new(3, "Maria", "Maria", Upos::Propn, 1, "conj"));
        let mut und = node(TokenRecord::new(2, "und", "und", Upos::Cconj, 3, "cc"));
        merge(&mut maria, Contribution::take(&mut und));

        assert_eq!(maria.value.head().unwrap().get("COORD"), Some(&FValue::atom("UND")));
        assert!(matches!(&maria.value, NodeValue::List(items) if items.len() == 1));
    }

    #[test]
    fn test_coordinator_on_plain_head() {
        let mut verb = node(TokenRecord::new(2, "ging", "gehen", Upos::Verb, 0, "root"));
        let mut und = node(TokenRecord::new(1, "Und", "und", Upos::Cconj, 2, "cc"));
        merge(&mut verb, Contribution::take(&mut und));
        assert_eq!(verb.value.head().unwrap().get("COORD"), Some(&FValue::atom("UND")));
    }

    #[test]
    fn test_adjuncts_accumulate() {
        let mut noun = node(TokenRecord::new(3, "Haus", "Haus", Upos::Noun, 0, "root"));
        let mut big = node(TokenRecord::new(1, "großes", "groß", Upos::Adj, 3, "amod"));
        let mut red = node(TokenRecord::new(2, "rotes", "rot", Upos::Adj, 3, "amod"));
        merge(&mut noun, Contribution::take(&mut big));
        merge(&mut noun, Contribution::take(&mut red));

        let adj = noun.value.head().unwrap().get("ADJ").and_then(FValue::as_list).unwrap();
        assert_eq!(adj.len(), 2);
        assert_eq!(pred_of(&adj[0]), "groß< >");
        assert_eq!(pred_of(&adj[1]), "rot< >");
    }

    #[test]
    fn test_adjunct_on_coordinated_head_targets_first_item() {
        let mut hans = node(TokenRecord::new(1, "Hans", "Hans", Upos::Propn, 0, "root"));
        let mut maria = node(TokenRecord::new(3, "Maria", "Maria", Upos::Propn, 1, "conj"));
        let mut adv = node(TokenRecord::new(4, "auch", "auch", Upos::Adv, 1, "advmod"));
        merge(&mut hans, Contribution::take(&mut maria));
        merge(&mut hans, Contribution::take(&mut adv));

        let items = hans.value.clone().into_list();
        assert!(items[0].contains_key("ADJ"));
        assert!(!items[1].contains_key("ADJ"));
    }

    #[test]
    fn test_arguments_nest_and_are_collected() {
        let mut verb = node(TokenRecord::new(2, "isst", "essen", Upos::Verb, 0, "root"));
        let mut subj = node(TokenRecord::new(1, "Hans", "Hans", Upos::Propn, 2, "nsubj"));
        let mut obj = node(TokenRecord::new(3, "Brot", "Brot", Upos::Noun, 2, "obj"));
        merge(&mut verb, Contribution::take(&mut subj));
        merge(&mut verb, Contribution::take(&mut obj));

        assert_eq!(verb.arguments, vec![Function::Subj, Function::Obj]);
        let map = verb.value.head().unwrap();
        assert!(map.get("SUBJ").and_then(FValue::as_map).is_some());
        assert!(map.get("OBJ").and_then(FValue::as_map).is_some());
    }

    #[test]
    fn test_duplicate_function_keeps_first() {
        let mut verb = node(TokenRecord::new(2, "sieht", "sehen", Upos::Verb, 0, "root"));
        let mut first = node(TokenRecord::new(1, "Hans", "Hans", Upos::Propn, 2, "nsubj"));
        let mut second = node(TokenRecord::new(3, "Peter", "Peter", Upos::Propn, 2, "nsubj"));
        merge(&mut verb, Contribution::take(&mut first));
        merge(&mut verb, Contribution::take(&mut second));

        let subj = verb.value.head().unwrap().get("SUBJ").and_then(FValue::as_map).unwrap();
        assert_eq!(pred_of(subj), "Hans< >");
        // Both still count as arguments
        assert_eq!(verb.arguments, vec![Function::Subj, Function::Subj]);
    }

    #[test]
    fn test_case_dependant_replaces_projected_case() {
        let feats = [("Case", "Dat"), ("Number", "Sing")].into_iter().collect();
        let mut noun = node(
            TokenRecord::new(4, "Bahnhof", "Bahnhof", Upos::Noun, 2, "obl").with_feats(feats),
        );
        noun.project_features();
        let mut zu = node(TokenRecord::new(3, "zu", "zu", Upos::Adp, 4, "case"));
        merge(&mut noun, Contribution::take(&mut zu));

        let map = noun.value.head().unwrap();
        let case = map.get("CASE").and_then(FValue::as_map).unwrap();
        assert_eq!(pred_of(case), "ZU");
        assert_eq!(map.get("NUM"), Some(&FValue::atom("SING")));
        assert_eq!(noun.projected, vec!["NUM"]);

        // A second case dependant is a real duplicate
        let mut von = node(TokenRecord::new(1, "von", "von", Upos::Adp, 4, "case"));
        merge(&mut noun, Contribution::take(&mut von));
        let case = noun.value.head().unwrap().get("CASE").and_then(FValue::as_map).unwrap();
        assert_eq!(pred_of(case), "ZU");
    }
}
