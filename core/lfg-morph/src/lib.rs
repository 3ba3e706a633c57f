#![no_std]

#[macro_use]
extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use lfg_protocol::{Features, TokenRecord, Upos};

/// UD features that surface as f-structure attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureAttribute {
    Case,
    Gender,
    Number,
    Person,
    Mood,
    Tense,
    Aspect,
}

impl FeatureAttribute {
    /// Projection order.
    pub const ALL: [FeatureAttribute; 7] = [
        FeatureAttribute::Case,
        FeatureAttribute::Gender,
        FeatureAttribute::Number,
        FeatureAttribute::Person,
        FeatureAttribute::Mood,
        FeatureAttribute::Tense,
        FeatureAttribute::Aspect,
    ];

    /// Name of the feature in the FEATS column.
    pub const fn ud_name(self) -> &'static str {
        match self {
            FeatureAttribute::Case => "Case",
            FeatureAttribute::Gender => "Gender",
            FeatureAttribute::Number => "Number",
            FeatureAttribute::Person => "Person",
            FeatureAttribute::Mood => "Mood",
            FeatureAttribute::Tense => "Tense",
            FeatureAttribute::Aspect => "Aspect",
        }
    }

    /// Attribute name in the f-structure.
    pub const fn attribute(self) -> &'static str {
        match self {
            FeatureAttribute::Case => "CASE",
            FeatureAttribute::Gender => "GEN",
            FeatureAttribute::Number => "NUM",
            FeatureAttribute::Person => "PERS",
            FeatureAttribute::Mood => "MOOD",
            FeatureAttribute::Tense => "TENSE",
            FeatureAttribute::Aspect => "ASP",
        }
    }
}

/// Only nominal and verbal heads carry feature-derived attributes.
pub fn bears_feature_attributes(upos: Upos) -> bool {
    matches!(upos, Upos::Noun | Upos::Verb | Upos::Pron | Upos::Propn)
}

/// Maps the FEATS of a token to `(ATTRIBUTE, VALUE)` pairs with uppercased values.
/// Features that are absent are skipped.
pub fn project(upos: Upos, feats: Option<&Features>) -> Vec<(&'static str, String)> {
    let feats = match feats {
        Some(feats) if bears_feature_attributes(upos) => feats,
        _ => return Vec::new(),
    };

    FeatureAttribute::ALL
        .iter()
        .filter_map(|attr| {
            feats
                .get(attr.ud_name())
                .map(|value| (attr.attribute(), value.to_uppercase()))
        })
        .collect()
}

/// Case tag of an adposition: its `Case` feature, or its lemma when the feature is missing.
pub fn case_tag(token: &TokenRecord) -> String {
    match token.feature(FeatureAttribute::Case.ud_name()) {
        Some(case) => case.to_uppercase(),
        None => token.lemma.to_uppercase(),
    }
}

/// Joins two lemma parts, `-`-prefixed parts attach as suffixes.
pub fn join_compound(head: &str, part: &str) -> String {
    if part.starts_with('-') {
        format!("{}{}", head, part)
    } else {
        format!("{}{}", part, head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use proptest::prelude::*;

    fn noun_feats() -> Features {
        [("Case", "Acc"), ("Gender", "Masc"), ("Number", "Sing"), ("Definite", "Ind")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_projection_keeps_attribute_order() {
        let feats = noun_feats();
        let attrs = project(Upos::Noun, Some(&feats));
        assert_eq!(
            attrs,
            vec![
                ("CASE", "ACC".to_string()),
                ("GEN", "MASC".to_string()),
                ("NUM", "SING".to_string()),
            ]
        );
    }

    #[test]
    fn test_projection_skips_other_tags() {
        let feats = noun_feats();
        assert!(project(Upos::Det, Some(&feats)).is_empty());
        assert!(project(Upos::Adj, Some(&feats)).is_empty());
        assert!(project(Upos::Noun, None).is_empty());
    }

    #[test]
    fn test_case_tag_falls_back_to_lemma() {
        let with_case = TokenRecord::new(2, "im", "in", Upos::Adp, 3, "case")
            .with_feats([("Case", "Dat")].into_iter().collect());
        let without = TokenRecord::new(2, "mit", "mit", Upos::Adp, 3, "case");

        assert_eq!(case_tag(&with_case), "DAT");
        assert_eq!(case_tag(&without), "MIT");
    }

    #[test]
    fn test_compound_orientation() {
        assert_eq!(join_compound("stehen", "-auf"), "stehen-auf");
        assert_eq!(join_compound("hof", "Bahn"), "Bahnhof");
        assert_eq!(join_compound("gegessen", "hat-"), "hat-gegessen");
    }

    proptest! {
        #[test]
        fn test_projected_values_are_uppercase(value in "[a-zA-Z]{1,8}", upos_idx in 0usize..4) {
            let upos = [Upos::Noun, Upos::Verb, Upos::Pron, Upos::Propn][upos_idx];
            let feats: Features = [("Tense", value.as_str())].into_iter().collect();

            let attrs = project(upos, Some(&feats));
            prop_assert_eq!(attrs.len(), 1);
            prop_assert_eq!(attrs[0].0, "TENSE");
            prop_assert_eq!(&attrs[0].1, &value.to_uppercase());
        }

        #[test]
        fn test_suffix_join_preserves_head(head in "[a-z]{1,10}", part in "[a-z]{1,6}") {
            let suffix = format!("-{}", part);
            let joined = join_compound(&head, &suffix);
            prop_assert!(joined.starts_with(head.as_str()));
            prop_assert!(joined.ends_with(suffix.as_str()));
        }
    }
}
