use std::fmt;

use serde::{Deserialize, Serialize};

/// Grammatical functions assigned to nodes during conversion.
///
/// The starred variants are markers that steer the merge rules; `*COORD` and
/// `*CPOUND` never survive into a composed f-structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Function {
    #[serde(rename = "ROOT")]
    Root,
    #[serde(rename = "SUBJ")]
    Subj,
    #[serde(rename = "OBJ")]
    Obj,
    #[serde(rename = "OBJ:IND")]
    ObjInd,
    #[serde(rename = "OBL")]
    Obl,
    #[serde(rename = "COMP")]
    Comp,
    #[serde(rename = "XCOMP")]
    XComp,
    #[serde(rename = "ADJ")]
    Adj,
    #[serde(rename = "POSS")]
    Poss,
    #[serde(rename = "SPEC")]
    Spec,
    #[serde(rename = "CASE")]
    Case,
    #[serde(rename = "DEF")]
    Def,
    #[serde(rename = "COP")]
    Cop,
    #[serde(rename = "COORD")]
    Coord,
    #[serde(rename = "*SUBJ")]
    ExplSubj,
    #[serde(rename = "*COORD")]
    Conjunct,
    #[serde(rename = "*CPOUND")]
    Compound,
}

impl Function {
    pub const fn as_str(self) -> &'static str {
        match self {
            Function::Root => "ROOT",
            Function::Subj => "SUBJ",
            Function::Obj => "OBJ",
            Function::ObjInd => "OBJ:IND",
            Function::Obl => "OBL",
            Function::Comp => "COMP",
            Function::XComp => "XCOMP",
            Function::Adj => "ADJ",
            Function::Poss => "POSS",
            Function::Spec => "SPEC",
            Function::Case => "CASE",
            Function::Def => "DEF",
            Function::Cop => "COP",
            Function::Coord => "COORD",
            Function::ExplSubj => "*SUBJ",
            Function::Conjunct => "*COORD",
            Function::Compound => "*CPOUND",
        }
    }

    /// Governable functions; these are framed into the head's PRED.
    pub const fn is_argument(self) -> bool {
        matches!(
            self,
            Function::Subj
                | Function::Obj
                | Function::ObjInd
                | Function::Obl
                | Function::Comp
                | Function::XComp
                | Function::Root
                | Function::ExplSubj
        )
    }

    /// Position on the functional hierarchy. Adjuncts and conjuncts come
    /// last so they see the head's value after every other dependant.
    pub const fn rank(self) -> u8 {
        match self {
            Function::Subj => 0,
            Function::Obj => 1,
            Function::ObjInd => 2,
            Function::Obl => 3,
            Function::Comp | Function::XComp => 4,
            Function::Adj | Function::Conjunct => 7,
            _ => 5,
        }
    }

    /// Functions whose value is already final after conversion, so the
    /// predicate formatter leaves them alone. Feature attributes (GEN, NUM,
    /// PERS, MOOD, TENSE, ASP) are plain attributes and never node functions.
    pub const fn keeps_value(self) -> bool {
        matches!(
            self,
            Function::Def
                | Function::Case
                | Function::Coord
                | Function::Conjunct
                | Function::Compound
        )
    }

    /// Markers that must not be produced by a one-to-one relation mapping.
    pub const fn is_marker(self) -> bool {
        matches!(self, Function::ExplSubj | Function::Conjunct | Function::Compound)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
