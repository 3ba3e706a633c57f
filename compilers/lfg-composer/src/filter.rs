use lfg_protocol::TokenRecord;

use crate::taxonomy::{Class, Scope, Taxonomy};
use crate::Rejection;

/// Accepts, trims or rejects a raw sentence.
///
/// Returns the kept tokens in input order together with their class.
/// Token-droppable relations are removed; a sentence-fatal or unknown
/// relation rejects the whole sentence.
pub fn filter_sentence<'s>(
    taxonomy: &Taxonomy,
    tokens: &'s [TokenRecord],
) -> Result<Vec<(&'s TokenRecord, Class)>, Rejection> {
    let mut kept = Vec::with_capacity(tokens.len());

    for token in tokens {
        match taxonomy.classify(&token.deprel) {
            None => {
                return Err(Rejection::UnknownRelation {
                    id: token.id,
                    deprel: token.deprel.clone(),
                })
            }
            Some(Class::Unsupported(Scope::Sentence)) => {
                return Err(Rejection::UnsupportedRelation {
                    id: token.id,
                    deprel: token.deprel.clone(),
                    scope: Scope::Sentence,
                })
            }
            Some(Class::Unsupported(Scope::Token)) => {
                tracing::trace!(id = %token.id, deprel = %token.deprel, "dropping token");
            }
            Some(class) => kept.push((token, class)),
        }
    }

    Ok(kept)
}
