//! Union of quote collections keyed by quote text

use std::collections::HashMap;

use crate::models::{MergePolicy, Quote};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub quotes: Vec<Quote>,
    /// Incoming quotes whose text was not present before
    pub added: usize,
    /// Existing quotes whose category an incoming quote replaced
    pub recategorized: usize,
}

/// Union `local` and `incoming`, keeping first-seen order.
///
/// The result never holds two quotes with the same `identity_key`.
/// Duplicates inside `local` collapse as well. `policy` decides which
/// category survives when texts collide.
pub fn union(local: &[Quote], incoming: &[Quote], policy: MergePolicy) -> MergeReport {
    let mut quotes: Vec<Quote> = Vec::with_capacity(local.len() + incoming.len());
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut added = 0;
    let mut recategorized = 0;

    let tagged = local
        .iter()
        .map(|q| (false, q))
        .chain(incoming.iter().map(|q| (true, q)));

    for (from_incoming, quote) in tagged {
        match positions.get(quote.identity_key()) {
            Some(&pos) => {
                if policy == MergePolicy::LastWins && quotes[pos].category != quote.category {
                    quotes[pos].category = quote.category.clone();
                    if from_incoming {
                        recategorized += 1;
                    }
                }
            }
            None => {
                positions.insert(quote.identity_key(), quotes.len());
                quotes.push(quote.clone());
                if from_incoming {
                    added += 1;
                }
            }
        }
    }

    MergeReport {
        quotes,
        added,
        recategorized,
    }
}
