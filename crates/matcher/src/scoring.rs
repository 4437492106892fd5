//! Three-pass lexical scoring of one product against one listing.
//!
//! | Pass | Product field | Listing field | Partial match | Positional bonus |
//! |------|---------------|---------------|---------------|------------------|
//! | [`Pass::Manufacturer`] | manufacturer | manufacturer | prefix/suffix | harmonic, by rank |
//! | [`Pass::Model`] | model | title | no | harmonic, symmetric |
//! | [`Pass::Family`] | family | title | no | none |
//!
//! The passes run in that order and add `pass score * pass weight` to a
//! running total. The manufacturer pass doubles as a filter: when the
//! running total is not strictly positive after it, the pair is rejected
//! and the model and family passes are never computed.
//!
//! Two behaviours are kept for compatibility with existing result sets:
//! in the manufacturer pass the *last* qualifying listing word wins, and a
//! word's pair-distance delta is measured to the *last* later matched word
//! rather than the nearest one.

use canonical::{Interner, Token};
use serde::{Deserialize, Serialize};

use crate::types::{Listing, MatchConfig, Product};

const SUBSTRING_WEIGHT: f32 = 50.0;
const PAIR_DISTANCE_WEIGHT: f32 = 25.0;
const POSITIONAL_WEIGHT: f32 = 50.0;
const UNMATCHED_WORD_PENALTY: f32 = 0.04;
const EXTRANEOUS_WORD_PENALTY: f32 = 0.1;

/// One scoring stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pass {
    Manufacturer,
    Model,
    Family,
}

impl Pass {
    /// Whether a listing word may match by prefix or suffix.
    pub fn allows_partial(self) -> bool {
        matches!(self, Pass::Manufacturer)
    }

    pub fn weight(self, cfg: &MatchConfig) -> f32 {
        match self {
            Pass::Manufacturer => cfg.manufacturer_weight,
            Pass::Model => cfg.model_weight,
            Pass::Family => cfg.family_weight,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Pass::Manufacturer => "manufacturer",
            Pass::Model => "model",
            Pass::Family => "family",
        }
    }
}

/// Scratch state for one product word during a single field comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatchInfo {
    pub matched: bool,
    /// `len(product word) / len(listing word)`.
    pub substring_ratio: f32,
    /// Index of the matched word in the listing field.
    pub matched_position: usize,
    /// Matched position minus the product word's own position.
    pub position_delta: i32,
    pub pair_distance_delta: i32,
    pub positional_bonus: f32,
}

/// Per-word match records plus which listing positions were consumed.
#[derive(Debug, Clone, Default)]
pub(crate) struct FieldMatch {
    pub(crate) infos: Vec<MatchInfo>,
    pub(crate) used: Vec<bool>,
}

impl FieldMatch {
    fn unused_listing_words(&self) -> usize {
        self.used.iter().filter(|used| !**used).count()
    }
}

/// Weighted per-pass contributions for one (product, listing) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub manufacturer: f32,
    /// `None` when the manufacturer filter rejected the pair.
    pub model: Option<f32>,
    pub family: Option<f32>,
    pub total: f32,
    pub accepted_by_manufacturer: bool,
}

fn words_match(product: &str, listing: &str, pass: Pass) -> bool {
    if product == listing {
        return true;
    }
    pass.allows_partial()
        && listing.len() >= product.len()
        && (listing.starts_with(product) || listing.ends_with(product))
}

/// Steps 1 and 2: find a listing word for every product word, then link
/// matched words to later matches.
pub(crate) fn match_field(
    product: &[Token],
    listing: &[Token],
    pass: Pass,
    interner: &Interner,
) -> FieldMatch {
    let mut infos = vec![MatchInfo::default(); product.len()];
    let mut used = vec![false; listing.len()];

    for (product_pos, &product_token) in product.iter().enumerate() {
        let product_word = interner.resolve(product_token);
        let info = &mut infos[product_pos];

        for (listing_pos, &listing_token) in listing.iter().enumerate() {
            let listing_word = interner.resolve(listing_token);
            let qualifies =
                product_token == listing_token || words_match(product_word, listing_word, pass);
            if !qualifies {
                continue;
            }

            info.matched = true;
            info.substring_ratio = product_word.len() as f32 / listing_word.len() as f32;
            info.matched_position = listing_pos;
            info.position_delta = listing_pos as i32 - product_pos as i32;
            used[listing_pos] = true;

            if pass != Pass::Manufacturer {
                break;
            }
        }
    }

    for i in 0..infos.len() {
        if !infos[i].matched {
            continue;
        }
        for j in (i + 1)..infos.len() {
            if infos[j].matched {
                infos[i].pair_distance_delta =
                    infos[j].matched_position as i32 - infos[i].matched_position as i32;
            }
        }
    }

    FieldMatch { infos, used }
}

fn harmonic_bonus(rank: usize) -> f32 {
    POSITIONAL_WEIGHT * (1.0 / (rank as f32 + 1.0))
}

/// Step 3. Returns the sum of all assigned bonuses.
pub(crate) fn assign_positional_bonuses(infos: &mut [MatchInfo], pass: Pass) -> f32 {
    let mut total = 0.0f32;
    match pass {
        Pass::Manufacturer => {
            for (rank, info) in infos.iter_mut().enumerate() {
                let bonus = harmonic_bonus(rank);
                info.positional_bonus = bonus;
                total += bonus;
            }
        }
        Pass::Model => {
            let n = infos.len();
            for rank in 0..n / 2 {
                let bonus = harmonic_bonus(rank);
                infos[rank].positional_bonus = bonus;
                infos[n - rank - 1].positional_bonus = bonus;
                total += bonus;
            }
            total *= 2.0;
            if n % 2 == 1 {
                let mid = n / 2;
                let bonus = harmonic_bonus(mid);
                infos[mid].positional_bonus = bonus;
                total += bonus;
            }
        }
        Pass::Family => {}
    }
    total
}

/// `delta + 1` for non-negative deltas, `delta - 1` otherwise; never zero.
fn signed_offset(delta: i32) -> f32 {
    if delta < 0 {
        delta as f32 - 1.0
    } else {
        delta as f32 + 1.0
    }
}

fn raw_score(infos: &[MatchInfo], pass: Pass) -> f32 {
    let mut score = 0.0f32;
    for info in infos.iter().filter(|info| info.matched) {
        score += SUBSTRING_WEIGHT * info.substring_ratio;
        score += if pass == Pass::Manufacturer {
            info.positional_bonus * (1.0 / signed_offset(info.position_delta))
        } else {
            info.positional_bonus
        };
        score += PAIR_DISTANCE_WEIGHT * (1.0 / signed_offset(info.pair_distance_delta));
    }
    score
}

/// Unweighted score of one pass. Typically in `[-k, 1]`; unmatched words
/// and extraneous manufacturer words push it below zero.
pub fn pass_score(product: &[Token], listing: &[Token], pass: Pass, interner: &Interner) -> f32 {
    let mut field = match_field(product, listing, pass, interner);
    let bonus_total = assign_positional_bonuses(&mut field.infos, pass);
    let max_score =
        (SUBSTRING_WEIGHT + PAIR_DISTANCE_WEIGHT) * field.infos.len() as f32 + bonus_total;

    let mut score = raw_score(&field.infos, pass);
    if pass == Pass::Model {
        for info in field.infos.iter().filter(|info| !info.matched) {
            score -= info.positional_bonus;
        }
    }

    score = if max_score > 0.0 { score / max_score } else { 0.0 };

    let unmatched = field.infos.iter().filter(|info| !info.matched).count();
    for _ in 0..unmatched {
        score -= UNMATCHED_WORD_PENALTY;
    }

    if pass == Pass::Manufacturer {
        score -= field.unused_listing_words() as f32 * EXTRANEOUS_WORD_PENALTY;
    }

    score
}

/// Run every pass for one pair and report the weighted contributions.
pub fn score_pair(
    product: &Product,
    listing: &Listing,
    interner: &Interner,
    cfg: &MatchConfig,
) -> ScoreBreakdown {
    let manufacturer = pass_score(
        product.manufacturer.as_slice(),
        listing.manufacturer.as_slice(),
        Pass::Manufacturer,
        interner,
    ) * Pass::Manufacturer.weight(cfg);

    let mut total = manufacturer;
    if total <= 0.0 {
        return ScoreBreakdown {
            manufacturer,
            model: None,
            family: None,
            total,
            accepted_by_manufacturer: false,
        };
    }

    let model = pass_score(
        product.model.as_slice(),
        listing.title.as_slice(),
        Pass::Model,
        interner,
    ) * Pass::Model.weight(cfg);
    total += model;

    let family = pass_score(
        product.family.as_slice(),
        listing.title.as_slice(),
        Pass::Family,
        interner,
    ) * Pass::Family.weight(cfg);
    total += family;

    ScoreBreakdown {
        manufacturer,
        model: Some(model),
        family: Some(family),
        total,
        accepted_by_manufacturer: true,
    }
}

/// Final weight of the pair, or `None` when the manufacturer filter rejects it.
pub fn score_listing(
    product: &Product,
    listing: &Listing,
    interner: &Interner,
    cfg: &MatchConfig,
) -> Option<f32> {
    let breakdown = score_pair(product, listing, interner, cfg);
    breakdown.accepted_by_manufacturer.then_some(breakdown.total)
}
