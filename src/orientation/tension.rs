//! Structural tension: the weaker of the two quality scores, plus a narrative.

use super::quality::{score_reality, score_vision};
use super::types::{StructuralTension, TensionTier};
use crate::patterns::PatternDictionary;

/// Tier selection, first match wins.
pub fn tier_for(vision_score: i32, reality_score: i32) -> TensionTier {
    let tension = vision_score.min(reality_score);
    if tension >= 8 {
        TensionTier::Excellent
    } else if tension >= 6 {
        TensionTier::Good
    } else if vision_score < reality_score {
        TensionTier::VisionNeedsWork
    } else if reality_score < vision_score {
        TensionTier::RealityNeedsWork
    } else {
        TensionTier::BothNeedRefinement
    }
}

pub fn narrative(tier: TensionTier, dict: &PatternDictionary) -> String {
    let tiers = dict.tension_tiers();
    match tier {
        TensionTier::Excellent => tiers.excellent.clone(),
        TensionTier::Good => tiers.good.clone(),
        TensionTier::VisionNeedsWork => tiers.vision_needs_work.clone(),
        TensionTier::RealityNeedsWork => tiers.reality_needs_work.clone(),
        TensionTier::BothNeedRefinement => tiers.both_need_refinement.clone(),
    }
}

/// Score both sides and combine them.
pub fn calculate(vision: &str, current_reality: &str, dict: &PatternDictionary) -> StructuralTension {
    let vision_score = score_vision(vision, dict);
    let reality_score = score_reality(current_reality, dict);
    let tier = tier_for(vision_score, reality_score);
    let tension = vision_score.min(reality_score);
    tracing::debug!(vision_score, reality_score, tension, ?tier, "structural tension");

    StructuralTension {
        vision: vision.to_string(),
        current_reality: current_reality.to_string(),
        vision_score,
        reality_score,
        tension,
        tier,
        energy: narrative(tier, dict),
    }
}
