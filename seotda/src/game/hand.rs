//! Two-card hand ranking.
//!
//! Every hand ranks into a numeric tier; higher tiers win. A handful of
//! special hands sit outside the tier order: their numeric tier is only
//! used for display, and their real precedence comes from a small set of
//! dominance rules checked before any tier comparison.

use serde::Serialize;
use std::fmt;

use super::entities::{Card, CardKind};

/// Tier of the 1-3 / 1-8 kwang pairs.
const GWANG_DDAENG: u32 = 2000;
/// Tier of the lowest month pair (two month-1 cards).
const DDAENG_MIN: u32 = 1010;
/// Tier of the highest month pair (two month-10 cards, "jang-ddaeng").
const DDAENG_MAX: u32 = 1100;

/// Special hands whose precedence is decided by [`special_match`]
/// rather than by tier.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialHand {
    /// Month-4 yeol with month-7 yeol. Captures the two-kwang hands,
    /// but not the 3-8 pair.
    Amhaeng,
    /// Month-3 kwang with month-7 yeol. Beats every month pair below
    /// jang-ddaeng.
    Ddangjab,
    /// Months 4 and 9, both yeol. Beats anything up to and including
    /// jang-ddaeng.
    MungSa,
    /// Months 4 and 9 otherwise. Carries no dominance rule of its own.
    SaGu,
}

/// The ranked value of a two-card hand.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct HandRank {
    pub tier: u32,
    pub name: &'static str,
    /// Set when the hand is one of the rule-driven specials. The tier
    /// of such a hand is display-only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special: Option<SpecialHand>,
}

impl HandRank {
    const fn plain(tier: u32, name: &'static str) -> Self {
        Self {
            tier,
            name,
            special: None,
        }
    }

    const fn special(tier: u32, name: &'static str, kind: SpecialHand) -> Self {
        Self {
            tier,
            name,
            special: Some(kind),
        }
    }

    #[must_use]
    pub fn is_special(&self) -> bool {
        self.special.is_some()
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Month-pair names, indexed by month.
const DDAENG_NAMES: [&str; 11] = [
    "",
    "bbing-ddaeng",
    "i-ddaeng",
    "sam-ddaeng",
    "sa-ddaeng",
    "o-ddaeng",
    "yuk-ddaeng",
    "chil-ddaeng",
    "pal-ddaeng",
    "gu-ddaeng",
    "jang-ddaeng",
];

/// Names of the digit hands, indexed by (m1 + m2) mod 10.
const KKUT_NAMES: [&str; 10] = [
    "mang-tong",
    "1-kkut",
    "2-kkut",
    "3-kkut",
    "4-kkut",
    "5-kkut",
    "6-kkut",
    "7-kkut",
    "8-kkut",
    "gab-o",
];

/// Rank a two-card hand. Pure; the same hand always ranks the same.
#[must_use]
pub fn rank(hand: &[Card; 2]) -> HandRank {
    let (m1, m2) = (hand[0].month, hand[1].month);
    let has = |month, kind| hand.iter().any(|c| c.month == month && c.kind == kind);

    let kwang1 = has(1, CardKind::Kwang);
    let kwang3 = has(3, CardKind::Kwang);
    let kwang8 = has(8, CardKind::Kwang);

    if kwang3 && kwang8 {
        return HandRank::plain(3800, "38-gwang-ddaeng");
    }
    if kwang1 && kwang3 {
        return HandRank::plain(GWANG_DDAENG, "13-gwang-ddaeng");
    }
    if kwang1 && kwang8 {
        return HandRank::plain(GWANG_DDAENG, "18-gwang-ddaeng");
    }

    if m1 == m2 {
        return HandRank::plain(1000 + u32::from(m1) * 10, DDAENG_NAMES[m1 as usize]);
    }

    let yeol4 = has(4, CardKind::Yeol);
    let yeol7 = has(7, CardKind::Yeol);

    if yeol4 && yeol7 {
        return HandRank::special(1, "amhaengeosa", SpecialHand::Amhaeng);
    }
    if kwang3 && yeol7 {
        return HandRank::special(0, "ddaeng-jabi", SpecialHand::Ddangjab);
    }

    let months = if m1 <= m2 { (m1, m2) } else { (m2, m1) };

    if months == (4, 9) {
        if yeol4 && has(9, CardKind::Yeol) {
            return HandRank::special(2, "mung-gusa", SpecialHand::MungSa);
        }
        return HandRank::special(2, "gusa", SpecialHand::SaGu);
    }

    match months {
        (1, 2) => return HandRank::plain(900, "ali"),
        (1, 4) => return HandRank::plain(800, "dok-sa"),
        (1, 9) => return HandRank::plain(700, "gu-bbing"),
        (1, 10) => return HandRank::plain(600, "jang-bbing"),
        (4, 10) => return HandRank::plain(500, "jang-sa"),
        (4, 6) => return HandRank::plain(400, "se-ryuk"),
        _ => {}
    }

    let sum = (u32::from(m1) + u32::from(m2)) % 10;
    HandRank::plain(sum, KKUT_NAMES[sum as usize])
}

/// Which operand a special-rule comparison decided for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SpecialOutcome {
    First,
    Second,
}

/// Apply the special-hand dominance rules to a pair of ranks. Returns
/// `None` when no rule applies and the caller should fall back to tier
/// comparison. The rules are asymmetric on purpose: each special kind
/// dominates only a fixed tier range, and the first operand's rules are
/// checked before the second's.
#[must_use]
pub fn special_match(a: &HandRank, b: &HandRank) -> Option<SpecialOutcome> {
    use SpecialHand::{Amhaeng, Ddangjab, MungSa};

    // amhaengeosa captures the two-kwang hands, but not 38-gwang-ddaeng
    if a.special == Some(Amhaeng) && b.tier == GWANG_DDAENG {
        return Some(SpecialOutcome::First);
    }
    if b.special == Some(Amhaeng) && a.tier == GWANG_DDAENG {
        return Some(SpecialOutcome::Second);
    }

    // ddaeng-jabi beats every month pair below jang-ddaeng
    if a.special == Some(Ddangjab) && (DDAENG_MIN..DDAENG_MAX).contains(&b.tier) {
        return Some(SpecialOutcome::First);
    }
    if b.special == Some(Ddangjab) && (DDAENG_MIN..DDAENG_MAX).contains(&a.tier) {
        return Some(SpecialOutcome::Second);
    }

    // mung-gusa beats anything up to and including jang-ddaeng
    if a.special == Some(MungSa) && b.tier <= DDAENG_MAX {
        return Some(SpecialOutcome::First);
    }
    if b.special == Some(MungSa) && a.tier <= DDAENG_MAX {
        return Some(SpecialOutcome::Second);
    }

    None
}

/// Fold a slice of ranks down to the winners: pairwise special rules
/// first, tier comparison second, carrying the current best forward.
/// The returned indices are the hands whose tier equals the winning
/// hand's tier, in input order.
#[must_use]
pub fn select_winners(ranks: &[HandRank]) -> Vec<usize> {
    if ranks.is_empty() {
        return Vec::new();
    }

    let mut best = 0;
    for (i, rank) in ranks.iter().enumerate().skip(1) {
        match special_match(&ranks[best], rank) {
            Some(SpecialOutcome::First) => {}
            Some(SpecialOutcome::Second) => best = i,
            None if rank.tier > ranks[best].tier => best = i,
            None => {}
        }
    }

    let best_tier = ranks[best].tier;
    ranks
        .iter()
        .enumerate()
        .filter(|(_, r)| r.tier == best_tier)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(month: u8, kind: CardKind) -> Card {
        Card::new(month, kind)
    }

    fn kwang(month: u8) -> Card {
        card(month, CardKind::Kwang)
    }

    fn yeol(month: u8) -> Card {
        card(month, CardKind::Yeol)
    }

    fn pi(month: u8) -> Card {
        card(month, CardKind::Pi)
    }

    // === Tier Table ===

    #[test]
    fn test_38_gwang_ddaeng_is_top() {
        let r = rank(&[kwang(3), kwang(8)]);
        assert_eq!(r.tier, 3800);
        assert!(!r.is_special());
    }

    #[test]
    fn test_38_beats_13() {
        let top = rank(&[kwang(3), kwang(8)]);
        let lesser = rank(&[kwang(1), kwang(3)]);
        assert_eq!(special_match(&top, &lesser), None);
        assert!(top.tier > lesser.tier);
    }

    #[test]
    fn test_kwang_pairs_share_a_tier() {
        assert_eq!(rank(&[kwang(1), kwang(3)]).tier, 2000);
        assert_eq!(rank(&[kwang(8), kwang(1)]).tier, 2000);
    }

    #[test]
    fn test_month_pairs() {
        assert_eq!(rank(&[pi(1), kwang(1)]).tier, 1010);
        assert_eq!(rank(&[yeol(5), pi(5)]).tier, 1050);
        let jang = rank(&[yeol(10), pi(10)]);
        assert_eq!(jang.tier, 1100);
        assert_eq!(jang.name, "jang-ddaeng");
    }

    #[test]
    fn test_named_two_month_hands() {
        assert_eq!(rank(&[kwang(1), yeol(2)]).name, "ali");
        assert_eq!(rank(&[kwang(1), yeol(2)]).tier, 900);
        assert_eq!(rank(&[pi(1), pi(4)]).tier, 800);
        assert_eq!(rank(&[pi(9), pi(1)]).tier, 700);
        assert_eq!(rank(&[pi(10), pi(1)]).tier, 600);
        assert_eq!(rank(&[pi(10), pi(4)]).tier, 500);
        assert_eq!(rank(&[pi(6), pi(4)]).tier, 400);
    }

    #[test]
    fn test_digit_hands() {
        let gabo = rank(&[pi(4), yeol(5)]);
        assert_eq!(gabo.tier, 9);
        assert_eq!(gabo.name, "gab-o");

        let mangtong = rank(&[pi(3), yeol(7)]);
        assert_eq!(mangtong.tier, 0);
        assert_eq!(mangtong.name, "mang-tong");
    }

    #[test]
    fn test_rank_is_order_independent() {
        let a = rank(&[kwang(3), yeol(7)]);
        let b = rank(&[yeol(7), kwang(3)]);
        assert_eq!(a, b);
    }

    // === Special Hands ===

    #[test]
    fn test_amhaeng_beats_kwang_pairs_but_not_38() {
        let amhaeng = rank(&[yeol(4), yeol(7)]);
        assert_eq!(amhaeng.special, Some(SpecialHand::Amhaeng));

        let one_three = rank(&[kwang(1), kwang(3)]);
        assert_eq!(
            special_match(&amhaeng, &one_three),
            Some(SpecialOutcome::First)
        );
        assert_eq!(
            special_match(&one_three, &amhaeng),
            Some(SpecialOutcome::Second)
        );

        let top = rank(&[kwang(3), kwang(8)]);
        assert_eq!(special_match(&amhaeng, &top), None);
        assert!(top.tier > amhaeng.tier);
    }

    #[test]
    fn test_ddangjab_beats_lesser_pairs_but_not_jang() {
        let ddangjab = rank(&[kwang(3), yeol(7)]);
        assert_eq!(ddangjab.special, Some(SpecialHand::Ddangjab));

        let five_pair = rank(&[yeol(5), pi(5)]);
        assert_eq!(
            special_match(&ddangjab, &five_pair),
            Some(SpecialOutcome::First)
        );

        // the maximum pair is out of reach; ddaeng-jabi falls back to
        // its display tier and loses
        let jang = rank(&[yeol(10), pi(10)]);
        assert_eq!(special_match(&ddangjab, &jang), None);
        assert!(jang.tier > ddangjab.tier);
    }

    #[test]
    fn test_mung_gusa_beats_every_pair() {
        let mung = rank(&[yeol(4), yeol(9)]);
        assert_eq!(mung.special, Some(SpecialHand::MungSa));

        let jang = rank(&[yeol(10), pi(10)]);
        assert_eq!(special_match(&mung, &jang), Some(SpecialOutcome::First));
        assert_eq!(special_match(&jang, &mung), Some(SpecialOutcome::Second));
    }

    #[test]
    fn test_plain_gusa_has_no_dominance() {
        let gusa = rank(&[yeol(4), pi(9)]);
        assert_eq!(gusa.special, Some(SpecialHand::SaGu));

        let five_pair = rank(&[yeol(5), pi(5)]);
        assert_eq!(special_match(&gusa, &five_pair), None);
        assert!(five_pair.tier > gusa.tier);
    }

    // === Winner Selection ===

    #[test]
    fn test_select_winners_by_tier() {
        let ranks = vec![
            rank(&[pi(3), yeol(7)]),  // mang-tong
            rank(&[yeol(5), pi(5)]),  // o-ddaeng
            rank(&[pi(4), yeol(5)]),  // gab-o
        ];
        assert_eq!(select_winners(&ranks), vec![1]);
    }

    #[test]
    fn test_select_winners_tie_set_in_input_order() {
        let ranks = vec![
            rank(&[pi(4), yeol(5)]), // gab-o
            rank(&[pi(2), yeol(7)]), // gab-o
            rank(&[pi(3), pi(6)]),   // gab-o
        ];
        assert_eq!(select_winners(&ranks), vec![0, 1, 2]);
    }

    #[test]
    fn test_select_winners_special_override() {
        let ranks = vec![
            rank(&[yeol(10), pi(10)]), // jang-ddaeng
            rank(&[yeol(4), yeol(9)]), // mung-gusa
        ];
        assert_eq!(select_winners(&ranks), vec![1]);
    }

    #[test]
    fn test_select_winners_empty() {
        assert!(select_winners(&[]).is_empty());
    }
}
