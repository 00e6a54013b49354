use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use strum_macros::EnumIter;

use crate::{hand_total, ConfigError, Decision};

/// A small set of hand totals or card values, all of them below 32.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValueSet(u32);

impl ValueSet {
    pub const EMPTY: ValueSet = ValueSet(0);

    pub const fn of(values: &[u16]) -> ValueSet {
        let mut bits = 0;
        let mut i = 0;
        while i < values.len() {
            bits |= 1 << values[i];
            i += 1;
        }
        ValueSet(bits)
    }

    pub fn contains(&self, value: u16) -> bool {
        value < 32 && self.0 & (1 << value) != 0
    }

    pub fn with(self, values: &[u16]) -> ValueSet {
        ValueSet(self.0 | Self::of(values).0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = u16> {
        (0..32).filter(move |&value| self.contains(value))
    }
}

/// The policy a player follows: a standing number `M`, the two-card totals
/// worth doubling `X` and the pairs worth splitting `Y`, all of them
/// depending on the dealer's up card.
pub trait Strategy {
    /// The player draws while the total of the hand is below this number.
    fn standing_number(&self, dealer_up_card: u8, soft: bool) -> u16;

    fn doubling_totals(&self, dealer_up_card: u8, soft: bool) -> ValueSet;

    fn splitting_cards(&self, dealer_up_card: u8) -> ValueSet;

    /// `split_card` is the value of the pair this hand came from, if it
    /// is one half of a split.
    fn make_decision(&self, dealer_up_card: u8, hand: &[u8], split_card: Option<u8>) -> Decision {
        let total = hand_total(hand);
        if total.is_bust() {
            return Decision::Stand;
        }

        if hand.len() == 2 {
            match split_card {
                None => {
                    if hand[0] == hand[1]
                        && self
                            .splitting_cards(dealer_up_card)
                            .contains(hand[0] as u16)
                    {
                        return Decision::Split;
                    }
                }
                // Split aces get exactly one card each.
                Some(1) => return Decision::Stand,
                Some(_) => {}
            }

            if self
                .doubling_totals(dealer_up_card, total.soft)
                .contains(total.total)
            {
                return Decision::Double;
            }
        }

        if total.total < self.standing_number(dealer_up_card, total.soft) {
            Decision::Hit
        } else {
            Decision::Stand
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, Serialize_enum_str, Deserialize_enum_str,
)]
pub enum StrategyPreset {
    #[serde(rename = "baldwin-optimum")]
    BaldwinOptimum,
    #[serde(rename = "culbertson")]
    Culbertson,
    #[serde(rename = "mimicdealer")]
    MimicDealer,
}

impl Default for StrategyPreset {
    fn default() -> Self {
        StrategyPreset::BaldwinOptimum
    }
}

impl StrategyPreset {
    pub fn from_name(name: &str) -> Result<StrategyPreset, ConfigError> {
        name.parse()
            .map_err(|_| ConfigError::UnknownStrategy(String::from(name)))
    }
}

impl Strategy for StrategyPreset {
    fn standing_number(&self, dealer_up_card: u8, soft: bool) -> u16 {
        match self {
            StrategyPreset::BaldwinOptimum => match (soft, dealer_up_card) {
                (false, 2..=3) => 13,
                (false, 4..=6) => 12,
                (false, _) => 17,
                (true, 1..=8) => 18,
                (true, _) => 19,
            },
            StrategyPreset::Culbertson => match (soft, dealer_up_card) {
                (false, 2..=6) => 14,
                (false, _) => 16,
                (true, _) => 18,
            },
            StrategyPreset::MimicDealer => 17,
        }
    }

    fn doubling_totals(&self, dealer_up_card: u8, soft: bool) -> ValueSet {
        if *self != StrategyPreset::BaldwinOptimum {
            return ValueSet::EMPTY;
        }

        let d = dealer_up_card;
        let mut totals = ValueSet::EMPTY;
        if !soft {
            if (2..=10).contains(&d) {
                totals = totals.with(&[11]);
            }
            if (2..=9).contains(&d) {
                totals = totals.with(&[10]);
            }
            if (2..=6).contains(&d) {
                totals = totals.with(&[9]);
            }
        } else {
            if (4..=6).contains(&d) {
                totals = totals.with(&[18]);
            }
            if (3..=6).contains(&d) {
                totals = totals.with(&[17]);
            }
            if (5..=6).contains(&d) {
                totals = totals.with(&[13, 14, 15, 16]);
            }
            if d == 5 {
                totals = totals.with(&[12]);
            }
        }
        totals
    }

    fn splitting_cards(&self, dealer_up_card: u8) -> ValueSet {
        let d = dealer_up_card;
        match self {
            StrategyPreset::BaldwinOptimum => {
                let mut cards = ValueSet::of(&[1, 8]);
                if (2..=6).contains(&d) || d == 8 || d == 9 {
                    cards = cards.with(&[9]);
                }
                if (2..=8).contains(&d) {
                    cards = cards.with(&[7]);
                }
                if (2..=7).contains(&d) {
                    cards = cards.with(&[2, 3, 6]);
                }
                if d == 5 {
                    cards = cards.with(&[4]);
                }
                cards
            }
            StrategyPreset::Culbertson => ValueSet::of(&[1]),
            StrategyPreset::MimicDealer => ValueSet::EMPTY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn can_parse_preset_names() {
        assert_eq!(
            StrategyPreset::from_name("baldwin-optimum"),
            Ok(StrategyPreset::BaldwinOptimum)
        );
        assert_eq!(
            StrategyPreset::from_name("culbertson"),
            Ok(StrategyPreset::Culbertson)
        );
        assert_eq!(
            StrategyPreset::from_name("mimicdealer"),
            Ok(StrategyPreset::MimicDealer)
        );
        assert_eq!(
            StrategyPreset::from_name("Culbertson"),
            Err(ConfigError::UnknownStrategy(String::from("Culbertson")))
        );
        assert!(StrategyPreset::from_name("basic").is_err());
        assert_eq!(StrategyPreset::default(), StrategyPreset::BaldwinOptimum);
        for preset in StrategyPreset::iter() {
            assert_eq!(StrategyPreset::from_name(&preset.to_string()), Ok(preset));
        }
    }

    #[test]
    fn test_baldwin_optimum_tables() {
        let s = StrategyPreset::BaldwinOptimum;
        assert_eq!(s.standing_number(2, false), 13);
        assert_eq!(s.standing_number(6, false), 12);
        assert_eq!(s.standing_number(1, false), 17);
        assert_eq!(s.standing_number(8, true), 18);
        assert_eq!(s.standing_number(9, true), 19);
        assert_eq!(s.standing_number(1, true), 18);

        assert_eq!(
            s.doubling_totals(5, false).iter().collect::<Vec<_>>(),
            vec![9, 10, 11]
        );
        assert_eq!(s.doubling_totals(10, false).iter().collect::<Vec<_>>(), vec![11]);
        assert!(s.doubling_totals(1, false).is_empty());
        assert_eq!(
            s.doubling_totals(5, true).iter().collect::<Vec<_>>(),
            vec![12, 13, 14, 15, 16, 17, 18]
        );
        assert_eq!(s.doubling_totals(3, true).iter().collect::<Vec<_>>(), vec![17]);

        assert_eq!(
            s.splitting_cards(5).iter().collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 6, 7, 8, 9]
        );
        assert_eq!(s.splitting_cards(7).iter().collect::<Vec<_>>(), vec![1, 2, 3, 6, 7, 8]);
        assert_eq!(s.splitting_cards(10).iter().collect::<Vec<_>>(), vec![1, 8]);
    }

    #[test]
    fn test_other_presets() {
        let c = StrategyPreset::Culbertson;
        let m = StrategyPreset::MimicDealer;
        for dealer_up_card in 1..=10 {
            assert!(c.doubling_totals(dealer_up_card, false).is_empty());
            assert!(m.doubling_totals(dealer_up_card, true).is_empty());
            assert_eq!(c.splitting_cards(dealer_up_card), ValueSet::of(&[1]));
            assert!(m.splitting_cards(dealer_up_card).is_empty());
            assert_eq!(m.standing_number(dealer_up_card, false), 17);
            assert_eq!(m.standing_number(dealer_up_card, true), 17);
            assert_eq!(c.standing_number(dealer_up_card, true), 18);
        }
        assert_eq!(c.standing_number(4, false), 14);
        assert_eq!(c.standing_number(7, false), 16);
        assert_eq!(c.standing_number(1, false), 16);
    }

    #[test]
    fn test_decision() {
        let s = StrategyPreset::BaldwinOptimum;
        assert_eq!(s.make_decision(5, &[8, 8], None), Decision::Split);
        assert_eq!(s.make_decision(10, &[5, 5], None), Decision::Hit);
        assert_eq!(s.make_decision(9, &[5, 5], None), Decision::Double);
        assert_eq!(s.make_decision(6, &[10, 2], None), Decision::Stand);
        assert_eq!(s.make_decision(7, &[10, 2], None), Decision::Hit);
        assert_eq!(s.make_decision(7, &[10, 2, 10], None), Decision::Stand);
        assert_eq!(s.make_decision(5, &[1, 7], None), Decision::Double);
        assert_eq!(s.make_decision(5, &[1, 2, 3], None), Decision::Hit);
        assert_eq!(s.make_decision(1, &[1, 7], None), Decision::Stand);

        // One level of splitting.
        assert_eq!(s.make_decision(5, &[8, 8], Some(8)), Decision::Stand);
        assert_eq!(s.make_decision(5, &[8, 3], Some(8)), Decision::Double);
        assert_eq!(s.make_decision(5, &[1, 2], Some(1)), Decision::Stand);
        assert_eq!(s.make_decision(10, &[8, 2], Some(8)), Decision::Hit);
    }
}
