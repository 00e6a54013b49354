use super::util::{Completion, ReplacementDraws};
use crate::{Deck, Strategy, CARD_VALUES};

pub const HARD_STARTS: std::ops::RangeInclusive<u16> = 2..=21;
pub const SOFT_STARTS: std::ops::RangeInclusive<u16> = 12..=21;

/// For one up card, the final totals of a player who starts on a partial
/// total and draws with replacement until reaching the standing number of
/// the current hand.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionTable {
    dealer_up_card: u8,
    rows: [[Completion; 22]; 2],
}

impl CompletionTable {
    pub fn new<S: Strategy + ?Sized>(deck: &Deck, strategy: &S, dealer_up_card: u8) -> Self {
        let mut draws = ReplacementDraws::new(deck, |total, soft| {
            total >= strategy.standing_number(dealer_up_card, soft)
        });

        let mut rows = [[[0.0; 22]; 22]; 2];
        for total in HARD_STARTS {
            rows[0][total as usize] = draws.completion(total, false);
        }
        for total in SOFT_STARTS {
            rows[1][total as usize] = draws.completion(total, true);
        }

        Self {
            dealer_up_card,
            rows,
        }
    }

    pub fn dealer_up_card(&self) -> u8 {
        self.dealer_up_card
    }

    /// Index 0 is bust, 1 to 21 the total the player stands on.
    pub fn get(&self, start_total: u16, soft: bool) -> &Completion {
        &self.rows[soft as usize][start_total as usize]
    }

    /// Rows in the order they are printed: hard starts, then soft starts.
    pub fn rows(&self) -> impl Iterator<Item = (u16, bool, &Completion)> + '_ {
        let hard = HARD_STARTS.map(move |total| (total, false, self.get(total, false)));
        let soft = SOFT_STARTS.map(move |total| (total, true, self.get(total, true)));
        hard.chain(soft)
    }
}

/// Completion tables for every up card.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionTables {
    tables: Vec<CompletionTable>,
}

impl CompletionTables {
    pub fn new<S: Strategy + ?Sized>(deck: &Deck, strategy: &S) -> Self {
        Self {
            tables: CARD_VALUES
                .iter()
                .map(|&dealer_up_card| CompletionTable::new(deck, strategy, dealer_up_card))
                .collect(),
        }
    }

    pub fn get(&self, dealer_up_card: u8) -> &CompletionTable {
        &self.tables[(dealer_up_card - 1) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StrategyPreset;
    use strum::IntoEnumIterator;

    #[test]
    fn rows_sum_to_one() {
        let deck = Deck::standard();
        for preset in StrategyPreset::iter() {
            let tables = CompletionTables::new(&deck, &preset);
            for dealer_up_card in CARD_VALUES {
                let table = tables.get(dealer_up_card);
                assert_eq!(table.dealer_up_card(), dealer_up_card);
                assert_eq!(table.rows().count(), 30);
                for (_, _, row) in table.rows() {
                    let sum: f64 = row.iter().sum();
                    assert!((sum - 1.0).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn standing_rows_stay_put() {
        let deck = Deck::standard();
        let table = CompletionTable::new(&deck, &StrategyPreset::BaldwinOptimum, 4);
        assert_eq!(table.get(12, false)[12], 1.0);
        assert_eq!(table.get(18, true)[18], 1.0);
        assert_eq!(table.get(21, false)[21], 1.0);
    }

    #[test]
    fn small_pairs_have_real_completions() {
        let deck = Deck::standard();
        let table = CompletionTable::new(&deck, &StrategyPreset::MimicDealer, 2);
        // A pair of twos and a pair of aces that are not split still draw.
        assert_eq!(table.get(4, false)[4], 0.0);
        assert!(table.get(4, false)[17] > 0.0);
        assert_eq!(table.get(12, true)[12], 0.0);
        assert!(table.get(12, true)[0] > 0.0);
    }

    #[test]
    fn hard_eleven_with_mimic_dealer() {
        let deck = Deck::standard();
        let table = CompletionTable::new(&deck, &StrategyPreset::MimicDealer, 10);
        let row = table.get(11, false);
        // 11 never busts on one card, and a ten gives 21 straight away.
        assert!(row[21] > 16.0 / 52.0);
        assert_eq!(row[12..17].iter().sum::<f64>(), 0.0);
    }
}
