use std::ops::Index;

use log::{debug, info};
use strum_macros::Display;

use super::for_each_up_card;
use crate::{CalculationSettings, CardCount, Deck, SingleStateArray, CARD_VALUES};

pub const BUST: usize = 0;
pub const NATURAL: usize = 22;

/// Probabilities of the dealer's final hand.
/// 0 for Bust.
/// [17, 21] for standing totals.
/// 22 for a natural.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DealerTotalDistribution {
    probabilities: [f64; 23],
}

impl Default for DealerTotalDistribution {
    fn default() -> Self {
        Self {
            probabilities: [0.0; 23],
        }
    }
}

impl DealerTotalDistribution {
    pub fn from_probabilities(probabilities: [f64; 23]) -> Self {
        Self { probabilities }
    }

    pub fn probabilities(&self) -> &[f64; 23] {
        &self.probabilities
    }

    pub fn p_bust(&self) -> f64 {
        self.probabilities[BUST]
    }

    pub fn p_natural(&self) -> f64 {
        self.probabilities[NATURAL]
    }

    pub fn sum(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// The dealer busts or stands on less than the player.
    pub fn p_worse_than_player(&self, player_actual_sum: u16) -> f64 {
        let x = (player_actual_sum as usize).min(22);
        self.probabilities[BUST] + self.probabilities[17.min(x)..x].iter().sum::<f64>()
    }

    /// The dealer stands on more than the player without a natural.
    pub fn p_better_than_player(&self, player_actual_sum: u16) -> f64 {
        let x = (player_actual_sum as usize).min(21);
        self.probabilities[(x + 1).max(17)..NATURAL].iter().sum()
    }

    /// Expectation of a unit bet standing on `player_actual_sum`, natural
    /// hands excluded on both sides.
    pub fn ex_stand(&self, player_actual_sum: u16) -> f64 {
        if player_actual_sum > 21 {
            return -1.0;
        }
        self.p_worse_than_player(player_actual_sum) - self.p_better_than_player(player_actual_sum)
    }

    /// The distribution given that the dealer has no natural.
    pub fn without_natural(&self) -> Self {
        let p_no_natural = 1.0 - self.p_natural();
        let mut probabilities = [0.0; 23];
        if p_no_natural <= 0.0 {
            return Self { probabilities };
        }
        for (p, q) in probabilities.iter_mut().zip(self.probabilities.iter()).take(NATURAL) {
            *p = q / p_no_natural;
        }
        Self { probabilities }
    }

    fn end_with_bust(&mut self) {
        self.probabilities[BUST] = 1.0;
    }

    fn end_with_normal(&mut self, dealer_actual_sum: u16) {
        self.probabilities[dealer_actual_sum as usize] = 1.0;
    }

    fn end_with_natural(&mut self) {
        self.probabilities[NATURAL] = 1.0;
    }

    pub(crate) fn add_assign_with_p(&mut self, rhs: &Self, p: f64) {
        for i in 0..self.probabilities.len() {
            self.probabilities[i] += rhs.probabilities[i] * p;
        }
    }
}

impl Index<usize> for DealerTotalDistribution {
    type Output = f64;
    fn index(&self, index: usize) -> &Self::Output {
        &self.probabilities[index]
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct DealerOdds {
    distribution: DealerTotalDistribution,
    sequences: u64,
}

/// Plays out the dealer hand for one fixed set of cards dealt outside the
/// dealer hand, memoizing on the dealer hand.
pub struct DealerPlay<'a> {
    deck: &'a Deck,
    dealt_outside: CardCount,
    dealer_odds: SingleStateArray<DealerOdds>,
}

impl<'a> DealerPlay<'a> {
    pub fn new(deck: &'a Deck, dealt_outside: CardCount) -> Self {
        Self {
            deck,
            dealt_outside,
            dealer_odds: SingleStateArray::new(),
        }
    }

    /// Distribution of the final dealer hand from `dealer_hand`, together
    /// with the number of distinct card sequences that finish it.
    pub fn get_dealer_hand_value_probability(
        &mut self,
        dealer_hand: &CardCount,
    ) -> (DealerTotalDistribution, u64) {
        let mut dealer_hand = *dealer_hand;
        let odds = self.memoization_dealer_gets_cards(&mut dealer_hand);
        (odds.distribution, odds.sequences)
    }

    fn memoization_dealer_gets_cards(&mut self, dealer_hand: &mut CardCount) -> DealerOdds {
        if let Some(odds) = self.dealer_odds.get(dealer_hand) {
            return *odds;
        }

        let mut odds = DealerOdds::default();
        let dealer_actual_sum = dealer_hand.get_actual_sum();
        if dealer_hand.bust() {
            odds.distribution.end_with_bust();
            odds.sequences = 1;
        } else if dealer_actual_sum >= 17 {
            if dealer_hand.is_natural() {
                odds.distribution.end_with_natural();
            } else {
                odds.distribution.end_with_normal(dealer_actual_sum);
            }
            odds.sequences = 1;
        } else {
            let mut dealt = self.dealt_outside;
            dealt += &*dealer_hand;
            for card_value in CARD_VALUES {
                let p = self.deck.draw_probability(&dealt, card_value);
                if p == 0.0 {
                    continue;
                }
                dealer_hand.add_card(card_value);
                let next = self.memoization_dealer_gets_cards(dealer_hand);
                dealer_hand.remove_card(card_value);

                odds.distribution.add_assign_with_p(&next.distribution, p);
                odds.sequences += next.sequences;
            }
        }

        self.dealer_odds[&*dealer_hand] = odds;
        odds
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DealerMethod {
    #[strum(serialize = "exact")]
    Exact,
    #[strum(serialize = "approximate")]
    Approximate,
}

/// The dealer distributions for all ten up cards.
#[derive(Debug, Clone, PartialEq)]
pub struct DealerTable {
    method: DealerMethod,
    distributions: [DealerTotalDistribution; 10],
    unique_dealer_hands: Option<[u64; 10]>,
}

impl DealerTable {
    pub fn new(
        method: DealerMethod,
        distributions: [DealerTotalDistribution; 10],
        unique_dealer_hands: Option<[u64; 10]>,
    ) -> Self {
        Self {
            method,
            distributions,
            unique_dealer_hands,
        }
    }

    pub fn method(&self) -> DealerMethod {
        self.method
    }

    pub fn get(&self, dealer_up_card: u8) -> &DealerTotalDistribution {
        &self.distributions[(dealer_up_card - 1) as usize]
    }

    pub fn without_natural(&self, dealer_up_card: u8) -> DealerTotalDistribution {
        self.get(dealer_up_card).without_natural()
    }

    /// Number of distinct dealer card sequences, only known for exact tables.
    pub fn unique_dealer_hands(&self, dealer_up_card: u8) -> Option<u64> {
        self.unique_dealer_hands
            .map(|counts| counts[(dealer_up_card - 1) as usize])
    }
}

/// Enumerates every dealer card sequence for each up card, nothing else
/// being dealt from the deck.
pub fn build_exact_dealer_table(settings: &CalculationSettings) -> DealerTable {
    info!("{:<32}{}", "building dealer table", DealerMethod::Exact);
    let deck = &settings.deck;
    let results = for_each_up_card(settings.number_of_threads, &CARD_VALUES, |dealer_up_card| {
        let mut dealer_play = DealerPlay::new(deck, CardCount::empty());
        let (distribution, sequences) = dealer_play
            .get_dealer_hand_value_probability(&CardCount::from_cards(&[dealer_up_card]));
        debug!(
            "{:<32}{:<4}{:>8}{:>12.9}",
            "dealer hands for up card",
            dealer_up_card,
            sequences,
            distribution.sum()
        );
        (distribution, sequences)
    });

    let mut distributions = [DealerTotalDistribution::default(); 10];
    let mut unique_dealer_hands = [0; 10];
    for (dealer_up_card, (distribution, sequences)) in results {
        distributions[(dealer_up_card - 1) as usize] = distribution;
        unique_dealer_hands[(dealer_up_card - 1) as usize] = sequences;
    }
    DealerTable::new(DealerMethod::Exact, distributions, Some(unique_dealer_hands))
}
