use log::{debug, info};

use super::dealer_odds::{DealerPlay, DealerTotalDistribution};
use super::player_states::{expand_player_hand, is_natural_start};
use super::{for_each_up_card, ExpectedWinnings};
use crate::{hand_total, CalculationSettings, CardCount, Deck, SingleStateArray, Strategy, CARD_VALUES};

#[derive(Debug, Clone, PartialEq)]
pub struct JointExpectation {
    pub expected_winnings: ExpectedWinnings,
    /// Total probability covered for each calculated up card.
    pub probability_mass: [Option<f64>; 10],
}

/// Dealer distributions from one two-card dealer hand, memoized on the
/// cards dealt outside it.
struct ConditionalDealerOdds<'a> {
    deck: &'a Deck,
    dealer_hand: CardCount,
    dealer_odds: SingleStateArray<DealerTotalDistribution>,
}

impl<'a> ConditionalDealerOdds<'a> {
    fn new(deck: &'a Deck, dealer_hand: CardCount) -> Self {
        Self {
            deck,
            dealer_hand,
            dealer_odds: SingleStateArray::new(),
        }
    }

    fn get(&mut self, dealt_outside: &CardCount) -> DealerTotalDistribution {
        if let Some(distribution) = self.dealer_odds.get(dealt_outside) {
            return *distribution;
        }
        let mut dealer_play = DealerPlay::new(self.deck, *dealt_outside);
        let (distribution, _) = dealer_play.get_dealer_hand_value_probability(&self.dealer_hand);
        self.dealer_odds[dealt_outside] = distribution;
        distribution
    }
}

/// Enumerates the hole card, the player's hand and the dealer's hand
/// jointly, so every dealer distribution accounts for the player's cards.
/// Returns the expectation and the probability mass it covers.
fn calculate_up_card<S: Strategy + ?Sized>(
    deck: &Deck,
    strategy: &S,
    dealer_up_card: u8,
) -> (f64, f64) {
    let up_card_dealt = CardCount::from_cards(&[dealer_up_card]);
    let mut ex = 0.0;
    let mut probability_mass = 0.0;

    for hole_card in CARD_VALUES {
        let p_hole_card = deck.draw_probability(&up_card_dealt, hole_card);
        if p_hole_card == 0.0 {
            continue;
        }
        let dealer_hand = up_card_dealt.with_card(hole_card);
        let dealer_natural = hand_total(&[dealer_up_card, hole_card]).total == 21;
        let mut dealer_odds = ConditionalDealerOdds::new(deck, dealer_hand);

        for first_card in CARD_VALUES {
            for second_card in 1..=first_card {
                let orders = if second_card < first_card { 2.0 } else { 1.0 };
                let p_initial = p_hole_card
                    * deck.sequence_probability(&dealer_hand, &[first_card, second_card])
                    * orders;
                if p_initial == 0.0 {
                    continue;
                }
                let player_natural = is_natural_start(first_card, second_card);

                if dealer_natural {
                    // The original bet is lost unless the player has a natural too.
                    if !player_natural {
                        ex -= p_initial;
                    }
                    probability_mass += p_initial;
                    continue;
                }
                if player_natural {
                    ex += 1.5 * p_initial;
                    probability_mass += p_initial;
                    continue;
                }

                for outcome in expand_player_hand(
                    deck,
                    strategy,
                    dealer_up_card,
                    &dealer_hand,
                    (first_card, second_card),
                ) {
                    let p_outcome = p_initial * outcome.probability;
                    let total = hand_total(&outcome.hand);
                    if total.is_bust() {
                        ex -= p_outcome * outcome.bet_multiplier * outcome.hand_count();
                        probability_mass += p_outcome;
                        continue;
                    }

                    let dealer = dealer_odds.get(&outcome.dealt_cards());
                    ex += p_outcome
                        * outcome.bet_multiplier
                        * dealer.ex_stand(total.total)
                        * outcome.hand_count();
                    probability_mass += p_outcome * dealer.sum();
                }
            }
        }
    }

    (ex, probability_mass)
}

/// Joint enumeration for the given up cards; the overall expectation is
/// only available when all ten are calculated.
pub fn calculate_joint_expectation<S: Strategy + Sync + ?Sized>(
    settings: &CalculationSettings,
    strategy: &S,
    dealer_up_cards: &[u8],
) -> JointExpectation {
    info!(
        "{:<32}{:?}",
        "joint enumeration of up cards", dealer_up_cards
    );
    let results = for_each_up_card(settings.number_of_threads, dealer_up_cards, |dealer_up_card| {
        let (ex, probability_mass) = calculate_up_card(&settings.deck, strategy, dealer_up_card);
        debug!(
            "{:<32}{:<4}{:>12.6}{:>16.12}",
            "joint up card", dealer_up_card, ex, probability_mass
        );
        (ex, probability_mass)
    });

    let mut by_up_card = [None; 10];
    let mut probability_mass = [None; 10];
    for (dealer_up_card, (ex, mass)) in results {
        by_up_card[(dealer_up_card - 1) as usize] = Some(ex);
        probability_mass[(dealer_up_card - 1) as usize] = Some(mass);
    }

    JointExpectation {
        expected_winnings: ExpectedWinnings::new(&settings.deck, by_up_card),
        probability_mass,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{build_exact_dealer_table, calculate_enumeration_expectation};
    use crate::StrategyPreset;

    fn calculate(strategy: StrategyPreset, dealer_up_card: u8) -> (f64, f64) {
        let settings = CalculationSettings::new(Deck::standard(), 1);
        let joint = calculate_joint_expectation(&settings, &strategy, &[dealer_up_card]);
        (
            joint.expected_winnings.get(dealer_up_card).unwrap(),
            joint.probability_mass[(dealer_up_card - 1) as usize].unwrap(),
        )
    }

    #[test]
    fn baldwin_optimum_joint() {
        for (dealer_up_card, expected) in [
            (1, -0.3617211623380044),
            (2, 0.10113295331438452),
            (6, 0.24230825986922927),
            (10, -0.17149288779163263),
        ] {
            let (ex, mass) = calculate(StrategyPreset::BaldwinOptimum, dealer_up_card);
            assert!((ex - expected).abs() < 1e-9);
            assert!((mass - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn single_up_card_has_no_overall() {
        let settings = CalculationSettings::new(Deck::standard(), 1);
        let joint = calculate_joint_expectation(&settings, &StrategyPreset::MimicDealer, &[9]);
        assert_eq!(joint.expected_winnings.overall(), None);
        assert_eq!(joint.expected_winnings.get(8), None);
        assert!(joint.expected_winnings.get(9).is_some());
        assert_eq!(joint.probability_mass[0], None);
    }

    #[test]
    fn dealer_natural_costs_original_bet() {
        let (ex, mass) = calculate(StrategyPreset::MimicDealer, 10);
        assert!((ex - -0.17988952875814615).abs() < 1e-9);
        assert!((mass - 1.0).abs() < 1e-9);
        // Close to the enumeration, which scores against the unconditioned dealer.
        assert!((ex - -0.1802524558758017).abs() < 0.01);
    }

    #[test]
    fn joint_agrees_with_enumeration() {
        let settings = CalculationSettings::new(Deck::standard(), 0);
        let strategy = StrategyPreset::Culbertson;
        let dealer_up_cards = [3, 5, 7, 9];
        let joint = calculate_joint_expectation(&settings, &strategy, &dealer_up_cards);
        let dealer_table = build_exact_dealer_table(&settings);
        let enumeration = calculate_enumeration_expectation(&settings, &strategy, &dealer_table);
        for dealer_up_card in dealer_up_cards {
            let difference = joint.expected_winnings.get(dealer_up_card).unwrap()
                - enumeration.get(dealer_up_card).unwrap();
            assert!(difference.abs() < 0.02);
        }
    }
}
