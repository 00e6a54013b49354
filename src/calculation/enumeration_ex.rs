use log::{debug, info};

use super::dealer_odds::{DealerTable, DealerTotalDistribution};
use super::player_states::{expand_player_hand, is_natural_start, PlayerOutcome};
use super::{for_each_up_card, ExpectedWinnings};
use crate::{hand_total, CalculationSettings, CardCount, Strategy, CARD_VALUES};

/// Payout of one outcome per unit of its probability. A dealer natural
/// takes every bet the outcome stands for, doubled or split ones included.
fn outcome_ex(
    outcome: &PlayerOutcome,
    p_dealer_natural: f64,
    dealer: &DealerTotalDistribution,
) -> f64 {
    let stake = outcome.bet_multiplier * outcome.hand_count();
    let total = hand_total(&outcome.hand);
    (1.0 - p_dealer_natural) * stake * dealer.ex_stand(total.total) - p_dealer_natural * stake
}

/// Expectation for one up card from every outcome of every starting hand,
/// scored against the dealer's distribution given no dealer natural.
fn calculate_up_card<S: Strategy + ?Sized>(
    settings: &CalculationSettings,
    strategy: &S,
    dealer_table: &DealerTable,
    dealer_up_card: u8,
) -> f64 {
    let deck = &settings.deck;
    let dealt = CardCount::from_cards(&[dealer_up_card]);
    let p_dealer_natural = dealer_table.get(dealer_up_card).p_natural();
    let dealer = dealer_table.without_natural(dealer_up_card);

    let mut ex = 0.0;
    for first_card in CARD_VALUES {
        for second_card in 1..=first_card {
            // (i, j) and (j, i) play the same way.
            let orders = if second_card < first_card { 2.0 } else { 1.0 };
            let p_initial =
                deck.sequence_probability(&dealt, &[first_card, second_card]) * orders;
            if p_initial == 0.0 {
                continue;
            }

            if is_natural_start(first_card, second_card) {
                ex += p_initial * (1.0 - p_dealer_natural) * 1.5;
                continue;
            }

            for outcome in
                expand_player_hand(deck, strategy, dealer_up_card, &dealt, (first_card, second_card))
            {
                ex += p_initial
                    * outcome.probability
                    * outcome_ex(&outcome, p_dealer_natural, &dealer);
            }
        }
    }
    ex
}

/// Exact enumeration of the player's hands against an exact dealer table.
pub fn calculate_enumeration_expectation<S: Strategy + Sync + ?Sized>(
    settings: &CalculationSettings,
    strategy: &S,
    dealer_table: &DealerTable,
) -> ExpectedWinnings {
    info!(
        "{:<32}{} dealer table",
        "enumerating player hands on", dealer_table.method()
    );
    let results = for_each_up_card(settings.number_of_threads, &CARD_VALUES, |dealer_up_card| {
        let ex = calculate_up_card(settings, strategy, dealer_table, dealer_up_card);
        debug!("{:<32}{:<4}{:>12.6}", "enumeration up card", dealer_up_card, ex);
        ex
    });

    let mut by_up_card = [None; 10];
    for (dealer_up_card, ex) in results {
        by_up_card[(dealer_up_card - 1) as usize] = Some(ex);
    }
    ExpectedWinnings::new(&settings.deck, by_up_card)
}
