mod closed_form_ex;
mod dealer_approx;
mod dealer_odds;
mod enumeration_ex;
mod joint_ex;
mod player_completion;
mod player_states;
mod util;

pub use closed_form_ex::{calculate_closed_form_expectation, ClosedFormDetails, HoleCardOdds};
pub use dealer_approx::build_approximate_dealer_table;
pub use dealer_odds::{
    build_exact_dealer_table, DealerMethod, DealerPlay, DealerTable, DealerTotalDistribution,
};
pub use enumeration_ex::calculate_enumeration_expectation;
pub use joint_ex::{calculate_joint_expectation, JointExpectation};
pub use player_completion::{CompletionTable, CompletionTables};
pub use player_states::{expand_player_hand, summarize_player_outcomes, PlayerOutcome};

use crate::{Deck, CARD_VALUES};

/// Expectation per unit of the original bet, for each dealer up card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpectedWinnings {
    by_up_card: [Option<f64>; 10],
    overall: Option<f64>,
}

impl ExpectedWinnings {
    /// The overall expectation is only known once every up card has been
    /// calculated.
    pub fn new(deck: &Deck, by_up_card: [Option<f64>; 10]) -> Self {
        let mut overall = Some(0.0);
        for (dealer_up_card, ex) in CARD_VALUES.iter().zip(by_up_card.iter()) {
            overall = match (overall, ex) {
                (Some(sum), Some(ex)) => Some(sum + ex * deck.up_card_probability(*dealer_up_card)),
                _ => None,
            };
        }
        ExpectedWinnings {
            by_up_card,
            overall,
        }
    }

    pub fn get(&self, dealer_up_card: u8) -> Option<f64> {
        self.by_up_card[(dealer_up_card - 1) as usize]
    }

    pub fn overall(&self) -> Option<f64> {
        self.overall
    }

    /// Calculated up cards in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        CARD_VALUES
            .iter()
            .zip(self.by_up_card.iter())
            .filter_map(|(&dealer_up_card, ex)| ex.map(|ex| (dealer_up_card, ex)))
    }
}

/// Runs `calculate` for every up card, spreading the up cards round-robin
/// over `number_of_threads` threads. The results come back in the order of
/// `dealer_up_cards` whatever the number of threads.
pub(crate) fn for_each_up_card<T, F>(
    number_of_threads: usize,
    dealer_up_cards: &[u8],
    calculate: F,
) -> Vec<(u8, T)>
where
    T: Send,
    F: Fn(u8) -> T + Sync,
{
    let number_of_threads = number_of_threads.clamp(1, dealer_up_cards.len().max(1));
    let mut dispatched_up_cards: Vec<Vec<(usize, u8)>> = vec![vec![]; number_of_threads];
    for (i, &dealer_up_card) in dealer_up_cards.iter().enumerate() {
        dispatched_up_cards[i % number_of_threads].push((i, dealer_up_card));
    }

    let calculate = &calculate;
    let mut results: Vec<(usize, u8, T)> = std::thread::scope(|scope| {
        let mut threads = Vec::with_capacity(number_of_threads - 1);
        for up_cards_for_thread in dispatched_up_cards.iter().skip(1) {
            threads.push(scope.spawn(move || {
                up_cards_for_thread
                    .iter()
                    .map(|&(i, dealer_up_card)| (i, dealer_up_card, calculate(dealer_up_card)))
                    .collect::<Vec<_>>()
            }));
        }

        let mut results: Vec<(usize, u8, T)> = dispatched_up_cards[0]
            .iter()
            .map(|&(i, dealer_up_card)| (i, dealer_up_card, calculate(dealer_up_card)))
            .collect();
        for thread in threads {
            match thread.join() {
                Ok(mut thread_results) => results.append(&mut thread_results),
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        results
    });

    results.sort_by_key(|(i, _, _)| *i);
    results
        .into_iter()
        .map(|(_, dealer_up_card, result)| (dealer_up_card, result))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overall_needs_every_up_card() {
        let deck = Deck::standard();
        let mut by_up_card = [Some(0.5); 10];
        let ex = ExpectedWinnings::new(&deck, by_up_card);
        assert!((ex.overall().unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(ex.iter().count(), 10);

        by_up_card[3] = None;
        let ex = ExpectedWinnings::new(&deck, by_up_card);
        assert_eq!(ex.overall(), None);
        assert_eq!(ex.get(4), None);
        assert_eq!(ex.get(5), Some(0.5));
        assert_eq!(ex.iter().map(|(d, _)| d).collect::<Vec<_>>(), vec![1, 2, 3, 5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn results_keep_up_card_order() {
        for number_of_threads in [1, 2, 3, 10, 16] {
            let results = for_each_up_card(number_of_threads, &CARD_VALUES, |d| d as u32 * 10);
            assert_eq!(
                results,
                CARD_VALUES
                    .iter()
                    .map(|&d| (d, d as u32 * 10))
                    .collect::<Vec<_>>()
            );
        }
        let results = for_each_up_card(4, &[7], |d| d);
        assert_eq!(results, vec![(7, 7)]);
    }
}
