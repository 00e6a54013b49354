use log::info;

use super::dealer_odds::{DealerMethod, DealerTable, DealerTotalDistribution, BUST, NATURAL};
use super::util::ReplacementDraws;
use crate::{hand_total, CardCount, Deck, CARD_VALUES};

/// Exact probabilities of the dealer's total after three cards, or after two
/// when the dealer already stands. Indexed by softness, then by total with
/// 0 for bust and 22 for a natural.
fn three_card_probabilities(deck: &Deck, dealer_up_card: u8) -> [[f64; 23]; 2] {
    let mut probabilities = [[0.0; 23]; 2];
    let dealt = CardCount::from_cards(&[dealer_up_card]);

    for second_card in CARD_VALUES {
        let two_cards = hand_total(&[dealer_up_card, second_card]);
        if two_cards.total >= 17 {
            let p = deck.sequence_probability(&dealt, &[second_card]);
            let bucket = if two_cards.total == 21 {
                NATURAL
            } else {
                two_cards.total as usize
            };
            probabilities[two_cards.soft as usize][bucket] += p;
            continue;
        }

        for third_card in CARD_VALUES {
            let three_cards = hand_total(&[dealer_up_card, second_card, third_card]);
            let p = deck.sequence_probability(&dealt, &[second_card, third_card]);
            let bucket = if three_cards.is_bust() {
                BUST
            } else {
                three_cards.total as usize
            };
            probabilities[three_cards.soft as usize][bucket] += p;
        }
    }

    probabilities
}

/// Dealer distributions from exact three-card probabilities, continued by
/// drawing with replacement from the full deck while the total is below 17.
pub fn build_approximate_dealer_table(deck: &Deck) -> DealerTable {
    info!("{:<32}{}", "building dealer table", DealerMethod::Approximate);
    let mut continuation = ReplacementDraws::new(deck, |total, _| total >= 17);

    let mut distributions = [DealerTotalDistribution::default(); 10];
    for dealer_up_card in CARD_VALUES {
        let three_cards = three_card_probabilities(deck, dealer_up_card);
        let mut probabilities = [0.0; 23];
        for (soft, by_total) in three_cards.iter().enumerate() {
            probabilities[BUST] += by_total[BUST];
            for total in 17..=NATURAL {
                probabilities[total] += by_total[total];
            }
            for (partial_total, &p) in by_total.iter().enumerate().take(17).skip(1) {
                if p == 0.0 {
                    continue;
                }
                let completion = continuation.completion(partial_total as u16, soft == 1);
                probabilities[BUST] += p * completion[BUST];
                for total in 17..=21 {
                    probabilities[total] += p * completion[total];
                }
            }
        }
        distributions[(dealer_up_card - 1) as usize] =
            DealerTotalDistribution::from_probabilities(probabilities);
    }

    DealerTable::new(DealerMethod::Approximate, distributions, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::build_exact_dealer_table;
    use crate::CalculationSettings;

    #[test]
    fn approximate_distributions_sum_to_one() {
        let table = build_approximate_dealer_table(&Deck::standard());
        assert_eq!(table.method(), DealerMethod::Approximate);
        assert_eq!(table.unique_dealer_hands(2), None);
        for dealer_up_card in CARD_VALUES {
            assert!((table.get(dealer_up_card).sum() - 1.0).abs() < 1e-9);
            assert!((table.without_natural(dealer_up_card).sum() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn reproduces_published_three_card_method() {
        let table = build_approximate_dealer_table(&Deck::standard());

        let two = table.get(2);
        assert!((two[17] - 0.141781).abs() < 1e-4);
        assert!((two.p_bust() - 0.348492).abs() < 1e-4);
        assert!((two[17] - 0.1417818420776935).abs() < 1e-12);
        assert!((two.p_bust() - 0.34849027375657854).abs() < 1e-12);

        let ten = table.get(10);
        assert!((ten.p_bust() - 0.21367280626055962).abs() < 1e-12);
        assert!((ten[20] - 0.3288732818851429).abs() < 1e-12);
        assert!((ten.p_natural() - 0.0784313725490196).abs() < 1e-12);

        let ace = table.get(1);
        assert!((ace.p_bust() - 0.1145597756994357).abs() < 1e-12);
        assert!((ace[21] - 0.05128412329148542).abs() < 1e-12);
    }

    #[test]
    fn approximation_stays_close_to_exact() {
        let deck = Deck::standard();
        let approximate = build_approximate_dealer_table(&deck);
        let exact = build_exact_dealer_table(&CalculationSettings::new(deck, 1));
        for dealer_up_card in CARD_VALUES {
            for bucket in 0..23 {
                assert!(
                    (approximate.get(dealer_up_card)[bucket] - exact.get(dealer_up_card)[bucket])
                        .abs()
                        < 0.01
                );
            }
        }
    }
}
