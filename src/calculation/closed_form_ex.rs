use log::{debug, info};

use super::dealer_odds::{DealerTable, DealerTotalDistribution};
use super::player_completion::{CompletionTable, CompletionTables};
use super::{for_each_up_card, ExpectedWinnings};
use crate::{add_to_total, hand_total, CalculationSettings, CardCount, Deck, Strategy, CARD_VALUES};

/// Probabilities of the player's two cards, given the dealer's up card.
/// Totals exclude naturals and pairs, indexed by softness then total.
#[derive(Debug, Clone, PartialEq)]
pub struct HoleCardOdds {
    pub p_natural: f64,
    pub p_pairs: [f64; 10],
    pub p_totals: [[f64; 22]; 2],
}

impl HoleCardOdds {
    pub fn new(deck: &Deck, dealer_up_card: u8) -> Self {
        let dealt = CardCount::from_cards(&[dealer_up_card]);
        let mut odds = HoleCardOdds {
            p_natural: deck.sequence_probability(&dealt, &[1, 10])
                + deck.sequence_probability(&dealt, &[10, 1]),
            p_pairs: [0.0; 10],
            p_totals: [[0.0; 22]; 2],
        };

        for first_card in CARD_VALUES {
            odds.p_pairs[(first_card - 1) as usize] =
                deck.sequence_probability(&dealt, &[first_card, first_card]);
            for second_card in CARD_VALUES {
                if first_card == second_card {
                    continue;
                }
                let total = hand_total(&[first_card, second_card]);
                if total.total == 21 {
                    continue;
                }
                odds.p_totals[total.soft as usize][total.total as usize] +=
                    deck.sequence_probability(&dealt, &[first_card, second_card]);
            }
        }

        odds
    }

    pub fn p_hard_totals(&self) -> f64 {
        self.p_totals[0].iter().sum()
    }

    pub fn p_soft_totals(&self) -> f64 {
        self.p_totals[1].iter().sum()
    }

    pub fn p_all_pairs(&self) -> f64 {
        self.p_pairs.iter().sum()
    }

    pub fn sum(&self) -> f64 {
        self.p_hard_totals() + self.p_soft_totals() + self.p_natural + self.p_all_pairs()
    }
}

/// The closed-form expectation for one up card, built from standing,
/// drawing one card and drawing to the standing number.
struct ClosedForm<'a, S: Strategy + ?Sized> {
    deck: &'a Deck,
    strategy: &'a S,
    dealer_up_card: u8,
    dealer: DealerTotalDistribution,
    completion: &'a CompletionTable,
}

impl<'a, S: Strategy + ?Sized> ClosedForm<'a, S> {
    fn ex_stand(&self, player_total: u16) -> f64 {
        self.dealer.ex_stand(player_total)
    }

    /// Drawing exactly one card, taken as independent of the dealer's cards.
    fn ex_double(&self, player_total: u16, soft: bool) -> f64 {
        let mut ex = 0.0;
        for card_value in CARD_VALUES {
            let p = self.deck.replacement_probability(card_value);
            let (total, _) = add_to_total(player_total, soft, card_value);
            ex += p * if total < 17 {
                2.0 * self.dealer.p_bust() - 1.0
            } else {
                self.ex_stand(total)
            };
        }
        ex
    }

    fn ex_draw_to_standing_number(&self, player_total: u16, soft: bool) -> f64 {
        if player_total >= self.strategy.standing_number(self.dealer_up_card, soft) {
            return self.ex_stand(player_total);
        }
        let completion = self.completion.get(player_total, soft);
        let mut ex = 0.0;
        for (total, p) in completion.iter().enumerate().skip(1) {
            ex += p * self.ex_stand(total as u16);
        }
        ex - completion[0]
    }

    fn ex_two_cards(&self, player_total: u16, soft: bool) -> f64 {
        if self
            .strategy
            .doubling_totals(self.dealer_up_card, soft)
            .contains(player_total)
        {
            2.0 * self.ex_double(player_total, soft)
        } else {
            self.ex_draw_to_standing_number(player_total, soft)
        }
    }

    /// Both halves of the split, each getting its second card from the deck
    /// less the up card and the pair.
    fn ex_split(&self, pair_card: u8) -> f64 {
        let dealt = CardCount::from_cards(&[self.dealer_up_card, pair_card, pair_card]);
        let mut ex = 0.0;
        for card_value in CARD_VALUES {
            let p = self.deck.draw_probability(&dealt, card_value);
            let total = hand_total(&[pair_card, card_value]);
            ex += p * if pair_card == 1 {
                self.ex_stand(total.total)
            } else {
                self.ex_two_cards(total.total, total.soft)
            };
        }
        2.0 * ex
    }

    fn ex_no_dealer_natural(&self, hole_card_odds: &HoleCardOdds) -> f64 {
        let mut ex = 1.5 * hole_card_odds.p_natural;

        let splitting_cards = self.strategy.splitting_cards(self.dealer_up_card);
        for pair_card in CARD_VALUES {
            let p = hole_card_odds.p_pairs[(pair_card - 1) as usize];
            ex += p * if splitting_cards.contains(pair_card as u16) {
                self.ex_split(pair_card)
            } else {
                let total = hand_total(&[pair_card, pair_card]);
                self.ex_two_cards(total.total, total.soft)
            };
        }

        for total in 1..=21 {
            ex += hole_card_odds.p_totals[0][total] * self.ex_two_cards(total as u16, false);
            ex += hole_card_odds.p_totals[1][total] * self.ex_two_cards(total as u16, true);
        }

        ex
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClosedFormDetails {
    pub completion_tables: CompletionTables,
    pub hole_card_odds: Vec<HoleCardOdds>,
    pub expected_winnings: ExpectedWinnings,
}

/// Closed-form expectation on the given dealer distributions. A dealer
/// natural costs the player the original bet unless the player has one too.
pub fn calculate_closed_form_expectation<S: Strategy + Sync + ?Sized>(
    settings: &CalculationSettings,
    strategy: &S,
    dealer_table: &DealerTable,
) -> ClosedFormDetails {
    info!(
        "{:<32}{} dealer table",
        "closed-form expectation on", dealer_table.method()
    );
    let deck = &settings.deck;
    let completion_tables = CompletionTables::new(deck, strategy);

    let results = for_each_up_card(settings.number_of_threads, &CARD_VALUES, |dealer_up_card| {
        let hole_card_odds = HoleCardOdds::new(deck, dealer_up_card);
        let closed_form = ClosedForm {
            deck,
            strategy,
            dealer_up_card,
            dealer: dealer_table.without_natural(dealer_up_card),
            completion: completion_tables.get(dealer_up_card),
        };
        let p_dealer_natural = dealer_table.get(dealer_up_card).p_natural();
        let ex = p_dealer_natural * -(1.0 - hole_card_odds.p_natural)
            + (1.0 - p_dealer_natural) * closed_form.ex_no_dealer_natural(&hole_card_odds);
        debug!("{:<32}{:<4}{:>12.6}", "closed-form up card", dealer_up_card, ex);
        (ex, hole_card_odds)
    });

    let mut by_up_card = [None; 10];
    let mut hole_card_odds = Vec::with_capacity(10);
    for (dealer_up_card, (ex, odds)) in results {
        by_up_card[(dealer_up_card - 1) as usize] = Some(ex);
        hole_card_odds.push(odds);
    }

    ClosedFormDetails {
        completion_tables,
        hole_card_odds,
        expected_winnings: ExpectedWinnings::new(deck, by_up_card),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{build_approximate_dealer_table, build_exact_dealer_table};
    use crate::StrategyPreset;

    fn calculate(strategy: StrategyPreset) -> ExpectedWinnings {
        let settings = CalculationSettings::new(Deck::standard(), 0);
        let dealer_table = build_approximate_dealer_table(&settings.deck);
        calculate_closed_form_expectation(&settings, &strategy, &dealer_table).expected_winnings
    }

    #[test]
    fn hole_card_odds_sum_to_one() {
        let deck = Deck::standard();
        for dealer_up_card in CARD_VALUES {
            let odds = HoleCardOdds::new(&deck, dealer_up_card);
            assert!((odds.sum() - 1.0).abs() < 1e-12);
            assert_eq!(odds.p_totals[0][4], 0.0);
            assert_eq!(odds.p_totals[1][12], 0.0);
        }
        let odds = HoleCardOdds::new(&deck, 10);
        assert!((odds.p_natural - 2.0 * 4.0 / 51.0 * 15.0 / 50.0).abs() < 1e-15);
    }

    #[test]
    fn baldwin_optimum_closed_form() {
        let ex = calculate(StrategyPreset::BaldwinOptimum);
        let expected = [
            -0.3627607607017448,
            0.08473574354990253,
            0.11848806638891451,
            0.16194845411748424,
            0.21380445753147695,
            0.2255948229905656,
            0.14521070584877474,
            0.05398266822633818,
            -0.04394263062662039,
            -0.17601209080057564,
        ];
        for dealer_up_card in CARD_VALUES {
            let value = ex.get(dealer_up_card).unwrap();
            assert!((value - expected[(dealer_up_card - 1) as usize]).abs() < 1e-9);
        }
        let overall = ex.overall().unwrap();
        // Away from the published -0.006 by more than 0.002.
        assert!((overall - -0.008229756605939303).abs() < 1e-9);
    }

    #[test]
    fn other_presets_closed_form() {
        let culbertson = calculate(StrategyPreset::Culbertson);
        assert!((culbertson.overall().unwrap() - -0.029760950745700537).abs() < 1e-9);
        assert!((culbertson.get(1).unwrap() - -0.3767211803943237).abs() < 1e-9);
        assert!((culbertson.get(2).unwrap() - 0.06465343422294142).abs() < 1e-9);
        assert!((culbertson.get(10).unwrap() - -0.17998022926207852).abs() < 1e-9);

        let mimic_dealer = calculate(StrategyPreset::MimicDealer);
        assert!((mimic_dealer.overall().unwrap() - -0.057301801538020836).abs() < 1e-9);
        assert!((mimic_dealer.get(1).unwrap() - -0.36648786332840827).abs() < 1e-9);
        assert!((mimic_dealer.get(2).unwrap() - 0.015861441026762547).abs() < 1e-9);
        assert!((mimic_dealer.get(10).unwrap() - -0.1849393263069592).abs() < 1e-9);
    }

    #[test]
    fn mimic_dealer_is_worst() {
        let baldwin = calculate(StrategyPreset::BaldwinOptimum).overall().unwrap();
        let culbertson = calculate(StrategyPreset::Culbertson).overall().unwrap();
        let mimic_dealer = calculate(StrategyPreset::MimicDealer).overall().unwrap();
        assert!(mimic_dealer < culbertson);
        assert!(culbertson < baldwin);
    }

    #[test]
    fn closed_form_on_exact_dealer_table() {
        let settings = CalculationSettings::new(Deck::standard(), 2);
        let exact = build_exact_dealer_table(&settings);
        let approximate = build_approximate_dealer_table(&settings.deck);
        let strategy = StrategyPreset::BaldwinOptimum;
        let on_exact =
            calculate_closed_form_expectation(&settings, &strategy, &exact).expected_winnings;
        let on_approximate =
            calculate_closed_form_expectation(&settings, &strategy, &approximate).expected_winnings;
        for dealer_up_card in CARD_VALUES {
            let difference = on_exact.get(dealer_up_card).unwrap()
                - on_approximate.get(dealer_up_card).unwrap();
            assert!(difference.abs() < 0.02);
        }
    }
}
