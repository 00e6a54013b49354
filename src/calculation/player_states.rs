use crate::{hand_total, CardCount, Decision, Deck, Strategy, CARD_VALUES};

/// One way a hand can end. `probability` is conditional on the cards the
/// hand started from, so the outcomes of one starting hand sum to 1. A
/// split start is described by the outcomes of one of its two halves.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerOutcome {
    pub split_card: Option<u8>,
    pub bet_multiplier: f64,
    pub hand: Vec<u8>,
    pub probability: f64,
}

impl PlayerOutcome {
    pub fn is_split(&self) -> bool {
        self.split_card.is_some()
    }

    /// Number of hands this outcome stands for.
    pub fn hand_count(&self) -> f64 {
        if self.is_split() {
            2.0
        } else {
            1.0
        }
    }

    /// Cards this outcome took out of the shoe, including the other half of
    /// a split pair.
    pub fn dealt_cards(&self) -> CardCount {
        let mut dealt = CardCount::from_cards(&self.hand);
        if let Some(split_card) = self.split_card {
            dealt.add_card(split_card);
        }
        dealt
    }
}

struct PlayerPlay<'a, S: Strategy + ?Sized> {
    deck: &'a Deck,
    strategy: &'a S,
    dealer_up_card: u8,
    outcomes: Vec<PlayerOutcome>,
}

impl<'a, S: Strategy + ?Sized> PlayerPlay<'a, S> {
    fn play(
        &mut self,
        hand: &mut Vec<u8>,
        dealt: &mut CardCount,
        split_card: Option<u8>,
        bet_multiplier: f64,
        probability: f64,
    ) {
        match self
            .strategy
            .make_decision(self.dealer_up_card, hand, split_card)
        {
            Decision::Stand => self.outcomes.push(PlayerOutcome {
                split_card,
                bet_multiplier,
                hand: hand.clone(),
                probability,
            }),
            Decision::Hit => {
                self.for_each_next_card(hand, dealt, probability, |play, hand, dealt, p| {
                    play.play(hand, dealt, split_card, bet_multiplier, p)
                });
            }
            Decision::Double => {
                self.for_each_next_card(hand, dealt, probability, |play, hand, _, p| {
                    play.outcomes.push(PlayerOutcome {
                        split_card,
                        bet_multiplier: bet_multiplier * 2.0,
                        hand: hand.clone(),
                        probability: p,
                    })
                });
            }
            Decision::Split => {
                let pair_card = hand[0];
                // Both cards of the pair stay dealt while one half is played.
                let mut half = vec![pair_card];
                self.for_each_next_card(&mut half, dealt, probability, |play, hand, dealt, p| {
                    play.play(hand, dealt, Some(pair_card), bet_multiplier, p)
                });
            }
        }
    }

    fn for_each_next_card<F>(
        &mut self,
        hand: &mut Vec<u8>,
        dealt: &mut CardCount,
        probability: f64,
        mut next: F,
    ) where
        F: FnMut(&mut Self, &mut Vec<u8>, &mut CardCount, f64),
    {
        for card_value in CARD_VALUES {
            let p = self.deck.draw_probability(dealt, card_value);
            if p == 0.0 {
                continue;
            }
            hand.push(card_value);
            dealt.add_card(card_value);
            next(self, hand, dealt, probability * p);
            dealt.remove_card(card_value);
            hand.pop();
        }
    }
}

/// Every outcome of playing `initial_hand` with `strategy`, drawing from the
/// deck less `dealt_outside` (the up card, and the hole card when it is
/// known) and the initial hand itself.
pub fn expand_player_hand<S: Strategy + ?Sized>(
    deck: &Deck,
    strategy: &S,
    dealer_up_card: u8,
    dealt_outside: &CardCount,
    initial_hand: (u8, u8),
) -> Vec<PlayerOutcome> {
    let mut play = PlayerPlay {
        deck,
        strategy,
        dealer_up_card,
        outcomes: vec![],
    };
    let mut hand = vec![initial_hand.0, initial_hand.1];
    let mut dealt = *dealt_outside;
    dealt.add_card(initial_hand.0);
    dealt.add_card(initial_hand.1);
    play.play(&mut hand, &mut dealt, None, 1.0, 1.0);
    play.outcomes
}

/// Number of outcomes over every ordered initial hand, and their total
/// probability given only the up card.
pub fn summarize_player_outcomes<S: Strategy + ?Sized>(
    deck: &Deck,
    strategy: &S,
    dealer_up_card: u8,
) -> (usize, f64) {
    let dealt = CardCount::from_cards(&[dealer_up_card]);
    let mut number_of_outcomes = 0;
    let mut total_probability = 0.0;
    for first_card in CARD_VALUES {
        for second_card in CARD_VALUES {
            let p_initial = deck.sequence_probability(&dealt, &[first_card, second_card]);
            if p_initial == 0.0 {
                continue;
            }
            let outcomes =
                expand_player_hand(deck, strategy, dealer_up_card, &dealt, (first_card, second_card));
            number_of_outcomes += outcomes.len();
            total_probability += outcomes
                .iter()
                .map(|outcome| p_initial * outcome.probability)
                .sum::<f64>();
        }
    }
    (number_of_outcomes, total_probability)
}

/// Whether a two-card starting hand is a natural.
pub(crate) fn is_natural_start(first_card: u8, second_card: u8) -> bool {
    hand_total(&[first_card, second_card]).total == 21
}
