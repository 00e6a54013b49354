use crate::statearray::MAX_CARDS_PER_VALUE;
use crate::{CardCount, ConfigError};

pub const STANDARD_DECK_COUNTS: [u16; 10] = [4, 4, 4, 4, 4, 4, 4, 4, 4, 16];

/// The fixed composition of the shoe. Every probability in the crate is
/// computed against one `Deck` and the set of cards already dealt from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deck {
    counts: [u16; 10],
    total: u16,
}

impl Deck {
    pub fn new(counts: [u16; 10]) -> Result<Deck, ConfigError> {
        if let Some(index) = counts.iter().position(|&n| n > MAX_CARDS_PER_VALUE) {
            return Err(ConfigError::InvalidDeck(format!(
                "{} cards of value {}, at most {} are supported",
                counts[index],
                index + 1,
                MAX_CARDS_PER_VALUE
            )));
        }
        let total: u16 = counts.iter().sum();
        if total < 2 {
            return Err(ConfigError::InvalidDeck(format!(
                "{} cards in total, at least 2 are required",
                total
            )));
        }

        Ok(Deck { counts, total })
    }

    pub fn standard() -> Deck {
        Deck {
            counts: STANDARD_DECK_COUNTS,
            total: STANDARD_DECK_COUNTS.iter().sum(),
        }
    }

    pub fn counts(&self) -> &[u16; 10] {
        &self.counts
    }

    pub fn count(&self, card_value: u8) -> u16 {
        self.counts[(card_value - 1) as usize]
    }

    pub fn total(&self) -> u16 {
        self.total
    }

    /// Number of cards of the given value still in the shoe.
    pub fn remaining(&self, dealt: &CardCount, card_value: u8) -> u16 {
        self.count(card_value).saturating_sub(dealt[card_value])
    }

    /// Probability that the next card drawn from the shoe has the given value.
    /// It is exactly 0 once every card of that value has been dealt.
    pub fn draw_probability(&self, dealt: &CardCount, card_value: u8) -> f64 {
        let remaining = self.remaining(dealt, card_value);
        if remaining == 0 || dealt.get_total() >= self.total {
            return 0.0;
        }
        remaining as f64 / (self.total - dealt.get_total()) as f64
    }

    /// Probability of drawing exactly `sequence`, in order, after `dealt`.
    pub fn sequence_probability(&self, dealt: &CardCount, sequence: &[u8]) -> f64 {
        let mut dealt = *dealt;
        let mut p = 1.0;
        for &card_value in sequence {
            p *= self.draw_probability(&dealt, card_value);
            if p == 0.0 {
                return 0.0;
            }
            dealt.add_card(card_value);
        }
        p
    }

    /// Probability of the card value on a draw from the full deck, as used
    /// by the sampling-with-replacement approximations.
    pub fn replacement_probability(&self, card_value: u8) -> f64 {
        self.count(card_value) as f64 / self.total as f64
    }

    pub fn up_card_probability(&self, dealer_up_card: u8) -> f64 {
        self.replacement_probability(dealer_up_card)
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandTotal {
    pub total: u16,
    pub soft: bool,
}

impl HandTotal {
    pub fn is_bust(&self) -> bool {
        self.total > 21
    }
}

/// Total of an ordered hand. At most one ace is counted as 11, and only when
/// that keeps the total at or below 21.
pub fn hand_total(hand: &[u8]) -> HandTotal {
    let sum: u16 = hand.iter().map(|&c| c as u16).sum();
    if hand.contains(&1) && sum + 10 <= 21 {
        HandTotal {
            total: sum + 10,
            soft: true,
        }
    } else {
        HandTotal {
            total: sum,
            soft: false,
        }
    }
}

/// Adds one card to a running (total, soft) pair the way the replacement
/// approximations track partial totals.
pub fn add_to_total(total: u16, soft: bool, card_value: u8) -> (u16, bool) {
    let mut total = total + card_value as u16;
    let mut soft = soft;
    if card_value == 1 && !soft && total + 10 <= 21 {
        total += 10;
        soft = true;
    }
    if total > 21 && soft {
        total -= 10;
        soft = false;
    }
    (total, soft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_hand_total() {
        assert_eq!(hand_total(&[1, 10]), HandTotal { total: 21, soft: true });
        let bust = hand_total(&[10, 10, 5]);
        assert_eq!(bust, HandTotal { total: 25, soft: false });
        assert!(bust.is_bust());
        assert_eq!(hand_total(&[1, 1, 10]), HandTotal { total: 12, soft: false });
        assert_eq!(hand_total(&[1, 1, 9]), HandTotal { total: 21, soft: true });
        assert_eq!(hand_total(&[1, 1]), HandTotal { total: 12, soft: true });
        assert_eq!(hand_total(&[2, 2]), HandTotal { total: 4, soft: false });
    }

    #[test]
    fn hand_total_agrees_with_card_count() {
        let mut rng = rand::thread_rng();
        for _turn in 0..100 {
            let len = rng.gen_range(2..=6);
            let hand: Vec<u8> = (0..len).map(|_| rng.gen_range(1..=10)).collect();
            let card_count = CardCount::from_cards(&hand);
            let total = hand_total(&hand);
            assert_eq!(total.total, card_count.get_actual_sum());
            assert_eq!(total.soft, card_count.is_soft());
        }
    }

    #[test]
    fn running_total_matches_hand_total() {
        let mut rng = rand::thread_rng();
        for _turn in 0..100 {
            let mut hand = vec![];
            let (mut total, mut soft) = (0, false);
            while total < 17 {
                let card_value = rng.gen_range(1..=10);
                hand.push(card_value);
                (total, soft) = add_to_total(total, soft, card_value);
                assert_eq!(hand_total(&hand), HandTotal { total, soft });
            }
        }
    }

    #[test]
    fn test_draw_probability() {
        let deck = Deck::standard();
        let dealt = CardCount::empty();
        assert_eq!(deck.draw_probability(&dealt, 10), 16.0 / 52.0);
        assert_eq!(deck.draw_probability(&dealt, 1), 4.0 / 52.0);

        let dealt = CardCount::from_cards(&[10, 1]);
        assert_eq!(deck.draw_probability(&dealt, 10), 15.0 / 50.0);

        let dealt = CardCount::from_cards(&[3, 3, 3, 3]);
        assert_eq!(deck.draw_probability(&dealt, 3), 0.0);
        let dealt = dealt.with_card(3);
        assert_eq!(deck.draw_probability(&dealt, 3), 0.0);
    }

    #[test]
    fn test_sequence_probability() {
        let deck = Deck::standard();
        let dealt = CardCount::from_cards(&[6]);
        let p = deck.sequence_probability(&dealt, &[1, 10]);
        assert!((p - 4.0 / 51.0 * 16.0 / 50.0).abs() < 1e-15);
        assert_eq!(deck.sequence_probability(&dealt, &[]), 1.0);
        assert_eq!(deck.sequence_probability(&dealt, &[6, 6, 6, 6]), 0.0);

        let mut total = 0.0;
        for c1 in 1..=10 {
            for c2 in 1..=10 {
                total += deck.sequence_probability(&dealt, &[c1, c2]);
            }
        }
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_deck() {
        assert!(matches!(
            Deck::new([0, 0, 0, 0, 0, 0, 0, 0, 0, 1]),
            Err(ConfigError::InvalidDeck(_))
        ));
        assert!(matches!(
            Deck::new([4, 4, 4, 4, 4, 4, 4, 4, 4, 256]),
            Err(ConfigError::InvalidDeck(_))
        ));
        assert_eq!(Deck::new(STANDARD_DECK_COUNTS), Ok(Deck::standard()));
        assert_eq!(Deck::standard().total(), 52);
        assert_eq!(Deck::standard().up_card_probability(10), 16.0 / 52.0);
    }
}
