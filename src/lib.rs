pub mod calculation;
mod deck;
mod error;
mod statearray;
pub mod strategy;

pub use deck::{add_to_total, hand_total, Deck, HandTotal, STANDARD_DECK_COUNTS};
pub use error::ConfigError;
pub use statearray::{CardCount, SingleStateArray, MAX_CARDS_PER_VALUE};
pub use strategy::{Strategy, StrategyPreset, ValueSet};

/// Card values in the order every table in the crate is indexed by.
/// Ace is 1 and every ten-valued card is 10.
pub const CARD_VALUES: [u8; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Hit,
    Stand,
    Double,
    Split,
}

/// Everything a calculation needs besides the strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalculationSettings {
    pub deck: Deck,
    pub number_of_threads: usize,
}

impl CalculationSettings {
    /// `number_of_threads` of 0 means one thread per available core.
    pub fn new(deck: Deck, number_of_threads: usize) -> Self {
        let number_of_threads = {
            if number_of_threads == 0 {
                let parallelism = std::thread::available_parallelism();
                match parallelism {
                    Ok(n) => n.get(),
                    Err(_) => 1,
                }
            } else {
                number_of_threads
            }
        };
        CalculationSettings {
            deck,
            number_of_threads,
        }
    }
}

impl Default for CalculationSettings {
    fn default() -> Self {
        Self::new(Deck::standard(), 0)
    }
}

pub fn check_dealer_up_card(dealer_up_card: u8) -> Result<u8, ConfigError> {
    if CARD_VALUES.contains(&dealer_up_card) {
        Ok(dealer_up_card)
    } else {
        Err(ConfigError::InvalidUpCard(dealer_up_card))
    }
}
