use std::collections::HashMap;
use std::hash::Hash;
use std::ops::{AddAssign, Index, IndexMut};

const BITS_PER_CARD_VALUE: u32 = 8;

/// Largest number of cards of one value a `CardCount` can hold.
pub const MAX_CARDS_PER_VALUE: u16 = (1 << BITS_PER_CARD_VALUE) - 1;

const fn get_card_value_offsets() -> [u128; 10] {
    let mut ret: [u128; 10] = [0; 10];

    let mut i = 0;
    while i < ret.len() {
        ret[i] = 1 << (BITS_PER_CARD_VALUE * i as u32);
        i += 1;
    }

    ret
}

const CARD_VALUE_OFFSETS: [u128; 10] = get_card_value_offsets();

/// Memo keyed by a set of cards, indexed directly with `&CardCount`.
/// Indexing mutably inserts a default value for an unseen set.
#[derive(Debug, Default, Clone)]
pub struct SingleStateArray<T: Default> {
    data: HashMap<u128, T>,
}

impl<T: Default> SingleStateArray<T> {
    pub fn new() -> SingleStateArray<T> {
        SingleStateArray {
            data: HashMap::new(),
        }
    }

    pub fn get(&self, index: &CardCount) -> Option<&T> {
        self.data.get(&index.key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T: Default> Index<&CardCount> for SingleStateArray<T> {
    type Output = T;
    fn index(&self, index: &CardCount) -> &Self::Output {
        &self.data[&index.key]
    }
}

impl<T: Default> IndexMut<&CardCount> for SingleStateArray<T> {
    fn index_mut(&mut self, index: &CardCount) -> &mut Self::Output {
        self.data.entry(index.key).or_default()
    }
}

/// This provides a container to store the numbers of each card value (from
/// 1 to 10 inclusive). It is used both for hands and for the set of cards
/// already dealt from the shoe.
///
/// The key packs every count into its own byte, so two card counts share a
/// key exactly when they hold the same cards.
#[derive(Clone, Copy, Debug, Default)]
pub struct CardCount {
    counts: [u16; 10],
    key: u128,
    sum: u16,
    total: u16,
}

impl CardCount {
    pub fn new(counts: &[u16; 10]) -> CardCount {
        let mut card_count = CardCount {
            counts: *counts,
            key: 0,
            sum: 0,
            total: 0,
        };

        card_count.propagate_counts();

        card_count
    }

    pub fn empty() -> CardCount {
        Self::default()
    }

    pub fn from_cards(cards: &[u8]) -> CardCount {
        let mut card_count = Self::empty();
        for &card_value in cards {
            card_count.add_card(card_value);
        }
        card_count
    }

    /// Add a card of given card value.
    ///
    /// Note that this method won't check if the card value is valid.
    pub fn add_card(&mut self, card_value: u8) {
        let index = (card_value - 1) as usize;
        self.counts[index] += 1;
        self.key += CARD_VALUE_OFFSETS[index];
        self.sum += card_value as u16;
        self.total += 1;
    }

    /// Remove a card of given card value.
    ///
    /// Note that this method won't check if the card value is valid. It also
    /// won't check if the number of the given card value is already 0.
    pub fn remove_card(&mut self, card_value: u8) {
        let index = (card_value - 1) as usize;
        self.counts[index] -= 1;
        self.key -= CARD_VALUE_OFFSETS[index];
        self.sum -= card_value as u16;
        self.total -= 1;
    }

    /// Returns a copy extended by one card, leaving `self` untouched.
    pub fn with_card(&self, card_value: u8) -> CardCount {
        let mut extended = *self;
        extended.add_card(card_value);
        extended
    }

    /// Note that this method treats Ace as 1.
    pub fn get_sum(&self) -> u16 {
        self.sum
    }

    pub fn get_total(&self) -> u16 {
        self.total
    }

    /// Whether an ace can be counted as 11 without busting.
    pub fn is_soft(&self) -> bool {
        self.counts[0] > 0 && self.sum + 10 <= 21
    }

    pub fn bust(&self) -> bool {
        self.sum > 21
    }

    pub fn is_natural(&self) -> bool {
        self.total == 2 && self.counts[0] == 1 && self.counts[9] == 1
    }

    pub fn get_actual_sum(&self) -> u16 {
        if self.is_soft() {
            self.sum + 10
        } else {
            self.sum
        }
    }

    fn propagate_counts(&mut self) {
        self.key = 0;
        self.sum = 0;
        self.total = 0;
        for i in 0..self.counts.len() {
            self.key += (self.counts[i] as u128) * CARD_VALUE_OFFSETS[i];
            self.sum += ((i + 1) as u16) * self.counts[i];
            self.total += self.counts[i];
        }
    }
}

impl AddAssign<&CardCount> for CardCount {
    fn add_assign(&mut self, rhs: &CardCount) {
        for i in 0..self.counts.len() {
            self.counts[i] += rhs.counts[i];
        }

        self.key += rhs.key;
        self.total += rhs.total;
        self.sum += rhs.sum;
    }
}

impl Index<u8> for CardCount {
    type Output = u16;
    fn index(&self, index: u8) -> &Self::Output {
        &self.counts[(index - 1) as usize]
    }
}

impl Hash for CardCount {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u128(self.key);
    }
}

impl PartialEq for CardCount {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for CardCount {}
