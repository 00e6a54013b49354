use crate::{add_to_total, Deck};

/// Final totals of a hand that keeps drawing with replacement until
/// `stands(total, soft)` holds or it busts. Index 0 is bust and 1 to 21
/// are the totals it stands on.
pub type Completion = [f64; 22];

/// Memoized on (total, softness). Drawing either raises the total or turns
/// a soft hand hard, so the recursion always reaches a stand or a bust.
pub struct ReplacementDraws<'a, F: Fn(u16, bool) -> bool> {
    deck: &'a Deck,
    stands: F,
    memo: [[Option<Completion>; 22]; 2],
}

impl<'a, F: Fn(u16, bool) -> bool> ReplacementDraws<'a, F> {
    pub fn new(deck: &'a Deck, stands: F) -> Self {
        Self {
            deck,
            stands,
            memo: [[None; 22]; 2],
        }
    }

    pub fn completion(&mut self, total: u16, soft: bool) -> Completion {
        let mut completion = [0.0; 22];
        if total > 21 {
            completion[0] = 1.0;
            return completion;
        }
        if (self.stands)(total, soft) {
            completion[total as usize] = 1.0;
            return completion;
        }
        if let Some(memoized) = self.memo[soft as usize][total as usize] {
            return memoized;
        }

        for card_value in 1..=10 {
            let p = self.deck.replacement_probability(card_value);
            if p == 0.0 {
                continue;
            }
            let (next_total, next_soft) = add_to_total(total, soft, card_value);
            let next = self.completion(next_total, next_soft);
            for (c, n) in completion.iter_mut().zip(next.iter()) {
                *c += n * p;
            }
        }

        self.memo[soft as usize][total as usize] = Some(completion);
        completion
    }
}
