#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub fn rank(&self) -> Rank {
        self.rank
    }
    pub fn suit(&self) -> Suit {
        self.suit
    }
}

impl From<(Rank, Suit)> for Card {
    fn from((rank, suit): (Rank, Suit)) -> Self {
        Self { rank, suit }
    }
}

/// u8 isomorphism
/// each card maps to its index 0..52 in a sorted deck
impl From<Card> for u8 {
    fn from(c: Card) -> u8 {
        u8::from(c.rank) * 4 + u8::from(c.suit)
    }
}
impl From<u8> for Card {
    fn from(n: u8) -> Self {
        assert!(n < 52, "invalid card u8: {}", n);
        Self {
            rank: Rank::from(n / 4),
            suit: Suit::from(n % 4),
        }
    }
}

/// u64 isomorphism
/// each card is one bit of the 52-bit Hand layout
impl From<Card> for u64 {
    fn from(c: Card) -> u64 {
        1 << u8::from(c)
    }
}

/// str isomorphism ("Ah", "Tc", ...)
impl From<&str> for Card {
    fn from(s: &str) -> Self {
        assert!(s.len() == 2, "invalid card str: {}", s);
        Self {
            rank: Rank::from(&s[0..1]),
            suit: Suit::from(&s[1..2]),
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

use super::rank::Rank;
use super::suit::Suit;
