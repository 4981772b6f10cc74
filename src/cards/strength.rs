use super::evaluator::Evaluator;
use super::hand::Hand;
use super::rank::Rank;

/// The category of a five-card poker hand, weakest to strongest,
/// carrying the ranks that define it. Kickers live in [Strength].
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub enum Ranking {
    HighCard(Rank),        // 4 kickers
    OnePair(Rank),         // 3 kickers
    TwoPair(Rank, Rank),   // 1 kicker
    ThreeOAK(Rank),        // 2 kickers
    Straight(Rank),        // 0 kickers
    Flush(Rank),           // 0 kickers
    FullHouse(Rank, Rank), // 0 kickers
    FourOAK(Rank),         // 1 kicker
    StraightFlush(Rank),   // 0 kickers
}

impl Ranking {
    pub fn n_kickers(&self) -> usize {
        match self {
            Ranking::HighCard(_) => 4,
            Ranking::OnePair(_) => 3,
            Ranking::ThreeOAK(_) => 2,
            Ranking::TwoPair(..) | Ranking::FourOAK(_) => 1,
            _ => 0,
        }
    }
    /// rank bits already consumed by the category, excluded from kickers
    pub fn spent(&self) -> u16 {
        match *self {
            Ranking::TwoPair(hi, lo) => u16::from(hi) | u16::from(lo),
            Ranking::HighCard(r)
            | Ranking::OnePair(r)
            | Ranking::ThreeOAK(r)
            | Ranking::FourOAK(r) => u16::from(r),
            _ => 0,
        }
    }
}

impl std::fmt::Display for Ranking {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Ranking::HighCard(r) => write!(f, "HighCard      {}", r),
            Ranking::OnePair(r) => write!(f, "OnePair       {}", r),
            Ranking::TwoPair(a, b) => write!(f, "TwoPair       {}{}", a, b),
            Ranking::ThreeOAK(r) => write!(f, "ThreeOfAKind  {}", r),
            Ranking::Straight(r) => write!(f, "Straight      {}", r),
            Ranking::Flush(r) => write!(f, "Flush         {}", r),
            Ranking::FullHouse(a, b) => write!(f, "FullHouse     {}{}", a, b),
            Ranking::FourOAK(r) => write!(f, "FourOfAKind   {}", r),
            Ranking::StraightFlush(r) => write!(f, "StraightFlush {}", r),
        }
    }
}

/// Tie-breaking ranks as a 13-bit mask. Higher ranks occupy higher
/// bits, so the derived integer ordering is the poker ordering.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub struct Kickers(pub u16);

impl std::fmt::Display for Kickers {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut bits = self.0;
        while bits != 0 {
            let hi = 16 - 1 - bits.leading_zeros() as u8;
            write!(f, "{} ", Rank::from(hi))?;
            bits &= !(1 << hi);
        }
        Ok(())
    }
}

/// Total hand strength: category first, kickers break ties.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub struct Strength {
    ranking: Ranking,
    kickers: Kickers,
}

impl Strength {
    pub fn ranking(&self) -> Ranking {
        self.ranking
    }
}

impl From<(Ranking, Kickers)> for Strength {
    fn from((ranking, kickers): (Ranking, Kickers)) -> Self {
        Self { ranking, kickers }
    }
}

impl From<Hand> for Strength {
    fn from(hand: Hand) -> Self {
        Evaluator::from(hand).strength()
    }
}

impl std::fmt::Display for Strength {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:<18}", self.ranking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_order() {
        assert!(Ranking::StraightFlush(Rank::Ace) > Ranking::FourOAK(Rank::Ace));
        assert!(Ranking::FullHouse(Rank::Two, Rank::Three) > Ranking::Flush(Rank::Ace));
        assert!(Ranking::Flush(Rank::Seven) > Ranking::Straight(Rank::Ace));
        assert!(Ranking::TwoPair(Rank::Three, Rank::Two) > Ranking::OnePair(Rank::Ace));
    }

    #[test]
    fn kickers_break_ties() {
        let a = Strength::from((Ranking::OnePair(Rank::King), Kickers(u16::from(Rank::Ace))));
        let b = Strength::from((Ranking::OnePair(Rank::King), Kickers(u16::from(Rank::Queen))));
        assert!(a > b);
    }
}
