use super::hand::Hand;
use super::rank::Rank;
use super::strength::Kickers;
use super::strength::Ranking;
use super::strength::Strength;
use super::suit::Suit;

const WHEEL: u16 = 0b_1000000001111;

/// Finds the best five-card value inside a 5..=7 card Hand by bitwise
/// search, strongest category first. No lookup tables; the rank-mask
/// and per-rank counts of [Hand] are enough for every category.
pub struct Evaluator(Hand);

impl From<Hand> for Evaluator {
    fn from(h: Hand) -> Self {
        Self(h)
    }
}

impl Evaluator {
    pub fn strength(&self) -> Strength {
        let ranking = self.ranking();
        let kickers = self.kickers(ranking);
        Strength::from((ranking, kickers))
    }

    fn ranking(&self) -> Ranking {
        None.or_else(|| self.straight_flush())
            .or_else(|| self.four_oak())
            .or_else(|| self.full_house())
            .or_else(|| self.flush())
            .or_else(|| self.straight())
            .or_else(|| self.three_oak())
            .or_else(|| self.two_pair())
            .or_else(|| self.one_pair())
            .or_else(|| self.high_card())
            .expect("at least one card in Hand")
    }

    /// remaining ranks after the category's own, trimmed from the
    /// bottom until only the payable kickers are left
    fn kickers(&self, ranking: Ranking) -> Kickers {
        let n = ranking.n_kickers();
        let mut bits = self.0.ranks() & !ranking.spent();
        while bits.count_ones() as usize > n {
            bits &= bits - 1;
        }
        Kickers(bits)
    }

    //

    fn high_card(&self) -> Option<Ranking> {
        self.rank_of(1).map(Ranking::HighCard)
    }
    fn one_pair(&self) -> Option<Ranking> {
        self.rank_of(2).map(Ranking::OnePair)
    }
    fn two_pair(&self) -> Option<Ranking> {
        let hi = self.rank_of(2)?;
        let lo = self.rank_of_except(2, hi)?;
        Some(Ranking::TwoPair(hi, lo))
    }
    fn three_oak(&self) -> Option<Ranking> {
        self.rank_of(3).map(Ranking::ThreeOAK)
    }
    fn straight(&self) -> Option<Ranking> {
        Self::straight_rank(self.0.ranks()).map(Ranking::Straight)
    }
    fn flush(&self) -> Option<Ranking> {
        let suit = self.flush_suit()?;
        Some(Ranking::Flush(Rank::from(self.0.of(&suit).ranks())))
    }
    fn full_house(&self) -> Option<Ranking> {
        let trips = self.rank_of(3)?;
        let pair = self.rank_of_except(2, trips)?;
        Some(Ranking::FullHouse(trips, pair))
    }
    fn four_oak(&self) -> Option<Ranking> {
        self.rank_of(4).map(Ranking::FourOAK)
    }
    fn straight_flush(&self) -> Option<Ranking> {
        let suit = self.flush_suit()?;
        Self::straight_rank(self.0.of(&suit).ranks()).map(Ranking::StraightFlush)
    }

    //

    /// highest rank held at least n times
    fn rank_of(&self, n: u32) -> Option<Rank> {
        Rank::all()
            .iter()
            .rev()
            .find(|r| Hand::count(&self.0, **r) >= n)
            .copied()
    }
    /// highest rank held at least n times, other than the given one
    fn rank_of_except(&self, n: u32, except: Rank) -> Option<Rank> {
        Rank::all()
            .iter()
            .rev()
            .filter(|r| **r != except)
            .find(|r| Hand::count(&self.0, **r) >= n)
            .copied()
    }
    fn flush_suit(&self) -> Option<Suit> {
        Suit::all().iter().find(|s| self.0.of(s).size() >= 5).copied()
    }
    /// top of the longest run of five consecutive rank bits, with the
    /// ace-low wheel as the one special case
    fn straight_rank(ranks: u16) -> Option<Rank> {
        let mut bits = ranks;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        bits &= bits << 1;
        if bits != 0 {
            Some(Rank::from(bits))
        } else if ranks & WHEEL == WHEEL {
            Some(Rank::Five)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(s: &str) -> Strength {
        Strength::from(Hand::from(s))
    }

    #[test]
    fn high_card() {
        let strength = eval("As Kh Qd Jc 9s");
        assert_eq!(strength.ranking(), Ranking::HighCard(Rank::Ace));
    }

    #[test]
    fn one_pair() {
        let strength = eval("As Ah Kd Qc Js");
        assert_eq!(strength.ranking(), Ranking::OnePair(Rank::Ace));
    }

    #[test]
    fn two_pair() {
        let strength = eval("As Ah Kd Kc Qs");
        assert_eq!(strength.ranking(), Ranking::TwoPair(Rank::Ace, Rank::King));
    }

    #[test]
    fn three_pair_keeps_best_two() {
        let strength = eval("As Ah Kd Kc Qs Qh Jd");
        assert_eq!(strength.ranking(), Ranking::TwoPair(Rank::Ace, Rank::King));
    }

    #[test]
    fn three_oak() {
        let strength = eval("As Ah Ad Kc Qs");
        assert_eq!(strength.ranking(), Ranking::ThreeOAK(Rank::Ace));
    }

    #[test]
    fn straight() {
        let strength = eval("Ts Jh Qd Kc As");
        assert_eq!(strength.ranking(), Ranking::Straight(Rank::Ace));
    }

    #[test]
    fn wheel_straight() {
        let strength = eval("As 2h 3d 4c 5s");
        assert_eq!(strength.ranking(), Ranking::Straight(Rank::Five));
    }

    #[test]
    fn six_card_straight_tops_out() {
        let strength = eval("As 2s 3h 4d 5c 6s");
        assert_eq!(strength.ranking(), Ranking::Straight(Rank::Six));
    }

    #[test]
    fn flush_over_straight() {
        let strength = eval("4h 6h 7h 8h 9h Ts");
        assert_eq!(strength.ranking(), Ranking::Flush(Rank::Nine));
    }

    #[test]
    fn full_house_over_flush() {
        let strength = eval("Kh Ah Ad As Ks Qs Js 9s");
        assert_eq!(strength.ranking(), Ranking::FullHouse(Rank::Ace, Rank::King));
    }

    #[test]
    fn two_trips_make_a_full_house() {
        let strength = eval("As Ah Ad Kc Ks Kh Qd");
        assert_eq!(strength.ranking(), Ranking::FullHouse(Rank::Ace, Rank::King));
    }

    #[test]
    fn four_oak() {
        let strength = eval("As Ah Ad Ac Ks Kh Qd");
        assert_eq!(strength.ranking(), Ranking::FourOAK(Rank::Ace));
    }

    #[test]
    fn straight_flush_over_four_oak() {
        let strength = eval("Ts Js Qs Ks As Ah Ad");
        assert_eq!(strength.ranking(), Ranking::StraightFlush(Rank::Ace));
    }

    #[test]
    fn wheel_straight_flush() {
        let strength = eval("As 2s 3s 4s 5s");
        assert_eq!(strength.ranking(), Ranking::StraightFlush(Rank::Five));
    }

    #[test]
    fn kickers_decide_seven_card_ties() {
        let better = eval("As Ah Kd Qc Js 4h 3d");
        let worse = eval("Ad Ac Kh Qd Ts 4s 3c");
        assert!(better > worse);
    }
}
