use crate::engine::Engine;
use crate::MAX_SEATS;

pub const HOLE_SLOTS: usize = 2;
pub const BOARD_SLOTS: usize = 5;
pub const CARD_SLOTS: usize = HOLE_SLOTS + BOARD_SLOTS;

/// Fixed width of the observation vector. Every downstream consumer
/// (the network, and any external adapter replaying checkpoints)
/// depends on this exact layout never changing with player count or
/// phase:
///
///   [0..7)    hero hole + board card ranks, 2..=14, 0 when unrevealed
///   [7..14)   the same cards' suits, 1..=4, 0 when unrevealed
///   [14]      hero seat index
///   [15..21)  per-seat in-hand flags
///   [21]      total pot
///   [22]      hero's amount to call
///   [23..29)  per-seat current street bets
///   [29..35)  per-seat remaining stacks
pub const STATE_LEN: usize = CARD_SLOTS * 2 + 1 + MAX_SEATS + 2 + MAX_SEATS * 2;

/// Project the engine state into the hero's fixed-width view. Pure:
/// reads the engine, never mutates it. Seats beyond the table size and
/// unrevealed cards stay at the zero sentinel.
pub fn encode(engine: &Engine, hero: usize) -> [f32; STATE_LEN] {
    let mut state = [0f32; STATE_LEN];
    let seats = engine.seats();
    if let Some(hole) = seats[hero].hole() {
        for (slot, card) in hole.iter().enumerate() {
            state[slot] = card.rank().face() as f32;
            state[CARD_SLOTS + slot] = u8::from(card.suit()) as f32 + 1.0;
        }
    }
    for (i, card) in engine.board().iter().take(BOARD_SLOTS).enumerate() {
        let slot = HOLE_SLOTS + i;
        state[slot] = card.rank().face() as f32;
        state[CARD_SLOTS + slot] = u8::from(card.suit()) as f32 + 1.0;
    }
    state[CARD_SLOTS * 2] = hero as f32;
    for (i, seat) in seats.iter().enumerate() {
        let base = CARD_SLOTS * 2 + 1;
        state[base + i] = if seat.is_in_hand() { 1.0 } else { 0.0 };
        state[base + MAX_SEATS + 2 + i] = seat.stake() as f32;
        state[base + MAX_SEATS * 2 + 2 + i] = seat.stack() as f32;
    }
    state[CARD_SLOTS * 2 + 1 + MAX_SEATS] = engine.pot() as f32;
    state[CARD_SLOTS * 2 + 2 + MAX_SEATS] = engine.to_call(hero) as f32;
    state
}
