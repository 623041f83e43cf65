use crown_arena_core::{match_reward, CardId, Deck, Level, PlayerProgress, Side};

fn earned_progress() -> PlayerProgress {
    let mut progress = PlayerProgress::default();
    progress.credit(match_reward(Some(Side::Player), 2));
    progress.credit(match_reward(Some(Side::Enemy), 2));
    progress.credit(5_000);
    let _ = progress.upgrade_card(CardId::Archers).expect("affordable");
    let _ = progress.upgrade_king().expect("affordable");
    progress.saved_deck = Deck::new(&[
        CardId::Golem,
        CardId::Witch,
        CardId::BabyDragon,
        CardId::Miner,
        CardId::Earthquake,
        CardId::Tombstone,
        CardId::Guards,
        CardId::Bowler,
    ])
    .expect("valid deck");
    progress
}

#[test]
fn progress_round_trips_through_json() {
    let progress = earned_progress();
    let json = serde_json::to_string_pretty(&progress).expect("serialize progress");
    let restored: PlayerProgress = serde_json::from_str(&json).expect("deserialize progress");
    assert_eq!(restored, progress);
}

#[test]
fn progress_round_trips_through_bincode() {
    let progress = earned_progress();
    let bytes = bincode::serialize(&progress).expect("serialize progress");
    let restored: PlayerProgress = bincode::deserialize(&bytes).expect("deserialize progress");
    assert_eq!(restored, progress);
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let restored: PlayerProgress =
        serde_json::from_str(r#"{ "currency": 42 }"#).expect("deserialize progress");
    assert_eq!(restored.currency, 42);
    assert_eq!(restored.king_level, Level::STANDARD);
    assert_eq!(restored.saved_deck, Deck::default());
}

#[test]
fn out_of_range_levels_are_rejected_on_load() {
    let parsed: Result<PlayerProgress, _> = serde_json::from_str(r#"{ "king_level": 15 }"#);
    assert!(parsed.is_err());
}

#[test]
fn reward_arithmetic_is_exact() {
    let progress = earned_progress();
    // 200 win + 50 loss + 5000 grant - 1100 card - 1100 king
    assert_eq!(progress.currency, 3_050);
    assert_eq!(progress.card_level(CardId::Archers).get(), 12);
}
