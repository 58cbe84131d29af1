//! Scripted end-to-end games.
//!
//! Every participant is driven by a `ScriptedGenerator`, so these run
//! without network access and with pacing disabled.

use std::sync::Arc;
use werewolf_core::{
    Event, EventKind, EventStream, Faction, Game, GameConfig, PacingConfig, Participant, Prompts,
    Role, ScriptedGenerator, TextGenerator,
};

fn config() -> GameConfig {
    GameConfig::default().with_pacing(PacingConfig::none())
}

/// God, then Alice and Bob (werewolves), Carol (seer), Dave (witch),
/// Eve and Frank (villagers).
fn roster(generator: Arc<dyn TextGenerator>) -> Vec<Participant> {
    let prompts = Prompts::default();
    [
        ("God", Role::Narrator),
        ("Alice", Role::Werewolf),
        ("Bob", Role::Werewolf),
        ("Carol", Role::Seer),
        ("Dave", Role::Witch),
        ("Eve", Role::Villager),
        ("Frank", Role::Villager),
    ]
    .into_iter()
    .map(|(name, role)| Participant::new(name, role, "test-model", prompts, generator.clone()))
    .collect()
}

fn setup(config: GameConfig) -> (Arc<ScriptedGenerator>, Game, EventStream) {
    let generator = Arc::new(ScriptedGenerator::new());
    let (game, events) = Game::new(roster(generator.clone()), config).expect("valid roster");
    (generator, game, events)
}

fn of_kind(events: &[Event], kind: EventKind) -> Vec<&Event> {
    events.iter().filter(|e| e.kind == kind).collect()
}

fn notifications(game: &Game, name: &str) -> Vec<String> {
    game.participant(name)
        .expect("participant exists")
        .memory()
        .notifications()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_first_night_pass_kills_villager() {
    let (generator, mut game, mut events) = setup(config());
    generator.decide_all([
        ("Alice", "Eve"),
        ("Bob", "Eve"),
        ("Carol", "Bob"),
        ("Dave", "PASS"),
    ]);

    game.run_night().await;

    assert_eq!(game.alive().len(), 5);
    assert!(!game.participant("Eve").unwrap().is_alive());
    assert_eq!(game.evaluate_win(), None);
    assert!(!game.is_over());

    let events = events.drain();
    let phases: Vec<_> = of_kind(&events, EventKind::Phase)
        .iter()
        .map(|e| e.content.as_str())
        .collect();
    assert_eq!(phases, vec!["Night Phase Started", "Night Phase Ended"]);
    assert!(of_kind(&events, EventKind::GameOver).is_empty());
}

#[tokio::test]
async fn test_pack_sees_teammates_and_prior_votes() {
    let (generator, mut game, _events) = setup(config());
    generator.decide_all([("Alice", "Eve"), ("Bob", "Eve"), ("Dave", "PASS")]);

    game.run_night().await;

    let alice_prompt = &generator.requests_for("Alice")[0].prompt;
    assert!(alice_prompt.contains("Your Werewolf Teammates: Bob"));
    assert!(!alice_prompt.contains("Other pack members voted"));

    let bob_prompt = &generator.requests_for("Bob")[0].prompt;
    assert!(bob_prompt.contains("Your Werewolf Teammates: Alice"));
    assert!(bob_prompt.contains("Other pack members voted: Eve"));

    for wolf in ["Alice", "Bob"] {
        assert!(notifications(&game, wolf).contains(&"The pack decided to target Eve.".to_string()));
    }
    assert!(notifications(&game, "Carol").iter().all(|n| !n.contains("pack")));
}

#[tokio::test]
async fn test_seer_learns_role_privately() {
    let (generator, mut game, mut events) = setup(config());
    generator.decide_all([("Carol", "Alice"), ("Dave", "PASS")]);

    game.run_night().await;

    assert!(notifications(&game, "Carol").contains(&"You checked Alice: Werewolf.".to_string()));
    assert!(events
        .drain()
        .iter()
        .all(|e| !e.content.contains("You checked")));
}

#[tokio::test]
async fn test_witch_save_gives_peaceful_night() {
    let (generator, mut game, _events) = setup(config());
    generator.decide_all([("Alice", "Eve"), ("Bob", "Eve"), ("Dave", "SAVE")]);

    game.run_night().await;

    assert_eq!(game.alive().len(), 6);
    assert!(notifications(&game, "Dave").contains(&"You saved Eve.".to_string()));
    let narration = generator.requests_for("God");
    let announce = &narration.last().unwrap().prompt;
    assert!(announce.contains("Last night, no one died. It was a peaceful night."));
}

#[tokio::test]
async fn test_witch_poison_overrides_attack() {
    let (generator, mut game, _events) = setup(config());
    generator.decide_all([("Alice", "Eve"), ("Bob", "Eve"), ("Dave", "POISON Frank")]);

    game.run_night().await;

    assert!(game.participant("Eve").unwrap().is_alive());
    assert!(!game.participant("Frank").unwrap().is_alive());
    assert!(notifications(&game, "Dave").contains(&"You poisoned Frank.".to_string()));
    let narration = generator.requests_for("God");
    let announce = &narration.last().unwrap().prompt;
    assert!(announce.contains("Last night, Frank died."));
}

#[tokio::test]
async fn test_hallucinated_targets_are_ignored() {
    // Unscripted decisions are "PASS": the pack targets nobody real, the
    // seer checks a name that does not exist and every day vote is invalid.
    let (_generator, mut game, mut events) = setup(config());

    game.run_night().await;
    game.run_day().await;

    assert_eq!(game.alive().len(), 6);
    assert!(notifications(&game, "Carol").contains(&"You checked PASS: Unknown.".to_string()));

    let events = events.drain();
    let invalid = of_kind(&events, EventKind::System)
        .into_iter()
        .find(|e| e.content.starts_with("Invalid vote target"))
        .expect("invalid vote event");
    assert_eq!(invalid.content, "Invalid vote target: PASS. No elimination.");
}

#[tokio::test]
async fn test_day_tie_goes_to_first_named() {
    let (generator, mut game, _events) = setup(config());
    // Night: the pack targets nobody alive and the witch passes.
    generator.decide_all([
        ("Alice", "Nobody"),
        ("Bob", "Nobody"),
        ("Carol", "Alice"),
        ("Dave", "PASS"),
    ]);
    // Day: Eve and Frank tie at two votes; Eve was named first.
    generator.decide_all([
        ("Alice", "Eve"),
        ("Bob", "Frank"),
        ("Carol", "Frank"),
        ("Dave", "Eve"),
        ("Eve", "Alice"),
        ("Frank", "Bob"),
    ]);

    game.run_night().await;
    assert_eq!(game.alive().len(), 6);
    game.run_day().await;

    assert!(!game.participant("Eve").unwrap().is_alive());
    assert!(game.participant("Frank").unwrap().is_alive());
    assert_eq!(game.alive().len(), 5);
}

#[tokio::test]
async fn test_day_discussion_and_votes() {
    let (generator, mut game, mut events) = setup(config().with_discussion_speakers(2));
    generator.decide_all([("Dave", "PASS")]);

    game.run_night().await;
    events.drain();
    game.run_day().await;
    let events = events.drain();

    let thinking: Vec<_> = of_kind(&events, EventKind::Thought)
        .into_iter()
        .filter(|e| e.content == "[Thinking...]")
        .map(|e| e.agent.as_str())
        .collect();
    assert_eq!(thinking, vec!["Alice", "Bob"]);

    let votes: Vec<_> = of_kind(&events, EventKind::Action)
        .into_iter()
        .filter(|e| e.content.starts_with("Voted for"))
        .map(|e| e.agent.as_str())
        .collect();
    assert_eq!(votes, vec!["Alice", "Bob", "Carol", "Dave", "Eve", "Frank"]);

    // Voters see the alive-set, never each other's votes.
    let frank_requests = generator.requests_for("Frank");
    let frank_vote = &frank_requests.last().unwrap().prompt;
    assert!(frank_vote.contains("Based on today's discussion, who should be eliminated?"));
    assert!(!frank_vote.contains("Voted for"));
}

#[tokio::test]
async fn test_silent_decisions_leave_same_state() {
    let script = [
        ("Alice", "Eve"),
        ("Bob", "Eve"),
        ("Carol", "Alice"),
        ("Dave", "PASS"),
    ];

    let (live_gen, mut live, mut live_events) = setup(config());
    live_gen.decide_all(script);
    let (silent_gen, mut silent, mut silent_events) = setup(config().with_stream_decisions(false));
    silent_gen.decide_all(script);

    live.run_night().await;
    silent.run_night().await;

    assert_eq!(live.alive(), silent.alive());
    for name in ["Alice", "Bob", "Carol", "Dave"] {
        assert_eq!(
            live.participant(name).unwrap().memory(),
            silent.participant(name).unwrap().memory()
        );
    }

    let live_events = live_events.drain();
    let silent_events = silent_events.drain();
    assert!(live_events
        .iter()
        .any(|e| e.agent == "Alice" && e.kind == EventKind::Action));
    assert!(silent_events.iter().all(|e| e.agent != "Alice"));
}

#[tokio::test]
async fn test_generation_failure_is_absorbed() {
    let (generator, mut game, mut events) = setup(config());
    generator.decide_all([("Alice", "Eve"), ("Bob", "Eve")]);
    generator.fail_for("Dave");

    game.run_night().await;

    // The witch's failed decision counts as no intervention.
    assert!(!game.participant("Eve").unwrap().is_alive());
    assert!(game.participant("Dave").unwrap().memory().is_empty());

    let events = events.drain();
    assert!(events
        .iter()
        .any(|e| e.agent == "Dave" && e.kind == EventKind::Thought && e.content.starts_with("Error speaking:")));
    assert!(events
        .iter()
        .any(|e| e.agent == "Dave" && e.kind == EventKind::Action && e.content.starts_with("Error deciding:")));
}

#[tokio::test]
async fn test_villagers_win() {
    let (generator, mut game, _events) = setup(config());
    // Night 1: the witch poisons Alice.
    generator.decide_all([
        ("Alice", "Eve"),
        ("Bob", "Eve"),
        ("Carol", "Alice"),
        ("Dave", "POISON Alice"),
    ]);
    // Day 1: the village votes out Bob.
    generator.decide_all([
        ("Bob", "Carol"),
        ("Carol", "Bob"),
        ("Dave", "Bob"),
        ("Eve", "Bob"),
        ("Frank", "Bob"),
    ]);

    let outcome = game.run().await;

    assert_eq!(outcome.winner, Faction::Village);
    assert_eq!(outcome.rounds, 1);
    assert_eq!(game.alive(), ["Carol", "Dave", "Eve", "Frank"]);
    for name in ["Alice", "Bob", "Carol", "Dave", "Eve", "Frank"] {
        assert_eq!(generator.pending(name), 0, "{name} left decisions unused");
    }

    // Every prompt that lists the living players sees the same or fewer
    // names than the one before it.
    let sizes: Vec<usize> = generator
        .requests()
        .iter()
        .filter_map(|r| alive_listed(&r.prompt))
        .collect();
    assert_eq!(sizes.first(), Some(&6));
    assert_eq!(sizes.last(), Some(&5));
    assert!(sizes.windows(2).all(|w| w[1] <= w[0]), "alive set grew: {sizes:?}");
}

/// Number of names in the first "Alive players: ..." list of a prompt.
fn alive_listed(prompt: &str) -> Option<usize> {
    let (_, rest) = prompt.split_once("Alive players: ")?;
    let list = rest.split(['.', '\n']).next()?;
    Some(list.split(", ").count())
}

#[tokio::test]
async fn test_werewolves_win_in_spawned_game() {
    let (generator, game, mut events) = setup(config());
    // Night 1: the pack kills the seer.
    generator.decide_all([
        ("Alice", "Carol"),
        ("Bob", "Carol"),
        ("Carol", "Alice"),
        ("Dave", "PASS"),
    ]);
    // Day 1: the pack steers the vote onto Eve, reaching parity.
    generator.decide_all([
        ("Alice", "Eve"),
        ("Bob", "Eve"),
        ("Dave", "Alice"),
        ("Eve", "Alice"),
        ("Frank", "Eve"),
    ]);

    let handle = game.start();

    let mut received = Vec::new();
    while let Some(event) = events.recv().await {
        received.push(event);
    }
    let outcome = handle.await.expect("game task completes");

    assert_eq!(outcome.winner, Faction::Werewolves);
    assert_eq!(outcome.rounds, 1);

    let first = received.first().unwrap();
    assert_eq!((first.kind, first.content.as_str()), (EventKind::System, "Game Started"));

    let over = of_kind(&received, EventKind::GameOver);
    assert_eq!(over.len(), 1);
    assert_eq!(over[0].content, "Werewolves Win! They outnumber the Villagers.");
    assert_eq!(received.last().unwrap().kind, EventKind::GameOver);

    let json: serde_json::Value = serde_json::from_str(&over[0].to_json()).unwrap();
    assert_eq!(json["type"], "game_over");
    assert_eq!(json["agent"], "System");
}

#[tokio::test]
async fn test_night_win_ends_before_day() {
    let generator = Arc::new(ScriptedGenerator::new());
    let prompts = Prompts::default();
    let players = [
        ("God", Role::Narrator),
        ("Alice", Role::Werewolf),
        ("Carol", Role::Seer),
        ("Eve", Role::Villager),
    ]
    .into_iter()
    .map(|(name, role)| Participant::new(name, role, "test-model", prompts, generator.clone()))
    .collect();
    let (mut game, mut events) = Game::new(players, config()).unwrap();
    generator.decide_all([("Alice", "Eve"), ("Carol", "Alice")]);

    let outcome = game.run().await;

    assert_eq!(outcome.winner, Faction::Werewolves);
    assert_eq!(outcome.rounds, 1);
    assert_eq!(game.round(), 0);
    let events = events.drain();
    assert!(events.iter().all(|e| e.content != "Day Phase Started"));
}
