// Native scenario tests for the game loop: a manual frame scheduler stands in
// for requestAnimationFrame and an in-memory store for local storage.

use std::cell::RefCell;
use std::rc::Rc;

use weather_arcade::engine::Entity;
use weather_arcade::engine::geometry::Hitbox;
use weather_arcade::games::{Role, Sprite, lightning_dodge, sunshine_collector, wind_surfer};
use weather_arcade::{
    EndReason, GameLoop, GameVariant, LoopOptions, ManualScheduler, MemoryStore, Phase,
    VariantDesc,
};

fn mount(desc: VariantDesc, store: &MemoryStore) -> (GameLoop, ManualScheduler) {
    let scheduler = ManualScheduler::new();
    let options = LoopOptions { seed: Some(99), ..LoopOptions::default() };
    let game = GameLoop::with_options(desc, Rc::new(scheduler.clone()), Box::new(store.clone()), options);
    (game, scheduler)
}

fn record_ends(game: &GameLoop) -> Rc<RefCell<Vec<u32>>> {
    let ends = Rc::new(RefCell::new(Vec::new()));
    let sink = ends.clone();
    game.on_game_end(move |score| sink.borrow_mut().push(score));
    ends
}

fn drop_on_player(game: &GameLoop, role: Role, sprite: Sprite) {
    game.with_session(|s| {
        let entity = Entity::new(role, sprite, s.player, Hitbox::Circle { radius: 4.0 });
        s.entities.push(entity);
    });
}

#[test]
fn sunshine_collector_end_to_end() {
    let store = MemoryStore::new().with(sunshine_collector::STORAGE_KEY, 3);
    let (game, scheduler) = mount(sunshine_collector::descriptor().without_spawns(), &store);
    let ends = record_ends(&game);
    assert_eq!(game.high_score(), 3);
    assert!(game.start());

    // anchor frame at t=1000, then 20 ms frames up to t=6000
    for i in 0..=250 {
        if i == 50 || i == 100 || i == 150 {
            drop_on_player(&game, Role::Collectible, Sprite::Sun);
        }
        assert!(scheduler.run_frame(1_000.0 + 20.0 * i as f64));
    }
    let s = game.snapshot();
    assert_eq!(s.phase, Phase::Running);
    assert_eq!((s.elapsed_score, s.bonus_score), (5, 3));
    assert_eq!(game.score(), 8);
    assert!(ends.borrow().is_empty());

    drop_on_player(&game, Role::Obstacle, Sprite::StormCloud);
    assert!(scheduler.run_frame(6_020.0));
    assert_eq!(game.phase(), Phase::Ended);
    assert_eq!(game.snapshot().end_reason, Some(EndReason::Collision));
    assert_eq!(*ends.borrow(), vec![8]);
    assert_eq!(game.high_score(), 8);
    assert_eq!(store.get(sunshine_collector::STORAGE_KEY), Some(8));
    assert_eq!(scheduler.pending(), 0);

    // score stays frozen once ended
    assert!(!scheduler.run_frame(9_000.0));
    assert_eq!(game.score(), 8);
    assert_eq!(ends.borrow().len(), 1);
}

#[test]
fn wind_surfer_is_blown_off_the_water() {
    let mut desc = wind_surfer::descriptor().without_spawns();
    if let Some(wind) = desc.wind.as_mut() {
        wind.min_speed = 10.0;
        wind.max_speed = 10.0;
        wind.shift_every = f64::INFINITY;
    }
    let store = MemoryStore::new();
    let (game, scheduler) = mount(desc, &store);
    let ends = record_ends(&game);
    game.start();

    let mut now = 0.0;
    while game.phase() == Phase::Running && now < 20_000.0 {
        scheduler.run_frame(now);
        now += 20.0;
    }
    let s = game.snapshot();
    assert_eq!(s.end_reason, Some(EndReason::LeftBounds));
    assert!(s.player.x == 0.0 || s.player.x == 100.0, "x = {}", s.player.x);
    assert_eq!(*ends.borrow(), vec![s.elapsed_score]);
    assert_eq!(s.elapsed_score, 5);
    assert_eq!(store.get(wind_surfer::STORAGE_KEY), Some(5));

    let frozen = s.player;
    scheduler.run_frames(now, 20.0, 50);
    assert_eq!(game.snapshot().player, frozen);
}

#[test]
fn movement_does_not_depend_on_frame_rate() {
    let run = |step_ms: f64| {
        let (game, scheduler) = mount(lightning_dodge::descriptor().without_spawns(), &MemoryStore::new());
        game.start();
        scheduler.run_frame(0.0);
        assert!(game.key_down("ArrowRight"));
        let mut now = step_ms;
        while now <= 500.0 + 1e-9 {
            scheduler.run_frame(now);
            now += step_ms;
        }
        game.snapshot()
    };
    let fine = run(10.0);
    let coarse = run(25.0);
    assert!((fine.player.x - coarse.player.x).abs() < 1e-6, "{} vs {}", fine.player.x, coarse.player.x);
    assert!((fine.player.x - 80.0).abs() < 1e-6);
    assert_eq!(fine.elapsed_score, coarse.elapsed_score);
}

#[test]
fn stalled_tab_is_clamped_to_one_step() {
    let (game, scheduler) = mount(lightning_dodge::descriptor().without_spawns(), &MemoryStore::new());
    game.start();
    scheduler.run_frame(0.0);
    game.key_down("d");
    scheduler.run_frame(60_000.0);
    let s = game.snapshot();
    // 100 ms of movement at 60 units/s, but a full minute on the score clock
    assert!((s.player.x - 56.0).abs() < 1e-9);
    assert_eq!(s.elapsed_score, 60);
    assert_eq!(s.difficulty, lightning_dodge::descriptor().difficulty.cap);
}

#[test]
fn only_legal_transitions_are_accepted() {
    let (game, scheduler) = mount(lightning_dodge::descriptor().without_spawns(), &MemoryStore::new());
    assert_eq!(game.phase(), Phase::Idle);
    assert!(!game.abort());
    assert!(!game.reset());

    assert!(game.start());
    assert!(!game.start());
    assert!(!game.reset());
    scheduler.run_frame(0.0);

    assert!(game.abort());
    assert_eq!(game.phase(), Phase::Ended);
    assert!(!game.abort());

    // restart straight from Ended gives a fresh session
    assert!(game.start());
    let s = game.snapshot();
    assert_eq!(s.phase, Phase::Running);
    assert_eq!((s.elapsed_score, s.bonus_score, s.difficulty), (0, 0, 1));
    assert_eq!(s.started_ms, None);
}

#[test]
fn input_is_cleared_between_sessions() {
    let (game, scheduler) = mount(lightning_dodge::descriptor().without_spawns(), &MemoryStore::new());
    game.start();
    scheduler.run_frame(0.0);
    game.key_down("ArrowLeft");
    game.abort();
    game.start();
    scheduler.run_frame(1_000.0);
    scheduler.run_frame(1_100.0);
    assert_eq!(game.snapshot().player.x, 50.0, "held key leaked into the next session");
}

#[test]
fn disabled_game_refuses_to_start() {
    let (game, scheduler) = mount(sunshine_collector::descriptor(), &MemoryStore::new());
    game.set_disabled(true);
    assert!(game.is_disabled());
    assert!(!game.start());
    assert!(!game.key_down("Enter"));
    assert_eq!(game.phase(), Phase::Idle);
    assert_eq!(scheduler.pending(), 0);

    game.set_disabled(false);
    assert!(game.start());
}

#[test]
fn stale_frames_do_nothing_after_restart() {
    let (game, scheduler) = mount(lightning_dodge::descriptor().without_spawns(), &MemoryStore::new());
    game.start();
    scheduler.run_frame(0.0);
    game.abort();
    game.start();
    // one frame left over from the aborted session, one for the new session
    assert_eq!(scheduler.pending(), 2);
    scheduler.run_frame(16.0);
    scheduler.run_frame(16.0);
    assert_eq!(scheduler.pending(), 1);
    assert_eq!(game.snapshot().started_ms, Some(16.0));
}

#[test]
fn dropped_loop_leaves_pending_frames_inert() {
    let (game, scheduler) = mount(lightning_dodge::descriptor(), &MemoryStore::new());
    game.start();
    drop(game);
    assert!(scheduler.run_frame(0.0));
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn high_score_never_decreases() {
    let key = lightning_dodge::STORAGE_KEY;
    let store = MemoryStore::new().with(key, 50);
    let (game, scheduler) = mount(lightning_dodge::descriptor().without_spawns(), &store);
    let ends = record_ends(&game);
    game.start();
    scheduler.run_frames(0.0, 100.0, 15);
    drop_on_player(&game, Role::Obstacle, Sprite::Bolt);
    scheduler.run_frame(1_500.0);

    assert_eq!(*ends.borrow(), vec![1]);
    assert_eq!(game.high_score(), 50);
    assert_eq!(store.get(key), Some(50));
}

#[test]
fn end_callback_may_restart_the_game() {
    let (game, scheduler) = mount(sunshine_collector::descriptor().without_spawns(), &MemoryStore::new());
    let again = game.clone();
    let calls = Rc::new(RefCell::new(0));
    let counter = calls.clone();
    game.on_game_end(move |_| {
        *counter.borrow_mut() += 1;
        again.start();
    });
    game.start();
    scheduler.run_frame(0.0);
    drop_on_player(&game, Role::Obstacle, Sprite::StormCloud);
    scheduler.run_frame(20.0);

    assert_eq!(*calls.borrow(), 1);
    assert_eq!(game.phase(), Phase::Running);
    assert_eq!(scheduler.pending(), 1);
    game.clear_game_end();
}

#[test]
fn every_variant_mounts_idle_with_its_own_key() {
    let store = MemoryStore::new();
    for variant in GameVariant::all() {
        let (game, _) = mount(variant.descriptor(), &store);
        assert_eq!(game.variant(), variant);
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.score(), 0);
    }
}
