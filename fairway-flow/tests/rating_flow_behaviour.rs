//! Behavioural coverage for rating sessions from start to commit.

use std::cell::RefCell;

use fairway_core::test_support::{
    DEFAULT_USER, FlakyRatingStore, MemoryRatingStore, MemoryRoundLog, rating,
};
use fairway_core::{CourseId, CourseRating, PlayAgainResponse, RatingStore, UserId};
use fairway_flow::{
    CandidateCourse, FlowError, FlowPhase, NextStep, RatingFlow, SessionHandle,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

type Flow = RatingFlow<FlakyRatingStore, MemoryRoundLog, ChaCha8Rng>;

struct FlowWorld {
    flow: RefCell<Option<Flow>>,
    initial: RefCell<Vec<CourseRating>>,
    handle: RefCell<Option<SessionHandle>>,
    next: RefCell<Option<NextStep>>,
    comparisons_shown: RefCell<usize>,
    last_error: RefCell<Option<FlowError>>,
}

#[fixture]
fn world() -> FlowWorld {
    FlowWorld {
        flow: RefCell::new(None),
        initial: RefCell::new(Vec::new()),
        handle: RefCell::new(None),
        next: RefCell::new(None),
        comparisons_shown: RefCell::new(0),
        last_error: RefCell::new(None),
    }
}

fn user() -> UserId {
    UserId::new(DEFAULT_USER)
}

fn install(world: &FlowWorld, ratings: Vec<CourseRating>, failures: usize) {
    world.initial.replace(ratings.clone());
    let store = FlakyRatingStore::new(MemoryRatingStore::with_ratings(ratings), failures);
    world.flow.replace(Some(RatingFlow::new(
        user(),
        store,
        MemoryRoundLog::default(),
        ChaCha8Rng::seed_from_u64(17),
    )));
}

fn with_flow<T>(world: &FlowWorld, action: impl FnOnce(&mut Flow, SessionHandle) -> T) -> T {
    let mut borrowed = world.flow.borrow_mut();
    let flow = borrowed
        .as_mut()
        .unwrap_or_else(|| panic!("flow must be installed"));
    let handle = world
        .handle
        .borrow()
        .unwrap_or_else(|| panic!("session must be started"));
    action(flow, handle)
}

fn stored(world: &FlowWorld) -> Vec<CourseRating> {
    let borrowed = world.flow.borrow();
    let flow = borrowed
        .as_ref()
        .unwrap_or_else(|| panic!("flow must be installed"));
    flow.store()
        .get_all_ratings(&user())
        .unwrap_or_else(|err| panic!("memory store read failed: {err}"))
}

fn answer(world: &FlowWorld, response: PlayAgainResponse) {
    let next = with_flow(world, |flow, handle| flow.submit_play_again(handle, response))
        .unwrap_or_else(|err| panic!("play-again answer rejected: {err}"));
    world.next.replace(Some(next));
}

#[given("a golfer with no rated courses")]
fn no_courses(#[from(world)] world: &FlowWorld) {
    install(world, Vec::new(), 0);
}

#[given("a golfer with no rated courses whose store fails the next write")]
fn no_courses_flaky(#[from(world)] world: &FlowWorld) {
    install(world, Vec::new(), 1);
}

#[given("a golfer with five rated courses")]
fn five_courses(#[from(world)] world: &FlowWorld) {
    install(
        world,
        vec![
            rating("a", 9.0),
            rating("b", 7.5),
            rating("c", 6.0),
            rating("d", 4.0),
            rating("e", 2.0),
        ],
        0,
    );
}

#[when("the golfer starts rating a new course")]
fn start(#[from(world)] world: &FlowWorld) {
    let handle = world
        .flow
        .borrow_mut()
        .as_mut()
        .unwrap_or_else(|| panic!("flow must be installed"))
        .start_flow(CandidateCourse::new("new", "New Links", "Coast"))
        .unwrap_or_else(|err| panic!("session should start: {err}"));
    world.handle.replace(Some(handle));
}

#[when("the golfer answers definitely")]
fn answers_definitely(#[from(world)] world: &FlowWorld) {
    answer(world, PlayAgainResponse::Definitely);
}

#[when("the golfer answers maybe")]
fn answers_maybe(#[from(world)] world: &FlowWorld) {
    answer(world, PlayAgainResponse::Maybe);
}

#[when("the golfer prefers the new course in every comparison")]
fn wins_every_comparison(#[from(world)] world: &FlowWorld) {
    while let Some(NextStep::Compare(prompt)) = world.next.take() {
        *world.comparisons_shown.borrow_mut() += 1;
        let next = with_flow(world, |flow, handle| {
            flow.submit_comparison_choice(handle, &prompt.candidate.course_id)
        })
        .unwrap_or_else(|err| panic!("comparison choice rejected: {err}"));
        world.next.replace(Some(next));
    }
}

#[when("the golfer picks a course that is not being compared")]
fn picks_stranger(#[from(world)] world: &FlowWorld) {
    let result = with_flow(world, |flow, handle| {
        flow.submit_comparison_choice(handle, &CourseId::new("stranger"))
    });
    world.last_error.replace(result.err());
}

#[when("the golfer places the course at position 0")]
fn place_top(#[from(world)] world: &FlowWorld) {
    with_flow(world, |flow, handle| flow.submit_rank_position(handle, 0))
        .unwrap_or_else(|err| panic!("position 0 rejected: {err}"));
}

#[when("the golfer confirms the rating")]
fn confirm(#[from(world)] world: &FlowWorld) {
    let result = with_flow(world, Flow::confirm);
    world.last_error.replace(result.err());
}

#[when("the golfer cancels the session")]
fn cancel(#[from(world)] world: &FlowWorld) {
    with_flow(world, Flow::cancel);
}

#[then("the golfer is asked for a rank position")]
fn asked_for_rank(#[from(world)] world: &FlowWorld) {
    assert!(matches!(*world.next.borrow(), Some(NextStep::Rank(_))));
}

#[then("three comparisons were shown")]
fn three_comparisons(#[from(world)] world: &FlowWorld) {
    assert_eq!(*world.comparisons_shown.borrow(), 3);
}

#[then("nothing has been written yet")]
fn nothing_written(#[from(world)] world: &FlowWorld) {
    assert_eq!(stored(world), *world.initial.borrow());
}

#[then("exactly one rating is stored")]
fn one_stored(#[from(world)] world: &FlowWorld) {
    assert_eq!(stored(world).len(), 1);
}

#[then("exactly six ratings are stored")]
fn six_stored(#[from(world)] world: &FlowWorld) {
    assert_eq!(stored(world).len(), 6);
}

#[then("the stored rating scores 6.8")]
fn stored_score(#[from(world)] world: &FlowWorld) {
    let scores: Vec<f64> = stored(world).iter().map(|row| row.final_score).collect();
    assert_eq!(scores, [6.8]);
}

#[then("the stored ratings are unchanged")]
fn unchanged(#[from(world)] world: &FlowWorld) {
    assert_eq!(stored(world), *world.initial.borrow());
    let borrowed = world.flow.borrow();
    let flow = borrowed
        .as_ref()
        .unwrap_or_else(|| panic!("flow must be installed"));
    assert_eq!(flow.active_session(), None);
    assert_eq!(flow.store().inner().writes(), 0);
}

#[then("the commit is reported as failed")]
fn commit_failed(#[from(world)] world: &FlowWorld) {
    assert!(matches!(
        *world.last_error.borrow(),
        Some(FlowError::Commit { .. })
    ));
    assert!(stored(world).is_empty());
}

#[then("the session is still awaiting confirmation")]
fn awaiting_confirmation(#[from(world)] world: &FlowWorld) {
    let phase = with_flow(world, |flow, handle| flow.phase(handle))
        .unwrap_or_else(|err| panic!("session should be live: {err}"));
    assert_eq!(phase, FlowPhase::Confirmation);
}

#[then("the choice is rejected")]
fn choice_rejected(#[from(world)] world: &FlowWorld) {
    assert!(matches!(
        *world.last_error.borrow(),
        Some(FlowError::InvalidChoice { .. })
    ));
}

#[then("the session is still on the first comparison")]
fn still_first(#[from(world)] world: &FlowWorld) {
    let phase = with_flow(world, |flow, handle| flow.phase(handle))
        .unwrap_or_else(|err| panic!("session should be live: {err}"));
    assert_eq!(phase, FlowPhase::Comparison { index: 0, of: 3 });
}

#[scenario(path = "tests/features/rating_flow.feature", index = 0)]
fn first_course_skips_comparisons(world: FlowWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/rating_flow.feature", index = 1)]
fn full_session_commits_once(world: FlowWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/rating_flow.feature", index = 2)]
fn cancel_at_play_again(world: FlowWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/rating_flow.feature", index = 3)]
fn cancel_during_comparisons(world: FlowWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/rating_flow.feature", index = 4)]
fn cancel_while_ranking(world: FlowWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/rating_flow.feature", index = 5)]
fn cancel_at_confirmation(world: FlowWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/rating_flow.feature", index = 6)]
fn failed_commit_is_retried(world: FlowWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/rating_flow.feature", index = 7)]
fn stranger_choice_rejected(world: FlowWorld) {
    let _ = world;
}
