//! Unit coverage for score synthesis.
#![forbid(unsafe_code)]

use fairway_core::{NeighborScores, PlayAgainResponse};
use rstest::{fixture, rstest};

use crate::{
    ComparisonTally, NeighborSide, ScoreError, ScoreInputs, ScorePolicy, ScoreSynthesizer,
    calculate_final_score,
};

#[fixture]
fn synthesizer() -> ScoreSynthesizer {
    ScoreSynthesizer::new(ScorePolicy::V1)
}

fn inputs(
    play_again: PlayAgainResponse,
    wins: u32,
    losses: u32,
    rank_position: u32,
    total_courses: u32,
) -> ScoreInputs {
    ScoreInputs {
        play_again,
        tally: ComparisonTally::new(wins, losses),
        rank_position,
        total_courses,
        neighbors: NeighborScores::NONE,
    }
}

#[rstest]
#[case(PlayAgainResponse::Definitely, 8.5)]
#[case(PlayAgainResponse::Maybe, 6.0)]
#[case(PlayAgainResponse::No, 3.5)]
fn base_scores_follow_policy_table(#[case] response: PlayAgainResponse, #[case] expected: f64) {
    assert_eq!(ScorePolicy::V1.base_score(response), expected);
}

#[rstest]
fn top_of_list_with_clean_sweep(synthesizer: ScoreSynthesizer) {
    let breakdown = synthesizer
        .breakdown(&inputs(PlayAgainResponse::Definitely, 3, 0, 0, 5))
        .expect("valid inputs");
    assert_eq!(breakdown.base, 8.5);
    assert_eq!(breakdown.comparison, 9.0);
    assert_eq!(breakdown.position, 10.0);
    assert_eq!(breakdown.neighbor, None);
    assert_eq!(breakdown.final_score, 9.4);
}

#[rstest]
#[case::upper_half(PlayAgainResponse::Definitely, 0, 0, 1, 6, 7.9)]
#[case::lower_half(PlayAgainResponse::Definitely, 0, 0, 4, 6, 5.2)]
#[case::single_loss(PlayAgainResponse::Definitely, 0, 1, 2, 4, 5.0)]
#[case::single_loss_near_top(PlayAgainResponse::Definitely, 0, 1, 1, 6, 7.1)]
fn exact_half_tenths_round_away_from_zero(
    synthesizer: ScoreSynthesizer,
    #[case] play_again: PlayAgainResponse,
    #[case] wins: u32,
    #[case] losses: u32,
    #[case] rank_position: u32,
    #[case] total_courses: u32,
    #[case] expected: f64,
) {
    let breakdown = synthesizer
        .breakdown(&inputs(play_again, wins, losses, rank_position, total_courses))
        .expect("valid inputs");
    assert_eq!(
        breakdown.final_score, expected,
        "blended={}",
        breakdown.blended
    );
}

#[rstest]
fn last_place_position_score_is_not_clamped(synthesizer: ScoreSynthesizer) {
    let breakdown = synthesizer
        .breakdown(&inputs(PlayAgainResponse::Maybe, 0, 0, 2, 2))
        .expect("rank == total is accepted");
    assert_eq!(breakdown.position, -8.0);
    assert_eq!(breakdown.final_score, 1.0);
}

#[rstest]
fn bottom_of_list_with_no_wins(synthesizer: ScoreSynthesizer) {
    let breakdown = synthesizer
        .breakdown(&inputs(PlayAgainResponse::No, 0, 2, 4, 5))
        .expect("valid inputs");
    assert_eq!(breakdown.base, 3.5);
    assert_eq!(breakdown.comparison, 2.0);
    assert_eq!(breakdown.position, 1.0);
    assert_eq!(breakdown.final_score, 2.0);
}

#[rstest]
fn single_neighbor_below_is_offset_upwards(synthesizer: ScoreSynthesizer) {
    let mut request = inputs(PlayAgainResponse::Definitely, 0, 0, 0, 1);
    request.neighbors = NeighborScores {
        above: None,
        below: Some(7.0),
    };
    let breakdown = synthesizer.breakdown(&request).expect("valid inputs");
    assert_eq!(breakdown.neighbor, Some(7.5));
    assert_eq!(breakdown.position, 10.0);
    // 0.3 * 8.5 + 0.2 * 6.0 + 0.3 * 10.0 + 0.2 * 7.5
    assert_eq!(breakdown.final_score, 8.3);
}

#[rstest]
fn single_neighbor_above_is_offset_downwards(synthesizer: ScoreSynthesizer) {
    let mut request = inputs(PlayAgainResponse::Definitely, 0, 0, 1, 1);
    request.neighbors = NeighborScores {
        above: Some(7.0),
        below: None,
    };
    let breakdown = synthesizer.breakdown(&request).expect("valid inputs");
    assert_eq!(breakdown.neighbor, Some(6.5));
    assert_eq!(breakdown.position, 1.0);
    assert_eq!(breakdown.final_score, 5.4);
}

#[rstest]
#[case(NeighborScores { above: None, below: Some(9.8) }, 10.0)]
#[case(NeighborScores { above: Some(1.2), below: None }, 1.0)]
fn single_neighbor_offset_is_clamped(
    synthesizer: ScoreSynthesizer,
    #[case] neighbors: NeighborScores,
    #[case] expected: f64,
) {
    let mut request = inputs(PlayAgainResponse::Maybe, 0, 0, 0, 1);
    request.neighbors = neighbors;
    let breakdown = synthesizer.breakdown(&request).expect("valid inputs");
    assert_eq!(breakdown.neighbor, Some(expected));
}

#[rstest]
fn two_neighbors_are_averaged(synthesizer: ScoreSynthesizer) {
    let mut request = inputs(PlayAgainResponse::Maybe, 1, 1, 1, 3);
    request.neighbors = NeighborScores {
        above: Some(9.0),
        below: Some(6.5),
    };
    let breakdown = synthesizer.breakdown(&request).expect("valid inputs");
    assert_eq!(breakdown.neighbor, Some(7.75));
    assert_eq!(breakdown.comparison, 5.5);
    assert_eq!(breakdown.position, 5.5);
    assert_eq!(breakdown.final_score, 6.1);
}

/// Pins the blend as shipped: a neighbor score occupies the 0.2 slot while
/// the position score keeps only its 0.3 weight; without neighbors the
/// position score fills both slots.
#[rstest]
#[expect(
    clippy::float_arithmetic,
    reason = "the expected blend is recomputed from the policy weights"
)]
fn neighbor_replaces_only_the_second_position_slot(synthesizer: ScoreSynthesizer) {
    let mut request = inputs(PlayAgainResponse::Maybe, 1, 1, 1, 3);
    let without = synthesizer.breakdown(&request).expect("valid inputs");
    assert_eq!(
        without.blended,
        0.3 * 6.0 + 0.2 * 5.5 + 0.3 * 5.5 + 0.2 * 5.5
    );

    request.neighbors = NeighborScores {
        above: Some(9.0),
        below: Some(6.5),
    };
    let with = synthesizer.breakdown(&request).expect("valid inputs");
    assert_eq!(with.blended, 0.3 * 6.0 + 0.2 * 5.5 + 0.3 * 5.5 + 0.2 * 7.75);
}

#[rstest]
#[case(PlayAgainResponse::Definitely, 6.8)]
#[case(PlayAgainResponse::Maybe, 6.0)]
#[case(PlayAgainResponse::No, 5.3)]
fn first_course_uses_neutral_components(
    synthesizer: ScoreSynthesizer,
    #[case] response: PlayAgainResponse,
    #[case] expected: f64,
) {
    let breakdown = synthesizer
        .breakdown(&inputs(response, 0, 0, 0, 0))
        .expect("valid inputs");
    assert_eq!(breakdown.position, 6.0);
    assert_eq!(breakdown.comparison, 6.0);
    assert_eq!(breakdown.neighbor, None);
    assert_eq!(breakdown.final_score, expected);
}

#[rstest]
fn single_course_list_treats_top_as_best(synthesizer: ScoreSynthesizer) {
    let breakdown = synthesizer
        .breakdown(&inputs(PlayAgainResponse::Maybe, 0, 0, 0, 1))
        .expect("valid inputs");
    assert_eq!(breakdown.position, 10.0);
}

#[rstest]
fn rejects_rank_past_end_of_list(synthesizer: ScoreSynthesizer) {
    let err = synthesizer
        .breakdown(&inputs(PlayAgainResponse::Maybe, 0, 0, 6, 5))
        .expect_err("rank beyond list");
    assert_eq!(
        err,
        ScoreError::RankOutOfRange {
            rank_position: 6,
            total_courses: 5,
        }
    );
}

#[rstest]
fn accepts_rank_at_end_of_list(synthesizer: ScoreSynthesizer) {
    let mut request = inputs(PlayAgainResponse::Maybe, 0, 0, 5, 5);
    request.neighbors.above = Some(4.0);
    let score = synthesizer
        .calculate_final_score(&request)
        .expect("end of list is a valid insertion point");
    assert!((1.0..=10.0).contains(&score));
}

#[rstest]
fn rejects_non_finite_neighbor(synthesizer: ScoreSynthesizer) {
    let mut request = inputs(PlayAgainResponse::Maybe, 0, 0, 1, 2);
    request.neighbors.below = Some(f64::INFINITY);
    let err = synthesizer
        .breakdown(&request)
        .expect_err("infinite neighbor");
    assert!(matches!(
        err,
        ScoreError::NonFiniteNeighbor {
            side: NeighborSide::Below,
            ..
        }
    ));
}

#[rstest]
fn free_function_matches_default_synthesizer() {
    let score = calculate_final_score(
        PlayAgainResponse::Definitely,
        3,
        0,
        0,
        5,
        NeighborScores::NONE,
    )
    .expect("valid inputs");
    assert_eq!(score, 9.4);
}

#[rstest]
fn tally_counts_wins_and_losses() {
    let tally = ComparisonTally::default().with_win().with_loss().with_win();
    assert_eq!(tally, ComparisonTally::new(2, 1));
    assert_eq!(tally.total(), 3);
}

#[rstest]
fn breakdown_serialises_policy_name(synthesizer: ScoreSynthesizer) {
    let breakdown = synthesizer
        .breakdown(&inputs(PlayAgainResponse::Maybe, 0, 0, 0, 0))
        .expect("valid inputs");
    let json = serde_json::to_value(breakdown).expect("serialise breakdown");
    assert_eq!(json["policy"], "v1");
}
