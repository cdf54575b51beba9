//! Hand analysis: completeness, special shapes and discard advice.
//!
//! Everything here is pure and works on plain tile slices. None of it
//! touches match state or storage.

pub mod evaluator;
pub mod classifier;
pub mod advisor;

pub use evaluator::{can_hu, can_hu_counts, can_hu_with, waiting_indices};
pub use classifier::{
    classify, is_all_triplets, is_big_four_winds, is_big_three_dragons, is_small_four_winds,
    is_small_three_dragons, HandShape, Shapes,
};
pub use advisor::{best_discard, tile_score};
