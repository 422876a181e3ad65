//! Cache infrastructure

mod memo;

pub use memo::{MemoCache, Memoized, PredictionCache};
