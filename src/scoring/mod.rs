//! Consumers of a finished night: star rating and achievements

pub mod achievements;
pub mod rating;

pub use achievements::{evaluate, Achievement, AchievementTracker};
pub use rating::{RatingBreakdown, StarRating, MAX_STARS};
