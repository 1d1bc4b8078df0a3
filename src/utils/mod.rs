pub mod maths_utils;
pub mod ols;
pub mod optimization;
pub mod time_utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use time_utils::TimeUtils;
