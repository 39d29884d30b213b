pub mod expiry;
pub mod lifecycle;
pub mod similarity;
