pub mod geometry;
pub mod letter_rule;
pub mod model;
pub mod page_classifier;
pub mod references;
pub mod region_filter;
pub mod tracker;
