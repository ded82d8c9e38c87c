//! Shared pedigree fixtures for the heredity test suites.

/// Harry with parents Lily (trait absent) and James (trait present).
pub const FAMILY0: &str = include_str!("../data/family0.csv");

/// Molly and Arthur with four children, two of them unobserved.
pub const FAMILY1: &str = include_str!("../data/family1.csv");
