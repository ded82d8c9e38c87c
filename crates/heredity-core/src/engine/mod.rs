//! The inference engine for pedigrees.
//!
//! This module provides:
//! - **errors**: Error types for inference failures
//! - **model**: Inheritance model tables and their validation
//! - **pedigree**: Dense, validated family graph
//! - **evidence**: Observed trait values
//! - **hypothesis** / **enumerate**: Complete assignments and their enumeration
//! - **joint**: Joint probability of one hypothesis
//! - **marginals**: Accumulation and normalization of per-person marginals
//! - **inference**: The `infer` entrypoint

pub mod enumerate;
pub mod errors;
pub mod evidence;
pub mod hypothesis;
pub mod inference;
pub mod joint;
pub mod marginals;
pub mod model;
pub mod numeric_kernels;
pub mod parallel_enumeration;
pub mod pedigree;
