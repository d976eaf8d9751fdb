/*! Lowering tests over graphs built from counting test nodes and the shipped ops. */

mod ops_tests;
mod support;
