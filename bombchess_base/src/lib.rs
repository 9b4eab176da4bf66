//! # Base types for bombchess
//!
//! This is an auxiliary crate for `bombchess`, which contains some core stuff. It was split from the main crate,
//! so everything declared here can be used in the build script for `bombchess`.
//!
//! Normally you don't want to use this crate directly. Use `bombchess` instead.

pub mod bitboard;
pub mod bitboard_consts;
pub mod geometry;
pub mod types;
