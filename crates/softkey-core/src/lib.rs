//! Geometry, gesture and timing primitives for the soft keyboard touch engine.
//!
//! Everything here is single-threaded and allocation-light: the dispatcher in
//! `softkey-session` owns one instance of each tracker and drives them from the
//! pointer event stream.

pub mod combo;
pub mod geometry;
pub mod hit;
pub mod settings;
pub mod swipe;
pub mod timer;
pub mod visual;
