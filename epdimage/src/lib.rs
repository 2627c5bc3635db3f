//! Decoding and scan-order analysis for 2-bit four-color e-paper frame
//! buffers.
//!
//! A frame is a byte buffer holding four pixels per byte (most significant
//! bits first), each a [`palette::ColorIndex`] into a black/white/yellow/red
//! palette. [`codec`] unpacks the buffer, [`layout`] places the indices into
//! a [`grid::Grid`] under a [`layout::ScanOrder`], and [`analysis`] runs both
//! scan orders so they can be told apart by [`stats`] and by eye through
//! [`compare`].

pub mod palette;
pub mod error;
pub mod config;
pub mod codec;
pub mod grid;
pub mod layout;
pub mod transform;
pub mod stats;
pub mod compare;
pub mod analysis;
pub mod source;
#[cfg(feature = "bmp")]
pub mod bmp;
