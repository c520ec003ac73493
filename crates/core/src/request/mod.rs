//! Conversion requests, target formats and output naming.
//!
//! A run is described by a list of input directories and a list of target
//! formats. Every combination becomes one [`ConversionRequest`] whose output
//! directory name is derived with [`create_output`].

mod types;

pub use types::{
    classify, create_output, ConversionRequest, FileClass, FormatSelection, TargetFormat,
};
