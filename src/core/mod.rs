//! Core data types for unmask.
//!
//! Signatures are plain data: every file type is described by the same
//! `SignatureEntry` shape, so new types are added to the signature source
//! rather than to the code.

pub mod classification;
pub mod signature;
