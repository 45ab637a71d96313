//! Shader interface layout for GLSL→HLSL translation.
//!
//! Re-exports the type model ([`types`]) and the block layout engine ([`layout`]).

#![forbid(unsafe_code)]

pub use sh_block_layout as layout;
pub use sh_types as types;
