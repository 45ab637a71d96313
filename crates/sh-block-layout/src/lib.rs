//! Uniform, varying and interface-block layout for GLSL→HLSL translation.
//!
//! A uniform block declared with GLSL `std140` rules must be readable bit-for-bit by HLSL code
//! that addresses constant buffers with D3D register packing. This crate computes byte offsets,
//! array strides and matrix strides for shader interface variables under both policies:
//!
//! - [`Std140BlockEncoder`]: GLSL std140 (OpenGL ES 3.0 §2.11.6).
//! - [`HlslBlockEncoder`]: D3D register packing, either [`HlslEncoderStrategy::Packed`]
//!   (D3D10+ constant buffers and varyings) or [`HlslEncoderStrategy::Loose`] (D3D9 `c#`
//!   registers).
//!
//! Both implement [`BlockLayoutEncoder`]. Callers walk the members of one block in declaration
//! order and call [`BlockLayoutEncoder::encode_type`] once per leaf member, bracketing nested
//! structs with [`BlockLayoutEncoder::enter_aggregate_type`] /
//! [`BlockLayoutEncoder::exit_aggregate_type`]. An encoder instance covers exactly one block.
//!
//! On top of the encoders, the crate provides the program-link steps that consume them:
//! register counting for varyings and uniforms ([`register_count`]), register assignment for a
//! stage's uniforms and blocks ([`registers`]), default-block uniform linking ([`uniforms`]),
//! interface-block member layout ([`blocks`]) and the std140 padding planner used when std140
//! structs are re-declared in HLSL ([`padding`]).

#![forbid(unsafe_code)]

pub mod blocks;
mod encoder;
mod error;
mod hlsl;
mod limits;
mod member_info;
pub mod padding;
pub mod register_count;
pub mod registers;
mod std140;
pub mod uniforms;

pub use crate::encoder::{BlockLayoutEncoder, LayoutCursor, Strides};
pub use crate::error::LinkError;
pub use crate::hlsl::{HlslBlockEncoder, HlslEncoderStrategy};
pub use crate::limits::RegisterLimits;
pub use crate::member_info::BlockMemberInfo;
pub use crate::std140::Std140BlockEncoder;

pub use sh_types::{BYTES_PER_COMPONENT, COMPONENTS_PER_REGISTER, REGISTER_BYTES};
