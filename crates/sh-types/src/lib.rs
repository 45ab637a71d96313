//! Shader-visible type descriptions shared by the GLSL→HLSL layout engine.
//!
//! The type checker hands the layout engine already-validated descriptions of every uniform,
//! varying and interface-block member. This crate models those descriptions:
//!
//! - [`GlType`]: the closed set of GLSL ES 3.0 basic types (scalars, vectors, matrices, samplers)
//!   together with their per-type layout facts (component count, rows/columns, register count).
//! - [`TypeShape`]: the reduced description the block encoders consume.
//! - [`ShaderVariable`] / [`InterfaceBlock`]: (possibly nested) declarations as they appear in a
//!   shader's interface.
//! - [`ShaderOutput`]: the target output profile, which selects the HLSL packing rules.

#![forbid(unsafe_code)]

mod gl_type;
mod output;
mod shape;
mod variable;

pub use crate::gl_type::{GlType, ParseGlTypeError, ScalarKind};
pub use crate::output::{BlockLayoutType, ParseShaderOutputError, ShaderOutput, ShaderStage};
pub use crate::shape::{Dims, TypeShape};
pub use crate::variable::{InterfaceBlock, ShaderVariable, VariableKind};

/// Size in bytes of a single component. Every supported scalar kind is 32 bits wide.
pub const BYTES_PER_COMPONENT: usize = 4;

/// Number of components in one D3D register (`float4`).
pub const COMPONENTS_PER_REGISTER: usize = 4;

/// Size in bytes of one D3D register.
pub const REGISTER_BYTES: usize = BYTES_PER_COMPONENT * COMPONENTS_PER_REGISTER;
