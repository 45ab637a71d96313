use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Target output language of a shader compilation (`ShShaderOutput`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShaderOutput {
    Essl,
    Glsl,
    /// Direct3D 9 (SM2/SM3): uniforms live in loose `c#` constant registers.
    Hlsl9,
    /// Direct3D 10+ (SM4+): uniforms live in packed constant buffers.
    Hlsl11,
}

impl ShaderOutput {
    pub const fn is_hlsl(self) -> bool {
        matches!(self, ShaderOutput::Hlsl9 | ShaderOutput::Hlsl11)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ShaderOutput::Essl => "essl",
            ShaderOutput::Glsl => "glsl",
            ShaderOutput::Hlsl9 => "hlsl9",
            ShaderOutput::Hlsl11 => "hlsl11",
        }
    }
}

impl fmt::Display for ShaderOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown shader output `{0}` (expected essl, glsl, hlsl9 or hlsl11)")]
pub struct ParseShaderOutputError(pub String);

impl FromStr for ShaderOutput {
    type Err = ParseShaderOutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "essl" => Ok(ShaderOutput::Essl),
            "glsl" => Ok(ShaderOutput::Glsl),
            "hlsl9" | "d3d9" => Ok(ShaderOutput::Hlsl9),
            "hlsl11" | "d3d11" => Ok(ShaderOutput::Hlsl11),
            _ => Err(ParseShaderOutputError(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Memory layout qualifier of an interface block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockLayoutType {
    /// `layout(std140)`.
    Standard,
    Packed,
    /// `layout(shared)`, the GLSL default.
    #[default]
    Shared,
}
