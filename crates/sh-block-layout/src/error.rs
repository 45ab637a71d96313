use thiserror::Error;

/// Program link failures caused by register budgets.
///
/// Layout arithmetic itself cannot fail; these errors report programs that are valid GLSL but
/// do not fit the target's register file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error(
        "vertex shader active uniforms exceed the maximum vertex uniform vectors ({max}): `{name}` ends at register {end}"
    )]
    TooManyVertexUniforms { name: String, end: u32, max: u32 },

    #[error(
        "fragment shader active uniforms exceed the maximum fragment uniform vectors ({max}): `{name}` ends at register {end}"
    )]
    TooManyFragmentUniforms { name: String, end: u32, max: u32 },

    #[error(
        "vertex shader sampler count exceeds the maximum vertex texture units ({max}): `{name}` ends at sampler {end}"
    )]
    TooManyVertexSamplers { name: String, end: u32, max: u32 },

    #[error(
        "pixel shader sampler count exceeds the maximum texture image units ({max}): `{name}` ends at sampler {end}"
    )]
    TooManyFragmentSamplers { name: String, end: u32, max: u32 },

    #[error("{stage} shader uniform block count exceeds the maximum uniform blocks ({max}): `{name}` uses register {register}")]
    TooManyUniformBlocks {
        stage: &'static str,
        name: String,
        register: u32,
        max: u32,
    },

    #[error("unknown uniform block `{0}`")]
    UnknownUniformBlock(String),
}
