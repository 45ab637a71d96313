use sh_types::ShaderStage;

/// Per-stage register budgets used when linking uniforms and uniform blocks.
///
/// `reserved_*` registers/slots are taken by driver constants before any user uniform; the
/// `max_*` values are what the application may use on top of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegisterLimits {
    pub reserved_vertex_uniform_vectors: u32,
    pub max_vertex_uniform_vectors: u32,
    pub reserved_fragment_uniform_vectors: u32,
    pub max_fragment_uniform_vectors: u32,
    pub reserved_vertex_uniform_blocks: u32,
    pub max_vertex_uniform_blocks: u32,
    pub reserved_fragment_uniform_blocks: u32,
    pub max_fragment_uniform_blocks: u32,
    /// Vertex texture units (`s#` registers in the vertex stage).
    pub max_vertex_samplers: u32,
    /// Pixel texture units.
    pub max_fragment_samplers: u32,
}

impl RegisterLimits {
    /// D3D9: 256 vertex and 224 pixel (SM3) `c#` registers. The vertex stage reserves
    /// `dx_ViewAdjust`/`dx_DepthRange`, the pixel stage `dx_ViewCoords`/`dx_DepthFront`/
    /// `dx_DepthRange`. There are no constant buffers. SM3 vertex texture fetch has 4 samplers,
    /// the pixel stage 16.
    pub const fn d3d9() -> Self {
        Self {
            reserved_vertex_uniform_vectors: 2,
            max_vertex_uniform_vectors: 256 - 2,
            reserved_fragment_uniform_vectors: 3,
            max_fragment_uniform_vectors: 224 - 3,
            reserved_vertex_uniform_blocks: 0,
            max_vertex_uniform_blocks: 0,
            reserved_fragment_uniform_blocks: 0,
            max_fragment_uniform_blocks: 0,
            max_vertex_samplers: 4,
            max_fragment_samplers: 16,
        }
    }

    /// D3D11: driver constants live in their own constant buffer, so no vectors are reserved.
    /// Of the 14 constant buffer slots per stage, `b0` holds the default uniform block and `b1`
    /// the driver constants.
    pub const fn d3d11() -> Self {
        Self {
            reserved_vertex_uniform_vectors: 0,
            max_vertex_uniform_vectors: 1024,
            reserved_fragment_uniform_vectors: 0,
            max_fragment_uniform_vectors: 1024,
            reserved_vertex_uniform_blocks: 2,
            max_vertex_uniform_blocks: 14 - 2,
            reserved_fragment_uniform_blocks: 2,
            max_fragment_uniform_blocks: 14 - 2,
            max_vertex_samplers: 16,
            max_fragment_samplers: 16,
        }
    }

    /// Highest register index (exclusive) a default-block uniform may reach in `stage`.
    pub const fn uniform_vector_limit(&self, stage: ShaderStage) -> u32 {
        match stage {
            ShaderStage::Vertex => {
                self.reserved_vertex_uniform_vectors + self.max_vertex_uniform_vectors
            }
            ShaderStage::Fragment => {
                self.reserved_fragment_uniform_vectors + self.max_fragment_uniform_vectors
            }
        }
    }

    pub const fn reserved_uniform_blocks(&self, stage: ShaderStage) -> u32 {
        match stage {
            ShaderStage::Vertex => self.reserved_vertex_uniform_blocks,
            ShaderStage::Fragment => self.reserved_fragment_uniform_blocks,
        }
    }

    pub const fn max_uniform_blocks(&self, stage: ShaderStage) -> u32 {
        match stage {
            ShaderStage::Vertex => self.max_vertex_uniform_blocks,
            ShaderStage::Fragment => self.max_fragment_uniform_blocks,
        }
    }

    pub const fn max_samplers(&self, stage: ShaderStage) -> u32 {
        match stage {
            ShaderStage::Vertex => self.max_vertex_samplers,
            ShaderStage::Fragment => self.max_fragment_samplers,
        }
    }
}

impl Default for RegisterLimits {
    fn default() -> Self {
        Self::d3d11()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn d3d9_limits_cover_the_whole_register_file() {
        let limits = RegisterLimits::d3d9();
        assert_eq!(limits.uniform_vector_limit(ShaderStage::Vertex), 256);
        assert_eq!(limits.uniform_vector_limit(ShaderStage::Fragment), 224);
        assert_eq!(limits.max_uniform_blocks(ShaderStage::Vertex), 0);
        assert_eq!(limits.max_samplers(ShaderStage::Vertex), 4);
        assert_eq!(limits.max_samplers(ShaderStage::Fragment), 16);
    }

    #[test]
    fn default_is_d3d11() {
        let limits = RegisterLimits::default();
        assert_eq!(limits, RegisterLimits::d3d11());
        assert_eq!(limits.reserved_uniform_blocks(ShaderStage::Fragment), 2);
        assert_eq!(limits.max_uniform_blocks(ShaderStage::Fragment), 12);
    }
}
