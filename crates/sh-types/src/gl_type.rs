use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::shape::{Dims, TypeShape};
use crate::BYTES_PER_COMPONENT;

/// Base component type of a shader value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalarKind {
    Float,
    Int,
    UInt,
    Bool,
}

impl ScalarKind {
    /// Size of one component in bytes.
    ///
    /// Booleans are stored as 32-bit integers in both std140 blocks and D3D registers, so every
    /// kind is 4 bytes wide. There is no double or half support.
    pub const fn component_size(self) -> usize {
        match self {
            ScalarKind::Float | ScalarKind::Int | ScalarKind::UInt | ScalarKind::Bool => {
                BYTES_PER_COMPONENT
            }
        }
    }
}

/// A GLSL ES 3.0 basic type that can appear as a uniform, varying or block member.
///
/// Matrix variants follow the GLSL `matCxR` naming: `FloatMat2x3` has 2 columns and 3 rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlType {
    Float,
    FloatVec2,
    FloatVec3,
    FloatVec4,
    Int,
    IntVec2,
    IntVec3,
    IntVec4,
    UnsignedInt,
    UnsignedIntVec2,
    UnsignedIntVec3,
    UnsignedIntVec4,
    Bool,
    BoolVec2,
    BoolVec3,
    BoolVec4,
    FloatMat2,
    FloatMat3,
    FloatMat4,
    FloatMat2x3,
    FloatMat2x4,
    FloatMat3x2,
    FloatMat3x4,
    FloatMat4x2,
    FloatMat4x3,
    Sampler2D,
    Sampler3D,
    SamplerCube,
    Sampler2DArray,
    SamplerExternalOes,
    Sampler2DShadow,
    SamplerCubeShadow,
    Sampler2DArrayShadow,
    IntSampler2D,
    IntSampler3D,
    IntSamplerCube,
    IntSampler2DArray,
    UnsignedIntSampler2D,
    UnsignedIntSampler3D,
    UnsignedIntSamplerCube,
    UnsignedIntSampler2DArray,
}

/// `(component type, rows, columns, GLSL name)` for every [`GlType`].
///
/// Rows and columns use GL conventions: vectors are a single row, samplers are 1x1.
const fn type_info(ty: GlType) -> (ScalarKind, u8, u8, &'static str) {
    use GlType::*;
    use ScalarKind as K;

    match ty {
        Float => (K::Float, 1, 1, "float"),
        FloatVec2 => (K::Float, 1, 2, "vec2"),
        FloatVec3 => (K::Float, 1, 3, "vec3"),
        FloatVec4 => (K::Float, 1, 4, "vec4"),
        Int => (K::Int, 1, 1, "int"),
        IntVec2 => (K::Int, 1, 2, "ivec2"),
        IntVec3 => (K::Int, 1, 3, "ivec3"),
        IntVec4 => (K::Int, 1, 4, "ivec4"),
        UnsignedInt => (K::UInt, 1, 1, "uint"),
        UnsignedIntVec2 => (K::UInt, 1, 2, "uvec2"),
        UnsignedIntVec3 => (K::UInt, 1, 3, "uvec3"),
        UnsignedIntVec4 => (K::UInt, 1, 4, "uvec4"),
        Bool => (K::Bool, 1, 1, "bool"),
        BoolVec2 => (K::Bool, 1, 2, "bvec2"),
        BoolVec3 => (K::Bool, 1, 3, "bvec3"),
        BoolVec4 => (K::Bool, 1, 4, "bvec4"),
        FloatMat2 => (K::Float, 2, 2, "mat2"),
        FloatMat3 => (K::Float, 3, 3, "mat3"),
        FloatMat4 => (K::Float, 4, 4, "mat4"),
        FloatMat2x3 => (K::Float, 3, 2, "mat2x3"),
        FloatMat2x4 => (K::Float, 4, 2, "mat2x4"),
        FloatMat3x2 => (K::Float, 2, 3, "mat3x2"),
        FloatMat3x4 => (K::Float, 4, 3, "mat3x4"),
        FloatMat4x2 => (K::Float, 2, 4, "mat4x2"),
        FloatMat4x3 => (K::Float, 3, 4, "mat4x3"),
        Sampler2D => (K::Int, 1, 1, "sampler2D"),
        Sampler3D => (K::Int, 1, 1, "sampler3D"),
        SamplerCube => (K::Int, 1, 1, "samplerCube"),
        Sampler2DArray => (K::Int, 1, 1, "sampler2DArray"),
        SamplerExternalOes => (K::Int, 1, 1, "samplerExternalOES"),
        Sampler2DShadow => (K::Int, 1, 1, "sampler2DShadow"),
        SamplerCubeShadow => (K::Int, 1, 1, "samplerCubeShadow"),
        Sampler2DArrayShadow => (K::Int, 1, 1, "sampler2DArrayShadow"),
        IntSampler2D => (K::Int, 1, 1, "isampler2D"),
        IntSampler3D => (K::Int, 1, 1, "isampler3D"),
        IntSamplerCube => (K::Int, 1, 1, "isamplerCube"),
        IntSampler2DArray => (K::Int, 1, 1, "isampler2DArray"),
        UnsignedIntSampler2D => (K::Int, 1, 1, "usampler2D"),
        UnsignedIntSampler3D => (K::Int, 1, 1, "usampler3D"),
        UnsignedIntSamplerCube => (K::Int, 1, 1, "usamplerCube"),
        UnsignedIntSampler2DArray => (K::Int, 1, 1, "usampler2DArray"),
    }
}

impl GlType {
    /// Every basic type, in declaration order.
    pub const ALL: [GlType; 41] = [
        GlType::Float,
        GlType::FloatVec2,
        GlType::FloatVec3,
        GlType::FloatVec4,
        GlType::Int,
        GlType::IntVec2,
        GlType::IntVec3,
        GlType::IntVec4,
        GlType::UnsignedInt,
        GlType::UnsignedIntVec2,
        GlType::UnsignedIntVec3,
        GlType::UnsignedIntVec4,
        GlType::Bool,
        GlType::BoolVec2,
        GlType::BoolVec3,
        GlType::BoolVec4,
        GlType::FloatMat2,
        GlType::FloatMat3,
        GlType::FloatMat4,
        GlType::FloatMat2x3,
        GlType::FloatMat2x4,
        GlType::FloatMat3x2,
        GlType::FloatMat3x4,
        GlType::FloatMat4x2,
        GlType::FloatMat4x3,
        GlType::Sampler2D,
        GlType::Sampler3D,
        GlType::SamplerCube,
        GlType::Sampler2DArray,
        GlType::SamplerExternalOes,
        GlType::Sampler2DShadow,
        GlType::SamplerCubeShadow,
        GlType::Sampler2DArrayShadow,
        GlType::IntSampler2D,
        GlType::IntSampler3D,
        GlType::IntSamplerCube,
        GlType::IntSampler2DArray,
        GlType::UnsignedIntSampler2D,
        GlType::UnsignedIntSampler3D,
        GlType::UnsignedIntSamplerCube,
        GlType::UnsignedIntSampler2DArray,
    ];

    /// Component type. Samplers are stored as integers.
    pub const fn component_type(self) -> ScalarKind {
        type_info(self).0
    }

    pub const fn component_size(self) -> usize {
        self.component_type().component_size()
    }

    /// Number of rows (1 for scalars, vectors and samplers).
    pub const fn row_count(self) -> u32 {
        type_info(self).1 as u32
    }

    /// Number of columns (the vector width for vectors).
    pub const fn column_count(self) -> u32 {
        type_info(self).2 as u32
    }

    pub const fn component_count(self) -> u32 {
        self.row_count() * self.column_count()
    }

    pub const fn is_matrix(self) -> bool {
        self.row_count() > 1
    }

    pub const fn is_sampler(self) -> bool {
        matches!(
            self,
            GlType::Sampler2D
                | GlType::Sampler3D
                | GlType::SamplerCube
                | GlType::Sampler2DArray
                | GlType::SamplerExternalOes
                | GlType::Sampler2DShadow
                | GlType::SamplerCubeShadow
                | GlType::Sampler2DArrayShadow
                | GlType::IntSampler2D
                | GlType::IntSampler3D
                | GlType::IntSamplerCube
                | GlType::IntSampler2DArray
                | GlType::UnsignedIntSampler2D
                | GlType::UnsignedIntSampler3D
                | GlType::UnsignedIntSamplerCube
                | GlType::UnsignedIntSampler2DArray
        )
    }

    /// Number of registers one matrix occupies: one per row when row-major, one per column
    /// otherwise.
    ///
    /// # Panics
    ///
    /// Panics if `self` is not a matrix type.
    pub fn matrix_register_count(self, row_major: bool) -> u32 {
        assert!(self.is_matrix(), "{self} is not a matrix type");
        if row_major {
            self.row_count()
        } else {
            self.column_count()
        }
    }

    /// Number of components used in each register of a matrix.
    ///
    /// # Panics
    ///
    /// Panics if `self` is not a matrix type.
    pub fn matrix_component_count(self, row_major: bool) -> u32 {
        assert!(self.is_matrix(), "{self} is not a matrix type");
        if row_major {
            self.column_count()
        } else {
            self.row_count()
        }
    }

    /// Registers used by one element of a default-block uniform of this type.
    ///
    /// Matrices are uploaded transposed, so a matrix uses one register per row.
    pub const fn register_count(self) -> u32 {
        if self.is_sampler() {
            1
        } else {
            self.row_count()
        }
    }

    pub const fn glsl_name(self) -> &'static str {
        type_info(self).3
    }

    /// The reduced shape the block encoders consume (not arrayed, column-major).
    pub const fn shape(self) -> TypeShape {
        let (base, rows, columns, _) = type_info(self);
        let dims = if rows > 1 {
            Dims::Matrix { columns, rows }
        } else {
            Dims::Vector(columns)
        };
        TypeShape {
            base,
            dims,
            array_size: 0,
            row_major: false,
        }
    }
}

impl fmt::Display for GlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glsl_name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown GLSL type name `{0}`")]
pub struct ParseGlTypeError(pub String);

impl FromStr for GlType {
    type Err = ParseGlTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // `matN` is also spelled `matNxN`.
        let canonical = match s {
            "mat2x2" => "mat2",
            "mat3x3" => "mat3",
            "mat4x4" => "mat4",
            other => other,
        };
        GlType::ALL
            .iter()
            .copied()
            .find(|ty| ty.glsl_name() == canonical)
            .ok_or_else(|| ParseGlTypeError(s.to_owned()))
    }
}
