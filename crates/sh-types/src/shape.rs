use crate::gl_type::{GlType, ScalarKind};

/// Vector width or matrix dimensions of a [`TypeShape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dims {
    /// Scalar (`1`) or vector (`2..=4`).
    Vector(u8),
    /// `columns` column vectors of `rows` components each, before any row-major resolution.
    Matrix { columns: u8, rows: u8 },
}

/// One shader-visible type as consumed by the block encoders.
///
/// `row_major` only matters for matrices: it flips which dimension is register-contiguous. The
/// encoders assume 4-byte components throughout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeShape {
    pub base: ScalarKind,
    pub dims: Dims,
    /// `0` means "not an array".
    pub array_size: u32,
    pub row_major: bool,
}

impl TypeShape {
    pub const fn scalar(base: ScalarKind) -> Self {
        Self::vector(base, 1)
    }

    pub const fn vector(base: ScalarKind, width: u8) -> Self {
        assert!(width >= 1 && width <= 4, "vector width must be 1..=4");
        Self {
            base,
            dims: Dims::Vector(width),
            array_size: 0,
            row_major: false,
        }
    }

    /// A float matrix with `columns` columns of `rows` components.
    pub const fn matrix(columns: u8, rows: u8) -> Self {
        assert!(
            columns >= 2 && columns <= 4 && rows >= 2 && rows <= 4,
            "matrix dimensions must be 2..=4"
        );
        Self {
            base: ScalarKind::Float,
            dims: Dims::Matrix { columns, rows },
            array_size: 0,
            row_major: false,
        }
    }

    pub const fn with_array_size(mut self, array_size: u32) -> Self {
        self.array_size = array_size;
        self
    }

    pub const fn with_row_major(mut self, row_major: bool) -> Self {
        self.row_major = row_major;
        self
    }

    pub const fn is_matrix(&self) -> bool {
        matches!(self.dims, Dims::Matrix { .. })
    }

    pub const fn is_array(&self) -> bool {
        self.array_size > 0
    }

    /// Vector width, or the height of one matrix column.
    pub const fn components_per_element(&self) -> u32 {
        match self.dims {
            Dims::Vector(width) => width as u32,
            Dims::Matrix { rows, .. } => rows as u32,
        }
    }

    /// Components in one (non-array) value of this type.
    pub const fn component_count(&self) -> u32 {
        match self.dims {
            Dims::Vector(width) => width as u32,
            Dims::Matrix { columns, rows } => columns as u32 * rows as u32,
        }
    }

    /// Registers a single matrix occupies under this shape's majorness.
    ///
    /// # Panics
    ///
    /// Panics if the shape is not a matrix.
    pub fn matrix_register_count(&self) -> u32 {
        match self.dims {
            Dims::Matrix { columns, rows } => {
                if self.row_major {
                    rows as u32
                } else {
                    columns as u32
                }
            }
            Dims::Vector(_) => unreachable!("matrix register count requested for a non-matrix"),
        }
    }

    /// Components used in each register of a matrix (the length of its last column or row).
    ///
    /// # Panics
    ///
    /// Panics if the shape is not a matrix.
    pub fn matrix_component_count(&self) -> u32 {
        match self.dims {
            Dims::Matrix { columns, rows } => {
                if self.row_major {
                    columns as u32
                } else {
                    rows as u32
                }
            }
            Dims::Vector(_) => unreachable!("matrix component count requested for a non-matrix"),
        }
    }
}

impl From<GlType> for TypeShape {
    fn from(ty: GlType) -> Self {
        ty.shape()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn gl_matrix_shape_keeps_columns_and_rows() {
        let shape = TypeShape::from(GlType::FloatMat3x2);
        assert_eq!(shape.dims, Dims::Matrix { columns: 3, rows: 2 });
        assert_eq!(shape.components_per_element(), 2);
        assert_eq!(shape.matrix_register_count(), 3);
        assert_eq!(shape.matrix_component_count(), 2);

        let row_major = shape.with_row_major(true);
        assert_eq!(row_major.matrix_register_count(), 2);
        assert_eq!(row_major.matrix_component_count(), 3);
    }

    #[test]
    fn sampler_shape_is_scalar_int() {
        let shape = TypeShape::from(GlType::SamplerCube);
        assert_eq!(shape, TypeShape::scalar(ScalarKind::Int));
        assert!(!shape.is_matrix());
    }

    #[test]
    fn shape_agrees_with_gl_type_tables() {
        for ty in GlType::ALL {
            let shape = ty.shape();
            assert_eq!(shape.component_count(), ty.component_count(), "{ty}");
            assert_eq!(shape.is_matrix(), ty.is_matrix(), "{ty}");
            assert_eq!(shape.base, ty.component_type(), "{ty}");
            if ty.is_matrix() {
                for row_major in [false, true] {
                    let shape = shape.with_row_major(row_major);
                    assert_eq!(
                        shape.matrix_register_count(),
                        ty.matrix_register_count(row_major)
                    );
                    assert_eq!(
                        shape.matrix_component_count(),
                        ty.matrix_component_count(row_major)
                    );
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "non-matrix")]
    fn vector_has_no_matrix_register_count() {
        TypeShape::vector(ScalarKind::Float, 4).matrix_register_count();
    }
}
