use sh_types::{TypeShape, COMPONENTS_PER_REGISTER};

use crate::encoder::{BlockLayoutEncoder, LayoutCursor, Strides};

/// GLSL `std140` layout (OpenGL ES 3.0 §2.11.6).
#[derive(Debug, Default, Clone)]
pub struct Std140BlockEncoder {
    cursor: LayoutCursor,
}

impl Std140BlockEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockLayoutEncoder for Std140BlockEncoder {
    fn cursor(&self) -> &LayoutCursor {
        &self.cursor
    }

    fn compute_alignment_and_strides(&mut self, shape: &TypeShape) -> Strides {
        let (base_alignment, strides) = if shape.is_matrix() {
            let array_stride = if shape.is_array() {
                COMPONENTS_PER_REGISTER * shape.matrix_register_count() as usize
            } else {
                0
            };
            (
                COMPONENTS_PER_REGISTER,
                Strides {
                    array_stride,
                    matrix_stride: COMPONENTS_PER_REGISTER,
                },
            )
        } else if shape.is_array() {
            (
                COMPONENTS_PER_REGISTER,
                Strides {
                    array_stride: COMPONENTS_PER_REGISTER,
                    matrix_stride: 0,
                },
            )
        } else {
            // vec3 aligns like vec4 but only occupies three components.
            let components = shape.component_count() as usize;
            let alignment = if components == 3 { 4 } else { components };
            (alignment, Strides::NONE)
        };

        self.cursor.align_to(base_alignment);
        strides
    }

    fn advance_offset(&mut self, shape: &TypeShape, strides: Strides) {
        if shape.is_array() {
            self.cursor
                .advance(strides.array_stride * shape.array_size as usize);
        } else if shape.is_matrix() {
            debug_assert_eq!(strides.matrix_stride, COMPONENTS_PER_REGISTER);
            self.cursor
                .advance(COMPONENTS_PER_REGISTER * shape.matrix_register_count() as usize);
        } else {
            self.cursor.advance(shape.component_count() as usize);
        }
    }

    fn enter_aggregate_type(&mut self) {
        self.cursor.next_register();
    }

    fn exit_aggregate_type(&mut self) {
        self.cursor.next_register();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sh_types::{GlType, ScalarKind};

    use super::*;
    use crate::BlockMemberInfo;

    fn encode(encoder: &mut Std140BlockEncoder, ty: GlType) -> BlockMemberInfo {
        encoder.encode_type(&ty.shape())
    }

    #[test]
    fn vec3_followed_by_float_shares_the_register() {
        let mut encoder = Std140BlockEncoder::new();
        assert_eq!(encode(&mut encoder, GlType::FloatVec3).offset, 0);
        assert_eq!(encode(&mut encoder, GlType::Float).offset, 12);
        assert_eq!(encoder.block_size(), 16);
    }

    #[test]
    fn vec3_after_float_aligns_to_register() {
        let mut encoder = Std140BlockEncoder::new();
        assert_eq!(encode(&mut encoder, GlType::Float).offset, 0);
        assert_eq!(encode(&mut encoder, GlType::FloatVec3).offset, 16);
        assert_eq!(encoder.block_size(), 28);
    }

    #[test]
    fn vec2_aligns_to_two_components() {
        let mut encoder = Std140BlockEncoder::new();
        encode(&mut encoder, GlType::Float);
        assert_eq!(encode(&mut encoder, GlType::FloatVec2).offset, 8);
        assert_eq!(encode(&mut encoder, GlType::Float).offset, 16);
    }

    #[test]
    fn scalar_array_uses_full_register_stride() {
        let mut encoder = Std140BlockEncoder::new();
        let info = encoder.encode_type(&TypeShape::scalar(ScalarKind::Float).with_array_size(3));
        assert_eq!(info, BlockMemberInfo::new(0, 16, 0, false));
        assert_eq!(encoder.block_size(), 48);
    }

    #[test]
    fn array_after_scalar_starts_on_register() {
        let mut encoder = Std140BlockEncoder::new();
        encode(&mut encoder, GlType::Float);
        let info = encoder.encode_type(&GlType::FloatVec2.shape().with_array_size(2));
        assert_eq!(info.offset, 16);
        assert_eq!(info.array_stride, 16);
        assert_eq!(encoder.block_size(), 48);
    }

    #[test]
    fn column_major_mat4_occupies_four_registers() {
        let mut encoder = Std140BlockEncoder::new();
        let info = encode(&mut encoder, GlType::FloatMat4);
        assert_eq!(info, BlockMemberInfo::new(0, 0, 16, false));
        assert_eq!(encoder.block_size(), 64);
    }

    #[test]
    fn row_major_mat2x4_uses_one_register_per_row() {
        let mut encoder = Std140BlockEncoder::new();
        let shape = GlType::FloatMat2x4.shape().with_row_major(true);
        let info = encoder.encode_type(&shape);
        assert_eq!(info, BlockMemberInfo::new(0, 0, 16, true));
        assert_eq!(encoder.block_size(), 64);

        let mut encoder = Std140BlockEncoder::new();
        encoder.encode_type(&GlType::FloatMat2x4.shape());
        assert_eq!(encoder.block_size(), 32);
    }

    #[test]
    fn matrix_array_stride_covers_all_registers() {
        let mut encoder = Std140BlockEncoder::new();
        let info = encoder.encode_type(&GlType::FloatMat3.shape().with_array_size(2));
        assert_eq!(info, BlockMemberInfo::new(0, 48, 16, false));
        assert_eq!(encoder.block_size(), 96);
    }

    #[test]
    fn struct_boundaries_align_on_entry_and_exit() {
        let mut encoder = Std140BlockEncoder::new();
        encode(&mut encoder, GlType::Float);
        encoder.enter_aggregate_type();
        assert_eq!(encode(&mut encoder, GlType::Float).offset, 16);
        encoder.exit_aggregate_type();
        assert_eq!(encoder.block_size(), 32);
        assert_eq!(encode(&mut encoder, GlType::Float).offset, 32);
    }

    #[test]
    fn register_coordinates_track_cursor() {
        let mut encoder = Std140BlockEncoder::new();
        encode(&mut encoder, GlType::FloatVec4);
        encode(&mut encoder, GlType::FloatVec2);
        encode(&mut encoder, GlType::Float);
        assert_eq!(encoder.current_register(), 1);
        assert_eq!(encoder.current_element(), 3);
    }
}
