use sh_types::{TypeShape, BYTES_PER_COMPONENT, COMPONENTS_PER_REGISTER};
use tracing::{trace, warn};

use crate::member_info::BlockMemberInfo;

/// Running position of an encoder, in 4-byte components.
///
/// The cursor only moves forward: it can be advanced or rounded up, never rewound.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LayoutCursor {
    offset: usize,
}

impl LayoutCursor {
    pub const fn new() -> Self {
        Self { offset: 0 }
    }

    /// Current offset in components.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub fn advance(&mut self, components: usize) {
        self.offset = self.offset.saturating_add(components);
    }

    /// Round the offset up to a multiple of `alignment` components.
    pub fn align_to(&mut self, alignment: usize) {
        debug_assert!(alignment > 0);
        self.offset = self.offset.next_multiple_of(alignment);
    }

    /// Round the offset up to the start of the next register (no-op when already aligned).
    pub fn next_register(&mut self) {
        self.align_to(COMPONENTS_PER_REGISTER);
    }
}

/// Array and matrix strides of one member, in components.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Strides {
    pub array_stride: usize,
    pub matrix_stride: usize,
}

impl Strides {
    pub const NONE: Strides = Strides {
        array_stride: 0,
        matrix_stride: 0,
    };
}

/// A block layout policy driving a [`LayoutCursor`].
///
/// Implementors supply the strategy hooks (alignment/strides, advancing, aggregate boundaries);
/// the provided methods hold the shared encode orchestration and the read accessors.
pub trait BlockLayoutEncoder {
    fn cursor(&self) -> &LayoutCursor;

    /// Align the cursor for `shape` and return its strides.
    fn compute_alignment_and_strides(&mut self, shape: &TypeShape) -> Strides;

    /// Move the cursor past a member that was just placed at the current offset.
    fn advance_offset(&mut self, shape: &TypeShape, strides: Strides);

    /// Called before the fields of a nested struct (or of one element of a struct array).
    fn enter_aggregate_type(&mut self);

    /// Called after the fields of a nested struct (or of one element of a struct array).
    fn exit_aggregate_type(&mut self);

    /// Place one leaf member at the next suitable offset and return its location.
    ///
    /// Members must be encoded in declaration order; the encoder cannot detect misordering.
    fn encode_type(&mut self, shape: &TypeShape) -> BlockMemberInfo {
        debug_assert_eq!(shape.base.component_size(), BYTES_PER_COMPONENT);

        let strides = self.compute_alignment_and_strides(shape);
        let offset = self.cursor().offset();
        let info = BlockMemberInfo::new(
            components_to_bytes(offset),
            components_to_bytes(strides.array_stride),
            components_to_bytes(strides.matrix_stride),
            shape.row_major,
        );
        self.advance_offset(shape, strides);

        trace!(
            ?shape,
            offset = info.offset,
            array_stride = info.array_stride,
            matrix_stride = info.matrix_stride,
            end = self.block_size(),
            "encoded block member"
        );
        info
    }

    /// Move past one leaf member exactly like [`Self::encode_type`] without reporting its location.
    ///
    /// Only the cursor moves, so this never clamps and works at any offset.
    fn skip_type(&mut self, shape: &TypeShape) {
        let strides = self.compute_alignment_and_strides(shape);
        self.advance_offset(shape, strides);
    }

    /// Bytes consumed so far.
    ///
    /// Saturates at `usize::MAX`; block sizes that large are rejected by the register limits
    /// long before.

    fn block_size(&self) -> usize {
        self.cursor().offset().saturating_mul(BYTES_PER_COMPONENT)
    }

    fn current_register(&self) -> usize {
        self.cursor().offset() / COMPONENTS_PER_REGISTER
    }

    /// Component index (`0..4`) within [`Self::current_register`].
    fn current_element(&self) -> usize {
        self.cursor().offset() % COMPONENTS_PER_REGISTER
    }
}

/// Byte value of a component count, clamped to `i32::MAX`.
fn components_to_bytes(components: usize) -> i32 {
    components
        .checked_mul(BYTES_PER_COMPONENT)
        .and_then(|bytes| i32::try_from(bytes).ok())
        .unwrap_or_else(|| {
            warn!(components, "block offset does not fit in i32; clamping");
            i32::MAX
        })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sh_types::GlType;

    use super::*;
    use crate::hlsl::{HlslBlockEncoder, HlslEncoderStrategy};
    use crate::std140::Std140BlockEncoder;

    #[test]
    fn cursor_alignment_rounds_up_only() {
        let mut cursor = LayoutCursor::new();
        cursor.next_register();
        assert_eq!(cursor.offset(), 0);

        cursor.advance(3);
        cursor.align_to(2);
        assert_eq!(cursor.offset(), 4);

        cursor.advance(1);
        cursor.next_register();
        assert_eq!(cursor.offset(), 8);

        cursor.align_to(4);
        assert_eq!(cursor.offset(), 8);
    }

    #[test]
    fn cursor_advance_saturates() {
        let mut cursor = LayoutCursor::new();
        cursor.advance(usize::MAX - 1);
        cursor.advance(8);
        assert_eq!(cursor.offset(), usize::MAX);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn offsets_past_i32_clamp_instead_of_panicking() {
        let huge = GlType::FloatVec4.shape().with_array_size(200_000_000);

        let mut encoder = Std140BlockEncoder::new();
        assert_eq!(encoder.encode_type(&huge).offset, 0);
        let after = encoder.encode_type(&GlType::Float.shape());
        assert_eq!(after.offset, i32::MAX);
        assert_eq!(encoder.block_size(), 3_200_000_004);

        let mut encoder = HlslBlockEncoder::new(HlslEncoderStrategy::Packed);
        encoder.encode_type(&huge);
        assert_eq!(encoder.encode_type(&GlType::Float.shape()).offset, i32::MAX);
    }

    #[test]
    fn skip_type_moves_like_encode_type() {
        let shapes = [
            GlType::Float.shape(),
            GlType::FloatVec3.shape(),
            GlType::FloatMat2x3.shape().with_array_size(2),
            GlType::FloatVec2.shape(),
        ];
        let mut encoded = HlslBlockEncoder::new(HlslEncoderStrategy::Loose);
        let mut skipped = HlslBlockEncoder::new(HlslEncoderStrategy::Loose);
        for shape in &shapes {
            encoded.encode_type(shape);
            skipped.skip_type(shape);
            assert_eq!(skipped.block_size(), encoded.block_size());
        }
    }
}
