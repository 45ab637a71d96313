use sh_types::{ShaderOutput, TypeShape, COMPONENTS_PER_REGISTER};
use tracing::error;

use crate::encoder::{BlockLayoutEncoder, LayoutCursor, Strides};

/// How scalars and vectors share D3D registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HlslEncoderStrategy {
    /// D3D10+ constant buffers and varyings: values share a register unless they would straddle
    /// a register boundary.
    Packed,
    /// D3D9 constant registers: every value starts a new register.
    Loose,
}

impl HlslEncoderStrategy {
    /// Packing rules used for the default uniform block of `output`.
    ///
    /// Only HLSL outputs have a packing strategy. Asking for any other output is a translator bug:
    /// debug builds panic, release builds log it and fall back to [`HlslEncoderStrategy::Packed`].
    pub fn for_output(output: ShaderOutput) -> Self {
        if !output.is_hlsl() {
            if cfg!(debug_assertions) {
                unreachable!("no HLSL packing strategy for {output} output");
            }
            error!(%output, "no HLSL packing strategy for non-HLSL output; using packed");
            return HlslEncoderStrategy::Packed;
        }
        match output {
            ShaderOutput::Hlsl9 => HlslEncoderStrategy::Loose,
            _ => HlslEncoderStrategy::Packed,
        }
    }
}

/// D3D register packing.
#[derive(Debug, Clone)]
pub struct HlslBlockEncoder {
    cursor: LayoutCursor,
    strategy: HlslEncoderStrategy,
}

impl HlslBlockEncoder {
    pub fn new(strategy: HlslEncoderStrategy) -> Self {
        Self {
            cursor: LayoutCursor::new(),
            strategy,
        }
    }

    pub fn for_output(output: ShaderOutput) -> Self {
        Self::new(HlslEncoderStrategy::for_output(output))
    }

    pub fn strategy(&self) -> HlslEncoderStrategy {
        self.strategy
    }

    pub fn is_packed(&self) -> bool {
        self.strategy == HlslEncoderStrategy::Packed
    }

    /// Reserve `registers` whole registers at the current position.
    pub fn skip_registers(&mut self, registers: u32) {
        self.cursor
            .advance(registers as usize * COMPONENTS_PER_REGISTER);
    }
}

impl BlockLayoutEncoder for HlslBlockEncoder {
    fn cursor(&self) -> &LayoutCursor {
        &self.cursor
    }

    fn compute_alignment_and_strides(&mut self, shape: &TypeShape) -> Strides {
        // Loose values, matrices and arrays always start on a fresh register.
        if !self.is_packed() || shape.is_matrix() || shape.is_array() {
            self.cursor.next_register();
        }

        if shape.is_matrix() {
            let array_stride = if shape.is_array() {
                COMPONENTS_PER_REGISTER * shape.matrix_register_count() as usize
            } else {
                0
            };
            Strides {
                array_stride,
                matrix_stride: COMPONENTS_PER_REGISTER,
            }
        } else if shape.is_array() {
            Strides {
                array_stride: COMPONENTS_PER_REGISTER,
                matrix_stride: 0,
            }
        } else {
            if self.is_packed() {
                let components = shape.component_count() as usize;
                if components + self.current_element() > COMPONENTS_PER_REGISTER {
                    self.cursor.next_register();
                }
            }
            Strides::NONE
        }
    }

    fn advance_offset(&mut self, shape: &TypeShape, strides: Strides) {
        // Arrays skip all but the last element here; the last element is then advanced like a
        // non-array value so the block ends right after its used components.
        if shape.is_array() {
            self.cursor
                .advance(strides.array_stride * (shape.array_size as usize - 1));
        }

        if shape.is_matrix() {
            debug_assert_eq!(strides.matrix_stride, COMPONENTS_PER_REGISTER);
            let registers = shape.matrix_register_count() as usize;
            let components = shape.matrix_component_count() as usize;
            self.cursor
                .advance(COMPONENTS_PER_REGISTER * (registers - 1) + components);
        } else if self.is_packed() {
            self.cursor.advance(shape.component_count() as usize);
        } else {
            self.cursor.advance(COMPONENTS_PER_REGISTER);
        }
    }

    fn enter_aggregate_type(&mut self) {
        self.cursor.next_register();
    }

    fn exit_aggregate_type(&mut self) {}
}
