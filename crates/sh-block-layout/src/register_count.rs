//! D3D register counts for varyings and default-block uniforms.
//!
//! The HLSL backend sizes shader stage interfaces in whole registers. A variable's register count
//! is obtained by encoding it into a fresh [`HlslBlockEncoder`] and rounding the resulting block
//! size up to a register.

use sh_types::{ShaderOutput, ShaderVariable, VariableKind, REGISTER_BYTES};

use crate::encoder::BlockLayoutEncoder;
use crate::hlsl::{HlslBlockEncoder, HlslEncoderStrategy};

/// Encode `variable` into `encoder` and return the number of registers the encoder has consumed
/// so far (including anything encoded before this call).
pub fn count_registers(variable: &ShaderVariable, encoder: &mut dyn BlockLayoutEncoder) -> u32 {
    encode_variable(variable, encoder);
    registers_for_block_size(encoder.block_size())
}

/// Registers used by a varying. Varyings are always packed.
pub fn varying_register_count(variable: &ShaderVariable) -> u32 {
    let mut encoder = HlslBlockEncoder::new(HlslEncoderStrategy::Packed);
    count_registers(variable, &mut encoder)
}

/// Registers used by a default-block uniform under the packing rules of `output`.
pub fn uniform_register_count(variable: &ShaderVariable, output: ShaderOutput) -> u32 {
    let mut encoder = HlslBlockEncoder::for_output(output);
    count_registers(variable, &mut encoder)
}

/// `ceil(bytes / 16)`, saturating at `u32::MAX`.
pub fn registers_for_block_size(bytes: usize) -> u32 {
    u32::try_from(bytes.div_ceil(REGISTER_BYTES)).unwrap_or(u32::MAX)
}

fn encode_variable(variable: &ShaderVariable, encoder: &mut dyn BlockLayoutEncoder) {
    match &variable.kind {
        VariableKind::Struct(fields) => {
            for _ in 0..variable.element_count() {
                encoder.enter_aggregate_type();
                for field in fields {
                    encode_variable(field, encoder);
                }
                encoder.exit_aggregate_type();
            }
        }
        VariableKind::Basic(ty) => {
            // Varyings and default-block uniforms never carry matrix layout qualifiers.
            let shape = ty
                .shape()
                .with_array_size(variable.array_size)
                .with_row_major(false);
            encoder.skip_type(&shape);
        }
    }
}
