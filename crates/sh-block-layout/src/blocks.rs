//! Uniform block linking.
//!
//! `std140` blocks are laid out with [`Std140BlockEncoder`]; `packed` and `shared` blocks use
//! packed D3D register rules. Each block member becomes a [`LinkedUniform`] carrying its
//! [`BlockMemberInfo`], and each block (or block array element) becomes a [`UniformBlock`] bound
//! to a constant-buffer slot per stage.

use sh_types::{BlockLayoutType, InterfaceBlock, ShaderStage, ShaderVariable, VariableKind};
use tracing::debug;

use crate::encoder::BlockLayoutEncoder;
use crate::error::LinkError;
use crate::hlsl::{HlslBlockEncoder, HlslEncoderStrategy};
use crate::limits::RegisterLimits;
use crate::registers::RegisterAssigner;
use crate::std140::Std140BlockEncoder;
use crate::uniforms::{LinkedUniform, UniformLinker};

/// One uniform block, or one element of a uniform block array.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UniformBlock {
    pub name: String,
    /// Array element this entry stands for; `None` for non-array blocks.
    pub element_index: Option<u32>,
    /// Bytes required by the block's members.
    pub data_size: usize,
    /// Indexes into [`UniformLinker::uniforms`].
    pub member_uniform_indexes: Vec<usize>,
    pub vs_register_index: Option<u32>,
    pub ps_register_index: Option<u32>,
}

impl UniformBlock {
    pub fn is_referenced_by(&self, stage: ShaderStage) -> bool {
        self.register_index(stage).is_some()
    }

    pub fn register_index(&self, stage: ShaderStage) -> Option<u32> {
        match stage {
            ShaderStage::Vertex => self.vs_register_index,
            ShaderStage::Fragment => self.ps_register_index,
        }
    }
}

/// Encoder for the members of a block declared with `layout`.
pub fn block_encoder(layout: BlockLayoutType) -> Box<dyn BlockLayoutEncoder> {
    match layout {
        BlockLayoutType::Standard => Box::new(Std140BlockEncoder::new()),
        BlockLayoutType::Packed | BlockLayoutType::Shared => {
            Box::new(HlslBlockEncoder::new(HlslEncoderStrategy::Packed))
        }
    }
}

/// Encode `fields` in order, appending one [`LinkedUniform`] per leaf to `uniforms`, and return
/// their indexes.
///
/// Leaf names are `prefix.field`, with `[i]` appended to struct array elements. Matrices are
/// row-major when the block or any enclosing struct is declared `row_major`.
pub fn define_block_members(
    fields: &[ShaderVariable],
    prefix: &str,
    block_index: u32,
    encoder: &mut dyn BlockLayoutEncoder,
    in_row_major_layout: bool,
    uniforms: &mut UniformLinker,
) -> Vec<usize> {
    let mut indexes = Vec::new();
    define_members_into(
        fields,
        prefix,
        block_index,
        encoder,
        in_row_major_layout,
        uniforms,
        &mut indexes,
    );
    indexes
}

fn define_members_into(
    fields: &[ShaderVariable],
    prefix: &str,
    block_index: u32,
    encoder: &mut dyn BlockLayoutEncoder,
    in_row_major_layout: bool,
    uniforms: &mut UniformLinker,
    indexes: &mut Vec<usize>,
) {
    for field in fields {
        let field_name = if prefix.is_empty() {
            field.name.clone()
        } else {
            format!("{prefix}.{}", field.name)
        };

        match &field.kind {
            VariableKind::Struct(members) => {
                let row_major = in_row_major_layout || field.is_row_major_layout;
                for element in 0..field.element_count() {
                    let element_name = if field.is_array() {
                        format!("{field_name}[{element}]")
                    } else {
                        field_name.clone()
                    };

                    encoder.enter_aggregate_type();
                    define_members_into(
                        members,
                        &element_name,
                        block_index,
                        encoder,
                        row_major,
                        uniforms,
                        indexes,
                    );
                    encoder.exit_aggregate_type();
                }
            }
            VariableKind::Basic(ty) => {
                let shape = ty
                    .shape()
                    .with_array_size(field.array_size)
                    .with_row_major(ty.is_matrix() && in_row_major_layout);
                let info = encoder.encode_type(&shape);
                let uniform = LinkedUniform::new(
                    field_name,
                    *ty,
                    field.array_size,
                    Some(block_index),
                    info,
                );
                indexes.push(uniforms.push_block_member(uniform));
            }
        }
    }
}

/// The program's uniform blocks, in first-definition order.
#[derive(Debug, Default, Clone)]
pub struct UniformBlockLinker {
    blocks: Vec<UniformBlock>,
}

impl UniformBlockLinker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[UniformBlock] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<UniformBlock> {
        self.blocks
    }

    /// Index of the first entry named `name` (element 0 for block arrays).
    pub fn uniform_block_index(&self, name: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.name == name)
    }

    /// Lay out `block` and create its entries, unless a block with the same name already exists.
    ///
    /// Returns the index of the block's first entry.
    pub fn define_uniform_block(
        &mut self,
        block: &InterfaceBlock,
        uniforms: &mut UniformLinker,
    ) -> usize {
        if let Some(index) = self.uniform_block_index(&block.name) {
            return index;
        }

        let block_index = self.blocks.len();
        let mut encoder = block_encoder(block.layout);
        let member_uniform_indexes = define_block_members(
            &block.fields,
            "",
            u32::try_from(block_index).unwrap_or(u32::MAX),
            encoder.as_mut(),
            block.is_row_major_layout,
            uniforms,
        );
        let data_size = encoder.block_size();
        debug!(
            name = %block.name,
            layout = ?block.layout,
            data_size,
            members = member_uniform_indexes.len(),
            "defined uniform block"
        );

        let element_indexes: Vec<Option<u32>> = if block.array_size > 0 {
            (0..block.array_size).map(Some).collect()
        } else {
            vec![None]
        };
        for element_index in element_indexes {
            self.blocks.push(UniformBlock {
                name: block.name.clone(),
                element_index,
                data_size,
                member_uniform_indexes: member_uniform_indexes.clone(),
                vs_register_index: None,
                ps_register_index: None,
            });
        }
        block_index
    }

    /// Bind the `element_count` entries of block `name` to consecutive slots starting at
    /// `register` in `stage`.
    pub fn assign_registers(
        &mut self,
        stage: ShaderStage,
        name: &str,
        register: u32,
        element_count: u32,
        limits: &RegisterLimits,
    ) -> Result<(), LinkError> {
        let first = self
            .uniform_block_index(name)
            .ok_or_else(|| LinkError::UnknownUniformBlock(name.to_owned()))?;

        let reserved = limits.reserved_uniform_blocks(stage);
        let max = limits.max_uniform_blocks(stage);
        for element in 0..element_count {
            let block = self
                .blocks
                .get_mut(first + element as usize)
                .filter(|b| b.name == name)
                .ok_or_else(|| LinkError::UnknownUniformBlock(name.to_owned()))?;
            let slot = register.saturating_add(element);
            match stage {
                ShaderStage::Vertex => block.vs_register_index = Some(slot),
                ShaderStage::Fragment => block.ps_register_index = Some(slot),
            }

            // Slots below the reservation are as invalid as slots past the limit.
            let out_of_range = slot.checked_sub(reserved).map_or(true, |user| user >= max);
            if out_of_range {
                return Err(LinkError::TooManyUniformBlocks {
                    stage: match stage {
                        ShaderStage::Vertex => "vertex",
                        ShaderStage::Fragment => "fragment",
                    },
                    name: name.to_owned(),
                    register: slot,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Define every block of one stage and bind the statically used ones to the slots handed out
    /// by `registers`.
    pub fn define_stage_blocks(
        &mut self,
        stage: ShaderStage,
        blocks: &[InterfaceBlock],
        registers: &mut RegisterAssigner,
        uniforms: &mut UniformLinker,
        limits: &RegisterLimits,
    ) -> Result<(), LinkError> {
        for block in blocks {
            self.define_uniform_block(block, uniforms);
            if block.static_use {
                let register = registers.declare_interface_block(block);
                self.assign_registers(
                    stage,
                    &block.name,
                    register,
                    block.element_count(),
                    limits,
                )?;
            }
        }
        Ok(())
    }
}
