//! Program-wide uniform list for the HLSL backend.
//!
//! Every leaf of every default-block uniform gets a [`LinkedUniform`] recording which `c#`
//! register (and which component within it) holds it in each stage. A uniform used by both the
//! vertex and the fragment shader is a single entry with both register indices set.

use sh_types::{GlType, ShaderOutput, ShaderStage, ShaderVariable, VariableKind};
use tracing::debug;

use crate::encoder::BlockLayoutEncoder;
use crate::error::LinkError;
use crate::hlsl::HlslBlockEncoder;
use crate::limits::RegisterLimits;
use crate::member_info::BlockMemberInfo;
use crate::registers::RegisterAssigner;

/// One leaf uniform of the linked program.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkedUniform {
    /// Fully qualified name, e.g. `lights[1].color`.
    pub name: String,
    pub gl_type: GlType,
    pub array_size: u32,
    /// `None` for default-block uniforms.
    pub block_index: Option<u32>,
    /// Location inside the uniform block; [`BlockMemberInfo::DEFAULT`] for default-block uniforms.
    pub block_info: BlockMemberInfo,
    pub vs_register_index: Option<u32>,
    pub ps_register_index: Option<u32>,
    /// Component (`0..4`) of the first register at which the uniform starts.
    pub register_element: u32,
    /// Registers occupied in each stage. Always `0` for block members.
    pub register_count: u32,
}

impl LinkedUniform {
    pub fn new(
        name: impl Into<String>,
        gl_type: GlType,
        array_size: u32,
        block_index: Option<u32>,
        block_info: BlockMemberInfo,
    ) -> Self {
        let register_count = if block_index.is_none() {
            gl_type.register_count().saturating_mul(array_size.max(1))
        } else {
            0
        };
        Self {
            name: name.into(),
            gl_type,
            array_size,
            block_index,
            block_info,
            vs_register_index: None,
            ps_register_index: None,
            register_element: 0,
            register_count,
        }
    }

    pub fn is_in_default_block(&self) -> bool {
        self.block_index.is_none()
    }

    pub fn is_array(&self) -> bool {
        self.array_size > 0
    }

    pub fn element_count(&self) -> u32 {
        self.array_size.max(1)
    }

    pub fn register_index(&self, stage: ShaderStage) -> Option<u32> {
        match stage {
            ShaderStage::Vertex => self.vs_register_index,
            ShaderStage::Fragment => self.ps_register_index,
        }
    }
}

/// Accumulates the uniforms of all stages of one program.
#[derive(Debug, Default, Clone)]
pub struct UniformLinker {
    uniforms: Vec<LinkedUniform>,
}

impl UniformLinker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uniforms(&self) -> &[LinkedUniform] {
        &self.uniforms
    }

    pub fn into_uniforms(self) -> Vec<LinkedUniform> {
        self.uniforms
    }

    pub fn uniform(&self, name: &str) -> Option<&LinkedUniform> {
        self.uniforms.iter().find(|u| u.name == name)
    }

    pub fn uniform_index(&self, name: &str) -> Option<usize> {
        self.uniforms.iter().position(|u| u.name == name)
    }

    /// Assign registers to and define every statically used uniform of one stage.
    pub fn define_stage_uniforms(
        &mut self,
        stage: ShaderStage,
        registers: &mut RegisterAssigner,
        uniforms: &[ShaderVariable],
    ) {
        for uniform in uniforms.iter().filter(|u| u.static_use) {
            let base_register = registers.declare_uniform(uniform);
            self.define_uniform(stage, registers.output(), uniform, base_register);
        }
    }

    /// Define the leaves of `uniform`, which starts at `base_register` in `stage`.
    pub fn define_uniform(
        &mut self,
        stage: ShaderStage,
        output: ShaderOutput,
        uniform: &ShaderVariable,
        base_register: u32,
    ) {
        let mut encoder = HlslBlockEncoder::for_output(output);
        encoder.skip_registers(base_register);
        self.define_uniform_leaves(stage, uniform, &uniform.name, &mut encoder);
    }

    fn define_uniform_leaves(
        &mut self,
        stage: ShaderStage,
        uniform: &ShaderVariable,
        full_name: &str,
        encoder: &mut HlslBlockEncoder,
    ) {
        match &uniform.kind {
            VariableKind::Struct(fields) => {
                for element in 0..uniform.element_count() {
                    let element_name = if uniform.is_array() {
                        format!("{full_name}[{element}]")
                    } else {
                        full_name.to_owned()
                    };

                    encoder.enter_aggregate_type();
                    for field in fields {
                        let field_name = format!("{element_name}.{}", field.name);
                        self.define_uniform_leaves(stage, field, &field_name, encoder);
                    }
                    encoder.exit_aggregate_type();
                }
            }
            VariableKind::Basic(ty) => {
                // Arrays are aggregates: they start on a register boundary.
                if uniform.is_array() {
                    encoder.enter_aggregate_type();
                }

                let register_element = encoder.current_element() as u32;
                let register = u32::try_from(encoder.current_register()).unwrap_or(u32::MAX);
                let index = match self.uniform_index(full_name) {
                    Some(index) => index,
                    None => {
                        let mut linked = LinkedUniform::new(
                            full_name,
                            *ty,
                            uniform.array_size,
                            None,
                            BlockMemberInfo::DEFAULT,
                        );
                        linked.register_element = register_element;
                        self.uniforms.push(linked);
                        self.uniforms.len() - 1
                    }
                };

                let linked = &mut self.uniforms[index];
                debug_assert_eq!(
                    linked.register_element, register_element,
                    "`{full_name}` starts at a different register component in each stage"
                );
                match stage {
                    ShaderStage::Vertex => linked.vs_register_index = Some(register),
                    ShaderStage::Fragment => linked.ps_register_index = Some(register),
                }
                debug!(
                    name = full_name,
                    ?stage,
                    register,
                    register_element,
                    "defined uniform"
                );

                // Advance the cursor so the following struct fields land after this one.
                let shape = ty
                    .shape()
                    .with_array_size(uniform.array_size)
                    .with_row_major(false);
                encoder.skip_type(&shape);

                if uniform.is_array() {
                    encoder.exit_aggregate_type();
                }
            }
        }
    }

    pub(crate) fn push_block_member(&mut self, uniform: LinkedUniform) -> usize {
        self.uniforms.push(uniform);
        self.uniforms.len() - 1
    }

    /// Check every default-block uniform against the per-stage register budget.
    ///
    /// Samplers are also checked against the stage's texture units, one unit per array element.
    pub fn validate(&self, limits: &RegisterLimits) -> Result<(), LinkError> {
        for uniform in self.uniforms.iter().filter(|u| u.is_in_default_block()) {
            for stage in [ShaderStage::Vertex, ShaderStage::Fragment] {
                if let Some(register) = uniform.register_index(stage) {
                    check_uniform_registers(uniform, stage, register, limits)?;
                }
            }
        }
        Ok(())
    }
}

fn check_uniform_registers(
    uniform: &LinkedUniform,
    stage: ShaderStage,
    register: u32,
    limits: &RegisterLimits,
) -> Result<(), LinkError> {
    let name = || uniform.name.clone();

    if uniform.gl_type.is_sampler() {
        let end = register.saturating_add(uniform.element_count());
        let max = limits.max_samplers(stage);
        if end > max {
            return Err(match stage {
                ShaderStage::Vertex => LinkError::TooManyVertexSamplers {
                    name: name(),
                    end,
                    max,
                },
                ShaderStage::Fragment => LinkError::TooManyFragmentSamplers {
                    name: name(),
                    end,
                    max,
                },
            });
        }
    }

    let end = register.saturating_add(uniform.register_count);
    if end > limits.uniform_vector_limit(stage) {
        return Err(match stage {
            ShaderStage::Vertex => LinkError::TooManyVertexUniforms {
                name: name(),
                end,
                max: limits.max_vertex_uniform_vectors,
            },
            ShaderStage::Fragment => LinkError::TooManyFragmentUniforms {
                name: name(),
                end,
                max: limits.max_fragment_uniform_vectors,
            },
        });
    }
    Ok(())
}
