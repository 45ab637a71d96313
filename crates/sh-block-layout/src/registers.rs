//! Register assignment for one shader stage's uniforms and uniform blocks.
//!
//! The HLSL backend gives every referenced default-block uniform a base register and every
//! referenced uniform block a constant-buffer slot, in declaration order. Samplers use their own
//! `s#` register file. Registers taken by driver constants are reserved before the first user
//! declaration.

use std::collections::BTreeMap;

use sh_types::{InterfaceBlock, ShaderOutput, ShaderStage, ShaderVariable};
use tracing::debug;

use crate::register_count::uniform_register_count;

/// Sequential register allocator for one stage of one shader.
#[derive(Debug, Clone)]
pub struct RegisterAssigner {
    output: ShaderOutput,
    next_uniform_register: u32,
    next_sampler_register: u32,
    next_interface_block_register: u32,
    uniform_registers: BTreeMap<String, u32>,
    interface_block_registers: BTreeMap<String, u32>,
}

impl RegisterAssigner {
    /// An allocator with nothing reserved.
    pub fn new(output: ShaderOutput) -> Self {
        Self {
            output,
            next_uniform_register: 0,
            next_sampler_register: 0,
            next_interface_block_register: 0,
            uniform_registers: BTreeMap::new(),
            interface_block_registers: BTreeMap::new(),
        }
    }

    /// An allocator with the driver-constant reservations the HLSL backend makes for `stage`.
    ///
    /// | output | stage    | reserved `c#`                                   | reserved `b#` |
    /// |--------|----------|-------------------------------------------------|---------------|
    /// | HLSL9  | vertex   | 2 (`dx_DepthRange`, `dx_ViewAdjust`)            | 2             |
    /// | HLSL9  | fragment | 3 (`dx_DepthRange`, `dx_ViewCoords`, `dx_DepthFront`) | 2       |
    /// | HLSL11 | any      | 0 (driver constants use their own buffer)       | 2             |
    ///
    /// The two reserved constant-buffer slots hold the default uniform block and the driver
    /// constants.
    pub fn for_stage(output: ShaderOutput, stage: ShaderStage) -> Self {
        let mut assigner = Self::new(output);
        if output == ShaderOutput::Hlsl9 {
            match stage {
                ShaderStage::Fragment => assigner.reserve_uniform_registers(3),
                ShaderStage::Vertex => assigner.reserve_uniform_registers(2),
            }
        }
        assigner.reserve_interface_block_registers(2);
        assigner
    }

    pub fn output(&self) -> ShaderOutput {
        self.output
    }

    pub fn reserve_uniform_registers(&mut self, registers: u32) {
        self.next_uniform_register = self.next_uniform_register.saturating_add(registers);
    }

    pub fn reserve_interface_block_registers(&mut self, registers: u32) {
        self.next_interface_block_register =
            self.next_interface_block_register.saturating_add(registers);
    }

    /// Assign the next free register(s) to `uniform` and return its base register.
    ///
    /// Allocation saturates at `u32::MAX` rather than wrapping; such uniforms fail
    /// [`crate::uniforms::UniformLinker::validate`].
    ///
    /// Samplers are allocated from the sampler register file, everything else from the constant
    /// register file. Declaring the same name twice returns the first assignment.
    pub fn declare_uniform(&mut self, uniform: &ShaderVariable) -> u32 {
        if let Some(&register) = self.uniform_registers.get(&uniform.name) {
            return register;
        }

        let is_sampler = uniform.gl_type().is_some_and(|ty| ty.is_sampler());
        let register_count = uniform_register_count(uniform, self.output);
        let next = if is_sampler {
            &mut self.next_sampler_register
        } else {
            &mut self.next_uniform_register
        };
        let register = *next;
        *next = next.saturating_add(register_count);

        debug!(
            name = %uniform.name,
            register,
            register_count,
            is_sampler,
            "assigned uniform register"
        );
        self.uniform_registers.insert(uniform.name.clone(), register);
        register
    }

    /// Assign the next constant-buffer slot(s) to `block`, one per array element.
    pub fn declare_interface_block(&mut self, block: &InterfaceBlock) -> u32 {
        if let Some(&register) = self.interface_block_registers.get(&block.name) {
            return register;
        }

        let register = self.next_interface_block_register;
        self.next_interface_block_register = register.saturating_add(block.element_count());
        debug!(name = %block.name, register, "assigned uniform block register");
        self.interface_block_registers
            .insert(block.name.clone(), register);
        register
    }

    pub fn uniform_register(&self, name: &str) -> Option<u32> {
        self.uniform_registers.get(name).copied()
    }

    pub fn interface_block_register(&self, name: &str) -> Option<u32> {
        self.interface_block_registers.get(name).copied()
    }

    /// Constant registers used so far, reservations included.
    pub fn uniform_register_count(&self) -> u32 {
        self.next_uniform_register
    }

    pub fn sampler_register_count(&self) -> u32 {
        self.next_sampler_register
    }
}

#[cfg(test)]
mod tests {
    use sh_types::{BlockLayoutType, GlType};

    use super::*;

    #[test]
    fn hlsl9_reserves_driver_constants_per_stage() {
        let vs = RegisterAssigner::for_stage(ShaderOutput::Hlsl9, ShaderStage::Vertex);
        let ps = RegisterAssigner::for_stage(ShaderOutput::Hlsl9, ShaderStage::Fragment);
        let ps11 = RegisterAssigner::for_stage(ShaderOutput::Hlsl11, ShaderStage::Fragment);
        assert_eq!(vs.uniform_register_count(), 2);
        assert_eq!(ps.uniform_register_count(), 3);
        assert_eq!(ps11.uniform_register_count(), 0);
    }

    #[test]
    fn uniforms_are_assigned_sequentially() {
        let mut registers = RegisterAssigner::new(ShaderOutput::Hlsl11);
        let a = ShaderVariable::basic("a", GlType::FloatMat4);
        let b = ShaderVariable::basic("b", GlType::Float).with_array_size(3);
        let c = ShaderVariable::basic("c", GlType::FloatVec2);

        assert_eq!(registers.declare_uniform(&a), 0);
        assert_eq!(registers.declare_uniform(&b), 4);
        assert_eq!(registers.declare_uniform(&c), 7);
        assert_eq!(registers.uniform_register_count(), 8);
        assert_eq!(registers.declare_uniform(&b), 4);
        assert_eq!(registers.uniform_register("c"), Some(7));
    }

    #[test]
    fn samplers_use_their_own_register_file() {
        let mut registers = RegisterAssigner::for_stage(ShaderOutput::Hlsl9, ShaderStage::Fragment);
        let color = ShaderVariable::basic("color", GlType::FloatVec4);
        let tex = ShaderVariable::basic("tex", GlType::Sampler2D).with_array_size(2);
        let lut = ShaderVariable::basic("lut", GlType::Sampler3D);

        assert_eq!(registers.declare_uniform(&color), 3);
        assert_eq!(registers.declare_uniform(&tex), 0);
        assert_eq!(registers.declare_uniform(&lut), 2);
        assert_eq!(registers.sampler_register_count(), 3);
        assert_eq!(registers.uniform_register_count(), 4);
    }

    #[test]
    fn interface_blocks_take_one_slot_per_element() {
        let mut registers = RegisterAssigner::for_stage(ShaderOutput::Hlsl11, ShaderStage::Vertex);
        let mut lights = InterfaceBlock::new("Lights", BlockLayoutType::Standard, Vec::new());
        lights.array_size = 3;
        let camera = InterfaceBlock::new("Camera", BlockLayoutType::Standard, Vec::new());

        assert_eq!(registers.declare_interface_block(&lights), 2);
        assert_eq!(registers.declare_interface_block(&camera), 5);
        assert_eq!(registers.interface_block_register("Lights"), Some(2));
    }

    #[test]
    fn allocation_saturates_instead_of_wrapping() {
        let mut registers = RegisterAssigner::new(ShaderOutput::Hlsl11);
        registers.reserve_uniform_registers(u32::MAX - 1);
        let a = ShaderVariable::basic("a", GlType::FloatVec4).with_array_size(4);
        let b = ShaderVariable::basic("b", GlType::Float);

        assert_eq!(registers.declare_uniform(&a), u32::MAX - 1);
        assert_eq!(registers.uniform_register_count(), u32::MAX);
        assert_eq!(registers.declare_uniform(&b), u32::MAX);
        assert_eq!(registers.uniform_register_count(), u32::MAX);

        let mut big = InterfaceBlock::new("Big", BlockLayoutType::Standard, Vec::new());
        big.array_size = u32::MAX;
        assert_eq!(registers.declare_interface_block(&big), 0);
        let next = InterfaceBlock::new("Next", BlockLayoutType::Standard, Vec::new());
        assert_eq!(registers.declare_interface_block(&next), u32::MAX);
    }
}
