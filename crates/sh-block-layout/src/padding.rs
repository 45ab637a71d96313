//! Explicit padding for std140 structs re-declared as HLSL structs.
//!
//! HLSL packs struct members with register packing, so a std140 struct only keeps its offsets in
//! HLSL if float padding members are inserted where std140 would leave a gap. This module decides
//! how many padding floats go before and after each member and names them; emitting the HLSL
//! text is up to the caller.
//!
//! Padding before a member is tracked with a running element index (`0..4`), the component of
//! the current register the next member would start at.

use sh_types::{ShaderVariable, VariableKind, COMPONENTS_PER_REGISTER};

const REGISTER_COMPONENTS: u32 = COMPONENTS_PER_REGISTER as u32;

/// Generator of unique padding member names: `pad_0`, `pad_1`, ...
///
/// One generator should be shared by everything emitted into the same HLSL source.
#[derive(Debug, Default, Clone)]
pub struct PadNames {
    next: u32,
}

impl PadNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_name(&mut self) -> String {
        let name = format!("pad_{}", self.next);
        self.next += 1;
        name
    }

    fn take(&mut self, count: u32) -> Vec<String> {
        (0..count).map(|_| self.next_name()).collect()
    }
}

/// Number of padding floats to emit before `field`, updating `element_index`.
pub fn pre_padding_count(field: &ShaderVariable, element_index: &mut u32) -> u32 {
    let ty = match &field.kind {
        VariableKind::Basic(ty) if !ty.is_matrix() && !field.is_array() => *ty,
        // HLSL starts these on a fresh register by itself.
        _ => {
            *element_index = 0;
            return 0;
        }
    };

    let components = ty.component_count();
    if components >= REGISTER_COMPONENTS {
        *element_index = 0;
        return 0;
    }
    if *element_index + components > REGISTER_COMPONENTS {
        // HLSL moves it to the next register, which is where std140 puts it too.
        *element_index = components;
        return 0;
    }

    let alignment = if components == 3 { 4 } else { components };
    let misalignment = *element_index % alignment;
    let padding = if misalignment == 0 {
        0
    } else {
        alignment - misalignment
    };
    *element_index = (*element_index + padding + components) % REGISTER_COMPONENTS;
    padding
}

/// Element index reached after the members of a struct with `fields`.
///
/// `0` means the struct ends on a register boundary.
pub fn struct_element_index(fields: &[ShaderVariable]) -> u32 {
    let mut element_index = 0;
    for field in fields {
        pre_padding_count(field, &mut element_index);
    }
    element_index
}

/// Number of padding floats to emit after `field` so the next member starts on a fresh register.
///
/// Only matrices, arrays and structs are followed by padding. HLSL row-major packing corresponds
/// to GL column-major matrices, so `use_hlsl_row_major_packing` selects column-major component
/// counts.
pub fn post_padding_count(field: &ShaderVariable, use_hlsl_row_major_packing: bool) -> u32 {
    let components = match &field.kind {
        VariableKind::Struct(fields) => match struct_element_index(fields) {
            0 => return 0,
            index => index,
        },
        VariableKind::Basic(ty) if ty.is_matrix() => {
            ty.matrix_component_count(!use_hlsl_row_major_packing)
        }
        VariableKind::Basic(ty) if field.is_array() => ty.component_count(),
        VariableKind::Basic(_) => return 0,
    };
    REGISTER_COMPONENTS.saturating_sub(components)
}

/// Padding planner for the members of one std140 struct, in declaration order.
#[derive(Debug)]
pub struct Std140Padding<'a> {
    names: &'a mut PadNames,
    element_index: u32,
}

impl<'a> Std140Padding<'a> {
    pub fn new(names: &'a mut PadNames) -> Self {
        Self {
            names,
            element_index: 0,
        }
    }

    pub fn element_index(&self) -> u32 {
        self.element_index
    }

    /// Names of the padding floats to declare before `field`.
    pub fn pre_padding(&mut self, field: &ShaderVariable) -> Vec<String> {
        let count = pre_padding_count(field, &mut self.element_index);
        self.names.take(count)
    }

    /// Names of the padding floats to declare after `field`.
    pub fn post_padding(
        &mut self,
        field: &ShaderVariable,
        use_hlsl_row_major_packing: bool,
    ) -> Vec<String> {
        let count = post_padding_count(field, use_hlsl_row_major_packing);
        self.names.take(count)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sh_types::GlType;

    use super::*;

    fn basic(ty: GlType) -> ShaderVariable {
        ShaderVariable::basic("f", ty)
    }

    fn pre_paddings(types: &[GlType]) -> Vec<u32> {
        let mut element_index = 0;
        types
            .iter()
            .map(|&ty| pre_padding_count(&basic(ty), &mut element_index))
            .collect()
    }

    #[test]
    fn vec3_after_float_is_pushed_to_the_next_register() {
        assert_eq!(pre_paddings(&[GlType::Float, GlType::FloatVec3]), vec![0, 3]);
    }

    #[test]
    fn vec2_aligns_to_two_components() {
        assert_eq!(pre_paddings(&[GlType::Float, GlType::FloatVec2]), vec![0, 1]);
        assert_eq!(
            pre_paddings(&[GlType::FloatVec2, GlType::Float, GlType::FloatVec2]),
            vec![0, 0, 0]
        );
    }

    #[test]
    fn vec3_then_float_needs_no_padding() {
        assert_eq!(pre_paddings(&[GlType::FloatVec3, GlType::Float]), vec![0, 0]);
    }

    #[test]
    fn aggregates_reset_the_element_index() {
        let mut element_index = 3;
        let array = basic(GlType::Float).with_array_size(2);
        assert_eq!(pre_padding_count(&array, &mut element_index), 0);
        assert_eq!(element_index, 0);

        element_index = 2;
        assert_eq!(pre_padding_count(&basic(GlType::FloatMat2), &mut element_index), 0);
        assert_eq!(element_index, 0);

        element_index = 1;
        assert_eq!(pre_padding_count(&basic(GlType::FloatVec4), &mut element_index), 0);
        assert_eq!(element_index, 0);
    }

    #[test]
    fn post_padding_for_matrices_depends_on_packing() {
        let m = basic(GlType::FloatMat2x3);
        assert_eq!(post_padding_count(&m, true), 1);
        assert_eq!(post_padding_count(&m, false), 2);
        assert_eq!(post_padding_count(&basic(GlType::FloatMat4), true), 0);
    }

    #[test]
    fn post_padding_for_arrays_and_plain_values() {
        assert_eq!(post_padding_count(&basic(GlType::Float).with_array_size(2), true), 3);
        assert_eq!(post_padding_count(&basic(GlType::FloatVec4).with_array_size(2), true), 0);
        assert_eq!(post_padding_count(&basic(GlType::Float), true), 0);
    }

    #[test]
    fn post_padding_for_structs_uses_their_end_index() {
        let two_floats = ShaderVariable::structure(
            "s",
            vec![basic(GlType::Float), basic(GlType::Float)],
        );
        assert_eq!(struct_element_index(two_floats.fields()), 2);
        assert_eq!(post_padding_count(&two_floats, true), 2);

        let full = ShaderVariable::structure("t", vec![basic(GlType::FloatVec4)]);
        assert_eq!(post_padding_count(&full, true), 0);
    }

    #[test]
    fn names_are_unique_across_planners() {
        let mut names = PadNames::new();
        let mut first = Std140Padding::new(&mut names);
        assert_eq!(first.pre_padding(&basic(GlType::Float)), Vec::<String>::new());
        assert_eq!(first.pre_padding(&basic(GlType::FloatVec3)), vec!["pad_0", "pad_1", "pad_2"]);
        assert_eq!(first.element_index(), 3);

        let mut second = Std140Padding::new(&mut names);
        assert_eq!(
            second.post_padding(&basic(GlType::Float).with_array_size(3), true),
            vec!["pad_3", "pad_4", "pad_5"]
        );
    }
}
