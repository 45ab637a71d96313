use crate::gl_type::GlType;
use crate::output::BlockLayoutType;

/// Basic type or struct body of a [`ShaderVariable`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VariableKind {
    Basic(GlType),
    /// Struct fields in declaration order.
    Struct(Vec<ShaderVariable>),
}

/// A uniform, varying or interface-block field as reported by the type checker.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShaderVariable {
    pub name: String,
    pub kind: VariableKind,
    /// `0` means "not an array".
    pub array_size: u32,
    /// `layout(row_major)` on a block field. Only meaningful inside interface blocks.
    pub is_row_major_layout: bool,
    pub static_use: bool,
}

impl ShaderVariable {
    pub fn basic(name: impl Into<String>, ty: GlType) -> Self {
        Self {
            name: name.into(),
            kind: VariableKind::Basic(ty),
            array_size: 0,
            is_row_major_layout: false,
            static_use: true,
        }
    }

    pub fn structure(name: impl Into<String>, fields: Vec<ShaderVariable>) -> Self {
        Self {
            name: name.into(),
            kind: VariableKind::Struct(fields),
            array_size: 0,
            is_row_major_layout: false,
            static_use: true,
        }
    }

    pub fn with_array_size(mut self, array_size: u32) -> Self {
        self.array_size = array_size;
        self
    }

    pub fn with_row_major_layout(mut self, row_major: bool) -> Self {
        self.is_row_major_layout = row_major;
        self
    }

    pub fn with_static_use(mut self, static_use: bool) -> Self {
        self.static_use = static_use;
        self
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.kind, VariableKind::Struct(_))
    }

    pub fn is_array(&self) -> bool {
        self.array_size > 0
    }

    /// Number of elements, treating a non-array as a single element.
    pub fn element_count(&self) -> u32 {
        self.array_size.max(1)
    }

    /// The basic type, or `None` for structs.
    pub fn gl_type(&self) -> Option<GlType> {
        match self.kind {
            VariableKind::Basic(ty) => Some(ty),
            VariableKind::Struct(_) => None,
        }
    }

    /// Struct fields; empty for basic types.
    pub fn fields(&self) -> &[ShaderVariable] {
        match &self.kind {
            VariableKind::Basic(_) => &[],
            VariableKind::Struct(fields) => fields,
        }
    }
}

/// A uniform block declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterfaceBlock {
    pub name: String,
    /// `0` means "not an array of blocks".
    pub array_size: u32,
    pub layout: BlockLayoutType,
    /// Block-level `layout(row_major)`.
    pub is_row_major_layout: bool,
    pub static_use: bool,
    pub fields: Vec<ShaderVariable>,
}

impl InterfaceBlock {
    pub fn new(
        name: impl Into<String>,
        layout: BlockLayoutType,
        fields: Vec<ShaderVariable>,
    ) -> Self {
        Self {
            name: name.into(),
            array_size: 0,
            layout,
            is_row_major_layout: false,
            static_use: true,
            fields,
        }
    }

    pub fn element_count(&self) -> u32 {
        self.array_size.max(1)
    }
}
