/// Location of one encoded block member.
///
/// All values are in bytes. `-1` everywhere ([`BlockMemberInfo::DEFAULT`]) marks a member that was
/// never assigned a location, which is what default-block uniforms carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockMemberInfo {
    pub offset: i32,
    /// `0` when the member is not an array.
    pub array_stride: i32,
    /// `0` when the member is not a matrix.
    pub matrix_stride: i32,
    pub is_row_major_matrix: bool,
}

impl BlockMemberInfo {
    pub const DEFAULT: BlockMemberInfo = BlockMemberInfo {
        offset: -1,
        array_stride: -1,
        matrix_stride: -1,
        is_row_major_matrix: false,
    };

    pub const fn new(
        offset: i32,
        array_stride: i32,
        matrix_stride: i32,
        is_row_major_matrix: bool,
    ) -> Self {
        Self {
            offset,
            array_stride,
            matrix_stride,
            is_row_major_matrix,
        }
    }

    pub const fn is_assigned(&self) -> bool {
        self.offset >= 0
    }
}

impl Default for BlockMemberInfo {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unassigned_sentinel() {
        let info = BlockMemberInfo::default();
        assert_eq!(info.offset, -1);
        assert_eq!(info.array_stride, -1);
        assert_eq!(info.matrix_stride, -1);
        assert!(!info.is_assigned());
        assert!(BlockMemberInfo::new(0, 0, 0, false).is_assigned());
    }
}
