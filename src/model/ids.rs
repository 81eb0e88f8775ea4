use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

macro_rules! define_id_type {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Get the inner u32 value.
            pub fn inner(self) -> u32 {
                self.0
            }

            /// Create an ID from a u32 value.
            pub fn new(value: u32) -> Self {
                Self(value)
            }
        }
    };
}

define_id_type!(ColumnId);
define_id_type!(RowId);
define_id_type!(ModelId);

impl ColumnId {
    /// 0-based offset of this 1-based column in dense buffers.
    pub fn offset(self) -> usize {
        self.0 as usize - 1
    }

    /// Column id for a 0-based buffer offset.
    pub fn from_offset(offset: usize) -> Self {
        Self(offset as u32 + 1)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

static NEXT_MODEL_ID: AtomicU32 = AtomicU32::new(1);

impl ModelId {
    /// Allocate a process-unique model identity.
    pub(crate) fn next() -> Self {
        Self(NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed))
    }
}
