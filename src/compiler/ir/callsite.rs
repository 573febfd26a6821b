//! Call sites of the preallocating table constructors

use super::instruction::Slot;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Preallocating table constructors the compiler recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intrinsic {
    /// `table.create(n)` - array part only
    Create,
    /// `table.allocate(n, h)` - array and hash parts
    Allocate,
}

impl Intrinsic {
    /// Every recognized intrinsic
    pub const ALL: [Intrinsic; 2] = [Intrinsic::Create, Intrinsic::Allocate];

    /// Library name of the intrinsic
    pub fn name(&self) -> &'static str {
        match self {
            Intrinsic::Create => "create",
            Intrinsic::Allocate => "allocate",
        }
    }

    /// Number of declared size parameters
    pub fn arity(&self) -> usize {
        match self {
            Intrinsic::Create => 1,
            Intrinsic::Allocate => 2,
        }
    }

    /// Looks up an intrinsic by its library name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.name() == name)
    }
}

impl fmt::Display for Intrinsic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Argument of a call site, classified by what is known at compile time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentDescriptor {
    /// Value known at compile time
    ConstantInt(i64),
    /// Value only known at run time, held in a slot
    Dynamic(Slot),
}

impl ArgumentDescriptor {
    /// Constant value, if known
    pub fn constant(&self) -> Option<i64> {
        match self {
            ArgumentDescriptor::ConstantInt(v) => Some(*v),
            ArgumentDescriptor::Dynamic(_) => None,
        }
    }
}

/// One invocation of a preallocating constructor, in source order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallSite {
    /// Name as written (`create`, `allocate`); unknown names are rejected by the compiler
    pub intrinsic_name: String,
    /// Size arguments in source order
    pub arguments: Vec<ArgumentDescriptor>,
    /// Slot receiving the constructed table
    pub destination: Slot,
}

impl CallSite {
    /// Create a new call site
    pub fn new(
        intrinsic_name: impl Into<String>,
        arguments: Vec<ArgumentDescriptor>,
        destination: Slot,
    ) -> Self {
        Self {
            intrinsic_name: intrinsic_name.into(),
            arguments,
            destination,
        }
    }

    /// `create(args...)` into `destination`
    pub fn create(arguments: Vec<ArgumentDescriptor>, destination: Slot) -> Self {
        Self::new(Intrinsic::Create.name(), arguments, destination)
    }

    /// `allocate(args...)` into `destination`
    pub fn allocate(arguments: Vec<ArgumentDescriptor>, destination: Slot) -> Self {
        Self::new(Intrinsic::Allocate.name(), arguments, destination)
    }
}
