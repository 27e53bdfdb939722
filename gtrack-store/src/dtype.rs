use std::fmt::{self, Display};

use gtrack_core::{GtrackError, Result};

use crate::consts::{FLOAT64_FLAG, INT64_FLAG, UTF8_FLAG};

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum DType {
    Int64,
    Float64,
    Utf8,
}

impl DType {
    pub fn flag(&self) -> u8 {
        match self {
            DType::Int64 => INT64_FLAG,
            DType::Float64 => FLOAT64_FLAG,
            DType::Utf8 => UTF8_FLAG,
        }
    }

    pub fn from_flag(flag: u8) -> Result<Self> {
        match flag {
            INT64_FLAG => Ok(DType::Int64),
            FLOAT64_FLAG => Ok(DType::Float64),
            UTF8_FLAG => Ok(DType::Utf8),
            _ => Err(GtrackError::CorruptStore(format!(
                "Invalid dtype flag {:#x}",
                flag
            ))),
        }
    }
}

impl Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Int64 => "int64",
            DType::Float64 => "float64",
            DType::Utf8 => "utf8",
        };
        write!(f, "{}", name)
    }
}
