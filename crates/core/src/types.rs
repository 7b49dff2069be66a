//! Data type definitions for Strata.
//!
//! This module defines the column types a table or plan schema can declare.

use core::fmt;

/// Supported column data types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Boolean type (true/false)
    Bool,
    /// 16-bit signed integer
    Int16,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 32-bit floating point number
    Float,
    /// 64-bit floating point number
    Double,
    /// UTF-8 string
    String,
    /// Event time in milliseconds since the Unix epoch
    Timestamp,
    /// Calendar date stored as days since the Unix epoch
    Date,
}

impl DataType {
    /// Returns the lowercase type name used in schema rendering.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Bool => "bool",
            DataType::Int16 => "int16",
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::String => "string",
            DataType::Timestamp => "timestamp",
            DataType::Date => "date",
        }
    }

    /// Returns whether this is one of the integer types.
    #[inline]
    pub fn is_integral(&self) -> bool {
        matches!(self, DataType::Int16 | DataType::Int32 | DataType::Int64)
    }

    /// Returns whether this is one of the floating point types.
    #[inline]
    pub fn is_floating(&self) -> bool {
        matches!(self, DataType::Float | DataType::Double)
    }

    /// Returns whether this type is numeric.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        self.is_integral() || self.is_floating()
    }

    /// Returns whether values of `self` and `other` may share a column slot.
    ///
    /// Types are compatible when equal or in the same integral/floating family.
    pub fn is_compatible_with(&self, other: DataType) -> bool {
        *self == other
            || (self.is_integral() && other.is_integral())
            || (self.is_floating() && other.is_floating())
    }

    /// Returns whether this type can be used as an index key.
    pub fn is_indexable(&self) -> bool {
        !self.is_floating()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_data_type_equality() {
        assert_eq!(DataType::Int32, DataType::Int32);
        assert_ne!(DataType::Int32, DataType::Int64);
    }

    #[test]
    fn test_compatibility_families() {
        assert!(DataType::Int16.is_compatible_with(DataType::Int64));
        assert!(DataType::Float.is_compatible_with(DataType::Double));
        assert!(DataType::String.is_compatible_with(DataType::String));
        assert!(!DataType::Int64.is_compatible_with(DataType::String));
        assert!(!DataType::Int64.is_compatible_with(DataType::Double));
        assert!(!DataType::Timestamp.is_compatible_with(DataType::Int64));
    }

    #[test]
    fn test_display() {
        assert_eq!(DataType::Int64.to_string(), "int64");
        assert_eq!(DataType::Timestamp.to_string(), "timestamp");
    }

    #[test]
    fn test_indexable() {
        assert!(DataType::String.is_indexable());
        assert!(DataType::Timestamp.is_indexable());
        assert!(!DataType::Double.is_indexable());
    }
}
