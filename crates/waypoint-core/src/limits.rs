//! Input validation limits for descriptors and relationship types

/// Maximum length for relationship type names (256 chars)
pub const MAX_TYPE_NAME_LEN: usize = 256;

/// Maximum length for descriptor names (64 chars)
pub const MAX_DESCRIPTOR_NAME_LEN: usize = 64;

/// Maximum depth accepted by a depth-limited stop evaluator
pub const MAX_STOP_DEPTH: u32 = 65_536;

/// Maximum (type, direction) pairs in a single descriptor
pub const MAX_DESCRIPTOR_TYPES: usize = 128;

/// Validation error type
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyTypeName,
    TypeNameTooLong { len: usize, max: usize },
    EmptyDescriptorName,
    DescriptorNameTooLong { len: usize, max: usize },
    StopDepthNotPositive,
    StopDepthTooLarge { depth: u32, max: u32 },
    TooManyTypes { count: usize, max: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTypeName => write!(f, "Relationship type name cannot be empty"),
            Self::TypeNameTooLong { len, max } => {
                write!(f, "Relationship type name too long: {} chars (max {})", len, max)
            }
            Self::EmptyDescriptorName => write!(f, "Descriptor name cannot be empty"),
            Self::DescriptorNameTooLong { len, max } => {
                write!(f, "Descriptor name too long: {} chars (max {})", len, max)
            }
            Self::StopDepthNotPositive => write!(f, "Stop depth must be greater than zero"),
            Self::StopDepthTooLarge { depth, max } => {
                write!(f, "Stop depth too large: {} (max {})", depth, max)
            }
            Self::TooManyTypes { count, max } => {
                write!(f, "Too many relationship types: {} (max {})", count, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a relationship type name
pub fn validate_type_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyTypeName);
    }
    if name.len() > MAX_TYPE_NAME_LEN {
        return Err(ValidationError::TypeNameTooLong {
            len: name.len(),
            max: MAX_TYPE_NAME_LEN,
        });
    }
    Ok(())
}

/// Validate a descriptor name
pub fn validate_descriptor_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyDescriptorName);
    }
    if name.len() > MAX_DESCRIPTOR_NAME_LEN {
        return Err(ValidationError::DescriptorNameTooLong {
            len: name.len(),
            max: MAX_DESCRIPTOR_NAME_LEN,
        });
    }
    Ok(())
}

/// Validate the limit of a depth-limited stop evaluator
pub fn validate_stop_depth(depth: u32) -> Result<(), ValidationError> {
    if depth == 0 {
        return Err(ValidationError::StopDepthNotPositive);
    }
    if depth > MAX_STOP_DEPTH {
        return Err(ValidationError::StopDepthTooLarge {
            depth,
            max: MAX_STOP_DEPTH,
        });
    }
    Ok(())
}

/// Validate the number of (type, direction) pairs in a descriptor
pub fn validate_type_count(count: usize) -> Result<(), ValidationError> {
    if count > MAX_DESCRIPTOR_TYPES {
        return Err(ValidationError::TooManyTypes {
            count,
            max: MAX_DESCRIPTOR_TYPES,
        });
    }
    Ok(())
}
