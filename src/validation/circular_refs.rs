//! Circular reference detection for structured input
//!
//! Walks the value graph with an identity-based "seen" set (node addresses
//! along the active path) plus a depth limit. Only true reference cycles are
//! caught; duplicated-but-distinct subtrees are allowed. Owned
//! `serde_json::Value` trees cannot alias, so in practice the depth guard is
//! the operative limit, but the identity semantics are kept at the boundary
//! so the check stays narrow.

use serde_json::Value;
use std::collections::HashSet;

/// Circular reference detector, scoped to one detection pass
pub struct CircularRefDetector {
    max_depth: usize,
    active: HashSet<usize>,
}

impl CircularRefDetector {
    /// Create a new detector with the given depth limit
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            active: HashSet::new(),
        }
    }

    /// Detect reference cycles or excessive nesting in a value
    pub fn detect(&mut self, value: &Value) -> Result<(), CircularRefError> {
        self.active.clear();
        self.detect_recursive(value, 0, "$")
    }

    fn detect_recursive(
        &mut self,
        value: &Value,
        depth: usize,
        path: &str,
    ) -> Result<(), CircularRefError> {
        if depth > self.max_depth {
            return Err(CircularRefError::max_depth_exceeded(depth, self.max_depth));
        }

        let identity = value as *const Value as usize;
        match value {
            Value::Object(obj) => {
                if !self.active.insert(identity) {
                    return Err(CircularRefError::cycle_detected(path.to_string()));
                }
                for (key, val) in obj {
                    let child_path = format!("{}.{}", path, key);
                    self.detect_recursive(val, depth + 1, &child_path)?;
                }
                self.active.remove(&identity);
            }
            Value::Array(arr) => {
                if !self.active.insert(identity) {
                    return Err(CircularRefError::cycle_detected(path.to_string()));
                }
                for (index, val) in arr.iter().enumerate() {
                    let child_path = format!("{}[{}]", path, index);
                    self.detect_recursive(val, depth + 1, &child_path)?;
                }
                self.active.remove(&identity);
            }
            _ => {}
        }

        Ok(())
    }

    /// Check whether a value is safe to traverse
    pub fn is_safe(&mut self, value: &Value) -> bool {
        self.detect(value).is_ok()
    }
}

/// Cycle or depth failure raised during detection
#[derive(Debug, Clone)]
pub struct CircularRefError {
    pub kind: CircularRefErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CircularRefErrorKind {
    CircularReference,
    MaxDepthExceeded,
}

impl CircularRefError {
    pub fn cycle_detected(path: String) -> Self {
        Self {
            kind: CircularRefErrorKind::CircularReference,
            message: format!("circular reference detected at path: {}", path),
        }
    }

    pub fn max_depth_exceeded(current: usize, max: usize) -> Self {
        Self {
            kind: CircularRefErrorKind::MaxDepthExceeded,
            message: format!("maximum nesting depth ({}) exceeded at depth {}", max, current),
        }
    }
}

impl std::fmt::Display for CircularRefError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CircularRefError {}

/// Convenience function to validate traversal depth
pub fn validate_depth(value: &Value, max_depth: usize) -> Result<(), CircularRefError> {
    let mut detector = CircularRefDetector::new(max_depth);
    detector.detect(value)
}
