//! Exception values.

use brisk_ir::Name;

use super::Value;

/// What `throw` raises and `catch ... as e` binds.
#[derive(Clone, Debug, PartialEq)]
pub struct ExceptionObject {
    pub name: Name,
    pub data: Value,
}

impl ExceptionObject {
    pub fn new(name: &str, data: Value) -> Self {
        ExceptionObject {
            name: Name::new(name),
            data,
        }
    }
}
