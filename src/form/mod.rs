//! @acp:module "Forms"
//! @acp:summary "Conditional visibility for dynamic form fields"
//! @acp:domain forms
//! @acp:layer feature
//!
//! Fields declare `hide-if` / `disable-if` condition trees. Trees are
//! validated when the form is built and evaluated per submission against
//! a [`FieldValues`] map.

pub mod condition;
pub mod field;
pub mod values;

pub use condition::{evaluate, ComparisonOp, Condition, LogicalOp, ValidationError};
pub use field::{FieldDescriptor, FieldState, Form, FormDescriptor, FormField};
pub use values::{FieldValue, FieldValues};
