// ABOUTME: Admin and form enhancements
// ABOUTME: Color picker values and status-dependent field visibility

pub mod color;
pub mod fields;

pub use color::{ColorPicker, QUICK_COLORS};
pub use fields::{ConditionalField, FieldVisibility};
