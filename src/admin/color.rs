// ABOUTME: Value logic behind the statistics admin color picker
// ABOUTME: Keeps text field, native picker and preview swatch in sync

use crate::error::ClientError;

pub const DEFAULT_COLOR: &str = "#28A745";

pub const INVALID_COLOR_MESSAGE: &str = "Please enter a valid hex color code (e.g. #28A745)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickColor {
    pub hex: &'static str,
    pub title: &'static str,
    pub symbol: &'static str,
}

pub const QUICK_COLORS: [QuickColor; 8] = [
    QuickColor { hex: "#28a745", title: "Green (rescued)", symbol: "✓" },
    QuickColor { hex: "#dc3545", title: "Red (deceased)", symbol: "×" },
    QuickColor { hex: "#ffc107", title: "Yellow (in treatment)", symbol: "⚕" },
    QuickColor { hex: "#007bff", title: "Blue", symbol: "💙" },
    QuickColor { hex: "#6f42c1", title: "Purple", symbol: "💜" },
    QuickColor { hex: "#fd7e14", title: "Orange", symbol: "🧡" },
    QuickColor { hex: "#20c997", title: "Turquoise", symbol: "💚" },
    QuickColor { hex: "#6c757d", title: "Grey", symbol: "⚫" },
];

/// `#RRGGBB` with exactly six hex digits.
pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Trims, uppercases and adds a missing `#`. Empty input stays empty.
pub fn normalize(raw: &str) -> String {
    let color = raw.trim().to_uppercase();
    if color.is_empty() || color.starts_with('#') {
        color
    } else {
        format!("#{}", color)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPicker {
    /// Value of the underlying text input (what the form submits).
    pub field: String,
    /// Value of the native color input.
    pub picker: String,
    pub preview: String,
}

impl ColorPicker {
    /// Enhances a field with its current value, falling back to the default.
    pub fn new(initial: &str) -> Self {
        let trimmed = initial.trim();
        let color = if trimmed.is_empty() {
            DEFAULT_COLOR.to_string()
        } else {
            trimmed.to_uppercase()
        };
        Self {
            field: color.clone(),
            picker: color.clone(),
            preview: color,
        }
    }

    fn set_all(&mut self, color: String) {
        self.field = color.clone();
        self.picker = color.clone();
        self.preview = color;
    }

    pub fn on_picker_input(&mut self, value: &str) {
        self.set_all(value.to_uppercase());
    }

    pub fn on_quick_color(&mut self, hex: &str) {
        self.set_all(hex.to_uppercase());
    }

    /// Typing in the text field: add `#` eagerly, sync only valid values.
    pub fn on_text_input(&mut self, raw: &str) {
        let color = normalize(raw);
        self.field = color.clone();
        if is_hex_color(&color) {
            self.picker = color.clone();
            self.preview = color;
        }
    }

    /// Leaving the text field validates it; an invalid value is kept in the
    /// field so the user can correct it.
    pub fn on_blur(&mut self) -> Result<(), ClientError> {
        let color = normalize(&self.field);
        if color.is_empty() {
            return Ok(());
        }
        if !is_hex_color(&color) {
            return Err(ClientError::Validation(INVALID_COLOR_MESSAGE.to_string()));
        }
        self.set_all(color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_hex_color() {
        assert!(is_hex_color("#28A745"));
        assert!(is_hex_color("#abcdef"));
        assert!(!is_hex_color("28A745"));
        assert!(!is_hex_color("#28A74"));
        assert!(!is_hex_color("#28A7459"));
        assert!(!is_hex_color("#GGGGGG"));
    }

    #[test]
    fn test_new_uses_default_for_empty_field() {
        let picker = ColorPicker::new("");
        assert_eq!(picker.field, DEFAULT_COLOR);
        assert_eq!(picker.preview, DEFAULT_COLOR);

        let picker = ColorPicker::new("#dc3545");
        assert_eq!(picker.picker, "#DC3545");
    }

    #[test]
    fn test_text_input_syncs_only_valid_values() {
        let mut picker = ColorPicker::new("");
        picker.on_text_input("ff");
        assert_eq!(picker.field, "#FF");
        assert_eq!(picker.picker, DEFAULT_COLOR);

        picker.on_text_input("ff8800");
        assert_eq!(picker.field, "#FF8800");
        assert_eq!(picker.picker, "#FF8800");
        assert_eq!(picker.preview, "#FF8800");
    }

    #[test]
    fn test_blur_rejects_invalid_value() {
        let mut picker = ColorPicker::new("");
        picker.field = "#12".to_string();
        let err = picker.on_blur().unwrap_err();
        assert_eq!(err.user_message(), INVALID_COLOR_MESSAGE);
        assert_eq!(picker.field, "#12");
    }

    #[test]
    fn test_blur_normalizes_valid_value() {
        let mut picker = ColorPicker::new("");
        picker.field = " 6f42c1 ".to_string();
        picker.on_blur().unwrap();
        assert_eq!(picker.field, "#6F42C1");
        assert_eq!(picker.preview, "#6F42C1");
    }

    #[test]
    fn test_quick_colors_and_picker() {
        let mut picker = ColorPicker::new("");
        picker.on_quick_color(QUICK_COLORS[1].hex);
        assert_eq!(picker.field, "#DC3545");
        picker.on_picker_input("#20c997");
        assert_eq!(picker.field, "#20C997");
        assert!(QUICK_COLORS.iter().all(|c| is_hex_color(c.hex)));
    }
}
