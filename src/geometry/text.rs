//! Single-line text geometry

use bitflags::bitflags;

use crate::types::{Handle, Vector2, Vector3};

bitflags! {
    /// Data flags of a TEXT object. A set bit means the field was omitted
    /// and takes its default value.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TextDataFlags: u8 {
        /// Elevation omitted (0.0)
        const NO_ELEVATION = 0x01;
        /// Alignment point omitted (same as insertion point)
        const NO_ALIGNMENT_POINT = 0x02;
        /// Oblique angle omitted (0.0)
        const NO_OBLIQUE_ANGLE = 0x04;
        /// Rotation omitted (0.0)
        const NO_ROTATION = 0x08;
        /// Width factor omitted (1.0)
        const NO_WIDTH_FACTOR = 0x10;
        /// Generation flags omitted (0)
        const NO_GENERATION = 0x20;
        /// Horizontal alignment omitted (left)
        const NO_HORIZONTAL_ALIGNMENT = 0x40;
        /// Vertical alignment omitted (baseline)
        const NO_VERTICAL_ALIGNMENT = 0x80;
    }
}

/// Text horizontal alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextHorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
    /// Fit between two points, scaling height
    Aligned,
    /// Centered horizontally and vertically
    Middle,
    /// Fit between two points, keeping height
    Fit,
    /// Any code outside 0..=5
    Other(i16),
}

impl From<i16> for TextHorizontalAlignment {
    fn from(code: i16) -> Self {
        match code {
            0 => Self::Left,
            1 => Self::Center,
            2 => Self::Right,
            3 => Self::Aligned,
            4 => Self::Middle,
            5 => Self::Fit,
            other => Self::Other(other),
        }
    }
}

/// Text vertical alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextVerticalAlignment {
    #[default]
    Baseline,
    Bottom,
    Middle,
    Top,
    /// Any code outside 0..=3
    Other(i16),
}

impl From<i16> for TextVerticalAlignment {
    fn from(code: i16) -> Self {
        match code {
            0 => Self::Baseline,
            1 => Self::Bottom,
            2 => Self::Middle,
            3 => Self::Top,
            other => Self::Other(other),
        }
    }
}

/// A single-line text
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub value: String,
    /// Insertion point, in object coordinates
    pub insertion_point: Vector2,
    /// Second alignment point, equal to the insertion point unless stored
    pub alignment_point: Vector2,
    pub elevation: f64,
    pub height: f64,
    /// Rotation in radians
    pub rotation: f64,
    /// Relative X scale factor
    pub width_factor: f64,
    /// Oblique angle in radians
    pub oblique_angle: f64,
    pub thickness: f64,
    pub normal: Vector3,
    /// Mirroring flags (2 = backwards, 4 = upside down)
    pub generation: i16,
    pub horizontal_alignment: TextHorizontalAlignment,
    pub vertical_alignment: TextVerticalAlignment,
    /// Text style object
    pub style: Handle,
}

impl Text {
    /// Insertion point at the text's elevation
    pub fn insertion_point_3d(&self) -> Vector3 {
        self.insertion_point.with_z(self.elevation)
    }
}

impl Default for Text {
    fn default() -> Self {
        Text {
            value: String::new(),
            insertion_point: Vector2::ZERO,
            alignment_point: Vector2::ZERO,
            elevation: 0.0,
            height: 0.0,
            rotation: 0.0,
            width_factor: 1.0,
            oblique_angle: 0.0,
            thickness: 0.0,
            normal: Vector3::UNIT_Z,
            generation: 0,
            horizontal_alignment: TextHorizontalAlignment::Left,
            vertical_alignment: TextVerticalAlignment::Baseline,
            style: Handle::NULL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_codes() {
        assert_eq!(TextHorizontalAlignment::from(5), TextHorizontalAlignment::Fit);
        assert_eq!(TextHorizontalAlignment::from(9), TextHorizontalAlignment::Other(9));
        assert_eq!(TextVerticalAlignment::from(3), TextVerticalAlignment::Top);
    }

    #[test]
    fn test_flags_from_byte() {
        let flags = TextDataFlags::from_bits_truncate(0x12);
        assert!(flags.contains(TextDataFlags::NO_ALIGNMENT_POINT));
        assert!(flags.contains(TextDataFlags::NO_WIDTH_FACTOR));
        assert!(!flags.contains(TextDataFlags::NO_ELEVATION));
    }
}
