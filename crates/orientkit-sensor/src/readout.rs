//! Numeric pitch/roll/yaw readout

use std::fmt;

use orientkit_core::{format_angle, AngleFormat, EulerAngles};

/// Formatting settings for the numeric angle display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AngleReadout {
    pub precision: i32,
    pub format: AngleFormat,
}

impl Default for AngleReadout {
    fn default() -> Self {
        Self {
            precision: 1,
            format: AngleFormat::Degrees,
        }
    }
}

impl AngleReadout {
    pub fn new(precision: i32, format: AngleFormat) -> Self {
        Self { precision, format }
    }

    /// Labelled rows in display order: pitch, roll, yaw
    pub fn rows(&self, angles: &EulerAngles) -> [(&'static str, String); 3] {
        [
            ("P:", format_angle(angles.pitch, self.precision, self.format)),
            ("R:", format_angle(angles.roll, self.precision, self.format)),
            ("Y:", format_angle(angles.yaw, self.precision, self.format)),
        ]
    }

    pub fn render<'a>(&self, angles: &'a EulerAngles) -> RenderedReadout<'a> {
        RenderedReadout {
            readout: *self,
            angles,
        }
    }
}

/// Single-line `Display` form of a readout, e.g. `P: 1.0° R: -2.5° Y: 90.0°`
pub struct RenderedReadout<'a> {
    readout: AngleReadout,
    angles: &'a EulerAngles,
}

impl fmt::Display for RenderedReadout<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (label, value)) in self.readout.rows(self.angles).iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{label} {value}")?;
        }
        Ok(())
    }
}
