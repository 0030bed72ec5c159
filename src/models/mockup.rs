use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

pub const MIN_LOGO_SIZE: f64 = 1.0;

#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),
    #[error("color must be in #RRGGBB form, got {0:?}")]
    InvalidColor(String),
}

/// A logo placed on a mockup canvas. Coordinates are in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Logo {
    pub id: Uuid,
    pub name: Option<String>,
    pub image_url: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees in `[0, 360)`.
    pub rotation: f64,
    /// `0.0` transparent to `1.0` opaque.
    pub opacity: f64,
    #[serde(default)]
    pub background_removed: bool,
    #[serde(default)]
    pub applied_color: Option<String>,
}

/// Partial update of a logo's geometry. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LogoTransform {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
}

impl Logo {
    pub fn new(image_url: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            image_url: image_url.into(),
            x: 50.0,
            y: 50.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
            opacity: 1.0,
            background_removed: false,
            applied_color: None,
        }
    }

    /// Applies `transform`, normalizing the result. Nothing is changed when
    /// any supplied value is NaN or infinite.
    pub fn apply(&mut self, transform: &LogoTransform) -> Result<(), TransformError> {
        let fields = [
            ("x", transform.x),
            ("y", transform.y),
            ("width", transform.width),
            ("height", transform.height),
            ("rotation", transform.rotation),
            ("opacity", transform.opacity),
        ];
        for (name, value) in fields {
            if matches!(value, Some(v) if !v.is_finite()) {
                return Err(TransformError::NotFinite(name));
            }
        }

        if let Some(x) = transform.x {
            self.x = x;
        }
        if let Some(y) = transform.y {
            self.y = y;
        }
        if let Some(width) = transform.width {
            self.width = clamp_size(width);
        }
        if let Some(height) = transform.height {
            self.height = clamp_size(height);
        }
        if let Some(rotation) = transform.rotation {
            self.rotation = normalize_rotation(rotation);
        }
        if let Some(opacity) = transform.opacity {
            self.opacity = clamp_opacity(opacity);
        }
        Ok(())
    }

    pub fn apply_color(&mut self, color: &str) -> Result<(), TransformError> {
        if !is_hex_color(color) {
            return Err(TransformError::InvalidColor(color.to_string()));
        }
        self.applied_color = Some(color.to_ascii_lowercase());
        Ok(())
    }

    /// Brings values loaded from storage back into range.
    pub fn normalized(mut self) -> Self {
        self.width = clamp_size(self.width);
        self.height = clamp_size(self.height);
        self.rotation = normalize_rotation(self.rotation);
        self.opacity = clamp_opacity(self.opacity);
        self
    }
}

pub fn clamp_size(value: f64) -> f64 {
    value.max(MIN_LOGO_SIZE)
}

pub fn normalize_rotation(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

pub fn clamp_opacity(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(360.0, 0.0)]
    #[case(-90.0, 270.0)]
    #[case(725.0, 5.0)]
    fn rotation_wraps(#[case] input: f64, #[case] expected: f64) {
        assert!((normalize_rotation(input) - expected).abs() < 1e-9);
    }

    #[test]
    fn transform_clamps_size_and_opacity() {
        let mut logo = Logo::new("https://cdn.example.com/logo.png", None);
        logo.apply(&LogoTransform {
            width: Some(0.2),
            height: Some(-5.0),
            opacity: Some(1.7),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(logo.width, 1.0);
        assert_eq!(logo.height, 1.0);
        assert_eq!(logo.opacity, 1.0);
        assert_eq!(logo.x, 50.0);
    }

    #[test]
    fn non_finite_values_leave_logo_untouched() {
        let mut logo = Logo::new("logo.png", None);
        let before = logo.clone();
        let err = logo
            .apply(&LogoTransform {
                x: Some(10.0),
                rotation: Some(f64::NAN),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err, TransformError::NotFinite("rotation"));
        assert_eq!(logo, before);
    }

    #[test]
    fn colors_must_be_six_digit_hex() {
        let mut logo = Logo::new("logo.png", None);
        assert!(logo.apply_color("#FF00aa").is_ok());
        assert_eq!(logo.applied_color.as_deref(), Some("#ff00aa"));
        assert!(logo.apply_color("red").is_err());
        assert!(logo.apply_color("#fff").is_err());
        assert!(logo.apply_color("#GG0000").is_err());
    }
}
