use serde::{Deserialize, Serialize};

fn default_popup_width() -> f64 {
    500.0
}

fn default_popup_offset_y() -> f64 {
    20.0
}

fn default_surface_offset_x() -> f64 {
    -2.0
}

fn default_surface_offset_y() -> f64 {
    -35.0
}

/// Placement of the floating controls, in page pixels
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    #[serde(default = "default_popup_width")]
    pub popup_width: f64,
    /// Gap between the selection bottom and the popup top
    #[serde(default = "default_popup_offset_y")]
    pub popup_offset_y: f64,
    #[serde(default = "default_surface_offset_x")]
    pub surface_offset_x: f64,
    #[serde(default = "default_surface_offset_y")]
    pub surface_offset_y: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            popup_width: default_popup_width(),
            popup_offset_y: default_popup_offset_y(),
            surface_offset_x: default_surface_offset_x(),
            surface_offset_y: default_surface_offset_y(),
        }
    }
}
