//! Parámetros de la ventana que la conexión nativa crea al arrancar.

/// Título, posición y tamaño del área cliente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub application_name: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            application_name: "Orbit".to_owned(),
            x: 100,
            y: 100,
            width: 1280,
            height: 720,
        }
    }
}

impl WindowConfig {
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
            ..Self::default()
        }
    }

    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = WindowConfig::new("Testbed").with_position(0, 0).with_size(640, 480);
        assert_eq!(config.application_name, "Testbed");
        assert_eq!((config.x, config.y), (0, 0));
        assert_eq!((config.width, config.height), (640, 480));
    }
}
