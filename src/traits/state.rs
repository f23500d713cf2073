//! Consultas de estado con doble buffer (frame actual / frame anterior).
//!
//! Cada tecla o botón guarda exactamente dos bits: si está pulsado **ahora** y si
//! lo estaba al cerrar el frame **anterior**. Las cuatro configuraciones
//! observables se derivan de ese par:
//!
//! | actual | anterior | significado       |
//! |--------|----------|-------------------|
//! | no     | no       | suelto            |
//! | sí     | no       | recién pulsado    |
//! | sí     | sí       | mantenido         |
//! | no     | sí       | recién soltado    |

/// Interfaz de consulta y mutación para un tipo de entrada `K` (tecla o botón).
///
/// # Parámetros genéricos
/// - `K`: **K**ey, la entrada consultada (`KeyCode`, `MouseButton`, ...).
///
/// Solo `set`, `is_down` y `was_down` son obligatorios; el resto son negaciones
/// o combinaciones del par (actual, anterior) y no añaden estado.
///
/// # Ejemplo
/// ```rust,ignore
/// use orbit_input_platform::{InputState, InputStateExt, KeyCode};
///
/// let mut input = InputState::new();
/// input.set(KeyCode::Space, true);
/// assert!(input.is_just_pressed(KeyCode::Space));
/// input.advance_frame();
/// assert!(!input.is_just_pressed(KeyCode::Space));
/// ```
pub trait InputStateExt<K: Copy> {
    /// Sobrescribe el estado actual de `key`. Las entradas fuera de rango se ignoran.
    fn set(&mut self, key: K, pressed: bool);

    /// `true` si `key` está pulsada en el frame actual.
    fn is_down(&self, key: K) -> bool;

    /// `true` si `key` estaba pulsada al cerrar el frame anterior.
    fn was_down(&self, key: K) -> bool;

    #[inline]
    fn is_up(&self, key: K) -> bool {
        !self.is_down(key)
    }

    #[inline]
    fn was_up(&self, key: K) -> bool {
        !self.was_down(key)
    }

    /// Pulsada ahora y no en el frame anterior.
    #[inline]
    fn is_just_pressed(&self, key: K) -> bool {
        self.is_down(key) && !self.was_down(key)
    }

    /// Soltada ahora y pulsada en el frame anterior.
    #[inline]
    fn is_just_released(&self, key: K) -> bool {
        !self.is_down(key) && self.was_down(key)
    }
}
