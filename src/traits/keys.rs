//! Traducción de códigos de tecla nativos a [`KeyCode`].
//!
//! Cada backend (X11, Win32) aporta una tabla fija y una implementación de
//! [`KeyExt`]. El backend activo se elige al compilar; no hay despacho dinámico.
//!
//! # Convenciones de tipos genéricos
//!
//! - **`KeyExt<B, N>`**: Conversión de teclas
//!   - `B` = **B**ackend (código nativo: keysym de X11, virtual-key de Win32)
//!   - `N` = **N**ormalized (tipo normalizado del runtime, normalmente [`KeyCode`])
//!
//! # Ejemplo
//! ```rust,ignore
//! use orbit_input_platform::{KeyCode, KeyExt, X11Keys};
//!
//! assert_eq!(X11Keys::from_backend_key(0x0061), KeyCode::A); // 'a'
//! assert_eq!(X11Keys::from_backend_key(0x0041), KeyCode::A); // 'A'
//! assert_eq!(X11Keys::to_backend_key(KeyCode::A), Some(0x0041));
//! ```
//!
//! [`KeyCode`]: crate::keys::KeyCode

/// El trait [`KeyExt`] define la interfaz para **convertir entre códigos de tecla nativos**
/// y la representación unificada del motor.
///
/// # Propósito
/// Abstrae la traducción entre el espacio de códigos de un backend y el tipo de tecla
/// normalizado. Es una función pura: sin estado, sin asignaciones, sin fallos.
///
/// # Parámetros genéricos
/// - `B`: Código **nativo del backend** (`u32` keysym en X11, `u8` virtual-key en Win32).
/// - `N`: Tipo de tecla **normalizado** ([`KeyCode`](crate::keys::KeyCode)).
///
/// # Reglas de implementación
/// - Los códigos sin equivalente devuelven el centinela desconocido del tipo `N`,
///   nunca un error: las teclas que el motor no modela se ignoran en silencio.
/// - La tabla debe ser **autoconsistente**: para todo código nativo `c` presente en la
///   tabla, `to_backend_key(from_backend_key(c)) == Some(c)`.
/// - Shift/Control/Alt genéricos se desambiguan **antes** de traducir, en la bomba de
///   eventos, que es quien tiene la información lateral (flag extendido, scancode).
pub trait KeyExt<B, N>
where
    B: Copy + PartialEq,
    N: Copy + PartialEq,
{
    /// Convierte un código nativo (`B`) a su representación normalizada (`N`).
    fn from_backend_key(key: B) -> N;

    /// Convierte una tecla normalizada (`N`) a su código nativo, si lo tiene.
    fn to_backend_key(code: N) -> Option<B>;
}
