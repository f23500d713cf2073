//! Backends de plataforma.
//!
//! La lógica de ambos backends compila siempre (no depende de cabeceras del
//! sistema: la conexión nativa la aporta el host). El backend **activo** se elige
//! con features de Cargo y se expone como [`ActivePlatform`] y [`ActiveKeys`]:
//!
//! - `x11` (por defecto): [`x11::X11Platform`] + [`x11::X11Keys`]
//! - `win32`: [`win32::Win32Platform`] + [`win32::Win32Keys`]; tiene prioridad si
//!   ambas features están activas.

pub mod win32;
pub mod x11;

#[cfg(feature = "win32")]
pub type ActivePlatform<C> = win32::Win32Platform<C>;
#[cfg(feature = "win32")]
pub type ActiveKeys = win32::Win32Keys;

#[cfg(all(feature = "x11", not(feature = "win32")))]
pub type ActivePlatform<C> = x11::X11Platform<C>;
#[cfg(all(feature = "x11", not(feature = "win32")))]
pub type ActiveKeys = x11::X11Keys;
