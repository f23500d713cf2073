//! Acceso compartido al almacén de input.
//!
//! El núcleo es de un solo hilo. Un host multihilo que quiera leer el input desde
//! otro hilo usa [`SharedInput`], que serializa todo acceso tras un mutex: la
//! bomba escribe y la lógica lee, nunca a la vez.
//!
//! El tipo de lock se elige con features:
//! - `std_lock` (por defecto): `std::sync::Mutex`
//! - `parking_lot`: `parking_lot::Mutex`

use std::sync::Arc;

use crate::state::InputState;

#[cfg(feature = "parking_lot")]
type Lock<T> = parking_lot::Mutex<T>;
#[cfg(feature = "parking_lot")]
pub type InputGuard<'a> = parking_lot::MutexGuard<'a, InputState>;

#[cfg(not(feature = "parking_lot"))]
type Lock<T> = std::sync::Mutex<T>;
#[cfg(not(feature = "parking_lot"))]
pub type InputGuard<'a> = std::sync::MutexGuard<'a, InputState>;

/// Manejador clonable de un [`InputState`] compartido.
#[derive(Debug, Clone, Default)]
pub struct SharedInput {
    inner: Arc<Lock<InputState>>,
}

impl SharedInput {
    pub fn new(state: InputState) -> Self {
        Self {
            inner: Arc::new(Lock::new(state)),
        }
    }

    #[cfg(feature = "parking_lot")]
    pub fn lock(&self) -> InputGuard<'_> {
        self.inner.lock()
    }

    /// Un panic con el lock tomado no deja el estado a medias (todas las
    /// mutaciones son escrituras simples), así que el envenenamiento se ignora.
    #[cfg(not(feature = "parking_lot"))]
    pub fn lock(&self) -> InputGuard<'_> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Ejecuta `f` con el lock tomado.
    pub fn with<R>(&self, f: impl FnOnce(&mut InputState) -> R) -> R {
        f(&mut self.lock())
    }
}

impl From<InputState> for SharedInput {
    fn from(state: InputState) -> Self {
        Self::new(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyCode;
    use std::thread;

    #[test]
    fn clones_share_state() {
        let shared = SharedInput::default();
        let reader = shared.clone();

        shared.with(|input| input.set_key(KeyCode::Enter, true));
        assert!(reader.lock().is_key_down(KeyCode::Enter));
    }

    #[test]
    fn readable_from_another_thread() {
        let shared = SharedInput::new(InputState::new());
        shared.with(|input| {
            input.set_key(KeyCode::Escape, true);
            input.advance_frame();
        });

        let reader = shared.clone();
        let was_down = thread::spawn(move || reader.lock().was_key_down(KeyCode::Escape))
            .join()
            .unwrap();
        assert!(was_down);
    }
}
