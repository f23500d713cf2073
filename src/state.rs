//! Almacén de estado de input con doble buffer.
//!
//! [`InputState`] guarda el teclado y los botones del ratón del frame actual y
//! del anterior, además de la posición del puntero. Lo mutan las bombas de
//! plataforma durante la fase de vaciado, lo consulta la lógica del juego y
//! [`InputState::advance_frame`] cierra el frame. Todo en el mismo hilo.

use std::mem::{self, MaybeUninit};

use crate::event::{EventBus, EventCode, EventPayload, EventSender};
use crate::keys::{BUTTON_COUNT, KEY_COUNT, KeyCode, MouseButton};
use crate::traits::InputStateExt;

/// Estado pulsado/suelto de cada tecla canónica.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardState {
    keys: [bool; KEY_COUNT],
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }
}

impl KeyboardState {
    #[inline]
    pub fn is_down(&self, key: KeyCode) -> bool {
        key.index().is_some_and(|i| self.keys[i])
    }
}

/// Botones y posición del ratón, en coordenadas del área cliente.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseState {
    pub x: i32,
    pub y: i32,
    buttons: [bool; BUTTON_COUNT],
}

impl MouseState {
    #[inline]
    pub fn is_down(&self, button: MouseButton) -> bool {
        self.buttons.get(button.index()).copied().unwrap_or(false)
    }

    #[inline]
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

/// Aplana cualquier desplazamiento de rueda a `-1`/`+1`. Cero no es un desplazamiento.
#[inline]
pub fn normalize_wheel(delta: i32) -> Option<i8> {
    match delta.signum() {
        0 => None,
        sign => Some(sign as i8),
    }
}

/// Registro de input del proceso: teclado y ratón, actual y anterior.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keyboard_current: KeyboardState,
    keyboard_previous: KeyboardState,
    mouse_current: MouseState,
    mouse_previous: MouseState,
}

impl InputState {
    /// Estado inicial: nada pulsado, puntero en `(0, 0)`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes que necesita el host para alojar el almacén.
    pub const fn memory_requirement() -> usize {
        mem::size_of::<Self>()
    }

    /// Segunda fase de la inicialización en dos pasos: construye el almacén en el
    /// bloque reservado por el host.
    pub fn initialize(slot: &mut MaybeUninit<Self>) -> &mut Self {
        log::debug!("input: inicializado ({} bytes)", Self::memory_requirement());
        slot.write(Self::new())
    }

    // ==================== MUTACIÓN ====================

    /// Sobrescribe el estado actual de `key`. [`KeyCode::Unknown`] se ignora.
    #[inline]
    pub fn set_key(&mut self, key: KeyCode, pressed: bool) {
        if let Some(i) = key.index() {
            self.keyboard_current.keys[i] = pressed;
        }
    }

    #[inline]
    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        if let Some(slot) = self.mouse_current.buttons.get_mut(button.index()) {
            *slot = pressed;
        }
    }

    /// Copia la posición actual en la anterior y después guarda `(x, y)`.
    ///
    /// La posición anterior sigue a la última actualización, no al límite del
    /// frame, así que el delta es válido aunque lleguen varios movimientos por frame.
    #[inline]
    pub fn set_mouse_position(&mut self, x: i32, y: i32) {
        self.mouse_previous.x = self.mouse_current.x;
        self.mouse_previous.y = self.mouse_current.y;
        self.mouse_current.x = x;
        self.mouse_current.y = y;
    }

    /// Normaliza `delta` a `-1`/`+1` y lo emite como [`EventCode::MouseWheel`].
    ///
    /// La rueda no tiene estado persistente. Un `delta` de cero se descarta.
    pub fn set_mouse_wheel<B: EventBus + ?Sized>(&self, delta: i32, bus: &mut B) -> Option<i8> {
        let delta = normalize_wheel(delta)?;
        bus.emit(
            EventCode::MouseWheel,
            EventSender::Input,
            EventPayload::MouseWheel { delta },
        );
        Some(delta)
    }

    /// Como [`set_key`](Self::set_key), pero emite `KeyPressed`/`KeyReleased`
    /// cuando el estado cambia.
    pub fn process_key<B: EventBus + ?Sized>(&mut self, key: KeyCode, pressed: bool, bus: &mut B) {
        if key.index().is_none() || self.keyboard_current.is_down(key) == pressed {
            return;
        }
        self.set_key(key, pressed);
        let code = if pressed {
            EventCode::KeyPressed
        } else {
            EventCode::KeyReleased
        };
        bus.emit(code, EventSender::Input, EventPayload::Key(key));
    }

    pub fn process_button<B: EventBus + ?Sized>(
        &mut self,
        button: MouseButton,
        pressed: bool,
        bus: &mut B,
    ) {
        if self.mouse_current.is_down(button) == pressed {
            return;
        }
        self.set_button(button, pressed);
        let code = if pressed {
            EventCode::ButtonPressed
        } else {
            EventCode::ButtonReleased
        };
        bus.emit(code, EventSender::Input, EventPayload::Button(button));
    }

    pub fn process_mouse_move<B: EventBus + ?Sized>(&mut self, x: i32, y: i32, bus: &mut B) {
        if self.mouse_current.position() == (x, y) {
            return;
        }
        self.set_mouse_position(x, y);
        bus.emit(
            EventCode::MouseMoved,
            EventSender::Input,
            EventPayload::MouseMoved { x, y },
        );
    }

    /// Cierra el frame: copia teclado y botones actuales en los anteriores.
    ///
    /// Se llama una vez por frame, después de vaciar la cola nativa y de que la
    /// lógica haya hecho sus consultas; las del frame siguiente comparan contra
    /// esta copia. La posición del puntero no se toca aquí.
    pub fn advance_frame(&mut self) {
        self.keyboard_previous = self.keyboard_current;
        self.mouse_previous.buttons = self.mouse_current.buttons;
    }

    /// Vuelve al estado inicial.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // ==================== CONSULTAS ====================

    #[inline]
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keyboard_current.is_down(key)
    }

    #[inline]
    pub fn is_key_up(&self, key: KeyCode) -> bool {
        !self.is_key_down(key)
    }

    #[inline]
    pub fn was_key_down(&self, key: KeyCode) -> bool {
        self.keyboard_previous.is_down(key)
    }

    #[inline]
    pub fn was_key_up(&self, key: KeyCode) -> bool {
        !self.was_key_down(key)
    }

    #[inline]
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.mouse_current.is_down(button)
    }

    #[inline]
    pub fn is_button_up(&self, button: MouseButton) -> bool {
        !self.is_button_down(button)
    }

    #[inline]
    pub fn was_button_down(&self, button: MouseButton) -> bool {
        self.mouse_previous.is_down(button)
    }

    #[inline]
    pub fn was_button_up(&self, button: MouseButton) -> bool {
        !self.was_button_down(button)
    }

    #[inline]
    pub fn get_mouse_position(&self) -> (i32, i32) {
        self.mouse_current.position()
    }

    #[inline]
    pub fn get_previous_mouse_position(&self) -> (i32, i32) {
        self.mouse_previous.position()
    }

    pub fn any_key_down(&self) -> bool {
        self.keyboard_current.keys.iter().any(|&down| down)
    }

    /// Teclas pulsadas en el frame actual, en orden de [`KeyCode`].
    pub fn keys_down(&self) -> impl Iterator<Item = KeyCode> + '_ {
        KeyCode::ALL
            .iter()
            .copied()
            .filter(|&key| self.keyboard_current.is_down(key))
    }

    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard_current
    }

    pub fn previous_keyboard(&self) -> &KeyboardState {
        &self.keyboard_previous
    }

    pub fn mouse(&self) -> &MouseState {
        &self.mouse_current
    }

    pub fn previous_mouse(&self) -> &MouseState {
        &self.mouse_previous
    }
}

impl InputStateExt<KeyCode> for InputState {
    #[inline]
    fn set(&mut self, key: KeyCode, pressed: bool) {
        self.set_key(key, pressed);
    }

    #[inline]
    fn is_down(&self, key: KeyCode) -> bool {
        self.is_key_down(key)
    }

    #[inline]
    fn was_down(&self, key: KeyCode) -> bool {
        self.was_key_down(key)
    }
}

impl InputStateExt<MouseButton> for InputState {
    #[inline]
    fn set(&mut self, button: MouseButton, pressed: bool) {
        self.set_button(button, pressed);
    }

    #[inline]
    fn is_down(&self, button: MouseButton) -> bool {
        self.is_button_down(button)
    }

    #[inline]
    fn was_down(&self, button: MouseButton) -> bool {
        self.was_button_down(button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{BusEvent, NullBus};

    #[test]
    fn release_edge_is_detected_for_every_key() {
        for key in KeyCode::ALL {
            let mut input = InputState::new();
            input.set_key(key, true);
            input.advance_frame();
            input.set_key(key, false);

            assert!(!input.is_key_down(key), "{key:?}");
            assert!(input.was_key_down(key), "{key:?}");
            assert!(input.is_just_released(key));
        }
    }

    #[test]
    fn press_is_fresh_until_frame_closes() {
        let mut input = InputState::new();
        input.set_key(KeyCode::A, true);
        assert!(input.is_key_down(KeyCode::A));
        assert!(!input.was_key_down(KeyCode::A));
        assert!(input.is_just_pressed(KeyCode::A));

        input.advance_frame();
        assert!(input.is_key_down(KeyCode::A));
        assert!(input.was_key_down(KeyCode::A));
        assert!(!input.is_just_pressed(KeyCode::A));
    }

    #[test]
    fn set_key_twice_is_idempotent() {
        let mut input = InputState::new();
        input.set_key(KeyCode::W, true);
        input.set_key(KeyCode::W, true);
        assert!(input.is_key_down(KeyCode::W));
        assert_eq!(input.keys_down().collect::<Vec<_>>(), vec![KeyCode::W]);
    }

    #[test]
    fn advance_frame_settles_after_two_quiet_frames() {
        let mut input = InputState::new();
        input.set_key(KeyCode::Space, true);
        input.set_button(MouseButton::Right, true);
        input.advance_frame();
        input.advance_frame();

        assert_eq!(input.keyboard(), input.previous_keyboard());
        for button in MouseButton::ALL {
            assert_eq!(input.is_button_down(button), input.was_button_down(button));
        }
    }

    #[test]
    fn unknown_key_is_ignored() {
        let mut input = InputState::new();
        input.set_key(KeyCode::Unknown, true);
        assert!(!input.any_key_down());
        assert!(!input.is_key_down(KeyCode::Unknown));
        assert!(input.is_key_up(KeyCode::Unknown));
    }

    #[test]
    fn up_queries_negate_down_queries() {
        let mut input = InputState::new();
        input.set_key(KeyCode::Q, true);
        input.set_button(MouseButton::Middle, true);
        input.advance_frame();
        input.set_key(KeyCode::Q, false);

        assert_eq!(input.is_key_up(KeyCode::Q), !input.is_key_down(KeyCode::Q));
        assert_eq!(input.was_key_up(KeyCode::Q), !input.was_key_down(KeyCode::Q));
        assert!(input.is_button_down(MouseButton::Middle));
        assert!(!input.was_button_up(MouseButton::Middle));
        assert!(input.is_button_up(MouseButton::Left));
    }

    #[test]
    fn mouse_previous_tracks_last_update_within_frame() {
        let mut input = InputState::new();
        input.set_mouse_position(10, 20);
        input.set_mouse_position(30, 40);

        assert_eq!(input.get_previous_mouse_position(), (10, 20));
        assert_eq!(input.get_mouse_position(), (30, 40));

        input.advance_frame();
        assert_eq!(input.get_previous_mouse_position(), (10, 20));
    }

    #[test]
    fn wheel_is_always_unit() {
        let input = InputState::new();
        let mut bus: Vec<BusEvent> = Vec::new();
        for raw in [1, 3, 120, 240, i32::MAX] {
            assert_eq!(input.set_mouse_wheel(raw, &mut bus), Some(1));
        }
        for raw in [-1, -120, -7, i32::MIN] {
            assert_eq!(input.set_mouse_wheel(raw, &mut bus), Some(-1));
        }
        assert_eq!(input.set_mouse_wheel(0, &mut bus), None);

        assert_eq!(bus.len(), 9);
        assert!(bus.iter().all(|e| matches!(
            e.payload,
            EventPayload::MouseWheel { delta: -1 | 1 }
        )));
    }

    #[test]
    fn process_key_emits_only_on_change() {
        let mut input = InputState::new();
        let mut bus: Vec<BusEvent> = Vec::new();

        input.process_key(KeyCode::LShift, true, &mut bus);
        input.process_key(KeyCode::LShift, true, &mut bus);
        input.process_key(KeyCode::LShift, false, &mut bus);
        input.process_key(KeyCode::Unknown, true, &mut bus);

        let codes: Vec<_> = bus.iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![EventCode::KeyPressed, EventCode::KeyReleased]);
        assert!(bus.iter().all(|e| e.payload == EventPayload::Key(KeyCode::LShift)));
    }

    #[test]
    fn process_mouse_move_skips_repeats() {
        let mut input = InputState::new();
        let mut bus: Vec<BusEvent> = Vec::new();
        input.process_mouse_move(5, 5, &mut bus);
        input.process_mouse_move(5, 5, &mut bus);

        assert_eq!(bus.len(), 1);
        assert_eq!(input.get_previous_mouse_position(), (0, 0));
    }

    #[test]
    fn button_press_does_not_register_release() {
        let mut input = InputState::new();
        let mut bus: Vec<BusEvent> = Vec::new();
        input.process_button(MouseButton::Left, true, &mut bus);

        assert!(input.is_button_down(MouseButton::Left));
        assert_eq!(bus.len(), 1);
        assert_eq!(bus[0].code, EventCode::ButtonPressed);
    }

    #[test]
    fn trait_queries_match_inherent() {
        let mut input = InputState::new();
        InputStateExt::set(&mut input, MouseButton::Left, true);
        assert!(InputStateExt::is_just_pressed(&input, MouseButton::Left));
        input.advance_frame();
        assert!(!InputStateExt::is_just_pressed(&input, MouseButton::Left));
    }

    #[test]
    fn two_phase_initialization() {
        assert_eq!(InputState::memory_requirement(), mem::size_of::<InputState>());
        let mut slot = MaybeUninit::<InputState>::uninit();
        let input = InputState::initialize(&mut slot);
        assert!(!input.any_key_down());
        input.set_key(KeyCode::Z, true);
        assert!(input.is_key_down(KeyCode::Z));
    }

    #[test]
    fn reset_clears_everything() {
        let mut input = InputState::new();
        input.set_key(KeyCode::F1, true);
        input.process_mouse_move(3, 4, &mut NullBus);
        input.advance_frame();
        input.reset();
        assert!(!input.any_key_down());
        assert!(!input.was_key_down(KeyCode::F1));
        assert_eq!(input.get_mouse_position(), (0, 0));
    }
}
