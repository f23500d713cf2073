//! Interfaz con el bus de eventos externo.
//!
//! El mecanismo de publicación/suscripción no vive en este crate: aquí solo se
//! define el contrato `emit(código, emisor, payload)` que consumen el almacén de
//! input y las bombas de plataforma. Es síncrono y *fire-and-forget*.

use crate::keys::{KeyCode, MouseButton};

/// Códigos de evento que este crate puede emitir.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCode {
    /// La ventana pidió cerrarse.
    ApplicationQuit = 0x01,
    KeyPressed = 0x02,
    KeyReleased = 0x03,
    ButtonPressed = 0x04,
    ButtonReleased = 0x05,
    MouseMoved = 0x06,
    MouseWheel = 0x07,
    /// Nuevo tamaño del área cliente.
    Resized = 0x08,
}

/// Subsistema que origina el evento.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSender {
    Platform,
    Input,
}

/// Datos asociados a cada [`EventCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPayload {
    Empty,
    Key(KeyCode),
    Button(MouseButton),
    MouseMoved { x: i32, y: i32 },
    /// Siempre `-1` o `+1`.
    MouseWheel { delta: i8 },
    Resized { width: u16, height: u16 },
}

/// Evento ya emitido, tal como lo guarda [`Vec<BusEvent>`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusEvent {
    pub code: EventCode,
    pub sender: EventSender,
    pub payload: EventPayload,
}

/// Destino de los eventos que no modifican el estado de input.
///
/// # Ejemplo
/// ```rust,ignore
/// struct Logger;
///
/// impl EventBus for Logger {
///     fn emit(&mut self, code: EventCode, sender: EventSender, payload: EventPayload) {
///         println!("{sender:?} -> {code:?}: {payload:?}");
///     }
/// }
/// ```
pub trait EventBus {
    fn emit(&mut self, code: EventCode, sender: EventSender, payload: EventPayload);
}

/// Bus que descarta todo.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBus;

impl EventBus for NullBus {
    #[inline]
    fn emit(&mut self, _code: EventCode, _sender: EventSender, _payload: EventPayload) {}
}

impl EventBus for Vec<BusEvent> {
    fn emit(&mut self, code: EventCode, sender: EventSender, payload: EventPayload) {
        self.push(BusEvent {
            code,
            sender,
            payload,
        });
    }
}

impl<B: EventBus + ?Sized> EventBus for &mut B {
    #[inline]
    fn emit(&mut self, code: EventCode, sender: EventSender, payload: EventPayload) {
        (**self).emit(code, sender, payload);
    }
}
