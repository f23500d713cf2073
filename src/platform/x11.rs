//! Backend X11 (XCB).
//!
//! La conexión real con el servidor X queda detrás de [`XcbConnection`]; este
//! módulo aporta la tabla de keysyms, la clasificación de eventos y la lógica de
//! arranque (qué es fatal y qué se degrada).

use std::mem::{self, MaybeUninit};

use log::{debug, error, warn};

use crate::config::WindowConfig;
use crate::error::{PlatformError, Result};
use crate::event::{EventBus, EventCode, EventPayload, EventSender};
use crate::keys::{KeyCode, MouseButton};
use crate::state::InputState;
use crate::traits::{KeyExt, PlatformExt};

/// keysym → tecla canónica. Las letras aparecen solo en mayúscula.
const KEYSYM_TABLE: &[(u32, KeyCode)] = &[
    (0xff08, KeyCode::Backspace),
    (0xff0d, KeyCode::Enter),
    (0xff09, KeyCode::Tab),
    (0xff13, KeyCode::Pause),
    (0xffe5, KeyCode::Capital),
    (0xff1b, KeyCode::Escape),
    (0xff23, KeyCode::Convert),
    (0xff22, KeyCode::NonConvert),
    (0xff7e, KeyCode::ModeChange),
    (0x0020, KeyCode::Space),
    (0xff55, KeyCode::Prior),
    (0xff56, KeyCode::Next),
    (0xff57, KeyCode::End),
    (0xff50, KeyCode::Home),
    (0xff51, KeyCode::Left),
    (0xff52, KeyCode::Up),
    (0xff53, KeyCode::Right),
    (0xff54, KeyCode::Down),
    (0xff60, KeyCode::Select),
    (0xff61, KeyCode::Print),
    (0xff62, KeyCode::Execute),
    (0xff63, KeyCode::Insert),
    (0xffff, KeyCode::Delete),
    (0xff6a, KeyCode::Help),
    (0xffeb, KeyCode::LWin),
    (0xffec, KeyCode::RWin),
    (0xff67, KeyCode::Apps),
    // keypad sin Bloq Num
    (0xff9e, KeyCode::Numpad0),
    (0xff9c, KeyCode::Numpad1),
    (0xff99, KeyCode::Numpad2),
    (0xff9b, KeyCode::Numpad3),
    (0xff96, KeyCode::Numpad4),
    (0xff9d, KeyCode::Numpad5),
    (0xff98, KeyCode::Numpad6),
    (0xff95, KeyCode::Numpad7),
    (0xff97, KeyCode::Numpad8),
    (0xff9a, KeyCode::Numpad9),
    (0xffaa, KeyCode::Multiply),
    (0xffab, KeyCode::Add),
    (0xffac, KeyCode::Separator),
    (0xffad, KeyCode::Subtract),
    (0xff9f, KeyCode::Decimal),
    (0xffaf, KeyCode::Divide),
    (0xffbe, KeyCode::F1),
    (0xffbf, KeyCode::F2),
    (0xffc0, KeyCode::F3),
    (0xffc1, KeyCode::F4),
    (0xffc2, KeyCode::F5),
    (0xffc3, KeyCode::F6),
    (0xffc4, KeyCode::F7),
    (0xffc5, KeyCode::F8),
    (0xffc6, KeyCode::F9),
    (0xffc7, KeyCode::F10),
    (0xffc8, KeyCode::F11),
    (0xffc9, KeyCode::F12),
    (0xffca, KeyCode::F13),
    (0xffcb, KeyCode::F14),
    (0xffcc, KeyCode::F15),
    (0xffcd, KeyCode::F16),
    (0xffce, KeyCode::F17),
    (0xffcf, KeyCode::F18),
    (0xffd0, KeyCode::F19),
    (0xffd1, KeyCode::F20),
    (0xffd2, KeyCode::F21),
    (0xffd3, KeyCode::F22),
    (0xffd4, KeyCode::F23),
    (0xffd5, KeyCode::F24),
    (0xff7f, KeyCode::NumLock),
    (0xff14, KeyCode::Scroll),
    (0xffbd, KeyCode::NumpadEqual),
    (0xffe1, KeyCode::LShift),
    (0xffe2, KeyCode::RShift),
    (0xffe3, KeyCode::LControl),
    (0xffe4, KeyCode::RControl),
    (0xffe9, KeyCode::LAlt),
    // ISO_Level3_Shift: lo que suele dar Alt derecho (AltGr) en la columna 0
    (0xfe03, KeyCode::RAlt),
    (0x003b, KeyCode::Semicolon),
    (0x002b, KeyCode::Plus),
    (0x002c, KeyCode::Comma),
    (0x002d, KeyCode::Minus),
    (0x002e, KeyCode::Period),
    (0x002f, KeyCode::Slash),
    (0x0060, KeyCode::Grave),
    (0x0030, KeyCode::Num0),
    (0x0031, KeyCode::Num1),
    (0x0032, KeyCode::Num2),
    (0x0033, KeyCode::Num3),
    (0x0034, KeyCode::Num4),
    (0x0035, KeyCode::Num5),
    (0x0036, KeyCode::Num6),
    (0x0037, KeyCode::Num7),
    (0x0038, KeyCode::Num8),
    (0x0039, KeyCode::Num9),
    (0x0041, KeyCode::A),
    (0x0042, KeyCode::B),
    (0x0043, KeyCode::C),
    (0x0044, KeyCode::D),
    (0x0045, KeyCode::E),
    (0x0046, KeyCode::F),
    (0x0047, KeyCode::G),
    (0x0048, KeyCode::H),
    (0x0049, KeyCode::I),
    (0x004a, KeyCode::J),
    (0x004b, KeyCode::K),
    (0x004c, KeyCode::L),
    (0x004d, KeyCode::M),
    (0x004e, KeyCode::N),
    (0x004f, KeyCode::O),
    (0x0050, KeyCode::P),
    (0x0051, KeyCode::Q),
    (0x0052, KeyCode::R),
    (0x0053, KeyCode::S),
    (0x0054, KeyCode::T),
    (0x0055, KeyCode::U),
    (0x0056, KeyCode::V),
    (0x0057, KeyCode::W),
    (0x0058, KeyCode::X),
    (0x0059, KeyCode::Y),
    (0x005a, KeyCode::Z),
];

/// Alt_R. Algunos layouts lo dan en lugar de ISO_Level3_Shift.
const XK_ALT_R: u32 = 0xffea;

/// Traductor keysym ↔ [`KeyCode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct X11Keys;

impl X11Keys {
    /// Todas las entradas de la tabla, en su orden.
    pub fn table() -> &'static [(u32, KeyCode)] {
        KEYSYM_TABLE
    }

    /// Pliega `a..=z` sobre `A..=Z`; el resto queda igual.
    #[inline]
    pub fn fold_case(keysym: u32) -> u32 {
        match keysym {
            0x0061..=0x007a => keysym - (0x0061 - 0x0041),
            _ => keysym,
        }
    }
}

impl KeyExt<u32, KeyCode> for X11Keys {
    fn from_backend_key(keysym: u32) -> KeyCode {
        let keysym = Self::fold_case(keysym);
        KEYSYM_TABLE
            .iter()
            .find(|(native, _)| *native == keysym)
            .map_or(KeyCode::Unknown, |&(_, key)| key)
    }

    fn to_backend_key(code: KeyCode) -> Option<u32> {
        KEYSYM_TABLE
            .iter()
            .find(|(_, key)| *key == code)
            .map(|&(native, _)| native)
    }
}

/// Registro nativo ya leído de la cola XCB.
///
/// Los campos conservan los nombres y tipos de las estructuras `xcb_*_event_t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XcbEvent {
    KeyPress { detail: u8 },
    KeyRelease { detail: u8 },
    ButtonPress { detail: u8 },
    ButtonRelease { detail: u8 },
    MotionNotify { event_x: i16, event_y: i16 },
    /// También llega al mover la ventana; se reenvía igualmente.
    ConfigureNotify { width: u16, height: u16 },
    ClientMessage { data32: [u32; 5] },
    /// Cualquier otro `response_type`.
    Other { response_type: u8 },
}

/// Resultado de consultar la extensión XKB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XkbSupport {
    /// `xcb_get_extension_data` no devolvió nada.
    Missing,
    /// La extensión existe pero `use_extension` respondió `supported = 0`.
    Unsupported,
    Supported,
}

/// Conexión nativa con el servidor X. La implementa el host (xcb, x11rb...).
pub trait XcbConnection {
    /// `xcb_connection_has_error`.
    fn has_error(&self) -> bool;

    fn query_xkb(&mut self) -> Result<XkbSupport>;

    /// Pide `XCB_XKB_PER_CLIENT_FLAG_DETECTABLE_AUTO_REPEAT` solo para este cliente.
    fn set_detectable_auto_repeat(&mut self) -> Result<()>;

    /// Crea y mapea la ventana, registra `WM_PROTOCOLS` y devuelve el átomo
    /// `WM_DELETE_WINDOW`.
    fn create_window(&mut self, config: &WindowConfig) -> Result<u32>;

    fn flush(&mut self) -> Result<()>;

    /// `xcb_poll_for_event`: nunca bloquea.
    fn poll_for_event(&mut self) -> Option<XcbEvent>;

    /// `xcb_key_symbols_get_keysym`.
    fn keysym(&self, keycode: u8, column: u8) -> u32;

    fn destroy_window(&mut self);
}

/// Clasificación del `detail` de un evento de botón.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ButtonDetail {
    Button(MouseButton),
    Wheel(i32),
    Ignored,
}

#[inline]
fn classify_button(detail: u8) -> ButtonDetail {
    match detail {
        1 => ButtonDetail::Button(MouseButton::Left),
        2 => ButtonDetail::Button(MouseButton::Middle),
        3 => ButtonDetail::Button(MouseButton::Right),
        4 => ButtonDetail::Wheel(1),
        5 => ButtonDetail::Wheel(-1),
        // 6/7 son rueda horizontal, 8+ botones laterales
        _ => ButtonDetail::Ignored,
    }
}

/// Bomba de eventos X11.
#[derive(Debug)]
pub struct X11Platform<C: XcbConnection> {
    connection: C,
    wm_delete_window: u32,
    running: bool,
    quit_requested: bool,
    window_open: bool,
    events_processed: usize,
}

impl<C: XcbConnection> X11Platform<C> {
    pub const fn memory_requirement() -> usize {
        mem::size_of::<Self>()
    }

    /// Conecta, verifica XKB, crea la ventana y vacía el stream.
    ///
    /// Sin XKB no se arranca. Si falla la autorepetición detectable, solo se avisa:
    /// las teclas mantenidas llegarán como pares soltar/pulsar.
    pub fn startup(mut connection: C, config: &WindowConfig) -> Result<Self> {
        if connection.has_error() {
            error!("FATAL: failed to connect to X server via XCB");
            return Err(PlatformError::connection("X server via XCB"));
        }

        match connection
            .query_xkb()
            .inspect_err(|err| error!("FATAL: couldn't load the xcb-xkb extension: {err}"))?
        {
            XkbSupport::Supported => {}
            XkbSupport::Missing => {
                error!("FATAL: XKB extension not available on host X11 server");
                return Err(PlatformError::ExtensionMissing("XKB"));
            }
            XkbSupport::Unsupported => {
                error!("FATAL: the XKB extension is not supported on this X server");
                return Err(PlatformError::ExtensionUnsupported("XKB"));
            }
        }

        if let Err(err) = connection.set_detectable_auto_repeat() {
            warn!("failed to set XKB per-client flags, keys may auto-repeat: {err}");
        }

        let wm_delete_window = connection
            .create_window(config)
            .inspect_err(|err| error!("FATAL: {err}"))?;
        connection
            .flush()
            .inspect_err(|err| error!("FATAL: an error occurred when flushing the stream: {err}"))?;

        debug!(
            "x11: window '{}' {}x{} ready",
            config.application_name, config.width, config.height
        );

        Ok(Self {
            connection,
            wm_delete_window,
            running: true,
            quit_requested: false,
            window_open: true,
            events_processed: 0,
        })
    }

    /// Igual que [`startup`](Self::startup), construyendo en el bloque del host.
    pub fn startup_in<'a>(
        slot: &'a mut MaybeUninit<Self>,
        connection: C,
        config: &WindowConfig,
    ) -> Result<&'a mut Self> {
        Ok(slot.write(Self::startup(connection, config)?))
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Marca la petición de cierre: `is_running` pasa a `false` al momento y la
    /// siguiente `pump_messages` emite `ApplicationQuit`.
    fn request_quit(&mut self) -> bool {
        self.running = false;
        self.quit_requested = true;
        true
    }

    /// keycode → tecla, resolviendo Alt_R que la tabla no cubre.
    fn translate_keycode(&self, keycode: u8) -> KeyCode {
        match self.connection.keysym(keycode, 0) {
            XK_ALT_R => KeyCode::RAlt,
            keysym => X11Keys::from_backend_key(keysym),
        }
    }
}

impl<C: XcbConnection> PlatformExt for X11Platform<C> {
    type NativeEvent = XcbEvent;

    fn backend_name(&self) -> &'static str {
        "x11"
    }

    fn pump_messages<B: EventBus>(&mut self, input: &mut InputState, bus: &mut B) -> bool {
        while let Some(event) = self.connection.poll_for_event() {
            self.process_event(event, input, bus);
        }

        // también cubre cierres despachados fuera de la bomba
        let quit = mem::take(&mut self.quit_requested);
        if quit {
            debug!("x11: WM_DELETE_WINDOW received");
            bus.emit(
                EventCode::ApplicationQuit,
                EventSender::Platform,
                EventPayload::Empty,
            );
        }
        !quit
    }

    fn process_event<B: EventBus>(
        &mut self,
        event: XcbEvent,
        input: &mut InputState,
        bus: &mut B,
    ) -> bool {
        self.events_processed += 1;

        match event {
            XcbEvent::KeyPress { detail } => {
                input.process_key(self.translate_keycode(detail), true, bus);
            }
            XcbEvent::KeyRelease { detail } => {
                input.process_key(self.translate_keycode(detail), false, bus);
            }
            XcbEvent::ButtonPress { detail } => match classify_button(detail) {
                ButtonDetail::Button(button) => input.process_button(button, true, bus),
                ButtonDetail::Wheel(delta) => {
                    input.set_mouse_wheel(delta, bus);
                }
                ButtonDetail::Ignored => {}
            },
            XcbEvent::ButtonRelease { detail } => {
                // la rueda no tiene liberación que reflejar
                if let ButtonDetail::Button(button) = classify_button(detail) {
                    input.process_button(button, false, bus);
                }
            }
            XcbEvent::MotionNotify { event_x, event_y } => {
                input.process_mouse_move(event_x.into(), event_y.into(), bus);
            }
            XcbEvent::ConfigureNotify { width, height } => {
                bus.emit(
                    EventCode::Resized,
                    EventSender::Platform,
                    EventPayload::Resized { width, height },
                );
            }
            XcbEvent::ClientMessage { data32 } if data32[0] == self.wm_delete_window => {
                return self.request_quit();
            }
            XcbEvent::ClientMessage { .. } => {}
            XcbEvent::Other { .. } => {}
        }
        false
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn events_processed(&self) -> usize {
        self.events_processed
    }

    fn shutdown(&mut self) {
        if self.window_open {
            self.connection.destroy_window();
            self.window_open = false;
            debug!("x11: window destroyed");
        }
    }
}
