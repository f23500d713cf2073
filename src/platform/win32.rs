//! Backend Win32.
//!
//! La ventana y el bucle `PeekMessage` viven detrás de [`Win32Connection`]. Aquí
//! está la tabla de virtual-keys y el cuerpo del procedimiento de ventana: la
//! desambiguación de Shift/Control/Alt y el reparto de mensajes.

use std::mem::{self, MaybeUninit};

use log::{debug, error};

use crate::config::WindowConfig;
use crate::error::Result;
use crate::event::{EventBus, EventCode, EventPayload, EventSender};
use crate::keys::{KEY_COUNT, KeyCode, MouseButton};
use crate::state::InputState;
use crate::traits::{KeyExt, PlatformExt};

pub const WM_SIZE: u32 = 0x0005;
pub const WM_CLOSE: u32 = 0x0010;
pub const WM_QUIT: u32 = 0x0012;
pub const WM_KEYDOWN: u32 = 0x0100;
pub const WM_KEYUP: u32 = 0x0101;
pub const WM_SYSKEYDOWN: u32 = 0x0104;
pub const WM_SYSKEYUP: u32 = 0x0105;
pub const WM_MOUSEMOVE: u32 = 0x0200;
pub const WM_LBUTTONDOWN: u32 = 0x0201;
pub const WM_LBUTTONUP: u32 = 0x0202;
pub const WM_RBUTTONDOWN: u32 = 0x0204;
pub const WM_RBUTTONUP: u32 = 0x0205;
pub const WM_MBUTTONDOWN: u32 = 0x0207;
pub const WM_MBUTTONUP: u32 = 0x0208;
pub const WM_MOUSEWHEEL: u32 = 0x020a;

pub const VK_SHIFT: u8 = 0x10;
pub const VK_CONTROL: u8 = 0x11;
pub const VK_MENU: u8 = 0x12;
pub const VK_LSHIFT: u8 = 0xa0;
pub const VK_RSHIFT: u8 = 0xa1;
pub const VK_LCONTROL: u8 = 0xa2;
pub const VK_RCONTROL: u8 = 0xa3;
pub const VK_LMENU: u8 = 0xa4;
pub const VK_RMENU: u8 = 0xa5;

/// `KF_EXTENDED` dentro de `HIWORD(lParam)`.
const KF_EXTENDED: usize = 0x0100;

/// Virtual-key de cada [`KeyCode`], indexado por su valor numérico.
const VK_TABLE: [u8; KEY_COUNT] = [
    0x08, 0x0d, 0x09, 0x10, 0x11, 0x13, 0x14, 0x1b, // Backspace..Escape
    0x1c, 0x1d, 0x1e, 0x1f, // IME
    0x20, 0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27, 0x28, // Space..Down
    0x29, 0x2a, 0x2b, 0x2c, 0x2d, 0x2e, 0x2f, // Select..Help
    0x30, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, // 0..9
    0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, 0x4a, 0x4b, 0x4c, 0x4d, // A..M
    0x4e, 0x4f, 0x50, 0x51, 0x52, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5a, // N..Z
    0x5b, 0x5c, 0x5d, 0x5f, // LWin, RWin, Apps, Sleep
    0x60, 0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69, // Numpad0..9
    0x6a, 0x6b, 0x6c, 0x6d, 0x6e, 0x6f, // Multiply..Divide
    0x70, 0x71, 0x72, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7a, 0x7b, // F1..F12
    0x7c, 0x7d, 0x7e, 0x7f, 0x80, 0x81, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87, // F13..F24
    0x90, 0x91, 0x92, // NumLock, Scroll, NumpadEqual
    0xa0, 0xa1, 0xa2, 0xa3, 0xa4, 0xa5, // modificadores con lado
    0xba, 0xbb, 0xbc, 0xbd, 0xbe, 0xbf, 0xc0, // puntuación
];

/// Traductor virtual-key ↔ [`KeyCode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Keys;

impl Win32Keys {
    pub fn table() -> &'static [u8; KEY_COUNT] {
        &VK_TABLE
    }
}

impl KeyExt<u8, KeyCode> for Win32Keys {
    fn from_backend_key(vk: u8) -> KeyCode {
        VK_TABLE
            .iter()
            .position(|&native| native == vk)
            .and_then(KeyCode::from_index)
            .unwrap_or(KeyCode::Unknown)
    }

    fn to_backend_key(code: KeyCode) -> Option<u8> {
        code.index().map(|i| VK_TABLE[i])
    }
}

/// `MSG` tal como lo entrega la cola (o lo recibe el procedimiento de ventana).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Win32Message {
    pub msg: u32,
    pub w_param: usize,
    pub l_param: isize,
}

impl Win32Message {
    pub fn new(msg: u32, w_param: usize, l_param: isize) -> Self {
        Self {
            msg,
            w_param,
            l_param,
        }
    }
}

/// `MAKELPARAM`.
#[inline]
pub fn make_lparam(lo: u16, hi: u16) -> isize {
    ((hi as u32) << 16 | lo as u32) as i32 as isize
}

#[inline]
fn loword(value: usize) -> u16 {
    (value & 0xffff) as u16
}

#[inline]
fn hiword(value: usize) -> u16 {
    ((value >> 16) & 0xffff) as u16
}

/// Ventana Win32 y su cola de mensajes. La implementa el host.
pub trait Win32Connection {
    /// Registra la clase, crea y muestra la ventana.
    fn create_window(&mut self, config: &WindowConfig) -> Result<()>;

    /// `MapVirtualKey(vk, MAPVK_VK_TO_VSC)`.
    fn map_virtual_key(&self, vk: u8) -> u32;

    /// `PeekMessage(.., PM_REMOVE)` + traducción: siguiente mensaje para la
    /// ventana o `None` si la cola está vacía. Nunca bloquea.
    fn peek_message(&mut self) -> Option<Win32Message>;

    fn destroy_window(&mut self);
}

/// Bomba de eventos Win32.
#[derive(Debug)]
pub struct Win32Platform<C: Win32Connection> {
    connection: C,
    left_shift_scancode: u32,
    running: bool,
    quit_requested: bool,
    window_open: bool,
    events_processed: usize,
}

impl<C: Win32Connection> Win32Platform<C> {
    pub const fn memory_requirement() -> usize {
        mem::size_of::<Self>()
    }

    pub fn startup(mut connection: C, config: &WindowConfig) -> Result<Self> {
        connection
            .create_window(config)
            .inspect_err(|err| error!("FATAL: window creation failed: {err}"))?;

        // KF_EXTENDED no distingue los Shift; se compara el scancode con el izquierdo
        let left_shift_scancode = connection.map_virtual_key(VK_LSHIFT);

        debug!(
            "win32: window '{}' {}x{} ready",
            config.application_name, config.width, config.height
        );

        Ok(Self {
            connection,
            left_shift_scancode,
            running: true,
            quit_requested: false,
            window_open: true,
            events_processed: 0,
        })
    }

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

    /// Resuelve Shift/Control/Alt genéricos a su variante con lado.
    fn sided_virtual_key(&self, vk: u8, l_param: isize) -> u8 {
        let flags = hiword(l_param as usize) as usize;
        let extended = flags & KF_EXTENDED == KF_EXTENDED;

        match vk {
            VK_MENU if extended => VK_RMENU,
            VK_MENU => VK_LMENU,
            VK_CONTROL if extended => VK_RCONTROL,
            VK_CONTROL => VK_LCONTROL,
            VK_SHIFT => {
                let scancode = (flags & 0xff) as u32;
                if scancode == self.left_shift_scancode {
                    VK_LSHIFT
                } else {
                    VK_RSHIFT
                }
            }
            other => other,
        }
    }

    /// Marca la petición de cierre: `is_running` pasa a `false` al momento y la
    /// siguiente `pump_messages` emite `ApplicationQuit`.
    fn request_quit(&mut self) -> bool {
        self.running = false;
        self.quit_requested = true;
        true
    }

    fn translate_message_key(&self, message: &Win32Message) -> KeyCode {
        match u8::try_from(message.w_param) {
            Ok(vk) => Win32Keys::from_backend_key(self.sided_virtual_key(vk, message.l_param)),
            Err(_) => KeyCode::Unknown,
        }
    }
}

impl<C: Win32Connection> PlatformExt for Win32Platform<C> {
    type NativeEvent = Win32Message;

    fn backend_name(&self) -> &'static str {
        "win32"
    }

    fn pump_messages<B: EventBus>(&mut self, input: &mut InputState, bus: &mut B) -> bool {
        while let Some(message) = self.connection.peek_message() {
            self.process_event(message, input, bus);
        }

        // también cubre cierres despachados fuera de la bomba
        let quit = mem::take(&mut self.quit_requested);
        if quit {
            debug!("win32: close requested");
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
        message: Win32Message,
        input: &mut InputState,
        bus: &mut B,
    ) -> bool {
        self.events_processed += 1;
        let l_param = message.l_param as usize;

        match message.msg {
            WM_CLOSE | WM_QUIT => return self.request_quit(),
            WM_SIZE => {
                bus.emit(
                    EventCode::Resized,
                    EventSender::Platform,
                    EventPayload::Resized {
                        width: loword(l_param),
                        height: hiword(l_param),
                    },
                );
            }
            WM_KEYDOWN | WM_SYSKEYDOWN => {
                input.process_key(self.translate_message_key(&message), true, bus);
            }
            WM_KEYUP | WM_SYSKEYUP => {
                input.process_key(self.translate_message_key(&message), false, bus);
            }
            WM_MOUSEMOVE => {
                // GET_X_LPARAM / GET_Y_LPARAM: con signo en multi-monitor
                let x = loword(l_param) as i16;
                let y = hiword(l_param) as i16;
                input.process_mouse_move(x.into(), y.into(), bus);
            }
            WM_MOUSEWHEEL => {
                let z_delta = hiword(message.w_param) as i16;
                input.set_mouse_wheel(z_delta.into(), bus);
            }
            WM_LBUTTONDOWN => input.process_button(MouseButton::Left, true, bus),
            WM_LBUTTONUP => input.process_button(MouseButton::Left, false, bus),
            WM_MBUTTONDOWN => input.process_button(MouseButton::Middle, true, bus),
            WM_MBUTTONUP => input.process_button(MouseButton::Middle, false, bus),
            WM_RBUTTONDOWN => input.process_button(MouseButton::Right, true, bus),
            WM_RBUTTONUP => input.process_button(MouseButton::Right, false, bus),
            _ => {}
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
            debug!("win32: window destroyed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlatformError;
    use crate::event::BusEvent;
    use std::collections::VecDeque;

    const LSHIFT_SCAN: u16 = 0x2a;
    const RSHIFT_SCAN: u16 = 0x36;

    #[derive(Debug, Default)]
    struct FakeWindow {
        refuse: bool,
        queue: VecDeque<Win32Message>,
        destroyed: usize,
    }

    impl Win32Connection for FakeWindow {
        fn create_window(&mut self, _config: &WindowConfig) -> Result<()> {
            if self.refuse {
                Err(PlatformError::window_creation("CreateWindowExA returned null"))
            } else {
                Ok(())
            }
        }

        fn map_virtual_key(&self, vk: u8) -> u32 {
            match vk {
                VK_LSHIFT => LSHIFT_SCAN as u32,
                VK_RSHIFT => RSHIFT_SCAN as u32,
                _ => 0,
            }
        }

        fn peek_message(&mut self) -> Option<Win32Message> {
            self.queue.pop_front()
        }

        fn destroy_window(&mut self) {
            self.destroyed += 1;
        }
    }

    fn key(msg: u32, vk: u8, scancode: u16, extended: bool) -> Win32Message {
        let flags = scancode | if extended { KF_EXTENDED as u16 } else { 0 };
        Win32Message::new(msg, vk as usize, make_lparam(1, flags))
    }

    fn pump(messages: &[Win32Message]) -> (InputState, Vec<BusEvent>, bool) {
        let conn = FakeWindow {
            queue: messages.iter().copied().collect(),
            ..FakeWindow::default()
        };
        let mut platform = Win32Platform::startup(conn, &WindowConfig::default()).unwrap();
        let mut input = InputState::new();
        let mut bus = Vec::new();
        let running = platform.pump_messages(&mut input, &mut bus);
        (input, bus, running)
    }

    #[test]
    fn table_is_self_consistent() {
        for (i, &vk) in Win32Keys::table().iter().enumerate() {
            let key = Win32Keys::from_backend_key(vk);
            assert_eq!(key as usize, i, "vk {vk:#04x}");
            assert_eq!(Win32Keys::to_backend_key(key), Some(vk));
        }
    }

    #[test]
    fn table_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for &vk in Win32Keys::table() {
            assert!(seen.insert(vk), "vk {vk:#04x} repetido");
        }
    }

    #[test]
    fn unmapped_vk_is_unknown() {
        assert_eq!(Win32Keys::from_backend_key(VK_MENU), KeyCode::Unknown);
        assert_eq!(Win32Keys::from_backend_key(0xff), KeyCode::Unknown);
        assert_eq!(Win32Keys::to_backend_key(KeyCode::Unknown), None);
    }

    #[test]
    fn window_creation_failure_is_fatal() {
        let conn = FakeWindow {
            refuse: true,
            ..FakeWindow::default()
        };
        assert!(matches!(
            Win32Platform::startup(conn, &WindowConfig::default()),
            Err(PlatformError::WindowCreation(_))
        ));
    }

    #[test]
    fn modifiers_are_disambiguated() {
        let (input, _, _) = pump(&[
            key(WM_KEYDOWN, VK_SHIFT, LSHIFT_SCAN, false),
            key(WM_KEYDOWN, VK_SHIFT, RSHIFT_SCAN, false),
            key(WM_KEYDOWN, VK_CONTROL, 0x1d, true),
            key(WM_SYSKEYDOWN, VK_MENU, 0x38, false),
            key(WM_SYSKEYDOWN, VK_MENU, 0x38, true),
        ]);

        assert!(input.is_key_down(KeyCode::LShift));
        assert!(input.is_key_down(KeyCode::RShift));
        assert!(input.is_key_down(KeyCode::RControl));
        assert!(!input.is_key_down(KeyCode::LControl));
        assert!(input.is_key_down(KeyCode::LAlt));
        assert!(input.is_key_down(KeyCode::RAlt));
        assert!(!input.is_key_down(KeyCode::Shift));
        assert!(!input.is_key_down(KeyCode::Control));
        assert!(input.keys_down().all(KeyCode::is_sided_modifier));
    }

    #[test]
    fn key_release_clears_state() {
        let (input, bus, _) = pump(&[
            key(WM_KEYDOWN, 0x41, 0x1e, false),
            key(WM_KEYDOWN, 0x41, 0x1e, false),
            key(WM_KEYUP, 0x41, 0x1e, false),
        ]);
        assert!(input.is_key_up(KeyCode::A));
        // la autorepetición no duplica eventos
        let codes: Vec<_> = bus.iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![EventCode::KeyPressed, EventCode::KeyReleased]);
    }

    #[test]
    fn mouse_move_uses_signed_coordinates() {
        let (input, _, _) = pump(&[Win32Message::new(
            WM_MOUSEMOVE,
            0,
            make_lparam((-12i16) as u16, 300),
        )]);
        assert_eq!(input.get_mouse_position(), (-12, 300));
    }

    #[test]
    fn wheel_is_flattened() {
        let (_, bus, _) = pump(&[
            Win32Message::new(WM_MOUSEWHEEL, (240usize) << 16, 0),
            Win32Message::new(WM_MOUSEWHEEL, ((-120i16) as u16 as usize) << 16, 0),
            Win32Message::new(WM_MOUSEWHEEL, 0, 0),
        ]);
        let deltas: Vec<_> = bus
            .iter()
            .filter_map(|e| match e.payload {
                EventPayload::MouseWheel { delta } => Some(delta),
                _ => None,
            })
            .collect();
        assert_eq!(deltas, vec![1, -1]);
    }

    #[test]
    fn buttons_are_independent() {
        let (input, bus, _) = pump(&[
            Win32Message::new(WM_LBUTTONDOWN, 0, 0),
            Win32Message::new(WM_MBUTTONDOWN, 0, 0),
            Win32Message::new(WM_MBUTTONUP, 0, 0),
        ]);
        assert!(input.is_button_down(MouseButton::Left));
        assert!(input.is_button_up(MouseButton::Middle));
        assert!(input.is_button_up(MouseButton::Right));
        let released: Vec<_> = bus
            .iter()
            .filter(|e| e.code == EventCode::ButtonReleased)
            .map(|e| e.payload)
            .collect();
        assert_eq!(released, vec![EventPayload::Button(MouseButton::Middle)]);
    }

    #[test]
    fn size_emits_resized() {
        let (_, bus, running) = pump(&[Win32Message::new(WM_SIZE, 0, make_lparam(800, 600))]);
        assert!(running);
        assert_eq!(
            bus,
            vec![BusEvent {
                code: EventCode::Resized,
                sender: EventSender::Platform,
                payload: EventPayload::Resized {
                    width: 800,
                    height: 600
                },
            }]
        );
    }

    #[test]
    fn close_drains_remaining_messages() {
        let (input, bus, running) = pump(&[
            Win32Message::new(WM_CLOSE, 0, 0),
            key(WM_KEYDOWN, 0x57, 0x11, false),
            key(WM_KEYDOWN, 0x41, 0x1e, false),
            key(WM_KEYDOWN, 0x53, 0x1f, false),
        ]);
        assert!(!running);
        assert!(input.is_key_down(KeyCode::W));
        assert!(input.is_key_down(KeyCode::A));
        assert!(input.is_key_down(KeyCode::S));
        assert_eq!(
            bus.iter().filter(|e| e.code == EventCode::ApplicationQuit).count(),
            1
        );
    }

    #[test]
    fn close_from_window_procedure() {
        let mut platform =
            Win32Platform::startup(FakeWindow::default(), &WindowConfig::default()).unwrap();
        let mut input = InputState::new();
        let mut bus: Vec<BusEvent> = Vec::new();

        assert!(platform.process_event(Win32Message::new(WM_CLOSE, 0, 0), &mut input, &mut bus));
        assert!(!platform.is_running());
        assert!(bus.is_empty());

        // la siguiente bomba publica el cierre una sola vez
        assert!(!platform.pump_messages(&mut input, &mut bus));
        assert_eq!(bus.len(), 1);
        assert_eq!(bus[0].code, EventCode::ApplicationQuit);
        assert!(platform.pump_messages(&mut input, &mut bus));
        assert_eq!(bus.len(), 1);
        assert!(!platform.is_running());
    }

    #[test]
    fn shutdown_destroys_once() {
        let mut platform =
            Win32Platform::startup(FakeWindow::default(), &WindowConfig::default()).unwrap();
        platform.shutdown();
        platform.shutdown();
        assert_eq!(platform.connection().destroyed, 1);
        assert_eq!(platform.backend_name(), "win32");
    }
}
