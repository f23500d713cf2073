//! # Crate `orbit_input_platform`
//!
//! **Máquina de estados de input** y **bombas de eventos de plataforma** para **Orbit Engine**.
//!
//! Cada backend de ventanas tiene sus propios tipos de evento, su propio espacio de
//! códigos de tecla y su propia API de cola de mensajes. Este crate convierte todo eso
//! en un único flujo independiente del backend (teclas, botones, movimiento, rueda,
//! redimensionado, cierre) y en un registro de input con doble buffer (frame actual /
//! frame anterior) que el resto del motor consulta de forma síncrona.
//!
//! ---
//!
//! ## Arquitectura
//!
//! ```text
//! SO nativo ──► Bomba de eventos (X11 | Win32)
//!                    │
//!          ┌─────────┴──────────┐
//!          │                    │
//!   Traductor de teclas    Bus de eventos externo
//!          │               (Resized, ApplicationQuit, ...)
//!          ▼
//!     InputState  ◄── consultas de la lógica
//!          │
//!   FrameDriver: advance_frame() cierra el frame
//! ```
//!
//! - **Traductor de teclas** ([`KeyExt`]): función pura código nativo → [`KeyCode`],
//!   una tabla fija por backend.
//! - **Almacén de estado** ([`InputState`]): teclado y botones actuales/anteriores,
//!   posición del puntero actual/anterior.
//! - **Bomba de eventos** ([`PlatformExt`]): dueña de la conexión nativa; vacía la cola
//!   sin bloquear una vez por frame.
//! - **Frame driver** ([`FrameDriver`]): bombea, deja correr la lógica y avanza el frame,
//!   siempre en ese orden.
//!
//! ---
//!
//! ## Ejemplo: bucle principal
//!
//! ```rust,ignore
//! use orbit_input_platform::{
//!     FrameDriver, InputState, KeyCode, NullBus, PlatformExt, WindowConfig, X11Platform,
//! };
//!
//! // `MyXcb` implementa `XcbConnection` sobre la librería X que use el host
//! let mut platform = X11Platform::startup(MyXcb::connect()?, &WindowConfig::new("Demo"))?;
//! let mut input = InputState::new();
//! let mut bus = NullBus;
//!
//! FrameDriver::new().run(&mut platform, &mut input, &mut bus, |input, _frame| {
//!     if input.is_key_down(KeyCode::Space) && input.was_key_up(KeyCode::Space) {
//!         // saltar
//!     }
//! });
//! platform.shutdown();
//! ```
//!
//! ---
//!
//! ## Inicialización en dos fases
//!
//! El host controla toda la memoria. Primero pregunta cuántos bytes necesita cada
//! sistema y después lo construye en su bloque:
//!
//! ```rust,ignore
//! use std::mem::MaybeUninit;
//!
//! let bytes = InputState::memory_requirement();
//! let mut slot = MaybeUninit::<InputState>::uninit(); // o un bloque del allocator del host
//! let input: &mut InputState = InputState::initialize(&mut slot);
//! ```
//!
//! ---
//!
//! ## Errores
//!
//! - 💥 **Fatales** (solo al arrancar): sin conexión con el servidor, sin XKB, fallo al
//!   crear la ventana. Se devuelven como [`PlatformError`]; no hay reintento.
//! - ⚠️ **Degradados**: no se pudo activar la autorepetición detectable de XKB. Se
//!   registra con `log::warn!` y se sigue (las teclas pueden autorepetirse).
//! - 🤫 **Ignorados**: códigos de tecla desconocidos, eventos nativos no reconocidos,
//!   índices fuera de rango. Se descartan sin avisar.
//!
//! Una vez arrancado, nada en el camino por frame puede fallar.
//!
//! ---
//!
//! ## Features
//!
//! - `x11` (por defecto) / `win32`: backend activo ([`ActivePlatform`], [`ActiveKeys`]).
//! - `std_lock` (por defecto) / `parking_lot`: mutex de [`SharedInput`].
//!
//! ---
//!
//! ## Concurrencia
//!
//! Un solo hilo: la bomba y el almacén se usan desde el hilo del frame, sin locks
//! internos. Si el host es multihilo debe serializar las llamadas (por ejemplo con
//! [`SharedInput`]).
//!
//! ---
//!
//! ## Módulos
//!
//! - [`traits`]: contratos `KeyExt`, `InputStateExt` y `PlatformExt`
//! - [`keys`]: enumeraciones canónicas [`KeyCode`] y [`MouseButton`]
//! - [`state`]: almacén de input con doble buffer
//! - [`event`]: bus de eventos externo y sus payloads
//! - [`platform`]: backends X11 y Win32
//! - [`frame`]: orden fijo bombeo → lógica → cierre de frame
//! - [`sync`]: acceso compartido entre hilos
//! - [`config`]: parámetros de la ventana
//! - [`error`]: errores de arranque

pub mod config;
pub mod error;
pub mod event;
pub mod frame;
pub mod keys;
pub mod platform;
pub mod state;
pub mod sync;
pub mod traits;

pub use traits::{InputStateExt, KeyExt, PlatformExt};

pub use config::WindowConfig;
pub use error::{PlatformError, Result};
pub use event::{BusEvent, EventBus, EventCode, EventPayload, EventSender, NullBus};
pub use frame::FrameDriver;
pub use keys::{BUTTON_COUNT, KEY_COUNT, KeyCode, MouseButton};
pub use platform::win32::{Win32Connection, Win32Keys, Win32Message, Win32Platform};
pub use platform::x11::{X11Keys, X11Platform, XcbConnection, XcbEvent, XkbSupport};
#[cfg(any(feature = "x11", feature = "win32"))]
pub use platform::{ActiveKeys, ActivePlatform};
pub use state::{InputState, KeyboardState, MouseState};
pub use sync::SharedInput;
