//! Contrato de una bomba de eventos de plataforma.
//!
//! Una bomba es dueña exclusiva de la conexión nativa (servidor X, ventana Win32).
//! Una vez por frame vacía **toda** la cola nativa sin bloquear y reparte cada
//! evento entre el almacén de input y el bus de eventos externo.
//!
//! Todos los fallos posibles se detectan al arrancar (constructor del backend).
//! [`PlatformExt::pump_messages`] no tiene camino de error.

use crate::event::EventBus;
use crate::state::InputState;

/// El trait [`PlatformExt`] define la interfaz común a los backends de plataforma.
///
/// # Ciclo de vida
/// 1. **Arranque**: el backend se construye con su conexión nativa; si falla algo
///    obligatorio devuelve [`PlatformError`](crate::PlatformError) y no hay reintento.
/// 2. **Bombeo**: el frame driver llama a `pump_messages()` una vez por frame, deja
///    correr la lógica y cierra con [`InputState::advance_frame`]
///    (ver [`FrameDriver`](crate::FrameDriver)).
/// 3. **Apagado**: `shutdown()` destruye la ventana; la conexión se libera al soltar
///    el backend.
///
/// # Concurrencia
/// Todo ocurre en el hilo del frame. Un host multihilo debe serializar las llamadas.
///
/// # Ejemplo
/// ```rust,ignore
/// let mut platform = X11Platform::startup(connection, &WindowConfig::default())?;
/// let mut input = InputState::new();
/// let mut bus = NullBus;
///
/// loop {
///     let running = platform.pump_messages(&mut input, &mut bus);
///     // lógica de juego: aquí `is_down && !was_down` es un flanco del frame
///     input.advance_frame();
///     if !running {
///         break;
///     }
/// }
/// platform.shutdown();
/// ```
pub trait PlatformExt {
    /// Registro nativo que devuelve la cola del sistema.
    type NativeEvent;

    /// Nombre del backend (por ejemplo, `"x11"` o `"win32"`).
    fn backend_name(&self) -> &'static str;

    /// Vacía la cola nativa sin bloquear.
    ///
    /// Devuelve `false` solo si durante esta llamada se observó una petición de cierre;
    /// aun así, el resto de eventos encolados se procesa antes de volver.
    fn pump_messages<B: EventBus>(&mut self, input: &mut InputState, bus: &mut B) -> bool;

    /// Clasifica y despacha un único registro nativo.
    ///
    /// Devuelve `true` si el registro era una petición de cierre. En ese caso
    /// `is_running` pasa a `false` de inmediato y la siguiente `pump_messages`
    /// emite `ApplicationQuit` y devuelve `false`.
    fn process_event<B: EventBus>(
        &mut self,
        event: Self::NativeEvent,
        input: &mut InputState,
        bus: &mut B,
    ) -> bool;

    /// `false` desde que se observó la primera petición de cierre.
    fn is_running(&self) -> bool;

    /// Registros nativos procesados desde el arranque.
    fn events_processed(&self) -> usize;

    /// Destruye la ventana. Idempotente.
    fn shutdown(&mut self);
}
