//! Frame driver: pega la bomba de eventos y el almacén de input.
//!
//! Orden fijo por frame:
//!
//! ```text
//! pump_messages()  →  lógica (consultas)  →  advance_frame()
//! ```
//!
//! Así la lógica ve los flancos del frame (`is_down && !was_down`) y el frame
//! siguiente compara contra la instantánea tomada al cerrar este.

use log::debug;

use crate::event::EventBus;
use crate::state::InputState;
use crate::traits::PlatformExt;

#[derive(Debug, Default, Clone, Copy)]
pub struct FrameDriver {
    frame: u64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames completados.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Ejecuta un frame. Devuelve lo mismo que `pump_messages`.
    ///
    /// `logic` se ejecuta incluso en el frame que pide cerrar, para que la
    /// lógica vea los eventos drenados junto con el cierre.
    pub fn tick<P, B, F>(
        &mut self,
        platform: &mut P,
        input: &mut InputState,
        bus: &mut B,
        logic: F,
    ) -> bool
    where
        P: PlatformExt,
        B: EventBus,
        F: FnOnce(&InputState, u64),
    {
        let running = platform.pump_messages(input, bus);
        logic(input, self.frame);
        input.advance_frame();
        self.frame += 1;
        running
    }

    /// Repite [`tick`](Self::tick) hasta que la plataforma pida cerrar.
    pub fn run<P, B, F>(&mut self, platform: &mut P, input: &mut InputState, bus: &mut B, mut logic: F)
    where
        P: PlatformExt,
        B: EventBus,
        F: FnMut(&InputState, u64),
    {
        debug!("frame: loop on {}", platform.backend_name());
        while self.tick(platform, input, bus, &mut logic) {}
        debug!("frame: quit after {} frames", self.frame);
    }
}
