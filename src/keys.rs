//! Teclas y botones canónicos del motor.
//!
//! [`KeyCode`] es la enumeración estable e independiente del backend: `KeyCode::A`
//! significa la misma tecla lógica en X11 y en Win32. Los valores numéricos son
//! contiguos (`0x00..0x7c`) y sirven directamente como índice en los arreglos de
//! estado de [`crate::state`].
//!
//! [`KeyCode::Unknown`] es el centinela que devuelven los traductores cuando un
//! código nativo no tiene equivalente. Queda fuera del rango indexable, por lo
//! que el almacén de estado lo ignora sin más.

/// Número de teclas canónicas (sin contar [`KeyCode::Unknown`]).
pub const KEY_COUNT: usize = 0x7c;

/// Número de botones de ratón modelados.
pub const BUTTON_COUNT: usize = 3;

macro_rules! key_codes {
    ($( $(#[$meta:meta])* $name:ident = $value:literal ),+ $(,)?) => {
        /// Tecla canónica del teclado.
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum KeyCode {
            $( $(#[$meta])* $name = $value, )+
            /// Código nativo sin equivalente canónico.
            Unknown = KEY_COUNT as u8,
        }

        impl KeyCode {
            /// Todas las teclas canónicas, ordenadas por su valor numérico.
            pub const ALL: [KeyCode; KEY_COUNT] = [ $( KeyCode::$name, )+ ];
        }
    };
}

key_codes! {
    Backspace = 0x00,
    Enter = 0x01,
    Tab = 0x02,
    /// Shift genérico (sin lado). Los backends lo resuelven a izquierda/derecha.
    Shift = 0x03,
    /// Control genérico (sin lado).
    Control = 0x04,
    Pause = 0x05,
    /// Bloq Mayús.
    Capital = 0x06,
    Escape = 0x07,
    Convert = 0x08,
    NonConvert = 0x09,
    Accept = 0x0a,
    ModeChange = 0x0b,
    Space = 0x0c,
    /// Re Pág.
    Prior = 0x0d,
    /// Av Pág.
    Next = 0x0e,
    End = 0x0f,
    Home = 0x10,
    Left = 0x11,
    Up = 0x12,
    Right = 0x13,
    Down = 0x14,
    Select = 0x15,
    Print = 0x16,
    Execute = 0x17,
    Snapshot = 0x18,
    Insert = 0x19,
    Delete = 0x1a,
    Help = 0x1b,

    Num0 = 0x1c,
    Num1 = 0x1d,
    Num2 = 0x1e,
    Num3 = 0x1f,
    Num4 = 0x20,
    Num5 = 0x21,
    Num6 = 0x22,
    Num7 = 0x23,
    Num8 = 0x24,
    Num9 = 0x25,

    A = 0x26,
    B = 0x27,
    C = 0x28,
    D = 0x29,
    E = 0x2a,
    F = 0x2b,
    G = 0x2c,
    H = 0x2d,
    I = 0x2e,
    J = 0x2f,
    K = 0x30,
    L = 0x31,
    M = 0x32,
    N = 0x33,
    O = 0x34,
    P = 0x35,
    Q = 0x36,
    R = 0x37,
    S = 0x38,
    T = 0x39,
    U = 0x3a,
    V = 0x3b,
    W = 0x3c,
    X = 0x3d,
    Y = 0x3e,
    Z = 0x3f,

    /// Tecla Windows/Super izquierda.
    LWin = 0x40,
    /// Tecla Windows/Super derecha.
    RWin = 0x41,
    /// Tecla de menú contextual.
    Apps = 0x42,
    Sleep = 0x43,

    Numpad0 = 0x44,
    Numpad1 = 0x45,
    Numpad2 = 0x46,
    Numpad3 = 0x47,
    Numpad4 = 0x48,
    Numpad5 = 0x49,
    Numpad6 = 0x4a,
    Numpad7 = 0x4b,
    Numpad8 = 0x4c,
    Numpad9 = 0x4d,
    Multiply = 0x4e,
    Add = 0x4f,
    Separator = 0x50,
    Subtract = 0x51,
    Decimal = 0x52,
    Divide = 0x53,

    F1 = 0x54,
    F2 = 0x55,
    F3 = 0x56,
    F4 = 0x57,
    F5 = 0x58,
    F6 = 0x59,
    F7 = 0x5a,
    F8 = 0x5b,
    F9 = 0x5c,
    F10 = 0x5d,
    F11 = 0x5e,
    F12 = 0x5f,
    F13 = 0x60,
    F14 = 0x61,
    F15 = 0x62,
    F16 = 0x63,
    F17 = 0x64,
    F18 = 0x65,
    F19 = 0x66,
    F20 = 0x67,
    F21 = 0x68,
    F22 = 0x69,
    F23 = 0x6a,
    F24 = 0x6b,

    NumLock = 0x6c,
    /// Bloq Despl.
    Scroll = 0x6d,
    NumpadEqual = 0x6e,

    LShift = 0x6f,
    RShift = 0x70,
    LControl = 0x71,
    RControl = 0x72,
    LAlt = 0x73,
    RAlt = 0x74,

    Semicolon = 0x75,
    Plus = 0x76,
    Comma = 0x77,
    Minus = 0x78,
    Period = 0x79,
    Slash = 0x7a,
    Grave = 0x7b,
}

impl KeyCode {
    /// Devuelve la tecla cuyo valor numérico es `index`, o `None` fuera de rango.
    #[inline]
    pub fn from_index(index: usize) -> Option<KeyCode> {
        Self::ALL.get(index).copied()
    }

    /// Índice en los arreglos de estado. `None` para [`KeyCode::Unknown`].
    #[inline]
    pub fn index(self) -> Option<usize> {
        let index = self as usize;
        (index < KEY_COUNT).then_some(index)
    }

    /// `true` para las variantes Shift/Control/Alt con lado explícito.
    pub fn is_sided_modifier(self) -> bool {
        matches!(
            self,
            KeyCode::LShift
                | KeyCode::RShift
                | KeyCode::LControl
                | KeyCode::RControl
                | KeyCode::LAlt
                | KeyCode::RAlt
        )
    }
}

/// Botón del ratón.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MouseButton {
    Left = 0,
    Right = 1,
    /// Normalmente la propia rueda.
    Middle = 2,
}

impl MouseButton {
    pub const ALL: [MouseButton; BUTTON_COUNT] =
        [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

    #[inline]
    pub fn from_index(index: usize) -> Option<MouseButton> {
        Self::ALL.get(index).copied()
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}
