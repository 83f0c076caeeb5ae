//=========================================================================
// Key Codes
//=========================================================================
//
// Keyboard scan codes and the process-wide key name table.
//
// Codes follow the classic PC set-1 scan code layout, so every physical
// key fits in a single byte and maps directly onto a key trigger.
//
// The name table is built once on first use and is read-only afterwards.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

//=== KeyCode =============================================================

/// Physical keyboard key, identified by its scan code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct KeyCode(pub u8);

impl KeyCode {
    pub const UNKNOWN: KeyCode = KeyCode(0x00);
    pub const ESCAPE: KeyCode = KeyCode(0x01);

    //--- Digits -----------------------------------------------------------
    pub const KEY_1: KeyCode = KeyCode(0x02);
    pub const KEY_2: KeyCode = KeyCode(0x03);
    pub const KEY_3: KeyCode = KeyCode(0x04);
    pub const KEY_4: KeyCode = KeyCode(0x05);
    pub const KEY_5: KeyCode = KeyCode(0x06);
    pub const KEY_6: KeyCode = KeyCode(0x07);
    pub const KEY_7: KeyCode = KeyCode(0x08);
    pub const KEY_8: KeyCode = KeyCode(0x09);
    pub const KEY_9: KeyCode = KeyCode(0x0A);
    pub const KEY_0: KeyCode = KeyCode(0x0B);
    pub const MINUS: KeyCode = KeyCode(0x0C);
    pub const EQUALS: KeyCode = KeyCode(0x0D);
    pub const BACKSPACE: KeyCode = KeyCode(0x0E);
    pub const TAB: KeyCode = KeyCode(0x0F);

    //--- Letters ----------------------------------------------------------
    pub const Q: KeyCode = KeyCode(0x10);
    pub const W: KeyCode = KeyCode(0x11);
    pub const E: KeyCode = KeyCode(0x12);
    pub const R: KeyCode = KeyCode(0x13);
    pub const T: KeyCode = KeyCode(0x14);
    pub const Y: KeyCode = KeyCode(0x15);
    pub const U: KeyCode = KeyCode(0x16);
    pub const I: KeyCode = KeyCode(0x17);
    pub const O: KeyCode = KeyCode(0x18);
    pub const P: KeyCode = KeyCode(0x19);
    pub const LEFT_BRACKET: KeyCode = KeyCode(0x1A);
    pub const RIGHT_BRACKET: KeyCode = KeyCode(0x1B);
    pub const RETURN: KeyCode = KeyCode(0x1C);
    pub const LEFT_CONTROL: KeyCode = KeyCode(0x1D);
    pub const A: KeyCode = KeyCode(0x1E);
    pub const S: KeyCode = KeyCode(0x1F);
    pub const D: KeyCode = KeyCode(0x20);
    pub const F: KeyCode = KeyCode(0x21);
    pub const G: KeyCode = KeyCode(0x22);
    pub const H: KeyCode = KeyCode(0x23);
    pub const J: KeyCode = KeyCode(0x24);
    pub const K: KeyCode = KeyCode(0x25);
    pub const L: KeyCode = KeyCode(0x26);
    pub const SEMICOLON: KeyCode = KeyCode(0x27);
    pub const APOSTROPHE: KeyCode = KeyCode(0x28);
    pub const GRAVE: KeyCode = KeyCode(0x29);
    pub const LEFT_SHIFT: KeyCode = KeyCode(0x2A);
    pub const BACKSLASH: KeyCode = KeyCode(0x2B);
    pub const Z: KeyCode = KeyCode(0x2C);
    pub const X: KeyCode = KeyCode(0x2D);
    pub const C: KeyCode = KeyCode(0x2E);
    pub const V: KeyCode = KeyCode(0x2F);
    pub const B: KeyCode = KeyCode(0x30);
    pub const N: KeyCode = KeyCode(0x31);
    pub const M: KeyCode = KeyCode(0x32);
    pub const COMMA: KeyCode = KeyCode(0x33);
    pub const PERIOD: KeyCode = KeyCode(0x34);
    pub const SLASH: KeyCode = KeyCode(0x35);
    pub const RIGHT_SHIFT: KeyCode = KeyCode(0x36);
    pub const MULTIPLY: KeyCode = KeyCode(0x37);
    pub const LEFT_ALT: KeyCode = KeyCode(0x38);
    pub const SPACE: KeyCode = KeyCode(0x39);
    pub const CAPS_LOCK: KeyCode = KeyCode(0x3A);

    //--- Function Keys ----------------------------------------------------
    pub const F1: KeyCode = KeyCode(0x3B);
    pub const F2: KeyCode = KeyCode(0x3C);
    pub const F3: KeyCode = KeyCode(0x3D);
    pub const F4: KeyCode = KeyCode(0x3E);
    pub const F5: KeyCode = KeyCode(0x3F);
    pub const F6: KeyCode = KeyCode(0x40);
    pub const F7: KeyCode = KeyCode(0x41);
    pub const F8: KeyCode = KeyCode(0x42);
    pub const F9: KeyCode = KeyCode(0x43);
    pub const F10: KeyCode = KeyCode(0x44);
    pub const F11: KeyCode = KeyCode(0x57);
    pub const F12: KeyCode = KeyCode(0x58);

    //--- Numpad -----------------------------------------------------------
    pub const NUM_LOCK: KeyCode = KeyCode(0x45);
    pub const SCROLL_LOCK: KeyCode = KeyCode(0x46);
    pub const NUMPAD_7: KeyCode = KeyCode(0x47);
    pub const NUMPAD_8: KeyCode = KeyCode(0x48);
    pub const NUMPAD_9: KeyCode = KeyCode(0x49);
    pub const NUMPAD_SUBTRACT: KeyCode = KeyCode(0x4A);
    pub const NUMPAD_4: KeyCode = KeyCode(0x4B);
    pub const NUMPAD_5: KeyCode = KeyCode(0x4C);
    pub const NUMPAD_6: KeyCode = KeyCode(0x4D);
    pub const NUMPAD_ADD: KeyCode = KeyCode(0x4E);
    pub const NUMPAD_1: KeyCode = KeyCode(0x4F);
    pub const NUMPAD_2: KeyCode = KeyCode(0x50);
    pub const NUMPAD_3: KeyCode = KeyCode(0x51);
    pub const NUMPAD_0: KeyCode = KeyCode(0x52);
    pub const NUMPAD_DECIMAL: KeyCode = KeyCode(0x53);
    pub const NUMPAD_ENTER: KeyCode = KeyCode(0x9C);
    pub const NUMPAD_DIVIDE: KeyCode = KeyCode(0xB5);

    //--- Navigation & Modifiers (extended) ---------------------------------
    pub const RIGHT_CONTROL: KeyCode = KeyCode(0x9D);
    pub const RIGHT_ALT: KeyCode = KeyCode(0xB8);
    pub const PAUSE: KeyCode = KeyCode(0xC5);
    pub const HOME: KeyCode = KeyCode(0xC7);
    pub const UP: KeyCode = KeyCode(0xC8);
    pub const PAGE_UP: KeyCode = KeyCode(0xC9);
    pub const LEFT: KeyCode = KeyCode(0xCB);
    pub const RIGHT: KeyCode = KeyCode(0xCD);
    pub const END: KeyCode = KeyCode(0xCF);
    pub const DOWN: KeyCode = KeyCode(0xD0);
    pub const PAGE_DOWN: KeyCode = KeyCode(0xD1);
    pub const INSERT: KeyCode = KeyCode(0xD2);
    pub const DELETE: KeyCode = KeyCode(0xD3);
    pub const LEFT_META: KeyCode = KeyCode(0xDB);
    pub const RIGHT_META: KeyCode = KeyCode(0xDC);
    pub const APPS: KeyCode = KeyCode(0xDD);

    /// Raw scan code.
    pub const fn code(self) -> u8 {
        self.0
    }

    /// Human-readable key name, or `None` for codes without a known key.
    pub fn name(self) -> Option<&'static str> {
        key_names().get(&self.0).copied()
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "key 0x{:02X}", self.0),
        }
    }
}

//=== Name Table ==========================================================

const KEY_NAME_ENTRIES: &[(KeyCode, &str)] = &[
    (KeyCode::UNKNOWN, "Unknown"),
    (KeyCode::ESCAPE, "Escape"),
    (KeyCode::KEY_1, "1"),
    (KeyCode::KEY_2, "2"),
    (KeyCode::KEY_3, "3"),
    (KeyCode::KEY_4, "4"),
    (KeyCode::KEY_5, "5"),
    (KeyCode::KEY_6, "6"),
    (KeyCode::KEY_7, "7"),
    (KeyCode::KEY_8, "8"),
    (KeyCode::KEY_9, "9"),
    (KeyCode::KEY_0, "0"),
    (KeyCode::MINUS, "Minus"),
    (KeyCode::EQUALS, "Equals"),
    (KeyCode::BACKSPACE, "Backspace"),
    (KeyCode::TAB, "Tab"),
    (KeyCode::Q, "Q"),
    (KeyCode::W, "W"),
    (KeyCode::E, "E"),
    (KeyCode::R, "R"),
    (KeyCode::T, "T"),
    (KeyCode::Y, "Y"),
    (KeyCode::U, "U"),
    (KeyCode::I, "I"),
    (KeyCode::O, "O"),
    (KeyCode::P, "P"),
    (KeyCode::LEFT_BRACKET, "Left Bracket"),
    (KeyCode::RIGHT_BRACKET, "Right Bracket"),
    (KeyCode::RETURN, "Return"),
    (KeyCode::LEFT_CONTROL, "Left Control"),
    (KeyCode::A, "A"),
    (KeyCode::S, "S"),
    (KeyCode::D, "D"),
    (KeyCode::F, "F"),
    (KeyCode::G, "G"),
    (KeyCode::H, "H"),
    (KeyCode::J, "J"),
    (KeyCode::K, "K"),
    (KeyCode::L, "L"),
    (KeyCode::SEMICOLON, "Semicolon"),
    (KeyCode::APOSTROPHE, "Apostrophe"),
    (KeyCode::GRAVE, "Grave"),
    (KeyCode::LEFT_SHIFT, "Left Shift"),
    (KeyCode::BACKSLASH, "Backslash"),
    (KeyCode::Z, "Z"),
    (KeyCode::X, "X"),
    (KeyCode::C, "C"),
    (KeyCode::V, "V"),
    (KeyCode::B, "B"),
    (KeyCode::N, "N"),
    (KeyCode::M, "M"),
    (KeyCode::COMMA, "Comma"),
    (KeyCode::PERIOD, "Period"),
    (KeyCode::SLASH, "Slash"),
    (KeyCode::RIGHT_SHIFT, "Right Shift"),
    (KeyCode::MULTIPLY, "Multiply"),
    (KeyCode::LEFT_ALT, "Left Alt"),
    (KeyCode::SPACE, "Space"),
    (KeyCode::CAPS_LOCK, "Caps Lock"),
    (KeyCode::F1, "F1"),
    (KeyCode::F2, "F2"),
    (KeyCode::F3, "F3"),
    (KeyCode::F4, "F4"),
    (KeyCode::F5, "F5"),
    (KeyCode::F6, "F6"),
    (KeyCode::F7, "F7"),
    (KeyCode::F8, "F8"),
    (KeyCode::F9, "F9"),
    (KeyCode::F10, "F10"),
    (KeyCode::F11, "F11"),
    (KeyCode::F12, "F12"),
    (KeyCode::NUM_LOCK, "Num Lock"),
    (KeyCode::SCROLL_LOCK, "Scroll Lock"),
    (KeyCode::NUMPAD_7, "Numpad 7"),
    (KeyCode::NUMPAD_8, "Numpad 8"),
    (KeyCode::NUMPAD_9, "Numpad 9"),
    (KeyCode::NUMPAD_SUBTRACT, "Numpad Subtract"),
    (KeyCode::NUMPAD_4, "Numpad 4"),
    (KeyCode::NUMPAD_5, "Numpad 5"),
    (KeyCode::NUMPAD_6, "Numpad 6"),
    (KeyCode::NUMPAD_ADD, "Numpad Add"),
    (KeyCode::NUMPAD_1, "Numpad 1"),
    (KeyCode::NUMPAD_2, "Numpad 2"),
    (KeyCode::NUMPAD_3, "Numpad 3"),
    (KeyCode::NUMPAD_0, "Numpad 0"),
    (KeyCode::NUMPAD_DECIMAL, "Numpad Decimal"),
    (KeyCode::NUMPAD_ENTER, "Numpad Enter"),
    (KeyCode::NUMPAD_DIVIDE, "Numpad Divide"),
    (KeyCode::RIGHT_CONTROL, "Right Control"),
    (KeyCode::RIGHT_ALT, "Right Alt"),
    (KeyCode::PAUSE, "Pause"),
    (KeyCode::HOME, "Home"),
    (KeyCode::UP, "Up"),
    (KeyCode::PAGE_UP, "Page Up"),
    (KeyCode::LEFT, "Left"),
    (KeyCode::RIGHT, "Right"),
    (KeyCode::END, "End"),
    (KeyCode::DOWN, "Down"),
    (KeyCode::PAGE_DOWN, "Page Down"),
    (KeyCode::INSERT, "Insert"),
    (KeyCode::DELETE, "Delete"),
    (KeyCode::LEFT_META, "Left Meta"),
    (KeyCode::RIGHT_META, "Right Meta"),
    (KeyCode::APPS, "Apps"),
];

fn key_names() -> &'static HashMap<u8, &'static str> {
    static NAMES: OnceLock<HashMap<u8, &'static str>> = OnceLock::new();
    NAMES.get_or_init(|| {
        KEY_NAME_ENTRIES
            .iter()
            .map(|(key, name)| (key.0, *name))
            .collect()
    })
}

//=========================================================================
// Unit Tests
//=========================================================================
