//=========================================================================
// Platform Subsystem
//
// Concrete device drivers for the input system.
//
// Architecture:
// ```text
//  Platform Thread:                 Logic Thread:
//  ┌──────────────────────────┐    ┌──────────────────────────┐
//  │  Winit Event Loop        │    │  InputManager::update()  │
//  │   ↓                      │    │   ↓                      │
//  │  WinitInputFeed          │    │  Handoff*Input::update() │
//  │   └─ scan codes, deltas  │    │   └─ bounded drain       │
//  │   ↓                      │    │   ↓                      │
//  │  KeyFeed / MouseFeed ────┼────┼→ EventSink               │
//  └──────────────────────────┘    └──────────────────────────┘
// ```
//
// Modules:
// - `handoff`: channel-backed drivers for every device kind
// - `winit_input`: Winit window events → keyboard and mouse feeds
// - `virtual_input`: scriptable devices on a manual clock
//
//=========================================================================

//=== Submodules ==========================================================

pub mod handoff;
pub mod virtual_input;
pub mod winit_input;

//=== Public Exports ======================================================

pub use handoff::{
    HandoffJoyInput, HandoffKeyInput, HandoffMouseInput, HandoffTouchInput, JoyFeed, KeyFeed,
    MouseFeed, TouchFeed,
};
pub use virtual_input::VirtualInput;
pub use winit_input::{winit_input, WinitInputFeed};
