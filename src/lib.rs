//=========================================================================
// Aetheric Input — Library Root
//
// Frame-driven input dispatch for the Aetheric Engine.
//
// Responsibilities:
// - Expose the dispatcher (`InputManager`) and its builder
// - Provide drivers for Winit windows and for scripted/headless input
// - Keep the driver contract open so other backends can plug in
//
// Typical usage:
// ```no_run
// use aetheric_input::prelude::*;
//
// # fn main() -> aetheric_input::core::input::Result<()> {
// let (keyboard, mouse, _feed) = winit_input();
// let mut input = InputManagerBuilder::new(keyboard, mouse).build()?;
// input.add_mapping("Jump", &[Trigger::Key(KeyCode::SPACE)])?;
// input.update(0.016)?;
// # Ok(())
// # }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the dispatcher, mapping table and driver contract.
// `platform` holds concrete drivers (Winit, channel handoff, virtual).
//
pub mod core;
pub mod platform;
pub mod prelude;
