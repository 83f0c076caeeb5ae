//=========================================================================
// Core Systems
//
// Platform-independent engine systems. Only input lives here: device
// drivers plug in from `platform`, everything else is pure logic.
//
//=========================================================================

pub mod input;
