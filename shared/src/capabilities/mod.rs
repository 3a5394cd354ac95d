mod location;
mod timer;

pub use self::location::{
    CoordinateError, Coordinates, Location, LocationError, LocationFix, LocationOperation,
    LocationResult,
};
pub use self::timer::{Timer, TimerId, TimerOperation, TimerOutput, TimerScope};

// Crux's built-in Render covers view updates; no custom capability needed.
pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub location: Location<Event>,
    pub timer: Timer<Event>,
}
