//! # Tower Telemetry Simulation
//!
//! Produces physically plausible, mutually correlated tower readings.
//!
//! ## Components
//!
//! - **Draws**: injectable randomness (seeded `StdRng` or a scripted queue for tests)
//! - **Baseline**: slowly drifting environment state shared by every sample
//! - **Cyclical**: hour-of-day and day-of-week modifiers
//! - **Profile**: live vs historical noise widths, gains and clamp ranges
//! - **Generator**: derives one 25-metric sample from baseline + calendar + noise
//! - **Series**: owns the shared state and builds live samples and back-filled series
//!
//! ## Usage
//!
//! ```rust
//! use tower_telemetry_simulator::domain::TimeRange;
//! use tower_telemetry_simulator::simulation::TelemetrySimulator;
//!
//! let sim = TelemetrySimulator::with_seed(Some(42));
//! let live = sim.live_sample();
//! assert_eq!(live.status, "online");
//!
//! let day = sim.historical_series(TimeRange::OneDay);
//! assert_eq!(day.len(), 288);
//! ```

pub mod baseline;
pub mod clock;
pub mod cyclical;
pub mod draws;
pub mod generator;
pub mod profile;
pub mod series;

pub use baseline::BaselineState;
pub use clock::{Clock, FixedClock, SystemClock};
pub use cyclical::{CalendarPosition, CyclicalModifiers, CyclicalPattern};
pub use draws::{DrawSource, RngDrawSource, ScriptedDrawSource};
pub use generator::CorrelatedGenerator;
pub use profile::{GenerationMode, GenerationProfile};
pub use series::TelemetrySimulator;
