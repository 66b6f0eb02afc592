// src/instrument.rs

//! A simulated instrument for trying the parser end to end.

use crate::parser::ScpiParser;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// The identification string returned by `*IDN?`.
pub const IDENTIFICATION: &str = "SCPI Test Parser";

/// A simulated instrument with a writable variable and two fixed readings.
///
/// | Command               | Behavior                                   |
/// |-----------------------|--------------------------------------------|
/// | `*IDN?`               | returns [`IDENTIFICATION`]                 |
/// | `VAR:X <n>`           | stores the integer `n`, returns nothing    |
/// | `VAR:X?`              | returns the stored integer                 |
/// | `CONCAT <words...>`   | returns the arguments joined by spaces     |
/// | `MEASure:VOLTage:DC?` | returns the DC voltage reading             |
/// | `MEASure:CURRent:AC?` | returns the AC current reading             |
#[derive(Debug)]
pub struct SimulatedInstrument {
    var_x: AtomicI64,
    volts_dc: f64,
    amps_ac: f64,
}

impl Default for SimulatedInstrument {
    fn default() -> Self {
        Self {
            var_x: AtomicI64::new(0),
            volts_dc: 2.23,
            amps_ac: 0.123,
        }
    }
}

impl SimulatedInstrument {
    /// Creates an instrument in its power-on state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every command of the instrument on `parser`.
    pub fn install(self: &Arc<Self>, parser: &ScpiParser) {
        parser.register("*IDN?", |_: &[String]| Some(IDENTIFICATION.to_string()));

        let instrument = Arc::clone(self);
        parser.register("VAR:X", move |args: &[String]| instrument.set_x(args));

        let instrument = Arc::clone(self);
        parser.register("VAR:X?", move |_: &[String]| Some(instrument.x().to_string()));

        parser.register("CONCAT", |args: &[String]| Some(args.join(" ")));

        let instrument = Arc::clone(self);
        parser.register("MEASure:VOLTage:DC?", move |_: &[String]| {
            Some(instrument.volts_dc.to_string())
        });

        let instrument = Arc::clone(self);
        parser.register("MEASure:CURRent:AC?", move |_: &[String]| {
            Some(instrument.amps_ac.to_string())
        });
    }

    /// The current value of `X`.
    pub fn x(&self) -> i64 {
        self.var_x.load(Ordering::SeqCst)
    }

    // Malformed values leave X unchanged.
    fn set_x(&self, args: &[String]) -> Option<String> {
        match args.first().map(|value| value.parse::<i64>()) {
            Some(Ok(value)) => self.var_x.store(value, Ordering::SeqCst),
            Some(Err(e)) => log::debug!("VAR:X ignored invalid value: {}", e),
            None => {}
        }
        None
    }
}

/// Installs a fresh [`SimulatedInstrument`] on `parser`.
pub fn simulated_parser(parser: ScpiParser) -> (ScpiParser, Arc<SimulatedInstrument>) {
    let instrument = Arc::new(SimulatedInstrument::new());
    instrument.install(&parser);
    (parser, instrument)
}
