use serde::{Deserialize, Serialize};

use pthfill_core::{Point2D, Position};
use pthfill_settings::FillSettings;

/// Comment that opens every generated fill block
pub const FILL_TAG: &str = "; pthfill:";

/// Parameters for the hole fill sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoleFillParameters {
    /// Hotend setpoint while filling (C)
    pub fill_temperature: f64,
    /// Hotend setpoint restored after filling (C)
    pub restore_temperature: f64,
    /// Filament pushed into each hole (mm)
    pub extrusion_amount: f64,
    /// Retraction undone before and redone after each hole (mm)
    pub retraction_amount: f64,
    /// Feed rate for every move (mm/min)
    pub feed_rate: f64,
    /// Travel height above the starting Z (mm)
    pub lift_height: f64,
    /// Depth below the starting Z the nozzle presses to (mm)
    pub contact_depth: f64,
    /// Dwell after depositing and after retracting (ms)
    pub dwell_ms: u32,
    /// Sideways X move that breaks the string (mm)
    pub string_break_offset: f64,
}

impl HoleFillParameters {
    /// Build parameters from the fill settings and the setpoint to restore
    pub fn from_settings(fill: &FillSettings, restore_temperature: f64) -> Self {
        Self {
            fill_temperature: fill.fill_temperature,
            restore_temperature,
            extrusion_amount: fill.extrusion_amount,
            retraction_amount: fill.retraction_amount,
            feed_rate: fill.feed_rate,
            lift_height: fill.lift_height,
            contact_depth: fill.contact_depth,
            dwell_ms: fill.dwell_ms,
            string_break_offset: fill.string_break_offset,
        }
    }
}

impl Default for HoleFillParameters {
    fn default() -> Self {
        let fill = FillSettings::default();
        Self::from_settings(&fill, fill.restore_temperature)
    }
}

/// Generator for the hole fill sequence
///
/// Produces absolute moves only and never changes the positioning mode of
/// the surrounding program.
pub struct HoleFillSynthesizer {
    params: HoleFillParameters,
}

impl HoleFillSynthesizer {
    /// Create a new HoleFillSynthesizer with the given parameters
    pub fn new(params: HoleFillParameters) -> Self {
        Self { params }
    }

    /// Generate the fill commands for `holes`, starting and ending at `origin`
    ///
    /// Commands are returned without line terminators. The return move
    /// prints `origin` in full precision so the tool ends where it started;
    /// every other coordinate is printed to three decimals.
    pub fn synthesize(&self, holes: &[Point2D], origin: Position) -> Vec<String> {
        let p = &self.params;
        let feed = p.feed_rate;
        let raised = origin.z + p.lift_height;
        let contact = origin.z - p.contact_depth;

        let mut gcode = Vec::with_capacity(holes.len() * 9 + 6);

        gcode.push(format!("{} filling {} holes", FILL_TAG, holes.len()));
        gcode.push(format!("M104 S{}", p.fill_temperature));
        gcode.push(format!("G0 Z{:.3} F{:.0}", raised, feed));

        for hole in holes {
            gcode.push(format!(
                "G0 X{:.3} Y{:.3} Z{:.3} F{:.0}",
                hole.x, hole.y, raised, feed
            ));
            gcode.push(format!("G0 Z{:.3} F{:.0}", contact, feed));
            gcode.push(format!("G1 E{:.3} F{:.0}", p.retraction_amount, feed));
            gcode.push(format!("G1 E{:.3} F{:.0}", p.extrusion_amount, feed));
            gcode.push(format!("G4 P{}", p.dwell_ms));
            gcode.push(format!("G1 E-{:.3} F{:.0}", p.retraction_amount, feed));
            gcode.push(format!("G4 P{}", p.dwell_ms));
            // Break the string before lifting.
            gcode.push(format!(
                "G0 X{:.3} Y{:.3} F{:.0}",
                hole.x + p.string_break_offset,
                hole.y,
                feed
            ));
            gcode.push(format!("G0 Z{:.3} F{:.0}", raised, feed));
        }

        gcode.push(format!("G0 X{} Y{} F{:.0}", origin.x, origin.y, feed));
        gcode.push(format!("G0 Z{} F{:.0}", origin.z, feed));
        gcode.push(format!("M104 S{}", p.restore_temperature));

        tracing::debug!("Synthesized {} fill commands for {} holes", gcode.len(), holes.len());
        gcode
    }
}
