//! Run state captured at a generation boundary.
//!
//! A [`Snapshot`] owns copies of everything a caller typically records:
//! the population, its weight vectors, the external archive and the two
//! counters. It can be written in the historical whitespace-separated text
//! layout or, with the `serde` feature, as JSON.
//!
//! # Text layout
//!
//! [`write_population`](Snapshot::write_population) writes one row per
//! individual, objective columns first and decision columns after, every
//! value formatted as `%.18e`. [`write_info`](Snapshot::write_info) writes
//! the evaluation count and the generation count, one per line, in the
//! same format.

use std::io::Write;

use crate::archive::ExternalArchive;
use crate::pareto;
use crate::population::Population;

/// A copy of the optimizer state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// Schema version of the JSON form. Currently `1`.
    pub version: u32,
    /// Population, one `(x, y)` pair per subproblem.
    pub population: Population,
    /// Weight vectors, aligned with population slots.
    pub weights: Vec<Vec<f64>>,
    /// External archive of non-dominated solutions.
    pub archive: ExternalArchive,
    /// Reference point.
    pub reference: Vec<f64>,
    /// Evaluations consumed, initial population included.
    pub evaluations: usize,
    /// Generation counter, starting at 1.
    pub generation: usize,
}

impl Snapshot {
    /// Write the population as `y | x` rows.
    ///
    /// # Errors
    ///
    /// Returns any error of the underlying writer.
    pub fn write_population<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        for (x, y) in self
            .population
            .decisions()
            .iter()
            .zip(self.population.objectives())
        {
            let row: Vec<String> = y.iter().chain(x).map(|&v| format_sci(v)).collect();
            writeln!(writer, "{}", row.join(" "))?;
        }
        Ok(())
    }

    /// Write `[evaluations, generation]`, one value per line.
    ///
    /// # Errors
    ///
    /// Returns any error of the underlying writer.
    #[allow(clippy::cast_precision_loss)]
    pub fn write_info<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writeln!(writer, "{}", format_sci(self.evaluations as f64))?;
        writeln!(writer, "{}", format_sci(self.generation as f64))
    }

    /// Serialize the snapshot as JSON.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if serialization or writing fails.
    #[cfg(feature = "serde")]
    pub fn to_json<W: Write>(&self, writer: W) -> std::io::Result<()> {
        serde_json::to_writer(writer, self).map_err(std::io::Error::other)
    }

    /// Deserialize a snapshot written by [`to_json`](Self::to_json).
    ///
    /// # Errors
    ///
    /// Returns an I/O error if reading or parsing fails.
    #[cfg(feature = "serde")]
    pub fn from_json<R: std::io::Read>(reader: R) -> std::io::Result<Self> {
        serde_json::from_reader(reader).map_err(std::io::Error::other)
    }

    /// Hypervolume of the archive with respect to `reference_point`.
    #[must_use]
    pub fn hypervolume(&self, reference_point: &[f64]) -> f64 {
        pareto::hypervolume(self.archive.objectives(), reference_point)
    }
}

/// Format like C's `%.18e`: two-digit signed exponent.
fn format_sci(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_owned();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_owned();
    }
    let s = format!("{v:.18e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s,
    }
}
