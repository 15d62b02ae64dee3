//! Mutable charger schedule owned by the caller.

use super::types::{ChargerLoad, DemandError};

/// Power of the charger a fresh working set starts with (kW).
pub const DEFAULT_CHARGER_KW: f64 = 7.0;

/// Ordered, never-empty list of charger lines.
///
/// This is the imperative shell around the pure calculator: edits clamp
/// negative power to zero and zero quantity to one before storing, so the
/// calculator always sees in-domain values.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargerLoadSet {
    loads: Vec<ChargerLoad>,
}

impl Default for ChargerLoadSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ChargerLoadSet {
    /// Creates a working set holding a single 7 kW charger.
    pub fn new() -> Self {
        Self {
            loads: vec![ChargerLoad::new(1, DEFAULT_CHARGER_KW, 1)],
        }
    }

    /// Builds a working set from `(power_kw, quantity)` pairs, numbering ids from 1.
    ///
    /// # Errors
    ///
    /// Returns [`DemandError::EmptyWorkingSet`] if `loads` yields nothing.
    pub fn from_loads<I>(loads: I) -> Result<Self, DemandError>
    where
        I: IntoIterator<Item = (f64, u32)>,
    {
        let loads: Vec<ChargerLoad> = loads
            .into_iter()
            .zip(1u32..)
            .map(|((power_kw, quantity), id)| {
                ChargerLoad::new(id, clamp_power(power_kw), clamp_quantity(quantity))
            })
            .collect();

        if loads.is_empty() {
            return Err(DemandError::EmptyWorkingSet);
        }
        Ok(Self { loads })
    }

    /// Charger lines in insertion order.
    pub fn loads(&self) -> &[ChargerLoad] {
        &self.loads
    }

    /// Number of charger lines (not chargers).
    pub fn len(&self) -> usize {
        self.loads.len()
    }

    /// Always `false` for a working set.
    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    /// Total number of physical chargers (sum of quantities).
    pub fn total_charger_count(&self) -> u32 {
        total_charger_count(&self.loads)
    }

    /// Appends a charger line and returns its id.
    pub fn add(&mut self, power_kw: f64, quantity: u32) -> u32 {
        let id = self.loads.iter().map(|l| l.id).max().unwrap_or(0) + 1;
        self.loads.push(ChargerLoad::new(
            id,
            clamp_power(power_kw),
            clamp_quantity(quantity),
        ));
        id
    }

    /// Removes the charger line with `id`.
    ///
    /// # Errors
    ///
    /// [`DemandError::LastCharger`] if it is the only line left,
    /// [`DemandError::UnknownCharger`] if no line has that id.
    pub fn remove(&mut self, id: u32) -> Result<ChargerLoad, DemandError> {
        let idx = self.position(id)?;
        if self.loads.len() == 1 {
            return Err(DemandError::LastCharger(id));
        }
        Ok(self.loads.remove(idx))
    }

    /// Sets the per-charger power of line `id`, clamping negatives to zero.
    ///
    /// # Errors
    ///
    /// Returns [`DemandError::UnknownCharger`] if no line has that id.
    pub fn set_power(&mut self, id: u32, power_kw: f64) -> Result<(), DemandError> {
        let idx = self.position(id)?;
        self.loads[idx].power_kw = clamp_power(power_kw);
        Ok(())
    }

    /// Sets the quantity of line `id`, clamping zero to one.
    ///
    /// # Errors
    ///
    /// Returns [`DemandError::UnknownCharger`] if no line has that id.
    pub fn set_quantity(&mut self, id: u32, quantity: u32) -> Result<(), DemandError> {
        let idx = self.position(id)?;
        self.loads[idx].quantity = clamp_quantity(quantity);
        Ok(())
    }

    fn position(&self, id: u32) -> Result<usize, DemandError> {
        self.loads
            .iter()
            .position(|l| l.id == id)
            .ok_or(DemandError::UnknownCharger(id))
    }
}

/// Sum of quantities across charger lines, saturating at `u32::MAX`.
pub fn total_charger_count(loads: &[ChargerLoad]) -> u32 {
    loads
        .iter()
        .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
}

// NaN power is treated as zero as well.
fn clamp_power(power_kw: f64) -> f64 {
    if power_kw > 0.0 { power_kw } else { 0.0 }
}

fn clamp_quantity(quantity: u32) -> u32 {
    quantity.max(1)
}
