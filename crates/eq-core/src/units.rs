// eq-core/src/units.rs

use uom::si::f64::ThermodynamicTemperature as UomThermodynamicTemperature;

// Public canonical unit types (SI, f64)
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kelvin_value(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::kelvin;
    t.get::<kelvin>()
}

pub mod constants {
    /// Molar gas constant [J/(mol·K)].
    pub const GAS_CONSTANT_J_PER_MOL_K: f64 = 8.314_462_618;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kelvin_round_trip() {
        let t = k(1273.15);
        assert!((kelvin_value(t) - 1273.15).abs() < 1e-9);
    }
}
