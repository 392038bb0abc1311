// pf-core/src/units.rs

use uom::si::f64::{
    Area as UomArea, DynamicViscosity as UomDynamicViscosity, Length as UomLength,
    MassDensity as UomMassDensity, MassRate as UomMassRate, Pressure as UomPressure,
    Ratio as UomRatio, ThermodynamicTemperature as UomThermodynamicTemperature,
    Velocity as UomVelocity, VolumeRate as UomVolumeRate,
};

// Public canonical unit types (SI, f64)
pub type Area = UomArea;
pub type DynVisc = UomDynamicViscosity;
pub type Length = UomLength;
pub type Density = UomMassDensity;
pub type MassRate = UomMassRate;
pub type Pressure = UomPressure;
pub type Ratio = UomRatio;
pub type Temperature = UomThermodynamicTemperature;
pub type Velocity = UomVelocity;
pub type VolumeRate = UomVolumeRate;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    use uom::si::mass_rate::kilogram_per_second;
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    use uom::si::area::square_meter;
    Area::new::<square_meter>(v)
}

#[inline]
pub fn m3ps(v: f64) -> VolumeRate {
    use uom::si::volume_rate::cubic_meter_per_second;
    VolumeRate::new::<cubic_meter_per_second>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn pa_s(v: f64) -> DynVisc {
    use uom::si::dynamic_viscosity::pascal_second;
    DynVisc::new::<pascal_second>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

pub mod constants {
    pub const G0_MPS2: f64 = 9.806_65;

    /// Universal gas constant [J/(mol·K)]
    pub const R_UNIVERSAL: f64 = 8.314_462_618;

    /// Molar mass of dry air [g/mol], reference for gas specific gravity
    pub const AIR_MOLAR_MASS_G_PER_MOL: f64 = 28.9625;

    /// Water density at 15 °C and 1 atm [kg/m³], reference for liquid specific gravity
    pub const WATER_DENSITY_KG_M3: f64 = 999.1;

    /// Standard atmosphere [Pa]
    pub const ATM_PA: f64 = 101_325.0;
}

/// Oilfield (US customary) units used by the gas transmission correlations.
///
/// Every helper takes or returns the SI-typed quantity on one side and a bare
/// `f64` in the named field unit on the other.
pub mod field {
    use super::*;

    pub const PA_PER_PSI: f64 = 6_894.757_293;
    pub const M_PER_FT: f64 = 0.3048;
    pub const M_PER_IN: f64 = 0.0254;
    pub const M_PER_MILE: f64 = 1_609.344;
    pub const M3_PER_FT3: f64 = 0.028_316_846_592;
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    pub const M3_PER_BBL: f64 = 0.158_987_294_928;

    /// Base (standard) conditions the gas correlations are referenced to.
    pub const BASE_PRESSURE_PSIA: f64 = 14.7;
    pub const BASE_TEMPERATURE_R: f64 = 520.0;

    #[inline]
    pub fn psi(v: f64) -> Pressure {
        pa(v * PA_PER_PSI)
    }

    #[inline]
    pub fn to_psi(p: Pressure) -> f64 {
        p.value / PA_PER_PSI
    }

    #[inline]
    pub fn ft(v: f64) -> Length {
        m(v * M_PER_FT)
    }

    #[inline]
    pub fn to_ft(l: Length) -> f64 {
        l.value / M_PER_FT
    }

    #[inline]
    pub fn inches(v: f64) -> Length {
        m(v * M_PER_IN)
    }

    #[inline]
    pub fn to_inches(l: Length) -> f64 {
        l.value / M_PER_IN
    }

    #[inline]
    pub fn miles(v: f64) -> Length {
        m(v * M_PER_MILE)
    }

    #[inline]
    pub fn to_miles(l: Length) -> f64 {
        l.value / M_PER_MILE
    }

    #[inline]
    pub fn fahrenheit(v: f64) -> Temperature {
        k((v + 459.67) * 5.0 / 9.0)
    }

    #[inline]
    pub fn to_rankine(t: Temperature) -> f64 {
        t.value * 1.8
    }

    #[inline]
    pub fn ft3ps(v: f64) -> VolumeRate {
        m3ps(v * M3_PER_FT3)
    }

    #[inline]
    pub fn to_ft3ps(q: VolumeRate) -> f64 {
        q.value / M3_PER_FT3
    }

    /// Standard cubic feet per day into SI volume rate.
    #[inline]
    pub fn scf_per_day(v: f64) -> VolumeRate {
        m3ps(v * M3_PER_FT3 / SECONDS_PER_DAY)
    }

    #[inline]
    pub fn to_scf_per_day(q: VolumeRate) -> f64 {
        q.value * SECONDS_PER_DAY / M3_PER_FT3
    }

    /// Oil barrels (42 US gal) per day.
    #[inline]
    pub fn bbl_per_day(v: f64) -> VolumeRate {
        m3ps(v * M3_PER_BBL / SECONDS_PER_DAY)
    }

    #[inline]
    pub fn to_bbl_per_day(q: VolumeRate) -> f64 {
        q.value * SECONDS_PER_DAY / M3_PER_BBL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = pa(101_325.0);
        let _t = k(300.0);
        let _mdot = kgps(1.2);
        let _l = m(2.0);
        let _a = m2(0.01);
        let _q = m3ps(0.5);
        let _v = mps(3.0);
        let _rho = kg_per_m3(1000.0);
        let _mu = pa_s(1e-3);
        let _r = unitless(0.5);
    }

    #[test]
    fn field_units_invert() {
        use field::*;
        assert!((to_psi(psi(100.0)) - 100.0).abs() < 1e-9);
        assert!((to_miles(miles(20.0)) - 20.0).abs() < 1e-12);
        assert!((to_inches(inches(12.0)) - 12.0).abs() < 1e-12);
        assert!((to_ft3ps(ft3ps(8.5)) - 8.5).abs() < 1e-12);
        assert!((to_scf_per_day(scf_per_day(1.0e6)) - 1.0e6).abs() < 1e-6);
    }

    #[test]
    fn barrel_is_5_615_cubic_feet() {
        let q = field::bbl_per_day(1.0);
        assert!((field::to_scf_per_day(q) - 5.614_583).abs() < 1e-5);
    }

    #[test]
    fn sixty_fahrenheit_is_base_temperature() {
        let t = field::fahrenheit(60.0);
        assert!((field::to_rankine(t) - 519.67).abs() < 1e-9);
        assert!((t.value - 288.705_555).abs() < 1e-5);
    }

    #[test]
    fn twelve_inches_is_one_foot() {
        let d = field::inches(12.0);
        assert!((field::to_ft(d) - 1.0).abs() < 1e-12);
    }
}
