//! Fluid identities carried by pipelines.

use std::fmt;

/// Pure fluids a pipeline may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    /// Methane (CH₄), the reference natural gas
    CH4,
    /// Ethane
    Ethane,
    /// Propane
    Propane,
    /// n-Butane
    NButane,
    /// Isobutane
    Isobutane,
    /// Nitrogen (N₂)
    N2,
    /// Oxygen (O₂)
    O2,
    /// Carbon dioxide (CO₂)
    CO2,
    /// Hydrogen (H₂)
    H2,
    /// Helium (He)
    He,
    /// Air (pseudo-pure backend fluid)
    Air,
    /// Water (H₂O)
    H2O,
    /// Ammonia (NH₃)
    Ammonia,
}

impl Species {
    pub const ALL: [Species; 13] = [
        Species::CH4,
        Species::Ethane,
        Species::Propane,
        Species::NButane,
        Species::Isobutane,
        Species::N2,
        Species::O2,
        Species::CO2,
        Species::H2,
        Species::He,
        Species::Air,
        Species::H2O,
        Species::Ammonia,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Species::CH4 => "CH4",
            Species::Ethane => "Ethane",
            Species::Propane => "Propane",
            Species::NButane => "nButane",
            Species::Isobutane => "Isobutane",
            Species::N2 => "N2",
            Species::O2 => "O2",
            Species::CO2 => "CO2",
            Species::H2 => "H2",
            Species::He => "He",
            Species::Air => "Air",
            Species::H2O => "H2O",
            Species::Ammonia => "NH3",
        }
    }

    /// Molar mass [g/mol].
    pub fn molar_mass(&self) -> f64 {
        match self {
            Species::CH4 => 16.043,
            Species::Ethane => 30.069,
            Species::Propane => 44.097,
            Species::NButane => 58.122,
            Species::Isobutane => 58.122,
            Species::N2 => 28.013_4,
            Species::O2 => 31.998_8,
            Species::CO2 => 44.009_5,
            Species::H2 => 2.015_88,
            Species::He => 4.002_602,
            Species::Air => 28.962_5,
            Species::H2O => 18.015_28,
            Species::Ammonia => 17.030_52,
        }
    }

    /// Map to rfluids Pure enum (internal use for CoolProp backend).
    pub(crate) fn rfluids_pure(&self) -> rfluids::substance::Pure {
        use rfluids::substance::Pure;
        match self {
            Species::CH4 => Pure::Methane,
            Species::Ethane => Pure::Ethane,
            Species::Propane => Pure::nPropane,
            Species::NButane => Pure::nButane,
            Species::Isobutane => Pure::Isobutane,
            Species::N2 => Pure::Nitrogen,
            Species::O2 => Pure::Oxygen,
            Species::CO2 => Pure::CarbonDioxide,
            Species::H2 => Pure::Hydrogen,
            Species::He => Pure::Helium,
            Species::Air => Pure::Air,
            Species::H2O => Pure::Water,
            Species::Ammonia => Pure::Ammonia,
        }
    }

    /// Get human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Species::CH4 => "Methane",
            Species::Ethane => "Ethane",
            Species::Propane => "Propane",
            Species::NButane => "n-Butane",
            Species::Isobutane => "Isobutane",
            Species::N2 => "Nitrogen",
            Species::O2 => "Oxygen",
            Species::CO2 => "Carbon Dioxide",
            Species::H2 => "Hydrogen",
            Species::He => "Helium",
            Species::Air => "Air",
            Species::H2O => "Water",
            Species::Ammonia => "Ammonia",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for Species {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CH4" | "METHANE" | "NATURAL GAS" | "NATURALGAS" => Ok(Species::CH4),
            "ETHANE" | "C2H6" => Ok(Species::Ethane),
            "PROPANE" | "C3H8" => Ok(Species::Propane),
            "NBUTANE" | "N-BUTANE" | "BUTANE" => Ok(Species::NButane),
            "ISOBUTANE" | "I-BUTANE" => Ok(Species::Isobutane),
            "N2" | "NITROGEN" => Ok(Species::N2),
            "O2" | "OXYGEN" => Ok(Species::O2),
            "CO2" | "CARBONDIOXIDE" | "CARBON DIOXIDE" => Ok(Species::CO2),
            "H2" | "HYDROGEN" => Ok(Species::H2),
            "HE" | "HELIUM" => Ok(Species::He),
            "AIR" => Ok(Species::Air),
            "H2O" | "WATER" => Ok(Species::H2O),
            "NH3" | "AMMONIA" => Ok(Species::Ammonia),
            _ => Err("unknown species"),
        }
    }
}
