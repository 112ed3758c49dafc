//! Land-cover legend
//!
//! The ESA WorldCover legend is a closed set of 11 class codes. Each class
//! carries a display label and belongs to exactly one side of the
//! natural / anthropogenic habitat partition.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Habitat partition a land-cover class belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitatKind {
    Natural,
    Anthropogenic,
}

/// ESA WorldCover land-cover classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum WorldCoverClass {
    TreeCover = 10,
    Shrubland = 20,
    Grassland = 30,
    Cropland = 40,
    BuiltUp = 50,
    BareSparseVegetation = 60,
    SnowAndIce = 70,
    PermanentWater = 80,
    HerbaceousWetland = 90,
    Mangroves = 95,
    MossAndLichen = 100,
}

impl WorldCoverClass {
    /// All classes in legend order.
    pub const ALL: [WorldCoverClass; 11] = [
        Self::TreeCover,
        Self::Shrubland,
        Self::Grassland,
        Self::Cropland,
        Self::BuiltUp,
        Self::BareSparseVegetation,
        Self::SnowAndIce,
        Self::PermanentWater,
        Self::HerbaceousWetland,
        Self::Mangroves,
        Self::MossAndLichen,
    ];

    /// Raster value of this class.
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TreeCover => "Tree cover",
            Self::Shrubland => "Shrubland",
            Self::Grassland => "Grassland",
            Self::Cropland => "Cropland",
            Self::BuiltUp => "Built-up",
            Self::BareSparseVegetation => "Bare / sparse vegetation",
            Self::SnowAndIce => "Snow and ice",
            Self::PermanentWater => "Permanent water bodies",
            Self::HerbaceousWetland => "Herbaceous wetland",
            Self::Mangroves => "Mangroves",
            Self::MossAndLichen => "Moss and lichen",
        }
    }

    pub fn habitat(self) -> HabitatKind {
        match self {
            Self::TreeCover
            | Self::Shrubland
            | Self::Grassland
            | Self::HerbaceousWetland
            | Self::Mangroves
            | Self::MossAndLichen => HabitatKind::Natural,
            Self::Cropland
            | Self::BuiltUp
            | Self::BareSparseVegetation
            | Self::SnowAndIce
            | Self::PermanentWater => HabitatKind::Anthropogenic,
        }
    }
}

impl TryFrom<u16> for WorldCoverClass {
    type Error = Error;

    fn try_from(code: u16) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.code() == code)
            .ok_or(Error::UnknownLandCoverClass(code))
    }
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub code: u16,
    pub label: String,
    /// `None` places the class outside both habitat sets; it still counts
    /// toward the habitat-fraction denominator.
    #[serde(default)]
    pub habitat: Option<HabitatKind>,
}

/// Closed mapping from class code to label and habitat kind.
///
/// Defaults to the WorldCover legend; callers may substitute their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    entries: Vec<LegendEntry>,
}

impl Legend {
    /// Build a legend, rejecting duplicate codes.
    pub fn new(entries: Vec<LegendEntry>) -> Result<Self> {
        let legend = Self { entries };
        legend.validate()?;
        Ok(legend)
    }

    /// The 11-class ESA WorldCover legend.
    pub fn worldcover() -> Self {
        let entries = WorldCoverClass::ALL
            .iter()
            .map(|c| LegendEntry {
                code: c.code(),
                label: c.label().to_string(),
                habitat: Some(c.habitat()),
            })
            .collect();
        Self { entries }
    }

    pub fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(Error::invalid_parameter("legend", "[]", "legend has no classes"));
        }
        for (i, entry) in self.entries.iter().enumerate() {
            if self.entries[..i].iter().any(|e| e.code == entry.code) {
                return Err(Error::invalid_parameter(
                    "legend",
                    entry.code,
                    "duplicate class code",
                ));
            }
        }
        Ok(())
    }

    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    pub fn get(&self, code: u16) -> Option<&LegendEntry> {
        self.entries.iter().find(|e| e.code == code)
    }

    /// Display label for `code`.
    ///
    /// A code outside the legend is a data-integrity fault.
    pub fn label(&self, code: u16) -> Result<&str> {
        self.get(code)
            .map(|e| e.label.as_str())
            .ok_or(Error::UnknownLandCoverClass(code))
    }

    /// Habitat kind for `code`, `None` when unpartitioned or unknown.
    pub fn habitat(&self, code: u16) -> Option<HabitatKind> {
        self.get(code).and_then(|e| e.habitat)
    }

    pub fn codes_of(&self, kind: HabitatKind) -> impl Iterator<Item = u16> + '_ {
        self.entries
            .iter()
            .filter(move |e| e.habitat == Some(kind))
            .map(|e| e.code)
    }
}

impl Default for Legend {
    fn default() -> Self {
        Self::worldcover()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worldcover_partition() {
        let legend = Legend::worldcover();
        let natural: Vec<u16> = legend.codes_of(HabitatKind::Natural).collect();
        let anthro: Vec<u16> = legend.codes_of(HabitatKind::Anthropogenic).collect();
        assert_eq!(natural, vec![10, 20, 30, 90, 95, 100]);
        assert_eq!(anthro, vec![40, 50, 60, 70, 80]);
    }

    #[test]
    fn test_try_from_code() {
        assert_eq!(WorldCoverClass::try_from(95).unwrap(), WorldCoverClass::Mangroves);
        assert!(matches!(
            WorldCoverClass::try_from(15),
            Err(Error::UnknownLandCoverClass(15))
        ));
    }

    #[test]
    fn test_label_unknown_code() {
        let legend = Legend::default();
        assert_eq!(legend.label(50).unwrap(), "Built-up");
        assert!(matches!(legend.label(255), Err(Error::UnknownLandCoverClass(255))));
    }

    #[test]
    fn test_duplicate_codes_rejected() {
        let entry = LegendEntry {
            code: 1,
            label: "Forest".into(),
            habitat: Some(HabitatKind::Natural),
        };
        assert!(Legend::new(vec![entry.clone(), entry]).is_err());
    }
}
