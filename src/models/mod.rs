use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod request;
pub mod response;

pub use request::{BasicRecommendationRequest, RadiusPolicy, RecommendationRequest, V1RecommendationRequest};
pub use response::{BasicRecommendation, BasicRecommendations, Recommendation, Recommendations};

/// Trims and uppercases a code before it's compared against a vocabulary
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// The twelve states the catalog covers, in the order the coordinate table uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum State {
    AZ,
    CA,
    DE,
    FL,
    ID,
    IL,
    IN,
    LA,
    MO,
    NV,
    PA,
    TN,
}

impl State {
    pub const ALL: [State; 12] = [
        State::AZ,
        State::CA,
        State::DE,
        State::FL,
        State::ID,
        State::IL,
        State::IN,
        State::LA,
        State::MO,
        State::NV,
        State::PA,
        State::TN,
    ];

    /// Parses a state code after trimming and uppercasing it
    pub fn parse(raw: &str) -> Option<Self> {
        let code = normalize_code(raw);
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    pub fn code(&self) -> &'static str {
        match self {
            State::AZ => "AZ",
            State::CA => "CA",
            State::DE => "DE",
            State::FL => "FL",
            State::ID => "ID",
            State::IL => "IL",
            State::IN => "IN",
            State::LA => "LA",
            State::MO => "MO",
            State::NV => "NV",
            State::PA => "PA",
            State::TN => "TN",
        }
    }

    /// Position of the state in the coordinate table
    pub fn ordinal(&self) -> usize {
        *self as usize
    }
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// General category a business can be tagged with (many per business)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    JapaneseAsian,
    BarsBreweriesTapas,
    GeneralRestaurants,
    Mediterranean,
    Pizzerias,
    GrillSteakhouse,
    Mexican,
    FastFood,
    CafesLightMeals,
    International,
    DietVeganSalads,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::JapaneseAsian,
        Category::BarsBreweriesTapas,
        Category::GeneralRestaurants,
        Category::Mediterranean,
        Category::Pizzerias,
        Category::GrillSteakhouse,
        Category::Mexican,
        Category::FastFood,
        Category::CafesLightMeals,
        Category::International,
        Category::DietVeganSalads,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        let label = normalize_code(raw);
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::JapaneseAsian => "JAPONESA - ASIATICA",
            Category::BarsBreweriesTapas => "BARES - CERVECERIAS - TAPAS",
            Category::GeneralRestaurants => "RESTAURANTES GENERALES",
            Category::Mediterranean => "MEDITERRANEA",
            Category::Pizzerias => "PIZZERIAS",
            Category::GrillSteakhouse => "GRILL - ASADOS - CARNES",
            Category::Mexican => "MEXICANA",
            Category::FastFood => "COMIDA RAPIDA",
            Category::CafesLightMeals => "CAFETERIAS - COMIDAS LIGERAS",
            Category::International => "COCINA INTERNACIONAL",
            Category::DietVeganSalads => "DIETA - VEGANA - ENSALADAS",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Boolean characteristic a business may offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    AcceptsCreditCards,
    Delivery,
    Takeout,
    WheelchairAccessible,
    BikeParking,
    GoodForKids,
    DogsAllowed,
}

impl Feature {
    pub const ALL: [Feature; 7] = [
        Feature::AcceptsCreditCards,
        Feature::Delivery,
        Feature::Takeout,
        Feature::WheelchairAccessible,
        Feature::BikeParking,
        Feature::GoodForKids,
        Feature::DogsAllowed,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        let label = normalize_code(raw);
        Self::ALL.into_iter().find(|f| f.label() == label)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Feature::AcceptsCreditCards => "ACEPTA TARJETA DE CREDITO",
            Feature::Delivery => "SERVICIO DE DELIVERY",
            Feature::Takeout => "SERVICIO PARA LLEVAR",
            Feature::WheelchairAccessible => "ACCESIBILIDAD SILLAS DE RUEDA",
            Feature::BikeParking => "ESTACIONAMIENTO BICICLETAS",
            Feature::GoodForKids => "APROPIADO PARA NIÑOS",
            Feature::DogsAllowed => "ACEPTA MASCOTAS",
        }
    }

    fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

impl Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Set of feature flags carried by a business
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureFlags(u8);

impl FeatureFlags {
    pub fn with(mut self, feature: Feature, enabled: bool) -> Self {
        if enabled {
            self.0 |= feature.bit();
        } else {
            self.0 &= !feature.bit();
        }
        self
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.0 & feature.bit() != 0
    }

    pub fn contains_all(&self, features: &[Feature]) -> bool {
        features.iter().all(|f| self.contains(*f))
    }
}

impl FromIterator<Feature> for FeatureFlags {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        iter.into_iter()
            .fold(FeatureFlags::default(), |flags, f| flags.with(f, true))
    }
}

/// Opening hours per weekday, as free-form strings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub monday: String,
    pub tuesday: String,
    pub wednesday: String,
    pub thursday: String,
    pub friday: String,
    pub saturday: String,
    pub sunday: String,
}

/// A business in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessRecord {
    pub business_id: String,
    /// Integer id the scoring model knows the business by
    pub business_int_id: u32,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: State,
    pub schedule: WeeklySchedule,
    pub latitude: f64,
    pub longitude: f64,
    pub features: FeatureFlags,
}

/// A business that survived filtering, with its distance from the query origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'a> {
    pub business: &'a BusinessRecord,
    pub distance_km: f64,
}

/// City centroid used as the origin for distance filtering
#[derive(Debug, Clone, PartialEq)]
pub struct CityCoordinate {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}
