use serde::Serialize;

use super::{BusinessRecord, Candidate};

/// One ranked business in the canonical response
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub negocio: String,
    pub direccion: String,
    pub ciudad: String,
    pub estado: String,
    pub lunes: String,
    pub martes: String,
    pub miercoles: String,
    pub jueves: String,
    pub viernes: String,
    pub sabado: String,
    pub domingo: String,
    pub distancia: f64,
    pub latitud: f64,
    pub longitud: f64,
}

impl From<&Candidate<'_>> for Recommendation {
    fn from(candidate: &Candidate<'_>) -> Self {
        let business = candidate.business;
        let schedule = &business.schedule;
        Self {
            negocio: business.name.clone(),
            direccion: business.address.clone(),
            ciudad: business.city.clone(),
            estado: business.state.code().to_string(),
            lunes: schedule.monday.clone(),
            martes: schedule.tuesday.clone(),
            miercoles: schedule.wednesday.clone(),
            jueves: schedule.thursday.clone(),
            viernes: schedule.friday.clone(),
            sabado: schedule.saturday.clone(),
            domingo: schedule.sunday.clone(),
            distancia: candidate.distance_km,
            latitud: business.latitude,
            longitud: business.longitude,
        }
    }
}

/// Canonical response body. The field name keeps the historical spelling.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Recommendations {
    pub recomendations: Vec<Recommendation>,
}

/// Record returned by the deprecated English endpoint
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BasicRecommendation {
    pub business_id: String,
    pub name: String,
    pub city: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&BusinessRecord> for BasicRecommendation {
    fn from(business: &BusinessRecord) -> Self {
        Self {
            business_id: business.business_id.clone(),
            name: business.name.clone(),
            city: business.city.clone(),
            address: business.address.clone(),
            latitude: business.latitude,
            longitude: business.longitude,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct BasicRecommendations {
    pub recomendations: Vec<BasicRecommendation>,
}
