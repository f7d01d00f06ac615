//! Candidate filtering
//!
//! Narrows the catalog in a fixed order: category, features, region, distance.
//! Each stage takes the previous stage's output; an empty filter list passes its
//! input through unchanged.

use crate::data::{CategoryMap, CityCoordinates};
use crate::error::{AppError, AppResult};
use crate::models::{BusinessRecord, Candidate, Category, CityCoordinate, Feature, State};
use crate::services::geo::{haversine, neighbor_states};

/// Keeps businesses tagged with at least one of `categories`
pub fn filter_by_category<'a>(
    candidates: Vec<&'a BusinessRecord>,
    categories: &[Category],
    category_map: &CategoryMap,
) -> Vec<&'a BusinessRecord> {
    if categories.is_empty() {
        return candidates;
    }
    candidates
        .into_iter()
        .filter(|b| category_map.intersects(&b.business_id, categories))
        .collect()
}

/// Keeps businesses that offer every one of `features`
pub fn filter_by_features<'a>(
    candidates: Vec<&'a BusinessRecord>,
    features: &[Feature],
) -> Vec<&'a BusinessRecord> {
    if features.is_empty() {
        return candidates;
    }
    candidates
        .into_iter()
        .filter(|b| b.features.contains_all(features))
        .collect()
}

/// Keeps businesses in `state` or one of its neighbors
pub fn filter_by_region(candidates: Vec<&BusinessRecord>, state: State) -> Vec<&BusinessRecord> {
    let region = neighbor_states(state);
    candidates
        .into_iter()
        .filter(|b| region.contains(&b.state))
        .collect()
}

/// Keeps businesses exactly in `state`
pub fn filter_by_state(candidates: Vec<&BusinessRecord>, state: State) -> Vec<&BusinessRecord> {
    candidates.into_iter().filter(|b| b.state == state).collect()
}

/// Finds the centroid used as the distance origin for `city`
pub fn resolve_origin<'a>(
    coordinates: &'a CityCoordinates,
    state: State,
    city: &str,
) -> AppResult<&'a CityCoordinate> {
    coordinates.centroid(state, city).ok_or_else(|| {
        AppError::LookupMiss(format!("missing coordinate for {}, {}", city, state))
    })
}

/// Annotates each business with its distance from the origin and keeps those within `radius_km`
pub fn filter_by_distance<'a>(
    candidates: Vec<&'a BusinessRecord>,
    origin_lat: f64,
    origin_lon: f64,
    radius_km: f64,
) -> Vec<Candidate<'a>> {
    candidates
        .into_iter()
        .map(|business| Candidate {
            business,
            distance_km: haversine(origin_lat, origin_lon, business.latitude, business.longitude),
        })
        .filter(|c| c.distance_km <= radius_km)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeatureFlags, WeeklySchedule};

    fn business(id: &str, state: State, lat: f64, lon: f64, features: &[Feature]) -> BusinessRecord {
        BusinessRecord {
            business_id: id.to_string(),
            business_int_id: 0,
            name: id.to_string(),
            address: String::new(),
            city: "Columbia".to_string(),
            state,
            schedule: WeeklySchedule::default(),
            latitude: lat,
            longitude: lon,
            features: features.iter().copied().collect::<FeatureFlags>(),
        }
    }

    fn fixture() -> (Vec<BusinessRecord>, CategoryMap) {
        let records = vec![
            business("taco", State::MO, 38.95, -92.33, &[Feature::Delivery, Feature::Takeout]),
            business("pizza", State::MO, 38.96, -92.30, &[Feature::Delivery]),
            business("burrito", State::IL, 38.63, -90.20, &[Feature::Takeout]),
            business("sushi", State::CA, 34.05, -118.24, &[Feature::Delivery, Feature::Takeout]),
        ];
        let map = CategoryMap::new(vec![
            ("taco".to_string(), Category::Mexican),
            ("burrito".to_string(), Category::Mexican),
            ("burrito".to_string(), Category::FastFood),
            ("pizza".to_string(), Category::Pizzerias),
            ("sushi".to_string(), Category::JapaneseAsian),
        ]);
        (records, map)
    }

    fn ids(candidates: &[&BusinessRecord]) -> Vec<String> {
        candidates.iter().map(|b| b.business_id.clone()).collect()
    }

    #[test]
    fn test_category_filter() {
        let (records, map) = fixture();
        let all: Vec<&BusinessRecord> = records.iter().collect();

        let mexican = filter_by_category(all.clone(), &[Category::Mexican], &map);
        assert_eq!(ids(&mexican), vec!["taco", "burrito"]);

        let any = filter_by_category(all.clone(), &[Category::Pizzerias, Category::FastFood], &map);
        assert_eq!(ids(&any), vec!["pizza", "burrito"]);

        assert_eq!(filter_by_category(all.clone(), &[], &map), all);
    }

    #[test]
    fn test_feature_filter_identity_on_empty() {
        let (records, _) = fixture();
        let all: Vec<&BusinessRecord> = records.iter().collect();
        assert_eq!(filter_by_features(all.clone(), &[]), all);
    }

    #[test]
    fn test_feature_filter_requires_every_flag() {
        let (records, _) = fixture();
        let all: Vec<&BusinessRecord> = records.iter().collect();
        let wanted = [Feature::Delivery, Feature::Takeout];

        let kept = filter_by_features(all, &wanted);
        assert_eq!(ids(&kept), vec!["taco", "sushi"]);
        for b in kept {
            for f in wanted {
                assert!(b.features.contains(f));
            }
        }
    }

    #[test]
    fn test_features_filter_chains_on_category_output() {
        let (records, map) = fixture();
        let all: Vec<&BusinessRecord> = records.iter().collect();

        // both present: features narrow the category result
        let chained = filter_by_features(
            filter_by_category(all.clone(), &[Category::Mexican], &map),
            &[Feature::Delivery],
        );
        assert_eq!(ids(&chained), vec!["taco"]);

        // features alone start from the full catalog and reach other categories
        let features_only = filter_by_features(all, &[Feature::Delivery]);
        assert_eq!(ids(&features_only), vec!["taco", "pizza", "sushi"]);
    }

    #[test]
    fn test_region_filter_includes_neighbors() {
        let (records, _) = fixture();
        let all: Vec<&BusinessRecord> = records.iter().collect();

        let region = filter_by_region(all.clone(), State::MO);
        assert_eq!(ids(&region), vec!["taco", "pizza", "burrito"]);

        let region = filter_by_region(all.clone(), State::CA);
        assert_eq!(ids(&region), vec!["sushi"]);

        let exact = filter_by_state(all, State::MO);
        assert_eq!(ids(&exact), vec!["taco", "pizza"]);
    }

    #[test]
    fn test_distance_filter_annotates_and_bounds() {
        let (records, _) = fixture();
        let all: Vec<&BusinessRecord> = records.iter().collect();

        let near = filter_by_distance(all.clone(), 38.95, -92.33, 25.0);
        let near_ids: Vec<&str> = near.iter().map(|c| c.business.business_id.as_str()).collect();
        assert_eq!(near_ids, vec!["taco", "pizza"]);
        assert_eq!(near[0].distance_km, 0.0);
        assert!(near.iter().all(|c| c.distance_km <= 25.0));

        let wide = filter_by_distance(all, 38.95, -92.33, 250.0);
        assert_eq!(wide.len(), 3);
    }

    #[test]
    fn test_resolve_origin_missing_is_lookup_miss() {
        let coordinates = CityCoordinates::new(vec![(
            State::MO,
            CityCoordinate {
                city: "Columbia".to_string(),
                latitude: 38.95,
                longitude: -92.33,
            },
        )]);

        assert!(resolve_origin(&coordinates, State::MO, "columbia").is_ok());
        assert!(matches!(
            resolve_origin(&coordinates, State::MO, "Springfield"),
            Err(AppError::LookupMiss(_))
        ));
    }
}
