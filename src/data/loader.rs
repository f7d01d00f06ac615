use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use ndarray::Array2;

use super::{Catalog, CategoryMap, CityCoordinates, PipelineSettings, RecommenderContext, UserIndex};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{BusinessRecord, Category, CityCoordinate, Feature, FeatureFlags, State, WeeklySchedule};
use crate::services::factorization::{FactorizationModel, ModelBundle};
use crate::services::scoring::{DenseMatrix, FeatureMatrices};

/// Accepts the boolean spellings found in exported tables
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "1.0" => Ok(true),
        "false" | "0" | "0.0" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!("invalid flag '{}'", other))),
    }
}

#[derive(Debug, Deserialize)]
struct BusinessRow {
    business_id: String,
    business_id_int: u32,
    name: String,
    #[serde(default)]
    address: String,
    city: String,
    state: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    monday: String,
    #[serde(default)]
    tuesday: String,
    #[serde(default)]
    wednesday: String,
    #[serde(default)]
    thursday: String,
    #[serde(default)]
    friday: String,
    #[serde(default)]
    saturday: String,
    #[serde(default)]
    sunday: String,
    #[serde(default, deserialize_with = "deserialize_flag")]
    accepts_credit_cards: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    delivery: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    takeout: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    wheelchair_accessible: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    bike_parking: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    good_for_kids: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    dogs_allowed: bool,
}

impl BusinessRow {
    fn into_record(self, state: State) -> BusinessRecord {
        let features = FeatureFlags::default()
            .with(Feature::AcceptsCreditCards, self.accepts_credit_cards)
            .with(Feature::Delivery, self.delivery)
            .with(Feature::Takeout, self.takeout)
            .with(Feature::WheelchairAccessible, self.wheelchair_accessible)
            .with(Feature::BikeParking, self.bike_parking)
            .with(Feature::GoodForKids, self.good_for_kids)
            .with(Feature::DogsAllowed, self.dogs_allowed);

        BusinessRecord {
            business_id: self.business_id,
            business_int_id: self.business_id_int,
            name: self.name,
            address: self.address,
            city: self.city,
            state,
            schedule: WeeklySchedule {
                monday: self.monday,
                tuesday: self.tuesday,
                wednesday: self.wednesday,
                thursday: self.thursday,
                friday: self.friday,
                saturday: self.saturday,
                sunday: self.sunday,
            },
            latitude: self.latitude,
            longitude: self.longitude,
            features,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserRow {
    user_id: String,
    user_id_int: u32,
}

#[derive(Debug, Deserialize)]
struct CategoryRow {
    business_id: String,
    category_general: String,
}

#[derive(Debug, Deserialize)]
struct CoordinateRow {
    state: String,
    city: String,
    latitude: f64,
    longitude: f64,
}

/// Parses the business catalog, skipping rows outside the state whitelist
pub fn read_catalog<R: Read>(reader: R) -> AppResult<Catalog> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in csv_reader.deserialize::<BusinessRow>() {
        let row = row?;
        match State::parse(&row.state) {
            Some(state) => records.push(row.into_record(state)),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, "Skipped businesses outside the state whitelist");
    }

    Catalog::new(records)
}

pub fn read_user_index<R: Read>(reader: R, sentinel_user_id: &str) -> AppResult<UserIndex> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let rows = csv_reader
        .deserialize::<UserRow>()
        .map(|row| row.map(|r| (r.user_id, r.user_id_int)))
        .collect::<Result<Vec<_>, _>>()?;
    UserIndex::new(rows, sentinel_user_id)
}

/// Parses the business → category association. Rows for businesses missing
/// from `catalog` are skipped; unknown category names are an error.
pub fn read_category_map<R: Read>(reader: R, catalog: &Catalog) -> AppResult<CategoryMap> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    let mut orphaned = 0usize;

    for row in csv_reader.deserialize::<CategoryRow>() {
        let row = row?;
        let category = Category::parse(&row.category_general).ok_or_else(|| {
            AppError::Data(format!("unknown category '{}'", row.category_general))
        })?;
        if catalog.get(&row.business_id).is_none() {
            orphaned += 1;
            continue;
        }
        rows.push((row.business_id, category));
    }

    if orphaned > 0 {
        tracing::warn!(orphaned, "Skipped category rows for unknown businesses");
    }

    Ok(CategoryMap::new(rows))
}

pub fn read_city_coordinates<R: Read>(reader: R) -> AppResult<CityCoordinates> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for row in csv_reader.deserialize::<CoordinateRow>() {
        let row = row?;
        let Some(state) = State::parse(&row.state) else {
            tracing::warn!(state = %row.state, city = %row.city, "Skipped coordinate outside the state whitelist");
            continue;
        };
        rows.push((
            state,
            CityCoordinate {
                city: row.city,
                latitude: row.latitude,
                longitude: row.longitude,
            },
        ));
    }

    Ok(CityCoordinates::new(rows))
}

pub fn read_matrix<R: Read>(reader: R) -> AppResult<Array2<f32>> {
    let matrix: DenseMatrix = serde_json::from_reader(reader)?;
    matrix.into_array()
}

pub fn read_model<R: Read>(reader: R) -> AppResult<FactorizationModel> {
    let bundle: ModelBundle = serde_json::from_reader(reader)?;
    FactorizationModel::from_bundle(bundle)
}

fn open(path: &Path) -> AppResult<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| AppError::Data(format!("{}: {}", path.display(), e)))
}

/// Loads every static table and the model named in `config`
pub fn load_context(config: &Config) -> AppResult<RecommenderContext> {
    let catalog = read_catalog(open(&config.data_path(&config.businesses_file))?)?;
    let users = read_user_index(
        open(&config.data_path(&config.users_file))?,
        &config.sentinel_user_id,
    )?;
    let categories = read_category_map(open(&config.data_path(&config.categories_file))?, &catalog)?;
    let coordinates = read_city_coordinates(open(&config.data_path(&config.coordinates_file))?)?;

    let features = FeatureMatrices::new(
        read_matrix(open(&config.data_path(&config.user_features_file))?)?,
        read_matrix(open(&config.data_path(&config.item_features_file))?)?,
    );
    let model = read_model(open(&config.data_path(&config.model_file))?)?;
    model.check_features(&features)?;

    tracing::info!(
        businesses = catalog.len(),
        users = users.len(),
        categorized = categories.len(),
        cities = coordinates.len(),
        components = model.components(),
        "Reference data loaded"
    );

    Ok(RecommenderContext::new(
        catalog,
        users,
        categories,
        coordinates,
        features,
        Arc::new(model),
        PipelineSettings::from(config),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUSINESSES: &str = "\
business_id,business_id_int,name,address,city,state,latitude,longitude,monday,tuesday,wednesday,thursday,friday,saturday,sunday,accepts_credit_cards,delivery,takeout,wheelchair_accessible,bike_parking,good_for_kids,dogs_allowed
b-1,0,La Cocina,12 Broadway,Columbia,MO,38.95,-92.33,11:0-22:0,11:0-22:0,11:0-22:0,11:0-22:0,11:0-23:0,11:0-23:0,,True,1,false,0,,true,False
b-2,1,Gone West,1 Coast Hwy,Portland,OR,45.5,-122.6,,,,,,,,true,true,true,true,true,true,true
b-3,2,Hot Chicken,5 Music Row,Nashville,tn,36.16,-86.78,,,,,,,,0,0,1,0,0,0,0
";

    #[test]
    fn test_read_catalog() {
        let catalog = read_catalog(BUSINESSES.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);

        let cocina = catalog.get("b-1").unwrap();
        assert_eq!(cocina.state, State::MO);
        assert_eq!(cocina.schedule.friday, "11:0-23:0");
        assert_eq!(cocina.schedule.sunday, "");
        assert!(cocina.features.contains(Feature::AcceptsCreditCards));
        assert!(cocina.features.contains(Feature::Delivery));
        assert!(!cocina.features.contains(Feature::Takeout));
        assert!(!cocina.features.contains(Feature::BikeParking));
        assert!(cocina.features.contains(Feature::GoodForKids));

        assert!(catalog.get("b-2").is_none());
        assert_eq!(catalog.get_by_int_id(2).map(|b| b.state), Some(State::TN));
    }

    #[test]
    fn test_read_catalog_rejects_bad_flag() {
        let data = "\
business_id,business_id_int,name,city,state,latitude,longitude,delivery
b-1,0,X,Columbia,MO,38.9,-92.3,maybe
";
        assert!(matches!(read_catalog(data.as_bytes()), Err(AppError::Data(_))));
    }

    #[test]
    fn test_read_user_index() {
        let data = "user_id,user_id_int\nU123,0\nNUEVO_USUARIO,1\n";
        let users = read_user_index(data.as_bytes(), "NUEVO_USUARIO").unwrap();
        assert_eq!(users.lookup("U123"), Some(0));
        assert_eq!(users.sentinel(), Some("NUEVO_USUARIO"));
    }

    #[test]
    fn test_read_category_map() {
        let catalog = read_catalog(BUSINESSES.as_bytes()).unwrap();
        let data = "business_id,category_general\nb-1,MEXICANA\nb-9,PIZZERIAS\nb-3,comida rapida\n";
        let map = read_category_map(data.as_bytes(), &catalog).unwrap();
        assert_eq!(map.categories_of("b-1"), &[Category::Mexican]);
        assert_eq!(map.categories_of("b-3"), &[Category::FastFood]);
        assert!(map.categories_of("b-9").is_empty());

        let bad = "business_id,category_general\nb-1,TACOS\n";
        assert!(matches!(
            read_category_map(bad.as_bytes(), &catalog),
            Err(AppError::Data(_))
        ));
    }

    #[test]
    fn test_read_city_coordinates_keeps_order() {
        let data = "state,city,latitude,longitude\nMO,Columbia,38.95,-92.33\nMO,Kansas City,39.1,-94.58\nXX,Nowhere,0,0\n";
        let coordinates = read_city_coordinates(data.as_bytes()).unwrap();
        let cities: Vec<&str> = coordinates
            .cities(State::MO)
            .iter()
            .map(|c| c.city.as_str())
            .collect();
        assert_eq!(cities, vec!["Columbia", "Kansas City"]);
        assert_eq!(coordinates.len(), 2);
    }

    #[test]
    fn test_read_matrix() {
        let matrix = read_matrix(r#"{"rows": 2, "cols": 1, "data": [0.5, 1.5]}"#.as_bytes()).unwrap();
        assert_eq!(matrix.shape(), &[2, 1]);
        assert_eq!(matrix[[1, 0]], 1.5);
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = open(Path::new("/nonexistent/businesses.csv")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/businesses.csv"));
    }

    #[test]
    fn test_load_context_from_bundled_data() {
        let mut config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        config.data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");

        let ctx = load_context(&config).unwrap();
        assert_eq!(ctx.catalog.len(), 10);
        assert_eq!(ctx.users.sentinel(), Some("NUEVO_USUARIO"));
        assert_eq!(ctx.coordinates.cities(State::MO).len(), 3);
        assert_eq!(
            ctx.categories.categories_of("biz-2"),
            &[Category::Mexican, Category::FastFood]
        );
        assert_eq!(ctx.features.item.nrows(), 10);
    }
}
