/// Hybrid latent-factor model
///
/// Production [`Scorer`] backed by pre-trained embeddings. Users and items are
/// represented as the feature-weighted sum of their feature embeddings, and the
/// score is the dot product of the two representations plus both biases.
use ndarray::{Array1, Array2, ArrayView1};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::services::scoring::{DenseMatrix, FeatureMatrices, Scorer, ScoringError};

/// On-disk model bundle
#[derive(Debug, Deserialize)]
pub struct ModelBundle {
    pub user_embeddings: DenseMatrix,
    pub item_embeddings: DenseMatrix,
    pub user_biases: Vec<f32>,
    pub item_biases: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct FactorizationModel {
    /// n_user_features x components
    user_embeddings: Array2<f32>,
    /// n_item_features x components
    item_embeddings: Array2<f32>,
    user_biases: Array1<f32>,
    item_biases: Array1<f32>,
}

impl FactorizationModel {
    pub fn new(
        user_embeddings: Array2<f32>,
        item_embeddings: Array2<f32>,
        user_biases: Array1<f32>,
        item_biases: Array1<f32>,
    ) -> AppResult<Self> {
        if user_embeddings.ncols() != item_embeddings.ncols() {
            return Err(AppError::Data(format!(
                "user embeddings have {} components, item embeddings {}",
                user_embeddings.ncols(),
                item_embeddings.ncols()
            )));
        }
        if user_biases.len() != user_embeddings.nrows() {
            return Err(AppError::Data(format!(
                "{} user biases for {} user features",
                user_biases.len(),
                user_embeddings.nrows()
            )));
        }
        if item_biases.len() != item_embeddings.nrows() {
            return Err(AppError::Data(format!(
                "{} item biases for {} item features",
                item_biases.len(),
                item_embeddings.nrows()
            )));
        }

        Ok(Self {
            user_embeddings,
            item_embeddings,
            user_biases,
            item_biases,
        })
    }

    pub fn from_bundle(bundle: ModelBundle) -> AppResult<Self> {
        Self::new(
            bundle.user_embeddings.into_array()?,
            bundle.item_embeddings.into_array()?,
            Array1::from_vec(bundle.user_biases),
            Array1::from_vec(bundle.item_biases),
        )
    }

    pub fn components(&self) -> usize {
        self.user_embeddings.ncols()
    }

    /// Checks that the feature matrices have one column per embedded feature
    pub fn check_features(&self, features: &FeatureMatrices) -> AppResult<()> {
        if features.user.ncols() != self.user_embeddings.nrows() {
            return Err(AppError::Data(format!(
                "user feature matrix has {} columns, model expects {}",
                features.user.ncols(),
                self.user_embeddings.nrows()
            )));
        }
        if features.item.ncols() != self.item_embeddings.nrows() {
            return Err(AppError::Data(format!(
                "item feature matrix has {} columns, model expects {}",
                features.item.ncols(),
                self.item_embeddings.nrows()
            )));
        }
        Ok(())
    }
}

fn row<'a>(
    matrix: &'a Array2<f32>,
    index: u32,
    kind: &'static str,
) -> Result<ArrayView1<'a, f32>, ScoringError> {
    let position = index as usize;
    if position >= matrix.nrows() {
        return Err(ScoringError::IndexOutOfRange {
            kind,
            index,
            len: matrix.nrows(),
        });
    }
    Ok(matrix.row(position))
}

impl Scorer for FactorizationModel {
    fn predict(
        &self,
        user_index: u32,
        item_ids: &[u32],
        features: &FeatureMatrices,
    ) -> Result<Vec<f32>, ScoringError> {
        let user_row = row(&features.user, user_index, "user")?;
        if user_row.len() != self.user_embeddings.nrows() {
            return Err(ScoringError::Backend(
                "user feature width does not match model".to_string(),
            ));
        }
        let user_repr = user_row.dot(&self.user_embeddings);
        let user_bias = user_row.dot(&self.user_biases);

        item_ids
            .iter()
            .map(|&item_id| {
                let item_row = row(&features.item, item_id, "item")?;
                if item_row.len() != self.item_embeddings.nrows() {
                    return Err(ScoringError::Backend(
                        "item feature width does not match model".to_string(),
                    ));
                }
                let item_repr = item_row.dot(&self.item_embeddings);
                let item_bias = item_row.dot(&self.item_biases);
                Ok(user_repr.dot(&item_repr) + user_bias + item_bias)
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "factorization"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// Two users, three items, one-hot features, two components
    fn model() -> FactorizationModel {
        FactorizationModel::new(
            array![[1.0, 0.0], [0.0, 1.0]],
            array![[2.0, 0.0], [0.0, 3.0], [1.0, 1.0]],
            array![0.5, 0.0],
            array![0.0, 0.0, -1.0],
        )
        .unwrap()
    }

    #[test]
    fn test_predict_with_identity_features() {
        let model = model();
        let features = FeatureMatrices::identity(2, 3);

        let scores = model.predict(0, &[0, 1, 2], &features).unwrap();
        assert_eq!(scores, vec![2.5, 0.5, 0.5]);

        let scores = model.predict(1, &[0, 1, 2], &features).unwrap();
        assert_eq!(scores, vec![0.0, 3.0, 0.0]);
    }

    #[test]
    fn test_predict_with_mixed_features() {
        let model = model();
        // user 0 carries half of each user feature
        let features = FeatureMatrices::new(array![[0.5, 0.5]], Array2::eye(3));

        let scores = model.predict(0, &[1], &features).unwrap();
        // repr (0.5, 0.5) . (0, 3) + 0.25 bias
        assert_eq!(scores, vec![1.75]);
    }

    #[test]
    fn test_out_of_range_indices() {
        let model = model();
        let features = FeatureMatrices::identity(2, 3);

        assert_eq!(
            model.predict(5, &[0], &features),
            Err(ScoringError::IndexOutOfRange {
                kind: "user",
                index: 5,
                len: 2
            })
        );
        assert!(matches!(
            model.predict(0, &[0, 3], &features),
            Err(ScoringError::IndexOutOfRange { kind: "item", .. })
        ));
    }

    #[test]
    fn test_rejects_inconsistent_dimensions() {
        let result = FactorizationModel::new(
            array![[1.0, 0.0]],
            array![[1.0, 0.0, 0.0]],
            array![0.0],
            array![0.0],
        );
        assert!(matches!(result, Err(AppError::Data(_))));

        let result = FactorizationModel::new(
            array![[1.0, 0.0]],
            array![[1.0, 0.0]],
            array![0.0, 1.0],
            array![0.0],
        );
        assert!(matches!(result, Err(AppError::Data(_))));
    }

    #[test]
    fn test_check_features_width() {
        let model = model();
        assert!(model.check_features(&FeatureMatrices::identity(2, 3)).is_ok());
        assert!(model.check_features(&FeatureMatrices::identity(3, 3)).is_err());
    }

    #[test]
    fn test_from_bundle_json() {
        let bundle: ModelBundle = serde_json::from_str(
            r#"{
                "user_embeddings": {"rows": 1, "cols": 2, "data": [1.0, 1.0]},
                "item_embeddings": {"rows": 2, "cols": 2, "data": [1.0, 0.0, 0.0, 2.0]},
                "user_biases": [0.0],
                "item_biases": [0.0, 0.0]
            }"#,
        )
        .unwrap();
        let model = FactorizationModel::from_bundle(bundle).unwrap();
        assert_eq!(model.components(), 2);

        let features = FeatureMatrices::new(array![[1.0]], Array2::eye(2));
        assert_eq!(model.predict(0, &[1, 0], &features).unwrap(), vec![2.0, 1.0]);
    }
}
