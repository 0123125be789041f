pub mod error;
pub mod features;
pub mod predictor;
pub mod response;
pub mod types;
pub mod utils;
pub mod wire;

pub use error::PredictError;
pub use features::{FeatureVector, coerce_number, parse_features};
pub use predictor::{HttpPredictor, PredictHttpConfig, Predictor, predict_step};
pub use response::{PredictionOutcome, display_value, parse_outcome};
pub use types::newtypes::{EndpointUrl, RequestId};
pub use utils::const_settings::{CONTENT_TYPE_JSON, DEFAULT_PREDICT_URL};
pub use wire::{PredictRequest, WireRequest, build_predict_request};
