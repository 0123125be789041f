use serde::Serialize;
use url::Url;

use crate::error::PredictError;
use crate::features::FeatureVector;
use crate::types::newtypes::EndpointUrl;
use crate::utils::const_settings::CONTENT_TYPE_JSON;

/// JSON body of `POST /predizer`: `{"features": [..]}`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PredictRequest<'a> {
    pub features: &'a FeatureVector,
}

#[derive(Clone, Debug)]
pub struct WireRequest {
    pub url: Url,
    pub body: serde_json::Value,
    pub content_type: &'static str,
}

pub fn build_predict_request(
    endpoint: &EndpointUrl,
    features: &FeatureVector,
) -> Result<WireRequest, PredictError> {
    let body = serde_json::to_value(PredictRequest { features })
        .map_err(|e| PredictError::Serialization(e.to_string()))?;
    Ok(WireRequest {
        url: endpoint.as_url().clone(),
        body,
        content_type: CONTENT_TYPE_JSON,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::features::parse_features;

    #[test]
    fn body_has_single_features_field() {
        let features = parse_features("1,2,3");
        let wire = build_predict_request(&EndpointUrl::default(), &features).unwrap();
        assert_eq!(wire.body, json!({ "features": [1.0, 2.0, 3.0] }));
        assert_eq!(wire.content_type, "application/json");
        assert_eq!(wire.url.as_str(), "http://localhost:8004/predizer");
    }

    #[test]
    fn nan_goes_out_as_null() {
        let features = parse_features("1,x,3");
        let wire = build_predict_request(&EndpointUrl::default(), &features).unwrap();
        assert_eq!(wire.body, json!({ "features": [1.0, null, 3.0] }));
    }
}
