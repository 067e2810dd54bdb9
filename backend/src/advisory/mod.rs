//! Advisory request pipeline.
//!
//! Every advisory feature goes through [`Advisor::advise`]: build a prompt
//! from the operation's registry entry, ask the model, strip fences, parse,
//! check the shape, and on any failure along the way serve the operation's
//! fallback payload instead. Nothing in here ever returns an error to the
//! route layer.

mod fallbacks;
pub mod params;
mod registry;
pub mod schema;

pub use params::AdvisoryParams;

use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::ai::{parse_model_json, AiBackend, AiError, GeminiBackend, GenerationRequest, InlineImage};
use crate::config::{AiConfig, CredentialSource};
use schema::FieldSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    CropRecommendation,
    DiseaseDiagnosis,
    MarketPrices,
    IrrigationPlan,
    FertilizerPlan,
    WeatherSummary,
    SoilAnalysis,
    NewsDigest,
    GovernmentSchemes,
    YieldPrediction,
    FarmingCalculator,
    FarmAnalytics,
    TaskOptimization,
}

impl Operation {
    pub const ALL: [Operation; 13] = [
        Operation::CropRecommendation,
        Operation::DiseaseDiagnosis,
        Operation::MarketPrices,
        Operation::IrrigationPlan,
        Operation::FertilizerPlan,
        Operation::WeatherSummary,
        Operation::SoilAnalysis,
        Operation::NewsDigest,
        Operation::GovernmentSchemes,
        Operation::YieldPrediction,
        Operation::FarmingCalculator,
        Operation::FarmAnalytics,
        Operation::TaskOptimization,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Operation::CropRecommendation => "crop_recommendation",
            Operation::DiseaseDiagnosis => "disease_diagnosis",
            Operation::MarketPrices => "market_prices",
            Operation::IrrigationPlan => "irrigation_plan",
            Operation::FertilizerPlan => "fertilizer_plan",
            Operation::WeatherSummary => "weather_summary",
            Operation::SoilAnalysis => "soil_analysis",
            Operation::NewsDigest => "news_digest",
            Operation::GovernmentSchemes => "government_schemes",
            Operation::YieldPrediction => "yield_prediction",
            Operation::FarmingCalculator => "farming_calculator",
            Operation::FarmAnalytics => "farm_analytics",
            Operation::TaskOptimization => "task_optimization",
        }
    }

    pub fn spec(self) -> &'static OperationSpec {
        &registry::REGISTRY[self as usize]
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Registry entry describing how one operation talks to the model and what
/// it answers with when the model is out of the picture.
pub struct OperationSpec {
    pub operation: Operation,
    pub persona: &'static str,
    pub instruction: &'static str,
    pub temperature: f64,
    pub needs_image: bool,
    pub inputs: fn(&AdvisoryParams) -> Vec<(&'static str, String)>,
    pub schema: &'static [FieldSpec],
    pub fallback: fn(&AdvisoryParams) -> Value,
}

impl OperationSpec {
    /// Persona, task, the caller's inputs and a literal example of the
    /// expected JSON. The example is the fallback payload for the same inputs
    /// so the two can never drift apart.
    pub fn prompt(&self, params: &AdvisoryParams) -> String {
        let mut prompt = format!("{}\n\n{}\n", self.persona, self.instruction);

        let inputs = (self.inputs)(params);
        if !inputs.is_empty() {
            prompt.push_str("\nInputs:\n");
            for (label, value) in inputs {
                prompt.push_str(&format!("- {}: {}\n", label, value));
            }
        }

        prompt.push_str(
            "\nYour response MUST be a single valid JSON object with exactly this structure \
             (keys and nesting), no prose before or after it:\n",
        );
        prompt.push_str(&format!("{:#}", (self.fallback)(params)));
        prompt
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdvisorySource {
    Live { model: String },
    Fallback { reason: &'static str },
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvisoryOutcome {
    pub operation: Operation,
    pub source: AdvisorySource,
    pub payload: Value,
}

impl AdvisoryOutcome {
    pub fn is_live(&self) -> bool {
        matches!(self.source, AdvisorySource::Live { .. })
    }
}

impl IntoResponse for AdvisoryOutcome {
    fn into_response(self) -> Response {
        let source = if self.is_live() { "live" } else { "fallback" };
        ([("x-advisory-source", source)], Json(self.payload)).into_response()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Advisor {
    backend: Option<Arc<dyn AiBackend>>,
}

impl Advisor {
    pub fn new(backend: Option<Arc<dyn AiBackend>>) -> Self {
        Advisor { backend }
    }

    /// Builds the Gemini-backed advisor. A missing key or a client that fails
    /// to build leaves the advisor in fallback-only mode.
    pub fn from_config(config: &AiConfig) -> Self {
        if config.source == CredentialSource::Missing {
            tracing::warn!(
                "⚠️ Gemini API key not found. Set GEMINI_API_KEY or add it to the secrets file; \
                 advisory features will serve fallback data"
            );
            return Advisor::new(None);
        }

        match GeminiBackend::from_config(config) {
            Ok(backend) => {
                tracing::info!(
                    "✅ Gemini backend ready (model: {}, key from {:?})",
                    backend.model_name(),
                    config.source
                );
                Advisor::new(Some(Arc::new(backend)))
            }
            Err(e) => {
                tracing::warn!("⚠️ Failed to initialise Gemini backend: {}", e);
                Advisor::new(None)
            }
        }
    }

    pub fn is_live(&self) -> bool {
        self.backend.is_some()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.backend.as_deref().map(|b| b.model_name())
    }

    pub async fn advise(
        &self,
        operation: Operation,
        params: &AdvisoryParams,
        image: Option<InlineImage>,
    ) -> AdvisoryOutcome {
        let spec = operation.spec();

        let Some(backend) = self.backend.as_deref() else {
            tracing::debug!("{}: no AI backend, serving fallback", operation);
            return fallback_outcome(spec, params, &AiError::NotConfigured("no API key".into()));
        };

        match request_live(backend, spec, params, image).await {
            Ok(mut payload) => {
                tracing::info!("{}: live response from {}", operation, backend.model_name());
                tag_ai_used(&mut payload, true);
                AdvisoryOutcome {
                    operation,
                    source: AdvisorySource::Live {
                        model: backend.model_name().to_string(),
                    },
                    payload,
                }
            }
            Err(e) => {
                tracing::warn!("{}: serving fallback ({}): {}", operation, e.kind(), e);
                fallback_outcome(spec, params, &e)
            }
        }
    }
}

async fn request_live(
    backend: &dyn AiBackend,
    spec: &OperationSpec,
    params: &AdvisoryParams,
    image: Option<InlineImage>,
) -> Result<Value, AiError> {
    if spec.needs_image && image.is_none() {
        return Err(AiError::MissingImage);
    }

    let request = GenerationRequest {
        prompt: spec.prompt(params),
        image,
        temperature: spec.temperature,
    };
    let text = backend.generate(&request).await?;
    let payload = parse_model_json(&text)?;
    schema::validate(&payload, spec.schema).map_err(AiError::SchemaMismatch)?;
    Ok(payload)
}

fn fallback_outcome(spec: &OperationSpec, params: &AdvisoryParams, cause: &AiError) -> AdvisoryOutcome {
    let mut payload = (spec.fallback)(params);
    tag_ai_used(&mut payload, false);
    AdvisoryOutcome {
        operation: spec.operation,
        source: AdvisorySource::Fallback {
            reason: cause.kind(),
        },
        payload,
    }
}

fn tag_ai_used(payload: &mut Value, ai_used: bool) {
    if let Some(obj) = payload.as_object_mut() {
        obj.insert("ai_used".to_string(), Value::Bool(ai_used));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FakeBackend;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn key_paths(value: &Value, prefix: &str, out: &mut BTreeSet<String>) {
        match value {
            Value::Object(map) => {
                for (k, v) in map {
                    let path = format!("{}/{}", prefix, k);
                    out.insert(path.clone());
                    key_paths(v, &path, out);
                }
            }
            Value::Array(items) => {
                for item in items {
                    key_paths(item, &format!("{}[]", prefix), out);
                }
            }
            _ => {}
        }
    }

    fn shape_of(value: &Value) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        key_paths(value, "", &mut out);
        out
    }

    fn varied_params() -> Vec<AdvisoryParams> {
        vec![
            AdvisoryParams::new(),
            AdvisoryParams::new()
                .with("location", "Pune")
                .with("soil_type", "Red Soil")
                .with("irrigation", "Drip")
                .with("crop", "cotton")
                .with("weather", "rainy")
                .with("land_area", "12"),
            AdvisoryParams::new()
                .with("crop", "Wheat")
                .with("land_area", 0)
                .with("expected_yield", "not a number")
                .with("location", json!(null)),
            AdvisoryParams::new().with("crop", "rice").with("land_area", 2.5),
        ]
    }

    #[test]
    fn registry_is_indexed_by_operation() {
        for op in Operation::ALL {
            assert_eq!(op.spec().operation, op, "registry slot for {}", op);
        }
    }

    #[test]
    fn every_fallback_matches_its_schema() {
        for op in Operation::ALL {
            let spec = op.spec();
            for params in varied_params() {
                let payload = (spec.fallback)(&params);
                assert_eq!(
                    schema::validate(&payload, spec.schema),
                    Ok(()),
                    "fallback for {} with {:?}",
                    op,
                    params
                );
            }
        }
    }

    #[tokio::test]
    async fn offline_responses_keep_the_fallback_shape_for_any_input() {
        let advisor = Advisor::new(None);
        for op in Operation::ALL {
            let baseline = shape_of(&advisor.advise(op, &AdvisoryParams::new(), None).await.payload);
            for params in varied_params() {
                let outcome = advisor.advise(op, &params, None).await;
                assert_eq!(
                    outcome.source,
                    AdvisorySource::Fallback { reason: "not_configured" }
                );
                assert_eq!(outcome.payload["ai_used"], false);
                assert_eq!(shape_of(&outcome.payload), baseline, "shape drift for {}", op);
            }
        }
    }

    #[tokio::test]
    async fn fenced_live_output_is_passed_through() {
        let params = AdvisoryParams::new();
        for op in Operation::ALL {
            let expected = (op.spec().fallback)(&params);
            let fenced = format!("```json\n{}\n```", expected);
            let advisor = Advisor::new(Some(Arc::new(FakeBackend::replying(&fenced))));
            let image = op
                .spec()
                .needs_image
                .then(|| InlineImage::from_bytes("image/png", b"png"));

            let outcome = advisor.advise(op, &params, image).await;

            assert!(outcome.is_live(), "{} should be live", op);
            let mut payload = outcome.payload;
            assert_eq!(payload.as_object_mut().unwrap().remove("ai_used"), Some(json!(true)));
            assert_eq!(payload, expected);
        }
    }

    #[tokio::test]
    async fn unfenced_live_output_keeps_extra_keys() {
        let reply = json!({
            "news": [{
                "headline": "Monsoon arrives early",
                "summary": "Sowing can start a week ahead.",
                "date": "June 2, 2025",
                "category": "Weather",
                "source": "IMD",
                "url": "https://example.org"
            }],
            "generated_by": "model"
        });
        let advisor = Advisor::new(Some(Arc::new(FakeBackend::replying(&reply.to_string()))));

        let outcome = advisor
            .advise(Operation::NewsDigest, &AdvisoryParams::new(), None)
            .await;

        assert_eq!(outcome.source, AdvisorySource::Live { model: "fake-model".into() });
        assert_eq!(outcome.payload["news"][0]["url"], "https://example.org");
        assert_eq!(outcome.payload["generated_by"], "model");
        assert_eq!(outcome.payload["ai_used"], true);
    }

    #[tokio::test]
    async fn unusable_output_collapses_to_fallback() {
        let params = AdvisoryParams::new().with("crop", "cotton");
        let cases = [
            ("Sorry, I can't help with that.", "invalid_json"),
            ("```json\n{\"unfinished\": \"1:1:1\",\n```", "invalid_json"),
            ("[1, 2, 3]", "invalid_json"),
            ("   ", "empty_response"),
            ("{\"unexpected\": \"value\"}", "schema_mismatch"),
        ];
        for op in Operation::ALL {
            let image = op
                .spec()
                .needs_image
                .then(|| InlineImage::from_bytes("image/png", b"png"));
            for (reply, reason) in cases {
                let advisor = Advisor::new(Some(Arc::new(FakeBackend::replying(reply))));
                let outcome = advisor.advise(op, &params, image.clone()).await;

                assert_eq!(
                    outcome.source,
                    AdvisorySource::Fallback { reason },
                    "{} with reply {:?}",
                    op,
                    reply
                );
                let mut expected = (op.spec().fallback)(&params);
                tag_ai_used(&mut expected, false);
                assert_eq!(outcome.payload, expected, "{} with reply {:?}", op, reply);
            }
        }
    }

    #[test]
    fn partial_fertilizer_output_is_a_schema_mismatch() {
        let spec = Operation::FertilizerPlan.spec();
        let partial = json!({ "npk_ratio": "60:30:25" });
        assert!(schema::validate(&partial, spec.schema).is_err());
    }

    #[tokio::test]
    async fn api_failures_collapse_to_fallback() {
        for (status, reason) in [(401, "auth"), (429, "api"), (500, "api")] {
            let advisor = Advisor::new(Some(Arc::new(FakeBackend::failing(status))));
            let outcome = advisor
                .advise(Operation::GovernmentSchemes, &AdvisoryParams::new(), None)
                .await;
            assert_eq!(outcome.source, AdvisorySource::Fallback { reason });
            assert_eq!(outcome.payload["ai_used"], false);
            assert_eq!(outcome.payload["schemes"].as_array().unwrap().len(), 3);
        }
    }

    #[tokio::test]
    async fn diagnosis_forwards_image_and_requires_one() {
        let fake = Arc::new(FakeBackend::replying(
            &fallbacks::disease_diagnosis(&AdvisoryParams::new()).to_string(),
        ));
        let advisor = Advisor::new(Some(fake.clone()));

        let without = advisor
            .advise(Operation::DiseaseDiagnosis, &AdvisoryParams::new(), None)
            .await;
        assert_eq!(without.source, AdvisorySource::Fallback { reason: "missing_image" });
        assert!(fake.requests().is_empty());

        let image = InlineImage::from_bytes("image/jpeg", &[0xff, 0xd8, 0xff]);
        let with = advisor
            .advise(Operation::DiseaseDiagnosis, &AdvisoryParams::new(), Some(image.clone()))
            .await;
        assert!(with.is_live());

        let requests = fake.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].image, Some(image));
        assert_eq!(requests[0].temperature, 0.2);
    }

    #[test]
    fn prompt_lists_inputs_verbatim_and_embeds_example() {
        let params = AdvisoryParams::new()
            .with("location", "Latur")
            .with("land_area", 7.5)
            .with("budget", "lots");
        let prompt = Operation::CropRecommendation.spec().prompt(&params);

        assert!(prompt.starts_with("You are an expert agricultural advisor"));
        assert!(prompt.contains("- Location: Latur\n"));
        assert!(prompt.contains("- Land Area (acres): 7.5\n"));
        assert!(prompt.contains("- Budget (₹): lots\n"));
        assert!(prompt.contains("- Season: Kharif\n"));
        assert!(prompt.contains("MUST be a single valid JSON object"));
        assert!(prompt.contains("\"recommendations\""));
    }
}
