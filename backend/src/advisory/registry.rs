//! One table entry per advisory operation: persona, prompt inputs, expected
//! response shape and fallback payload.

use super::fallbacks;
use super::params::AdvisoryParams;
use super::schema::{FieldSpec, Shape};
use super::{Operation, OperationSpec};
use crate::fields;

type Inputs = Vec<(&'static str, String)>;

const CROP_DATA: &[FieldSpec] = fields![
    "name" => Shape::Text,
    "msp" => Shape::Scalar,
    "water_need" => Shape::Scalar,
    "harvest_time" => Shape::Scalar,
    "risk" => Shape::Scalar,
];

const CROP_RECOMMENDATION: &[FieldSpec] = fields![
    "location" => Shape::Text,
    "recommendations" => Shape::Records(fields![
        "crop" => Shape::Text,
        "confidence" => Shape::Scalar,
        "reason" => Shape::Text,
        "data" => Shape::Object(CROP_DATA),
    ]),
    "market_data" => Shape::Object(&[]),
];

const DISEASE_DIAGNOSIS: &[FieldSpec] = fields![
    "disease" => Shape::Text,
    "crop" => Shape::Text,
    "confidence" => Shape::Scalar,
    "severity" => Shape::Text,
    "solutions" => Shape::Object(fields![
        "organic" => Shape::Text,
        "chemical" => Shape::Text,
        "preventive" => Shape::Text,
    ]),
];

const MARKET_PRICES: &[FieldSpec] = fields![
    "location" => Shape::Text,
    "current_prices" => Shape::Object(&[]),
    "market_trend" => Shape::Text,
    "price_forecast" => Shape::Text,
    "demand_analysis" => Shape::Text,
];

const IRRIGATION_PLAN: &[FieldSpec] = fields![
    "water_needed_liters" => Shape::Scalar,
    "frequency" => Shape::Text,
    "best_time" => Shape::Text,
    "method" => Shape::Text,
    "tips" => Shape::Scalar,
    "weather_adjustment" => Shape::Text,
    "cost_optimization" => Shape::Text,
];

const FERTILIZER_PLAN: &[FieldSpec] = fields![
    "npk_ratio" => Shape::Text,
    "quantity_per_acre" => Shape::Object(fields![
        "nitrogen" => Shape::Scalar,
        "phosphorus" => Shape::Scalar,
        "potassium" => Shape::Scalar,
    ]),
    "application_timing" => Shape::Text,
    "application_method" => Shape::Text,
    "organic_alternatives" => Shape::Scalar,
    "cost_analysis" => Shape::Text,
    "soil_health_tips" => Shape::Scalar,
];

const WEATHER_SUMMARY: &[FieldSpec] = fields![
    "location" => Shape::Text,
    "current_weather" => Shape::Object(fields![
        "temperature" => Shape::Scalar,
        "humidity" => Shape::Scalar,
        "condition" => Shape::Text,
    ]),
    "forecast" => Shape::Records(fields![
        "day" => Shape::Text,
        "temperature" => Shape::Scalar,
        "condition" => Shape::Text,
    ]),
    "agricultural_impact" => Shape::Text,
    "farming_recommendations" => Shape::Scalar,
    "alerts" => Shape::Scalar,
];

const SOIL_ANALYSIS: &[FieldSpec] = fields![
    "soil_health_score" => Shape::Scalar,
    "health_status" => Shape::Text,
    "nutrient_analysis" => Shape::Object(fields![
        "nitrogen_status" => Shape::Text,
        "phosphorus_status" => Shape::Text,
        "potassium_status" => Shape::Text,
    ]),
    "ph_analysis" => Shape::Object(fields![
        "current_status" => Shape::Text,
        "recommendation" => Shape::Text,
    ]),
    "organic_matter_analysis" => Shape::Text,
    "suitable_crops" => Shape::List,
    "soil_amendments" => Shape::List,
    "long_term_plan" => Shape::Scalar,
];

const NEWS_DIGEST: &[FieldSpec] = fields![
    "news" => Shape::Records(fields![
        "headline" => Shape::Text,
        "summary" => Shape::Text,
        "date" => Shape::Text,
        "category" => Shape::Text,
        "source" => Shape::Text,
    ]),
];

const GOVERNMENT_SCHEMES: &[FieldSpec] = fields![
    "schemes" => Shape::Records(fields![
        "name" => Shape::Text,
        "objective" => Shape::Text,
        "benefit" => Shape::Text,
    ]),
];

const YIELD_PREDICTION: &[FieldSpec] = fields![
    "expected_yield_per_acre" => Shape::Scalar,
    "total_expected_yield" => Shape::Scalar,
    "confidence_level" => Shape::Text,
    "yield_factors" => Shape::Object(fields![
        "positive_factors" => Shape::List,
        "negative_factors" => Shape::List,
    ]),
    "optimization_tips" => Shape::List,
    "risk_factors" => Shape::List,
    "expected_revenue" => Shape::Scalar,
    "market_price_assumption" => Shape::Scalar,
];

const FARMING_CALCULATOR: &[FieldSpec] = fields![
    "cost_breakdown" => Shape::Object(fields![
        "seeds" => Shape::Scalar,
        "fertilizers" => Shape::Scalar,
        "pesticides" => Shape::Scalar,
        "irrigation" => Shape::Scalar,
        "labor" => Shape::Scalar,
        "machinery" => Shape::Scalar,
        "other" => Shape::Scalar,
    ]),
    "total_cost" => Shape::Scalar,
    "expected_revenue" => Shape::Scalar,
    "net_profit" => Shape::Scalar,
    "profit_margin" => Shape::Scalar,
    "roi" => Shape::Scalar,
    "optimization_tips" => Shape::List,
    "risk_assessment" => Shape::Text,
];

const FARM_ANALYTICS: &[FieldSpec] = fields![
    "performance_insights" => Shape::List,
    "recommendations" => Shape::List,
    "financial_projections" => Shape::Object(fields![
        "expected_profit" => Shape::Scalar,
        "risk_factors" => Shape::List,
        "optimization_opportunities" => Shape::List,
    ]),
    "crop_health_summary" => Shape::Object(fields![
        "overall_health" => Shape::Text,
        "issues_detected" => Shape::List,
        "preventive_measures" => Shape::List,
    ]),
    "labor_efficiency" => Shape::Object(fields![
        "current_efficiency" => Shape::Scalar,
        "improvement_suggestions" => Shape::List,
    ]),
    "resource_optimization" => Shape::Object(fields![
        "water_usage" => Shape::Text,
        "fertilizer_efficiency" => Shape::Text,
        "cost_reduction_opportunities" => Shape::List,
    ]),
];

const TASK_OPTIMIZATION: &[FieldSpec] = fields![
    "optimized_schedule" => Shape::Records(fields![
        "task" => Shape::Text,
        "worker" => Shape::Text,
        "field" => Shape::Text,
        "priority" => Shape::Text,
        "estimated_duration" => Shape::Scalar,
        "best_time" => Shape::Text,
    ]),
    "efficiency_improvements" => Shape::List,
    "resource_allocation" => Shape::Object(fields![
        "labor_optimization" => Shape::Text,
        "equipment_usage" => Shape::Text,
        "time_management" => Shape::Text,
    ]),
    "risk_mitigation" => Shape::List,
];

fn crop_inputs(p: &AdvisoryParams) -> Inputs {
    vec![
        ("Location", p.text("location", "Nashik")),
        ("Soil Type", p.text("soil_type", "Black Soil")),
        ("Irrigation", p.text("irrigation", "Rain-fed")),
        ("Land Area (acres)", p.text("land_area", "5")),
        ("Season", p.text("season", "Kharif")),
        ("Budget (₹)", p.text("budget", "50000")),
    ]
}

fn no_inputs(_: &AdvisoryParams) -> Inputs {
    Vec::new()
}

fn location_inputs(p: &AdvisoryParams) -> Inputs {
    vec![("Location", p.text("location", "Nashik"))]
}

fn irrigation_inputs(p: &AdvisoryParams) -> Inputs {
    vec![
        ("Crop", p.text("crop", "Soybean")),
        ("Soil Type", p.text("soil_type", "Black Soil")),
        ("Land Area (acres)", p.text("land_area", "5")),
        ("Current Weather", p.text("weather", "sunny")),
        ("Growth Stage", p.text("growth_stage", "vegetative")),
    ]
}

fn fertilizer_inputs(p: &AdvisoryParams) -> Inputs {
    vec![
        ("Crop", p.text("crop", "Soybean")),
        ("Soil Type", p.text("soil_type", "Black Soil")),
        ("Growth Stage", p.text("growth_stage", "vegetative")),
        ("Land Area (acres)", p.text("land_area", "5")),
    ]
}

fn soil_inputs(p: &AdvisoryParams) -> Inputs {
    vec![
        ("Soil Type", p.text("soil_type", "Black Soil")),
        ("pH Level", p.text("ph_level", "unknown")),
        ("Organic Matter (%)", p.text("organic_matter", "unknown")),
        ("Nitrogen", p.text("nitrogen", "unknown")),
        ("Phosphorus", p.text("phosphorus", "unknown")),
        ("Potassium", p.text("potassium", "unknown")),
        ("Location", p.text("location", "Maharashtra")),
    ]
}

fn yield_inputs(p: &AdvisoryParams) -> Inputs {
    vec![
        ("Crop", p.text("crop", "Soybean")),
        ("Land Area (acres)", p.text("land_area", "5")),
        ("Soil Type", p.text("soil_type", "Black Soil")),
        ("Irrigation Type", p.text("irrigation_type", "Rain-fed")),
        ("Fertilizer Used", p.text("fertilizer_used", "none specified")),
        ("Weather Condition", p.text("weather_condition", "normal")),
        ("Location", p.text("location", "Maharashtra")),
    ]
}

fn calculator_inputs(p: &AdvisoryParams) -> Inputs {
    vec![
        ("Crop", p.text("crop", "Soybean")),
        ("Land Area (acres)", p.text("land_area", "5")),
        ("Expected Yield (quintals)", p.text("expected_yield", "0")),
        ("Input Costs", p.text("input_costs", "{}")),
    ]
}

fn analytics_inputs(p: &AdvisoryParams) -> Inputs {
    vec![("Farm Data", p.text("farm_data", "{}"))]
}

fn task_inputs(p: &AdvisoryParams) -> Inputs {
    vec![
        ("Tasks", p.text("tasks", "[]")),
        ("Workers", p.text("workers", "[]")),
        ("Fields", p.text("fields", "[]")),
    ]
}

/// Indexed by `Operation as usize`.
pub(super) static REGISTRY: [OperationSpec; 13] = [
    OperationSpec {
        operation: Operation::CropRecommendation,
        persona: "You are an expert agricultural advisor for Maharashtra, India.",
        instruction: "Recommend the 2-3 best crops for these conditions, with reasons and current market prices per quintal.",
        temperature: 0.4,
        needs_image: false,
        inputs: crop_inputs,
        schema: CROP_RECOMMENDATION,
        fallback: fallbacks::crop_recommendation,
    },
    OperationSpec {
        operation: Operation::DiseaseDiagnosis,
        persona: "You are an expert plant pathologist.",
        instruction: "Analyze the attached plant image, identify any disease and suggest organic, chemical and preventive treatments.",
        temperature: 0.2,
        needs_image: true,
        inputs: no_inputs,
        schema: DISEASE_DIAGNOSIS,
        fallback: fallbacks::disease_diagnosis,
    },
    OperationSpec {
        operation: Operation::MarketPrices,
        persona: "You are an agricultural market analyst for Maharashtra, India.",
        instruction: "Give current mandi prices per quintal for the major crops, the price trend, a 30-day forecast and demand analysis.",
        temperature: 0.3,
        needs_image: false,
        inputs: location_inputs,
        schema: MARKET_PRICES,
        fallback: fallbacks::market_prices,
    },
    OperationSpec {
        operation: Operation::IrrigationPlan,
        persona: "You are an irrigation specialist for Maharashtra farms.",
        instruction: "Produce a detailed irrigation plan with water quantity, schedule, method and weather adjustments.",
        temperature: 0.3,
        needs_image: false,
        inputs: irrigation_inputs,
        schema: IRRIGATION_PLAN,
        fallback: fallbacks::irrigation_plan,
    },
    OperationSpec {
        operation: Operation::FertilizerPlan,
        persona: "You are a soil nutrition expert for Maharashtra agriculture.",
        instruction: "Recommend an NPK plan with per-acre quantities, timing, method, organic alternatives and cost.",
        temperature: 0.3,
        needs_image: false,
        inputs: fertilizer_inputs,
        schema: FERTILIZER_PLAN,
        fallback: fallbacks::fertilizer_plan,
    },
    OperationSpec {
        operation: Operation::WeatherSummary,
        persona: "You are an agricultural meteorologist.",
        instruction: "Summarize current weather and a 5-day forecast and explain the impact on farming activities.",
        temperature: 0.5,
        needs_image: false,
        inputs: location_inputs,
        schema: WEATHER_SUMMARY,
        fallback: fallbacks::weather_summary,
    },
    OperationSpec {
        operation: Operation::SoilAnalysis,
        persona: "You are a soil scientist advising Indian farmers.",
        instruction: "Assess soil health from these readings and recommend amendments, suitable crops and a long-term plan.",
        temperature: 0.3,
        needs_image: false,
        inputs: soil_inputs,
        schema: SOIL_ANALYSIS,
        fallback: fallbacks::soil_analysis,
    },
    OperationSpec {
        operation: Operation::NewsDigest,
        persona: "You are an agricultural news editor covering Maharashtra, India.",
        instruction: "List the 3 most relevant recent agricultural news items for farmers.",
        temperature: 0.7,
        needs_image: false,
        inputs: no_inputs,
        schema: NEWS_DIGEST,
        fallback: fallbacks::news_digest,
    },
    OperationSpec {
        operation: Operation::GovernmentSchemes,
        persona: "You are an agricultural policy expert in India.",
        instruction: "List the 3 most impactful government schemes for farmers with their objective and benefit.",
        temperature: 0.2,
        needs_image: false,
        inputs: no_inputs,
        schema: GOVERNMENT_SCHEMES,
        fallback: fallbacks::government_schemes,
    },
    OperationSpec {
        operation: Operation::YieldPrediction,
        persona: "You are a crop yield modelling expert for Maharashtra agriculture.",
        instruction: "Predict the yield per acre and in total, the factors affecting it and the expected revenue.",
        temperature: 0.3,
        needs_image: false,
        inputs: yield_inputs,
        schema: YIELD_PREDICTION,
        fallback: fallbacks::yield_prediction,
    },
    OperationSpec {
        operation: Operation::FarmingCalculator,
        persona: "You are a farm economics expert.",
        instruction: "Break down the cultivation costs and compute revenue, net profit, margin and ROI.",
        temperature: 0.2,
        needs_image: false,
        inputs: calculator_inputs,
        schema: FARMING_CALCULATOR,
        fallback: fallbacks::farming_calculator,
    },
    OperationSpec {
        operation: Operation::FarmAnalytics,
        persona: "You are a farm management consultant.",
        instruction: "Analyze this farm data and give performance insights, recommendations and financial projections.",
        temperature: 0.5,
        needs_image: false,
        inputs: analytics_inputs,
        schema: FARM_ANALYTICS,
        fallback: fallbacks::farm_analytics,
    },
    OperationSpec {
        operation: Operation::TaskOptimization,
        persona: "You are a farm operations planner.",
        instruction: "Assign these tasks to workers and fields in an optimized schedule, with efficiency improvements.",
        temperature: 0.4,
        needs_image: false,
        inputs: task_inputs,
        schema: TASK_OPTIMIZATION,
        fallback: fallbacks::task_optimization,
    },
];
