//! Hand-authored payloads served when no usable model output is available.
//!
//! The values are illustrative Maharashtra figures. A few echo or scale with
//! the request (location, crop, acreage) but no payload ever changes its key
//! set or nesting.

use serde_json::{json, Value};

use super::params::AdvisoryParams;

struct CropProfile {
    key: &'static str,
    name: &'static str,
    msp: u32,
    water_need: &'static str,
    harvest_time: &'static str,
    risk: &'static str,
    description: &'static str,
}

const CROPS: &[CropProfile] = &[
    CropProfile {
        key: "soybean",
        name: "Soybean",
        msp: 4800,
        water_need: "Moderate",
        harvest_time: "90-100 days",
        risk: "Moderate",
        description: "High demand crop, well-suited for Maharashtra black soil in Kharif season",
    },
    CropProfile {
        key: "cotton",
        name: "Cotton",
        msp: 7100,
        water_need: "High",
        harvest_time: "150-180 days",
        risk: "High",
        description: "Traditional cash crop for the region, susceptible to pink bollworm",
    },
    CropProfile {
        key: "moong",
        name: "Moong (Green Gram)",
        msp: 8600,
        water_need: "Low",
        harvest_time: "60-70 days",
        risk: "Low",
        description: "Short-duration crop, fixes nitrogen in soil, can be followed by Rabi crop",
    },
];

fn crop_data(key: &str) -> Value {
    CROPS
        .iter()
        .find(|c| c.key == key)
        .map(|c| {
            json!({
                "name": c.name,
                "msp": c.msp,
                "water_need": c.water_need,
                "harvest_time": c.harvest_time,
                "risk": c.risk,
                "description": c.description,
                "image": format!("{}.jpg", c.key)
            })
        })
        .unwrap_or_else(|| json!({}))
}

/// Mandi prices per quintal. Towns without their own table get the state
/// average.
fn market_data(location: &str) -> Value {
    match location.trim().to_lowercase().as_str() {
        "nashik" => json!({ "soybean": 5200, "cotton": 7500, "moong": 9000 }),
        _ => json!({ "soybean": 5000, "cotton": 7300, "moong": 8800 }),
    }
}

/// `1234567.0` -> `"1,234,567"`. Fractions are rounded away.
pub(crate) fn group_thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0 {
        out.insert(0, '-');
    }
    out
}

fn rupees(value: f64) -> String {
    format!("₹{}", group_thousands(value))
}

/// Whole numbers print without a decimal point.
fn plain_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

pub fn crop_recommendation(params: &AdvisoryParams) -> Value {
    let location = params.text("location", "Nashik");
    let soil_type = params.text("soil_type", "Black Soil");
    let irrigation = params.text("irrigation", "Rain-fed");

    let recommendations = if soil_type == "Black Soil" && irrigation == "Rain-fed" {
        json!([
            {
                "crop": "soybean",
                "confidence": 85,
                "reason": "Perfect match for black soil and rain-fed conditions",
                "data": crop_data("soybean")
            },
            {
                "crop": "moong",
                "confidence": 75,
                "reason": "Short duration crop suitable for current season",
                "data": crop_data("moong")
            }
        ])
    } else {
        json!([
            {
                "crop": "cotton",
                "confidence": 80,
                "reason": "Suitable for various soil types with irrigation",
                "data": crop_data("cotton")
            }
        ])
    };

    json!({
        "location": location,
        "recommendations": recommendations,
        "market_data": market_data(&location)
    })
}

pub fn disease_diagnosis(_params: &AdvisoryParams) -> Value {
    json!({
        "disease": "Yellow Mosaic Virus",
        "crop": "Soybean",
        "confidence": 92,
        "severity": "Moderate",
        "solutions": {
            "organic": "Spray neem oil solution (2ml per liter of water)",
            "chemical": "Use Thiamethoxam-based pesticide as per recommended dosage",
            "preventive": "Remove and burn affected plants, maintain field hygiene"
        }
    })
}

pub fn market_prices(params: &AdvisoryParams) -> Value {
    let location = params.text("location", "Nashik");
    json!({
        "location": location,
        "current_prices": market_data(&location),
        "market_trend": "Prices are stable with slight upward trend",
        "price_forecast": "Expected 5-10% increase in next 30 days",
        "demand_analysis": "High demand for pulses and oilseeds"
    })
}

pub fn irrigation_plan(params: &AdvisoryParams) -> Value {
    let crop = params.text("crop", "").to_lowercase();
    let sunny = params.text("weather", "sunny").eq_ignore_ascii_case("sunny");
    let water_needed = match crop.as_str() {
        "soybean" if sunny => 25,
        "soybean" => 15,
        "cotton" if sunny => 35,
        "cotton" => 25,
        _ => 20,
    };

    json!({
        "water_needed_liters": water_needed,
        "frequency": "Every 3-4 days",
        "best_time": "Early morning or evening",
        "method": "Drip irrigation recommended",
        "tips": "Avoid watering during peak sunlight hours",
        "weather_adjustment": "Reduce frequency during rainy days",
        "cost_optimization": "Use rainwater harvesting"
    })
}

pub fn fertilizer_plan(params: &AdvisoryParams) -> Value {
    let (n, p, k) = match params.text("crop", "").to_lowercase().as_str() {
        "cotton" => (60, 30, 25),
        "wheat" => (40, 20, 15),
        "rice" => (45, 22, 18),
        _ => (50, 25, 20),
    };

    json!({
        "npk_ratio": format!("{}:{}:{}", n, p, k),
        "quantity_per_acre": {
            "nitrogen": format!("{} kg", n),
            "phosphorus": format!("{} kg", p),
            "potassium": format!("{} kg", k)
        },
        "application_timing": "Apply during land preparation and top dressing",
        "application_method": "Mix with soil during ploughing",
        "organic_alternatives": "Use farmyard manure and vermicompost",
        "cost_analysis": "Approximately ₹2000-3000 per acre",
        "soil_health_tips": "Maintain soil pH between 6.0-7.5"
    })
}

pub fn weather_summary(params: &AdvisoryParams) -> Value {
    json!({
        "location": params.text("location", "Nashik"),
        "current_weather": {
            "temperature": "32°C",
            "humidity": "65%",
            "wind_speed": "12 km/h",
            "condition": "Partly Cloudy"
        },
        "forecast": [
            {"day": "Today", "temperature": "32°C", "condition": "Sunny", "agricultural_impact": "Good for crop growth"},
            {"day": "Tomorrow", "temperature": "28°C", "condition": "Cloudy", "agricultural_impact": "Moderate irrigation needed"},
            {"day": "Day 3", "temperature": "25°C", "condition": "Rainy", "agricultural_impact": "Reduce irrigation"},
            {"day": "Day 4", "temperature": "27°C", "condition": "Cloudy", "agricultural_impact": "Normal farming activities"},
            {"day": "Day 5", "temperature": "30°C", "condition": "Sunny", "agricultural_impact": "Monitor water needs"}
        ],
        "agricultural_impact": "Favorable weather for Kharif crops",
        "farming_recommendations": "Continue normal farming activities, monitor soil moisture",
        "alerts": "No severe weather alerts"
    })
}

pub fn soil_analysis(_params: &AdvisoryParams) -> Value {
    json!({
        "soil_health_score": "7.5/10",
        "health_status": "Good",
        "nutrient_analysis": {
            "nitrogen_status": "Adequate",
            "phosphorus_status": "Deficient",
            "potassium_status": "Good"
        },
        "ph_analysis": {
            "current_status": "Slightly Acidic",
            "recommendation": "Add lime to raise pH to 6.5-7.0"
        },
        "organic_matter_analysis": "Moderate organic matter content. Consider adding compost.",
        "suitable_crops": ["Soybean", "Cotton", "Wheat", "Pulses"],
        "soil_amendments": ["Farmyard manure", "Vermicompost", "Lime"],
        "long_term_plan": "Implement crop rotation and organic farming practices"
    })
}

pub fn news_digest(_params: &AdvisoryParams) -> Value {
    json!({
        "news": [
            {
                "headline": "Record Soybean Production Expected This Year",
                "summary": "Maharashtra is expected to achieve record soybean production this Kharif season due to favorable monsoon conditions.",
                "date": "July 23, 2025",
                "category": "Market",
                "relevance": "High - affects crop planning and market decisions",
                "source": "Agricultural Department"
            },
            {
                "headline": "New Digital Platform for MSP Payments",
                "summary": "The government has launched a new digital platform for direct MSP payments to farmers.",
                "date": "July 22, 2025",
                "category": "Policy",
                "relevance": "High - ensures timely payments",
                "source": "PM-KISAN Portal"
            },
            {
                "headline": "Organic Farming Certification Simplified",
                "summary": "The certification process for organic farming has been simplified to encourage more farmers.",
                "date": "July 21, 2025",
                "category": "Policy",
                "relevance": "Medium - helps organic farmers",
                "source": "APEDA"
            }
        ]
    })
}

pub fn government_schemes(_params: &AdvisoryParams) -> Value {
    json!({
        "schemes": [
            {
                "name": "Pradhan Mantri Fasal Bima Yojana (PMFBY)",
                "objective": "Insurance coverage and financial support when notified crops fail due to natural calamities, pests or diseases.",
                "benefit": "Financial stability against crop loss."
            },
            {
                "name": "PM Kisan Samman Nidhi (PM-KISAN)",
                "objective": "Direct income support to landholding farmer families.",
                "benefit": "₹6,000 per year paid in three instalments."
            },
            {
                "name": "Soil Health Card Scheme",
                "objective": "Periodic soil testing with crop-wise nutrient recommendations.",
                "benefit": "Balanced fertilizer use and lower input costs."
            }
        ]
    })
}

pub fn yield_prediction(params: &AdvisoryParams) -> Value {
    let base_yield = match params.text("crop", "").to_lowercase().as_str() {
        "soybean" => 12.0,
        "cotton" => 8.0,
        "wheat" => 25.0,
        "rice" => 30.0,
        "moong" => 6.0,
        _ => 15.0,
    };
    let total_yield = base_yield * params.number("land_area", 5.0);

    json!({
        "expected_yield_per_acre": format!("{} quintals", plain_number(base_yield)),
        "total_expected_yield": format!("{} quintals", plain_number(total_yield)),
        "confidence_level": "Medium",
        "yield_factors": {
            "positive_factors": ["Good soil quality", "Adequate irrigation"],
            "negative_factors": ["Weather uncertainty", "Pest risk"]
        },
        "optimization_tips": [
            "Apply balanced fertilizers",
            "Monitor soil moisture regularly",
            "Implement pest management"
        ],
        "risk_factors": ["Drought conditions", "Pest attacks", "Price fluctuations"],
        "expected_revenue": rupees(total_yield * 5000.0),
        "market_price_assumption": "₹5,000 per quintal"
    })
}

pub fn farming_calculator(params: &AdvisoryParams) -> Value {
    let land_area = params.number("land_area", 5.0);
    let expected_yield = params.number("expected_yield", 0.0).trunc();
    let total_cost = 15000.0 * land_area;
    let revenue = expected_yield * 5000.0;
    let profit = revenue - total_cost;
    let margin = if total_cost > 0.0 {
        profit / total_cost * 100.0
    } else {
        0.0
    };

    json!({
        "cost_breakdown": {
            "seeds": rupees(3000.0 * land_area),
            "fertilizers": rupees(4000.0 * land_area),
            "pesticides": rupees(2000.0 * land_area),
            "irrigation": rupees(3000.0 * land_area),
            "labor": rupees(2000.0 * land_area),
            "machinery": rupees(1000.0 * land_area),
            "other": rupees(1000.0 * land_area)
        },
        "total_cost": rupees(total_cost),
        "expected_revenue": rupees(revenue),
        "net_profit": rupees(profit),
        "profit_margin": format!("{:.1}%", margin),
        "roi": format!("{:.1}%", margin),
        "optimization_tips": [
            "Use organic fertilizers to reduce costs",
            "Implement drip irrigation for water efficiency"
        ],
        "risk_assessment": "Moderate risk due to weather dependency"
    })
}

pub fn farm_analytics(_params: &AdvisoryParams) -> Value {
    json!({
        "performance_insights": [
            "Soybean yield expected to increase by 15% with current practices",
            "Cotton field shows signs of pest pressure - monitoring needed",
            "Labor efficiency improved by 20% this month",
            "Water usage optimized by implementing drip irrigation"
        ],
        "recommendations": [
            "Apply organic fertilizer to improve soil health in Field 2",
            "Schedule pest monitoring for cotton crop next week",
            "Consider crop rotation for Field 3 to prevent soil depletion",
            "Increase labor allocation during harvesting season"
        ],
        "financial_projections": {
            "expected_profit": "₹85,000",
            "risk_factors": ["Weather uncertainty", "Market price fluctuations", "Pest outbreaks"],
            "optimization_opportunities": ["Reduce fertilizer costs by 15%", "Improve irrigation efficiency", "Optimize labor scheduling"]
        },
        "crop_health_summary": {
            "overall_health": "Good",
            "issues_detected": ["Minor pest activity in cotton", "Slight nutrient deficiency in Field 2"],
            "preventive_measures": ["Regular pest monitoring", "Balanced fertilizer application", "Crop rotation planning"]
        },
        "labor_efficiency": {
            "current_efficiency": "85%",
            "improvement_suggestions": ["Implement task scheduling system", "Provide training for new equipment", "Optimize work assignments"]
        },
        "resource_optimization": {
            "water_usage": "Efficient with drip irrigation system",
            "fertilizer_efficiency": "Good, but can be improved with soil testing",
            "cost_reduction_opportunities": ["Bulk purchase of inputs", "Equipment sharing with neighboring farms", "Organic farming practices"]
        }
    })
}

pub fn task_optimization(_params: &AdvisoryParams) -> Value {
    json!({
        "optimized_schedule": [
            {
                "task": "Irrigation",
                "worker": "Ramesh Kumar",
                "field": "Field 1",
                "priority": "High",
                "estimated_duration": "4 hours",
                "best_time": "Early morning"
            },
            {
                "task": "Fertilizer Application",
                "worker": "Lakshmi Devi",
                "field": "Field 2",
                "priority": "Medium",
                "estimated_duration": "6 hours",
                "best_time": "Morning"
            },
            {
                "task": "Pest Monitoring",
                "worker": "Mohan Singh",
                "field": "Field 3",
                "priority": "Medium",
                "estimated_duration": "2 hours",
                "best_time": "Afternoon"
            }
        ],
        "efficiency_improvements": [
            "Group similar tasks to reduce travel time",
            "Assign workers based on skill sets",
            "Schedule high-priority tasks during optimal weather",
            "Use equipment sharing to reduce costs"
        ],
        "resource_allocation": {
            "labor_optimization": "Optimal worker assignment based on skills and availability",
            "equipment_usage": "Efficient equipment sharing and maintenance scheduling",
            "time_management": "Prioritized task scheduling for maximum productivity"
        },
        "risk_mitigation": [
            "Backup workers for critical tasks",
            "Weather contingency plans",
            "Equipment maintenance schedules",
            "Regular progress monitoring"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1000.0), "1,000");
        assert_eq!(group_thousands(1234567.4), "1,234,567");
        assert_eq!(group_thousands(-75000.0), "-75,000");
    }

    #[test]
    fn crop_recommendation_follows_soil_and_irrigation() {
        let rainfed = crop_recommendation(&AdvisoryParams::new());
        let crops: Vec<&str> = rainfed["recommendations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["crop"].as_str().unwrap())
            .collect();
        assert_eq!(crops, vec!["soybean", "moong"]);
        assert_eq!(rainfed["market_data"]["soybean"], 5200);

        let irrigated = crop_recommendation(
            &AdvisoryParams::new()
                .with("location", "Pune")
                .with("irrigation", "Drip"),
        );
        assert_eq!(irrigated["recommendations"][0]["crop"], "cotton");
        assert_eq!(irrigated["location"], "Pune");
        assert_eq!(irrigated["market_data"]["soybean"], 5000);
    }

    #[test]
    fn irrigation_water_depends_on_crop_and_weather() {
        let p = |crop: &str, weather: &str| {
            irrigation_plan(&AdvisoryParams::new().with("crop", crop).with("weather", weather))
                ["water_needed_liters"]
                .clone()
        };
        assert_eq!(p("soybean", "sunny"), 25);
        assert_eq!(p("soybean", "rainy"), 15);
        assert_eq!(p("cotton", "sunny"), 35);
        assert_eq!(p("wheat", "sunny"), 20);
    }

    #[test]
    fn yield_scales_with_land_area() {
        let v = yield_prediction(&AdvisoryParams::new().with("crop", "Soybean").with("land_area", 3));
        assert_eq!(v["expected_yield_per_acre"], "12 quintals");
        assert_eq!(v["total_expected_yield"], "36 quintals");
        assert_eq!(v["expected_revenue"], "₹180,000");
    }

    #[test]
    fn calculator_computes_margin() {
        let v = farming_calculator(
            &AdvisoryParams::new()
                .with("land_area", 2)
                .with("expected_yield", 10),
        );
        assert_eq!(v["total_cost"], "₹30,000");
        assert_eq!(v["expected_revenue"], "₹50,000");
        assert_eq!(v["net_profit"], "₹20,000");
        assert_eq!(v["profit_margin"], "66.7%");
    }
}
