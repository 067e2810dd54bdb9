#[cfg(test)]
mod tests {
    use crate::advisory::Advisor;
    use crate::ai::{AiBackend, FakeBackend, InlineImage};
    use crate::state::AppState;
    use crate::{build_app, db};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BOUNDARY: &str = "farm-test-boundary";

    async fn test_app(backend: Option<Arc<dyn AiBackend>>) -> (Router, TempDir) {
        let uploads = tempfile::tempdir().expect("upload dir");
        let state = AppState {
            pool: db::test_pool().await,
            advisor: Arc::new(Advisor::new(backend)),
            upload_dir: uploads.path().to_path_buf(),
        };
        (build_app(state), uploads)
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Option<String>, Value) {
        let res = app.clone().oneshot(req).await.expect("router never fails");
        let status = res.status();
        let source = res
            .headers()
            .get("x-advisory-source")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, source, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_upload(part_name: &str, file_name: &str, bytes: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{n}\"; filename=\"{f}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n",
            b = BOUNDARY,
            n = part_name,
            f = file_name
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::post("/api/disease-detection")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_field_api_is_enveloped() {
        let (app, _uploads) = test_app(None).await;

        let (status, _, created) = send(
            &app,
            post_json(
                "/api/farm/fields",
                json!({"name": "North Plot", "area": 4.5, "soil_type": "Black Soil", "irrigation_type": "Drip"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["success"], true);
        let id = created["data"]["field_id"].as_i64().unwrap();

        let (_, _, listed) = send(&app, get("/api/farm/fields")).await;
        assert_eq!(
            listed,
            json!({"success": true, "data": [{
                "field_id": id,
                "name": "North Plot",
                "area": 4.5,
                "soil_type": "Black Soil",
                "irrigation_type": "Drip",
                "status": "Active"
            }]})
        );

        let (status, _, deleted) =
            send(&app, post_json(&format!("/api/farm/fields/{}/delete", id), json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted, json!({"success": true, "data": null}));
    }

    #[tokio::test]
    async fn test_record_errors_are_enveloped() {
        let (app, _uploads) = test_app(None).await;

        let (status, _, body) = send(
            &app,
            post_json("/api/farm/fields", json!({"name": "Plot", "area": "four"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());

        let (status, _, body) = send(&app, get("/api/farm/fields/999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"success": false, "error": "Field 999 not found"}));

        let (status, _, body) = send(
            &app,
            post_json(
                "/api/farm/finance",
                json!({"description": "Sale", "amount": 10, "type": "Gift"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_finance_summary_route() {
        let (app, _uploads) = test_app(None).await;
        for (description, kind, amount) in [("Soybean sale", "Income", 10000), ("Labour", "Expense", 3000)] {
            let (status, _, _) = send(
                &app,
                post_json(
                    "/api/farm/finance",
                    json!({"description": description, "type": kind, "amount": amount, "date": "2025-07-20"}),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, _, body) = send(&app, get("/api/farm/finance/summary")).await;
        assert_eq!(
            body["data"],
            json!({"income": 10000.0, "expense": 3000.0, "profit": 7000.0})
        );

        let (_, _, listed) = send(&app, get("/api/farm/finance")).await;
        // Same day, so the later entry comes first.
        assert_eq!(listed["data"][0]["type"], "Expense");
        assert_eq!(listed["data"][1]["date"], "2025-07-20");
    }

    #[tokio::test]
    async fn test_market_search_route() {
        let (app, _uploads) = test_app(None).await;
        for (crop, price) in [("Soybean", 5200), ("Cotton", 7500)] {
            send(
                &app,
                post_json(
                    "/api/market/sell",
                    json!({
                        "farmer_name": "Anil Jadhav",
                        "location": "Nashik",
                        "crop_type": crop,
                        "quantity": 12,
                        "expected_price": price
                    }),
                ),
            )
            .await;
        }

        let (status, _, body) = send(&app, get("/api/market/listings?crop=soy&max_price=")).await;
        assert_eq!(status, StatusCode::OK);
        let listings = body["data"].as_array().unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0]["crop_type"], "Soybean");
    }

    #[tokio::test]
    async fn test_advisory_fallback_is_not_enveloped() {
        let (app, _uploads) = test_app(None).await;

        let (status, source, body) = send(
            &app,
            post_json("/api/crop-recommendation", json!({"location": "Nashik"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(source.as_deref(), Some("fallback"));
        assert!(body.get("success").is_none());
        assert_eq!(body["ai_used"], false);
        assert_eq!(body["recommendations"][0]["crop"], "soybean");

        // An unreadable body still gets an answer built from defaults.
        let garbage = Request::post("/api/irrigation-calculator")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, _, body) = send(&app, garbage).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["water_needed_liters"], 20);

        let (_, _, body) = send(&app, get("/api/market-prices?location=Pune")).await;
        assert_eq!(body["location"], "Pune");

        let (_, _, body) = send(&app, get("/api/government-schemes")).await;
        assert_eq!(body["schemes"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_advisory_live_output_passes_through() {
        let reply = "```json\n{\"news\": [{\"headline\": \"MSP raised\", \"summary\": \"Kharif MSP up 7%\", \
                     \"date\": \"June 1, 2025\", \"category\": \"Policy\", \"source\": \"PIB\"}]}\n```";
        let (app, _uploads) = test_app(Some(Arc::new(FakeBackend::replying(reply)))).await;

        let (status, source, body) = send(&app, get("/api/agricultural-news")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(source.as_deref(), Some("live"));
        assert_eq!(body["news"][0]["headline"], "MSP raised");
        assert_eq!(body["ai_used"], true);
    }

    #[tokio::test]
    async fn test_disease_upload_forwards_image_and_cleans_up() {
        let diagnosis = json!({
            "disease": "Leaf Rust",
            "crop": "Wheat",
            "confidence": 81,
            "severity": "Mild",
            "solutions": {"organic": "Neem", "chemical": "Propiconazole", "preventive": "Resistant seed"}
        });
        let fake = Arc::new(FakeBackend::replying(&diagnosis.to_string()));
        let (app, uploads) = test_app(Some(fake.clone())).await;
        let png = [0x89, b'P', b'N', b'G', 0x0d, 0x0a];

        let (status, source, body) =
            send(&app, multipart_upload("image", "my leaf.png", &png)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(source.as_deref(), Some("live"));
        assert_eq!(body["disease"], "Leaf Rust");
        assert_eq!(body["ai_used"], true);

        let requests = fake.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].image,
            Some(InlineImage::from_bytes("image/png", &png))
        );
        assert_eq!(std::fs::read_dir(uploads.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_repeated_upload_names_are_each_diagnosed() {
        let diagnosis = json!({
            "disease": "Early Blight",
            "crop": "Tomato",
            "confidence": 77,
            "severity": "Moderate",
            "solutions": {"organic": "Copper spray", "chemical": "Mancozeb", "preventive": "Crop rotation"}
        });
        let fake = Arc::new(FakeBackend::replying(&diagnosis.to_string()));
        let (app, uploads) = test_app(Some(fake.clone())).await;

        let first = [0xff, 0xd8, 0x01];
        let second = [0xff, 0xd8, 0x02];
        for bytes in [&first, &second] {
            let (status, source, body) =
                send(&app, multipart_upload("image", "leaf.jpg", bytes)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(source.as_deref(), Some("live"));
            assert_eq!(body["disease"], "Early Blight");
        }

        let images: Vec<_> = fake.requests().into_iter().map(|r| r.image).collect();
        assert_eq!(
            images,
            vec![
                Some(InlineImage::from_bytes("image/jpeg", &first)),
                Some(InlineImage::from_bytes("image/jpeg", &second)),
            ]
        );
        assert_eq!(std::fs::read_dir(uploads.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_disease_upload_rejects_missing_or_foreign_files() {
        let (app, _uploads) = test_app(None).await;

        let (status, _, body) = send(&app, multipart_upload("photo", "leaf.png", b"png")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (status, _, _) = send(&app, multipart_upload("image", "", b"png")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = send(&app, multipart_upload("image", "leaf.bmp", b"BM")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, source, body) =
            send(&app, multipart_upload("image", "leaf.jpg", &[0xff, 0xd8])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(source.as_deref(), Some("fallback"));
        assert_eq!(body["disease"], "Yellow Mosaic Virus");
    }

    #[tokio::test]
    async fn test_status_routes() {
        let (app, _uploads) = test_app(None).await;

        let (status, _, body) = send(&app, get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["database"], true);
        assert_eq!(body["data"]["ai_configured"], false);

        let (_, _, body) = send(&app, get("/api/ai/status")).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["configured"], false);
        assert_eq!(body["data"]["operations"].as_array().unwrap().len(), 13);
    }
}
