use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};

/// Wraps record responses as `{"success": true, "data": ...}` or
/// `{"success": false, "error": "..."}`. Bodies that already carry a
/// `success` key pass through untouched.
pub async fn wrap_response_middleware(req: Request, next: Next) -> Result<Response, StatusCode> {
    let path = req.uri().path().to_string();
    let res = next.run(req).await;

    if !path.starts_with("/api") {
        return Ok(res);
    }

    let status = res.status();
    let is_json = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .map_or(false, |ct| ct.contains("application/json"));

    let (mut parts, body) = res.into_parts();
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => return Err(StatusCode::INTERNAL_SERVER_ERROR),
    };

    let wrapped = if is_json {
        let data: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        envelope(status, data)
    } else {
        // Plain text, e.g. extractor rejections or an empty body
        let msg = String::from_utf8_lossy(&bytes).to_string();
        envelope(status, if msg.is_empty() { Value::Null } else { Value::String(msg) })
    };

    let new_bytes = serde_json::to_vec(&wrapped).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts
        .headers
        .insert(header::CONTENT_LENGTH, HeaderValue::from(new_bytes.len()));

    Ok(Response::from_parts(parts, Body::from(new_bytes)))
}

fn envelope(status: StatusCode, data: Value) -> Value {
    if data.get("success").is_some() {
        return data;
    }
    if status.is_success() {
        return json!({ "success": true, "data": data });
    }

    let error = data
        .as_str()
        .or_else(|| data.get("error").and_then(|v| v.as_str()))
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string());
    json!({ "success": false, "error": error })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_success_and_failure() {
        assert_eq!(
            envelope(StatusCode::OK, json!([1, 2])),
            json!({"success": true, "data": [1, 2]})
        );
        assert_eq!(
            envelope(StatusCode::OK, Value::Null),
            json!({"success": true, "data": null})
        );
        assert_eq!(
            envelope(StatusCode::BAD_REQUEST, json!("Area must be a positive number")),
            json!({"success": false, "error": "Area must be a positive number"})
        );
        assert_eq!(
            envelope(StatusCode::NOT_FOUND, Value::Null),
            json!({"success": false, "error": "404 Not Found"})
        );
    }

    #[test]
    fn leaves_standardized_bodies_alone() {
        let body = json!({"success": false, "error": "Field 9 not found"});
        assert_eq!(envelope(StatusCode::NOT_FOUND, body.clone()), body);
    }
}
