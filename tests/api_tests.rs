use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

use crate::helpers::{TOKEN, spawn_app};

/// Test: Liveness route answers without touching the gateway
#[tokio::test]
async fn test_health_check() -> Result<()> {
    let app = spawn_app("http://unused.invalid").await?;

    let response = reqwest::get(format!("{}/health", app)).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>().await?,
        json!({"status": "healthy", "message": "API SGP-UAZAPI está funcionando"})
    );

    Ok(())
}

/// Test: JSON POST is relayed and wrapped in the success envelope
#[tokio::test]
async fn test_json_post_success_envelope() -> Result<()> {
    let gateway = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send/text"))
        .and(body_json(json!({"number": "5511988887777", "text": "Oi"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "abc"})))
        .expect(1)
        .mount(&gateway)
        .await;

    let app = spawn_app(&gateway.uri()).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/webhook/sgp", app))
        .json(&json!({"to": "11988887777", "msg": "Oi", "token": TOKEN}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>().await?,
        json!({
            "status": "success",
            "message": "Mensagem processada com sucesso",
            "uazapi_response": {"id": "abc"},
        })
    );

    Ok(())
}

/// Test: Form POST on the alternate route reaches the gateway
#[tokio::test]
async fn test_form_post_on_alternate_route() -> Result<()> {
    let gateway = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send/text"))
        .and(body_json(json!({"number": "5511988887777", "text": "Fatura disponível"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "form"})))
        .expect(1)
        .mount(&gateway)
        .await;

    let app = spawn_app(&gateway.uri()).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/webhooks/evolution-uazapi/", app))
        .header("content-type", "application/x-www-form-urlencoded")
        .body(format!("to=11988887777&msg=Fatura+dispon%C3%ADvel&instance_token={}", TOKEN))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Value>().await?["uazapi_response"], json!({"id": "form"}));

    Ok(())
}

/// Test: Multipart form POST is read like any other form
#[tokio::test]
async fn test_multipart_form_post() -> Result<()> {
    let gateway = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send/text"))
        .and(body_json(json!({"number": "5511988887777", "text": "Oi"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "multipart"})))
        .expect(1)
        .mount(&gateway)
        .await;

    let app = spawn_app(&gateway.uri()).await?;

    let body = format!(
        "--sgp-boundary\r\n\
        Content-Disposition: form-data; name=\"to\"\r\n\r\n\
        11988887777\r\n\
        --sgp-boundary\r\n\
        Content-Disposition: form-data; name=\"msg\"\r\n\r\n\
        Oi\r\n\
        --sgp-boundary\r\n\
        Content-Disposition: form-data; name=\"token\"\r\n\r\n\
        {}\r\n\
        --sgp-boundary--\r\n",
        TOKEN
    );

    let response = reqwest::Client::new()
        .post(format!("{}/webhook/sgp", app))
        .header("content-type", "multipart/form-data; boundary=sgp-boundary")
        .body(body)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>().await?["uazapi_response"],
        json!({"id": "multipart"})
    );

    Ok(())
}

/// Test: GET query parameters drive the same pipeline
#[tokio::test]
async fn test_get_query_parameters() -> Result<()> {
    let gateway = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send/menu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "menu"})))
        .expect(1)
        .mount(&gateway)
        .await;

    let app = spawn_app(&gateway.uri()).await?;

    let response = reqwest::Client::new()
        .get(format!("{}/webhook/sgp", app))
        .query(&[
            ("to", "11988887777"),
            ("cliente", "Maria"),
            ("link_pix", "00020126pix"),
            ("token", TOKEN),
        ])
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Value>().await?["uazapi_response"], json!({"id": "menu"}));

    Ok(())
}

/// Test: Gateway failures stay inside a 200 envelope
#[tokio::test]
async fn test_missing_token_is_reported_in_success_envelope() -> Result<()> {
    let app = spawn_app("http://unused.invalid").await?;

    let response = reqwest::Client::new()
        .post(format!("{}/webhook/sgp", app))
        .json(&json!({"number": "11988887777", "text": "Oi"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.json::<Value>().await?;
    assert_eq!(body["status"], "success");
    assert_eq!(
        body["uazapi_response"],
        json!({"error": "Token da instância não fornecido"})
    );

    Ok(())
}

/// Test: Missing number or to is a 400
#[tokio::test]
async fn test_missing_number_is_bad_request() -> Result<()> {
    let app = spawn_app("http://unused.invalid").await?;

    let response = reqwest::Client::new()
        .post(format!("{}/webhook/sgp", app))
        .json(&json!({"msg": "Oi", "token": TOKEN}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>().await?,
        json!({"error": "Campo 'number' (ou 'to') é obrigatório"})
    );

    Ok(())
}

/// Test: Request without any data is a 400
#[tokio::test]
async fn test_empty_request_is_bad_request() -> Result<()> {
    let app = spawn_app("http://unused.invalid").await?;

    let response = reqwest::get(format!("{}/webhook/sgp", app)).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>().await?,
        json!({"error": "Dados não fornecidos"})
    );

    Ok(())
}

/// Test: Unparseable JSON body is an internal error envelope
#[tokio::test]
async fn test_malformed_json_is_internal_error() -> Result<()> {
    let app = spawn_app("http://unused.invalid").await?;

    let response = reqwest::Client::new()
        .post(format!("{}/webhook/sgp", app))
        .header("content-type", "application/json")
        .body("{ invalid json }")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response.json::<Value>().await?;
    assert_eq!(body["status"], "error");
    assert!(body["message"].is_string());

    Ok(())
}
