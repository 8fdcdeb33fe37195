use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};

use student_records::cache::ObjectCache;
use student_records::cache::object_cache::MokaCacheWrapper;
use student_records::grading::GradeCalculator;
use student_records::routes;
use student_records::services::StatsGeneration;
use student_records::storage::Storage;
use student_records::storage::sea_orm_storage::SeaOrmStorage;
use student_records::utils::{json_error_handler, query_error_handler};

async fn memory_storage() -> Arc<dyn Storage> {
    let mut opt = sea_orm::ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).sqlx_logging(false);
    let db = sea_orm::Database::connect(opt).await.unwrap();
    Arc::new(SeaOrmStorage::with_connection(db).await.unwrap())
}

macro_rules! test_app {
    ($storage:expr) => {{
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_settings(100, 300));
        test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new($storage))
                .app_data(web::Data::new(cache))
                .app_data(web::Data::new(GradeCalculator::default()))
                .app_data(web::Data::new(StatsGeneration::default()))
                .configure(routes::configure_student_routes),
        )
        .await
    }};
}

fn social_science_student() -> Value {
    json!({
        "first_name": "Sokha",
        "last_name": "Chey",
        "gender": "F",
        "class_type": "social_science",
        "khmer_score": 100.0,
        "math_score": 60.0,
        "history_score": 60.0,
        "geography_score": 60.0,
        "ethics_score": 60.0,
        "earth_science_score": 40.0,
        "foreign_language_score": 35.0
    })
}

#[actix_web::test]
async fn test_student_lifecycle() {
    let app = test_app!(memory_storage().await);

    // 创建
    let req = test::TestRequest::post()
        .uri("/api/v1/students")
        .set_json(social_science_student())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let student = &body["data"]["student"];
    let id = student["id"].as_i64().unwrap();
    // 100 + 60*4 + 40 + (35 - 25)
    assert_eq!(student["total_score"].as_f64().unwrap(), 390.0);
    assert_eq!(student["grade"], "B");
    assert_eq!(student["khmer_max"].as_f64().unwrap(), 125.0);

    // 查询
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/students/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["student"]["first_name"], "Sokha");

    // 统计结果写入缓存
    let req = test::TestRequest::get()
        .uri("/api/v1/students/stats/overview")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["total_students"], 1);
    assert_eq!(body["data"]["grade_distribution"]["B"], 1);

    // 满分后升为 A，缓存应失效
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/students/{id}"))
        .set_json(json!({
            "khmer_score": 125.0,
            "math_score": 75.0,
            "history_score": 75.0,
            "geography_score": 75.0,
            "ethics_score": 75.0,
            "earth_science_score": 50.0
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["student"]["grade"], "A");
    assert_eq!(body["data"]["student"]["total_score"].as_f64().unwrap(), 485.0);

    let req = test::TestRequest::get()
        .uri("/api/v1/students/stats/overview")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["grade_distribution"]["A"], 1);
    assert_eq!(body["data"]["grade_distribution"]["B"], 0);

    // 删除
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/students/{id}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/students/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 2001);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/students/{id}"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn test_listing_and_detailed_stats() {
    let app = test_app!(memory_storage().await);

    for (first, class_type) in [("Dara", "science"), ("Sophea", "social_science")] {
        let mut payload = social_science_student();
        payload["first_name"] = json!(first);
        payload["class_type"] = json!(class_type);
        let req = test::TestRequest::post()
            .uri("/api/v1/students")
            .set_json(payload)
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/students?search=dara&page=1&page_size=10")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["pagination"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["class_type"], "science");

    // 超大页码返回空页而不是出错
    let req = test::TestRequest::get()
        .uri("/api/v1/students?page=9223372036854775807&page_size=10")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 0);
    assert_eq!(body["data"]["pagination"]["total"], 2);
    assert_eq!(body["data"]["pagination"]["page"], 9_223_372_036_854_775_807_i64);

    let req = test::TestRequest::get()
        .uri("/api/v1/students/all")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri("/api/v1/students/stats/detailed?class_type=science")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["total_students"], 1);
    assert!(body["data"]["subject_averages"]["chemistry"].is_object());

    // 无法识别的方向按全部统计
    let req = test::TestRequest::get()
        .uri("/api/v1/students/stats/detailed?class_type=arts")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["total_students"], 2);
}

#[actix_web::test]
async fn test_rejects_invalid_input() {
    let app = test_app!(memory_storage().await);

    let mut payload = social_science_student();
    payload["first_name"] = json!("R2D2");
    let req = test::TestRequest::post()
        .uri("/api/v1/students")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1001);

    let mut payload = social_science_student();
    payload["math_score"] = json!(-5.0);
    let req = test::TestRequest::post()
        .uri("/api/v1/students")
        .set_json(payload)
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::get()
        .uri("/api/v1/students/abc")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::put()
        .uri("/api/v1/students/9999")
        .set_json(json!({ "math_score": 10.0 }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}
