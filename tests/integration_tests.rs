extern crate influxdb_writer;

use utilities::{
    assert_result_err, assert_result_ok, create_client, create_client_with_tags,
    received_lines, write_server,
};

use influxdb_writer::{
    BoolOptions, Client, Error, FloatOptions, IntOptions, StringOptions, TagSet,
};
use serde_json::json;
use wiremock::matchers::{body_string, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// INTEGRATION TEST
///
/// This test case tests that a database is created with a `CREATE DATABASE` statement
#[tokio::test]
#[cfg(not(tarpaulin_include))]
async fn test_create_database() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("q", "CREATE DATABASE SUCCESS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server, "test");
    let result = client.create_database("SUCCESS").await;
    assert_result_ok(&result);
}

/// INTEGRATION TEST
///
/// This test case tests that an error reported in the statement result is surfaced
#[tokio::test]
#[cfg(not(tarpaulin_include))]
async fn test_create_database_error_in_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("q", "CREATE DATABASE FOO"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"results": [{"error": "boom"}]})),
        )
        .mount(&server)
        .await;

    let client = create_client(&server, "test");
    let result = client.create_database("FOO").await;
    assert_result_err(&result);
    match result {
        Err(Error::DatabaseError { error }) => assert_eq!(error, "boom"),
        _ => panic!("Should be a DatabaseError: {:?}", result),
    }
}

/// INTEGRATION TEST
///
/// This test case tests that a non-200 answer to `CREATE DATABASE` is an `HttpStatusError`
#[tokio::test]
#[cfg(not(tarpaulin_include))]
async fn test_create_database_bad_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = create_client(&server, "test");
    let result = client.create_database("NOPE").await;
    match result {
        Err(Error::HttpStatusError { code, ref body }) => {
            assert_eq!(code, 400);
            assert_eq!(body, "{}");
        }
        _ => panic!("Should be a HttpStatusError: {:?}", result),
    }
}

/// INTEGRATION TEST
///
/// This test case tests that an empty database name is rejected without a request
#[tokio::test]
#[cfg(not(tarpaulin_include))]
async fn test_create_database_without_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = create_client(&server, "test");
    match client.create_database("").await {
        Err(Error::ValidationError { error }) => assert_eq!(error, "name is required"),
        other => panic!("Should be a ValidationError: {:?}", other),
    }
}

/// INTEGRATION TEST
///
/// This test case tests a raw write into the configured database
#[tokio::test]
#[cfg(not(tarpaulin_include))]
async fn test_write_raw() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/write"))
        .and(query_param("db", "test"))
        .and(body_string("m,t=1 value=1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server, "test");
    let result = client.write("m,t=1 value=1").await;
    assert_result_ok(&result);
}

/// INTEGRATION TEST
///
/// This test case tests that bytes are accepted as well as text
#[tokio::test]
#[cfg(not(tarpaulin_include))]
async fn test_write_raw_bytes() {
    let server = write_server(204).await;

    let client = create_client(&server, "test");
    let result = client.write(b"m value=1".to_vec()).await;
    assert_result_ok(&result);
    assert_eq!(received_lines(&server).await, vec!["m value=1"]);
}

/// INTEGRATION TEST
///
/// This test case tests that `HTTP 200` on write means the points were not written
#[tokio::test]
#[cfg(not(tarpaulin_include))]
async fn test_write_not_written() {
    let server = write_server(200).await;

    let client = create_client(&server, "test");
    let result = client.write("m value=1").await;
    match result {
        Err(Error::NotWrittenError { code, .. }) => assert_eq!(code, 200),
        _ => panic!("Should be a NotWrittenError: {:?}", result),
    }
}

/// INTEGRATION TEST
///
/// This test case tests that any other status fails the write
#[tokio::test]
#[cfg(not(tarpaulin_include))]
async fn test_write_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/write"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"error":"unable to parse"}"#),
        )
        .mount(&server)
        .await;

    let client = create_client(&server, "test");
    let result = client.write("not line protocol").await;
    match result {
        Err(Error::WriteFailedError { code, ref body }) => {
            assert_eq!(code, 400);
            assert_eq!(body, r#"{"error":"unable to parse"}"#);
        }
        _ => panic!("Should be a WriteFailedError: {:?}", result),
    }
}

/// INTEGRATION TEST
///
/// This test case tests connection error
#[tokio::test]
#[cfg(not(tarpaulin_include))]
async fn test_connection_error() {
    let client = Client::new("http://127.0.0.1:10086", "test_connection_error").unwrap();
    let write_result = client.write("m value=1").await;
    assert_result_err(&write_result);
    match write_result {
        Err(Error::ConnectionError { .. }) => {}
        _ => panic!(
            "Should cause a ConnectionError: {}",
            write_result.unwrap_err()
        ),
    }
}

/// INTEGRATION TEST
///
/// This test case tests the line written for each typed write
#[tokio::test]
#[cfg(not(tarpaulin_include))]
async fn test_typed_writes() {
    let server = write_server(204).await;
    let client = create_client(&server, "test");

    assert_result_ok(&client.write_float(FloatOptions::new("m").value(1.5)).await);
    assert_result_ok(&client.write_int(IntOptions::new("m").value(100)).await);
    assert_result_ok(
        &client
            .write_bool(BoolOptions::new("m").value(true).key("ok"))
            .await,
    );
    assert_result_ok(
        &client
            .write_string(StringOptions::new("m").value(r#""text""#).timestamp(42))
            .await,
    );

    assert_eq!(
        received_lines(&server).await,
        vec!["m value=1.5", "m value=100i", "m ok=true", r#"m value="text" 42"#]
    );
}

/// INTEGRATION TEST
///
/// This test case tests that whitespace in measurement names and tag values is escaped
#[tokio::test]
#[cfg(not(tarpaulin_include))]
async fn test_write_escaping() {
    let server = write_server(204).await;
    let client = create_client(&server, "test");

    let result = client
        .write_float(
            FloatOptions::new("my measurement")
                .value(0.5)
                .add_tag("location", "us midwest"),
        )
        .await;
    assert_result_ok(&result);

    assert_eq!(
        received_lines(&server).await,
        vec![r"my\ measurement,location=us\ midwest value=0.5"]
    );
}

/// INTEGRATION TEST
///
/// This test case tests that call tags override default tags of the same key
#[tokio::test]
#[cfg(not(tarpaulin_include))]
async fn test_write_merges_default_tags() {
    let server = write_server(204).await;
    let client = create_client_with_tags(
        &server,
        "test",
        TagSet::new().with("host", "a").with("region", "eu"),
    );

    let result = client
        .write_int(IntOptions::new("cpu").value(3).add_tag("host", "b"))
        .await;
    assert_result_ok(&result);

    assert_eq!(
        received_lines(&server).await,
        vec!["cpu,host=b,region=eu value=3i"]
    );
}

/// INTEGRATION TEST
///
/// This test case tests that a missing value fails before any request is sent
#[tokio::test]
#[cfg(not(tarpaulin_include))]
async fn test_write_float_without_value() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let client = create_client(&server, "test");
    match client.write_float(FloatOptions::new("m")).await {
        Err(Error::ValidationError { error }) => assert_eq!(error, "opts.val is required"),
        other => panic!("Should be a ValidationError: {:?}", other),
    }
}

/// INTEGRATION TEST
///
/// This test case tests that the database is taken from the client when the write is issued
#[tokio::test]
#[cfg(not(tarpaulin_include))]
async fn test_set_database() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/write"))
        .and(query_param("db", "other"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = create_client(&server, "test");
    client.set_database("other");
    assert_eq!(client.database_name(), Some("other"));

    let result = client.write("m value=1").await;
    assert_result_ok(&result);
}

/// INTEGRATION TEST
///
/// This test case tests that build and version are read from the ping response
#[tokio::test]
#[cfg(not(tarpaulin_include))]
async fn test_ping() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(
            ResponseTemplate::new(204)
                .insert_header("X-Influxdb-Build", "OSS")
                .insert_header("X-Influxdb-Version", "1.8.10"),
        )
        .mount(&server)
        .await;

    let client = create_client(&server, "notusedhere");
    let result = client.ping().await;
    assert_result_ok(&result);

    let (build, version) = result.unwrap();
    assert_eq!(build, "OSS");
    assert_eq!(version, "1.8.10");
}
