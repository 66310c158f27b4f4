use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use petcore_core::{DataSourceError, PetDataSource};
use petcore_domain::{Gender, Pet, Size};
use petcore_http::HttpPetDataSource;

struct Captured {
    request_line: String,
    headers: Vec<String>,
    body: String,
}

/// Serves one canned response and reports what the client sent.
fn serve_once(status: &'static str, body: &'static str) -> (String, mpsc::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone"));
        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("request line");

        let mut headers = Vec::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("header");
            let line = line.trim_end().to_string();
            if line.is_empty() {
                break;
            }
            if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                content_length = value.trim().parse().unwrap_or(0);
            }
            headers.push(line);
        }
        let mut body_bytes = vec![0u8; content_length];
        reader.read_exact(&mut body_bytes).expect("body");

        let mut stream = stream;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).expect("write");
        stream.flush().expect("flush");

        let _ = tx.send(Captured {
            request_line: request_line.trim_end().to_string(),
            headers,
            body: String::from_utf8_lossy(&body_bytes).to_string(),
        });
    });

    (format!("http://{addr}"), rx)
}

fn client(base: &str, token: Option<&str>) -> HttpPetDataSource {
    HttpPetDataSource::new(base, Duration::from_secs(5), token.map(str::to_string))
}

#[test]
fn fetches_owner_pets_with_bearer_token() {
    let (base, rx) = serve_once(
        "200 OK",
        r#"[{"id":"p1","name":"Rex","animalType":"DOG","gender":"MALE","birthDate":"2022-08-02T00:00:00.000Z"}]"#,
    );
    let pets = client(&base, Some("secret"))
        .fetch_owner_pets("owner-1")
        .expect("pets decode");

    assert_eq!(pets.len(), 1);
    assert_eq!(pets[0].name.as_deref(), Some("Rex"));
    assert_eq!(pets[0].gender, Some(Gender::Male));

    let captured = rx.recv_timeout(Duration::from_secs(5)).expect("captured");
    assert_eq!(captured.request_line, "GET /pets/owner/owner-1 HTTP/1.1");
    assert!(captured
        .headers
        .iter()
        .any(|h| h.eq_ignore_ascii_case("authorization: Bearer secret")));
}

#[test]
fn one_loose_record_does_not_sink_the_list() {
    let (base, _rx) = serve_once(
        "200 OK",
        r#"[{"id":"p1","name":"Rex","gender":"","size":""},{"id":"p2","name":"Mia","gender":"female","size":"small"}]"#,
    );
    let pets = client(&base, None)
        .fetch_owner_pets("owner-1")
        .expect("pets decode");

    assert_eq!(pets.len(), 2);
    assert_eq!(pets[0].gender, None);
    assert_eq!(pets[0].size, None);
    assert_eq!(pets[1].gender, Some(Gender::Female));
    assert_eq!(pets[1].size, Some(Size::Small));
}

#[test]
fn add_pet_posts_camel_case_json() {
    let (base, rx) = serve_once("201 Created", r#"{"id":"new-1","name":"Rex","ownerId":"o1"}"#);
    let pet = Pet {
        owner_id: Some("o1".into()),
        breed_id: Some("b-9".into()),
        ..Pet::named("Rex", "DOG")
    };
    let stored = client(&base, None).add_pet(&pet).expect("created");
    assert_eq!(stored.id.as_deref(), Some("new-1"));

    let captured = rx.recv_timeout(Duration::from_secs(5)).expect("captured");
    assert_eq!(captured.request_line, "POST /pets HTTP/1.1");
    let sent: serde_json::Value = serde_json::from_str(&captured.body).expect("json body");
    assert_eq!(sent["ownerId"], "o1");
    assert_eq!(sent["breedId"], "b-9");
    assert_eq!(sent["animalType"], "DOG");
    assert!(sent.get("id").is_none());
}

#[test]
fn not_found_status_maps_to_not_found() {
    let (base, _rx) = serve_once("404 Not Found", r#"{"message":"pet p9 not found"}"#);
    let err = client(&base, None).fetch_pet_by_id("p9").unwrap_err();
    assert_eq!(err, DataSourceError::NotFound("pet p9 not found".into()));
}

#[test]
fn server_error_keeps_status_code() {
    let (base, _rx) = serve_once("503 Service Unavailable", r#"{"error":"maintenance"}"#);
    let err = client(&base, None).fetch_pet_types().unwrap_err();
    assert_eq!(
        err,
        DataSourceError::Status {
            status: 503,
            message: "maintenance".into()
        }
    );
}

#[test]
fn malformed_body_is_a_decode_error() {
    let (base, _rx) = serve_once("200 OK", r#"{"not":"a list"}"#);
    let err = client(&base, None).fetch_pet_types().unwrap_err();
    assert!(matches!(err, DataSourceError::Decode(_)));
}

#[test]
fn refused_connection_is_a_transport_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr")
    };
    let err = client(&format!("http://{addr}"), None)
        .fetch_user_by_id("u1")
        .unwrap_err();
    assert!(matches!(err, DataSourceError::Transport(_)));
}
