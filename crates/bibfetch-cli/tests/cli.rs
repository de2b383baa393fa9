//! Integration tests for the bibfetch CLI.
//!
//! The API is served by a local mock, so no test touches the network.

use assert_cmd::Command;
use mockito::{Matcher, Server, ServerGuard};
use predicates::prelude::*;

const FOUND: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <entry>
    <id>http://arxiv.org/abs/2304.00123v1</id>
    <updated>2023-04-03T09:00:00Z</updated>
    <published>2023-04-01T17:59:59Z</published>
    <title>Scaling Laws for Citation Managers</title>
    <summary>We study things.</summary>
    <author><name>Jane Q. Smith</name></author>
    <author><name>John Doe</name></author>
    <link href="http://arxiv.org/abs/2304.00123v1" rel="alternate" type="text/html"/>
    <link title="doi" href="http://dx.doi.org/10.1/xyz" rel="related"/>
  </entry>
</feed>"#;

const NOT_FOUND: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry><title>Error</title></entry>
</feed>"#;

// Helper function to create a clean command instance
fn bibfetch() -> Command { Command::cargo_bin("bibfetch").unwrap() }

// Helper to point the CLI at the mock server
fn endpoint(server: &ServerGuard) -> String { format!("{}/api/query", server.url()) }

fn mock_query(server: &mut ServerGuard, identifier: &str, body: &str) -> mockito::Mock {
  server
    .mock("GET", Matcher::Regex("^/api/query".into()))
    .match_query(Matcher::UrlEncoded("id_list".into(), identifier.into()))
    .with_status(200)
    .with_body(body)
    .expect(1)
    .create()
}

#[test]
fn test_missing_identifier() {
  bibfetch().assert().code(1).stderr(predicate::str::contains("Usage:"));
  bibfetch().arg("   ").assert().code(1).stderr(predicate::str::contains("bibfetch <arxiv_id>"));
}

#[test]
fn test_found_prints_metadata_and_bibtex() {
  let mut server = Server::new();
  let mock = mock_query(&mut server, "2304.00123", FOUND);

  bibfetch()
    .arg(" 2304.00123 ")
    .arg("--endpoint")
    .arg(endpoint(&server))
    .assert()
    .success()
    .stdout(predicate::str::contains("--- Metadata ---"))
    .stdout(predicate::str::contains("\"arxiv_id\": \"2304.00123\""))
    .stdout(predicate::str::contains("\"doi\": \"10.1/xyz\""))
    .stdout(predicate::str::contains("--- BibTeX ---"))
    .stdout(predicate::str::contains("@article{Smith20232304,"))
    .stdout(predicate::str::contains("author = {Jane Q. Smith and John Doe},"))
    .stdout(predicate::str::contains("primaryClass = {cs.LG},"));

  mock.assert();
}

#[test]
fn test_primary_class_flag() {
  let mut server = Server::new();
  let _mock = mock_query(&mut server, "2304.00123", FOUND);

  bibfetch()
    .args(["2304.00123", "--primary-class", "stat.ML", "--endpoint"])
    .arg(endpoint(&server))
    .assert()
    .success()
    .stdout(predicate::str::contains("primaryClass = {stat.ML},"));
}

#[test]
fn test_not_found_prints_error_json() {
  let mut server = Server::new();
  let mock = mock_query(&mut server, "9999.99999", NOT_FOUND);

  bibfetch()
    .arg("9999.99999")
    .arg("--endpoint")
    .arg(endpoint(&server))
    .assert()
    .success()
    .stdout(predicate::str::diff(
      "{\n  \"error\": \"Paper ID '9999.99999' not found or invalid.\"\n}\n",
    ));

  mock.assert();
}

#[test]
fn test_key_without_dot_fails() {
  let mut server = Server::new();
  let _mock = mock_query(&mut server, "hep-th/9901001", FOUND);

  bibfetch()
    .arg("hep-th/9901001")
    .arg("--endpoint")
    .arg(endpoint(&server))
    .assert()
    .code(1)
    .stdout(predicate::str::contains("Malformed metadata"))
    .stdout(predicate::str::contains("@article").not());
}
