use std::net::SocketAddr;

use assert_cmd::Command;
use predicates::prelude::*;

use dhtkv_storage::Db;

/// Sobe o servidor de referência numa thread com runtime próprio.
fn start_server() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            dhtkv_server::serve(listener, Db::new(), 16, std::future::pending()).await;
        });
    });
    addr
}

fn dhtkv(addr: SocketAddr) -> Command {
    let mut cmd = Command::cargo_bin("dhtkv").unwrap();
    cmd.env_remove("DHTKV_HOST")
        .env_remove("DHTKV_PORT")
        .args(["--host", "127.0.0.1", "--port", &addr.port().to_string()]);
    cmd
}

#[test]
fn put_from_stdin_then_get_prints_exact_bytes() {
    let addr = start_server();

    dhtkv(addr)
        .args(["put", "--input=-", "k1"])
        .write_stdin("hello\nworld\n")
        .assert()
        .success()
        .stdout("OK\n");

    dhtkv(addr)
        .args(["get", "k1"])
        .assert()
        .success()
        .stdout("hello\nworld\n")
        .stderr(predicate::str::contains("ttl: "));
}

#[test]
fn get_quiet_writes_nothing_to_stderr() {
    let addr = start_server();
    dhtkv(addr).args(["put", "k", "v"]).assert().success();

    dhtkv(addr)
        .args(["get", "--quiet", "k"])
        .assert()
        .success()
        .stdout("v")
        .stderr(predicate::str::is_empty());
}

#[test]
fn get_unknown_key_prints_nothing() {
    let addr = start_server();
    dhtkv(addr)
        .args(["get", "missing"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn get_to_output_file() {
    let addr = start_server();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("value.bin");

    let input = dir.path().join("input.bin");
    std::fs::write(&input, b"\x00binary\xff").unwrap();
    dhtkv(addr)
        .args(["put", "--input"])
        .arg(&input)
        .arg("blob")
        .assert()
        .success();

    dhtkv(addr)
        .args(["get", "-q", "--output"])
        .arg(&out)
        .arg("blob")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert_eq!(std::fs::read(&out).unwrap(), b"\x00binary\xff");
}

#[test]
fn delete_prints_removed_count() {
    let addr = start_server();
    dhtkv(addr).args(["put", "k", "a"]).assert().success();
    dhtkv(addr).args(["put", "k", "a"]).assert().success();
    dhtkv(addr).args(["put", "k", "b"]).assert().success();

    dhtkv(addr)
        .args(["delete", "k", "a"])
        .assert()
        .success()
        .stdout("2\n");

    dhtkv(addr)
        .args(["get", "-q", "k"])
        .assert()
        .success()
        .stdout("b");
}

#[test]
fn create_twice_fails() {
    let addr = start_server();
    dhtkv(addr).args(["create", "k", "v"]).assert().success().stdout("OK\n");
    dhtkv(addr)
        .args(["create", "k", "w"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("chave já existe"));
}

#[test]
fn endpoint_from_environment() {
    let addr = start_server();
    Command::cargo_bin("dhtkv")
        .unwrap()
        .env("DHTKV_HOST", "127.0.0.1")
        .env("DHTKV_PORT", addr.port().to_string())
        .arg("ping")
        .assert()
        .success()
        .stdout("PONG\n");
}

#[test]
fn missing_value_is_usage_error() {
    Command::cargo_bin("dhtkv")
        .unwrap()
        .args(["put", "k1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unreadable_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent");

    Command::cargo_bin("dhtkv")
        .unwrap()
        .args(["put", "--input"])
        .arg(&missing)
        .arg("k1")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("não foi possível ler"));
}

#[test]
fn unreachable_store_fails() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    dhtkv(addr)
        .args(["get", "k"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("store indisponível"));
}
