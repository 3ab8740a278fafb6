use assert_cmd::Command;
use assert_cmd::cargo_bin;
use predicates::prelude::*;
use serde_json::json;
use std::path::Path;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET: &str = "cli-secret";

/// A command with a clean environment, run from an empty directory so no
/// stray `.env` file leaks in.
fn command(workdir: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin!("r4conecta"));
    cmd.current_dir(workdir)
        .env_remove("BASE_URL")
        .env_remove("TOKEN_COMMERCE")
        .env_remove("R4_POLL_INTERVAL_MS")
        .env_remove("R4_POLL_MAX_ATTEMPTS")
        .env_remove("R4_AUDIT_LOG")
        .env("RUST_LOG", "info");
    cmd
}

#[test]
fn test_missing_configuration_fails_before_any_call() {
    let workdir = tempfile::tempdir().unwrap();

    command(workdir.path())
        .args(["rate", "--value-date", "2024-05-02"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("BASE_URL"));
}

#[test]
fn test_invalid_amount_is_rejected_by_argument_parsing() {
    let workdir = tempfile::tempdir().unwrap();

    command(workdir.path())
        .env("BASE_URL", "http://127.0.0.1:9")
        .env("TOKEN_COMMERCE", SECRET)
        .args([
            "credit", "--id", "V1", "--account", "0102", "--amount", "0", "--concept", "x",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Amount must be positive"));
}

#[test]
fn test_env_file_supplies_configuration() {
    let workdir = tempfile::tempdir().unwrap();
    std::fs::write(
        workdir.path().join(".env"),
        "BASE_URL=not-a-url\nTOKEN_COMMERCE=from-dotenv\n",
    )
    .unwrap();

    command(workdir.path())
        .args(["rate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not-a-url"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rate_lookup_prints_gateway_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/MBbcv"))
        .and(header("Commerce", SECRET))
        .and(header(
            "Authorization",
            r4conecta::domain::signer::sign("2024-05-02USD", SECRET).as_str(),
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": "00", "tipocambio": 36.62, "fechavalor": "2024-05-02"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let uri = server.uri();
    let workdir = tempfile::tempdir().unwrap();
    let dir = workdir.path().to_path_buf();

    let assert = tokio::task::spawn_blocking(move || {
        command(&dir)
            .env("BASE_URL", &uri)
            .env("TOKEN_COMMERCE", SECRET)
            .args(["rate", "--currency", "USD", "--value-date", "2024-05-02"])
            .assert()
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout(predicate::str::contains("COMPLETED"))
        .stdout(predicate::str::contains("\"tipocambio\": 36.62"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_credit_timeout_has_its_own_exit_code_and_audit_trail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/CICuentas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "AC00", "id": "C1"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/ConsultarOperaciones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "AC01"})))
        .expect(2)
        .mount(&server)
        .await;
    let uri = server.uri();
    let workdir = tempfile::tempdir().unwrap();
    let audit_path = workdir.path().join("audit.log");
    let audit_arg = audit_path.clone();
    let dir = workdir.path().to_path_buf();

    let assert = tokio::task::spawn_blocking(move || {
        command(&dir)
            .env("BASE_URL", &uri)
            .env("TOKEN_COMMERCE", SECRET)
            .arg("--poll-interval-ms")
            .arg("10")
            .arg("--poll-max-attempts")
            .arg("2")
            .arg("--audit-log")
            .arg(&audit_arg)
            .args([
                "credit",
                "--id",
                "V1",
                "--account",
                "01020000000000000001",
                "--amount",
                "10.00",
                "--concept",
                "prueba",
            ])
            .assert()
    })
    .await
    .unwrap();

    assert
        .code(3)
        .stdout(predicate::str::contains("TIMED OUT"))
        .stdout(predicate::str::contains("may still settle"));
    let audit = std::fs::read_to_string(&audit_path).unwrap();
    assert!(audit.contains("verification attempts exhausted"));
    assert!(!audit.contains(SECRET));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_c2p_rejection_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/MBc2p"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": "01", "message": "insufficient funds"})),
        )
        .mount(&server)
        .await;
    let uri = server.uri();
    let workdir = tempfile::tempdir().unwrap();
    let dir = workdir.path().to_path_buf();

    let assert = tokio::task::spawn_blocking(move || {
        command(&dir)
            .env("BASE_URL", &uri)
            .env("TOKEN_COMMERCE", SECRET)
            .args([
                "c2p",
                "--destination-phone",
                "04241112233",
                "--id",
                "V2",
                "--concept",
                "cobro",
                "--bank",
                "0102",
                "--ip",
                "127.0.0.1",
                "--amount",
                "5.00",
                "--otp",
                "1234",
            ])
            .assert()
    })
    .await
    .unwrap();

    assert
        .code(2)
        .stdout(predicate::str::contains(
            "REJECTED: rejected with code 01: insufficient funds",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_debit_reads_otp_from_stdin() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/GenerarOtp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "202"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/DebitoInmediato"))
        .and(header(
            "Authorization",
            r4conecta::domain::signer::sign("0169V1041412345671.50654321", SECRET).as_str(),
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": "ACCP", "id": "D1", "reference": "R-D1"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let uri = server.uri();
    let workdir = tempfile::tempdir().unwrap();
    let dir = workdir.path().to_path_buf();

    let assert = tokio::task::spawn_blocking(move || {
        command(&dir)
            .env("BASE_URL", &uri)
            .env("TOKEN_COMMERCE", SECRET)
            .args([
                "debit",
                "--bank",
                "0169",
                "--amount",
                "1.50",
                "--phone",
                "04141234567",
                "--id",
                "V1",
                "--name",
                "Ana",
                "--concept",
                "pago",
            ])
            .write_stdin("654321\n")
            .assert()
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout(predicate::str::contains("reference R-D1"))
        .stderr(predicate::str::contains("OTP sent to 04141234567"))
        .stderr(predicate::str::contains("\u{1b}[").not());
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn test_ctrl_c_at_otp_prompt_cancels_debit() {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;
    use std::io::Read;
    use std::process::Stdio;
    use std::time::{Duration, Instant};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/GenerarOtp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "202"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/DebitoInmediato"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "ACCP"})))
        .expect(0)
        .mount(&server)
        .await;
    let uri = server.uri();
    let workdir = tempfile::tempdir().unwrap();
    let dir = workdir.path().to_path_buf();

    let (code, stdout) = tokio::task::spawn_blocking(move || {
        let mut child = std::process::Command::new(cargo_bin!("r4conecta"))
            .current_dir(&dir)
            .env_remove("R4_AUDIT_LOG")
            .env("BASE_URL", &uri)
            .env("TOKEN_COMMERCE", SECRET)
            .env("RUST_LOG", "info")
            .args([
                "debit", "--bank", "0169", "--amount", "1.50", "--phone", "04141234567", "--id",
                "V1", "--name", "Ana", "--concept", "pago",
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();
        // Held open so the prompt keeps waiting.
        let _stdin = child.stdin.take().unwrap();

        let mut stderr = child.stderr.take().unwrap();
        let mut seen = String::new();
        let mut buf = [0u8; 512];
        while !seen.contains("OTP sent to") {
            let n = stderr.read(&mut buf).unwrap();
            assert!(n > 0, "exited before prompting: {seen}");
            seen.push_str(&String::from_utf8_lossy(&buf[..n]));
        }

        kill(Pid::from_raw(child.id() as i32), Signal::SIGINT).unwrap();
        let deadline = Instant::now() + Duration::from_secs(10);
        let status = loop {
            if let Some(status) = child.try_wait().unwrap() {
                break status;
            }
            if Instant::now() > deadline {
                child.kill().ok();
                panic!("still running after SIGINT");
            }
            std::thread::sleep(Duration::from_millis(50));
        };

        let mut stdout = String::new();
        child
            .stdout
            .take()
            .unwrap()
            .read_to_string(&mut stdout)
            .unwrap();
        (status.code(), stdout)
    })
    .await
    .unwrap();

    assert_eq!(code, Some(130));
    assert!(stdout.contains("CANCELLED"));
}
