use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const NUBANK: &str = "\
Nu Pagamentos S.A.
RESUMO DA FATURA ATUAL
TRANSAÇÕES DE 20 DEZ A 19 JAN
MARIA SILVA
28 DEZ Padaria Pao Quente R$ 15,00
02 JAN •••• 0539 Posto Shell
R$ 200,00
1 de 2
\u{000C}MARIA SILVA
FATURA 26 JAN 2026 EMISSÃO E ENVIO 19 JAN 2026
TRANSAÇÕES DE 20 DEZ A 19 JAN
Pagamentos e Financiamentos
05 JAN Pagamento em 05 JAN \u{2212}R$ 1.500,00
2 de 2
";

const SICOOB: &str = "\
SICOOB
EXTRATO DE CARTÃO DE CRÉDITO
Cliente: JOAO SOUZA
Fatura de 31/01/2026 Vencimento 10/02/2026
MOVIMENTOS
- SALDO ANTERIOR 1.500,00
05/01 PAGAMENTO FATURA -1.500,00
GASTOS DE JOAO SOUZA
28/12 PADARIA 15,00
TOTAL GASTOS 15,00
";

fn fatura(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fatura").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path()).env("HOME", home.path());
    cmd
}

fn fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn process_nubank_to_csv() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "nubank.txt", NUBANK);

    fatura(&dir)
        .args(["process", "--year", "2026", "--owner", "MARIA SILVA"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: 3 linhas salvas em"));

    let csv = read(&dir.path().join("nubank.csv"));
    assert_eq!(
        csv,
        "Data,Descrição,Valor\n\
         2025-12-28,Padaria Pao Quente,\"R$ 15,00\"\n\
         2026-01-02,Posto Shell,\"R$ 200,00\"\n\
         2026-01-05,[Pagamentos e Financiamentos] Pagamento em 05 JAN,\"-R$ 1.500,00\"\n"
    );
}

#[test]
fn process_nubank_requires_year() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "nubank.txt", NUBANK);

    fatura(&dir)
        .arg("process")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("statement year"));
}

#[test]
fn process_sicoob_json_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "sicoob.txt", SICOOB);

    let assert = fatura(&dir)
        .args(["process", "--stdout", "-f", "json"])
        .arg(&input)
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(json["layout"], "sicoob");
    assert_eq!(json["primary"][0]["date"], "2025-12-28");
    assert_eq!(json["secondary"][0]["description"], "SALDO ANTERIOR:");
    assert_eq!(json["secondary"][1]["value"], -1500.0);
    assert!(!dir.path().join("sicoob.json").exists());
}

#[test]
fn process_text_summary_keeps_input() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "fatura.txt", SICOOB);

    fatura(&dir)
        .args(["process", "-f", "text"])
        .arg(&input)
        .assert()
        .success();

    assert_eq!(read(&input), SICOOB);
    assert!(read(&dir.path().join("fatura.summary.txt")).contains("PADARIA"));

    fatura(&dir)
        .args(["process", "-f", "text", "-o"])
        .arg(&input)
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Refusing to overwrite"));
    assert_eq!(read(&input), SICOOB);
}

#[test]
fn process_creates_output_directories() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "sicoob.txt", SICOOB);
    let output = dir.path().join("new").join("dir").join("out.csv");

    fatura(&dir)
        .arg("process")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert!(read(&output).starts_with("Data,Descrição,Valor\n"));
}

#[test]
fn process_xlsx_needs_a_file() {
    let dir = TempDir::new().unwrap();
    let input = fixture(&dir, "sicoob.txt", SICOOB);

    fatura(&dir)
        .args(["process", "--stdout", "-f", "xlsx"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be written to stdout"));

    fatura(&dir)
        .args(["process", "-f", "xlsx"])
        .arg(&input)
        .assert()
        .success();
    let bytes = fs::read(dir.path().join("sicoob.xlsx")).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn process_rejects_missing_and_unsupported_inputs() {
    let dir = TempDir::new().unwrap();

    fatura(&dir)
        .args(["process", "does-not-exist.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));

    let other = fixture(&dir, "fatura.csv", "a,b,c");
    fatura(&dir)
        .arg("process")
        .arg(&other)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn batch_with_summary() {
    let dir = TempDir::new().unwrap();
    let inputs = dir.path().join("in");
    let outputs = dir.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("a_sicoob.txt"), SICOOB).unwrap();
    fs::write(inputs.join("b_nubank.txt"), NUBANK).unwrap();

    let pattern = format!("{}/*.txt", inputs.display());
    fatura(&dir)
        .args(["batch", &pattern, "--summary", "--continue-on-error", "-j", "2"])
        .arg("--output-dir")
        .arg(&outputs)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful, 1 failed"));

    assert!(outputs.join("a_sicoob.csv").exists());
    assert!(!outputs.join("b_nubank.csv").exists());

    let summary = read(&outputs.join("summary.csv"));
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines[0], "file,layout,primary,secondary,error");
    assert!(lines[1].ends_with("a_sicoob.txt,sicoob,1,2,"));
    assert!(lines[2].contains("b_nubank.txt,,,,"));
}

#[test]
fn batch_stops_on_first_error_by_default() {
    let dir = TempDir::new().unwrap();
    fixture(&dir, "nubank.txt", NUBANK);

    let pattern = format!("{}/*.txt", dir.path().display());
    fatura(&dir)
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn config_set_get_round_trip() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    fatura(&dir)
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "statement.year", "2026"])
        .assert()
        .success();

    fatura(&dir)
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "statement.year"])
        .assert()
        .success()
        .stdout(predicate::str::diff("2026\n"));

    fatura(&dir)
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "statement.typo", "1"])
        .assert()
        .failure();

    // The stored year lets Nubank statements parse without --year.
    let input = fixture(&dir, "nubank.txt", NUBANK);
    fatura(&dir)
        .arg("--config")
        .arg(&config)
        .args(["process", "--owner", "MARIA SILVA", "--stdout"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-12-28,Padaria Pao Quente"));
}
