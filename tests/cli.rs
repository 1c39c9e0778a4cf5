use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn epistola(dir: &Path) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("epistola").into();
    cmd.current_dir(dir);
    cmd.env("NO_COLOR", "1");
    cmd
}

fn tei(title: &str, correspondents: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<TEI xmlns="http://www.tei-c.org/ns/1.0">
  <teiHeader>
    <fileDesc><sourceDesc><msDesc>
      <msIdentifier><repository>Archivio di Stato</repository><idno>Lett. 7</idno></msIdentifier>
      <msContents><msItem>{title}<textLang>italiano</textLang></msItem></msContents>
      <physDesc><objectDesc><supportDesc>
        <support>carta</support><extent>1 foglio</extent>
      </supportDesc></objectDesc></physDesc>
      <history><origin><origDate>1902</origDate><origPlace key="3176959">Firenze</origPlace></origin></history>
    </msDesc></sourceDesc></fileDesc>
    <profileDesc>
      <correspDesc>{correspondents}</correspDesc>
      <particDesc><listPerson>
        <person xml:id="p1"><persName key="v1"><forename>Niccolò</forename><surname>Tommaseo</surname></persName></person>
      </listPerson></particDesc>
    </profileDesc>
  </teiHeader>
  <text><body><p>Caro amico,</p><p>da Firenze ti scrivo.</p></body></text>
</TEI>"#
    )
}

const SENT: &str = r#"<correspAction type="sent"><persName key="v1">Niccolò Tommaseo</persName></correspAction>"#;

/// Returns (tempdir_guard, path of a written document).
fn write_doc(name: &str, xml: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join(name);
    fs::write(&path, xml).unwrap();
    (tmp, path)
}

// --- Binary startup ---

#[test]
fn binary_runs() {
    let mut cmd: Command = cargo_bin_cmd!("epistola").into();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("epistola"));
}

// --- Metadata ---

#[test]
fn metadata_prints_record() {
    let (tmp, path) = write_doc("lettera.txt", &tei("<title>Lettera</title>", SENT));

    epistola(tmp.path())
        .arg("metadata")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"Lett. 7\""))
        .stdout(predicate::str::contains("\"originPlace\": \"Firenze (3176959)\""))
        .stdout(predicate::str::contains("\"fullName\": \"Niccolò Tommaseo\""))
        .stdout(predicate::str::contains("\"bodyText\": \"Caro amico, da Firenze ti scrivo.\""))
        .stdout(predicate::str::contains("\"sender\": \"\""));
}

#[test]
fn metadata_keeps_partial_correspondent_on_request() {
    let (tmp, path) = write_doc("lettera.txt", &tei("<title>Lettera</title>", SENT));

    epistola(tmp.path())
        .args(["metadata", "--keep-partial-correspondents"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sender\": \"Niccolò Tommaseo (v1)\""))
        .stdout(predicate::str::contains("\"receiver\": \"\""));
}

#[test]
fn metadata_missing_title_fails() {
    let (tmp, path) = write_doc("lettera.txt", &tei("", SENT));

    epistola(tmp.path())
        .arg("metadata")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("msItem/title"));
}

// --- Decode ---

#[test]
fn decode_prints_unique_triples() {
    let (tmp, path) = write_doc(
        "sequences.txt",
        "<s><triplet> Tommaseo <per> Firenze <loc> lived in</s>\n\
         <s><triplet> Tommaseo <per> Firenze <loc> lived in</s><pad>\n\
         \n\
         <s>no triples here</s>\n",
    );

    epistola(tmp.path())
        .arg("decode")
        .arg(&path)
        .assert()
        .success()
        .stdout("<Tommaseo; per> <lived in> <Firenze; loc>\n");
}

#[test]
fn decode_reads_stdin() {
    let tmp = TempDir::new().unwrap();

    epistola(tmp.path())
        .arg("decode")
        .write_stdin("<triplet> A <per> B <org> member of <triplet> C <loc> D <loc> part of\n")
        .assert()
        .success()
        .stdout("<A; per> <member of> <B; org>\n<C; loc> <part of> <D; loc>\n");
}

// --- Run ---

#[test]
fn run_without_documents_writes_empty_output() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("xml_tei")).unwrap();

    epistola(tmp.path())
        .args(["run", "--endpoint", "http://127.0.0.1:9/generate"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Processed 0 of 0 documents"));

    let written = fs::read_to_string(tmp.path().join("triples.json")).unwrap();
    assert_eq!(written, "[]");
}

#[test]
fn run_fail_fast_aborts_on_unreachable_model() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("letters");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("a.xml"), tei("<title>Lettera</title>", SENT)).unwrap();

    epistola(tmp.path())
        .args(["run", "--pattern", "*.xml", "--fail-fast", "--endpoint", "http://127.0.0.1:9/generate"])
        .arg("--input")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Generation failed"));

    assert!(!tmp.path().join("triples.json").exists());
}

#[test]
fn run_rejects_invalid_endpoint() {
    let tmp = TempDir::new().unwrap();

    epistola(tmp.path())
        .args(["run", "--endpoint", "not a url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid model endpoint"));
}
