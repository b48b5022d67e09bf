//! Resolution rules exercised through full manifests.

mod fixtures;

use fixtures::{relative, CorpusFixture};
use xmlconf_locator::{load_tests, Entities, Error, ResolveError};

#[test]
fn test_entities_classification() {
    let corpus = CorpusFixture::new();
    corpus.inputs(&["t/a.xml"]).manifest(
        r#"<TESTSUITE><TESTCASES base="t/">
  <TEST ID="absent" URI="a.xml"/>
  <TEST ID="none" URI="a.xml" ENTITIES="none"/>
  <TEST ID="both" URI="a.xml" ENTITIES="both"/>
  <TEST ID="general" URI="a.xml" ENTITIES="general"/>
  <TEST ID="parameter" URI="a.xml" ENTITIES="parameter"/>
</TESTCASES></TESTSUITE>"#,
    );

    let records = load_tests(&corpus.paths()).unwrap();
    let classes: Vec<_> = records.iter().map(|r| r.entities()).collect();
    assert_eq!(
        classes,
        vec![
            Entities::None,
            Entities::Empty,
            Entities::Both,
            Entities::General,
            Entities::Parameter,
        ]
    );
}

#[test]
fn test_unknown_entities_value_fails() {
    let corpus = CorpusFixture::new();
    corpus.inputs(&["t/a.xml"]).manifest(
        r#"<TESTSUITE><TESTCASES base="t/">
  <TEST ID="odd" URI="a.xml" ENTITIES="xyz"/>
</TESTCASES></TESTSUITE>"#,
    );

    let err = load_tests(&corpus.paths()).unwrap_err();
    match err {
        Error::Resolve(ResolveError::UnknownEntities { id, value }) => {
            assert_eq!(id, "odd");
            assert_eq!(value, "xyz");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_eduni_out_directory_ignored() {
    let corpus = CorpusFixture::new();
    corpus
        .inputs(&["eduni/errata-2e/E14.xml", "eduni/errata-2e/out/E14.xml"])
        .manifest(
            r#"<TESTSUITE>
  <TESTCASES PROFILE="Richard Tobin's XML 1.0 2nd edition errata test suite 21 Jul 2003">
    <TEST ID="rmt-e2e-14" URI="E14.xml" TYPE="invalid" OUTPUT="out/E14.xml"/>
  </TESTCASES>
</TESTSUITE>"#,
        );

    let records = load_tests(&corpus.paths()).unwrap();
    let record = &records[0];

    assert_eq!(record.base_path(), "eduni/errata-2e/");
    assert_eq!(
        relative(&corpus.corpus_dir(), record.resolved_file()),
        "eduni/errata-2e/E14.xml"
    );
    assert_eq!(record.output(), "out/E14.xml");
    assert_eq!(record.test_name(), "edunierr_rmt_e2e_14");
}

#[test]
fn test_out_directory_kept_outside_eduni() {
    let corpus = CorpusFixture::new();
    corpus
        .inputs(&["other/E14.xml", "other/out/E14.xml"])
        .manifest(
            r#"<TESTSUITE><TESTCASES base="other/">
  <TEST ID="x" URI="E14.xml"/>
</TESTCASES></TESTSUITE>"#,
        );

    let err = load_tests(&corpus.paths()).unwrap_err();
    assert!(matches!(
        err,
        Error::Resolve(ResolveError::AmbiguousFile { .. })
    ));
}

#[test]
fn test_bare_file_name_ambiguity() {
    let corpus = CorpusFixture::new();
    corpus
        .inputs(&["ibm/valid/P01/ibm01v01.xml", "ibm/invalid/P01/ibm01v01.xml"])
        .manifest(
            r#"<TESTSUITE><TESTCASES PROFILE="IBM XML Tests" xml:base="ibm/">
  <TEST ID="ibm-valid-P01-ibm01v01.xml" URI="ibm01v01.xml" TYPE="valid"/>
</TESTCASES></TESTSUITE>"#,
        );

    let err = load_tests(&corpus.paths()).unwrap_err();
    match err {
        Error::Resolve(ResolveError::AmbiguousFile { candidates, .. }) => {
            let mut found: Vec<_> = candidates
                .iter()
                .map(|c| relative(&corpus.corpus_dir(), c))
                .collect();
            found.sort();
            assert_eq!(
                found,
                vec!["ibm/invalid/P01/ibm01v01.xml", "ibm/valid/P01/ibm01v01.xml"]
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_uri_directories_disambiguate() {
    let corpus = CorpusFixture::new();
    corpus
        .inputs(&["ibm/valid/P01/ibm01v01.xml", "ibm/invalid/P01/ibm01v01.xml"])
        .manifest(
            r#"<TESTSUITE><TESTCASES PROFILE="IBM XML Tests" xml:base="ibm/">
  <TEST ID="ibm-valid-P01-ibm01v01.xml" URI="valid/P01/ibm01v01.xml" TYPE="valid"/>
</TESTCASES></TESTSUITE>"#,
        );

    let records = load_tests(&corpus.paths()).unwrap();
    assert_eq!(
        relative(&corpus.corpus_dir(), records[0].resolved_file()),
        "ibm/valid/P01/ibm01v01.xml"
    );
}

#[test]
fn test_ibm_xml11_tests_relocated() {
    let corpus = CorpusFixture::new();
    corpus
        .inputs(&[
            "ibm/xml-1.1/valid/P02/ibm02v01.xml",
            "ibm/valid/P01/ibm01v01.xml",
        ])
        .manifest(
            r#"<TESTSUITE>
  <TESTCASES PROFILE="IBM XML Tests" xml:base="ibm/">
    <TESTCASES PROFILE="IBM Valid Conformance Tests for XML 1.1 CR October 15, 2002">
      <TEST ID="ibm-1-1-valid-P02-ibm02v01.xml" URI="valid/P02/ibm02v01.xml" TYPE="valid" VERSION="1.1"/>
    </TESTCASES>
    <TESTCASES PROFILE="IBM XML Conformance Test Suite - valid tests">
      <TEST ID="ibm-valid-P01-ibm01v01.xml" URI="valid/P01/ibm01v01.xml" TYPE="valid"/>
    </TESTCASES>
  </TESTCASES>
</TESTSUITE>"#,
        );

    let records = load_tests(&corpus.paths()).unwrap();

    assert_eq!(records[0].base_path(), "ibm/xml-1.1/");
    assert_eq!(
        relative(&corpus.corpus_dir(), records[0].resolved_file()),
        "ibm/xml-1.1/valid/P02/ibm02v01.xml"
    );
    assert_eq!(records[0].suite_prefix(), Some("ibmval11"));
    assert_eq!(records[1].base_path(), "ibm/");
    assert_eq!(records[1].suite_prefix(), Some("ibmval"));
}

#[test]
fn test_edinburgh_base_path_from_profile() {
    let corpus = CorpusFixture::new();
    corpus.inputs(&["eduni/namespaces/1.0/001.xml"]).manifest(
        r#"<TESTSUITE>
  <TESTCASES PROFILE="Richard Tobin's XML Namespaces 1.0 test suite 14 Feb 2003">
    <TEST ID="rmt-ns10-001" URI="001.xml" TYPE="valid" NAMESPACE="yes" RECOMMENDATION="NS1.0"/>
  </TESTCASES>
</TESTSUITE>"#,
    );

    let records = load_tests(&corpus.paths()).unwrap();
    let record = &records[0];

    assert_eq!(record.base_path(), "eduni/namespaces/1.0/");
    assert_eq!(record.recommendation(), "NS1.0");
    assert!(record.namespaces_enabled());
    assert_eq!(record.test_name(), "edunins10_rmt_ns10_001");
}

#[test]
fn test_records_serialize() {
    let corpus = CorpusFixture::new();
    corpus.inputs(&["t/a.xml"]).manifest(
        r#"<TESTSUITE><TESTCASES PROFILE="Suite A" base="t"><TEST ID="a" URI="a.xml" TYPE="error" NAMESPACE="no"/></TESTCASES></TESTSUITE>"#,
    );

    let records = load_tests(&corpus.paths()).unwrap();
    let json = serde_json::to_value(&records).unwrap();

    assert_eq!(json[0]["profile"], "Suite A");
    assert_eq!(json[0]["base_path"], "t/");
    assert_eq!(json[0]["test_type"], "error");
    assert_eq!(json[0]["entities"], "none");
    assert!(!records[0].namespaces_enabled());
}

#[test]
fn test_relative_corpus_dir_gives_absolute_files() {
    let corpus = CorpusFixture::in_working_dir();
    corpus.inputs(&["t/a.xml"]).manifest(
        r#"<TESTSUITE><TESTCASES base="t/"><TEST ID="a" URI="a.xml"/></TESTCASES></TESTSUITE>"#,
    );
    assert!(corpus.corpus_dir().is_relative());

    let records = load_tests(&corpus.paths()).unwrap();

    let file = records[0].resolved_file();
    assert!(file.is_absolute(), "not absolute: {}", file.display());
    assert!(file.ends_with("xmlconf/t/a.xml"));
    assert!(file.is_file());
}
