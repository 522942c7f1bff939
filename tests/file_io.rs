use std::fs;

use aligned_fasta::coordinates::Coordinates;
use aligned_fasta::formats::fasta::{format_alignment, FastaError};
use aligned_fasta::formats::{parse_file, write_file, ParseError};
use aligned_fasta::model::{Alignment, Record};

const GLOBINS: &str = "test_data/globins.fasta";

#[test]
fn test_parse_wrapped_file() {
    let alignment = parse_file(GLOBINS).unwrap();

    assert_eq!(alignment.sequence_count(), 3);
    assert_eq!(alignment.length(), 80);
    assert_eq!(alignment.get(0).unwrap().id, "HBA_HUMAN");
    assert_eq!(
        alignment.get(0).unwrap().description.as_deref(),
        Some("Hemoglobin subunit alpha")
    );
    assert_eq!(alignment.get(2).unwrap().description, None);
    assert_eq!(alignment.get(2).unwrap().sequence, "KSAVTALWGKVNVDEVGGEAL");

    let coordinates = alignment.coordinates();
    assert_eq!(
        coordinates.columns(),
        &[0, 2, 3, 8, 19, 21, 31, 48, 49, 52, 57, 80]
    );
    assert_eq!(
        coordinates.row(0),
        Some(&[0, 2, 2, 7, 18, 20, 30, 47, 47, 50, 50, 73][..])
    );
    assert_eq!(
        coordinates.row(1),
        Some(&[0, 2, 3, 8, 19, 19, 29, 46, 47, 50, 55, 78][..])
    );
    assert_eq!(
        coordinates.row(2),
        Some(&[0, 0, 0, 0, 11, 11, 21, 21, 21, 21, 21, 21][..])
    );
}

#[test]
fn test_rewrite_unwraps_lines() {
    let alignment = parse_file(GLOBINS).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("globins.afa");

    write_file(&path, &alignment).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written.lines().count(), 6);
    assert!(written.lines().skip(1).step_by(2).all(|line| line.len() == 80));
    assert_eq!(written, format!("{}\n", format_alignment(&alignment)));

    let reparsed = parse_file(&path).unwrap();
    assert_eq!(reparsed, alignment);
}

#[test]
fn test_round_trip_programmatic_alignment() {
    let records = vec![
        Record::new("a", "MKVLLA").with_description("first sequence"),
        Record::new("b", "MKAALLG"),
        Record::new("c", "KVG"),
    ];
    let coordinates = Coordinates::with_columns(
        vec![0, 1, 2, 3, 5, 6, 8, 9, 10],
        vec![
            vec![0, 1, 2, 3, 3, 3, 5, 6, 6],
            vec![0, 1, 2, 2, 4, 4, 6, 6, 7],
            vec![0, 0, 1, 2, 2, 2, 2, 2, 3],
        ],
    )
    .unwrap();
    let alignment = Alignment::new(records, coordinates).unwrap();
    assert_eq!(
        format_alignment(&alignment),
        ">a first sequence\nMKV---LLA-\n>b\nMK-AA-LL-G\n>c\n-KV------G"
    );

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("abc.fasta");
    write_file(&path, &alignment).unwrap();
    assert_eq!(parse_file(&path).unwrap(), alignment);
}

#[test]
fn test_empty_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.fasta");
    fs::write(&path, "").unwrap();

    let result = parse_file(&path);
    assert!(matches!(
        result,
        Err(ParseError::FastaError(FastaError::EmptyFile))
    ));
}
