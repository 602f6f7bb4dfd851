use chrono::{Local, TimeZone};
use splancli::utils::*;

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    // Should not be empty
    assert!(!challenge.is_empty());

    // Should be deterministic - same input produces same output
    let challenge2 = generate_code_challenge(verifier);
    assert_eq!(challenge, challenge2);

    // Different input should produce different output
    let challenge3 = generate_code_challenge("different_verifier");
    assert_ne!(challenge, challenge3);

    // Should be base64-encoded (URL-safe, no padding)
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_parse_selection_valid_inputs() {
    // Plain playlist numbers
    assert_eq!(parse_selection("1").unwrap(), Selection::Index(1));
    assert_eq!(parse_selection("42").unwrap(), Selection::Index(42));

    // Surrounding whitespace is ignored
    assert_eq!(parse_selection("  7 ").unwrap(), Selection::Index(7));

    // The liked sentinel, long and short form, case insensitive
    assert_eq!(parse_selection("liked").unwrap(), Selection::Liked);
    assert_eq!(parse_selection("l").unwrap(), Selection::Liked);
    assert_eq!(parse_selection("LIKED").unwrap(), Selection::Liked);
    assert_eq!(parse_selection("L").unwrap(), Selection::Liked);
}

#[test]
fn test_parse_selection_invalid_inputs() {
    // Empty input
    let result = parse_selection("");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("cannot be empty"));

    // Whitespace only
    assert!(parse_selection("   ").is_err());

    // Indexes are 1-based
    let result = parse_selection("0");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("start at 1"));

    // Anything else
    assert!(parse_selection("likedd").is_err());
    assert!(parse_selection("-3").is_err());
    assert!(parse_selection("2.5").is_err());
}

#[test]
fn test_id_from_uri() {
    // Full uris are stripped to the bare id
    assert_eq!(id_from_uri("spotify:track:4uLU6hMCjMI75M1A2tKUQC"), "4uLU6hMCjMI75M1A2tKUQC");
    assert_eq!(id_from_uri("spotify:artist:0OdUWJ0sBjDrqHygGUXeCF"), "0OdUWJ0sBjDrqHygGUXeCF");

    // Bare ids pass through unchanged
    assert_eq!(id_from_uri("4uLU6hMCjMI75M1A2tKUQC"), "4uLU6hMCjMI75M1A2tKUQC");
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(0), "0:00");
    assert_eq!(format_duration(1_000), "0:01");
    assert_eq!(format_duration(59_999), "0:59");
    assert_eq!(format_duration(60_000), "1:00");
    assert_eq!(format_duration(185_000), "3:05");

    // Over an hour just keeps counting minutes
    assert_eq!(format_duration(3_725_000), "62:05");
}

#[test]
fn test_analysis_filename() {
    let now = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 42).unwrap();
    assert_eq!(analysis_filename(now), "analysis_20240307_090542.json");
}

#[test]
fn test_first_half() {
    // Even length: exactly half
    assert_eq!(first_half(&[1, 2, 3, 4]), &[1, 2]);

    // Odd length: rounds up
    assert_eq!(first_half(&[1, 2, 3, 4, 5]), &[1, 2, 3]);

    // Degenerate cases
    assert_eq!(first_half(&[1]), &[1]);
    let empty: &[i32] = &[];
    assert_eq!(first_half(empty), empty);
}
