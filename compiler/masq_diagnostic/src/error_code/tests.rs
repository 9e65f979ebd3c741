use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E2001.to_string(), "E2001");
    assert_eq!(ErrorCode::W0004.as_str(), "W0004");
}

#[test]
fn test_warning_range() {
    assert!(ErrorCode::W0001.is_warning());
    assert!(ErrorCode::W0003.is_warning());
    assert!(!ErrorCode::E3001.is_warning());
}

#[test]
fn test_batch_fatal_codes() {
    assert!(ErrorCode::E2001.is_batch_fatal());
    assert!(ErrorCode::E2002.is_batch_fatal());
    assert!(ErrorCode::E1001.is_batch_fatal());
    assert!(!ErrorCode::E3001.is_batch_fatal());
    assert!(!ErrorCode::W0002.is_batch_fatal());
}

#[test]
fn test_descriptions() {
    assert_eq!(ErrorCode::E3001.description(), "boundary exceeded");
    assert_eq!(ErrorCode::W0001.description(), "unterminated literal");
}

#[test]
fn test_parse_ignores_case() {
    assert_eq!("e2002".parse::<ErrorCode>(), Ok(ErrorCode::E2002));
    assert_eq!("W0004".parse::<ErrorCode>(), Ok(ErrorCode::W0004));
    assert_eq!("E9999".parse::<ErrorCode>(), Err(()));
}

#[test]
fn test_all_codes_round_trip() {
    for code in ErrorCode::ALL {
        assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(code));
    }
}
