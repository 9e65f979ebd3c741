use super::*;
use pretty_assertions::assert_eq;

fn size_of(text: &str) -> u32 {
    LayoutDescriptor::parse(text).unwrap().storage_size()
}

// === Decoding ===

#[test]
fn picture_with_is_and_usage() {
    let d = LayoutDescriptor::parse("PICTURE IS S9(7)V99 USAGE IS COMP-3").unwrap();
    assert_eq!(d.picture(), Some("S9(7)V99"));
    assert_eq!(d.usage(), Usage::Packed);
    assert_eq!(d.digits(), 9);
}

#[test]
fn bare_usage_descriptor() {
    let d = LayoutDescriptor::parse("COMP-1").unwrap();
    assert_eq!(d.picture(), None);
    assert_eq!(d.usage(), Usage::Float4);
}

#[test]
fn lower_case_picture_is_folded() {
    let d = LayoutDescriptor::parse("pic x(4)").unwrap();
    assert_eq!(d.picture(), Some("X(4)"));
}

// === Sizing ===

#[test]
fn display_sizes() {
    assert_eq!(size_of("PIC X(30)"), 30);
    assert_eq!(size_of("PIC 9(5)V99"), 7);
    assert_eq!(size_of("PIC S9(3)"), 3);
    assert_eq!(size_of("PIC ZZ,ZZ9.99"), 9);
    assert_eq!(size_of("PIC 9(5)CR"), 7);
    assert_eq!(size_of("PIC XX"), 2);
}

#[test]
fn packed_and_binary_sizes() {
    assert_eq!(size_of("PIC S9(7)V99 COMP-3"), 5);
    assert_eq!(size_of("PIC 9(4) COMP"), 2);
    assert_eq!(size_of("PIC S9(9) BINARY"), 4);
    assert_eq!(size_of("PIC S9(18) COMP-5"), 8);
}

#[test]
fn fixed_sizes() {
    assert_eq!(size_of("COMP-2"), 8);
    assert_eq!(size_of("USAGE INDEX"), 4);
    assert_eq!(size_of("USAGE IS POINTER"), 4);
    assert_eq!(size_of("PIC N(5)"), 5);
    assert_eq!(size_of("PIC N(5) NATIONAL"), 10);
}

// === Errors ===

#[test]
fn unknown_symbol_is_reported() {
    assert_eq!(
        LayoutDescriptor::parse("PIC X?"),
        Err(DescriptorError::UnknownSymbol { symbol: '?' })
    );
}

#[test]
fn malformed_repeat_is_reported() {
    assert_eq!(
        LayoutDescriptor::parse("PIC X(A)"),
        Err(DescriptorError::BadRepeat)
    );
    assert_eq!(
        LayoutDescriptor::parse("PIC (5)"),
        Err(DescriptorError::BadRepeat)
    );
}

#[test]
fn missing_picture_is_reported() {
    assert_eq!(
        LayoutDescriptor::parse("PIC"),
        Err(DescriptorError::MissingPicture)
    );
}
