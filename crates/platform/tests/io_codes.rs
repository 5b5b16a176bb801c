//! DIO return-code domain: numeric values, ranges and conversions.

use platform::iodriver::{
    result_code, result_from_code, IoCodeRange, IoError, UnknownIoCode, DIO_DRIVER_VERSION,
    IO_E_OK,
};

#[test]
fn test_numeric_codes_match_header() {
    let expected: [(IoError, u8); 9] = [
        (IoError::Busy, 1),
        (IoError::UnknownMode, 2),
        (IoError::FunctionSuspended, 16),
        (IoError::ParamIgnored, 17),
        (IoError::InvalidChannelId, 18),
        (IoError::InvalidValue, 19),
        (IoError::InvalidSize, 20),
        (IoError::InvalidPosition, 21),
        (IoError::InvalidNotificationType, 22),
    ];
    for (error, code) in expected {
        assert_eq!(error.code(), code, "{error:?}");
        assert_eq!(u8::from(error), code);
    }
    assert_eq!(IO_E_OK, 0);
}

#[test]
fn test_framework_and_driver_ranges() {
    assert_eq!(IoError::Busy.range(), IoCodeRange::Framework);
    assert_eq!(IoError::UnknownMode.range(), IoCodeRange::Framework);
    for error in IoError::ALL.iter().filter(|e| e.code() >= 16) {
        assert_eq!(error.range(), IoCodeRange::Driver, "{error:?}");
    }
    assert_eq!(IoCodeRange::of(64), IoCodeRange::Implementation);
    assert_eq!(IoCodeRange::of(127), IoCodeRange::Implementation);
    assert_eq!(IoCodeRange::of(128), IoCodeRange::Reserved);
}

#[test]
fn test_ok_is_code_zero() {
    assert_eq!(result_code(Ok(())), IO_E_OK);
    assert_eq!(result_from_code(0), Ok(Ok(())));
}

#[test]
fn test_unassigned_codes_rejected() {
    for code in [3u8, 15, 23, 63, 64, 200] {
        assert_eq!(IoError::try_from(code), Err(UnknownIoCode(code)));
        assert_eq!(result_from_code(code), Err(UnknownIoCode(code)));
    }
}

#[test]
fn test_driver_version() {
    assert_eq!(
        (
            DIO_DRIVER_VERSION.major,
            DIO_DRIVER_VERSION.minor,
            DIO_DRIVER_VERSION.micro,
            DIO_DRIVER_VERSION.patch
        ),
        (0, 0, 1, 0)
    );
}

proptest::proptest! {
    /// Every byte either decodes to the error with that code or is rejected.
    #[test]
    fn code_decoding_is_exact(code in 0u8..=255) {
        match IoError::try_from(code) {
            Ok(error) => assert_eq!(error.code(), code),
            Err(UnknownIoCode(c)) => {
                assert_eq!(c, code);
                assert!(IoError::ALL.iter().all(|e| e.code() != code));
            }
        }
    }

    /// Success and failure never share a numeric code.
    #[test]
    fn result_code_roundtrips(code in 0u8..=255) {
        if let Ok(result) = result_from_code(code) {
            assert_eq!(result_code(result), code);
        }
    }
}
