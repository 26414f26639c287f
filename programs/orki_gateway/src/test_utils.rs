use anchor_lang::prelude::*;
use crate::errors::ErrorCode;

pub fn assert_error<T: std::fmt::Debug>(result: Result<T>, expected: ErrorCode) {
    match result {
        Err(anchor_lang::error::Error::AnchorError(e)) => {
            assert_eq!(e.error_code_number, u32::from(expected), "{}", e.error_name)
        }
        other => panic!("expected {expected:?}, got {other:?}"),
    }
}
