//! Fuzz target: stored calibration blob
//!
//! Feeds arbitrary bytes to the NVS calibration decoder and verifies:
//! - No panics under arbitrary input
//! - Anything accepted passes `StoredCalibration::validate`
//! - Anything accepted re-encodes to a blob that decodes to the same value
//!
//! cargo fuzz run fuzz_calibration_blob

#![no_main]

use kitchennode::adapters::nvs::{MAX_BLOB_SIZE, decode, encode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(cal) = decode(data) else {
        return;
    };

    assert!(cal.validate().is_ok(), "decoder accepted {:?}", cal);

    let blob = encode(&cal).expect("a decoded calibration must re-encode");
    assert!(blob.len() <= MAX_BLOB_SIZE);
    assert_eq!(decode(&blob), Ok(cal));
});
