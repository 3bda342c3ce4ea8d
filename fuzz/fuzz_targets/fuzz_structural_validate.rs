#![no_main]

use libfuzzer_sys::fuzz_target;
use ubl_invoice::validate::{SchemaValidator, StructuralValidator};

fuzz_target!(|data: &[u8]| {
    let _ = StructuralValidator::new().validate(data);
});
