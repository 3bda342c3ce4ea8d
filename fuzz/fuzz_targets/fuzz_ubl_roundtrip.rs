#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parse → serialize → parse must not panic at any step.
    if let Ok(invoice) = ubl_invoice::ubl::from_ubl_xml(data) {
        if let Ok(xml) = ubl_invoice::ubl::to_ubl_xml(&invoice) {
            let _ = ubl_invoice::ubl::from_ubl_xml(&xml);
        }
    }
});
