#![no_main]

use libfuzzer_sys::fuzz_target;
use mesh_ntb_fuzz::Geometry;

fuzz_target!(|value: Geometry| {
    value.check_all_modes();
});
