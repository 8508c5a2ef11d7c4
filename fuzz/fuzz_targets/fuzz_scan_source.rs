// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use depscope::scanner::scan_source;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let lenient = scan_source(&text, false);
    let stripped = scan_source(&text, true);
    assert!(lenient.path.is_empty() && stripped.path.is_empty());
});
