/// Size formatting utilities — human-readable byte counts.
///
/// All internal sizes are `u64` bytes. Floating point is only used
/// at the display-formatting boundary.

/// Unit suffixes for each power of 1024 above plain bytes.
const UNITS: [&str; 6] = ["KB", "MB", "GB", "TB", "PB", "EB"];

/// Format a byte count into a human-readable string with appropriate unit.
///
/// Uses binary scaling (1 KB = 1024 B) with the common short labels. Values
/// below 1024 are printed as an integer followed by `B`; everything else gets
/// exactly one decimal place.
pub fn format_size(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    if bytes < UNIT {
        return format!("{bytes} B");
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }

    format!("{:.1} {}", bytes as f64 / div as f64, UNITS[exp])
}

/// Format a file count with thousand separators.
pub fn format_count(count: u64) -> String {
    if count < 1_000 {
        return count.to_string();
    }
    let s = count.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}
