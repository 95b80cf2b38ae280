//! Ordering helpers shared by the stages

/// Clamp a value to the given inclusive range
pub fn clamp<T>(value: T, min: T, max: T) -> T where T: PartialOrd {
    if value < min { min } else if value > max { max } else { value }
}

/// Smallest of three values
pub fn min3<T>(a: T, b: T, c: T) -> T where T: PartialOrd {
    let ab = if b < a { b } else { a };
    if c < ab { c } else { ab }
}

/// Largest of three values
pub fn max3<T>(a: T, b: T, c: T) -> T where T: PartialOrd {
    let ab = if b > a { b } else { a };
    if c > ab { c } else { ab }
}
