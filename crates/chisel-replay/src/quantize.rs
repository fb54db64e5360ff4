//! Narrowing of live values into fixed-width wire fields.
//!
//! Fields wrap like fixed-width registers: the value is truncated toward
//! zero and reduced modulo 2^n. Nothing is clamped, so a pointer at
//! x = 65 536 records as 0. Callers that need a guarantee must clamp
//! before pushing. NaN and infinities record as 0.
//!
//! Integer inputs use plain `as` casts, which already wrap this way.

fn wrap(v: f32, modulus: i64) -> i64 {
    if !v.is_finite() {
        return 0;
    }
    (v.trunc() as i64).rem_euclid(modulus)
}

/// Narrow to an unsigned byte.
pub fn wrap_u8(v: f32) -> u8 {
    wrap(v, 1 << 8) as u8
}

/// Tool intensity in `[0, 1]` as a whole percentage byte.
pub fn percent_u8(intensity: f32) -> u8 {
    wrap_u8(intensity * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_toward_zero() {
        assert_eq!(wrap_u8(45.9), 45);
        assert_eq!(wrap_u8(0.99), 0);
    }

    #[test]
    fn wraps_instead_of_clamping() {
        assert_eq!(wrap_u8(256.0), 0);
        assert_eq!(wrap_u8(300.0), 44);
        assert_eq!(wrap_u8(-1.0), 255);
    }

    #[test]
    fn non_finite_records_zero() {
        assert_eq!(wrap_u8(f32::NAN), 0);
        assert_eq!(wrap_u8(f32::INFINITY), 0);
        assert_eq!(wrap_u8(f32::NEG_INFINITY), 0);
    }

    #[test]
    fn percent_moves_two_digits_into_the_byte() {
        assert_eq!(percent_u8(0.5), 50);
        assert_eq!(percent_u8(1.0), 100);
        assert_eq!(percent_u8(0.0), 0);
    }

    #[test]
    fn integer_casts_wrap_the_same_way() {
        assert_eq!(70_000i32 as u16, 4_464);
        assert_eq!(-1i32 as u16, 65_535);
        assert_eq!(300i32 as i8, 44);
    }
}
